use thiserror::Error;

/// Top-level error type for the roomcap kernel.
#[derive(Debug, Error)]
pub enum RoomcapError {
    #[error(transparent)]
    Polygon(#[from] PolygonError),

    #[error(transparent)]
    Extrusion(#[from] ExtrusionError),
}

/// Errors related to floor-polygon capture and validation.
#[derive(Debug, Error)]
pub enum PolygonError {
    #[error("edge to candidate point crosses the polygon edge starting at point {edge}")]
    SelfIntersection { edge: usize },

    #[error("polygon is not simple: edges starting at {first} and {second} intersect")]
    InvalidPolygon { first: usize, second: usize },

    #[error("{count} points are too few to triangulate (need at least 3)")]
    InsufficientPoints { count: usize },
}

/// Errors related to solid extrusion.
#[derive(Debug, Error)]
pub enum ExtrusionError {
    #[error("extrusion height {value} is not finite")]
    NonFiniteHeight { value: f64 },
}

/// Convenience type alias for results using [`RoomcapError`].
pub type Result<T> = std::result::Result<T, RoomcapError>;
