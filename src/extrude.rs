use crate::error::{ExtrusionError, PolygonError, Result};
use crate::math::polygon_2d::is_counter_clockwise;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::polygon::FloorPolygon;
use crate::triangulate::{flip_winding, triangulate_polygon};

/// Opaque handle to a material owned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialHandle(pub u32);

/// Material assignment for the three generated surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomMaterials {
    pub floor: MaterialHandle,
    pub ceiling: MaterialHandle,
    pub walls: MaterialHandle,
}

/// Clamp bounds for the extrusion height.
#[derive(Debug, Clone, Copy)]
pub struct HeightRange {
    pub min: f64,
    pub max: f64,
}

impl Default for HeightRange {
    fn default() -> Self {
        Self { min: 0.1, max: 3.0 }
    }
}

impl HeightRange {
    /// Clamps a finite height into the range.
    #[must_use]
    pub fn clamp(&self, height: f64) -> f64 {
        height.clamp(self.min, self.max)
    }
}

/// One renderable surface: vertex/normal buffers plus index triples and the
/// material handle the rendering collaborator should bind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    pub vertices: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub indices: Vec<[u32; 3]>,
    pub material: MaterialHandle,
}

impl SurfaceMesh {
    fn new(vertices: Vec<Point3>, indices: Vec<[u32; 3]>, material: MaterialHandle) -> Self {
        let mut mesh = Self {
            vertices,
            normals: Vec::new(),
            indices,
            material,
        };
        mesh.recompute_normals();
        mesh
    }

    /// Re-derives per-vertex normals from the current vertices and topology.
    ///
    /// Flat triangle normals are accumulated area-weighted onto each
    /// vertex and normalized, so vertices shared between triangles (wall
    /// corners) receive the averaged direction. Must be called after any
    /// in-place vertex mutation.
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.vertices.len(), Vector3::zeros());

        for tri in &self.indices {
            let a = self.vertices[tri[0] as usize];
            let b = self.vertices[tri[1] as usize];
            let c = self.vertices[tri[2] as usize];
            let face = (b - a).cross(&(c - a));
            if face.norm() < TOLERANCE {
                continue;
            }
            for &i in tri {
                self.normals[i as usize] += face;
            }
        }

        for normal in &mut self.normals {
            let len = normal.norm();
            if len > TOLERANCE {
                *normal /= len;
            } else {
                *normal = Vector3::y();
            }
        }
    }
}

/// The generated room: three surface buffers, replaced wholesale on
/// re-capture and mutated in place only by [`AdjustHeight`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMesh {
    pub floor: SurfaceMesh,
    pub ceiling: SurfaceMesh,
    pub walls: SurfaceMesh,
}

/// Extrudes a validated floor polygon into a room solid.
///
/// Produces the floor as triangulated by ear clipping (facing up), the
/// ceiling as the mirrored triangulation lifted by the extrusion height
/// (facing down into the room), and one wall quad per polygon edge
/// including the closing edge, wound to face outward.
pub struct ExtrudeRoom<'a> {
    polygon: &'a FloorPolygon,
    height: f64,
    range: HeightRange,
    materials: RoomMaterials,
}

impl<'a> ExtrudeRoom<'a> {
    /// Creates a new `ExtrudeRoom` operation.
    #[must_use]
    pub fn new(polygon: &'a FloorPolygon, height: f64) -> Self {
        Self {
            polygon,
            height,
            range: HeightRange::default(),
            materials: RoomMaterials::default(),
        }
    }

    /// Overrides the default height clamp bounds.
    #[must_use]
    pub fn with_range(mut self, range: HeightRange) -> Self {
        self.range = range;
        self
    }

    /// Assigns the material handles placed on the output surfaces.
    #[must_use]
    pub fn with_materials(mut self, materials: RoomMaterials) -> Self {
        self.materials = materials;
        self
    }

    /// Executes the extrusion.
    ///
    /// The polygon is defensively re-validated first; out-of-range heights
    /// are clamped, never rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError::InsufficientPoints`] for loops of fewer
    /// than 3 points, [`PolygonError::InvalidPolygon`] if the loop is not
    /// simple (logged, no output mutated), and
    /// [`ExtrusionError::NonFiniteHeight`] for NaN or infinite heights.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<RoomMesh> {
        if !self.height.is_finite() {
            return Err(ExtrusionError::NonFiniteHeight { value: self.height }.into());
        }
        let height = self.range.clamp(self.height);

        if let Err(err) = self.polygon.validate() {
            if matches!(err, PolygonError::InvalidPolygon { .. }) {
                tracing::error!(%err, "aborting room mesh generation");
            }
            return Err(err.into());
        }

        let points = self.polygon.points();
        let projected = self.polygon.projected();

        // Counter-clockwise in the 2D projection plane. The (x, z) pair is
        // a left-handed basis when viewed from +Y, so these triples face
        // down in 3D; the floor gets the flipped copy.
        let ceiling_indices = triangulate_polygon(&projected)?;
        let mut floor_indices = ceiling_indices.clone();
        flip_winding(&mut floor_indices);

        let floor = SurfaceMesh::new(points.to_vec(), floor_indices, self.materials.floor);

        let ceiling_vertices: Vec<Point3> = points
            .iter()
            .map(|p| Point3::new(p.x, p.y + height, p.z))
            .collect();
        let ceiling = SurfaceMesh::new(ceiling_vertices, ceiling_indices, self.materials.ceiling);

        // Walls need the loop counter-clockwise seen from above for the
        // quad pattern below to face outward.
        let ccw_from_above = !is_counter_clockwise(&projected);
        let loop_points: Vec<Point3> = if ccw_from_above {
            points.to_vec()
        } else {
            points.iter().rev().copied().collect()
        };

        let n = loop_points.len();
        let mut wall_vertices = Vec::with_capacity(n * 2);
        for p in &loop_points {
            wall_vertices.push(*p);
            wall_vertices.push(Point3::new(p.x, p.y + height, p.z));
        }

        let mut wall_indices = Vec::with_capacity(n * 2);
        for i in 0..n {
            let j = (i + 1) % n;
            let bl = (2 * i) as u32;
            let tl = bl + 1;
            let br = (2 * j) as u32;
            let tr = br + 1;
            wall_indices.push([bl, br, tl]);
            wall_indices.push([tl, br, tr]);
        }

        let walls = SurfaceMesh::new(wall_vertices, wall_indices, self.materials.walls);

        Ok(RoomMesh {
            floor,
            ceiling,
            walls,
        })
    }
}

/// Re-targets already-built wall and ceiling geometry to a new height.
///
/// Only vertex positions mutate: wall top vertices (odd indices in the
/// interleaved base/top layout) and every ceiling vertex get the new
/// vertical coordinate, then normals are recomputed. Topology is
/// untouched, so this is cheap enough for continuous slider input, and
/// repeated calls with the same height are idempotent.
pub struct AdjustHeight {
    height: f64,
    range: HeightRange,
}

impl AdjustHeight {
    /// Creates a new `AdjustHeight` operation.
    #[must_use]
    pub fn new(height: f64) -> Self {
        Self {
            height,
            range: HeightRange::default(),
        }
    }

    /// Overrides the default height clamp bounds.
    #[must_use]
    pub fn with_range(mut self, range: HeightRange) -> Self {
        self.range = range;
        self
    }

    /// Applies the height change to the mesh in place.
    ///
    /// Out-of-range heights are clamped, never rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ExtrusionError::NonFiniteHeight`] for NaN or infinite
    /// heights; the mesh is untouched in that case.
    pub fn apply(&self, mesh: &mut RoomMesh) -> Result<()> {
        if !self.height.is_finite() {
            return Err(ExtrusionError::NonFiniteHeight { value: self.height }.into());
        }
        let height = self.range.clamp(self.height);

        for (i, vertex) in mesh.walls.vertices.iter_mut().enumerate() {
            if i % 2 == 1 {
                vertex.y = height;
            }
        }
        for vertex in &mut mesh.ceiling.vertices {
            vertex.y = height;
        }

        mesh.walls.recompute_normals();
        mesh.ceiling.recompute_normals();
        Ok(())
    }
}
