pub mod error;
pub mod extrude;
pub mod math;
pub mod polygon;
pub mod session;
pub mod triangulate;
pub mod units;

pub use error::{Result, RoomcapError};
