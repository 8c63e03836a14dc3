//! I/O for scattered sample data

mod points;

pub use points::{parse_points, read_points};
