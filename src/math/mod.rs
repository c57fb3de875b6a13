pub mod curve;

pub use curve::{Point, G, N, P};
