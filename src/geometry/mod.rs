//! Vectors, coordinate conversions and detector orientation

mod three_vector;
pub use three_vector::*;

mod orientation;
pub use orientation::*;
