/// Crate error type.
pub mod error;
pub mod pixel;
pub mod surface;
