pub mod buffer;
pub mod codec;
