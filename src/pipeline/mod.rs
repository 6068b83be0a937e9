/// Serde-described single-input filters and ordered chains of them.
pub mod filter;
