//! Structs whose builders are generated by `build.rs`.

pub mod library;
pub mod shapes;
