/// Lighting module - light records and their upload into storage blocks

pub mod light;
pub mod light_uploader;

pub use light::*;
pub use light_uploader::*;
