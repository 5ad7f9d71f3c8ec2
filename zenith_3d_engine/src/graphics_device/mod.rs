/// Graphics device module - driver boundary, handles and reflection types

// Module declarations
pub mod graphics_device;
pub mod handle;
pub mod types;
pub mod uniform_value;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use handle::*;
pub use types::*;
pub use uniform_value::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
