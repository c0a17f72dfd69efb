//! Adapters for the application's system ports.

mod file_picker;
mod file_system;
mod system_clock;

pub use file_picker::PresetFilePicker;
pub use file_system::DirsFileSystem;
pub use system_clock::SystemClock;
