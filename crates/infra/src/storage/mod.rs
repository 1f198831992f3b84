//! `FileAdapter` implementations.

pub mod memory;
pub mod native;

pub use memory::MemoryFileAdapter;
pub use native::NativeFileAdapter;
