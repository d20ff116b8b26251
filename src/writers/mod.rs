//! Sink implementations
//!
//! Any `std::io::Write + Send` value can be a sink; these cover the common
//! in-memory and file cases.

pub mod memory;

#[cfg(feature = "file")]
pub mod file;

pub use memory::SharedBuffer;

#[cfg(feature = "file")]
pub use file::FileWriter;
