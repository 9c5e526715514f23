//! Port implementations for the messenger runtime.

pub mod console;

pub use console::ConsoleSink;
