pub mod args;
pub mod tracing;
