//! Tracing subscriber setup shared by the pulse binaries

mod subscriber;

pub use subscriber::{init_tracing, init_tracing_with_writer};
