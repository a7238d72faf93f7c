//! Fixed-capacity FIFO ring buffer of `i32`, plus the pieces the `circbuf`
//! binary uses to drive it: a small command language, a session runner, a
//! self-check harness and TOML configuration.

pub mod check;
pub mod config;
pub mod driver;
pub mod errors;
pub mod logging;
pub mod script;
pub mod util;

pub use errors::BufferError;
pub use script::ScriptError;
pub use util::ring_buffer::RingBuffer;
