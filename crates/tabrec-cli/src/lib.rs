//! Library side of the `tabrec` binary: commands, rendering and logging.

pub mod commands;
pub mod logging;
pub mod render;
