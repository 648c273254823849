// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the CLI, logging and stdio to `App`.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod console;
pub mod error;
pub mod records;
pub mod scoring;
pub mod session;
pub mod ui;
pub mod util;
pub mod word_list;

pub use error::{Error, Result};
