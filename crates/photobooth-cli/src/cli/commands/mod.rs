//! CLI command handlers, one file per command.

mod completions;
mod config;
mod generate;
mod normalize;

pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use generate::run_generate;
pub use normalize::run_normalize;

#[cfg(test)]
pub(crate) use generate::render;
