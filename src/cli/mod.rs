pub mod args;
pub mod commands;
pub mod render;

pub use args::{Cli, Commands, FilterArgs};
pub use commands::run;
