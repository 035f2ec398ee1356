mod clean;
mod executor;
mod matrix;
mod options;

pub use clean::remove_dir_if_exists;
pub use executor::Session;
pub use matrix::{Pass, plan};
pub use options::{ToolInvocation, translate};
