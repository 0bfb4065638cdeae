//! Environment variable helpers.

mod env;

pub use env::{env_flag, env_var};
