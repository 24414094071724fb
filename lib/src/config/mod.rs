//! Configuration module.

mod print_config;

pub use print_config::{ConfigFile, PrintConfig};
