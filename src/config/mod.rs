//! Configuration module for the plan viewer.
//!
//! This module handles loading viewer settings from `planview.yaml`, the
//! environment and a `.env` file.

mod parser;
mod spec;

pub use parser::{find_config_file, ConfigParser, CONFIG_FILE_NAME};
pub use spec::ViewConfig;
