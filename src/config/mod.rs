//! CLI configuration.
//! Types, the config file location, and XML loading/template creation.
//! The library primitives never read configuration; only the binary does.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config, load_config_from_path, parse_config};
