//! Loading-context configuration.
//!
//! Configuration is TOML:
//!
//! ```toml
//! # Directory roots searched for `services/<contract>` files, in order.
//! search_path = ["/opt/app/plugins", "./share"]
//! # Include manifests embedded at link time (default true).
//! embedded = true
//! ```
//!
//! [`Config::from_env`] reads the file named by `SPINDLE_CONFIG` (defaults if
//! unset) and appends the roots listed in `SPINDLE_PATH`, which uses the
//! platform's path-list syntax.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming a TOML configuration file.
pub const CONFIG_ENV: &str = "SPINDLE_CONFIG";
/// Environment variable listing extra search path roots.
pub const PATH_ENV: &str = "SPINDLE_PATH";

/// Loading-context settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Directory roots searched for manifests, in discovery order.
	pub search_path: Vec<PathBuf>,
	/// Whether manifests embedded at link time are consulted (before roots).
	pub embedded: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			search_path: Vec::new(),
			embedded: true,
		}
	}
}

impl Config {
	/// Parses a TOML string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input)
	}

	/// Loads configuration from `SPINDLE_CONFIG` and `SPINDLE_PATH`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_vars(std::env::var_os(CONFIG_ENV), std::env::var_os(PATH_ENV))
	}

	/// [`Config::from_env`] with the variable values supplied directly.
	pub fn from_vars(config_file: Option<OsString>, search_path: Option<OsString>) -> Result<Self, ConfigError> {
		let mut config = match config_file {
			Some(file) => Self::load(Path::new(&file))?,
			None => Self::default(),
		};
		if let Some(paths) = search_path {
			config.search_path.extend(std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
		}
		Ok(config)
	}
}
