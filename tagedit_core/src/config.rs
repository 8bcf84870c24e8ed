use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::DataDir;
use crate::EditError;
use crate::EditResult;
use crate::PersistOptions;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["tagedit.toml", ".tagedit.toml", ".config/tagedit.toml"];

/// Data directory used when the config doesn't name one, relative to the
/// project root.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Configuration loaded from a `tagedit.toml` file.
///
/// ```toml
/// data_dir = "fixtures"
///
/// [persist]
/// poll_interval_ms = 100
/// max_attempts = 50
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct EditConfig {
	/// Directory that data files are read from, relative to the project
	/// root. Defaults to `data`.
	#[serde(default)]
	pub data_dir: Option<PathBuf>,
	/// Controls how long a session waits for a file's modification time to
	/// advance.
	#[serde(default)]
	pub persist: PersistConfig,
}

/// The `[persist]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistConfig {
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
}

impl Default for PersistConfig {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			max_attempts: default_max_attempts(),
		}
	}
}

fn default_poll_interval_ms() -> u64 {
	let defaults = PersistOptions::default();
	defaults.poll_interval.as_millis().try_into().unwrap_or(u64::MAX)
}

fn default_max_attempts() -> u32 {
	PersistOptions::default().max_attempts
}

impl EditConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none.
	pub fn load(root: &Path) -> EditResult<Option<EditConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: EditConfig =
			toml::from_str(&content).map_err(|e| EditError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");
		Ok(Some(config))
	}

	/// The data directory, resolved against `root`.
	pub fn data_dir(&self, root: &Path) -> DataDir {
		let relative = self
			.data_dir
			.as_deref()
			.unwrap_or_else(|| Path::new(DEFAULT_DATA_DIR));
		DataDir::new(root.join(relative))
	}

	pub fn persist_options(&self) -> PersistOptions {
		PersistOptions {
			poll_interval: Duration::from_millis(self.persist.poll_interval_ms),
			max_attempts: self.persist.max_attempts,
		}
	}
}
