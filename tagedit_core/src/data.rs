use std::path::Path;
use std::path::PathBuf;

use crate::EditError;
use crate::EditResult;

/// Loads auxiliary content, such as replacement text for an edit script.
pub trait DataReader {
	/// Read the full content of `name`.
	fn read(&self, name: &str) -> EditResult<String>;
}

/// A [`DataReader`] over the files of one directory. Content is returned
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
	root: PathBuf,
}

impl DataDir {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl DataReader for DataDir {
	fn read(&self, name: &str) -> EditResult<String> {
		let path = self.root.join(name);
		std::fs::read_to_string(&path).map_err(|e| {
			EditError::DataFile {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})
	}
}
