use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use super::{Resource, ResourceSource};
use crate::error::EnumerateError;

/// Manifests stored as files under a directory root.
///
/// The manifest for `services/pkg.Contract` is `<root>/services/pkg.Contract`.
/// A missing file means the root contributes nothing.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	root: PathBuf,
}

impl DirectorySource {
	/// Creates a source rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// The directory root.
	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl ResourceSource for DirectorySource {
	fn label(&self) -> Cow<'_, str> {
		Cow::Owned(format!("dir:{}", self.root.display()))
	}

	fn enumerate(&self, path: &str) -> Result<Vec<Resource>, EnumerateError> {
		let candidate = self.root.join(path);
		match candidate.metadata() {
			Ok(meta) if meta.is_file() => Ok(vec![Resource::file(candidate)]),
			Ok(_) => Ok(Vec::new()),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
			Err(e) => Err(e.into()),
		}
	}
}
