use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Resource, ResourceSource};
use crate::error::EnumerateError;

/// Runtime-populated manifests.
///
/// Writers take the index lock exclusively; an enumeration that finds the lock
/// held reports [`EnumerateError::Busy`] rather than waiting, so the scanner's
/// bounded retry applies.
#[derive(Debug, Default)]
pub struct MemorySource {
	label: String,
	pub(super) entries: RwLock<Vec<(String, Arc<str>)>>,
}

impl MemorySource {
	/// Creates an empty source with a diagnostic label.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			entries: RwLock::new(Vec::new()),
		}
	}

	/// Adds a manifest at a logical path (for example `services/pkg.Contract`).
	///
	/// Several manifests may share a path; they enumerate in insertion order.
	pub fn insert(&self, path: impl Into<String>, text: impl Into<Arc<str>>) {
		self.entries.write().push((path.into(), text.into()));
	}

	/// Builder form of [`MemorySource::insert`].
	pub fn with(self, path: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
		self.insert(path, text);
		self
	}
}

impl ResourceSource for MemorySource {
	fn label(&self) -> Cow<'_, str> {
		Cow::Owned(format!("memory:{}", self.label))
	}

	fn enumerate(&self, path: &str) -> Result<Vec<Resource>, EnumerateError> {
		let entries = self.entries.try_read().ok_or(EnumerateError::Busy)?;
		Ok(entries
			.iter()
			.enumerate()
			.filter(|(_, (p, _))| p == path)
			.map(|(idx, (p, text))| Resource::text(format!("memory:{}/{}#{}", self.label, p, idx), Arc::clone(text)))
			.collect())
	}
}
