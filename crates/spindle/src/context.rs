//! The loading context: where manifests come from and how names resolve.

use std::fmt;

use crate::config::Config;
use crate::implementation::TypeTable;
use crate::resource::{DirectorySource, EmbeddedSource, ResourceSource};

/// Ordered resource sources plus the implementation table.
///
/// Source order is discovery order: all resources of the first source come
/// before any resource of the second.
pub struct LoadingContext {
	sources: Vec<Box<dyn ResourceSource>>,
	types: TypeTable,
}

impl LoadingContext {
	/// Creates a context with no sources.
	pub fn new(types: TypeTable) -> Self {
		Self {
			sources: Vec::new(),
			types,
		}
	}

	/// Context over embedded manifests and every linked implementation.
	pub fn linked() -> Self {
		Self::new(TypeTable::linked()).with_source(EmbeddedSource::linked())
	}

	/// Builds a context from configuration.
	///
	/// Embedded manifests come first when enabled, followed by one directory
	/// source per search path root in configured order.
	pub fn from_config(config: &Config) -> Self {
		let mut ctx = Self::new(TypeTable::linked());
		if config.embedded {
			ctx.push_source(EmbeddedSource::linked());
		}
		for root in &config.search_path {
			ctx.push_source(DirectorySource::new(root));
		}
		ctx
	}

	/// Appends a source after the existing ones.
	pub fn push_source(&mut self, source: impl ResourceSource + 'static) {
		self.sources.push(Box::new(source));
	}

	/// Builder form of [`LoadingContext::push_source`].
	pub fn with_source(mut self, source: impl ResourceSource + 'static) -> Self {
		self.push_source(source);
		self
	}

	/// Sources in discovery order.
	pub fn sources(&self) -> &[Box<dyn ResourceSource>] {
		&self.sources
	}

	/// The implementation table.
	pub fn types(&self) -> &TypeTable {
		&self.types
	}
}

impl fmt::Debug for LoadingContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoadingContext")
			.field("sources", &self.sources.iter().map(|s| s.label()).collect::<Vec<_>>())
			.field("types", &self.types)
			.finish()
	}
}
