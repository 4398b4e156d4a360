//! Manifest resources and the sources that enumerate them.
//!
//! A [`ResourceSource`] answers "which manifests exist at this logical path".
//! The loading context consults its sources in order, and each source
//! reports its resources in its own stable order.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::EnumerateError;

mod directory;
mod embedded;
mod memory;

pub use directory::DirectorySource;
pub use embedded::{EmbeddedManifest, EmbeddedSource};
pub use memory::MemorySource;

/// Enumerates manifest resources by logical path.
pub trait ResourceSource: Send + Sync {
	/// Short human-readable label for diagnostics.
	fn label(&self) -> Cow<'_, str>;

	/// Returns every resource this source holds at `path`, in a stable order.
	///
	/// Returns [`EnumerateError::Busy`] when the underlying index is being
	/// modified concurrently; callers may retry.
	fn enumerate(&self, path: &str) -> Result<Vec<Resource>, EnumerateError>;
}

/// One manifest resource located by a [`ResourceSource`].
#[derive(Debug, Clone)]
pub struct Resource {
	origin: String,
	body: Body,
}

#[derive(Debug, Clone)]
enum Body {
	Static(&'static str),
	Shared(Arc<str>),
	File(PathBuf),
}

impl Resource {
	/// A resource compiled into the binary.
	pub fn embedded(origin: impl Into<String>, text: &'static str) -> Self {
		Self {
			origin: origin.into(),
			body: Body::Static(text),
		}
	}

	/// A resource held in memory.
	pub fn text(origin: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
		Self {
			origin: origin.into(),
			body: Body::Shared(text.into()),
		}
	}

	/// A resource read from disk when opened.
	pub fn file(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		Self {
			origin: path.display().to_string(),
			body: Body::File(path),
		}
	}

	/// Where this resource came from.
	pub fn origin(&self) -> &str {
		&self.origin
	}

	/// Opens the resource for line-by-line reading.
	pub fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
		Ok(match &self.body {
			Body::Static(text) => Box::new(Cursor::new(text.as_bytes())),
			Body::Shared(text) => Box::new(Cursor::new(text.as_bytes())),
			Body::File(path) => Box::new(BufReader::new(File::open(path)?)),
		})
	}
}
