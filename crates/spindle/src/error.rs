//! Error types for discovery, construction and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by fallible service constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by registry resolution and service iteration.
///
/// "No implementation registered" is never an error: lookups return `None` or
/// an empty list. These variants describe manifests that name something the
/// process cannot deliver.
#[derive(Debug, Error)]
pub enum SpiError {
	/// Manifest enumeration kept failing transiently until retries ran out.
	#[error("failed to enumerate {path} from {source_label} after {attempts} attempts")]
	ResourceEnumeration {
		/// Logical manifest path being enumerated.
		path: String,
		/// Label of the resource source that failed.
		source_label: String,
		/// Number of attempts made.
		attempts: usize,
		/// Last enumeration failure.
		#[source]
		source: EnumerateError,
	},

	/// A manifest names an implementation no linked type answers to.
	#[error("no implementation named `{type_name}` is linked (listed for contract `{contract}`)")]
	TypeResolution {
		/// Qualified name taken from the manifest line.
		type_name: String,
		/// Contract whose manifest listed it.
		contract: &'static str,
	},

	/// A manifest names an implementation that does not provide the contract.
	#[error("`{found}` does not implement contract `{expected}`")]
	ContractMismatch {
		/// Implementation that was found.
		found: &'static str,
		/// Contract that was requested.
		expected: &'static str,
	},

	/// The implementation's zero-argument constructor failed.
	#[error("failed to instantiate `{type_name}`")]
	Instantiation {
		/// Qualified implementation name.
		type_name: String,
		/// Underlying construction failure.
		#[source]
		source: ConstructError,
	},

	/// `try_next` was called on a drained iterator.
	#[error("service iterator for `{contract}` is exhausted")]
	ExhaustedSequence {
		/// Contract the iterator was bound to.
		contract: &'static str,
	},
}

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, SpiError>;

/// Failure while listing the manifests a source holds for a path.
#[derive(Debug, Error)]
pub enum EnumerateError {
	/// The source's resource index changed underneath the enumeration.
	///
	/// Transient; the scanner retries it.
	#[error("resource index modified during enumeration")]
	Busy,

	/// The source could not be listed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Failure raised while running an implementation's constructor.
#[derive(Debug, Error)]
pub enum ConstructError {
	/// The constructor returned an error.
	#[error("constructor returned an error: {0}")]
	Failed(#[source] BoxError),

	/// The constructor panicked.
	#[error("constructor panicked: {0}")]
	Panicked(String),

	/// The binding produced a value that is not the contract's service type.
	#[error("binding produced a value that is not an `Arc<{contract}>`")]
	Shape {
		/// Contract the value was produced for.
		contract: &'static str,
	},
}

impl ConstructError {
	/// Wraps any boxable error as a constructor failure.
	pub fn failed(error: impl Into<BoxError>) -> Self {
		Self::Failed(error.into())
	}
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}
