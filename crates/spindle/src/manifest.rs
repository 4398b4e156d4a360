//! Manifest line grammar and service descriptors.
//!
//! A manifest is UTF-8 text with one descriptor per line:
//!
//! ```text
//! <qualifiedTypeName>[:<persistent>]
//! ```
//!
//! Blank lines are skipped. The persistence flag is `true` only when the
//! second field reads `true` (any case); anything else, or no field, means a
//! fresh instance per lookup. There is no comment syntax and no escaping.

use std::any::Any;
use std::fmt;

use parking_lot::Mutex;

use crate::contract::{Contract, Service};
use crate::error::Result;

/// Field delimiter within a manifest line.
pub const FIELD_DELIMITER: char = ':';

/// One manifest line: an implementation name plus its persistence flag.
///
/// Persistent descriptors own a one-shot slot holding the instance they
/// served first.
pub struct ServiceDescriptor {
	type_name: String,
	persistent: bool,
	instance: Mutex<Option<Box<dyn Any + Send + Sync>>>,
}

impl ServiceDescriptor {
	/// Creates a descriptor with an empty instance slot.
	pub fn new(type_name: impl Into<String>, persistent: bool) -> Self {
		Self {
			type_name: type_name.into(),
			persistent,
			instance: Mutex::new(None),
		}
	}

	/// Parses one manifest line. Returns `None` for blank lines.
	pub fn parse(line: &str) -> Option<Self> {
		if line.trim().is_empty() {
			return None;
		}

		let mut fields = line.splitn(3, FIELD_DELIMITER);
		let type_name = fields.next()?.trim();
		let persistent = fields
			.next()
			.is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"));

		Some(Self::new(type_name, persistent))
	}

	/// Qualified implementation name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Whether the first instance is cached and reused.
	pub fn is_persistent(&self) -> bool {
		self.persistent
	}

	/// Whether a persistent instance has been cached.
	pub fn is_cached(&self) -> bool {
		self.instance.lock().is_some()
	}

	/// Returns the cached instance, constructing and caching it first if needed.
	///
	/// The slot stays locked across `init`, so concurrent first lookups build
	/// exactly one instance. A failed `init` leaves the slot empty.
	///
	/// `init` must not look up this same descriptor again; that deadlocks.
	pub(crate) fn cached_or_init<C: Contract + ?Sized>(
		&self,
		init: impl FnOnce() -> Result<Service<C>>,
	) -> Result<Service<C>> {
		let mut slot = self.instance.lock();
		if let Some(service) = slot.as_ref().and_then(|any| any.downcast_ref::<Service<C>>()) {
			return Ok(service.clone());
		}

		let service = init()?;
		*slot = Some(Box::new(service.clone()));
		Ok(service)
	}
}

impl fmt::Debug for ServiceDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceDescriptor")
			.field("type_name", &self.type_name)
			.field("persistent", &self.persistent)
			.field("cached", &self.is_cached())
			.finish()
	}
}

#[cfg(test)]
mod tests;
