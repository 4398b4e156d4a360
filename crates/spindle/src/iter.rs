//! Lazy iteration over a contract's services.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::LoadingContext;
use crate::contract::{Contract, Service};
use crate::error::{Result, SpiError};
use crate::instantiate;
use crate::registry::RegistryEntry;

/// Forward-only, single-use sequence of services for one contract.
///
/// Each step instantiates the next descriptor, or hands back its cached
/// instance if the descriptor is persistent and already served one. The
/// position advances even when a step fails, so a caller may skip a broken
/// implementation and keep going.
pub struct ServiceIter<'a, C: Contract + ?Sized> {
	entry: Arc<RegistryEntry>,
	ctx: &'a LoadingContext,
	position: usize,
	_contract: PhantomData<fn() -> Service<C>>,
}

impl<'a, C: Contract + ?Sized> ServiceIter<'a, C> {
	/// Creates an iterator positioned at the first descriptor of `entry`.
	pub fn new(entry: Arc<RegistryEntry>, ctx: &'a LoadingContext) -> Self {
		Self {
			entry,
			ctx,
			position: 0,
			_contract: PhantomData,
		}
	}

	/// Returns true while descriptors remain.
	pub fn has_next(&self) -> bool {
		self.position < self.entry.len()
	}

	/// Yields the next service.
	///
	/// Fails with [`SpiError::ExhaustedSequence`] once every descriptor has
	/// been visited.
	pub fn try_next(&mut self) -> Result<Service<C>> {
		let Some(descriptor) = self.entry.descriptors().get(self.position) else {
			return Err(SpiError::ExhaustedSequence { contract: C::NAME });
		};
		self.position += 1;

		if descriptor.is_persistent() {
			descriptor.cached_or_init(|| instantiate::construct::<C>(descriptor, self.ctx))
		} else {
			instantiate::construct::<C>(descriptor, self.ctx)
		}
	}

	/// The entry being iterated.
	pub fn entry(&self) -> &RegistryEntry {
		&self.entry
	}
}

impl<C: Contract + ?Sized> Iterator for ServiceIter<'_, C> {
	type Item = Result<Service<C>>;

	fn next(&mut self) -> Option<Self::Item> {
		self.has_next().then(|| self.try_next())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.entry.len() - self.position;
		(remaining, Some(remaining))
	}
}

impl<C: Contract + ?Sized> ExactSizeIterator for ServiceIter<'_, C> {}

impl<C: Contract + ?Sized> FusedIterator for ServiceIter<'_, C> {}

impl<C: Contract + ?Sized> fmt::Debug for ServiceIter<'_, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceIter")
			.field("contract", &C::NAME)
			.field("position", &self.position)
			.field("len", &self.entry.len())
			.finish()
	}
}
