//! Per-contract descriptor lists, resolved at most once.

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::context::LoadingContext;
use crate::contract::Contract;
use crate::error::Result;
use crate::manifest::ServiceDescriptor;
use crate::scan;

/// The resolved, discovery-ordered descriptors for one contract.
///
/// Length and order never change once installed; persistent descriptors may
/// still fill their instance slots.
#[derive(Debug)]
pub struct RegistryEntry {
	contract: &'static str,
	descriptors: Vec<ServiceDescriptor>,
}

impl RegistryEntry {
	pub(crate) fn new(contract: &'static str, descriptors: Vec<ServiceDescriptor>) -> Self {
		Self { contract, descriptors }
	}

	/// Contract name this entry was resolved for.
	pub fn contract(&self) -> &'static str {
		self.contract
	}

	/// Descriptors in discovery order.
	pub fn descriptors(&self) -> &[ServiceDescriptor] {
		&self.descriptors
	}

	/// Number of descriptors.
	pub fn len(&self) -> usize {
		self.descriptors.len()
	}

	/// Returns true if no manifest listed an implementation.
	pub fn is_empty(&self) -> bool {
		self.descriptors.is_empty()
	}
}

/// Maps contracts to their resolved entries.
///
/// Entries are added lazily and never replaced, so every persistent instance
/// is reachable from exactly one entry.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
	entries: RwLock<HashMap<TypeId, Arc<RegistryEntry>>>,
}

impl ServiceRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the entry for `C`, scanning manifests on first use.
	///
	/// The scan runs without holding the lock. When two threads race on the
	/// same contract, the first to install wins and the other adopts its entry.
	/// A failed scan installs nothing, so a later call scans again.
	pub fn resolve<C: Contract + ?Sized>(&self, ctx: &LoadingContext) -> Result<Arc<RegistryEntry>> {
		let key = TypeId::of::<C>();
		if let Some(entry) = self.entries.read().get(&key) {
			return Ok(Arc::clone(entry));
		}

		debug!(contract = C::NAME, "resolving service manifests");
		let descriptors = scan::scan(C::NAME, ctx)?;

		match self.entries.write().entry(key) {
			Entry::Occupied(existing) => {
				debug!(contract = C::NAME, "adopting concurrently resolved entry");
				Ok(Arc::clone(existing.get()))
			}
			Entry::Vacant(slot) => Ok(Arc::clone(slot.insert(Arc::new(RegistryEntry::new(C::NAME, descriptors))))),
		}
	}

	/// Returns the entry for `C` if it has already been resolved.
	pub fn get<C: Contract + ?Sized>(&self) -> Option<Arc<RegistryEntry>> {
		self.entries.read().get(&TypeId::of::<C>()).cloned()
	}

	/// Names of every resolved contract, sorted.
	pub fn contracts(&self) -> Vec<&'static str> {
		let mut names: Vec<_> = self.entries.read().values().map(|e| e.contract()).collect();
		names.sort_unstable();
		names
	}

	/// Number of resolved contracts.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns true if no contract has been resolved.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

#[cfg(test)]
mod tests;
