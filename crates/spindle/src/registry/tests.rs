use std::borrow::Cow;
use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use super::*;
use crate::error::{EnumerateError, SpiError};
use crate::implementation::TypeTable;
use crate::resource::{MemorySource, Resource, ResourceSource};

trait Alpha: Send + Sync {}
crate::contract!(dyn Alpha = "test.registry.Alpha");

trait Beta: Send + Sync {}
crate::contract!(dyn Beta = "test.registry.Beta");

/// Counts enumerations and sleeps to widen race windows.
struct Counting {
	calls: &'static AtomicUsize,
	delay: Duration,
}

impl ResourceSource for Counting {
	fn label(&self) -> Cow<'_, str> {
		Cow::Borrowed("counting")
	}

	fn enumerate(&self, path: &str) -> std::result::Result<Vec<Resource>, EnumerateError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		thread::sleep(self.delay);
		Ok(vec![Resource::text("counting", format!("{path}.Impl:true"))])
	}
}

struct AlwaysBusy;

impl ResourceSource for AlwaysBusy {
	fn label(&self) -> Cow<'_, str> {
		Cow::Borrowed("busy")
	}

	fn enumerate(&self, _path: &str) -> std::result::Result<Vec<Resource>, EnumerateError> {
		Err(EnumerateError::Busy)
	}
}

#[test]
fn resolve_scans_once_per_contract() {
	static CALLS: AtomicUsize = AtomicUsize::new(0);
	let counting = Counting {
		calls: &CALLS,
		delay: Duration::ZERO,
	};
	let ctx = LoadingContext::new(TypeTable::new()).with_source(counting);
	let registry = ServiceRegistry::new();

	let first = registry.resolve::<dyn Alpha>(&ctx).unwrap();
	let second = registry.resolve::<dyn Alpha>(&ctx).unwrap();
	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(CALLS.load(Ordering::SeqCst), 1);
	assert_eq!(first.contract(), "test.registry.Alpha");
	assert_eq!(first.len(), 1);
	assert_eq!(first.descriptors()[0].type_name(), "services/test.registry.Alpha.Impl");

	registry.resolve::<dyn Beta>(&ctx).unwrap();
	assert_eq!(CALLS.load(Ordering::SeqCst), 2);
	assert_eq!(registry.len(), 2);
	assert_eq!(registry.contracts(), vec!["test.registry.Alpha", "test.registry.Beta"]);
}

#[test]
fn get_does_not_scan() {
	let ctx = LoadingContext::new(TypeTable::new()).with_source(MemorySource::new("m").with("services/test.registry.Alpha", "x"));
	let registry = ServiceRegistry::new();
	assert!(registry.get::<dyn Alpha>().is_none());
	assert!(registry.is_empty());

	let resolved = registry.resolve::<dyn Alpha>(&ctx).unwrap();
	assert!(Arc::ptr_eq(&registry.get::<dyn Alpha>().unwrap(), &resolved));
}

#[test]
fn contract_without_manifests_resolves_empty() {
	let ctx = LoadingContext::new(TypeTable::new());
	let registry = ServiceRegistry::new();
	let entry = registry.resolve::<dyn Beta>(&ctx).unwrap();
	assert!(entry.is_empty());
}

#[test]
fn failed_scan_installs_nothing() {
	let ctx = LoadingContext::new(TypeTable::new()).with_source(AlwaysBusy);
	let registry = ServiceRegistry::new();
	let err = registry.resolve::<dyn Alpha>(&ctx).unwrap_err();
	assert!(matches!(err, SpiError::ResourceEnumeration { .. }));
	assert!(registry.get::<dyn Alpha>().is_none());
}

#[test]
fn racing_first_lookups_share_one_entry() {
	const THREADS: usize = 8;
	static CALLS: AtomicUsize = AtomicUsize::new(0);

	let counting = Counting {
		calls: &CALLS,
		delay: Duration::from_millis(20),
	};
	let ctx = LoadingContext::new(TypeTable::new()).with_source(counting);
	let registry = ServiceRegistry::new();
	let barrier = Barrier::new(THREADS);

	let entries: Vec<Arc<RegistryEntry>> = thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				s.spawn(|| {
					barrier.wait();
					registry.resolve::<dyn Alpha>(&ctx).unwrap()
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	let installed = registry.get::<dyn Alpha>().unwrap();
	for entry in &entries {
		assert!(Arc::ptr_eq(entry, &installed));
	}
	assert_eq!(registry.len(), 1);
	assert!(CALLS.load(Ordering::SeqCst) >= 1);
}
