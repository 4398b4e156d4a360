use std::borrow::Cow;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

use super::*;
use crate::implementation::TypeTable;
use crate::resource::MemorySource;

/// Source that is busy for the first `busy_for` enumerations.
struct Flaky {
	busy_for: usize,
	calls: AtomicUsize,
	text: &'static str,
}

impl Flaky {
	fn new(busy_for: usize, text: &'static str) -> Self {
		Self {
			busy_for,
			calls: AtomicUsize::new(0),
			text,
		}
	}
}

impl ResourceSource for Flaky {
	fn label(&self) -> Cow<'_, str> {
		Cow::Borrowed("flaky")
	}

	fn enumerate(&self, _path: &str) -> std::result::Result<Vec<Resource>, EnumerateError> {
		if self.calls.fetch_add(1, Ordering::SeqCst) < self.busy_for {
			return Err(EnumerateError::Busy);
		}
		Ok(vec![Resource::embedded("flaky", self.text)])
	}
}

struct Broken;

impl ResourceSource for Broken {
	fn label(&self) -> Cow<'_, str> {
		Cow::Borrowed("broken")
	}

	fn enumerate(&self, _path: &str) -> std::result::Result<Vec<Resource>, EnumerateError> {
		Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied").into())
	}
}

fn names(descriptors: &[ServiceDescriptor]) -> Vec<&str> {
	descriptors.iter().map(|d| d.type_name()).collect()
}

#[test]
fn manifest_path_prefixes_services_dir() {
	assert_eq!(manifest_path("pkg.Contract"), "services/pkg.Contract");
}

#[test]
fn no_sources_means_no_descriptors() {
	let ctx = LoadingContext::new(TypeTable::new());
	assert!(scan("pkg.Contract", &ctx).unwrap().is_empty());
}

#[test]
fn order_is_source_then_resource_then_line() {
	let ctx = LoadingContext::new(TypeTable::new())
		.with_source(
			MemorySource::new("one")
				.with("services/pkg.C", "a1\n\na2:true")
				.with("services/pkg.C", "b1"),
		)
		.with_source(MemorySource::new("two").with("services/pkg.C", "c1\nc2"));

	let found = scan("pkg.C", &ctx).unwrap();
	assert_eq!(names(&found), vec!["a1", "a2", "b1", "c1", "c2"]);
	assert!(found[1].is_persistent());
	assert!(!found[0].is_persistent());
}

#[test]
fn busy_source_is_retried() {
	let ctx = LoadingContext::new(TypeTable::new()).with_source(Flaky::new(SCAN_ATTEMPTS - 1, "pkg.A"));
	let found = scan("pkg.C", &ctx).unwrap();
	assert_eq!(names(&found), vec!["pkg.A"]);
}

#[test]
fn exhausted_retries_surface_enumeration_error() {
	let ctx = LoadingContext::new(TypeTable::new()).with_source(Flaky::new(SCAN_ATTEMPTS, "pkg.A"));
	match scan("pkg.C", &ctx) {
		Err(SpiError::ResourceEnumeration {
			path,
			source_label,
			attempts,
			source: EnumerateError::Busy,
		}) => {
			assert_eq!(path, "services/pkg.C");
			assert_eq!(source_label, "flaky");
			assert_eq!(attempts, SCAN_ATTEMPTS);
		}
		other => panic!("expected ResourceEnumeration, got {other:?}"),
	}
}

#[test]
fn unreadable_source_is_skipped() {
	let ctx = LoadingContext::new(TypeTable::new())
		.with_source(Broken)
		.with_source(MemorySource::new("ok").with("services/pkg.C", "pkg.A"));
	assert_eq!(names(&scan("pkg.C", &ctx).unwrap()), vec!["pkg.A"]);
}

#[test]
fn unreadable_resource_contributes_nothing() {
	let dir = tempfile::tempdir().unwrap();
	let services = dir.path().join("services");
	std::fs::create_dir_all(&services).unwrap();
	// Invalid UTF-8 after a valid first line: the whole resource is dropped.
	std::fs::write(services.join("pkg.C"), b"pkg.Partial\n\xff\xfe\n").unwrap();

	let ctx = LoadingContext::new(TypeTable::new())
		.with_source(crate::resource::DirectorySource::new(dir.path()))
		.with_source(MemorySource::new("ok").with("services/pkg.C", "pkg.A"));

	assert_eq!(names(&scan("pkg.C", &ctx).unwrap()), vec!["pkg.A"]);
}
