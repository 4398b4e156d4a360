use std::any::TypeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::error::{ConstructError, SpiError};

#[test]
fn blank_lines_are_skipped() {
	assert!(ServiceDescriptor::parse("").is_none());
	assert!(ServiceDescriptor::parse("   ").is_none());
	assert!(ServiceDescriptor::parse("\t\r").is_none());
}

#[test]
fn name_only_is_not_persistent() {
	let d = ServiceDescriptor::parse("pkg.ServiceA").unwrap();
	assert_eq!(d.type_name(), "pkg.ServiceA");
	assert!(!d.is_persistent());
}

#[test]
fn persistence_flag_is_case_insensitive() {
	for line in ["pkg.A:true", "pkg.A:TRUE", "pkg.A:True", "pkg.A: true "] {
		let d = ServiceDescriptor::parse(line).unwrap();
		assert_eq!(d.type_name(), "pkg.A", "{line}");
		assert!(d.is_persistent(), "{line}");
	}
}

#[test]
fn unknown_flag_text_means_not_persistent() {
	for line in ["pkg.A:false", "pkg.A:yes", "pkg.A:1", "pkg.A:"] {
		assert!(!ServiceDescriptor::parse(line).unwrap().is_persistent(), "{line}");
	}
}

#[test]
fn fields_past_the_second_are_ignored() {
	let d = ServiceDescriptor::parse("pkg.A:true:extra").unwrap();
	assert_eq!(d.type_name(), "pkg.A");
	assert!(d.is_persistent());
}

#[test]
fn carriage_returns_are_trimmed() {
	let d = ServiceDescriptor::parse("pkg.A:true\r").unwrap();
	assert_eq!(d.type_name(), "pkg.A");
	assert!(d.is_persistent());
}

#[test]
fn type_name_is_not_validated_at_parse_time() {
	let d = ServiceDescriptor::parse("not a type!").unwrap();
	assert_eq!(d.type_name(), "not a type!");
}

trait Probe: Send + Sync {}
crate::contract!(dyn Probe = "test.manifest.Probe");

struct ProbeImpl;
impl Probe for ProbeImpl {}

fn probe() -> Service<dyn Probe> {
	let inner: Arc<dyn Probe> = Arc::new(ProbeImpl);
	Service::new(inner, TypeId::of::<ProbeImpl>(), "test.ProbeImpl")
}

#[test]
fn cache_slot_builds_once() {
	let d = ServiceDescriptor::new("test.ProbeImpl", true);
	let calls = AtomicUsize::new(0);
	let init = || {
		calls.fetch_add(1, Ordering::SeqCst);
		Ok(probe())
	};

	let a = d.cached_or_init::<dyn Probe>(init).unwrap();
	let b = d.cached_or_init::<dyn Probe>(init).unwrap();

	assert!(Service::ptr_eq(&a, &b));
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert!(d.is_cached());
}

#[test]
fn failed_init_leaves_slot_empty() {
	let d = ServiceDescriptor::new("test.ProbeImpl", true);
	let err = d
		.cached_or_init::<dyn Probe>(|| {
			Err(SpiError::Instantiation {
				type_name: "test.ProbeImpl".into(),
				source: ConstructError::failed("boom"),
			})
		})
		.unwrap_err();
	assert!(matches!(err, SpiError::Instantiation { .. }));
	assert!(!d.is_cached());

	let ok = d.cached_or_init::<dyn Probe>(|| Ok(probe())).unwrap();
	assert_eq!(ok.implementation(), "test.ProbeImpl");
	assert!(d.is_cached());
}

#[test]
fn debug_output_names_fields() {
	let d = ServiceDescriptor::new("pkg.A", false);
	let text = format!("{d:?}");
	assert!(text.contains("pkg.A"));
	assert!(text.contains("cached: false"));
}
