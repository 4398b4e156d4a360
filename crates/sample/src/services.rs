//! Demo contracts and the implementations bundled with the sample.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers with a self-description.
pub trait DemoService: Send + Sync {
	fn tell_me_who_you_are(&self) -> String;
}
spindle::contract!(dyn DemoService = "sample.framework.DemoService");

/// One contract, several interchangeable implementations.
pub trait InheritService: Send + Sync {
	fn show_identity(&self) -> String;
}
spindle::contract!(dyn InheritService = "sample.framework.InheritService");

spindle::embed_manifest!(
	"sample.framework.DemoService",
	include_str!("../services/sample.framework.DemoService")
);
spindle::embed_manifest!(
	"sample.framework.InheritService",
	include_str!("../services/sample.framework.InheritService")
);

static CREATED: AtomicUsize = AtomicUsize::new(0);

fn next_serial() -> usize {
	CREATED.fetch_add(1, Ordering::Relaxed) + 1
}

/// Persistent greeter.
pub struct HelloService {
	serial: usize,
}

impl Default for HelloService {
	fn default() -> Self {
		Self { serial: next_serial() }
	}
}

impl DemoService for HelloService {
	fn tell_me_who_you_are(&self) -> String {
		format!("hello from HelloService #{}", self.serial)
	}
}
spindle::service_impl!(HelloService as "sample.services.HelloService" => [dyn DemoService]);

/// Persistent variant of [`InheritService`].
pub struct InheritServiceA {
	serial: usize,
}

impl Default for InheritServiceA {
	fn default() -> Self {
		Self { serial: next_serial() }
	}
}

impl InheritService for InheritServiceA {
	fn show_identity(&self) -> String {
		format!("I am InheritServiceA #{}", self.serial)
	}
}
spindle::service_impl!(InheritServiceA as "sample.services.InheritServiceA" => [dyn InheritService]);

/// Transient variant of [`InheritService`]; a new one per lookup.
pub struct InheritServiceB {
	serial: usize,
}

impl Default for InheritServiceB {
	fn default() -> Self {
		Self { serial: next_serial() }
	}
}

impl InheritService for InheritServiceB {
	fn show_identity(&self) -> String {
		format!("I am InheritServiceB #{}", self.serial)
	}
}
spindle::service_impl!(InheritServiceB as "sample.services.InheritServiceB" => [dyn InheritService]);
