//! Manifest scanning for one contract.

use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::context::LoadingContext;
use crate::error::{EnumerateError, Result, SpiError};
use crate::manifest::ServiceDescriptor;
use crate::resource::{Resource, ResourceSource};

/// Logical directory manifests live under.
pub const MANIFEST_DIR: &str = "services/";
/// Enumeration attempts per source before a transient failure is surfaced.
pub const SCAN_ATTEMPTS: usize = 3;
/// Pause between enumeration attempts.
pub const SCAN_RETRY_DELAY: Duration = Duration::from_millis(2);

/// Logical manifest path for a contract name.
pub fn manifest_path(contract: &str) -> String {
	format!("{MANIFEST_DIR}{contract}")
}

/// Collects the descriptors every source lists for `contract`.
///
/// Descriptors keep source order, then resource order within a source, then
/// line order within a resource. A resource that cannot be read is logged and
/// contributes nothing; a source that stays busy for [`SCAN_ATTEMPTS`]
/// attempts fails the scan.
pub fn scan(contract: &str, ctx: &LoadingContext) -> Result<Vec<ServiceDescriptor>> {
	let path = manifest_path(contract);
	let mut descriptors = Vec::new();
	let mut resource_count = 0;

	for source in ctx.sources() {
		let resources = match enumerate(source.as_ref(), &path) {
			Ok(resources) => resources,
			Err(EnumerateError::Io(error)) => {
				warn!(source = %source.label(), %path, %error, "skipping unreadable manifest source");
				continue;
			}
			Err(error) => {
				return Err(SpiError::ResourceEnumeration {
					path,
					source_label: source.label().into_owned(),
					attempts: SCAN_ATTEMPTS,
					source: error,
				});
			}
		};

		resource_count += resources.len();
		for resource in &resources {
			match read_resource(resource) {
				Ok(found) => descriptors.extend(found),
				Err(error) => warn!(origin = resource.origin(), %error, "skipping unreadable manifest"),
			}
		}
	}

	debug!(contract, resources = resource_count, descriptors = descriptors.len(), "scanned service manifests");
	Ok(descriptors)
}

fn enumerate(source: &dyn ResourceSource, path: &str) -> std::result::Result<Vec<Resource>, EnumerateError> {
	let mut attempt = 1;
	loop {
		match source.enumerate(path) {
			Err(EnumerateError::Busy) if attempt < SCAN_ATTEMPTS => {
				warn!(source = %source.label(), path, attempt, "manifest source busy, retrying");
				thread::sleep(SCAN_RETRY_DELAY);
				attempt += 1;
			}
			other => return other,
		}
	}
}

fn read_resource(resource: &Resource) -> io::Result<Vec<ServiceDescriptor>> {
	let reader = resource.open()?;
	let mut found = Vec::new();
	for line in reader.lines() {
		if let Some(descriptor) = ServiceDescriptor::parse(&line?) {
			trace!(origin = resource.origin(), ?descriptor, "parsed service descriptor");
			found.push(descriptor);
		}
	}
	Ok(found)
}

#[cfg(test)]
mod tests;
