//! Manifests compiled into the binary.
//!
//! Each [`embed_manifest!`](crate::embed_manifest) invocation submits an
//! [`EmbeddedManifest`] via `inventory`. Link order is not meaningful, so the
//! source sorts by crate, file and line to keep discovery order stable.

use std::borrow::Cow;

use super::{Resource, ResourceSource};
use crate::error::EnumerateError;
use crate::scan::manifest_path;

/// Static manifest entry collected via `inventory`.
#[derive(Debug)]
pub struct EmbeddedManifest {
	/// Contract name the manifest lists implementations for.
	pub contract: &'static str,
	/// Crate that embedded the manifest.
	pub crate_name: &'static str,
	/// Source file of the declaration.
	pub file: &'static str,
	/// Source line of the declaration.
	pub line: u32,
	/// Manifest text.
	pub text: &'static str,
}

inventory::collect!(EmbeddedManifest);

/// Embeds a manifest for a contract into the binary.
///
/// ```ignore
/// embed_manifest!("sample.Greeter", include_str!("../services/sample.Greeter"));
/// ```
#[macro_export]
macro_rules! embed_manifest {
	($contract:expr, $text:expr $(,)?) => {
		$crate::inventory::submit!($crate::EmbeddedManifest {
			contract: $contract,
			crate_name: env!("CARGO_PKG_NAME"),
			file: file!(),
			line: line!(),
			text: $text,
		});
	};
}

/// Source over manifests embedded with [`embed_manifest!`](crate::embed_manifest).
#[derive(Debug, Clone)]
pub struct EmbeddedSource {
	manifests: Vec<&'static EmbeddedManifest>,
}

impl EmbeddedSource {
	/// Collects every embedded manifest linked into the binary.
	pub fn linked() -> Self {
		Self::from_manifests(inventory::iter::<EmbeddedManifest>)
	}

	/// Builds a source over an explicit set of manifests.
	pub fn from_manifests(manifests: impl IntoIterator<Item = &'static EmbeddedManifest>) -> Self {
		let mut manifests: Vec<_> = manifests.into_iter().collect();
		manifests.sort_by(|a, b| {
			a.crate_name
				.cmp(b.crate_name)
				.then_with(|| a.file.cmp(b.file))
				.then_with(|| a.line.cmp(&b.line))
		});
		Self { manifests }
	}

	/// Number of embedded manifests across all contracts.
	pub fn len(&self) -> usize {
		self.manifests.len()
	}

	/// Returns true if nothing was embedded.
	pub fn is_empty(&self) -> bool {
		self.manifests.is_empty()
	}
}

impl ResourceSource for EmbeddedSource {
	fn label(&self) -> Cow<'_, str> {
		Cow::Borrowed("embedded")
	}

	fn enumerate(&self, path: &str) -> Result<Vec<Resource>, EnumerateError> {
		Ok(self
			.manifests
			.iter()
			.filter(|m| manifest_path(m.contract) == path)
			.map(|m| Resource::embedded(format!("embedded:{}@{}:{}", m.crate_name, m.file, m.line), m.text))
			.collect())
	}
}
