//! Implementation static registration via `inventory`.
//!
//! Each [`service_impl!`](crate::service_impl) invocation creates an
//! [`ImplementationStatic`] and submits it via `inventory::submit!`. The
//! [`TypeTable`] collects all submitted implementations and answers the
//! "resolve a type by qualified name" half of the loading context.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::error::ConstructError;

/// A freshly constructed service, boxed as `Arc<C>` for its contract `C`.
pub type AnyService = Box<dyn Any + Send + Sync>;

/// One contract an implementation provides, with its constructor.
pub struct ContractBinding {
	/// `TypeId` of the contract type.
	pub contract: fn() -> TypeId,
	/// Contract name, for diagnostics.
	pub contract_name: &'static str,
	/// Zero-argument constructor producing a boxed `Arc<Contract>`.
	pub construct: fn() -> Result<AnyService, ConstructError>,
}

/// Static implementation entry collected via `inventory`.
pub struct ImplementationStatic {
	/// Qualified name manifests refer to.
	pub name: &'static str,
	/// Crate that defined this implementation.
	pub crate_name: &'static str,
	/// `TypeId` of the concrete type.
	pub type_id: fn() -> TypeId,
	/// Rust type name of the concrete type.
	pub type_name: fn() -> &'static str,
	/// Contracts this implementation can be constructed as.
	pub bindings: &'static [ContractBinding],
}

impl ImplementationStatic {
	/// Returns the binding for the contract with the given `TypeId`.
	pub fn binding(&self, contract: TypeId) -> Option<&'static ContractBinding> {
		self.bindings.iter().find(|b| (b.contract)() == contract)
	}

	/// Names of every contract this implementation provides.
	pub fn contract_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.bindings.iter().map(|b| b.contract_name)
	}
}

impl fmt::Debug for ImplementationStatic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ImplementationStatic")
			.field("name", &self.name)
			.field("crate_name", &self.crate_name)
			.field("type_name", &(self.type_name)())
			.field("contracts", &self.contract_names().collect::<Vec<_>>())
			.finish()
	}
}

/// Wrapper for `inventory::collect!`.
pub struct ImplementationReg(pub &'static ImplementationStatic);

inventory::collect!(ImplementationReg);

/// Registers a concrete type as an implementation of one or more contracts.
///
/// The type is constructed with `Default::default()` unless a `with`
/// constructor returning `Result<Self, E>` is given.
///
/// ```ignore
/// service_impl!(EnglishGreeter as "sample.services.EnglishGreeter" => [dyn Greeter]);
/// service_impl!(Database as "sample.services.Database" => [dyn Store, dyn Health], with Database::open);
/// ```
#[macro_export]
macro_rules! service_impl {
	(@make $ty:ident) => {
		::std::result::Result::<$ty, $crate::ConstructError>::Ok(<$ty as ::std::default::Default>::default())
	};
	(@make $ty:ident, $ctor:path) => {
		$ctor().map_err($crate::ConstructError::failed)
	};
	($ty:ident as $name:literal => [$($contract:ty),+ $(,)?] $(, with $ctor:path)? $(,)?) => {
		$crate::paste::paste! {
			fn [<__spindle_make_ $ty:snake>]() -> ::std::result::Result<$ty, $crate::ConstructError> {
				$crate::service_impl!(@make $ty $(, $ctor)?)
			}

			#[allow(non_upper_case_globals)]
			pub(crate) static [<SERVICE_IMPL_ $ty>]: $crate::ImplementationStatic = $crate::ImplementationStatic {
				name: $name,
				crate_name: env!("CARGO_PKG_NAME"),
				type_id: ::std::any::TypeId::of::<$ty>,
				type_name: ::std::any::type_name::<$ty>,
				bindings: &[$(
					$crate::ContractBinding {
						contract: ::std::any::TypeId::of::<$contract>,
						contract_name: <$contract as $crate::Contract>::NAME,
						construct: {
							fn construct() -> ::std::result::Result<$crate::AnyService, $crate::ConstructError> {
								let service: ::std::sync::Arc<$contract> = ::std::sync::Arc::new([<__spindle_make_ $ty:snake>]()?);
								::std::result::Result::Ok(::std::boxed::Box::new(service))
							}
							construct
						},
					}
				),+],
			};

			$crate::inventory::submit!($crate::ImplementationReg(&[<SERVICE_IMPL_ $ty>]));
		}
	};
}

/// Name-keyed table of linked implementations.
#[derive(Clone, Default)]
pub struct TypeTable {
	by_name: HashMap<&'static str, &'static ImplementationStatic>,
}

impl TypeTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from every implementation submitted via `inventory`.
	///
	/// Panics if two implementations claim the same qualified name.
	pub fn linked() -> Self {
		let mut table = Self::new();
		for reg in inventory::iter::<ImplementationReg> {
			let imp = reg.0;
			if let Some(prev) = table.insert(imp) {
				panic!(
					"duplicate static registration for '{}' (crates {} and {})",
					imp.name, prev.crate_name, imp.crate_name
				);
			}
		}
		tracing::debug!(implementations = table.len(), "linked implementation table");
		table
	}

	/// Adds one implementation, returning any entry it replaced.
	pub fn insert(&mut self, imp: &'static ImplementationStatic) -> Option<&'static ImplementationStatic> {
		self.by_name.insert(imp.name, imp)
	}

	/// Builder form of [`TypeTable::insert`].
	pub fn with(mut self, imp: &'static ImplementationStatic) -> Self {
		self.insert(imp);
		self
	}

	/// Resolves a qualified implementation name.
	pub fn resolve(&self, name: &str) -> Option<&'static ImplementationStatic> {
		self.by_name.get(name).copied()
	}

	/// Number of implementations in the table.
	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	/// Returns true if the table holds no implementations.
	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}
}

impl fmt::Debug for TypeTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<_> = self.by_name.keys().collect();
		names.sort();
		f.debug_struct("TypeTable").field("implementations", &names).finish()
	}
}
