//! Contracts and the service handles returned for them.

use std::any::{Any, TypeId};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// An abstract capability services are discovered by.
///
/// Implemented for trait object types, usually through [`contract!`]:
///
/// ```ignore
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
/// spindle::contract!(dyn Greeter = "sample.Greeter");
/// ```
///
/// The contract's `TypeId` is the registry key; [`Contract::NAME`] only
/// locates manifests.
pub trait Contract: Send + Sync + 'static {
	/// Fully qualified name; manifests live at `services/<NAME>`.
	const NAME: &'static str;
}

/// Declares a trait object type as a discoverable [`Contract`].
#[macro_export]
macro_rules! contract {
	($contract:ty = $name:literal) => {
		impl $crate::Contract for $contract {
			const NAME: &'static str = $name;
		}
	};
}

/// A discovered service instance.
///
/// Derefs to the contract. Clones share the underlying instance; use
/// [`Service::ptr_eq`] for identity.
pub struct Service<C: Contract + ?Sized> {
	inner: Arc<C>,
	concrete: TypeId,
	implementation: &'static str,
}

impl<C: Contract + ?Sized> Service<C> {
	pub(crate) fn new(inner: Arc<C>, concrete: TypeId, implementation: &'static str) -> Self {
		Self {
			inner,
			concrete,
			implementation,
		}
	}

	/// Returns true if both handles point at the same instance.
	pub fn ptr_eq(this: &Self, other: &Self) -> bool {
		Arc::ptr_eq(&this.inner, &other.inner)
	}

	/// Returns true if the concrete type behind this service is exactly `T`.
	pub fn is<T: Any>(&self) -> bool {
		self.concrete == TypeId::of::<T>()
	}

	/// `TypeId` of the concrete implementation.
	pub fn concrete_type_id(&self) -> TypeId {
		self.concrete
	}

	/// Qualified implementation name this instance was built from.
	pub fn implementation(&self) -> &'static str {
		self.implementation
	}

	/// Borrows the shared instance.
	pub fn as_arc(&self) -> &Arc<C> {
		&self.inner
	}

	/// Unwraps into the shared instance.
	pub fn into_arc(self) -> Arc<C> {
		self.inner
	}
}

impl<C: Contract + ?Sized> Clone for Service<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
			concrete: self.concrete,
			implementation: self.implementation,
		}
	}
}

impl<C: Contract + ?Sized> Deref for Service<C> {
	type Target = C;

	fn deref(&self) -> &C {
		&self.inner
	}
}

impl<C: Contract + ?Sized> fmt::Debug for Service<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Service")
			.field("contract", &C::NAME)
			.field("implementation", &self.implementation)
			.field("instance", &Arc::as_ptr(&self.inner).cast::<()>())
			.finish()
	}
}
