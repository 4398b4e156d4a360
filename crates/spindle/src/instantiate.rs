//! Turning a descriptor into a live service.

use std::any::{Any, TypeId};
use std::panic;
use std::sync::Arc;

use tracing::trace;

use crate::context::LoadingContext;
use crate::contract::{Contract, Service};
use crate::error::{ConstructError, Result, SpiError};
use crate::manifest::ServiceDescriptor;

/// Constructs a new instance of the implementation `descriptor` names, as `C`.
///
/// The name is resolved through the context's type table, the
/// implementation must declare a binding for `C`, and its zero-argument
/// constructor is invoked. A panicking constructor is reported as
/// [`SpiError::Instantiation`]. The descriptor's instance slot is untouched.
pub fn construct<C: Contract + ?Sized>(descriptor: &ServiceDescriptor, ctx: &LoadingContext) -> Result<Service<C>> {
	let type_name = descriptor.type_name();
	let implementation = ctx.types().resolve(type_name).ok_or_else(|| SpiError::TypeResolution {
		type_name: type_name.to_owned(),
		contract: C::NAME,
	})?;

	let binding = implementation
		.binding(TypeId::of::<C>())
		.ok_or(SpiError::ContractMismatch {
			found: implementation.name,
			expected: C::NAME,
		})?;

	let instantiation = |source: ConstructError| SpiError::Instantiation {
		type_name: type_name.to_owned(),
		source,
	};

	let produced = panic::catch_unwind(binding.construct)
		.map_err(|payload| ConstructError::Panicked(panic_message(payload.as_ref())))
		.and_then(|built| built)
		.map_err(instantiation)?;

	let inner = produced
		.downcast::<Arc<C>>()
		.map_err(|_| instantiation(ConstructError::Shape { contract: C::NAME }))?;

	trace!(contract = C::NAME, implementation = implementation.name, "constructed service");
	Ok(Service::new(*inner, (implementation.type_id)(), implementation.name))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&str>() {
		(*msg).to_owned()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}
