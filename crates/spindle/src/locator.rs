//! The service lookup façade.

use std::any::Any;
use std::sync::OnceLock;

use tracing::warn;

use crate::config::Config;
use crate::context::LoadingContext;
use crate::contract::{Contract, Service};
use crate::error::Result;
use crate::iter::ServiceIter;
use crate::registry::ServiceRegistry;

static GLOBAL: OnceLock<ServiceLocator> = OnceLock::new();

/// Entry point for service lookups.
///
/// Owns a [`ServiceRegistry`] and the [`LoadingContext`] it resolves against.
/// Persistent instances live as long as the locator; the process-wide
/// locator from [`ServiceLocator::global`] keeps them for the whole process.
#[derive(Debug)]
pub struct ServiceLocator {
	registry: ServiceRegistry,
	context: LoadingContext,
}

impl ServiceLocator {
	/// Creates a locator with an empty registry.
	pub fn new(context: LoadingContext) -> Self {
		Self {
			registry: ServiceRegistry::new(),
			context,
		}
	}

	/// The process-wide locator, built from [`Config::from_env`] on first use.
	///
	/// An unreadable configuration falls back to defaults with a warning.
	pub fn global() -> &'static ServiceLocator {
		GLOBAL.get_or_init(|| {
			let config = Config::from_env().unwrap_or_else(|error| {
				warn!(%error, "invalid service configuration, using defaults");
				Config::default()
			});
			Self::new(LoadingContext::from_config(&config))
		})
	}

	/// The registry backing this locator.
	pub fn registry(&self) -> &ServiceRegistry {
		&self.registry
	}

	/// The loading context lookups resolve against.
	pub fn context(&self) -> &LoadingContext {
		&self.context
	}

	/// A fresh iterator over every service registered for `C`.
	pub fn iter<C: Contract + ?Sized>(&self) -> Result<ServiceIter<'_, C>> {
		let entry = self.registry.resolve::<C>(&self.context)?;
		Ok(ServiceIter::new(entry, &self.context))
	}

	/// The first service registered for `C`, if any.
	pub fn get_one<C: Contract + ?Sized>(&self) -> Result<Option<Service<C>>> {
		self.iter::<C>()?.next().transpose()
	}

	/// Every service registered for `C`, in discovery order.
	///
	/// The same instance never appears twice. Fails on the first descriptor
	/// that cannot be instantiated; use [`ServiceLocator::iter`] to skip
	/// broken ones instead.
	pub fn get_all<C: Contract + ?Sized>(&self) -> Result<Vec<Service<C>>> {
		let mut services: Vec<Service<C>> = Vec::new();
		for service in self.iter::<C>()? {
			let service = service?;
			if !services.iter().any(|seen| Service::ptr_eq(seen, &service)) {
				services.push(service);
			}
		}
		Ok(services)
	}

	/// The first service for `C` whose concrete type is exactly `T`.
	///
	/// Services discovered before the match are still instantiated.
	pub fn get_specific<C: Contract + ?Sized, T: Any>(&self) -> Result<Option<Service<C>>> {
		for service in self.iter::<C>()? {
			let service = service?;
			if service.is::<T>() {
				return Ok(Some(service));
			}
		}
		Ok(None)
	}
}
