//! Manifest-driven service discovery.
//!
//! A *contract* is a trait object type (`dyn Greeter`) named by a fully
//! qualified string. Components contribute implementations of a contract by
//! shipping a manifest at `services/<contract name>` that lists qualified
//! implementation names, one per line:
//!
//! ```text
//! sample.services.EnglishGreeter:true
//! sample.services.IrishGreeter
//! ```
//!
//! The optional `:true` suffix marks a *persistent* implementation whose first
//! instance is cached and reused for the lifetime of its registry.
//!
//! Implementation names are linked to constructors at build time: each
//! [`service_impl!`] invocation submits an [`ImplementationStatic`] via
//! `inventory`, and the [`TypeTable`] pairs manifest names with those statics.
//!
//! # Layers
//!
//! - [`manifest`] - line grammar and [`ServiceDescriptor`]
//! - [`resource`] - where manifests come from (embedded, directories, memory)
//! - [`scan`] - enumerates manifests for a contract, with bounded retry
//! - [`registry`] - per-contract descriptor lists, resolved once
//! - [`instantiate`] - name → type → contract check → construction
//! - [`iter`] - lazy sequence applying the persistent-instance cache
//! - [`locator`] - the [`ServiceLocator`] façade
//!
//! ```ignore
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//! spindle::contract!(dyn Greeter = "sample.Greeter");
//!
//! #[derive(Default)]
//! struct EnglishGreeter;
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//! spindle::service_impl!(EnglishGreeter as "sample.services.EnglishGreeter" => [dyn Greeter]);
//! spindle::embed_manifest!("sample.Greeter", "sample.services.EnglishGreeter:true");
//!
//! let greeter = spindle::ServiceLocator::global().get_one::<dyn Greeter>()?;
//! ```

pub mod config;
pub mod contract;
pub mod context;
pub mod error;
pub mod implementation;
pub mod instantiate;
pub mod iter;
pub mod locator;
pub mod manifest;
pub mod registry;
pub mod resource;
pub mod scan;

pub use config::Config;
pub use contract::{Contract, Service};
pub use context::LoadingContext;
pub use error::{ConfigError, ConstructError, EnumerateError, Result, SpiError};
pub use implementation::{AnyService, ContractBinding, ImplementationReg, ImplementationStatic, TypeTable};
pub use iter::ServiceIter;
pub use locator::ServiceLocator;
pub use manifest::ServiceDescriptor;
pub use registry::{RegistryEntry, ServiceRegistry};
pub use resource::{DirectorySource, EmbeddedManifest, EmbeddedSource, MemorySource, Resource, ResourceSource};

#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use paste;
