//! A small dependency injection resolver.
//!
//! A module registers provider functions, each producing one value from the values it requires.
//! Injection then happens in four steps:
//! 1. [ProviderRegistry] - maps produced types to providers, and providers to their required types
//! 2. [DependencyGraph] - links providers to the providers they depend on, rejecting cycles
//! 3. Construction - depth first, dependencies before dependents, every value built once per pass
//! 4. Binding - values are assigned into the injectable fields of an [InjectionTarget]
//!
//! All state lives in a [Session]. [inject] and [inject_app] run a single pass and discard it.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use manual_di::{InjectionPoints, InjectionTarget, InjectorModule, ProviderRegistry, RegistryError};
//!
//! #[derive(Default)]
//! struct TextModule;
//! impl TextModule {
//!     fn provide_text(&self) -> String {
//!         "hello".to_string()
//!     }
//!     fn provide_length(&self, text: Arc<String>) -> usize {
//!         text.len()
//!     }
//! }
//! impl InjectorModule for TextModule {
//!     fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
//!         registry
//!             .provide("provide_text", Self::provide_text)?
//!             .provide("provide_length", Self::provide_length)?;
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Screen {
//!     length: Option<Arc<usize>>,
//! }
//! impl InjectionTarget for Screen {
//!     fn injection_points(points: &mut InjectionPoints<Self>) {
//!         points.field("length", |screen: &mut Self, length: Arc<usize>| screen.length = Some(length));
//!     }
//! }
//!
//! let mut screen = Screen::default();
//! manual_di::inject::<TextModule, _>(&mut screen).unwrap();
//! assert_eq!(screen.length.as_deref(), Some(&5));
//! ```

pub mod binder;
pub mod cache;
pub mod container;
pub mod dependency_graph;
pub mod errors;
mod initiator;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod types;

pub use binder::{InjectionPoint, InjectionPoints, InjectionTarget};
pub use cache::InstanceCache;
pub use container::DiContainer;
pub use dependency_graph::{DependencyGraph, DependencyGraphError, DependencyGraphErrors};
pub use errors::{InjectError, RegistryError, RequireError};
pub use provider::{Provider, ProviderFn};
pub use registry::{InjectorModule, ProviderId, ProviderRegistry};
pub use resolver::Resolver;
pub use session::Session;
pub use types::{DependencyInfo, DynError, Injectable, Instance, TypeInfo};

/// Injects all injectable fields of `target` using a fresh instance of module `M`
///
/// Nothing constructed here outlives the call
pub fn inject<M, T>(target: &mut T) -> Result<(), InjectError>
where
    M: InjectorModule + Default,
    T: InjectionTarget,
{
    Session::<M>::new()?.inject(target)
}

/// Constructs every provider of module `M`
///
/// The returned container can inject the built values into any number of targets
pub fn inject_app<M>() -> Result<DiContainer, InjectError>
where
    M: InjectorModule + Default,
{
    let mut session = Session::<M>::new()?;
    session.build_all()?;
    Ok(session.into_container())
}
