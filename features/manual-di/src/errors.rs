use std::sync::Arc;

use thiserror::Error;

use crate::{
    dependency_graph::DependencyGraphErrors,
    types::{DynError, TypeInfo},
};

#[derive(Error, Debug, Clone)]
pub enum InjectError {
    /// A requested root type has no provider
    #[error("No provider satisfies the requested entry point '{0}'")]
    MissingEntryPoint(TypeInfo),
    /// The module did not tag any provider as its entry point
    #[error("Module '{0}' does not declare an entry point")]
    NoEntryPoint(&'static str),
    /// An injectable field asks for a type nobody provides
    #[error("Field '{field}' requires '{dependency}' but no provider produces it")]
    MissingProvider {
        field: &'static str,
        dependency: TypeInfo,
    },
    /// A provider failed to build
    #[error("Provider '{provider}' for '{product}' failed - error: {error}")]
    ProviderFailed {
        provider: &'static str,
        product: TypeInfo,
        error: Arc<DynError>,
    },
    /// The module registered its providers incorrectly
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// There are issues with the dependency graph
    #[error(transparent)]
    DependencyGraph(#[from] DependencyGraphErrors),
    /// Could not require the type
    #[error(transparent)]
    Require(#[from] RequireError),
}

/// Errors when trying to require a certain type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequireError {
    /// The required type was not constructed
    #[error("The required type '{0}' is not available.")]
    TypeMissing(&'static str),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors while registering providers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two providers produce the same type
    #[error("'{product}' is provided by both '{existing}' and '{duplicate}'")]
    DuplicateProvider {
        product: TypeInfo,
        existing: &'static str,
        duplicate: &'static str,
    },
    /// More than one provider was tagged as entry point
    #[error("Entry point already set to '{existing}', cannot also use '{duplicate}'")]
    DuplicateEntryPoint {
        existing: &'static str,
        duplicate: &'static str,
    },
}
