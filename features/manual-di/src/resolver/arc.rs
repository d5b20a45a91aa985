use std::{any::type_name, sync::Arc};

use crate::{
    errors::RequireError,
    resolver::Resolver,
    types::{DependencyInfo, Injectable, Instance, TypeInfo},
};

impl<T: Injectable> Resolver for Arc<T> {
    fn resolve(slot: Option<&Instance>) -> Result<Self, RequireError> {
        let instance = slot.ok_or(RequireError::TypeMissing(type_name::<T>()))?;

        instance
            .downcast::<T>()
            .map_err(|actual_type| RequireError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })
    }

    fn dependency_info() -> DependencyInfo {
        DependencyInfo {
            type_info: TypeInfo::of::<T>(),
            optional: false,
        }
    }
}

impl<Resolvable: Resolver> Resolver for Option<Resolvable> {
    fn resolve(slot: Option<&Instance>) -> Result<Self, RequireError> {
        match slot {
            // Nobody provides the type, Option does not fail
            None => Ok(None),
            Some(_) => Resolvable::resolve(slot).map(Some),
        }
    }

    fn dependency_info() -> DependencyInfo {
        let original = Resolvable::dependency_info();
        DependencyInfo {
            optional: true,
            ..original
        }
    }
}
