use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    sync::Arc,
};

use crate::{
    errors::RequireError,
    types::{Injectable, Instance},
};

/// Constructed values of one resolution pass - at most one per type
#[derive(Default, Clone, Debug)]
pub struct InstanceCache {
    instances: HashMap<TypeId, Instance>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to get an already constructed value
    ///
    /// Returns `Ok(None)` if the type was not constructed yet
    pub fn get<T: Injectable>(&self) -> Result<Option<Arc<T>>, RequireError> {
        self.instances
            .get(&TypeId::of::<T>())
            .map(|instance| {
                instance
                    .downcast()
                    .map_err(|actual_type| RequireError::DowncastFailed {
                        required_type: type_name::<T>(),
                        actual_type,
                    })
            })
            .transpose()
    }

    pub fn get_instance(&self, type_id: &TypeId) -> Option<&Instance> {
        self.instances.get(type_id)
    }

    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.instances.contains_key(type_id)
    }

    /// Stores a value under its own type, returning the previous one
    pub fn insert(&mut self, instance: Instance) -> Option<Instance> {
        self.instances.insert(instance.info.type_id, instance)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
