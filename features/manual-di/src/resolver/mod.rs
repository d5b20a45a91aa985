use crate::{
    errors::RequireError,
    types::{DependencyInfo, Instance},
};

pub mod arc;

/// Turns an argument slot of the instance cache into a provider parameter
///
/// The slot is `None` when no provider produced the dependency during the current pass
pub trait Resolver: Sized {
    fn resolve(slot: Option<&Instance>) -> Result<Self, RequireError>;

    fn dependency_info() -> DependencyInfo;
}
