use std::fmt::Debug;

use crate::{
    errors::{InjectError, RequireError},
    resolver::Resolver,
    types::{DependencyInfo, DynError, Instance, TypeInfo},
};

/// A function of module `M` which can supply a value
///
/// Implemented for every `Fn(&M, A1, .., An) -> Output` where each parameter is a [Resolver]
/// (`Arc<T>` or `Option<Arc<T>>`). The parameter list is the list of required types, in declared order.
pub trait ProviderFn<M, Args>: Send + Sync + 'static {
    type Output;

    /// Returns the required types in declared parameter order
    fn dependencies() -> Vec<DependencyInfo>;

    /// Calls the function, resolving one parameter from each argument slot
    fn call(&self, module: &M, slots: &[Option<Instance>]) -> Result<Self::Output, RequireError>;
}

macro_rules! impl_provider_fn {
    ($($param:ident),*) => {
        impl<M, Func, Out, $($param,)*> ProviderFn<M, ($($param,)*)> for Func
        where
            Func: Fn(&M, $($param),*) -> Out + Send + Sync + 'static,
            $($param: Resolver,)*
        {
            type Output = Out;

            fn dependencies() -> Vec<DependencyInfo> {
                vec![$(<$param as Resolver>::dependency_info()),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn call(&self, module: &M, slots: &[Option<Instance>]) -> Result<Out, RequireError> {
                let mut slots = slots.iter();
                Ok(self(
                    module,
                    $(<$param as Resolver>::resolve(slots.next().and_then(Option::as_ref))?),*
                ))
            }
        }
    };
}

impl_provider_fn!();
impl_provider_fn!(A1);
impl_provider_fn!(A1, A2);
impl_provider_fn!(A1, A2, A3);
impl_provider_fn!(A1, A2, A3, A4);
impl_provider_fn!(A1, A2, A3, A4, A5);
impl_provider_fn!(A1, A2, A3, A4, A5, A6);
impl_provider_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_provider_fn!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Outer result: the arguments could not be resolved, inner result: the provider body failed
type InvokeResult = Result<Result<Instance, DynError>, RequireError>;
type InvokeFn<M> = Box<dyn Fn(&M, &[Option<Instance>]) -> InvokeResult + Send + Sync>;

/// A registered provider with its type erased
pub struct Provider<M> {
    name: &'static str,
    info: TypeInfo,
    dependencies: Vec<DependencyInfo>,
    invoke: InvokeFn<M>,
}
impl<M> Debug for Provider<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("supplies", &self.info.type_name)
            .field(
                "dependencies",
                &self
                    .dependencies
                    .iter()
                    .map(|dependency| dependency.type_info.type_name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<M: 'static> Provider<M> {
    pub(crate) fn new(
        name: &'static str,
        info: TypeInfo,
        dependencies: Vec<DependencyInfo>,
        invoke: impl Fn(&M, &[Option<Instance>]) -> InvokeResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            info,
            dependencies,
            invoke: Box::new(invoke),
        }
    }
}

impl<M> Provider<M> {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type this provider produces
    pub fn supplies(&self) -> TypeInfo {
        self.info
    }

    /// The required types, in declared parameter order
    pub fn dependencies(&self) -> &[DependencyInfo] {
        &self.dependencies
    }

    /// Invokes the provider with one argument slot per declared dependency
    pub(crate) fn invoke(&self, module: &M, slots: &[Option<Instance>]) -> Result<Instance, InjectError> {
        debug_assert_eq!(slots.len(), self.dependencies.len());

        match (self.invoke)(module, slots)? {
            Ok(instance) => Ok(instance),
            Err(error) => Err(InjectError::ProviderFailed {
                provider: self.name,
                product: self.info,
                error: error.into(),
            }),
        }
    }
}
