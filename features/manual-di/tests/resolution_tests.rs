//! Construction order and memoization of provider values

use std::sync::{Arc, Mutex};

use manual_di::{
    InjectError, InjectorModule, ProviderRegistry, RegistryError, RequireError, Session, TypeInfo,
};
use rstest::*;

/// Records every provider invocation in order
#[derive(Default, Clone)]
struct CallLog(Arc<Mutex<Vec<&'static str>>>);
impl CallLog {
    fn record(&self, name: &'static str) {
        self.0.lock().unwrap().push(name);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| **call == name).count()
    }
}

// String -> length scenario
#[derive(Default)]
struct TextModule {
    log: CallLog,
}
impl TextModule {
    fn provide_string(&self) -> String {
        self.log.record("provide_string");
        "manual".to_string()
    }

    fn provide_length(&self, text: Arc<String>) -> usize {
        self.log.record("provide_length");
        text.len()
    }
}
impl InjectorModule for TextModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .provide("provide_length", Self::provide_length)?
            .provide("provide_string", Self::provide_string)?;
        Ok(())
    }
}

#[fixture]
fn text_module() -> (TextModule, CallLog) {
    let log = CallLog::default();
    (TextModule { log: log.clone() }, log)
}

#[rstest]
fn dependency_is_built_before_dependent(text_module: (TextModule, CallLog)) {
    // Arrange
    let (module, log) = text_module;
    let mut session = Session::with_module(module).unwrap();

    // Act
    let length = session.resolve::<usize>().unwrap();

    // Assert
    assert_eq!(*length, "manual".len());
    assert_eq!(log.calls(), vec!["provide_string", "provide_length"]);
}

#[rstest]
fn resolving_twice_invokes_providers_once(text_module: (TextModule, CallLog)) {
    // Arrange
    let (module, log) = text_module;
    let mut session = Session::with_module(module).unwrap();

    // Act
    let first = session.resolve::<usize>().unwrap();
    let second = session.resolve::<usize>().unwrap();
    let text = session.resolve::<String>().unwrap();

    // Assert
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*text, "manual");
    assert_eq!(log.count("provide_string"), 1);
    assert_eq!(log.count("provide_length"), 1);
}

#[rstest]
fn leaf_resolves_without_building_dependents(text_module: (TextModule, CallLog)) {
    // Arrange
    let (module, log) = text_module;
    let mut session = Session::with_module(module).unwrap();

    // Act
    session.resolve::<String>().unwrap();

    // Assert
    assert_eq!(log.calls(), vec!["provide_string"]);
    assert_eq!(session.cache().len(), 1);
}

#[rstest]
fn separate_sessions_do_not_share_instances() {
    // Arrange
    let log = CallLog::default();
    let mut first = Session::with_module(TextModule { log: log.clone() }).unwrap();
    let mut second = Session::with_module(TextModule { log: log.clone() }).unwrap();

    // Act
    let a = first.resolve::<String>().unwrap();
    let b = second.resolve::<String>().unwrap();

    // Assert
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(log.count("provide_string"), 2);
}

#[rstest]
fn unknown_root_type_is_a_missing_entry_point(text_module: (TextModule, CallLog)) {
    // Arrange
    let (module, _) = text_module;
    let mut session = Session::with_module(module).unwrap();

    // Act
    let result = session.resolve::<u64>();

    // Assert
    assert!(matches!(
        result,
        Err(InjectError::MissingEntryPoint(info)) if info == TypeInfo::of::<u64>()
    ));
}

// Shared dependency - Config is required by both Repository and Client
struct Config(u32);
struct Repository(Arc<Config>);
struct Client(Arc<Config>);

#[derive(Default)]
struct SharedModule {
    log: CallLog,
}
impl InjectorModule for SharedModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .provide("provide_repository", |module: &Self, config: Arc<Config>| {
                module.log.record("provide_repository");
                Repository(config)
            })?
            .provide("provide_client", |module: &Self, config: Arc<Config>| {
                module.log.record("provide_client");
                Client(config)
            })?
            .provide("provide_config", |module: &Self| {
                module.log.record("provide_config");
                Config(7)
            })?;
        Ok(())
    }
}

#[rstest]
fn shared_dependency_is_constructed_once() {
    // Arrange
    let log = CallLog::default();
    let mut session = Session::with_module(SharedModule { log: log.clone() }).unwrap();

    // Act
    let repository = session.resolve::<Repository>().unwrap();
    let client = session.resolve::<Client>().unwrap();

    // Assert
    assert_eq!(log.count("provide_config"), 1);
    assert!(Arc::ptr_eq(&repository.0, &client.0));
    assert_eq!(repository.0 .0, 7);
}

#[rstest]
fn build_all_constructs_every_provider_once() {
    // Arrange
    let log = CallLog::default();
    let mut session = Session::with_module(SharedModule { log: log.clone() }).unwrap();

    // Act
    session.build_all().unwrap();
    session.build_all().unwrap();

    // Assert
    let calls = log.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], "provide_config");
    assert_eq!(session.cache().len(), 3);
}

// Argument order - Left depends on Right, but Right is declared second
#[derive(Debug, PartialEq)]
struct Left(&'static str);
#[derive(Debug, PartialEq)]
struct Right(&'static str);
struct Pair {
    left: Arc<Left>,
    right: Arc<Right>,
}

#[derive(Default)]
struct PairModule {
    log: CallLog,
}
impl PairModule {
    fn provide_pair(&self, left: Arc<Left>, right: Arc<Right>) -> Pair {
        self.log.record("provide_pair");
        Pair { left, right }
    }

    fn provide_left(&self, _right: Arc<Right>) -> Left {
        self.log.record("provide_left");
        Left("left")
    }

    fn provide_right(&self) -> Right {
        self.log.record("provide_right");
        Right("right")
    }
}
impl InjectorModule for PairModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .provide("provide_pair", Self::provide_pair)?
            .provide("provide_left", Self::provide_left)?
            .provide("provide_right", Self::provide_right)?;
        Ok(())
    }
}

#[rstest]
fn arguments_follow_declared_parameter_order() {
    // Arrange
    let log = CallLog::default();
    let mut session = Session::with_module(PairModule { log: log.clone() }).unwrap();

    // Act
    let pair = session.resolve::<Pair>().unwrap();

    // Assert
    assert_eq!(*pair.left, Left("left"));
    assert_eq!(*pair.right, Right("right"));
    assert_eq!(log.calls(), vec!["provide_right", "provide_left", "provide_pair"]);
}

// Optional and unprovided parameters
struct Cache;
struct Unprovided;
struct Service {
    cache: Option<Arc<Cache>>,
}

#[derive(Default)]
struct OptionalModule;
impl InjectorModule for OptionalModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .provide("provide_service", |_: &Self, cache: Option<Arc<Cache>>| Service { cache })?
            .provide("provide_broken", |_: &Self, _missing: Arc<Unprovided>| 1_u8)?;
        Ok(())
    }
}

#[rstest]
fn optional_parameter_without_provider_is_none() {
    // Arrange
    let mut session = Session::<OptionalModule>::new().unwrap();

    // Act
    let service = session.resolve::<Service>().unwrap();

    // Assert
    assert!(service.cache.is_none());
    assert_eq!(session.graph().unresolved().len(), 2);
}

#[rstest]
fn required_parameter_without_provider_fails_on_invocation() {
    // Arrange
    let mut session = Session::<OptionalModule>::new().unwrap();

    // Act
    let result = session.resolve::<u8>();

    // Assert
    assert!(matches!(
        result,
        Err(InjectError::Require(RequireError::TypeMissing(name)))
            if name == std::any::type_name::<Unprovided>()
    ));
}

// Failing providers
#[derive(Debug, thiserror::Error)]
#[error("database unreachable")]
struct ConnectError;
struct Connection;

#[derive(Default)]
struct FailingModule;
impl FailingModule {
    fn provide_connection(&self) -> Result<Connection, ConnectError> {
        Err(ConnectError)
    }

    fn provide_name(&self, _connection: Arc<Connection>) -> String {
        "never built".to_string()
    }
}
impl InjectorModule for FailingModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .try_provide("provide_connection", Self::provide_connection)?
            .provide("provide_name", Self::provide_name)?;
        Ok(())
    }
}

#[rstest]
fn failing_provider_aborts_the_pass() {
    // Arrange
    let mut session = Session::<FailingModule>::new().unwrap();

    // Act
    let result = session.resolve::<String>();

    // Assert
    match result {
        Err(InjectError::ProviderFailed {
            provider, product, error,
        }) => {
            assert_eq!(provider, "provide_connection");
            assert_eq!(product, TypeInfo::of::<Connection>());
            assert_eq!(error.to_string(), "database unreachable");
        }
        other => panic!("expected a provider failure, got {other:?}"),
    }
    assert!(session.cache().is_empty());
}

// Entry points
#[derive(Default)]
struct EntryModule {
    log: CallLog,
}
impl InjectorModule for EntryModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .provide("provide_unused", |module: &Self| {
                module.log.record("provide_unused");
                0_i64
            })?
            .entry_point("provide_root", |module: &Self, text: Arc<String>| {
                module.log.record("provide_root");
                text.len()
            })?
            .add_instance("text", "entry".to_string())?;
        Ok(())
    }
}

#[rstest]
fn entry_point_builds_only_its_dependencies() {
    // Arrange
    let log = CallLog::default();
    let mut session = Session::with_module(EntryModule { log: log.clone() }).unwrap();

    // Act
    let root = session.build_entry_point().unwrap();

    // Assert
    assert_eq!(*root.downcast::<usize>().unwrap(), 5);
    assert_eq!(log.calls(), vec!["provide_root"]);
    assert!(session.cache().get::<i64>().unwrap().is_none());
}

#[rstest]
fn module_without_entry_point_fails(text_module: (TextModule, CallLog)) {
    // Arrange
    let (module, _) = text_module;
    let mut session = Session::with_module(module).unwrap();

    // Act
    let result = session.build_entry_point();

    // Assert
    assert!(matches!(result, Err(InjectError::NoEntryPoint(_))));
}

// A provider handing out a value the module already shares
struct Clock {
    offset: i64,
}
struct Scheduler {
    clock: Arc<Clock>,
}

struct SharedClockModule {
    clock: Arc<Clock>,
}
impl InjectorModule for SharedClockModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .provide_shared("provide_clock", |module: &Self| module.clock.clone())?
            .provide("provide_scheduler", |_: &Self, clock: Arc<Clock>| Scheduler { clock })?;
        Ok(())
    }
}

#[rstest]
fn shared_provider_satisfies_arc_parameters() {
    // Arrange
    let clock = Arc::new(Clock { offset: 2 });
    let mut session = Session::with_module(SharedClockModule { clock: clock.clone() }).unwrap();

    // Act
    let scheduler = session.resolve::<Scheduler>().unwrap();

    // Assert
    assert!(session.graph().unresolved().is_empty());
    assert!(Arc::ptr_eq(&scheduler.clock, &clock));
    assert_eq!(scheduler.clock.offset, 2);
}
