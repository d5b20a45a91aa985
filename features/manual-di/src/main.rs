use std::sync::Arc;

use manual_di::{
    InjectionPoints, InjectionTarget, InjectorModule, ProviderRegistry, RegistryError, Session,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut session = match Session::<MainModule>::new() {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("{e}");
            return;
        }
    };

    let mut activity = MainActivity::default();
    if let Err(e) = session.inject(&mut activity) {
        tracing::error!("{e}");
        return;
    }

    if let Some(presenter) = &activity.presenter {
        println!("{} ({} characters)", presenter.greeting.0, presenter.length);
    }
    println!("{:?}", activity);
    println!("{:?}", session.into_container());
}

#[derive(Debug)]
struct Greeting(String);

#[derive(Debug)]
struct MainPresenter {
    greeting: Arc<Greeting>,
    length: usize,
}

#[derive(Default)]
struct MainModule;
impl MainModule {
    fn provide_greeting(&self) -> Greeting {
        Greeting("Hello from manual-di".to_string())
    }

    fn provide_length(&self, greeting: Arc<Greeting>) -> usize {
        greeting.0.len()
    }

    fn provide_presenter(&self, greeting: Arc<Greeting>, length: Arc<usize>) -> MainPresenter {
        MainPresenter {
            greeting,
            length: *length,
        }
    }
}
impl InjectorModule for MainModule {
    fn providers(&self, registry: &mut ProviderRegistry<Self>) -> Result<(), RegistryError> {
        registry
            .provide("provide_greeting", Self::provide_greeting)?
            .provide("provide_length", Self::provide_length)?
            .provide("provide_presenter", Self::provide_presenter)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MainActivity {
    presenter: Option<Arc<MainPresenter>>,
    greeting: Option<Arc<Greeting>>,
}
impl InjectionTarget for MainActivity {
    fn injection_points(points: &mut InjectionPoints<Self>) {
        points
            .field("presenter", |activity: &mut Self, presenter: Arc<MainPresenter>| {
                activity.presenter = Some(presenter)
            })
            .field("greeting", |activity: &mut Self, greeting: Arc<Greeting>| {
                activity.greeting = Some(greeting)
            });
    }
}
