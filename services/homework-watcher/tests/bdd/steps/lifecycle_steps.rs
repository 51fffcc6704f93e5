//! BDD step definitions for watcher startup and shutdown

use std::sync::Arc;

use cucumber::{given, then, when};

use homework_watcher::config::{API_TOKEN_ENV, TELEGRAM_CHAT_ID_ENV, TELEGRAM_TOKEN_ENV};
use homework_watcher::{Config, WatcherBuilder, WatcherError};

use crate::world::{FixedClock, WatcherWorld};

fn config_without(missing: Option<&str>) -> Config {
    let mut config = Config::default();
    config.resolve_secrets_with(|name| {
        if Some(name) == missing {
            None
        } else {
            Some(format!("{}-value", name.to_lowercase()))
        }
    });
    config
}

#[given("a complete configuration")]
fn complete_configuration(world: &mut WatcherWorld) {
    world.config = Some(config_without(None));
}

#[given(expr = "a configuration without {string}")]
fn configuration_without(world: &mut WatcherWorld, name: String) {
    let known = [API_TOKEN_ENV, TELEGRAM_TOKEN_ENV, TELEGRAM_CHAT_ID_ENV];
    assert!(known.contains(&name.as_str()), "unknown setting {name}");
    world.config = Some(config_without(Some(&name)));
}

#[given(expr = "a retry period of {int} seconds")]
fn retry_period(world: &mut WatcherWorld, seconds: u64) {
    let config = world.config.as_mut().expect("config not set");
    config.polling.retry_period_seconds = seconds;
}

#[when("the watcher is built")]
fn build_watcher(world: &mut WatcherWorld) {
    let config = world.config.clone().expect("config not set");
    let result = WatcherBuilder::new(config)
        .with_http_client(world.services.clone())
        .with_clock(Arc::new(FixedClock(1_700_000_000)))
        .build();
    match result {
        Ok(watcher) => world.watcher = Some(watcher),
        Err(e) => world.build_error = Some(e),
    }
}

#[when("the watcher runs until it is cancelled")]
async fn run_watcher(world: &mut WatcherWorld) {
    let watcher = world.watcher.take().expect("watcher not built");
    watcher.cancellation_token().cancel();
    watcher.run().await.unwrap();
}

#[then("building should succeed")]
fn build_succeeds(world: &mut WatcherWorld) {
    assert!(
        world.build_error.is_none(),
        "unexpected error: {:?}",
        world.build_error
    );
    assert!(world.watcher.is_some());
}

#[then(expr = "building should fail because {string} is missing")]
fn build_fails_missing(world: &mut WatcherWorld, name: String) {
    match world.build_error.as_ref() {
        Some(WatcherError::ConfigurationMissing(names)) => assert_eq!(names, &name),
        other => panic!("expected ConfigurationMissing, got {other:?}"),
    }
}

#[then(expr = "building should fail with a configuration error mentioning {string}")]
fn build_fails_config(world: &mut WatcherWorld, detail: String) {
    match world.build_error.as_ref() {
        Some(WatcherError::Config(msg)) => assert!(msg.contains(&detail), "{msg}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[then(expr = "the watcher should poll every {int} seconds")]
fn polls_every(world: &mut WatcherWorld, seconds: u64) {
    let watcher = world.watcher.as_ref().expect("watcher not built");
    assert_eq!(watcher.retry_period().as_secs(), seconds);
}
