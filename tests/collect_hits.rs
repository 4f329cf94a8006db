//! End-to-end: the real HTTP transport delivering built hits to a mock
//! collect endpoint. Dispatch is fire-and-forget, so the assertions poll the
//! mock until the expected hits arrive.

use std::sync::Arc;
use std::time::{Duration, Instant};

use httpmock::prelude::*;

use analytics_rs_sdk::analytics::{
    AnalyticsProvider, Attribute, CollectEndpoint, MemoryStore, ProviderSettings,
};
use analytics_rs_sdk::host::{FixedSurface, HostApp};

fn wait_until(mut satisfied: impl FnMut() -> bool, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !satisfied() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn provider_for(server: &MockServer) -> AnalyticsProvider {
    AnalyticsProvider::new(
        ProviderSettings::new("UA-1234-5")
            .with_endpoint(CollectEndpoint::Custom(server.url("/collect")))
            .with_host(
                HostApp::new("Sample Game")
                    .with_app_id("com.example.sample")
                    .with_locale("en-US")
                    .with_platform("linux"),
            )
            .with_store(Arc::new(MemoryStore::new()))
            .with_surface(Arc::new(FixedSurface::new(1280, 720))),
    )
    .expect("build provider")
}

#[test]
fn session_and_event_hits_reach_the_collect_endpoint() {
    let server = MockServer::start();

    let launch = server.mock(|when, then| {
        when.method(GET)
            .path("/collect")
            .query_param("v", "1")
            .query_param("t", "pageview")
            .query_param("tid", "UA-1234-5")
            .query_param("dp", "Game Launched")
            .query_param("sr", "1280x720")
            .query_param("sc", "start");
        then.status(200);
    });
    let event = server.mock(|when, then| {
        when.method(GET)
            .path("/collect")
            .query_param("t", "event")
            .query_param("ec", "Combat")
            .query_param("ea", "Jump")
            .query_param("cd7", "gold");
        then.status(200);
    });

    let provider = provider_for(&server);
    assert!(provider.start_session(&[]));
    provider.record_event(
        "Jump",
        &[
            Attribute::new("Category", "Combat"),
            Attribute::new("CustomDimension7", "gold"),
        ],
    );

    wait_until(|| launch.hits() >= 1, "launch pageview");
    wait_until(|| event.hits() >= 1, "combat event");
}

#[test]
fn rejected_hits_do_not_disturb_later_ones() {
    let server = MockServer::start();

    let rejected = server.mock(|when, then| {
        when.method(GET).path("/collect").query_param("t", "pageview");
        then.status(500);
    });
    let accepted = server.mock(|when, then| {
        when.method(GET).path("/collect").query_param("t", "event");
        then.status(200);
    });

    let provider = provider_for(&server);
    provider.start_session(&[]);
    provider.record_event("Jump", &[]);

    wait_until(|| rejected.hits() >= 1, "rejected pageview");
    wait_until(|| accepted.hits() >= 1, "event after rejection");
}
