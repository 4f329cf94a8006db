//! Client-side analytics event forwarder for game hosts.
//!
//! The crate translates loosely-typed telemetry events (screen views, custom
//! events, purchases, social interactions, timings, errors) into Universal
//! Analytics measurement-protocol hits, enriches them with session and host
//! metadata, and dispatches them fire-and-forget over HTTPS. Delivery is
//! best-effort by design: nothing is retried, queued or reported back, and no
//! operation blocks the host's update path.
//!
//! ```no_run
//! use analytics_rs_sdk::analytics::{AnalyticsProvider, Attribute, ProviderSettings};
//! use analytics_rs_sdk::host::HostApp;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = AnalyticsProvider::new(
//!     ProviderSettings::new("UA-0000000-1")
//!         .with_host(HostApp::new("Sample Game").with_app_id("com.example.sample")),
//! )?;
//!
//! provider.start_session(&[]);
//! provider.record_event("Jump", &[Attribute::new("Category", "Combat")]);
//! provider.end_session();
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod host;
pub mod platform;
