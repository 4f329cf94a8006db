use std::fmt;
use std::sync::{Arc, Mutex};

use crate::analytics::attributes::{
    attribute_value, dimensions_from_attributes, metrics_from_attributes, Attribute,
    CustomDimension, CustomMetric,
};
use crate::analytics::constants::{
    CLIENT_ID_STORE_KEY, DEFAULT_EVENT_CATEGORY, DEFAULT_PAYMENT_PROVIDER, DEFAULT_REAL_CURRENCY,
    LAUNCH_SCREEN_NAME, SESSION_ATTRIBUTES_EVENT,
};
use crate::analytics::error::AnalyticsResult;
use crate::analytics::hit::{collect_url, Hit, HitContext};
use crate::analytics::ids::{derive_client_id, derive_transaction_id};
use crate::analytics::persistence::{FileStore, KeyValueStore};
use crate::analytics::session::SessionState;
use crate::analytics::transport::{CollectEndpoint, CollectRequest, HitTransport, HttpTransport};
use crate::host::{DisplaySurface, HostApp, NoSurface};
use crate::platform::runtime::spawn_detached;

/// Construction-time configuration for [`AnalyticsProvider`].
///
/// Only the tracking id is required. The remaining knobs default to the
/// production collect endpoint, a file-backed store at its default location,
/// no display surface, and the generic HTTP transport.
pub struct ProviderSettings {
    tracking_id: String,
    dispatch_interval: Option<u32>,
    app_name: Option<String>,
    endpoint: CollectEndpoint,
    host: HostApp,
    store: Option<Arc<dyn KeyValueStore>>,
    surface: Option<Arc<dyn DisplaySurface>>,
    transport: Option<Arc<dyn HitTransport>>,
}

impl ProviderSettings {
    pub fn new(tracking_id: impl Into<String>) -> Self {
        Self {
            tracking_id: tracking_id.into(),
            dispatch_interval: None,
            app_name: None,
            endpoint: CollectEndpoint::Collect,
            host: HostApp::default(),
            store: None,
            surface: None,
            transport: None,
        }
    }

    /// Requested dispatch interval in seconds. The HTTP transport sends
    /// immediately; SDK-backed transports forward this to their batcher.
    pub fn with_dispatch_interval(mut self, seconds: u32) -> Self {
        self.dispatch_interval = Some(seconds);
        self
    }

    /// Overrides the application name reported on the wire. Falls back to the
    /// host's declared product name.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: CollectEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_host(mut self, host: HostApp) -> Self {
        self.host = host;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_surface(mut self, surface: Arc<dyn DisplaySurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HitTransport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

/// The platform-independent entry point the host application records through.
///
/// Cheap to clone; all clones share one session. Every record/set operation
/// is a silent no-op while no session is active, and no operation blocks on
/// network I/O: built hits are handed to the transport on a detached task and
/// their outcome is never reported back.
#[derive(Clone)]
pub struct AnalyticsProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    session: Mutex<SessionState>,
    app_name: String,
    host: HostApp,
    endpoint: CollectEndpoint,
    store: Arc<dyn KeyValueStore>,
    surface: Arc<dyn DisplaySurface>,
    transport: Arc<dyn HitTransport>,
}

impl Drop for ProviderInner {
    fn drop(&mut self) {
        // Module shutdown ends the session but does not drain in-flight hits.
        if let Ok(mut session) = self.session.lock() {
            session.finish();
        }
    }
}

impl fmt::Debug for AnalyticsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsProvider")
            .field("tracking_id", &self.tracking_id())
            .finish()
    }
}

impl AnalyticsProvider {
    pub fn new(settings: ProviderSettings) -> AnalyticsResult<Self> {
        if settings.tracking_id.is_empty() {
            log::warn!(
                "analytics provider created without a tracking id; record calls are dropped until one is set"
            );
        }

        let store = match settings.store {
            Some(store) => store,
            None => Arc::new(FileStore::default_location()?) as Arc<dyn KeyValueStore>,
        };
        let transport = match settings.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?) as Arc<dyn HitTransport>,
        };
        let surface = settings
            .surface
            .unwrap_or_else(|| Arc::new(NoSurface) as Arc<dyn DisplaySurface>);
        let app_name = settings
            .app_name
            .unwrap_or_else(|| settings.host.product_name.clone());

        Ok(Self {
            inner: Arc::new(ProviderInner {
                session: Mutex::new(SessionState::new(
                    settings.tracking_id,
                    settings.dispatch_interval,
                )),
                app_name,
                host: settings.host,
                endpoint: settings.endpoint,
                store,
                surface,
                transport,
            }),
        })
    }

    /// Starts a session, firing the implicit launch pageview and, when
    /// attributes were supplied, a synthetic session-attributes event.
    /// Returns the session-started state: `true` when a session is (already)
    /// active, `false` when no tracking id is configured.
    pub fn start_session(&self, attributes: &[Attribute]) -> bool {
        {
            let mut session = self.inner.session.lock().unwrap();
            if session.is_active() {
                return true;
            }
            if session.tracking_id().is_empty() {
                log::warn!("analytics session not started: no tracking id configured");
                return false;
            }
            if let Some(interval) = session.dispatch_interval() {
                log::debug!("analytics dispatch interval: {interval}s");
            }
            let client_id = self.resolve_client_id();
            session.begin(client_id);
        }

        self.record_screen(LAUNCH_SCREEN_NAME, &[], &[]);
        if !attributes.is_empty() {
            self.record_event(SESSION_ATTRIBUTES_EVENT, attributes);
        }
        true
    }

    /// Ends the current session. Idempotent when already inactive.
    pub fn end_session(&self) {
        self.inner.session.lock().unwrap().finish();
    }

    /// Swaps the destination property: ends the current session and starts a
    /// fresh one under the new tracking id, which re-fires the launch hit.
    pub fn set_tracking_id(&self, tracking_id: &str) {
        self.end_session();
        self.inner
            .session
            .lock()
            .unwrap()
            .set_tracking_id(tracking_id);
        self.start_session(&[]);
    }

    pub fn tracking_id(&self) -> String {
        self.inner.session.lock().unwrap().tracking_id().to_string()
    }

    /// Asks the transport to push out anything it queued locally. The HTTP
    /// transport sends hits immediately, so this is a no-op there.
    pub fn flush_events(&self) {
        if !self.session_active() {
            return;
        }
        let transport = self.inner.transport.clone();
        spawn_detached(async move {
            transport.flush().await;
        });
    }

    pub fn set_user_id(&self, user_id: &str) {
        let mut session = self.inner.session.lock().unwrap();
        if session.is_active() {
            session.set_user_id(user_id);
        }
    }

    pub fn user_id(&self) -> String {
        let session = self.inner.session.lock().unwrap();
        if session.is_active() {
            session.user_id().to_string()
        } else {
            String::new()
        }
    }

    pub fn set_location(&self, location: &str) {
        let mut session = self.inner.session.lock().unwrap();
        if session.is_active() {
            session.set_location(location);
        }
    }

    /// Demographics have no first-class protocol field; they ride as plain
    /// events.
    pub fn set_gender(&self, gender: &str) {
        if !self.session_active() {
            return;
        }
        self.record_event(gender, &[Attribute::new("Category", "Gender")]);
    }

    pub fn set_age(&self, age: i32) {
        if !self.session_active() {
            return;
        }
        self.record_event(
            &age.to_string(),
            &[
                Attribute::new("Category", "Age"),
                Attribute::new("Value", age),
            ],
        );
    }

    pub fn set_anonymize_ip(&self, anonymize: bool) {
        self.inner
            .session
            .lock()
            .unwrap()
            .set_anonymize_ip(anonymize);
    }

    /// The measurement protocol has no externally settable session id; the
    /// call is accepted and ignored.
    pub fn set_session_id(&self, _session_id: &str) -> bool {
        log::info!("set_session_id ignored: sessions are not externally addressable");
        true
    }

    /// Counterpart of [`Self::set_session_id`]; always returns an empty id.
    pub fn session_id(&self) -> String {
        log::info!("session_id ignored: sessions are not externally addressable");
        String::new()
    }

    /// Records a custom event. `Category`, `Label` and `Value` attributes
    /// (matched case-insensitively) fill the corresponding protocol fields;
    /// attributes following the custom dimension/metric naming convention are
    /// folded in; everything else is ignored.
    pub fn record_event(&self, event_name: &str, attributes: &[Attribute]) {
        if !self.session_active() || event_name.is_empty() {
            return;
        }

        let category = attribute_value(attributes, "Category").unwrap_or(DEFAULT_EVENT_CATEGORY);
        let label = attribute_value(attributes, "Label").unwrap_or("");
        let value = attribute_value(attributes, "Value")
            .and_then(|raw| raw.parse::<f64>().ok())
            .unwrap_or(0.0);

        let hit = Hit::event(category, event_name, label, value)
            .with_dimensions(dimensions_from_attributes(attributes))
            .with_metrics(metrics_from_attributes(attributes));
        self.dispatch(hit);
    }

    /// Records a screen view.
    pub fn record_screen(
        &self,
        screen_name: &str,
        dimensions: &[CustomDimension],
        metrics: &[CustomMetric],
    ) {
        if !self.session_active() || screen_name.is_empty() {
            return;
        }
        let hit = Hit::pageview(screen_name)
            .with_dimensions(dimensions.to_vec())
            .with_metrics(metrics.to_vec());
        self.dispatch(hit);
    }

    pub fn record_social_interaction(
        &self,
        network: &str,
        action: &str,
        target: &str,
        dimensions: &[CustomDimension],
        metrics: &[CustomMetric],
    ) {
        if !self.session_active() || network.is_empty() || action.is_empty() {
            return;
        }
        let hit = Hit::social(network, action, target)
            .with_dimensions(dimensions.to_vec())
            .with_metrics(metrics.to_vec());
        self.dispatch(hit);
    }

    pub fn record_user_timing(
        &self,
        category: &str,
        millis: i32,
        name: &str,
        label: Option<&str>,
        dimensions: &[CustomDimension],
        metrics: &[CustomMetric],
    ) {
        if !self.session_active() || category.is_empty() {
            return;
        }
        let hit = Hit::timing(category, name, millis, label)
            .with_dimensions(dimensions.to_vec())
            .with_metrics(metrics.to_vec());
        self.dispatch(hit);
    }

    /// Records an in-game item purchase as an event
    /// (`Category="Item Purchase"`, label describing the per-item cost,
    /// value carrying the quantity).
    pub fn record_item_purchase(&self, item_id: &str, item_quantity: i32, attributes: &[Attribute]) {
        if !self.session_active() {
            return;
        }
        let currency = attribute_value(attributes, "Currency").unwrap_or("");
        let per_item_cost = attribute_value(attributes, "PerItemCost")
            .and_then(|raw| raw.parse::<i32>().ok())
            .unwrap_or(0);

        let params = [
            Attribute::new("Category", "Item Purchase"),
            Attribute::new("Label", format!("Cost: {per_item_cost} {currency}")),
            Attribute::new("Value", item_quantity),
        ];
        self.record_event(item_id, &params);
    }

    /// Records a real-money purchase of in-game currency as a
    /// transaction/item hit pair sharing one synthesized transaction id.
    ///
    /// A zero currency amount drops the whole purchase: the item's unit price
    /// is the real-money cost divided by the amount, and emitting only the
    /// transaction half would break the paired-id contract.
    pub fn record_currency_purchase(
        &self,
        game_currency_type: &str,
        game_currency_amount: i32,
        attributes: &[Attribute],
    ) {
        if !self.session_active() || game_currency_type.is_empty() {
            return;
        }
        if game_currency_amount == 0 {
            log::debug!(
                "currency purchase of '{game_currency_type}' dropped: zero currency amount"
            );
            return;
        }

        let real_currency =
            attribute_value(attributes, "RealCurrencyType").unwrap_or(DEFAULT_REAL_CURRENCY);
        let real_money_cost = attribute_value(attributes, "RealMoneyCost")
            .and_then(|raw| raw.parse::<f64>().ok())
            .unwrap_or(0.0);
        let payment_provider =
            attribute_value(attributes, "PaymentProvider").unwrap_or(DEFAULT_PAYMENT_PROVIDER);

        let transaction_id =
            derive_transaction_id(game_currency_type, real_currency, payment_provider);
        let dimensions = dimensions_from_attributes(attributes);
        let metrics = metrics_from_attributes(attributes);

        self.dispatch(
            Hit::transaction(&transaction_id, payment_provider, real_money_cost, real_currency)
                .with_dimensions(dimensions.clone())
                .with_metrics(metrics.clone()),
        );
        self.dispatch(
            Hit::item(
                &transaction_id,
                game_currency_type,
                real_money_cost / f64::from(game_currency_amount),
                game_currency_amount,
                payment_provider,
                game_currency_type,
                real_currency,
            )
            .with_dimensions(dimensions)
            .with_metrics(metrics),
        );
    }

    /// Records in-game currency granted by the game itself as an event
    /// (`Category="Currency Given"`, value carrying the amount).
    pub fn record_currency_given(
        &self,
        game_currency_type: &str,
        game_currency_amount: i32,
        _attributes: &[Attribute],
    ) {
        if !self.session_active() {
            return;
        }
        let params = [
            Attribute::new("Category", "Currency Given"),
            Attribute::new("Value", game_currency_amount),
        ];
        self.record_event(game_currency_type, &params);
    }

    /// Records an error/exception hit.
    pub fn record_error(&self, description: &str, attributes: &[Attribute]) {
        if !self.session_active() || description.is_empty() {
            return;
        }
        let hit = Hit::exception(description, false)
            .with_dimensions(dimensions_from_attributes(attributes))
            .with_metrics(metrics_from_attributes(attributes));
        self.dispatch(hit);
    }

    /// Records a progression step as an event (`Category="Progression"`,
    /// label joining the hierarchy with `.`).
    pub fn record_progress(
        &self,
        progress_type: &str,
        progress_hierarchy: &[&str],
        _attributes: &[Attribute],
    ) {
        if !self.session_active() {
            return;
        }
        let params = [
            Attribute::new("Category", "Progression"),
            Attribute::new("Label", progress_hierarchy.join(".")),
        ];
        self.record_event(progress_type, &params);
    }

    fn session_active(&self) -> bool {
        self.inner.session.lock().unwrap().is_active()
    }

    fn resolve_client_id(&self) -> String {
        match self.inner.store.get(CLIENT_ID_STORE_KEY) {
            Ok(Some(client_id)) if !client_id.is_empty() => client_id,
            Ok(_) => {
                let client_id = derive_client_id();
                if let Err(err) = self
                    .inner
                    .store
                    .set(CLIENT_ID_STORE_KEY, &client_id)
                    .and_then(|()| self.inner.store.flush())
                {
                    log::warn!("failed to persist analytics client id: {err}");
                }
                client_id
            }
            Err(err) => {
                log::warn!("failed to load persisted client id: {err}");
                derive_client_id()
            }
        }
    }

    /// Serializes the hit against the current session snapshot and hands it
    /// to the transport on a detached task. Failures are logged and dropped.
    fn dispatch(&self, hit: Hit) {
        let url = {
            let mut session = self.inner.session.lock().unwrap();
            if !session.is_active() {
                return;
            }
            let session_start = session.take_session_start_marker();
            let context = HitContext {
                tracking_id: session.tracking_id(),
                client_id: session.client_id(),
                user_id: session.user_id(),
                location: session.location(),
                app_name: &self.inner.app_name,
                app_id: &self.inner.host.app_id,
                app_version: &self.inner.host.version,
                locale: &self.inner.host.locale,
                platform: &self.inner.host.platform,
                surface_size: self.inner.surface.surface_size(),
                session_start,
                anonymize_ip: session.anonymize_ip(),
            };
            collect_url(self.inner.endpoint.as_str(), &context, &hit)
        };

        let transport = self.inner.transport.clone();
        spawn_detached(async move {
            if let Err(err) = transport.submit(CollectRequest { url }).await {
                log::debug!("analytics hit dropped: {err}");
            }
        });
    }
}
