//! Protocol constants shared by the request builder, session manager and transport.

/// Measurement protocol version reported in every hit (`v=`).
pub(crate) const PROTOCOL_VERSION: &str = "1";

/// Production collection endpoint.
pub(crate) const COLLECT_ENDPOINT: &str = "https://www.google-analytics.com/collect";

/// Application version reported when the host never configured one (`av=`).
pub(crate) const DEFAULT_APP_VERSION: &str = "1.0";

/// Event category used when a `Category` attribute is absent or empty.
pub(crate) const DEFAULT_EVENT_CATEGORY: &str = "Default Category";

/// Payment provider used when a `PaymentProvider` attribute is absent or empty.
pub(crate) const DEFAULT_PAYMENT_PROVIDER: &str = "Default Provider";

/// Real-world currency used when a `RealCurrencyType` attribute is absent or empty.
pub(crate) const DEFAULT_REAL_CURRENCY: &str = "USD";

/// Key under which the per-installation client id is persisted.
pub(crate) const CLIENT_ID_STORE_KEY: &str = "client_id";

/// Seed prepended to the timestamp when a fresh client id is derived.
pub(crate) const CLIENT_ID_SEED: &str = "ClientId";

/// Attribute-name prefix marking an indexed custom dimension.
pub(crate) const DIMENSION_PREFIX: &str = "CustomDimension";

/// Attribute-name prefix marking an indexed custom metric.
pub(crate) const METRIC_PREFIX: &str = "CustomMetric";

/// Screen name reported by the implicit session-start pageview.
pub(crate) const LAUNCH_SCREEN_NAME: &str = "Game Launched";

/// Event name of the synthetic hit carrying session-start attributes.
pub(crate) const SESSION_ATTRIBUTES_EVENT: &str = "SessionAttributes";
