mod api;
mod attributes;
pub(crate) mod constants;
pub mod error;
mod hit;
mod ids;
mod persistence;
mod session;
mod transport;

pub use api::{AnalyticsProvider, ProviderSettings};
pub use attributes::{
    dimensions_from_attributes, metrics_from_attributes, Attribute, CustomDimension, CustomMetric,
};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{CollectEndpoint, CollectRequest, HitTransport, HttpTransport};
