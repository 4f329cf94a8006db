//! Hit model and measurement-protocol request builder.
//!
//! A [`Hit`] is ephemeral: one per record call, serialized into a collect URL
//! and discarded. The constructors encode the per-hit-type field mapping;
//! [`collect_url`] wraps the fields in the common parameter block shared by
//! every hit type. User-supplied strings are percent-encoded at the moment
//! they enter a field, numeric fields are formatted verbatim.

use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::analytics::attributes::{CustomDimension, CustomMetric};
use crate::analytics::constants::PROTOCOL_VERSION;

// RFC 3986 unreserved characters stay literal, everything else is escaped.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_SET).to_string()
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HitType {
    Pageview,
    Event,
    Social,
    Timing,
    Transaction,
    Item,
    Exception,
}

impl HitType {
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            HitType::Pageview => "pageview",
            HitType::Event => "event",
            HitType::Social => "social",
            HitType::Timing => "timing",
            HitType::Transaction => "transaction",
            HitType::Item => "item",
            HitType::Exception => "exception",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Hit {
    hit_type: HitType,
    fields: Vec<(&'static str, String)>,
    dimensions: Vec<CustomDimension>,
    metrics: Vec<CustomMetric>,
}

impl Hit {
    fn new(hit_type: HitType) -> Self {
        Self {
            hit_type,
            fields: Vec::new(),
            dimensions: Vec::new(),
            metrics: Vec::new(),
        }
    }

    fn field(mut self, key: &'static str, value: &str) -> Self {
        self.fields.push((key, encode(value)));
        self
    }

    fn numeric_field(mut self, key: &'static str, value: String) -> Self {
        self.fields.push((key, value));
        self
    }

    pub fn pageview(screen_name: &str) -> Self {
        Hit::new(HitType::Pageview)
            .field("dp", screen_name)
            .field("dt", screen_name)
    }

    /// Event value rides the wire as an integer; fractional values truncate.
    pub fn event(category: &str, action: &str, label: &str, value: f64) -> Self {
        Hit::new(HitType::Event)
            .field("ec", category)
            .field("ea", action)
            .field("el", label)
            .numeric_field("ev", (value as i64).to_string())
    }

    pub fn social(network: &str, action: &str, target: &str) -> Self {
        Hit::new(HitType::Social)
            .field("sn", network)
            .field("sa", action)
            .field("st", target)
    }

    pub fn timing(category: &str, name: &str, millis: i32, label: Option<&str>) -> Self {
        let hit = Hit::new(HitType::Timing)
            .field("utc", category)
            .field("utv", name)
            .numeric_field("utt", millis.to_string());
        match label {
            Some(label) if !label.is_empty() => hit.field("utl", label),
            _ => hit,
        }
    }

    pub fn transaction(
        transaction_id: &str,
        affiliation: &str,
        revenue: f64,
        currency: &str,
    ) -> Self {
        Hit::new(HitType::Transaction)
            .field("ti", transaction_id)
            .field("ta", affiliation)
            .numeric_field("tr", format_number(revenue))
            .numeric_field("ts", "0".to_string())
            .numeric_field("tt", "0".to_string())
            .field("cu", currency)
    }

    pub fn item(
        transaction_id: &str,
        name: &str,
        unit_price: f64,
        quantity: i32,
        variant: &str,
        category: &str,
        currency: &str,
    ) -> Self {
        Hit::new(HitType::Item)
            .field("ti", transaction_id)
            .field("in", name)
            .numeric_field("ip", format_number(unit_price))
            .numeric_field("iq", quantity.to_string())
            .field("iv", variant)
            .field("ic", category)
            .field("cu", currency)
    }

    pub fn exception(description: &str, fatal: bool) -> Self {
        let fatal_flag = if fatal { "1" } else { "0" };
        Hit::new(HitType::Exception)
            .field("exd", description)
            .numeric_field("exf", fatal_flag.to_string())
    }

    pub fn with_dimensions(mut self, dimensions: Vec<CustomDimension>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<CustomMetric>) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Everything beyond the hit itself that the common parameter block needs:
/// session identity, host/app metadata, and the two per-hit flags resolved by
/// the session manager.
pub(crate) struct HitContext<'a> {
    pub tracking_id: &'a str,
    pub client_id: &'a str,
    pub user_id: &'a str,
    pub location: &'a str,
    pub app_name: &'a str,
    pub app_id: &'a str,
    pub app_version: &'a str,
    pub locale: &'a str,
    pub platform: &'a str,
    pub surface_size: Option<(u32, u32)>,
    pub session_start: bool,
    pub anonymize_ip: bool,
}

/// Assembles the full collect URL for one hit.
pub(crate) fn collect_url(endpoint: &str, context: &HitContext<'_>, hit: &Hit) -> String {
    let mut url = String::with_capacity(256);
    let _ = write!(
        url,
        "{endpoint}?v={PROTOCOL_VERSION}&t={}&tid={}&cid={}",
        hit.hit_type.wire_name(),
        encode(context.tracking_id),
        encode(context.client_id),
    );

    let _ = write!(
        url,
        "&an={}&aid={}&av={}&ul={}&ua={}",
        encode(context.app_name),
        encode(context.app_id),
        encode(context.app_version),
        encode(context.locale),
        encode(context.platform),
    );
    if let Some((width, height)) = context.surface_size {
        let _ = write!(url, "&sr={width}x{height}&vp={width}x{height}");
    }

    let _ = write!(
        url,
        "&geoid={}&uid={}",
        encode(context.location),
        encode(context.user_id),
    );

    for (key, value) in &hit.fields {
        let _ = write!(url, "&{key}={value}");
    }

    for dimension in &hit.dimensions {
        let _ = write!(url, "&cd{}={}", dimension.index, encode(&dimension.value));
    }
    for metric in &hit.metrics {
        let _ = write!(url, "&cm{}={}", metric.index, format_number(metric.value));
    }

    if context.session_start {
        url.push_str("&sc=start");
    }
    if context.anonymize_ip {
        url.push_str("&aip=1");
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn context<'a>() -> HitContext<'a> {
        HitContext {
            tracking_id: "UA-1234-5",
            client_id: "deadbeef",
            user_id: "",
            location: "",
            app_name: "Sample Game",
            app_id: "com.example.sample",
            app_version: "1.0",
            locale: "en-US",
            platform: "linux",
            surface_size: None,
            session_start: false,
            anonymize_ip: false,
        }
    }

    fn query_pairs(url: &str) -> HashMap<String, String> {
        url::Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn common_block_carries_identity_and_app_metadata() {
        let url = collect_url(
            "https://www.google-analytics.com/collect",
            &context(),
            &Hit::pageview("Main Menu"),
        );
        let pairs = query_pairs(&url);
        assert_eq!(pairs["v"], "1");
        assert_eq!(pairs["t"], "pageview");
        assert_eq!(pairs["tid"], "UA-1234-5");
        assert_eq!(pairs["cid"], "deadbeef");
        assert_eq!(pairs["an"], "Sample Game");
        assert_eq!(pairs["aid"], "com.example.sample");
        assert_eq!(pairs["av"], "1.0");
        assert_eq!(pairs["ul"], "en-US");
        assert_eq!(pairs["dp"], "Main Menu");
        assert_eq!(pairs["dt"], "Main Menu");
        assert!(!pairs.contains_key("sr"));
        assert!(!pairs.contains_key("sc"));
        assert!(!pairs.contains_key("aip"));
    }

    #[test]
    fn surface_size_duplicates_into_resolution_and_viewport() {
        let mut ctx = context();
        ctx.surface_size = Some((1920, 1080));
        let url = collect_url("https://example.test/collect", &ctx, &Hit::pageview("Menu"));
        let pairs = query_pairs(&url);
        assert_eq!(pairs["sr"], "1920x1080");
        assert_eq!(pairs["vp"], "1920x1080");
    }

    #[test]
    fn session_start_and_anonymize_flags_are_appended() {
        let mut ctx = context();
        ctx.session_start = true;
        ctx.anonymize_ip = true;
        let url = collect_url("https://example.test/collect", &ctx, &Hit::pageview("Menu"));
        let pairs = query_pairs(&url);
        assert_eq!(pairs["sc"], "start");
        assert_eq!(pairs["aip"], "1");
    }

    #[test]
    fn user_strings_are_percent_encoded() {
        let url = collect_url(
            "https://example.test/collect",
            &context(),
            &Hit::event("Shops & Vendors", "Buy Sword", "tier 1", 0.0),
        );
        assert!(url.contains("ec=Shops%20%26%20Vendors"));
        assert!(url.contains("ea=Buy%20Sword"));
        assert!(url.contains("el=tier%201"));
    }

    #[test]
    fn event_value_truncates_to_integer() {
        let url = collect_url(
            "https://example.test/collect",
            &context(),
            &Hit::event("Cat", "Act", "", 2.7),
        );
        assert_eq!(query_pairs(&url)["ev"], "2");
    }

    #[test]
    fn timing_label_is_optional() {
        let without = collect_url(
            "https://example.test/collect",
            &context(),
            &Hit::timing("Loading", "Level1", 250, None),
        );
        assert!(!query_pairs(&without).contains_key("utl"));

        let with = collect_url(
            "https://example.test/collect",
            &context(),
            &Hit::timing("Loading", "Level1", 250, Some("cold start")),
        );
        let pairs = query_pairs(&with);
        assert_eq!(pairs["utc"], "Loading");
        assert_eq!(pairs["utv"], "Level1");
        assert_eq!(pairs["utt"], "250");
        assert_eq!(pairs["utl"], "cold start");
    }

    #[test]
    fn dimensions_and_metrics_keep_input_order() {
        let hit = Hit::event("Cat", "Act", "", 0.0)
            .with_dimensions(vec![
                CustomDimension {
                    index: 9,
                    value: "first".into(),
                },
                CustomDimension {
                    index: 2,
                    value: "second".into(),
                },
            ])
            .with_metrics(vec![CustomMetric {
                index: 3,
                value: 2.5,
            }]);
        let url = collect_url("https://example.test/collect", &context(), &hit);
        let cd9 = url.find("cd9=first").unwrap();
        let cd2 = url.find("cd2=second").unwrap();
        assert!(cd9 < cd2);
        assert!(url.contains("cm3=2.5"));
    }

    #[test]
    fn exception_reports_description_and_fatal_flag() {
        let url = collect_url(
            "https://example.test/collect",
            &context(),
            &Hit::exception("null deref in pathfinding", false),
        );
        let pairs = query_pairs(&url);
        assert_eq!(pairs["t"], "exception");
        assert_eq!(pairs["exd"], "null deref in pathfinding");
        assert_eq!(pairs["exf"], "0");
    }
}
