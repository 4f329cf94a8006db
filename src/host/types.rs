use crate::analytics::constants::DEFAULT_APP_VERSION;

/// Descriptor of the embedding application, reported in the common parameter
/// block of every hit (`an`, `aid`, `av`, `ul`, `ua`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostApp {
    /// Name the host application declares for itself. Used for `an` unless
    /// the provider settings override it.
    pub product_name: String,
    /// Store/bundle identifier (`aid`). May be empty.
    pub app_id: String,
    /// Application version (`av`).
    pub version: String,
    /// Current culture/locale tag (`ul`), e.g. `en-US`.
    pub locale: String,
    /// Platform tag (`ua`), e.g. `windows`, `linux`, `macos`.
    pub platform: String,
}

impl HostApp {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}

impl Default for HostApp {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            app_id: String::new(),
            version: DEFAULT_APP_VERSION.to_string(),
            locale: "en-US".to_string(),
            platform: std::env::consts::OS.to_string(),
        }
    }
}

/// Supplies the current display surface size. Each built hit queries this so
/// resolution changes between hits are reflected on the wire.
pub trait DisplaySurface: Send + Sync {
    fn surface_size(&self) -> Option<(u32, u32)>;
}

/// Surface of a host without a window (dedicated servers, tests). Hits omit
/// the resolution/viewport fields entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSurface;

impl DisplaySurface for NoSurface {
    fn surface_size(&self) -> Option<(u32, u32)> {
        None
    }
}

/// Surface with a size fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct FixedSurface {
    pub width: u32,
    pub height: u32,
}

impl FixedSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl DisplaySurface for FixedSurface {
    fn surface_size(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_version_and_platform() {
        let host = HostApp::new("Sample Game");
        assert_eq!(host.product_name, "Sample Game");
        assert_eq!(host.version, "1.0");
        assert!(!host.platform.is_empty());
    }

    #[test]
    fn builder_overrides_stick() {
        let host = HostApp::new("Sample Game")
            .with_app_id("com.example.sample")
            .with_version("2.1.0")
            .with_locale("pl-PL")
            .with_platform("windows");
        assert_eq!(host.app_id, "com.example.sample");
        assert_eq!(host.version, "2.1.0");
        assert_eq!(host.locale, "pl-PL");
        assert_eq!(host.platform, "windows");
    }

    #[test]
    fn surfaces_report_their_size() {
        assert_eq!(NoSurface.surface_size(), None);
        assert_eq!(FixedSurface::new(800, 600).surface_size(), Some((800, 600)));
    }
}
