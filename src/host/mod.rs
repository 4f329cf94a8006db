//! Host-application context: what the embedding game declares about itself,
//! and the display-surface capability used to report screen/viewport size.

mod types;

pub use types::{DisplaySurface, FixedSurface, HostApp, NoSurface};
