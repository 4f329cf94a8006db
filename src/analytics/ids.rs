//! Identifier derivation for the per-installation client id and purchase
//! transaction ids.
//!
//! Both follow the same scheme: a SHA-1 digest over a seed string plus the
//! current timestamp, rendered as lowercase hex. Embedding the timestamp makes
//! transaction ids effectively unique per call and deliberately not
//! reproducible for an identical logical purchase.

use chrono::Utc;
use sha1::{Digest, Sha1};

use crate::analytics::constants::CLIENT_ID_SEED;

pub(crate) fn sha1_hex(data: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data.as_ref());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Derives a fresh client id. Called once per installation; the result is
/// persisted and reused on later runs.
pub(crate) fn derive_client_id() -> String {
    sha1_hex(format!("{CLIENT_ID_SEED}{}", Utc::now().to_rfc3339()))
}

/// Synthesizes the transaction id shared by the transaction/item hit pair of
/// a currency purchase.
pub(crate) fn derive_transaction_id(
    game_currency: &str,
    real_currency: &str,
    payment_provider: &str,
) -> String {
    sha1_hex(format!(
        "{game_currency}{real_currency}{payment_provider}{}",
        Utc::now().to_rfc3339()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest_matches() {
        assert_eq!(
            sha1_hex("The quick brown fox jumps over the lazy dog"),
            "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12"
        );
    }

    #[test]
    fn client_id_is_forty_hex_chars() {
        let id = derive_client_id();
        assert_eq!(id.len(), 40);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn repeated_purchases_get_distinct_transaction_ids() {
        let first = derive_transaction_id("Gold", "USD", "AppStore");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = derive_transaction_id("Gold", "USD", "AppStore");
        assert_ne!(first, second);
    }
}
