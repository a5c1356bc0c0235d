//! Core data models: reports, transactions, amounts, links, and the
//! polymorphic message trait.

pub mod amount;
pub mod denom;
pub mod link;
pub mod message;
pub mod query_info;
pub mod report;
pub mod tx;

pub use amount::Amount;
pub use denom::DenomInfo;
pub use link::Link;
pub use message::Message;
pub use query_info::QueryInfo;
pub use report::{Report, Reportable};
pub use tx::{NodeConnectError, Tx, TxError};

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest, used for transaction content hashes and
/// report dedup identities.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode_upper(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_is_stable() {
        assert_eq!(sha256_hex(b"abc"), sha256_hex(b"abc"));
        assert_ne!(sha256_hex(b"abc"), sha256_hex(b"abd"));
        assert_eq!(sha256_hex(b"").len(), 64);
    }
}
