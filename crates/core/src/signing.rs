//! HMAC-SHA256 signatures over spin outcomes.
//!
//! A signature binds the user, machine, odds version, reward, rarity,
//! timestamp and idempotency key of one spin. Anyone holding the server key
//! can later prove a stored result was issued by the server and not edited.
//!
//! There is a single static key. Rotating it makes every earlier signature
//! unverifiable.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::{to_rfc3339, DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// The ordered fields covered by a spin signature.
#[derive(Debug, Clone, Copy)]
pub struct SpinClaim<'a> {
    pub user_id: DbId,
    pub machine_id: DbId,
    pub probability_version_id: DbId,
    pub reward_id: DbId,
    pub rarity: &'a str,
    pub created_at: Timestamp,
    pub idempotency_key: &'a str,
}

impl SpinClaim<'_> {
    /// Pipe-delimited canonical payload.
    pub fn payload(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.user_id,
            self.machine_id,
            self.probability_version_id,
            self.reward_id,
            self.rarity,
            to_rfc3339(&self.created_at),
            self.idempotency_key,
        )
    }
}

/// Signs and verifies [`SpinClaim`]s with the server key.
#[derive(Clone)]
pub struct SpinSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for SpinSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinSigner").finish_non_exhaustive()
    }
}

impl SpinSigner {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length")
    }

    /// Lowercase hex HMAC-SHA256 of the claim payload.
    pub fn sign(&self, claim: &SpinClaim<'_>) -> String {
        let mut mac = self.mac();
        mac.update(claim.payload().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of a hex signature against the claim.
    pub fn verify(&self, claim: &SpinClaim<'_>, signature: &str) -> bool {
        let Some(expected) = hex::decode(signature) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(claim.payload().as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn claim<'a>(rarity: &'a str, key: &'a str) -> SpinClaim<'a> {
        SpinClaim {
            user_id: 7,
            machine_id: 1,
            probability_version_id: 3,
            reward_id: 42,
            rarity,
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            idempotency_key: key,
        }
    }

    #[test]
    fn payload_field_order_is_fixed() {
        assert_eq!(
            claim("Rare", "abc").payload(),
            "7|1|3|42|Rare|2026-01-02T03:04:05.000000Z|abc"
        );
    }

    #[test]
    fn signature_is_64_hex_chars_and_deterministic() {
        let signer = SpinSigner::new("server-key");
        let a = signer.sign(&claim("Rare", "abc"));
        let b = signer.sign(&claim("Rare", "abc"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn verify_accepts_own_signature() {
        let signer = SpinSigner::new("server-key");
        let sig = signer.sign(&claim("Epic", "k1"));
        assert!(signer.verify(&claim("Epic", "k1"), &sig));
    }

    #[test]
    fn verify_rejects_tampered_claim() {
        let signer = SpinSigner::new("server-key");
        let sig = signer.sign(&claim("Common", "k1"));
        assert!(!signer.verify(&claim("Legendary", "k1"), &sig));
        assert!(!signer.verify(&claim("Common", "k2"), &sig));
    }

    #[test]
    fn verify_rejects_other_key() {
        let sig = SpinSigner::new("key-a").sign(&claim("Rare", "k"));
        assert!(!SpinSigner::new("key-b").verify(&claim("Rare", "k"), &sig));
    }

    #[test]
    fn verify_rejects_malformed_hex() {
        let signer = SpinSigner::new("server-key");
        assert!(!signer.verify(&claim("Rare", "k"), "zz"));
        assert!(!signer.verify(&claim("Rare", "k"), "abc"));
    }
}
