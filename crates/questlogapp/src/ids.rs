//! # Identifier Generation
//!
//! New records get a random (v4) UUID built from OS randomness. When the OS cannot
//! provide randomness, the generator degrades to a time-based id with a mixed
//! secondary component instead of failing. Those ids are still unique in practice
//! for a single-user tracker, but they lose the collision guarantees of a UUID, so
//! every fallback is reported with a `warn!`.

use crate::model::RecordId;
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Fills a buffer with random bytes.
pub type EntropySource = fn(&mut [u8]) -> Result<(), getrandom::Error>;

#[derive(Debug)]
pub struct IdGenerator {
    entropy: EntropySource,
    fallback_seq: Cell<u64>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::with_entropy(getrandom::getrandom)
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entropy(entropy: EntropySource) -> Self {
        Self {
            entropy,
            fallback_seq: Cell::new(0),
        }
    }

    pub fn generate(&self) -> RecordId {
        let mut bytes = [0u8; 16];
        match (self.entropy)(&mut bytes) {
            Ok(()) => {
                let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
                RecordId::new(id.to_string())
            }
            Err(err) => {
                let id = self.fallback_id();
                warn!(error = %err, id = %id, "randomness unavailable, using time-based record id");
                RecordId::new(id)
            }
        }
    }

    fn fallback_id(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let seq = self.fallback_seq.get();
        self.fallback_seq.set(seq.wrapping_add(1));

        let clock = (now.subsec_nanos() as u64) ^ ((std::process::id() as u64) << 32);
        let seed = mix(clock).wrapping_add(seq);
        format!(
            "{}{}",
            to_base36(now.as_millis() as u64),
            to_base36(mix(seed))
        )
    }
}

// splitmix64 finalizer
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn no_entropy(_buf: &mut [u8]) -> Result<(), getrandom::Error> {
        Err(getrandom::Error::UNSUPPORTED)
    }

    #[test]
    fn test_generates_v4_uuids() {
        let ids = IdGenerator::new();
        let id = ids.generate();
        let parsed = uuid::Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids = IdGenerator::new();
        let seen: HashSet<RecordId> = (0..1000).map(|_| ids.generate()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_fallback_when_randomness_is_unavailable() {
        let ids = IdGenerator::with_entropy(no_entropy);
        let seen: HashSet<RecordId> = (0..500).map(|_| ids.generate()).collect();
        assert_eq!(seen.len(), 500);
        for id in &seen {
            assert!(!id.is_unassigned());
            assert!(uuid::Uuid::parse_str(id.as_str()).is_err());
            assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
