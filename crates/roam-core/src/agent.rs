#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable numeric key for an agent.
///
/// Agents are configured with string ids; deterministic simulation needs a
/// stable ordering and a stable number to seed per-agent RNG streams, so the
/// key is an FNV-1a hash of the configured id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentKey(pub u64);

impl AgentKey {
    pub fn from_name(name: &str) -> Self {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = OFFSET;
        for byte in name.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(PRIME);
        }
        Self(hash)
    }

    pub fn stable_id(self) -> u64 {
        self.0
    }
}
