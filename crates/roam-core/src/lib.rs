//! Deterministic tick, RNG, and scheduling primitives for wandering agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod rng;
pub mod schedule;
pub mod tick;

pub use agent::AgentKey;
pub use rng::{derive_seed, mix64, DeterministicRng, SplitMix64};
pub use schedule::{Fired, Schedule};
pub use tick::TickContext;
