//! Directional relayer engine for a base-layer/rollup bridge: drives
//! cross-domain messages from `Pending` to a terminal status on the
//! destination chain, and keeps a gas-price oracle synchronized with the
//! opposite chain's base fee. See spec.md and SPEC_FULL.md for the full
//! design.

pub mod block;
pub mod config;
pub mod direction;
pub mod error;
pub mod gas_oracle;
pub mod message;
pub mod metrics;
pub mod reactor;
pub mod relayer;
pub mod revert;
pub mod sender;
pub mod store;

/// Fakes for exercising a `RelayerInstance` without a real database or
/// chain connection. Not behind a feature flag — a fixture this small and
/// this central to the crate's own test suite is simpler kept always
/// available than threaded through Cargo feature unification.
pub mod testing;
