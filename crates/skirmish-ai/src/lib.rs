//! Actor logic for SKIRMISH.
//!
//! Implements the per-actor state machine, the distance-threshold decision
//! policy for enemies, and the built-in archetype parameter table.

pub mod fsm;
pub mod policy;
pub mod profiles;

pub use skirmish_core as core;
