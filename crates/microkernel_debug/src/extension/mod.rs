//! Host hook contracts.
//!
//! This module defines the hook points a host kernel exposes, the latch
//! registration capability extensions depend on, and an in-process registry
//! that dispatches latches. Module resolution and state-machine semantics
//! belong to the host and are not modelled here.

pub mod hook;
pub mod kernel;
