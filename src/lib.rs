// src/lib.rs

//! Typed property access for sensor drivers that talk to their device
//! through a register-oriented channel.
//!
//! A [`handler::RegisterProperties`] turns `get`/`set`/`execute` calls on
//! [`PropertyId`]s into register transactions, serialized through a
//! [`RegisterChannel`] session, and serves a few often-read configuration
//! flags from a lock-free [`common::cache::StateCache`].

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless std or testing

#[cfg(feature = "alloc")]
extern crate alloc;

// Tracing hooks, compiled out unless the `log` feature is on.
macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
    }};
}

pub mod channel;
pub mod common;
pub mod handler;

// Re-export key types for convenience
pub use common::{PropertyError, PropertyId, PropertyType, RegisterChannel};
pub use handler::{DeviceFamily, RegisterProperties, SensorProperties};
