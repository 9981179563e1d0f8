// src/channel/mod.rs

// Channel implementations. The handler only depends on the traits in
// `common::hal_traits`; these are ready-made ways to satisfy them.

// Mutex-serialized sessions over any RegisterBus
#[cfg(feature = "std")]
pub mod synced;

// embedded-hal I2C adapter
#[cfg(feature = "impl-generic-hal")]
pub mod i2c;

#[cfg(feature = "std")]
pub use synced::{SyncedChannel, SyncedSession};

#[cfg(feature = "impl-generic-hal")]
pub use i2c::I2cRegisterBus;
