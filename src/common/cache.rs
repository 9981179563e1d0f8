// src/common/cache.rs

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Plain snapshot of the cached device configuration.
///
/// Used to seed a handler before its first device interaction.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct CachedState {
    /// Angles are output in radians instead of degrees.
    pub rad_output: bool,
    /// Floats in the output stream are 16 bit instead of 32 bit.
    pub low_precision_mode: bool,
    /// One bit per enabled output channel.
    pub output_data_bitset: u32,
}

/// Names one field of the state cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CacheField {
    RadOutput,
    LowPrecisionMode,
}

/// Configuration flags mirrored from the device, readable without a channel round trip.
///
/// Every field is its own atomic with `Relaxed` ordering. The fields are
/// independent: reading two of them in sequence is not a joint snapshot.
/// Stores happen only after the matching device write was confirmed.
#[derive(Debug, Default)]
pub struct StateCache {
    rad_output: AtomicBool,
    low_precision_mode: AtomicBool,
    output_data_bitset: AtomicU32,
}

impl StateCache {
    pub fn new(state: CachedState) -> Self {
        StateCache {
            rad_output: AtomicBool::new(state.rad_output),
            low_precision_mode: AtomicBool::new(state.low_precision_mode),
            output_data_bitset: AtomicU32::new(state.output_data_bitset),
        }
    }

    #[inline]
    pub fn rad_output(&self) -> bool {
        self.rad_output.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn low_precision_mode(&self) -> bool {
        self.low_precision_mode.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn output_data_bitset(&self) -> u32 {
        self.output_data_bitset.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flag(&self, field: CacheField) -> bool {
        match field {
            CacheField::RadOutput => self.rad_output(),
            CacheField::LowPrecisionMode => self.low_precision_mode(),
        }
    }

    pub(crate) fn store_flag(&self, field: CacheField, value: bool) {
        match field {
            CacheField::RadOutput => self.rad_output.store(value, Ordering::Relaxed),
            CacheField::LowPrecisionMode => self.low_precision_mode.store(value, Ordering::Relaxed),
        }
    }

    pub(crate) fn store_output_data_bitset(&self, bitset: u32) {
        self.output_data_bitset.store(bitset, Ordering::Relaxed);
    }

    /// Field-by-field copy; not an atomic snapshot across fields.
    pub fn snapshot(&self) -> CachedState {
        CachedState {
            rad_output: self.rad_output(),
            low_precision_mode: self.low_precision_mode(),
            output_data_bitset: self.output_data_bitset(),
        }
    }
}

/// Set by the external streaming controller while the device streams output.
///
/// The property handler only reads it.
#[derive(Debug, Default)]
pub struct StreamingFlag(AtomicBool);

impl StreamingFlag {
    pub const fn new(streaming: bool) -> Self {
        StreamingFlag(AtomicBool::new(streaming))
    }

    #[inline]
    pub fn is_streaming(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, streaming: bool) {
        self.0.store(streaming, Ordering::Relaxed);
    }
}
