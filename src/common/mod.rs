// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod cache;
pub mod codec;
pub mod error;
pub mod hal_traits;
pub mod property;

// --- Re-export key types/traits for easier access ---

// From cache.rs
pub use cache::{CacheField, CachedState, StateCache, StreamingFlag};

// From codec.rs
pub use codec::{Encoding, FloatWidth, ScalarValue};

// From error.rs
pub use error::{ChannelFault, PropertyError};

// From hal_traits.rs
pub use hal_traits::{RegisterAddress, RegisterBus, RegisterChannel};

// From property.rs
pub use property::{PropertyDescriptor, PropertyId, PropertyType};
