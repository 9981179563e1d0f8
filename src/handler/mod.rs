// src/handler/mod.rs

//! The property handler: typed get/set/execute over a register channel.
//!
//! A handler is bound to one [`RegisterChannel`] and one [`DeviceFamily`]
//! for the lifetime of the device. Each call that needs the device holds
//! one channel session from its first register transaction to its last,
//! and cache fields are stored before that session is released.

pub mod family;
pub mod map;


pub use family::DeviceFamily;
pub use map::{Access, Binding, PropertyEntry, PropertyMap, StreamPolicy};

use crate::common::{
    cache::{CachedState, StateCache, StreamingFlag},
    codec::{self, FloatWidth, ScalarValue, MAX_SCALAR_WIDTH},
    error::PropertyError,
    hal_traits::{RegisterAddress, RegisterBus, RegisterChannel},
    property::{PropertyDescriptor, PropertyId, PropertyType},
};

/// Typed property contract every device handler fulfils.
///
/// Getters never change state. Setters either apply completely or fail
/// without touching the cache. Metadata queries never fail: unknown ids
/// report `false` / [`PropertyType::Unknown`].
///
/// A type the device family has no property of (say `u64`) is reported as
/// [`PropertyError::UnknownProperty`] like any other unrecognized id.
pub trait SensorProperties {
    /// Triggers the device command behind an executable id.
    fn execute(&self, property: PropertyId) -> Result<(), PropertyError>;

    /// Fills `buffer` with the property's elements and returns the bytes written.
    ///
    /// If `buffer` is too short, fails with `InsufficientBuffer` carrying the
    /// required size. Buffer contents are unspecified after any failure.
    fn get_array(&self, property: PropertyId, ty: PropertyType, buffer: &mut [u8]) -> Result<usize, PropertyError>;

    fn get_bool(&self, property: PropertyId) -> Result<bool, PropertyError>;

    fn get_float(&self, property: PropertyId) -> Result<f32, PropertyError>;

    fn get_int32(&self, property: PropertyId) -> Result<i32, PropertyError>;

    fn get_uint64(&self, property: PropertyId) -> Result<u64, PropertyError>;

    /// `buffer` must be exactly the property's byte length.
    fn set_array(&self, property: PropertyId, ty: PropertyType, buffer: &[u8]) -> Result<(), PropertyError>;

    fn set_bool(&self, property: PropertyId, value: bool) -> Result<(), PropertyError>;

    fn set_float(&self, property: PropertyId, value: f32) -> Result<(), PropertyError>;

    fn set_int32(&self, property: PropertyId, value: i32) -> Result<(), PropertyError>;

    fn set_uint64(&self, property: PropertyId, value: u64) -> Result<(), PropertyError>;

    fn is_array(&self, property: PropertyId) -> bool;

    fn is_executable(&self, property: PropertyId) -> bool;

    /// Constant properties cannot be set.
    fn is_constant(&self, property: PropertyId) -> bool;

    fn property_type(&self, property: PropertyId) -> PropertyType;

    fn descriptor(&self, property: PropertyId) -> PropertyDescriptor {
        PropertyDescriptor {
            is_array: self.is_array(property),
            is_executable: self.is_executable(property),
            is_constant: self.is_constant(property),
            ty: self.property_type(property),
        }
    }
}

/// Table-driven handler serving one [`DeviceFamily`] over a register channel.
#[derive(Debug)]
pub struct RegisterProperties<C> {
    channel: C,
    map: &'static PropertyMap,
    cache: StateCache,
    streaming: StreamingFlag,
}

impl<C: RegisterChannel> RegisterProperties<C> {
    pub fn new(channel: C, family: DeviceFamily) -> Self {
        debug!("binding property handler to {:?}", family);
        Self::with_map(channel, family.map())
    }

    /// Binds the handler to a caller-built property map.
    pub fn with_map(channel: C, map: &'static PropertyMap) -> Self {
        RegisterProperties {
            channel,
            map,
            cache: StateCache::default(),
            streaming: StreamingFlag::default(),
        }
    }

    /// Seeds the cache with the device's known configuration.
    ///
    /// Consumes the handler, so it can only happen before the handler is
    /// shared and used.
    pub fn with_cached_state(mut self, state: CachedState) -> Self {
        debug!("seeding property cache: {:?}", state);
        self.cache = StateCache::new(state);
        self
    }

    /// The flag the streaming controller sets while output is streaming.
    pub fn streaming_flag(&self) -> &StreamingFlag {
        &self.streaming
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    /// If true, angles in the output stream are in radians.
    pub fn rad_output(&self) -> bool {
        self.cache.rad_output()
    }

    /// If true, floats in the output stream are 16 bit.
    pub fn low_precision_mode(&self) -> bool {
        self.cache.low_precision_mode()
    }

    pub fn output_data_bitset(&self) -> u32 {
        self.cache.output_data_bitset()
    }

    /// Width of floats in the output stream, from the cached precision mode.
    pub fn output_float_width(&self) -> FloatWidth {
        if self.cache.low_precision_mode() {
            FloatWidth::Half
        } else {
            FloatWidth::Single
        }
    }

    pub fn map(&self) -> &'static PropertyMap {
        self.map
    }

    /// Releases the channel.
    pub fn release(self) -> C {
        self.channel
    }

    // --- Lookup helpers ---

    fn scalar_entry(&self, property: PropertyId, ty: PropertyType) -> Result<&'static PropertyEntry, PropertyError> {
        match self.map.lookup(property) {
            Some(entry) if entry.ty == ty && entry.array_len().is_none() => Ok(entry),
            _ => Err(PropertyError::UnknownProperty),
        }
    }

    fn array_entry(&self, property: PropertyId, ty: PropertyType) -> Result<(&'static PropertyEntry, usize), PropertyError> {
        match self.map.lookup(property) {
            Some(entry) if entry.ty == ty => entry
                .array_len()
                .map(|len| (entry, len))
                .ok_or(PropertyError::UnknownProperty),
            _ => Err(PropertyError::UnknownProperty),
        }
    }

    // --- Core get/set ---

    fn get_scalar(&self, property: PropertyId, ty: PropertyType) -> Result<ScalarValue, PropertyError> {
        let entry = self.scalar_entry(property, ty)?;
        match entry.binding {
            Binding::Register { address, encoding, access } => {
                if access == Access::WriteOnly {
                    return Err(PropertyError::UnknownProperty);
                }
                let mut raw = [0u8; MAX_SCALAR_WIDTH];
                let raw = &mut raw[..encoding.width()];
                let mut session = self.channel.acquire()?;
                read(&mut session, address, raw)?;
                Ok(codec::decode_scalar(encoding, raw))
            }
            Binding::Cached { field, .. } => Ok(ScalarValue::Bool(self.cache.flag(field))),
            Binding::OutputBit(bit) => Ok(ScalarValue::Bool(self.cache.output_data_bitset() & (1 << bit) != 0)),
            Binding::Command { .. } | Binding::StaticArray(_) | Binding::RegisterArray { .. } => {
                Err(PropertyError::UnknownProperty)
            }
        }
    }

    /// Constants reject every setter, whatever its type.
    fn reject_constant(&self, property: PropertyId) -> Result<(), PropertyError> {
        if self.map.descriptor(property).is_constant {
            return Err(PropertyError::NotPermitted);
        }
        Ok(())
    }

    fn set_scalar(&self, property: PropertyId, ty: PropertyType, value: ScalarValue) -> Result<(), PropertyError> {
        self.reject_constant(property)?;
        let entry = self.scalar_entry(property, ty)?;

        match entry.binding {
            Binding::Register { address, encoding, .. } => {
                let bytes = codec::encode_scalar(encoding, value);
                let mut session = self.channel.acquire()?;
                self.gated(&mut session, entry.stream, |bus| write(bus, address, &bytes))
            }
            Binding::Cached { field, address } => {
                let flag = value.as_bool();
                let mut session = self.channel.acquire()?;
                self.gated(&mut session, entry.stream, |bus| {
                    write(bus, address, &codec::encode_bool_word(flag))
                })?;
                self.cache.store_flag(field, flag);
                Ok(())
            }
            Binding::OutputBit(bit) => {
                let register = self.map.output_bitset.ok_or(PropertyError::UnknownProperty)?;
                let mut session = self.channel.acquire()?;
                // Read-modify-write under the session, so concurrent bit updates are not lost.
                let current = self.cache.output_data_bitset();
                let updated = if value.as_bool() { current | (1 << bit) } else { current & !(1 << bit) };
                self.gated(&mut session, entry.stream, |bus| write(bus, register, &updated.to_le_bytes()))?;
                self.cache.store_output_data_bitset(updated);
                Ok(())
            }
            Binding::Command { .. } | Binding::StaticArray(_) | Binding::RegisterArray { .. } => {
                Err(PropertyError::UnknownProperty)
            }
        }
    }

    // --- Streaming gate ---

    /// Runs `op` on the session, bracketed by pause/resume commands when the policy asks for it.
    ///
    /// The streaming flag is read once, with the session already held. The
    /// resume command goes out even if `op` failed; `op`'s error wins.
    fn gated<B, T, F>(&self, bus: &mut B, policy: StreamPolicy, op: F) -> Result<T, PropertyError>
    where
        B: RegisterBus,
        F: FnOnce(&mut B) -> Result<T, PropertyError>,
    {
        if !self.streaming.is_streaming() {
            return op(bus);
        }
        let (pause, resume) = match (policy, self.map.stream_pause, self.map.stream_resume) {
            (StreamPolicy::Free, ..) => return op(bus),
            (StreamPolicy::Pause, Some(pause), Some(resume)) => (pause, resume),
            // Without stream-control commands a pause cannot be honoured.
            (StreamPolicy::Pause, ..) | (StreamPolicy::Reject, ..) => return Err(PropertyError::NotPermitted),
        };

        write(bus, pause, &[])?;
        let result = op(bus);
        let resumed = write(bus, resume, &[]);
        let value = result?;
        resumed?;
        Ok(value)
    }
}

impl<C: RegisterChannel> SensorProperties for RegisterProperties<C> {
    fn execute(&self, property: PropertyId) -> Result<(), PropertyError> {
        let entry = self.map.lookup(property).ok_or(PropertyError::UnknownProperty)?;
        let Binding::Command { address } = entry.binding else {
            return Err(PropertyError::UnknownProperty);
        };
        let mut session = self.channel.acquire()?;
        self.gated(&mut session, entry.stream, |bus| write(bus, address, &[]))
    }

    fn get_array(&self, property: PropertyId, ty: PropertyType, buffer: &mut [u8]) -> Result<usize, PropertyError> {
        let (entry, required) = self.array_entry(property, ty)?;
        if let Binding::RegisterArray { access: Access::WriteOnly, .. } = entry.binding {
            return Err(PropertyError::UnknownProperty);
        }
        if buffer.len() < required {
            return Err(PropertyError::InsufficientBuffer { required, got: buffer.len() });
        }

        let out = &mut buffer[..required];
        match entry.binding {
            Binding::StaticArray(values) => Ok(codec::encode_i32_array(values, out)),
            Binding::RegisterArray { address, .. } => {
                let mut session = self.channel.acquire()?;
                read(&mut session, address, out)?;
                Ok(required)
            }
            _ => Err(PropertyError::UnknownProperty),
        }
    }

    fn get_bool(&self, property: PropertyId) -> Result<bool, PropertyError> {
        self.get_scalar(property, PropertyType::Bool).map(|v| v.as_bool())
    }

    fn get_float(&self, property: PropertyId) -> Result<f32, PropertyError> {
        self.get_scalar(property, PropertyType::Float).map(|v| v.as_f32())
    }

    fn get_int32(&self, property: PropertyId) -> Result<i32, PropertyError> {
        self.get_scalar(property, PropertyType::Int32).map(|v| v.as_i32())
    }

    fn get_uint64(&self, property: PropertyId) -> Result<u64, PropertyError> {
        self.get_scalar(property, PropertyType::UInt64).map(|v| v.as_u64())
    }

    fn set_array(&self, property: PropertyId, ty: PropertyType, buffer: &[u8]) -> Result<(), PropertyError> {
        self.reject_constant(property)?;
        let (entry, expected) = self.array_entry(property, ty)?;
        let Binding::RegisterArray { address, access: Access::ReadWrite | Access::WriteOnly, .. } = entry.binding else {
            return Err(PropertyError::NotPermitted);
        };
        if buffer.len() != expected {
            return Err(PropertyError::SizeMismatch { expected, got: buffer.len() });
        }
        let mut session = self.channel.acquire()?;
        self.gated(&mut session, entry.stream, |bus| write(bus, address, buffer))
    }

    fn set_bool(&self, property: PropertyId, value: bool) -> Result<(), PropertyError> {
        self.set_scalar(property, PropertyType::Bool, ScalarValue::Bool(value))
    }

    fn set_float(&self, property: PropertyId, value: f32) -> Result<(), PropertyError> {
        self.set_scalar(property, PropertyType::Float, ScalarValue::Float(value))
    }

    fn set_int32(&self, property: PropertyId, value: i32) -> Result<(), PropertyError> {
        self.set_scalar(property, PropertyType::Int32, ScalarValue::Int32(value))
    }

    fn set_uint64(&self, property: PropertyId, value: u64) -> Result<(), PropertyError> {
        self.set_scalar(property, PropertyType::UInt64, ScalarValue::UInt64(value))
    }

    fn is_array(&self, property: PropertyId) -> bool {
        self.map.descriptor(property).is_array
    }

    fn is_executable(&self, property: PropertyId) -> bool {
        self.map.descriptor(property).is_executable
    }

    fn is_constant(&self, property: PropertyId) -> bool {
        self.map.descriptor(property).is_constant
    }

    fn property_type(&self, property: PropertyId) -> PropertyType {
        self.map.descriptor(property).ty
    }

    fn descriptor(&self, property: PropertyId) -> PropertyDescriptor {
        self.map.descriptor(property)
    }
}

// --- Traced register I/O ---

fn read<B: RegisterBus>(bus: &mut B, address: RegisterAddress, buf: &mut [u8]) -> Result<(), PropertyError> {
    let result = bus.read_registers(address, buf);
    trace!("read {} bytes at {}: {:?}", buf.len(), address, result);
    result.map_err(PropertyError::from)
}

fn write<B: RegisterBus>(bus: &mut B, address: RegisterAddress, bytes: &[u8]) -> Result<(), PropertyError> {
    let result = bus.write_registers(address, bytes);
    trace!("write {} bytes at {}: {:?}", bytes.len(), address, result);
    result.map_err(PropertyError::from)
}
