// src/handler/map.rs

use crate::common::{
    cache::CacheField,
    codec::Encoding,
    hal_traits::RegisterAddress,
    property::{PropertyDescriptor, PropertyId, PropertyType},
};

/// Whether a register-backed property can be read, written, or both.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Access {
    /// Constant: every setter fails with `NotPermitted`.
    ReadOnly,
    ReadWrite,
    /// Setter only; getters report `UnknownProperty`.
    WriteOnly,
}

/// What a write or command does while the device is streaming output.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StreamPolicy {
    /// Allowed at any time.
    Free,
    /// Wrapped in the family's pause/resume commands inside one session.
    Pause,
    /// Fails with `NotPermitted` while streaming.
    Reject,
}

/// How one property maps onto the device.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Binding {
    /// Scalar read from / written to a register range.
    Register { address: RegisterAddress, encoding: Encoding, access: Access },
    /// Bool-over-int register whose last written value the cache serves.
    Cached { field: CacheField, address: RegisterAddress },
    /// One bit of the cached output-data bitset.
    OutputBit(u8),
    /// Bare command: an empty write to `address`.
    Command { address: RegisterAddress },
    /// Constant integer array known without asking the device.
    StaticArray(&'static [i32]),
    /// Fixed-length raw byte range, already in little-endian element layout.
    RegisterArray { address: RegisterAddress, len: usize, access: Access },
}

/// One recognized property of a device family.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PropertyEntry {
    pub id: PropertyId,
    /// Value type; the element type for arrays.
    pub ty: PropertyType,
    pub binding: Binding,
    pub stream: StreamPolicy,
}

impl PropertyEntry {
    pub const fn register(id: PropertyId, address: u16, encoding: Encoding, access: Access, stream: StreamPolicy) -> Self {
        let ty = match encoding {
            Encoding::BoolWord => PropertyType::Bool,
            Encoding::Int32 => PropertyType::Int32,
            Encoding::UInt64 => PropertyType::UInt64,
            Encoding::Float32 | Encoding::Float16 => PropertyType::Float,
        };
        PropertyEntry {
            id,
            ty,
            binding: Binding::Register { address: RegisterAddress(address), encoding, access },
            stream,
        }
    }

    pub const fn cached(id: PropertyId, field: CacheField, address: u16, stream: StreamPolicy) -> Self {
        PropertyEntry {
            id,
            ty: PropertyType::Bool,
            binding: Binding::Cached { field, address: RegisterAddress(address) },
            stream,
        }
    }

    /// `bit` indexes the 32-bit output bitset register.
    pub const fn output_bit(id: PropertyId, bit: u8) -> Self {
        assert!(bit < 32, "output bit out of range");
        PropertyEntry {
            id,
            ty: PropertyType::Bool,
            binding: Binding::OutputBit(bit),
            stream: StreamPolicy::Pause,
        }
    }

    pub const fn command(id: PropertyId, address: u16, stream: StreamPolicy) -> Self {
        PropertyEntry {
            id,
            ty: PropertyType::Unknown,
            binding: Binding::Command { address: RegisterAddress(address) },
            stream,
        }
    }

    pub const fn static_array(id: PropertyId, values: &'static [i32]) -> Self {
        PropertyEntry {
            id,
            ty: PropertyType::Int32,
            binding: Binding::StaticArray(values),
            stream: StreamPolicy::Free,
        }
    }

    pub const fn register_array(
        id: PropertyId,
        ty: PropertyType,
        address: u16,
        len: usize,
        access: Access,
        stream: StreamPolicy,
    ) -> Self {
        PropertyEntry {
            id,
            ty,
            binding: Binding::RegisterArray { address: RegisterAddress(address), len, access },
            stream,
        }
    }

    pub fn descriptor(&self) -> PropertyDescriptor {
        let (is_array, is_executable, is_constant) = match self.binding {
            Binding::Register { access, .. } => (false, false, access == Access::ReadOnly),
            Binding::Cached { .. } | Binding::OutputBit(_) => (false, false, false),
            Binding::Command { .. } => (false, true, false),
            Binding::StaticArray(_) => (true, false, true),
            Binding::RegisterArray { access, .. } => (true, false, access == Access::ReadOnly),
        };
        PropertyDescriptor { is_array, is_executable, is_constant, ty: self.ty }
    }

    /// Byte length of an array property; `None` for scalars and commands.
    pub fn array_len(&self) -> Option<usize> {
        match self.binding {
            Binding::StaticArray(values) => Some(values.len() * 4),
            Binding::RegisterArray { len, .. } => Some(len),
            _ => None,
        }
    }
}

/// The full property table of one device family.
#[derive(Debug)]
pub struct PropertyMap {
    pub entries: &'static [PropertyEntry],
    /// Command that stops the output stream, if the family streams.
    pub stream_pause: Option<RegisterAddress>,
    /// Command that restarts the output stream.
    pub stream_resume: Option<RegisterAddress>,
    /// Register receiving the output-data bitset as a 32-bit word.
    pub output_bitset: Option<RegisterAddress>,
}

impl PropertyMap {
    pub fn lookup(&self, id: PropertyId) -> Option<&'static PropertyEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn descriptor(&self, id: PropertyId) -> PropertyDescriptor {
        self.lookup(id)
            .map(PropertyEntry::descriptor)
            .unwrap_or(PropertyDescriptor::UNKNOWN)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    static RATES: [i32; 3] = [10, 50, 100];

    static MAP: PropertyMap = PropertyMap {
        entries: &[
            PropertyEntry::register(PropertyId::new(1), 0x10, Encoding::Int32, Access::ReadWrite, StreamPolicy::Free),
            PropertyEntry::register(PropertyId::new(2), 0x14, Encoding::BoolWord, Access::ReadOnly, StreamPolicy::Free),
            PropertyEntry::command(PropertyId::new(3), 0x20, StreamPolicy::Reject),
            PropertyEntry::static_array(PropertyId::new(4), &RATES),
            PropertyEntry::register_array(PropertyId::new(5), PropertyType::Byte, 0x30, 16, Access::ReadOnly, StreamPolicy::Free),
            PropertyEntry::output_bit(PropertyId::new(6), 2),
        ],
        stream_pause: None,
        stream_resume: None,
        output_bitset: Some(RegisterAddress(0x40)),
    };

    #[test]
    fn test_register_entry_derives_type_from_encoding() {
        let entry = PropertyEntry::register(PropertyId::new(9), 0, Encoding::Float16, Access::ReadWrite, StreamPolicy::Free);
        assert_eq!(entry.ty, PropertyType::Float);
        let entry = PropertyEntry::register(PropertyId::new(9), 0, Encoding::BoolWord, Access::ReadWrite, StreamPolicy::Free);
        assert_eq!(entry.ty, PropertyType::Bool);
    }

    #[test]
    fn test_descriptors() {
        let d = MAP.descriptor(PropertyId::new(1));
        assert_eq!(d, PropertyDescriptor { is_array: false, is_executable: false, is_constant: false, ty: PropertyType::Int32 });
        assert!(MAP.descriptor(PropertyId::new(2)).is_constant);
        assert!(MAP.descriptor(PropertyId::new(3)).is_executable);
        let d = MAP.descriptor(PropertyId::new(4));
        assert!(d.is_array && d.is_constant);
        assert_eq!(d.ty, PropertyType::Int32);
        assert!(MAP.descriptor(PropertyId::new(5)).is_array);
        assert!(MAP.descriptor(PropertyId::new(6)).is_settable());
    }

    #[test]
    fn test_unknown_id_descriptor() {
        assert_eq!(MAP.descriptor(PropertyId::new(999)), PropertyDescriptor::UNKNOWN);
        assert!(MAP.lookup(PropertyId::new(0)).is_none());
    }

    #[test]
    #[should_panic(expected = "output bit out of range")]
    fn test_output_bit_beyond_bitset_width_is_rejected() {
        let _ = PropertyEntry::output_bit(PropertyId::new(9), 32);
    }

    #[test]
    fn test_array_len() {
        assert_eq!(MAP.lookup(PropertyId::new(4)).unwrap().array_len(), Some(12));
        assert_eq!(MAP.lookup(PropertyId::new(5)).unwrap().array_len(), Some(16));
        assert_eq!(MAP.lookup(PropertyId::new(1)).unwrap().array_len(), None);
    }
}
