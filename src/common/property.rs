// src/common/property.rs

use core::fmt;

/// Opaque token identifying one property or command of a device.
///
/// The upstream facade passes these as plain integers; the set of ids a
/// handler recognizes is fixed by its device family.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct PropertyId(u32);

impl PropertyId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        PropertyId(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for PropertyId {
    fn from(value: u32) -> Self {
        PropertyId(value)
    }
}

impl From<PropertyId> for u32 {
    fn from(value: PropertyId) -> Self {
        value.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value type of a property. For array properties this is the element type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum PropertyType {
    /// Reported for ids the handler does not recognize.
    Unknown = 0,
    Byte = 1,
    Bool = 2,
    Float = 3,
    Int32 = 4,
    UInt64 = 5,
}

impl PropertyType {
    /// Tries to convert a facade type tag into a `PropertyType`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PropertyType::Unknown),
            1 => Some(PropertyType::Byte),
            2 => Some(PropertyType::Bool),
            3 => Some(PropertyType::Float),
            4 => Some(PropertyType::Int32),
            5 => Some(PropertyType::UInt64),
            _ => None,
        }
    }

    /// Size in bytes of one element of this type in an array buffer.
    /// Returns 0 for `Unknown`.
    pub fn element_size(&self) -> usize {
        match self {
            PropertyType::Unknown => 0,
            PropertyType::Byte => 1,
            PropertyType::Bool => 1,
            PropertyType::Float => 4,
            PropertyType::Int32 => 4,
            PropertyType::UInt64 => 8,
        }
    }
}

/// Derived metadata for one property id.
///
/// An executable id is only valid for `execute`; a constant id rejects
/// every setter. The two never overlap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PropertyDescriptor {
    pub is_array: bool,
    pub is_executable: bool,
    pub is_constant: bool,
    pub ty: PropertyType,
}

impl PropertyDescriptor {
    /// Descriptor reported for unrecognized ids.
    pub const UNKNOWN: PropertyDescriptor = PropertyDescriptor {
        is_array: false,
        is_executable: false,
        is_constant: false,
        ty: PropertyType::Unknown,
    };

    /// True when a typed setter may be attempted on this property.
    #[inline]
    pub const fn is_settable(&self) -> bool {
        !self.is_executable && !self.is_constant && !matches!(self.ty, PropertyType::Unknown)
    }
}
