// src/common/hal_traits.rs

use super::error::ChannelFault;
use core::fmt;

/// Address of a register range on the device.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RegisterAddress(pub u16);

impl fmt::Display for RegisterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Abstraction for synchronous register I/O on a device.
///
/// `&mut self` is the exclusivity guarantee: whoever holds the bus owns it
/// for the whole transaction. Framing, addressing and integrity checks on
/// the wire are the implementation's business.
pub trait RegisterBus {
    /// Reads `buf.len()` bytes starting at `address`.
    fn read_registers(&mut self, address: RegisterAddress, buf: &mut [u8]) -> Result<(), ChannelFault>;

    /// Writes `bytes` starting at `address`.
    ///
    /// An empty write is a bare command: the device acts on the address alone.
    fn write_registers(&mut self, address: RegisterAddress, bytes: &[u8]) -> Result<(), ChannelFault>;
}

/// A shared channel to one device, handing out exclusive sessions.
///
/// A session is held for one logical property operation. No two sessions
/// of the same channel are alive at once, so register transactions issued
/// by concurrent callers never interleave. Blocking duration and timeouts
/// are the channel's own policy.
pub trait RegisterChannel {
    /// Exclusive access to the bus; released on drop.
    type Session<'a>: RegisterBus
    where
        Self: 'a;

    /// Blocks until exclusive access is available.
    fn acquire(&self) -> Result<Self::Session<'_>, ChannelFault>;
}

impl<C: RegisterChannel + ?Sized> RegisterChannel for &C {
    type Session<'a> = C::Session<'a> where Self: 'a;

    fn acquire(&self) -> Result<Self::Session<'_>, ChannelFault> {
        (**self).acquire()
    }
}

#[cfg(feature = "alloc")]
impl<C: RegisterChannel + ?Sized> RegisterChannel for alloc::sync::Arc<C> {
    type Session<'a> = C::Session<'a> where Self: 'a;

    fn acquire(&self) -> Result<Self::Session<'_>, ChannelFault> {
        (**self).acquire()
    }
}
