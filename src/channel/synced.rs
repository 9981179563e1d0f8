// src/channel/synced.rs

use crate::common::{
    error::ChannelFault,
    hal_traits::{RegisterAddress, RegisterBus, RegisterChannel},
};
use std::sync::{Mutex, MutexGuard};

/// Serializes every session on one bus behind a mutex.
///
/// Share it by reference or inside an `Arc` between the handlers bound to
/// the same device.
#[derive(Debug)]
pub struct SyncedChannel<B> {
    bus: Mutex<B>,
}

impl<B: RegisterBus> SyncedChannel<B> {
    pub fn new(bus: B) -> Self {
        SyncedChannel { bus: Mutex::new(bus) }
    }

    /// Returns the bus, or `ChannelFault::Busy` if a session panicked while holding it.
    pub fn into_inner(self) -> Result<B, ChannelFault> {
        self.bus.into_inner().map_err(|_| ChannelFault::Busy)
    }
}

impl<B: RegisterBus> RegisterChannel for SyncedChannel<B> {
    type Session<'a> = SyncedSession<'a, B> where Self: 'a;

    fn acquire(&self) -> Result<Self::Session<'_>, ChannelFault> {
        // A poisoned lock means a transaction was cut short; the bus state is unknown.
        let guard = self.bus.lock().map_err(|_| ChannelFault::Busy)?;
        Ok(SyncedSession { guard })
    }
}

/// Exclusive session on a [`SyncedChannel`]; releases the bus on drop.
#[derive(Debug)]
pub struct SyncedSession<'a, B> {
    guard: MutexGuard<'a, B>,
}

impl<B: RegisterBus> RegisterBus for SyncedSession<'_, B> {
    fn read_registers(&mut self, address: RegisterAddress, buf: &mut [u8]) -> Result<(), ChannelFault> {
        self.guard.read_registers(address, buf)
    }

    fn write_registers(&mut self, address: RegisterAddress, bytes: &[u8]) -> Result<(), ChannelFault> {
        self.guard.write_registers(address, bytes)
    }
}
