// src/channel/i2c.rs

use crate::common::{
    error::ChannelFault,
    hal_traits::{RegisterAddress, RegisterBus},
};
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, Operation, SevenBitAddress};

/// [`RegisterBus`] over an `embedded-hal` I2C peripheral.
///
/// The register address goes out as a big-endian 16-bit pointer ahead of
/// every read and write.
#[derive(Debug)]
pub struct I2cRegisterBus<I2C> {
    i2c: I2C,
    device: SevenBitAddress,
}

impl<I2C: I2c> I2cRegisterBus<I2C> {
    pub fn new(i2c: I2C, device: SevenBitAddress) -> Self {
        I2cRegisterBus { i2c, device }
    }

    /// Releases the underlying I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus for I2cRegisterBus<I2C> {
    fn read_registers(&mut self, address: RegisterAddress, buf: &mut [u8]) -> Result<(), ChannelFault> {
        let pointer = address.0.to_be_bytes();
        self.i2c
            .write_read(self.device, &pointer, buf)
            .map_err(|e| fault_from_kind(e.kind()))
    }

    fn write_registers(&mut self, address: RegisterAddress, bytes: &[u8]) -> Result<(), ChannelFault> {
        let pointer = address.0.to_be_bytes();
        // Adjacent writes in one transaction go out without a repeated start.
        let mut ops = [Operation::Write(&pointer), Operation::Write(bytes)];
        self.i2c
            .transaction(self.device, &mut ops)
            .map_err(|e| fault_from_kind(e.kind()))
    }
}

fn fault_from_kind(kind: ErrorKind) -> ChannelFault {
    match kind {
        ErrorKind::NoAcknowledge(_) => ChannelFault::Nack,
        _ => ChannelFault::BusFault,
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource};

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockI2cError(ErrorKind);

    impl embedded_hal::i2c::Error for MockI2cError {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    // --- Mock I2C: 256-byte register file behind a 16-bit pointer ---
    struct MockI2c {
        memory: [u8; 256],
        pointer: usize,
        last_device: Option<u8>,
        fail_with: Option<ErrorKind>,
    }

    impl MockI2c {
        fn new() -> Self {
            MockI2c { memory: [0; 256], pointer: 0, last_device: None, fail_with: None }
        }
    }

    impl ErrorType for MockI2c {
        type Error = MockI2cError;
    }

    impl I2c for MockI2c {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if let Some(kind) = self.fail_with {
                return Err(MockI2cError(kind));
            }
            self.last_device = Some(address);
            let mut pointer_bytes = 0;
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        for byte in bytes.iter() {
                            if pointer_bytes < 2 {
                                self.pointer = (self.pointer << 8 | *byte as usize) & 0xffff;
                                pointer_bytes += 1;
                            } else {
                                self.memory[self.pointer] = *byte;
                                self.pointer += 1;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for byte in buf.iter_mut() {
                            *byte = self.memory[self.pointer];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_then_read_registers() {
        let mut bus = I2cRegisterBus::new(MockI2c::new(), 0x52);
        bus.write_registers(RegisterAddress(0x0010), &[0xaa, 0xbb]).unwrap();
        let mut buf = [0u8; 2];
        bus.read_registers(RegisterAddress(0x0010), &mut buf).unwrap();
        assert_eq!(buf, [0xaa, 0xbb]);

        let i2c = bus.release();
        assert_eq!(i2c.last_device, Some(0x52));
        assert_eq!(i2c.memory[0x10..0x12], [0xaa, 0xbb]);
    }

    #[test]
    fn test_nack_maps_to_nack() {
        let mut i2c = MockI2c::new();
        i2c.fail_with = Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        let mut bus = I2cRegisterBus::new(i2c, 0x52);
        let mut buf = [0u8; 1];
        assert_eq!(bus.read_registers(RegisterAddress(0), &mut buf), Err(ChannelFault::Nack));
    }

    #[test]
    fn test_other_errors_map_to_bus_fault() {
        let mut i2c = MockI2c::new();
        i2c.fail_with = Some(ErrorKind::ArbitrationLoss);
        let mut bus = I2cRegisterBus::new(i2c, 0x52);
        assert_eq!(bus.write_registers(RegisterAddress(0), &[1]), Err(ChannelFault::BusFault));
    }
}
