use thiserror::Error;

use crate::irq::{InterruptLine, SourceId};

/// Errors a peripheral reports back to the memory router.
///
/// The router turns these into CPU faults carrying the absolute address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("no register at device offset 0x{0:03X}")]
    Unmapped(u16),
    #[error("device register at offset 0x{0:03X} is read-only")]
    ReadOnly(u16),
}

/// A peripheral occupying a slice of the device window.
///
/// Offsets passed to `read8`/`write8` are relative to the base the device
/// was mapped at. Devices must be `Send` so a machine can be driven from its
/// own thread; any state shared with host-side threads (input buffers, data
/// registers) is the device's responsibility to synchronise.
pub trait Device: Send {
    /// Number of bytes this device occupies in the window.
    fn size(&self) -> u16;

    fn read8(&mut self, offset: u16) -> Result<u8, DeviceError>;

    fn write8(&mut self, offset: u16, value: u8) -> Result<(), DeviceError>;

    /// Whether a write to `offset` would be accepted, without performing it.
    ///
    /// The router asks this for every byte of an access before writing any
    /// of them, so a rejected word write leaves the device untouched. A
    /// write that passes this check must not fail in `write8`.
    fn check_write(&self, _offset: u16) -> Result<(), DeviceError> {
        Ok(())
    }

    /// Read a little-endian word starting at `offset`.
    fn read16(&mut self, offset: u16) -> Result<u16, DeviceError> {
        let lo = self.read8(offset)?;
        let hi = self.read8(offset.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a little-endian word starting at `offset`.
    fn write16(&mut self, offset: u16, value: u16) -> Result<(), DeviceError> {
        let [lo, hi] = value.to_le_bytes();
        self.write8(offset, lo)?;
        self.write8(offset.wrapping_add(1), hi)
    }

    /// Called once when the device is mapped. Devices that raise interrupts
    /// keep the line and their source id.
    fn attach(&mut self, _line: InterruptLine, _source: SourceId) {}

    /// Hardware reset notification.
    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "device"
    }
}
