pub mod device;
pub mod irq;

pub use device::{Device, DeviceError};
pub use irq::{InterruptLine, SourceId, HOST_SOURCE};

/// Size of the memory-mapped device window in bytes.
pub const DEVICE_WINDOW_SIZE: u16 = 0x1000;
