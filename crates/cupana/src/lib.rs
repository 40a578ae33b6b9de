pub mod cpu;
pub mod fault;
pub mod image;
pub mod machine;

#[cfg(test)]
mod test_asm;

pub use cpu::{
    AddressingMode, Bus, Condition, Cpu, Flags, Instruction, InterruptState, Op, Operands,
    Registers, StepEvent, Target, Width,
};
pub use cupana_common::{Device, DeviceError, InterruptLine, SourceId, HOST_SOURCE};
pub use fault::{Fault, MapError};
pub use image::{Image, Segment};
pub use machine::{Machine, MachineConfig, Region, SystemBus};

/// Read-only program memory, writable only by the loader.
pub const ROM_BASE: u16 = 0x0000;
pub const ROM_END: u16 = 0x7FFF;
/// General purpose read-write memory.
pub const RAM_BASE: u16 = 0x8000;
pub const RAM_END: u16 = 0xDFFF;
/// Dedicated stack region. The stack grows upward from `STACK_BASE`.
pub const STACK_BASE: u16 = 0xE000;
pub const STACK_END: u16 = 0xEFFF;
/// Memory-mapped device window, forwarded to mapped peripherals.
pub const DEVICE_BASE: u16 = 0xF000;
pub const DEVICE_END: u16 = 0xFFFF;

/// Word slot holding the address execution starts at after reset.
pub const RESET_VECTOR: u16 = 0x7FFC;
/// Word slot holding the address of the interrupt service routine.
pub const INTERRUPT_VECTOR: u16 = 0x7FFE;

/// Total addressable memory (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;
