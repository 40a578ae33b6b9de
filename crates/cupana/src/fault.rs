use thiserror::Error;

/// A recoverable CPU fault, returned to the caller of `step`.
///
/// A faulting instruction leaves registers, flags and the program counter
/// as they were before it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("illegal instruction 0x{opcode:02X} at 0x{pc:04X}")]
    IllegalInstruction { pc: u16, opcode: u8 },
    #[error("write to protected address 0x{0:04X}")]
    MemoryProtection(u16),
    #[error("invalid or straddling access at 0x{0:04X}")]
    Address(u16),
    #[error("division by zero at 0x{0:04X}")]
    DivisionByZero(u16),
    #[error("stack overflow (SP=0x{0:04X})")]
    StackOverflow(u16),
    #[error("stack underflow (SP=0x{0:04X})")]
    StackUnderflow(u16),
}

/// Rejected device installation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("device '{name}' has zero size")]
    Empty { name: String },
    #[error("device '{name}' at offset 0x{offset:03X} (+0x{size:X}) does not fit the device window")]
    OutOfWindow { name: String, offset: u16, size: u16 },
    #[error("device '{name}' at offset 0x{offset:03X} overlaps '{existing}'")]
    Overlap {
        name: String,
        offset: u16,
        existing: String,
    },
}
