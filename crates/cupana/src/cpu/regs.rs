pub const NUM_REGS: usize = 16;
/// Register conventionally used as the program counter.
pub const PC: usize = 14;
/// Register conventionally used as the stack pointer.
pub const SP: usize = 15;

/// The general purpose register file.
///
/// PC and SP are ordinary slots; any instruction may target them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Registers {
    slots: [u16; NUM_REGS],
}

impl Registers {
    #[inline]
    pub fn get(&self, index: u8) -> u16 {
        self.slots[index as usize & 0x0F]
    }

    #[inline]
    pub fn set(&mut self, index: u8, value: u16) {
        self.slots[index as usize & 0x0F] = value;
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.slots[PC]
    }

    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.slots[PC] = value;
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.slots[SP]
    }

    #[inline]
    pub fn set_sp(&mut self, value: u16) {
        self.slots[SP] = value;
    }

    pub fn as_array(&self) -> &[u16; NUM_REGS] {
        &self.slots
    }
}

bitflags::bitflags! {
    /// The flags register.
    ///
    /// Layout (bit index):
    /// - bit 0: Zero
    /// - bit 1: Carry
    /// - bit 2: Negative
    /// - bit 3: Overflow
    /// - bit 4: Interrupt-Disabled
    /// - bit 5: Interrupt-Pending
    /// - bit 7: Halt
    /// - bits 6 and 8-15 are reserved and carried through RSI verbatim.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u16 {
        const ZERO = 1 << 0;
        const CARRY = 1 << 1;
        const NEGATIVE = 1 << 2;
        const OVERFLOW = 1 << 3;
        const INTERRUPT_DISABLED = 1 << 4;
        const INTERRUPT_PENDING = 1 << 5;
        const HALT = 1 << 7;

        /// Bits recomputed by every arithmetic, logic and compare instruction.
        const ARITHMETIC = Self::ZERO.bits()
            | Self::CARRY.bits()
            | Self::NEGATIVE.bits()
            | Self::OVERFLOW.bits();
    }
}
