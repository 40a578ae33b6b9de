use super::{Bus, Cpu, Flags, Instruction, Width};
use crate::fault::Fault;
use crate::STACK_BASE;

/// One past the last stack byte.
const STACK_LIMIT: u32 = crate::STACK_END as u32 + 1;

impl Cpu {
    /// Register `index` masked to the operation width.
    #[inline]
    pub(super) fn read_reg(&self, index: u8, width: Width) -> u16 {
        self.regs.get(index) & width.mask()
    }

    /// Store a result. Byte-mode results are zero-extended, so the high
    /// byte of the register ends up clear.
    #[inline]
    pub(super) fn write_reg(&mut self, index: u8, value: u16, width: Width) {
        self.regs.set(index, value & width.mask());
    }

    /// Replace Z, C, N and V, leaving the control bits alone.
    #[inline]
    pub(super) fn merge_arithmetic(&mut self, flags: Flags) {
        self.flags = (self.flags - Flags::ARITHMETIC) | (flags & Flags::ARITHMETIC);
    }

    pub(super) fn illegal(&self, pc: u16, instruction: &Instruction) -> Fault {
        Fault::IllegalInstruction {
            pc,
            opcode: instruction.first_byte(),
        }
    }

    /// Fail unless `bytes` more bytes can be pushed at the current SP.
    pub(super) fn check_push_room(&self, bytes: u32) -> Result<(), Fault> {
        let sp = self.regs.sp();
        let top = sp as u32;
        if sp < STACK_BASE || top > STACK_LIMIT {
            return Err(Fault::Address(sp));
        }
        if top + bytes > STACK_LIMIT {
            return Err(Fault::StackOverflow(sp));
        }
        Ok(())
    }

    /// Write `value` at SP, then advance SP by the width.
    pub(super) fn push<B: Bus>(
        &mut self,
        bus: &mut B,
        value: u16,
        width: Width,
    ) -> Result<(), Fault> {
        self.check_push_room(width.bytes() as u32)?;
        let sp = self.regs.sp();
        bus.write(sp, value & width.mask(), width)?;
        self.regs.set_sp(sp + width.bytes());
        Ok(())
    }

    /// Move SP back by the width, then read the value found there.
    pub(super) fn pull<B: Bus>(&mut self, bus: &mut B, width: Width) -> Result<u16, Fault> {
        let sp = self.regs.sp();
        let top = sp as u32;
        if sp < STACK_BASE || top > STACK_LIMIT {
            return Err(Fault::Address(sp));
        }
        let bytes = width.bytes();
        if top < STACK_BASE as u32 + bytes as u32 {
            return Err(Fault::StackUnderflow(sp));
        }
        let value = bus.read(sp - bytes, width)?;
        self.regs.set_sp(sp - bytes);
        Ok(value)
    }
}
