mod alu;
mod control;
mod stack;
mod system;
mod transfer;

use super::{Bus, Cpu, Instruction, Op};
use crate::fault::Fault;

impl Cpu {
    /// Execute a decoded instruction.
    ///
    /// PC already points past the instruction when this runs, so jumps and
    /// writes to R14 simply overwrite it. On error the caller restores the
    /// register file and flags; handlers perform their memory write (if
    /// any) only after every fallible read.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        pc: u16,
        instruction: &Instruction,
    ) -> Result<(), Fault> {
        match instruction.op {
            Op::Nop => Ok(()),
            Op::Hlt => {
                self.exec_hlt(pc);
                Ok(())
            }
            Op::Mov => self.exec_mov(bus, pc, instruction),
            Op::Phr => self.exec_phr(bus, pc, instruction),
            Op::Plr => self.exec_plr(bus, pc, instruction),

            Op::Add
            | Op::Sub
            | Op::Mul
            | Op::Div
            | Op::Mod
            | Op::And
            | Op::Or
            | Op::Xor
            | Op::Shl
            | Op::Shr
            | Op::Cmp => self.exec_binary(bus, pc, instruction),
            Op::Inc | Op::Dec | Op::Not => self.exec_unary(pc, instruction),

            Op::Jmp | Op::Jpc => self.exec_jump(pc, instruction),
            Op::Jsb => self.exec_jsb(bus, pc, instruction),
            Op::Rsb => self.exec_rsb(bus),

            Op::Cli => {
                self.exec_cli();
                Ok(())
            }
            Op::Sei => {
                self.exec_sei();
                Ok(())
            }
            Op::Rsi => self.exec_rsi(bus),
        }
    }
}
