use crate::cpu::{Bus, Cpu, Instruction, Operands};
use crate::fault::Fault;

impl Cpu {
    pub(super) fn exec_mov<B: Bus>(
        &mut self,
        bus: &mut B,
        pc: u16,
        instruction: &Instruction,
    ) -> Result<(), Fault> {
        let width = instruction.width;
        match instruction.operands {
            Operands::RegisterPair { dst, src } => {
                let value = self.read_reg(src, width);
                self.write_reg(dst, value, width);
            }
            Operands::Immediate { dst, imm } => self.write_reg(dst, imm, width),
            Operands::IndirectDestination { addr, src } => {
                let value = self.read_reg(src, width);
                bus.write(self.regs.get(addr), value, width)?;
            }
            Operands::IndirectSource { dst, addr } => {
                let value = bus.read(self.regs.get(addr), width)?;
                self.write_reg(dst, value, width);
            }
            _ => return Err(self.illegal(pc, instruction)),
        }
        Ok(())
    }
}
