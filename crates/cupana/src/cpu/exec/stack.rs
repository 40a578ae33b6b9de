use crate::cpu::{Bus, Cpu, Instruction, Operands};
use crate::fault::Fault;

impl Cpu {
    pub(super) fn exec_phr<B: Bus>(
        &mut self,
        bus: &mut B,
        pc: u16,
        instruction: &Instruction,
    ) -> Result<(), Fault> {
        let Operands::Register(reg) = instruction.operands else {
            return Err(self.illegal(pc, instruction));
        };
        let value = self.regs.get(reg);
        self.push(bus, value, instruction.width)
    }

    pub(super) fn exec_plr<B: Bus>(
        &mut self,
        bus: &mut B,
        pc: u16,
        instruction: &Instruction,
    ) -> Result<(), Fault> {
        let Operands::Register(reg) = instruction.operands else {
            return Err(self.illegal(pc, instruction));
        };
        let value = self.pull(bus, instruction.width)?;
        self.write_reg(reg, value, instruction.width);
        Ok(())
    }
}
