use crate::cpu::{Bus, Cpu, Instruction, Operands, Target, Width};
use crate::fault::Fault;

impl Cpu {
    #[inline]
    fn resolve(&self, target: Target) -> u16 {
        match target {
            Target::Register(reg) => self.regs.get(reg),
            Target::Address(addr) => addr,
        }
    }

    /// JMP and the conditional jump family.
    pub(super) fn exec_jump(&mut self, pc: u16, instruction: &Instruction) -> Result<(), Fault> {
        let Operands::Jump { cond, target } = instruction.operands else {
            return Err(self.illegal(pc, instruction));
        };
        if cond.map_or(true, |cond| cond.holds(self.flags)) {
            let dest = self.resolve(target);
            self.regs.set_pc(dest);
        }
        Ok(())
    }

    /// Push the return address (already in PC) and jump.
    pub(super) fn exec_jsb<B: Bus>(
        &mut self,
        bus: &mut B,
        pc: u16,
        instruction: &Instruction,
    ) -> Result<(), Fault> {
        let Operands::Jump { cond: None, target } = instruction.operands else {
            return Err(self.illegal(pc, instruction));
        };
        let dest = self.resolve(target);
        let ret = self.regs.pc();
        self.push(bus, ret, Width::Word)?;
        self.regs.set_pc(dest);
        Ok(())
    }

    pub(super) fn exec_rsb<B: Bus>(&mut self, bus: &mut B) -> Result<(), Fault> {
        let ret = self.pull(bus, Width::Word)?;
        self.regs.set_pc(ret);
        Ok(())
    }
}
