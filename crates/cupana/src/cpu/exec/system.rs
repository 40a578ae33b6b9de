use crate::cpu::{Bus, Cpu, Flags, Width};
use crate::fault::Fault;

impl Cpu {
    pub(super) fn exec_hlt(&mut self, pc: u16) {
        self.halt();
        log::info!("CPU halted at 0x{pc:04X}");
    }

    /// CLI: allow interrupts.
    pub(super) fn exec_cli(&mut self) {
        self.flags.remove(Flags::INTERRUPT_DISABLED);
    }

    /// SEI: mask interrupts.
    pub(super) fn exec_sei(&mut self) {
        self.flags.insert(Flags::INTERRUPT_DISABLED);
    }

    /// Return from interrupt: pull flags, then PC, and restore both
    /// verbatim.
    pub(super) fn exec_rsi<B: Bus>(&mut self, bus: &mut B) -> Result<(), Fault> {
        let flags = self.pull(bus, Width::Word)?;
        let ret = self.pull(bus, Width::Word)?;
        self.flags = Flags::from_bits_retain(flags);
        self.regs.set_pc(ret);
        self.leave_service();
        Ok(())
    }
}
