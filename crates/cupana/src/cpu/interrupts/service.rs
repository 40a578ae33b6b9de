use cupana_common::SourceId;

use super::super::{Bus, Cpu, Flags, InterruptState, Width};
use crate::fault::Fault;
use crate::INTERRUPT_VECTOR;

impl Cpu {
    /// Accept a pending request: save PC and flags on the stack and jump
    /// to the interrupt vector.
    ///
    /// Returns the acknowledged source and the vector taken. If the context
    /// cannot be saved the core is left exactly as it was and the request
    /// stays latched.
    pub(in crate::cpu) fn service_interrupt<B: Bus>(
        &mut self,
        bus: &mut B,
        source: SourceId,
    ) -> Result<(SourceId, u16), Fault> {
        let saved_regs = self.regs;
        let saved_flags = self.flags;
        let saved_state = self.irq_state;
        self.irq_state = InterruptState::ServicingEntry;

        let vector = match self.save_context(bus) {
            Ok(vector) => vector,
            Err(fault) => {
                self.regs = saved_regs;
                self.flags = saved_flags;
                self.irq_state = saved_state;
                log::warn!("interrupt entry from source {source} failed: {fault}");
                return Err(fault);
            }
        };

        self.flags.insert(Flags::INTERRUPT_DISABLED);
        self.flags.remove(Flags::INTERRUPT_PENDING);
        let source = bus.acknowledge_interrupt().unwrap_or(source);
        self.regs.set_pc(vector);
        self.irq_depth += 1;
        self.irq_state = InterruptState::InService;

        log::debug!(
            "interrupt: source={} vector=0x{:04X} return=0x{:04X} sp=0x{:04X} depth={}",
            source,
            vector,
            saved_regs.pc(),
            self.regs.sp(),
            self.irq_depth,
        );
        Ok((source, vector))
    }

    fn save_context<B: Bus>(&mut self, bus: &mut B) -> Result<u16, Fault> {
        // Both words must fit before either is written.
        self.check_push_room(4)?;
        let vector = bus.read(INTERRUPT_VECTOR, Width::Word)?;

        // Resume after HLT once the routine returns.
        self.flags.remove(Flags::HALT);
        let pc = self.regs.pc();
        self.push(bus, pc, Width::Word)?;
        let flags = self.flags.bits();
        self.push(bus, flags, Width::Word)?;
        Ok(vector)
    }

    /// Bookkeeping for RSI once PC and flags have been restored.
    pub(in crate::cpu) fn leave_service(&mut self) {
        self.irq_depth = self.irq_depth.saturating_sub(1);
        if self.irq_depth == 0 {
            self.irq_state = InterruptState::Idle;
        }
        log::debug!(
            "return from interrupt to 0x{:04X} depth={}",
            self.regs.pc(),
            self.irq_depth
        );
    }
}
