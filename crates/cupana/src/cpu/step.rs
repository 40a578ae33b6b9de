use super::{decode, Bus, Cpu, StepEvent};
use crate::fault::Fault;

impl Cpu {
    /// Advance the core by one instruction boundary.
    ///
    /// Interrupts are sampled first; accepting one consumes the step.
    /// A halted core returns [`StepEvent::Parked`] without fetching. A
    /// faulting instruction leaves registers, flags and PC untouched.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<StepEvent, Fault> {
        bus.begin_instruction();

        if let Some(request) = self.poll_interrupt(bus) {
            let (source, vector) = self.service_interrupt(bus, request)?;
            return Ok(StepEvent::Interrupt { source, vector });
        }

        if self.halted() {
            return Ok(StepEvent::Parked);
        }

        let pc = self.regs.pc();
        let saved_regs = self.regs;
        let saved_flags = self.flags;

        let result = decode(bus, pc).and_then(|instruction| {
            log::trace!("0x{pc:04X}: {instruction}");
            self.regs.set_pc(pc.wrapping_add(instruction.len as u16));
            self.execute(bus, pc, &instruction).map(|()| instruction)
        });

        match result {
            Ok(instruction) => {
                self.retired += 1;
                Ok(StepEvent::Executed { pc, instruction })
            }
            Err(fault) => {
                self.regs = saved_regs;
                self.flags = saved_flags;
                log::warn!("fault at 0x{pc:04X}: {fault}");
                Err(fault)
            }
        }
    }
}
