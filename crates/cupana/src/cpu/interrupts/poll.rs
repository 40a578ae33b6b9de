use cupana_common::SourceId;

use super::super::{Bus, Cpu, Flags};

impl Cpu {
    /// Sample the interrupt line at an instruction boundary.
    ///
    /// Interrupt-Pending mirrors the line on every call. Returns the
    /// requesting source only when the request may be accepted now.
    pub(in crate::cpu) fn poll_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<SourceId> {
        let request = bus.pending_interrupt();
        self.flags.set(Flags::INTERRUPT_PENDING, request.is_some());

        if self.flags.contains(Flags::INTERRUPT_DISABLED) {
            return None;
        }
        request
    }
}
