use cupana_common::SourceId;

use super::Width;
use crate::fault::Fault;

/// Everything the core can reach: memory, devices and the interrupt line.
///
/// Word accesses are little-endian. Implementations report protection and
/// alignment problems as [`Fault`]s; the core rolls back the instruction
/// that caused them.
pub trait Bus {
    fn read(&mut self, addr: u16, width: Width) -> Result<u16, Fault>;

    fn write(&mut self, addr: u16, value: u16, width: Width) -> Result<(), Fault>;

    /// Source of the request currently latched on the interrupt line.
    fn pending_interrupt(&self) -> Option<SourceId> {
        None
    }

    /// Clear the latched request once the core has accepted it.
    fn acknowledge_interrupt(&mut self) -> Option<SourceId> {
        None
    }

    /// Called at the start of every step, before anything is fetched.
    ///
    /// System buses use this to close the loader path once execution has
    /// begun.
    fn begin_instruction(&mut self) {}
}
