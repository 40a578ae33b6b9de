use typed_builder::TypedBuilder;

/// Host policy for a [`Machine`](super::Machine).
///
/// ```
/// use cupana::MachineConfig;
///
/// let config = MachineConfig::builder().halt_on_fault(true).build();
/// assert!(!config.clear_ram_on_reset);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, TypedBuilder)]
pub struct MachineConfig {
    /// Zero RAM and the stack on every reset.
    #[builder(default = false)]
    pub clear_ram_on_reset: bool,
    /// Also set Halt when a step faults. The fault is still returned.
    #[builder(default = false)]
    pub halt_on_fault: bool,
    /// Keep a log of every step event, retrievable with
    /// [`Machine::trace`](super::Machine::trace).
    #[builder(default = false)]
    pub record_trace: bool,
}
