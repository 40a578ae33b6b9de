use super::{Cpu, Flags, InterruptState, Registers};
use crate::STACK_BASE;

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A core in its post-reset state with PC at 0.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            flags: Flags::empty(),
            irq_state: InterruptState::Idle,
            irq_depth: 0,
            retired: 0,
        };
        cpu.reset(0);
        cpu
    }

    /// Return to the power-on state and start executing at `entry`.
    ///
    /// All registers are zeroed, SP points at the stack base and interrupts
    /// are disabled until the program enables them.
    pub fn reset(&mut self, entry: u16) {
        self.regs = Registers::default();
        self.regs.set_sp(STACK_BASE);
        self.regs.set_pc(entry);
        self.flags = Flags::INTERRUPT_DISABLED;
        self.irq_state = InterruptState::Idle;
        self.irq_depth = 0;
        self.retired = 0;
    }

    /// Stop fetching until an interrupt is accepted.
    pub fn halt(&mut self) {
        self.flags.insert(Flags::HALT);
    }
}
