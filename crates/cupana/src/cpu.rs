mod alu;
mod bus;
mod decode;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;

pub use bus::Bus;
pub use decode::{
    decode, instruction_length, AddressingMode, Condition, Instruction, Op, Operands, Target,
    Width,
};
pub use regs::{Flags, Registers, NUM_REGS, PC, SP};

use cupana_common::SourceId;

/// Interrupt controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterruptState {
    /// No service routine is running.
    #[default]
    Idle,
    /// An accepted request is being entered (context save in progress).
    ServicingEntry,
    /// At least one service routine is running.
    InService,
}

/// What a single call to [`Cpu::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// One instruction retired.
    Executed { pc: u16, instruction: Instruction },
    /// A pending request was accepted and control moved to the service
    /// routine. No instruction executed during this step.
    Interrupt { source: SourceId, vector: u16 },
    /// The core is halted and nothing is waiting to wake it.
    Parked,
}

/// The 16-bit core: register file, flags and interrupt controller.
///
/// Memory and devices are reached through a [`Bus`]; the core owns no
/// storage of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cpu {
    pub regs: Registers,
    pub flags: Flags,
    irq_state: InterruptState,
    /// Number of service routines entered and not yet returned from.
    irq_depth: u32,
    /// Instructions retired since reset.
    retired: u64,
}

impl Cpu {
    #[inline]
    pub fn pc(&self) -> u16 {
        self.regs.pc()
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.regs.sp()
    }

    #[inline]
    pub fn halted(&self) -> bool {
        self.flags.contains(Flags::HALT)
    }

    pub fn interrupt_state(&self) -> InterruptState {
        self.irq_state
    }

    pub fn interrupt_depth(&self) -> u32 {
        self.irq_depth
    }

    pub fn retired(&self) -> u64 {
        self.retired
    }
}
