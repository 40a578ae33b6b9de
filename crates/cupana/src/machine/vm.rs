use std::time::Duration;

use cupana_common::{Device, InterruptLine, SourceId};

use super::{MachineConfig, SystemBus};
use crate::cpu::{Cpu, Flags, InterruptState, Registers, StepEvent};
use crate::fault::{Fault, MapError};
use crate::image::Image;
use crate::RESET_VECTOR;

/// A complete machine: the core, its memory and mapped devices.
///
/// Each machine is an independent value; several can live in one process.
pub struct Machine {
    cpu: Cpu,
    bus: SystemBus,
    config: MachineConfig,
    trace: Vec<StepEvent>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

impl Machine {
    pub fn new(config: MachineConfig) -> Self {
        let mut machine = Self {
            cpu: Cpu::new(),
            bus: SystemBus::new(),
            config,
            trace: Vec::new(),
        };
        machine.reset();
        machine
    }

    /// Build a machine, load `image` and reset it so PC starts at the
    /// image's reset vector.
    pub fn boot(config: MachineConfig, image: &Image) -> Result<Self, Fault> {
        let mut machine = Self::new(config);
        machine.load_image(image)?;
        machine.reset();
        Ok(machine)
    }

    /// Load an image through the privileged path. Only possible before the
    /// first step.
    pub fn load_image(&mut self, image: &Image) -> Result<(), Fault> {
        self.bus.load(image)
    }

    pub fn map_device(
        &mut self,
        offset: u16,
        device: Box<dyn Device>,
    ) -> Result<SourceId, MapError> {
        self.bus.map_device(offset, device)
    }

    /// A handle host threads can use to raise interrupts.
    pub fn interrupt_line(&self) -> InterruptLine {
        self.bus.interrupt_line().clone()
    }

    /// Hardware reset. RAM survives unless the config says otherwise.
    pub fn reset(&mut self) {
        if self.config.clear_ram_on_reset {
            self.bus.clear_ram();
        }
        self.bus.reset_devices();
        let entry = self.bus.vector(RESET_VECTOR);
        self.cpu.reset(entry);
        self.trace.clear();
        log::info!("reset: entry=0x{entry:04X}");
    }

    /// Execute one instruction, or accept one interrupt.
    pub fn step(&mut self) -> Result<(), Fault> {
        match self.cpu.step(&mut self.bus) {
            Ok(event) => {
                if self.config.record_trace && event != StepEvent::Parked {
                    self.trace.push(event);
                }
                Ok(())
            }
            Err(fault) => {
                if self.config.halt_on_fault {
                    self.cpu.halt();
                }
                Err(fault)
            }
        }
    }

    /// Whether the next step can do anything. False only while halted with
    /// no acceptable interrupt waiting.
    fn runnable(&self) -> bool {
        !self.cpu.halted()
            || (self.bus.interrupt_line().is_asserted()
                && !self.cpu.flags.contains(Flags::INTERRUPT_DISABLED))
    }

    /// Step until the core halts with nothing left to wake it, or a fault
    /// occurs.
    pub fn run_until_halt(&mut self) -> Result<(), Fault> {
        while self.runnable() {
            self.step()?;
        }
        Ok(())
    }

    /// Like [`run_until_halt`](Self::run_until_halt) but gives up after
    /// `max_steps`. Returns the number of steps taken.
    pub fn run_for(&mut self, max_steps: usize) -> Result<usize, Fault> {
        let mut taken = 0;
        while taken < max_steps && self.runnable() {
            self.step()?;
            taken += 1;
        }
        Ok(taken)
    }

    /// Block a halted machine until an interrupt is raised or `timeout`
    /// elapses. Returns whether the next step has work to do.
    ///
    /// A request the core is masking cannot wake it, so in that state the
    /// wait ends only when the line changes or the timeout runs out.
    pub fn park(&self, timeout: Duration) -> bool {
        if self.runnable() {
            return true;
        }
        let line = self.bus.interrupt_line();
        if line.is_asserted() {
            line.wait_change(timeout);
            self.runnable()
        } else {
            line.wait_timeout(timeout) && self.runnable()
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    pub fn register(&self, index: u8) -> u16 {
        self.cpu.regs.get(index)
    }

    pub fn set_register(&mut self, index: u8, value: u16) {
        self.cpu.regs.set(index, value);
    }

    pub fn flags(&self) -> Flags {
        self.cpu.flags
    }

    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    pub fn sp(&self) -> u16 {
        self.cpu.sp()
    }

    pub fn halted(&self) -> bool {
        self.cpu.halted()
    }

    pub fn interrupt_state(&self) -> InterruptState {
        self.cpu.interrupt_state()
    }

    /// Instructions retired since the last reset.
    pub fn retired(&self) -> u64 {
        self.cpu.retired()
    }

    /// Checked write into RAM or the stack.
    pub fn write_memory(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Fault> {
        self.bus.write_bytes(addr, bytes)
    }

    pub fn memory_byte(&self, addr: u16) -> Option<u8> {
        self.bus.peek(addr)
    }

    pub fn memory_range(&self, start: u16, len: usize) -> &[u8] {
        self.bus.memory_range(start, len)
    }

    /// Recorded step events, oldest first. Empty unless `record_trace` is
    /// set.
    pub fn trace(&self) -> &[StepEvent] {
        &self.trace
    }
}
