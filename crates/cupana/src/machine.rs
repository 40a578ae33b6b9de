mod bus;
mod config;
mod vm;

pub use bus::{Region, SystemBus};
pub use config::MachineConfig;
pub use vm::Machine;
