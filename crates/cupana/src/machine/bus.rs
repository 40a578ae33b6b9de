use cupana_common::{Device, DeviceError, InterruptLine, SourceId, DEVICE_WINDOW_SIZE};

use crate::cpu::{Bus, Width};
use crate::fault::{Fault, MapError};
use crate::image::Image;
use crate::{DEVICE_BASE, MEMORY_SIZE, RAM_BASE, STACK_BASE};

/// The four fixed partitions of the address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Rom,
    Ram,
    Stack,
    Devices,
}

impl Region {
    pub fn of(addr: u16) -> Self {
        match addr {
            a if a < RAM_BASE => Region::Rom,
            a if a < STACK_BASE => Region::Ram,
            a if a < DEVICE_BASE => Region::Stack,
            _ => Region::Devices,
        }
    }
}

struct DeviceSlot {
    /// Offset of the first byte inside the device window.
    offset: u16,
    size: u16,
    source: SourceId,
    device: Box<dyn Device>,
}

impl DeviceSlot {
    fn end(&self) -> u32 {
        self.offset as u32 + self.size as u32
    }

    fn contains(&self, offset: u16) -> bool {
        offset >= self.offset && (offset as u32) < self.end()
    }
}

/// Memory router: flat storage for ROM, RAM and stack, plus the device
/// window forwarded to mapped peripherals.
pub struct SystemBus {
    memory: Box<[u8]>,
    devices: Vec<DeviceSlot>,
    irq: InterruptLine,
    /// Set once execution starts; the loader path is closed from then on.
    sealed: bool,
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemBus {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE].into_boxed_slice(),
            devices: Vec::new(),
            irq: InterruptLine::new(),
            sealed: false,
        }
    }

    pub fn interrupt_line(&self) -> &InterruptLine {
        &self.irq
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Install a device at `offset` within the device window.
    ///
    /// Source ids are handed out in mapping order starting at 1.
    pub fn map_device(
        &mut self,
        offset: u16,
        mut device: Box<dyn Device>,
    ) -> Result<SourceId, MapError> {
        let size = device.size();
        let name = device.name().to_string();
        if size == 0 {
            return Err(MapError::Empty { name });
        }
        if offset as u32 + size as u32 > DEVICE_WINDOW_SIZE as u32 {
            return Err(MapError::OutOfWindow { name, offset, size });
        }
        let end = offset as u32 + size as u32;
        if let Some(existing) = self
            .devices
            .iter()
            .find(|slot| (slot.offset as u32) < end && (offset as u32) < slot.end())
        {
            return Err(MapError::Overlap {
                name,
                offset,
                existing: existing.device.name().to_string(),
            });
        }

        let source = self.devices.len() as SourceId + 1;
        device.attach(self.irq.clone(), source);
        log::debug!(
            "mapped device '{}' at 0x{:04X}..0x{:04X} (source {})",
            name,
            DEVICE_BASE + offset,
            DEVICE_BASE as u32 + end - 1,
            source,
        );
        self.devices.push(DeviceSlot {
            offset,
            size,
            source,
            device,
        });
        Ok(source)
    }

    /// Source id of the device covering `addr`, if any.
    pub fn device_source(&self, addr: u16) -> Option<SourceId> {
        let offset = addr.checked_sub(DEVICE_BASE)?;
        self.devices
            .iter()
            .find(|slot| slot.contains(offset))
            .map(|slot| slot.source)
    }

    /// Privileged loader path. Validates every segment before writing any
    /// of them; ROM is writable here and only here.
    pub fn load(&mut self, image: &Image) -> Result<(), Fault> {
        let first = image.segments.first().map_or(0, |s| s.origin);
        if self.sealed {
            return Err(Fault::MemoryProtection(first));
        }

        for segment in image.segments.iter().filter(|s| !s.is_empty()) {
            if segment.end() > MEMORY_SIZE as u32 {
                return Err(Fault::Address(segment.origin));
            }
            if segment.end() > DEVICE_BASE as u32 {
                return Err(Fault::Address(segment.origin.max(DEVICE_BASE)));
            }
        }

        for segment in &image.segments {
            let start = segment.origin as usize;
            self.memory[start..start + segment.bytes.len()].copy_from_slice(&segment.bytes);
        }
        log::debug!(
            "loaded {} segment(s), {} byte(s)",
            image.segments.len(),
            image.len()
        );
        Ok(())
    }

    /// Checked host write into RAM or the stack. The whole range is
    /// validated first; nothing is written on error.
    pub fn write_bytes(&mut self, addr: u16, bytes: &[u8]) -> Result<(), Fault> {
        let end = addr as usize + bytes.len();
        if end > DEVICE_BASE as usize {
            return Err(Fault::Address(addr.max(DEVICE_BASE)));
        }
        if addr < RAM_BASE && !bytes.is_empty() {
            return Err(Fault::MemoryProtection(addr));
        }
        self.memory[addr as usize..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Word stored in a vector slot, read from storage directly.
    pub fn vector(&self, slot: u16) -> u16 {
        let at = slot as usize;
        u16::from_le_bytes([self.memory[at], self.memory[(at + 1) % MEMORY_SIZE]])
    }

    /// Raw storage byte. The device window has no storage and yields `None`.
    pub fn peek(&self, addr: u16) -> Option<u8> {
        match Region::of(addr) {
            Region::Devices => None,
            _ => Some(self.memory[addr as usize]),
        }
    }

    /// Raw storage from `start`, clamped to the end of memory.
    pub fn memory_range(&self, start: u16, len: usize) -> &[u8] {
        let start = start as usize;
        let end = start.saturating_add(len).min(MEMORY_SIZE);
        &self.memory[start..end]
    }

    /// Zero RAM and the stack region.
    pub fn clear_ram(&mut self) {
        self.memory[RAM_BASE as usize..DEVICE_BASE as usize].fill(0);
    }

    /// Reset notification for every mapped device and a cleared interrupt
    /// line.
    pub fn reset_devices(&mut self) {
        for slot in &mut self.devices {
            slot.device.reset();
        }
        self.irq.clear();
    }

    /// Word accesses at the top of memory or across a region boundary are
    /// rejected.
    fn check_span(addr: u16, width: Width) -> Result<(), Fault> {
        if width == Width::Word {
            match addr.checked_add(1) {
                Some(next) if Region::of(next) == Region::of(addr) => {}
                _ => return Err(Fault::Address(addr)),
            }
        }
        Ok(())
    }

    /// Locate the device slot for an access of `width` bytes at `addr`.
    fn device_for(&mut self, addr: u16, width: Width) -> Result<(&mut DeviceSlot, u16), Fault> {
        let offset = addr - DEVICE_BASE;
        let slot = self
            .devices
            .iter_mut()
            .find(|slot| slot.contains(offset))
            .ok_or(Fault::Address(addr))?;
        if offset as u32 + width.bytes() as u32 > slot.end() {
            return Err(Fault::Address(addr));
        }
        let local = offset - slot.offset;
        Ok((slot, local))
    }

    fn device_fault(addr: u16, err: DeviceError) -> Fault {
        match err {
            DeviceError::Unmapped(_) => Fault::Address(addr),
            DeviceError::ReadOnly(_) => Fault::MemoryProtection(addr),
        }
    }
}

impl Bus for SystemBus {
    fn read(&mut self, addr: u16, width: Width) -> Result<u16, Fault> {
        Self::check_span(addr, width)?;

        if Region::of(addr) == Region::Devices {
            let (slot, local) = self.device_for(addr, width)?;
            let value = match width {
                Width::Byte => slot.device.read8(local).map(u16::from),
                Width::Word => slot.device.read16(local),
            };
            return value.map_err(|err| Self::device_fault(addr, err));
        }

        let at = addr as usize;
        Ok(match width {
            Width::Byte => self.memory[at] as u16,
            Width::Word => u16::from_le_bytes([self.memory[at], self.memory[at + 1]]),
        })
    }

    fn write(&mut self, addr: u16, value: u16, width: Width) -> Result<(), Fault> {
        Self::check_span(addr, width)?;

        match Region::of(addr) {
            Region::Rom => Err(Fault::MemoryProtection(addr)),
            Region::Devices => {
                let (slot, local) = self.device_for(addr, width)?;
                // Every byte is checked before any is written.
                let result = match width {
                    Width::Byte => slot
                        .device
                        .check_write(local)
                        .and_then(|()| slot.device.write8(local, value as u8)),
                    Width::Word => slot
                        .device
                        .check_write(local)
                        .and_then(|()| slot.device.check_write(local + 1))
                        .and_then(|()| slot.device.write16(local, value)),
                };
                result.map_err(|err| Self::device_fault(addr, err))
            }
            Region::Ram | Region::Stack => {
                let at = addr as usize;
                match width {
                    Width::Byte => self.memory[at] = value as u8,
                    Width::Word => {
                        self.memory[at..at + 2].copy_from_slice(&value.to_le_bytes())
                    }
                }
                Ok(())
            }
        }
    }

    fn pending_interrupt(&self) -> Option<SourceId> {
        self.irq.pending()
    }

    fn acknowledge_interrupt(&mut self) -> Option<SourceId> {
        self.irq.acknowledge()
    }

    fn begin_instruction(&mut self) {
        if !self.sealed {
            self.sealed = true;
            log::debug!("execution started; loader access closed");
        }
    }
}
