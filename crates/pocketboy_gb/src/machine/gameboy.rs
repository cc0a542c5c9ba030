use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::cpu::Cpu;

use super::{AddressSpace, Cartridge, EmulatorError, InertIo, Lcd, Ppu, Ram};

/// A wired-up DMG: CPU, bus, devices and picture unit.
///
/// This is the machine the driver loop steps. Devices live behind shared
/// handles so the bus can route to them while the machine keeps direct
/// access to the ones it drives.
pub struct GameBoy {
    cpu: Cpu,
    bus: AddressSpace,
    ppu: Rc<RefCell<Ppu>>,
    cartridge: Rc<RefCell<Cartridge>>,
    lcd: Arc<Lcd>,
}

impl GameBoy {
    /// Build a machine around `rom` with a fresh frame buffer.
    pub fn new(rom: Vec<u8>) -> Result<Self, EmulatorError> {
        Self::with_lcd(rom, Arc::new(Lcd::new()))
    }

    /// Build a machine that renders into an existing frame buffer.
    pub fn with_lcd(rom: Vec<u8>, lcd: Arc<Lcd>) -> Result<Self, EmulatorError> {
        let cartridge = Rc::new(RefCell::new(Cartridge::new(rom)?));
        let cpu = Cpu::new();
        let ppu = Rc::new(RefCell::new(Ppu::new(cpu.interrupts(), Arc::clone(&lcd))));

        let mut bus = AddressSpace::new();
        bus.attach(&cartridge)?;
        bus.attach(&Rc::new(RefCell::new(Ram::video())))?;
        bus.attach(&Rc::new(RefCell::new(Ram::work())))?;
        bus.attach(&ppu)?;
        bus.attach(&Rc::new(RefCell::new(InertIo::sound())))?;
        bus.attach(&Rc::new(RefCell::new(InertIo::unused())))?;
        bus.attach(&Rc::new(RefCell::new(Ram::high())))?;
        cpu.connect(&mut bus)?;

        log::info!("loaded cartridge '{}'", cartridge.borrow().title());
        log::debug!("memory map: {:?}", bus);

        Ok(Self {
            cpu,
            bus,
            ppu,
            cartridge,
            lcd,
        })
    }

    /// One CPU step followed by one PPU step over the same cycles.
    pub fn step(&mut self) -> Result<u32, EmulatorError> {
        let cycles = self.cpu.step(&mut self.bus)?;
        self.ppu.borrow_mut().step(cycles, &self.bus)?;
        Ok(cycles)
    }

    pub fn title(&self) -> String {
        self.cartridge.borrow().title().to_owned()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &AddressSpace {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut AddressSpace {
        &mut self.bus
    }

    pub fn ppu(&self) -> std::cell::Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.ppu.borrow().frames()
    }

    pub fn lcd(&self) -> &Arc<Lcd> {
        &self.lcd
    }
}

impl std::fmt::Debug for GameBoy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameBoy")
            .field("cpu", &self.cpu)
            .field("bus", &self.bus)
            .field("cartridge", &self.cartridge.borrow())
            .finish()
    }
}
