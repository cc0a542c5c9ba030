use std::cell::RefCell;
use std::rc::Rc;

use crate::machine::{AddressSpace, BusError};

use super::{Cpu, InterruptController, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: Registers::power_on(),
            ime: false,
            halted: false,
            ime_enable_pending: false,
            interrupts: Rc::new(RefCell::new(InterruptController::new())),
        }
    }

    /// Reset the CPU to its power-on state. IE and IF are left alone; they
    /// belong to the interrupt controller.
    pub fn reset(&mut self) {
        self.regs = Registers::power_on();
        self.ime = false;
        self.halted = false;
        self.ime_enable_pending = false;
    }

    /// Shared handle to IE/IF, for devices that raise interrupts.
    pub fn interrupts(&self) -> Rc<RefCell<InterruptController>> {
        Rc::clone(&self.interrupts)
    }

    /// Map IF ($FF0F) and IE ($FFFF) onto `bus`.
    pub fn connect(&self, bus: &mut AddressSpace) -> Result<(), BusError> {
        bus.attach(&self.interrupts)
    }
}
