use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::cpu::{Interrupt, InterruptController};
use crate::SCREEN_WIDTH;

use super::{AddressRange, AddressSpace, BusError, Lcd, MemoryDevice};

mod registers;
mod render;
mod timing;

pub use registers::{LcdControl, LcdRegisters, StatSelect};
pub use timing::{
    Mode, DOTS_PER_LINE, OAM_SCAN_DOTS, TOTAL_LINES, TRANSFER_END_DOT, VBLANK_LINES,
    VISIBLE_LINES,
};

const OAM_SIZE: usize = 0xA0;

/// Picture unit: LCD registers, OAM and the scanline state machine.
///
/// Advanced by [`Ppu::step`] with the cycles each CPU step consumed. Visible
/// lines are rendered once, when the line enters pixel transfer; reaching
/// line 144 raises VBlank and signals the [`Lcd`] that a frame is done.
#[derive(Debug)]
pub struct Ppu {
    regs: LcdRegisters,
    oam: [u8; OAM_SIZE],
    /// Cycles into the current line.
    dots: u32,
    line_rendered: bool,
    /// Last level of the ORed STAT interrupt sources; LCD-STAT fires on its
    /// rising edge.
    stat_line: bool,
    frames: u64,
    interrupts: Rc<RefCell<InterruptController>>,
    lcd: Arc<Lcd>,
}

impl Ppu {
    pub const REGISTERS: AddressRange = AddressRange::new(registers::LCDC, registers::WX);
    pub const OAM: AddressRange = AddressRange::new(0xFE00, 0xFE9F);

    pub fn new(interrupts: Rc<RefCell<InterruptController>>, lcd: Arc<Lcd>) -> Self {
        Self {
            regs: LcdRegisters::default(),
            oam: [0; OAM_SIZE],
            dots: 0,
            line_rendered: false,
            stat_line: false,
            frames: 0,
            interrupts,
            lcd,
        }
    }

    pub fn ly(&self) -> u8 {
        self.regs.ly
    }

    pub fn dots(&self) -> u32 {
        self.dots
    }

    pub fn mode(&self) -> Mode {
        Mode::at(self.regs.ly, self.dots)
    }

    /// Frames completed, counted at each entry into VBlank.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn registers(&self) -> &LcdRegisters {
        &self.regs
    }

    /// Advance by `cycles` CPU cycles. Video RAM is read through `bus`.
    pub fn step(&mut self, cycles: u32, bus: &AddressSpace) -> Result<(), BusError> {
        self.dots += cycles;
        loop {
            if self.regs.ly < VISIBLE_LINES && !self.line_rendered && self.dots >= OAM_SCAN_DOTS
            {
                self.render_line(bus)?;
                self.line_rendered = true;
            }
            if self.dots < DOTS_PER_LINE {
                break;
            }
            self.dots -= DOTS_PER_LINE;
            self.next_line();
            self.update_stat_line();
        }
        self.update_stat_line();
        Ok(())
    }

    fn render_line(&mut self, bus: &AddressSpace) -> Result<(), BusError> {
        let mut line = [0u8; SCREEN_WIDTH];
        if self.regs.lcdc.contains(LcdControl::BG_ENABLE) {
            render::background_line(&self.regs, bus, &mut line)?;
        }
        self.lcd.write_line(self.regs.ly as usize, &line);
        Ok(())
    }

    fn next_line(&mut self) {
        self.regs.ly = (self.regs.ly + 1) % TOTAL_LINES;
        self.line_rendered = false;

        if self.regs.ly == VISIBLE_LINES {
            self.frames += 1;
            self.interrupts.borrow_mut().request(Interrupt::VBLANK);
            self.lcd.signal_frame_ready();
            log::debug!("VBlank edge, frame {} ready", self.frames);
        }
    }

    fn stat_sources_active(&self) -> bool {
        let select = self.regs.stat_select;
        let mode_selected = match self.mode() {
            Mode::HBlank => select.contains(StatSelect::HBLANK),
            Mode::VBlank => select.contains(StatSelect::VBLANK),
            Mode::OamScan => select.contains(StatSelect::OAM_SCAN),
            Mode::Transfer => false,
        };
        mode_selected || (select.contains(StatSelect::LYC) && self.regs.ly == self.regs.lyc)
    }

    fn update_stat_line(&mut self) {
        let line = self.stat_sources_active();
        if line && !self.stat_line {
            self.interrupts.borrow_mut().request(Interrupt::LCD_STAT);
        }
        self.stat_line = line;
    }

    fn stat(&self) -> u8 {
        let coincidence = if self.regs.ly == self.regs.lyc { 0x04 } else { 0 };
        0x80 | self.regs.stat_select.bits() | coincidence | self.mode() as u8
    }
}

impl MemoryDevice for Ppu {
    fn name(&self) -> &'static str {
        "ppu"
    }

    fn address_ranges(&self) -> Vec<AddressRange> {
        vec![Self::REGISTERS, Self::OAM]
    }

    fn read_byte(&self, address: u16) -> Result<u8, BusError> {
        if let Some(offset) = Self::OAM.offset(address) {
            return Ok(self.oam[offset]);
        }
        let r = &self.regs;
        Ok(match address {
            registers::LCDC => r.lcdc.bits(),
            registers::STAT => self.stat(),
            registers::SCY => r.scy,
            registers::SCX => r.scx,
            registers::LY => r.ly,
            registers::LYC => r.lyc,
            registers::DMA => r.dma,
            registers::BGP => r.bgp,
            registers::OBP0 => r.obp0,
            registers::OBP1 => r.obp1,
            registers::WY => r.wy,
            registers::WX => r.wx,
            _ => {
                return Err(BusError::OutOfRange {
                    device: self.name(),
                    address,
                })
            }
        })
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        if let Some(offset) = Self::OAM.offset(address) {
            self.oam[offset] = value;
            return Ok(());
        }
        let r = &mut self.regs;
        match address {
            registers::LCDC => r.lcdc = LcdControl::from_bits_retain(value),
            registers::STAT => r.stat_select = StatSelect::from_bits_truncate(value),
            registers::SCY => r.scy = value,
            registers::SCX => r.scx = value,
            registers::LY => log::trace!("ignored write 0x{value:02X} to LY"),
            registers::LYC => r.lyc = value,
            registers::DMA => r.dma = value,
            registers::BGP => r.bgp = value,
            registers::OBP0 => r.obp0 = value,
            registers::OBP1 => r.obp1 = value,
            registers::WY => r.wy = value,
            registers::WX => r.wx = value,
            _ => {
                return Err(BusError::OutOfRange {
                    device: "ppu",
                    address,
                })
            }
        }
        Ok(())
    }
}
