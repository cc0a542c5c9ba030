use crate::machine::AddressSpace;

use super::{Cpu, CpuError, Flag};

impl Cpu {
    /// Handle CB-prefixed instructions (bit operations, shifts, and rotates).
    ///
    /// The second byte splits into `x` (bits 7..6, the family), `y`
    /// (bits 5..3, the operation or bit number) and `z` (bits 2..0, the
    /// operand register).
    pub(super) fn step_cb(&mut self, bus: &mut AddressSpace) -> Result<u32, CpuError> {
        let cb = self.fetch8(bus)?;
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;
        let value = self.read_reg8(bus, z)?;

        match x {
            0 => {
                let result = match y {
                    0 => self.rlc(value),
                    1 => self.rrc(value),
                    2 => self.rl(value),
                    3 => self.rr(value),
                    4 => self.sla(value),
                    5 => self.sra(value),
                    6 => self.swap(value),
                    _ => self.srl(value),
                };
                self.write_reg8(bus, z, result)?;
                Ok(if z == 6 { 16 } else { 8 })
            }
            1 => {
                // BIT b, r: Z from the tested bit, H set, C kept.
                self.set_flag(Flag::Z, value & (1 << y) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
                Ok(if z == 6 { 12 } else { 8 })
            }
            2 => {
                self.write_reg8(bus, z, value & !(1 << y))?;
                Ok(if z == 6 { 16 } else { 8 })
            }
            _ => {
                self.write_reg8(bus, z, value | (1 << y))?;
                Ok(if z == 6 { 16 } else { 8 })
            }
        }
    }
}
