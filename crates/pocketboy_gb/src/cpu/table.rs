use lazy_static::lazy_static;

use crate::machine::AddressSpace;

use super::{Cpu, CpuError};

/// Executes one decoded instruction and returns its cycle cost.
pub type Handler = fn(&mut Cpu, &mut AddressSpace, u8) -> Result<u32, CpuError>;

/// One entry of the unprefixed opcode table.
#[derive(Clone, Copy)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub handler: Option<Handler>,
}

impl Instruction {
    /// Placeholder for opcodes with no instruction behind them.
    pub const UNKNOWN: Instruction = Instruction {
        mnemonic: "???",
        handler: None,
    };

    pub fn is_known(&self) -> bool {
        self.handler.is_some()
    }
}

impl std::fmt::Debug for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instruction")
            .field("mnemonic", &self.mnemonic)
            .field("known", &self.is_known())
            .finish()
    }
}

fn set(table: &mut [Instruction; 256], opcodes: &[u8], mnemonic: &'static str, handler: Handler) {
    for &opcode in opcodes {
        table[opcode as usize] = Instruction {
            mnemonic,
            handler: Some(handler),
        };
    }
}

fn build() -> [Instruction; 256] {
    let mut t = [Instruction::UNKNOWN; 256];

    set(&mut t, &[0x00], "NOP", Cpu::exec_nop);
    set(&mut t, &[0x10], "STOP", Cpu::exec_stop);
    set(&mut t, &[0x76], "HALT", Cpu::exec_halt);
    set(&mut t, &[0xF3], "DI", Cpu::exec_di);
    set(&mut t, &[0xFB], "EI", Cpu::exec_ei);
    set(&mut t, &[0xCB], "PREFIX CB", Cpu::exec_prefix_cb);

    // Loads.
    set(&mut t, &[0x01, 0x11, 0x21, 0x31], "LD rr,d16", Cpu::exec_ld_rr_d16);
    set(&mut t, &[0x02, 0x12, 0x22, 0x32], "LD (rr),A", Cpu::exec_ld_indirect_a);
    set(&mut t, &[0x0A, 0x1A, 0x2A, 0x3A], "LD A,(rr)", Cpu::exec_ld_a_indirect);
    set(
        &mut t,
        &[0x06, 0x0E, 0x16, 0x1E, 0x26, 0x2E, 0x36, 0x3E],
        "LD r,d8",
        Cpu::exec_ld_r_d8,
    );
    for opcode in (0x40..=0x7Fu8).filter(|&op| op != 0x76) {
        set(&mut t, &[opcode], "LD r,r", Cpu::exec_ld_r_r);
    }
    set(&mut t, &[0x08], "LD (a16),SP", Cpu::exec_ld_a16_sp);
    set(&mut t, &[0xE0, 0xF0], "LDH (a8)", Cpu::exec_ldh_a8);
    set(&mut t, &[0xE2, 0xF2], "LDH (C)", Cpu::exec_ldh_c);
    set(&mut t, &[0xEA, 0xFA], "LD (a16)", Cpu::exec_ld_a16_a);
    set(&mut t, &[0xF8], "LD HL,SP+r8", Cpu::exec_ld_hl_sp_r8);
    set(&mut t, &[0xF9], "LD SP,HL", Cpu::exec_ld_sp_hl);

    // Arithmetic and logic.
    for opcode in 0x80..=0xBFu8 {
        set(&mut t, &[opcode], "ALU A,r", Cpu::exec_alu_reg);
    }
    set(
        &mut t,
        &[0xC6, 0xCE, 0xD6, 0xDE, 0xE6, 0xEE, 0xF6, 0xFE],
        "ALU A,d8",
        Cpu::exec_alu_imm,
    );
    set(
        &mut t,
        &[0x04, 0x0C, 0x14, 0x1C, 0x24, 0x2C, 0x34, 0x3C],
        "INC r",
        Cpu::exec_inc8,
    );
    set(
        &mut t,
        &[0x05, 0x0D, 0x15, 0x1D, 0x25, 0x2D, 0x35, 0x3D],
        "DEC r",
        Cpu::exec_dec8,
    );
    set(&mut t, &[0x03, 0x13, 0x23, 0x33], "INC rr", Cpu::exec_inc16);
    set(&mut t, &[0x0B, 0x1B, 0x2B, 0x3B], "DEC rr", Cpu::exec_dec16);
    set(&mut t, &[0x09, 0x19, 0x29, 0x39], "ADD HL,rr", Cpu::exec_add_hl_rr);
    set(&mut t, &[0xE8], "ADD SP,r8", Cpu::exec_add_sp_r8);
    set(&mut t, &[0x07, 0x0F, 0x17, 0x1F], "ROT A", Cpu::exec_rotate_a);
    set(&mut t, &[0x27], "DAA", Cpu::exec_daa);
    set(&mut t, &[0x2F], "CPL", Cpu::exec_cpl);
    set(&mut t, &[0x37], "SCF", Cpu::exec_scf);
    set(&mut t, &[0x3F], "CCF", Cpu::exec_ccf);

    // Control flow.
    set(&mut t, &[0x18], "JR r8", Cpu::exec_jr);
    set(&mut t, &[0x20, 0x28, 0x30, 0x38], "JR cc,r8", Cpu::exec_jr_cc);
    set(&mut t, &[0xC3], "JP a16", Cpu::exec_jp_a16);
    set(&mut t, &[0xC2, 0xCA, 0xD2, 0xDA], "JP cc,a16", Cpu::exec_jp_cc);
    set(&mut t, &[0xE9], "JP (HL)", Cpu::exec_jp_hl);
    set(&mut t, &[0xCD], "CALL a16", Cpu::exec_call_a16);
    set(&mut t, &[0xC4, 0xCC, 0xD4, 0xDC], "CALL cc,a16", Cpu::exec_call_cc);
    set(&mut t, &[0xC9], "RET", Cpu::exec_ret);
    set(&mut t, &[0xC0, 0xC8, 0xD0, 0xD8], "RET cc", Cpu::exec_ret_cc);
    set(&mut t, &[0xD9], "RETI", Cpu::exec_reti);
    set(
        &mut t,
        &[0xC7, 0xCF, 0xD7, 0xDF, 0xE7, 0xEF, 0xF7, 0xFF],
        "RST",
        Cpu::exec_rst,
    );

    // Stack.
    set(&mut t, &[0xC5, 0xD5, 0xE5, 0xF5], "PUSH rr", Cpu::exec_push_rr);
    set(&mut t, &[0xC1, 0xD1, 0xE1, 0xF1], "POP rr", Cpu::exec_pop_rr);

    t
}

lazy_static! {
    /// Dense unprefixed opcode table. The hardware opcode holes stay
    /// [`Instruction::UNKNOWN`].
    pub static ref INSTRUCTIONS: [Instruction; 256] = build();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_hardware_holes_are_unknown() {
        let holes = [
            0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
        ];
        for opcode in 0..=0xFFu8 {
            let known = INSTRUCTIONS[opcode as usize].is_known();
            assert_eq!(
                known,
                !holes.contains(&opcode),
                "opcode 0x{opcode:02X} has the wrong table state"
            );
        }
    }

    #[test]
    fn halt_is_not_shadowed_by_the_load_block() {
        assert_eq!(INSTRUCTIONS[0x76].mnemonic, "HALT");
        assert_eq!(INSTRUCTIONS[0x77].mnemonic, "LD r,r");
    }
}
