/*
    iron86
    https://github.com/iron86-emu/iron86

    Copyright 2024-2025 the iron86 authors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    cpu_8086::modrm.rs

    Routines to handle loading and parsing of modrm bytes.

*/

use crate::{
    cpu_8086::*,
    cpu_common::{AddressingMode, Displacement, Register16, Register8},
};

#[derive(Copy, Clone, Debug)]
pub struct ModRmByte {
    b_mod: u8,
    b_reg: u8,
    b_rm: u8,
    addressing_mode: AddressingMode,
}

impl ModRmByte {
    /// Fetch a modrm byte at CS:IP, along with any displacement it calls
    /// for. Displacement bytes follow the modrm byte immediately, before any
    /// immediate operand, so they must be consumed here.
    pub fn read(cpu: &mut Intel8086) -> ModRmByte {
        let byte = cpu.fetch_u8();

        let b_mod = (byte >> 6) & 0x03;
        let b_reg = (byte >> 3) & 0x07;
        let b_rm = byte & 0x07;

        let addressing_mode = match b_mod {
            0b00 => match b_rm {
                0 => AddressingMode::BxSi,
                1 => AddressingMode::BxDi,
                2 => AddressingMode::BpSi,
                3 => AddressingMode::BpDi,
                4 => AddressingMode::Si,
                5 => AddressingMode::Di,
                // mod=00 has no BP form; rm=6 is a direct 16-bit address
                6 => AddressingMode::Disp16(Displacement::Disp16(cpu.fetch_u16() as i16)),
                _ => AddressingMode::Bx,
            },
            0b01 => {
                let disp = Displacement::Disp8(cpu.fetch_i8());
                match b_rm {
                    0 => AddressingMode::BxSiDisp8(disp),
                    1 => AddressingMode::BxDiDisp8(disp),
                    2 => AddressingMode::BpSiDisp8(disp),
                    3 => AddressingMode::BpDiDisp8(disp),
                    4 => AddressingMode::SiDisp8(disp),
                    5 => AddressingMode::DiDisp8(disp),
                    6 => AddressingMode::BpDisp8(disp),
                    _ => AddressingMode::BxDisp8(disp),
                }
            }
            0b10 => {
                let disp = Displacement::Disp16(cpu.fetch_u16() as i16);
                match b_rm {
                    0 => AddressingMode::BxSiDisp16(disp),
                    1 => AddressingMode::BxDiDisp16(disp),
                    2 => AddressingMode::BpSiDisp16(disp),
                    3 => AddressingMode::BpDiDisp16(disp),
                    4 => AddressingMode::SiDisp16(disp),
                    5 => AddressingMode::DiDisp16(disp),
                    6 => AddressingMode::BpDisp16(disp),
                    _ => AddressingMode::BxDisp16(disp),
                }
            }
            _ => AddressingMode::RegisterMode,
        };

        ModRmByte {
            b_mod,
            b_reg,
            b_rm,
            addressing_mode,
        }
    }

    #[inline]
    pub fn is_register_mode(&self) -> bool {
        self.b_mod == 0b11
    }

    // Interpret the 'R/M' field as an 8 bit register selector
    #[inline]
    pub fn get_op1_reg8(&self) -> Register8 {
        REGISTER8_LUT[(self.b_rm & OPCODE_REGISTER_SELECT_MASK) as usize]
    }

    // Interpret the 'R/M' field as a 16 bit register selector
    #[inline]
    pub fn get_op1_reg16(&self) -> Register16 {
        REGISTER16_LUT[(self.b_rm & OPCODE_REGISTER_SELECT_MASK) as usize]
    }

    // Interpret the 'REG' field as an 8 bit register selector
    #[inline]
    pub fn get_op2_reg8(&self) -> Register8 {
        REGISTER8_LUT[(self.b_reg & OPCODE_REGISTER_SELECT_MASK) as usize]
    }

    // Interpret the 'REG' field as a 16 bit register selector
    #[inline]
    pub fn get_op2_reg16(&self) -> Register16 {
        REGISTER16_LUT[(self.b_reg & OPCODE_REGISTER_SELECT_MASK) as usize]
    }

    // Interpret the 'REG' field as a segment register selector. Only two
    // bits participate, so encodings 4..=7 alias ES,CS,SS,DS.
    #[inline]
    pub fn get_op2_segmentreg16(&self) -> Register16 {
        SEGMENT_REGISTER16_LUT[(self.b_reg & 0x03) as usize]
    }

    // Interpret the 'REG' field as a 3 bit opcode extension
    #[inline]
    pub fn get_op_extension(&self) -> u8 {
        self.b_reg
    }

    #[inline]
    pub fn get_addressing_mode(&self) -> AddressingMode {
        self.addressing_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_common::Segment;

    fn modrm_from(cpu_bytes: &[u8]) -> (Intel8086, ModRmByte) {
        let mut cpu = Intel8086::new();
        cpu.load_program(0x0000, 0x0000, cpu_bytes).unwrap();
        let modrm = ModRmByte::read(&mut cpu);
        (cpu, modrm)
    }

    #[test]
    fn test_register_mode() {
        // mod=11, reg=010 (DX), rm=001 (CX)
        let (cpu, modrm) = modrm_from(&[0b11_010_001]);
        assert!(modrm.is_register_mode());
        assert_eq!(modrm.get_op1_reg16(), Register16::CX);
        assert_eq!(modrm.get_op2_reg16(), Register16::DX);
        assert_eq!(cpu.ip(), 1);
    }

    #[test]
    fn test_direct_address() {
        // mod=00 rm=110: direct 16-bit address follows
        let (cpu, modrm) = modrm_from(&[0b00_000_110, 0x34, 0x12]);
        assert_eq!(
            modrm.get_addressing_mode(),
            AddressingMode::Disp16(Displacement::Disp16(0x1234))
        );
        assert_eq!(cpu.ip(), 3);
    }

    #[test]
    fn test_disp8_sign_extends() {
        // mod=01 rm=111: [BX + disp8]
        let (mut cpu, modrm) = modrm_from(&[0b01_000_111, 0xFE]);
        cpu.set_register16(Register16::BX, 0x0010);
        let (segment, offset) = cpu.calc_effective_address(modrm.get_addressing_mode(), None);
        assert_eq!(segment, Segment::DS);
        assert_eq!(offset, 0x000E);
    }

    #[test]
    fn test_segment_reg_aliasing() {
        // reg=100 aliases reg=000 (ES) for segment register operands
        let (_, modrm) = modrm_from(&[0b11_100_000]);
        assert_eq!(modrm.get_op2_segmentreg16(), Register16::ES);
    }
}
