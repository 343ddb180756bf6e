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

    cpu_8086::bitwise.rs

    Shift and rotate operations for the 0xD0-0xD3 group opcodes, including
    flag handling. The undocumented reg=6 encoding (SETMO) sets the operand
    to all ones, as the 8086 microcode does.

*/

use crate::{
    cpu_8086::{mnemonic::Mnemonic, *},
    cpu_common::alu::AluShift,
};

impl Intel8086 {
    /// Perform an 8-bit shift or rotate. A count of zero leaves the operand
    /// and every flag untouched; the 8086 does not mask the count.
    pub fn bitshift_op8(&mut self, mnemonic: Mnemonic, operand: u8, count: u8) -> u8 {
        if count == 0 {
            return operand;
        }

        match mnemonic {
            Mnemonic::ROL => {
                let (result, carry) = operand.alu_rol(count);
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, (result & 0x80 != 0) ^ carry);
                result
            }
            Mnemonic::ROR => {
                let (result, carry) = operand.alu_ror(count);
                self.set_flag_state(Flag::Carry, carry);
                // OF is the xor of the two high bits of the result
                self.set_flag_state(Flag::Overflow, (result & 0x80 != 0) ^ (result & 0x40 != 0));
                result
            }
            Mnemonic::RCL => {
                let (result, carry) = operand.alu_rcl(count, self.get_flag(Flag::Carry));
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, (result & 0x80 != 0) ^ carry);
                result
            }
            Mnemonic::RCR => {
                let (result, carry) = operand.alu_rcr(count, self.get_flag(Flag::Carry));
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, (result & 0x80 != 0) ^ (result & 0x40 != 0));
                result
            }
            Mnemonic::SHL => {
                let (result, carry) = operand.alu_shl(count);
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, (result & 0x80 != 0) ^ carry);
                self.set_szp_flags_from_result_u8(result);
                result
            }
            Mnemonic::SHR => {
                let (result, carry) = operand.alu_shr(count);
                self.set_flag_state(Flag::Carry, carry);
                // OF is the original sign bit, shifted out or not
                self.set_flag_state(Flag::Overflow, operand & 0x80 != 0);
                self.set_szp_flags_from_result_u8(result);
                result
            }
            Mnemonic::SAR => {
                let (result, carry) = operand.alu_sar(count);
                self.set_flag_state(Flag::Carry, carry);
                self.clear_flag(Flag::Overflow);
                self.set_szp_flags_from_result_u8(result);
                result
            }
            Mnemonic::SETMO => {
                let result = 0xFF;
                self.clear_flag(Flag::Carry);
                self.clear_flag(Flag::Overflow);
                self.clear_flag(Flag::AuxCarry);
                self.set_szp_flags_from_result_u8(result);
                result
            }
            _ => panic!("bitshift_op8(): Invalid mnemonic: {:?}", mnemonic),
        }
    }

    /// Perform a 16-bit shift or rotate.
    pub fn bitshift_op16(&mut self, mnemonic: Mnemonic, operand: u16, count: u8) -> u16 {
        if count == 0 {
            return operand;
        }

        match mnemonic {
            Mnemonic::ROL => {
                let (result, carry) = operand.alu_rol(count);
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, (result & 0x8000 != 0) ^ carry);
                result
            }
            Mnemonic::ROR => {
                let (result, carry) = operand.alu_ror(count);
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(
                    Flag::Overflow,
                    (result & 0x8000 != 0) ^ (result & 0x4000 != 0),
                );
                result
            }
            Mnemonic::RCL => {
                let (result, carry) = operand.alu_rcl(count, self.get_flag(Flag::Carry));
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, (result & 0x8000 != 0) ^ carry);
                result
            }
            Mnemonic::RCR => {
                let (result, carry) = operand.alu_rcr(count, self.get_flag(Flag::Carry));
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(
                    Flag::Overflow,
                    (result & 0x8000 != 0) ^ (result & 0x4000 != 0),
                );
                result
            }
            Mnemonic::SHL => {
                let (result, carry) = operand.alu_shl(count);
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, (result & 0x8000 != 0) ^ carry);
                self.set_szp_flags_from_result_u16(result);
                result
            }
            Mnemonic::SHR => {
                let (result, carry) = operand.alu_shr(count);
                self.set_flag_state(Flag::Carry, carry);
                self.set_flag_state(Flag::Overflow, operand & 0x8000 != 0);
                self.set_szp_flags_from_result_u16(result);
                result
            }
            Mnemonic::SAR => {
                let (result, carry) = operand.alu_sar(count);
                self.set_flag_state(Flag::Carry, carry);
                self.clear_flag(Flag::Overflow);
                self.set_szp_flags_from_result_u16(result);
                result
            }
            Mnemonic::SETMO => {
                let result = 0xFFFF;
                self.clear_flag(Flag::Carry);
                self.clear_flag(Flag::Overflow);
                self.clear_flag(Flag::AuxCarry);
                self.set_szp_flags_from_result_u16(result);
                result
            }
            _ => panic!("bitshift_op16(): Invalid mnemonic: {:?}", mnemonic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shl_flags() {
        let mut cpu = Intel8086::new();
        let result = cpu.bitshift_op8(Mnemonic::SHL, 0x80, 1);
        assert_eq!(result, 0x00);
        assert!(cpu.get_flag(Flag::Carry));
        assert!(cpu.get_flag(Flag::Zero));
        // Sign bit went 1 -> 0 with carry set: overflow
        assert!(cpu.get_flag(Flag::Overflow));
    }

    #[test]
    fn test_shift_count_zero_is_inert() {
        let mut cpu = Intel8086::new();
        cpu.set_flag(Flag::Carry);
        let result = cpu.bitshift_op16(Mnemonic::SHR, 0x0001, 0);
        assert_eq!(result, 0x0001);
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_rcr_through_carry() {
        let mut cpu = Intel8086::new();
        cpu.set_flag(Flag::Carry);
        let result = cpu.bitshift_op8(Mnemonic::RCR, 0x00, 1);
        assert_eq!(result, 0x80);
        assert!(!cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_sar_clears_overflow() {
        let mut cpu = Intel8086::new();
        cpu.set_flag(Flag::Overflow);
        let result = cpu.bitshift_op8(Mnemonic::SAR, 0x81, 1);
        assert_eq!(result, 0xC0);
        assert!(cpu.get_flag(Flag::Carry));
        assert!(!cpu.get_flag(Flag::Overflow));
        assert!(cpu.get_flag(Flag::Sign));
    }

    #[test]
    fn test_setmo() {
        let mut cpu = Intel8086::new();
        let result = cpu.bitshift_op8(Mnemonic::SETMO, 0x12, 1);
        assert_eq!(result, 0xFF);
        assert!(!cpu.get_flag(Flag::Carry));
        assert!(cpu.get_flag(Flag::Sign));
    }
}
