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

    cpu_8086::alu.rs

    Applies the ALU kernels and writes flags back to architectural state.
    One math_op per width keeps the flag rules in a single place for every
    arithmetic and logical opcode, including the group sub-dispatches.

*/

use crate::{
    cpu_8086::{mnemonic::Mnemonic, *},
    cpu_common::alu::*,
};

impl Intel8086 {
    #[inline(always)]
    fn set_parity_flag_from_u8(&mut self, operand: u8) {
        self.set_flag_state(Flag::Parity, PARITY_TABLE[operand as usize]);
    }

    pub fn set_szp_flags_from_result_u8(&mut self, result: u8) {
        self.set_flag_state(Flag::Sign, result & 0x80 != 0);
        self.set_flag_state(Flag::Zero, result == 0);
        self.set_parity_flag_from_u8(result);
    }

    pub fn set_szp_flags_from_result_u16(&mut self, result: u16) {
        self.set_flag_state(Flag::Sign, result & 0x8000 != 0);
        self.set_flag_state(Flag::Zero, result == 0);
        // Parity considers the low 8 bits regardless of operand width
        self.set_parity_flag_from_u8((result & 0xFF) as u8);
    }

    #[inline]
    fn set_arith_flags_u8(&mut self, result: u8, carry: bool, overflow: bool, aux_carry: bool) {
        self.set_flag_state(Flag::Carry, carry);
        self.set_flag_state(Flag::Overflow, overflow);
        self.set_flag_state(Flag::AuxCarry, aux_carry);
        self.set_szp_flags_from_result_u8(result);
    }

    #[inline]
    fn set_arith_flags_u16(&mut self, result: u16, carry: bool, overflow: bool, aux_carry: bool) {
        self.set_flag_state(Flag::Carry, carry);
        self.set_flag_state(Flag::Overflow, overflow);
        self.set_flag_state(Flag::AuxCarry, aux_carry);
        self.set_szp_flags_from_result_u16(result);
    }

    #[inline]
    fn set_logic_flags_u8(&mut self, result: u8) {
        self.clear_flag(Flag::Carry);
        self.clear_flag(Flag::Overflow);
        self.clear_flag(Flag::AuxCarry);
        self.set_szp_flags_from_result_u8(result);
    }

    #[inline]
    fn set_logic_flags_u16(&mut self, result: u16) {
        self.clear_flag(Flag::Carry);
        self.clear_flag(Flag::Overflow);
        self.clear_flag(Flag::AuxCarry);
        self.set_szp_flags_from_result_u16(result);
    }

    /// Perform various 8-bit math operations
    pub fn math_op8(&mut self, mnemonic: Mnemonic, operand1: u8, operand2: u8) -> u8 {
        match mnemonic {
            Mnemonic::ADD => {
                let (result, carry, overflow, aux_carry) = operand1.alu_add(operand2);
                self.set_arith_flags_u8(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::ADC => {
                let (result, carry, overflow, aux_carry) =
                    operand1.alu_adc(operand2, self.get_flag(Flag::Carry));
                self.set_arith_flags_u8(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::SUB => {
                let (result, carry, overflow, aux_carry) = operand1.alu_sub(operand2);
                self.set_arith_flags_u8(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::SBB => {
                let (result, carry, overflow, aux_carry) =
                    operand1.alu_sbb(operand2, self.get_flag(Flag::Carry));
                self.set_arith_flags_u8(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::NEG => {
                // CF is set unless the operand is 0; the borrow out of
                // 0 - operand already says exactly that.
                let (result, carry, overflow, aux_carry) = operand1.alu_neg();
                self.set_arith_flags_u8(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::INC => {
                // INC acts like add xx, 1, but does not touch the carry flag
                let (result, _carry, overflow, aux_carry) = operand1.alu_add(1);
                self.set_flag_state(Flag::Overflow, overflow);
                self.set_flag_state(Flag::AuxCarry, aux_carry);
                self.set_szp_flags_from_result_u8(result);
                result
            }
            Mnemonic::DEC => {
                // DEC acts like sub xx, 1, but does not touch the carry flag
                let (result, _carry, overflow, aux_carry) = operand1.alu_sub(1);
                self.set_flag_state(Flag::Overflow, overflow);
                self.set_flag_state(Flag::AuxCarry, aux_carry);
                self.set_szp_flags_from_result_u8(result);
                result
            }
            Mnemonic::OR => {
                let result = operand1 | operand2;
                self.set_logic_flags_u8(result);
                result
            }
            Mnemonic::AND => {
                let result = operand1 & operand2;
                self.set_logic_flags_u8(result);
                result
            }
            Mnemonic::XOR => {
                let result = operand1 ^ operand2;
                self.set_logic_flags_u8(result);
                result
            }
            Mnemonic::TEST => {
                // AND that discards its result
                let result = operand1 & operand2;
                self.set_logic_flags_u8(result);
                operand1
            }
            Mnemonic::CMP => {
                // SUB that discards its result
                let (result, carry, overflow, aux_carry) = operand1.alu_sub(operand2);
                self.set_arith_flags_u8(result, carry, overflow, aux_carry);
                operand1
            }
            Mnemonic::NOT => {
                // Flags: none
                !operand1
            }
            _ => panic!("math_op8(): Invalid mnemonic: {:?}", mnemonic),
        }
    }

    /// Perform various 16-bit math operations
    pub fn math_op16(&mut self, mnemonic: Mnemonic, operand1: u16, operand2: u16) -> u16 {
        match mnemonic {
            Mnemonic::ADD => {
                let (result, carry, overflow, aux_carry) = operand1.alu_add(operand2);
                self.set_arith_flags_u16(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::ADC => {
                let (result, carry, overflow, aux_carry) =
                    operand1.alu_adc(operand2, self.get_flag(Flag::Carry));
                self.set_arith_flags_u16(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::SUB => {
                let (result, carry, overflow, aux_carry) = operand1.alu_sub(operand2);
                self.set_arith_flags_u16(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::SBB => {
                let (result, carry, overflow, aux_carry) =
                    operand1.alu_sbb(operand2, self.get_flag(Flag::Carry));
                self.set_arith_flags_u16(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::NEG => {
                let (result, carry, overflow, aux_carry) = operand1.alu_neg();
                self.set_arith_flags_u16(result, carry, overflow, aux_carry);
                result
            }
            Mnemonic::INC => {
                let (result, _carry, overflow, aux_carry) = operand1.alu_add(1);
                self.set_flag_state(Flag::Overflow, overflow);
                self.set_flag_state(Flag::AuxCarry, aux_carry);
                self.set_szp_flags_from_result_u16(result);
                result
            }
            Mnemonic::DEC => {
                let (result, _carry, overflow, aux_carry) = operand1.alu_sub(1);
                self.set_flag_state(Flag::Overflow, overflow);
                self.set_flag_state(Flag::AuxCarry, aux_carry);
                self.set_szp_flags_from_result_u16(result);
                result
            }
            Mnemonic::OR => {
                let result = operand1 | operand2;
                self.set_logic_flags_u16(result);
                result
            }
            Mnemonic::AND => {
                let result = operand1 & operand2;
                self.set_logic_flags_u16(result);
                result
            }
            Mnemonic::XOR => {
                let result = operand1 ^ operand2;
                self.set_logic_flags_u16(result);
                result
            }
            Mnemonic::TEST => {
                let result = operand1 & operand2;
                self.set_logic_flags_u16(result);
                operand1
            }
            Mnemonic::CMP => {
                let (result, carry, overflow, aux_carry) = operand1.alu_sub(operand2);
                self.set_arith_flags_u16(result, carry, overflow, aux_carry);
                operand1
            }
            Mnemonic::NOT => !operand1,
            _ => panic!("math_op16(): Invalid mnemonic: {:?}", mnemonic),
        }
    }

    /* ------------------------- Multiply & divide ------------------------- */

    /// Unsigned multiply, 8 bit. CF and OF are cleared when the high half of
    /// the product is zero, set otherwise. SF, ZF, AF and PF are undefined.
    pub fn multiply_u8(&mut self, operand: u8) {
        let product = self.get_register8(Register8::AL) as u16 * operand as u16;

        let high_set = product & 0xFF00 != 0;
        self.set_flag_state(Flag::Carry, high_set);
        self.set_flag_state(Flag::Overflow, high_set);

        self.set_register16(Register16::AX, product);
    }

    /// Unsigned multiply, 16 bit. Product goes to DX:AX.
    pub fn multiply_u16(&mut self, operand: u16) {
        let product = self.get_register16(Register16::AX) as u32 * operand as u32;

        let high_set = product & 0xFFFF_0000 != 0;
        self.set_flag_state(Flag::Carry, high_set);
        self.set_flag_state(Flag::Overflow, high_set);

        self.set_register16(Register16::DX, (product >> 16) as u16);
        self.set_register16(Register16::AX, (product & 0xFFFF) as u16);
    }

    /// Signed multiply, 8 bit. CF and OF are set when the product does not
    /// fit the low half.
    pub fn multiply_i8(&mut self, operand: i8) {
        let product = (self.get_register8(Register8::AL) as i8 as i16) * (operand as i16);

        let fits = product >= i8::MIN.into() && product <= i8::MAX.into();
        self.set_flag_state(Flag::Carry, !fits);
        self.set_flag_state(Flag::Overflow, !fits);

        self.set_register16(Register16::AX, product as u16);
    }

    /// Signed multiply, 16 bit. Product goes to DX:AX.
    pub fn multiply_i16(&mut self, operand: i16) {
        let product = (self.get_register16(Register16::AX) as i16 as i32) * (operand as i32);

        let fits = product >= i16::MIN.into() && product <= i16::MAX.into();
        self.set_flag_state(Flag::Carry, !fits);
        self.set_flag_state(Flag::Overflow, !fits);

        self.set_register16(Register16::DX, ((product as u32) >> 16) as u16);
        self.set_register16(Register16::AX, (product as u32 & 0xFFFF) as u16);
    }

    /// Unsigned divide, 8 bit: AX / operand -> AL quotient, AH remainder.
    /// Returns false on divide-by-zero or quotient overflow; the caller
    /// raises the divide fault.
    pub fn divide_u8(&mut self, operand: u8) -> bool {
        if operand == 0 {
            return false;
        }

        let dividend = self.get_register16(Register16::AX);
        let quotient = dividend / operand as u16;
        let remainder = dividend % operand as u16;

        if quotient & 0xFF00 != 0 {
            return false;
        }

        self.set_register8(Register8::AL, quotient as u8);
        self.set_register8(Register8::AH, remainder as u8);
        true
    }

    /// Unsigned divide, 16 bit: DX:AX / operand -> AX quotient, DX remainder.
    pub fn divide_u16(&mut self, operand: u16) -> bool {
        if operand == 0 {
            return false;
        }

        let dividend =
            (self.get_register16(Register16::DX) as u32) << 16 | self.get_register16(Register16::AX) as u32;
        let quotient = dividend / operand as u32;
        let remainder = dividend % operand as u32;

        if quotient & 0xFFFF_0000 != 0 {
            return false;
        }

        self.set_register16(Register16::AX, quotient as u16);
        self.set_register16(Register16::DX, remainder as u16);
        true
    }

    /// Signed divide, 8 bit.
    pub fn divide_i8(&mut self, operand: u8) -> bool {
        if operand == 0 {
            return false;
        }

        let dividend = self.get_register16(Register16::AX) as i16;
        let quotient = dividend.wrapping_div(operand as i8 as i16);
        let remainder = dividend.wrapping_rem(operand as i8 as i16);

        if quotient < i8::MIN as i16 || quotient > i8::MAX as i16 {
            return false;
        }

        self.set_register8(Register8::AL, quotient as u8);
        self.set_register8(Register8::AH, remainder as u8);
        true
    }

    /// Signed divide, 16 bit.
    pub fn divide_i16(&mut self, operand: u16) -> bool {
        if operand == 0 {
            return false;
        }

        let dividend = ((self.get_register16(Register16::DX) as u32) << 16
            | self.get_register16(Register16::AX) as u32) as i32;

        // Double cast to sign-extend the operand properly
        let quotient = dividend.wrapping_div(operand as i16 as i32);
        let remainder = dividend.wrapping_rem(operand as i16 as i32);

        if quotient < i16::MIN as i32 || quotient > i16::MAX as i32 {
            return false;
        }

        self.set_register16(Register16::AX, quotient as u16);
        self.set_register16(Register16::DX, remainder as u16);
        true
    }

    /// Sign extend AL into AX
    pub fn sign_extend_al(&mut self) {
        if self.get_register8(Register8::AL) & 0x80 != 0 {
            self.set_register8(Register8::AH, 0xFF);
        }
        else {
            self.set_register8(Register8::AH, 0);
        }
    }

    /// Sign extend AX into DX:AX
    pub fn sign_extend_ax(&mut self) {
        if self.get_register16(Register16::AX) & 0x8000 != 0 {
            self.set_register16(Register16::DX, 0xFFFF);
        }
        else {
            self.set_register16(Register16::DX, 0x0000);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inc_preserves_carry() {
        let mut cpu = Intel8086::new();
        cpu.set_flag(Flag::Carry);
        let result = cpu.math_op16(Mnemonic::INC, 0xFFFF, 0);
        assert_eq!(result, 0x0000);
        assert!(cpu.get_flag(Flag::Carry));
        assert!(cpu.get_flag(Flag::Zero));
        assert!(cpu.get_flag(Flag::AuxCarry));
        assert!(!cpu.get_flag(Flag::Overflow));
    }

    #[test]
    fn test_cmp_discards_result() {
        let mut cpu = Intel8086::new();
        let result = cpu.math_op8(Mnemonic::CMP, 0x03, 0x05);
        assert_eq!(result, 0x03);
        assert!(cpu.get_flag(Flag::Carry));
        assert!(cpu.get_flag(Flag::Sign));
    }

    #[test]
    fn test_logic_clears_carry_overflow() {
        let mut cpu = Intel8086::new();
        cpu.set_flag(Flag::Carry);
        cpu.set_flag(Flag::Overflow);
        let result = cpu.math_op8(Mnemonic::AND, 0xF0, 0x0F);
        assert_eq!(result, 0x00);
        assert!(!cpu.get_flag(Flag::Carry));
        assert!(!cpu.get_flag(Flag::Overflow));
        assert!(cpu.get_flag(Flag::Zero));
    }

    #[test]
    fn test_mul_div_roundtrip() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::AX, 12);
        cpu.multiply_u8(20);
        assert_eq!(cpu.get_register16(Register16::AX), 240);
        assert!(!cpu.get_flag(Flag::Carry));

        cpu.multiply_u8(2);
        // 240 * 2 = 480, high byte set
        assert_eq!(cpu.get_register16(Register16::AX), 480);
        assert!(cpu.get_flag(Flag::Carry));
        assert!(cpu.get_flag(Flag::Overflow));

        assert!(cpu.divide_u8(100));
        assert_eq!(cpu.get_register8(Register8::AL), 4);
        assert_eq!(cpu.get_register8(Register8::AH), 80);
    }

    #[test]
    fn test_divide_faults() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::AX, 0x1234);
        assert!(!cpu.divide_u8(0));

        // 0x1234 / 2 = 0x91A does not fit AL
        assert!(!cpu.divide_u8(2));

        // IDIV of the most negative quotient overflows
        cpu.set_register16(Register16::AX, 0x8000);
        cpu.set_register16(Register16::DX, 0xFFFF);
        assert!(!cpu.divide_i16(0xFFFF));
    }

    #[test]
    fn test_sign_extension() {
        let mut cpu = Intel8086::new();
        cpu.set_register8(Register8::AL, 0x80);
        cpu.sign_extend_al();
        assert_eq!(cpu.get_register16(Register16::AX), 0xFF80);

        cpu.sign_extend_ax();
        assert_eq!(cpu.get_register16(Register16::DX), 0xFFFF);
    }
}
