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

    cpu_8086::bcd.rs

    The decimal adjust family, following the original 8086 documentation.
    Each instruction inspects AL's low nibble together with AF/CF and
    conditionally corrects AL (and AH for the unpacked forms).

*/

use crate::cpu_8086::*;

impl Intel8086 {
    /// DAA - Decimal Adjust AL after Addition
    /// Flags: SF, ZF and PF are set from the result; AF and CF per the
    /// adjustment. OF is undefined and left alone.
    pub fn daa(&mut self) {
        if (self.get_register8(Register8::AL) & 0x0F) > 9 || self.get_flag(Flag::AuxCarry) {
            let al = self.get_register8(Register8::AL).wrapping_add(6);
            self.set_register8(Register8::AL, al);
            self.set_flag(Flag::AuxCarry);
        }
        else {
            self.clear_flag(Flag::AuxCarry);
        }

        if self.get_register8(Register8::AL) > 0x9F || self.get_flag(Flag::Carry) {
            let al = self.get_register8(Register8::AL).wrapping_add(0x60);
            self.set_register8(Register8::AL, al);
            self.set_flag(Flag::Carry);
        }
        else {
            self.clear_flag(Flag::Carry);
        }

        self.set_szp_flags_from_result_u8(self.get_register8(Register8::AL));
    }

    /// DAS - Decimal Adjust AL after Subtraction
    /// Mirrors DAA with subtraction.
    pub fn das(&mut self) {
        if (self.get_register8(Register8::AL) & 0x0F) > 9 || self.get_flag(Flag::AuxCarry) {
            let al = self.get_register8(Register8::AL).wrapping_sub(6);
            self.set_register8(Register8::AL, al);
            self.set_flag(Flag::AuxCarry);
        }
        else {
            self.clear_flag(Flag::AuxCarry);
        }

        if self.get_register8(Register8::AL) > 0x9F || self.get_flag(Flag::Carry) {
            let al = self.get_register8(Register8::AL).wrapping_sub(0x60);
            self.set_register8(Register8::AL, al);
            self.set_flag(Flag::Carry);
        }
        else {
            self.clear_flag(Flag::Carry);
        }

        self.set_szp_flags_from_result_u8(self.get_register8(Register8::AL));
    }

    /// AAA - ASCII Adjust after Addition
    /// Flags: AF and CF per the adjustment; the rest are undefined.
    pub fn aaa(&mut self) {
        if (self.get_register8(Register8::AL) & 0x0F) > 9 || self.get_flag(Flag::AuxCarry) {
            let al = self.get_register8(Register8::AL).wrapping_add(6);
            let ah = self.get_register8(Register8::AH).wrapping_add(1);
            self.set_register8(Register8::AL, al);
            self.set_register8(Register8::AH, ah);
            self.set_flag(Flag::AuxCarry);
            self.set_flag(Flag::Carry);
        }
        else {
            self.clear_flag(Flag::AuxCarry);
            self.clear_flag(Flag::Carry);
        }

        let al = self.get_register8(Register8::AL) & 0x0F;
        self.set_register8(Register8::AL, al);
    }

    /// AAS - ASCII Adjust after Subtraction
    pub fn aas(&mut self) {
        if (self.get_register8(Register8::AL) & 0x0F) > 9 || self.get_flag(Flag::AuxCarry) {
            let al = self.get_register8(Register8::AL).wrapping_sub(6);
            let ah = self.get_register8(Register8::AH).wrapping_sub(1);
            self.set_register8(Register8::AL, al);
            self.set_register8(Register8::AH, ah);
            self.set_flag(Flag::AuxCarry);
            self.set_flag(Flag::Carry);
        }
        else {
            self.clear_flag(Flag::AuxCarry);
            self.clear_flag(Flag::Carry);
        }

        let al = self.get_register8(Register8::AL) & 0x0F;
        self.set_register8(Register8::AL, al);
    }

    /// AAM - ASCII Adjust AX after Multiply. The base is an immediate (0x0A
    /// in the documented encoding). Division by zero raises the divide
    /// fault, signalled by a false return.
    pub fn aam(&mut self, imm8: u8) -> bool {
        if imm8 == 0 {
            return false;
        }

        let al = self.get_register8(Register8::AL);
        self.set_register8(Register8::AH, al / imm8);
        self.set_register8(Register8::AL, al % imm8);

        // Intel's documentation specifies flags from AL, not AX
        self.set_szp_flags_from_result_u8(self.get_register8(Register8::AL));
        true
    }

    /// AAD - ASCII Adjust AX before Division.
    pub fn aad(&mut self, imm8: u8) {
        let product = self.get_register8(Register8::AH).wrapping_mul(imm8);
        let al = self.get_register8(Register8::AL).wrapping_add(product);
        self.set_register8(Register8::AL, al);
        self.set_register8(Register8::AH, 0);

        self.set_szp_flags_from_result_u8(al);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daa_low_nibble() {
        // 0x08 + 0x05 = 0x0D -> DAA -> 0x13
        let mut cpu = Intel8086::new();
        cpu.set_register8(Register8::AL, 0x0D);
        cpu.daa();
        assert_eq!(cpu.get_register8(Register8::AL), 0x13);
        assert!(cpu.get_flag(Flag::AuxCarry));
        assert!(!cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_daa_carry_out() {
        // 0x99 + 0x01 = 0x9A -> DAA -> 0x00 with carry
        let mut cpu = Intel8086::new();
        cpu.set_register8(Register8::AL, 0x9A);
        cpu.daa();
        assert_eq!(cpu.get_register8(Register8::AL), 0x00);
        assert!(cpu.get_flag(Flag::Carry));
        assert!(cpu.get_flag(Flag::Zero));
    }

    #[test]
    fn test_das() {
        // 0x47 - 0x28 = 0x1F -> DAS -> 0x19
        let mut cpu = Intel8086::new();
        cpu.set_register8(Register8::AL, 0x1F);
        cpu.das();
        assert_eq!(cpu.get_register8(Register8::AL), 0x19);
        assert!(cpu.get_flag(Flag::AuxCarry));
        assert!(!cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_aaa() {
        // 9 + 7 = 0x10 with AF -> AAA -> AX = 0x0106
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::AX, 0x0010);
        cpu.set_flag(Flag::AuxCarry);
        cpu.aaa();
        assert_eq!(cpu.get_register16(Register16::AX), 0x0106);
        assert!(cpu.get_flag(Flag::Carry));

        // No adjustment needed: just the nibble mask
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::AX, 0x0035);
        cpu.aaa();
        assert_eq!(cpu.get_register16(Register16::AX), 0x0005);
        assert!(!cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_aas_borrow() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::AX, 0x010F);
        cpu.aas();
        assert_eq!(cpu.get_register8(Register8::AL), 0x09);
        assert_eq!(cpu.get_register8(Register8::AH), 0x00);
        assert!(cpu.get_flag(Flag::Carry));
    }

    #[test]
    fn test_aam_aad() {
        let mut cpu = Intel8086::new();
        cpu.set_register8(Register8::AL, 73);
        assert!(cpu.aam(10));
        assert_eq!(cpu.get_register8(Register8::AH), 7);
        assert_eq!(cpu.get_register8(Register8::AL), 3);

        cpu.aad(10);
        assert_eq!(cpu.get_register16(Register16::AX), 73);

        assert!(!cpu.aam(0));
    }
}
