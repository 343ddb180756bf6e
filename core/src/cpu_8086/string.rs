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

    cpu_8086::string.rs

    String instructions. The source side addresses seg:SI where seg honors a
    segment override; the destination side is always ES:DI. The direction
    flag selects forward or backward stepping.

*/

use crate::{
    cpu_8086::{mnemonic::Mnemonic, *},
    cpu_common::Segment,
};

impl Intel8086 {
    #[inline]
    fn advance_si(&mut self, step: u16) {
        let si = self.get_register16(Register16::SI);
        let si = match self.get_flag(Flag::Direction) {
            false => si.wrapping_add(step),
            true => si.wrapping_sub(step),
        };
        self.set_register16(Register16::SI, si);
    }

    #[inline]
    fn advance_di(&mut self, step: u16) {
        let di = self.get_register16(Register16::DI);
        let di = match self.get_flag(Flag::Direction) {
            false => di.wrapping_add(step),
            true => di.wrapping_sub(step),
        };
        self.set_register16(Register16::DI, di);
    }

    /// Perform one element of a string operation.
    pub fn string_op(&mut self, mnemonic: Mnemonic) {
        let segment_base_ds = self.segment_override.unwrap_or(Segment::DS);
        let si = self.get_register16(Register16::SI);
        let di = self.get_register16(Register16::DI);

        match mnemonic {
            Mnemonic::MOVSB => {
                let data = self.biu_read_u8(segment_base_ds, si);
                self.biu_write_u8(Segment::ES, di, data);
                self.advance_si(1);
                self.advance_di(1);
            }
            Mnemonic::MOVSW => {
                let data = self.biu_read_u16(segment_base_ds, si);
                self.biu_write_u16(Segment::ES, di, data);
                self.advance_si(2);
                self.advance_di(2);
            }
            Mnemonic::CMPSB => {
                // Flags from [seg:SI] - [ES:DI]
                let src = self.biu_read_u8(segment_base_ds, si);
                let dst = self.biu_read_u8(Segment::ES, di);
                self.math_op8(Mnemonic::CMP, src, dst);
                self.advance_si(1);
                self.advance_di(1);
            }
            Mnemonic::CMPSW => {
                let src = self.biu_read_u16(segment_base_ds, si);
                let dst = self.biu_read_u16(Segment::ES, di);
                self.math_op16(Mnemonic::CMP, src, dst);
                self.advance_si(2);
                self.advance_di(2);
            }
            Mnemonic::STOSB => {
                // The ES segment of the destination cannot be overridden
                let al = self.get_register8(Register8::AL);
                self.biu_write_u8(Segment::ES, di, al);
                self.advance_di(1);
            }
            Mnemonic::STOSW => {
                let ax = self.get_register16(Register16::AX);
                self.biu_write_u16(Segment::ES, di, ax);
                self.advance_di(2);
            }
            Mnemonic::LODSB => {
                let data = self.biu_read_u8(segment_base_ds, si);
                self.set_register8(Register8::AL, data);
                self.advance_si(1);
            }
            Mnemonic::LODSW => {
                let data = self.biu_read_u16(segment_base_ds, si);
                self.set_register16(Register16::AX, data);
                self.advance_si(2);
            }
            Mnemonic::SCASB => {
                // Flags from AL - [ES:DI]; neither side is overridable
                let al = self.get_register8(Register8::AL);
                let dst = self.biu_read_u8(Segment::ES, di);
                self.math_op8(Mnemonic::CMP, al, dst);
                self.advance_di(1);
            }
            Mnemonic::SCASW => {
                let ax = self.get_register16(Register16::AX);
                let dst = self.biu_read_u16(Segment::ES, di);
                self.math_op16(Mnemonic::CMP, ax, dst);
                self.advance_di(2);
            }
            _ => panic!("string_op(): Invalid mnemonic: {:?}", mnemonic),
        }
    }

    /// Run a string operation under the latched REP state. Without a REP
    /// prefix the element runs once. With one, the element repeats while CX
    /// counts down; the compare forms also stop as soon as ZF leaves the
    /// state the prefix requires.
    pub fn rep_string_op(&mut self, mnemonic: Mnemonic) {
        if self.rep_type == RepType::NoRep {
            self.string_op(mnemonic);
            return;
        }

        let compares = matches!(
            mnemonic,
            Mnemonic::CMPSB | Mnemonic::CMPSW | Mnemonic::SCASB | Mnemonic::SCASW
        );

        while self.get_register16(Register16::CX) != 0 {
            self.string_op(mnemonic);
            let cx = self.get_register16(Register16::CX).wrapping_sub(1);
            self.set_register16(Register16::CX, cx);

            if compares {
                let z = self.get_flag(Flag::Zero);
                match self.rep_type {
                    RepType::Repe if !z => break,
                    RepType::Repne if z => break,
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rep_movsb() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::DS, 0x0100);
        cpu.set_register16(Register16::ES, 0x0200);
        cpu.set_register16(Register16::SI, 0x0000);
        cpu.set_register16(Register16::DI, 0x0000);
        cpu.set_register16(Register16::CX, 4);
        cpu.load_program(0x0100, 0x0000, b"abcd").unwrap();

        cpu.rep_type = RepType::Repe;
        cpu.rep_string_op(Mnemonic::MOVSB);

        assert_eq!(&cpu.ram()[0x2000..0x2004], b"abcd");
        assert_eq!(cpu.get_register16(Register16::CX), 0);
        assert_eq!(cpu.get_register16(Register16::SI), 4);
        assert_eq!(cpu.get_register16(Register16::DI), 4);
    }

    #[test]
    fn test_repne_scasb_finds_byte() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::ES, 0x0200);
        cpu.set_register16(Register16::DI, 0x0000);
        cpu.set_register16(Register16::CX, 8);
        cpu.load_program(0x0200, 0x0000, b"hello\0xx").unwrap();
        cpu.set_register8(Register8::AL, 0);

        cpu.rep_type = RepType::Repne;
        cpu.rep_string_op(Mnemonic::SCASB);

        // Stopped one past the NUL at offset 5
        assert_eq!(cpu.get_register16(Register16::DI), 6);
        assert_eq!(cpu.get_register16(Register16::CX), 2);
        assert!(cpu.get_flag(Flag::Zero));
    }

    #[test]
    fn test_lods_backward() {
        let mut cpu = Intel8086::new();
        cpu.load_program(0x0000, 0x0010, &[0x11, 0x22]).unwrap();
        cpu.set_register16(Register16::SI, 0x0011);
        cpu.set_flag(Flag::Direction);
        cpu.string_op(Mnemonic::LODSB);
        assert_eq!(cpu.get_register8(Register8::AL), 0x22);
        assert_eq!(cpu.get_register16(Register16::SI), 0x0010);
    }
}
