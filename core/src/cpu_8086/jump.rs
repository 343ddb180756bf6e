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

    cpu_8086::jump.rs

    Control transfer helpers: relative jumps, near and far calls and
    returns. IP already points past the whole instruction when these run,
    so relative displacements add to the address of the next instruction.

*/

use crate::cpu_8086::*;

impl Intel8086 {
    /// Transfer to a relative offset.
    #[inline]
    pub fn reljmp(&mut self, rel: i16) {
        self.ip = self.ip.wrapping_add(rel as u16);
    }

    /// Near call: push the return offset, then transfer.
    pub fn near_call(&mut self, new_ip: u16) {
        let ret_ip = self.ip;
        self.push_u16(ret_ip);
        self.ip = new_ip;
    }

    /// Near return, with optional release of callee arguments.
    pub fn near_return(&mut self, release: u16) {
        self.ip = self.pop_u16();
        let sp = self.get_register16(Register16::SP).wrapping_add(release);
        self.set_register16(Register16::SP, sp);
    }

    /// Far jump to segment:offset.
    pub fn farjmp(&mut self, new_cs: u16, new_ip: u16) {
        self.set_register16(Register16::CS, new_cs);
        self.ip = new_ip;
    }

    /// Far call: push the return segment and offset, then transfer.
    pub fn farcall(&mut self, new_cs: u16, new_ip: u16) {
        let ret_cs = self.get_register16(Register16::CS);
        let ret_ip = self.ip;
        self.push_u16(ret_cs);
        self.push_u16(ret_ip);
        self.farjmp(new_cs, new_ip);
    }

    /// Far return, with optional release of callee arguments.
    pub fn far_return(&mut self, release: u16) {
        self.ip = self.pop_u16();
        let cs = self.pop_u16();
        self.set_register16(Register16::CS, cs);
        let sp = self.get_register16(Register16::SP).wrapping_add(release);
        self.set_register16(Register16::SP, sp);
    }

    /// Evaluate the condition of a Jcc opcode from its low nibble. This is
    /// the standard 8086 predicate table; opcodes 0x60-0x7F all land here
    /// since the 0x60 row aliases the 0x70 row on stock hardware.
    pub fn jcc_condition(&self, opcode: u8) -> bool {
        match opcode & 0x0F {
            0x00 => self.get_flag(Flag::Overflow),  // JO
            0x01 => !self.get_flag(Flag::Overflow), // JNO
            0x02 => self.get_flag(Flag::Carry),     // JB
            0x03 => !self.get_flag(Flag::Carry),    // JNB
            0x04 => self.get_flag(Flag::Zero),      // JZ
            0x05 => !self.get_flag(Flag::Zero),     // JNZ
            0x06 => self.get_flag(Flag::Carry) || self.get_flag(Flag::Zero), // JBE
            0x07 => !self.get_flag(Flag::Carry) && !self.get_flag(Flag::Zero), // JNBE
            0x08 => self.get_flag(Flag::Sign),      // JS
            0x09 => !self.get_flag(Flag::Sign),     // JNS
            0x0A => self.get_flag(Flag::Parity),    // JP
            0x0B => !self.get_flag(Flag::Parity),   // JNP
            0x0C => self.get_flag(Flag::Sign) != self.get_flag(Flag::Overflow), // JL
            0x0D => self.get_flag(Flag::Sign) == self.get_flag(Flag::Overflow), // JNL
            0x0E => {
                // JLE: (ZF=1) OR (SF!=OF)
                self.get_flag(Flag::Zero)
                    || (self.get_flag(Flag::Sign) != self.get_flag(Flag::Overflow))
            }
            _ => {
                // JNLE: (ZF=0) AND (SF=OF)
                !self.get_flag(Flag::Zero)
                    && (self.get_flag(Flag::Sign) == self.get_flag(Flag::Overflow))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_common::Segment;

    #[test]
    fn test_reljmp_wraps() {
        let mut cpu = Intel8086::new();
        cpu.set_ip(0x0001);
        cpu.reljmp(-3);
        assert_eq!(cpu.ip(), 0xFFFE);
    }

    #[test]
    fn test_near_call_return() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::SP, 0x0100);
        cpu.set_ip(0x0005);
        cpu.near_call(0x0200);
        assert_eq!(cpu.ip(), 0x0200);
        assert_eq!(cpu.biu_read_u16(Segment::SS, 0x00FE), 0x0005);
        cpu.near_return(0);
        assert_eq!(cpu.ip(), 0x0005);
        assert_eq!(cpu.get_register16(Register16::SP), 0x0100);
    }

    #[test]
    fn test_farcall_return_with_release() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::SP, 0x0100);
        cpu.set_register16(Register16::CS, 0x1000);
        cpu.set_ip(0x0042);
        cpu.farcall(0x2000, 0x0010);
        assert_eq!(cpu.get_register16(Register16::CS), 0x2000);
        assert_eq!(cpu.ip(), 0x0010);
        cpu.far_return(4);
        assert_eq!(cpu.get_register16(Register16::CS), 0x1000);
        assert_eq!(cpu.ip(), 0x0042);
        assert_eq!(cpu.get_register16(Register16::SP), 0x0104);
    }

    #[test]
    fn test_signed_predicates() {
        let mut cpu = Intel8086::new();
        // SF != OF: less
        cpu.set_flag(Flag::Sign);
        assert!(cpu.jcc_condition(0x7C));
        assert!(!cpu.jcc_condition(0x7D));
        // SF == OF and ZF == 0: greater
        cpu.set_flag(Flag::Overflow);
        assert!(cpu.jcc_condition(0x7F));
        cpu.set_flag(Flag::Zero);
        assert!(!cpu.jcc_condition(0x7F));
    }
}
