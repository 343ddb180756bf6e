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

    cpu_8086::stack.rs

    Stack operations. The stack grows downward in SS; SP points at the last
    pushed word.

*/

use crate::{cpu_8086::*, cpu_common::Segment};

impl Intel8086 {
    pub fn push_u16(&mut self, value: u16) {
        let sp = self.get_register16(Register16::SP).wrapping_sub(2);
        self.set_register16(Register16::SP, sp);
        self.biu_write_u16(Segment::SS, sp, value);
    }

    pub fn pop_u16(&mut self) -> u16 {
        let sp = self.get_register16(Register16::SP);
        let value = self.biu_read_u16(Segment::SS, sp);
        self.set_register16(Register16::SP, sp.wrapping_add(2));
        value
    }

    pub fn push_register16(&mut self, reg: Register16) {
        // The 8086 pushes the decremented value of SP itself, unlike later
        // CPUs which push the value before the decrement.
        if reg == Register16::SP {
            let sp = self.get_register16(Register16::SP).wrapping_sub(2);
            self.set_register16(Register16::SP, sp);
            self.biu_write_u16(Segment::SS, sp, sp);
        }
        else {
            let value = self.get_register16(reg);
            self.push_u16(value);
        }
    }

    // POP SP loads the popped word after the increment, so the net effect is
    // SP = the word that was on the stack. The read-increment-write order
    // here produces exactly that.
    pub fn pop_register16(&mut self, reg: Register16) {
        let value = self.pop_u16();
        self.set_register16(reg, value);
    }

    pub fn push_flags(&mut self) {
        let flags = self.get_flags();
        self.push_u16(flags);
    }

    pub fn pop_flags(&mut self) {
        let flags = self.pop_u16();
        self.set_flags(flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_identity() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::SS, 0x2000);
        cpu.set_register16(Register16::SP, 0x0100);
        cpu.set_register16(Register16::BX, 0xCAFE);

        cpu.push_register16(Register16::BX);
        assert_eq!(cpu.get_register16(Register16::SP), 0x00FE);
        cpu.pop_register16(Register16::BX);
        assert_eq!(cpu.get_register16(Register16::BX), 0xCAFE);
        assert_eq!(cpu.get_register16(Register16::SP), 0x0100);
    }

    #[test]
    fn test_push_sp_stores_new_value() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::SP, 0x0100);
        cpu.push_register16(Register16::SP);
        assert_eq!(cpu.biu_read_u16(Segment::SS, 0x00FE), 0x00FE);
    }

    #[test]
    fn test_pop_sp_loads_popped_word() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::SP, 0x0100);
        cpu.biu_write_u16(Segment::SS, 0x0100, 0x4444);
        cpu.pop_register16(Register16::SP);
        assert_eq!(cpu.get_register16(Register16::SP), 0x4444);
    }

    #[test]
    fn test_pop_flags_keeps_reserved() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::SP, 0x0100);
        cpu.push_u16(0x0000);
        cpu.pop_flags();
        assert_eq!(cpu.get_flags(), CPU_FLAGS_RESERVED_ON);
    }
}
