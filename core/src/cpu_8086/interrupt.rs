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

    cpu_8086::interrupt.rs

    Software interrupts and IRET. Only the architectural state transitions
    are modelled; there is no interrupt controller and no hardware INTR pin.

*/

use crate::{cpu_8086::*, cpu_common::Segment};

const INTERRUPT_VEC_LEN: u16 = 4;

impl Intel8086 {
    /// Perform a software interrupt: push FLAGS, clear IF and TF, then far
    /// call through the interrupt vector table at physical vector * 4.
    pub fn sw_interrupt(&mut self, interrupt: u8) {
        let vec_addr = interrupt as u16 * INTERRUPT_VEC_LEN;

        let new_ip = self.biu_read_u16(Segment::None, vec_addr);
        let new_cs = self.biu_read_u16(Segment::None, vec_addr.wrapping_add(2));

        self.push_flags();
        self.clear_flag(Flag::Interrupt);
        self.clear_flag(Flag::Trap);
        self.farcall(new_cs, new_ip);
    }

    /// Divide fault (vector 0), raised by DIV/IDIV/AAM. The pushed return
    /// address is that of the following instruction.
    pub fn int0(&mut self) {
        log::debug!("Divide fault at CS:IP {:04X}:{:04X}", self.get_register16(Register16::CS), self.ip);
        self.sw_interrupt(0);
    }

    /// Execute the IRET routine: far return, then restore FLAGS.
    pub fn iret_routine(&mut self) {
        self.far_return(0);
        self.pop_flags();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sw_interrupt_and_iret() {
        let mut cpu = Intel8086::new();
        cpu.set_register16(Register16::SP, 0x0100);
        cpu.set_register16(Register16::CS, 0x1000);
        cpu.set_ip(0x0042);
        cpu.set_flag(Flag::Interrupt);
        cpu.set_flag(Flag::Carry);

        // Vector 0x21 -> 2000:0010
        cpu.mem_write_u8(0x21 * 4, 0x10);
        cpu.mem_write_u8(0x21 * 4 + 1, 0x00);
        cpu.mem_write_u8(0x21 * 4 + 2, 0x00);
        cpu.mem_write_u8(0x21 * 4 + 3, 0x20);

        cpu.sw_interrupt(0x21);
        assert_eq!(cpu.get_register16(Register16::CS), 0x2000);
        assert_eq!(cpu.ip(), 0x0010);
        assert!(!cpu.get_flag(Flag::Interrupt));
        assert!(!cpu.get_flag(Flag::Trap));
        // The handler sees the caller's carry
        assert!(cpu.get_flag(Flag::Carry));

        cpu.clear_flag(Flag::Carry);
        cpu.iret_routine();
        assert_eq!(cpu.get_register16(Register16::CS), 0x1000);
        assert_eq!(cpu.ip(), 0x0042);
        // IF and CF restored from the pushed image
        assert!(cpu.get_flag(Flag::Interrupt));
        assert!(cpu.get_flag(Flag::Carry));
        assert_eq!(cpu.get_register16(Register16::SP), 0x0100);
    }
}
