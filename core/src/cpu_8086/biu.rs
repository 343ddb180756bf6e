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

    cpu_8086::biu.rs

    Memory access through segment:offset addressing, and instruction fetch
    from CS:IP. The core is cycle-agnostic, so there is no prefetch queue;
    a fetch reads memory directly and advances IP.

*/

use crate::{
    cpu_8086::*,
    cpu_common::{calc_linear_address, Segment},
};

impl Intel8086 {
    #[inline]
    pub fn calc_linear_address(segment: u16, offset: u16) -> u32 {
        calc_linear_address(segment, offset)
    }

    #[inline]
    fn segment_value(&self, segment: Segment) -> u16 {
        match segment {
            Segment::None => 0,
            Segment::ES => self.get_register16(Register16::ES),
            Segment::CS => self.get_register16(Register16::CS),
            Segment::SS => self.get_register16(Register16::SS),
            Segment::DS => self.get_register16(Register16::DS),
        }
    }

    /* ------------------------- Physical accesses ------------------------- */

    #[inline]
    pub fn mem_read_u8(&self, address: u32) -> u8 {
        self.state[STATE_RAM_OFFSET + (address & 0xFFFFF) as usize]
    }

    #[inline]
    pub fn mem_write_u8(&mut self, address: u32, value: u8) {
        self.state[STATE_RAM_OFFSET + (address & 0xFFFFF) as usize] = value;
    }

    /* ------------------------- Logical accesses -------------------------- */

    #[inline]
    pub fn biu_read_u8(&self, segment: Segment, offset: u16) -> u8 {
        self.mem_read_u8(calc_linear_address(self.segment_value(segment), offset))
    }

    #[inline]
    pub fn biu_write_u8(&mut self, segment: Segment, offset: u16, value: u8) {
        self.mem_write_u8(calc_linear_address(self.segment_value(segment), offset), value);
    }

    // Word accesses are two byte accesses. The offset wraps modulo 2^16
    // before segment translation, so a word at offset FFFF straddles back to
    // offset 0000 of the same segment; the linear mask handles the 1 MiB
    // wrap the same way. No alignment requirement.
    #[inline]
    pub fn biu_read_u16(&self, segment: Segment, offset: u16) -> u16 {
        let lo = self.biu_read_u8(segment, offset);
        let hi = self.biu_read_u8(segment, offset.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub fn biu_write_u16(&mut self, segment: Segment, offset: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.biu_write_u8(segment, offset, lo);
        self.biu_write_u8(segment, offset.wrapping_add(1), hi);
    }

    /* ------------------------ Instruction fetch -------------------------- */

    #[inline]
    pub fn fetch_u8(&mut self) -> u8 {
        let byte = self.biu_read_u8(Segment::CS, self.ip);
        self.ip = self.ip.wrapping_add(1);
        byte
    }

    #[inline]
    pub fn fetch_i8(&mut self) -> i8 {
        self.fetch_u8() as i8
    }

    #[inline]
    pub fn fetch_u16(&mut self) -> u16 {
        let lo = self.fetch_u8();
        let hi = self.fetch_u8();
        u16::from_le_bytes([lo, hi])
    }
}
