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

    cpu_8086::step.rs

    The fetch-decode-execute loop. The host hands in an instruction budget;
    prefix bytes latch their transient state and do not consume a quantum.

*/

use crate::cpu_8086::*;

impl Intel8086 {
    /// Run up to `program_length` instructions, returning how many retired.
    /// Execution stops early only on HLT (or when off-rails detection is
    /// enabled and trips). A budget of zero performs no work.
    pub fn execute(&mut self, program_length: usize) -> usize {
        let mut executed = 0;

        while executed < program_length && !self.halted {
            let result = self.step();
            executed += 1;

            if let ExecutionResult::Halt = result {
                break;
            }
        }

        executed
    }

    /// Retire exactly one instruction, consuming any prefixes in front of
    /// it. Prefix state lives only until the prefixed instruction retires.
    pub fn step(&mut self) -> ExecutionResult {
        loop {
            let opcode = self.fetch_u8();
            let result = self.execute_instruction(opcode);

            if let ExecutionResult::Prefix = result {
                continue;
            }

            self.segment_override = None;
            self.rep_type = RepType::NoRep;
            self.instruction_count += 1;

            if let ExecutionResult::Halt = result {
                log::debug!(
                    "HLT at CS:IP {:04X}:{:04X}",
                    self.get_register16(Register16::CS),
                    self.ip
                );
                self.halted = true;
                return result;
            }

            if self.off_rails_detection {
                if opcode == 0x00 {
                    self.opcode0_counter = self.opcode0_counter.saturating_add(1);
                    if self.opcode0_counter > 5 {
                        // A run of ADD [BX+SI],AL means we are executing
                        // zeroed memory; halt so the host can investigate.
                        log::warn!("Off-rails execution detected, halting");
                        self.halted = true;
                        return ExecutionResult::Halt;
                    }
                }
                else {
                    self.opcode0_counter = 0;
                }
            }

            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_counts_instructions() {
        let mut cpu = Intel8086::new();
        cpu.load_program(0x0000, 0x0000, &[0x90, 0x90, 0x90, 0x90]).unwrap();
        assert_eq!(cpu.execute(3), 3);
        assert_eq!(cpu.ip(), 3);
        assert_eq!(cpu.get_instruction_ct(), 3);
    }

    #[test]
    fn test_zero_budget_does_nothing() {
        let mut cpu = Intel8086::new();
        cpu.load_program(0x0000, 0x0000, &[0x90]).unwrap();
        assert_eq!(cpu.execute(0), 0);
        assert_eq!(cpu.ip(), 0);
    }

    #[test]
    fn test_prefix_is_free() {
        // ES-override MOV plus a NOP retire in a budget of two
        let mut cpu = Intel8086::new();
        cpu.load_program(0x0000, 0x0000, &[0x26, 0xA1, 0x00, 0x00, 0x90]).unwrap();
        assert_eq!(cpu.execute(2), 2);
        assert_eq!(cpu.ip(), 5);
    }

    #[test]
    fn test_halt_stops_execution() {
        let mut cpu = Intel8086::new();
        cpu.load_program(0x0000, 0x0000, &[0x90, 0xF4, 0x90]).unwrap();
        assert_eq!(cpu.execute(10), 2);
        assert!(cpu.is_halted());
        // A further budget is not spent while halted
        assert_eq!(cpu.execute(10), 0);

        cpu.set_halted(false);
        assert_eq!(cpu.execute(1), 1);
        assert_eq!(cpu.ip(), 3);
    }

    #[test]
    fn test_off_rails_detection() {
        let mut cpu = Intel8086::from_config(&crate::coreconfig::CpuConfig {
            reset_cs: 0,
            reset_ip: 0,
            off_rails_detection: true,
        });
        // Uninitialized memory is all zeroes; the run should trip the halt
        assert!(cpu.execute(100) < 100);
        assert!(cpu.is_halted());
    }
}
