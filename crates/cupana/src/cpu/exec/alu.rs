use crate::cpu::alu::{self, AluResult};
use crate::cpu::{Bus, Cpu, Instruction, Op, Operands};
use crate::fault::Fault;

impl Cpu {
    /// Two-operand arithmetic, logic, shift and compare.
    ///
    /// The first operand is always a register and receives the result
    /// (except for CMP, which only updates flags).
    pub(super) fn exec_binary<B: Bus>(
        &mut self,
        bus: &mut B,
        pc: u16,
        instruction: &Instruction,
    ) -> Result<(), Fault> {
        let width = instruction.width;
        let (dst, b) = match instruction.operands {
            Operands::RegisterPair { dst, src } => (dst, self.read_reg(src, width)),
            Operands::Immediate { dst, imm } => (dst, imm & width.mask()),
            Operands::IndirectSource { dst, addr } => {
                (dst, bus.read(self.regs.get(addr), width)? & width.mask())
            }
            _ => return Err(self.illegal(pc, instruction)),
        };
        let a = self.read_reg(dst, width);

        let out: AluResult = match instruction.op {
            Op::Add => alu::add(a, b, width),
            Op::Sub | Op::Cmp => alu::sub(a, b, width),
            Op::Mul => alu::mul(a, b, width),
            Op::Div => alu::div(a, b, width).ok_or(Fault::DivisionByZero(pc))?,
            Op::Mod => alu::rem(a, b, width).ok_or(Fault::DivisionByZero(pc))?,
            Op::And => alu::and(a, b, width),
            Op::Or => alu::or(a, b, width),
            Op::Xor => alu::xor(a, b, width),
            Op::Shl => alu::shl(a, b, width),
            Op::Shr => alu::shr(a, b, width),
            _ => return Err(self.illegal(pc, instruction)),
        };

        if instruction.op != Op::Cmp {
            self.write_reg(dst, out.value, width);
        }
        self.merge_arithmetic(out.flags);
        Ok(())
    }

    /// INC, DEC and NOT on a single register.
    pub(super) fn exec_unary(&mut self, pc: u16, instruction: &Instruction) -> Result<(), Fault> {
        let Operands::Register(reg) = instruction.operands else {
            return Err(self.illegal(pc, instruction));
        };
        let width = instruction.width;
        let value = self.read_reg(reg, width);

        let out = match instruction.op {
            Op::Inc => alu::add(value, 1, width),
            Op::Dec => alu::sub(value, 1, width),
            Op::Not => alu::not(value, width),
            _ => return Err(self.illegal(pc, instruction)),
        };

        self.write_reg(reg, out.value, width);
        self.merge_arithmetic(out.flags);
        Ok(())
    }
}
