//! Tiny in-crate encoder used by the unit tests to build programs.

use crate::cpu::{AddressingMode, Condition, Op, Width};
use crate::image::Segment;

const REG_DIRECT: AddressingMode = AddressingMode::RegisterDirect;
const REG_IMM: AddressingMode = AddressingMode::RegisterImmediate;
const IND_DST: AddressingMode = AddressingMode::IndirectDestination;
const IND_SRC: AddressingMode = AddressingMode::IndirectSource;

pub(crate) fn first_byte(op: Op, width: Width, mode: AddressingMode) -> u8 {
    let b = match width {
        Width::Word => 0,
        Width::Byte => 1,
    };
    ((op as u8) << 3) | (b << 2) | mode as u8
}

/// Program assembled at a fixed origin.
#[derive(Clone, Debug)]
pub(crate) struct Asm {
    origin: u16,
    bytes: Vec<u8>,
}

impl Asm {
    pub fn at(origin: u16) -> Self {
        Self {
            origin,
            bytes: Vec::new(),
        }
    }

    /// Address of the next emitted byte.
    pub fn here(&self) -> u16 {
        self.origin + self.bytes.len() as u16
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.origin, self.bytes.clone())
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    fn emit(&mut self, op: Op, width: Width, mode: AddressingMode, operands: &[u8]) -> &mut Self {
        self.bytes.push(first_byte(op, width, mode));
        self.raw(operands)
    }

    /// NOP, HLT, RSB, CLI, SEI, RSI.
    pub fn op(&mut self, op: Op) -> &mut Self {
        self.emit(op, Width::Word, REG_DIRECT, &[])
    }

    /// PHR, PLR, INC, DEC, NOT.
    pub fn reg(&mut self, op: Op, r: u8) -> &mut Self {
        self.emit(op, Width::Word, REG_DIRECT, &[r])
    }

    pub fn reg_b(&mut self, op: Op, r: u8) -> &mut Self {
        self.emit(op, Width::Byte, REG_DIRECT, &[r])
    }

    pub fn rr(&mut self, op: Op, dst: u8, src: u8) -> &mut Self {
        self.emit(op, Width::Word, REG_DIRECT, &[(dst << 4) | src])
    }

    pub fn rr_b(&mut self, op: Op, dst: u8, src: u8) -> &mut Self {
        self.emit(op, Width::Byte, REG_DIRECT, &[(dst << 4) | src])
    }

    pub fn ri(&mut self, op: Op, dst: u8, imm: u16) -> &mut Self {
        let [lo, hi] = imm.to_le_bytes();
        self.emit(op, Width::Word, REG_IMM, &[dst, lo, hi])
    }

    pub fn ri_b(&mut self, op: Op, dst: u8, imm: u8) -> &mut Self {
        self.emit(op, Width::Byte, REG_IMM, &[dst, imm])
    }

    /// `MOV [addr], src`
    pub fn store(&mut self, addr: u8, src: u8) -> &mut Self {
        self.emit(Op::Mov, Width::Word, IND_DST, &[(addr << 4) | src])
    }

    pub fn store_b(&mut self, addr: u8, src: u8) -> &mut Self {
        self.emit(Op::Mov, Width::Byte, IND_DST, &[(addr << 4) | src])
    }

    /// `op dst, [addr]`
    pub fn load(&mut self, op: Op, dst: u8, addr: u8) -> &mut Self {
        self.emit(op, Width::Word, IND_SRC, &[(dst << 4) | addr])
    }

    pub fn load_b(&mut self, op: Op, dst: u8, addr: u8) -> &mut Self {
        self.emit(op, Width::Byte, IND_SRC, &[(dst << 4) | addr])
    }

    pub fn jmp(&mut self, target: u16) -> &mut Self {
        let [lo, hi] = target.to_le_bytes();
        self.emit(Op::Jmp, Width::Word, REG_IMM, &[lo, hi])
    }

    pub fn jmp_reg(&mut self, r: u8) -> &mut Self {
        self.emit(Op::Jmp, Width::Word, REG_DIRECT, &[r])
    }

    pub fn jsb(&mut self, target: u16) -> &mut Self {
        let [lo, hi] = target.to_le_bytes();
        self.emit(Op::Jsb, Width::Word, REG_IMM, &[lo, hi])
    }

    pub fn jsb_reg(&mut self, r: u8) -> &mut Self {
        self.emit(Op::Jsb, Width::Word, REG_DIRECT, &[r])
    }

    pub fn jpc(&mut self, cond: Condition, target: u16) -> &mut Self {
        let [lo, hi] = target.to_le_bytes();
        self.emit(Op::Jpc, Width::Word, REG_IMM, &[cond.field() << 4, lo, hi])
    }

    pub fn jpc_reg(&mut self, cond: Condition, r: u8) -> &mut Self {
        self.emit(Op::Jpc, Width::Word, REG_DIRECT, &[(cond.field() << 4) | r])
    }
}
