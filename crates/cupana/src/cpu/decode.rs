use std::fmt;

use super::{Bus, Flags};
use crate::fault::Fault;

/// Operand width selected by the `b` bit of the first instruction byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    Word,
    Byte,
}

impl Width {
    #[inline]
    pub const fn mask(self) -> u16 {
        match self {
            Width::Word => 0xFFFF,
            Width::Byte => 0x00FF,
        }
    }

    #[inline]
    pub const fn sign_bit(self) -> u16 {
        match self {
            Width::Word => 0x8000,
            Width::Byte => 0x0080,
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Width::Word => 16,
            Width::Byte => 8,
        }
    }

    #[inline]
    pub const fn bytes(self) -> u16 {
        match self {
            Width::Word => 2,
            Width::Byte => 1,
        }
    }
}

/// The 2-bit addressing mode field.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// `00`: both operands are registers.
    RegisterDirect = 0b00,
    /// `01`: destination register, literal second operand.
    RegisterImmediate = 0b01,
    /// `10`: the first register holds the address that is written.
    IndirectDestination = 0b10,
    /// `11`: the second register holds the address that is read.
    IndirectSource = 0b11,
}

impl AddressingMode {
    const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => AddressingMode::RegisterDirect,
            0b01 => AddressingMode::RegisterImmediate,
            0b10 => AddressingMode::IndirectDestination,
            _ => AddressingMode::IndirectSource,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Nop = 0x00,
    Hlt = 0x01,
    Mov = 0x02,
    Phr = 0x03,
    Plr = 0x04,
    Add = 0x05,
    Sub = 0x06,
    Mul = 0x07,
    Div = 0x08,
    Mod = 0x09,
    Inc = 0x0A,
    Dec = 0x0B,
    And = 0x0C,
    Or = 0x0D,
    Xor = 0x0E,
    Shl = 0x0F,
    Shr = 0x10,
    Not = 0x11,
    Cmp = 0x12,
    Jmp = 0x13,
    Jpc = 0x14,
    Jsb = 0x15,
    Rsb = 0x16,
    Cli = 0x17,
    Sei = 0x18,
    Rsi = 0x19,
}

impl Op {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Op::Nop => "NOP",
            Op::Hlt => "HLT",
            Op::Mov => "MOV",
            Op::Phr => "PHR",
            Op::Plr => "PLR",
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::Mod => "MOD",
            Op::Inc => "INC",
            Op::Dec => "DEC",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Xor => "XOR",
            Op::Shl => "SHL",
            Op::Shr => "SHR",
            Op::Not => "NOT",
            Op::Cmp => "CMP",
            Op::Jmp => "JMP",
            Op::Jpc => "JPC",
            Op::Jsb => "JSB",
            Op::Rsb => "RSB",
            Op::Cli => "CLI",
            Op::Sei => "SEI",
            Op::Rsi => "RSI",
        }
    }
}

/// Condition selector of the conditional jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    Zero,
    NotZero,
    Carry,
    NotCarry,
    Negative,
    NotNegative,
    Overflow,
    NotOverflow,
}

/// Condition field value -> (condition, tested flag, required state).
const CONDITIONS: [(Condition, Flags, bool); 8] = [
    (Condition::Zero, Flags::ZERO, true),
    (Condition::NotZero, Flags::ZERO, false),
    (Condition::Carry, Flags::CARRY, true),
    (Condition::NotCarry, Flags::CARRY, false),
    (Condition::Negative, Flags::NEGATIVE, true),
    (Condition::NotNegative, Flags::NEGATIVE, false),
    (Condition::Overflow, Flags::OVERFLOW, true),
    (Condition::NotOverflow, Flags::OVERFLOW, false),
];

impl Condition {
    pub fn from_field(field: u8) -> Option<Self> {
        CONDITIONS.get(field as usize).map(|&(cond, _, _)| cond)
    }

    pub fn field(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn holds(self, flags: Flags) -> bool {
        let (_, flag, expected) = CONDITIONS[self as usize];
        flags.contains(flag) == expected
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Condition::Zero => "JZ",
            Condition::NotZero => "JNZ",
            Condition::Carry => "JC",
            Condition::NotCarry => "JNC",
            Condition::Negative => "JN",
            Condition::NotNegative => "JNN",
            Condition::Overflow => "JV",
            Condition::NotOverflow => "JNV",
        }
    }
}

/// Where a control transfer goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Register(u8),
    Address(u16),
}

/// Operand fields of a decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operands {
    None,
    Register(u8),
    RegisterPair { dst: u8, src: u8 },
    Immediate { dst: u8, imm: u16 },
    IndirectDestination { addr: u8, src: u8 },
    IndirectSource { dst: u8, addr: u8 },
    Jump {
        cond: Option<Condition>,
        target: Target,
    },
}

/// A decoded instruction. Lives for a single decode/execute cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub op: Op,
    pub width: Width,
    pub mode: AddressingMode,
    pub operands: Operands,
    /// Encoded length in bytes.
    pub len: u8,
}

impl Instruction {
    /// The first encoded byte: opcode, width bit and addressing mode.
    pub fn first_byte(&self) -> u8 {
        let b = match self.width {
            Width::Word => 0,
            Width::Byte => 1,
        };
        ((self.op as u8) << 3) | (b << 2) | self.mode as u8
    }
}

/// How the operand bytes of an opcode are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Form {
    Implied,
    Register,
    Binary,
    Move,
    Target,
    Conditional,
}

/// Instruction length in bytes indexed by `[b][mode]`; 0 marks an illegal
/// combination.
type Lengths = [[u8; 4]; 2];

const IMPLIED: Lengths = [[1, 0, 0, 0], [0, 0, 0, 0]];
const REGISTER: Lengths = [[2, 0, 0, 0], [2, 0, 0, 0]];
const BINARY: Lengths = [[2, 4, 0, 2], [2, 3, 0, 2]];
const MOVE: Lengths = [[2, 4, 2, 2], [2, 3, 2, 2]];
const TARGET: Lengths = [[2, 3, 0, 0], [0, 0, 0, 0]];
const CONDITIONAL: Lengths = [[2, 4, 0, 0], [0, 0, 0, 0]];

#[derive(Clone, Copy, Debug)]
struct OpcodeInfo {
    op: Op,
    form: Form,
    lengths: Lengths,
}

const fn entry(op: Op, form: Form, lengths: Lengths) -> Option<OpcodeInfo> {
    Some(OpcodeInfo { op, form, lengths })
}

/// The opcode table, indexed by the 5-bit opcode field.
const OPCODES: [Option<OpcodeInfo>; 32] = [
    entry(Op::Nop, Form::Implied, IMPLIED),
    entry(Op::Hlt, Form::Implied, IMPLIED),
    entry(Op::Mov, Form::Move, MOVE),
    entry(Op::Phr, Form::Register, REGISTER),
    entry(Op::Plr, Form::Register, REGISTER),
    entry(Op::Add, Form::Binary, BINARY),
    entry(Op::Sub, Form::Binary, BINARY),
    entry(Op::Mul, Form::Binary, BINARY),
    entry(Op::Div, Form::Binary, BINARY),
    entry(Op::Mod, Form::Binary, BINARY),
    entry(Op::Inc, Form::Register, REGISTER),
    entry(Op::Dec, Form::Register, REGISTER),
    entry(Op::And, Form::Binary, BINARY),
    entry(Op::Or, Form::Binary, BINARY),
    entry(Op::Xor, Form::Binary, BINARY),
    entry(Op::Shl, Form::Binary, BINARY),
    entry(Op::Shr, Form::Binary, BINARY),
    entry(Op::Not, Form::Register, REGISTER),
    entry(Op::Cmp, Form::Binary, BINARY),
    entry(Op::Jmp, Form::Target, TARGET),
    entry(Op::Jpc, Form::Conditional, CONDITIONAL),
    entry(Op::Jsb, Form::Target, TARGET),
    entry(Op::Rsb, Form::Implied, IMPLIED),
    entry(Op::Cli, Form::Implied, IMPLIED),
    entry(Op::Sei, Form::Implied, IMPLIED),
    entry(Op::Rsi, Form::Implied, IMPLIED),
    None,
    None,
    None,
    None,
    None,
    None,
];

/// Total length in bytes of the instruction whose first byte is `first`,
/// or `None` if that byte does not start a legal instruction.
pub fn instruction_length(first: u8) -> Option<u8> {
    let info = OPCODES[(first >> 3) as usize]?;
    let b = ((first >> 2) & 1) as usize;
    let mode = (first & 0b11) as usize;
    match info.lengths[b][mode] {
        0 => None,
        len => Some(len),
    }
}

#[inline]
fn split_pair(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

/// Decode the instruction at `pc`. Reads through the bus but does not
/// modify any CPU state.
pub fn decode<B: Bus>(bus: &mut B, pc: u16) -> Result<Instruction, Fault> {
    let first = bus.read(pc, Width::Byte)? as u8;
    let illegal = Fault::IllegalInstruction { pc, opcode: first };

    let info = OPCODES[(first >> 3) as usize].ok_or(illegal)?;
    let len = instruction_length(first).ok_or(illegal)?;
    let width = if first & 0b100 != 0 {
        Width::Byte
    } else {
        Width::Word
    };
    let mode = AddressingMode::from_bits(first);

    let byte_at = |bus: &mut B, offset: u16| -> Result<u8, Fault> {
        Ok(bus.read(pc.wrapping_add(offset), Width::Byte)? as u8)
    };
    let literal_at = |bus: &mut B, offset: u16, width: Width| -> Result<u16, Fault> {
        bus.read(pc.wrapping_add(offset), width)
    };
    let single_register = |byte: u8| -> Result<u8, Fault> {
        if byte & 0xF0 != 0 {
            Err(illegal)
        } else {
            Ok(byte)
        }
    };

    let operands = match info.form {
        Form::Implied => Operands::None,
        Form::Register => Operands::Register(single_register(byte_at(bus, 1)?)?),
        Form::Binary | Form::Move => {
            let byte = byte_at(bus, 1)?;
            match mode {
                AddressingMode::RegisterDirect => {
                    let (dst, src) = split_pair(byte);
                    Operands::RegisterPair { dst, src }
                }
                AddressingMode::RegisterImmediate => Operands::Immediate {
                    dst: single_register(byte)?,
                    imm: literal_at(bus, 2, width)?,
                },
                AddressingMode::IndirectDestination => {
                    let (addr, src) = split_pair(byte);
                    Operands::IndirectDestination { addr, src }
                }
                AddressingMode::IndirectSource => {
                    let (dst, addr) = split_pair(byte);
                    Operands::IndirectSource { dst, addr }
                }
            }
        }
        Form::Target => {
            let target = match mode {
                AddressingMode::RegisterDirect => {
                    Target::Register(single_register(byte_at(bus, 1)?)?)
                }
                _ => Target::Address(literal_at(bus, 1, Width::Word)?),
            };
            Operands::Jump { cond: None, target }
        }
        Form::Conditional => {
            let (field, reg) = split_pair(byte_at(bus, 1)?);
            let cond = Condition::from_field(field).ok_or(illegal)?;
            let target = match mode {
                AddressingMode::RegisterDirect => Target::Register(reg),
                _ if reg != 0 => return Err(illegal),
                _ => Target::Address(literal_at(bus, 2, Width::Word)?),
            };
            Operands::Jump {
                cond: Some(cond),
                target,
            }
        }
    };

    Ok(Instruction {
        op: info.op,
        width,
        mode,
        operands,
        len,
    })
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Register(r) => write!(f, "R{r}"),
            Target::Address(addr) => write!(f, "0x{addr:04X}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.width {
            Width::Byte => ".B",
            Width::Word => "",
        };
        let literal = |imm: u16| match self.width {
            Width::Byte => format!("0x{imm:02X}"),
            Width::Word => format!("0x{imm:04X}"),
        };
        match self.operands {
            Operands::None => write!(f, "{}", self.op.mnemonic()),
            Operands::Register(r) => write!(f, "{}{suffix} R{r}", self.op.mnemonic()),
            Operands::RegisterPair { dst, src } => {
                write!(f, "{}{suffix} R{dst}, R{src}", self.op.mnemonic())
            }
            Operands::Immediate { dst, imm } => {
                write!(f, "{}{suffix} R{dst}, {}", self.op.mnemonic(), literal(imm))
            }
            Operands::IndirectDestination { addr, src } => {
                write!(f, "{}{suffix} [R{addr}], R{src}", self.op.mnemonic())
            }
            Operands::IndirectSource { dst, addr } => {
                write!(f, "{}{suffix} R{dst}, [R{addr}]", self.op.mnemonic())
            }
            Operands::Jump { cond: None, target } => write!(f, "{} {target}", self.op.mnemonic()),
            Operands::Jump {
                cond: Some(cond),
                target,
            } => write!(f, "{} {target}", cond.mnemonic()),
        }
    }
}
