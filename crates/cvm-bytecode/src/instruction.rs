//! Decoded instructions.
//!
//! [`Instruction`] is the runtime-friendly view of one encoded instruction,
//! with [`decode`](Instruction::decode) and [`encode`](Instruction::encode)
//! for the wire format: opcode byte followed by 0, 1 or 2 big-endian `i32`s.

use crate::codec::{IMMEDIATE_SIZE, encode_i32, read_i32};
use crate::opcode::{InstructionSet, Opcode};

/// Source of an address operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Popped from the value stack at run time.
    Stack,
    /// Encoded in the instruction stream.
    Imm(i32),
}

/// Operands of `store`: both popped, or both encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOperands {
    Stack,
    Imm { dst: i32, src: i32 },
}

/// Two-operand arithmetic and bitwise operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shr,
    Shl,
    Xor,
    And,
    Or,
}

impl BinaryOp {
    /// Compute `y op x`, where `x` was popped first.
    ///
    /// Arithmetic wraps; shift amounts are taken modulo 32; `shr` is
    /// arithmetic. Returns `None` for division or remainder by zero.
    pub fn apply(self, y: i32, x: i32) -> Option<i32> {
        let value = match self {
            Self::Add => y.wrapping_add(x),
            Self::Sub => y.wrapping_sub(x),
            Self::Mul => y.wrapping_mul(x),
            Self::Div | Self::Mod if x == 0 => return None,
            Self::Div => y.wrapping_div(x),
            Self::Mod => y.wrapping_rem(x),
            Self::Shr => y.wrapping_shr(x as u32),
            Self::Shl => y.wrapping_shl(x as u32),
            Self::Xor => y ^ x,
            Self::And => y & x,
            Self::Or => y | x,
        };
        Some(value)
    }

    fn opcode(self) -> Opcode {
        match self {
            Self::Add => Opcode::Add,
            Self::Sub => Opcode::Sub,
            Self::Mul => Opcode::Mul,
            Self::Div => Opcode::Div,
            Self::Mod => Opcode::Mod,
            Self::Shr => Opcode::Shr,
            Self::Shl => Opcode::Shl,
            Self::Xor => Opcode::Xor,
            Self::And => Opcode::And,
            Self::Or => Opcode::Or,
        }
    }
}

/// Comparator of a conditional jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// `jl`
    Lt,
    /// `jg`
    Gt,
    /// `je`
    Eq,
    /// `jne`
    Ne,
    /// `jle`
    Le,
    /// `jge`
    Ge,
}

impl Comparison {
    /// Whether `y cmp x` holds, where `x` was popped first.
    pub fn holds(self, y: i32, x: i32) -> bool {
        match self {
            Self::Lt => y < x,
            Self::Gt => y > x,
            Self::Eq => y == x,
            Self::Ne => y != x,
            Self::Le => y <= x,
            Self::Ge => y >= x,
        }
    }

    fn opcode(self, immediate: bool) -> Opcode {
        match (self, immediate) {
            (Self::Lt, false) => Opcode::Jl,
            (Self::Lt, true) => Opcode::JlImm,
            (Self::Gt, false) => Opcode::Jg,
            (Self::Gt, true) => Opcode::JgImm,
            (Self::Eq, false) => Opcode::Je,
            (Self::Eq, true) => Opcode::JeImm,
            (Self::Ne, false) => Opcode::Jne,
            (Self::Ne, true) => Opcode::JneImm,
            (Self::Le, false) => Opcode::Jle,
            (Self::Le, true) => Opcode::JleImm,
            (Self::Ge, false) => Opcode::Jge,
            (Self::Ge, true) => Opcode::JgeImm,
        }
    }
}

/// A decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Push(i32),
    Pop,
    Binary(BinaryOp),
    Not,
    Store(StoreOperands),
    Load(Operand),
    Jump(Operand),
    Branch(Comparison, Operand),
    Alloc,
    Call(Operand),
    Ret,
    Halt,
}

/// Instruction decode failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("undefined opcode 0x{byte:02X} at offset {offset}")]
    UndefinedOpcode { offset: usize, byte: u8 },
    #[error("`{opcode}` at offset {offset} is cut off by the end of the program")]
    Truncated { offset: usize, opcode: Opcode },
    #[error("offset {0} is past the end of the program")]
    EndOfProgram(usize),
}

impl DecodeError {
    pub fn offset(&self) -> usize {
        match *self {
            Self::UndefinedOpcode { offset, .. }
            | Self::Truncated { offset, .. }
            | Self::EndOfProgram(offset) => offset,
        }
    }
}

impl Instruction {
    /// Decode the instruction starting at `offset`.
    ///
    /// Opcodes outside `set` decode as undefined.
    pub fn decode(code: &[u8], offset: usize, set: InstructionSet) -> Result<Self, DecodeError> {
        let byte = *code.get(offset).ok_or(DecodeError::EndOfProgram(offset))?;
        let opcode = Opcode::from_u8(byte)
            .filter(|op| set.contains(*op))
            .ok_or(DecodeError::UndefinedOpcode { offset, byte })?;

        let imm = |n: usize| {
            read_i32(code, offset + 1 + n * IMMEDIATE_SIZE)
                .ok_or(DecodeError::Truncated { offset, opcode })
        };

        let instr = match opcode {
            Opcode::Push => Self::Push(imm(0)?),
            Opcode::Pop => Self::Pop,
            Opcode::Add => Self::Binary(BinaryOp::Add),
            Opcode::Sub => Self::Binary(BinaryOp::Sub),
            Opcode::Mul => Self::Binary(BinaryOp::Mul),
            Opcode::Div => Self::Binary(BinaryOp::Div),
            Opcode::Mod => Self::Binary(BinaryOp::Mod),
            Opcode::Shr => Self::Binary(BinaryOp::Shr),
            Opcode::Shl => Self::Binary(BinaryOp::Shl),
            Opcode::Xor => Self::Binary(BinaryOp::Xor),
            Opcode::And => Self::Binary(BinaryOp::And),
            Opcode::Or => Self::Binary(BinaryOp::Or),
            Opcode::Not => Self::Not,
            Opcode::Store => Self::Store(StoreOperands::Stack),
            Opcode::StoreImm => Self::Store(StoreOperands::Imm {
                dst: imm(0)?,
                src: imm(1)?,
            }),
            Opcode::Load => Self::Load(Operand::Stack),
            Opcode::LoadImm => Self::Load(Operand::Imm(imm(0)?)),
            Opcode::Jmp => Self::Jump(Operand::Stack),
            Opcode::JmpImm => Self::Jump(Operand::Imm(imm(0)?)),
            Opcode::Jl => Self::Branch(Comparison::Lt, Operand::Stack),
            Opcode::Jg => Self::Branch(Comparison::Gt, Operand::Stack),
            Opcode::Je => Self::Branch(Comparison::Eq, Operand::Stack),
            Opcode::Jne => Self::Branch(Comparison::Ne, Operand::Stack),
            Opcode::Jle => Self::Branch(Comparison::Le, Operand::Stack),
            Opcode::Jge => Self::Branch(Comparison::Ge, Operand::Stack),
            Opcode::JlImm => Self::Branch(Comparison::Lt, Operand::Imm(imm(0)?)),
            Opcode::JgImm => Self::Branch(Comparison::Gt, Operand::Imm(imm(0)?)),
            Opcode::JeImm => Self::Branch(Comparison::Eq, Operand::Imm(imm(0)?)),
            Opcode::JneImm => Self::Branch(Comparison::Ne, Operand::Imm(imm(0)?)),
            Opcode::JleImm => Self::Branch(Comparison::Le, Operand::Imm(imm(0)?)),
            Opcode::JgeImm => Self::Branch(Comparison::Ge, Operand::Imm(imm(0)?)),
            Opcode::Allc => Self::Alloc,
            Opcode::Call => Self::Call(Operand::Stack),
            Opcode::CallImm => Self::Call(Operand::Imm(imm(0)?)),
            Opcode::Ret => Self::Ret,
            Opcode::Hlt => Self::Halt,
        };
        Ok(instr)
    }

    /// Opcode this instruction encodes to.
    pub fn opcode(&self) -> Opcode {
        match *self {
            Self::Push(_) => Opcode::Push,
            Self::Pop => Opcode::Pop,
            Self::Binary(op) => op.opcode(),
            Self::Not => Opcode::Not,
            Self::Store(StoreOperands::Stack) => Opcode::Store,
            Self::Store(StoreOperands::Imm { .. }) => Opcode::StoreImm,
            Self::Load(Operand::Stack) => Opcode::Load,
            Self::Load(Operand::Imm(_)) => Opcode::LoadImm,
            Self::Jump(Operand::Stack) => Opcode::Jmp,
            Self::Jump(Operand::Imm(_)) => Opcode::JmpImm,
            Self::Branch(cmp, operand) => cmp.opcode(matches!(operand, Operand::Imm(_))),
            Self::Alloc => Opcode::Allc,
            Self::Call(Operand::Stack) => Opcode::Call,
            Self::Call(Operand::Imm(_)) => Opcode::CallImm,
            Self::Ret => Opcode::Ret,
            Self::Halt => Opcode::Hlt,
        }
    }

    /// Encoded width in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.opcode().size()
    }

    /// Append the encoded instruction to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.opcode().as_u8());
        match *self {
            Self::Push(value)
            | Self::Load(Operand::Imm(value))
            | Self::Jump(Operand::Imm(value))
            | Self::Branch(_, Operand::Imm(value))
            | Self::Call(Operand::Imm(value)) => out.extend_from_slice(&encode_i32(value)),
            Self::Store(StoreOperands::Imm { dst, src }) => {
                out.extend_from_slice(&encode_i32(dst));
                out.extend_from_slice(&encode_i32(src));
            }
            _ => {}
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match *self {
            Self::Push(value) => write!(f, "{mnemonic} {value}"),
            Self::Load(Operand::Imm(idx)) => write!(f, "{mnemonic} ${idx}"),
            Self::Store(StoreOperands::Imm { dst, src }) => write!(f, "{mnemonic} ${dst} ${src}"),
            Self::Jump(Operand::Imm(target))
            | Self::Branch(_, Operand::Imm(target))
            | Self::Call(Operand::Imm(target)) => write!(f, "{mnemonic} {target}"),
            _ => f.write_str(mnemonic),
        }
    }
}
