//! Opcode catalog.
//!
//! Every instruction has a one-byte opcode and a fixed encoded width. Address
//! consuming instructions (`jmp`, conditional jumps, `call`, `load`, `store`)
//! come in two forms: the stack form pops its address operands, the immediate
//! form carries them in the instruction stream.

use crate::codec::IMMEDIATE_SIZE;

/// Instruction opcodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    Push = 0x0A,
    Pop = 0x0B,
    Add = 0x0C,
    Sub = 0x0D,
    Jl = 0x0E,
    Jg = 0x0F,
    Je = 0x1A,
    Store = 0x1B,
    Load = 0x1C,
    Call = 0x1D,
    Hlt = 0x1E,
    Ret = 0x1F,
    Jmp = 0xD1,
    Jne = 0xE1,
    Jle = 0xF1,
    Jge = 0xA2,

    JmpImm = 0x21,
    JneImm = 0x22,
    JleImm = 0x23,
    JgeImm = 0x24,
    JeImm = 0x2A,
    StoreImm = 0x2B,
    LoadImm = 0x2C,
    CallImm = 0x2D,
    JlImm = 0x2E,
    JgImm = 0x2F,

    Mul = 0xA0,
    Div = 0xB0,
    Mod = 0xC0,
    Shr = 0xD0,
    Shl = 0xE0,
    Xor = 0xF0,
    And = 0xA1,
    Or = 0xB1,
    Not = 0xC1,
    Allc = 0xB2,
}

impl Opcode {
    /// All opcodes, in catalog order.
    pub const ALL: [Opcode; 36] = [
        Self::Push,
        Self::Pop,
        Self::Add,
        Self::Sub,
        Self::Jl,
        Self::Jg,
        Self::Je,
        Self::Store,
        Self::Load,
        Self::Call,
        Self::Hlt,
        Self::Ret,
        Self::Jmp,
        Self::Jne,
        Self::Jle,
        Self::Jge,
        Self::JmpImm,
        Self::JneImm,
        Self::JleImm,
        Self::JgeImm,
        Self::JeImm,
        Self::StoreImm,
        Self::LoadImm,
        Self::CallImm,
        Self::JlImm,
        Self::JgImm,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Shr,
        Self::Shl,
        Self::Xor,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Allc,
    ];

    /// Decode an opcode byte. Returns `None` for bytes outside the catalog.
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_u8() == v)
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Number of 4-byte immediates following the opcode byte.
    pub fn immediates(self) -> usize {
        match self {
            Self::Push
            | Self::JmpImm
            | Self::JneImm
            | Self::JleImm
            | Self::JgeImm
            | Self::JeImm
            | Self::JlImm
            | Self::JgImm
            | Self::LoadImm
            | Self::CallImm => 1,
            Self::StoreImm => 2,
            _ => 0,
        }
    }

    /// Encoded width in bytes (1, 5 or 9).
    pub fn size(self) -> usize {
        1 + self.immediates() * IMMEDIATE_SIZE
    }

    /// Whether the instruction belongs to the extended set.
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            Self::Mul
                | Self::Div
                | Self::Mod
                | Self::Shr
                | Self::Shl
                | Self::Xor
                | Self::And
                | Self::Or
                | Self::Not
                | Self::Allc
        )
    }

    /// Whether the address operands are encoded in the instruction stream.
    pub fn is_immediate_form(self) -> bool {
        self != Self::Push && self.immediates() > 0
    }

    /// Source mnemonic for this opcode (both forms share one mnemonic).
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Jl | Self::JlImm => "jl",
            Self::Jg | Self::JgImm => "jg",
            Self::Je | Self::JeImm => "je",
            Self::Jne | Self::JneImm => "jne",
            Self::Jle | Self::JleImm => "jle",
            Self::Jge | Self::JgeImm => "jge",
            Self::Jmp | Self::JmpImm => "jmp",
            Self::Store | Self::StoreImm => "store",
            Self::Load | Self::LoadImm => "load",
            Self::Call | Self::CallImm => "call",
            Self::Hlt => "hlt",
            Self::Ret => "ret",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Shr => "shr",
            Self::Shl => "shl",
            Self::Xor => "xor",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Allc => "allc",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Which opcodes are legal, chosen when an assembler or VM is constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InstructionSet {
    /// Stack, arithmetic (`add`/`sub`), jumps, memory and call instructions.
    Main,
    /// Main set plus `mul/div/mod/shr/shl/xor/and/or/not/allc`.
    #[default]
    Extended,
}

impl InstructionSet {
    pub fn contains(self, opcode: Opcode) -> bool {
        match self {
            Self::Main => !opcode.is_extended(),
            Self::Extended => true,
        }
    }
}

/// Catalog row for one mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpEntry {
    pub name: &'static str,
    /// Opcode used when the line has no argument.
    pub stack_form: Option<Opcode>,
    /// Opcode used when the line carries arguments.
    pub immediate_form: Option<Opcode>,
}

impl OpEntry {
    const fn new(
        name: &'static str,
        stack_form: Option<Opcode>,
        immediate_form: Option<Opcode>,
    ) -> Self {
        Self {
            name,
            stack_form,
            immediate_form,
        }
    }

    const fn bare(name: &'static str, op: Opcode) -> Self {
        Self::new(name, Some(op), None)
    }

    const fn dual(name: &'static str, stack: Opcode, immediate: Opcode) -> Self {
        Self::new(name, Some(stack), Some(immediate))
    }

    /// Pick the form for a line with `args` arguments.
    ///
    /// Falls back to whichever form exists, so arity mistakes surface as
    /// missing/unexpected argument errors rather than unknown mnemonics.
    pub fn select(&self, args: usize) -> Opcode {
        let preferred = if args == 0 {
            self.stack_form
        } else {
            self.immediate_form
        };
        preferred
            .or(self.stack_form)
            .or(self.immediate_form)
            .expect("catalog entry has at least one form")
    }
}

const CATALOG: &[OpEntry] = &[
    OpEntry::new("push", None, Some(Opcode::Push)),
    OpEntry::bare("pop", Opcode::Pop),
    OpEntry::bare("add", Opcode::Add),
    OpEntry::bare("sub", Opcode::Sub),
    OpEntry::dual("jl", Opcode::Jl, Opcode::JlImm),
    OpEntry::dual("jg", Opcode::Jg, Opcode::JgImm),
    OpEntry::dual("je", Opcode::Je, Opcode::JeImm),
    OpEntry::dual("jne", Opcode::Jne, Opcode::JneImm),
    OpEntry::dual("jle", Opcode::Jle, Opcode::JleImm),
    OpEntry::dual("jge", Opcode::Jge, Opcode::JgeImm),
    OpEntry::dual("jmp", Opcode::Jmp, Opcode::JmpImm),
    OpEntry::dual("store", Opcode::Store, Opcode::StoreImm),
    OpEntry::dual("load", Opcode::Load, Opcode::LoadImm),
    OpEntry::dual("call", Opcode::Call, Opcode::CallImm),
    OpEntry::bare("ret", Opcode::Ret),
    OpEntry::bare("hlt", Opcode::Hlt),
    OpEntry::bare("mul", Opcode::Mul),
    OpEntry::bare("div", Opcode::Div),
    OpEntry::bare("mod", Opcode::Mod),
    OpEntry::bare("shr", Opcode::Shr),
    OpEntry::bare("shl", Opcode::Shl),
    OpEntry::bare("xor", Opcode::Xor),
    OpEntry::bare("and", Opcode::And),
    OpEntry::bare("or", Opcode::Or),
    OpEntry::bare("not", Opcode::Not),
    OpEntry::bare("allc", Opcode::Allc),
];

/// Result of a successful mnemonic lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mnemonic {
    /// `label <name>`: zero-width declaration.
    Label,
    Op(OpEntry),
}

/// Mnemonic of the label pseudo-instruction.
pub const LABEL_MNEMONIC: &str = "label";

/// Case-insensitive mnemonic lookup against the catalog.
///
/// Mnemonics outside `set` are reported as undefined (`None`).
pub fn lookup_mnemonic(token: &str, set: InstructionSet) -> Option<Mnemonic> {
    if token.eq_ignore_ascii_case(LABEL_MNEMONIC) {
        return Some(Mnemonic::Label);
    }

    let entry = CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(token))?;

    let allowed = [entry.stack_form, entry.immediate_form]
        .into_iter()
        .flatten()
        .all(|op| set.contains(op));
    allowed.then_some(Mnemonic::Op(*entry))
}
