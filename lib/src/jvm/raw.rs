//! Raw records exchanged with the bytecode front end and back end
//!
//! These are deliberately unvalidated: names and descriptors are plain strings and opcodes are
//! plain bytes. The front end produces them while parsing class files, the hierarchy turns them
//! into typed structures, and `dump` methods produce them again for the writer.

/// One bytecode operation, tagged by the shape of its operands
#[derive(Clone, PartialEq, Debug)]
pub enum RawInstruction {
    /// Zero operand instruction
    ///
    /// Short forms that encode an operand in the opcode (`iload_0`, `astore_3`, ...) are not
    /// accepted here: the front end must expand them into [`RawInstruction::Var`].
    Insn { opcode: u8 },

    /// `bipush`, `sipush`, `newarray`
    Int { opcode: u8, operand: i32 },

    /// Local variable load or store, always in the long form (`iload`, not `iload_1`)
    Var { opcode: u8, index: u16 },

    /// `new`, `anewarray`, `checkcast`, `instanceof` (operand in internal form)
    Type { opcode: u8, descriptor: String },

    /// Field access
    Field {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
    },

    /// Method invocation other than `invokedynamic`
    Method {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
        is_interface: bool,
    },

    /// `invokedynamic`
    InvokeDynamic {
        name: String,
        descriptor: String,
        bootstrap: RawHandle,
        arguments: Vec<RawConstant>,
    },

    /// `ldc`, `ldc_w`, `ldc2_w`
    Ldc(RawConstant),

    /// `iinc` (and its `wide` form)
    Iinc { index: u16, increment: i16 },

    /// `multianewarray`
    MultiANewArray { descriptor: String, dimensions: u8 },

    /// Conditional or unconditional jump to a label (`goto_w` is written as `goto`)
    Jump { opcode: u8, label: u32 },

    /// Position marker targeted by jumps
    Label(u32),

    /// `tableswitch`
    TableSwitch {
        min: i32,
        max: i32,
        default: u32,
        labels: Vec<u32>,
    },

    /// `lookupswitch`
    LookupSwitch {
        default: u32,
        keys: Vec<i32>,
        labels: Vec<u32>,
    },

    /// Debug line number information
    LineNumber { line: u16, start: u32 },

    /// Stack map frame
    Frame,
}

/// Tag of a raw instruction record
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RawInstructionKind {
    Insn,
    Int,
    Var,
    Type,
    Field,
    Method,
    InvokeDynamic,
    Ldc,
    Iinc,
    MultiANewArray,
    Jump,
    Label,
    TableSwitch,
    LookupSwitch,
    LineNumber,
    Frame,
}

impl RawInstruction {
    pub fn kind(&self) -> RawInstructionKind {
        match self {
            RawInstruction::Insn { .. } => RawInstructionKind::Insn,
            RawInstruction::Int { .. } => RawInstructionKind::Int,
            RawInstruction::Var { .. } => RawInstructionKind::Var,
            RawInstruction::Type { .. } => RawInstructionKind::Type,
            RawInstruction::Field { .. } => RawInstructionKind::Field,
            RawInstruction::Method { .. } => RawInstructionKind::Method,
            RawInstruction::InvokeDynamic { .. } => RawInstructionKind::InvokeDynamic,
            RawInstruction::Ldc(_) => RawInstructionKind::Ldc,
            RawInstruction::Iinc { .. } => RawInstructionKind::Iinc,
            RawInstruction::MultiANewArray { .. } => RawInstructionKind::MultiANewArray,
            RawInstruction::Jump { .. } => RawInstructionKind::Jump,
            RawInstruction::Label(_) => RawInstructionKind::Label,
            RawInstruction::TableSwitch { .. } => RawInstructionKind::TableSwitch,
            RawInstruction::LookupSwitch { .. } => RawInstructionKind::LookupSwitch,
            RawInstruction::LineNumber { .. } => RawInstructionKind::LineNumber,
            RawInstruction::Frame => RawInstructionKind::Frame,
        }
    }
}

/// Loadable constant, as found in the constant pool
#[derive(Clone, PartialEq, Debug)]
pub enum RawConstant {
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),

    /// Class literal, in internal form
    Type(String),

    /// Method type, as a method descriptor
    MethodType(String),

    Handle(RawHandle),
}

/// Method handle constant
///
/// `tag` is the reference kind (1 through 9) from the `CONSTANT_MethodHandle_info` structure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawHandle {
    pub tag: u8,
    pub owner: String,
    pub name: String,
    pub descriptor: String,
    pub is_interface: bool,
}

/// Method skeleton
#[derive(Clone, PartialEq, Debug)]
pub struct RawMethod {
    pub name: String,
    pub descriptor: String,
    pub access_flags: u16,
    pub instructions: Vec<RawInstruction>,
}

/// Class skeleton
#[derive(Clone, PartialEq, Debug)]
pub struct RawClass {
    pub name: String,

    /// Only ever missing for `java/lang/Object` itself
    pub superclass: Option<String>,

    pub interfaces: Vec<String>,
    pub access_flags: u16,
    pub methods: Vec<RawMethod>,
}
