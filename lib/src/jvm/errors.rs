use super::BinaryName;
use crate::insn::{ArithmeticOperation, InstructionKind, ValueType};

/// Fatal errors from building or resolving the hierarchy
///
/// Any of these aborts resolution of the whole hierarchy: group identity is only meaningful once
/// every method has been assigned one, so a partially resolved graph is never handed on.
#[derive(Debug)]
pub enum Error {
    /// An ancestor declares a method with the same name and descriptor, but that method has no
    /// group yet (the hierarchy is not being resolved from the root down)
    UnresolvedAncestor {
        method: String,
        ancestor: BinaryName,
    },

    /// Two ancestor paths lead to methods in different groups
    ConflictingGroup {
        method: String,
        ancestor: BinaryName,
        existing: String,
        conflicting: String,
    },

    /// A method was assigned a group a second time
    DuplicateGroupAssignment(String),

    /// A raw instruction in a method body could not be turned into a typed instruction
    InvalidInstruction {
        method: String,
        index: usize,
        error: InvalidInstruction,
    },

    /// A class was resolved a second time
    ClassAlreadyResolved(BinaryName),

    /// Class names are registry keys and must be unique
    DuplicateClass(BinaryName),

    /// A class declares two methods with the same name and descriptor
    DuplicateMethod(String),

    /// Superclass or superinterface is not in the registry (only with
    /// [`crate::hierarchy::MissingAncestorPolicy::Fail`])
    MissingAncestor {
        class: BinaryName,
        ancestor: BinaryName,
    },

    /// A class is (transitively) its own ancestor
    CyclicHierarchy(BinaryName),

    MalformedName(String),
    MalformedDescriptor(String),
}

/// Instruction construction failed
///
/// This is the only recoverable error: nothing was built, so the caller can just try again with
/// different operands.
#[derive(Clone, PartialEq, Debug)]
pub enum InvalidInstruction {
    /// Builder was finished without setting a mandatory field
    MissingField {
        instruction: InstructionKind,
        field: &'static str,
    },

    /// Arithmetic never operates on arrays
    ArrayOperand(ValueType),

    /// The operation is not defined on this type
    IllegalOperation {
        operation: ArithmeticOperation,
        value_type: ValueType,
    },

    /// Immediate or index operand doesn't fit the instruction
    OperandOutOfRange {
        instruction: InstructionKind,
        operand: i64,
    },

    /// Opcode does not belong to this kind of instruction
    UnexpectedOpcode {
        instruction: InstructionKind,
        opcode: u8,
    },

    /// Operands are individually fine but not together
    IllegalOperands {
        instruction: InstructionKind,
        reason: &'static str,
    },

    MalformedName(String),
    MalformedDescriptor(String),

    /// State can only be copied between instructions of the same kind
    IncompatibleCopy {
        from: InstructionKind,
        to: InstructionKind,
    },
}
