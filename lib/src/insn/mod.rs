//! Typed, validated instructions
//!
//! Every instruction kind has its own struct whose fields can only ever hold a legal combination
//! of operands: instances are created through a builder (which checks the combination before
//! constructing anything) and modified through setters (which check it again before changing
//! anything). [`Instruction`] is the closed sum of all of those kinds, and [`InstructionList`] is
//! the ordered body of a method.

mod arithmetic;
mod constant;
mod debug_info;
mod field;
mod increment;
mod int;
mod invoke;
mod invoke_dynamic;
mod jump;
mod ldc;
mod list;
mod multi_new_array;
mod simple;
mod switch;
mod type_ref;
mod value_type;
mod var;

pub use arithmetic::*;
pub use constant::*;
pub use debug_info::*;
pub use field::*;
pub use increment::*;
pub use int::*;
pub use invoke::*;
pub use invoke_dynamic::*;
pub use jump::*;
pub use ldc::*;
pub use list::*;
pub use multi_new_array::*;
pub use simple::*;
pub use switch::*;
pub use type_ref::*;
pub use value_type::*;
pub use var::*;

use crate::hierarchy::Hierarchy;
use crate::jvm::{opcodes, BinaryName, FieldType, InvalidInstruction, MethodDescriptor, Name};
use crate::jvm::{ParseDescriptor, RawInstruction, RefType, UnqualifiedName};

/// Two-phase construction of an instruction
///
/// Builders collect operands without checking them. `build` then either returns an instruction
/// whose operands are legal together, or reports why they are not (in which case nothing was
/// constructed and the builder's operands can be fixed and tried again).
pub trait InstructionBuilder<'g>: Default {
    type Output: Into<Instruction<'g>>;

    fn build(self) -> Result<Self::Output, InvalidInstruction>;
}

/// Tag of an instruction kind
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum InstructionKind {
    Arithmetic,
    Simple,
    Int,
    Var,
    Type,
    Field,
    Invoke,
    InvokeDynamic,
    Ldc,
    Increment,
    MultiNewArray,
    Jump,
    Label,
    TableSwitch,
    LookupSwitch,
    LineNumber,
    Frame,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Instruction<'g> {
    Arithmetic(ArithmeticInstruction),
    Simple(SimpleInstruction),
    Int(IntInstruction),
    Var(VarInstruction),
    Type(TypeInstruction),
    Field(FieldInstruction),
    Invoke(InvokeInstruction<'g>),
    InvokeDynamic(InvokeDynamicInstruction<'g>),
    Ldc(LdcInstruction<'g>),
    Increment(IncrementInstruction),
    MultiNewArray(MultiNewArrayInstruction),
    Jump(JumpInstruction),
    Label(LabelInstruction),
    TableSwitch(TableSwitchInstruction),
    LookupSwitch(LookupSwitchInstruction),
    LineNumber(LineNumberInstruction),
    Frame(FrameInstruction),
}

impl<'g> Instruction<'g> {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::Arithmetic(_) => InstructionKind::Arithmetic,
            Instruction::Simple(_) => InstructionKind::Simple,
            Instruction::Int(_) => InstructionKind::Int,
            Instruction::Var(_) => InstructionKind::Var,
            Instruction::Type(_) => InstructionKind::Type,
            Instruction::Field(_) => InstructionKind::Field,
            Instruction::Invoke(_) => InstructionKind::Invoke,
            Instruction::InvokeDynamic(_) => InstructionKind::InvokeDynamic,
            Instruction::Ldc(_) => InstructionKind::Ldc,
            Instruction::Increment(_) => InstructionKind::Increment,
            Instruction::MultiNewArray(_) => InstructionKind::MultiNewArray,
            Instruction::Jump(_) => InstructionKind::Jump,
            Instruction::Label(_) => InstructionKind::Label,
            Instruction::TableSwitch(_) => InstructionKind::TableSwitch,
            Instruction::LookupSwitch(_) => InstructionKind::LookupSwitch,
            Instruction::LineNumber(_) => InstructionKind::LineNumber,
            Instruction::Frame(_) => InstructionKind::Frame,
        }
    }

    /// Materialize a typed instruction from a front end record
    pub fn from_raw(raw: &RawInstruction) -> Result<Instruction<'g>, InvalidInstruction> {
        let insn = match raw {
            RawInstruction::Insn { opcode } if opcodes::is_arithmetic(*opcode) => {
                Instruction::Arithmetic(ArithmeticInstruction::from_opcode(*opcode)?)
            }
            RawInstruction::Insn { opcode } => {
                Instruction::Simple(SimpleInstruction::builder().opcode(*opcode).build()?)
            }
            RawInstruction::Int { opcode, operand } => {
                let operation =
                    IntOperation::from_opcode(*opcode).ok_or(InvalidInstruction::UnexpectedOpcode {
                        instruction: InstructionKind::Int,
                        opcode: *opcode,
                    })?;
                Instruction::Int(
                    IntInstruction::builder()
                        .operation(operation)
                        .operand(*operand)
                        .build()?,
                )
            }
            RawInstruction::Var { opcode, index } => {
                Instruction::Var(VarInstruction::from_raw(*opcode, *index)?)
            }
            RawInstruction::Type { opcode, descriptor } => {
                Instruction::Type(TypeInstruction::from_raw(*opcode, descriptor)?)
            }
            RawInstruction::Field {
                opcode,
                owner,
                name,
                descriptor,
            } => Instruction::Field(FieldInstruction::from_raw(*opcode, owner, name, descriptor)?),
            RawInstruction::Method {
                opcode,
                owner,
                name,
                descriptor,
                is_interface,
            } => Instruction::Invoke(InvokeInstruction::from_raw(
                *opcode,
                owner,
                name,
                descriptor,
                *is_interface,
            )?),
            RawInstruction::InvokeDynamic {
                name,
                descriptor,
                bootstrap,
                arguments,
            } => Instruction::InvokeDynamic(InvokeDynamicInstruction::from_raw(
                name, descriptor, bootstrap, arguments,
            )?),
            RawInstruction::Ldc(constant) => Instruction::Ldc(LdcInstruction::from_raw(constant)?),
            RawInstruction::Iinc { index, increment } => Instruction::Increment(
                IncrementInstruction::builder()
                    .index(*index)
                    .increment(*increment)
                    .build()?,
            ),
            RawInstruction::MultiANewArray {
                descriptor,
                dimensions,
            } => Instruction::MultiNewArray(MultiNewArrayInstruction::from_raw(
                descriptor,
                *dimensions,
            )?),
            RawInstruction::Jump { opcode, label } => Instruction::Jump(
                JumpInstruction::builder()
                    .opcode(*opcode)
                    .label(*label)
                    .build()?,
            ),
            RawInstruction::Label(id) => {
                Instruction::Label(LabelInstruction::builder().id(*id).build()?)
            }
            RawInstruction::TableSwitch {
                min,
                max,
                default,
                labels,
            } => Instruction::TableSwitch(
                TableSwitchInstruction::builder()
                    .min(*min)
                    .max(*max)
                    .default_label(*default)
                    .labels(labels.clone())
                    .build()?,
            ),
            RawInstruction::LookupSwitch {
                default,
                keys,
                labels,
            } => Instruction::LookupSwitch(
                LookupSwitchInstruction::builder()
                    .default_label(*default)
                    .keys(keys.clone())
                    .labels(labels.clone())
                    .build()?,
            ),
            RawInstruction::LineNumber { line, start } => Instruction::LineNumber(
                LineNumberInstruction::builder()
                    .line(*line)
                    .start(*start)
                    .build()?,
            ),
            RawInstruction::Frame => Instruction::Frame(FrameInstruction),
        };
        Ok(insn)
    }

    /// Derive state that depends on the rest of the hierarchy
    ///
    /// Calls get linked to the method they target, and method handles (loaded by `ldc` or used
    /// by `invokedynamic`) to the method they reference.
    pub fn resolve(&mut self, hierarchy: &'g Hierarchy<'g>) {
        match self {
            Instruction::Invoke(insn) => insn.resolve(hierarchy),
            Instruction::InvokeDynamic(insn) => insn.resolve(hierarchy),
            Instruction::Ldc(insn) => insn.resolve(hierarchy),
            _ => (),
        }
    }

    pub fn dump(&self) -> RawInstruction {
        match self {
            Instruction::Arithmetic(insn) => insn.dump(),
            Instruction::Simple(insn) => insn.dump(),
            Instruction::Int(insn) => insn.dump(),
            Instruction::Var(insn) => insn.dump(),
            Instruction::Type(insn) => insn.dump(),
            Instruction::Field(insn) => insn.dump(),
            Instruction::Invoke(insn) => insn.dump(),
            Instruction::InvokeDynamic(insn) => insn.dump(),
            Instruction::Ldc(insn) => insn.dump(),
            Instruction::Increment(insn) => insn.dump(),
            Instruction::MultiNewArray(insn) => insn.dump(),
            Instruction::Jump(insn) => insn.dump(),
            Instruction::Label(insn) => insn.dump(),
            Instruction::TableSwitch(insn) => insn.dump(),
            Instruction::LookupSwitch(insn) => insn.dump(),
            Instruction::LineNumber(insn) => insn.dump(),
            Instruction::Frame(insn) => insn.dump(),
        }
    }

    /// Overwrite the operands of this instruction with those of another instruction of the same
    /// kind
    pub fn copy_from(&mut self, other: &Instruction<'g>) -> Result<(), InvalidInstruction> {
        match (self, other) {
            (Instruction::Arithmetic(to), Instruction::Arithmetic(from)) => to.copy_from(from),
            (Instruction::Simple(to), Instruction::Simple(from)) => to.copy_from(from),
            (Instruction::Int(to), Instruction::Int(from)) => to.copy_from(from),
            (Instruction::Var(to), Instruction::Var(from)) => to.copy_from(from),
            (Instruction::Type(to), Instruction::Type(from)) => to.copy_from(from),
            (Instruction::Field(to), Instruction::Field(from)) => to.copy_from(from),
            (Instruction::Invoke(to), Instruction::Invoke(from)) => to.copy_from(from),
            (Instruction::InvokeDynamic(to), Instruction::InvokeDynamic(from)) => {
                to.copy_from(from)
            }
            (Instruction::Ldc(to), Instruction::Ldc(from)) => to.copy_from(from),
            (Instruction::Increment(to), Instruction::Increment(from)) => to.copy_from(from),
            (Instruction::MultiNewArray(to), Instruction::MultiNewArray(from)) => {
                to.copy_from(from)
            }
            (Instruction::Jump(to), Instruction::Jump(from)) => to.copy_from(from),
            (Instruction::Label(to), Instruction::Label(from)) => to.copy_from(from),
            (Instruction::TableSwitch(to), Instruction::TableSwitch(from)) => to.copy_from(from),
            (Instruction::LookupSwitch(to), Instruction::LookupSwitch(from)) => {
                to.copy_from(from)
            }
            (Instruction::LineNumber(to), Instruction::LineNumber(from)) => to.copy_from(from),
            (Instruction::Frame(to), Instruction::Frame(from)) => to.copy_from(from),
            (to, from) => {
                return Err(InvalidInstruction::IncompatibleCopy {
                    from: from.kind(),
                    to: to.kind(),
                })
            }
        }
        Ok(())
    }

    pub fn copy_to(&self, other: &mut Instruction<'g>) -> Result<(), InvalidInstruction> {
        other.copy_from(self)
    }
}

impl<'g> From<ArithmeticInstruction> for Instruction<'g> {
    fn from(insn: ArithmeticInstruction) -> Self {
        Instruction::Arithmetic(insn)
    }
}

impl<'g> From<SimpleInstruction> for Instruction<'g> {
    fn from(insn: SimpleInstruction) -> Self {
        Instruction::Simple(insn)
    }
}

impl<'g> From<IntInstruction> for Instruction<'g> {
    fn from(insn: IntInstruction) -> Self {
        Instruction::Int(insn)
    }
}

impl<'g> From<VarInstruction> for Instruction<'g> {
    fn from(insn: VarInstruction) -> Self {
        Instruction::Var(insn)
    }
}

impl<'g> From<TypeInstruction> for Instruction<'g> {
    fn from(insn: TypeInstruction) -> Self {
        Instruction::Type(insn)
    }
}

impl<'g> From<FieldInstruction> for Instruction<'g> {
    fn from(insn: FieldInstruction) -> Self {
        Instruction::Field(insn)
    }
}

impl<'g> From<InvokeInstruction<'g>> for Instruction<'g> {
    fn from(insn: InvokeInstruction<'g>) -> Self {
        Instruction::Invoke(insn)
    }
}

impl<'g> From<InvokeDynamicInstruction<'g>> for Instruction<'g> {
    fn from(insn: InvokeDynamicInstruction<'g>) -> Self {
        Instruction::InvokeDynamic(insn)
    }
}

impl<'g> From<LdcInstruction<'g>> for Instruction<'g> {
    fn from(insn: LdcInstruction<'g>) -> Self {
        Instruction::Ldc(insn)
    }
}

impl<'g> From<IncrementInstruction> for Instruction<'g> {
    fn from(insn: IncrementInstruction) -> Self {
        Instruction::Increment(insn)
    }
}

impl<'g> From<MultiNewArrayInstruction> for Instruction<'g> {
    fn from(insn: MultiNewArrayInstruction) -> Self {
        Instruction::MultiNewArray(insn)
    }
}

impl<'g> From<JumpInstruction> for Instruction<'g> {
    fn from(insn: JumpInstruction) -> Self {
        Instruction::Jump(insn)
    }
}

impl<'g> From<LabelInstruction> for Instruction<'g> {
    fn from(insn: LabelInstruction) -> Self {
        Instruction::Label(insn)
    }
}

impl<'g> From<TableSwitchInstruction> for Instruction<'g> {
    fn from(insn: TableSwitchInstruction) -> Self {
        Instruction::TableSwitch(insn)
    }
}

impl<'g> From<LookupSwitchInstruction> for Instruction<'g> {
    fn from(insn: LookupSwitchInstruction) -> Self {
        Instruction::LookupSwitch(insn)
    }
}

impl<'g> From<LineNumberInstruction> for Instruction<'g> {
    fn from(insn: LineNumberInstruction) -> Self {
        Instruction::LineNumber(insn)
    }
}

impl<'g> From<FrameInstruction> for Instruction<'g> {
    fn from(insn: FrameInstruction) -> Self {
        Instruction::Frame(insn)
    }
}

fn parse_binary_name(name: &str) -> Result<BinaryName, InvalidInstruction> {
    BinaryName::from_string(name.to_owned()).map_err(InvalidInstruction::MalformedName)
}

fn parse_unqualified_name(name: &str) -> Result<UnqualifiedName, InvalidInstruction> {
    UnqualifiedName::from_string(name.to_owned()).map_err(InvalidInstruction::MalformedName)
}

/// Class operands are bare names, array operands are descriptors
fn parse_ref_type(operand: &str) -> Result<RefType, InvalidInstruction> {
    RefType::parse_internal(operand).map_err(|err| {
        if operand.starts_with('[') {
            InvalidInstruction::MalformedDescriptor(err)
        } else {
            InvalidInstruction::MalformedName(err)
        }
    })
}

fn parse_field_type(descriptor: &str) -> Result<FieldType, InvalidInstruction> {
    FieldType::parse(descriptor).map_err(InvalidInstruction::MalformedDescriptor)
}

fn parse_method_descriptor(descriptor: &str) -> Result<MethodDescriptor, InvalidInstruction> {
    MethodDescriptor::parse(descriptor).map_err(InvalidInstruction::MalformedDescriptor)
}
