use super::{InstructionBuilder, InstructionKind};
use crate::jvm::opcodes::*;
use crate::jvm::{InvalidInstruction, RawInstruction};
use crate::util::Width;

/// Direction of a local variable access
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum VarOperation {
    Load,
    Store,
}

/// Type of value held by a local variable slot, as seen by the load/store instructions
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LocalType {
    Int,
    Long,
    Float,
    Double,
    Reference,
}

impl LocalType {
    /// Distance of the typed opcode from `iload` (or `istore`)
    pub fn opcode_offset(self) -> u8 {
        match self {
            LocalType::Int => 0,
            LocalType::Long => 1,
            LocalType::Float => 2,
            LocalType::Double => 3,
            LocalType::Reference => 4,
        }
    }

    fn from_opcode_offset(offset: u8) -> Option<LocalType> {
        match offset {
            0 => Some(LocalType::Int),
            1 => Some(LocalType::Long),
            2 => Some(LocalType::Float),
            3 => Some(LocalType::Double),
            4 => Some(LocalType::Reference),
            _ => None,
        }
    }
}

impl Width for LocalType {
    fn width(&self) -> usize {
        match self {
            LocalType::Long | LocalType::Double => 2,
            _ => 1,
        }
    }
}

/// Load from or store to a local variable (`iload`, `astore`, ...)
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct VarInstruction {
    operation: VarOperation,
    local_type: LocalType,
    index: u16,
}

impl VarInstruction {
    pub fn builder() -> VarBuilder {
        VarBuilder::default()
    }

    /// Two-slot values need their second slot to be addressable too
    fn validate(local_type: LocalType, index: u16) -> Result<(), InvalidInstruction> {
        let last_slot = usize::from(index) + local_type.width() - 1;
        if last_slot > usize::from(u16::MAX) {
            Err(InvalidInstruction::OperandOutOfRange {
                instruction: InstructionKind::Var,
                operand: i64::from(index),
            })
        } else {
            Ok(())
        }
    }

    pub fn operation(&self) -> VarOperation {
        self.operation
    }

    pub fn local_type(&self) -> LocalType {
        self.local_type
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn set_index(&mut self, index: u16) -> Result<(), InvalidInstruction> {
        Self::validate(self.local_type, index)?;
        self.index = index;
        Ok(())
    }

    pub fn set_operation(&mut self, operation: VarOperation) {
        self.operation = operation;
    }

    pub fn copy_from(&mut self, other: &VarInstruction) {
        self.operation = other.operation;
        self.local_type = other.local_type;
        self.index = other.index;
    }

    pub fn copy_to(&self, other: &mut VarInstruction) {
        other.copy_from(self)
    }

    pub fn opcode(&self) -> u8 {
        let base = match self.operation {
            VarOperation::Load => ILOAD,
            VarOperation::Store => ISTORE,
        };
        base + self.local_type.opcode_offset()
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Var {
            opcode: self.opcode(),
            index: self.index,
        }
    }

    /// Only the long forms are accepted: `iload_0` and friends must have been expanded already
    pub(crate) fn from_raw(opcode: u8, index: u16) -> Result<VarInstruction, InvalidInstruction> {
        let (operation, local_type) = match opcode {
            ILOAD..=ALOAD => (
                VarOperation::Load,
                LocalType::from_opcode_offset(opcode - ILOAD),
            ),
            ISTORE..=ASTORE => (
                VarOperation::Store,
                LocalType::from_opcode_offset(opcode - ISTORE),
            ),
            _ => (VarOperation::Load, None),
        };
        let local_type = local_type.ok_or(InvalidInstruction::UnexpectedOpcode {
            instruction: InstructionKind::Var,
            opcode,
        })?;
        VarInstruction::builder()
            .operation(operation)
            .local_type(local_type)
            .index(index)
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct VarBuilder {
    operation: Option<VarOperation>,
    local_type: Option<LocalType>,
    index: Option<u16>,
}

impl VarBuilder {
    pub fn operation(mut self, operation: VarOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn local_type(mut self, local_type: LocalType) -> Self {
        self.local_type = Some(local_type);
        self
    }

    pub fn index(mut self, index: u16) -> Self {
        self.index = Some(index);
        self
    }
}

impl<'g> InstructionBuilder<'g> for VarBuilder {
    type Output = VarInstruction;

    fn build(self) -> Result<VarInstruction, InvalidInstruction> {
        let missing = |field| InvalidInstruction::MissingField {
            instruction: InstructionKind::Var,
            field,
        };
        let operation = self.operation.ok_or_else(|| missing("operation"))?;
        let local_type = self.local_type.ok_or_else(|| missing("local type"))?;
        let index = self.index.ok_or_else(|| missing("index"))?;
        VarInstruction::validate(local_type, index)?;
        Ok(VarInstruction {
            operation,
            local_type,
            index,
        })
    }
}
