use super::{parse_ref_type, InstructionBuilder, InstructionKind};
use crate::jvm::opcodes::{ANEWARRAY, CHECKCAST, INSTANCEOF, NEW};
use crate::jvm::{InvalidInstruction, RawInstruction, RefType};

/// Instructions whose only operand is a reference type
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeOperation {
    /// Allocate an uninitialized object (never an array)
    New,

    /// Allocate a one dimensional array of the given component type
    ANewArray,

    CheckCast,
    InstanceOf,
}

impl TypeOperation {
    pub fn opcode(self) -> u8 {
        match self {
            TypeOperation::New => NEW,
            TypeOperation::ANewArray => ANEWARRAY,
            TypeOperation::CheckCast => CHECKCAST,
            TypeOperation::InstanceOf => INSTANCEOF,
        }
    }

    pub fn from_opcode(opcode: u8) -> Option<TypeOperation> {
        match opcode {
            NEW => Some(TypeOperation::New),
            ANEWARRAY => Some(TypeOperation::ANewArray),
            CHECKCAST => Some(TypeOperation::CheckCast),
            INSTANCEOF => Some(TypeOperation::InstanceOf),
            _ => None,
        }
    }
}

/// `new`, `anewarray`, `checkcast`, or `instanceof`
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeInstruction {
    operation: TypeOperation,
    class: RefType,
}

impl TypeInstruction {
    pub fn builder() -> TypeBuilder {
        TypeBuilder::default()
    }

    fn validate(operation: TypeOperation, class: &RefType) -> Result<(), InvalidInstruction> {
        if operation == TypeOperation::New && class.is_array() {
            return Err(InvalidInstruction::IllegalOperands {
                instruction: InstructionKind::Type,
                reason: "`new` cannot allocate arrays",
            });
        }
        Ok(())
    }

    pub fn operation(&self) -> TypeOperation {
        self.operation
    }

    pub fn class(&self) -> &RefType {
        &self.class
    }

    pub fn set_class(&mut self, class: RefType) -> Result<(), InvalidInstruction> {
        Self::validate(self.operation, &class)?;
        self.class = class;
        Ok(())
    }

    pub fn set_operation(&mut self, operation: TypeOperation) -> Result<(), InvalidInstruction> {
        Self::validate(operation, &self.class)?;
        self.operation = operation;
        Ok(())
    }

    pub fn copy_from(&mut self, other: &TypeInstruction) {
        self.operation = other.operation;
        self.class = other.class.clone();
    }

    pub fn copy_to(&self, other: &mut TypeInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Type {
            opcode: self.operation.opcode(),
            descriptor: self.class.render_internal(),
        }
    }

    pub(crate) fn from_raw(
        opcode: u8,
        descriptor: &str,
    ) -> Result<TypeInstruction, InvalidInstruction> {
        let operation =
            TypeOperation::from_opcode(opcode).ok_or(InvalidInstruction::UnexpectedOpcode {
                instruction: InstructionKind::Type,
                opcode,
            })?;
        TypeInstruction::builder()
            .operation(operation)
            .class(parse_ref_type(descriptor)?)
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct TypeBuilder {
    operation: Option<TypeOperation>,
    class: Option<RefType>,
}

impl TypeBuilder {
    pub fn operation(mut self, operation: TypeOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn class(mut self, class: RefType) -> Self {
        self.class = Some(class);
        self
    }
}

impl<'g> InstructionBuilder<'g> for TypeBuilder {
    type Output = TypeInstruction;

    fn build(self) -> Result<TypeInstruction, InvalidInstruction> {
        let operation = self.operation.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Type,
            field: "operation",
        })?;
        let class = self.class.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Type,
            field: "class",
        })?;
        TypeInstruction::validate(operation, &class)?;
        Ok(TypeInstruction { operation, class })
    }
}
