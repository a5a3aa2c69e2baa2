use super::{InstructionBuilder, InstructionKind};
use crate::jvm::opcodes::{BIPUSH, NEWARRAY, SIPUSH};
use crate::jvm::{BaseType, InvalidInstruction, RawInstruction};

/// Instructions with a single immediate integer operand
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum IntOperation {
    /// Push a sign-extended byte
    BiPush,

    /// Push a sign-extended short
    SiPush,

    /// Allocate a primitive array (operand is the array type code)
    NewArray,
}

impl IntOperation {
    pub fn opcode(self) -> u8 {
        match self {
            IntOperation::BiPush => BIPUSH,
            IntOperation::SiPush => SIPUSH,
            IntOperation::NewArray => NEWARRAY,
        }
    }

    pub fn from_opcode(opcode: u8) -> Option<IntOperation> {
        match opcode {
            BIPUSH => Some(IntOperation::BiPush),
            SIPUSH => Some(IntOperation::SiPush),
            NEWARRAY => Some(IntOperation::NewArray),
            _ => None,
        }
    }

    fn accepts(self, operand: i32) -> bool {
        match self {
            IntOperation::BiPush => i8::try_from(operand).is_ok(),
            IntOperation::SiPush => i16::try_from(operand).is_ok(),
            IntOperation::NewArray => BaseType::from_array_type_code(operand).is_some(),
        }
    }
}

/// Integer literal push, or primitive array allocation
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IntInstruction {
    operation: IntOperation,
    operand: i32,
}

impl IntInstruction {
    pub fn builder() -> IntBuilder {
        IntBuilder::default()
    }

    /// Smallest push instruction that can encode the literal, if any can
    pub fn push(value: i32) -> Result<IntInstruction, InvalidInstruction> {
        let operation = if i8::try_from(value).is_ok() {
            IntOperation::BiPush
        } else {
            IntOperation::SiPush
        };
        IntInstruction::builder()
            .operation(operation)
            .operand(value)
            .build()
    }

    fn validate(operation: IntOperation, operand: i32) -> Result<(), InvalidInstruction> {
        if operation.accepts(operand) {
            Ok(())
        } else {
            Err(InvalidInstruction::OperandOutOfRange {
                instruction: InstructionKind::Int,
                operand: i64::from(operand),
            })
        }
    }

    pub fn operation(&self) -> IntOperation {
        self.operation
    }

    pub fn operand(&self) -> i32 {
        self.operand
    }

    /// Element type of the allocated array, for `newarray`
    pub fn array_element_type(&self) -> Option<BaseType> {
        match self.operation {
            IntOperation::NewArray => BaseType::from_array_type_code(self.operand),
            _ => None,
        }
    }

    pub fn set_operand(&mut self, operand: i32) -> Result<(), InvalidInstruction> {
        self.set(self.operation, operand)
    }

    pub fn set(&mut self, operation: IntOperation, operand: i32) -> Result<(), InvalidInstruction> {
        Self::validate(operation, operand)?;
        self.operation = operation;
        self.operand = operand;
        Ok(())
    }

    pub fn copy_from(&mut self, other: &IntInstruction) {
        self.operation = other.operation;
        self.operand = other.operand;
    }

    pub fn copy_to(&self, other: &mut IntInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Int {
            opcode: self.operation.opcode(),
            operand: self.operand,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct IntBuilder {
    operation: Option<IntOperation>,
    operand: Option<i32>,
}

impl IntBuilder {
    pub fn operation(mut self, operation: IntOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn operand(mut self, operand: i32) -> Self {
        self.operand = Some(operand);
        self
    }

    /// `newarray` of the given element type
    pub fn new_array(self, element_type: BaseType) -> Self {
        self.operation(IntOperation::NewArray)
            .operand(i32::from(element_type.array_type_code()))
    }
}

impl<'g> InstructionBuilder<'g> for IntBuilder {
    type Output = IntInstruction;

    fn build(self) -> Result<IntInstruction, InvalidInstruction> {
        let operation = self.operation.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Int,
            field: "operation",
        })?;
        let operand = self.operand.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Int,
            field: "operand",
        })?;
        IntInstruction::validate(operation, operand)?;
        Ok(IntInstruction { operation, operand })
    }
}
