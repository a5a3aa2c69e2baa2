use super::{InstructionBuilder, InstructionKind, ValueType};
use crate::jvm::opcodes::*;
use crate::jvm::{BaseType, InvalidInstruction, RawInstruction};

/// Arithmetic, shift, and bitwise operations
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ArithmeticOperation {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,
    Shl,
    Shr,
    Ushr,
    And,
    Or,
    Xor,
}

impl ArithmeticOperation {
    pub const ALL: [ArithmeticOperation; 12] = [
        ArithmeticOperation::Add,
        ArithmeticOperation::Sub,
        ArithmeticOperation::Mul,
        ArithmeticOperation::Div,
        ArithmeticOperation::Rem,
        ArithmeticOperation::Neg,
        ArithmeticOperation::Shl,
        ArithmeticOperation::Shr,
        ArithmeticOperation::Ushr,
        ArithmeticOperation::And,
        ArithmeticOperation::Or,
        ArithmeticOperation::Xor,
    ];

    /// Is the operation defined on values of this type?
    ///
    /// Arrays are never allowed. Numeric operations exclude `boolean`, shifts need an integral
    /// type, and the bitwise operations accept integral types as well as `boolean`.
    pub fn is_allowed(self, value_type: ValueType) -> bool {
        let base = match value_type.scalar() {
            Some(base) => base,
            None => return false,
        };
        match self {
            ArithmeticOperation::Add
            | ArithmeticOperation::Sub
            | ArithmeticOperation::Mul
            | ArithmeticOperation::Div
            | ArithmeticOperation::Rem
            | ArithmeticOperation::Neg => base != BaseType::Boolean,
            ArithmeticOperation::Shl | ArithmeticOperation::Shr | ArithmeticOperation::Ushr => {
                base.is_integral()
            }
            ArithmeticOperation::And | ArithmeticOperation::Or | ArithmeticOperation::Xor => {
                base == BaseType::Boolean || base.is_integral()
            }
        }
    }

    /// All the types this operation accepts
    pub fn allowed_types(self) -> impl Iterator<Item = ValueType> {
        ValueType::ALL
            .into_iter()
            .filter(move |value_type| self.is_allowed(*value_type))
    }
}

/// Binary or unary operation on values of one primitive type (`iadd`, `lshl`, `fneg`, ...)
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArithmeticInstruction {
    value_type: ValueType,
    operation: ArithmeticOperation,
}

impl ArithmeticInstruction {
    pub fn builder() -> ArithmeticBuilder {
        ArithmeticBuilder::default()
    }

    fn validate(
        value_type: ValueType,
        operation: ArithmeticOperation,
    ) -> Result<(), InvalidInstruction> {
        if value_type.is_array() {
            Err(InvalidInstruction::ArrayOperand(value_type))
        } else if !operation.is_allowed(value_type) {
            Err(InvalidInstruction::IllegalOperation {
                operation,
                value_type,
            })
        } else {
            Ok(())
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn operation(&self) -> ArithmeticOperation {
        self.operation
    }

    /// Change the operand type, keeping the current operation
    pub fn set_value_type(&mut self, value_type: ValueType) -> Result<(), InvalidInstruction> {
        self.set(value_type, self.operation)
    }

    /// Change the operation, keeping the current operand type
    pub fn set_operation(
        &mut self,
        operation: ArithmeticOperation,
    ) -> Result<(), InvalidInstruction> {
        self.set(self.value_type, operation)
    }

    /// Change both fields at once (needed when neither change is legal on its own)
    pub fn set(
        &mut self,
        value_type: ValueType,
        operation: ArithmeticOperation,
    ) -> Result<(), InvalidInstruction> {
        Self::validate(value_type, operation)?;
        self.value_type = value_type;
        self.operation = operation;
        Ok(())
    }

    pub fn copy_from(&mut self, other: &ArithmeticInstruction) {
        self.value_type = other.value_type;
        self.operation = other.operation;
    }

    pub fn copy_to(&self, other: &mut ArithmeticInstruction) {
        other.copy_from(self)
    }

    /// Opcode to emit
    ///
    /// `boolean`, `byte`, `char`, and `short` operands are computed with the `int` instructions.
    pub fn opcode(&self) -> u8 {
        let wide_offset = match self.value_type.scalar() {
            Some(BaseType::Long) => 1,
            Some(BaseType::Float) => 2,
            Some(BaseType::Double) => 3,
            _ => 0,
        };
        match self.operation {
            ArithmeticOperation::Add => IADD + wide_offset,
            ArithmeticOperation::Sub => ISUB + wide_offset,
            ArithmeticOperation::Mul => IMUL + wide_offset,
            ArithmeticOperation::Div => IDIV + wide_offset,
            ArithmeticOperation::Rem => IREM + wide_offset,
            ArithmeticOperation::Neg => INEG + wide_offset,
            ArithmeticOperation::Shl => ISHL + wide_offset,
            ArithmeticOperation::Shr => ISHR + wide_offset,
            ArithmeticOperation::Ushr => IUSHR + wide_offset,
            ArithmeticOperation::And => IAND + wide_offset,
            ArithmeticOperation::Or => IOR + wide_offset,
            ArithmeticOperation::Xor => IXOR + wide_offset,
        }
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Insn {
            opcode: self.opcode(),
        }
    }

    pub(crate) fn from_opcode(opcode: u8) -> Result<ArithmeticInstruction, InvalidInstruction> {
        const NUMERIC_TYPES: [ValueType; 4] = [
            ValueType::INT,
            ValueType::LONG,
            ValueType::FLOAT,
            ValueType::DOUBLE,
        ];
        let (operation, value_type) = match opcode {
            IADD..=DNEG => {
                let offset = usize::from(opcode - IADD);
                let operation = ArithmeticOperation::ALL[offset / 4];
                (operation, NUMERIC_TYPES[offset % 4])
            }
            ISHL..=LXOR => {
                let offset = usize::from(opcode - ISHL);
                let operation = ArithmeticOperation::ALL[6 + offset / 2];
                (operation, NUMERIC_TYPES[offset % 2])
            }
            _ => {
                return Err(InvalidInstruction::UnexpectedOpcode {
                    instruction: InstructionKind::Arithmetic,
                    opcode,
                })
            }
        };
        ArithmeticInstruction::builder()
            .value_type(value_type)
            .operation(operation)
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct ArithmeticBuilder {
    value_type: Option<ValueType>,
    operation: Option<ArithmeticOperation>,
}

impl ArithmeticBuilder {
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn operation(mut self, operation: ArithmeticOperation) -> Self {
        self.operation = Some(operation);
        self
    }
}

impl<'g> InstructionBuilder<'g> for ArithmeticBuilder {
    type Output = ArithmeticInstruction;

    fn build(self) -> Result<ArithmeticInstruction, InvalidInstruction> {
        let value_type = self.value_type.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Arithmetic,
            field: "value type",
        })?;
        let operation = self.operation.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Arithmetic,
            field: "operation",
        })?;
        ArithmeticInstruction::validate(value_type, operation)?;
        Ok(ArithmeticInstruction {
            value_type,
            operation,
        })
    }
}
