use crate::jvm::{BaseType, RenderDescriptor};
use std::fmt;

/// Type of the operands of a typed instruction
///
/// Arrays are included so that operand types read from descriptors can be represented, but most
/// instructions only accept scalars.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ValueType {
    Scalar(BaseType),

    /// One dimensional array of a primitive type
    Array(BaseType),
}

impl ValueType {
    pub const BOOLEAN: ValueType = ValueType::Scalar(BaseType::Boolean);
    pub const BYTE: ValueType = ValueType::Scalar(BaseType::Byte);
    pub const CHAR: ValueType = ValueType::Scalar(BaseType::Char);
    pub const SHORT: ValueType = ValueType::Scalar(BaseType::Short);
    pub const INT: ValueType = ValueType::Scalar(BaseType::Int);
    pub const LONG: ValueType = ValueType::Scalar(BaseType::Long);
    pub const FLOAT: ValueType = ValueType::Scalar(BaseType::Float);
    pub const DOUBLE: ValueType = ValueType::Scalar(BaseType::Double);

    /// Every value type, scalars first
    pub const ALL: [ValueType; 16] = [
        ValueType::Scalar(BaseType::Boolean),
        ValueType::Scalar(BaseType::Byte),
        ValueType::Scalar(BaseType::Char),
        ValueType::Scalar(BaseType::Short),
        ValueType::Scalar(BaseType::Int),
        ValueType::Scalar(BaseType::Long),
        ValueType::Scalar(BaseType::Float),
        ValueType::Scalar(BaseType::Double),
        ValueType::Array(BaseType::Boolean),
        ValueType::Array(BaseType::Byte),
        ValueType::Array(BaseType::Char),
        ValueType::Array(BaseType::Short),
        ValueType::Array(BaseType::Int),
        ValueType::Array(BaseType::Long),
        ValueType::Array(BaseType::Float),
        ValueType::Array(BaseType::Double),
    ];

    pub const fn is_array(self) -> bool {
        matches!(self, ValueType::Array(_))
    }

    /// Scalar type, if this isn't an array
    pub const fn scalar(self) -> Option<BaseType> {
        match self {
            ValueType::Scalar(base) => Some(base),
            ValueType::Array(_) => None,
        }
    }
}

impl From<BaseType> for ValueType {
    fn from(base: BaseType) -> ValueType {
        ValueType::Scalar(base)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Scalar(base) => f.write_str(&base.render()),
            ValueType::Array(base) => write!(f, "[{}", base.render()),
        }
    }
}
