use super::{parse_ref_type, InstructionBuilder, InstructionKind};
use crate::jvm::{InvalidInstruction, RawInstruction, RefType, RenderDescriptor};

/// Allocate a multi-dimensional array (`multianewarray`)
///
/// The type is the full array type, and only its outermost `dimensions` are allocated.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MultiNewArrayInstruction {
    array_type: RefType,
    dimensions: u8,
}

impl MultiNewArrayInstruction {
    pub fn builder() -> MultiNewArrayBuilder {
        MultiNewArrayBuilder::default()
    }

    fn validate(array_type: &RefType, dimensions: u8) -> Result<(), InvalidInstruction> {
        if !array_type.is_array() {
            return Err(InvalidInstruction::IllegalOperands {
                instruction: InstructionKind::MultiNewArray,
                reason: "allocated type is not an array",
            });
        }
        if dimensions == 0 || usize::from(dimensions) > array_type.dimensions() {
            return Err(InvalidInstruction::OperandOutOfRange {
                instruction: InstructionKind::MultiNewArray,
                operand: i64::from(dimensions),
            });
        }
        Ok(())
    }

    pub fn array_type(&self) -> &RefType {
        &self.array_type
    }

    pub fn dimensions(&self) -> u8 {
        self.dimensions
    }

    pub fn set(&mut self, array_type: RefType, dimensions: u8) -> Result<(), InvalidInstruction> {
        Self::validate(&array_type, dimensions)?;
        self.array_type = array_type;
        self.dimensions = dimensions;
        Ok(())
    }

    pub fn set_dimensions(&mut self, dimensions: u8) -> Result<(), InvalidInstruction> {
        Self::validate(&self.array_type, dimensions)?;
        self.dimensions = dimensions;
        Ok(())
    }

    pub fn copy_from(&mut self, other: &MultiNewArrayInstruction) {
        self.array_type = other.array_type.clone();
        self.dimensions = other.dimensions;
    }

    pub fn copy_to(&self, other: &mut MultiNewArrayInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::MultiANewArray {
            descriptor: self.array_type.render(),
            dimensions: self.dimensions,
        }
    }

    pub(crate) fn from_raw(
        descriptor: &str,
        dimensions: u8,
    ) -> Result<MultiNewArrayInstruction, InvalidInstruction> {
        MultiNewArrayInstruction::builder()
            .array_type(parse_ref_type(descriptor)?)
            .dimensions(dimensions)
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct MultiNewArrayBuilder {
    array_type: Option<RefType>,
    dimensions: Option<u8>,
}

impl MultiNewArrayBuilder {
    pub fn array_type(mut self, array_type: RefType) -> Self {
        self.array_type = Some(array_type);
        self
    }

    pub fn dimensions(mut self, dimensions: u8) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

impl<'g> InstructionBuilder<'g> for MultiNewArrayBuilder {
    type Output = MultiNewArrayInstruction;

    fn build(self) -> Result<MultiNewArrayInstruction, InvalidInstruction> {
        let array_type = self.array_type.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::MultiNewArray,
            field: "array type",
        })?;
        let dimensions = self.dimensions.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::MultiNewArray,
            field: "dimensions",
        })?;
        MultiNewArrayInstruction::validate(&array_type, dimensions)?;
        Ok(MultiNewArrayInstruction {
            array_type,
            dimensions,
        })
    }
}
