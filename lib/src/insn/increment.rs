use super::{InstructionBuilder, InstructionKind};
use crate::jvm::{InvalidInstruction, RawInstruction};

/// Add a constant to an `int` local variable in place (`iinc`)
///
/// Indices above 255 or increments outside of a byte need the `wide` encoding, which the
/// class writer picks.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IncrementInstruction {
    index: u16,
    increment: i16,
}

impl IncrementInstruction {
    pub fn builder() -> IncrementBuilder {
        IncrementBuilder::default()
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn increment(&self) -> i16 {
        self.increment
    }

    /// Needs the `wide` prefix
    pub fn is_wide(&self) -> bool {
        self.index > u16::from(u8::MAX) || i8::try_from(self.increment).is_err()
    }

    pub fn set_index(&mut self, index: u16) {
        self.index = index;
    }

    pub fn set_increment(&mut self, increment: i16) {
        self.increment = increment;
    }

    pub fn copy_from(&mut self, other: &IncrementInstruction) {
        self.index = other.index;
        self.increment = other.increment;
    }

    pub fn copy_to(&self, other: &mut IncrementInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Iinc {
            index: self.index,
            increment: self.increment,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct IncrementBuilder {
    index: Option<u16>,
    increment: Option<i16>,
}

impl IncrementBuilder {
    pub fn index(mut self, index: u16) -> Self {
        self.index = Some(index);
        self
    }

    pub fn increment(mut self, increment: i16) -> Self {
        self.increment = Some(increment);
        self
    }
}

impl<'g> InstructionBuilder<'g> for IncrementBuilder {
    type Output = IncrementInstruction;

    fn build(self) -> Result<IncrementInstruction, InvalidInstruction> {
        let index = self.index.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Increment,
            field: "index",
        })?;
        let increment = self.increment.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Increment,
            field: "increment",
        })?;
        Ok(IncrementInstruction { index, increment })
    }
}
