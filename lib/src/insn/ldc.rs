use super::{Constant, InstructionBuilder, InstructionKind};
use crate::hierarchy::Hierarchy;
use crate::jvm::{InvalidInstruction, RawConstant, RawInstruction};

/// Push a constant from the constant pool
///
/// Which of `ldc`, `ldc_w`, and `ldc2_w` gets emitted is left to the class writer.
#[derive(Clone, PartialEq, Debug)]
pub struct LdcInstruction<'g> {
    constant: Constant<'g>,
}

impl<'g> LdcInstruction<'g> {
    pub fn builder() -> LdcBuilder<'g> {
        LdcBuilder::default()
    }

    /// Constant pool strings are limited to 65535 bytes of (modified) UTF-8
    fn validate(constant: &Constant<'g>) -> Result<(), InvalidInstruction> {
        if let Constant::String(string) = constant {
            let encoded_len: usize = string
                .chars()
                .map(|c| match c as u32 {
                    0 => 2,
                    1..=0x7f => 1,
                    0x80..=0x7ff => 2,
                    0x800..=0xffff => 3,
                    _ => 6,
                })
                .sum();
            if encoded_len > usize::from(u16::MAX) {
                return Err(InvalidInstruction::OperandOutOfRange {
                    instruction: InstructionKind::Ldc,
                    operand: encoded_len as i64,
                });
            }
        }
        Ok(())
    }

    pub fn constant(&self) -> &Constant<'g> {
        &self.constant
    }

    pub fn set_constant(&mut self, constant: Constant<'g>) -> Result<(), InvalidInstruction> {
        Self::validate(&constant)?;
        self.constant = constant;
        Ok(())
    }

    /// Link a method handle constant to the hierarchy
    pub fn resolve(&mut self, hierarchy: &'g Hierarchy<'g>) {
        self.constant.resolve(hierarchy);
    }

    pub fn copy_from(&mut self, other: &LdcInstruction<'g>) {
        self.constant = other.constant.clone();
    }

    pub fn copy_to(&self, other: &mut LdcInstruction<'g>) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Ldc(self.constant.dump())
    }

    pub(crate) fn from_raw(raw: &RawConstant) -> Result<LdcInstruction<'g>, InvalidInstruction> {
        LdcInstruction::builder()
            .constant(Constant::from_raw(raw)?)
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct LdcBuilder<'g> {
    constant: Option<Constant<'g>>,
}

impl<'g> LdcBuilder<'g> {
    pub fn constant(mut self, constant: Constant<'g>) -> Self {
        self.constant = Some(constant);
        self
    }
}

impl<'g> InstructionBuilder<'g> for LdcBuilder<'g> {
    type Output = LdcInstruction<'g>;

    fn build(self) -> Result<LdcInstruction<'g>, InvalidInstruction> {
        let constant = self.constant.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Ldc,
            field: "constant",
        })?;
        LdcInstruction::validate(&constant)?;
        Ok(LdcInstruction { constant })
    }
}
