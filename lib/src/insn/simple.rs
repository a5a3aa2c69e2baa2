use super::{InstructionBuilder, InstructionKind};
use crate::jvm::{opcodes, InvalidInstruction, RawInstruction};

/// Instruction without operands that isn't arithmetic (`aconst_null`, `dup`, `i2l`, `areturn`,
/// `athrow`, ...)
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SimpleInstruction {
    opcode: u8,
}

impl SimpleInstruction {
    pub fn builder() -> SimpleBuilder {
        SimpleBuilder::default()
    }

    fn validate(opcode: u8) -> Result<(), InvalidInstruction> {
        if opcodes::is_simple(opcode) {
            Ok(())
        } else {
            Err(InvalidInstruction::UnexpectedOpcode {
                instruction: InstructionKind::Simple,
                opcode,
            })
        }
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn set_opcode(&mut self, opcode: u8) -> Result<(), InvalidInstruction> {
        Self::validate(opcode)?;
        self.opcode = opcode;
        Ok(())
    }

    /// Does this instruction end the method (`ireturn` through `return`, or `athrow`)?
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.opcode,
            opcodes::IRETURN..=opcodes::RETURN | opcodes::ATHROW
        )
    }

    pub fn copy_from(&mut self, other: &SimpleInstruction) {
        self.opcode = other.opcode;
    }

    pub fn copy_to(&self, other: &mut SimpleInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Insn {
            opcode: self.opcode,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct SimpleBuilder {
    opcode: Option<u8>,
}

impl SimpleBuilder {
    pub fn opcode(mut self, opcode: u8) -> Self {
        self.opcode = Some(opcode);
        self
    }
}

impl<'g> InstructionBuilder<'g> for SimpleBuilder {
    type Output = SimpleInstruction;

    fn build(self) -> Result<SimpleInstruction, InvalidInstruction> {
        let opcode = self.opcode.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Simple,
            field: "opcode",
        })?;
        SimpleInstruction::validate(opcode)?;
        Ok(SimpleInstruction { opcode })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::opcodes::*;

    #[test]
    fn accepts_zero_operand_opcodes() {
        for opcode in [NOP, ACONST_NULL, DUP, SWAP, I2L, LCMP, ARETURN, ATHROW, MONITOREXIT] {
            let insn = SimpleInstruction::builder().opcode(opcode).build();
            assert_eq!(insn.map(|insn| insn.opcode()), Ok(opcode));
        }
    }

    #[test]
    fn rejects_other_opcodes() {
        for opcode in [IADD, BIPUSH, ILOAD, GOTO, INVOKESTATIC] {
            assert_eq!(
                SimpleInstruction::builder().opcode(opcode).build(),
                Err(InvalidInstruction::UnexpectedOpcode {
                    instruction: InstructionKind::Simple,
                    opcode,
                })
            );
        }
    }

    #[test]
    fn terminal_instructions() {
        let ret = SimpleInstruction::builder().opcode(RETURN).build().expect("return");
        let dup = SimpleInstruction::builder().opcode(DUP).build().expect("dup");
        assert!(ret.is_terminal());
        assert!(!dup.is_terminal());
    }

    #[test]
    fn copy() {
        let pop = SimpleInstruction::builder().opcode(POP).build().expect("pop");
        let mut nop = SimpleInstruction::builder().opcode(NOP).build().expect("nop");
        pop.copy_to(&mut nop);
        assert_eq!(nop.opcode(), POP);
        assert_eq!(nop.dump(), RawInstruction::Insn { opcode: POP });
    }
}
