use super::{InstructionBuilder, InstructionKind};
use crate::jvm::opcodes::{self, GOTO};
use crate::jvm::{InvalidInstruction, RawInstruction};

/// Branch to a label (`ifeq`, `if_icmplt`, `goto`, `ifnull`, ...)
///
/// The target is a label id, bound by a [`super::LabelInstruction`] in the same method body.
/// Nothing checks that the label is actually bound: the body is not analysed as a graph.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct JumpInstruction {
    opcode: u8,
    label: u32,
}

impl JumpInstruction {
    pub fn builder() -> JumpBuilder {
        JumpBuilder::default()
    }

    fn validate(opcode: u8) -> Result<(), InvalidInstruction> {
        if opcodes::is_jump(opcode) {
            Ok(())
        } else {
            Err(InvalidInstruction::UnexpectedOpcode {
                instruction: InstructionKind::Jump,
                opcode,
            })
        }
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn label(&self) -> u32 {
        self.label
    }

    /// Everything except `goto` may fall through
    pub fn is_conditional(&self) -> bool {
        self.opcode != GOTO
    }

    pub fn set_opcode(&mut self, opcode: u8) -> Result<(), InvalidInstruction> {
        Self::validate(opcode)?;
        self.opcode = opcode;
        Ok(())
    }

    pub fn set_label(&mut self, label: u32) {
        self.label = label;
    }

    pub fn copy_from(&mut self, other: &JumpInstruction) {
        self.opcode = other.opcode;
        self.label = other.label;
    }

    pub fn copy_to(&self, other: &mut JumpInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Jump {
            opcode: self.opcode,
            label: self.label,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct JumpBuilder {
    opcode: Option<u8>,
    label: Option<u32>,
}

impl JumpBuilder {
    pub fn opcode(mut self, opcode: u8) -> Self {
        self.opcode = Some(opcode);
        self
    }

    pub fn label(mut self, label: u32) -> Self {
        self.label = Some(label);
        self
    }
}

impl<'g> InstructionBuilder<'g> for JumpBuilder {
    type Output = JumpInstruction;

    fn build(self) -> Result<JumpInstruction, InvalidInstruction> {
        let missing = |field| InvalidInstruction::MissingField {
            instruction: InstructionKind::Jump,
            field,
        };
        let opcode = self.opcode.ok_or_else(|| missing("opcode"))?;
        let label = self.label.ok_or_else(|| missing("label"))?;
        JumpInstruction::validate(opcode)?;
        Ok(JumpInstruction { opcode, label })
    }
}

/// Position in a method body that jumps, switches, and line numbers refer to
///
/// Labels are pseudo-instructions: they occupy a slot in the list but emit no bytecode.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LabelInstruction {
    id: u32,
}

impl LabelInstruction {
    pub fn builder() -> LabelBuilder {
        LabelBuilder::default()
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn copy_from(&mut self, other: &LabelInstruction) {
        self.id = other.id;
    }

    pub fn copy_to(&self, other: &mut LabelInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Label(self.id)
    }
}

#[derive(Clone, Default, Debug)]
pub struct LabelBuilder {
    id: Option<u32>,
}

impl LabelBuilder {
    pub fn id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }
}

impl<'g> InstructionBuilder<'g> for LabelBuilder {
    type Output = LabelInstruction;

    fn build(self) -> Result<LabelInstruction, InvalidInstruction> {
        let id = self.id.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::Label,
            field: "id",
        })?;
        Ok(LabelInstruction { id })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::opcodes::{IFEQ, IFNONNULL, IF_ACMPNE, JSR, RET, TABLESWITCH};

    fn jump(opcode: u8, label: u32) -> Result<JumpInstruction, InvalidInstruction> {
        JumpInstruction::builder().opcode(opcode).label(label).build()
    }

    #[test]
    fn jump_opcodes() {
        for opcode in [IFEQ, IF_ACMPNE, GOTO, IFNONNULL] {
            assert!(jump(opcode, 0).is_ok(), "{:#04x}", opcode);
        }
        for opcode in [JSR, RET, TABLESWITCH] {
            assert_eq!(
                jump(opcode, 0),
                Err(InvalidInstruction::UnexpectedOpcode {
                    instruction: InstructionKind::Jump,
                    opcode,
                })
            );
        }

        let mut insn = jump(GOTO, 4).expect("goto");
        assert!(!insn.is_conditional());
        assert!(insn.set_opcode(RET).is_err());
        assert_eq!(insn.opcode(), GOTO);
        insn.set_opcode(IFEQ).expect("ifeq");
        assert!(insn.is_conditional());
    }

    #[test]
    fn missing_label() {
        assert_eq!(
            JumpInstruction::builder().opcode(GOTO).build(),
            Err(InvalidInstruction::MissingField {
                instruction: InstructionKind::Jump,
                field: "label",
            })
        );
        assert_eq!(
            LabelInstruction::builder().build(),
            Err(InvalidInstruction::MissingField {
                instruction: InstructionKind::Label,
                field: "id",
            })
        );
    }

    #[test]
    fn copy_to_and_from() {
        let source = jump(IFNONNULL, 7).expect("ifnonnull");
        let mut target = jump(GOTO, 1).expect("goto");
        target.copy_from(&source);
        assert_eq!(target.opcode(), IFNONNULL);
        assert_eq!(target.label(), 7);
        assert_eq!(
            target.dump(),
            RawInstruction::Jump {
                opcode: IFNONNULL,
                label: 7,
            }
        );

        let label = LabelInstruction::builder().id(7).build().expect("label");
        let mut other = LabelInstruction::builder().id(0).build().expect("label");
        label.copy_to(&mut other);
        assert_eq!(other, label);
        assert_eq!(other.dump(), RawInstruction::Label(7));
    }
}
