use super::{parse_binary_name, parse_field_type, parse_unqualified_name};
use super::{InstructionBuilder, InstructionKind};
use crate::jvm::opcodes::{GETFIELD, GETSTATIC, PUTFIELD, PUTSTATIC};
use crate::jvm::{BinaryName, FieldType, InvalidInstruction, Name, RawInstruction};
use crate::jvm::{RenderDescriptor, UnqualifiedName};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldOperation {
    GetStatic,
    PutStatic,
    GetField,
    PutField,
}

impl FieldOperation {
    pub fn opcode(self) -> u8 {
        match self {
            FieldOperation::GetStatic => GETSTATIC,
            FieldOperation::PutStatic => PUTSTATIC,
            FieldOperation::GetField => GETFIELD,
            FieldOperation::PutField => PUTFIELD,
        }
    }

    pub fn from_opcode(opcode: u8) -> Option<FieldOperation> {
        match opcode {
            GETSTATIC => Some(FieldOperation::GetStatic),
            PUTSTATIC => Some(FieldOperation::PutStatic),
            GETFIELD => Some(FieldOperation::GetField),
            PUTFIELD => Some(FieldOperation::PutField),
            _ => None,
        }
    }

    pub fn is_static(self) -> bool {
        matches!(self, FieldOperation::GetStatic | FieldOperation::PutStatic)
    }
}

/// Read or write of a static or instance field
///
/// Fields are referenced symbolically: nothing here checks that the owner actually declares them.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FieldInstruction {
    operation: FieldOperation,
    owner: BinaryName,
    name: UnqualifiedName,
    descriptor: FieldType,
}

impl FieldInstruction {
    pub fn builder() -> FieldBuilder {
        FieldBuilder::default()
    }

    pub fn operation(&self) -> FieldOperation {
        self.operation
    }

    pub fn owner(&self) -> &BinaryName {
        &self.owner
    }

    pub fn name(&self) -> &UnqualifiedName {
        &self.name
    }

    pub fn descriptor(&self) -> &FieldType {
        &self.descriptor
    }

    pub fn set_operation(&mut self, operation: FieldOperation) {
        self.operation = operation;
    }

    pub fn set_owner(&mut self, owner: BinaryName) {
        self.owner = owner;
    }

    pub fn set_name(&mut self, name: UnqualifiedName) -> Result<(), InvalidInstruction> {
        if name.is_initializer() {
            return Err(InvalidInstruction::MalformedName(name.as_str().to_owned()));
        }
        self.name = name;
        Ok(())
    }

    pub fn set_descriptor(&mut self, descriptor: FieldType) {
        self.descriptor = descriptor;
    }

    pub fn copy_from(&mut self, other: &FieldInstruction) {
        self.clone_from(other)
    }

    pub fn copy_to(&self, other: &mut FieldInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Field {
            opcode: self.operation.opcode(),
            owner: self.owner.as_str().to_owned(),
            name: self.name.as_str().to_owned(),
            descriptor: self.descriptor.render(),
        }
    }

    pub(crate) fn from_raw(
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<FieldInstruction, InvalidInstruction> {
        let operation =
            FieldOperation::from_opcode(opcode).ok_or(InvalidInstruction::UnexpectedOpcode {
                instruction: InstructionKind::Field,
                opcode,
            })?;
        FieldInstruction::builder()
            .operation(operation)
            .owner(parse_binary_name(owner)?)
            .name(parse_unqualified_name(name)?)
            .descriptor(parse_field_type(descriptor)?)
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct FieldBuilder {
    operation: Option<FieldOperation>,
    owner: Option<BinaryName>,
    name: Option<UnqualifiedName>,
    descriptor: Option<FieldType>,
}

impl FieldBuilder {
    pub fn operation(mut self, operation: FieldOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn owner(mut self, owner: BinaryName) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn descriptor(mut self, descriptor: FieldType) -> Self {
        self.descriptor = Some(descriptor);
        self
    }
}

impl<'g> InstructionBuilder<'g> for FieldBuilder {
    type Output = FieldInstruction;

    fn build(self) -> Result<FieldInstruction, InvalidInstruction> {
        let missing = |field| InvalidInstruction::MissingField {
            instruction: InstructionKind::Field,
            field,
        };
        let mut insn = FieldInstruction {
            operation: self.operation.ok_or_else(|| missing("operation"))?,
            owner: self.owner.ok_or_else(|| missing("owner"))?,
            name: UnqualifiedName::INIT,
            descriptor: self.descriptor.ok_or_else(|| missing("descriptor"))?,
        };
        insn.set_name(self.name.ok_or_else(|| missing("name"))?)?;
        Ok(insn)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn raw_round_trip() {
        let raw = RawInstruction::Field {
            opcode: GETSTATIC,
            owner: String::from("java/lang/System"),
            name: String::from("out"),
            descriptor: String::from("Ljava/io/PrintStream;"),
        };
        let insn = FieldInstruction::from_raw(
            GETSTATIC,
            "java/lang/System",
            "out",
            "Ljava/io/PrintStream;",
        )
        .expect("System.out");
        assert!(insn.operation().is_static());
        assert_eq!(insn.owner().as_str(), "java/lang/System");
        assert_eq!(insn.dump(), raw);
    }

    #[test]
    fn rejects_initializer_names() {
        let result = FieldInstruction::builder()
            .operation(FieldOperation::GetField)
            .owner(BinaryName::OBJECT)
            .name(UnqualifiedName::CLINIT)
            .descriptor(FieldType::int())
            .build();
        assert_eq!(
            result,
            Err(InvalidInstruction::MalformedName(String::from("<clinit>")))
        );
    }

    #[test]
    fn malformed_descriptor() {
        assert!(matches!(
            FieldInstruction::from_raw(PUTFIELD, "a/B", "count", "Q"),
            Err(InvalidInstruction::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn missing_owner() {
        let result = FieldInstruction::builder()
            .operation(FieldOperation::PutStatic)
            .name(UnqualifiedName::from_string(String::from("x")).expect("name"))
            .descriptor(FieldType::long())
            .build();
        assert_eq!(
            result,
            Err(InvalidInstruction::MissingField {
                instruction: InstructionKind::Field,
                field: "owner",
            })
        );
    }

    #[test]
    fn copy_to_and_from() {
        let source = FieldInstruction::from_raw(
            GETSTATIC,
            "java/lang/System",
            "err",
            "Ljava/io/PrintStream;",
        )
        .expect("System.err");
        let mut target =
            FieldInstruction::from_raw(PUTFIELD, "a/B", "count", "I").expect("B.count");

        target.copy_from(&source);
        assert_eq!(target.operation(), FieldOperation::GetStatic);
        assert_eq!(target.owner().as_str(), "java/lang/System");
        assert_eq!(target.name().as_str(), "err");
        assert_eq!(target, source);

        let other = FieldInstruction::from_raw(GETFIELD, "a/B", "total", "J").expect("B.total");
        other.copy_to(&mut target);
        assert_eq!(target.descriptor(), &FieldType::long());
        assert_eq!(target, other);
    }
}
