use super::{parse_method_descriptor, parse_ref_type, parse_unqualified_name};
use super::{InstructionBuilder, InstructionKind};
use crate::hierarchy::{Hierarchy, MethodId};
use crate::jvm::opcodes::{INVOKEINTERFACE, INVOKESPECIAL, INVOKESTATIC, INVOKEVIRTUAL};
use crate::jvm::{InvalidInstruction, MethodDescriptor, Name, RawInstruction, RefType};
use crate::jvm::{RenderDescriptor, UnqualifiedName};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum InvokeType {
    Virtual,
    Special,
    Static,
    Interface,
}

impl InvokeType {
    pub fn opcode(self) -> u8 {
        match self {
            InvokeType::Virtual => INVOKEVIRTUAL,
            InvokeType::Special => INVOKESPECIAL,
            InvokeType::Static => INVOKESTATIC,
            InvokeType::Interface => INVOKEINTERFACE,
        }
    }

    pub fn from_opcode(opcode: u8) -> Option<InvokeType> {
        match opcode {
            INVOKEVIRTUAL => Some(InvokeType::Virtual),
            INVOKESPECIAL => Some(InvokeType::Special),
            INVOKESTATIC => Some(InvokeType::Static),
            INVOKEINTERFACE => Some(InvokeType::Interface),
            _ => None,
        }
    }
}

/// Call to a statically named method
///
/// The call is symbolic (owner, name, descriptor) until [`InvokeInstruction::resolve`] links it
/// to a method of the hierarchy. Once linked, the instruction follows the target's function group:
/// renaming the group renames the call site too.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InvokeInstruction<'g> {
    invoke_type: InvokeType,
    owner: RefType,
    name: UnqualifiedName,
    descriptor: MethodDescriptor,
    is_interface: bool,
    target: Option<MethodId<'g>>,
}

impl<'g> InvokeInstruction<'g> {
    pub fn builder() -> InvokeBuilder {
        InvokeBuilder::default()
    }

    fn validate(
        invoke_type: InvokeType,
        owner: &RefType,
        name: &UnqualifiedName,
        descriptor: &MethodDescriptor,
        is_interface: bool,
    ) -> Result<(), InvalidInstruction> {
        let illegal = |reason| {
            Err(InvalidInstruction::IllegalOperands {
                instruction: InstructionKind::Invoke,
                reason,
            })
        };

        if name == &UnqualifiedName::CLINIT {
            return illegal("class initializers cannot be called");
        }
        if name == &UnqualifiedName::INIT {
            if invoke_type != InvokeType::Special {
                return illegal("constructors are only called with `invokespecial`");
            }
            if descriptor.return_type.is_some() {
                return illegal("constructors must return void");
            }
        }
        match invoke_type {
            InvokeType::Interface if !is_interface => {
                return illegal("`invokeinterface` needs an interface owner")
            }
            InvokeType::Virtual if is_interface => {
                return illegal("`invokevirtual` cannot target an interface")
            }
            _ => (),
        }
        if owner.is_array() && invoke_type != InvokeType::Virtual {
            return illegal("array methods are only called with `invokevirtual`");
        }
        if descriptor.parameter_length(invoke_type != InvokeType::Static) > 255 {
            return illegal("more than 255 argument slots");
        }
        Ok(())
    }

    pub fn invoke_type(&self) -> InvokeType {
        self.invoke_type
    }

    pub fn owner(&self) -> &RefType {
        &self.owner
    }

    /// Name used at the call site (the current group name once linked)
    pub fn name(&self) -> UnqualifiedName {
        match self.target {
            Some(target) => target.0.name(),
            None => self.name.clone(),
        }
    }

    /// Descriptor used at the call site (the current group descriptor once linked)
    pub fn descriptor(&self) -> MethodDescriptor {
        match self.target {
            Some(target) => target.0.descriptor(),
            None => self.descriptor.clone(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// Method this call was linked to, if any
    pub fn target(&self) -> Option<MethodId<'g>> {
        self.target
    }

    pub fn set_invoke_type(&mut self, invoke_type: InvokeType) -> Result<(), InvalidInstruction> {
        Self::validate(
            invoke_type,
            &self.owner,
            &self.name,
            &self.descriptor,
            self.is_interface,
        )?;
        self.invoke_type = invoke_type;
        Ok(())
    }

    pub fn set_interface(&mut self, is_interface: bool) -> Result<(), InvalidInstruction> {
        Self::validate(
            self.invoke_type,
            &self.owner,
            &self.name,
            &self.descriptor,
            is_interface,
        )?;
        self.is_interface = is_interface;
        Ok(())
    }

    /// Changing the symbolic reference unlinks the call
    pub fn set_method(
        &mut self,
        owner: RefType,
        name: UnqualifiedName,
        descriptor: MethodDescriptor,
    ) -> Result<(), InvalidInstruction> {
        Self::validate(
            self.invoke_type,
            &owner,
            &name,
            &descriptor,
            self.is_interface,
        )?;
        self.owner = owner;
        self.name = name;
        self.descriptor = descriptor;
        self.target = None;
        Ok(())
    }

    /// Link the call to a method in the hierarchy
    ///
    /// The method is looked up on the owner, then its superclasses, then its superinterfaces.
    /// Calls into classes outside of the hierarchy stay unlinked.
    pub fn resolve(&mut self, hierarchy: &'g Hierarchy<'g>) {
        let owner = match &self.owner {
            RefType::Object(owner) => owner,
            _ => return,
        };
        self.target = if self.name.is_initializer() {
            hierarchy.find_method(owner, &self.name, &self.descriptor)
        } else {
            hierarchy.resolve_method(owner, &self.name, &self.descriptor)
        };
        log::trace!(
            "Linked call to {}.{} to {:?}",
            owner,
            self.name,
            self.target
        );
    }

    pub fn copy_from(&mut self, other: &InvokeInstruction<'g>) {
        self.clone_from(other)
    }

    pub fn copy_to(&self, other: &mut InvokeInstruction<'g>) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Method {
            opcode: self.invoke_type.opcode(),
            owner: self.owner.render_internal(),
            name: self.name().as_str().to_owned(),
            descriptor: self.descriptor().render(),
            is_interface: self.is_interface,
        }
    }

    pub(crate) fn from_raw(
        opcode: u8,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) -> Result<InvokeInstruction<'g>, InvalidInstruction> {
        let invoke_type =
            InvokeType::from_opcode(opcode).ok_or(InvalidInstruction::UnexpectedOpcode {
                instruction: InstructionKind::Invoke,
                opcode,
            })?;
        InvokeInstruction::builder()
            .invoke_type(invoke_type)
            .owner(parse_ref_type(owner)?)
            .name(parse_unqualified_name(name)?)
            .descriptor(parse_method_descriptor(descriptor)?)
            .interface(is_interface)
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct InvokeBuilder {
    invoke_type: Option<InvokeType>,
    owner: Option<RefType>,
    name: Option<UnqualifiedName>,
    descriptor: Option<MethodDescriptor>,
    is_interface: Option<bool>,
}

impl InvokeBuilder {
    pub fn invoke_type(mut self, invoke_type: InvokeType) -> Self {
        self.invoke_type = Some(invoke_type);
        self
    }

    pub fn owner(mut self, owner: RefType) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn descriptor(mut self, descriptor: MethodDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Defaults to whether the invoke type is `invokeinterface`
    pub fn interface(mut self, is_interface: bool) -> Self {
        self.is_interface = Some(is_interface);
        self
    }
}

impl<'g> InstructionBuilder<'g> for InvokeBuilder {
    type Output = InvokeInstruction<'g>;

    fn build(self) -> Result<InvokeInstruction<'g>, InvalidInstruction> {
        let missing = |field| InvalidInstruction::MissingField {
            instruction: InstructionKind::Invoke,
            field,
        };
        let invoke_type = self.invoke_type.ok_or_else(|| missing("invoke type"))?;
        let owner = self.owner.ok_or_else(|| missing("owner"))?;
        let name = self.name.ok_or_else(|| missing("name"))?;
        let descriptor = self.descriptor.ok_or_else(|| missing("descriptor"))?;
        let is_interface = self
            .is_interface
            .unwrap_or(invoke_type == InvokeType::Interface);
        InvokeInstruction::validate(invoke_type, &owner, &name, &descriptor, is_interface)?;
        Ok(InvokeInstruction {
            invoke_type,
            owner,
            name,
            descriptor,
            is_interface,
            target: None,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{BinaryName, FieldType, ParseDescriptor};

    fn name(name: &str) -> UnqualifiedName {
        UnqualifiedName::from_string(name.to_owned()).expect("valid name")
    }

    fn call(invoke_type: InvokeType, method: &str, descriptor: &str) -> InvokeBuilder {
        InvokeInstruction::builder()
            .invoke_type(invoke_type)
            .owner(RefType::Object(BinaryName::OBJECT))
            .name(name(method))
            .descriptor(MethodDescriptor::parse(descriptor).expect("valid descriptor"))
    }

    #[test]
    fn constructor_rules() {
        let ok: Result<InvokeInstruction, _> = call(InvokeType::Special, "<init>", "()V").build();
        assert!(ok.is_ok());

        let virtual_init: Result<InvokeInstruction, _> =
            call(InvokeType::Virtual, "<init>", "()V").build();
        assert!(virtual_init.is_err());

        let returning_init: Result<InvokeInstruction, _> =
            call(InvokeType::Special, "<init>", "()I").build();
        assert!(returning_init.is_err());

        let clinit: Result<InvokeInstruction, _> =
            call(InvokeType::Static, "<clinit>", "()V").build();
        assert_eq!(
            clinit,
            Err(InvalidInstruction::IllegalOperands {
                instruction: InstructionKind::Invoke,
                reason: "class initializers cannot be called",
            })
        );
    }

    #[test]
    fn interface_flag() {
        let interface: InvokeInstruction = call(InvokeType::Interface, "run", "()V")
            .build()
            .expect("interface flag defaults on");
        assert!(interface.is_interface());

        let mismatched: Result<InvokeInstruction, _> = call(InvokeType::Interface, "run", "()V")
            .interface(false)
            .build();
        assert!(mismatched.is_err());

        let mut static_call: InvokeInstruction = call(InvokeType::Static, "of", "()V")
            .interface(true)
            .build()
            .expect("static interface methods exist");
        assert!(static_call.set_invoke_type(InvokeType::Virtual).is_err());
        assert_eq!(static_call.invoke_type(), InvokeType::Static);
    }

    #[test]
    fn array_owner() {
        let clone = InvokeInstruction::from_raw(
            INVOKEVIRTUAL,
            "[I",
            "clone",
            "()Ljava/lang/Object;",
            false,
        )
        .expect("array clone");
        assert!(clone.owner().is_array());
        assert_eq!(
            clone.descriptor().return_type,
            Some(FieldType::object(BinaryName::OBJECT))
        );

        assert!(InvokeInstruction::from_raw(INVOKESTATIC, "[I", "clone", "()V", false).is_err());
    }

    #[test]
    fn too_many_arguments() {
        let descriptor = format!("({})V", "J".repeat(128));
        let result: Result<InvokeInstruction, _> =
            call(InvokeType::Static, "wide", &descriptor).build();
        assert!(result.is_err());
    }

    #[test]
    fn unlinked_dump() {
        let raw = RawInstruction::Method {
            opcode: INVOKEVIRTUAL,
            owner: String::from("java/lang/Object"),
            name: String::from("hashCode"),
            descriptor: String::from("()I"),
            is_interface: false,
        };
        let insn = InvokeInstruction::from_raw(
            INVOKEVIRTUAL,
            "java/lang/Object",
            "hashCode",
            "()I",
            false,
        )
        .expect("hashCode");
        assert_eq!(insn.target(), None);
        assert_eq!(insn.dump(), raw);
    }

    #[test]
    fn copy() {
        let source: InvokeInstruction =
            call(InvokeType::Virtual, "toString", "()Ljava/lang/String;")
                .build()
                .expect("toString");
        let mut target: InvokeInstruction = call(InvokeType::Static, "of", "(I)V")
            .build()
            .expect("static call");
        target.copy_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.name(), name("toString"));
    }
}
