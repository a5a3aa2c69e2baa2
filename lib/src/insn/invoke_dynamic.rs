use super::{parse_method_descriptor, parse_unqualified_name};
use super::{Constant, Handle, HandleKind, InstructionBuilder, InstructionKind};
use crate::hierarchy::Hierarchy;
use crate::jvm::{InvalidInstruction, MethodDescriptor, Name, RawHandle, RawInstruction};
use crate::jvm::{RawConstant, RenderDescriptor, UnqualifiedName};

/// Call site linked at runtime by a bootstrap method
#[derive(Clone, PartialEq, Debug)]
pub struct InvokeDynamicInstruction<'g> {
    name: UnqualifiedName,
    descriptor: MethodDescriptor,
    bootstrap: Handle<'g>,
    arguments: Vec<Constant<'g>>,
}

impl<'g> InvokeDynamicInstruction<'g> {
    pub fn builder() -> InvokeDynamicBuilder<'g> {
        InvokeDynamicBuilder::default()
    }

    fn validate(name: &UnqualifiedName, bootstrap: &Handle<'g>) -> Result<(), InvalidInstruction> {
        if name.is_initializer() {
            return Err(InvalidInstruction::MalformedName(name.as_str().to_owned()));
        }
        match bootstrap.kind() {
            HandleKind::InvokeStatic | HandleKind::NewInvokeSpecial => Ok(()),
            _ => Err(InvalidInstruction::IllegalOperands {
                instruction: InstructionKind::InvokeDynamic,
                reason: "bootstrap handle must be `invokestatic` or `newinvokespecial`",
            }),
        }
    }

    pub fn name(&self) -> &UnqualifiedName {
        &self.name
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    pub fn bootstrap(&self) -> &Handle<'g> {
        &self.bootstrap
    }

    pub fn arguments(&self) -> &[Constant<'g>] {
        &self.arguments
    }

    pub fn set_name(&mut self, name: UnqualifiedName) -> Result<(), InvalidInstruction> {
        Self::validate(&name, &self.bootstrap)?;
        self.name = name;
        Ok(())
    }

    pub fn set_descriptor(&mut self, descriptor: MethodDescriptor) {
        self.descriptor = descriptor;
    }

    pub fn set_bootstrap(&mut self, bootstrap: Handle<'g>) -> Result<(), InvalidInstruction> {
        Self::validate(&self.name, &bootstrap)?;
        self.bootstrap = bootstrap;
        Ok(())
    }

    pub fn set_arguments(&mut self, arguments: Vec<Constant<'g>>) {
        self.arguments = arguments;
    }

    /// Link the bootstrap handle and any handle arguments to the hierarchy
    ///
    /// The call site name itself is chosen by the bootstrap method and is never linked.
    pub fn resolve(&mut self, hierarchy: &'g Hierarchy<'g>) {
        self.bootstrap.resolve(hierarchy);
        for argument in &mut self.arguments {
            argument.resolve(hierarchy);
        }
    }

    pub fn copy_from(&mut self, other: &InvokeDynamicInstruction<'g>) {
        self.clone_from(other)
    }

    pub fn copy_to(&self, other: &mut InvokeDynamicInstruction<'g>) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::InvokeDynamic {
            name: self.name.as_str().to_owned(),
            descriptor: self.descriptor.render(),
            bootstrap: self.bootstrap.dump(),
            arguments: self.arguments.iter().map(Constant::dump).collect(),
        }
    }

    pub(crate) fn from_raw(
        name: &str,
        descriptor: &str,
        bootstrap: &RawHandle,
        arguments: &[RawConstant],
    ) -> Result<InvokeDynamicInstruction<'g>, InvalidInstruction> {
        InvokeDynamicInstruction::builder()
            .name(parse_unqualified_name(name)?)
            .descriptor(parse_method_descriptor(descriptor)?)
            .bootstrap(Handle::from_raw(bootstrap)?)
            .arguments(
                arguments
                    .iter()
                    .map(Constant::from_raw)
                    .collect::<Result<_, _>>()?,
            )
            .build()
    }
}

#[derive(Clone, Default, Debug)]
pub struct InvokeDynamicBuilder<'g> {
    name: Option<UnqualifiedName>,
    descriptor: Option<MethodDescriptor>,
    bootstrap: Option<Handle<'g>>,
    arguments: Vec<Constant<'g>>,
}

impl<'g> InvokeDynamicBuilder<'g> {
    pub fn name(mut self, name: UnqualifiedName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn descriptor(mut self, descriptor: MethodDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    pub fn bootstrap(mut self, bootstrap: Handle<'g>) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn arguments(mut self, arguments: Vec<Constant<'g>>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn argument(mut self, argument: Constant<'g>) -> Self {
        self.arguments.push(argument);
        self
    }
}

impl<'g> InstructionBuilder<'g> for InvokeDynamicBuilder<'g> {
    type Output = InvokeDynamicInstruction<'g>;

    fn build(self) -> Result<InvokeDynamicInstruction<'g>, InvalidInstruction> {
        let missing = |field| InvalidInstruction::MissingField {
            instruction: InstructionKind::InvokeDynamic,
            field,
        };
        let name = self.name.ok_or_else(|| missing("name"))?;
        let descriptor = self.descriptor.ok_or_else(|| missing("descriptor"))?;
        let bootstrap = self.bootstrap.ok_or_else(|| missing("bootstrap"))?;
        InvokeDynamicInstruction::validate(&name, &bootstrap)?;
        Ok(InvokeDynamicInstruction {
            name,
            descriptor,
            bootstrap,
            arguments: self.arguments,
        })
    }
}
