use super::{parse_binary_name, parse_field_type, parse_method_descriptor, parse_ref_type};
use super::{parse_unqualified_name, InstructionKind};
use crate::hierarchy::{Hierarchy, MethodId};
use crate::jvm::{BinaryName, FieldType, InvalidInstruction, MethodDescriptor, Name};
use crate::jvm::{RawConstant, RawHandle, RefType, RenderDescriptor, UnqualifiedName};

/// Loadable constant (`ldc` operand or bootstrap argument)
#[derive(Clone, PartialEq, Debug)]
pub enum Constant<'g> {
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),
    Class(RefType),
    MethodType(MethodDescriptor),
    MethodHandle(Handle<'g>),
}

impl<'g> Constant<'g> {
    /// Long and double constants take up two slots (and need `ldc2_w`)
    pub fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }

    pub fn dump(&self) -> RawConstant {
        match self {
            Constant::Integer(value) => RawConstant::Integer(*value),
            Constant::Float(value) => RawConstant::Float(*value),
            Constant::Long(value) => RawConstant::Long(*value),
            Constant::Double(value) => RawConstant::Double(*value),
            Constant::String(value) => RawConstant::String(value.clone()),
            Constant::Class(class) => RawConstant::Type(class.render_internal()),
            Constant::MethodType(descriptor) => RawConstant::MethodType(descriptor.render()),
            Constant::MethodHandle(handle) => RawConstant::Handle(handle.dump()),
        }
    }

    /// Link method handles to the hierarchy (other constants have nothing to link)
    pub fn resolve(&mut self, hierarchy: &'g Hierarchy<'g>) {
        if let Constant::MethodHandle(handle) = self {
            handle.resolve(hierarchy);
        }
    }

    pub fn from_raw(raw: &RawConstant) -> Result<Constant<'g>, InvalidInstruction> {
        Ok(match raw {
            RawConstant::Integer(value) => Constant::Integer(*value),
            RawConstant::Float(value) => Constant::Float(*value),
            RawConstant::Long(value) => Constant::Long(*value),
            RawConstant::Double(value) => Constant::Double(*value),
            RawConstant::String(value) => Constant::String(value.clone()),
            RawConstant::Type(class) => Constant::Class(parse_ref_type(class)?),
            RawConstant::MethodType(descriptor) => {
                Constant::MethodType(parse_method_descriptor(descriptor)?)
            }
            RawConstant::Handle(handle) => Constant::MethodHandle(Handle::from_raw(handle)?),
        })
    }
}

/// Reference kinds of method handles
///
/// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-5.html#jvms-5.4.3.5>
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl HandleKind {
    const ALL: [HandleKind; 9] = [
        HandleKind::GetField,
        HandleKind::GetStatic,
        HandleKind::PutField,
        HandleKind::PutStatic,
        HandleKind::InvokeVirtual,
        HandleKind::InvokeStatic,
        HandleKind::InvokeSpecial,
        HandleKind::NewInvokeSpecial,
        HandleKind::InvokeInterface,
    ];

    pub fn tag(self) -> u8 {
        match self {
            HandleKind::GetField => 1,
            HandleKind::GetStatic => 2,
            HandleKind::PutField => 3,
            HandleKind::PutStatic => 4,
            HandleKind::InvokeVirtual => 5,
            HandleKind::InvokeStatic => 6,
            HandleKind::InvokeSpecial => 7,
            HandleKind::NewInvokeSpecial => 8,
            HandleKind::InvokeInterface => 9,
        }
    }

    pub fn from_tag(tag: u8) -> Option<HandleKind> {
        HandleKind::ALL.iter().copied().find(|kind| kind.tag() == tag)
    }

    /// Does the handle reference a field (as opposed to a method)?
    pub fn is_field(self) -> bool {
        self.tag() <= 4
    }
}

/// Type of the member a handle points at
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum HandleDescriptor {
    Field(FieldType),
    Method(MethodDescriptor),
}

impl RenderDescriptor for HandleDescriptor {
    fn render_to(&self, write_to: &mut String) {
        match self {
            HandleDescriptor::Field(field_type) => field_type.render_to(write_to),
            HandleDescriptor::Method(descriptor) => descriptor.render_to(write_to),
        }
    }
}

/// Method handle constant
///
/// Handles to methods are symbolic until [`Handle::resolve`] links them to the hierarchy, just
/// like call sites. A linked handle reports the name and descriptor of its target's function
/// group, so renaming the group renames the handle too. Field handles are never linked.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Handle<'g> {
    kind: HandleKind,
    owner: BinaryName,
    name: UnqualifiedName,
    descriptor: HandleDescriptor,
    is_interface: bool,
    target: Option<MethodId<'g>>,
}

impl<'g> Handle<'g> {
    pub fn new(
        kind: HandleKind,
        owner: BinaryName,
        name: UnqualifiedName,
        descriptor: HandleDescriptor,
        is_interface: bool,
    ) -> Result<Handle<'g>, InvalidInstruction> {
        Self::validate(kind, &name, &descriptor)?;
        Ok(Handle {
            kind,
            owner,
            name,
            descriptor,
            is_interface,
            target: None,
        })
    }

    /// Field kinds need field descriptors, and only `newinvokespecial` may name a constructor
    fn validate(
        kind: HandleKind,
        name: &UnqualifiedName,
        descriptor: &HandleDescriptor,
    ) -> Result<(), InvalidInstruction> {
        if kind.is_field() != matches!(descriptor, HandleDescriptor::Field(_)) {
            return Err(InvalidInstruction::MalformedDescriptor(descriptor.render()));
        }
        let names_constructor = name == &UnqualifiedName::INIT;
        let bad_name = match kind {
            HandleKind::NewInvokeSpecial => !names_constructor,
            _ => name.is_initializer(),
        };
        if bad_name {
            return Err(InvalidInstruction::MalformedName(name.as_str().to_owned()));
        }
        Ok(())
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn owner(&self) -> &BinaryName {
        &self.owner
    }

    /// Name of the referenced member, following the function group once linked
    pub fn name(&self) -> UnqualifiedName {
        match self.target {
            Some(target) => target.0.name(),
            None => self.name.clone(),
        }
    }

    /// Descriptor of the referenced member, following the function group once linked
    pub fn descriptor(&self) -> HandleDescriptor {
        match self.target {
            Some(target) => HandleDescriptor::Method(target.0.descriptor()),
            None => self.descriptor.clone(),
        }
    }

    /// Name as it was written, ignoring any link
    pub fn declared_name(&self) -> &UnqualifiedName {
        &self.name
    }

    pub fn declared_descriptor(&self) -> &HandleDescriptor {
        &self.descriptor
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    pub fn target(&self) -> Option<MethodId<'g>> {
        self.target
    }

    /// Link a method handle to the method it references
    ///
    /// Constructor handles must name a method of the owner itself. All other method handles are
    /// looked up the way call sites are. Members outside of the hierarchy stay unlinked.
    pub fn resolve(&mut self, hierarchy: &'g Hierarchy<'g>) {
        let descriptor = match &self.descriptor {
            HandleDescriptor::Method(descriptor) => descriptor,
            HandleDescriptor::Field(_) => return,
        };
        self.target = if self.kind == HandleKind::NewInvokeSpecial {
            hierarchy.find_method(&self.owner, &self.name, descriptor)
        } else {
            hierarchy.resolve_method(&self.owner, &self.name, descriptor)
        };
        log::trace!(
            "Linked handle to {}.{} to {:?}",
            self.owner,
            self.name,
            self.target
        );
    }

    pub fn dump(&self) -> RawHandle {
        RawHandle {
            tag: self.kind.tag(),
            owner: self.owner.as_str().to_owned(),
            name: self.name().as_str().to_owned(),
            descriptor: self.descriptor().render(),
            is_interface: self.is_interface,
        }
    }

    pub fn from_raw(raw: &RawHandle) -> Result<Handle<'g>, InvalidInstruction> {
        let kind = HandleKind::from_tag(raw.tag).ok_or(InvalidInstruction::OperandOutOfRange {
            instruction: InstructionKind::Ldc,
            operand: i64::from(raw.tag),
        })?;
        let descriptor = if kind.is_field() {
            HandleDescriptor::Field(parse_field_type(&raw.descriptor)?)
        } else {
            HandleDescriptor::Method(parse_method_descriptor(&raw.descriptor)?)
        };
        Handle::new(
            kind,
            parse_binary_name(&raw.owner)?,
            parse_unqualified_name(&raw.name)?,
            descriptor,
            raw.is_interface,
        )
    }
}
