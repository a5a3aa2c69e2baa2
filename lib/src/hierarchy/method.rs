use super::{ClassId, FunctionGroupId, Hierarchy};
use crate::insn::{Instruction, InstructionList};
use crate::jvm::{Error, MethodAccessFlags, MethodDescriptor, Name, RawInstruction, RawMethod};
use crate::jvm::{RenderDescriptor, UnqualifiedName};
use crate::util::RefId;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;

/// Method skeleton
///
/// A method is identified by its class, name, and descriptor as declared. Once resolved, the
/// name and descriptor it is emitted with come from its function group instead, since the group
/// may have been renamed since.
pub struct MethodData<'g> {
    class: ClassId<'g>,
    name: UnqualifiedName,
    descriptor: MethodDescriptor,
    pub access_flags: MethodAccessFlags,

    /// Body as delivered by the front end
    raw_instructions: Vec<RawInstruction>,

    /// Typed body, filled in when the method is resolved
    instructions: RefCell<InstructionList<'g>>,
    materialized: Cell<bool>,

    group: Cell<Option<FunctionGroupId<'g>>>,
}

impl<'g> MethodData<'g> {
    pub fn new(
        class: ClassId<'g>,
        name: UnqualifiedName,
        descriptor: MethodDescriptor,
        access_flags: MethodAccessFlags,
        raw_instructions: Vec<RawInstruction>,
    ) -> MethodData<'g> {
        MethodData {
            class,
            name,
            descriptor,
            access_flags,
            raw_instructions,
            instructions: RefCell::new(InstructionList::new(None)),
            materialized: Cell::new(false),
            group: Cell::new(None),
        }
    }

    pub fn class(&self) -> ClassId<'g> {
        self.class
    }

    pub fn declared_name(&self) -> &UnqualifiedName {
        &self.name
    }

    pub fn declared_descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// Current name: the group's name once resolved, otherwise the declared one
    pub fn name(&self) -> UnqualifiedName {
        match self.group.get() {
            Some(group) => group.name(),
            None => self.name.clone(),
        }
    }

    /// Current descriptor: the group's descriptor once resolved, otherwise the declared one
    pub fn descriptor(&self) -> MethodDescriptor {
        match self.group.get() {
            Some(group) => group.descriptor(),
            None => self.descriptor.clone(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == UnqualifiedName::INIT
    }

    /// Can this method override or be overridden?
    ///
    /// Static methods, constructors, and class initializers are never dispatched virtually.
    pub fn is_virtual(&self) -> bool {
        !self.is_static() && !self.name.is_initializer()
    }

    pub fn group(&self) -> Option<FunctionGroupId<'g>> {
        self.group.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.group.get().is_some()
    }

    /// Assign the method to a group, exactly once
    pub(super) fn set_group(&'g self, group: FunctionGroupId<'g>) -> Result<(), Error> {
        if self.group.get().is_some() {
            return Err(Error::DuplicateGroupAssignment(format!("{:?}", self)));
        }
        self.group.set(Some(group));
        group.0.add_member(RefId(self));
        Ok(())
    }

    pub fn raw_instructions(&self) -> &[RawInstruction] {
        &self.raw_instructions
    }

    pub fn instructions(&self) -> Ref<'_, InstructionList<'g>> {
        self.instructions.borrow()
    }

    pub fn instructions_mut(&self) -> RefMut<'_, InstructionList<'g>> {
        self.instructions.borrow_mut()
    }

    /// Turn the raw body into typed instructions, then link calls and method handles
    pub(super) fn materialize(&'g self, hierarchy: &'g Hierarchy<'g>) -> Result<(), Error> {
        let mut list = InstructionList::new(Some(RefId(self)));
        for (index, raw) in self.raw_instructions.iter().enumerate() {
            let mut insn = Instruction::from_raw(raw).map_err(|error| Error::InvalidInstruction {
                method: format!("{:?}", self),
                index,
                error,
            })?;
            insn.resolve(hierarchy);
            log::trace!("{:?} #{}: {:?}", self, index, insn);
            list.push(insn);
        }
        *self.instructions.borrow_mut() = list;
        self.materialized.set(true);
        Ok(())
    }

    /// Raw method with the current name and descriptor
    ///
    /// The body is regenerated from the typed instructions if the method has been resolved, and
    /// passed through unchanged otherwise.
    pub fn dump(&self) -> RawMethod {
        let instructions = if self.materialized.get() {
            self.instructions.borrow().dump()
        } else {
            self.raw_instructions.clone()
        };
        RawMethod {
            name: self.name().as_str().to_owned(),
            descriptor: self.descriptor().render(),
            access_flags: self.access_flags.bits(),
            instructions,
        }
    }
}

impl<'g> fmt::Debug for MethodData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}:{}",
            self.class.name.as_str(),
            self.name.as_str(),
            self.descriptor.render()
        )
    }
}
