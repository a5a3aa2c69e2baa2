use super::{MethodData, MethodId};
use crate::jvm::{BinaryName, ClassAccessFlags, MethodDescriptor, Name, RawClass, UnqualifiedName};
use crate::util::RefId;
use elsa::FrozenVec;
use std::cell::Cell;
use std::fmt;

/// Class or interface skeleton
///
/// Ancestors are referred to by name and looked up in the hierarchy when needed, so a class can
/// be added before its superclass (or without it, if the superclass is a library class).
pub struct ClassData<'g> {
    /// Name of the class, unique within the hierarchy
    pub name: BinaryName,

    /// Superclass is only ever missing for `java/lang/Object` itself
    pub superclass: Option<BinaryName>,

    /// Interfaces implemented (or super-interfaces)
    pub interfaces: Vec<BinaryName>,

    pub access_flags: ClassAccessFlags,

    /// Methods, in declaration order
    pub(super) methods: FrozenVec<&'g MethodData<'g>>,

    /// Set once resolution of the class has started
    pub(super) resolved: Cell<bool>,
}

impl<'g> ClassData<'g> {
    pub fn new(
        name: BinaryName,
        superclass: Option<BinaryName>,
        interfaces: Vec<BinaryName>,
        access_flags: ClassAccessFlags,
    ) -> ClassData<'g> {
        ClassData {
            name,
            superclass,
            interfaces,
            access_flags,
            methods: FrozenVec::new(),
            resolved: Cell::new(false),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get()
    }

    /// Direct supertypes: the superclass first, then interfaces in declaration order
    pub fn ancestors(&self) -> impl DoubleEndedIterator<Item = &BinaryName> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    /// Methods declared on this class, in declaration order
    pub fn methods(&'g self) -> Vec<MethodId<'g>> {
        self.methods.iter().map(RefId).collect()
    }

    /// Find a method declared directly on this class (ancestors are not searched)
    pub fn find_method(
        &'g self,
        name: &UnqualifiedName,
        descriptor: &MethodDescriptor,
    ) -> Option<MethodId<'g>> {
        self.methods
            .iter()
            .find(|method| {
                method.declared_name() == name && method.declared_descriptor() == descriptor
            })
            .map(RefId)
    }

    pub fn dump(&'g self) -> RawClass {
        RawClass {
            name: self.name.as_str().to_owned(),
            superclass: self.superclass.as_ref().map(|name| name.as_str().to_owned()),
            interfaces: self
                .interfaces
                .iter()
                .map(|name| name.as_str().to_owned())
                .collect(),
            access_flags: self.access_flags.bits(),
            methods: self.methods.iter().map(MethodData::dump).collect(),
        }
    }
}

impl<'g> fmt::Debug for ClassData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}
