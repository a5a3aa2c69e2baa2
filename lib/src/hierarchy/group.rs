use super::MethodId;
use crate::jvm::{MethodDescriptor, Name, RenderDescriptor, UnqualifiedName};
use crate::util::RefId;
use elsa::FrozenVec;
use std::cell::RefCell;
use std::fmt;

/// Family of methods that override one another
///
/// Every method in the family shares this one record, so renaming the group renames all of them
/// at once. Groups live in the hierarchy arenas and are compared by address (see
/// [`super::FunctionGroupId`]): two groups with the same name and descriptor are still distinct
/// families.
pub struct FunctionGroupData<'g> {
    name: RefCell<UnqualifiedName>,
    descriptor: RefCell<MethodDescriptor>,
    members: FrozenVec<MethodId<'g>>,
}

impl<'g> FunctionGroupData<'g> {
    pub(super) fn new(name: UnqualifiedName, descriptor: MethodDescriptor) -> Self {
        FunctionGroupData {
            name: RefCell::new(name),
            descriptor: RefCell::new(descriptor),
            members: FrozenVec::new(),
        }
    }

    pub fn name(&self) -> UnqualifiedName {
        self.name.borrow().clone()
    }

    pub fn descriptor(&self) -> MethodDescriptor {
        self.descriptor.borrow().clone()
    }

    /// Rename every method in the family
    pub fn rename(&self, name: UnqualifiedName) {
        log::debug!("Renaming group {:?} to {}", self, name);
        *self.name.borrow_mut() = name;
    }

    /// Change the descriptor of every method in the family
    pub fn set_descriptor(&self, descriptor: MethodDescriptor) {
        *self.descriptor.borrow_mut() = descriptor;
    }

    /// Methods in the family, in the order they joined it
    pub fn members(&'g self) -> Vec<MethodId<'g>> {
        self.members.iter().map(RefId).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.len() == 0
    }

    pub(super) fn add_member(&self, method: MethodId<'g>) {
        self.members.push(method);
    }
}

impl<'g> fmt::Debug for FunctionGroupData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.name.borrow().as_str(),
            self.descriptor.borrow().render()
        )
    }
}
