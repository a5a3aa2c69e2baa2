//! Class hierarchy and override group resolution
//!
//! The hierarchy is an arena-backed registry of class and method skeletons. Resolving a class
//! turns each of its method bodies into typed instructions and assigns each of its methods to a
//! function group: the family of methods that override one another and must therefore always be
//! renamed together.
//!
//! Groups are found by searching the ancestors of a method's class for a method with the same
//! name and descriptor. This only works if ancestors are resolved before their descendants, which
//! is what [`Hierarchy::resolve_all`] guarantees.

mod class;
mod edge;
mod group;
mod method;
mod settings;

pub use class::*;
pub use edge::*;
pub use group::*;
pub use method::*;
pub use settings::*;

use crate::jvm::{BinaryName, ClassAccessFlags, Error, MethodAccessFlags, MethodDescriptor};
use crate::jvm::{Name, ParseDescriptor, RawClass, UnqualifiedName};
use crate::util::RefId;
use elsa::map::FrozenMap;
use elsa::FrozenVec;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use typed_arena::Arena;

pub type ClassId<'g> = RefId<'g, ClassData<'g>>;
pub type MethodId<'g> = RefId<'g, MethodData<'g>>;
pub type FunctionGroupId<'g> = RefId<'g, FunctionGroupData<'g>>;

pub struct HierarchyArenas<'g> {
    class_arena: Arena<ClassData<'g>>,
    method_arena: Arena<MethodData<'g>>,
    group_arena: Arena<FunctionGroupData<'g>>,
}

impl<'g> HierarchyArenas<'g> {
    pub fn new() -> Self {
        HierarchyArenas {
            class_arena: Arena::new(),
            method_arena: Arena::new(),
            group_arena: Arena::new(),
        }
    }
}

impl<'g> Default for HierarchyArenas<'g> {
    fn default() -> Self {
        HierarchyArenas::new()
    }
}

/// Depth first search state used when ordering classes
#[derive(Copy, Clone, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Registry of all classes being analyzed, and driver of their resolution
///
/// Everything (classes, methods, groups) is allocated in the arenas the hierarchy is created
/// with, so handles stay valid for as long as the arenas do. Entities are write-once: classes and
/// methods can be added but never removed, and a method's group is assigned exactly once.
pub struct Hierarchy<'g> {
    arenas: &'g HierarchyArenas<'g>,
    pub settings: Settings,
    classes: FrozenMap<&'g BinaryName, &'g ClassData<'g>>,
    class_order: FrozenVec<&'g ClassData<'g>>,
    edges: RefCell<Vec<FunctionInheritanceEdge<'g>>>,
}

impl<'g> Hierarchy<'g> {
    /// New empty hierarchy
    pub fn new(arenas: &'g HierarchyArenas<'g>, settings: Settings) -> Self {
        Hierarchy {
            arenas,
            settings,
            classes: FrozenMap::new(),
            class_order: FrozenVec::new(),
            edges: RefCell::new(vec![]),
        }
    }

    /// Add a new class skeleton
    pub fn add_class(&'g self, class: ClassData<'g>) -> Result<ClassId<'g>, Error> {
        if self.classes.get(&class.name).is_some() {
            return Err(Error::DuplicateClass(class.name));
        }
        let data = &*self.arenas.class_arena.alloc(class);
        self.classes.insert(&data.name, data);
        self.class_order.push(data);
        Ok(RefId(data))
    }

    /// Add a method skeleton to the hierarchy and to its class
    ///
    /// Methods cannot be added to classes that have already been resolved.
    pub fn add_method(&'g self, method: MethodData<'g>) -> Result<MethodId<'g>, Error> {
        let class = method.class();
        if class.is_resolved() {
            return Err(Error::ClassAlreadyResolved(class.name.clone()));
        }
        if class
            .0
            .find_method(method.declared_name(), method.declared_descriptor())
            .is_some()
        {
            return Err(Error::DuplicateMethod(format!("{:?}", method)));
        }
        let data = &*self.arenas.method_arena.alloc(method);
        class.0.methods.push(data);
        Ok(RefId(data))
    }

    /// Add a class and all of its methods as delivered by the front end
    pub fn add_raw_class(&'g self, raw: &RawClass) -> Result<ClassId<'g>, Error> {
        fn make_name<N: Name>(name: &str) -> Result<N, Error> {
            N::from_string(name.to_owned()).map_err(Error::MalformedName)
        }

        let class = self.add_class(ClassData::new(
            make_name(&raw.name)?,
            raw.superclass.as_deref().map(make_name).transpose()?,
            raw.interfaces
                .iter()
                .map(|name| make_name(name))
                .collect::<Result<_, _>>()?,
            ClassAccessFlags::from_bits_truncate(raw.access_flags),
        ))?;
        for method in &raw.methods {
            let descriptor = MethodDescriptor::parse(&method.descriptor)
                .map_err(Error::MalformedDescriptor)?;
            self.add_method(MethodData::new(
                class,
                make_name(&method.name)?,
                descriptor,
                MethodAccessFlags::from_bits_truncate(method.access_flags),
                method.instructions.clone(),
            ))?;
        }
        Ok(class)
    }

    pub fn lookup_class(&'g self, name: &BinaryName) -> Option<ClassId<'g>> {
        self.classes.get(name).map(RefId)
    }

    /// Find a method declared directly on a class
    ///
    /// Ancestors are not searched (see [`Hierarchy::resolve_method`] for that).
    pub fn find_method(
        &'g self,
        class: &BinaryName,
        name: &UnqualifiedName,
        descriptor: &MethodDescriptor,
    ) -> Option<MethodId<'g>> {
        self.classes.get(class)?.find_method(name, descriptor)
    }

    /// Find the method a call to `owner.name:descriptor` would link to
    ///
    /// This looks at the owner, then its superclasses, then all of their superinterfaces
    /// (breadth first). Classes missing from the hierarchy are skipped.
    pub fn resolve_method(
        &'g self,
        owner: &BinaryName,
        name: &UnqualifiedName,
        descriptor: &MethodDescriptor,
    ) -> Option<MethodId<'g>> {
        let mut visited: HashSet<ClassId<'g>> = HashSet::new();
        let mut interfaces: VecDeque<&'g BinaryName> = VecDeque::new();

        let mut next_class = self.lookup_class(owner);
        while let Some(class) = next_class {
            if !visited.insert(class) {
                break;
            }
            if let Some(method) = class.0.find_method(name, descriptor) {
                return Some(method);
            }
            interfaces.extend(class.0.interfaces.iter());
            next_class = class
                .0
                .superclass
                .as_ref()
                .and_then(|superclass| self.lookup_class(superclass));
        }

        while let Some(interface_name) = interfaces.pop_front() {
            let interface = match self.lookup_class(interface_name) {
                Some(interface) if visited.insert(interface) => interface,
                _ => continue,
            };
            if let Some(method) = interface.0.find_method(name, descriptor) {
                return Some(method);
            }
            interfaces.extend(interface.0.interfaces.iter());
        }

        None
    }

    /// All classes, in the order they were added
    pub fn classes(&'g self) -> Vec<ClassId<'g>> {
        self.class_order.iter().map(RefId).collect()
    }

    /// Override relationships recorded so far
    pub fn inheritance_edges(&self) -> Vec<FunctionInheritanceEdge<'g>> {
        self.edges.borrow().clone()
    }

    /// Dump every class, in the order they were added
    pub fn dump(&'g self) -> Vec<RawClass> {
        self.class_order.iter().map(|class| class.dump()).collect()
    }

    /// Look up an ancestor of `class`, applying the missing ancestor policy
    fn ancestor(
        &'g self,
        class: &ClassData<'g>,
        ancestor: &BinaryName,
    ) -> Result<Option<&'g ClassData<'g>>, Error> {
        match self.classes.get(ancestor) {
            Some(ancestor) => Ok(Some(ancestor)),
            None => match self.settings.missing_ancestors {
                MissingAncestorPolicy::Skip => Ok(None),
                MissingAncestorPolicy::Fail => Err(Error::MissingAncestor {
                    class: class.name.clone(),
                    ancestor: ancestor.clone(),
                }),
            },
        }
    }

    /// Order in which classes can be resolved: every class comes after all of its ancestors
    ///
    /// Otherwise, classes are kept in the order they were added.
    pub fn resolution_order(&'g self) -> Result<Vec<ClassId<'g>>, Error> {
        let mut marks: HashMap<ClassId<'g>, Visit> = HashMap::new();
        let mut order: Vec<ClassId<'g>> = vec![];
        for class in self.class_order.iter() {
            self.visit_ancestors_first(class, &mut marks, &mut order)?;
        }
        Ok(order)
    }

    /// Depth first post-order walk of the ancestors of `root`, rejecting cycles
    fn visit_ancestors_first(
        &'g self,
        root: &'g ClassData<'g>,
        marks: &mut HashMap<ClassId<'g>, Visit>,
        order: &mut Vec<ClassId<'g>>,
    ) -> Result<(), Error> {
        // Second component is whether ancestors have already been pushed
        let mut to_visit: Vec<(&'g ClassData<'g>, bool)> = vec![(root, false)];

        while let Some((class, expanded)) = to_visit.pop() {
            let class_id = RefId(class);
            if expanded {
                marks.insert(class_id, Visit::Done);
                order.push(class_id);
                continue;
            }
            match marks.get(&class_id) {
                Some(Visit::Done) => continue,
                Some(Visit::InProgress) => return Err(Error::CyclicHierarchy(class.name.clone())),
                None => (),
            }
            marks.insert(class_id, Visit::InProgress);
            to_visit.push((class, true));

            // Reversed so that the superclass gets popped first
            for ancestor_name in class.ancestors().rev() {
                let ancestor = match self.ancestor(class, ancestor_name)? {
                    Some(ancestor) => ancestor,
                    None => {
                        log::warn!(
                            "Ancestor {} of {} is not in the hierarchy",
                            ancestor_name,
                            class.name
                        );
                        continue;
                    }
                };
                match marks.get(&RefId(ancestor)) {
                    Some(Visit::Done) => (),
                    Some(Visit::InProgress) => {
                        return Err(Error::CyclicHierarchy(ancestor.name.clone()))
                    }
                    None => to_visit.push((ancestor, false)),
                }
            }
        }

        Ok(())
    }

    /// Resolve every class, ancestors before descendants
    ///
    /// The first error aborts the whole pass.
    pub fn resolve_all(&'g self) -> Result<(), Error> {
        let order = self.resolution_order().map_err(|err| {
            log::error!("Could not order the hierarchy: {:?}", err);
            err
        })?;
        for class in order {
            if let Err(err) = self.resolve_methods(class) {
                log::error!("Failed to resolve {:?}: {:?}", class, err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Resolve a single class
    ///
    /// The caller is responsible for having resolved all of its ancestors first.
    pub fn resolve_class(&'g self, class: ClassId<'g>) -> Result<(), Error> {
        // Group search walks ancestors without deduplication if asked to, so it must not loop
        let mut marks = HashMap::new();
        let mut order = vec![];
        self.visit_ancestors_first(class.0, &mut marks, &mut order)?;

        self.resolve_methods(class)
    }

    fn resolve_methods(&'g self, class: ClassId<'g>) -> Result<(), Error> {
        if class.resolved.replace(true) {
            return Err(Error::ClassAlreadyResolved(class.name.clone()));
        }
        log::debug!("Resolving {:?}", class);

        for method in class.0.methods.iter() {
            method.materialize(self)?;
            let group = self.resolve_group(RefId(method))?;
            log::trace!("{:?} is in group {:?}", method, group);
        }
        Ok(())
    }

    fn new_group(&'g self, method: MethodId<'g>) -> FunctionGroupId<'g> {
        let group = FunctionGroupData::new(
            method.declared_name().clone(),
            method.declared_descriptor().clone(),
        );
        RefId(&*self.arenas.group_arena.alloc(group))
    }

    /// Find (or create) the group of a method and assign it
    ///
    /// Non-virtual methods always get a fresh group. Virtual methods search their class'
    /// ancestors for methods with the same name and descriptor: the search stops along a path as
    /// soon as one is found, and all methods found must already be in the same group.
    fn resolve_group(&'g self, method: MethodId<'g>) -> Result<FunctionGroupId<'g>, Error> {
        if !method.is_virtual() {
            let group = self.new_group(method);
            method.0.set_group(group)?;
            return Ok(group);
        }

        let class = method.class();
        let name = method.declared_name();
        let descriptor = method.declared_descriptor();

        let mut to_visit: Vec<&'g BinaryName> = class.0.ancestors().rev().collect();
        let mut dont_revisit: HashSet<&'g BinaryName> = HashSet::new();
        let mut candidate: Option<FunctionGroupId<'g>> = None;
        let mut overridden: Vec<MethodId<'g>> = vec![];

        while let Some(ancestor_name) = to_visit.pop() {
            if self.settings.deduplicate_ancestor_visits && !dont_revisit.insert(ancestor_name) {
                continue;
            }
            let ancestor = match self.ancestor(class.0, ancestor_name)? {
                Some(ancestor) => ancestor,
                None => {
                    log::trace!("Skipping missing ancestor {} of {:?}", ancestor_name, method);
                    continue;
                }
            };
            log::trace!("Searching {:?} for {:?}", ancestor, method);

            // Static methods never take part in dispatch, so look past them
            let ancestor_method = match ancestor.find_method(name, descriptor) {
                Some(ancestor_method) if !ancestor_method.is_static() => ancestor_method,
                _ => {
                    to_visit.extend(ancestor.ancestors().rev());
                    continue;
                }
            };

            let group = ancestor_method
                .group()
                .ok_or_else(|| Error::UnresolvedAncestor {
                    method: format!("{:?}", method),
                    ancestor: ancestor.name.clone(),
                })?;
            match candidate {
                Some(existing) if existing != group => {
                    return Err(Error::ConflictingGroup {
                        method: format!("{:?}", method),
                        ancestor: ancestor.name.clone(),
                        existing: format!("{:?}", existing),
                        conflicting: format!("{:?}", group),
                    })
                }
                _ => candidate = Some(group),
            }
            if !overridden.contains(&ancestor_method) {
                overridden.push(ancestor_method);
            }
        }

        let group = match candidate {
            Some(group) => group,
            None => self.new_group(method),
        };
        method.0.set_group(group)?;

        if self.settings.record_inheritance_edges {
            self.edges
                .borrow_mut()
                .extend(overridden.into_iter().map(|parent| FunctionInheritanceEdge {
                    parent,
                    child: method,
                }));
        }
        Ok(group)
    }
}
