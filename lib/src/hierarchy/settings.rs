/// Knobs for building and resolving a hierarchy
pub struct Settings {
    /// What to do when a superclass or superinterface is not in the hierarchy
    pub missing_ancestors: MissingAncestorPolicy,

    /// Visit each ancestor at most once when searching for a method's group
    ///
    /// Diamond shaped interface graphs otherwise get walked once per path. The resulting groups
    /// are the same either way, since revisiting an ancestor finds the same group again.
    pub deduplicate_ancestor_visits: bool,

    /// Record a [`super::FunctionInheritanceEdge`] each time a method joins an ancestor's group
    pub record_inheritance_edges: bool,
}

impl Settings {
    pub fn new() -> Settings {
        Settings {
            missing_ancestors: MissingAncestorPolicy::Skip,
            deduplicate_ancestor_visits: true,
            record_inheritance_edges: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings::new()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MissingAncestorPolicy {
    /// Treat the ancestor as declaring no methods
    ///
    /// This is what you want when library classes (eg. `java/lang/Object`) are left out of the
    /// hierarchy.
    Skip,

    /// Fail with [`crate::jvm::Error::MissingAncestor`]
    Fail,
}
