use super::MethodId;
use std::fmt;

/// Override relationship discovered during resolution
///
/// `child` joined the group of `parent`, which is declared on one of its class' ancestors.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FunctionInheritanceEdge<'g> {
    pub parent: MethodId<'g>,
    pub child: MethodId<'g>,
}

impl<'g> fmt::Debug for FunctionInheritanceEdge<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} <- {:?}", self.parent, self.child)
    }
}
