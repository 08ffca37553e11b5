use crate::model::EntityTag;
use std::fmt;

///
/// CompositeShape
///
/// Accumulated row shape after zero or more joins.
///
/// The tree is right-leaning: each join nests the previous shape as `outer`
/// and the joined entity as `inner`, so `inner` is always a leaf.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CompositeShape {
    Leaf(EntityTag),
    Pair { outer: Box<Self>, inner: EntityTag },
}

impl CompositeShape {
    #[must_use]
    pub const fn leaf(entity: EntityTag) -> Self {
        Self::Leaf(entity)
    }

    /// Wrap this shape as the outer side of a new join.
    #[must_use]
    pub fn pair(self, inner: EntityTag) -> Self {
        Self::Pair {
            outer: Box::new(self),
            inner,
        }
    }

    #[must_use]
    pub fn root(&self) -> &EntityTag {
        match self {
            Self::Leaf(entity) => entity,
            Self::Pair { outer, .. } => outer.root(),
        }
    }

    /// Number of joins folded into this shape.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Pair { outer, .. } => outer.depth() + 1,
        }
    }

    /// Entities in join order, root first.
    #[must_use]
    pub fn entities(&self) -> Vec<&EntityTag> {
        match self {
            Self::Leaf(entity) => vec![entity],
            Self::Pair { outer, inner } => {
                let mut entities = outer.entities();
                entities.push(inner);
                entities
            }
        }
    }

    #[must_use]
    pub fn contains(&self, entity: &EntityTag) -> bool {
        match self {
            Self::Leaf(leaf) => leaf == entity,
            Self::Pair { outer, inner } => inner == entity || outer.contains(entity),
        }
    }
}

impl fmt::Display for CompositeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(entity) => write!(f, "{entity}"),
            Self::Pair { outer, inner } => write!(f, "Pair<{outer}, {inner}>"),
        }
    }
}
