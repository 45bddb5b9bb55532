use std::fmt;

/// A runtime handle to a primitive id, passed between iterators.
///
/// Carries its own kind so a [`crate::IterError::TypeMismatch`] can be raised
/// when, say, a quad id is handed to an iterator expecting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ref {
    Node(i64),
    Quad(i64),
}

impl Ref {
    pub fn id(self) -> i64 {
        match self {
            Self::Node(id) | Self::Quad(id) => id,
        }
    }

    pub fn is_node(self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn is_quad(self) -> bool {
        matches!(self, Self::Quad(_))
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node#{id}"),
            Self::Quad(id) => write!(f, "quad#{id}"),
        }
    }
}
