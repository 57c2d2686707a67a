//! Errors raised while building or mutating a [`Model`](crate::Model)

use super::Tag;
use std::fmt;

/// which tag collection of a model an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Node,
    Element,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Node => write!(f, "node"),
            TagKind::Element => write!(f, "element"),
        }
    }
}

/// Every way a model can be rejected. All of these are raised at the call that introduced
/// the inconsistency, so a malformed model never reaches a writer.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// malformed or inconsistent model structure
    #[error("invalid model: {0}")]
    Validation(String),
    /// a tag that is not part of the relevant tag collection
    #[error("unknown {kind} tag {tag} referenced by {context}")]
    UnknownTag {
        kind: TagKind,
        tag: Tag,
        context: String,
    },
    /// a group name that is already taken
    #[error("{kind} group `{name}` already exists")]
    DuplicateGroup { kind: TagKind, name: String },
    /// an array whose length does not line up with what it describes
    #[error("`{name}` has {actual} entries, expected {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl ModelError {
    pub(crate) fn validation<T: Into<String>>(msg: T) -> Self {
        ModelError::Validation(msg.into())
    }

    pub(crate) fn unknown_tag<T: Into<String>>(kind: TagKind, tag: Tag, context: T) -> Self {
        ModelError::UnknownTag {
            kind,
            tag,
            context: context.into(),
        }
    }

    pub(crate) fn dimension_mismatch<T: Into<String>>(
        name: T,
        expected: usize,
        actual: usize,
    ) -> Self {
        ModelError::DimensionMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = ModelError::unknown_tag(TagKind::Node, 42, "connectivity of element 3");
        assert_eq!(
            err.to_string(),
            "unknown node tag 42 referenced by connectivity of element 3"
        );

        let err = ModelError::DuplicateGroup {
            kind: TagKind::Element,
            name: "tris".into(),
        };
        assert_eq!(err.to_string(), "element group `tris` already exists");

        let err = ModelError::dimension_mismatch("T", 5, 4);
        assert!(err.to_string().contains("expected 5"));
    }
}
