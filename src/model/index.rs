use super::error::TagKind;
use super::{ModelError, Tag};

use std::collections::HashMap;

/// Mapping from external tags to 0-based local indices, in tag collection order.
///
/// Files address points and cells positionally, while tags may be sparse
/// (`[1, 2, 3, 5, 8]`), so every lookup between the two goes through one of these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    map: HashMap<Tag, usize>,
}

impl TagIndex {
    /// build the index, rejecting duplicate tags
    pub fn new(tags: &[Tag], kind: TagKind) -> Result<Self, ModelError> {
        let mut map = HashMap::with_capacity(tags.len());

        for (local, tag) in tags.iter().enumerate() {
            if map.insert(*tag, local).is_some() {
                return Err(ModelError::validation(format!(
                    "duplicate {kind} tag {tag}"
                )));
            }
        }

        Ok(Self { map })
    }

    /// local index of a tag, if the tag exists
    pub fn local(&self, tag: Tag) -> Option<usize> {
        self.map.get(&tag).copied()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.map.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_tags_get_dense_indices() {
        let index = TagIndex::new(&[1, 2, 3, 5, 8], TagKind::Node).unwrap();
        assert_eq!(index.local(1), Some(0));
        assert_eq!(index.local(5), Some(3));
        assert_eq!(index.local(8), Some(4));
        assert_eq!(index.local(4), None);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn duplicates_rejected() {
        let err = TagIndex::new(&[3, 1, 3], TagKind::Element).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert!(err.to_string().contains("duplicate element tag 3"));
    }
}
