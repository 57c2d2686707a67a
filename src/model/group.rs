//! Named subsets of node or element tags

use super::error::TagKind;
use super::index::TagIndex;
use super::{ModelError, Tag};

use std::collections::HashSet;

/// prefix of the indicator arrays written for every group
pub const GROUP_PREFIX: &str = "_group ";

/// A named, sorted set of tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    tags: Vec<Tag>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// tags in the group, sorted and without repeats
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// the name of the data array this group is exported as
    pub fn array_name(&self) -> String {
        format!("{GROUP_PREFIX}{}", self.name)
    }
}

/// Groups of one tag collection, kept in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    groups: Vec<Group>,
}

impl Groups {
    /// register a new group after checking every tag against `index`
    pub(crate) fn add(
        &mut self,
        kind: TagKind,
        index: &TagIndex,
        name: &str,
        tags: &[Tag],
    ) -> Result<(), ModelError> {
        if self.get(name).is_some() {
            return Err(ModelError::DuplicateGroup {
                kind,
                name: name.into(),
            });
        }

        if let Some(missing) = tags.iter().find(|tag| !index.contains(**tag)) {
            return Err(ModelError::unknown_tag(
                kind,
                *missing,
                format!("{kind} group `{name}`"),
            ));
        }

        let mut tags = tags.to_vec();
        tags.sort_unstable();
        tags.dedup();

        self.groups.push(Group {
            name: name.into(),
            tags,
        });

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// copy of every group holding only the tags accepted by `keep`
    pub(crate) fn restrict<F: Fn(Tag) -> bool>(&self, keep: F) -> Groups {
        let groups = self
            .groups
            .iter()
            .map(|group| Group {
                name: group.name.clone(),
                tags: group.tags.iter().copied().filter(|tag| keep(*tag)).collect(),
            })
            .collect();

        Groups { groups }
    }
}

impl<'a> IntoIterator for &'a Groups {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Indicator values of a group over a tag collection: `1` at every position whose tag is
/// part of the group, `0` everywhere else, in the order of `tags`.
pub fn indicator(tags: &[Tag], group_tags: &[Tag]) -> Vec<u8> {
    let members: HashSet<Tag> = group_tags.iter().copied().collect();

    tags.iter()
        .map(|tag| u8::from(members.contains(tag)))
        .collect()
}
