use super::cell_type::CellType;
use super::error::TagKind;
use super::group::Groups;
use super::index::TagIndex;
use super::{ModelError, Tag};

use std::collections::BTreeSet;

/// Tags, topology and groups of the elements of a model
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRepository {
    tags: Vec<Tag>,
    connectivity: Vec<Vec<Tag>>,
    types: Vec<CellType>,
    index: TagIndex,
    groups: Groups,
}

impl ElementRepository {
    /// `connectivity` and `types` are aligned with `tags`. Every connectivity entry must
    /// reference nodes in `nodes` and have as many entries as its cell type requires.
    pub(crate) fn new(
        tags: Vec<Tag>,
        connectivity: Vec<Vec<Tag>>,
        types: &[u8],
        nodes: &TagIndex,
    ) -> Result<Self, ModelError> {
        if connectivity.len() != tags.len() {
            return Err(ModelError::dimension_mismatch(
                "connectivity",
                tags.len(),
                connectivity.len(),
            ));
        }

        if types.len() != tags.len() {
            return Err(ModelError::dimension_mismatch(
                "element_types",
                tags.len(),
                types.len(),
            ));
        }

        let index = TagIndex::new(&tags, TagKind::Element)?;

        let mut cell_types = Vec::with_capacity(types.len());

        for ((tag, code), element_nodes) in tags.iter().zip(types).zip(&connectivity) {
            let cell_type = CellType::from_code(*code).ok_or_else(|| {
                ModelError::validation(format!(
                    "element {tag} has unsupported VTK cell type code {code}"
                ))
            })?;

            if !cell_type.node_count().accepts(element_nodes.len()) {
                return Err(ModelError::validation(format!(
                    "element {tag} of type {cell_type:?} cannot have {} nodes (expected {:?})",
                    element_nodes.len(),
                    cell_type.node_count()
                )));
            }

            if let Some(missing) = element_nodes.iter().find(|node| !nodes.contains(**node)) {
                return Err(ModelError::unknown_tag(
                    TagKind::Node,
                    *missing,
                    format!("connectivity of element {tag}"),
                ));
            }

            cell_types.push(cell_type);
        }

        Ok(Self {
            tags,
            connectivity,
            types: cell_types,
            index,
            groups: Groups::default(),
        })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// node tags of every element, in element tag order
    pub fn connectivity(&self) -> &[Vec<Tag>] {
        &self.connectivity
    }

    pub fn types(&self) -> &[CellType] {
        &self.types
    }

    pub fn index(&self) -> &TagIndex {
        &self.index
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// tags of every element with the given cell type, in element order
    pub fn tags_of_type(&self, cell_type: CellType) -> Vec<Tag> {
        self.tags
            .iter()
            .zip(&self.types)
            .filter(|(_, t)| **t == cell_type)
            .map(|(tag, _)| *tag)
            .collect()
    }

    /// sorted tags of every node referenced by at least one element
    pub fn node_tags(&self) -> Vec<Tag> {
        let unique: BTreeSet<Tag> = self.connectivity.iter().flatten().copied().collect();
        unique.into_iter().collect()
    }

    pub(crate) fn add_group(&mut self, name: &str, tags: &[Tag]) -> Result<(), ModelError> {
        self.groups.add(TagKind::Element, &self.index, name, tags)
    }

    /// local indices of `tags`, in the order given
    pub(crate) fn locals(&self, tags: &[Tag], context: &str) -> Result<Vec<usize>, ModelError> {
        tags.iter()
            .map(|tag| {
                self.index
                    .local(*tag)
                    .ok_or_else(|| ModelError::unknown_tag(TagKind::Element, *tag, context))
            })
            .collect()
    }

    /// a repository holding only the elements at `locals`, with every group cut down to them
    pub(crate) fn subset(&self, locals: &[usize], nodes: &TagIndex) -> Result<Self, ModelError> {
        let tags: Vec<Tag> = locals.iter().map(|i| self.tags[*i]).collect();
        let connectivity = locals.iter().map(|i| self.connectivity[*i].clone()).collect();
        let types: Vec<u8> = locals.iter().map(|i| self.types[*i].code()).collect();

        let mut subset = ElementRepository::new(tags, connectivity, &types, nodes)?;
        let index = &subset.index;
        subset.groups = self.groups.restrict(|tag| index.contains(tag));

        Ok(subset)
    }
}
