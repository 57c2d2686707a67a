use super::error::TagKind;
use super::group::Groups;
use super::index::TagIndex;
use super::{ModelError, Tag};

use ndarray::{Array2, ArrayView1, Axis};

/// Tags, coordinates and groups of the nodes of a model
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRepository {
    tags: Vec<Tag>,
    coordinates: Array2<f64>,
    index: TagIndex,
    groups: Groups,
}

impl NodeRepository {
    /// Coordinates are given one row per node, in the order of `tags`. Every row must
    /// have the same number (1 to 3) of components.
    pub(crate) fn new(tags: Vec<Tag>, coordinates: &[Vec<f64>]) -> Result<Self, ModelError> {
        if tags.len() != coordinates.len() {
            return Err(ModelError::dimension_mismatch(
                "node_coords",
                tags.len(),
                coordinates.len(),
            ));
        }

        let dimensions = coordinates.first().map(Vec::len).unwrap_or(3);

        if !(1..=3).contains(&dimensions) {
            return Err(ModelError::validation(format!(
                "nodal coordinates must have 1 to 3 components, got {dimensions}"
            )));
        }

        for (tag, row) in tags.iter().zip(coordinates) {
            if row.len() != dimensions {
                return Err(ModelError::validation(format!(
                    "node {tag} has {} coordinates while the model is {dimensions}d",
                    row.len()
                )));
            }
        }

        let index = TagIndex::new(&tags, TagKind::Node)?;

        let flat: Vec<f64> = coordinates.iter().flatten().copied().collect();
        let coordinates = Array2::from_shape_vec((tags.len(), dimensions), flat)
            .map_err(|e| ModelError::validation(format!("nodal coordinates: {e}")))?;

        Ok(Self {
            tags,
            coordinates,
            index,
            groups: Groups::default(),
        })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// `(nodes, dimensions)` array of coordinates in tag order
    pub fn coordinates(&self) -> &Array2<f64> {
        &self.coordinates
    }

    /// number of coordinate components per node
    pub fn dimensions(&self) -> usize {
        self.coordinates.ncols()
    }

    pub fn index(&self) -> &TagIndex {
        &self.index
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// coordinates of a single node
    pub fn coordinates_of(&self, tag: Tag) -> Option<ArrayView1<'_, f64>> {
        self.index.local(tag).map(|local| self.coordinates.row(local))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub(crate) fn add_group(&mut self, name: &str, tags: &[Tag]) -> Result<(), ModelError> {
        self.groups.add(TagKind::Node, &self.index, name, tags)
    }

    /// local indices of `tags`, in the order given
    pub(crate) fn locals(&self, tags: &[Tag], context: &str) -> Result<Vec<usize>, ModelError> {
        tags.iter()
            .map(|tag| {
                self.index
                    .local(*tag)
                    .ok_or_else(|| ModelError::unknown_tag(TagKind::Node, *tag, context))
            })
            .collect()
    }

    /// a repository holding only `tags` (in that order), with every group cut down to them
    pub(crate) fn subset(&self, tags: &[Tag]) -> Result<NodeRepository, ModelError> {
        let locals = self.locals(tags, "node subset")?;
        let index = TagIndex::new(tags, TagKind::Node)?;
        let groups = self.groups.restrict(|tag| index.contains(tag));

        Ok(NodeRepository {
            tags: tags.to_vec(),
            coordinates: self.coordinates.select(Axis(0), &locals),
            index,
            groups,
        })
    }
}
