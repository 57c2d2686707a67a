//! # Finite element models
//!
//! A [`Model`] holds one part of a finite element mesh: nodes with their coordinates,
//! elements with their connectivity and VTK cell types, named groups of nodes and
//! elements, and result fields stored at either. All of the node and element data is
//! validated once at construction and cannot be changed afterwards. Groups and fields can
//! be added at any time before the model is handed to a writer, and are validated against
//! the (immutable) tags as they are added.
//!
//! ```
//! use fem_vtk::{FieldPosition, FieldType, Model};
//!
//! let mut model = Model::new(
//!     vec![1, 2],
//!     vec![vec![1, 2, 5, 4], vec![4, 5, 6]],
//!     vec![9, 5],
//!     vec![1, 2, 3, 4, 5, 6],
//!     vec![
//!         vec![0., 0.],
//!         vec![1., 0.],
//!         vec![2., 0.],
//!         vec![0., 1.],
//!         vec![1., 1.],
//!         vec![0.5, 1.5],
//!     ],
//!     "example",
//!     "plate",
//! )
//! .unwrap();
//!
//! model.add_node_group("bottom", &[1, 2]).unwrap();
//! model.add_element_group("triangles", &[2]).unwrap();
//! model
//!     .add_scalar_field("T", FieldPosition::Elements, vec![20., 25.])
//!     .unwrap();
//!
//! assert_eq!(model.nodes().len(), 6);
//! assert_eq!(model.fields_by_type(FieldType::Scalar, FieldPosition::Elements).len(), 1);
//! ```

mod cell_type;
mod elements;
mod error;
mod field;
mod group;
mod index;
mod nodes;

pub use cell_type::{CellType, NodeCount};
pub use elements::ElementRepository;
pub use error::{ModelError, TagKind};
pub use field::{Field, FieldPosition, FieldType};
pub use group::{indicator, Group, Groups, GROUP_PREFIX};
pub use index::TagIndex;
pub use nodes::NodeRepository;

use ndarray::Array2;
use tracing::{debug, warn};

/// external identifier of a node or element
pub type Tag = i64;

pub const DEFAULT_MODEL_NAME: &str = "MODEL NAME";
pub const DEFAULT_PART_NAME: &str = "PART NAME";
pub const DEFAULT_STEP_NAME: &str = "STEP NAME";

/// name of the point data array holding the node tags
pub const NODE_TAGS: &str = "_node_tags";
/// name of the cell data array holding the element tags
pub const ELEMENT_TAGS: &str = "_element_tags";

/// One part of a finite element model, ready for export
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    model_name: String,
    part_name: String,
    step_name: String,
    frame_time: f64,
    nodes: NodeRepository,
    elements: ElementRepository,
    node_fields: Vec<Field>,
    element_fields: Vec<Field>,
}

impl Model {
    /// Build and validate a model.
    ///
    /// `connectivity` and `element_types` (VTK cell type codes) are given in the order of
    /// `element_tags`, and `node_coords` (1 to 3 components per node) in the order of
    /// `node_tags`. `model_name` names the output directory and `part_name` the file.
    pub fn new(
        element_tags: Vec<Tag>,
        connectivity: Vec<Vec<Tag>>,
        element_types: Vec<u8>,
        node_tags: Vec<Tag>,
        node_coords: Vec<Vec<f64>>,
        model_name: &str,
        part_name: &str,
    ) -> Result<Self, ModelError> {
        check_name("model_name", model_name)?;
        check_name("part_name", part_name)?;

        let nodes = NodeRepository::new(node_tags, &node_coords)?;
        let elements =
            ElementRepository::new(element_tags, connectivity, &element_types, nodes.index())?;

        debug!(
            model_name,
            part_name,
            nodes = nodes.len(),
            elements = elements.len(),
            "created model"
        );

        Ok(Self {
            model_name: model_name.into(),
            part_name: part_name.into(),
            step_name: DEFAULT_STEP_NAME.into(),
            frame_time: 0.0,
            nodes,
            elements,
            node_fields: Vec::new(),
            element_fields: Vec::new(),
        })
    }

    /// [`Model::new`] with the default model and part names
    pub fn from_mesh(
        element_tags: Vec<Tag>,
        connectivity: Vec<Vec<Tag>>,
        element_types: Vec<u8>,
        node_tags: Vec<Tag>,
        node_coords: Vec<Vec<f64>>,
    ) -> Result<Self, ModelError> {
        Self::new(
            element_tags,
            connectivity,
            element_types,
            node_tags,
            node_coords,
            DEFAULT_MODEL_NAME,
            DEFAULT_PART_NAME,
        )
    }

    /// set the load step and the time of the frame this model represents
    #[must_use]
    pub fn with_step(mut self, step_name: &str, frame_time: f64) -> Self {
        self.step_name = step_name.into();
        self.frame_time = frame_time;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    pub fn nodes(&self) -> &NodeRepository {
        &self.nodes
    }

    pub fn elements(&self) -> &ElementRepository {
        &self.elements
    }

    pub fn node_fields(&self) -> &[Field] {
        &self.node_fields
    }

    pub fn element_fields(&self) -> &[Field] {
        &self.element_fields
    }

    /// Register a named group of existing nodes. The group is exported as an indicator
    /// array by every writer.
    pub fn add_node_group(&mut self, name: &str, node_tags: &[Tag]) -> Result<(), ModelError> {
        self.nodes.add_group(name, node_tags)
    }

    /// Register a named group of existing elements.
    pub fn add_element_group(
        &mut self,
        name: &str,
        element_tags: &[Tag],
    ) -> Result<(), ModelError> {
        self.elements.add_group(name, element_tags)
    }

    /// Add a field with one row of values per node or element, in tag order.
    ///
    /// A field that already exists under the same name and position is replaced. Names of
    /// the arrays every file carries (`_node_tags`, `_element_tags` and anything starting
    /// with `_group `) are rejected.
    pub fn add_field(
        &mut self,
        name: &str,
        position: FieldPosition,
        field_type: FieldType,
        values: Vec<Vec<f64>>,
    ) -> Result<(), ModelError> {
        check_field_name(name)?;

        let expected = self.tag_count(position);

        if values.len() != expected {
            return Err(ModelError::dimension_mismatch(
                format!("values of field `{name}`"),
                expected,
                values.len(),
            ));
        }

        let field = Field::new(name, position, field_type, &values)?;
        self.insert_field(field);

        Ok(())
    }

    /// [`Model::add_field`] for a scalar field
    pub fn add_scalar_field(
        &mut self,
        name: &str,
        position: FieldPosition,
        values: Vec<f64>,
    ) -> Result<(), ModelError> {
        let rows = values.into_iter().map(|v| vec![v]).collect();
        self.add_field(name, position, FieldType::Scalar, rows)
    }

    /// Add a field with values at a subset of the nodes or elements. `values` is aligned
    /// with `tags`; every node or element not listed in `tags` gets NaN.
    pub fn add_field_at(
        &mut self,
        name: &str,
        position: FieldPosition,
        field_type: FieldType,
        tags: &[Tag],
        values: Vec<Vec<f64>>,
    ) -> Result<(), ModelError> {
        check_field_name(name)?;

        if tags.len() != values.len() {
            return Err(ModelError::dimension_mismatch(
                format!("values of field `{name}`"),
                tags.len(),
                values.len(),
            ));
        }

        let context = format!("field `{name}`");
        let locals = match position {
            FieldPosition::Nodes => self.nodes.locals(tags, &context)?,
            FieldPosition::Elements => self.elements.locals(tags, &context)?,
        };

        // validates the component layout before any padding
        let given = Field::new(name, position, field_type, &values)?;

        let shape = (self.tag_count(position), given.values().ncols());
        let mut padded = Array2::from_elem(shape, f64::NAN);
        for (row, local) in locals.iter().enumerate() {
            padded.row_mut(*local).assign(&given.values().row(row));
        }

        let field = Field::from_array(name, position, field_type, padded)?;
        self.insert_field(field);

        Ok(())
    }

    pub fn node_field(&self, name: &str) -> Option<&Field> {
        self.node_fields.iter().find(|field| field.name() == name)
    }

    pub fn element_field(&self, name: &str) -> Option<&Field> {
        self.element_fields.iter().find(|field| field.name() == name)
    }

    /// every field of one type stored at `position`
    pub fn fields_by_type(&self, field_type: FieldType, position: FieldPosition) -> Vec<&Field> {
        self.fields(position)
            .iter()
            .filter(|field| field.field_type() == field_type)
            .collect()
    }

    pub fn fields(&self, position: FieldPosition) -> &[Field] {
        match position {
            FieldPosition::Nodes => &self.node_fields,
            FieldPosition::Elements => &self.element_fields,
        }
    }

    /// Extract the model made of the elements `element_tags` and the nodes they use.
    ///
    /// Nodes of the submodel are sorted by tag, elements keep the order given. Groups keep
    /// their names and hold the tags that survived; fields are cut down to the kept rows.
    pub fn submodel(&self, element_tags: &[Tag]) -> Result<Model, ModelError> {
        let element_locals = self.elements.locals(element_tags, "submodel")?;

        let used_nodes: std::collections::BTreeSet<Tag> = element_locals
            .iter()
            .flat_map(|i| self.elements.connectivity()[*i].iter().copied())
            .collect();
        let node_tags: Vec<Tag> = used_nodes.into_iter().collect();

        let nodes = self.nodes.subset(&node_tags)?;
        let elements = self.elements.subset(&element_locals, nodes.index())?;

        let node_locals = self.nodes.locals(&node_tags, "submodel")?;

        Ok(Model {
            model_name: self.model_name.clone(),
            part_name: self.part_name.clone(),
            step_name: self.step_name.clone(),
            frame_time: self.frame_time,
            nodes,
            elements,
            node_fields: self
                .node_fields
                .iter()
                .map(|f| f.select(&node_locals))
                .collect(),
            element_fields: self
                .element_fields
                .iter()
                .map(|f| f.select(&element_locals))
                .collect(),
        })
    }

    fn tag_count(&self, position: FieldPosition) -> usize {
        match position {
            FieldPosition::Nodes => self.nodes.len(),
            FieldPosition::Elements => self.elements.len(),
        }
    }

    fn insert_field(&mut self, field: Field) {
        let fields = match field.position() {
            FieldPosition::Nodes => &mut self.node_fields,
            FieldPosition::Elements => &mut self.element_fields,
        };

        if let Some(existing) = fields.iter_mut().find(|f| f.name() == field.name()) {
            warn!(
                field = field.name(),
                position = %field.position(),
                "field has already been stored and will be overwritten"
            );
            *existing = field;
        } else {
            fields.push(field);
        }
    }
}

/// field names must not collide with the tag and group arrays written for every model
fn check_field_name(name: &str) -> Result<(), ModelError> {
    if name == NODE_TAGS || name == ELEMENT_TAGS || name.starts_with(GROUP_PREFIX) {
        return Err(ModelError::validation(format!(
            "field name `{name}` is reserved for the tag and group arrays"
        )));
    }

    Ok(())
}

pub(crate) fn check_name(what: &str, name: &str) -> Result<(), ModelError> {
    if name.is_empty() {
        return Err(ModelError::validation(format!("{what} must not be empty")));
    }

    if name.contains(['/', '\\']) {
        return Err(ModelError::validation(format!(
            "{what} `{name}` must not contain path separators"
        )));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// two quads and three triangles on eight nodes in the plane
    pub(crate) fn plate() -> Model {
        Model::new(
            vec![1, 2, 3, 4, 5],
            vec![
                vec![1, 2, 5, 4],
                vec![2, 3, 6, 5],
                vec![4, 5, 7],
                vec![5, 6, 8],
                vec![5, 8, 7],
            ],
            vec![9, 9, 5, 5, 5],
            vec![1, 2, 3, 4, 5, 6, 7, 8],
            vec![
                vec![0., 0.],
                vec![1., 0.],
                vec![2., 0.],
                vec![0., 1.],
                vec![1., 1.],
                vec![2., 1.],
                vec![0.5, 1.5],
                vec![1.5, 1.5],
            ],
            "example_model",
            "example_part",
        )
        .unwrap()
    }

    #[test]
    fn construct() {
        let model = plate();
        assert_eq!(model.nodes().len(), 8);
        assert_eq!(model.nodes().dimensions(), 2);
        assert_eq!(model.elements().len(), 5);
        assert_eq!(model.elements().types()[2], CellType::Triangle);
        assert_eq!(model.step_name(), DEFAULT_STEP_NAME);
        assert_eq!(model.frame_time(), 0.0);
    }

    #[test]
    fn default_names() {
        let model = Model::from_mesh(vec![1], vec![vec![1]], vec![1], vec![1], vec![vec![0.]])
            .unwrap()
            .with_step("Step-1", 0.5);
        assert_eq!(model.model_name(), DEFAULT_MODEL_NAME);
        assert_eq!(model.part_name(), DEFAULT_PART_NAME);
        assert_eq!(model.step_name(), "Step-1");
        assert_eq!(model.frame_time(), 0.5);
    }

    #[test]
    fn names_without_separators() {
        let err = Model::new(vec![], vec![], vec![], vec![], vec![], "a/b", "part").unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let err = Model::new(vec![], vec![], vec![], vec![], vec![], "model", "").unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn duplicate_tags() {
        let err = Model::new(
            vec![1, 1],
            vec![vec![1], vec![2]],
            vec![1, 1],
            vec![1, 2],
            vec![vec![0.], vec![1.]],
            "m",
            "p",
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn duplicate_group_keeps_original() {
        let mut model = plate();
        model.add_node_group("edge", &[1, 2, 3]).unwrap();

        let err = model.add_node_group("edge", &[7, 8]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateGroup {
                kind: TagKind::Node,
                name: "edge".into()
            }
        );
        assert_eq!(model.nodes().groups().get("edge").unwrap().tags(), &[1, 2, 3]);

        // node and element groups live in separate namespaces
        model.add_element_group("edge", &[1]).unwrap();
    }

    #[test]
    fn field_length_mismatch() {
        let mut model = plate();
        let err = model
            .add_scalar_field("T", FieldPosition::Elements, vec![1., 2.])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DimensionMismatch {
                name: "values of field `T`".into(),
                expected: 5,
                actual: 2
            }
        );
        assert!(model.element_field("T").is_none());
    }

    #[test]
    fn partial_field_is_nan_padded() {
        let mut model = plate();
        model
            .add_field_at(
                "u",
                FieldPosition::Nodes,
                FieldType::Vector,
                &[8, 1],
                vec![vec![8., 0.8], vec![1., 0.1]],
            )
            .unwrap();

        let values = model.node_field("u").unwrap().values();
        assert_eq!(values.dim(), (8, 2));
        assert_eq!(values.row(0).to_vec(), vec![1., 0.1]);
        assert_eq!(values.row(7).to_vec(), vec![8., 0.8]);
        assert!(values.row(3).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn partial_field_unknown_tag() {
        let mut model = plate();
        let err = model
            .add_field_at(
                "T",
                FieldPosition::Elements,
                FieldType::Scalar,
                &[1, 6],
                vec![vec![1.], vec![2.]],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnknownTag {
                kind: TagKind::Element,
                tag: 6,
                ..
            }
        ));
    }

    #[test]
    fn field_overwrite() {
        let mut model = plate();
        model
            .add_scalar_field("T", FieldPosition::Elements, vec![1.; 5])
            .unwrap();
        model
            .add_scalar_field("T", FieldPosition::Elements, vec![2.; 5])
            .unwrap();

        assert_eq!(model.element_fields().len(), 1);
        assert_eq!(model.element_field("T").unwrap().values()[[0, 0]], 2.);
        assert!(model.node_field("T").is_none());
    }

    #[test]
    fn fields_by_type() {
        let mut model = plate();
        model
            .add_scalar_field("T", FieldPosition::Nodes, vec![0.; 8])
            .unwrap();
        model
            .add_field(
                "u",
                FieldPosition::Nodes,
                FieldType::Vector,
                vec![vec![0., 0.]; 8],
            )
            .unwrap();

        let scalars = model.fields_by_type(FieldType::Scalar, FieldPosition::Nodes);
        assert_eq!(scalars.len(), 1);
        assert_eq!(scalars[0].name(), "T");
        assert!(model
            .fields_by_type(FieldType::Tensor, FieldPosition::Nodes)
            .is_empty());
    }

    #[test]
    fn submodel_of_triangles() {
        let mut model = plate();
        model.add_node_group("lower edge", &[1, 2, 3]).unwrap();
        model.add_element_group("triangles", &[3, 4, 5]).unwrap();
        model
            .add_scalar_field("T", FieldPosition::Elements, vec![25., 25., 30., 30., 35.])
            .unwrap();
        model
            .add_scalar_field(
                "n",
                FieldPosition::Nodes,
                (1..=8).map(|t| t as f64).collect(),
            )
            .unwrap();

        let sub = model.submodel(&[4, 5]).unwrap();

        assert_eq!(sub.elements().tags(), &[4, 5]);
        assert_eq!(sub.nodes().tags(), &[5, 6, 7, 8]);
        assert_eq!(sub.elements().groups().get("triangles").unwrap().tags(), &[4, 5]);
        assert!(sub.nodes().groups().get("lower edge").unwrap().tags().is_empty());
        assert_eq!(
            sub.element_field("T").unwrap().values().column(0).to_vec(),
            vec![30., 35.]
        );
        assert_eq!(
            sub.node_field("n").unwrap().values().column(0).to_vec(),
            vec![5., 6., 7., 8.]
        );
        assert_eq!(sub.model_name(), model.model_name());

        assert!(matches!(
            model.submodel(&[9]).unwrap_err(),
            ModelError::UnknownTag { tag: 9, .. }
        ));
    }
}
