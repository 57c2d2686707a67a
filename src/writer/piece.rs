//! Translation of a [`Model`] into the arrays of an unstructured grid piece. This is the
//! part of writing shared by every encoding: all of the validation and the tag to local
//! index remapping happen here, before any bytes are written.

use super::Precision;
use crate::array::{AnyArray, ArrayData};
use crate::model::{indicator, Field, Model, ModelError, Tag, TagKind};
use crate::Error;

use ndarray::{s, Array2};
use num_traits::AsPrimitive;
use tracing::debug;

pub use crate::model::{ELEMENT_TAGS, NODE_TAGS};

/// Every array of one piece, in the order they appear in the file
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Piece {
    number_of_points: usize,
    number_of_cells: usize,
    points: Vec<AnyArray>,
    cells: Vec<AnyArray>,
    point_data: Vec<AnyArray>,
    cell_data: Vec<AnyArray>,
}

impl Piece {
    pub(crate) fn build(model: &Model, precision: Precision) -> Result<Self, Error> {
        let nodes = model.nodes();
        let elements = model.elements();

        if nodes.is_empty() {
            return Err(ModelError::validation(format!(
                "model `{}` part `{}` has no nodes to write",
                model.model_name(),
                model.part_name()
            ))
            .into());
        }

        debug!(
            nodes = nodes.len(),
            elements = elements.len(),
            "building local indices"
        );

        let points = float_array("Points", &pad_columns(nodes.coordinates(), 3), precision);

        // node tags of every element translated to local node indices
        let mut connectivity = Vec::with_capacity(elements.len() * 4);
        let mut offsets = Vec::with_capacity(elements.len());

        for (tag, element_nodes) in elements.tags().iter().zip(elements.connectivity()) {
            for node in element_nodes {
                let local = nodes.index().local(*node).ok_or_else(|| {
                    ModelError::unknown_tag(
                        TagKind::Node,
                        *node,
                        format!("connectivity of element {tag}"),
                    )
                })?;
                connectivity.push(local as i64);
            }
            offsets.push(connectivity.len() as i64);
        }

        let types: Vec<u8> = elements.types().iter().map(|t| t.code()).collect();

        let cells = vec![
            ArrayData::new("connectivity", connectivity, 1).into(),
            ArrayData::new("offsets", offsets, 1).into(),
            ArrayData::new("types", types, 1).into(),
        ];

        let mut point_data = vec![tag_array(NODE_TAGS, nodes.tags())];
        for group in nodes.groups() {
            check_group(group.tags(), TagKind::Node, group.name(), |t| {
                nodes.index().contains(t)
            })?;
            let values = indicator(nodes.tags(), group.tags());
            point_data.push(ArrayData::new(group.array_name(), values, 1).into());
        }
        for field in model.node_fields() {
            point_data.push(field_array(field, nodes.len(), precision)?);
        }

        let mut cell_data = vec![tag_array(ELEMENT_TAGS, elements.tags())];
        for group in elements.groups() {
            check_group(group.tags(), TagKind::Element, group.name(), |t| {
                elements.index().contains(t)
            })?;
            let values = indicator(elements.tags(), group.tags());
            cell_data.push(ArrayData::new(group.array_name(), values, 1).into());
        }
        for field in model.element_fields() {
            cell_data.push(field_array(field, elements.len(), precision)?);
        }

        Ok(Self {
            number_of_points: nodes.len(),
            number_of_cells: elements.len(),
            points: vec![points],
            cells,
            point_data,
            cell_data,
        })
    }

    pub(crate) fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    pub(crate) fn number_of_cells(&self) -> usize {
        self.number_of_cells
    }

    /// the sections of the piece, each with the name of its element and its arrays
    pub(crate) fn sections(&self) -> [(&'static str, &[AnyArray]); 4] {
        [
            ("Points", self.points.as_slice()),
            ("Cells", self.cells.as_slice()),
            ("PointData", self.point_data.as_slice()),
            ("CellData", self.cell_data.as_slice()),
        ]
    }
}

fn check_group<F: Fn(Tag) -> bool>(
    tags: &[Tag],
    kind: TagKind,
    name: &str,
    known: F,
) -> Result<(), ModelError> {
    match tags.iter().find(|tag| !known(**tag)) {
        Some(tag) => Err(ModelError::unknown_tag(
            kind,
            *tag,
            format!("{kind} group `{name}`"),
        )),
        None => Ok(()),
    }
}

fn tag_array(name: &str, tags: &[Tag]) -> AnyArray {
    ArrayData::new(name, tags.to_vec(), 1).into()
}

fn field_array(field: &Field, rows: usize, precision: Precision) -> Result<AnyArray, Error> {
    if field.len() != rows {
        return Err(ModelError::dimension_mismatch(
            format!("values of field `{}`", field.name()),
            rows,
            field.len(),
        )
        .into());
    }

    Ok(float_array(field.name(), &field.values_3d(), precision))
}

/// copy of `values` with zero columns appended up to `columns`
fn pad_columns(values: &Array2<f64>, columns: usize) -> Array2<f64> {
    let mut padded = Array2::zeros((values.nrows(), columns));
    padded.slice_mut(s![.., ..values.ncols()]).assign(values);
    padded
}

/// row major flattening of `values` in the requested precision
fn float_array(name: &str, values: &Array2<f64>, precision: Precision) -> AnyArray {
    let components = values.ncols();
    let flat = values.iter().copied();

    match precision {
        Precision::Float64 => ArrayData::new(name, flat.collect(), components).into(),
        Precision::Float32 => {
            let flat: Vec<f32> = flat.map(|v| v.as_()).collect();
            ArrayData::new(name, flat, components).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldPosition, FieldType};
    use crate::traits::Array;

    fn sparse() -> Model {
        // non contiguous tags must map to contiguous local indices
        Model::new(
            vec![10, 20],
            vec![vec![8, 5, 3], vec![1, 2, 5, 3]],
            vec![5, 9],
            vec![1, 2, 3, 5, 8],
            vec![
                vec![0., 0.],
                vec![1., 0.],
                vec![1., 1.],
                vec![0., 1.],
                vec![-1., 1.],
            ],
            "sparse",
            "part",
        )
        .unwrap()
    }

    fn values<'a>(arrays: &'a [AnyArray], name: &str) -> &'a AnyArray {
        arrays.iter().find(|a| a.name() == name).unwrap()
    }

    #[test]
    fn local_indices() {
        let piece = Piece::build(&sparse(), Precision::Float64).unwrap();

        assert_eq!(piece.number_of_points(), 5);
        assert_eq!(piece.number_of_cells(), 2);

        match values(&piece.cells, "connectivity") {
            AnyArray::Int64(array) => assert_eq!(array.values(), &[4, 3, 2, 0, 1, 3, 2]),
            other => panic!("unexpected connectivity array {other:?}"),
        }
        match values(&piece.cells, "offsets") {
            AnyArray::Int64(array) => assert_eq!(array.values(), &[3, 7]),
            other => panic!("unexpected offsets array {other:?}"),
        }
        match values(&piece.cells, "types") {
            AnyArray::UInt8(array) => assert_eq!(array.values(), &[5, 9]),
            other => panic!("unexpected types array {other:?}"),
        }
    }

    #[test]
    fn points_padded_to_3d() {
        let piece = Piece::build(&sparse(), Precision::Float64).unwrap();

        match &piece.points[0] {
            AnyArray::Float64(array) => {
                assert_eq!(array.components(), 3);
                assert_eq!(array.length(), 15);
                assert!(array.values().chunks(3).all(|p| p[2] == 0.0));
                assert_eq!(&array.values()[12..], &[-1., 1., 0.]);
            }
            other => panic!("unexpected points array {other:?}"),
        }
    }

    #[test]
    fn single_precision() {
        let mut model = sparse();
        model
            .add_field(
                "u",
                FieldPosition::Nodes,
                FieldType::Vector,
                vec![vec![0.5, 0.25]; 5],
            )
            .unwrap();

        let piece = Piece::build(&model, Precision::Float32).unwrap();
        assert!(matches!(piece.points[0], AnyArray::Float32(_)));

        match values(&piece.point_data, "u") {
            AnyArray::Float32(array) => {
                assert_eq!(array.components(), 3);
                assert_eq!(&array.values()[..3], &[0.5, 0.25, 0.]);
            }
            other => panic!("unexpected field array {other:?}"),
        }
    }

    #[test]
    fn arrays_in_order() {
        let mut model = sparse();
        model.add_node_group("corner", &[8]).unwrap();
        model
            .add_scalar_field("T", FieldPosition::Elements, vec![1., 2.])
            .unwrap();

        let piece = Piece::build(&model, Precision::Float64).unwrap();

        let names: Vec<&str> = piece.point_data.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec![NODE_TAGS, "_group corner"]);

        let names: Vec<&str> = piece.cell_data.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec![ELEMENT_TAGS, "T"]);

        match values(&piece.point_data, "_group corner") {
            AnyArray::UInt8(array) => assert_eq!(array.values(), &[0, 0, 0, 0, 1]),
            other => panic!("unexpected indicator array {other:?}"),
        }
    }

    #[test]
    fn empty_model_rejected() {
        let model = Model::new(vec![], vec![], vec![], vec![], vec![], "empty", "part").unwrap();
        let err = Piece::build(&model, Precision::Float64).unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::Validation(_))));
    }
}
