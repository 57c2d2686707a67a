//! Result fields stored at nodes or elements

use super::ModelError;

use ndarray::{s, Array2, Axis};
use std::fmt;

/// where the values of a field live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPosition {
    Nodes,
    Elements,
}

/// the mathematical kind of a field, which limits its number of components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar,
    Vector,
    Tensor,
}

impl FieldType {
    /// number of components written to a file, after padding to 3d
    pub fn components_3d(&self) -> usize {
        match self {
            FieldType::Scalar => 1,
            FieldType::Vector => 3,
            FieldType::Tensor => 6,
        }
    }
}

impl fmt::Display for FieldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPosition::Nodes => write!(f, "nodes"),
            FieldPosition::Elements => write!(f, "elements"),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar => write!(f, "scalar"),
            FieldType::Vector => write!(f, "vector"),
            FieldType::Tensor => write!(f, "tensor"),
        }
    }
}

/// A named array of values, one row per node or element of a model in tag order.
///
/// Vectors are stored in `(x, y, z)` order and tensors in `(xx, yy, zz, xy, yz, xz)`
/// order. Lower dimensional data keeps the leading components only.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    position: FieldPosition,
    field_type: FieldType,
    values: Array2<f64>,
}

impl Field {
    /// build a field from rows of components. Every row must have the same length, and
    /// the length must be valid for `field_type`.
    pub fn new(
        name: &str,
        position: FieldPosition,
        field_type: FieldType,
        rows: &[Vec<f64>],
    ) -> Result<Self, ModelError> {
        let components = rows.first().map(Vec::len).unwrap_or(1);

        if let Some(bad_row) = rows.iter().find(|row| row.len() != components) {
            return Err(ModelError::dimension_mismatch(
                format!("components of field `{name}`"),
                components,
                bad_row.len(),
            ));
        }

        check_components(name, field_type, components)?;

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let values = Array2::from_shape_vec((rows.len(), components), flat)
            .map_err(|e| ModelError::validation(format!("field `{name}`: {e}")))?;

        Ok(Self {
            name: name.into(),
            position,
            field_type,
            values,
        })
    }

    pub(crate) fn from_array(
        name: &str,
        position: FieldPosition,
        field_type: FieldType,
        values: Array2<f64>,
    ) -> Result<Self, ModelError> {
        check_components(name, field_type, values.ncols())?;

        Ok(Self {
            name: name.into(),
            position,
            field_type,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> FieldPosition {
        self.position
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// values as stored, `(rows, components)`
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Copy of the values in their 3d representation: vectors padded to 3 components and
    /// tensors padded to 6 components with zeros.
    pub fn values_3d(&self) -> Array2<f64> {
        let target = self.field_type.components_3d();
        let stored = self.values.ncols();

        if stored == target {
            return self.values.clone();
        }

        let mut padded = Array2::zeros((self.values.nrows(), target));
        padded.slice_mut(s![.., ..stored]).assign(&self.values);
        padded
    }

    /// the rows at `indices`, in that order
    pub(crate) fn select(&self, indices: &[usize]) -> Field {
        Field {
            name: self.name.clone(),
            position: self.position,
            field_type: self.field_type,
            values: self.values.select(Axis(0), indices),
        }
    }
}

fn check_components(
    name: &str,
    field_type: FieldType,
    components: usize,
) -> Result<(), ModelError> {
    let valid = match field_type {
        FieldType::Scalar => components == 1,
        FieldType::Vector => (1..=3).contains(&components),
        FieldType::Tensor => (1..=6).contains(&components),
    };

    if valid {
        Ok(())
    } else {
        Err(ModelError::validation(format!(
            "{field_type} field `{name}` cannot have {components} components"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_padding() {
        let field = Field::new(
            "u",
            FieldPosition::Nodes,
            FieldType::Vector,
            &[vec![1., 2.], vec![3., 4.]],
        )
        .unwrap();

        let padded = field.values_3d();
        assert_eq!(padded.dim(), (2, 3));
        assert_eq!(padded.row(0).to_vec(), vec![1., 2., 0.]);
        assert_eq!(padded.row(1).to_vec(), vec![3., 4., 0.]);
        // the stored values stay 2d
        assert_eq!(field.values().ncols(), 2);
    }

    #[test]
    fn tensor_padding() {
        let field = Field::new(
            "s",
            FieldPosition::Elements,
            FieldType::Tensor,
            &[vec![1., 1., 1., 1.]],
        )
        .unwrap();

        assert_eq!(field.values_3d().row(0).to_vec(), vec![1., 1., 1., 1., 0., 0.]);
    }

    #[test]
    fn component_limits() {
        let err = Field::new(
            "bad",
            FieldPosition::Nodes,
            FieldType::Scalar,
            &[vec![1., 2.]],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let err = Field::new(
            "bad",
            FieldPosition::Nodes,
            FieldType::Vector,
            &[vec![1., 2., 3., 4.]],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn ragged_rows() {
        let err = Field::new(
            "ragged",
            FieldPosition::Nodes,
            FieldType::Vector,
            &[vec![1., 2.], vec![1.]],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
    }

    #[test]
    fn select_rows() {
        let field = Field::new(
            "T",
            FieldPosition::Elements,
            FieldType::Scalar,
            &[vec![25.], vec![30.], vec![35.]],
        )
        .unwrap();

        let sub = field.select(&[2, 0]);
        assert_eq!(sub.values().column(0).to_vec(), vec![35., 25.]);
        assert_eq!(sub.name(), "T");
    }
}
