//! The VTK cell type enumeration. Element type codes of a model are taken from this list
//! and written to files unchanged.

use super::ModelError;
use NodeCount::{AtLeast, Exact};

/// number of nodes a cell of some type is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCount {
    Exact(usize),
    AtLeast(usize),
}

impl NodeCount {
    /// check if a connectivity entry of `len` nodes is acceptable
    pub fn accepts(&self, len: usize) -> bool {
        match *self {
            NodeCount::Exact(n) => len == n,
            NodeCount::AtLeast(n) => len >= n,
        }
    }
}

macro_rules! cell_types {
    ($($name:ident = $code:literal => $count:expr,)*) => {
        /// Linear and higher order cell types of the VTK file formats
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum CellType {
            $($name = $code,)*
        }

        impl CellType {
            /// every supported cell type, ordered by code
            pub const ALL: &'static [CellType] = &[$(CellType::$name,)*];

            /// look up a cell type from its VTK code
            pub fn from_code(code: u8) -> Option<CellType> {
                match code {
                    $($code => Some(CellType::$name),)*
                    _ => None,
                }
            }

            /// the number of nodes this cell type is defined with
            pub fn node_count(&self) -> NodeCount {
                match self {
                    $(CellType::$name => $count,)*
                }
            }
        }
    };
}

cell_types! {
    Vertex = 1 => Exact(1),
    PolyVertex = 2 => AtLeast(1),
    Line = 3 => Exact(2),
    PolyLine = 4 => AtLeast(2),
    Triangle = 5 => Exact(3),
    TriangleStrip = 6 => AtLeast(3),
    Polygon = 7 => AtLeast(3),
    Pixel = 8 => Exact(4),
    Quad = 9 => Exact(4),
    Tetra = 10 => Exact(4),
    Voxel = 11 => Exact(8),
    Hexahedron = 12 => Exact(8),
    Wedge = 13 => Exact(6),
    Pyramid = 14 => Exact(5),
    PentagonalPrism = 15 => Exact(10),
    HexagonalPrism = 16 => Exact(12),
    QuadraticEdge = 21 => Exact(3),
    QuadraticTriangle = 22 => Exact(6),
    QuadraticQuad = 23 => Exact(8),
    QuadraticTetra = 24 => Exact(10),
    QuadraticHexahedron = 25 => Exact(20),
    QuadraticWedge = 26 => Exact(15),
    QuadraticPyramid = 27 => Exact(13),
    BiquadraticQuad = 28 => Exact(9),
    TriquadraticHexahedron = 29 => Exact(27),
    QuadraticLinearQuad = 30 => Exact(6),
    QuadraticLinearWedge = 31 => Exact(12),
    BiquadraticQuadraticWedge = 32 => Exact(18),
    BiquadraticQuadraticHexahedron = 33 => Exact(24),
    BiquadraticTriangle = 34 => Exact(7),
    CubicLine = 35 => Exact(4),
}

impl CellType {
    /// the code written to the `types` array of a file
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for CellType {
    type Error = ModelError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        CellType::from_code(code)
            .ok_or_else(|| ModelError::validation(format!("unsupported VTK cell type code {code}")))
    }
}
