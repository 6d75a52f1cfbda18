//! Material construction errors.

use std::error::Error;
use std::fmt;

/// Reasons a [`MaterialData`](super::MaterialData) description can be
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialDataError {
    /// Two attributes in the same layer share a name.
    DuplicateAttribute { name: String },
    /// Borrowed attributes are not sorted within a layer.
    OutOfOrder { previous: String, next: String },
    /// A layer offset goes backwards or past the attribute count.
    InvalidLayerRange {
        layer: usize,
        begin: u32,
        end: u32,
        count: usize,
    },
}

impl fmt::Display for MaterialDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialDataError::DuplicateAttribute { name } => {
                write!(f, "duplicate attribute {}", name)
            }
            MaterialDataError::OutOfOrder { previous, next } => write!(
                f,
                "{} has to be sorted before {} if passing non-owned data",
                next, previous
            ),
            MaterialDataError::InvalidLayerRange {
                layer,
                begin,
                end,
                count,
            } => write!(
                f,
                "invalid range ({}, {}) for layer {} with {} attributes in total",
                begin, end, layer, count
            ),
        }
    }
}

impl Error for MaterialDataError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            MaterialDataError::DuplicateAttribute {
                name: "DiffuseColor".into(),
            }
            .to_string(),
            "duplicate attribute DiffuseColor"
        );
        assert_eq!(
            MaterialDataError::OutOfOrder {
                previous: "Shininess".into(),
                next: "DiffuseColor".into(),
            }
            .to_string(),
            "DiffuseColor has to be sorted before Shininess if passing non-owned data"
        );
        assert_eq!(
            MaterialDataError::InvalidLayerRange {
                layer: 2,
                begin: 5,
                end: 3,
                count: 6,
            }
            .to_string(),
            "invalid range (5, 3) for layer 2 with 6 attributes in total"
        );
    }
}
