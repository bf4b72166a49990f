//! Runtime shape checks for externally supplied layout data.
//!
//! Typed [`Layout`] values are valid by construction; these guards are the
//! gate for JSON coming from a backend or a file. Each `from_value`
//! constructor runs the cheap structural guard first, then full
//! deserialization, and reports either failure as
//! [`LayoutError::InvalidShape`].

use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::error::{ElementKind, LayoutError};
use crate::model::{Column, Layout, LayoutType, Row};

/// `true` when the value carries the fluid layout tag and a `rows` array.
#[must_use]
pub fn is_fluid_layout(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(LayoutType::TAG)
        && value.get("rows").is_some_and(Value::is_array)
}

/// `true` when the value has a `columns` array.
#[must_use]
pub fn is_fluid_layout_row(value: &Value) -> bool {
    value.get("columns").is_some_and(Value::is_array)
}

/// `true` when the value has a `size` object with an `xl` entry.
#[must_use]
pub fn is_fluid_layout_column(value: &Value) -> bool {
    value
        .get("size")
        .and_then(|size| size.get("xl"))
        .is_some_and(Value::is_object)
}

fn decode<T: DeserializeOwned>(
    value: Value,
    kind: ElementKind,
    guard: fn(&Value) -> bool,
    expectation: &str,
) -> Result<T, LayoutError> {
    if !guard(&value) {
        #[cfg(feature = "tracing")]
        debug!(kind = kind.as_str(), "rejected malformed layout data");
        return Err(LayoutError::invalid_shape(kind, expectation));
    }
    serde_json::from_value(value).map_err(|err| {
        #[cfg(feature = "tracing")]
        debug!(kind = kind.as_str(), error = %err, "layout data failed to deserialize");
        LayoutError::invalid_shape(kind, err.to_string())
    })
}

impl<C: DeserializeOwned> Layout<C> {
    /// Validate and decode a raw layout.
    pub fn from_value(value: Value) -> Result<Self, LayoutError> {
        decode(
            value,
            ElementKind::Layout,
            is_fluid_layout,
            "expected `type: \"fluidLayout\"` and a `rows` array",
        )
    }
}

impl<C: DeserializeOwned> Row<C> {
    /// Validate and decode a raw row.
    pub fn from_value(value: Value) -> Result<Self, LayoutError> {
        decode(
            value,
            ElementKind::Row,
            is_fluid_layout_row,
            "expected a `columns` array",
        )
    }
}

impl<C: DeserializeOwned> Column<C> {
    /// Validate and decode a raw column.
    pub fn from_value(value: Value) -> Result<Self, LayoutError> {
        decode(
            value,
            ElementKind::Column,
            is_fluid_layout_column,
            "expected a `size.xl` object",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn guards_accept_well_formed_values() {
        assert!(is_fluid_layout(&json!({ "type": "fluidLayout", "rows": [] })));
        assert!(is_fluid_layout_row(&json!({ "columns": [] })));
        assert!(is_fluid_layout_column(&json!({
            "size": { "xl": { "widthAsGridColumnsCount": 4 } }
        })));
    }

    #[test]
    fn guards_reject_damaged_values() {
        assert!(!is_fluid_layout(&json!({ "type": "yolo", "rowz": [] })));
        assert!(!is_fluid_layout(&json!({ "type": "fluidLayout", "rows": {} })));
        assert!(!is_fluid_layout(&json!("fluidLayout")));
        assert!(!is_fluid_layout_row(&json!({ "haeder": "x", "columnz": [] })));
        assert!(!is_fluid_layout_column(&json!({ "size": {} })));
    }

    #[test]
    fn damaged_layout_is_rejected_with_kind() {
        let err =
            Layout::<String>::from_value(json!({ "type": "yolo", "rowz": [{ "columnz": [] }] }))
                .expect_err("damaged layout must be rejected");
        assert!(matches!(
            err,
            LayoutError::InvalidShape {
                kind: ElementKind::Layout,
                ..
            }
        ));
    }

    #[test]
    fn nested_damage_is_caught_by_deserialization() {
        let err = Layout::<String>::from_value(json!({
            "type": "fluidLayout",
            "rows": [{ "haeder": "immutable", "columnz": [] }]
        }))
        .expect_err("damaged row must be rejected");
        match err {
            LayoutError::InvalidShape { kind, reason } => {
                assert_eq!(kind, ElementKind::Layout);
                assert!(reason.contains("columns"), "reason was {reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn valid_row_and_column_decode() {
        let row = Row::<String>::from_value(json!({
            "columns": [{ "size": { "xl": { "widthAsGridColumnsCount": 6 } }, "content": "A" }]
        }))
        .expect("row decodes");
        assert_eq!(row.columns.len(), 1);
        assert_eq!(row.columns[0].content.as_deref(), Some("A"));

        let column = Column::<String>::from_value(json!({
            "size": { "xl": { "widthAsGridColumnsCount": 3 } }
        }))
        .expect("column decodes");
        assert_eq!(column.size.xl.width_as_grid_columns_count, 3);
        assert!(column.content.is_none());
    }

    #[derive(Debug, serde::Deserialize)]
    struct Tile {
        name: String,
    }

    #[test]
    fn content_without_default_decodes_when_absent() {
        let empty = Column::<Tile>::from_value(json!({
            "size": { "xl": { "widthAsGridColumnsCount": 4 } }
        }))
        .expect("empty column decodes");
        assert!(empty.content.is_none());

        let filled = Column::<Tile>::from_value(json!({
            "size": { "xl": { "widthAsGridColumnsCount": 4 } },
            "content": { "name": "tile" }
        }))
        .expect("filled column decodes");
        let name = filled.content.map(|tile| tile.name);
        assert_eq!(name.as_deref(), Some("tile"));
    }
}
