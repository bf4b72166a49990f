//! Error types for layout validation and index-addressed edits.

use std::fmt;

/// Element of the layout tree an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Layout,
    Row,
    Column,
}

impl ElementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index-addressed edit that can fail on a missing element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOperation {
    Modify,
    Remove,
    Move,
}

impl EditOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modify => "modify",
            Self::Remove => "remove",
            Self::Move => "move",
        }
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by layout facades and builders.
///
/// Selector-addressed builder operations never produce these; an empty
/// selection is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Raw input does not have the shape of the expected element.
    InvalidShape { kind: ElementKind, reason: String },
    /// No row at the index an edit addressed.
    MissingRow {
        operation: EditOperation,
        index: usize,
    },
    /// No column at the index an edit addressed. `row` is `None` when the
    /// row builder is not attached to a layout.
    MissingColumn {
        operation: EditOperation,
        row: Option<usize>,
        index: usize,
    },
    /// Column content is not a nested layout. Positions are `None` for
    /// detached builders.
    NotNestedLayout {
        row: Option<usize>,
        column: Option<usize>,
    },
}

impl LayoutError {
    pub(crate) fn invalid_shape(kind: ElementKind, reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { kind, reason } => {
                write!(f, "provided data must be a fluid layout {kind}: {reason}")
            }
            Self::MissingRow { operation, index } => write!(
                f,
                "cannot {operation} the row - row at index {index} does not exist"
            ),
            Self::MissingColumn {
                operation,
                row,
                index,
            } => {
                write!(
                    f,
                    "cannot {operation} the column - column at index {index} does not exist"
                )?;
                match row {
                    Some(row) => write!(f, " in row {row}"),
                    None => Ok(()),
                }
            }
            Self::NotNestedLayout { row, column } => match (row, column) {
                (Some(row), Some(column)) => write!(
                    f,
                    "column {column} in row {row} does not hold a nested layout"
                ),
                (None, Some(column)) => write!(f, "column {column} does not hold a nested layout"),
                (_, None) => f.write_str("column does not hold a nested layout"),
            },
        }
    }
}

impl std::error::Error for LayoutError {}
