//! Copy-on-write builders for layouts, rows and columns.
//!
//! Builders have value semantics: every method consumes the builder and
//! returns the updated one. A builder stages exactly one element behind an
//! [`Arc`](std::sync::Arc); edits go through `Arc::make_mut`, so snapshots
//! handed out by [`build`](LayoutBuilder::build) are never mutated and
//! untouched subtrees keep their identity.
//!
//! Index-addressed operations (`modify_row`, `remove_column`, ...) return
//! `Result` and fail on a missing index. Selector-addressed operations
//! (`modify_rows`, `remove_columns`, ...) cannot fail: an empty selection
//! leaves the builder unchanged.

mod column;
mod layout;
mod row;

pub use column::ColumnBuilder;
pub use layout::LayoutBuilder;
pub use row::RowBuilder;

use std::fmt;

use crate::facade::{ColumnFacade, RowFacade};

/// Literal replacement or an update computed from the current value.
///
/// Every setter on the builders accepts this, and `T` converts into it, so
/// both `builder.style(Some("dark".into()))` and
/// `builder.style(ValueOrUpdate::update(|s: Option<String>| s.map(|s| s + "!")))`
/// work.
pub enum ValueOrUpdate<'a, T> {
    Value(T),
    Update(Box<dyn FnOnce(T) -> T + 'a>),
}

impl<'a, T> ValueOrUpdate<'a, T> {
    /// Wrap an update function.
    pub fn update(f: impl FnOnce(T) -> T + 'a) -> Self {
        Self::Update(Box::new(f))
    }

    /// Produce the next value given the current one.
    pub fn resolve(self, current: T) -> T {
        match self {
            Self::Value(value) => value,
            Self::Update(update) => update(current),
        }
    }
}

impl<T> From<T> for ValueOrUpdate<'_, T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueOrUpdate<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// What a selector picked: nothing, one element, or several.
#[derive(Debug, Clone)]
pub enum Selection<T> {
    Empty,
    One(T),
    Many(Vec<T>),
}

impl<T> Selection<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::One(_) => false,
            Self::Many(items) => items.is_empty(),
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Self::One)
    }
}

impl<T> From<Vec<T>> for Selection<T> {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value)
    }
}

impl<C> From<RowFacade<C>> for Selection<RowFacade<C>> {
    fn from(value: RowFacade<C>) -> Self {
        Self::One(value)
    }
}

impl<C> From<ColumnFacade<C>> for Selection<ColumnFacade<C>> {
    fn from(value: ColumnFacade<C>) -> Self {
        Self::One(value)
    }
}

/// Insertion position for an optional index: clamped to `len`, end when absent.
pub(crate) fn clamp_insert_index(index: usize, len: usize) -> usize {
    index.min(len)
}
