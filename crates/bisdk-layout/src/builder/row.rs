use std::cell::OnceCell;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use super::column::ColumnParent;
use super::{ColumnBuilder, Selection, ValueOrUpdate, clamp_insert_index};
use crate::error::{EditOperation, LayoutError};
use crate::facade::{ColumnFacade, ColumnsFacade, LayoutFacade, RowFacade};
use crate::model::{Column, Layout, Row, SectionHeader, Size};

/// Position of an attached row builder in its layout.
pub(crate) struct RowParent<C> {
    pub(crate) layout: Arc<Layout<C>>,
    pub(crate) index: usize,
}

/// Builder staging a single row and its columns.
pub struct RowBuilder<C> {
    row: Arc<Row<C>>,
    parent: Option<RowParent<C>>,
    facade: OnceCell<RowFacade<C>>,
}

impl<C: Clone> RowBuilder<C> {
    /// Builder over an existing row.
    #[must_use]
    pub fn for_row(row: impl Into<Arc<Row<C>>>) -> Self {
        Self {
            row: row.into(),
            parent: None,
            facade: OnceCell::new(),
        }
    }

    /// Builder over a new row without columns.
    #[must_use]
    pub fn for_new_row() -> Self {
        Self::for_row(Row::new())
    }

    /// Validate a raw row and wrap it.
    pub fn from_value(value: Value) -> Result<Self, LayoutError>
    where
        C: DeserializeOwned,
    {
        Row::from_value(value).map(Self::for_row)
    }

    pub(crate) fn attached(row: Arc<Row<C>>, parent: RowParent<C>) -> Self {
        Self {
            row,
            parent: Some(parent),
            facade: OnceCell::new(),
        }
    }

    pub(crate) fn into_row(self) -> Arc<Row<C>> {
        self.row
    }

    fn position(&self) -> Option<usize> {
        self.parent.as_ref().map(|parent| parent.index)
    }

    fn missing(&self, operation: EditOperation, index: usize) -> LayoutError {
        LayoutError::MissingColumn {
            operation,
            row: self.position(),
            index,
        }
    }

    fn stage(mut self, edit: impl FnOnce(&mut Row<C>)) -> Self {
        self.facade.take();
        edit(Arc::make_mut(&mut self.row));
        self
    }

    fn child(&self, index: usize) -> Option<ColumnBuilder<C>> {
        let column = self.row.columns.get(index)?;
        Some(ColumnBuilder::attached(
            Arc::clone(column),
            ColumnParent {
                layout: self
                    .parent
                    .as_ref()
                    .map(|parent| Arc::clone(&parent.layout)),
                row: Arc::clone(&self.row),
                row_index: self.position().unwrap_or(0),
                index,
            },
        ))
    }

    fn replace_column(self, index: usize, column: Arc<Column<C>>) -> Self {
        let unchanged = self
            .row
            .columns
            .get(index)
            .is_none_or(|current| Arc::ptr_eq(current, &column));
        if unchanged {
            return self;
        }
        self.stage(|row| row.columns[index] = column)
    }

    fn select_columns<S>(
        &self,
        selector: impl FnOnce(&ColumnsFacade<C>) -> S,
    ) -> Vec<ColumnFacade<C>>
    where
        S: Into<Selection<ColumnFacade<C>>>,
    {
        let facade = self.facade();
        let columns = facade.columns();
        selector(&columns).into().into_vec()
    }

    /// Replace the staged row, or compute it from the current one.
    #[must_use]
    pub fn set_row<'u>(mut self, row: impl Into<ValueOrUpdate<'u, Row<C>>>) -> Self {
        self.facade.take();
        let current = Arc::unwrap_or_clone(self.row);
        self.row = Arc::new(row.into().resolve(current));
        self
    }

    #[must_use]
    pub fn header<'u>(self, header: impl Into<ValueOrUpdate<'u, Option<SectionHeader>>>) -> Self {
        let header = header.into();
        self.stage(|row| row.header = header.resolve(row.header.take()))
    }

    #[must_use]
    pub fn style<'u>(self, style: impl Into<ValueOrUpdate<'u, Option<String>>>) -> Self {
        let style = style.into();
        self.stage(|row| row.style = style.resolve(row.style.take()))
    }

    /// Append a column sized `xl` and shape it with `create`.
    #[must_use]
    pub fn add_column(
        self,
        xl: Size,
        create: impl FnOnce(ColumnBuilder<C>) -> ColumnBuilder<C>,
    ) -> Self {
        let end = self.row.columns.len();
        self.add_column_at(end, xl, create)
    }

    /// Insert a column sized `xl` at `index`, shifting later columns right.
    /// An index past the end appends.
    #[must_use]
    pub fn add_column_at(
        self,
        index: usize,
        xl: Size,
        create: impl FnOnce(ColumnBuilder<C>) -> ColumnBuilder<C>,
    ) -> Self {
        let index = clamp_insert_index(index, self.row.columns.len());
        #[cfg(feature = "tracing")]
        trace!(row = self.position(), index, "add column");
        let builder = self.stage(|row| row.columns.insert(index, Arc::new(Column::new(xl))));
        match builder.child(index) {
            Some(child) => {
                let column = create(child).into_column();
                builder.replace_column(index, column)
            }
            None => builder,
        }
    }

    /// Insert an already built column at `index`. An index past the end appends.
    #[must_use]
    pub fn insert_column(self, index: usize, column: impl Into<Arc<Column<C>>>) -> Self {
        let index = clamp_insert_index(index, self.row.columns.len());
        let column = column.into();
        #[cfg(feature = "tracing")]
        trace!(row = self.position(), index, "insert column");
        self.stage(|row| row.columns.insert(index, column))
    }

    /// Edit the column at `index`.
    pub fn modify_column(
        self,
        index: usize,
        f: impl FnOnce(ColumnBuilder<C>, &ColumnFacade<C>) -> ColumnBuilder<C>,
    ) -> Result<Self, LayoutError> {
        let Some(child) = self.child(index) else {
            return Err(self.missing(EditOperation::Modify, index));
        };
        let facade = child.facade();
        let column = f(child, &facade).into_column();
        drop(facade);
        Ok(self.replace_column(index, column))
    }

    pub fn remove_column(self, index: usize) -> Result<Self, LayoutError> {
        if index >= self.row.columns.len() {
            return Err(self.missing(EditOperation::Remove, index));
        }
        #[cfg(feature = "tracing")]
        trace!(row = self.position(), index, "remove column");
        Ok(self.stage(|row| {
            row.columns.remove(index);
        }))
    }

    /// Move the column at `from` so that it ends up at `to`.
    ///
    /// `to` addresses the columns left after removing the moved one and is
    /// clamped to their count.
    pub fn move_column(self, from: usize, to: usize) -> Result<Self, LayoutError> {
        if from >= self.row.columns.len() {
            return Err(self.missing(EditOperation::Move, from));
        }
        #[cfg(feature = "tracing")]
        trace!(row = self.position(), from, to, "move column");
        Ok(self.stage(|row| {
            let column = row.columns.remove(from);
            let to = clamp_insert_index(to, row.columns.len());
            row.columns.insert(to, column);
        }))
    }

    /// Remove every column the selector picks. An empty selection is a no-op.
    #[must_use]
    pub fn remove_columns<S>(self, selector: impl FnOnce(&ColumnsFacade<C>) -> S) -> Self
    where
        S: Into<Selection<ColumnFacade<C>>>,
    {
        let doomed: Vec<Arc<Column<C>>> = self
            .select_columns(selector)
            .iter()
            .map(|column| Arc::clone(column.raw()))
            .collect();
        let is_doomed = |column: &Arc<Column<C>>| doomed.iter().any(|d| Arc::ptr_eq(d, column));
        if !self.row.columns.iter().any(is_doomed) {
            return self;
        }
        #[cfg(feature = "tracing")]
        debug!(row = self.position(), count = doomed.len(), "remove columns");
        self.stage(|row| row.columns.retain(|column| !is_doomed(column)))
    }

    #[must_use]
    pub fn remove_all_columns(self) -> Self {
        self.remove_columns(|columns| columns.all().to_vec())
    }

    /// Remove columns without content.
    #[must_use]
    pub fn remove_empty_columns(self) -> Self {
        self.remove_columns(|columns| columns.filter(ColumnFacade::is_empty))
    }

    /// Apply `f` to every column the selector picks.
    ///
    /// Positions are captured before the first modification, so each call
    /// receives the column that was at that position when the batch started.
    #[must_use]
    pub fn modify_columns<S>(
        self,
        mut f: impl FnMut(ColumnBuilder<C>, &ColumnFacade<C>) -> ColumnBuilder<C>,
        selector: impl FnOnce(&ColumnsFacade<C>) -> S,
    ) -> Self
    where
        S: Into<Selection<ColumnFacade<C>>>,
    {
        let targets = self.select_columns(selector);
        #[cfg(feature = "tracing")]
        debug!(row = self.position(), count = targets.len(), "modify columns");
        let mut builder = self;
        for target in &targets {
            let index = target.index();
            let Some(child) = builder.child(index) else {
                continue;
            };
            let column = f(child, target).into_column();
            builder = builder.replace_column(index, column);
        }
        builder
    }

    #[must_use]
    pub fn modify_all_columns(
        self,
        f: impl FnMut(ColumnBuilder<C>, &ColumnFacade<C>) -> ColumnBuilder<C>,
    ) -> Self {
        self.modify_columns(f, |columns| columns.all().to_vec())
    }

    /// Apply a reusable edit recipe.
    #[must_use]
    pub fn modify(self, f: impl FnOnce(Self, &RowFacade<C>) -> Self) -> Self {
        let facade = self.facade();
        f(self, &facade)
    }

    /// Facade over the row as currently staged, placed in its layout.
    #[must_use]
    pub fn facade(&self) -> RowFacade<C> {
        self.facade.get_or_init(|| self.placed_facade()).clone()
    }

    fn placed_facade(&self) -> RowFacade<C> {
        let (layout, index) = match &self.parent {
            Some(parent) => (
                parent.layout.replacing_row(parent.index, Arc::clone(&self.row)),
                parent.index,
            ),
            None => (Layout::hosting(Arc::clone(&self.row)), 0),
        };
        RowFacade::new(LayoutFacade::new(layout), Arc::clone(&self.row), index)
    }

    /// The staged row.
    #[must_use]
    pub fn build(&self) -> Arc<Row<C>> {
        Arc::clone(&self.row)
    }
}
