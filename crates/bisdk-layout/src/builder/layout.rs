use std::cell::OnceCell;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use super::row::RowParent;
use super::{RowBuilder, Selection, ValueOrUpdate, clamp_insert_index};
use crate::error::{EditOperation, LayoutError};
use crate::facade::{LayoutFacade, RowFacade, RowsFacade};
use crate::model::{Layout, Row, Size};

/// Builder staging a whole layout snapshot.
///
/// ```
/// use bisdk_layout::{LayoutBuilder, SectionHeader};
///
/// let layout = LayoutBuilder::<String>::for_new_layout()
///     .add_row(|row| row.header(Some(SectionHeader::titled("Row 0"))))
///     .add_row(|row| row.header(Some(SectionHeader::titled("Row 1"))))
///     .move_row(0, 1)
///     .expect("row 0 exists")
///     .build();
///
/// let titles: Vec<_> = layout
///     .rows
///     .iter()
///     .map(|row| row.header.as_ref().and_then(|h| h.title.as_deref()))
///     .collect();
/// assert_eq!(titles, vec![Some("Row 1"), Some("Row 0")]);
/// ```
pub struct LayoutBuilder<C> {
    layout: Arc<Layout<C>>,
    facade: OnceCell<LayoutFacade<C>>,
}

impl<C: Clone> LayoutBuilder<C> {
    /// Builder over an existing snapshot. `build()` returns the same `Arc`
    /// until the first edit.
    #[must_use]
    pub fn for_layout(layout: impl Into<Arc<Layout<C>>>) -> Self {
        Self {
            layout: layout.into(),
            facade: OnceCell::new(),
        }
    }

    /// Builder over an empty layout.
    #[must_use]
    pub fn for_new_layout() -> Self {
        Self::for_layout(Layout::new())
    }

    /// Validate a raw layout and wrap it.
    pub fn from_value(value: Value) -> Result<Self, LayoutError>
    where
        C: DeserializeOwned,
    {
        Layout::from_value(value).map(Self::for_layout)
    }

    pub(crate) fn into_layout(self) -> Arc<Layout<C>> {
        self.layout
    }

    fn missing(operation: EditOperation, index: usize) -> LayoutError {
        LayoutError::MissingRow { operation, index }
    }

    fn stage(mut self, edit: impl FnOnce(&mut Layout<C>)) -> Self {
        self.facade.take();
        edit(Arc::make_mut(&mut self.layout));
        self
    }

    fn child(&self, index: usize) -> Option<RowBuilder<C>> {
        let row = self.layout.rows.get(index)?;
        Some(RowBuilder::attached(
            Arc::clone(row),
            RowParent {
                layout: Arc::clone(&self.layout),
                index,
            },
        ))
    }

    fn replace_row(self, index: usize, row: Arc<Row<C>>) -> Self {
        let unchanged = self
            .layout
            .rows
            .get(index)
            .is_none_or(|current| Arc::ptr_eq(current, &row));
        if unchanged {
            return self;
        }
        self.stage(|layout| layout.rows[index] = row)
    }

    fn select_rows<S>(&self, selector: impl FnOnce(&RowsFacade<C>) -> S) -> Vec<RowFacade<C>>
    where
        S: Into<Selection<RowFacade<C>>>,
    {
        let rows = self.facade().rows();
        selector(&rows).into().into_vec()
    }

    /// Replace the staged layout, or compute it from the current one.
    #[must_use]
    pub fn set_layout<'u>(mut self, layout: impl Into<ValueOrUpdate<'u, Layout<C>>>) -> Self {
        self.facade.take();
        let current = Arc::unwrap_or_clone(self.layout);
        self.layout = Arc::new(layout.into().resolve(current));
        self
    }

    #[must_use]
    pub fn size<'u>(self, size: impl Into<ValueOrUpdate<'u, Option<Size>>>) -> Self {
        let size = size.into();
        self.stage(|layout| layout.size = size.resolve(layout.size))
    }

    #[must_use]
    pub fn style<'u>(self, style: impl Into<ValueOrUpdate<'u, Option<String>>>) -> Self {
        let style = style.into();
        self.stage(|layout| layout.style = style.resolve(layout.style.take()))
    }

    /// Append an empty row and shape it with `create`.
    #[must_use]
    pub fn add_row(self, create: impl FnOnce(RowBuilder<C>) -> RowBuilder<C>) -> Self {
        let end = self.layout.rows.len();
        self.add_row_at(end, create)
    }

    /// Insert an empty row at `index`, shifting later rows down. An index past
    /// the end appends.
    #[must_use]
    pub fn add_row_at(
        self,
        index: usize,
        create: impl FnOnce(RowBuilder<C>) -> RowBuilder<C>,
    ) -> Self {
        let index = clamp_insert_index(index, self.layout.rows.len());
        #[cfg(feature = "tracing")]
        trace!(index, "add row");
        let builder = self.stage(|layout| layout.rows.insert(index, Arc::new(Row::new())));
        match builder.child(index) {
            Some(child) => {
                let row = create(child).into_row();
                builder.replace_row(index, row)
            }
            None => builder,
        }
    }

    /// Insert an already built row at `index`. An index past the end appends.
    #[must_use]
    pub fn insert_row(self, index: usize, row: impl Into<Arc<Row<C>>>) -> Self {
        let index = clamp_insert_index(index, self.layout.rows.len());
        let row = row.into();
        #[cfg(feature = "tracing")]
        trace!(index, "insert row");
        self.stage(|layout| layout.rows.insert(index, row))
    }

    /// Edit the row at `index`.
    pub fn modify_row(
        self,
        index: usize,
        f: impl FnOnce(RowBuilder<C>, &RowFacade<C>) -> RowBuilder<C>,
    ) -> Result<Self, LayoutError> {
        let Some(child) = self.child(index) else {
            return Err(Self::missing(EditOperation::Modify, index));
        };
        let facade = child.facade();
        let row = f(child, &facade).into_row();
        drop(facade);
        Ok(self.replace_row(index, row))
    }

    pub fn remove_row(self, index: usize) -> Result<Self, LayoutError> {
        if index >= self.layout.rows.len() {
            return Err(Self::missing(EditOperation::Remove, index));
        }
        #[cfg(feature = "tracing")]
        trace!(index, "remove row");
        Ok(self.stage(|layout| {
            layout.rows.remove(index);
        }))
    }

    /// Move the row at `from` so that it ends up at `to`.
    ///
    /// `to` addresses the rows left after removing the moved one and is
    /// clamped to their count.
    pub fn move_row(self, from: usize, to: usize) -> Result<Self, LayoutError> {
        if from >= self.layout.rows.len() {
            return Err(Self::missing(EditOperation::Move, from));
        }
        #[cfg(feature = "tracing")]
        trace!(from, to, "move row");
        Ok(self.stage(|layout| {
            let row = layout.rows.remove(from);
            let to = clamp_insert_index(to, layout.rows.len());
            layout.rows.insert(to, row);
        }))
    }

    /// Remove every row the selector picks. An empty selection is a no-op.
    #[must_use]
    pub fn remove_rows<S>(self, selector: impl FnOnce(&RowsFacade<C>) -> S) -> Self
    where
        S: Into<Selection<RowFacade<C>>>,
    {
        let doomed: Vec<Arc<Row<C>>> = self
            .select_rows(selector)
            .iter()
            .map(|row| Arc::clone(row.raw()))
            .collect();
        let is_doomed = |row: &Arc<Row<C>>| doomed.iter().any(|d| Arc::ptr_eq(d, row));
        if !self.layout.rows.iter().any(is_doomed) {
            return self;
        }
        #[cfg(feature = "tracing")]
        debug!(count = doomed.len(), "remove rows");
        self.stage(|layout| layout.rows.retain(|row| !is_doomed(row)))
    }

    #[must_use]
    pub fn remove_all_rows(self) -> Self {
        self.remove_rows(|rows| rows.all().to_vec())
    }

    /// Remove rows without columns.
    #[must_use]
    pub fn remove_empty_rows(self) -> Self {
        self.remove_rows(|rows| rows.filter(RowFacade::is_empty))
    }

    /// Apply `f` to every row the selector picks.
    ///
    /// Positions are captured before the first modification, so each call
    /// receives the row that was at that position when the batch started.
    #[must_use]
    pub fn modify_rows<S>(
        self,
        mut f: impl FnMut(RowBuilder<C>, &RowFacade<C>) -> RowBuilder<C>,
        selector: impl FnOnce(&RowsFacade<C>) -> S,
    ) -> Self
    where
        S: Into<Selection<RowFacade<C>>>,
    {
        let targets = self.select_rows(selector);
        #[cfg(feature = "tracing")]
        debug!(count = targets.len(), "modify rows");
        let mut builder = self;
        for target in &targets {
            let index = target.index();
            let Some(child) = builder.child(index) else {
                continue;
            };
            let row = f(child, target).into_row();
            builder = builder.replace_row(index, row);
        }
        builder
    }

    #[must_use]
    pub fn modify_all_rows(
        self,
        f: impl FnMut(RowBuilder<C>, &RowFacade<C>) -> RowBuilder<C>,
    ) -> Self {
        self.modify_rows(f, |rows| rows.all().to_vec())
    }

    /// Apply a reusable edit recipe.
    #[must_use]
    pub fn modify(self, f: impl FnOnce(Self, &LayoutFacade<C>) -> Self) -> Self {
        let facade = self.facade();
        f(self, &facade)
    }

    /// Facade over the layout as currently staged.
    ///
    /// Repeated calls between edits share one snapshot facade, so column
    /// facades keep their identity until the next edit.
    #[must_use]
    pub fn facade(&self) -> LayoutFacade<C> {
        self.facade
            .get_or_init(|| LayoutFacade::new(Arc::clone(&self.layout)))
            .clone()
    }

    /// The staged layout.
    #[must_use]
    pub fn build(&self) -> Arc<Layout<C>> {
        Arc::clone(&self.layout)
    }
}
