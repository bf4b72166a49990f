use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use super::{ColumnFacade, ColumnsFacade, LayoutFacade};
use crate::model::{Row, SectionHeader};

/// Collection facade over the rows of one layout snapshot.
pub struct RowsFacade<C> {
    layout: LayoutFacade<C>,
    all: OnceCell<Vec<RowFacade<C>>>,
}

impl<C> RowsFacade<C> {
    pub(crate) fn new(layout: LayoutFacade<C>) -> Self {
        Self {
            layout,
            all: OnceCell::new(),
        }
    }

    /// Raw rows of the snapshot.
    #[must_use]
    pub fn raw(&self) -> &[Arc<Row<C>>] {
        &self.layout.raw().rows
    }

    /// Facade for the row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<RowFacade<C>> {
        self.all().get(index).cloned()
    }

    /// Every row facade. Built on first access and reused afterwards.
    pub fn all(&self) -> &[RowFacade<C>] {
        self.all.get_or_init(|| {
            self.raw()
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    RowFacade::new(self.layout.clone(), Arc::clone(row), index)
                })
                .collect()
        })
    }
}

collection_traversal!(RowsFacade, RowFacade);

impl<C: fmt::Debug> fmt::Debug for RowsFacade<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.raw()).finish()
    }
}

/// Read-only view of one row, aware of its position in the layout.
pub struct RowFacade<C> {
    layout: LayoutFacade<C>,
    row: Arc<Row<C>>,
    index: usize,
}

impl<C> RowFacade<C> {
    pub(crate) fn new(layout: LayoutFacade<C>, row: Arc<Row<C>>, index: usize) -> Self {
        Self { layout, row, index }
    }

    #[must_use]
    pub fn raw(&self) -> &Arc<Row<C>> {
        &self.row
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn index_is(&self, index: usize) -> bool {
        self.index == index
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.layout.raw().rows.len()
    }

    /// The layout this row belongs to.
    #[must_use]
    pub fn layout(&self) -> &LayoutFacade<C> {
        &self.layout
    }

    #[must_use]
    pub fn header(&self) -> Option<&SectionHeader> {
        self.row.header.as_ref()
    }

    #[must_use]
    pub fn has_header(&self) -> bool {
        self.row.header.is_some()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.header()?.title.as_deref()
    }

    #[must_use]
    pub fn has_title(&self) -> bool {
        self.title().is_some()
    }

    #[must_use]
    pub fn title_equals(&self, title: &str) -> bool {
        self.title() == Some(title)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.header()?.description.as_deref()
    }

    #[must_use]
    pub fn has_description(&self) -> bool {
        self.description().is_some()
    }

    #[must_use]
    pub fn description_equals(&self, description: &str) -> bool {
        self.description() == Some(description)
    }

    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.row.style.as_deref()
    }

    #[must_use]
    pub fn has_style(&self) -> bool {
        self.row.style.is_some()
    }

    #[must_use]
    pub fn style_equals(&self, style: &str) -> bool {
        self.style() == Some(style)
    }

    /// A row without columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row.columns.is_empty()
    }

    /// Collection facade over this row's columns.
    #[must_use]
    pub fn columns(&self) -> ColumnsFacade<C> {
        ColumnsFacade::new(self.clone())
    }

    #[must_use]
    pub fn column(&self, index: usize) -> Option<ColumnFacade<C>> {
        let column = self.row.columns.get(index)?;
        Some(self.layout.column_cache().facade_for(self, column, index))
    }

    /// Run a predicate against this facade.
    pub fn test(&self, pred: impl FnOnce(&Self) -> bool) -> bool {
        pred(self)
    }

    /// Run a predicate against the raw row.
    pub fn test_raw(&self, pred: impl FnOnce(&Row<C>) -> bool) -> bool {
        pred(&self.row)
    }
}

impl<C> Clone for RowFacade<C> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout.clone(),
            row: Arc::clone(&self.row),
            index: self.index,
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for RowFacade<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFacade")
            .field("index", &self.index)
            .field("row", &self.row)
            .finish()
    }
}
