use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use super::{ColumnFacadeCache, LayoutFacade, RowFacade};
use crate::model::{Breakpoint, Column, Layout, Row, Size, SizeByScreen};

/// Collection facade over the columns of one row.
pub struct ColumnsFacade<C> {
    row: RowFacade<C>,
    all: OnceCell<Vec<ColumnFacade<C>>>,
}

impl<C> ColumnsFacade<C> {
    pub(crate) fn new(row: RowFacade<C>) -> Self {
        Self {
            row,
            all: OnceCell::new(),
        }
    }

    /// Raw columns of the row.
    #[must_use]
    pub fn raw(&self) -> &[Arc<Column<C>>] {
        &self.row.raw().columns
    }

    /// Facade for the column at `index`.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<ColumnFacade<C>> {
        self.all().get(index).cloned()
    }

    /// Every column facade, handed out by the layout's column cache.
    pub fn all(&self) -> &[ColumnFacade<C>] {
        self.all.get_or_init(|| {
            let cache = self.row.layout().column_cache();
            self.raw()
                .iter()
                .enumerate()
                .map(|(index, column)| cache.facade_for(&self.row, column, index))
                .collect()
        })
    }
}

collection_traversal!(ColumnsFacade, ColumnFacade);

impl<C: fmt::Debug> fmt::Debug for ColumnsFacade<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.raw()).finish()
    }
}

pub(crate) struct ColumnFacadeState<C> {
    pub(crate) layout: Arc<Layout<C>>,
    pub(crate) row: Arc<Row<C>>,
    pub(crate) row_index: usize,
    pub(crate) column: Arc<Column<C>>,
    pub(crate) index: usize,
    /// Weak so that cached facades do not keep their own cache alive.
    pub(crate) cache: Weak<ColumnFacadeCache<C>>,
}

/// Read-only view of one column, aware of its row and position.
///
/// Clones share the same underlying instance; see [`ColumnFacade::ptr_eq`].
pub struct ColumnFacade<C> {
    state: Rc<ColumnFacadeState<C>>,
}

impl<C> ColumnFacade<C> {
    pub(crate) fn from_state(state: ColumnFacadeState<C>) -> Self {
        Self {
            state: Rc::new(state),
        }
    }

    pub(crate) fn state(&self) -> &ColumnFacadeState<C> {
        &self.state
    }

    /// `true` when both handles refer to the same facade instance.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.state, &b.state)
    }

    #[must_use]
    pub fn raw(&self) -> &Arc<Column<C>> {
        &self.state.column
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.state.index
    }

    #[must_use]
    pub fn index_is(&self, index: usize) -> bool {
        self.state.index == index
    }

    #[must_use]
    pub fn is_first_in_row(&self) -> bool {
        self.state.index == 0
    }

    #[must_use]
    pub fn is_last_in_row(&self) -> bool {
        self.state.index + 1 == self.state.row.columns.len()
    }

    /// Facade for the row holding this column.
    #[must_use]
    pub fn row(&self) -> RowFacade<C> {
        let cache = self
            .state
            .cache
            .upgrade()
            .unwrap_or_else(|| Rc::new(ColumnFacadeCache::new()));
        let layout = LayoutFacade::with_cache(Arc::clone(&self.state.layout), cache);
        RowFacade::new(layout, Arc::clone(&self.state.row), self.state.row_index)
    }

    #[must_use]
    pub fn size(&self) -> &SizeByScreen {
        &self.state.column.size
    }

    #[must_use]
    pub fn size_for_screen(&self, screen: Breakpoint) -> Option<Size> {
        self.state.column.size.for_screen(screen)
    }

    #[must_use]
    pub fn has_size_for_screen(&self, screen: Breakpoint) -> bool {
        self.size_for_screen(screen).is_some()
    }

    #[must_use]
    pub fn content(&self) -> Option<&C> {
        self.state.column.content.as_ref()
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        self.state.column.content.is_some()
    }

    /// A column without content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_content()
    }

    #[must_use]
    pub fn content_equals(&self, content: &C) -> bool
    where
        C: PartialEq,
    {
        self.content() == Some(content)
    }

    /// Run a predicate against the content; `false` for empty columns.
    pub fn content_is(&self, pred: impl FnOnce(&C) -> bool) -> bool {
        self.content().is_some_and(pred)
    }

    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.state.column.style.as_deref()
    }

    #[must_use]
    pub fn has_style(&self) -> bool {
        self.state.column.style.is_some()
    }

    #[must_use]
    pub fn style_equals(&self, style: &str) -> bool {
        self.style() == Some(style)
    }

    pub fn test(&self, pred: impl FnOnce(&Self) -> bool) -> bool {
        pred(self)
    }

    pub fn test_raw(&self, pred: impl FnOnce(&Column<C>) -> bool) -> bool {
        pred(&self.state.column)
    }
}

impl<C> Clone for ColumnFacade<C> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for ColumnFacade<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnFacade")
            .field("row_index", &self.state.row_index)
            .field("index", &self.state.index)
            .field("column", &self.state.column)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layout, Row};

    fn sample() -> LayoutFacade<String> {
        LayoutFacade::new(
            Layout::new().with_row(
                Row::new()
                    .with_column(
                        Column::new(Size::columns(4))
                            .with_content("chart".to_string())
                            .with_style("card"),
                    )
                    .with_column(Column {
                        size: SizeByScreen::from_xl(Size::columns(8))
                            .with_screen(Breakpoint::Xs, Size::columns(12)),
                        ..Column::new(Size::columns(8))
                    }),
            ),
        )
    }

    #[test]
    fn positions_and_navigation() {
        let facade = sample();
        let columns = facade.row(0).expect("row").columns();
        assert_eq!(columns.count(), 2);
        let first = columns.column(0).expect("first column");
        let last = columns.column(1).expect("second column");
        assert!(first.is_first_in_row());
        assert!(last.is_last_in_row());
        assert!(last.index_is(1));
        assert_eq!(last.row().index(), 0);
        assert!(Arc::ptr_eq(last.row().layout().raw(), facade.raw()));
    }

    #[test]
    fn content_predicates() {
        let columns = sample().row(0).expect("row").columns();
        let first = &columns.all()[0];
        let second = &columns.all()[1];
        assert!(first.has_content());
        assert!(first.content_equals(&"chart".to_string()));
        assert!(first.content_is(|content| content.starts_with("ch")));
        assert!(second.is_empty());
        assert!(!second.content_is(|_| true));
    }

    #[test]
    fn size_and_style_predicates() {
        let columns = sample().row(0).expect("row").columns();
        let first = &columns.all()[0];
        let second = &columns.all()[1];
        assert!(first.style_equals("card"));
        assert!(!second.has_style());
        assert!(second.has_size_for_screen(Breakpoint::Xs));
        assert!(!first.has_size_for_screen(Breakpoint::Xs));
        assert_eq!(second.size().xl.width_as_grid_columns_count, 8);
        assert!(first.test_raw(|raw| raw.size.xl == Size::columns(4)));
    }

    #[test]
    fn facades_outlive_dropped_layout_facade() {
        let column = {
            let facade = sample();
            facade.row(0).expect("row").column(1).expect("column")
        };
        assert_eq!(column.row().columns().count(), 2);
    }
}
