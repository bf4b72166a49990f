use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use super::columns::ColumnFacadeState;
use super::{ColumnFacade, RowFacade};
use crate::model::Column;

/// Hands out one [`ColumnFacade`] per raw column for a layout snapshot.
///
/// Entries are keyed by the address of the column's `Arc` allocation and hold
/// a strong reference to it, so an address cannot be reused while its entry
/// lives. The cache is append-only and is dropped together with the last
/// [`LayoutFacade`](super::LayoutFacade) sharing it.
pub struct ColumnFacadeCache<C> {
    entries: RefCell<HashMap<usize, ColumnFacade<C>>>,
}

impl<C> ColumnFacadeCache<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Facade for `column` located at `index` inside `row`.
    ///
    /// Repeated requests for the same column at the same position return
    /// the same facade instance. A column shared by several positions gets
    /// the cached instance only at the position it was first seen.
    pub fn facade_for(
        self: &Rc<Self>,
        row: &RowFacade<C>,
        column: &Arc<Column<C>>,
        index: usize,
    ) -> ColumnFacade<C> {
        let key = Arc::as_ptr(column) as usize;
        if let Some(cached) = self.entries.borrow().get(&key) {
            let state = cached.state();
            if state.row_index == row.index()
                && state.index == index
                && Arc::ptr_eq(&state.layout, row.layout().raw())
            {
                return cached.clone();
            }
            return self.create(row, column, index);
        }
        let facade = self.create(row, column, index);
        self.entries.borrow_mut().insert(key, facade.clone());
        facade
    }

    fn create(
        self: &Rc<Self>,
        row: &RowFacade<C>,
        column: &Arc<Column<C>>,
        index: usize,
    ) -> ColumnFacade<C> {
        ColumnFacade::from_state(ColumnFacadeState {
            layout: Arc::clone(row.layout().raw()),
            row: Arc::clone(row.raw()),
            row_index: row.index(),
            column: Arc::clone(column),
            index,
            cache: Rc::downgrade(self),
        })
    }

    /// Number of cached facades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<C> Default for ColumnFacadeCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::LayoutFacade;
    use crate::model::{Layout, Row, Size};

    #[test]
    fn same_column_yields_same_instance() {
        let facade = LayoutFacade::new(
            Layout::<u8>::new().with_row(Row::new().with_column(Column::new(Size::columns(3)))),
        );
        let from_collection = facade.rows().all()[0].columns().all()[0].clone();
        let from_lookup = facade.row(0).expect("row").column(0).expect("column");
        assert!(ColumnFacade::ptr_eq(&from_collection, &from_lookup));
        assert_eq!(facade.column_cache().len(), 1);
    }

    #[test]
    fn separate_snapshots_do_not_share_instances() {
        let layout = Arc::new(
            Layout::<u8>::new().with_row(Row::new().with_column(Column::new(Size::columns(3)))),
        );
        let a = LayoutFacade::new(Arc::clone(&layout));
        let b = LayoutFacade::new(Arc::clone(&layout));
        let from_a = a.row(0).and_then(|row| row.column(0)).expect("column");
        let from_b = b.row(0).and_then(|row| row.column(0)).expect("column");
        assert!(!ColumnFacade::ptr_eq(&from_a, &from_b));
        assert!(Arc::ptr_eq(from_a.raw(), from_b.raw()));
    }

    #[test]
    fn shared_column_reports_each_position() {
        let column = Arc::new(Column::<u8>::new(Size::columns(6)));
        let row = Row::new()
            .with_column(Arc::clone(&column))
            .with_column(column);
        let facade = LayoutFacade::new(Layout::new().with_row(row));
        let columns = facade.row(0).expect("row").columns();
        assert_eq!(columns.map(ColumnFacade::index), vec![0, 1]);
        assert_eq!(facade.column_cache().len(), 1);
    }

    #[test]
    fn equal_columns_keep_separate_instances() {
        let facade = LayoutFacade::new(
            Layout::<u8>::new().with_row(
                Row::new()
                    .with_column(Column::new(Size::columns(3)))
                    .with_column(Column::new(Size::columns(3))),
            ),
        );
        let row = facade.row(0).expect("row");
        let first = row.column(0).expect("first column");
        let second = row.column(1).expect("second column");
        assert_eq!(first.raw(), second.raw());
        assert!(!ColumnFacade::ptr_eq(&first, &second));
        assert_eq!((first.index(), second.index()), (0, 1));
        assert_eq!(facade.column_cache().len(), 2);
    }

    #[test]
    fn cache_is_released_with_its_facades() {
        let facade = LayoutFacade::new(
            Layout::<u8>::new().with_row(Row::new().with_column(Column::new(Size::columns(3)))),
        );
        let _ = facade.rows().all()[0].columns().all();
        let weak = Rc::downgrade(facade.column_cache());
        drop(facade);
        assert!(weak.upgrade().is_none());
    }
}
