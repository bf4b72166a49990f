use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ColumnFacadeCache, RowFacade, RowsFacade};
use crate::error::LayoutError;
use crate::model::{Layout, Size};

/// Read-only view of one layout snapshot.
///
/// Cloning is cheap: clones share the snapshot and the column facade cache.
pub struct LayoutFacade<C> {
    layout: Arc<Layout<C>>,
    columns: Rc<ColumnFacadeCache<C>>,
}

impl<C> LayoutFacade<C> {
    /// Facade over a layout snapshot with a fresh column facade cache.
    #[must_use]
    pub fn new(layout: impl Into<Arc<Layout<C>>>) -> Self {
        Self::with_cache(layout.into(), Rc::new(ColumnFacadeCache::new()))
    }

    pub(crate) fn with_cache(layout: Arc<Layout<C>>, columns: Rc<ColumnFacadeCache<C>>) -> Self {
        Self { layout, columns }
    }

    /// Validate raw data and wrap it.
    pub fn from_value(value: Value) -> Result<Self, LayoutError>
    where
        C: DeserializeOwned,
    {
        Layout::from_value(value).map(Self::new)
    }

    /// The wrapped snapshot.
    #[must_use]
    pub fn raw(&self) -> &Arc<Layout<C>> {
        &self.layout
    }

    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.layout.size
    }

    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.layout.style.as_deref()
    }

    /// Collection facade over the rows.
    #[must_use]
    pub fn rows(&self) -> RowsFacade<C> {
        RowsFacade::new(self.clone())
    }

    /// Facade for the row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<RowFacade<C>> {
        let row = self.layout.rows.get(index)?;
        Some(RowFacade::new(self.clone(), Arc::clone(row), index))
    }

    /// Cache that hands out column facades for this snapshot.
    #[must_use]
    pub fn column_cache(&self) -> &Rc<ColumnFacadeCache<C>> {
        &self.columns
    }
}

impl<C> Clone for LayoutFacade<C> {
    fn clone(&self) -> Self {
        Self {
            layout: Arc::clone(&self.layout),
            columns: Rc::clone(&self.columns),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for LayoutFacade<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutFacade")
            .field("layout", &self.layout)
            .field("cached_columns", &self.columns.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Row};
    use serde_json::json;

    fn sample() -> Layout<String> {
        Layout::new()
            .with_size(Size::columns(12))
            .with_row(Row::new().with_column(Column::new(Size::columns(6))))
            .with_row(Row::new())
    }

    #[test]
    fn exposes_snapshot_properties() {
        let layout = Arc::new(sample());
        let facade = LayoutFacade::new(Arc::clone(&layout));
        assert!(Arc::ptr_eq(facade.raw(), &layout));
        assert_eq!(facade.size(), Some(Size::columns(12)));
        assert_eq!(facade.style(), None);
        assert_eq!(facade.rows().count(), 2);
    }

    #[test]
    fn row_lookup_is_bounds_checked() {
        let facade = LayoutFacade::new(sample());
        assert_eq!(facade.row(1).map(|row| row.index()), Some(1));
        assert!(facade.row(2).is_none());
    }

    #[test]
    fn from_value_rejects_malformed_layouts() {
        let err = LayoutFacade::<String>::from_value(json!({ "type": "yolo" }))
            .expect_err("malformed layout");
        assert!(matches!(err, LayoutError::InvalidShape { .. }));
    }

    #[test]
    fn clones_share_the_column_cache() {
        let facade = LayoutFacade::new(sample());
        let clone = facade.clone();
        assert!(Rc::ptr_eq(facade.column_cache(), clone.column_cache()));
    }
}
