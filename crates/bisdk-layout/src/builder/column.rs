use std::cell::OnceCell;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::trace;

use super::{LayoutBuilder, ValueOrUpdate};
use crate::error::LayoutError;
use crate::facade::{ColumnFacade, LayoutFacade, RowFacade};
use crate::model::{Column, Layout, Row, Size, SizeByScreen};
use crate::walk::LayoutContent;

/// Where an attached column builder sits. `layout` is absent when the owning
/// row is itself detached.
pub(crate) struct ColumnParent<C> {
    pub(crate) layout: Option<Arc<Layout<C>>>,
    pub(crate) row: Arc<Row<C>>,
    pub(crate) row_index: usize,
    pub(crate) index: usize,
}

/// Builder staging a single column.
pub struct ColumnBuilder<C> {
    column: Arc<Column<C>>,
    parent: Option<ColumnParent<C>>,
    facade: OnceCell<ColumnFacade<C>>,
}

impl<C: Clone> ColumnBuilder<C> {
    /// Builder over an existing column.
    #[must_use]
    pub fn for_column(column: impl Into<Arc<Column<C>>>) -> Self {
        Self {
            column: column.into(),
            parent: None,
            facade: OnceCell::new(),
        }
    }

    /// Builder over a new empty column sized for xl.
    #[must_use]
    pub fn for_new_column(xl: Size) -> Self {
        Self::for_column(Column::new(xl))
    }

    /// Validate a raw column and wrap it.
    pub fn from_value(value: Value) -> Result<Self, LayoutError>
    where
        C: DeserializeOwned,
    {
        Column::from_value(value).map(Self::for_column)
    }

    pub(crate) fn attached(column: Arc<Column<C>>, parent: ColumnParent<C>) -> Self {
        Self {
            column,
            parent: Some(parent),
            facade: OnceCell::new(),
        }
    }

    pub(crate) fn into_column(self) -> Arc<Column<C>> {
        self.column
    }

    fn position(&self) -> (Option<usize>, Option<usize>) {
        self.parent.as_ref().map_or((None, None), |parent| {
            let row = parent.layout.as_ref().map(|_| parent.row_index);
            (row, Some(parent.index))
        })
    }

    fn stage(mut self, edit: impl FnOnce(&mut Column<C>)) -> Self {
        self.facade.take();
        edit(Arc::make_mut(&mut self.column));
        self
    }

    /// Replace the staged column, or compute it from the current one.
    #[must_use]
    pub fn set_column<'u>(mut self, column: impl Into<ValueOrUpdate<'u, Column<C>>>) -> Self {
        self.facade.take();
        let current = Arc::unwrap_or_clone(self.column);
        self.column = Arc::new(column.into().resolve(current));
        self
    }

    #[must_use]
    pub fn size<'u>(self, size: impl Into<ValueOrUpdate<'u, SizeByScreen>>) -> Self {
        let size = size.into();
        self.stage(|column| column.size = size.resolve(column.size))
    }

    #[must_use]
    pub fn content<'u>(self, content: impl Into<ValueOrUpdate<'u, Option<C>>>) -> Self {
        let content = content.into();
        self.stage(|column| {
            column.content = content.resolve(column.content.take());
        })
    }

    #[must_use]
    pub fn style<'u>(self, style: impl Into<ValueOrUpdate<'u, Option<String>>>) -> Self {
        let style = style.into();
        self.stage(|column| column.style = style.resolve(column.style.take()))
    }

    /// Edit the layout nested in this column's content.
    ///
    /// Fails when the content is missing or is not a layout.
    pub fn modify_nested_layout(
        self,
        f: impl FnOnce(LayoutBuilder<C>) -> LayoutBuilder<C>,
    ) -> Result<Self, LayoutError>
    where
        C: LayoutContent,
    {
        let Some(nested) = self.column.content.as_ref().and_then(LayoutContent::as_layout) else {
            let (row, column) = self.position();
            return Err(LayoutError::NotNestedLayout { row, column });
        };
        let builder = LayoutBuilder::for_layout(nested.clone());
        #[cfg(feature = "tracing")]
        {
            let (row, column) = self.position();
            trace!(row, column, "modify nested layout");
        }
        let updated = Arc::unwrap_or_clone(f(builder).into_layout());
        Ok(self.content(Some(C::from_layout(updated))))
    }

    /// Apply a reusable edit recipe.
    #[must_use]
    pub fn modify(self, f: impl FnOnce(Self, &ColumnFacade<C>) -> Self) -> Self {
        let facade = self.facade();
        f(self, &facade)
    }

    /// Facade over the column as currently staged, placed in its row and layout.
    #[must_use]
    pub fn facade(&self) -> ColumnFacade<C> {
        self.facade.get_or_init(|| self.placed_facade()).clone()
    }

    fn placed_facade(&self) -> ColumnFacade<C> {
        let column = Arc::clone(&self.column);
        let (row, layout, row_index, index) = match &self.parent {
            Some(parent) => {
                let row = parent.row.replacing_column(parent.index, Arc::clone(&column));
                let row = Arc::new(row);
                let layout = match &parent.layout {
                    Some(layout) => layout.replacing_row(parent.row_index, Arc::clone(&row)),
                    None => Layout::hosting(Arc::clone(&row)),
                };
                (row, layout, parent.row_index, parent.index)
            }
            None => {
                let row = Arc::new(Row::new().with_column(Arc::clone(&column)));
                let layout = Layout::hosting(Arc::clone(&row));
                (row, layout, 0, 0)
            }
        };
        let layout = LayoutFacade::new(layout);
        let row = RowFacade::new(layout.clone(), row, row_index);
        layout.column_cache().facade_for(&row, &column, index)
    }

    /// The staged column.
    #[must_use]
    pub fn build(&self) -> Arc<Column<C>> {
        Arc::clone(&self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Breakpoint;

    #[test]
    fn unedited_builder_returns_same_column() {
        let column = Arc::new(Column::<String>::new(Size::columns(4)));
        let built = ColumnBuilder::for_column(Arc::clone(&column)).build();
        assert!(Arc::ptr_eq(&built, &column));
    }

    #[test]
    fn setters_do_not_touch_the_source() {
        let column = Column::new(Size::columns(4)).with_content("old".to_string());
        let column = Arc::new(column);
        let built = ColumnBuilder::for_column(Arc::clone(&column))
            .content(Some("new".to_string()))
            .style(Some("card".to_string()))
            .build();
        assert_eq!(column.content.as_deref(), Some("old"));
        assert_eq!(built.content.as_deref(), Some("new"));
        assert_eq!(built.style.as_deref(), Some("card"));
    }

    #[test]
    fn update_functions_see_current_value() {
        let built = ColumnBuilder::<String>::for_new_column(Size::columns(4))
            .size(ValueOrUpdate::update(|size: SizeByScreen| {
                size.with_screen(Breakpoint::Xs, Size::columns(12))
            }))
            .content(ValueOrUpdate::update(|content: Option<String>| {
                Some(content.unwrap_or_default() + "A")
            }))
            .build();
        assert_eq!(built.size.xs, Some(Size::columns(12)));
        assert_eq!(built.content.as_deref(), Some("A"));
    }

    #[test]
    fn set_column_replaces_everything() {
        let built = ColumnBuilder::for_new_column(Size::columns(4))
            .content(Some(1_u8))
            .set_column(Column::new(Size::columns(2)))
            .build();
        assert_eq!(built.size.xl, Size::columns(2));
        assert!(built.content.is_none());
    }

    #[test]
    fn facade_reflects_staged_state() {
        let builder = ColumnBuilder::for_new_column(Size::columns(4)).content(Some(5_u8));
        let facade = builder.facade();
        assert!(facade.content_equals(&5));
        assert!(facade.is_first_in_row());
        assert!(facade.is_last_in_row());
        assert!(Arc::ptr_eq(facade.raw(), &builder.build()));
    }

    #[test]
    fn modify_applies_recipe() {
        fn highlight(builder: ColumnBuilder<u8>, facade: &ColumnFacade<u8>) -> ColumnBuilder<u8> {
            if facade.has_content() {
                builder.style(Some("highlight".to_string()))
            } else {
                builder
            }
        }
        let built = ColumnBuilder::for_new_column(Size::columns(4))
            .content(Some(1))
            .modify(highlight)
            .build();
        assert_eq!(built.style.as_deref(), Some("highlight"));
    }

    #[test]
    fn from_value_validates_shape() {
        let err = ColumnBuilder::<String>::from_value(serde_json::json!({ "content": "x" }))
            .err()
            .expect("column without size is rejected");
        assert!(matches!(err, LayoutError::InvalidShape { .. }));
    }
}
