//! Dashboard predicates on column facades.

use bisdk_layout::{ColumnFacade, Layout};

use crate::content::{DashboardContent, Widget, WidgetKind};

/// Widget-aware queries for columns of a dashboard layout.
pub trait DashboardColumnExt {
    /// Persisted widget held by the column.
    fn widget(&self) -> Option<&Widget>;

    /// Layout nested in the column.
    fn nested_layout(&self) -> Option<&Layout<DashboardContent>>;

    /// Kind of the widget or widget definition held by the column.
    fn widget_kind(&self) -> Option<&WidgetKind>;

    fn is_widget(&self) -> bool {
        self.widget().is_some()
    }

    fn is_nested_layout(&self) -> bool {
        self.nested_layout().is_some()
    }

    fn is_insight_widget(&self) -> bool {
        matches!(self.widget_kind(), Some(WidgetKind::Insight { .. }))
    }

    fn is_kpi_widget(&self) -> bool {
        matches!(self.widget_kind(), Some(WidgetKind::Kpi { .. }))
    }

    /// `true` when the column shows the insight `insight_ref`.
    fn is_widget_with_insight_ref(&self, insight_ref: &str) -> bool {
        self.widget_kind()
            .and_then(WidgetKind::insight_ref)
            .is_some_and(|current| current == insight_ref)
    }
}

impl DashboardColumnExt for ColumnFacade<DashboardContent> {
    fn widget(&self) -> Option<&Widget> {
        match self.content()? {
            DashboardContent::Widget(widget) => Some(widget),
            DashboardContent::Layout(_) | DashboardContent::WidgetDefinition(_) => None,
        }
    }

    fn nested_layout(&self) -> Option<&Layout<DashboardContent>> {
        match self.content()? {
            DashboardContent::Layout(layout) => Some(layout),
            DashboardContent::Widget(_) | DashboardContent::WidgetDefinition(_) => None,
        }
    }

    fn widget_kind(&self) -> Option<&WidgetKind> {
        self.content()?.widget_kind()
    }
}
