#![forbid(unsafe_code)]

//! Dashboard layouts: fluid layouts whose columns hold widgets or nested
//! layouts.
//!
//! [`DashboardContent`] plugs into the generic builders and facades of
//! `bisdk-layout`; [`DashboardColumnExt`] adds widget predicates to column
//! facades, and [`sizing`] derives responsive sizes for every screen.
//!
//! # Feature Flags
//!
//! - `tracing`: emit sizing and layout edit events through the `tracing` crate.

pub mod content;
pub mod facade_ext;
pub mod sizing;

pub use content::{DashboardContent, Widget, WidgetDefinition, WidgetKind};
pub use facade_ext::DashboardColumnExt;
pub use sizing::{
    SizingError, column_height_px_for_ratio, column_max_grid_width, implicit_size_from_xl,
    layout_without_grid_heights, resized_column_positions, split_as_rendered_grid_rows,
    unify_column_heights,
};

pub type DashboardLayout = bisdk_layout::Layout<DashboardContent>;
pub type DashboardLayoutBuilder = bisdk_layout::LayoutBuilder<DashboardContent>;
pub type DashboardRowBuilder = bisdk_layout::RowBuilder<DashboardContent>;
pub type DashboardColumnBuilder = bisdk_layout::ColumnBuilder<DashboardContent>;
pub type DashboardLayoutFacade = bisdk_layout::LayoutFacade<DashboardContent>;
pub type DashboardColumnFacade = bisdk_layout::ColumnFacade<DashboardContent>;
