#![forbid(unsafe_code)]

//! Fluid row/column layouts with immutable builders and cached facades.
//!
//! # Layers
//!
//! | Layer    | Types                                              |
//! |----------|----------------------------------------------------|
//! | Model    | [`Layout`], [`Row`], [`Column`], [`SizeByScreen`]  |
//! | Facade   | [`LayoutFacade`], [`RowsFacade`], [`ColumnFacade`] |
//! | Builder  | [`LayoutBuilder`], [`RowBuilder`], [`ColumnBuilder`] |
//! | Walk     | [`walk_layout`], [`LayoutWalker`]                  |
//!
//! Builders produce new snapshots by copy-on-write; facades read one
//! snapshot and go stale when the builder moves on.
//!
//! # Feature Flags
//!
//! - `tracing`: emit structural edit events through the `tracing` crate.

pub mod builder;
pub mod config;
pub mod error;
pub mod facade;
pub mod guards;
pub mod model;
pub mod walk;

pub use builder::{ColumnBuilder, LayoutBuilder, RowBuilder, Selection, ValueOrUpdate};
pub use config::{ContainerWidths, GridConfig, GridConfigError, GridConfigParse};
pub use error::{EditOperation, ElementKind, LayoutError};
pub use facade::{
    ColumnFacade, ColumnFacadeCache, ColumnsFacade, LayoutFacade, RowFacade, RowsFacade,
};
pub use guards::{is_fluid_layout, is_fluid_layout_column, is_fluid_layout_row};
pub use model::{Breakpoint, Column, Layout, LayoutType, Row, SectionHeader, Size, SizeByScreen};
pub use walk::{LayoutContent, LayoutPath, LayoutVisitor, LayoutWalker, PathSegment, walk_layout};
