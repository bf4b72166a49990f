//! Raw fluid layout data model.
//!
//! A layout is a passive two-level tree: [`Layout`] → [`Row`] → [`Column`],
//! where each column optionally carries an opaque `C` payload. Children are
//! held behind [`Arc`] so that successive snapshots produced by the builders
//! share every subtree they did not touch.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Responsive screen classes, ordered from smallest to largest.
///
/// | Breakpoint | Typical container |
/// |------------|-------------------|
/// | `Xs`       | phones            |
/// | `Sm`       | small tablets     |
/// | `Md`       | tablets           |
/// | `Lg`       | laptops           |
/// | `Xl`       | desktops          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Extra small: narrowest tier.
    Xs,
    /// Small.
    Sm,
    /// Medium.
    Md,
    /// Large.
    Lg,
    /// Extra large: the only breakpoint every column must size.
    Xl,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    /// Short label, identical to the JSON key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }

    /// Parse a label, ignoring surrounding whitespace and case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|bp| bp.label().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discriminant carried by every serialized layout (`"type": "fluidLayout"`).
///
/// A single-variant enum so that deserializing any other tag fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutType {
    #[default]
    #[serde(rename = "fluidLayout")]
    FluidLayout,
}

impl LayoutType {
    /// Wire value of the discriminant.
    pub const TAG: &'static str = "fluidLayout";
}

/// Size of a column (or of a whole layout) for one screen class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    /// Width as a number of grid columns.
    pub width_as_grid_columns_count: u32,
    /// Height as a percentage of the width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_as_ratio: Option<f64>,
    /// Explicit height as a number of grid rows. Takes precedence over the ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_height: Option<u32>,
}

impl Size {
    /// Size spanning `width` grid columns with no explicit height.
    #[must_use]
    pub const fn columns(width: u32) -> Self {
        Self {
            width_as_grid_columns_count: width,
            height_as_ratio: None,
            grid_height: None,
        }
    }

    /// Set the height as a percentage of the width.
    #[must_use]
    pub const fn with_height_as_ratio(mut self, ratio: f64) -> Self {
        self.height_as_ratio = Some(ratio);
        self
    }

    /// Set the height as a number of grid rows.
    #[must_use]
    pub const fn with_grid_height(mut self, rows: u32) -> Self {
        self.grid_height = Some(rows);
        self
    }
}

/// Per-breakpoint column size. Only `xl` is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeByScreen {
    pub xl: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<Size>,
}

impl SizeByScreen {
    /// Sizing that only defines the mandatory xl entry.
    #[must_use]
    pub const fn from_xl(xl: Size) -> Self {
        Self {
            xl,
            lg: None,
            md: None,
            sm: None,
            xs: None,
        }
    }

    /// Size for one screen class, if defined.
    #[must_use]
    pub const fn for_screen(&self, screen: Breakpoint) -> Option<Size> {
        match screen {
            Breakpoint::Xl => Some(self.xl),
            Breakpoint::Lg => self.lg,
            Breakpoint::Md => self.md,
            Breakpoint::Sm => self.sm,
            Breakpoint::Xs => self.xs,
        }
    }

    /// Replace the size for one screen class.
    #[must_use]
    pub const fn with_screen(mut self, screen: Breakpoint, size: Size) -> Self {
        match screen {
            Breakpoint::Xl => self.xl = size,
            Breakpoint::Lg => self.lg = Some(size),
            Breakpoint::Md => self.md = Some(size),
            Breakpoint::Sm => self.sm = Some(size),
            Breakpoint::Xs => self.xs = Some(size),
        }
        self
    }
}

/// Optional row header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionHeader {
    /// Header with a title only.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column<C> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<C>,
    pub size: SizeByScreen,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl<C> Column<C> {
    /// Empty column sized for xl only.
    #[must_use]
    pub const fn new(xl: Size) -> Self {
        Self {
            content: None,
            size: SizeByScreen::from_xl(xl),
            style: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: C) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Ordered sequence of columns. Order is rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row<C> {
    pub columns: Vec<Arc<Column<C>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SectionHeader>,
}

impl<C> Row<C> {
    /// Row without columns, header or style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
            style: None,
            header: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: SectionHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Append a column.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<Arc<Column<C>>>) -> Self {
        self.columns.push(column.into());
        self
    }
}

impl<C> Default for Row<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Root of one layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout<C> {
    #[serde(rename = "type")]
    pub layout_type: LayoutType,
    pub rows: Vec<Arc<Row<C>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl<C> Layout<C> {
    /// Layout with no rows.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layout_type: LayoutType::FluidLayout,
            rows: Vec::new(),
            size: None,
            style: None,
        }
    }

    /// Append a row.
    #[must_use]
    pub fn with_row(mut self, row: impl Into<Arc<Row<C>>>) -> Self {
        self.rows.push(row.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Layout hosting a single row. Used to give detached rows a parent.
    pub(crate) fn hosting(row: Arc<Row<C>>) -> Self {
        Self::new().with_row(row)
    }

    /// Copy of this layout with the row at `index` replaced.
    pub(crate) fn replacing_row(&self, index: usize, row: Arc<Row<C>>) -> Self {
        let mut rows = self.rows.clone();
        if let Some(slot) = rows.get_mut(index) {
            *slot = row;
        }
        Self {
            layout_type: self.layout_type,
            rows,
            size: self.size,
            style: self.style.clone(),
        }
    }
}

impl<C> Default for Layout<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Row<C> {
    /// Copy of this row with the column at `index` replaced.
    pub(crate) fn replacing_column(&self, index: usize, column: Arc<Column<C>>) -> Self {
        let mut columns = self.columns.clone();
        if let Some(slot) = columns.get_mut(index) {
            *slot = column;
        }
        Self {
            columns,
            style: self.style.clone(),
            header: self.header.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn breakpoint_parse_is_case_insensitive() {
        assert_eq!(Breakpoint::parse(" XL "), Some(Breakpoint::Xl));
        assert_eq!(Breakpoint::parse("md"), Some(Breakpoint::Md));
        assert_eq!(Breakpoint::parse("xxl"), None);
    }

    #[test]
    fn breakpoints_are_ordered() {
        assert!(Breakpoint::Xs < Breakpoint::Sm);
        assert!(Breakpoint::Lg < Breakpoint::Xl);
        assert_eq!(Breakpoint::ALL.len(), 5);
    }

    #[test]
    fn size_by_screen_falls_back_to_none() {
        let size =
            SizeByScreen::from_xl(Size::columns(6)).with_screen(Breakpoint::Xs, Size::columns(12));
        assert_eq!(size.for_screen(Breakpoint::Xl), Some(Size::columns(6)));
        assert_eq!(size.for_screen(Breakpoint::Xs), Some(Size::columns(12)));
        assert_eq!(size.for_screen(Breakpoint::Md), None);
    }

    #[test]
    fn with_screen_xl_replaces_mandatory_entry() {
        let size =
            SizeByScreen::from_xl(Size::columns(6)).with_screen(Breakpoint::Xl, Size::columns(3));
        assert_eq!(size.xl, Size::columns(3));
    }

    #[test]
    fn layout_serializes_with_camel_case_and_tag() {
        let layout: Layout<String> = Layout::new().with_row(
            Row::new()
                .with_header(SectionHeader::titled("Sales"))
                .with_column(
                    Column::new(Size::columns(12).with_height_as_ratio(50.0))
                        .with_content("kpi".to_string()),
                ),
        );

        let value = serde_json::to_value(&layout).expect("layout serializes");
        assert_eq!(
            value,
            json!({
                "type": "fluidLayout",
                "rows": [{
                    "header": { "title": "Sales" },
                    "columns": [{
                        "content": "kpi",
                        "size": { "xl": { "widthAsGridColumnsCount": 12, "heightAsRatio": 50.0 } }
                    }]
                }]
            })
        );
    }

    #[test]
    fn unknown_discriminant_is_rejected() {
        let value = json!({ "type": "yolo", "rows": [] });
        assert!(serde_json::from_value::<Layout<String>>(value).is_err());
    }

    #[test]
    fn replacing_row_keeps_siblings() {
        let first = Arc::new(Row::<u8>::new());
        let second = Arc::new(Row::<u8>::new());
        let layout = Layout::new()
            .with_row(first.clone())
            .with_row(second.clone());

        let replacement = Arc::new(Row::new().with_header(SectionHeader::titled("new")));
        let updated = layout.replacing_row(1, replacement.clone());

        assert!(Arc::ptr_eq(&updated.rows[0], &first));
        assert!(Arc::ptr_eq(&updated.rows[1], &replacement));
        assert!(Arc::ptr_eq(&layout.rows[1], &second));
    }
}
