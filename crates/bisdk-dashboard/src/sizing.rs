//! Responsive sizing of dashboard columns.
//!
//! Column sizes are authored for the `xl` screen only. The helpers here
//! derive the smaller screens from that, group a row's columns the way the
//! grid wraps them, and equalize column heights inside each rendered line.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use bisdk_layout::{
    Breakpoint, Column, ColumnFacade, GridConfig, Layout, LayoutBuilder, LayoutContent,
    LayoutFacade, Size, SizeByScreen, ValueOrUpdate,
};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::content::DashboardContent;

/// Sizing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    /// The xl width has no entry in the responsive width table.
    UnsupportedWidth { width: u32 },
    /// A column lacks a size for the screen being laid out.
    MissingScreenSize { screen: Breakpoint, column: usize },
}

impl fmt::Display for SizingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedWidth { width } => {
                write!(
                    f,
                    "unsupported xl width {width}: expected 0 to 12 grid columns"
                )
            }
            Self::MissingScreenSize { screen, column } => {
                write!(f, "column {column} has no size for the {screen} screen")
            }
        }
    }
}

impl std::error::Error for SizingError {}

/// Derive sizes for every screen from the xl size.
///
/// | xl    | lg | md | sm | xs |
/// |-------|----|----|----|----|
/// | 1     | 1  | 2  | 6  | 12 |
/// | 2     | 2  | 4  | 6  | 12 |
/// | 3..=9 | xl | 6  | 12 | 12 |
/// | 10..  | xl | 12 | 12 | 12 |
///
/// Every screen keeps the xl height: the grid height when one is set,
/// otherwise the ratio. A zero width collapses all screens to width and
/// ratio zero.
pub fn implicit_size_from_xl(xl: Size) -> Result<SizeByScreen, SizingError> {
    let width = xl.width_as_grid_columns_count;
    let (lg, md, sm, xs) = match width {
        0 => {
            let collapsed = Size::columns(0).with_height_as_ratio(0.0);
            return Ok(SizeByScreen {
                xl: collapsed,
                lg: Some(collapsed),
                md: Some(collapsed),
                sm: Some(collapsed),
                xs: Some(collapsed),
            });
        }
        1 => (1, 2, 6, 12),
        2 => (2, 4, 6, 12),
        3..=9 => (width, 6, 12, 12),
        10..=12 => (width, 12, 12, 12),
        _ => return Err(SizingError::UnsupportedWidth { width }),
    };

    let sized = |width: u32| match xl.grid_height.filter(|rows| *rows > 0) {
        Some(rows) => Size::columns(width).with_grid_height(rows),
        None => Size {
            width_as_grid_columns_count: width,
            height_as_ratio: xl.height_as_ratio,
            grid_height: None,
        },
    };
    Ok(SizeByScreen {
        xl: sized(width),
        lg: Some(sized(lg)),
        md: Some(sized(md)),
        sm: Some(sized(sm)),
        xs: Some(sized(xs)),
    })
}

/// Group columns into the lines the grid renders for `screen`.
///
/// A line wraps when the next column would overflow the grid. A column wider
/// than the grid gets a line of its own.
pub fn split_as_rendered_grid_rows<C>(
    columns: &[Arc<Column<C>>],
    screen: Breakpoint,
    config: &GridConfig,
) -> Result<Vec<Range<usize>>, SizingError> {
    rendered_lines(
        columns.iter().map(|column| column.size.for_screen(screen)),
        screen,
        config.columns_count,
    )
}

fn rendered_lines(
    sizes: impl IntoIterator<Item = Option<Size>>,
    screen: Breakpoint,
    columns_count: u32,
) -> Result<Vec<Range<usize>>, SizingError> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut end = 0;
    let mut line_width = 0u32;

    for (index, size) in sizes.into_iter().enumerate() {
        let Some(size) = size else {
            return Err(SizingError::MissingScreenSize {
                screen,
                column: index,
            });
        };
        let width = size.width_as_grid_columns_count;
        if line_width.saturating_add(width) > columns_count && index > start {
            lines.push(start..index);
            start = index;
            line_width = 0;
        }
        line_width = line_width.saturating_add(width);
        end = index + 1;
    }
    if end > start {
        lines.push(start..end);
    }
    Ok(lines)
}

/// Rendered height of a column on one screen.
///
/// Grid heights are converted to pixels; ratio heights stay in width units.
fn rendered_height(size: Option<Size>, config: &GridConfig) -> f64 {
    let Some(size) = size else {
        return 0.0;
    };
    let width = size.width_as_grid_columns_count;
    if width == 0 {
        return 0.0;
    }
    match size.grid_height.filter(|rows| *rows > 0) {
        Some(rows) => f64::from(rows) * f64::from(config.row_height_px),
        None => f64::from(width) * size.height_as_ratio.unwrap_or(0.0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn unify_line(sizes: &mut [SizeByScreen], screen: Breakpoint, config: &GridConfig) {
    let tallest = sizes
        .iter()
        .map(|size| rendered_height(size.for_screen(screen), config))
        .fold(0.0, f64::max);
    if tallest <= 0.0 {
        return;
    }

    for size in sizes.iter_mut() {
        let Some(current) = size.for_screen(screen) else {
            continue;
        };
        let ratio = match current.width_as_grid_columns_count {
            0 => 0.0,
            width => round2(tallest / f64::from(width)),
        };
        let mut updated = current;
        let ratio_driven = current.grid_height.is_none_or(|rows| rows == 0);
        if ratio_driven && current.height_as_ratio.is_some_and(|existing| existing != ratio) {
            updated.height_as_ratio = Some(ratio);
        }
        if screen == Breakpoint::Xs && ratio > config.max_height_as_ratio_xs {
            updated.height_as_ratio = Some(config.max_height_as_ratio_xs);
        }
        *size = size.with_screen(screen, updated);
    }
}

/// Sizes of one row after expanding xl and equalizing heights per line.
fn unified_row_sizes(
    sizes: impl IntoIterator<Item = SizeByScreen>,
    config: &GridConfig,
) -> Result<Vec<SizeByScreen>, SizingError> {
    let mut sizes = sizes
        .into_iter()
        .map(|size| implicit_size_from_xl(size.xl))
        .collect::<Result<Vec<_>, _>>()?;

    for screen in Breakpoint::ALL {
        let lines = rendered_lines(
            sizes.iter().map(|size| size.for_screen(screen)),
            screen,
            config.columns_count,
        )?;
        for line in lines {
            if let Some(line) = sizes.get_mut(line) {
                unify_line(line, screen, config);
            }
        }
    }
    Ok(sizes)
}

/// Give every column a size for all screens and make columns rendered on the
/// same grid line equally tall.
///
/// Columns whose size does not change keep their identity. Nested layouts are
/// left as they are.
pub fn unify_column_heights<C: Clone>(
    layout: &Arc<Layout<C>>,
    config: &GridConfig,
) -> Result<Arc<Layout<C>>, SizingError> {
    let unified = layout
        .rows
        .iter()
        .map(|row| {
            let sizes = row.columns.iter().map(|column| column.size);
            unified_row_sizes(sizes, config)
        })
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "tracing")]
    debug!(rows = unified.len(), "unify column heights");

    let updated = LayoutBuilder::for_layout(Arc::clone(layout)).modify_all_rows(|row, row_facade| {
        let Some(sizes) = unified.get(row_facade.index()) else {
            return row;
        };
        row.modify_columns(
            |column, facade| match sizes.get(facade.index()) {
                Some(size) => column.size(*size),
                None => column,
            },
            |columns| {
                columns.filter(|column| {
                    sizes
                        .get(column.index())
                        .is_some_and(|size| size != column.size())
                })
            },
        )
    });
    Ok(updated.build())
}

/// Widest the column may grow on `screen` without wrapping to a new line.
///
/// A column that already starts a wrapped line may take the whole grid.
pub fn column_max_grid_width<C>(
    column: &ColumnFacade<C>,
    screen: Breakpoint,
    config: &GridConfig,
) -> Result<u32, SizingError> {
    let grid = config.columns_count;
    let row = column.row();
    let siblings = row.columns();
    let mut line_width = 0u32;

    for sibling in &siblings {
        let width = sibling
            .size_for_screen(screen)
            .ok_or(SizingError::MissingScreenSize {
                screen,
                column: sibling.index(),
            })?
            .width_as_grid_columns_count;
        let widened = line_width.saturating_add(width);
        let is_target = sibling.index() == column.index();
        if widened <= grid {
            if is_target {
                break;
            }
            line_width = widened;
        } else {
            if is_target {
                return Ok(grid);
            }
            line_width = width;
        }
    }
    Ok(grid.saturating_sub(line_width))
}

/// Pixel height of a ratio-sized column on `screen`. A missing ratio counts
/// as 1%.
#[must_use]
pub fn column_height_px_for_ratio(size: &Size, screen: Breakpoint, config: &GridConfig) -> f64 {
    let ratio = size.height_as_ratio.unwrap_or(1.0);
    let width = f64::from(size.width_as_grid_columns_count);
    config.grid_column_width_px(screen) * width * (ratio / 100.0)
}

/// Copy of `layout` with the xl grid height dropped from every column,
/// nested layouts included.
pub fn layout_without_grid_heights<C>(layout: &Arc<Layout<C>>) -> Arc<Layout<C>>
where
    C: LayoutContent + Clone,
{
    LayoutBuilder::for_layout(Arc::clone(layout))
        .modify_all_rows(|row, _| {
            row.modify_all_columns(|column, facade| {
                if let Some(nested) = facade.content().and_then(LayoutContent::as_layout) {
                    let stripped = layout_without_grid_heights(&Arc::new(nested.clone()));
                    return column.content(Some(C::from_layout(Arc::unwrap_or_clone(stripped))));
                }
                if facade.size().xl.grid_height.is_none() {
                    return column;
                }
                column.size(ValueOrUpdate::update(|mut size: SizeByScreen| {
                    size.xl.grid_height = None;
                    size
                }))
            })
        })
        .build()
}

/// Positions `(row, column)` of widgets whose size differs between two
/// versions of a dashboard layout.
///
/// Columns holding nested layouts on both sides are compared recursively;
/// their positions are relative to the nested layout. Columns present on one
/// side only are ignored.
#[must_use]
pub fn resized_column_positions(
    original: &Layout<DashboardContent>,
    resized: &Layout<DashboardContent>,
) -> Vec<(usize, usize)> {
    let mut positions = Vec::new();
    collect_resized(
        &LayoutFacade::new(original.clone()),
        &LayoutFacade::new(resized.clone()),
        &mut positions,
    );
    positions
}

fn collect_resized(
    original: &LayoutFacade<DashboardContent>,
    resized: &LayoutFacade<DashboardContent>,
    positions: &mut Vec<(usize, usize)>,
) {
    for row in &resized.rows() {
        let Some(original_row) = original.row(row.index()) else {
            continue;
        };
        for column in &row.columns() {
            let Some(original_column) = original_row.column(column.index()) else {
                continue;
            };
            let before = original_column.content().and_then(LayoutContent::as_layout);
            let after = column.content().and_then(LayoutContent::as_layout);
            if let (Some(before), Some(after)) = (before, after) {
                collect_resized(
                    &LayoutFacade::new(before.clone()),
                    &LayoutFacade::new(after.clone()),
                    positions,
                );
                continue;
            }
            let widget_like = column
                .content()
                .is_some_and(DashboardContent::is_widget_like);
            if widget_like && original_column.size() != column.size() {
                positions.push((row.index(), column.index()));
            }
        }
    }
}
