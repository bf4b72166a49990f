//! Depth-first traversal through layouts nested in column content.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Column, Layout, Row};

/// Content types that may hold a nested layout.
pub trait LayoutContent: Sized {
    /// The nested layout, when this content is one.
    fn as_layout(&self) -> Option<&Layout<Self>>;

    /// Wrap a layout as content.
    fn from_layout(layout: Layout<Self>) -> Self;
}

/// One step of a [`LayoutPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Structural path from a root layout, e.g. `rows[0].columns[1].content`.
///
/// Serializes as a flat array: `["rows", 0, "columns", 1, "content"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutPath(Vec<PathSegment>);

impl LayoutPath {
    /// Empty path addressing the root layout.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Child path `self.key`.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    /// Child path `self.key[index]`.
    #[must_use]
    pub fn keyed_index(&self, key: &str, index: usize) -> Self {
        let mut path = self.key(key);
        path.0.push(PathSegment::Index(index));
        path
    }
}

impl fmt::Display for LayoutPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Callbacks invoked by [`walk_layout`]. Every method defaults to a no-op.
pub trait LayoutVisitor<C> {
    fn visit_row(&mut self, _row: &Row<C>, _path: &LayoutPath) {}

    fn visit_column(&mut self, _column: &Column<C>, _path: &LayoutPath) {}

    /// Called for column content that is not a nested layout.
    fn visit_content(&mut self, _content: &C, _path: &LayoutPath) {}
}

/// Visit every row, column and leaf content, descending into nested layouts.
///
/// Rows are visited before their columns; a column is visited before its
/// content.
pub fn walk_layout<C, V>(layout: &Layout<C>, visitor: &mut V, start: &LayoutPath)
where
    C: LayoutContent,
    V: LayoutVisitor<C> + ?Sized,
{
    for (row_index, row) in layout.rows.iter().enumerate() {
        let row_path = start.keyed_index("rows", row_index);
        visitor.visit_row(row, &row_path);
        for (column_index, column) in row.columns.iter().enumerate() {
            let column_path = row_path.keyed_index("columns", column_index);
            visitor.visit_column(column, &column_path);
            let Some(content) = &column.content else {
                continue;
            };
            let content_path = column_path.key("content");
            match content.as_layout() {
                Some(nested) => walk_layout(nested, visitor, &content_path),
                None => visitor.visit_content(content, &content_path),
            }
        }
    }
}

type Callback<'a, T> = Box<dyn FnMut(&T, &LayoutPath) + 'a>;

/// [`LayoutVisitor`] assembled from closures.
///
/// ```
/// use bisdk_layout::{Column, Layout, LayoutContent, LayoutPath, LayoutWalker, Row, Size};
///
/// #[derive(Clone)]
/// enum Cell {
///     Text(String),
///     Nested(Layout<Cell>),
/// }
///
/// impl LayoutContent for Cell {
///     fn as_layout(&self) -> Option<&Layout<Self>> {
///         match self {
///             Cell::Nested(layout) => Some(layout),
///             Cell::Text(_) => None,
///         }
///     }
///
///     fn from_layout(layout: Layout<Self>) -> Self {
///         Cell::Nested(layout)
///     }
/// }
///
/// let deep = Column::new(Size::columns(6)).with_content(Cell::Text("deep".into()));
/// let inner = Layout::new().with_row(Row::new().with_column(deep));
/// let outer = Layout::new().with_row(
///     Row::new().with_column(Column::new(Size::columns(12)).with_content(Cell::Nested(inner))),
/// );
///
/// let mut paths = Vec::new();
/// LayoutWalker::new()
///     .on_content(|_: &Cell, path: &LayoutPath| paths.push(path.to_string()))
///     .walk(&outer, &LayoutPath::root());
/// assert_eq!(paths, vec!["rows[0].columns[0].content.rows[0].columns[0].content"]);
/// ```
pub struct LayoutWalker<'a, C> {
    row: Option<Callback<'a, Row<C>>>,
    column: Option<Callback<'a, Column<C>>>,
    content: Option<Callback<'a, C>>,
}

impl<'a, C> LayoutWalker<'a, C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            row: None,
            column: None,
            content: None,
        }
    }

    #[must_use]
    pub fn on_row(mut self, f: impl FnMut(&Row<C>, &LayoutPath) + 'a) -> Self {
        self.row = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_column(mut self, f: impl FnMut(&Column<C>, &LayoutPath) + 'a) -> Self {
        self.column = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_content(mut self, f: impl FnMut(&C, &LayoutPath) + 'a) -> Self {
        self.content = Some(Box::new(f));
        self
    }

    /// Walk `layout`, consuming the walker.
    pub fn walk(mut self, layout: &Layout<C>, start: &LayoutPath)
    where
        C: LayoutContent,
    {
        walk_layout(layout, &mut self, start);
    }
}

impl<C> Default for LayoutWalker<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> LayoutVisitor<C> for LayoutWalker<'_, C> {
    fn visit_row(&mut self, row: &Row<C>, path: &LayoutPath) {
        if let Some(callback) = self.row.as_mut() {
            callback(row, path);
        }
    }

    fn visit_column(&mut self, column: &Column<C>, path: &LayoutPath) {
        if let Some(callback) = self.column.as_mut() {
            callback(column, path);
        }
    }

    fn visit_content(&mut self, content: &C, path: &LayoutPath) {
        if let Some(callback) = self.content.as_mut() {
            callback(content, path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;

    #[derive(Debug, Clone, PartialEq)]
    enum Cell {
        Leaf(u8),
        Nested(Layout<Cell>),
    }

    impl LayoutContent for Cell {
        fn as_layout(&self) -> Option<&Layout<Self>> {
            match self {
                Cell::Nested(layout) => Some(layout),
                Cell::Leaf(_) => None,
            }
        }

        fn from_layout(layout: Layout<Self>) -> Self {
            Cell::Nested(layout)
        }
    }

    fn leaf(value: u8) -> Column<Cell> {
        Column::new(Size::columns(6)).with_content(Cell::Leaf(value))
    }

    fn sample() -> Layout<Cell> {
        let nested = Layout::new().with_row(Row::new().with_column(leaf(2)).with_column(leaf(3)));
        Layout::new()
            .with_row(Row::new().with_column(leaf(1)))
            .with_row(
                Row::new()
                    .with_column(
                        Column::new(Size::columns(12)).with_content(Cell::Nested(nested)),
                    )
                    .with_column(Column::new(Size::columns(12))),
            )
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl LayoutVisitor<Cell> for Recorder {
        fn visit_row(&mut self, _row: &Row<Cell>, path: &LayoutPath) {
            self.events.push(format!("row {path}"));
        }

        fn visit_column(&mut self, _column: &Column<Cell>, path: &LayoutPath) {
            self.events.push(format!("column {path}"));
        }

        fn visit_content(&mut self, content: &Cell, path: &LayoutPath) {
            if let Cell::Leaf(value) = content {
                self.events.push(format!("leaf {value} {path}"));
            }
        }
    }

    #[test]
    fn visits_depth_first_with_paths() {
        let mut recorder = Recorder::default();
        walk_layout(&sample(), &mut recorder, &LayoutPath::root());
        assert_eq!(
            recorder.events,
            vec![
                "row rows[0]",
                "column rows[0].columns[0]",
                "leaf 1 rows[0].columns[0].content",
                "row rows[1]",
                "column rows[1].columns[0]",
                "row rows[1].columns[0].content.rows[0]",
                "column rows[1].columns[0].content.rows[0].columns[0]",
                "leaf 2 rows[1].columns[0].content.rows[0].columns[0].content",
                "column rows[1].columns[0].content.rows[0].columns[1]",
                "leaf 3 rows[1].columns[0].content.rows[0].columns[1].content",
                "column rows[1].columns[1]",
            ]
        );
    }

    #[test]
    fn start_path_prefixes_every_path() {
        let start = LayoutPath::root().keyed_index("sections", 4);
        let mut rows = Vec::new();
        LayoutWalker::new()
            .on_row(|_: &Row<Cell>, path: &LayoutPath| {
                rows.push(path.to_string());
            })
            .walk(&sample(), &start);
        assert_eq!(rows[0], "sections[4].rows[0]");
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn path_serializes_as_flat_array() {
        let path = LayoutPath::root()
            .keyed_index("rows", 0)
            .keyed_index("columns", 1)
            .key("content");
        assert_eq!(
            serde_json::to_value(&path).expect("path serializes"),
            serde_json::json!(["rows", 0, "columns", 1, "content"])
        );
        let parsed: LayoutPath =
            serde_json::from_value(serde_json::json!(["rows", 2])).expect("path parses");
        assert_eq!(parsed.to_string(), "rows[2]");
    }

    #[test]
    fn walker_without_callbacks_is_inert() {
        LayoutWalker::<Cell>::default().walk(&sample(), &LayoutPath::root());
    }
}
