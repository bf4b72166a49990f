//! Column content of dashboard layouts.

use serde::{Deserialize, Serialize};

use bisdk_layout::{Layout, LayoutContent};

/// What a widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetKind {
    /// Visualization of a saved insight.
    Insight { insight: String },
    /// Single measure headline.
    Kpi { measure: String },
}

impl WidgetKind {
    /// Identifier of the referenced insight, if any.
    #[must_use]
    pub fn insight_ref(&self) -> Option<&str> {
        match self {
            Self::Insight { insight } => Some(insight),
            Self::Kpi { .. } => None,
        }
    }
}

/// Persisted widget, identified by `ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "ref")]
    pub widget_ref: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

/// Widget not yet persisted, so without identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDefinition {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

/// Payload of a dashboard layout column.
///
/// Deserialization tries a nested layout first, then a persisted widget,
/// then a widget definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardContent {
    Layout(Layout<DashboardContent>),
    Widget(Widget),
    WidgetDefinition(WidgetDefinition),
}

impl DashboardContent {
    /// Kind of the widget or widget definition.
    #[must_use]
    pub fn widget_kind(&self) -> Option<&WidgetKind> {
        match self {
            Self::Widget(widget) => Some(&widget.kind),
            Self::WidgetDefinition(definition) => Some(&definition.kind),
            Self::Layout(_) => None,
        }
    }

    /// `true` for widgets and widget definitions.
    #[must_use]
    pub fn is_widget_like(&self) -> bool {
        self.widget_kind().is_some()
    }
}

impl LayoutContent for DashboardContent {
    fn as_layout(&self) -> Option<&Layout<Self>> {
        match self {
            Self::Layout(layout) => Some(layout),
            Self::Widget(_) | Self::WidgetDefinition(_) => None,
        }
    }

    fn from_layout(layout: Layout<Self>) -> Self {
        Self::Layout(layout)
    }
}

impl From<Widget> for DashboardContent {
    fn from(widget: Widget) -> Self {
        Self::Widget(widget)
    }
}

impl From<WidgetDefinition> for DashboardContent {
    fn from(definition: WidgetDefinition) -> Self {
        Self::WidgetDefinition(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bisdk_layout::{Column, Row};
    use serde_json::json;

    #[test]
    fn widget_json_shape() {
        let content = DashboardContent::from(Widget {
            widget_ref: "w1".into(),
            title: "Revenue".into(),
            description: String::new(),
            kind: WidgetKind::Kpi {
                measure: "m-revenue".into(),
            },
        });
        assert_eq!(
            serde_json::to_value(&content).expect("serializes"),
            json!({ "ref": "w1", "title": "Revenue", "type": "kpi", "measure": "m-revenue" })
        );
    }

    #[test]
    fn untagged_decoding_picks_the_right_variant() {
        let widget: DashboardContent = serde_json::from_value(json!({
            "ref": "w1", "title": "A", "type": "insight", "insight": "i1"
        }))
        .expect("widget");
        assert!(matches!(widget, DashboardContent::Widget(_)));

        let definition: DashboardContent = serde_json::from_value(json!({
            "title": "B", "type": "kpi", "measure": "m1"
        }))
        .expect("definition");
        assert!(matches!(definition, DashboardContent::WidgetDefinition(_)));

        let nested: DashboardContent =
            serde_json::from_value(json!({ "type": "fluidLayout", "rows": [] })).expect("layout");
        assert!(nested.as_layout().is_some());
        assert!(!nested.is_widget_like());
    }

    #[test]
    fn unknown_content_is_rejected() {
        let parsed = serde_json::from_value::<DashboardContent>(json!({ "type": "richText" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn insight_ref_only_for_insights() {
        let insight = WidgetKind::Insight {
            insight: "i1".into(),
        };
        let kpi = WidgetKind::Kpi {
            measure: "m".into(),
        };
        assert_eq!(insight.insight_ref(), Some("i1"));
        assert_eq!(kpi.insight_ref(), None);
    }

    #[test]
    fn empty_dashboard_columns_decode() {
        let column = Column::<DashboardContent>::from_value(json!({
            "size": { "xl": { "widthAsGridColumnsCount": 6 } }
        }))
        .expect("column without content");
        assert!(column.content.is_none());

        let row = Row::<DashboardContent>::from_value(json!({
            "columns": [
                { "size": { "xl": { "widthAsGridColumnsCount": 6 } } },
                {
                    "size": { "xl": { "widthAsGridColumnsCount": 6 } },
                    "content": { "title": "B", "type": "kpi", "measure": "m1" }
                }
            ]
        }))
        .expect("row with an empty column");
        assert!(row.columns[0].content.is_none());
        let second = row.columns[1].content.as_ref();
        assert!(second.is_some_and(DashboardContent::is_widget_like));
    }
}
