//! Chart specifications handed to the rendering layer.
//!
//! A spec names the chart kind, which result-row fields feed each visual
//! channel, and the title. It carries no data and no styling.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Treemap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Stack,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Hierarchy levels of a treemap, outermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    /// Field sized by area in a treemap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hover_data: Vec<String>,
    /// Display names for fields, keyed by field.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Fixed category sequence per field.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub category_orders: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        ChartSpec {
            kind,
            title: title.into(),
            x: None,
            y: None,
            color: None,
            size: None,
            path: Vec::new(),
            values: None,
            hover_data: Vec::new(),
            labels: BTreeMap::new(),
            category_orders: BTreeMap::new(),
            barmode: None,
        }
    }

    fn xy(kind: ChartKind, title: impl Into<String>, x: &str, y: &str) -> Self {
        let mut spec = Self::new(kind, title);
        spec.x = Some(x.to_string());
        spec.y = Some(y.to_string());
        spec
    }

    pub fn line(title: impl Into<String>, x: &str, y: &str) -> Self {
        Self::xy(ChartKind::Line, title, x, y)
    }

    pub fn bar(title: impl Into<String>, x: &str, y: &str) -> Self {
        Self::xy(ChartKind::Bar, title, x, y)
    }

    pub fn scatter(title: impl Into<String>, x: &str, y: &str) -> Self {
        Self::xy(ChartKind::Scatter, title, x, y)
    }

    pub fn treemap(title: impl Into<String>, path: &[String], values: &str) -> Self {
        let mut spec = Self::new(ChartKind::Treemap, title);
        spec.path = path.to_vec();
        spec.values = Some(values.to_string());
        spec
    }

    pub fn color(mut self, field: &str) -> Self {
        self.color = Some(field.to_string());
        self
    }

    pub fn size(mut self, field: &str) -> Self {
        self.size = Some(field.to_string());
        self
    }

    pub fn hover(mut self, fields: &[&str]) -> Self {
        self.hover_data = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn label(mut self, field: &str, text: &str) -> Self {
        self.labels.insert(field.to_string(), text.to_string());
        self
    }

    pub fn category_order(mut self, field: &str, order: Vec<String>) -> Self {
        self.category_orders.insert(field.to_string(), order);
        self
    }

    pub fn barmode(mut self, mode: BarMode) -> Self {
        self.barmode = Some(mode);
        self
    }
}
