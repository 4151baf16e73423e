use serde::Serialize;
use std::fmt;

// =============================================================================
// Dataset
// =============================================================================

/// A single spreadsheet cell as loaded from the source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    /// Build a cell from raw text. Blank text is a missing cell.
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Missing
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Cell as text. Whole numbers print without a fractional part, so a
    /// period stored as 20241231.0 reads "20241231".
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => (*v as i64).to_string(),
            Cell::Number(v) => v.to_string(),
            Cell::Missing => String::new(),
        }
    }
}

/// One company in one reporting period
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity_name: String,
    /// Opaque text key (e.g. "20241231"), never compared numerically
    pub period: String,
    /// Percent as stored: 12.5 means 12.5%
    pub net_profit_margin_raw: Cell,
    /// Fraction derived from the raw percent
    pub net_profit_margin: Option<f64>,
    pub asset_turnover: Cell,
    pub return_on_assets_raw: Cell,
    pub return_on_assets: Option<f64>,
}

impl Record {
    /// Record with raw cells only; derived fields are filled by normalization.
    pub fn raw(
        entity_name: impl Into<String>,
        period: impl Into<String>,
        net_profit_margin: Cell,
        asset_turnover: Cell,
        return_on_assets: Cell,
    ) -> Self {
        Record {
            entity_name: entity_name.into(),
            period: period.into(),
            net_profit_margin_raw: net_profit_margin,
            net_profit_margin: None,
            asset_turnover,
            return_on_assets_raw: return_on_assets,
            return_on_assets: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct periods, most recent first (text order)
    pub fn periods(&self) -> Vec<String> {
        let mut periods: Vec<String> = self.records.iter().map(|r| r.period.clone()).collect();
        periods.sort();
        periods.dedup();
        periods.reverse();
        periods
    }

    /// Distinct entity names in ascending order
    pub fn entities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.iter().map(|r| r.entity_name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

// =============================================================================
// Chart specification
// =============================================================================

/// An sRGB color with opacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{:.2})", self.r, self.g, self.b, self.a)
    }
}

/// One bubble: one entity in the selected period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub entity_name: String,
    pub x: f64,
    pub y: f64,
    pub return_on_assets: f64,
    /// Bubble diameter
    pub size: f64,
    /// Position of the value within the filtered min/max, used for color only
    pub color_value: f64,
    pub fill: Rgba,
    pub border: Rgba,
    pub label: String,
    pub font_size: u32,
    pub hover_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub period: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub points: Vec<ChartPoint>,
    pub layout: ChartLayout,
}

/// Fixed presentation settings shared by every rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub height: u32,
    pub border_width: u32,
    pub min_marker_size: f64,
    pub label_color: String,
}

impl Default for ChartLayout {
    fn default() -> Self {
        ChartLayout {
            height: 600,
            border_width: 3,
            min_marker_size: 10.0,
            label_color: "#333333".to_string(),
        }
    }
}

/// Result of encoding a filter selection
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Chart(ChartSpec),
    /// The filter matched no displayable rows
    NoData,
}

impl ChartOutcome {
    pub fn chart(&self) -> Option<&ChartSpec> {
        match self {
            ChartOutcome::Chart(spec) => Some(spec),
            ChartOutcome::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartOutcome::NoData)
    }
}

// =============================================================================
// Detail table
// =============================================================================

/// A filtered row with every metric pre-formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub entity_name: String,
    pub period: String,
    pub net_profit_margin: String,
    pub asset_turnover: String,
    pub return_on_assets: String,
}
