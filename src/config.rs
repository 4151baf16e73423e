use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "./服装行业总资产报酬率数据.xlsx";
pub const DEFAULT_PREFERRED_PERIOD: &str = "20241231";

/// Dashboard settings, optionally loaded from a TOML file.
/// Every field falls back to the values the apparel dataset ships with.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_path: PathBuf,
    pub preferred_period: Option<String>,
    pub columns: ColumnMapping,
    pub labels: ChartLabels,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            preferred_period: Some(DEFAULT_PREFERRED_PERIOD.to_string()),
            columns: ColumnMapping::default(),
            labels: ChartLabels::default(),
        }
    }
}

/// Header names of the five required dataset columns
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnMapping {
    pub entity_name: String,
    pub period: String,
    pub net_profit_margin: String,
    pub asset_turnover: String,
    pub return_on_assets: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            entity_name: "股票名称".to_string(),
            period: "报告期".to_string(),
            net_profit_margin: "销售净利率".to_string(),
            asset_turnover: "总资产周转率".to_string(),
            return_on_assets: "总资产净利率".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    /// Hover text name of the y metric
    pub margin_metric: String,
    /// Hover text name of the bubble metric
    pub size_metric: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        ChartLabels {
            title: "服装行业总资产收益率分析".to_string(),
            x_axis: "总资产周转率".to_string(),
            y_axis: "销售净利率 (%)".to_string(),
            margin_metric: "销售净利率".to_string(),
            size_metric: "总资产净利率".to_string(),
        }
    }
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
        path: file_path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: file_path.to_path_buf(),
        source,
    })
}

pub fn parse_config(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(contents)
}
