// Dashboard session: filter choices, defaults and the per-request view

use crate::compiler;
use crate::config::Config;
use crate::error::ViewError;
use crate::ir::{ChartOutcome, DetailRow, Table};
use crate::report;
use std::collections::HashSet;
use std::sync::Arc;

/// Everything displayed for one filter selection
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub period: String,
    pub chart: ChartOutcome,
    pub details: Vec<DetailRow>,
}

/// Read-only view over the cached table. Cheap to create per session.
pub struct Dashboard {
    table: Arc<Table>,
    config: Config,
    periods: Vec<String>,
    entities: Vec<String>,
}

impl Dashboard {
    pub fn new(table: Arc<Table>, config: Config) -> Self {
        let periods = table.periods();
        let entities = table.entities();
        Dashboard {
            table,
            config,
            periods,
            entities,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Distinct periods, most recent first
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Distinct company names in ascending order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// The configured preferred period when present, otherwise the latest one
    pub fn default_period(&self) -> Option<&str> {
        self.config
            .preferred_period
            .as_deref()
            .and_then(|preferred| self.periods.iter().find(|p| *p == preferred))
            .or_else(|| self.periods.first())
            .map(|p| p.as_str())
    }

    pub fn default_entities(&self) -> HashSet<String> {
        self.entities.iter().cloned().collect()
    }

    /// Chart and detail table for one selection.
    ///
    /// An empty selection is refused before encoding; a selection with no
    /// displayable rows is a normal `ChartOutcome::NoData`.
    pub fn view(&self, period: &str, selected_entities: &HashSet<String>) -> Result<DashboardView, ViewError> {
        if selected_entities.is_empty() {
            return Err(ViewError::EmptySelection);
        }
        if !self.periods.iter().any(|p| p == period) {
            return Err(ViewError::UnknownPeriod {
                period: period.to_string(),
                available: self.periods.join(", "),
            });
        }

        let unknown: Vec<&String> = selected_entities
            .iter()
            .filter(|name| !self.entities.contains(*name))
            .collect();
        if !unknown.is_empty() {
            log::warn!("Selected companies not in the dataset: {:?}", unknown);
        }

        let chart = compiler::encode(&self.table, period, selected_entities, &self.config.labels);
        let details = report::detail_rows(&self.table, period, selected_entities);

        Ok(DashboardView {
            period: period.to_string(),
            chart,
            details,
        })
    }
}
