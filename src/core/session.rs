use chrono::NaiveDate;
use tracing::info;

use crate::config::{Config, ConfigError, ConfigManager};
use crate::domain::{PeriodPreset, ReportingPeriod};
use crate::errors::LedgerError;

/// Explicit reporting-period selection for one UI session.
///
/// Changing the selection never touches the stored configuration; only
/// [`Session::save_as_default`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    period: Option<ReportingPeriod>,
}

impl Session {
    /// Resolves the configured default preset against `today`.
    pub fn start(config: &Config, today: NaiveDate) -> Result<Self, LedgerError> {
        let period = config.default_period.resolve(today)?;
        Ok(Self { period })
    }

    pub fn period(&self) -> Option<&ReportingPeriod> {
        self.period.as_ref()
    }

    pub fn select_period(&mut self, period: ReportingPeriod) {
        self.period = Some(period);
    }

    /// Validates the bounds before replacing the selection.
    pub fn select_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<(), LedgerError> {
        self.period = Some(ReportingPeriod::new(from, to)?);
        Ok(())
    }

    pub fn select_preset(&mut self, preset: PeriodPreset, today: NaiveDate) -> Result<(), LedgerError> {
        self.period = preset.resolve(today)?;
        Ok(())
    }

    /// Back to "all history".
    pub fn clear_period(&mut self) {
        self.period = None;
    }

    /// Stores the current selection as the default for future sessions.
    pub fn save_as_default(
        &self,
        manager: &ConfigManager,
        config: &mut Config,
    ) -> Result<(), ConfigError> {
        config.default_period = match self.period {
            Some(period) => PeriodPreset::from(period),
            None => PeriodPreset::AllHistory,
        };
        manager.save(config)?;
        info!(preset = ?config.default_period, "default reporting period saved");
        Ok(())
    }
}
