//! Outbound-call usage counters bucketed by day, hour and minute.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{Symbol, TradingDate, UsageError};

/// Default number of calendar days kept by [`UsageTracker`].
pub const DEFAULT_RETENTION_DAYS: usize = 30;

#[derive(Debug, Default, Clone)]
struct DayUsage {
    total: u64,
    by_hour: HashMap<u8, u64>,
    by_minute: HashMap<(u8, u8), u64>,
    by_symbol: BTreeMap<String, u64>,
}

/// One tracked day as reported by [`UsageTracker::snapshot`].
///
/// `current_hour` and `current_minute` are looked up at the snapshot's own
/// hour and minute for every day, not at that day's peak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayUsageSummary {
    pub date: TradingDate,
    pub total: u64,
    pub current_hour: u64,
    pub current_minute: u64,
    pub by_symbol: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub days: Vec<DayUsageSummary>,
}

/// Process-wide usage store with a bounded retention window.
#[derive(Debug, Clone)]
pub struct UsageTracker {
    days: Arc<Mutex<BTreeMap<TradingDate, DayUsage>>>,
    retention_days: usize,
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_DAYS)
    }
}

impl UsageTracker {
    /// `retention_days` is clamped to at least one day.
    pub fn new(retention_days: usize) -> Self {
        Self {
            days: Arc::new(Mutex::new(BTreeMap::new())),
            retention_days: retention_days.max(1),
        }
    }

    pub fn record(&self, symbol: &Symbol, now: OffsetDateTime) -> Result<(), UsageError> {
        let now = now.to_offset(UtcOffset::UTC);
        let day = TradingDate::from_date(now.date());
        let (hour, minute) = (now.hour(), now.minute());

        let mut days = self.days.lock().map_err(|_| UsageError::Poisoned)?;
        let usage = days.entry(day).or_default();
        usage.total += 1;
        *usage.by_hour.entry(hour).or_default() += 1;
        *usage.by_minute.entry((hour, minute)).or_default() += 1;
        *usage.by_symbol.entry(symbol.as_str().to_owned()).or_default() += 1;

        while days.len() > self.retention_days {
            if days.pop_first().is_none() {
                break;
            }
        }

        Ok(())
    }

    pub fn snapshot(&self, now: OffsetDateTime) -> Result<UsageSnapshot, UsageError> {
        let now = now.to_offset(UtcOffset::UTC);
        let (hour, minute) = (now.hour(), now.minute());

        let days = self.days.lock().map_err(|_| UsageError::Poisoned)?;
        let days = days
            .iter()
            .map(|(date, usage)| DayUsageSummary {
                date: *date,
                total: usage.total,
                current_hour: usage.by_hour.get(&hour).copied().unwrap_or(0),
                current_minute: usage.by_minute.get(&(hour, minute)).copied().unwrap_or(0),
                by_symbol: usage.by_symbol.clone(),
            })
            .collect();

        Ok(UsageSnapshot { days })
    }
}
