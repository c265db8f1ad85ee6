//! Report renderers
//!
//! Every renderer is a pure function of a dataset snapshot, a generation
//! timestamp and (where money is shown) [`Pricing`]. Identical inputs produce
//! identical output.

use chrono::{DateTime, Utc};

use crate::config::ReportConfig;
use crate::dataset::Dataset;

pub mod html;
pub mod printable;

pub use html::render_html;
pub use printable::render_printable;

/// Flat ticket pricing used for revenue estimates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    pub unit_price: u64,
    pub currency: String,
}

impl Default for Pricing {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for Pricing {
    fn from(config: &ReportConfig) -> Self {
        Self {
            unit_price: config.unit_price,
            currency: config.currency.clone(),
        }
    }
}

impl Pricing {
    /// Price of `tickets` tickets. Saturates at `u64::MAX`.
    pub fn amount(&self, tickets: usize) -> String {
        let total = (tickets as u64).saturating_mul(self.unit_price);
        format!("{} {}", total, self.currency)
    }
}

/// Aggregate figures shared by the printable and summary reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStats {
    pub films: usize,
    pub sessions: usize,
    pub tickets: usize,
    pub sold: usize,
    pub reserved: usize,
}

impl ReportStats {
    pub fn of(dataset: &Dataset) -> Self {
        let counts = dataset.counts();
        Self {
            films: counts.films,
            sessions: counts.sessions,
            tickets: counts.tickets,
            sold: dataset.sold_tickets(),
            reserved: dataset.reserved_tickets(),
        }
    }

    /// Tickets that would be paid for if every reservation is bought
    pub fn committed(&self) -> usize {
        self.sold + self.reserved
    }
}

pub(crate) fn format_timestamp(generated_at: &DateTime<Utc>) -> String {
    generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Plain-text quick report
pub fn render_summary(dataset: &Dataset, generated_at: DateTime<Utc>, pricing: &Pricing) -> String {
    let stats = ReportStats::of(dataset);
    format!(
        "CINEMA REPORT\n\
         \n\
         Films: {}\n\
         Sessions: {}\n\
         Tickets: {}\n\
         Sold tickets: {}\n\
         Income: {}\n\
         \n\
         Report generated: {}\n",
        stats.films,
        stats.sessions,
        stats.tickets,
        stats.sold,
        pricing.amount(stats.sold),
        format_timestamp(&generated_at)
    )
}
