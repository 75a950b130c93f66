//! SST (Sales and Service Tax) payable over monthly filing periods

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::settings::{TaxSettings, STATUTORY_SST_RATE};
use crate::tax::period::{FilingPeriod, PeriodDescriptor};
use crate::types::*;
use crate::utils::percent_of;

/// SST payable on invoices dated within `[period_start, period_end]`
///
/// Uses the statutory 6% rate. Undated invoices contribute nothing.
pub fn sst_payable(
    invoices: &[Invoice],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> BigDecimal {
    SstCalculator::default().payable(invoices, period_start, period_end)
}

/// Sum of invoice amounts dated within `[start, end]`
pub fn taxable_total(invoices: &[Invoice], start: NaiveDate, end: NaiveDate) -> BigDecimal {
    invoices
        .iter()
        .filter(|invoice| invoice.is_dated_within(start, end))
        .map(|invoice| &invoice.amount)
        .sum()
}

/// SST calculator carrying the configured rate
#[derive(Debug, Clone)]
pub struct SstCalculator {
    /// Rate in percent
    rate: BigDecimal,
}

impl Default for SstCalculator {
    fn default() -> Self {
        Self {
            rate: BigDecimal::from(STATUTORY_SST_RATE),
        }
    }
}

impl SstCalculator {
    /// Create a calculator using the rate from validated settings
    pub fn new(settings: &TaxSettings) -> TaxResult<Self> {
        settings.validate()?;
        Ok(Self {
            rate: settings.sst_rate.clone(),
        })
    }

    pub fn rate(&self) -> &BigDecimal {
        &self.rate
    }

    /// SST payable on invoices dated within `[start, end]`, unrounded
    pub fn payable(&self, invoices: &[Invoice], start: NaiveDate, end: NaiveDate) -> BigDecimal {
        let undated = invoices.iter().filter(|i| i.invoice_date.is_none()).count();
        if undated > 0 {
            debug!(undated, "skipping invoices without a usable date");
        }

        let taxable = taxable_total(invoices, start, end);
        let payable = percent_of(&taxable, &self.rate);
        debug!(%start, %end, taxable = %taxable, payable = %payable, "computed SST payable");
        payable
    }

    /// Figures for one filing period
    pub fn summarize(
        &self,
        invoices: &[Invoice],
        period: FilingPeriod,
    ) -> TaxResult<SstPeriodSummary> {
        let descriptor = period.describe()?;
        let in_period: Vec<&Invoice> = invoices
            .iter()
            .filter(|i| i.is_dated_within(descriptor.start, descriptor.end))
            .collect();
        let taxable_total: BigDecimal = in_period.iter().map(|i| &i.amount).sum();

        Ok(SstPeriodSummary {
            period: descriptor,
            invoice_count: in_period.len(),
            sst_payable: percent_of(&taxable_total, &self.rate),
            taxable_total,
        })
    }
}

/// Totals behind an SST-02 return for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SstPeriodSummary {
    pub period: PeriodDescriptor,
    pub invoice_count: usize,
    pub taxable_total: BigDecimal,
    pub sst_payable: BigDecimal,
}

/// Progress of a period's return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    #[default]
    Draft,
    Ready,
    Submitted,
}

/// SST return tracked for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SstFiling {
    pub period: PeriodDescriptor,
    pub total_amount: BigDecimal,
    pub status: FilingStatus,
    pub submitted_at: Option<NaiveDateTime>,
}

impl SstFiling {
    /// Open a draft filing for `period` with the SST computed from `invoices`
    pub fn for_period(
        period: FilingPeriod,
        invoices: &[Invoice],
        calculator: &SstCalculator,
    ) -> TaxResult<Self> {
        let period = period.describe()?;
        Ok(Self {
            total_amount: calculator.payable(invoices, period.start, period.end),
            period,
            status: FilingStatus::Draft,
            submitted_at: None,
        })
    }

    /// Recompute the amount after invoices changed
    pub fn refresh_amount(&mut self, invoices: &[Invoice], calculator: &SstCalculator) {
        self.total_amount = calculator.payable(invoices, self.period.start, self.period.end);
    }

    pub fn mark_ready(&mut self) {
        self.status = FilingStatus::Ready;
        self.submitted_at = None;
    }

    /// Record that the return was filed at `at`
    pub fn mark_submitted(&mut self, at: NaiveDateTime) {
        self.status = FilingStatus::Submitted;
        self.submitted_at = Some(at);
    }

    pub fn mark_draft(&mut self) {
        self.status = FilingStatus::Draft;
        self.submitted_at = None;
    }

    /// Whether the due date has passed without submission as of `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != FilingStatus::Submitted && today > self.period.due_date
    }
}
