//! Yearly metrics and year-over-year comparison for the dashboard

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::tax::deduction::{total_claimable, DeductionRecord};
use crate::tax::sst::SstCalculator;
use crate::types::*;
use crate::utils::percent_change;

/// Headline figures for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearMetrics {
    pub year: i32,
    /// Invoice amounts dated in the year
    pub revenue: BigDecimal,
    /// Claimable amounts of deductions filed for the year
    pub total_deductions: BigDecimal,
    /// SST on invoices dated 1 January to 31 December
    pub sst_payable: BigDecimal,
}

impl YearMetrics {
    pub fn compute(
        year: i32,
        invoices: &[Invoice],
        deductions: &[DeductionRecord],
        calculator: &SstCalculator,
    ) -> TaxResult<Self> {
        let (start, end) = year_bounds(year)?;
        Ok(Self {
            year,
            revenue: crate::tax::sst::taxable_total(invoices, start, end),
            total_deductions: total_claimable(deductions, year),
            sst_payable: calculator.payable(invoices, start, end),
        })
    }
}

fn year_bounds(year: i32) -> TaxResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(TaxError::InvalidPeriod(format!(
            "year {} is outside the supported calendar",
            year
        ))),
    }
}

/// Percent changes from the previous year; zero where the previous figure is zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoyChange {
    pub revenue: BigDecimal,
    pub total_deductions: BigDecimal,
    pub sst_payable: BigDecimal,
}

/// Current year against the year before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoyComparison {
    pub current: YearMetrics,
    pub previous: YearMetrics,
    pub change: YoyChange,
}

impl YoyComparison {
    /// Compare `current_year` with the year before
    pub fn compute(
        current_year: i32,
        invoices: &[Invoice],
        deductions: &[DeductionRecord],
        calculator: &SstCalculator,
    ) -> TaxResult<Self> {
        let current = YearMetrics::compute(current_year, invoices, deductions, calculator)?;
        let previous = YearMetrics::compute(current_year - 1, invoices, deductions, calculator)?;
        let change = YoyChange {
            revenue: percent_change(&current.revenue, &previous.revenue),
            total_deductions: percent_change(&current.total_deductions, &previous.total_deductions),
            sst_payable: percent_change(&current.sst_payable, &previous.sst_payable),
        };

        Ok(Self {
            current,
            previous,
            change,
        })
    }
}

/// Revenue and claimable deductions for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFigures {
    /// Month, 1 to 12
    pub month: u32,
    pub revenue: BigDecimal,
    pub deductions: BigDecimal,
}

/// Twelve months of revenue and deductions for `year`
///
/// Deductions count when both their tax year and their date fall in `year`.
pub fn monthly_breakdown(
    year: i32,
    invoices: &[Invoice],
    deductions: &[DeductionRecord],
) -> Vec<MonthlyFigures> {
    let mut months: Vec<MonthlyFigures> = (1..=12)
        .map(|month| MonthlyFigures {
            month,
            revenue: BigDecimal::from(0),
            deductions: BigDecimal::from(0),
        })
        .collect();

    for (date, amount) in invoices
        .iter()
        .filter_map(|i| i.invoice_date.map(|date| (date, &i.amount)))
    {
        if date.year() == year {
            months[date.month0() as usize].revenue += amount;
        }
    }

    for (date, claim) in deductions
        .iter()
        .filter(|d| d.tax_year == year)
        .filter_map(|d| d.date.map(|date| (date, d.claimable_amount())))
    {
        if date.year() == year {
            months[date.month0() as usize].deductions += claim;
        }
    }

    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::categories::CategoryTable;
    use crate::tax::deduction::DeductionCalculator;

    fn invoice(amount: i64, date: &str) -> Invoice {
        Invoice::new(format!("inv-{}", date), BigDecimal::from(amount), date)
    }

    fn fixtures() -> (Vec<Invoice>, Vec<DeductionRecord>) {
        let invoices = vec![
            invoice(10000, "15/03/2023"),
            invoice(12000, "15/03/2024"),
            invoice(3000, "2024-11-02"),
            invoice(500, "garbage"),
        ];
        let calculator = DeductionCalculator::new(CategoryTable::standard());
        let deductions = vec![
            calculator.record(
                "rent".to_string(),
                BigDecimal::from(2000),
                NaiveDate::from_ymd_opt(2023, 6, 1),
                2023,
            ),
            calculator.record(
                "computers".to_string(),
                BigDecimal::from(5000),
                NaiveDate::from_ymd_opt(2024, 2, 10),
                2024,
            ),
            calculator.record(
                "epf".to_string(),
                BigDecimal::from(6000),
                NaiveDate::from_ymd_opt(2024, 12, 31),
                2024,
            ),
        ];
        (invoices, deductions)
    }

    #[test]
    fn test_year_metrics() {
        let (invoices, deductions) = fixtures();

        let metrics =
            YearMetrics::compute(2024, &invoices, &deductions, &SstCalculator::default()).unwrap();

        assert_eq!(metrics.revenue, BigDecimal::from(15000));
        assert_eq!(metrics.total_deductions, BigDecimal::from(7000));
        assert_eq!(metrics.sst_payable, BigDecimal::from(900));
    }

    #[test]
    fn test_yoy_comparison() {
        let (invoices, deductions) = fixtures();

        let comparison =
            YoyComparison::compute(2024, &invoices, &deductions, &SstCalculator::default())
                .unwrap();

        assert_eq!(comparison.previous.revenue, BigDecimal::from(10000));
        assert_eq!(comparison.change.revenue, BigDecimal::from(50));
        assert_eq!(comparison.change.total_deductions, BigDecimal::from(250));
        assert_eq!(comparison.change.sst_payable, BigDecimal::from(50));
    }

    #[test]
    fn test_yoy_without_history_is_zero() {
        let (invoices, deductions) = fixtures();

        let comparison =
            YoyComparison::compute(2023, &invoices, &deductions, &SstCalculator::default())
                .unwrap();

        assert_eq!(comparison.previous.revenue, BigDecimal::from(0));
        assert_eq!(comparison.change.revenue, BigDecimal::from(0));
    }

    #[test]
    fn test_monthly_breakdown() {
        let (invoices, deductions) = fixtures();

        let months = monthly_breakdown(2024, &invoices, &deductions);

        assert_eq!(months.len(), 12);
        assert_eq!(months[2].month, 3);
        assert_eq!(months[2].revenue, BigDecimal::from(12000));
        assert_eq!(months[10].revenue, BigDecimal::from(3000));
        assert_eq!(months[1].deductions, BigDecimal::from(3000));
        assert_eq!(months[11].deductions, BigDecimal::from(4000));
        assert_eq!(months[0].revenue, BigDecimal::from(0));
    }
}
