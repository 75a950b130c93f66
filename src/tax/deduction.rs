//! Deduction claim calculation for business expenses, capital allowances and
//! personal reliefs

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::traits::CategoryLookup;
use crate::types::*;
use crate::utils::coerce::{lenient_amount, lenient_date};
use crate::utils::{non_negative, percent_of};

/// Kind of deduction a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Business expenses, claimed at a flat percentage
    Business,
    /// Capital allowance on assets, initial plus annual percentage
    Capital,
    /// Personal relief, claimed up to a cap
    Personal,
}

impl CategoryType {
    /// Display label used when grouping categories
    pub fn label(&self) -> &'static str {
        match self {
            CategoryType::Business => "Business Expenses",
            CategoryType::Capital => "Capital Allowance",
            CategoryType::Personal => "Personal Relief",
        }
    }
}

/// How the claimable portion of an amount is derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ClaimRule {
    /// A fixed percentage of the amount
    FlatPercent {
        percent: BigDecimal,
        /// Flagged for double deduction; the claim itself is still `percent`
        double_deduction: bool,
    },
    /// Initial-year plus annual capital allowance
    CapitalAllowance {
        initial_percent: BigDecimal,
        annual_percent: BigDecimal,
    },
    /// The amount, up to a Ringgit cap
    Capped { max_claim: BigDecimal },
}

impl ClaimRule {
    /// Category type implied by this rule
    pub fn category_type(&self) -> CategoryType {
        match self {
            ClaimRule::FlatPercent { .. } => CategoryType::Business,
            ClaimRule::CapitalAllowance { .. } => CategoryType::Capital,
            ClaimRule::Capped { .. } => CategoryType::Personal,
        }
    }
}

/// Deduction category with its claim rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCategory {
    /// Unique key, e.g. `computers`
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Claim rule, which also fixes the category type
    pub rule: ClaimRule,
}

impl TaxCategory {
    /// Business category claimed at `percent`
    pub fn business(id: &str, name: &str, percent: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rule: ClaimRule::FlatPercent {
                percent: BigDecimal::from(percent),
                double_deduction: false,
            },
        }
    }

    /// Capital allowance category
    pub fn capital(id: &str, name: &str, initial_percent: i64, annual_percent: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rule: ClaimRule::CapitalAllowance {
                initial_percent: BigDecimal::from(initial_percent),
                annual_percent: BigDecimal::from(annual_percent),
            },
        }
    }

    /// Personal relief category capped at `max_claim` Ringgit
    pub fn personal(id: &str, name: &str, max_claim: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rule: ClaimRule::Capped {
                max_claim: BigDecimal::from(max_claim),
            },
        }
    }

    /// Mark a business category as eligible for double deduction
    pub fn with_double_deduction(mut self) -> Self {
        if let ClaimRule::FlatPercent {
            double_deduction, ..
        } = &mut self.rule
        {
            *double_deduction = true;
        }
        self
    }

    pub fn category_type(&self) -> CategoryType {
        self.rule.category_type()
    }

    /// Short description of the rule, e.g. `20% initial + 40% annual`
    pub fn claimable_label(&self) -> String {
        match &self.rule {
            ClaimRule::FlatPercent { percent, .. } => format!("{}% claimable", percent),
            ClaimRule::CapitalAllowance {
                initial_percent,
                annual_percent,
            } => format!("{}% initial + {}% annual", initial_percent, annual_percent),
            ClaimRule::Capped { max_claim } => {
                format!("Max RM {}", group_thousands(&max_claim.with_scale(0)))
            }
        }
    }
}

fn group_thousands(value: &BigDecimal) -> String {
    let digits = value.to_string();
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// Category as stored externally, where the shape depends on `type`
///
/// Only the fields belonging to the declared type are read, so a record that
/// carries leftovers from another shape still resolves unambiguously.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
    #[serde(default, alias = "claimable")]
    pub claimable_percent: Option<BigDecimal>,
    #[serde(default, alias = "initial")]
    pub initial_percent: Option<BigDecimal>,
    #[serde(default, alias = "annual")]
    pub annual_percent: Option<BigDecimal>,
    #[serde(default)]
    pub max_claim: Option<BigDecimal>,
    #[serde(default)]
    pub double_deduction: bool,
}

impl TryFrom<RawCategory> for TaxCategory {
    type Error = TaxError;

    fn try_from(raw: RawCategory) -> TaxResult<Self> {
        let missing = |field: &str| {
            TaxError::InvalidCategory(format!("category '{}' is missing {}", raw.id, field))
        };

        let rule = match raw.category_type.ok_or_else(|| missing("type"))? {
            CategoryType::Business => ClaimRule::FlatPercent {
                percent: raw
                    .claimable_percent
                    .clone()
                    .ok_or_else(|| missing("claimablePercent"))?,
                double_deduction: raw.double_deduction,
            },
            CategoryType::Capital => ClaimRule::CapitalAllowance {
                initial_percent: raw
                    .initial_percent
                    .clone()
                    .ok_or_else(|| missing("initialPercent"))?,
                annual_percent: raw
                    .annual_percent
                    .clone()
                    .ok_or_else(|| missing("annualPercent"))?,
            },
            CategoryType::Personal => ClaimRule::Capped {
                max_claim: raw.max_claim.clone().ok_or_else(|| missing("maxClaim"))?,
            },
        };

        Ok(Self {
            name: raw.name.unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
            rule,
        })
    }
}

/// Where a claim's percentage came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimBasis {
    /// Derived from a known category rule
    Rule(CategoryType),
    /// Category unknown; the full amount was passed through unchecked
    Unverified,
}

/// Claimable portion of an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claimable {
    /// Claimable Ringgit amount
    pub amount: BigDecimal,
    /// Claimable percentage of the raw amount
    pub percent: BigDecimal,
    pub basis: ClaimBasis,
}

impl Claimable {
    pub fn is_verified(&self) -> bool {
        self.basis != ClaimBasis::Unverified
    }
}

/// Compute the claimable amount and percentage for an expense
///
/// Negative amounts are treated as zero. An unknown category (`None`) passes
/// the full amount through at 100% and marks the claim unverified.
/// Results are exact; round with [`crate::utils::round_money`] for display.
pub fn compute_claimable(category: Option<&TaxCategory>, amount: &BigDecimal) -> Claimable {
    let amount = non_negative(amount.clone());

    let Some(category) = category else {
        return Claimable {
            percent: BigDecimal::from(100),
            amount,
            basis: ClaimBasis::Unverified,
        };
    };

    let basis = ClaimBasis::Rule(category.category_type());
    match &category.rule {
        ClaimRule::FlatPercent { percent, .. } => Claimable {
            amount: percent_of(&amount, percent),
            percent: percent.clone(),
            basis,
        },
        ClaimRule::CapitalAllowance {
            initial_percent,
            annual_percent,
        } => {
            let percent = initial_percent + annual_percent;
            Claimable {
                amount: percent_of(&amount, &percent),
                percent,
                basis,
            }
        }
        ClaimRule::Capped { max_claim } => {
            let claim = amount.clone().min(max_claim.clone());
            let percent = if amount > BigDecimal::from(0) {
                (&claim / &amount) * BigDecimal::from(100)
            } else {
                BigDecimal::from(0)
            };
            Claimable {
                amount: claim,
                percent,
                basis,
            }
        }
    }
}

/// Resolve `category_id` and compute its claim, warning when it is unknown
fn claim_for<L: CategoryLookup + ?Sized>(
    categories: &L,
    category_id: &str,
    amount: &BigDecimal,
) -> Claimable {
    let category = categories.category(category_id);
    if category.is_none() {
        warn!(
            category_id,
            amount = %amount,
            "unknown deduction category; passing full amount through unverified"
        );
    }
    compute_claimable(category, amount)
}

/// Claim calculator that resolves categories by id
#[derive(Debug)]
pub struct DeductionCalculator<L: CategoryLookup> {
    categories: L,
}

impl<L: CategoryLookup> DeductionCalculator<L> {
    pub fn new(categories: L) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &L {
        &self.categories
    }

    /// Compute the claim for an amount under the category with `category_id`
    pub fn claimable(&self, category_id: &str, amount: &BigDecimal) -> Claimable {
        claim_for(&self.categories, category_id, amount)
    }

    /// Build a deduction record with its claim derived from the category rule
    pub fn record(
        &self,
        category_id: String,
        amount: BigDecimal,
        date: Option<NaiveDate>,
        tax_year: i32,
    ) -> DeductionRecord {
        DeductionRecord::new(category_id, amount, date, tax_year, &self.categories)
    }
}

/// Review state of a claimed deduction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionStatus {
    #[default]
    Pending,
    Verified,
    Claimed,
}

/// Deduction as received from the persistence layer or a form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDeduction {
    #[serde(default)]
    pub category_id: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: BigDecimal,
    #[serde(default, alias = "deduction_date", deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub tax_year: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: DeductionStatus,
}

/// One claimed expense
///
/// The claim is never set directly: it is recomputed from the category rule
/// whenever the amount or category changes, so it always agrees with both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeductionRecord {
    pub category_id: String,
    amount: BigDecimal,
    pub date: Option<NaiveDate>,
    pub tax_year: i32,
    pub description: Option<String>,
    pub status: DeductionStatus,
    claim: Claimable,
}

impl DeductionRecord {
    /// Create a deduction, deriving its claim from the category table
    pub fn new<L: CategoryLookup + ?Sized>(
        category_id: String,
        amount: BigDecimal,
        date: Option<NaiveDate>,
        tax_year: i32,
        categories: &L,
    ) -> Self {
        let claim = claim_for(categories, &category_id, &amount);
        Self {
            category_id,
            amount,
            date,
            tax_year,
            description: None,
            status: DeductionStatus::default(),
            claim,
        }
    }

    /// Build from a raw record, discarding any stored claim values
    pub fn from_raw<L: CategoryLookup + ?Sized>(raw: RawDeduction, categories: &L) -> Self {
        let mut record = Self::new(raw.category_id, raw.amount, raw.date, raw.tax_year, categories);
        record.description = raw.description;
        record.status = raw.status;
        record
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    pub fn claim(&self) -> &Claimable {
        &self.claim
    }

    pub fn claimable_amount(&self) -> &BigDecimal {
        &self.claim.amount
    }

    pub fn claimable_percent(&self) -> &BigDecimal {
        &self.claim.percent
    }

    /// Change the amount and recompute the claim
    pub fn set_amount<L: CategoryLookup + ?Sized>(&mut self, amount: BigDecimal, categories: &L) {
        self.amount = amount;
        self.recompute(categories);
    }

    /// Move the deduction to another category and recompute the claim
    pub fn set_category<L: CategoryLookup + ?Sized>(
        &mut self,
        category_id: String,
        categories: &L,
    ) {
        self.category_id = category_id;
        self.recompute(categories);
    }

    fn recompute<L: CategoryLookup + ?Sized>(&mut self, categories: &L) {
        self.claim = claim_for(categories, &self.category_id, &self.amount);
    }

    /// Category type, defaulting to business for unknown categories
    pub fn category_type<L: CategoryLookup + ?Sized>(&self, categories: &L) -> CategoryType {
        categories
            .category(&self.category_id)
            .map(|c| c.category_type())
            .unwrap_or(CategoryType::Business)
    }
}

/// Deductions of one category summed together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRollup {
    pub category_id: String,
    pub category_name: String,
    pub count: usize,
    pub total_amount: BigDecimal,
    pub total_claimable: BigDecimal,
}

/// Group deductions of one category type by category, ordered by category id
pub fn rollup_by_category<L: CategoryLookup + ?Sized>(
    deductions: &[DeductionRecord],
    category_type: CategoryType,
    categories: &L,
) -> Vec<CategoryRollup> {
    let mut rollups: BTreeMap<&str, CategoryRollup> = BTreeMap::new();

    for deduction in deductions
        .iter()
        .filter(|d| d.category_type(categories) == category_type)
    {
        let rollup = rollups
            .entry(deduction.category_id.as_str())
            .or_insert_with(|| CategoryRollup {
                category_id: deduction.category_id.clone(),
                category_name: categories
                    .category(&deduction.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| deduction.category_id.clone()),
                count: 0,
                total_amount: BigDecimal::from(0),
                total_claimable: BigDecimal::from(0),
            });
        rollup.count += 1;
        rollup.total_amount += deduction.amount();
        rollup.total_claimable += deduction.claimable_amount();
    }

    rollups.into_values().collect()
}

/// Total claimable amount of the deductions filed for `tax_year`
pub fn total_claimable(deductions: &[DeductionRecord], tax_year: i32) -> BigDecimal {
    deductions
        .iter()
        .filter(|d| d.tax_year == tax_year)
        .map(|d| d.claimable_amount())
        .sum()
}
