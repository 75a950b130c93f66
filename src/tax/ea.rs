//! EA form (annual employee remuneration statement) summaries

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::coerce::lenient_amount;
use crate::utils::{non_negative, validate_ic_number, validate_tax_id, validate_tax_year};

/// One employee's remuneration and statutory deductions for a tax year
///
/// Money fields default to zero when missing or non-numeric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EaRecord {
    pub employee_name: String,
    /// Identity card number, e.g. `900101-01-1234`
    pub employee_ic: Option<String>,
    pub employee_tax_no: Option<String>,
    pub tax_year: i32,

    #[serde(deserialize_with = "lenient_amount")]
    pub gross_salary: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub allowances: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub bonuses: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub benefits_in_kind: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub overtime: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub director_fees: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub commission: BigDecimal,

    #[serde(deserialize_with = "lenient_amount")]
    pub epf_employee: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub epf_employer: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub socso: BigDecimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub eis: BigDecimal,
    /// Monthly tax deductions remitted for the employee
    #[serde(deserialize_with = "lenient_amount")]
    pub pcb: BigDecimal,

    pub notes: Option<String>,
}

impl EaRecord {
    pub fn new(employee_name: String, tax_year: i32) -> Self {
        Self {
            employee_name,
            tax_year,
            ..Default::default()
        }
    }

    /// Sum of all remuneration fields
    pub fn total_remuneration(&self) -> BigDecimal {
        [
            &self.gross_salary,
            &self.allowances,
            &self.bonuses,
            &self.benefits_in_kind,
            &self.overtime,
            &self.director_fees,
            &self.commission,
        ]
        .into_iter()
        .sum()
    }

    pub fn summary(&self) -> EaSummary {
        compute_ea_summary(self)
    }

    /// Strict checks for form input; the summary never requires them
    pub fn validate(&self) -> TaxResult<()> {
        if self.employee_name.trim().is_empty() {
            return Err(TaxError::Validation(
                "Employee name cannot be empty".to_string(),
            ));
        }

        validate_tax_year(self.tax_year)?;

        if let Some(ic) = self.employee_ic.as_deref().filter(|ic| !ic.trim().is_empty()) {
            validate_ic_number(ic)?;
        }

        if let Some(tax_no) = self
            .employee_tax_no
            .as_deref()
            .filter(|no| !no.trim().is_empty())
        {
            validate_tax_id(tax_no)?;
        }

        let fields = [
            ("gross_salary", &self.gross_salary),
            ("allowances", &self.allowances),
            ("bonuses", &self.bonuses),
            ("benefits_in_kind", &self.benefits_in_kind),
            ("overtime", &self.overtime),
            ("director_fees", &self.director_fees),
            ("commission", &self.commission),
            ("epf_employee", &self.epf_employee),
            ("epf_employer", &self.epf_employer),
            ("socso", &self.socso),
            ("eis", &self.eis),
            ("pcb", &self.pcb),
        ];
        for (name, value) in fields {
            if *value < BigDecimal::from(0) {
                return Err(TaxError::Validation(format!(
                    "{} cannot be negative",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Derived EA figures for one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EaSummary {
    pub total_remuneration: BigDecimal,
    /// Remuneration less employee EPF, SOCSO and EIS; never negative
    pub net_employment_income: BigDecimal,
}

/// Compute total remuneration and net employment income
///
/// PCB is a remitted withholding and is not subtracted.
pub fn compute_ea_summary(record: &EaRecord) -> EaSummary {
    let total_remuneration = record.total_remuneration();
    let net = &total_remuneration - &record.epf_employee - &record.socso - &record.eis;

    EaSummary {
        net_employment_income: non_negative(net),
        total_remuneration,
    }
}

/// Totals across all employees for a tax year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EaYearTotals {
    pub tax_year: i32,
    pub employees: usize,
    pub total_remuneration: BigDecimal,
    pub total_net_employment_income: BigDecimal,
    pub total_pcb: BigDecimal,
}

impl EaYearTotals {
    /// Sum the records that belong to `tax_year`
    pub fn from_records(records: &[EaRecord], tax_year: i32) -> Self {
        let mut totals = Self {
            tax_year,
            employees: 0,
            total_remuneration: BigDecimal::from(0),
            total_net_employment_income: BigDecimal::from(0),
            total_pcb: BigDecimal::from(0),
        };

        for record in records.iter().filter(|r| r.tax_year == tax_year) {
            let summary = compute_ea_summary(record);
            totals.employees += 1;
            totals.total_remuneration += summary.total_remuneration;
            totals.total_net_employment_income += summary.net_employment_income;
            totals.total_pcb += &record.pcb;
        }

        totals
    }
}
