//! Traits at the seams between the calculators and their callers

use crate::tax::deduction::{CategoryType, DeductionRecord, TaxCategory};
use crate::tax::ea::EaRecord;
use crate::types::*;
use crate::utils::validation::*;

/// Source of deduction category rules
///
/// Implemented by [`crate::CategoryTable`]; callers with their own reference
/// data (a database table, a remote config) can implement it instead.
pub trait CategoryLookup: Send + Sync {
    /// Find a category by id
    fn category(&self, id: &str) -> Option<&TaxCategory>;

    /// All categories of one type
    fn categories_of_type(&self, category_type: CategoryType) -> Vec<&TaxCategory>;

    /// Find a category by id, returning an error if it is unknown
    fn category_required(&self, id: &str) -> TaxResult<&TaxCategory> {
        self.category(id)
            .ok_or_else(|| TaxError::CategoryNotFound(id.to_string()))
    }
}

impl<L: CategoryLookup + ?Sized> CategoryLookup for &L {
    fn category(&self, id: &str) -> Option<&TaxCategory> {
        (**self).category(id)
    }

    fn categories_of_type(&self, category_type: CategoryType) -> Vec<&TaxCategory> {
        (**self).categories_of_type(category_type)
    }
}

/// Strict checks a boundary adapter may run before handing records over
pub trait RecordValidator: Send + Sync {
    /// Validate a deduction before saving
    fn validate_deduction(&self, deduction: &DeductionRecord) -> TaxResult<()>;

    /// Validate an EA record before saving
    fn validate_ea_record(&self, record: &EaRecord) -> TaxResult<()>;
}

/// Default validator with basic form rules
pub struct DefaultRecordValidator<L: CategoryLookup> {
    categories: L,
}

impl<L: CategoryLookup> DefaultRecordValidator<L> {
    pub fn new(categories: L) -> Self {
        Self { categories }
    }
}

impl<L: CategoryLookup> RecordValidator for DefaultRecordValidator<L> {
    fn validate_deduction(&self, deduction: &DeductionRecord) -> TaxResult<()> {
        self.categories.category_required(&deduction.category_id)?;
        validate_currency_amount(deduction.amount())?;
        validate_tax_year(deduction.tax_year)?;

        if deduction.date.is_none() {
            return Err(TaxError::Validation(
                "Deduction date is missing or not a valid date".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_ea_record(&self, record: &EaRecord) -> TaxResult<()> {
        record.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::categories::CategoryTable;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_deduction() {
        let table = CategoryTable::standard();
        let validator = DefaultRecordValidator::new(&table);

        let valid = DeductionRecord::new(
            "rent".to_string(),
            BigDecimal::from(1200),
            NaiveDate::from_ymd_opt(2024, 1, 31),
            2024,
            &table,
        );
        assert!(validator.validate_deduction(&valid).is_ok());

        let unknown = DeductionRecord::new(
            "yacht".to_string(),
            BigDecimal::from(1200),
            NaiveDate::from_ymd_opt(2024, 1, 31),
            2024,
            &table,
        );
        assert_eq!(
            validator.validate_deduction(&unknown),
            Err(TaxError::CategoryNotFound("yacht".to_string()))
        );

        let undated =
            DeductionRecord::new("rent".to_string(), BigDecimal::from(1200), None, 2024, &table);
        assert!(validator.validate_deduction(&undated).is_err());

        let zero = DeductionRecord::new(
            "rent".to_string(),
            BigDecimal::from(0),
            NaiveDate::from_ymd_opt(2024, 1, 31),
            2024,
            &table,
        );
        assert!(validator.validate_deduction(&zero).is_err());
    }

    #[test]
    fn test_validate_ea_record() {
        let validator = DefaultRecordValidator::new(CategoryTable::standard());

        assert!(validator
            .validate_ea_record(&EaRecord::new("Siti".to_string(), 2024))
            .is_ok());
        assert!(validator
            .validate_ea_record(&EaRecord::new(String::new(), 2024))
            .is_err());
    }
}
