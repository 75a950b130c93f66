//! Built-in Malaysian deduction categories

use crate::tax::deduction::{CategoryType, RawCategory, TaxCategory};
use crate::traits::CategoryLookup;
use crate::types::*;

/// Category reference table
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    categories: Vec<TaxCategory>,
}

impl CategoryTable {
    /// Build a table, rejecting duplicate ids
    pub fn new(categories: Vec<TaxCategory>) -> TaxResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for category in &categories {
            if !seen.insert(category.id.as_str()) {
                return Err(TaxError::InvalidCategory(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }
        }
        Ok(Self { categories })
    }

    /// Build a table from externally stored category objects
    pub fn from_raw(raw: Vec<RawCategory>) -> TaxResult<Self> {
        let categories = raw
            .into_iter()
            .map(TaxCategory::try_from)
            .collect::<TaxResult<Vec<_>>>()?;
        Self::new(categories)
    }

    /// The standard business, capital allowance and personal relief categories
    pub fn standard() -> Self {
        let categories = vec![
            // Business expenses
            TaxCategory::business("salaries", "Salaries & Wages", 100),
            TaxCategory::business("rent", "Business Rent", 100),
            TaxCategory::business("utilities", "Utilities", 100),
            TaxCategory::business("insurance", "Business Insurance", 100),
            TaxCategory::business("advertising", "Advertising & Promotion", 100),
            TaxCategory::business("professional_fees", "Professional Fees", 100),
            TaxCategory::business("repairs", "Repairs & Maintenance", 100),
            TaxCategory::business("office_supplies", "Office Supplies", 100),
            TaxCategory::business("travel", "Business Travel", 100),
            TaxCategory::business("training", "Staff Training", 100).with_double_deduction(),
            TaxCategory::business("bank_charges", "Bank Charges & Interest", 100),
            TaxCategory::business("subscriptions", "Subscriptions & Memberships", 100),
            TaxCategory::business("telecommunications", "Telecommunications", 100),
            TaxCategory::business("donations", "Donations (Approved)", 100),
            // Capital allowance
            TaxCategory::capital("machinery", "Machinery & Equipment", 20, 14),
            TaxCategory::capital("vehicle", "Motor Vehicles", 20, 20),
            TaxCategory::capital("computers", "Computers & IT Equipment", 20, 40),
            TaxCategory::capital("furniture", "Furniture & Fittings", 20, 10),
            // Personal relief
            TaxCategory::personal("self_dependent", "Self & Dependents", 9000),
            TaxCategory::personal("parents_medical", "Parents Medical", 8000),
            TaxCategory::personal("education_self", "Education (Self)", 7000),
            TaxCategory::personal("epf", "EPF Contributions", 4000),
            TaxCategory::personal("life_insurance", "Life Insurance", 3000),
            TaxCategory::personal("medical_insurance", "Medical Insurance", 4000),
            TaxCategory::personal("socso", "SOCSO", 350),
            TaxCategory::personal("sspn", "SSPN (Education Savings)", 8000),
        ];
        Self { categories }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl CategoryLookup for CategoryTable {
    fn category(&self, id: &str) -> Option<&TaxCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn categories_of_type(&self, category_type: CategoryType) -> Vec<&TaxCategory> {
        self.categories
            .iter()
            .filter(|c| c.category_type() == category_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::deduction::ClaimRule;
    use bigdecimal::BigDecimal;

    #[test]
    fn test_standard_table_shape() {
        let table = CategoryTable::standard();

        assert_eq!(table.len(), 26);
        assert_eq!(table.categories_of_type(CategoryType::Business).len(), 14);
        assert_eq!(table.categories_of_type(CategoryType::Capital).len(), 4);
        assert_eq!(table.categories_of_type(CategoryType::Personal).len(), 8);
        assert!(CategoryTable::new(table.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn test_lookup() {
        let table = CategoryTable::standard();

        let computers = table.category("computers").unwrap();
        assert_eq!(
            computers.rule,
            ClaimRule::CapitalAllowance {
                initial_percent: BigDecimal::from(20),
                annual_percent: BigDecimal::from(40),
            }
        );
        assert!(table.category("yacht").is_none());
        assert_eq!(
            table.category_required("yacht").unwrap_err(),
            TaxError::CategoryNotFound("yacht".to_string())
        );
    }

    #[test]
    fn test_training_is_double_deduction() {
        let table = CategoryTable::standard();

        assert!(matches!(
            table.category("training").unwrap().rule,
            ClaimRule::FlatPercent {
                double_deduction: true,
                ..
            }
        ));
        assert!(matches!(
            table.category("rent").unwrap().rule,
            ClaimRule::FlatPercent {
                double_deduction: false,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = CategoryTable::new(vec![
            TaxCategory::business("rent", "Rent", 100),
            TaxCategory::personal("rent", "Rent again", 100),
        ]);

        assert_eq!(
            result.unwrap_err(),
            TaxError::InvalidCategory("duplicate category id 'rent'".to_string())
        );
    }

    #[test]
    fn test_from_raw() {
        let raw: Vec<RawCategory> = serde_json::from_str(
            r#"[
                {"id": "rent", "name": "Business Rent", "type": "business", "claimable": 100},
                {"id": "computers", "type": "capital", "initial": 20, "annual": 40},
                {"id": "epf", "type": "personal", "maxClaim": 4000}
            ]"#,
        )
        .unwrap();

        let table = CategoryTable::from_raw(raw).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.category("epf").unwrap().category_type(),
            CategoryType::Personal
        );
    }
}
