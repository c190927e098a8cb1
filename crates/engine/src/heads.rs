//! Expense heads and their income-statement buckets.
//!
//! Every head belongs to at most one bucket. The three heads returned by
//! [`ExpenseHead::bucket`] as `None` are accepted on expense records but are
//! counted in neither the COGS nor the OpEx total.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Superordinate cost bucket of the income statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBucket {
    /// Cost of goods sold: direct production inputs.
    Cogs,
    /// Operating expenses: overhead and administration.
    Opex,
}

/// Cost category of an expense record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseHead {
    Feed,
    Medicine,
    Vaccine,
    Birds,
    Salaries,
    Rent,
    Utilities,
    Power,
    Fuel,
    Logistics,
    Maintenance,
    Office,
    Security,
    Communication,
    Taxes,
    Miscellaneous,
    FurnitureFixtures,
    ProfessionalFees,
    Equipment,
}

/// Heads folded into `cogs`.
pub const COGS_HEADS: [ExpenseHead; 4] = [
    ExpenseHead::Feed,
    ExpenseHead::Medicine,
    ExpenseHead::Vaccine,
    ExpenseHead::Birds,
];

/// Heads folded into `operatingExpenses`.
pub const OPEX_HEADS: [ExpenseHead; 12] = [
    ExpenseHead::Salaries,
    ExpenseHead::Rent,
    ExpenseHead::Utilities,
    ExpenseHead::Power,
    ExpenseHead::Fuel,
    ExpenseHead::Logistics,
    ExpenseHead::Maintenance,
    ExpenseHead::Office,
    ExpenseHead::Security,
    ExpenseHead::Communication,
    ExpenseHead::Taxes,
    ExpenseHead::Miscellaneous,
];

impl ExpenseHead {
    pub const ALL: [ExpenseHead; 19] = [
        Self::Feed,
        Self::Medicine,
        Self::Vaccine,
        Self::Birds,
        Self::Salaries,
        Self::Rent,
        Self::Utilities,
        Self::Power,
        Self::Fuel,
        Self::Logistics,
        Self::Maintenance,
        Self::Office,
        Self::Security,
        Self::Communication,
        Self::Taxes,
        Self::Miscellaneous,
        Self::FurnitureFixtures,
        Self::ProfessionalFees,
        Self::Equipment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Medicine => "medicine",
            Self::Vaccine => "vaccine",
            Self::Birds => "birds",
            Self::Salaries => "salaries",
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Power => "power",
            Self::Fuel => "fuel",
            Self::Logistics => "logistics",
            Self::Maintenance => "maintenance",
            Self::Office => "office",
            Self::Security => "security",
            Self::Communication => "communication",
            Self::Taxes => "taxes",
            Self::Miscellaneous => "miscellaneous",
            Self::FurnitureFixtures => "furniture_fixtures",
            Self::ProfessionalFees => "professional_fees",
            Self::Equipment => "equipment",
        }
    }

    /// Bucket the head is reported under, `None` for uncategorized heads.
    pub fn bucket(self) -> Option<CostBucket> {
        match self {
            Self::Feed | Self::Medicine | Self::Vaccine | Self::Birds => Some(CostBucket::Cogs),
            Self::Salaries
            | Self::Rent
            | Self::Utilities
            | Self::Power
            | Self::Fuel
            | Self::Logistics
            | Self::Maintenance
            | Self::Office
            | Self::Security
            | Self::Communication
            | Self::Taxes
            | Self::Miscellaneous => Some(CostBucket::Opex),
            // TODO: confirm with the bookkeeper which bucket these belong to;
            // until then they are left out of totalExpenses.
            Self::FurnitureFixtures | Self::ProfessionalFees | Self::Equipment => None,
        }
    }
}

impl TryFrom<&str> for ExpenseHead {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|head| head.as_str() == value)
            .ok_or_else(|| EngineError::Validation(format!("invalid expense head: {value}")))
    }
}

impl std::fmt::Display for ExpenseHead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_lists_match_bucket_fn() {
        for head in COGS_HEADS {
            assert_eq!(head.bucket(), Some(CostBucket::Cogs), "{head}");
        }
        for head in OPEX_HEADS {
            assert_eq!(head.bucket(), Some(CostBucket::Opex), "{head}");
        }
    }

    #[test]
    fn every_head_is_in_at_most_one_list() {
        for head in ExpenseHead::ALL {
            let in_cogs = COGS_HEADS.contains(&head);
            let in_opex = OPEX_HEADS.contains(&head);
            assert!(!(in_cogs && in_opex), "{head} is in both buckets");
            assert_eq!(in_cogs || in_opex, head.bucket().is_some(), "{head}");
        }
    }

    #[test]
    fn uncategorized_heads_have_no_bucket() {
        assert_eq!(ExpenseHead::FurnitureFixtures.bucket(), None);
        assert_eq!(ExpenseHead::ProfessionalFees.bucket(), None);
        assert_eq!(ExpenseHead::Equipment.bucket(), None);
    }

    #[test]
    fn parses_storage_names() {
        for head in ExpenseHead::ALL {
            assert_eq!(ExpenseHead::try_from(head.as_str()), Ok(head));
        }
        assert!(ExpenseHead::try_from("Feed").is_err());
        assert!(ExpenseHead::try_from("").is_err());
    }
}
