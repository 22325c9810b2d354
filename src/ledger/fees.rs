use serde::{Deserialize, Serialize};

use crate::domain::MemberCategory;
use crate::errors::LedgerError;

pub const DEFAULT_REGULAR_FEE: i64 = 30_000;
pub const DEFAULT_ASSOCIATE_FEE: i64 = 15_000;
/// Largest fee, payment or carry-over magnitude the ledger accepts.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Club-wide fee configuration. Amounts are whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSettings {
    #[serde(alias = "monthlyFee")]
    pub regular_fee: i64,
    #[serde(alias = "associateFee")]
    pub associate_fee: i64,
    #[serde(default, alias = "initialCarryover")]
    pub carry_over: i64,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            regular_fee: DEFAULT_REGULAR_FEE,
            associate_fee: DEFAULT_ASSOCIATE_FEE,
            carry_over: 0,
        }
    }
}

impl FeeSettings {
    pub fn new(regular_fee: i64, associate_fee: i64, carry_over: i64) -> Self {
        Self {
            regular_fee,
            associate_fee,
            carry_over,
        }
    }

    /// Current monthly fee for a membership category.
    pub fn fee_for(&self, category: MemberCategory) -> i64 {
        match category {
            MemberCategory::Associate => self.associate_fee,
            MemberCategory::Regular => self.regular_fee,
        }
    }

    /// Fees must be non-negative; the carry-over may be negative (a deficit).
    /// Every amount is bounded by [`MAX_AMOUNT`].
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.regular_fee < 0 || self.associate_fee < 0 {
            return Err(LedgerError::InvalidInput(format!(
                "fees must not be negative (regular {}, associate {})",
                self.regular_fee, self.associate_fee
            )));
        }
        if self.regular_fee > MAX_AMOUNT
            || self.associate_fee > MAX_AMOUNT
            || self.carry_over.unsigned_abs() > MAX_AMOUNT.unsigned_abs()
        {
            return Err(LedgerError::InvalidInput(format!(
                "amounts must not exceed {} (regular {}, associate {}, carry-over {})",
                MAX_AMOUNT, self.regular_fee, self.associate_fee, self.carry_over
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_fee_by_category() {
        let settings = FeeSettings::new(30_000, 15_000, 0);
        assert_eq!(settings.fee_for(MemberCategory::Regular), 30_000);
        assert_eq!(settings.fee_for(MemberCategory::Associate), 15_000);
    }

    #[test]
    fn accepts_legacy_field_names() {
        let json = r#"{"monthlyFee":25000,"associateFee":10000,"initialCarryover":5000}"#;
        let settings: FeeSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings, FeeSettings::new(25_000, 10_000, 5_000));
    }

    #[test]
    fn negative_fee_is_rejected() {
        assert!(FeeSettings::new(-1, 0, 0).validate().is_err());
        assert!(FeeSettings::new(0, 0, -500).validate().is_ok());
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        assert!(matches!(
            FeeSettings::new(i64::MAX, 0, 0).validate(),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(FeeSettings::new(0, MAX_AMOUNT + 1, 0).validate().is_err());
        assert!(FeeSettings::new(0, 0, i64::MIN).validate().is_err());
        assert!(FeeSettings::new(MAX_AMOUNT, MAX_AMOUNT, -MAX_AMOUNT).validate().is_ok());
    }
}
