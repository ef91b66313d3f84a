//! Tender
//!
//! Keypad buffer for the amount the customer hands over, entered in whole
//! major units (rupiah, pounds, dollars).

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{PricingError, ceil_major, from_major};

/// Quick-pick tender amounts in major units.
pub const QUICK_AMOUNTS: [u64; 3] = [50_000, 100_000, 200_000];

/// Longest digit buffer accepted; keeps every amount inside `i64` minor units.
pub const MAX_DIGITS: usize = 15;

/// Errors from keypad input.
#[derive(Debug, Error, PartialEq)]
pub enum TenderError {
    /// Only 0 through 9 are digit keys.
    #[error("{0} is not a keypad digit")]
    InvalidDigit(u8),

    /// The buffer already holds the maximum number of digits.
    #[error("tender is limited to {MAX_DIGITS} digits")]
    TooManyDigits,

    /// A tender cannot be set from an amount below zero.
    #[error("cannot tender a negative amount")]
    NegativeAmount,

    /// Error converting an amount to whole major units.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A key on the tender keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenderKey {
    /// A single digit, 0 through 9
    Digit(u8),

    /// Append two zeros
    DoubleZero,

    /// Delete the last digit
    Backspace,

    /// Empty the buffer
    Clear,
}

/// Digits typed on the tender keypad.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tender {
    digits: String,
}

impl Tender {
    /// Create an empty tender.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a keypad press.
    ///
    /// Typing onto a lone `0` replaces it.
    ///
    /// # Errors
    ///
    /// Returns a [`TenderError`] for an out-of-range digit or a full buffer.
    /// The buffer is unchanged in that case.
    pub fn press(&mut self, key: TenderKey) -> Result<(), TenderError> {
        match key {
            TenderKey::Digit(digit) if digit > 9 => Err(TenderError::InvalidDigit(digit)),
            TenderKey::Digit(digit) => self.append(&digit.to_string()),
            TenderKey::DoubleZero => self.append("00"),
            TenderKey::Backspace => {
                self.digits.pop();
                Ok(())
            }
            TenderKey::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Replace the buffer with a whole amount in major units.
    ///
    /// # Errors
    ///
    /// Returns [`TenderError::TooManyDigits`] if the amount has too many digits.
    pub fn set_amount(&mut self, major: u64) -> Result<(), TenderError> {
        let digits = major.to_string();

        if digits.len() > MAX_DIGITS {
            return Err(TenderError::TooManyDigits);
        }

        self.digits = digits;

        Ok(())
    }

    /// Replace the buffer with the exact total, rounded up to a whole major unit.
    ///
    /// # Errors
    ///
    /// - [`TenderError::NegativeAmount`]: the total is below zero.
    /// - [`TenderError::TooManyDigits`]: the total does not fit the buffer.
    /// - [`TenderError::Pricing`]: the currency exponent is unsupported.
    pub fn set_exact(&mut self, total: &Money<'_, Currency>) -> Result<(), TenderError> {
        let major =
            u64::try_from(ceil_major(total)?).map_err(|_err| TenderError::NegativeAmount)?;

        self.set_amount(major)
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// The typed digits, possibly empty.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Check if nothing has been typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// The tendered amount; an empty buffer is zero.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
    pub fn amount<'a>(&self, currency: &'a Currency) -> Result<Money<'a, Currency>, PricingError> {
        let major = if self.digits.is_empty() {
            0
        } else {
            self.digits
                .parse::<i64>()
                .map_err(|_err| PricingError::Overflow)?
        };

        from_major(major, currency)
    }

    fn append(&mut self, digits: &str) -> Result<(), TenderError> {
        if self.digits == "0" {
            self.digits.clear();
        }

        if self.digits.len() + digits.len() > MAX_DIGITS {
            return Err(TenderError::TooManyDigits);
        }

        self.digits.push_str(digits);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::IDR;
    use testresult::TestResult;

    use super::*;

    fn type_keys(tender: &mut Tender, keys: &[TenderKey]) -> Result<(), TenderError> {
        keys.iter().try_for_each(|key| tender.press(*key))
    }

    #[test]
    fn digits_accumulate() -> TestResult {
        let mut tender = Tender::new();

        type_keys(
            &mut tender,
            &[
                TenderKey::Digit(1),
                TenderKey::Digit(5),
                TenderKey::DoubleZero,
                TenderKey::Digit(0),
            ],
        )?;

        assert_eq!(tender.digits(), "15000");
        assert_eq!(tender.amount(IDR)?, from_major(15_000, IDR)?);

        Ok(())
    }

    #[test]
    fn typing_onto_lone_zero_replaces_it() -> TestResult {
        let mut tender = Tender::new();

        type_keys(&mut tender, &[TenderKey::Digit(0), TenderKey::Digit(7)])?;

        assert_eq!(tender.digits(), "7");

        Ok(())
    }

    #[test]
    fn backspace_and_clear() -> TestResult {
        let mut tender = Tender::new();

        type_keys(
            &mut tender,
            &[TenderKey::Digit(4), TenderKey::Digit(2), TenderKey::Backspace],
        )?;
        assert_eq!(tender.digits(), "4");

        tender.press(TenderKey::Clear)?;
        assert!(tender.is_empty());

        tender.press(TenderKey::Backspace)?;
        assert!(tender.is_empty());

        Ok(())
    }

    #[test]
    fn empty_tender_is_zero() -> TestResult {
        assert_eq!(Tender::new().amount(IDR)?, Money::from_minor(0, IDR));

        Ok(())
    }

    #[test]
    fn invalid_digit_is_rejected() {
        let mut tender = Tender::new();

        assert_eq!(
            tender.press(TenderKey::Digit(10)),
            Err(TenderError::InvalidDigit(10))
        );
        assert!(tender.is_empty());
    }

    #[test]
    fn digit_limit_is_enforced() -> TestResult {
        let mut tender = Tender::new();

        for _ in 0..MAX_DIGITS {
            tender.press(TenderKey::Digit(9))?;
        }

        assert_eq!(
            tender.press(TenderKey::Digit(9)),
            Err(TenderError::TooManyDigits)
        );
        assert_eq!(tender.digits().len(), MAX_DIGITS);
        assert!(tender.amount(IDR).is_ok());

        Ok(())
    }

    #[test]
    fn quick_amounts_replace_buffer() -> TestResult {
        let mut tender = Tender::new();
        tender.press(TenderKey::Digit(3))?;

        for amount in QUICK_AMOUNTS {
            tender.set_amount(amount)?;

            assert_eq!(tender.digits(), amount.to_string());
        }

        Ok(())
    }

    #[test]
    fn exact_rounds_fractional_totals_up() -> TestResult {
        let mut tender = Tender::new();
        let total = from_major(22_000, IDR)?.add(Money::from_minor(1, IDR))?;

        tender.set_exact(&total)?;

        assert_eq!(tender.digits(), "22001");

        Ok(())
    }

    #[test]
    fn exact_rejects_negative_total() -> TestResult {
        let mut tender = Tender::new();
        tender.press(TenderKey::Digit(7))?;

        let result = tender.set_exact(&Money::from_minor(-100, IDR));

        assert_eq!(result, Err(TenderError::NegativeAmount));
        assert_eq!(tender.digits(), "7");

        Ok(())
    }

    #[test]
    fn exact_reports_oversized_total_as_too_many_digits() {
        let mut tender = Tender::new();

        let result = tender.set_exact(&Money::from_minor(i64::MAX, IDR));

        assert_eq!(result, Err(TenderError::TooManyDigits));
        assert!(tender.is_empty());
    }
}
