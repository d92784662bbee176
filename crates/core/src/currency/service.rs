//! Currency service for revaluation conversions.
//!
//! Foreign balances are converted at the supplied period-end rate and rounded
//! with Banker's Rounding so that repeated revaluations do not drift.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Currency service for conversion operations.
///
/// Provides methods for converting amounts between currencies using
/// Banker's Rounding (MidpointNearestEven) strategy.
pub struct CurrencyService;

impl CurrencyService {
    /// Convert amount with custom decimal places.
    ///
    /// # Arguments
    ///
    /// * `amount` - The source amount to convert
    /// * `rate` - The exchange rate (1 source = rate target)
    /// * `decimal_places` - Number of decimal places to round to
    ///
    /// # Returns
    ///
    /// The converted amount rounded to specified decimal places using Banker's Rounding,
    /// or `None` if the product leaves the decimal range.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fxreval_core::currency::CurrencyService;
    ///
    /// let result = CurrencyService::convert_with_precision(dec!(100), dec!(1.5), 2);
    /// assert_eq!(result, Some(dec!(150.00)));
    /// ```
    #[must_use]
    pub fn convert_with_precision(
        amount: Decimal,
        rate: Decimal,
        decimal_places: u32,
    ) -> Option<Decimal> {
        amount
            .checked_mul(rate)
            .map(|converted| Self::round(converted, decimal_places))
    }

    /// Round a decimal value using Banker's Rounding.
    ///
    /// - Rounds 2.5 → 2 (to nearest even)
    /// - Rounds 3.5 → 4 (to nearest even)
    /// - Rounds 2.25 → 2.2 (to nearest even at 1 decimal)
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }
}
