//! Pivot-based currency conversion in integer minor units.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::rates::RateBook;
use crate::domain::money::{round_half_up, MinorUnits};
use crate::domain::Currency;
use crate::error::ConversionError;

/// Converts minor-unit amounts between currencies through a pivot.
///
/// Every multiplier in the [`RateBook`] is relative to the pivot, so the
/// cross rate `from -> to` is `rate(to) / rate(from)`. The converter owns its
/// rate snapshot and is handed explicitly to each reconciliation call.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    pivot: Currency,
    rates: RateBook,
}

impl CurrencyConverter {
    /// Create a converter, checking the pivot itself resolves as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::PivotUnavailable`] when the rate book has no
    /// positive multiplier for the pivot. Nothing can be priced in that case.
    pub fn new(
        pivot: Currency,
        rates: RateBook,
        as_of: DateTime<Utc>,
    ) -> Result<Self, ConversionError> {
        match rates.get_rate(&pivot, as_of) {
            Some(multiplier) if multiplier > Decimal::ZERO => Ok(Self { pivot, rates }),
            _ => Err(ConversionError::PivotUnavailable { pivot }),
        }
    }

    /// The pivot currency all multipliers are relative to.
    #[must_use]
    pub const fn pivot(&self) -> &Currency {
        &self.pivot
    }

    /// The underlying rate snapshot.
    #[must_use]
    pub const fn rates(&self) -> &RateBook {
        &self.rates
    }

    /// Resolve a usable multiplier for `currency`.
    ///
    /// # Errors
    ///
    /// A missing or non-positive multiplier is [`ConversionError::MissingRate`].
    pub fn rate(&self, currency: &Currency, as_of: DateTime<Utc>) -> Result<Decimal, ConversionError> {
        match self.rates.get_rate(currency, as_of) {
            Some(multiplier) if multiplier > Decimal::ZERO => Ok(multiplier),
            _ => Err(ConversionError::MissingRate {
                currency: currency.clone(),
                as_of,
            }),
        }
    }

    /// Convert `amount` from one currency to another as of `as_of`.
    ///
    /// Rounds half-up; a strictly positive amount never converts to zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MissingRate`] if either side has no rate and
    /// [`ConversionError::Overflow`] if the result does not fit.
    pub fn convert(
        &self,
        amount: MinorUnits,
        from: &Currency,
        to: &Currency,
        as_of: DateTime<Utc>,
    ) -> Result<MinorUnits, ConversionError> {
        if from == to {
            return Ok(amount);
        }

        let from_rate = self.rate(from, as_of)?;
        let to_rate = self.rate(to, as_of)?;

        let overflow = || ConversionError::Overflow {
            amount,
            from: from.clone(),
            to: to.clone(),
        };

        let converted = Decimal::from(amount)
            .checked_mul(to_rate)
            .and_then(|scaled| scaled.checked_div(from_rate))
            .ok_or_else(overflow)?;
        let rounded = round_half_up(converted).ok_or_else(overflow)?;

        if rounded == 0 && amount > 0 {
            return Ok(1);
        }
        Ok(rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExchangeRate;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    fn eur() -> Currency {
        Currency::new("EUR").unwrap()
    }

    fn cny() -> Currency {
        Currency::new("CNY").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn converter() -> CurrencyConverter {
        let rates = RateBook::from_parts(
            Vec::new(),
            vec![(usd(), dec!(1)), (eur(), dec!(0.9137)), (cny(), dec!(7.2431))],
        );
        CurrencyConverter::new(usd(), rates, now()).unwrap()
    }

    #[test]
    fn same_currency_is_identity() {
        assert_eq!(converter().convert(1234, &eur(), &eur(), now()), Ok(1234));
    }

    #[test]
    fn converts_through_pivot() {
        let c = converter();
        assert_eq!(c.pivot(), &usd());
        assert_eq!(c.rates().len(), 3);
        assert_eq!(c.convert(1000, &usd(), &eur(), now()), Ok(914));
        // 1000 CNY -> USD = 138.06... -> EUR = 126.15...
        assert_eq!(c.convert(1000, &cny(), &eur(), now()), Ok(126));
    }

    #[test]
    fn round_trip_stays_within_one_minor_unit() {
        let c = converter();
        for amount in [1, 7, 99, 1000, 123_456] {
            let there = c.convert(amount, &usd(), &eur(), now()).unwrap();
            let back = c.convert(there, &eur(), &usd(), now()).unwrap();
            assert!((back - amount).abs() <= 1, "{amount} came back as {back}");
        }
    }

    #[test]
    fn positive_amounts_never_round_to_zero() {
        let c = converter();
        assert_eq!(c.convert(1, &cny(), &usd(), now()), Ok(1));
        assert_eq!(c.convert(0, &cny(), &usd(), now()), Ok(0));
    }

    #[test]
    fn missing_rate_is_an_error() {
        let gbp = Currency::new("GBP").unwrap();
        let result = converter().convert(100, &usd(), &gbp, now());
        assert_eq!(
            result,
            Err(ConversionError::MissingRate {
                currency: gbp,
                as_of: now(),
            })
        );
    }

    #[test]
    fn zero_multiplier_counts_as_missing() {
        let rates = RateBook::from_parts(Vec::new(), vec![(usd(), dec!(1)), (eur(), dec!(0))]);
        let c = CurrencyConverter::new(usd(), rates, now()).unwrap();
        assert!(matches!(
            c.convert(100, &eur(), &usd(), now()),
            Err(ConversionError::MissingRate { .. })
        ));
    }

    #[test]
    fn historical_rate_applies_at_as_of() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let rates = RateBook::from_parts(
            vec![ExchangeRate::new(eur(), earlier, dec!(0.5))],
            vec![(usd(), dec!(1)), (eur(), dec!(0.9))],
        );
        let c = CurrencyConverter::new(usd(), rates, now()).unwrap();
        assert_eq!(c.convert(1000, &usd(), &eur(), now()), Ok(500));
        let before_history = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(c.convert(1000, &usd(), &eur(), before_history), Ok(900));
    }

    #[test]
    fn missing_pivot_is_fatal() {
        let rates = RateBook::from_parts(Vec::new(), vec![(eur(), dec!(0.9))]);
        let err = CurrencyConverter::new(usd(), rates, now()).unwrap_err();
        assert!(err.is_batch_fatal());
    }
}
