//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;

use crate::Money;

/// Floating-point percentage.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a new [`Percent`] by checking the provided values is
    /// not less than `0` and not greater than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Percent`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must not be less than `0` and not greater than
    /// `100`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Calculates this [`Percent`] of the provided [`Money`].
    #[must_use]
    pub fn of(self, money: Money) -> Money {
        Money::new(money.amount() * self.0 / Decimal::ONE_HUNDRED)
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

mod serde {
    //! Module providing integration with [`serde`] crate.

    use rust_decimal::Decimal;
    use serde::{de::Error as _, Deserialize, Deserializer};

    use super::Percent;

    impl<'de> Deserialize<'de> for Percent {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let val = <Decimal as Deserialize<'de>>::deserialize(d)?;
            Self::new(val).ok_or_else(|| {
                D::Error::custom(format!("`{val}` is out of `0..=100` range"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use serde::de::{self, IntoDeserializer as _};

    use crate::Money;

    use super::Percent;

    fn decode(s: &str) -> Result<Percent, de::value::Error> {
        de::Deserialize::deserialize(s.into_deserializer())
    }

    #[test]
    fn from_str() {
        assert!(Percent::from_str("0").is_ok());
        assert!(Percent::from_str("10").is_ok());
        assert!(Percent::from_str("12.5").is_ok());
        assert!(Percent::from_str("100").is_ok());

        assert!(Percent::from_str("-0.1").is_err());
        assert!(Percent::from_str("100.01").is_err());
        assert!(Percent::from_str("ten").is_err());
    }

    #[test]
    fn deserializes_within_range() {
        assert_eq!(decode("12.5").unwrap(), Percent::from_str("12.5").unwrap());
        assert!(decode("100.5").is_err());
        assert!(decode("-1").is_err());
    }

    #[test]
    fn of() {
        let ten = Percent::from_str("10").unwrap();
        assert_eq!(ten.of(Money::from(200_000)), Money::from(20_000));
        assert_eq!(ten.of(Money::from(105_000)), Money::from(10_500));

        let half = Percent::from_str("0.5").unwrap();
        assert_eq!(
            half.of(Money::from(1001)),
            Money::from_str("5.005").unwrap(),
        );
        assert_eq!(Percent::default().of(Money::from(1)), Money::ZERO);
    }
}
