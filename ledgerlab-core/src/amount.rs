use std::fmt;

use rust_decimal::Decimal;
use typed_builder::TypedBuilder;

use super::Currency;

/// A number of units of a certain commodity.
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct Amount<'a> {
    /// The value of the amount.
    pub num: Decimal,

    /// The commodity of the amount.
    pub currency: Currency<'a>,
}

impl<'a> Amount<'a> {
    pub fn new<C: Into<Currency<'a>>>(num: Decimal, currency: C) -> Self {
        Amount {
            num,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Amount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.num, self.currency)
    }
}
