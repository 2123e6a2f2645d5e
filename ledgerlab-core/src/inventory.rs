use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{Amount, Currency};

/// A running multi-currency balance for a single account.
///
/// Positions are mutated only through the add operations; a currency whose
/// accumulated number returns to zero is pruned so iteration only ever sees
/// live positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inventory<'a> {
    positions: HashMap<Currency<'a>, Decimal>,
}

impl<'a> Inventory<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_amount(&mut self, amount: &Amount<'a>) {
        self.add(amount.currency.clone(), amount.num);
    }

    pub fn add(&mut self, currency: Currency<'a>, num: Decimal) {
        let total = self.units(currency.as_ref()) + num;
        if total.is_zero() {
            self.positions.remove(currency.as_ref());
        } else {
            self.positions.insert(currency, total);
        }
    }

    /// Accumulated units of one currency; zero when the currency is absent.
    pub fn units(&self, currency: &str) -> Decimal {
        self.positions.get(currency).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Currency<'a>, &Decimal)> {
        self.positions.iter()
    }

    /// True when every live position is strictly positive.
    pub fn is_strictly_positive(&self) -> bool {
        self.positions.values().all(|num| *num > Decimal::ZERO)
    }
}
