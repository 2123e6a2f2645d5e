//! Template-driven transaction synthesis: one balanced two-leg transaction
//! per date, with payee/narration drawn from string specs and amounts drawn
//! from configurable variates.

use ledgerlab_core::{Account, Amount, Date, Directive, Posting, Transaction};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("cannot draw a string from an empty choice set")]
    EmptyChoices,
    #[error("invalid distribution parameters")]
    BadDistribution,
    #[error("generated amount {0} is not representable as a decimal")]
    BadAmount(f64),
}

/// A fixed string, or a set to draw from uniformly per occurrence.
#[derive(Clone, Debug)]
pub enum StringSpec {
    Fixed(String),
    Choice(Vec<String>),
}

impl StringSpec {
    pub fn fixed(s: &str) -> Self {
        StringSpec::Fixed(s.to_string())
    }

    pub fn choice(options: &[String]) -> Self {
        StringSpec::Choice(options.to_vec())
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> Result<&str, TemplateError> {
        match self {
            StringSpec::Fixed(s) => Ok(s),
            StringSpec::Choice(options) => options
                .choose(rng)
                .map(String::as_str)
                .ok_or(TemplateError::EmptyChoices),
        }
    }
}

/// An amount variate, drawn once per transaction.
#[derive(Clone, Debug)]
pub enum AmountSpec {
    Fixed(Decimal),
    /// Normal variate; a non-positive deviation degenerates to the mean.
    Normal { mean: f64, std_dev: f64 },
    /// Log-normal variate capped by a uniform integer draw in
    /// `[cap_min, cap_max]`.
    LogNormalCapped {
        location: f64,
        scale: f64,
        cap_min: i64,
        cap_max: i64,
    },
}

impl AmountSpec {
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Result<Decimal, TemplateError> {
        match *self {
            AmountSpec::Fixed(amount) => Ok(amount),
            AmountSpec::Normal { mean, std_dev } => {
                if std_dev <= 0.0 {
                    return decimal_from(mean);
                }
                let dist =
                    Normal::new(mean, std_dev).map_err(|_| TemplateError::BadDistribution)?;
                decimal_from(dist.sample(rng))
            }
            AmountSpec::LogNormalCapped {
                location,
                scale,
                cap_min,
                cap_max,
            } => {
                let dist =
                    LogNormal::new(location, scale).map_err(|_| TemplateError::BadDistribution)?;
                let variate = dist.sample(rng);
                let cap = rng.gen_range(cap_min..=cap_max) as f64;
                decimal_from(variate.min(cap))
            }
        }
    }
}

fn decimal_from(value: f64) -> Result<Decimal, TemplateError> {
    Decimal::from_f64(value).ok_or(TemplateError::BadAmount(value))
}

/// Rescales to exactly two fractional digits.
pub(crate) fn to_cents(amount: Decimal) -> Decimal {
    let mut cents = amount;
    cents.rescale(2);
    cents
}

/// One balanced two-leg transaction per date: `account_from` is debited the
/// generated amount, `account_to` credited, both in `currency`, rounded to
/// cents. Amounts `<= 0` are taken as-is.
pub fn periodic_expenses<R: Rng>(
    dates: &[Date],
    payee: &StringSpec,
    narration: &StringSpec,
    account_from: &Account<'static>,
    account_to: &Account<'static>,
    currency: &str,
    amount: &AmountSpec,
    rng: &mut R,
) -> Result<Vec<Directive<'static>>, TemplateError> {
    let mut directives = Vec::with_capacity(dates.len());
    for &date in dates {
        let units = to_cents(amount.draw(rng)?);
        let txn = Transaction::builder()
            .date(date)
            .payee(Some(payee.draw(rng)?.to_string().into()))
            .narration(narration.draw(rng)?.to_string())
            .postings(vec![
                Posting::simple(
                    account_from.clone(),
                    Amount::new(-units, currency.to_string()),
                ),
                Posting::simple(
                    account_to.clone(),
                    Amount::new(units, currency.to_string()),
                ),
            ])
            .build();
        directives.push(Directive::Transaction(txn));
    }
    Ok(directives)
}
