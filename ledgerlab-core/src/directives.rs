use std::borrow::Cow;
use std::collections::HashMap;

use rust_decimal::Decimal;
use typed_builder::TypedBuilder;

use super::account::Account;
use super::amount::Amount;
use super::flags::Flag;
use super::posting::Posting;
use super::{Currency, Date};

/// One entry of a ledger document.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive<'a> {
    Open(Open<'a>),
    Pad(Pad<'a>),
    Balance(Balance<'a>),
    Event(Event<'a>),
    Option(LedgerOption<'a>),
    Transaction(Transaction<'a>),
}

impl<'a> Directive<'a> {
    /// Date the directive applies on; `None` for dateless directives such as
    /// options, which sort ahead of everything else.
    pub fn date(&self) -> Option<Date> {
        match self {
            Directive::Open(open) => Some(open.date),
            Directive::Pad(pad) => Some(pad.date),
            Directive::Balance(balance) => Some(balance.date),
            Directive::Event(event) => Some(event.date),
            Directive::Option(_) => None,
            Directive::Transaction(txn) => Some(txn.date),
        }
    }

    /// Relative order of directive kinds sharing a date: opens come first,
    /// then balance assertions (checked at the beginning of their day), then
    /// everything else.
    pub fn type_order(&self) -> i8 {
        match self {
            Directive::Open(_) => -2,
            Directive::Balance(_) => -1,
            _ => 0,
        }
    }
}

/// Declares an account as available from a given date, optionally constrained
/// to a set of commodities.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Open<'a> {
    pub date: Date,
    pub account: Account<'a>,
    #[builder(default)]
    pub currencies: Vec<Currency<'a>>,
}

/// Requests that the next balance assertion for `pad_to_account` be satisfied
/// by inserting whatever residual is needed, sourced from `pad_from_account`.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Pad<'a> {
    pub date: Date,
    pub pad_to_account: Account<'a>,
    pub pad_from_account: Account<'a>,
}

/// Asserts the accumulated balance of one account in one commodity at the
/// beginning of the given date.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Balance<'a> {
    pub date: Date,
    pub account: Account<'a>,
    pub amount: Amount<'a>,
}

/// A dated event value, e.g. the current employer.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Event<'a> {
    pub date: Date,
    pub name: Cow<'a, str>,
    pub description: Cow<'a, str>,
}

/// A document-level option such as the title or operating currency.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct LedgerOption<'a> {
    pub name: Cow<'a, str>,
    pub val: Cow<'a, str>,
}

/// A dated double-entry transaction.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Transaction<'a> {
    pub date: Date,
    #[builder(default)]
    pub flag: Flag<'a>,
    #[builder(default)]
    pub payee: Option<Cow<'a, str>>,
    pub narration: Cow<'a, str>,
    pub postings: Vec<Posting<'a>>,
}

impl Transaction<'_> {
    /// Sums the posting units per currency.
    pub fn currency_sums(&self) -> HashMap<&str, Decimal> {
        let mut sums: HashMap<&str, Decimal> = HashMap::new();
        for posting in &self.postings {
            *sums.entry(posting.units.currency.as_ref()).or_default() += posting.units.num;
        }
        sums
    }

    /// True when every currency appearing among the postings sums to zero.
    pub fn is_balanced(&self) -> bool {
        self.currency_sums().values().all(|num| num.is_zero())
    }
}
