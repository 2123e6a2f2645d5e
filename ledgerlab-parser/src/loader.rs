//! Loading: parse a document, order its directives, replay them against
//! per-account inventories, synthesize padding transactions, and collect
//! every violation found along the way.

use std::borrow::Cow;
use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

use ledgerlab_core as lc;
use ledgerlab_core::{Date, Directive, Flag, Inventory, Posting};

use crate::error::ParseError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{date}: account {account} opened more than once")]
    DuplicateOpen { date: Date, account: String },

    #[error("{date}: account {account} used before it is opened")]
    AccountNotOpen { date: Date, account: String },

    #[error("{date}: transaction \"{narration}\" has fewer than two postings")]
    TooFewPostings { date: Date, narration: String },

    #[error(
        "{date}: transaction \"{narration}\" does not balance: {residual} {currency} left over"
    )]
    Unbalanced {
        date: Date,
        narration: String,
        currency: String,
        residual: Decimal,
    },

    #[error(
        "{date}: balance assertion for {account} failed: expected {expected} {currency}, accumulated {actual}"
    )]
    BalanceMismatch {
        date: Date,
        account: String,
        currency: String,
        expected: Decimal,
        actual: Decimal,
    },
}

/// Loads a ledger document.
///
/// Directives are sorted into canonical order and replayed chronologically.
/// Each pending pad directive is resolved at the next balance assertion for
/// its account, inserting a flag-`P` transaction dated on the pad date that
/// makes the assertion hold exactly. Balance assertions apply at the
/// beginning of their day, before any transaction sharing the date.
///
/// With `strict` set, every posting account must have been opened on or
/// before the posting date and every transaction must carry at least two
/// postings.
///
/// Returns the sorted directives (padding transactions included) along with
/// every violation encountered; a clean document yields an empty error list.
pub fn load(input: &str, strict: bool) -> (Vec<Directive<'_>>, Vec<LoadError>) {
    let ledger = match crate::parse(input) {
        Ok(ledger) => ledger,
        Err(err) => return (Vec::new(), vec![err.into()]),
    };

    let mut directives = ledger.directives;
    lc::realize::sort(&mut directives);

    let mut errors = Vec::new();
    let mut opened: HashMap<String, Date> = HashMap::new();
    let mut inventories: HashMap<String, Inventory<'_>> = HashMap::new();
    let mut pending_pads: HashMap<String, lc::Pad<'_>> = HashMap::new();
    let mut pad_txns: Vec<Directive<'_>> = Vec::new();

    for directive in &directives {
        match directive {
            Directive::Open(open) => {
                let name = open.account.to_string();
                if opened.insert(name.clone(), open.date).is_some() {
                    errors.push(LoadError::DuplicateOpen {
                        date: open.date,
                        account: name,
                    });
                }
            }
            Directive::Pad(pad) => {
                pending_pads.insert(pad.pad_to_account.to_string(), pad.clone());
            }
            Directive::Balance(balance) => {
                let name = balance.account.to_string();
                let currency = balance.amount.currency.as_ref();
                let expected = balance.amount.num;

                if let Some(pad) = pending_pads.remove(&name) {
                    let actual = units(&inventories, &name, currency);
                    let diff = expected - actual;
                    if !diff.is_zero() {
                        let txn = padding_transaction(&pad, diff, currency, expected);
                        apply_postings(&mut inventories, &txn);
                        pad_txns.push(Directive::Transaction(txn));
                    }
                }

                let actual = units(&inventories, &name, currency);
                if actual != expected {
                    errors.push(LoadError::BalanceMismatch {
                        date: balance.date,
                        account: name,
                        currency: currency.to_string(),
                        expected,
                        actual,
                    });
                }
            }
            Directive::Transaction(txn) => {
                if strict && txn.postings.len() < 2 {
                    errors.push(LoadError::TooFewPostings {
                        date: txn.date,
                        narration: txn.narration.to_string(),
                    });
                }
                for posting in &txn.postings {
                    let name = posting.account.to_string();
                    if strict {
                        let open_date = opened.get(&name).copied();
                        if open_date.map_or(true, |d| d > txn.date) {
                            errors.push(LoadError::AccountNotOpen {
                                date: txn.date,
                                account: name.clone(),
                            });
                        }
                    }
                    inventories
                        .entry(name)
                        .or_default()
                        .add_amount(&posting.units);
                }
                for (currency, residual) in txn.currency_sums() {
                    if !residual.is_zero() {
                        errors.push(LoadError::Unbalanced {
                            date: txn.date,
                            narration: txn.narration.to_string(),
                            currency: currency.to_string(),
                            residual,
                        });
                    }
                }
            }
            Directive::Event(_) | Directive::Option(_) => {}
        }
    }

    directives.extend(pad_txns);
    lc::realize::sort(&mut directives);

    (directives, errors)
}

fn units(inventories: &HashMap<String, Inventory<'_>>, account: &str, currency: &str) -> Decimal {
    inventories
        .get(account)
        .map(|inv| inv.units(currency))
        .unwrap_or_default()
}

fn padding_transaction<'i>(
    pad: &lc::Pad<'i>,
    diff: Decimal,
    currency: &str,
    expected: Decimal,
) -> lc::Transaction<'i> {
    let currency: lc::Currency<'i> = currency.to_string().into();
    lc::Transaction::builder()
        .date(pad.date)
        .flag(Flag::Padding)
        .narration(Cow::<str>::Owned(format!(
            "(Padding inserted for balance of {} {})",
            expected, currency
        )))
        .postings(vec![
            Posting::simple(
                pad.pad_to_account.clone(),
                lc::Amount::new(diff, currency.clone()),
            ),
            Posting::simple(pad.pad_from_account.clone(), lc::Amount::new(-diff, currency)),
        ])
        .build()
}

fn apply_postings<'i>(inventories: &mut HashMap<String, Inventory<'i>>, txn: &lc::Transaction<'i>) {
    for posting in &txn.postings {
        inventories
            .entry(posting.account.to_string())
            .or_default()
            .add_amount(&posting.units);
    }
}
