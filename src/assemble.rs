//! Final pass: merge the generated groups into titled sections, serialize,
//! rename the generic placeholders, and validate the result by reloading it.

use ledgerlab_core::{realize, Account, Directive, Inventory};
use ledgerlab_parser::loader;
use ledgerlab_render::BasicRendererError;
use regex::{NoExpand, Regex};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Render(#[from] BasicRendererError),
    #[error("invalid rename pattern: {0}")]
    Rename(#[from] regex::Error),
    #[error("generated ledger failed to load:\n{0}")]
    Load(String),
    #[error(
        "balance of {account} is not strictly positive on {date}: {balance} {currency}"
    )]
    NonPositiveBalance {
        account: String,
        date: ledgerlab_core::Date,
        currency: String,
        balance: Decimal,
    },
}

/// A titled group of directives; sections render in the order given.
pub struct Section {
    pub title: String,
    pub directives: Vec<Directive<'static>>,
}

impl Section {
    pub fn new(title: &str, directives: Vec<Directive<'static>>) -> Self {
        Section {
            title: title.to_string(),
            directives,
        }
    }
}

/// Serializes the document: the file preamble, then every section under its
/// org-mode title with its directives in canonical order.
pub fn assemble(preamble: &str, sections: Vec<Section>) -> Result<String, AssembleError> {
    let mut out = Vec::new();
    out.extend_from_slice(preamble.as_bytes());
    for section in sections {
        out.extend_from_slice(format!("{}\n\n", section.title).as_bytes());
        let mut directives = section.directives;
        realize::sort(&mut directives);
        let ledger = ledgerlab_core::Ledger::builder().directives(directives).build();
        ledgerlab_render::render(&mut out, &ledger)?;
    }
    // The renderer only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Applies whole-word generic-to-realistic renames over the serialized text,
/// in order.
pub fn rename(text: &str, renames: &[(String, String)]) -> Result<String, AssembleError> {
    let mut renamed = text.to_string();
    for (from, to) in renames {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(from)))?;
        renamed = pattern.replace_all(&renamed, NoExpand(to)).into_owned();
    }
    Ok(renamed)
}

/// Reloads the final text under strict validation and replays every
/// monitored account, failing on the first non-positive running balance.
pub fn validate(text: &str, monitored: &[Account<'static>]) -> Result<(), AssembleError> {
    let (directives, errors) = loader::load(text, true);
    if !errors.is_empty() {
        let report = errors
            .iter()
            .map(|err| err.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(AssembleError::Load(report));
    }
    for account in monitored {
        check_non_negative(&directives, account)?;
    }
    Ok(())
}

/// Replays the postings affecting `account` and verifies the running
/// balance stays strictly positive in every currency.
pub fn check_non_negative(
    entries: &[Directive<'_>],
    account: &Account<'_>,
) -> Result<(), AssembleError> {
    let mut balance = Inventory::new();
    for txn_posting in realize::postings(entries, account) {
        balance.add_amount(&txn_posting.posting.units);
        if !balance.is_strictly_positive() {
            let (currency, number) = balance
                .iter()
                .find(|(_, number)| **number <= Decimal::ZERO)
                .map(|(currency, number)| (currency.to_string(), *number))
                .unwrap_or_default();
            return Err(AssembleError::NonPositiveBalance {
                account: account.to_string(),
                date: txn_posting.date(),
                currency,
                balance: number,
            });
        }
    }
    Ok(())
}
