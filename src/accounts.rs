//! Constructors for the generic account names used during generation.
//! Institution and jurisdiction placeholders (`CC`, `Bank1`, `Employer1`)
//! stay generic until the final rename pass.

use ledgerlab_core::{Account, AccountType};

fn owned(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

pub(crate) fn opening_balances() -> Account<'static> {
    Account::join(AccountType::Equity, owned(&["Opening-Balances"]))
}

pub(crate) fn retirement_cash() -> Account<'static> {
    Account::join(AccountType::Assets, owned(&["CC", "Retirement", "Cash"]))
}

pub(crate) fn investment_cash() -> Account<'static> {
    Account::join(AccountType::Assets, owned(&["CC", "Investment", "Cash"]))
}

pub(crate) fn credit_card() -> Account<'static> {
    Account::join(AccountType::Liabilities, owned(&["CC", "CreditCard1"]))
}

/// The year-to-date tax-deferred tracking account (shadow currency).
pub(crate) fn pretax_asset() -> Account<'static> {
    Account::join(AccountType::Assets, owned(&["CC", "Federal", "PreTax401k"]))
}

pub(crate) fn pretax_income() -> Account<'static> {
    Account::join(AccountType::Income, owned(&["CC", "Federal", "PreTax401k"]))
}

pub(crate) fn employer_income(leaf: &str) -> Account<'static> {
    Account::join(AccountType::Income, owned(&["CC", "Employer1", leaf]))
}

pub(crate) fn employer_vacation_asset() -> Account<'static> {
    Account::join(AccountType::Assets, owned(&["CC", "Employer1", "Vacation"]))
}

pub(crate) fn health(category: &str, leaf: &str) -> Account<'static> {
    Account::join(AccountType::Expenses, owned(&["Health", category, leaf]))
}

pub(crate) fn expense(parts: &[&str]) -> Account<'static> {
    Account::join(AccountType::Expenses, owned(parts))
}

/// A per-year tax expense account, e.g. `Expenses:Taxes:Y2012:CC:Medicare`.
pub(crate) fn tax_expense(year: i32, leaf: &[&str]) -> Account<'static> {
    let mut parts = vec!["Taxes".to_string(), format!("Y{}", year), "CC".to_string()];
    parts.extend(leaf.iter().map(|part| part.to_string()));
    Account::join(AccountType::Expenses, parts)
}
