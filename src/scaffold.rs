//! Non-transactional scaffolding: account opens, the opening-balance pad,
//! and the per-year tax account groups.

use chrono::Duration;
use ledgerlab_core::{
    Amount, Balance, Currency, Directive, Open, Pad, Posting, Transaction,
};
use rust_decimal::Decimal;

use crate::accounts;
use crate::config::Config;
use crate::template::to_cents;

fn open(
    date: ledgerlab_core::Date,
    account: ledgerlab_core::Account<'static>,
    currencies: Vec<Currency<'static>>,
) -> Directive<'static> {
    Directive::Open(
        Open::builder()
            .date(date)
            .account(account)
            .currencies(currencies)
            .build(),
    )
}

fn ccy(config: &Config) -> Vec<Currency<'static>> {
    vec![config.currency.clone().into()]
}

fn def_ccy(config: &Config) -> Vec<Currency<'static>> {
    vec![config.deferred_currency.clone().into()]
}

/// The equity account everything is padded from.
pub fn equity(config: &Config) -> Vec<Directive<'static>> {
    vec![open(config.date_birth, accounts::opening_balances(), vec![])]
}

/// Opens the checking account and seeds it: a pad from opening balances
/// satisfied by a balance assertion one day after the range start.
pub fn banking(config: &Config) -> Vec<Directive<'static>> {
    vec![
        open(
            config.date_begin,
            config.account_checking.clone(),
            ccy(config),
        ),
        Directive::Pad(
            Pad::builder()
                .date(config.date_begin)
                .pad_to_account(config.account_checking.clone())
                .pad_from_account(accounts::opening_balances())
                .build(),
        ),
        Directive::Balance(
            Balance::builder()
                .date(config.date_begin + Duration::days(1))
                .account(config.account_checking.clone())
                .amount(Amount::new(
                    to_cents(config.initial_checking()),
                    config.currency.clone(),
                ))
                .build(),
        ),
    ]
}

pub fn retirement_investment(config: &Config) -> Vec<Directive<'static>> {
    vec![open(
        config.date_begin,
        accounts::retirement_cash(),
        ccy(config),
    )]
}

pub fn taxable_investment(config: &Config) -> Vec<Directive<'static>> {
    vec![open(
        config.date_begin,
        accounts::investment_cash(),
        ccy(config),
    )]
}

pub fn credit_card(config: &Config) -> Vec<Directive<'static>> {
    vec![open(config.date_birth, accounts::credit_card(), ccy(config))]
}

/// Expense accounts used by the periodic templates, open from birth.
pub fn expenses(config: &Config) -> Vec<Directive<'static>> {
    [
        &["Food", "Restaurant"][..],
        &["Food", "Groceries"],
        &["Transport", "Subway"],
        &["Home", "Rent"],
        &["Home", "Electricity"],
        &["Home", "Internet"],
    ]
    .iter()
    .map(|parts| open(config.date_birth, accounts::expense(parts), vec![]))
    .collect()
}

/// Tax accounts not specific to any year.
pub fn tax_preamble(config: &Config) -> Vec<Directive<'static>> {
    vec![
        open(config.date_birth, accounts::pretax_income(), def_ccy(config)),
        open(config.date_birth, accounts::pretax_asset(), def_ccy(config)),
    ]
}

/// One year's tax accounts: the per-year expense account opens, a zero
/// assertion showing last year's allowance was fully used, and the
/// transaction granting this year's allowance.
pub fn tax_accounts(config: &Config, year: i32) -> Vec<Directive<'static>> {
    let jan_first = ledgerlab_core::Date::from_ymd_opt(year, 1, 1).unwrap();
    let limit = to_cents(config.retirement_limit(year));

    let mut directives = vec![open(
        jan_first,
        accounts::tax_expense(year, &["Federal", "PreTax401k"]),
        def_ccy(config),
    )];
    for leaf in &["Medicare", "Federal", "CityNYC", "SDI", "StateNY", "SocSec"] {
        directives.push(open(
            jan_first,
            accounts::tax_expense(year, &[leaf]),
            ccy(config),
        ));
    }

    directives.push(Directive::Balance(
        Balance::builder()
            .date(jan_first)
            .account(accounts::pretax_asset())
            .amount(Amount::new(Decimal::ZERO, config.deferred_currency.clone()))
            .build(),
    ));

    directives.push(Directive::Transaction(
        Transaction::builder()
            .date(jan_first)
            .narration("Allowed contributions for one year")
            .postings(vec![
                Posting::simple(
                    accounts::pretax_income(),
                    Amount::new(-limit, config.deferred_currency.clone()),
                ),
                Posting::simple(
                    accounts::pretax_asset(),
                    Amount::new(limit, config.deferred_currency.clone()),
                ),
            ])
            .build(),
    ));

    directives
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlab_core::Date;
    use std::str::FromStr;

    #[test]
    fn banking_asserts_the_initial_balance_the_next_day() {
        let config = Config::default();
        let directives = banking(&config);
        assert_eq!(directives.len(), 3);
        match &directives[2] {
            Directive::Balance(balance) => {
                assert_eq!(balance.date, Date::from_ymd_opt(2012, 1, 2).unwrap());
                assert_eq!(
                    balance.amount.num,
                    Decimal::from_str("2640.00").unwrap()
                );
            }
            other => panic!("expected a balance assertion, got {:?}", other),
        }
    }

    #[test]
    fn tax_year_grants_that_years_allowance() {
        let config = Config::default();
        let directives = tax_accounts(&config, 2013);
        let txn = directives
            .iter()
            .filter_map(|d| match d {
                Directive::Transaction(txn) => Some(txn),
                _ => None,
            })
            .next()
            .expect("allowance transaction");
        assert_eq!(txn.narration, "Allowed contributions for one year");
        assert_eq!(
            txn.postings[1].units.num,
            Decimal::from_str("17500.00").unwrap()
        );
        assert_eq!(txn.postings[1].units.currency, "DEFCCY");
        assert!(txn.is_balanced());
    }

    #[test]
    fn tax_year_asserts_the_shadow_account_is_exhausted() {
        let config = Config::default();
        let directives = tax_accounts(&config, 2013);
        let balance = directives
            .iter()
            .filter_map(|d| match d {
                Directive::Balance(balance) => Some(balance),
                _ => None,
            })
            .next()
            .expect("zero assertion");
        assert_eq!(balance.date, Date::from_ymd_opt(2013, 1, 1).unwrap());
        assert!(balance.amount.num.is_zero());
    }
}
