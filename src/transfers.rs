//! Threshold sweeps: replay the postings affecting one account and move the
//! surplus to a savings account whenever the balance climbs too high.

use chrono::Duration;
use ledgerlab_core::{realize, Account, Amount, Directive, Inventory, Posting, Transaction};
use rust_decimal::Decimal;

use crate::template::to_cents;

const TRANSFER_NARRATION: &str = "Transfering accumulated savings to other account";

/// Replays `entries` (already canonically sorted) against `account`,
/// accumulating an inventory. Whenever the `currency` balance exceeds
/// `minimum + threshold`, a transfer of `balance - minimum` to
/// `account_out` is synthesized, dated one day after the triggering
/// posting, and reflected in the running balance immediately.
///
/// The input entries are never mutated; only the new transfers are
/// returned, and the caller must merge and re-sort them with the
/// originals before any further balance-sensitive processing.
pub fn outgoing_transfers(
    entries: &[Directive<'static>],
    account: &Account<'static>,
    account_out: &Account<'static>,
    currency: &str,
    minimum: Decimal,
    threshold: Decimal,
) -> Vec<Directive<'static>> {
    let mut transfers = Vec::new();
    let mut balance = Inventory::new();

    for txn_posting in realize::postings(entries, account) {
        balance.add_amount(&txn_posting.posting.units);

        let current = balance.units(currency);
        if current > minimum + threshold {
            let transfer_amount = to_cents(current - minimum);
            transfers.push(Directive::Transaction(
                Transaction::builder()
                    .date(txn_posting.date() + Duration::days(1))
                    .narration(TRANSFER_NARRATION)
                    .postings(vec![
                        Posting::simple(
                            account.clone(),
                            Amount::new(-transfer_amount, currency.to_string()),
                        ),
                        Posting::simple(
                            account_out.clone(),
                            Amount::new(transfer_amount, currency.to_string()),
                        ),
                    ])
                    .build(),
            ));
            balance.add(currency.to_string().into(), -transfer_amount);
        }
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts;
    use ledgerlab_core::Date;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn checking() -> Account<'static> {
        ledgerlab_core::Account::join(
            ledgerlab_core::AccountType::Assets,
            vec!["CC", "Bank1", "Checking"],
        )
    }

    fn deposit(date: Date, amount: &str) -> Directive<'static> {
        Directive::Transaction(
            Transaction::builder()
                .date(date)
                .narration("Payroll")
                .postings(vec![
                    Posting::simple(checking(), Amount::new(dec(amount), "CCY")),
                    Posting::simple(
                        accounts::employer_income("Salary"),
                        Amount::new(-dec(amount), "CCY"),
                    ),
                ])
                .build(),
        )
    }

    #[test]
    fn sweeps_the_surplus_the_day_after_the_trigger() {
        // Minimum 2774.00, threshold 4000.00: a balance of 6800.00 is over
        // the line, so 4026.00 moves out the next day.
        let entries = vec![
            deposit(ymd(2012, 1, 5), "3400.00"),
            deposit(ymd(2012, 1, 19), "3400.00"),
        ];
        let transfers = outgoing_transfers(
            &entries,
            &checking(),
            &accounts::investment_cash(),
            "CCY",
            dec("2774.00"),
            dec("4000.00"),
        );

        assert_eq!(transfers.len(), 1);
        match &transfers[0] {
            Directive::Transaction(txn) => {
                assert_eq!(txn.date, ymd(2012, 1, 20));
                assert_eq!(txn.postings[0].units.num, dec("-4026.00"));
                assert_eq!(txn.postings[1].units.num, dec("4026.00"));
                assert!(txn.postings[1].account.matches(&accounts::investment_cash()));
                assert!(txn.is_balanced());
            }
            other => panic!("expected a transaction, got {:?}", other),
        }
    }

    #[test]
    fn subsequent_postings_see_the_reduced_balance() {
        let entries = vec![
            deposit(ymd(2012, 1, 5), "7000.00"),
            deposit(ymd(2012, 1, 19), "500.00"),
            deposit(ymd(2012, 2, 2), "6000.00"),
        ];
        let transfers = outgoing_transfers(
            &entries,
            &checking(),
            &accounts::investment_cash(),
            "CCY",
            dec("2500.00"),
            dec("4000.00"),
        );

        // 7000 triggers (leaves 2500); 500 puts it at 3000, no trigger;
        // 6000 puts it at 9000, triggering a 6500 sweep.
        assert_eq!(transfers.len(), 2);
        let amounts: Vec<Decimal> = transfers
            .iter()
            .filter_map(|d| match d {
                Directive::Transaction(txn) => Some(txn.postings[1].units.num),
                _ => None,
            })
            .collect();
        assert_eq!(amounts, vec![dec("4500.00"), dec("6500.00")]);
    }

    #[test]
    fn balance_at_the_line_does_not_trigger() {
        let entries = vec![deposit(ymd(2012, 1, 5), "6500.00")];
        let transfers = outgoing_transfers(
            &entries,
            &checking(),
            &accounts::investment_cash(),
            "CCY",
            dec("2500.00"),
            dec("4000.00"),
        );
        assert!(transfers.is_empty());
    }

    #[test]
    fn input_entries_are_untouched() {
        let entries = vec![deposit(ymd(2012, 1, 5), "7000.00")];
        let before = entries.clone();
        let _ = outgoing_transfers(
            &entries,
            &checking(),
            &accounts::investment_cash(),
            "CCY",
            dec("2500.00"),
            dec("4000.00"),
        );
        assert_eq!(entries, before);
    }
}
