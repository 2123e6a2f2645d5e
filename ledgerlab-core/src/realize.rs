//! Minimal realization: the ordered postings affecting one account, plus the
//! canonical directive ordering shared by the generator and the loader.

use super::{Account, Date, Directive, Posting, Transaction};

/// One posting paired with the transaction it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct TxnPosting<'a, 'd> {
    pub txn: &'d Transaction<'a>,
    pub posting: &'d Posting<'a>,
}

impl TxnPosting<'_, '_> {
    pub fn date(&self) -> Date {
        self.txn.date
    }
}

/// Sorts directives into the canonical global order: by date, with opens
/// before balance assertions before other directives on the same day, and
/// otherwise preserving the original relative order.
pub fn sort(directives: &mut [Directive<'_>]) {
    directives.sort_by_key(|directive| (directive.date(), directive.type_order()));
}

/// Collects the postings affecting `account`, in the order the directives
/// appear. Pass a canonically sorted slice to obtain chronological postings.
pub fn postings<'a, 'd>(
    directives: &'d [Directive<'a>],
    account: &Account<'_>,
) -> Vec<TxnPosting<'a, 'd>> {
    let mut found = Vec::new();
    for directive in directives {
        if let Directive::Transaction(txn) = directive {
            for posting in &txn.postings {
                if posting.account.matches(account) {
                    found.push(TxnPosting { txn, posting });
                }
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, Balance, Open, Posting};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(date: Date, account: &str, num: &str) -> Directive<'static> {
        Directive::Transaction(
            Transaction::builder()
                .date(date)
                .narration("test")
                .postings(vec![
                    Posting::simple(
                        Account::from_str(account).unwrap(),
                        Amount::new(Decimal::from_str(num).unwrap(), "USD"),
                    ),
                    Posting::simple(
                        Account::from_str("Equity:Opening-Balances").unwrap(),
                        Amount::new(-Decimal::from_str(num).unwrap(), "USD"),
                    ),
                ])
                .build(),
        )
    }

    #[test]
    fn sort_is_stable_within_a_day() {
        let checking: Account<'static> = "Assets:US:Bank:Checking".parse().unwrap();
        let mut directives = vec![
            txn(ymd(2012, 1, 2), "Assets:US:Bank:Checking", "10.00"),
            Directive::Balance(
                Balance::builder()
                    .date(ymd(2012, 1, 2))
                    .account(checking.clone())
                    .amount(Amount::new(Decimal::ZERO, "USD"))
                    .build(),
            ),
            Directive::Open(
                Open::builder()
                    .date(ymd(2012, 1, 2))
                    .account(checking.clone())
                    .build(),
            ),
            txn(ymd(2012, 1, 1), "Assets:US:Bank:Checking", "5.00"),
        ];
        sort(&mut directives);

        assert!(matches!(directives[0], Directive::Transaction(_)));
        assert_eq!(directives[0].date(), Some(ymd(2012, 1, 1)));
        assert!(matches!(directives[1], Directive::Open(_)));
        assert!(matches!(directives[2], Directive::Balance(_)));
        assert!(matches!(directives[3], Directive::Transaction(_)));
    }

    #[test]
    fn postings_filters_by_account() {
        let checking: Account<'static> = "Assets:US:Bank:Checking".parse().unwrap();
        let directives = vec![
            txn(ymd(2012, 1, 1), "Assets:US:Bank:Checking", "5.00"),
            txn(ymd(2012, 1, 2), "Expenses:Food:Groceries", "80.00"),
            txn(ymd(2012, 1, 3), "Assets:US:Bank:Checking", "-2.50"),
        ];
        let found = postings(&directives, &checking);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].date(), ymd(2012, 1, 1));
        assert_eq!(found[1].posting.units.num, Decimal::from_str("-2.50").unwrap());
    }
}
