//! Biweekly payroll: gross pay, statutory withholdings, and year-capped
//! retirement / social-security-equivalent contributions, emitted as one
//! multi-leg transaction per pay date.
//!
//! Every component is rounded to cents before the net deposit is derived
//! from the rounded values, so each transaction balances exactly at
//! construction.

use chrono::{Datelike, Weekday};
use ledgerlab_core::{Amount, Directive, Event, Open, Posting, Transaction};
use rust_decimal::Decimal;

use crate::accounts;
use crate::cadence::{self, CadenceError};
use crate::config::{Config, Employer};
use crate::template::to_cents;

// Withholding rates, as fractions of biweekly gross pay.
const MEDICARE_RATE: Decimal = Decimal::from_parts(231, 0, 0, false, 4);
const FEDERAL_RATE: Decimal = Decimal::from_parts(2303, 0, 0, false, 4);
const STATE_RATE: Decimal = Decimal::from_parts(791, 0, 0, false, 4);
const CITY_RATE: Decimal = Decimal::from_parts(379, 0, 0, false, 4);
const SOCSEC_RATE: Decimal = Decimal::from_parts(610, 0, 0, false, 4);
const RETIREMENT_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

// Flat per-pay-period amounts.
const SDI: Decimal = Decimal::from_parts(112, 0, 0, false, 2);
const LIFE_INSURANCE: Decimal = Decimal::from_parts(2432, 0, 0, false, 2);
const DENTAL: Decimal = Decimal::from_parts(290, 0, 0, false, 2);
const MEDICAL: Decimal = Decimal::from_parts(2738, 0, 0, false, 2);
const VISION: Decimal = Decimal::from_parts(4230, 0, 0, false, 2);

const PAY_PERIODS_PER_YEAR: i64 = 26;

/// Remaining contribution capacities, reset on every calendar-year entry.
struct YearCapacity {
    year: Option<i32>,
    retirement: Decimal,
    socsec: Decimal,
}

impl YearCapacity {
    fn new() -> Self {
        YearCapacity {
            year: None,
            retirement: Decimal::ZERO,
            socsec: Decimal::ZERO,
        }
    }

    /// Enters `year`, resetting both capacities if it is a new year.
    fn roll(&mut self, config: &Config, year: i32) {
        if self.year != Some(year) {
            self.year = Some(year);
            self.retirement = config.retirement_limit(year);
            self.socsec = config.socsec_limit;
        }
    }

    fn take_retirement(&mut self, requested: Decimal) -> Decimal {
        Self::take(&mut self.retirement, requested)
    }

    fn take_socsec(&mut self, requested: Decimal) -> Decimal {
        Self::take(&mut self.socsec, requested)
    }

    /// Caps `requested` by the remaining capacity and consumes it.
    fn take(capacity: &mut Decimal, requested: Decimal) -> Decimal {
        let granted = requested.min(*capacity);
        *capacity -= granted;
        granted
    }
}

/// Generates the employment preamble (event, account opens) and one payroll
/// transaction per biweekly pay date.
pub fn employment_income(
    config: &Config,
    employer: &Employer,
) -> Result<Vec<Directive<'static>>, CadenceError> {
    let ccy = config.currency.as_str();
    let vac_ccy = config.vacation_currency.as_str();
    let def_ccy = config.deferred_currency.as_str();

    let mut directives = preamble(config, employer);

    let gross = to_cents(config.annual_salary / Decimal::new(PAY_PERIODS_PER_YEAR, 0));
    let medicare = to_cents(gross * MEDICARE_RATE);
    let federal = to_cents(gross * FEDERAL_RATE);
    let state = to_cents(gross * STATE_RATE);
    let city = to_cents(gross * CITY_RATE);
    let fixed = medicare + federal + state + city + SDI + DENTAL + MEDICAL + VISION;

    let retirement_uncapped = ((gross * RETIREMENT_RATE) / Decimal::new(100, 0)).ceil()
        * Decimal::new(100, 0);
    let socsec_uncapped = to_cents(gross * SOCSEC_RATE);

    // Accrued at reduced precision to mimic a coarse accrual rounding.
    let vacation_raw =
        (config.annual_vacation_days * Decimal::new(8, 0)) / Decimal::new(PAY_PERIODS_PER_YEAR, 0);
    let vacation = to_cents(vacation_raw.round_sf(4).unwrap_or(vacation_raw));

    let pay_dates = cadence::every_nth(
        cadence::weekly(config.date_begin, config.date_end, Weekday::Thu),
        2,
    )?;

    let mut capacity = YearCapacity::new();
    for date in pay_dates {
        let year = date.year();
        capacity.roll(config, year);

        let retirement = capacity.take_retirement(retirement_uncapped);
        let socsec = to_cents(capacity.take_socsec(socsec_uncapped));

        let deposit = gross - retirement - fixed - socsec;

        let mut postings = vec![Posting::simple(
            config.account_checking.clone(),
            Amount::new(to_cents(deposit), ccy.to_string()),
        )];
        if !retirement.is_zero() {
            postings.push(Posting::simple(
                accounts::retirement_cash(),
                Amount::new(to_cents(retirement), ccy.to_string()),
            ));
            postings.push(Posting::simple(
                accounts::pretax_asset(),
                Amount::new(to_cents(-retirement), def_ccy.to_string()),
            ));
            postings.push(Posting::simple(
                accounts::tax_expense(year, &["Federal", "PreTax401k"]),
                Amount::new(to_cents(retirement), def_ccy.to_string()),
            ));
        }
        postings.push(Posting::simple(
            accounts::employer_income("Salary"),
            Amount::new(-gross, ccy.to_string()),
        ));
        postings.push(Posting::simple(
            accounts::employer_income("GroupTermLife"),
            Amount::new(-LIFE_INSURANCE, ccy.to_string()),
        ));
        postings.push(Posting::simple(
            accounts::health("Life", "GroupTermLife"),
            Amount::new(LIFE_INSURANCE, ccy.to_string()),
        ));
        postings.push(Posting::simple(
            accounts::health("Dental", "Insurance"),
            Amount::new(DENTAL, ccy.to_string()),
        ));
        postings.push(Posting::simple(
            accounts::health("Medical", "Insurance"),
            Amount::new(MEDICAL, ccy.to_string()),
        ));
        postings.push(Posting::simple(
            accounts::health("Vision", "Insurance"),
            Amount::new(VISION, ccy.to_string()),
        ));
        for (leaf, withheld) in &[
            ("Medicare", medicare),
            ("Federal", federal),
            ("StateNY", state),
            ("CityNYC", city),
            ("SDI", SDI),
        ] {
            postings.push(Posting::simple(
                accounts::tax_expense(year, &[leaf]),
                Amount::new(*withheld, ccy.to_string()),
            ));
        }
        if !socsec.is_zero() {
            postings.push(Posting::simple(
                accounts::tax_expense(year, &["SocSec"]),
                Amount::new(socsec, ccy.to_string()),
            ));
        }
        postings.push(Posting::simple(
            accounts::employer_vacation_asset(),
            Amount::new(vacation, vac_ccy.to_string()),
        ));
        postings.push(Posting::simple(
            accounts::employer_income("Vacation"),
            Amount::new(-vacation, vac_ccy.to_string()),
        ));

        directives.push(Directive::Transaction(
            Transaction::builder()
                .date(date)
                .payee(Some(employer.name.clone().into()))
                .narration("Payroll")
                .postings(postings)
                .build(),
        ));
    }

    Ok(directives)
}

fn preamble(config: &Config, employer: &Employer) -> Vec<Directive<'static>> {
    let date = config.date_begin;
    let ccy = || vec![config.currency.clone().into()];
    let vac_ccy = || vec![config.vacation_currency.clone().into()];

    let mut directives = vec![Directive::Event(
        Event::builder()
            .date(date)
            .name("employer")
            .description(format!("{}, {}", employer.name, employer.address))
            .build(),
    )];

    let opens: Vec<(ledgerlab_core::Account<'static>, Vec<ledgerlab_core::Currency<'static>>)> = vec![
        (accounts::employer_income("Salary"), ccy()),
        (accounts::employer_income("GroupTermLife"), ccy()),
        (accounts::employer_income("Vacation"), vac_ccy()),
        (accounts::employer_vacation_asset(), vac_ccy()),
        (accounts::health("Life", "GroupTermLife"), vec![]),
        (accounts::health("Medical", "Insurance"), vec![]),
        (accounts::health("Dental", "Insurance"), vec![]),
        (accounts::health("Vision", "Insurance"), vec![]),
    ];
    for (account, currencies) in opens {
        directives.push(Directive::Open(
            Open::builder()
                .date(date)
                .account(account)
                .currencies(currencies)
                .build(),
        ));
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlab_core::Date;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn default_income() -> Vec<Directive<'static>> {
        let config = Config::default();
        let employer = config.employers[0].clone();
        employment_income(&config, &employer).unwrap()
    }

    fn transactions<'a>(directives: &'a [Directive<'static>]) -> Vec<&'a Transaction<'static>> {
        directives
            .iter()
            .filter_map(|d| match d {
                Directive::Transaction(txn) => Some(txn),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn every_pay_transaction_balances() {
        let directives = default_income();
        let txns = transactions(&directives);
        assert!(!txns.is_empty());
        for txn in txns {
            assert!(txn.is_balanced(), "unbalanced payroll on {}", txn.date);
        }
    }

    #[test]
    fn first_pay_has_the_expected_legs() {
        let directives = default_income();
        let txns = transactions(&directives);
        let first = txns[0];
        assert_eq!(first.date, Date::from_ymd_opt(2012, 1, 5).unwrap());
        assert_eq!(first.payee.as_deref(), Some("Hooli"));
        assert_eq!(first.narration, "Payroll");

        let units = |account: &str| -> Decimal {
            let wanted: ledgerlab_core::Account<'static> = account.parse().unwrap();
            first
                .postings
                .iter()
                .find(|p| p.account.matches(&wanted))
                .map(|p| p.units.num)
                .unwrap_or_else(|| panic!("no posting for {}", account))
        };

        assert_eq!(units("Income:CC:Employer1:Salary"), dec("-4615.38"));
        assert_eq!(units("Assets:CC:Bank1:Checking"), dec("1350.60"));
        assert_eq!(units("Assets:CC:Retirement:Cash"), dec("1200.00"));
        assert_eq!(units("Assets:CC:Federal:PreTax401k"), dec("-1200.00"));
        assert_eq!(units("Expenses:Taxes:Y2012:CC:Medicare"), dec("106.62"));
        assert_eq!(units("Expenses:Taxes:Y2012:CC:Federal"), dec("1062.92"));
        assert_eq!(units("Expenses:Taxes:Y2012:CC:StateNY"), dec("365.08"));
        assert_eq!(units("Expenses:Taxes:Y2012:CC:CityNYC"), dec("174.92"));
        assert_eq!(units("Expenses:Taxes:Y2012:CC:SDI"), dec("1.12"));
        assert_eq!(units("Expenses:Taxes:Y2012:CC:SocSec"), dec("281.54"));
        assert_eq!(units("Assets:CC:Employer1:Vacation"), dec("4.62"));
    }

    #[test]
    fn retirement_legs_vanish_once_the_year_cap_is_hit() {
        let directives = default_income();
        let txns = transactions(&directives);
        let retirement_cash = accounts::retirement_cash();

        let mut by_year: std::collections::HashMap<i32, Decimal> =
            std::collections::HashMap::new();
        for txn in &txns {
            let contributed: Decimal = txn
                .postings
                .iter()
                .filter(|p| p.account.matches(&retirement_cash))
                .map(|p| p.units.num)
                .sum();
            *by_year.entry(txn.date.year()).or_default() += contributed;
        }

        let config = Config::default();
        for (&year, &total) in &by_year {
            assert!(
                total <= config.retirement_limit(year),
                "year {} contributed {}",
                year,
                total
            );
        }
        // 2012 has a 17000 limit: 14 full 1200 contributions, one partial,
        // then no retirement legs at all for the rest of the year.
        let contributions_2012: Vec<Decimal> = txns
            .iter()
            .filter(|t| t.date.year() == 2012)
            .filter_map(|t| {
                t.postings
                    .iter()
                    .find(|p| p.account.matches(&retirement_cash))
                    .map(|p| p.units.num)
            })
            .collect();
        assert_eq!(contributions_2012.len(), 15);
        assert_eq!(contributions_2012[13], dec("1200.00"));
        assert_eq!(contributions_2012[14], dec("200.00"));
        assert_eq!(by_year[&2012], dec("17000.00"));
    }

    #[test]
    fn capacity_resets_at_the_year_boundary() {
        let directives = default_income();
        let txns = transactions(&directives);
        let retirement_cash = accounts::retirement_cash();

        let first_2013 = txns
            .iter()
            .find(|t| t.date.year() == 2013)
            .expect("pay dates in 2013");
        let contribution = first_2013
            .postings
            .iter()
            .find(|p| p.account.matches(&retirement_cash))
            .expect("retirement leg on the first 2013 pay");
        assert_eq!(contribution.units.num, dec("1200.00"));
    }

    #[test]
    fn socsec_legs_vanish_once_capped() {
        let directives = default_income();
        let txns = transactions(&directives);
        let socsec_2012 = accounts::tax_expense(2012, &["SocSec"]);

        let legs: Vec<Decimal> = txns
            .iter()
            .filter(|t| t.date.year() == 2012)
            .filter_map(|t| {
                t.postings
                    .iter()
                    .find(|p| p.account.matches(&socsec_2012))
                    .map(|p| p.units.num)
            })
            .collect();
        // 7000 / 281.54 => 24 full withholdings and one partial.
        assert_eq!(legs.len(), 25);
        assert!(legs.iter().all(|leg| *leg > Decimal::ZERO));
        let total: Decimal = legs.iter().sum();
        assert_eq!(total, dec("7000.00"));
    }

    #[test]
    fn preamble_opens_employment_accounts_at_range_start() {
        let directives = default_income();
        let begin = Date::from_ymd_opt(2012, 1, 1).unwrap();
        let opens: Vec<_> = directives
            .iter()
            .filter_map(|d| match d {
                Directive::Open(open) => Some(open),
                _ => None,
            })
            .collect();
        assert_eq!(opens.len(), 8);
        assert!(opens.iter().all(|open| open.date == begin));
        assert!(matches!(&directives[0], Directive::Event(event) if event.name == "employer"));
    }
}
