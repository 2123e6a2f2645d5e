//! Compiled-in generation parameters.
//!
//! Everything the generator depends on is carried in one immutable [`Config`]
//! value built at startup; nothing reads module-level state. The defaults
//! describe a moderately complex mock individual: four years of biweekly
//! payroll, rent and utilities from checking, day-to-day spending on a
//! credit card.

use std::collections::HashMap;

use ledgerlab_core::{Account, AccountType, Date};
use rust_decimal::Decimal;

/// One employer the generated character may work for.
#[derive(Clone, Debug)]
pub struct Employer {
    pub name: String,
    pub address: String,
}

impl Employer {
    fn new(name: &str, address: &str) -> Self {
        Employer {
            name: name.to_string(),
            address: address.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Birth date of the character; long-lived accounts open here.
    pub date_birth: Date,
    /// Begin and end of the generated history.
    pub date_begin: Date,
    pub date_end: Date,

    pub annual_salary: Decimal,
    pub annual_vacation_days: Decimal,

    /// Divisor of the annual salary used to estimate the rent.
    pub rent_divisor: Decimal,

    pub employers: Vec<Employer>,
    pub restaurant_names: Vec<String>,
    pub restaurant_narrations: Vec<String>,
    pub groceries_names: Vec<String>,

    /// Statutory yearly retirement contribution limits; years absent from
    /// the table fall back to `retirement_limit_default`.
    pub retirement_limits: HashMap<i32, Decimal>,
    pub retirement_limit_default: Decimal,
    /// Yearly cap on the social-security-equivalent contribution.
    pub socsec_limit: Decimal,

    /// Funds beyond `transfer_minimum() + transfer_threshold` in checking
    /// are swept to the investment account.
    pub transfer_threshold: Decimal,

    /// Generic commodity names; the rename pass turns them realistic.
    pub currency: String,
    pub vacation_currency: String,
    pub deferred_currency: String,

    /// Generic-to-realistic whole-word renames applied to the final text,
    /// in order. The employer placeholder is appended at generation time.
    pub renames: Vec<(String, String)>,

    pub account_checking: Account<'static>,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        let retirement_limits = [
            (2000, 10_500),
            (2001, 10_500),
            (2002, 11_000),
            (2003, 12_000),
            (2004, 13_000),
            (2005, 14_000),
            (2006, 15_000),
            (2007, 15_500),
            (2008, 15_500),
            (2009, 16_500),
            (2010, 16_500),
            (2011, 16_500),
            (2012, 17_000),
            (2013, 17_500),
            (2014, 17_500),
            (2015, 18_000),
            (2016, 18_000),
        ]
        .iter()
        .map(|&(year, limit)| (year, Decimal::new(limit, 0)))
        .collect();

        let restaurant_names = [
            "Rose Flower",
            "Cafe Gomador",
            "Goba Goba",
            "Kin Soy",
            "Uncle Boons",
            "China Garden",
            "Jewel of Morroco",
            "Chichipotle",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let restaurant_narrations = [
            "with Joe",
            "with Natasha",
            "with Bill",
            "with Julie",
            "with work buddies",
            "after work",
            "alone",
            "",
        ]
        .iter()
        .map(|party| format!("Eating out {}", party))
        .collect();

        let groceries_names = ["Onion Market", "Whole Moods Market", "Corner Deli"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let renames = [
            ("CC", "US"),
            ("CCY", "USD"),
            ("VACCCY", "VACHR"),
            ("DEFCCY", "IRAUSD"),
            ("Bank1", "BofA"),
            ("CreditCard1", "Chase:Slate"),
            ("CreditCard2", "Amex:BlueCash"),
            ("Retirement", "Vanguard"),
        ]
        .iter()
        .map(|&(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Config {
            date_birth: Date::from_ymd_opt(1980, 1, 1).unwrap(),
            date_begin: Date::from_ymd_opt(2012, 1, 1).unwrap(),
            date_end: Date::from_ymd_opt(2016, 1, 1).unwrap(),
            annual_salary: Decimal::new(120_000, 0),
            annual_vacation_days: Decimal::new(15, 0),
            rent_divisor: Decimal::new(50, 0),
            employers: vec![
                Employer::new("Hooli", "1 Carloston Rd, Mountain Beer, CA"),
                Employer::new("BayBook", "1501 Billow Rd, Benlo Park, CA"),
                Employer::new("Babble", "1 Continuous Loop, Bupertina, CA"),
                Employer::new("Hoogle", "1600 Amphibious Parkway, River View, CA"),
            ],
            restaurant_names,
            restaurant_narrations,
            groceries_names,
            retirement_limits,
            retirement_limit_default: Decimal::new(18_500, 0),
            socsec_limit: Decimal::new(7_000, 0),
            transfer_threshold: Decimal::new(4_000, 0),
            currency: "CCY".to_string(),
            vacation_currency: "VACCCY".to_string(),
            deferred_currency: "DEFCCY".to_string(),
            renames,
            account_checking: Account::join(
                AccountType::Assets,
                vec!["CC", "Bank1", "Checking"],
            ),
            title: "Example ledger file".to_string(),
        }
    }
}

impl Config {
    /// Estimated monthly rent: the salary divided by `rent_divisor`, rounded
    /// down to whole units.
    pub fn rent_amount(&self) -> Decimal {
        (self.annual_salary / self.rent_divisor).floor()
    }

    /// Funds always left in checking after a sweep transfer.
    pub fn transfer_minimum(&self) -> Decimal {
        self.rent_amount() + Decimal::new(100, 0)
    }

    /// Opening balance of the checking account.
    pub fn initial_checking(&self) -> Decimal {
        self.rent_amount() * Decimal::new(110, 2)
    }

    pub fn retirement_limit(&self, year: i32) -> Decimal {
        self.retirement_limits
            .get(&year)
            .copied()
            .unwrap_or(self.retirement_limit_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn default_rent_and_transfer_bounds() {
        let config = Config::default();
        assert_eq!(config.rent_amount(), Decimal::new(2400, 0));
        assert_eq!(config.transfer_minimum(), Decimal::new(2500, 0));
        assert_eq!(
            config.initial_checking(),
            Decimal::from_str("2640.00").unwrap()
        );
    }

    #[test]
    fn rent_is_the_floored_salary_quotient() {
        let config = Config {
            annual_salary: Decimal::new(121_300, 0),
            ..Config::default()
        };
        assert_eq!(config.rent_amount(), Decimal::new(2426, 0));
    }

    #[test]
    fn transfer_minimum_tracks_the_unrounded_rent() {
        // 133700 / 50 = 2674, so sweeps leave 2774.00 in checking.
        let config = Config {
            annual_salary: Decimal::new(133_700, 0),
            ..Config::default()
        };
        assert_eq!(config.rent_amount(), Decimal::new(2674, 0));
        assert_eq!(config.transfer_minimum(), Decimal::new(2774, 0));
    }

    #[test]
    fn retirement_limit_falls_back_to_default() {
        let config = Config::default();
        assert_eq!(config.retirement_limit(2012), Decimal::new(17_000, 0));
        assert_eq!(config.retirement_limit(2015), Decimal::new(18_000, 0));
        assert_eq!(config.retirement_limit(2030), Decimal::new(18_500, 0));
    }
}
