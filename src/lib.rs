//! Generation of a realistic multi-year ledger for a mock individual.
//!
//! All directives are first produced against purposely generic names such as
//! `Employer1`, `Bank1`, and the `CCY` commodity; only after the document is
//! serialized does a whole-word rename pass substitute realistic names. The
//! finished text is reloaded and validated before it is returned.

use chrono::Datelike;
use ledgerlab_core::{Account, Directive, InvalidAccount};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;

pub mod accounts;
pub mod assemble;
pub mod cadence;
pub mod config;
pub mod payroll;
pub mod scaffold;
pub mod template;
pub mod transfers;

pub use crate::config::Config;

use crate::assemble::{AssembleError, Section};
use crate::cadence::CadenceError;
use crate::template::{AmountSpec, StringSpec, TemplateError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no employers configured")]
    NoEmployers,
    #[error(transparent)]
    Cadence(#[from] CadenceError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Account(#[from] InvalidAccount),
}

/// Generates the complete ledger text from `config`, drawing all randomness
/// from `rng`.
pub fn generate<R: Rng>(config: &Config, rng: &mut R) -> Result<String, GenerateError> {
    let employer = config
        .employers
        .choose(rng)
        .ok_or(GenerateError::NoEmployers)?;
    log::info!("generating ledger for an employee of {}", employer.name);

    let income_entries = payroll::employment_income(config, employer)?;
    log::info!("generated {} income entries", income_entries.len());

    let banking_expenses = banking_expenses(config, rng)?;
    let credit_entries = credit_card_expenses(config, rng)?;

    // Sweep transfers are computed against the full transaction history in
    // canonical order.
    let mut merged: Vec<Directive<'static>> = income_entries
        .iter()
        .chain(&banking_expenses)
        .chain(&credit_entries)
        .cloned()
        .collect();
    ledgerlab_core::realize::sort(&mut merged);
    let banking_transfers = transfers::outgoing_transfers(
        &merged,
        &config.account_checking,
        &accounts::investment_cash(),
        &config.currency,
        config.transfer_minimum(),
        config.transfer_threshold,
    );
    log::info!("generated {} sweep transfers", banking_transfers.len());

    let mut banking_entries = scaffold::banking(config);
    banking_entries.extend(banking_transfers);
    banking_entries.extend(banking_expenses);

    let mut sections = vec![
        Section::new("* Equity Accounts", scaffold::equity(config)),
        Section::new("* Banking", banking_entries),
        Section::new("* Credit-Cards", credit_entries),
        Section::new("* Taxable Investments", scaffold::taxable_investment(config)),
        Section::new(
            "* Retirement Investments",
            scaffold::retirement_investment(config),
        ),
        Section::new("* Sources of Income", income_entries),
        Section::new("* Taxes", scaffold::tax_preamble(config)),
    ];
    for year in config.date_begin.year()..config.date_end.year() {
        sections.push(Section::new(
            &format!("** Tax Year {}", year),
            scaffold::tax_accounts(config, year),
        ));
    }
    sections.push(Section::new("* Expenses", scaffold::expenses(config)));
    sections.push(Section::new("* Cash", vec![]));

    let generic = assemble::assemble(&file_preamble(config), sections)?;

    let mut renames = config.renames.clone();
    renames.push(("Employer1".to_string(), employer.name.clone()));
    let contents = assemble::rename(&generic, &renames)?;

    // The monitored account is named in generic terms; validate against its
    // renamed form.
    let monitored: Account<'static> =
        assemble::rename(&config.account_checking.to_string(), &renames)?.parse()?;
    assemble::validate(&contents, &[monitored])?;
    log::info!("generated ledger validates clean");

    Ok(contents)
}

fn file_preamble(config: &Config) -> String {
    format!(
        ";; -*- mode: org -*-\n\
         ;; THIS FILE HAS BEEN AUTO-GENERATED.\n\
         * Options\n\
         \n\
         option \"title\" \"{}\"\n\
         option \"operating_currency\" \"{}\"\n",
        config.title, config.currency
    )
}

/// Rent, electricity, and internet paid monthly from checking, each shifted
/// by its own billing delay.
fn banking_expenses<R: Rng>(
    config: &Config,
    rng: &mut R,
) -> Result<Vec<Directive<'static>>, GenerateError> {
    let mut entries = Vec::new();

    let rent_dates: Vec<_> = cadence::delay(
        cadence::monthly(config.date_begin, config.date_end),
        2,
        5,
        rng,
    )?
    .collect();
    entries.extend(template::periodic_expenses(
        &rent_dates,
        &StringSpec::fixed("RiverBank Properties"),
        &StringSpec::fixed("Paying the rent"),
        &config.account_checking,
        &accounts::expense(&["Home", "Rent"]),
        &config.currency,
        &AmountSpec::Fixed(config.rent_amount()),
        rng,
    )?);

    let electricity_dates: Vec<_> = cadence::delay(
        cadence::monthly(config.date_begin, config.date_end),
        7,
        8,
        rng,
    )?
    .collect();
    entries.extend(template::periodic_expenses(
        &electricity_dates,
        &StringSpec::fixed("EDISON POWER"),
        &StringSpec::fixed(""),
        &config.account_checking,
        &accounts::expense(&["Home", "Electricity"]),
        &config.currency,
        &AmountSpec::Normal {
            mean: 65.0,
            std_dev: 0.0,
        },
        rng,
    )?);

    let internet_dates: Vec<_> = cadence::delay(
        cadence::monthly(config.date_begin, config.date_end),
        20,
        22,
        rng,
    )?
    .collect();
    entries.extend(template::periodic_expenses(
        &internet_dates,
        &StringSpec::fixed("Wine-Tarner Cable"),
        &StringSpec::fixed(""),
        &config.account_checking,
        &accounts::expense(&["Home", "Internet"]),
        &config.currency,
        &AmountSpec::Normal {
            mean: 80.0,
            std_dev: 0.10,
        },
        rng,
    )?);

    Ok(entries)
}

/// The credit card account open plus restaurant, groceries, and subway
/// spending at irregular randomized cadences.
fn credit_card_expenses<R: Rng>(
    config: &Config,
    rng: &mut R,
) -> Result<Vec<Directive<'static>>, GenerateError> {
    let mut entries = scaffold::credit_card(config);

    let restaurant_dates: Vec<_> =
        cadence::date_seq(config.date_begin, config.date_end, 1, 5, rng)?.collect();
    entries.extend(template::periodic_expenses(
        &restaurant_dates,
        &StringSpec::choice(&config.restaurant_names),
        &StringSpec::choice(&config.restaurant_narrations),
        &accounts::credit_card(),
        &accounts::expense(&["Food", "Restaurant"]),
        &config.currency,
        &AmountSpec::LogNormalCapped {
            location: 30f64.ln(),
            scale: 1.5f64.ln(),
            cap_min: 200,
            cap_max: 220,
        },
        rng,
    )?);

    let groceries_dates: Vec<_> =
        cadence::date_seq(config.date_begin, config.date_end, 5, 20, rng)?.collect();
    entries.extend(template::periodic_expenses(
        &groceries_dates,
        &StringSpec::choice(&config.groceries_names),
        &StringSpec::fixed("Buying groceries"),
        &accounts::credit_card(),
        &accounts::expense(&["Food", "Groceries"]),
        &config.currency,
        &AmountSpec::LogNormalCapped {
            location: 80f64.ln(),
            scale: 1.3f64.ln(),
            cap_min: 250,
            cap_max: 300,
        },
        rng,
    )?);

    let subway_dates: Vec<_> =
        cadence::date_seq(config.date_begin, config.date_end, 27, 33, rng)?.collect();
    entries.extend(template::periodic_expenses(
        &subway_dates,
        &StringSpec::fixed("Metro Transport"),
        &StringSpec::fixed("Subway tickets"),
        &accounts::credit_card(),
        &accounts::expense(&["Transport", "Subway"]),
        &config.currency,
        &AmountSpec::Fixed(Decimal::new(120, 0)),
        rng,
    )?);

    Ok(entries)
}
