use std::borrow::Cow;
use std::str::FromStr;

use pest::iterators::{Pair, Pairs};
use pest::{Parser, Span};
use pest_derive::Parser as PestParser;
use rust_decimal::Decimal;

use ledgerlab_core as lc;

use crate::error::{ParseError, ParseResult};

pub mod error;
pub mod loader;

#[derive(PestParser)]
#[grammar = "ledger.pest"]
pub struct LedgerParser;

fn optional_rule<'i>(rule: Rule, pairs: &mut Pairs<'i, Rule>) -> Option<Pair<'i, Rule>> {
    match pairs.peek() {
        Some(ref p) if p.as_rule() == rule => pairs.next(),
        _ => None,
    }
}

fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: &Span<'i>,
    expected: &str,
) -> ParseResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| ParseError::invalid_state_with_span(expected, span.clone()))
}

/// Parses a full ledger document into its directives, in source order.
///
/// Org-mode section titles and comments are skipped; every other line must be
/// a directive this grammar knows about.
pub fn parse<'i>(input: &'i str) -> ParseResult<lc::Ledger<'i>> {
    let parsed = LedgerParser::parse(Rule::file, input)?
        .next()
        .ok_or_else(|| ParseError::invalid_state("non-empty parse result"))?;

    let mut directives = Vec::new();
    for pair in parsed.into_inner() {
        match pair.as_rule() {
            Rule::EOI => break,
            _ => directives.push(directive(pair)?),
        }
    }

    Ok(lc::Ledger::builder().directives(directives).build())
}

fn directive<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Directive<'i>> {
    match pair.as_rule() {
        Rule::option => option_directive(pair),
        Rule::open => open_directive(pair),
        Rule::pad => pad_directive(pair),
        Rule::balance => balance_directive(pair),
        Rule::event => event_directive(pair),
        Rule::transaction => transaction_directive(pair),
        rule => Err(ParseError::invalid_state(format!(
            "a directive, found {:?}",
            rule
        ))),
    }
}

fn option_directive<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Directive<'i>> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let name = get_quoted_str(next_pair(&mut pairs, &span, "option name")?)?;
    let val = get_quoted_str(next_pair(&mut pairs, &span, "option value")?)?;
    Ok(lc::Directive::Option(
        lc::LedgerOption::builder().name(name).val(val).build(),
    ))
}

fn open_directive<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Directive<'i>> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let d = date(next_pair(&mut pairs, &span, "date")?)?;
    let acc = account(next_pair(&mut pairs, &span, "account")?)?;
    let currencies = match optional_rule(Rule::commodity_list, &mut pairs) {
        Some(list) => list
            .into_inner()
            .map(|p| Cow::Borrowed(p.as_str()))
            .collect(),
        None => Vec::new(),
    };
    Ok(lc::Directive::Open(
        lc::Open::builder()
            .date(d)
            .account(acc)
            .currencies(currencies)
            .build(),
    ))
}

fn pad_directive<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Directive<'i>> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let d = date(next_pair(&mut pairs, &span, "date")?)?;
    let pad_to = account(next_pair(&mut pairs, &span, "account to pad")?)?;
    let pad_from = account(next_pair(&mut pairs, &span, "account to pad from")?)?;
    Ok(lc::Directive::Pad(
        lc::Pad::builder()
            .date(d)
            .pad_to_account(pad_to)
            .pad_from_account(pad_from)
            .build(),
    ))
}

fn balance_directive<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Directive<'i>> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let d = date(next_pair(&mut pairs, &span, "date")?)?;
    let acc = account(next_pair(&mut pairs, &span, "account")?)?;
    let amt = amount(next_pair(&mut pairs, &span, "amount")?)?;
    Ok(lc::Directive::Balance(
        lc::Balance::builder()
            .date(d)
            .account(acc)
            .amount(amt)
            .build(),
    ))
}

fn event_directive<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Directive<'i>> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let d = date(next_pair(&mut pairs, &span, "date")?)?;
    let name = get_quoted_str(next_pair(&mut pairs, &span, "event name")?)?;
    let description = get_quoted_str(next_pair(&mut pairs, &span, "event description")?)?;
    Ok(lc::Directive::Event(
        lc::Event::builder()
            .date(d)
            .name(name)
            .description(description)
            .build(),
    ))
}

fn transaction_directive<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Directive<'i>> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let d = date(next_pair(&mut pairs, &span, "date")?)?;
    let flag = lc::Flag::from(next_pair(&mut pairs, &span, "transaction flag")?.as_str());
    let (payee, narration) = txn_strings(next_pair(&mut pairs, &span, "transaction strings")?)?;
    let postings = pairs.map(posting).collect::<ParseResult<Vec<_>>>()?;
    Ok(lc::Directive::Transaction(
        lc::Transaction::builder()
            .date(d)
            .flag(flag)
            .payee(payee)
            .narration(narration)
            .postings(postings)
            .build(),
    ))
}

fn txn_strings<'i>(
    pair: Pair<'i, Rule>,
) -> ParseResult<(Option<Cow<'i, str>>, Cow<'i, str>)> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let first = get_quoted_str(next_pair(&mut pairs, &span, "narration")?)?;
    match pairs.next() {
        Some(second) => Ok((Some(first), get_quoted_str(second)?)),
        None => Ok((None, first)),
    }
}

fn posting<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Posting<'i>> {
    debug_assert!(pair.as_rule() == Rule::posting);
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let acc = account(next_pair(&mut pairs, &span, "account")?)?;
    let units = amount(next_pair(&mut pairs, &span, "amount")?)?;
    let price = match optional_rule(Rule::price_annotation, &mut pairs) {
        Some(annotation) => {
            let span = annotation.as_span();
            let mut pairs = annotation.into_inner();
            Some(amount(next_pair(&mut pairs, &span, "price amount")?)?)
        }
        None => None,
    };
    Ok(lc::Posting::builder()
        .account(acc)
        .units(units)
        .price(price)
        .build())
}

fn account<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Account<'i>> {
    debug_assert!(pair.as_rule() == Rule::account);
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let first = next_pair(&mut pairs, &span, "account category")?;
    let ty = lc::AccountType::from_str(first.as_str()).map_err(|()| {
        ParseError::invalid_input_with_span(
            format!("unknown account category '{}'", first.as_str()),
            first.as_span(),
        )
    })?;
    let parts: Vec<Cow<'i, str>> = pairs.map(|p| Cow::Borrowed(p.as_str())).collect();
    Ok(lc::Account::builder().ty(ty).parts(parts).build())
}

fn amount<'i>(pair: Pair<'i, Rule>) -> ParseResult<lc::Amount<'i>> {
    debug_assert!(pair.as_rule() == Rule::amount);
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let number = num(next_pair(&mut pairs, &span, "number")?)?;
    let currency = next_pair(&mut pairs, &span, "commodity")?;
    Ok(lc::Amount::builder()
        .num(number)
        .currency(Cow::Borrowed(currency.as_str()))
        .build())
}

fn num(pair: Pair<'_, Rule>) -> ParseResult<Decimal> {
    debug_assert!(pair.as_rule() == Rule::num);
    Decimal::from_str(pair.as_str())
        .map_err(|err| ParseError::decimal_parse_error(err, pair.as_span()))
}

fn date(pair: Pair<'_, Rule>) -> ParseResult<lc::Date> {
    debug_assert!(pair.as_rule() == Rule::date);
    lc::Date::parse_from_str(pair.as_str(), "%Y-%m-%d")
        .map_err(|err| ParseError::date_parse_error(err, pair.as_span()))
}

fn get_quoted_str<'i>(pair: Pair<'i, Rule>) -> ParseResult<Cow<'i, str>> {
    debug_assert!(pair.as_rule() == Rule::quoted_str);
    let span = pair.as_span();
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| ParseError::invalid_state_with_span("quoted string", span))?;
    Ok(Cow::Borrowed(inner.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pest::Parser;
    use rust_decimal::Decimal;

    macro_rules! parse_ok {
        ( $rule:ident, $input:expr ) => {
            assert_eq!(
                LedgerParser::parse(Rule::$rule, $input).unwrap().as_str(),
                $input
            );
        };
        ( $rule:ident, $input:expr, $output:expr ) => {
            assert_eq!(
                LedgerParser::parse(Rule::$rule, $input).unwrap().as_str(),
                $output
            );
        };
    }

    macro_rules! parse_fail {
        ( $rule:ident, $input:expr ) => {
            assert!(LedgerParser::parse(Rule::$rule, $input).is_err());
        };
    }

    #[test]
    fn date() {
        parse_ok!(date, "2012-01-01");
        parse_ok!(date, "1980-05-12");

        parse_fail!(date, "123-01-01");
        parse_fail!(date, "2012/01/01");
        parse_fail!(date, "2012 01 01");
    }

    #[test]
    fn num() {
        parse_ok!(num, "1");
        parse_ok!(num, "2400.00");
        parse_ok!(num, "-79.4");
        parse_ok!(num, "4.615");

        parse_fail!(num, ".5");
        parse_fail!(num, "x");
    }

    #[test]
    fn amount() {
        parse_ok!(amount, "100.00 USD");
        parse_ok!(amount, "-1200.00 IRAUSD");
        parse_ok!(amount, "4.62 VACHR");
        parse_ok!(amount, "120.2212 RGAGX");

        parse_fail!(amount, "100.00");
        parse_fail!(amount, "USD");
        parse_fail!(amount, "100.00 usd");
    }

    #[test]
    fn account() {
        parse_ok!(account, "Assets:US:BofA:Checking");
        parse_ok!(account, "Liabilities:US:Chase:Slate");
        parse_ok!(account, "Equity:Opening-Balances");
        parse_ok!(account, "Expenses:Taxes:Y2012:US:Federal:PreTax401k");
        parse_ok!(account, "Income:US:Hooli:Match401k");

        parse_fail!(account, "Assets");
        parse_fail!(account, "Bank:Checking");
        parse_fail!(account, "Assets Checking");
    }

    #[test]
    fn quoted_str() {
        parse_ok!(quoted_str, "\"Hooli\"");
        parse_ok!(quoted_str, "\"\"");
        parse_ok!(quoted_str, "\"Transfering accumulated savings to other account\"");

        parse_fail!(quoted_str, "Hooli");
        parse_fail!(quoted_str, "\"unterminated");
    }

    #[test]
    fn option() {
        parse_ok!(option, "option \"title\" \"Example Ledger\"");
        parse_ok!(option, "option \"operating_currency\" \"USD\"");

        parse_fail!(option, "option \"title\"");
        parse_fail!(option, "option title \"x\"");
    }

    #[test]
    fn open() {
        parse_ok!(open, "2012-01-01 open Assets:US:BofA:Checking USD");
        parse_ok!(open, "1980-05-12 open Expenses:Food:Restaurant");
        parse_ok!(open, "2012-01-01 open Assets:US:Vanguard:Cash USD,VACHR");

        parse_fail!(open, "2012-01-01 open");
        parse_fail!(open, "open Assets:US:BofA:Checking");
    }

    #[test]
    fn pad() {
        parse_ok!(
            pad,
            "2012-01-01 pad Assets:US:BofA:Checking Equity:Opening-Balances"
        );

        parse_fail!(pad, "2012-01-01 pad Assets:US:BofA:Checking");
    }

    #[test]
    fn balance() {
        parse_ok!(balance, "2012-01-03 balance Assets:US:BofA:Checking 2640.00 USD");
        parse_ok!(balance, "2013-01-01 balance Assets:US:Federal:PreTax401k 0.00 IRAUSD");

        parse_fail!(balance, "2012-01-03 balance Assets:US:BofA:Checking");
    }

    #[test]
    fn event() {
        parse_ok!(event, "2012-01-01 event \"location\" \"Boston\"");
        parse_ok!(
            event,
            "1980-05-12 event \"employer\" \"Hooli, 1 Carloston Rd, Mountain Beer, CA\""
        );

        parse_fail!(event, "2012-01-01 event \"location\"");
    }

    #[test]
    fn transaction() {
        let single = indoc!(
            "
            2012-01-05 * \"Hooli\" \"Payroll\"
              Assets:US:BofA:Checking 1350.60 USD
              Income:US:Hooli:Salary -4615.38 USD
              Expenses:Taxes:Y2012:US:Medicare 106.62 USD
              Expenses:Taxes:Y2012:US:Federal 1062.92 USD"
        );
        parse_ok!(transaction, single);

        let no_payee = indoc!(
            "
            2012-01-08 * \"Transfering accumulated savings to other account\"
              Assets:US:BofA:Checking -4026.00 USD
              Assets:US:ETrade:Cash 4026.00 USD"
        );
        parse_ok!(transaction, no_payee);

        // A transaction requires at least one posting line.
        parse_fail!(transaction, "2012-01-05 * \"Hooli\" \"Payroll\"");
    }

    #[test]
    fn org_mode_sections_are_skipped() {
        let input = indoc!(
            "
            ;; -*- mode: org -*-
            * Options

            option \"title\" \"Example Ledger\"
            option \"operating_currency\" \"USD\"

            * Equity Accounts

            1980-05-12 open Equity:Opening-Balances
            "
        );
        let ledger = parse(input).unwrap();
        assert_eq!(ledger.directives.len(), 3);
    }

    #[test]
    fn full_document() {
        let input = indoc!(
            "
            option \"title\" \"Example Ledger\"

            2012-01-01 open Assets:US:BofA:Checking USD
            2012-01-01 pad Assets:US:BofA:Checking Equity:Opening-Balances
            2012-01-03 balance Assets:US:BofA:Checking 2640.00 USD
            2012-01-01 event \"location\" \"Boston\"

            2012-01-05 * \"Hooli\" \"Payroll\"
              Assets:US:BofA:Checking 1350.60 USD
              Income:US:Hooli:Salary -1350.60 USD
            "
        );
        let ledger = parse(input).unwrap();
        assert_eq!(ledger.directives.len(), 6);

        match &ledger.directives[5] {
            lc::Directive::Transaction(txn) => {
                assert_eq!(txn.payee.as_deref(), Some("Hooli"));
                assert_eq!(txn.narration, "Payroll");
                assert_eq!(txn.postings.len(), 2);
                assert_eq!(
                    txn.postings[0].units.num,
                    Decimal::from_str("1350.60").unwrap()
                );
                assert_eq!(txn.postings[0].units.currency, "USD");
                assert!(txn.is_balanced());
            }
            other => panic!("expected a transaction, got {:?}", other),
        }
    }

    #[test]
    fn rejects_calendar_invalid_date() {
        let err = parse("2012-13-01 open Assets:Cash USD\n").unwrap_err();
        match err.kind {
            error::ParseErrorKind::DateError { .. } => {}
            other => panic!("expected a date error, got {:?}", other),
        }
    }
}
