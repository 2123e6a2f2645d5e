use ledgerlab_core::*;
use std::{io, io::Write};
use thiserror::Error;


/// Column postings and balance amounts are aligned to.
const ACCOUNT_WIDTH: usize = 46;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct BasicRenderer {}

impl BasicRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn render<W: Write>(w: &mut W, ledger: &Ledger<'_>) -> Result<(), BasicRendererError> {
    BasicRenderer::default().render(ledger, w)
}

/// Renders a single directive to a string.
pub fn render_directive(directive: &Directive<'_>) -> Result<String, BasicRendererError> {
    let mut buffer = Vec::new();
    BasicRenderer::default().render(directive, &mut buffer)?;
    // The renderer only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[derive(Error, Debug)]
pub enum BasicRendererError {
    #[error("an io error occurred")]
    Io(#[from] io::Error),
}

pub trait Renderer<T, W: Write> {
    type Error;
    fn render(&self, renderable: T, write: &mut W) -> Result<(), Self::Error>;
}

impl<'a, W: Write> Renderer<&'a Ledger<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, ledger: &'a Ledger<'_>, write: &mut W) -> Result<(), Self::Error> {
        for directive in &ledger.directives {
            self.render(directive, write)?;
            writeln!(write)?;
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Directive<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, directive: &'a Directive<'_>, write: &mut W) -> Result<(), Self::Error> {
        use Directive::*;
        match directive {
            Open(open) => self.render(open, write),
            Pad(pad) => self.render(pad, write),
            Balance(balance) => self.render(balance, write),
            Event(event) => self.render(event, write),
            Option(option) => self.render(option, write),
            Transaction(transaction) => self.render(transaction, write),
        }
    }
}

impl<'a, W: Write> Renderer<&'a Account<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, account: &'a Account<'_>, write: &mut W) -> Result<(), Self::Error> {
        write!(
            write,
            "{}:{}",
            account.ty.default_name(),
            account.parts.join(":")
        )?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Amount<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, amount: &'a Amount<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} {}", amount.num, amount.currency)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Open<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, open: &'a Open<'_>, write: &mut W) -> Result<(), Self::Error> {
        write!(write, "{} open ", open.date)?;
        self.render(&open.account, write)?;
        let mut separator = " ";
        for currency in open.currencies.iter() {
            write!(write, "{}{}", separator, currency)?;
            separator = ",";
        }
        writeln!(write)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Pad<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, pad: &'a Pad<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} pad ", pad.date)?;
        self.render(&pad.pad_to_account, w)?;
        write!(w, " ")?;
        self.render(&pad.pad_from_account, w)?;
        writeln!(w)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Balance<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, balance: &'a Balance<'_>, w: &mut W) -> Result<(), Self::Error> {
        let account = format!(
            "{}:{}",
            balance.account.ty.default_name(),
            balance.account.parts.join(":")
        );
        write!(
            w,
            "{} balance {:<width$} ",
            balance.date,
            account,
            width = ACCOUNT_WIDTH
        )?;
        self.render(&balance.amount, w)?;
        writeln!(w)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Event<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, event: &'a Event<'_>, w: &mut W) -> Result<(), Self::Error> {
        writeln!(
            w,
            "{} event \"{}\" \"{}\"",
            event.date, event.name, event.description
        )?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a LedgerOption<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, option: &'a LedgerOption<'_>, w: &mut W) -> Result<(), Self::Error> {
        writeln!(w, "option \"{}\" \"{}\"", option.name, option.val)?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Transaction<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, transaction: &'a Transaction<'_>, w: &mut W) -> Result<(), Self::Error> {
        write!(w, "{} {}", transaction.date, transaction.flag)?;
        if let Some(payee) = &transaction.payee {
            write!(w, " \"{}\"", payee)?;
        }
        write!(w, " \"{}\"", &transaction.narration)?;
        writeln!(w)?;
        for posting in &transaction.postings {
            self.render(posting, w)?;
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Posting<'_>, W> for BasicRenderer {
    type Error = BasicRendererError;
    fn render(&self, posting: &'a Posting<'_>, w: &mut W) -> Result<(), Self::Error> {
        let account = format!(
            "{}:{}",
            posting.account.ty.default_name(),
            posting.account.parts.join(":")
        );
        let number = posting.units.num.to_string();
        write!(
            w,
            "  {:<account_width$} {:>12} {}",
            account,
            number,
            posting.units.currency,
            account_width = ACCOUNT_WIDTH
        )?;
        if let Some(price) = &posting.price {
            write!(w, " @ ")?;
            self.render(price, w)?;
        }
        writeln!(w)?;
        Ok(())
    }
}
