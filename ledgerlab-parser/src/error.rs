use std::error::Error;
use std::fmt;

use pest::Span;

use super::Rule;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// An error was encountered while converting a string to a numeric representation.
    DecimalError { message: String },
    /// An error was encountered while converting a string to a date.
    DateError { message: String },
    /// Input is invalid in some way.
    InvalidInput { message: String },
    /// Parser has reached an invalid state (most likely a bug in the parser).
    InvalidParserState { message: String },
}

#[derive(Debug)]
pub struct ParseError {
    /// The type of error.
    pub kind: ParseErrorKind,
    /// The (line, column) location of the error in the input.
    pub location: (usize, usize),
    source: Option<Box<dyn Error + 'static + Send + Sync>>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::DecimalError { message } => {
                write!(f, "{}", message)?;
            }
            ParseErrorKind::DateError { message } => {
                write!(f, "{}", message)?;
            }
            ParseErrorKind::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)?;
            }
            ParseErrorKind::InvalidParserState { message } => {
                write!(f, "Parser has reached an invalid state (please report this as a bug): expected {}", message)?;
            }
        }
        write!(f, " at line {} column {}", self.location.0, self.location.1)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl ParseError {
    pub(crate) fn invalid_state<T: ToString>(msg: T) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidParserState {
                message: msg.to_string(),
            },
            location: (0, 0),
            source: None,
        }
    }

    pub(crate) fn invalid_state_with_span<T: ToString>(msg: T, span: Span) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidParserState {
                message: msg.to_string(),
            },
            location: span.start_pos().line_col(),
            source: None,
        }
    }

    pub(crate) fn invalid_input_with_span<T: ToString>(msg: T, span: Span) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidInput {
                message: msg.to_string(),
            },
            location: span.start_pos().line_col(),
            source: None,
        }
    }

    pub(crate) fn decimal_parse_error(err: rust_decimal::Error, span: Span) -> ParseError {
        let message = format!("error while parsing number: {}", err);
        let pest_error = pest::error::Error::new_from_span(
            pest::error::ErrorVariant::<Rule>::CustomError { message },
            span.clone(),
        );
        ParseError {
            kind: ParseErrorKind::DecimalError {
                message: format!("{}", pest_error),
            },
            location: span.start_pos().line_col(),
            source: Some(Box::new(err)),
        }
    }

    pub(crate) fn date_parse_error(err: chrono::ParseError, span: Span) -> ParseError {
        let message = format!("error while parsing date: {}", err);
        let pest_error = pest::error::Error::new_from_span(
            pest::error::ErrorVariant::<Rule>::CustomError { message },
            span.clone(),
        );
        ParseError {
            kind: ParseErrorKind::DateError {
                message: format!("{}", pest_error),
            },
            location: span.start_pos().line_col(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let err = err.renamed_rules(|rule| {
            match *rule {
                Rule::EOI => "end of input",
                Rule::WHITESPACE => "whitespace",
                Rule::COMMENT => "comment",
                Rule::date => "date",
                Rule::num => "number",
                Rule::commodity => "commodity",
                Rule::commodity_list => "list of commodities",
                Rule::amount => "amount",
                Rule::double_quote => "double quotation mark",
                Rule::inner_quoted_str => "inner part of a quoted string",
                Rule::quoted_str => "quoted string",
                Rule::account_type => "an account category (first part of account name)",
                Rule::account_name_piece => "part of an account name",
                Rule::account => "an account name",
                Rule::option => "option directive",
                Rule::open => "open directive",
                Rule::pad => "pad directive",
                Rule::balance => "balance directive",
                Rule::event => "event directive",
                Rule::flag_okay => "'txn' or '*'",
                Rule::flag_warning => "'!'",
                Rule::flag_padding => "'P'",
                Rule::txn_flag => "transaction flag",
                Rule::txn_strings => "payee and narration strings",
                Rule::price_annotation => "price annotation",
                Rule::posting => "posting",
                Rule::transaction => "transaction directive",
                Rule::org_mode_title => "an Org-mode title",
                Rule::item => "directive",
                Rule::file => "ledger file",
            }
            .to_string()
        });
        let location = match &err.line_col {
            pest::error::LineColLocation::Pos(ref p) => *p,
            pest::error::LineColLocation::Span(ref p, _) => *p,
        };
        ParseError {
            kind: ParseErrorKind::InvalidInput {
                message: format!("{}", err),
            },
            location,
            source: Some(Box::new(err)),
        }
    }
}
