use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use typed_builder::TypedBuilder;

use super::account_types::AccountType;

/// Represents an account.
///
/// Commodities accumulate in accounts. An account name is a colon-separated
/// list of capitalized words which begin with a letter, and whose first word
/// must be one of the five acceptable account types.
///
/// Some example accounts:
///
/// ```text
/// Assets:US:BofA:Checking
/// Liabilities:US:CreditCard1
/// Equity:Opening-Balances
/// Income:US:Employer1:Salary
/// Expenses:Food:Groceries
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, TypedBuilder)]
pub struct Account<'a> {
    /// Type of the account.
    pub ty: AccountType,

    /// Parts of the account following the account type.
    pub parts: Vec<Cow<'a, str>>,
}

impl<'a> Account<'a> {
    /// Joins an account type and the name segments following it.
    pub fn join<I, S>(ty: AccountType, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'a, str>>,
    {
        Account {
            ty,
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Compares two accounts regardless of how their parts are borrowed.
    pub fn matches(&self, other: &Account<'_>) -> bool {
        self.ty == other.ty && self.parts == other.parts
    }
}

impl fmt::Display for Account<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty.default_name())?;
        for part in &self.parts {
            write!(f, ":{}", part)?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a well-formed account name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidAccount(pub String);

impl fmt::Display for InvalidAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid account name: '{}'", self.0)
    }
}

impl std::error::Error for InvalidAccount {}

impl FromStr for Account<'static> {
    type Err = InvalidAccount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pieces = s.split(':');
        let ty = pieces
            .next()
            .and_then(|first| first.parse::<AccountType>().ok())
            .ok_or_else(|| InvalidAccount(s.to_string()))?;
        let parts: Vec<Cow<'static, str>> =
            pieces.map(|p| Cow::Owned(p.to_string())).collect();
        if parts.is_empty() || parts.iter().any(|p| p.is_empty()) {
            return Err(InvalidAccount(s.to_string()));
        }
        Ok(Account { ty, parts })
    }
}
