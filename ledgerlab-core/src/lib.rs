use std::borrow::Cow;

use typed_builder::TypedBuilder;

pub use account::{Account, InvalidAccount};
pub use account_types::AccountType;
pub use amount::Amount;
pub use chrono::NaiveDate as Date;
pub use directives::*;
pub use flags::Flag;
pub use inventory::Inventory;
pub use posting::Posting;

pub mod account;
pub mod account_types;
pub mod amount;
pub mod directives;
pub mod flags;
pub mod inventory;
pub mod posting;
pub mod realize;

/// Represents the complete ledger consisting of a number of directives.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Ledger<'a> {
    pub directives: Vec<Directive<'a>>,
}

pub type Currency<'a> = Cow<'a, str>;
