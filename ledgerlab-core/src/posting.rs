use typed_builder::TypedBuilder;

use super::account::Account;
use super::amount::Amount;
use super::flags::Flag;

/// Represents a transaction posting. Postings represent a single amount being
/// deposited to or withdrawn from an account.
///
/// Every leg is explicit: the generator never relies on the elided-amount
/// convention, so `units` is a complete amount and the double-entry balance
/// invariant can be checked at construction time.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Posting<'a> {
    /// Account being posted to.
    pub account: Account<'a>,

    /// The amount being posted.
    pub units: Amount<'a>,

    /// Optional price annotation, carried through untouched.
    #[builder(default)]
    pub price: Option<Amount<'a>>,

    #[builder(default)]
    pub flag: Option<Flag<'a>>,
}

impl<'a> Posting<'a> {
    /// A plain posting with no price annotation and no flag.
    pub fn simple(account: Account<'a>, units: Amount<'a>) -> Self {
        Posting {
            account,
            units,
            price: None,
            flag: None,
        }
    }
}
