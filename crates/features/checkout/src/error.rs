use std::borrow::Cow;
use wf_signals::SignalError;

/// A specialized [`CheckoutError`] enum of this crate.
#[wf_derive::wf_error]
pub enum CheckoutError {
    /// The item cannot be bought (unknown id or withdrawn from the catalog).
    #[error("Item unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Purchase notification failed{}: {source}", format_context(.context))]
    Notification { source: SignalError, context: Option<Cow<'static, str>> },

    #[error("Internal checkout error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
