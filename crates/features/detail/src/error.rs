use std::borrow::Cow;

/// A specialized [`DetailError`] enum of this crate.
#[wf_derive::wf_error]
pub enum DetailError {
    #[error("Unknown item{}: {message}", format_context(.context))]
    UnknownItem { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal detail error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
