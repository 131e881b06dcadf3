use std::borrow::Cow;

/// A specialized [`CatalogError`] enum of this crate.
#[wf_derive::wf_error]
pub enum CatalogError {
    #[error("Catalog is empty{}: {message}", format_context(.context))]
    Empty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
