use std::borrow::Cow;

#[wf_derive::wf_error]
pub enum RegistryError {
    /// No factory is registered for the capability, or its factory declined to produce one.
    #[error("Unresolved capability{}: {message}", format_context(.context))]
    Unresolved { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Nested resolution went deeper than the configured limit (usually a cycle).
    #[error("Resolution depth exceeded{}: {message}", format_context(.context))]
    DepthExceeded { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
