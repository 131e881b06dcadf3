use std::borrow::Cow;

#[wf_derive::wf_error]
pub enum NavigationError {
    /// The surface behind a weak handle has been released by its owner.
    #[error("Presentation surface released{}: {message}", format_context(.context))]
    SurfaceReleased { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Reactions of one coordinator must all observe the same view-model outlet.
    #[error("Output belongs to a different outlet{}: {message}", format_context(.context))]
    ForeignOutput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Module already started{}: {message}", format_context(.context))]
    AlreadyStarted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal navigation error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
