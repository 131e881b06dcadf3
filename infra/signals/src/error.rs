use std::borrow::Cow;

/// Errors raised by signal channels and the notification center.
#[wf_derive::wf_error]
pub enum SignalError {
    /// Capacity must be greater than zero for buffered channels.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A notification type was first used with a different channel kind.
    #[error("Channel kind mismatch{}: {message}", format_context(.context))]
    ChannelKindMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An internal downcast failed; the type registry is inconsistent.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
