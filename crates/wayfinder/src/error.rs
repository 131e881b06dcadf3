use std::borrow::Cow;
use wf_domain::config::ConfigViolation;

#[wf_derive::wf_error]
pub enum BootstrapError {
    #[error("Invalid configuration{}: {source}", format_context(.context))]
    Config { source: ConfigViolation, context: Option<Cow<'static, str>> },

    #[error("Bootstrap failed{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
