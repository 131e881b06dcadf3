use std::borrow::Cow;

#[wf_derive::wf_error]
pub enum ProbeError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Unresolved{}: {message}", format_context(.context))]
    Unresolved { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn failing_io() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("disk gone"))
}

#[test]
fn wf_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/wf_error_pass.rs");
}

#[test]
fn context_is_rendered_in_display() {
    let result: Result<(), ProbeError> =
        Err(ProbeError::Unresolved { message: "Arc<dyn Analytics>".into(), context: None });

    let err = result.context("building detail module").unwrap_err();
    assert_eq!(err.to_string(), "Unresolved (building detail module): Arc<dyn Analytics>");
}

#[test]
fn source_errors_convert_with_context() {
    let err = failing_io().context("reading script").unwrap_err();
    assert!(matches!(err, ProbeError::Io { context: Some(ref c), .. } if c == "reading script"));

    let converted: ProbeError = std::io::Error::other("plain").into();
    assert!(matches!(converted, ProbeError::Io { context: None, .. }));
}

#[test]
fn internal_variant_accepts_strings() {
    let from_static: ProbeError = "static fault".into();
    let from_owned: ProbeError = String::from("owned fault").into();

    assert_eq!(from_static.to_string(), "Internal error: static fault");
    assert!(matches!(from_owned, ProbeError::Internal { ref message, .. } if message == "owned fault"));
}
