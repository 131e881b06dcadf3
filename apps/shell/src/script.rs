use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use wayfinder::domain::catalog::ItemId;

/// Session replayed when no script is given: buy a compass, look at the
/// headlamp, walk away from its checkout, then leave.
pub(crate) const DEFAULT_SCRIPT: &str = "\
select 2
buy
confirm
select 3
buy
cancel
back
close
";

#[wf_derive::wf_error]
pub enum ScriptError {
    #[error("Unknown intent on line {line}{}: {message}", format_context(.context))]
    UnknownIntent { line: usize, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid item id on line {line}{}: {message}", format_context(.context))]
    InvalidItem { line: usize, message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A user intent, addressed to whichever screen is on top of the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
    Select(ItemId),
    Buy,
    Confirm,
    Cancel,
    /// Closes the catalog or the item on top.
    Close,
    /// Leaves the top screen: cancels a checkout, closes an item.
    Back,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(id) => write!(f, "select {}", id.0),
            Self::Buy => f.write_str("buy"),
            Self::Confirm => f.write_str("confirm"),
            Self::Cancel => f.write_str("cancel"),
            Self::Close => f.write_str("close"),
            Self::Back => f.write_str("back"),
        }
    }
}

impl FromStr for Intent {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(0, s)
    }
}

fn parse_line(line: usize, text: &str) -> Result<Intent, ScriptError> {
    let mut words = text.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let argument = words.next();

    let intent = match (verb.as_str(), argument) {
        ("select", Some(id)) => Intent::Select(
            id.parse()
                .map_err(|e: std::num::ParseIntError| ScriptError::InvalidItem {
                    line,
                    message: format!("'{id}': {e}").into(),
                    context: None,
                })?,
        ),
        ("select", None) => {
            return Err(ScriptError::InvalidItem { line, message: "missing item id".into(), context: None });
        },
        ("buy", None) => Intent::Buy,
        ("confirm", None) => Intent::Confirm,
        ("cancel", None) => Intent::Cancel,
        ("close", None) => Intent::Close,
        ("back", None) => Intent::Back,
        _ => {
            return Err(ScriptError::UnknownIntent { line, message: text.trim().to_owned().into(), context: None });
        },
    };
    Ok(intent)
}

/// Parses one intent per line; blank lines and lines starting with `//` are skipped.
pub(crate) fn parse(script: &str) -> Result<Vec<Intent>, ScriptError> {
    script
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty() && !text.trim_start().starts_with("//"))
        .map(|(index, text)| parse_line(index + 1, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_default_script_parses() {
        let intents = parse(DEFAULT_SCRIPT).unwrap();
        assert_eq!(intents.first(), Some(&Intent::Select(ItemId(2))));
        assert_eq!(intents.last(), Some(&Intent::Close));
        assert_eq!(intents.len(), 8);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let intents = parse("// browse\n\nselect #3\n  // headlamp\n  BUY\n").unwrap();
        assert_eq!(intents, [Intent::Select(ItemId(3)), Intent::Buy]);
    }

    #[test]
    fn errors_name_the_line() {
        let err = parse("select 1\nfly away\n").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownIntent { line: 2, .. }));

        let err = parse("select one").unwrap_err();
        assert!(matches!(err, ScriptError::InvalidItem { line: 1, .. }));
        assert!(parse("buy now").is_err());
    }

    #[test]
    fn intents_display_as_script_lines() {
        for line in ["select 7", "buy", "confirm", "cancel", "close", "back"] {
            assert_eq!(line.parse::<Intent>().unwrap().to_string(), line);
        }
    }
}
