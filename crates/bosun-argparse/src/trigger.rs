use crate::error::{ParseError, ParseResult};

/// Check the short/long trigger shape of a flag or option.
///
/// `kind` is only used in error messages ("flag", "option").
pub(crate) fn validate(
    kind: &str,
    name: &str,
    short: Option<&str>,
    long: Option<&str>,
) -> ParseResult<()> {
    if name.trim().is_empty() {
        return Err(ParseError::config(format!("every {kind} must have a name")));
    }
    if let Some(short) = short {
        let mut chars = short.chars();
        let well_formed = chars.next() == Some('-')
            && chars.next().is_some_and(|c| c != '-')
            && chars.next().is_none();
        if !well_formed {
            return Err(ParseError::config(format!(
                "the {kind} '{name}': short trigger '{short}' must be '-' followed by exactly one character"
            )));
        }
    }
    if let Some(long) = long {
        if long.len() <= 2 || !long.starts_with("--") {
            return Err(ParseError::config(format!(
                "the {kind} '{name}': long trigger '{long}' must start with '--' and have at least one more character"
            )));
        }
    }
    if short.is_none() && long.is_none() {
        return Err(ParseError::config(format!(
            "the {kind} '{name}' must have a short or long trigger"
        )));
    }
    Ok(())
}

/// `-r/--remote`, `-r` or `--remote`.
pub(crate) fn display(short: Option<&str>, long: Option<&str>) -> String {
    match (short, long) {
        (Some(s), Some(l)) => format!("{s}/{l}"),
        (Some(s), None) => s.to_string(),
        (None, Some(l)) => l.to_string(),
        (None, None) => String::new(),
    }
}
