//! One parse pass: flags, then options, then commands, recursing into the
//! nested elements of every matched command.

use tracing::debug;

use crate::command::{self, CommandGroup};
use crate::error::{ParseError, ParseResult};
use crate::flag::{self, FlagScan, FlagSettings};
use crate::option;
use crate::params::Params;
use crate::registry::{KnownTriggers, Scope};
use crate::stream::TokenStream;

/// Result of a successful parse call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Params(Params),
    /// `--help` was given (or no arguments and help-on-no-args is on).
    /// Holds the rendered help text.
    Help(String),
}

impl ParseOutcome {
    pub fn params(&self) -> Option<&Params> {
        match self {
            Self::Params(params) => Some(params),
            Self::Help(_) => None,
        }
    }

    pub fn into_params(self) -> Option<Params> {
        match self {
            Self::Params(params) => Some(params),
            Self::Help(_) => None,
        }
    }

    pub fn help_text(&self) -> Option<&str> {
        match self {
            Self::Help(text) => Some(text.as_str()),
            Self::Params(_) => None,
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help(_))
    }
}

pub(crate) struct ParseOptions {
    pub(crate) verbose_enabled: bool,
    pub(crate) help_enabled: bool,
    pub(crate) allow_extra_args: bool,
}

/// Mutable state shared by every scope of one parse call.
pub(crate) struct ParseState {
    pub(crate) stream: TokenStream,
    pub(crate) params: Params,
    pub(crate) registrations: Vec<CommandGroup>,
    known: KnownTriggers,
}

pub(crate) enum Pass {
    Done {
        params: Params,
        registrations: Vec<CommandGroup>,
    },
    Help,
}

/// Parse `args` against the top-level `scope`.
///
/// The caller's slice is left untouched; the pass works on its own copy.
pub(crate) fn parse_params(
    args: &[String],
    scope: &Scope<'_>,
    options: &ParseOptions,
) -> ParseResult<Pass> {
    let mut state = ParseState {
        stream: TokenStream::new(args.to_vec()),
        params: Params::new(),
        registrations: Vec::new(),
        known: scope.known_triggers(),
    };

    let settings = FlagSettings {
        verbose_enabled: options.verbose_enabled,
        help_enabled: options.help_enabled,
    };
    if parse_scope(&mut state, scope, &settings)? == Step::Help {
        return Ok(Pass::Help);
    }

    if !options.allow_extra_args && !state.stream.is_empty() {
        return Err(ParseError::invalid(format!(
            "Invalid extra params supplied: {}",
            state.stream.remaining().join(", ")
        )));
    }
    debug!(count = state.params.len(), "parse finished");
    Ok(Pass::Done {
        params: state.params,
        registrations: state.registrations,
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Help,
}

fn parse_scope(
    state: &mut ParseState,
    scope: &Scope<'_>,
    settings: &FlagSettings,
) -> ParseResult<Step> {
    let flags = flag::match_flags(&mut state.stream, &scope.flags, &state.known, settings)?;
    match flags {
        FlagScan::Help => return Ok(Step::Help),
        FlagScan::Values(values) => state.params.merge(values),
    }

    let values = option::extract_options(&mut state.stream, &scope.options)?;
    state.params.merge(values);

    command::route_commands(state, &scope.groups, parse_nested)?;
    Ok(Step::Continue)
}

// Nested scopes get no synthetic flags and skip the leftover check.
fn parse_nested(state: &mut ParseState, scope: &Scope<'_>) -> ParseResult<()> {
    let settings = FlagSettings {
        verbose_enabled: false,
        help_enabled: false,
    };
    parse_scope(state, scope, &settings).map(|_| ())
}
