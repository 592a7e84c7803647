//! Declarative command line parsing.
//!
//! Register flags, options, env vars and positional command groups on a
//! [`Cli`], then parse any number of argument lists against it. Each parse
//! runs flags first (so `--help` can stop early), then options, then
//! commands, recursing into the elements nested under every matched command.
//! The result is a [`Params`] map keyed by element name, or help text.

mod cli;
mod command;
mod env;
mod error;
mod flag;
mod help;
mod option;
mod params;
mod parser;
mod registry;
mod stream;
mod trigger;
mod value;

pub use cli::{Cli, ERROR_EXIT_CODE, HELP_EXIT_CODE, Settings};
pub use command::{
    Command, CommandBuilder, CommandCallback, CommandContext, CommandGroup, CommandGroupBuilder,
};
pub use env::{EnvVar, EnvVarBuilder};
pub use error::{ParseError, ParseResult};
pub use flag::{FlagBuilder, FlagDef, FlagMode};
pub use option::{Arity, OptionBuilder, OptionDef};
pub use params::Params;
pub use parser::ParseOutcome;
pub use registry::Element;
pub use value::{Value, ValueType};
