//! The public entry point: register elements once, parse many times.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::CommandGroup;
use crate::env::{self, EnvVar};
use crate::error::ParseResult;
use crate::flag::FlagDef;
use crate::help::{self, HelpContext};
use crate::option::OptionDef;
use crate::params::Params;
use crate::parser::{self, ParseOptions, ParseOutcome, Pass};
use crate::registry::{Element, Registry};

/// Exit status after help output in [`Cli::parse_or_exit`].
pub const HELP_EXIT_CODE: i32 = 3;
/// Exit status after a parse error in [`Cli::parse_or_exit`].
pub const ERROR_EXIT_CODE: i32 = 2;

const FALLBACK_SCRIPT_NAME: &str = "cli";

/// Behavior switches of a [`Cli`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Name shown in help output. Taken from `argv[0]` when unset.
    pub script_name: Option<String>,
    pub description: String,
    /// Register `-v`/`--verbose`, counted into `params["verbose"]`.
    pub verbose_enabled: bool,
    /// Register `--help`.
    pub help_enabled: bool,
    /// A failed parse of an empty argument list turns into help.
    pub help_on_no_args: bool,
    pub exit_on_help: bool,
    /// Leave unconsumed tokens alone instead of failing.
    pub allow_extra_args: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            script_name: None,
            description: String::new(),
            verbose_enabled: true,
            help_enabled: true,
            help_on_no_args: true,
            exit_on_help: true,
            allow_extra_args: false,
        }
    }
}

/// A command line definition.
///
/// ```
/// use bosun_argparse::{Cli, CommandGroup, Command, FlagDef, OptionDef};
///
/// # fn main() -> Result<(), bosun_argparse::ParseError> {
/// let mut cli = Cli::new()
///     .flag(FlagDef::builder("force").short("-f").build()?)
///     .option(OptionDef::builder("remote").short("-r").required(false).build()?)
///     .command_group(
///         CommandGroup::builder("cmd")
///             .command(Command::builder("push").build()?)
///             .command(Command::builder("pull").build()?)
///             .build()?,
///     );
///
/// let params = cli.parse_args(["push", "-f", "-r", "origin"])?.into_params().unwrap();
/// assert_eq!(params.get_str("cmd"), Some("push"));
/// assert!(params.is_set("force"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cli {
    settings: Settings,
    registry: Registry,
    env_vars: Vec<EnvVar>,
    env_source: Option<Vec<(String, String)>>,
    program: Option<String>,
}

impl Cli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn script_name(mut self, name: impl Into<String>) -> Self {
        self.settings.script_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.settings.description = description.into();
        self
    }

    pub fn verbose_enabled(mut self, enabled: bool) -> Self {
        self.settings.verbose_enabled = enabled;
        self
    }

    pub fn help_enabled(mut self, enabled: bool) -> Self {
        self.settings.help_enabled = enabled;
        self
    }

    pub fn help_on_no_args(mut self, enabled: bool) -> Self {
        self.settings.help_on_no_args = enabled;
        self
    }

    pub fn exit_on_help(mut self, enabled: bool) -> Self {
        self.settings.exit_on_help = enabled;
        self
    }

    pub fn allow_extra_args(mut self, enabled: bool) -> Self {
        self.settings.allow_extra_args = enabled;
        self
    }

    pub fn flag(mut self, flag: FlagDef) -> Self {
        self.registry.flags.push(flag);
        self
    }

    pub fn option(mut self, option: OptionDef) -> Self {
        self.registry.options.push(option);
        self
    }

    /// Groups are routed in registration order. A group with an already
    /// registered name replaces it.
    pub fn command_group(mut self, group: CommandGroup) -> Self {
        self.registry.upsert_group(group);
        self
    }

    pub fn element(self, element: impl Into<Element>) -> Self {
        match element.into() {
            Element::Option(option) => self.option(option),
            Element::Flag(flag) => self.flag(flag),
            Element::CommandGroup(group) => self.command_group(group),
        }
    }

    pub fn env_var(mut self, var: EnvVar) -> Self {
        self.env_vars.push(var);
        self
    }

    /// Resolve env vars against `vars` instead of the process environment.
    pub fn env_source<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_source = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn command_groups(&self) -> &[CommandGroup] {
        &self.registry.groups
    }

    pub fn help_text(&self) -> String {
        let script_name = self
            .settings
            .script_name
            .as_deref()
            .or(self.program.as_deref())
            .unwrap_or(FALLBACK_SCRIPT_NAME);
        help::render(&HelpContext {
            script_name,
            description: &self.settings.description,
            registry: &self.registry,
            env_vars: &self.env_vars,
            verbose_enabled: self.settings.verbose_enabled,
            help_enabled: self.settings.help_enabled,
        })
    }

    /// Parse the process arguments.
    pub fn parse(&mut self) -> ParseResult<ParseOutcome> {
        self.parse_from(std::env::args())
    }

    /// Parse a full argv; the first item is the program path.
    pub fn parse_from<I, S>(&mut self, argv: I) -> ParseResult<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        if let Some(program) = argv.next() {
            let name = Path::new(&program)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(program);
            self.program = Some(name);
        }
        self.parse_args(argv)
    }

    /// Parse arguments that no longer carry the program path.
    ///
    /// Command groups registered from callbacks are added once this call
    /// succeeds.
    pub fn parse_args<I, S>(&mut self, args: I) -> ParseResult<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(?args, "parsing arguments");

        match self.run(&args) {
            Err(err) if args.is_empty() && self.settings.help_on_no_args => {
                debug!(error = %err, "no arguments given, showing help");
                Ok(ParseOutcome::Help(self.help_text()))
            }
            other => other,
        }
    }

    fn run(&mut self, args: &[String]) -> ParseResult<ParseOutcome> {
        let options = ParseOptions {
            verbose_enabled: self.settings.verbose_enabled,
            help_enabled: self.settings.help_enabled,
            allow_extra_args: self.settings.allow_extra_args,
        };
        let (mut params, registrations) =
            match parser::parse_params(args, &self.registry.scope(), &options)? {
                Pass::Help => return Ok(ParseOutcome::Help(self.help_text())),
                Pass::Done {
                    params,
                    registrations,
                } => (params, registrations),
            };

        let env = match &self.env_source {
            Some(vars) => env::parse_env(vars, &self.env_vars)?,
            None => {
                let vars: Vec<(String, String)> = std::env::vars().collect();
                env::parse_env(&vars, &self.env_vars)?
            }
        };
        params.set_env(env);

        for group in registrations {
            debug!(group = %group.name(), "registering command group");
            self.registry.upsert_group(group);
        }
        Ok(ParseOutcome::Params(params))
    }

    /// Parse the process arguments, printing help or errors and exiting.
    ///
    /// Returns `None` when help was printed and `exit_on_help` is off.
    pub fn parse_or_exit(&mut self) -> Option<Params> {
        let outcome = self.parse();
        self.finish(outcome)
    }

    pub fn parse_or_exit_from<I, S>(&mut self, argv: I) -> Option<Params>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let outcome = self.parse_from(argv);
        self.finish(outcome)
    }

    fn finish(&self, outcome: ParseResult<ParseOutcome>) -> Option<Params> {
        match outcome {
            Ok(ParseOutcome::Params(params)) => Some(params),
            Ok(ParseOutcome::Help(text)) => {
                print!("{text}");
                if self.settings.exit_on_help {
                    std::process::exit(HELP_EXIT_CODE);
                }
                None
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(ERROR_EXIT_CODE);
            }
        }
    }
}
