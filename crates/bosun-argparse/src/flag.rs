//! Boolean-style switches and the matcher that consumes them.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{ParseError, ParseResult};
use crate::registry::KnownTriggers;
use crate::stream::TokenStream;
use crate::trigger;
use crate::value::Value;

const VERBOSE_NAME: &str = "verbose";
const HELP_NAME: &str = "help";

/// How repeated triggers of the same flag combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagMode {
    /// The last trigger wins.
    #[default]
    Overwrite,
    /// Numeric values add up (`-vvv` gives 3). Untriggered flags report 0.
    Accumulate,
}

/// A registered flag. Build one with [`FlagDef::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlagDef {
    name: String,
    description: String,
    short: Option<String>,
    long: Option<String>,
    value: Value,
    mode: FlagMode,
}

impl FlagDef {
    pub fn builder(name: impl Into<String>) -> FlagBuilder {
        FlagBuilder {
            def: FlagDef {
                name: name.into(),
                description: String::new(),
                short: None,
                long: None,
                value: Value::Bool(true),
                mode: FlagMode::Overwrite,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn mode(&self) -> FlagMode {
        self.mode
    }

    /// Value reported when the flag was not triggered.
    pub fn unset_value(&self) -> Value {
        match self.mode {
            FlagMode::Accumulate => Value::Int(0),
            FlagMode::Overwrite => Value::Bool(false),
        }
    }

    pub(crate) fn verbose() -> Self {
        Self {
            name: VERBOSE_NAME.to_string(),
            description: "The verbosity level of the application".to_string(),
            short: Some("-v".to_string()),
            long: Some("--verbose".to_string()),
            value: Value::Int(1),
            mode: FlagMode::Accumulate,
        }
    }

    pub(crate) fn help() -> Self {
        Self {
            name: HELP_NAME.to_string(),
            description: "Display the help text".to_string(),
            short: None,
            long: Some("--help".to_string()),
            value: Value::Bool(true),
            mode: FlagMode::Overwrite,
        }
    }

    fn matches_short(&self, trigger: &str) -> bool {
        self.short.as_deref() == Some(trigger)
    }

    fn matches_long(&self, trigger: &str) -> bool {
        self.long.as_deref() == Some(trigger)
    }
}

#[derive(Debug, Clone)]
pub struct FlagBuilder {
    def: FlagDef,
}

impl FlagBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = description.into();
        self
    }

    /// Short trigger, `-` plus one character.
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.def.short = Some(short.into());
        self
    }

    /// Long trigger, `--` plus at least one character.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.def.long = Some(long.into());
        self
    }

    /// Value stored when the flag is triggered (default `true`).
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.def.value = value.into();
        self
    }

    pub fn mode(mut self, mode: FlagMode) -> Self {
        self.def.mode = mode;
        self
    }

    pub fn accumulate(self) -> Self {
        self.mode(FlagMode::Accumulate)
    }

    pub fn build(self) -> ParseResult<FlagDef> {
        let def = self.def;
        trigger::validate("flag", &def.name, def.short.as_deref(), def.long.as_deref())?;
        Ok(def)
    }
}

pub(crate) struct FlagSettings {
    pub(crate) verbose_enabled: bool,
    pub(crate) help_enabled: bool,
}

pub(crate) enum FlagScan {
    Values(IndexMap<String, Value>),
    Help,
}

fn defines_trigger(flags: &[&FlagDef], trigger: &str) -> bool {
    flags
        .iter()
        .any(|f| f.matches_short(trigger) || f.matches_long(trigger))
}

/// Consume every token of `stream` that triggers one of `scope_flags`.
///
/// Long tokens that no flag here claims are left in place when `known`
/// lists them (options and nested elements), otherwise they fail. A short
/// bundle loses the characters this scope knows; the rest stays for a
/// nested scope, and a bundle with no known character is left whole for the
/// option matcher.
pub(crate) fn match_flags(
    stream: &mut TokenStream,
    scope_flags: &[&FlagDef],
    known: &KnownTriggers,
    settings: &FlagSettings,
) -> ParseResult<FlagScan> {
    let verbose = FlagDef::verbose();
    let help = FlagDef::help();

    let mut flags: Vec<&FlagDef> = scope_flags.to_vec();
    if settings.verbose_enabled
        && !defines_trigger(&flags, "-v")
        && !defines_trigger(&flags, "--verbose")
    {
        flags.push(&verbose);
    }
    let help_active = settings.help_enabled && !defines_trigger(&flags, "--help");
    if help_active {
        flags.push(&help);
    }

    let mut values: IndexMap<String, Value> = IndexMap::new();
    let mut i = 0usize;
    while let Some(token) = stream.get(i) {
        if token.starts_with("--") {
            let Some(flag) = flags.iter().copied().find(|f| f.matches_long(token)) else {
                if known.longs.contains(token) {
                    trace!(token, "long token left for another matcher");
                    i += 1;
                    continue;
                }
                return Err(ParseError::config(format!("Flag '{token}' is unknown")));
            };
            debug!(flag = %flag.name, "long flag matched");
            apply(&mut values, flag);
            stream.remove(i);
            if help_active && std::ptr::eq(flag, &help) {
                debug!("help requested");
                return Ok(FlagScan::Help);
            }
            continue;
        }

        if token.len() > 1 && token.starts_with('-') {
            let mut matched: Vec<&FlagDef> = Vec::new();
            let mut rest = String::new();
            let mut unknown: Option<String> = None;
            for c in token.chars().skip(1) {
                let short = format!("-{c}");
                match flags.iter().copied().find(|f| f.matches_short(&short)) {
                    Some(flag) => matched.push(flag),
                    None => {
                        if !known.flag_shorts.contains(&short) {
                            unknown.get_or_insert(short);
                        }
                        rest.push(c);
                    }
                }
            }
            if matched.is_empty() {
                trace!(token, "short token left for another matcher");
                i += 1;
                continue;
            }
            if let Some(short) = unknown {
                return Err(ParseError::invalid(format!(
                    "Flag '{short}' in '{token}' is unknown"
                )));
            }
            debug!(token, count = matched.len(), "short flag bundle matched");
            for flag in matched {
                apply(&mut values, flag);
            }
            if rest.is_empty() {
                stream.remove(i);
            } else {
                trace!(rest = %rest, "bundle remainder left for a nested scope");
                stream.replace(i, format!("-{rest}"));
                i += 1;
            }
            continue;
        }

        i += 1;
    }

    for flag in &flags {
        if !values.contains_key(&flag.name) {
            values.insert(flag.name.clone(), flag.unset_value());
        }
    }
    Ok(FlagScan::Values(values))
}

fn apply(values: &mut IndexMap<String, Value>, flag: &FlagDef) {
    if flag.mode == FlagMode::Accumulate {
        let sum = values
            .get(&flag.name)
            .and_then(|prev| prev.checked_add(&flag.value));
        if let Some(sum) = sum {
            values.insert(flag.name.clone(), sum);
            return;
        }
    }
    values.insert(flag.name.clone(), flag.value.clone());
}
