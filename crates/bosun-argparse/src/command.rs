//! Positional commands, the groups that select between them, and the router.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::params::Params;
use crate::parser::ParseState;
use crate::registry::{Element, Scope};
use crate::value::Value;

/// Callback fired after a command (and everything nested under it) matched.
pub type CommandCallback = Arc<dyn Fn(&mut CommandContext<'_>, &Command) + Send + Sync>;

/// What a callback can see and do while the parse is still running.
pub struct CommandContext<'a> {
    params: &'a Params,
    registrations: &'a mut Vec<CommandGroup>,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(params: &'a Params, registrations: &'a mut Vec<CommandGroup>) -> Self {
        Self {
            params,
            registrations,
        }
    }

    /// Values resolved so far, including the matched command's nested ones.
    pub fn params(&self) -> &Params {
        self.params
    }

    /// Register a group on the owning [`Cli`](crate::Cli).
    ///
    /// The group is added once the current parse succeeds and is routed from
    /// the next parse call on. A group with the same name is replaced.
    pub fn register_command_group(&mut self, group: CommandGroup) {
        self.registrations.push(group);
    }
}

/// A literal token selecting one branch of a [`CommandGroup`].
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    elements: Vec<Element>,
    callback: Option<CommandCallback>,
}

impl Command {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            command: Command {
                name: name.into(),
                description: String::new(),
                elements: Vec::new(),
                callback: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Options, flags and groups parsed after this command matched.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("elements", &self.elements)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.command.description = description.into();
        self
    }

    pub fn element(mut self, element: impl Into<Element>) -> Self {
        self.command.elements.push(element.into());
        self
    }

    pub fn elements<I, E>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Element>,
    {
        self.command
            .elements
            .extend(elements.into_iter().map(Into::into));
        self
    }

    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, &Command) + Send + Sync + 'static,
    {
        self.command.callback = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> ParseResult<Command> {
        let command = self.command;
        if command.name.trim().is_empty() {
            return Err(ParseError::config("every command must have a name"));
        }
        if command.name.starts_with('-') {
            return Err(ParseError::config(format!(
                "the command '{}' must not start with '-'",
                command.name
            )));
        }
        Ok(command)
    }
}

/// Mutually exclusive commands evaluated at one position of the routing order.
///
/// Once a command matched, `params[group name]` holds the command's name.
#[derive(Clone)]
pub struct CommandGroup {
    name: String,
    description: String,
    commands: Vec<Command>,
    required: bool,
    callback: Option<CommandCallback>,
}

impl CommandGroup {
    pub fn builder(name: impl Into<String>) -> CommandGroupBuilder {
        CommandGroupBuilder {
            group: CommandGroup {
                name: name.into(),
                description: String::new(),
                commands: Vec::new(),
                required: false,
                callback: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn find(&self, token: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == token)
    }
}

impl fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandGroup")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("commands", &self.commands)
            .field("required", &self.required)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct CommandGroupBuilder {
    group: CommandGroup,
}

impl CommandGroupBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.group.description = description.into();
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.group.commands.push(command);
        self
    }

    pub fn commands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.group.commands.extend(commands);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.group.required = required;
        self
    }

    /// Fired after the matched command's own callback.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, &Command) + Send + Sync + 'static,
    {
        self.group.callback = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> ParseResult<CommandGroup> {
        let group = self.group;
        if group.name.trim().is_empty() {
            return Err(ParseError::config("every command group must have a name"));
        }
        for (i, command) in group.commands.iter().enumerate() {
            if group.commands[..i].iter().any(|c| c.name == command.name) {
                return Err(ParseError::config(format!(
                    "the command group '{}' declares '{}' twice",
                    group.name, command.name
                )));
            }
        }
        Ok(group)
    }
}

/// Match each group, in order, against the current head token.
///
/// A matched command's nested elements are parsed through `nested` on the
/// same state before the group key is set and the callbacks fire.
pub(crate) fn route_commands<F>(
    state: &mut ParseState,
    groups: &[&CommandGroup],
    nested: F,
) -> ParseResult<()>
where
    F: Fn(&mut ParseState, &Scope<'_>) -> ParseResult<()>,
{
    for group in groups {
        let matched = state.stream.head().and_then(|head| group.find(head));
        let Some(command) = matched else {
            if group.required {
                return Err(ParseError::invalid(format!(
                    "Command Group {} is required and cannot be omitted",
                    group.name
                )));
            }
            continue;
        };

        debug!(group = %group.name, command = %command.name, "command matched");
        state.stream.shift();
        if !command.elements.is_empty() {
            nested(state, &Scope::from_elements(&command.elements))?;
        }
        state
            .params
            .insert(group.name.clone(), Value::Str(command.name.clone()));

        let mut ctx = CommandContext::new(&state.params, &mut state.registrations);
        if let Some(callback) = &command.callback {
            callback(&mut ctx, command);
        }
        if let Some(callback) = &group.callback {
            callback(&mut ctx, command);
        }
    }
    Ok(())
}
