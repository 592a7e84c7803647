//! Plain-text help rendering for a [`Cli`](crate::Cli) definition.

use crate::command::CommandGroup;
use crate::env::EnvVar;
use crate::flag::FlagDef;
use crate::option::{Arity, OptionDef};
use crate::registry::{Registry, Scope};

pub(crate) struct HelpContext<'a> {
    pub(crate) script_name: &'a str,
    pub(crate) description: &'a str,
    pub(crate) registry: &'a Registry,
    pub(crate) env_vars: &'a [EnvVar],
    pub(crate) verbose_enabled: bool,
    pub(crate) help_enabled: bool,
}

pub(crate) fn render(ctx: &HelpContext<'_>) -> String {
    let scope = ctx.registry.scope();

    let mut flags: Vec<FlagDef> = ctx.registry.flags.clone();
    let taken = |flags: &[FlagDef], trigger: &str| {
        flags
            .iter()
            .any(|f| f.short() == Some(trigger) || f.long() == Some(trigger))
    };
    if ctx.verbose_enabled && !taken(&flags, "-v") && !taken(&flags, "--verbose") {
        flags.push(FlagDef::verbose());
    }
    if ctx.help_enabled && !taken(&flags, "--help") {
        flags.push(FlagDef::help());
    }

    let mut out = format!("Usage: {}", ctx.script_name);
    for group in &ctx.registry.groups {
        if group.is_required() {
            out.push_str(&format!(" <{}>", group.name()));
        } else {
            out.push_str(&format!(" [<{}>]", group.name()));
        }
    }
    if !flags.is_empty() {
        out.push_str(" [flags]");
    }
    if !ctx.registry.options.is_empty() {
        out.push_str(" [options]");
    }
    out.push('\n');

    if !ctx.description.trim().is_empty() {
        out.push('\n');
        out.push_str(ctx.description.trim_end());
        out.push('\n');
    }

    if !scope.groups.is_empty() {
        out.push_str("\nCommands:\n");
        render_groups(&mut out, &scope.groups, 1);
    }

    if !flags.is_empty() {
        out.push_str("\nFlags:\n");
        push_rows(&mut out, 1, flags.iter().map(flag_row).collect());
    }

    if !scope.options.is_empty() {
        out.push_str("\nOptions:\n");
        push_rows(&mut out, 1, scope.options.iter().map(|o| option_row(o)).collect());
    }

    if !ctx.env_vars.is_empty() {
        out.push_str("\nEnvironment:\n");
        let rows = ctx
            .env_vars
            .iter()
            .map(|v| {
                let default = v.default_value().map(|d| d.to_string());
                (
                    v.name().to_string(),
                    describe(v.description(), v.is_required(), default),
                )
            })
            .collect();
        push_rows(&mut out, 1, rows);
    }

    out
}

fn render_groups(out: &mut String, groups: &[&CommandGroup], depth: usize) {
    let indent = "  ".repeat(depth);
    for group in groups {
        let mut line = format!("{indent}{}", group.name());
        if !group.description().trim().is_empty() {
            line.push_str(&format!(" - {}", group.description().trim()));
        }
        if group.is_required() {
            line.push_str(" (required)");
        }
        out.push_str(&line);
        out.push('\n');

        let width = group
            .commands()
            .iter()
            .map(|c| c.name().len())
            .max()
            .unwrap_or(0);
        for command in group.commands() {
            push_row(out, depth + 1, command.name(), command.description(), width);

            let nested = Scope::from_elements(command.elements());
            let mut rows: Vec<(String, String)> = nested.flags.iter().map(|f| flag_row(f)).collect();
            rows.extend(nested.options.iter().map(|o| option_row(o)));
            push_rows(out, depth + 2, rows);
            render_groups(out, &nested.groups, depth + 2);
        }
    }
}

fn flag_row(flag: &FlagDef) -> (String, String) {
    let left = [flag.short(), flag.long()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    (left, flag.description().trim().to_string())
}

fn option_row(option: &OptionDef) -> (String, String) {
    let mut left = [option.short(), option.long()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    left.push(' ');
    left.push_str(&placeholder(option));

    let default = option.default_value().map(|d| d.to_string());
    (left, describe(option.description(), option.is_required(), default))
}

fn placeholder(option: &OptionDef) -> String {
    let name = option.name().to_ascii_uppercase();
    match option.arity() {
        Arity::One => format!("<{name}>"),
        Arity::Fixed(n) => vec![format!("<{name}>"); n].join(" "),
        Arity::ZeroOrMore => format!("[{name}]..."),
        Arity::AtLeastOne => format!("<{name}>..."),
        Arity::Unbounded if option.is_required() => format!("<{name}>..."),
        Arity::Unbounded => format!("[{name}]..."),
    }
}

fn describe(description: &str, required: bool, default: Option<String>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !description.trim().is_empty() {
        parts.push(description.trim().to_string());
    }
    if required {
        parts.push("(required)".to_string());
    }
    if let Some(default) = default {
        parts.push(format!("[default: {default}]"));
    }
    parts.join(" ")
}

fn push_rows(out: &mut String, depth: usize, rows: Vec<(String, String)>) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        push_row(out, depth, &left, &help, width);
    }
}

fn push_row(out: &mut String, depth: usize, left: &str, help: &str, width: usize) {
    let indent = "  ".repeat(depth);
    if help.trim().is_empty() {
        out.push_str(&format!("{indent}{left}\n"));
    } else {
        out.push_str(&format!("{indent}{left:width$}  {}\n", help.trim()));
    }
}
