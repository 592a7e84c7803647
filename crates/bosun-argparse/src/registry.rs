//! Element registry and the borrowed per-scope view the matchers work on.

use std::collections::HashSet;

use crate::command::CommandGroup;
use crate::flag::FlagDef;
use crate::option::OptionDef;

/// Any element that can be registered on a [`Cli`](crate::Cli) or nested
/// under a [`Command`](crate::Command).
#[derive(Debug, Clone)]
pub enum Element {
    Option(OptionDef),
    Flag(FlagDef),
    CommandGroup(CommandGroup),
}

impl From<OptionDef> for Element {
    fn from(option: OptionDef) -> Self {
        Self::Option(option)
    }
}

impl From<FlagDef> for Element {
    fn from(flag: FlagDef) -> Self {
        Self::Flag(flag)
    }
}

impl From<CommandGroup> for Element {
    fn from(group: CommandGroup) -> Self {
        Self::CommandGroup(group)
    }
}

/// Top-level definitions, reused across parse calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct Registry {
    pub(crate) options: Vec<OptionDef>,
    pub(crate) flags: Vec<FlagDef>,
    pub(crate) groups: Vec<CommandGroup>,
}

impl Registry {
    pub(crate) fn scope(&self) -> Scope<'_> {
        Scope {
            options: self.options.iter().collect(),
            flags: self.flags.iter().collect(),
            groups: self.groups.iter().collect(),
        }
    }

    /// Add a group, replacing any group with the same name in place.
    pub(crate) fn upsert_group(&mut self, group: CommandGroup) {
        match self.groups.iter_mut().find(|g| g.name() == group.name()) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }
}

/// Elements of one parse level, partitioned by capability.
#[derive(Debug, Default)]
pub(crate) struct Scope<'a> {
    pub(crate) options: Vec<&'a OptionDef>,
    pub(crate) flags: Vec<&'a FlagDef>,
    pub(crate) groups: Vec<&'a CommandGroup>,
}

impl<'a> Scope<'a> {
    pub(crate) fn from_elements(elements: &'a [Element]) -> Self {
        let mut scope = Scope::default();
        for element in elements {
            match element {
                Element::Option(o) => scope.options.push(o),
                Element::Flag(f) => scope.flags.push(f),
                Element::CommandGroup(g) => scope.groups.push(g),
            }
        }
        scope
    }

    /// Triggers declared in this scope or below it.
    pub(crate) fn known_triggers(&self) -> KnownTriggers {
        let mut out = KnownTriggers::default();
        self.collect_triggers(&mut out);
        out
    }

    fn collect_triggers(&self, out: &mut KnownTriggers) {
        out.longs.extend(self.options.iter().filter_map(|o| o.long()).map(str::to_string));
        out.longs.extend(self.flags.iter().filter_map(|f| f.long()).map(str::to_string));
        out.flag_shorts.extend(self.flags.iter().filter_map(|f| f.short()).map(str::to_string));
        for group in &self.groups {
            for command in group.commands() {
                Scope::from_elements(command.elements()).collect_triggers(out);
            }
        }
    }
}

/// Triggers of a whole definition tree, computed once per parse.
///
/// A scope leaves tokens it cannot claim but that a deeper scope may still
/// match; anything outside these sets is a typo.
#[derive(Debug, Default)]
pub(crate) struct KnownTriggers {
    /// Long triggers of every flag and option.
    pub(crate) longs: HashSet<String>,
    /// Short triggers of every flag, the only shorts a bundle may hold.
    pub(crate) flag_shorts: HashSet<String>,
}
