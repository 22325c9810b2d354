use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One shell command: its name, help text and handler.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands sharing a help heading (clubs, members, dues, ...).
pub struct CommandGroup {
    pub title: &'static str,
    pub entries: Vec<CommandEntry>,
}

/// Shell commands in help order, grouped by heading.
///
/// A name registered twice keeps its first entry.
#[derive(Default)]
pub struct CommandRegistry {
    groups: Vec<CommandGroup>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_group(&mut self, title: &'static str, entries: Vec<CommandEntry>) {
        let mut fresh: Vec<CommandEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            let taken = self.get(entry.name).is_some()
                || fresh.iter().any(|known| known.name == entry.name);
            if taken {
                tracing::warn!(command = entry.name, "duplicate command ignored");
            } else {
                fresh.push(entry);
            }
        }
        self.groups.push(CommandGroup {
            title,
            entries: fresh,
        });
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    fn entries(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries().find(|entry| entry.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}
