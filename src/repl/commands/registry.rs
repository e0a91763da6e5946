//! # Command Registry
//!
//! Maps command names and their short aliases to handlers. Lookup is
//! case-insensitive and resolves an alias to the same handler as its
//! canonical name.

use std::collections::HashMap;

use super::{
    BenchCommand, Command, DisplayCommand, FindCommand, GetCommand, HelpCommand, OutputCommand,
    ParseCommand, QuitCommand, RemoveCommand, UrlCommand,
};

// Type alias for boxed command handlers
type CommandBox = Box<dyn Command>;

pub struct CommandRegistry {
    commands: Vec<CommandBox>,
    /// name or alias -> index into `commands`
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Create a new registry with default commands
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_default_commands();
        registry
    }

    /// Create a registry without any commands
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    fn register_default_commands(&mut self) {
        self.add_command(Box::new(FindCommand));
        self.add_command(Box::new(GetCommand));
        self.add_command(Box::new(UrlCommand));
        self.add_command(Box::new(DisplayCommand));
        self.add_command(Box::new(OutputCommand));
        self.add_command(Box::new(BenchCommand));
        self.add_command(Box::new(RemoveCommand));
        self.add_command(Box::new(ParseCommand));
        self.add_command(Box::new(HelpCommand));
        self.add_command(Box::new(QuitCommand));
    }

    /// Add a command. A name or alias already taken is rebound to the new command.
    pub fn add_command(&mut self, command: CommandBox) {
        let index = self.commands.len();
        for key in std::iter::once(command.name()).chain(command.aliases().iter().copied()) {
            if let Some(previous) = self.lookup.insert(key, index) {
                tracing::warn!(
                    "Command key '{}' rebound from {} to {}",
                    key,
                    self.commands[previous].name(),
                    command.name()
                );
            }
        }
        self.commands.push(command);
    }

    /// Find the handler for a command name or alias
    pub fn find(&self, name: &str) -> Option<&dyn Command> {
        let index = match self.lookup.get(name) {
            Some(index) => *index,
            None => *self.lookup.get(name.to_ascii_lowercase().as_str())?,
        };
        self.commands.get(index).map(|command| command.as_ref())
    }

    /// Canonical name a name or alias resolves to
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        self.find(name).map(|command| command.name())
    }

    /// Get count of registered commands
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
