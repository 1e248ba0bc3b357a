//! Platform definition: everything the driver needs to know about a device OS.

use indexmap::IndexMap;

use super::privilege_level::PrivilegeLevel;

/// Prompt, privilege and command conventions of one platform.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "cisco_ios").
    pub name: String,

    /// Privilege levels, root first.
    pub privilege_levels: IndexMap<String, PrivilegeLevel>,

    /// Privilege level commands are normally issued from.
    pub default_privilege: String,

    /// Privilege level configuration lines are entered in.
    pub config_privilege: String,

    /// Output fragments that mark a command as rejected.
    pub failed_when_contains: Vec<String>,

    /// Commands run right after the session reaches its first prompt.
    pub on_open_commands: Vec<String>,

    /// Command that persists the running configuration.
    pub save_command: String,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    /// Create a new platform definition with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privilege_levels: IndexMap::new(),
            default_privilege: String::new(),
            config_privilege: String::new(),
            failed_when_contains: vec![],
            on_open_commands: vec![],
            save_command: String::new(),
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    /// Add a privilege level.
    pub fn with_privilege(mut self, level: PrivilegeLevel) -> Self {
        self.privilege_levels.insert(level.name.clone(), level);
        self
    }

    /// Set the default privilege level.
    pub fn with_default_privilege(mut self, name: impl Into<String>) -> Self {
        self.default_privilege = name.into();
        self
    }

    /// Set the configuration privilege level.
    pub fn with_config_privilege(mut self, name: impl Into<String>) -> Self {
        self.config_privilege = name.into();
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Set the save-configuration command.
    pub fn with_save_command(mut self, command: impl Into<String>) -> Self {
        self.save_command = command.into();
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Get a privilege level by name.
    pub fn get_privilege(&self, name: &str) -> Option<&PrivilegeLevel> {
        self.privilege_levels.get(name)
    }

    /// First failure pattern contained in `output`, if any.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Regex source matching the prompt of any privilege level.
    pub fn combined_prompt_pattern(&self) -> String {
        self.privilege_levels
            .values()
            .map(|level| format!("(?:{})", level.prompt_pattern()))
            .collect::<Vec<_>>()
            .join("|")
    }
}
