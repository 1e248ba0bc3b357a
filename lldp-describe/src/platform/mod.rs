//! Platform definitions: prompt patterns, privilege levels and command
//! conventions for the supported device operating system.

pub mod cisco_ios;
mod definition;
mod privilege_level;

pub use definition::PlatformDefinition;
pub use privilege_level::{ModeLink, PrivilegeLevel};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device platform tag carried by every device target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Cisco IOS / IOS-XE access switches.
    #[default]
    CiscoIos,
}

impl Platform {
    /// Stable name of the platform, as used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::CiscoIos => cisco_ios::PLATFORM_NAME,
        }
    }

    /// Privilege level commands are run from.
    pub fn default_privilege(&self) -> &'static str {
        match self {
            Platform::CiscoIos => cisco_ios::PRIVILEGE_EXEC,
        }
    }

    /// Command that persists the running configuration.
    pub fn save_command(&self) -> &'static str {
        match self {
            Platform::CiscoIos => cisco_ios::SAVE_COMMAND,
        }
    }

    /// Build the platform definition.
    pub fn definition(&self) -> Result<PlatformDefinition, regex::Error> {
        match self {
            Platform::CiscoIos => cisco_ios::platform(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
