//! Cisco IOS / IOS-XE platform definition.
//!
//! Privilege levels:
//! - `exec` - User EXEC mode with `>` prompt
//! - `privilege_exec` - Privileged EXEC mode with `#` prompt
//! - `configuration` - Configuration mode with `(config*)#` prompt
//!
//! # Prompt Examples
//!
//! ```text
//! asw-b2-01>                      # exec mode
//! asw-b2-01#                      # privilege_exec mode
//! asw-b2-01(config)#              # configuration mode
//! asw-b2-01(config-if)#           # config sub-mode (interface)
//! ```
//!
//! # Privilege Graph
//!
//! ```text
//! ┌──────┐  enable     ┌────────────────┐  configure terminal  ┌───────────────┐
//! │ exec ├──────────────► privilege_exec ├──────────────────────► configuration │
//! │  >   │   disable   │       #        │        end           │  (config*)#   │
//! └──────┘◄────────────┴────────────────┘◄─────────────────────┴───────────────┘
//! ```

use super::{ModeLink, PlatformDefinition, PrivilegeLevel};

/// Platform name for Cisco IOS.
pub const PLATFORM_NAME: &str = "cisco_ios";

/// User EXEC level name.
pub const EXEC: &str = "exec";

/// Privileged EXEC level name.
pub const PRIVILEGE_EXEC: &str = "privilege_exec";

/// Global/interface configuration level name.
pub const CONFIGURATION: &str = "configuration";

/// Copies the running configuration to startup.
pub const SAVE_COMMAND: &str = "write memory";

/// Create the Cisco IOS platform definition.
///
/// Uses `(?mi)` flags: `^`/`$` match at line boundaries and hostnames are
/// matched case-insensitively.
pub fn platform() -> Result<PlatformDefinition, regex::Error> {
    let exec = PrivilegeLevel::new(EXEC, r"(?mi)^[\w.\-@/:]{1,63}>\s?$")?;

    let enable = ModeLink::new(EXEC, "enable", "disable")
        .with_password_prompt(r"(?mi)^(?:enable\s)?password:\s?$")?;
    let privilege_exec = PrivilegeLevel::new(PRIVILEGE_EXEC, r"(?mi)^[\w.\-@/:]{1,63}#\s?$")?
        .entered_from(enable)
        .excluding("(conf");

    let configuration = PrivilegeLevel::new(
        CONFIGURATION,
        r"(?mi)^[\w.\-@/:]{1,63}\(conf[\w.\-@/:+]{0,63}\)#\s?$",
    )?
    .entered_from(ModeLink::new(PRIVILEGE_EXEC, "configure terminal", "end"));

    Ok(PlatformDefinition::new(PLATFORM_NAME)
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_default_privilege(PRIVILEGE_EXEC)
        .with_config_privilege(CONFIGURATION)
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input detected")
        .with_failure_pattern("% Unknown command")
        .with_failure_pattern("% Error")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_save_command(SAVE_COMMAND)
        .with_terminal_size(511, 24))
}
