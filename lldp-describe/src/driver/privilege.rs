//! Privilege level tracking and navigation.

use indexmap::IndexMap;
use regex::bytes::Regex;

use crate::error::{DriverError, Result};
use crate::platform::PrivilegeLevel;

/// Tracks the current privilege level and plans moves between levels.
///
/// Levels form a tree through their `ModeLink`s; a move from one level to
/// another climbs to their closest common ancestor and descends from there.
#[derive(Debug)]
pub struct PrivilegeManager {
    levels: IndexMap<String, PrivilegeLevel>,
    current: Option<String>,
}

impl PrivilegeManager {
    /// Create a manager positioned at the root level.
    pub fn new(levels: IndexMap<String, PrivilegeLevel>) -> Self {
        let current = levels
            .values()
            .find(|l| l.link.is_none())
            .map(|l| l.name.clone());

        Self { levels, current }
    }

    /// Determine the privilege level a prompt belongs to.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<&PrivilegeLevel> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .ok_or_else(|| {
                DriverError::UnknownPrivilege {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }

    /// Get the current privilege level.
    pub fn current(&self) -> Option<&PrivilegeLevel> {
        self.current.as_ref().and_then(|name| self.levels.get(name))
    }

    /// Update the current level from a prompt, leaving it unchanged when the
    /// prompt is not recognized. Returns the recognized level name.
    pub fn observe_prompt(&mut self, prompt: &str) -> Option<String> {
        let name = self.determine_from_prompt(prompt).ok()?.name.clone();
        self.current = Some(name.clone());
        Some(name)
    }

    /// The level itself followed by its parents up to the root.
    fn lineage(&self, name: &str) -> Option<Vec<&str>> {
        let mut chain = vec![self.levels.get(name)?.name.as_str()];
        let mut level = self.levels.get(name)?;

        while let Some(parent) = level.parent() {
            // A malformed definition could loop forever
            if chain.len() > self.levels.len() || chain.contains(&parent) {
                return None;
            }
            level = self.levels.get(parent)?;
            chain.push(level.name.as_str());
        }

        Some(chain)
    }

    /// Find the path from one privilege level to another.
    ///
    /// Returns the level names to traverse, including both ends.
    pub fn find_path(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let no_path = || DriverError::NoPrivilegePath {
            from: from.to_string(),
            to: to.to_string(),
        };

        let up = self.lineage(from).ok_or_else(no_path)?;
        let down = self.lineage(to).ok_or_else(no_path)?;

        let (up_idx, down_idx) = up
            .iter()
            .enumerate()
            .find_map(|(i, name)| down.iter().position(|d| d == name).map(|j| (i, j)))
            .ok_or_else(no_path)?;

        let path = up[..=up_idx]
            .iter()
            .chain(down[..down_idx].iter().rev())
            .map(|name| name.to_string())
            .collect();

        Ok(path)
    }

    /// Get the command for a move between two adjacent levels.
    pub fn get_transition(&self, from: &str, to: &str) -> Option<TransitionInfo> {
        let from_level = self.levels.get(from)?;
        let to_level = self.levels.get(to)?;

        match (&to_level.link, &from_level.link) {
            (Some(up), _) if up.parent == from => Some(TransitionInfo {
                command: up.enter.clone(),
                auth_prompt: up.password_prompt.clone(),
            }),
            (_, Some(down)) if down.parent == to => Some(TransitionInfo {
                command: down.exit.clone(),
                auth_prompt: None,
            }),
            _ => None,
        }
    }
}

/// Information about a privilege level transition.
#[derive(Debug, Clone)]
pub struct TransitionInfo {
    /// Command to execute for the transition.
    pub command: String,

    /// Password prompt the device may show. If `Some`, a secret is sent
    /// when the prompt appears.
    pub auth_prompt: Option<Regex>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ModeLink;
    use crate::platform::cisco_ios::{self, CONFIGURATION, EXEC, PRIVILEGE_EXEC};

    fn manager() -> PrivilegeManager {
        PrivilegeManager::new(cisco_ios::platform().unwrap().privilege_levels)
    }

    #[test]
    fn test_starts_at_root() {
        let manager = manager();
        assert_eq!(manager.current().unwrap().name, EXEC);
    }

    #[test]
    fn test_determine_privilege() {
        let manager = manager();

        let level = manager.determine_from_prompt("asw-b2-01>").unwrap();
        assert_eq!(level.name, EXEC);

        let level = manager.determine_from_prompt("asw-b2-01#").unwrap();
        assert_eq!(level.name, PRIVILEGE_EXEC);

        let level = manager.determine_from_prompt("asw-b2-01(config-if)#").unwrap();
        assert_eq!(level.name, CONFIGURATION);

        assert!(manager.determine_from_prompt("Password:").is_err());
    }

    #[test]
    fn test_observe_prompt_keeps_level_on_unknown_prompt() {
        let mut manager = manager();
        assert_eq!(
            manager.observe_prompt("asw-b2-01#").as_deref(),
            Some(PRIVILEGE_EXEC)
        );
        assert_eq!(manager.observe_prompt("--More--"), None);
        assert_eq!(manager.current().unwrap().name, PRIVILEGE_EXEC);
    }

    #[test]
    fn test_find_path() {
        let manager = manager();

        let path = manager.find_path(EXEC, CONFIGURATION).unwrap();
        assert_eq!(path, vec![EXEC, PRIVILEGE_EXEC, CONFIGURATION]);

        let path = manager.find_path(CONFIGURATION, EXEC).unwrap();
        assert_eq!(path, vec![CONFIGURATION, PRIVILEGE_EXEC, EXEC]);

        let path = manager.find_path(CONFIGURATION, PRIVILEGE_EXEC).unwrap();
        assert_eq!(path, vec![CONFIGURATION, PRIVILEGE_EXEC]);

        let path = manager.find_path(EXEC, EXEC).unwrap();
        assert_eq!(path, vec![EXEC]);

        assert!(manager.find_path(EXEC, "shell").is_err());
    }

    #[test]
    fn test_find_path_across_branches() {
        let root = PrivilegeLevel::new("root", r">$").unwrap();
        let left = PrivilegeLevel::new("left", r"L$")
            .unwrap()
            .entered_from(ModeLink::new("root", "left", "exit"));
        let right = PrivilegeLevel::new("right", r"R$")
            .unwrap()
            .entered_from(ModeLink::new("root", "right", "exit"));

        let mut levels = IndexMap::new();
        for level in [root, left, right] {
            levels.insert(level.name.clone(), level);
        }
        let manager = PrivilegeManager::new(levels);

        let path = manager.find_path("left", "right").unwrap();
        assert_eq!(path, vec!["left", "root", "right"]);
    }

    #[test]
    fn test_get_transition() {
        let manager = manager();

        let trans = manager.get_transition(EXEC, PRIVILEGE_EXEC).unwrap();
        assert_eq!(trans.command, "enable");
        assert!(trans.auth_prompt.is_some());

        let trans = manager.get_transition(PRIVILEGE_EXEC, CONFIGURATION).unwrap();
        assert_eq!(trans.command, "configure terminal");
        assert!(trans.auth_prompt.is_none());

        let trans = manager.get_transition(CONFIGURATION, PRIVILEGE_EXEC).unwrap();
        assert_eq!(trans.command, "end");

        assert!(manager.get_transition(EXEC, CONFIGURATION).is_none());
    }

    #[test]
    fn test_sibling_levels_have_no_direct_transition() {
        let root = PrivilegeLevel::new("root", r">$").unwrap();
        let shell = PrivilegeLevel::new("shell", r"\$$")
            .unwrap()
            .entered_from(ModeLink::new("root", "start shell", "exit"));
        let debug = PrivilegeLevel::new("debug", r"D$")
            .unwrap()
            .entered_from(ModeLink::new("root", "debug", "quit"));

        let mut levels = IndexMap::new();
        for level in [root, shell, debug] {
            levels.insert(level.name.clone(), level);
        }
        let manager = PrivilegeManager::new(levels);

        assert_eq!(manager.get_transition("shell", "root").unwrap().command, "exit");
        assert_eq!(manager.get_transition("root", "debug").unwrap().command, "debug");
        assert!(manager.get_transition("shell", "debug").is_none());
    }
}
