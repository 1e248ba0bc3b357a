//! CLI modes and the commands that move between them.

use regex::bytes::Regex;

/// How a mode is reached from the mode below it.
#[derive(Debug, Clone)]
pub struct ModeLink {
    /// Mode this one is entered from.
    pub parent: String,
    /// Typed in the parent to enter this mode (`enable`).
    pub enter: String,
    /// Typed in this mode to fall back to the parent (`disable`).
    pub exit: String,
    /// Secret prompt shown after `enter`, answered with the enable secret.
    pub password_prompt: Option<Regex>,
}

impl ModeLink {
    pub fn new(
        parent: impl Into<String>,
        enter: impl Into<String>,
        exit: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            enter: enter.into(),
            exit: exit.into(),
            password_prompt: None,
        }
    }

    pub fn with_password_prompt(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.password_prompt = Some(Regex::new(pattern)?);
        Ok(self)
    }
}

/// One privilege level, recognized by its prompt.
#[derive(Debug, Clone)]
pub struct PrivilegeLevel {
    pub name: String,
    prompt: Regex,
    /// Prompt fragments that rule this level out even when `prompt` matches.
    excluded: Vec<String>,
    /// `None` for the level a login lands in.
    pub link: Option<ModeLink>,
}

impl PrivilegeLevel {
    pub fn new(name: impl Into<String>, prompt: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            prompt: Regex::new(prompt)?,
            excluded: Vec::new(),
            link: None,
        })
    }

    /// Place this level above another one.
    pub fn entered_from(mut self, link: ModeLink) -> Self {
        self.link = Some(link);
        self
    }

    /// `asw#` and `asw(config)#` both end in `#`; excluding `(conf` keeps
    /// privileged EXEC from claiming configuration prompts.
    pub fn excluding(mut self, fragment: impl Into<String>) -> Self {
        self.excluded.push(fragment.into());
        self
    }

    pub fn parent(&self) -> Option<&str> {
        self.link.as_ref().map(|link| link.parent.as_str())
    }

    /// Regex source of the prompt.
    pub fn prompt_pattern(&self) -> &str {
        self.prompt.as_str()
    }

    pub fn matches(&self, prompt: &str) -> bool {
        !self
            .excluded
            .iter()
            .any(|fragment| prompt.contains(fragment.as_str()))
            && self.prompt.is_match(prompt.as_bytes())
    }
}
