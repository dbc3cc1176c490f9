use regex::Regex;

use crate::error::ProfileMatchError;
use crate::profile::Profile;

/// Selects profiles whose name, commandline or source matches a pattern.
///
/// Each pattern must match the whole field. A profile is selected when any
/// configured pattern matches; a matcher with no patterns selects nothing.
#[derive(Debug, Clone, Default)]
pub struct ProfileMatcher {
    name: Option<Regex>,
    commandline: Option<Regex>,
    source: Option<Regex>,
}

impl ProfileMatcher {
    /// # Errors
    /// Returns an error naming the first pattern that does not compile.
    pub fn new(
        name: Option<&str>,
        commandline: Option<&str>,
        source: Option<&str>,
    ) -> Result<Self, ProfileMatchError> {
        Ok(Self {
            name: compile("name", name)?,
            commandline: compile("commandline", commandline)?,
            source: compile("source", source)?,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.commandline.is_none() && self.source.is_none()
    }

    #[must_use]
    pub fn matches(&self, profile: &Profile) -> bool {
        [
            (&self.name, &profile.name),
            (&self.source, &profile.source),
            (&self.commandline, &profile.commandline),
        ]
        .into_iter()
        .any(|(regex, text)| regex.as_ref().is_some_and(|regex| regex.is_match(text)))
    }
}

fn compile(
    field: &'static str,
    pattern: Option<&str>,
) -> Result<Option<Regex>, ProfileMatchError> {
    let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    Regex::new(&format!("^(?:{pattern})$"))
        .map(Some)
        .map_err(|e| ProfileMatchError {
            field,
            pattern: pattern.to_string(),
            details: e.to_string(),
        })
}
