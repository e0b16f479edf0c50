//! Parsing of raw input lines.
//!
//! Three line shapes are understood:
//!
//! | shape                                   | example                 |
//! |-----------------------------------------|-------------------------|
//! | `<user>/register`                       | `Alice/register`        |
//! | `done`                                  | `DONE`                  |
//! | `<user>@<target>/<ability> [solve ...]` | `alice@squirrel/punch`  |
//!
//! User, target and ability are lowercased. Targets may contain spaces
//! (`bob@giant wolf spider/punch`). Solve tokens are kept as typed.
//!
//! Parsing never panics; every malformed line yields a [`CommandError`] that
//! the caller records and moves past.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ability::AbilityId;
use crate::battle::ActionRequest;

/// Ability identifier used for registration lines.
pub const REGISTER: &str = "register";

/// Literal line that closes registration.
pub const DONE: &str = "done";

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The line was empty or only whitespace.
    #[error("empty command")]
    Empty,
    /// No `/` separating the user part from the ability.
    #[error("missing '/' in command: {0}")]
    MissingSeparator(String),
    /// Nothing before the `/` or `@`.
    #[error("missing user in command: {0}")]
    MissingUser(String),
    /// User names are single words.
    #[error("user name may not contain spaces: {0}")]
    InvalidUser(String),
    /// An `@` with nothing after it, or an action with no target at all.
    #[error("missing target in command: {0}")]
    MissingTarget(String),
    /// Nothing after the `/`.
    #[error("missing ability in command: {0}")]
    MissingAbility(String),
    /// A line in the registration phase that is not `<user>/register`.
    #[error("not a registration: {0}")]
    NotRegistration(String),
}

/// One parsed player utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Acting user, lowercased.
    pub user: String,
    /// Target name, lowercased.
    pub target: Option<String>,
    /// Ability identifier, lowercased.
    pub ability: AbilityId,
    /// Remaining whitespace-separated words; the first is the solve token.
    pub args: Vec<String>,
}

impl Command {
    /// Parses a line.
    ///
    /// # Example
    ///
    /// ```
    /// use boss_battles_core::command::Command;
    ///
    /// let command = Command::parse("Alice@Squirrel/sstrike k3ax").unwrap();
    /// assert_eq!(command.user, "alice");
    /// assert_eq!(command.target.as_deref(), Some("squirrel"));
    /// assert_eq!(command.ability.as_str(), "sstrike");
    /// assert_eq!(command.solve_token(), Some("k3ax"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing the first problem found.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (head, tail) = line
            .split_once('/')
            .ok_or_else(|| CommandError::MissingSeparator(line.to_string()))?;

        let (user, target) = match head.split_once('@') {
            Some((user, target)) => {
                let target = target.trim();
                if target.is_empty() {
                    return Err(CommandError::MissingTarget(line.to_string()));
                }
                (user.trim(), Some(target.to_lowercase()))
            }
            None => (head.trim(), None),
        };

        if user.is_empty() {
            return Err(CommandError::MissingUser(line.to_string()));
        }
        if user.contains(char::is_whitespace) {
            return Err(CommandError::InvalidUser(line.to_string()));
        }

        let mut words = tail.split_whitespace();
        let ability = words
            .next()
            .ok_or_else(|| CommandError::MissingAbility(line.to_string()))?
            .to_lowercase();

        Ok(Self {
            user: user.to_lowercase(),
            target,
            ability: AbilityId::from(ability),
            args: words.map(str::to_string).collect(),
        })
    }

    /// The submitted solve token, if any.
    #[must_use]
    pub fn solve_token(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// True for `<user>/register`.
    #[must_use]
    pub fn is_registration(&self) -> bool {
        self.target.is_none() && self.ability.as_str() == REGISTER
    }

    /// Converts into an action for the combat engine.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingTarget`] when the command names no target.
    pub fn into_request(self) -> Result<ActionRequest, CommandError> {
        let target = self
            .target
            .clone()
            .ok_or_else(|| CommandError::MissingTarget(self.to_string()))?;
        let solve_token = self.solve_token().map(str::to_string);
        let mut request = ActionRequest::new(self.user, self.ability, target);
        request.solve_token = solve_token;
        Ok(request)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user)?;
        if let Some(target) = &self.target {
            write!(f, "@{target}")?;
        }
        write!(f, "/{}", self.ability)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// True if the line is the literal `done`, ignoring case and surrounding
/// whitespace.
#[must_use]
pub fn is_done(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(DONE)
}

/// Parses a registration line and returns the lowercased user name.
///
/// ```
/// use boss_battles_core::command::parse_registration;
///
/// assert_eq!(parse_registration("MrGallo/Register").unwrap(), "mrgallo");
/// assert!(parse_registration("mrgallo@squirrel/punch").is_err());
/// ```
///
/// # Errors
///
/// Returns the parse error, or [`CommandError::NotRegistration`] for any
/// other well-formed command.
pub fn parse_registration(line: &str) -> Result<String, CommandError> {
    let command = Command::parse(line)?;
    if command.is_registration() && command.args.is_empty() {
        Ok(command.user)
    } else {
        Err(CommandError::NotRegistration(line.trim().to_string()))
    }
}
