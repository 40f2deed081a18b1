//! Registry of people, keyed by a unique email-shaped identifier.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Result, SchedulerError};

/// A registered person. The identifier never changes; the display name may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    name: String,
    email: String,
}

impl Person {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.name, self.email)
    }
}

/// Whether `identifier` has the `<local-part>@<non-whitespace>` shape.
///
/// No further email validation is done.
pub fn is_valid_identifier(identifier: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^.+@\S+$").expect("identifier pattern is valid"))
        .is_match(identifier)
}

/// All registered people, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    people: Vec<Person>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new person.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidInput`] if `name` is empty or `email` is not
    /// identifier-shaped, and [`SchedulerError::DuplicateIdentifier`] if `email` is
    /// already registered. The directory is unchanged on error.
    pub fn register(&mut self, name: &str, email: &str) -> Result<&Person> {
        if name.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "person name must not be empty".to_string(),
            ));
        }
        validate_identifier(email)?;
        if self.find(email).is_some() {
            return Err(SchedulerError::DuplicateIdentifier(email.to_string()));
        }

        self.people.push(Person {
            name: name.to_string(),
            email: email.to_string(),
        });
        Ok(&self.people[self.people.len() - 1])
    }

    /// Look a person up by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidInput`] for a malformed identifier and
    /// [`SchedulerError::NotFound`] if nobody carries it.
    pub fn resolve(&self, email: &str) -> Result<&Person> {
        validate_identifier(email)?;
        self.find(email)
            .ok_or_else(|| SchedulerError::NotFound(format!("person '{email}'")))
    }

    /// Resolve every identifier, failing on the first one that does not resolve.
    pub fn resolve_all<S: AsRef<str>>(&self, emails: &[S]) -> Result<Vec<&Person>> {
        emails.iter().map(|e| self.resolve(e.as_ref())).collect()
    }

    /// Change a person's display name.
    pub fn rename(&mut self, email: &str, name: &str) -> Result<&Person> {
        if name.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "person name must not be empty".to_string(),
            ));
        }
        validate_identifier(email)?;
        let person = self
            .people
            .iter_mut()
            .find(|p| p.email == email)
            .ok_or_else(|| SchedulerError::NotFound(format!("person '{email}'")))?;
        person.name = name.to_string();
        Ok(person)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    fn find(&self, email: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.email == email)
    }
}

fn validate_identifier(email: &str) -> Result<()> {
    if is_valid_identifier(email) {
        Ok(())
    } else {
        Err(SchedulerError::InvalidInput(format!(
            "'{email}' is not a valid identifier"
        )))
    }
}
