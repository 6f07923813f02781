//! File path templates.
//!
//! A template such as
//! `{{PROJECT_KEY}}/{{ENV_NAME}}/{{DB_NAME}}##{{VERSION}}##{{TYPE}}##{{DESCRIPTION}}.sql`
//! is compiled once into an anchored regular expression with one named group
//! per placeholder, then matched against every changed file path to build a
//! [`MigrationInfo`].
//!
//! The placeholder set is closed. Besides placeholders, a template may use
//! two wildcards:
//!
//! - `/*/` matches exactly one path segment
//! - `**` matches any sequence of characters, `/` included
//!
//! Everything else is matched literally.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use thiserror::Error;

/// Characters a placeholder value may not contain.
const PLACEHOLDER_CLASS: &str = r#"[^\\/?%*:|"<>]+"#;

/// The closed set of placeholders a template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// `{{PROJECT_KEY}}`
    ProjectKey,
    /// `{{ENV_NAME}}`
    EnvName,
    /// `{{VERSION}}`
    Version,
    /// `{{DB_NAME}}`
    DbName,
    /// `{{TYPE}}`
    Type,
    /// `{{DESCRIPTION}}`
    Description,
}

impl Placeholder {
    /// Every placeholder, in extraction order.
    pub const ALL: [Placeholder; 6] = [
        Placeholder::ProjectKey,
        Placeholder::EnvName,
        Placeholder::Version,
        Placeholder::DbName,
        Placeholder::Type,
        Placeholder::Description,
    ];

    /// The name between the braces, also used as the capture group name.
    pub const fn name(self) -> &'static str {
        match self {
            Placeholder::ProjectKey => "PROJECT_KEY",
            Placeholder::EnvName => "ENV_NAME",
            Placeholder::Version => "VERSION",
            Placeholder::DbName => "DB_NAME",
            Placeholder::Type => "TYPE",
            Placeholder::Description => "DESCRIPTION",
        }
    }

    /// Look a placeholder up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.name())
    }
}

/// The kind of change a migration file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationType {
    /// Schema change (DDL), including `CREATE DATABASE`.
    Migrate,
    /// Data change (DML).
    Data,
}

impl MigrationType {
    /// Map a `{{TYPE}}` value onto a migration type.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "data" | "dml" => Some(MigrationType::Data),
            "migrate" | "ddl" => Some(MigrationType::Migrate),
            _ => None,
        }
    }

    /// The issue title for this kind of change.
    pub const fn title(self) -> &'static str {
        match self {
            MigrationType::Data => "Change data",
            MigrationType::Migrate => "Alter schema",
        }
    }
}

/// Metadata extracted from a migration file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationInfo {
    /// `{{PROJECT_KEY}}`, if the template has one.
    pub project_key: Option<String>,
    /// `{{ENV_NAME}}`, if the template has one.
    pub environment: Option<String>,
    /// `{{DB_NAME}}`.
    pub database: String,
    /// `{{VERSION}}`.
    pub version: String,
    /// `{{TYPE}}`, schema change when absent.
    pub migration_type: MigrationType,
    /// Humanized `{{DESCRIPTION}}`, or a default built from the type and database.
    pub description: String,
}

impl MigrationInfo {
    /// The title derived from the change kind.
    pub fn title(&self) -> &'static str {
        self.migration_type.title()
    }
}

/// Errors raised while compiling a template or extracting from a path.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template names a placeholder outside the closed set.
    #[error("file path template {template:?} uses unknown placeholder {{{{{name}}}}}")]
    UnknownPlaceholder {
        /// Offending template.
        template: String,
        /// Placeholder name.
        name: String,
    },

    /// The generated pattern does not compile, e.g. a repeated placeholder.
    #[error("invalid file path template {template:?}")]
    InvalidPattern {
        /// Offending template.
        template: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// `{{TYPE}}` matched a value outside the vocabulary.
    #[error(
        "file path {path:?} contains invalid migration type {value:?}, must be 'migrate'('ddl') or 'data'('dml')"
    )]
    InvalidMigrationType {
        /// Offending path.
        path: String,
        /// Offending value.
        value: String,
    },

    /// A mandatory placeholder did not capture anything.
    #[error("file path {path:?} does not contain {field}, configured file path template {template:?}")]
    MissingField {
        /// Offending path.
        path: String,
        /// The missing placeholder.
        field: Placeholder,
        /// Configured template.
        template: String,
    },
}

/// A compiled file path template.
///
/// Immutable after [`compile`](Self::compile); share it freely between
/// requests.
#[derive(Debug, Clone)]
pub struct PlaceholderTemplate {
    template: String,
    pattern: Regex,
    placeholders: Vec<Placeholder>,
}

impl PlaceholderTemplate {
    /// Compile a template.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let mut pattern = String::from("^");
        let mut literal = String::new();
        let mut placeholders = Vec::new();
        let mut rest = template;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("{{") {
                if let Some(end) = after.find("}}") {
                    let name = &after[..end];
                    let placeholder = Placeholder::from_name(name).ok_or_else(|| {
                        TemplateError::UnknownPlaceholder {
                            template: template.to_string(),
                            name: name.to_string(),
                        }
                    })?;
                    flush_literal(&mut pattern, &mut literal);
                    pattern.push_str(&format!("(?P<{name}>{PLACEHOLDER_CLASS})"));
                    placeholders.push(placeholder);
                    rest = &after[end + 2..];
                    continue;
                }
            }
            if let Some(after) = rest.strip_prefix("**") {
                flush_literal(&mut pattern, &mut literal);
                pattern.push_str(".*");
                rest = after;
                continue;
            }
            if rest.starts_with("/*/") {
                // The closing slash stays in `rest` so `/*/*/` yields two segments.
                flush_literal(&mut pattern, &mut literal);
                pattern.push_str("/[^/]+");
                rest = &rest[2..];
                continue;
            }
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                literal.push(c);
            }
            rest = chars.as_str();
        }
        flush_literal(&mut pattern, &mut literal);
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|source| TemplateError::InvalidPattern {
            template: template.to_string(),
            source,
        })?;

        Ok(Self {
            template: template.to_string(),
            pattern,
            placeholders,
        })
    }

    /// The template source.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholders in the order they appear in the template.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Raw placeholder values of `path`, or `None` if it does not match.
    pub fn captures<'p>(&self, path: &'p str) -> Option<BTreeMap<Placeholder, &'p str>> {
        let caps = self.pattern.captures(path)?;
        Some(
            self.placeholders
                .iter()
                .filter_map(|p| caps.name(p.name()).map(|m| (*p, m.as_str())))
                .collect(),
        )
    }

    /// Extract migration metadata from `path`.
    ///
    /// Returns `Ok(None)` when the path does not match the template; the
    /// caller decides whether an unmatched file is simply skipped.
    pub fn extract(&self, path: &str) -> Result<Option<MigrationInfo>, TemplateError> {
        let Some(captured) = self.captures(path) else {
            return Ok(None);
        };
        let value = |p: Placeholder| captured.get(&p).copied().filter(|v| !v.is_empty());

        let migration_type = match value(Placeholder::Type) {
            Some(raw) => {
                MigrationType::parse(raw).ok_or_else(|| TemplateError::InvalidMigrationType {
                    path: path.to_string(),
                    value: raw.to_string(),
                })?
            }
            None => MigrationType::Migrate,
        };
        let version = value(Placeholder::Version).ok_or_else(|| self.missing(path, Placeholder::Version))?;
        let database = value(Placeholder::DbName).ok_or_else(|| self.missing(path, Placeholder::DbName))?;

        let description = match value(Placeholder::Description) {
            Some(raw) => humanize(raw),
            None => match migration_type {
                MigrationType::Data => format!("Create {database} data change"),
                MigrationType::Migrate => format!("Create {database} schema migration"),
            },
        };

        Ok(Some(MigrationInfo {
            project_key: value(Placeholder::ProjectKey).map(str::to_string),
            environment: value(Placeholder::EnvName).map(str::to_string),
            database: database.to_string(),
            version: version.to_string(),
            migration_type,
            description,
        }))
    }

    fn missing(&self, path: &str, field: Placeholder) -> TemplateError {
        TemplateError::MissingField {
            path: path.to_string(),
            field,
            template: self.template.clone(),
        }
    }
}

fn flush_literal(pattern: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        pattern.push_str(&regex::escape(literal));
        literal.clear();
    }
}

/// `add_index` -> `Add index`.
fn humanize(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}
