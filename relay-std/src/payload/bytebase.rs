//! Bytebase issue creation request.

use crate::template::MigrationType;
use serde::{Deserialize, Serialize};

/// The type of a Bytebase issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    /// Updating database schemas (DDL).
    #[serde(rename = "bb.issue.database.schema.update")]
    DatabaseSchemaUpdate,
    /// Updating database data (DML).
    #[serde(rename = "bb.issue.database.data.update")]
    DatabaseDataUpdate,
}

impl From<MigrationType> for IssueType {
    fn from(migration_type: MigrationType) -> Self {
        match migration_type {
            MigrationType::Migrate => IssueType::DatabaseSchemaUpdate,
            MigrationType::Data => IssueType::DatabaseDataUpdate,
        }
    }
}

/// One database change of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationDetail {
    /// DDL or DML.
    pub migration_type: MigrationType,
    /// Target database.
    pub database_name: String,
    /// Environment the database belongs to.
    pub environment_name: String,
    /// SQL to apply.
    pub statement: String,
    /// Version recorded for the change.
    pub schema_version: String,
}

/// Body of `POST /v1/issue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCreate {
    /// Bytebase project key.
    pub project_key: String,
    /// Issue title.
    pub name: String,
    /// Issue type.
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Issue description.
    pub description: String,
    /// Changes applied by the issue.
    pub migration_list: Vec<MigrationDetail>,
}
