use crate::store::{Record, Stamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_OWNER: &str = "postgres";
const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionLanguage {
    Sql,
    Plpgsql,
    Javascript,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseFunction {
    pub id: String,
    pub app_id: String,
    pub name: String,
    pub schema: String,
    pub language: FunctionLanguage,
    pub return_type: String,
    #[serde(default)]
    pub arguments: Vec<FunctionArgument>,
    pub definition: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseFunction {
    pub app_id: String,
    pub name: String,
    pub schema: Option<String>,
    pub language: FunctionLanguage,
    pub return_type: String,
    #[serde(default)]
    pub arguments: Vec<FunctionArgument>,
    pub definition: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatabaseFunction {
    pub name: Option<String>,
    pub schema: Option<String>,
    pub language: Option<FunctionLanguage>,
    pub return_type: Option<String>,
    pub arguments: Option<Vec<FunctionArgument>>,
    pub definition: Option<String>,
}

impl Record for DatabaseFunction {
    type Key = String;
    type Draft = CreateDatabaseFunction;
    type Changes = UpdateDatabaseFunction;

    const ENTITY: &'static str = "database function";
    const APP_SCOPED: bool = true;

    fn key(&self) -> &String {
        &self.id
    }

    fn build(draft: CreateDatabaseFunction, stamp: Stamp) -> Self {
        DatabaseFunction {
            id: stamp.id,
            app_id: draft.app_id,
            name: draft.name,
            schema: draft.schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            language: draft.language,
            return_type: draft.return_type,
            arguments: draft.arguments,
            definition: draft.definition,
            owner: DEFAULT_OWNER.to_string(),
            created_at: stamp.now,
            updated_at: stamp.now,
        }
    }

    // Unlike the other entities, every update refreshes `updated_at`.
    fn apply(&mut self, changes: UpdateDatabaseFunction, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(schema) = changes.schema {
            self.schema = schema;
        }
        if let Some(language) = changes.language {
            self.language = language;
        }
        if let Some(return_type) = changes.return_type {
            self.return_type = return_type;
        }
        if let Some(arguments) = changes.arguments {
            self.arguments = arguments;
        }
        if let Some(definition) = changes.definition {
            self.definition = definition;
        }
        self.updated_at = now;
    }

    fn app_id(&self) -> Option<&str> {
        Some(&self.app_id)
    }
}
