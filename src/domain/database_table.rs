// Tables shown in the builder's database designer

use crate::store::{Record, Stamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

impl TableField {
    pub fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
        }
    }

    /// The conventional leading `id` field
    pub fn id() -> Self {
        Self::new("id", FieldType::String, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

/// Informal link to another table; nothing enforces it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub field: String,
    pub target_table: String,
    pub kind: RelationshipKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTable {
    pub id: String,
    pub app_id: String,
    pub name: String,
    pub schema: String,
    pub fields: Vec<TableField>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub row_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseTable {
    pub app_id: String,
    pub name: String,
    pub schema: Option<String>,
    #[serde(default)]
    pub fields: Vec<TableField>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl CreateDatabaseTable {
    /// Draft seeded with the leading `id` field, as the table designer does
    pub fn new(app_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            name: name.into(),
            fields: vec![TableField::id()],
            ..Default::default()
        }
    }

    pub fn field(mut self, field: TableField) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatabaseTable {
    pub app_id: Option<String>,
    pub name: Option<String>,
    pub schema: Option<String>,
    pub fields: Option<Vec<TableField>>,
    pub relationships: Option<Vec<Relationship>>,
    pub row_count: Option<u64>,
}

impl Record for DatabaseTable {
    type Key = String;
    type Draft = CreateDatabaseTable;
    type Changes = UpdateDatabaseTable;

    const ENTITY: &'static str = "database table";
    const APP_SCOPED: bool = true;

    fn key(&self) -> &String {
        &self.id
    }

    fn build(draft: CreateDatabaseTable, stamp: Stamp) -> Self {
        DatabaseTable {
            id: stamp.id,
            app_id: draft.app_id,
            name: draft.name,
            schema: draft.schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            fields: draft.fields,
            relationships: draft.relationships,
            row_count: 0,
            created_at: stamp.now,
        }
    }

    fn apply(&mut self, changes: UpdateDatabaseTable, _now: DateTime<Utc>) {
        if let Some(app_id) = changes.app_id {
            self.app_id = app_id;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(schema) = changes.schema {
            self.schema = schema;
        }
        if let Some(fields) = changes.fields {
            self.fields = fields;
        }
        if let Some(relationships) = changes.relationships {
            self.relationships = relationships;
        }
        if let Some(row_count) = changes.row_count {
            self.row_count = row_count;
        }
    }

    fn app_id(&self) -> Option<&str> {
        Some(&self.app_id)
    }
}
