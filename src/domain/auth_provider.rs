use crate::store::{Record, Stamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderType {
    Email,
    Google,
    Github,
    Facebook,
    Twitter,
    Apple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProvider {
    pub id: String,
    pub app_id: String,
    #[serde(rename = "type")]
    pub provider_type: AuthProviderType,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthProvider {
    pub app_id: String,
    #[serde(rename = "type")]
    pub provider_type: AuthProviderType,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthProvider {
    pub app_id: Option<String>,
    #[serde(rename = "type")]
    pub provider_type: Option<AuthProviderType>,
    pub enabled: Option<bool>,
}

impl UpdateAuthProvider {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }
}

impl Record for AuthProvider {
    type Key = String;
    type Draft = CreateAuthProvider;
    type Changes = UpdateAuthProvider;

    const ENTITY: &'static str = "auth provider";
    const APP_SCOPED: bool = true;

    fn key(&self) -> &String {
        &self.id
    }

    fn build(draft: CreateAuthProvider, stamp: Stamp) -> Self {
        AuthProvider {
            id: stamp.id,
            app_id: draft.app_id,
            provider_type: draft.provider_type,
            enabled: draft.enabled,
            created_at: stamp.now,
        }
    }

    fn apply(&mut self, changes: UpdateAuthProvider, _now: DateTime<Utc>) {
        if let Some(app_id) = changes.app_id {
            self.app_id = app_id;
        }
        if let Some(provider_type) = changes.provider_type {
            self.provider_type = provider_type;
        }
        if let Some(enabled) = changes.enabled {
            self.enabled = enabled;
        }
    }

    fn app_id(&self) -> Option<&str> {
        Some(&self.app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{RecordService, ServiceContext};
    use crate::store::{FixtureStore, LatencyProfile};

    #[tokio::test]
    async fn test_toggle_provider_through_update() {
        let providers: RecordService<AuthProvider> = RecordService::new(
            FixtureStore::empty(),
            LatencyProfile::default(),
            ServiceContext::immediate(),
        );

        let github = providers
            .create(CreateAuthProvider {
                app_id: "1".to_string(),
                provider_type: AuthProviderType::Github,
                enabled: false,
            })
            .await
            .unwrap();

        let enabled = providers
            .update(&github.id, UpdateAuthProvider::enabled(true))
            .await
            .unwrap();
        assert!(enabled.enabled);
        assert_eq!(enabled.provider_type, AuthProviderType::Github);
        assert_eq!(enabled.created_at, github.created_at);
    }

    #[test]
    fn test_wire_shape() {
        let provider: AuthProvider = serde_json::from_str(
            r#"{"id":"9","appId":"1","type":"apple","enabled":true,"createdAt":"2024-01-15T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(provider.provider_type, AuthProviderType::Apple);
        assert_eq!(provider.app_id, "1");
    }
}
