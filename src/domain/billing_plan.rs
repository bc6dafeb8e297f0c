// Pricing plans, keyed by tier rather than by a generated id

use crate::domain::app::BillingTier;
use crate::store::{Record, Stamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPrice {
    pub monthly: u32,
    pub yearly: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPlan {
    pub tier: BillingTier,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: PlanPrice,
    pub features: Vec<String>,
    #[serde(default)]
    pub limitations: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillingPlan {
    pub tier: BillingTier,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: PlanPrice,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub limitations: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillingPlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<PlanPrice>,
    pub features: Option<Vec<String>>,
    pub limitations: Option<Vec<String>>,
    pub popular: Option<bool>,
}

impl Record for BillingPlan {
    type Key = BillingTier;
    type Draft = CreateBillingPlan;
    type Changes = UpdateBillingPlan;

    const ENTITY: &'static str = "billing plan";

    fn key(&self) -> &BillingTier {
        &self.tier
    }

    // The caller picks the key; a tier that is already present is a conflict.
    fn build(draft: CreateBillingPlan, _stamp: Stamp) -> Self {
        BillingPlan {
            tier: draft.tier,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            features: draft.features,
            limitations: draft.limitations,
            popular: draft.popular,
        }
    }

    fn apply(&mut self, changes: UpdateBillingPlan, _now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(features) = changes.features {
            self.features = features;
        }
        if let Some(limitations) = changes.limitations {
            self.limitations = limitations;
        }
        if let Some(popular) = changes.popular {
            self.popular = popular;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::services::{RecordService, ServiceContext};
    use crate::store::{FixtureStore, LatencyProfile};

    fn plan(tier: BillingTier, monthly: u32) -> BillingPlan {
        BillingPlan {
            tier,
            name: tier.as_str().to_string(),
            description: String::new(),
            price: PlanPrice {
                monthly,
                yearly: monthly * 10,
            },
            features: vec!["1 App".to_string()],
            limitations: Vec::new(),
            popular: false,
        }
    }

    fn service(seed: Vec<BillingPlan>) -> RecordService<BillingPlan> {
        RecordService::new(
            FixtureStore::seeded(seed).unwrap(),
            LatencyProfile::default(),
            ServiceContext::immediate(),
        )
    }

    #[tokio::test]
    async fn test_lookup_by_tier() {
        let plans = service(vec![plan(BillingTier::Starter, 0), plan(BillingTier::Pro, 29)]);

        let pro = plans.get_by_id(&BillingTier::Pro).await.unwrap();
        assert_eq!(pro.price.monthly, 29);

        let err = plans.get_by_id(&BillingTier::Enterprise).await.unwrap_err();
        assert_eq!(err, StoreError::not_found("billing plan", "enterprise"));
    }

    #[tokio::test]
    async fn test_create_existing_tier_conflicts() {
        let plans = service(vec![plan(BillingTier::Pro, 29)]);

        let err = plans
            .create(CreateBillingPlan {
                tier: BillingTier::Pro,
                name: "Pro again".to_string(),
                description: String::new(),
                price: PlanPrice { monthly: 1, yearly: 1 },
                features: Vec::new(),
                limitations: Vec::new(),
                popular: false,
            })
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::conflict("billing plan", "pro"));
        assert_eq!(plans.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_recreate_tier() {
        let plans = service(vec![plan(BillingTier::Enterprise, 99)]);
        assert!(plans.delete(&BillingTier::Enterprise).await.unwrap());

        let recreated = plans
            .create(CreateBillingPlan {
                tier: BillingTier::Enterprise,
                name: "Enterprise".to_string(),
                description: "For large teams".to_string(),
                price: PlanPrice { monthly: 99, yearly: 990 },
                features: vec!["SLA Guarantee".to_string()],
                limitations: Vec::new(),
                popular: false,
            })
            .await
            .unwrap();

        assert_eq!(recreated.tier, BillingTier::Enterprise);
        assert_eq!(plans.get_all().await, vec![recreated]);
    }
}
