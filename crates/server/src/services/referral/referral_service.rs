use async_trait::async_trait;
use database::referral::{model::BonusSummary, repository::DynReferralRepository};
use std::sync::Arc;
use utils::AppResult;

pub type DynReferralService = Arc<dyn ReferralServiceTrait + Send + Sync>;

#[async_trait]
pub trait ReferralServiceTrait {
    async fn register(&self, referrer_id: i64, referee_id: i64) -> AppResult<bool>;
    async fn compute_bonus(&self, user_id: i64) -> AppResult<BonusSummary>;
    async fn claim(&self, user_id: i64) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct ReferralService {
    repository: DynReferralRepository,
}

impl ReferralService {
    pub fn new(repository: DynReferralRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ReferralServiceTrait for ReferralService {
    async fn register(&self, referrer_id: i64, referee_id: i64) -> AppResult<bool> {
        let created = self.repository.register(referrer_id, referee_id).await?;

        Ok(created)
    }

    async fn compute_bonus(&self, user_id: i64) -> AppResult<BonusSummary> {
        let summary = self.repository.compute_bonus(user_id).await?;

        Ok(summary)
    }

    async fn claim(&self, user_id: i64) -> AppResult<u64> {
        let claimed = self.repository.claim(user_id).await?;

        Ok(claimed)
    }
}
