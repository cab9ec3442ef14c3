use async_trait::async_trait;
use database::receipt::{model::Receipt, repository::DynReceiptRepository};
use std::sync::Arc;
use utils::AppResult;

pub type DynLedgerService = Arc<dyn LedgerServiceTrait + Send + Sync>;

#[async_trait]
pub trait LedgerServiceTrait {
    async fn record(
        &self,
        charge_id: String,
        user_id: i64,
        package_id: Option<String>,
        credits: u64,
    ) -> AppResult<Receipt>;
    async fn find_by_charge(&self, charge_id: String) -> AppResult<Option<Receipt>>;
    async fn find_last_for_user(&self, user_id: i64) -> AppResult<Option<Receipt>>;
    async fn delete(&self, charge_id: String) -> AppResult<Option<Receipt>>;
}

#[derive(Clone)]
pub struct LedgerService {
    repository: DynReceiptRepository,
}

impl LedgerService {
    pub fn new(repository: DynReceiptRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn record(
        &self,
        charge_id: String,
        user_id: i64,
        package_id: Option<String>,
        credits: u64,
    ) -> AppResult<Receipt> {
        let receipt = self.repository.record(&charge_id, user_id, package_id, credits).await?;

        Ok(receipt)
    }

    async fn find_by_charge(&self, charge_id: String) -> AppResult<Option<Receipt>> {
        let receipt = self.repository.find_by_charge(&charge_id).await?;

        Ok(receipt)
    }

    async fn find_last_for_user(&self, user_id: i64) -> AppResult<Option<Receipt>> {
        let receipt = self.repository.find_last_for_user(user_id).await?;

        Ok(receipt)
    }

    async fn delete(&self, charge_id: String) -> AppResult<Option<Receipt>> {
        let receipt = self.repository.delete(&charge_id).await?;

        Ok(receipt)
    }
}
