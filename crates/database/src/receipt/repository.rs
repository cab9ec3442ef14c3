use crate::{receipt::model::Receipt, Database};
use async_trait::async_trait;
use chrono::prelude::Utc;
use std::sync::{atomic::Ordering, Arc};
use tracing::warn;
use utils::AppResult;

pub type DynReceiptRepository = Arc<dyn ReceiptRepositoryTrait + Send + Sync>;

// 主要用于Service中，表示提供了该Trait功能
#[async_trait]
pub trait ReceiptRepositoryTrait {
    // 记录一笔支付回执（charge id已存在时为幂等覆盖）
    async fn record(&self, charge_id: &str, user_id: i64, package_id: Option<String>, credits: u64)
        -> AppResult<Receipt>;

    // 按charge id查回执（completed-payment去重用）
    async fn find_by_charge(&self, charge_id: &str) -> AppResult<Option<Receipt>>;

    // 某个用户最近一次购买的回执（退款场景的"最后一单"）
    async fn find_last_for_user(&self, user_id: i64) -> AppResult<Option<Receipt>>;

    // 删除回执，仅在退款确认之后调用
    async fn delete(&self, charge_id: &str) -> AppResult<Option<Receipt>>;
}

#[async_trait]
impl ReceiptRepositoryTrait for Database {
    async fn record(
        &self,
        charge_id: &str,
        user_id: i64,
        package_id: Option<String>,
        credits: u64,
    ) -> AppResult<Receipt> {
        // charge id由平台保证唯一，归属不同购买的覆盖不应该发生。
        // 真发生时按last-write-wins处理并记录约束违例。
        if let Some(existing) = self.receipts.get(charge_id) {
            if existing.user_id != user_id || existing.package_id != package_id {
                warn!(
                    "⚠️ receipt constraint violation: charge {} rewritten (user {} -> {})",
                    charge_id, existing.user_id, user_id
                );
            }
        }

        let receipt = Receipt {
            charge_id: charge_id.to_string(),
            user_id,
            package_id,
            credits,
            seq: self.receipt_seq.fetch_add(1, Ordering::SeqCst),
            timestamp: Utc::now().timestamp() as u64,
        };

        self.receipts.insert(charge_id.to_string(), receipt.clone());

        Ok(receipt)
    }

    async fn find_by_charge(&self, charge_id: &str) -> AppResult<Option<Receipt>> {
        let receipt = self.receipts.get(charge_id).map(|r| r.value().clone());

        Ok(receipt)
    }

    async fn find_last_for_user(&self, user_id: i64) -> AppResult<Option<Receipt>> {
        // 全量扫描后取插入序号最大者；charge id唯一、序号全序，不存在并列
        let receipt = self
            .receipts
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .max_by_key(|entry| entry.value().seq)
            .map(|entry| entry.value().clone());

        Ok(receipt)
    }

    async fn delete(&self, charge_id: &str) -> AppResult<Option<Receipt>> {
        let removed = self.receipts.remove(charge_id).map(|(_, r)| r);

        Ok(removed)
    }
}
