use crate::{
    referral::model::{BonusEntry, BonusKind, BonusSummary, ReferralEdge, REFERRAL_BONUS},
    Database,
};
use async_trait::async_trait;
use chrono::prelude::Utc;
use std::{collections::HashMap, sync::Arc};
use tracing::info;
use utils::AppResult;

pub type DynReferralRepository = Arc<dyn ReferralRepositoryTrait + Send + Sync>;

/// 推荐图的内存状态
///
/// register/claim是关键临界区：整个图共用一把锁，状态转移是纯内存
/// 操作、绝不跨await持锁，因此单锁即可保证effect-once。
#[derive(Default)]
pub struct ReferralState {
    /// referee_id -> 边
    pub(crate) edges: HashMap<i64, ReferralEdge>,
    /// referrer_id -> 奖励条目（追加序）
    pub(crate) bonuses: HashMap<i64, Vec<BonusEntry>>,
}

#[async_trait]
pub trait ReferralRepositoryTrait {
    // 建立推荐边；自荐或已有边时为no-op。返回是否真的新建了边
    async fn register(&self, referrer_id: i64, referee_id: i64) -> AppResult<bool>;

    // 查某个被推荐人的边
    async fn get_edge(&self, referee_id: i64) -> AppResult<Option<ReferralEdge>>;

    // 查某个推荐人的奖励条目列表
    async fn bonus_entries(&self, referrer_id: i64) -> AppResult<Vec<BonusEntry>>;

    // 只读汇总，不动claim状态
    async fn compute_bonus(&self, user_id: i64) -> AppResult<BonusSummary>;

    // 原子翻转该用户所有未领取条目，返回本次入账总额。effect-once
    async fn claim(&self, user_id: i64) -> AppResult<u64>;
}

#[async_trait]
impl ReferralRepositoryTrait for Database {
    async fn register(&self, referrer_id: i64, referee_id: i64) -> AppResult<bool> {
        if referrer_id == referee_id {
            return Ok(false);
        }

        let mut state = self.referral.write();

        // 第一条 /start ref_* 生效，之后的不同token静默丢弃
        if state.edges.contains_key(&referee_id) {
            return Ok(false);
        }

        state.edges.insert(
            referee_id,
            ReferralEdge {
                referrer_id,
                claimed: false,
                timestamp: Utc::now().timestamp() as u64,
            },
        );
        state
            .bonuses
            .entry(referrer_id)
            .or_default()
            .push(BonusEntry { referee_id, claimed: false });

        info!("🔗 referral: {} -> {}", referrer_id, referee_id);

        Ok(true)
    }

    async fn get_edge(&self, referee_id: i64) -> AppResult<Option<ReferralEdge>> {
        let edge = self.referral.read().edges.get(&referee_id).cloned();

        Ok(edge)
    }

    async fn bonus_entries(&self, referrer_id: i64) -> AppResult<Vec<BonusEntry>> {
        let entries = self.referral.read().bonuses.get(&referrer_id).cloned().unwrap_or_default();

        Ok(entries)
    }

    async fn compute_bonus(&self, user_id: i64) -> AppResult<BonusSummary> {
        let state = self.referral.read();

        let mut bonus = 0;
        let mut kind = BonusKind::None;
        let mut count = 0;

        // 作为被推荐人：自己的边还没领过
        if let Some(edge) = state.edges.get(&user_id) {
            if !edge.claimed {
                bonus += REFERRAL_BONUS;
                kind = BonusKind::Referee;
            }
        }

        // 作为推荐人：逐条未领取的条目
        if let Some(entries) = state.bonuses.get(&user_id) {
            let unclaimed = entries.iter().filter(|e| !e.claimed).count() as u64;
            if unclaimed > 0 {
                bonus += unclaimed * REFERRAL_BONUS;
                count = unclaimed;
                kind = match kind {
                    BonusKind::Referee => BonusKind::Both,
                    _ => BonusKind::Referrer,
                };
            }
        }

        Ok(BonusSummary { bonus, kind, count })
    }

    async fn claim(&self, user_id: i64) -> AppResult<u64> {
        let mut state = self.referral.write();

        let mut total = 0;

        if let Some(edge) = state.edges.get_mut(&user_id) {
            if !edge.claimed {
                edge.claimed = true;
                total += REFERRAL_BONUS;
            }
        }

        if let Some(entries) = state.bonuses.get_mut(&user_id) {
            for entry in entries.iter_mut().filter(|e| !e.claimed) {
                entry.claimed = true;
                total += REFERRAL_BONUS;
            }
        }

        if total > 0 {
            info!("💰 referral claim: user={} amount={}", user_id, total);
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_creates_edge_and_bonus_entry() {
        let db = Database::new();

        assert!(db.register(777, 1001).await.unwrap());

        let edge = db.get_edge(1001).await.unwrap().unwrap();
        assert_eq!(edge.referrer_id, 777);
        assert!(!edge.claimed);

        let entries = db.bonus_entries(777).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].referee_id, 1001);
        assert!(!entries[0].claimed);
    }

    #[tokio::test]
    async fn test_register_self_referral_is_noop() {
        let db = Database::new();

        assert!(!db.register(42, 42).await.unwrap());
        assert!(db.get_edge(42).await.unwrap().is_none());
        assert!(db.bonus_entries(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_second_attempt_keeps_original_referrer() {
        let db = Database::new();

        assert!(db.register(777, 1001).await.unwrap());
        assert!(!db.register(888, 1001).await.unwrap());

        let edge = db.get_edge(1001).await.unwrap().unwrap();
        assert_eq!(edge.referrer_id, 777);
        assert!(db.bonus_entries(888).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compute_bonus_referee_and_referrer_sides() {
        let db = Database::new();
        db.register(777, 1001).await.unwrap();

        let referee_side = db.compute_bonus(1001).await.unwrap();
        assert_eq!(referee_side.bonus, 100);
        assert_eq!(referee_side.kind, BonusKind::Referee);
        assert_eq!(referee_side.count, 0);

        let referrer_side = db.compute_bonus(777).await.unwrap();
        assert_eq!(referrer_side.bonus, 100);
        assert_eq!(referrer_side.kind, BonusKind::Referrer);
        assert_eq!(referrer_side.count, 1);
    }

    #[tokio::test]
    async fn test_compute_bonus_both_kinds() {
        let db = Database::new();

        // 1001既被777推荐，又拉来了2002和2003
        db.register(777, 1001).await.unwrap();
        db.register(1001, 2002).await.unwrap();
        db.register(1001, 2003).await.unwrap();

        let summary = db.compute_bonus(1001).await.unwrap();
        assert_eq!(summary.bonus, 300);
        assert_eq!(summary.kind, BonusKind::Both);
        assert_eq!(summary.count, 2);
    }

    #[tokio::test]
    async fn test_compute_bonus_does_not_mutate() {
        let db = Database::new();
        db.register(777, 1001).await.unwrap();

        db.compute_bonus(1001).await.unwrap();
        let again = db.compute_bonus(1001).await.unwrap();
        assert_eq!(again.bonus, 100);
    }

    #[tokio::test]
    async fn test_claim_twice_never_recredits() {
        let db = Database::new();

        db.register(777, 1001).await.unwrap();
        db.register(1001, 2002).await.unwrap();

        let first = db.claim(1001).await.unwrap();
        assert_eq!(first, 200); // 自己的边 + 1个推荐人条目

        let second = db.claim(1001).await.unwrap();
        assert_eq!(second, 0);

        let summary = db.compute_bonus(1001).await.unwrap();
        assert_eq!(summary.bonus, 0);
        assert_eq!(summary.kind, BonusKind::None);
    }

    #[tokio::test]
    async fn test_claim_unknown_user_returns_zero() {
        let db = Database::new();

        assert_eq!(db.claim(9999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_claim_only_touches_own_entries() {
        let db = Database::new();

        db.register(777, 1001).await.unwrap();
        db.register(777, 1002).await.unwrap();

        // 1001领自己的，777的推荐人条目不受影响
        assert_eq!(db.claim(1001).await.unwrap(), 100);

        let referrer_side = db.compute_bonus(777).await.unwrap();
        assert_eq!(referrer_side.bonus, 200);
        assert_eq!(referrer_side.count, 2);
    }

    #[tokio::test]
    async fn test_concurrent_claims_pay_out_once() {
        let db = Database::new();
        db.register(777, 1001).await.unwrap();

        // 两个并发claim，总入账必须恰好等于一次的额度
        let a = {
            let db = db.clone();
            tokio::spawn(async move { db.claim(1001).await.unwrap() })
        };
        let b = {
            let db = db.clone();
            tokio::spawn(async move { db.claim(1001).await.unwrap() })
        };

        let total = a.await.unwrap() + b.await.unwrap();
        assert_eq!(total, 100);
    }
}
