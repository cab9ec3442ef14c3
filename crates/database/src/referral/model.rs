use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 每个未领取条目（被推荐边或推荐人条目）的奖励额
pub const REFERRAL_BONUS: u64 = 100;

/// 推荐关系边模型
///
/// 以被推荐人ID为键；一个用户一生只能被推荐一次，边创建后不删除，
/// claimed只会从false翻到true。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReferralEdge {
    /// 推荐人用户ID
    pub referrer_id: i64,
    /// 被推荐人自己的奖励是否已领取
    pub claimed: bool,
    /// 创建时间戳
    pub timestamp: u64, // 1734187238
}

/// 推荐人奖励条目
///
/// 每成功拉新一人追加一条，按追加顺序保存，逐条独立可领取。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BonusEntry {
    /// 带来的被推荐人ID
    pub referee_id: i64,
    /// 是否已领取
    pub claimed: bool,
}

/// 奖励类型（按用户在图中的角色）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    None,
    Referee,
    Referrer,
    Both,
}

/// computeBonus的只读汇总
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BonusSummary {
    /// 可领取总额
    pub bonus: u64,
    /// 角色
    pub kind: BonusKind,
    /// 未领取的推荐人条目数
    pub count: u64,
}
