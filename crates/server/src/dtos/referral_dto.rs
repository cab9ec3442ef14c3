use database::referral::model::BonusKind;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 查询奖励的query参数
#[derive(Clone, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BonusQuery {
    pub user_id: i64,
}

/// 奖励查询响应 {bonus, type, count}
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct BonusResponse {
    /// 可领取总额
    pub bonus: u64,
    /// 角色: none / referee / referrer / both
    #[serde(rename = "type")]
    pub kind: BonusKind,
    /// 未领取的推荐人条目数
    pub count: u64,
}

/// 领取奖励的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReferralDto {
    pub user_id: i64,
}

/// 领取奖励的响应体
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct ClaimedResponse {
    /// 本次实际入账的总额（重复领取时为0）
    pub claimed: u64,
}
