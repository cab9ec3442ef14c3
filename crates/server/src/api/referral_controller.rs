use crate::{
    dtos::referral_dto::{BonusQuery, BonusResponse, ClaimReferralDto, ClaimedResponse},
    extractors::validation_extractor::ValidationExtractor,
    services::Services,
};
use axum::{
    extract::Query,
    routing::{get, post},
    Extension, Json, Router,
};
use utils::AppResult;

/// 查询推荐奖励
///
/// 只读，不动claim状态
#[utoipa::path(
    get,
    path = "/referral-bonus",
    params(
        ("userId" = i64, Query, description = "用户ID")
    ),
    responses(
        (status = 200, description = "成功返回可领取奖励汇总", body = BonusResponse),
        (status = 400, description = "缺少userId")
    ),
    tag = "推荐"
)]
pub async fn referral_bonus(
    Extension(services): Extension<Services>,
    Query(query): Query<BonusQuery>,
) -> AppResult<Json<BonusResponse>> {
    let summary = services.referral.compute_bonus(query.user_id).await?;

    Ok(Json(BonusResponse {
        bonus: summary.bonus,
        kind: summary.kind,
        count: summary.count,
    }))
}

/// 领取推荐奖励
///
/// 原子翻转该用户全部未领取条目；重复调用返回 {"claimed": 0}
#[utoipa::path(
    post,
    path = "/claim-referral",
    request_body = ClaimReferralDto,
    responses(
        (status = 200, description = "领取成功（无可领取时claimed为0）", body = ClaimedResponse)
    ),
    tag = "推荐"
)]
pub async fn claim_referral(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<ClaimReferralDto>,
) -> AppResult<Json<ClaimedResponse>> {
    let claimed = services.referral.claim(req.user_id).await?;

    Ok(Json(ClaimedResponse { claimed }))
}

pub struct ReferralController;
impl ReferralController {
    pub fn app() -> Router {
        Router::new()
            .route("/referral-bonus", get(referral_bonus))
            .route("/claim-referral", post(claim_referral))
    }
}
