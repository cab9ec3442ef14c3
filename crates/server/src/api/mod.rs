pub mod invoice_controller;
pub mod package_controller;
pub mod referral_controller;
pub mod webhook_controller;

use crate::{dtos::static_dto::HealthResponse, services::Services};
use axum::{routing::get, Extension, Json, Router};
use database::package::repository::PackageRepositoryTrait;
use utils::AppResult;

/// 系统健康检查
///
/// 返回运行状态、Bot标识与在售套餐ID
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "服务器运行正常", body = HealthResponse)
    ),
    tag = "系统状态"
)]
pub async fn health(Extension(services): Extension<Services>) -> AppResult<Json<HealthResponse>> {
    let packages = services.database.list_packages().await?.into_iter().map(|p| p.id).collect();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        bot: services.config.bot_name.clone(),
        packages,
    }))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(health))
        .merge(invoice_controller::InvoiceController::app())
        .merge(webhook_controller::WebhookController::app())
        .merge(referral_controller::ReferralController::app())
        .merge(package_controller::PackageController::app())
}
