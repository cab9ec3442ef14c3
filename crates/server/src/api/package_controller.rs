use crate::services::Services;
use axum::{routing::get, Extension, Json, Router};
use database::package::{model::Package, repository::PackageRepositoryTrait};
use utils::AppResult;

/// 套餐目录
///
/// 返回客户端商店页需要的完整套餐列表
#[utoipa::path(
    get,
    path = "/packages",
    responses(
        (status = 200, description = "成功返回套餐列表", body = Vec<Package>)
    ),
    tag = "支付"
)]
pub async fn list_packages(Extension(services): Extension<Services>) -> AppResult<Json<Vec<Package>>> {
    let packages = services.database.list_packages().await?;

    Ok(Json(packages))
}

pub struct PackageController;
impl PackageController {
    pub fn app() -> Router {
        Router::new().route("/packages", get(list_packages))
    }
}
