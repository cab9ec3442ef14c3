use crate::services::Services;
use axum::{http::StatusCode, routing::post, Extension, Json, Router};
use serde_json::Value;
use telegram::Update;
use tracing::{error, warn};

/// 平台Webhook入口
///
/// 收到即应答200，真正的处理转入后台任务：平台对未应答webhook的
/// 重试时钟与handler耗时完全解耦。handler自身的失败平台不可见，
/// 只能落日志（账本/claim的恰好一次语义由下层保证，用户通知则是
/// 至多一次）
#[utoipa::path(
    post,
    path = "/webhook",
    responses(
        (status = 200, description = "已接收，响应体会被平台忽略")
    ),
    tag = "支付"
)]
pub async fn webhook(Extension(services): Extension<Services>, Json(body): Json<Value>) -> StatusCode {
    match serde_json::from_value::<Update>(body) {
        Ok(update) => {
            tokio::spawn(async move {
                if let Err(e) = services.webhook.handle(update).await {
                    error!("❌ webhook handler failed: {}", e);
                }
            });
        }
        Err(e) => {
            // 未知的更新形态直接忽略，照样应答
            warn!("⚠️ unrecognized update shape, ignored: {}", e);
        }
    }

    StatusCode::OK
}

pub struct WebhookController;
impl WebhookController {
    pub fn app() -> Router {
        Router::new().route("/webhook", post(webhook))
    }
}
