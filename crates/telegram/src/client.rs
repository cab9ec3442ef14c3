use crate::types::{ApiEnvelope, LabeledPrice, OutgoingMessage, StarTransaction, StarTransactions};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use utils::{AppError, AppResult};

pub type DynBotApi = Arc<dyn BotApiTrait + Send + Sync>;

/// 平台方合同固定的五个出站调用
///
/// 用trait隔离真实HTTP客户端，测试中以记录型假实现替换。
#[async_trait]
pub trait BotApiTrait {
    /// createInvoiceLink: 请求一个可支付链接
    async fn create_invoice_link(
        &self,
        title: &str,
        description: &str,
        payload: &str,
        currency: &str,
        prices: Vec<LabeledPrice>,
    ) -> AppResult<String>;

    /// answerPreCheckoutQuery: 批准(或拒绝)预检
    async fn answer_pre_checkout_query(&self, query_id: &str, ok: bool) -> AppResult<()>;

    /// sendMessage: 给用户发消息
    async fn send_message(&self, message: OutgoingMessage) -> AppResult<()>;

    /// getStarTransactions: 拉取Star交易流水
    async fn get_star_transactions(&self, offset: u32, limit: u32) -> AppResult<Vec<StarTransaction>>;

    /// refundStarPayment: 按charge id退款
    async fn refund_star_payment(&self, user_id: i64, charge_id: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct TelegramBot {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramBot {
    pub fn new(api_base: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
        }
    }

    /// 调用一个Bot API方法并解开 {ok, result, description} 信封
    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> AppResult<T> {
        debug!("➡️ telegram api call: {}", method);

        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("telegram request failed: {}", e)))?;

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("telegram response unreadable: {}", e)))?;

        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| AppError::Upstream("telegram response missing result".to_string()))
        } else {
            Err(AppError::Upstream(
                envelope.description.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[async_trait]
impl BotApiTrait for TelegramBot {
    async fn create_invoice_link(
        &self,
        title: &str,
        description: &str,
        payload: &str,
        currency: &str,
        prices: Vec<LabeledPrice>,
    ) -> AppResult<String> {
        self.call(
            "createInvoiceLink",
            json!({
                "title": title,
                "description": description,
                "payload": payload,
                "provider_token": "",
                "currency": currency,
                "prices": prices,
            }),
        )
        .await
    }

    async fn answer_pre_checkout_query(&self, query_id: &str, ok: bool) -> AppResult<()> {
        let _: bool = self
            .call(
                "answerPreCheckoutQuery",
                json!({ "pre_checkout_query_id": query_id, "ok": ok }),
            )
            .await?;

        Ok(())
    }

    async fn send_message(&self, message: OutgoingMessage) -> AppResult<()> {
        let body = serde_json::to_value(&message)
            .map_err(|e| AppError::Upstream(format!("unserializable message: {}", e)))?;
        let _: Value = self.call("sendMessage", body).await?;

        Ok(())
    }

    async fn get_star_transactions(&self, offset: u32, limit: u32) -> AppResult<Vec<StarTransaction>> {
        let result: StarTransactions = self
            .call("getStarTransactions", json!({ "offset": offset, "limit": limit }))
            .await?;

        Ok(result.transactions)
    }

    async fn refund_star_payment(&self, user_id: i64, charge_id: &str) -> AppResult<()> {
        let _: bool = self
            .call(
                "refundStarPayment",
                json!({ "user_id": user_id, "telegram_payment_charge_id": charge_id }),
            )
            .await?;

        Ok(())
    }
}
