use serde::{Deserialize, Serialize};

/// 平台推送的更新信封
///
/// Webhook收到的一切都是Update。字段全部可选：未知形态的更新
/// 反序列化后所有字段为None，由分发器直接忽略。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    pub update_id: Option<i64>,
    pub message: Option<Message>,
    pub pre_checkout_query: Option<PreCheckoutQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: Option<i64>,
    pub from: Option<TgUser>,
    pub chat: Chat,
    pub text: Option<String>,
    pub successful_payment: Option<SuccessfulPayment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub username: Option<String>,
}

/// 支付敲定前的预检查询，必须第一时间批准
#[derive(Debug, Clone, Deserialize)]
pub struct PreCheckoutQuery {
    pub id: String,
    pub from: Option<TgUser>,
    pub currency: Option<String>,
    pub total_amount: Option<i64>,
    pub invoice_payload: Option<String>,
}

/// 已完成的支付事件
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessfulPayment {
    pub currency: Option<String>,
    pub total_amount: Option<i64>,
    /// 发起发票时附带的不透明负载，完成时原样带回用于关联
    pub invoice_payload: String,
    /// 平台为本笔交易分配的唯一charge id
    pub telegram_payment_charge_id: String,
}

/// 出站消息（sendMessage的请求体）
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl OutgoingMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    pub fn markdown_v2(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: Some("MarkdownV2".to_string()),
            reply_markup: None,
        }
    }

    pub fn with_web_app_button(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.reply_markup = Some(InlineKeyboardMarkup::web_app_button(label, url));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// 单个打开Mini App的按钮，一行一列
    pub fn web_app_button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: label.into(),
                web_app: Some(WebAppInfo { url: url.into() }),
            }]],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebAppInfo {
    pub url: String,
}

/// 发票价格项（createInvoiceLink的prices数组元素）
#[derive(Debug, Clone, Serialize)]
pub struct LabeledPrice {
    pub label: String,
    pub amount: u64,
}

/// Star交易记录（getStarTransactions返回）
///
/// amount为正表示入账，为负表示退款出账。
#[derive(Debug, Clone, Deserialize)]
pub struct StarTransaction {
    pub id: Option<String>,
    pub amount: i64,
    pub date: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StarTransactions {
    #[serde(default)]
    pub transactions: Vec<StarTransaction>,
}

/// Bot API统一响应信封 {ok, result, description}
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}
