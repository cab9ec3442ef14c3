use crate::{
    dtos::invoice_dto::InvoicePayload,
    services::{
        payment::ledger_service::DynLedgerService, referral::referral_service::DynReferralService, webhook::messages,
    },
};
use database::package::repository::DynPackageRepository;
use telegram::{DynBotApi, PreCheckoutQuery, SuccessfulPayment, Update};
use tracing::{error, info, warn};
use utils::AppResult;

/// Webhook事件分发器
///
/// 对入站Update分类并路由到对应的handler。HTTP层在调用前就已经
/// 应答了平台，这里的失败只会被记录，不会触发平台侧重投。
pub struct WebhookService {
    ledger: DynLedgerService,
    referral: DynReferralService,
    packages: DynPackageRepository,
    bot: DynBotApi,
    game_url: String,
    support_contact: String,
}

impl WebhookService {
    pub fn new(
        ledger: DynLedgerService,
        referral: DynReferralService,
        packages: DynPackageRepository,
        bot: DynBotApi,
        game_url: String,
        support_contact: String,
    ) -> Self {
        Self {
            ledger,
            referral,
            packages,
            bot,
            game_url,
            support_contact,
        }
    }

    /// 分类优先级固定：预检 > 完成支付 > 文本命令，其余形态忽略
    pub async fn handle(&self, update: Update) -> AppResult<()> {
        if let Some(query) = update.pre_checkout_query {
            return self.handle_pre_checkout(query).await;
        }

        let Some(message) = update.message else {
            return Ok(());
        };
        let chat_id = message.chat.id;

        if let Some(payment) = message.successful_payment {
            let user_id = message.from.map(|u| u.id).unwrap_or(chat_id);
            return self.handle_successful_payment(user_id, payment).await;
        }

        let Some(text) = message.text else {
            return Ok(());
        };

        if text == "/start" || text.starts_with("/start ") {
            return self.handle_start(chat_id, parse_referral_token(&text)).await;
        }

        match text.as_str() {
            "/paysupport" => self.bot.send_message(messages::pay_support(chat_id, &self.support_contact)).await,
            "/stats" => self.handle_stats(chat_id).await,
            "/refund" => self.handle_refund(chat_id).await,
            _ => Ok(()),
        }
    }

    /// 预检不做任何库存/风控检查，第一动作就是批准。
    /// 不批准会让该笔交易在平台侧直接失败。
    async fn handle_pre_checkout(&self, query: PreCheckoutQuery) -> AppResult<()> {
        self.bot.answer_pre_checkout_query(&query.id, true).await
    }

    async fn handle_successful_payment(&self, user_id: i64, payment: SuccessfulPayment) -> AppResult<()> {
        let charge_id = payment.telegram_payment_charge_id;

        // 平台对未应答webhook的重投会造成同一事件重复到达：
        // charge id已有回执即视为重复投递，整体跳过（也不再发确认消息）
        if self.ledger.find_by_charge(charge_id.clone()).await?.is_some() {
            info!("🔁 duplicate successful_payment for charge {}, skipped", charge_id);
            return Ok(());
        }

        let payload: Option<InvoicePayload> = serde_json::from_str(&payment.invoice_payload).ok();
        if payload.is_none() {
            warn!("⚠️ unparsable invoice payload on charge {}", charge_id);
        }
        let package_id = payload.map(|p| p.package_id);

        // 套餐解析不出来也照记回执：钱已经收了，账本必须与平台的
        // 资金记录一致，积分按0记并留下异常日志
        let credits = match package_id.as_deref() {
            Some(id) => match self.packages.find_package(id).await? {
                Some(package) => package.credits,
                None => {
                    warn!("⚠️ unknown package {} on charge {}, crediting 0", id, charge_id);
                    0
                }
            },
            None => 0,
        };

        self.ledger
            .record(charge_id.clone(), user_id, package_id.clone(), credits)
            .await?;
        info!(
            "💳 payment: user={} package={:?} credits={} charge={}",
            user_id, package_id, credits, charge_id
        );

        self.bot
            .send_message(messages::payment_confirmed(user_id, credits, &self.game_url))
            .await
    }

    async fn handle_start(&self, chat_id: i64, referrer: Option<i64>) -> AppResult<()> {
        if let Some(referrer_id) = referrer {
            if self.referral.register(referrer_id, chat_id).await? {
                // 推荐人通知失败不影响后续欢迎消息
                if let Err(e) = self
                    .bot
                    .send_message(messages::referrer_joined(referrer_id, &self.game_url))
                    .await
                {
                    error!("❌ failed to notify referrer {}: {}", referrer_id, e);
                }
            }
        }

        self.bot.send_message(messages::welcome(chat_id, &self.game_url)).await
    }

    async fn handle_stats(&self, chat_id: i64) -> AppResult<()> {
        match self.bot.get_star_transactions(0, 100).await {
            Ok(transactions) => {
                let mut total_in = 0i64;
                let mut total_out = 0i64;
                let mut payment_count = 0usize;

                for tx in &transactions {
                    if tx.amount > 0 {
                        total_in += tx.amount;
                        payment_count += 1;
                    } else {
                        total_out += tx.amount.abs();
                    }
                }
                let net = total_in - total_out;

                self.bot
                    .send_message(messages::stats_report(
                        chat_id,
                        total_in,
                        total_out,
                        net,
                        transactions.len(),
                        payment_count,
                    ))
                    .await
            }
            Err(e) => self.bot.send_message(messages::stats_failed(chat_id, &e.to_string())).await,
        }
    }

    async fn handle_refund(&self, chat_id: i64) -> AppResult<()> {
        let Some(receipt) = self.ledger.find_last_for_user(chat_id).await? else {
            return self.bot.send_message(messages::nothing_to_refund(chat_id)).await;
        };

        match self.bot.refund_star_payment(chat_id, &receipt.charge_id).await {
            Ok(()) => {
                // 回执只在平台确认退款之后删除
                self.ledger.delete(receipt.charge_id.clone()).await?;
                info!(
                    "↩️ refund: user={} charge={} credits={}",
                    chat_id, receipt.charge_id, receipt.credits
                );

                self.bot
                    .send_message(messages::refund_confirmed(chat_id, receipt.credits))
                    .await
            }
            Err(e) => self.bot.send_message(messages::refund_failed(chat_id, &e.to_string())).await,
        }
    }
}

/// 从 "/start ref_<id>" 里取出推荐人ID
///
/// 非正数与非纯数字token一律当作没有token处理。
fn parse_referral_token(text: &str) -> Option<i64> {
    let arg = text.strip_prefix("/start")?.trim();
    let id = arg.strip_prefix("ref_")?;

    id.parse().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        payment::ledger_service::{LedgerService, LedgerServiceTrait},
        referral::referral_service::ReferralService,
    };
    use async_trait::async_trait;
    use database::{referral::repository::ReferralRepositoryTrait, Database};
    use std::sync::{Arc, Mutex};
    use telegram::{BotApiTrait, LabeledPrice, OutgoingMessage, StarTransaction};
    use utils::AppError;

    /// 记录型假Bot：记下所有出站调用，不打网络
    #[derive(Default)]
    struct RecordingBot {
        messages: Mutex<Vec<OutgoingMessage>>,
        approved_queries: Mutex<Vec<String>>,
        refunds: Mutex<Vec<(i64, String)>>,
        invoice_calls: Mutex<usize>,
        fail_refund: bool,
        transactions: Vec<StarTransaction>,
    }

    impl RecordingBot {
        fn sent_texts(&self) -> Vec<String> {
            self.messages.lock().unwrap().iter().map(|m| m.text.clone()).collect()
        }
    }

    #[async_trait]
    impl BotApiTrait for RecordingBot {
        async fn create_invoice_link(
            &self,
            _title: &str,
            _description: &str,
            _payload: &str,
            _currency: &str,
            _prices: Vec<LabeledPrice>,
        ) -> utils::AppResult<String> {
            *self.invoice_calls.lock().unwrap() += 1;
            Ok("https://t.me/$test_invoice".to_string())
        }

        async fn answer_pre_checkout_query(&self, query_id: &str, ok: bool) -> utils::AppResult<()> {
            assert!(ok);
            self.approved_queries.lock().unwrap().push(query_id.to_string());
            Ok(())
        }

        async fn send_message(&self, message: OutgoingMessage) -> utils::AppResult<()> {
            self.messages.lock().unwrap().push(message);
            Ok(())
        }

        async fn get_star_transactions(&self, _offset: u32, _limit: u32) -> utils::AppResult<Vec<StarTransaction>> {
            Ok(self.transactions.clone())
        }

        async fn refund_star_payment(&self, user_id: i64, charge_id: &str) -> utils::AppResult<()> {
            if self.fail_refund {
                return Err(AppError::Upstream("CHARGE_NOT_FOUND".to_string()));
            }
            self.refunds.lock().unwrap().push((user_id, charge_id.to_string()));
            Ok(())
        }
    }

    struct Harness {
        service: WebhookService,
        bot: Arc<RecordingBot>,
        database: Arc<Database>,
        ledger: DynLedgerService,
    }

    fn harness_with_bot(bot: RecordingBot) -> Harness {
        let database = Arc::new(Database::new());
        let bot = Arc::new(bot);
        let ledger = Arc::new(LedgerService::new(database.clone())) as DynLedgerService;
        let referral = Arc::new(ReferralService::new(database.clone())) as DynReferralService;

        let service = WebhookService::new(
            ledger.clone(),
            referral,
            database.clone(),
            bot.clone(),
            "https://game.example/".to_string(),
            "@constrik".to_string(),
        );

        Harness {
            service,
            bot,
            database,
            ledger,
        }
    }

    fn harness() -> Harness {
        harness_with_bot(RecordingBot::default())
    }

    fn payment_update(user_id: i64, charge_id: &str, payload: &str) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "from": {"id": user_id},
                "chat": {"id": user_id},
                "successful_payment": {
                    "currency": "XTR",
                    "total_amount": 50,
                    "invoice_payload": payload,
                    "telegram_payment_charge_id": charge_id
                }
            }
        }))
        .unwrap()
    }

    fn text_update(chat_id: i64, text: &str) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "from": {"id": chat_id},
                "chat": {"id": chat_id},
                "text": text
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_referral_token() {
        assert_eq!(parse_referral_token("/start ref_777"), Some(777));
        assert_eq!(parse_referral_token("/start"), None);
        assert_eq!(parse_referral_token("/start something"), None);
        assert_eq!(parse_referral_token("/start ref_abc"), None);
        assert_eq!(parse_referral_token("/start ref_0"), None);
        assert_eq!(parse_referral_token("/start ref_-5"), None);
    }

    #[tokio::test]
    async fn test_pre_checkout_is_approved() {
        let h = harness();

        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 1,
            "pre_checkout_query": {"id": "pcq_1", "from": {"id": 42}}
        }))
        .unwrap();

        h.service.handle(update).await.unwrap();
        assert_eq!(*h.bot.approved_queries.lock().unwrap(), vec!["pcq_1"]);
    }

    #[tokio::test]
    async fn test_successful_payment_records_receipt_and_confirms() {
        let h = harness();

        let payload = r#"{"userId":42,"packageId":"pack500","createdAt":1}"#;
        h.service.handle(payment_update(42, "ch_1", payload)).await.unwrap();

        let receipt = h.ledger.find_last_for_user(42).await.unwrap().unwrap();
        assert_eq!(receipt.charge_id, "ch_1");
        assert_eq!(receipt.credits, 500);
        assert_eq!(receipt.package_id.as_deref(), Some("pack500"));

        let texts = h.bot.sent_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("500⭐ credits added"));
    }

    #[tokio::test]
    async fn test_duplicate_payment_delivery_is_skipped() {
        let h = harness();

        let payload = r#"{"userId":42,"packageId":"pack500","createdAt":1}"#;
        h.service.handle(payment_update(42, "ch_1", payload)).await.unwrap();
        h.service.handle(payment_update(42, "ch_1", payload)).await.unwrap();

        // 恰好一条回执、恰好一条确认消息
        assert!(h.ledger.find_by_charge("ch_1".to_string()).await.unwrap().is_some());
        assert_eq!(h.bot.sent_texts().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_package_still_records_zero_credit_receipt() {
        let h = harness();

        let payload = r#"{"userId":42,"packageId":"packXXXX","createdAt":1}"#;
        h.service.handle(payment_update(42, "ch_9", payload)).await.unwrap();

        let receipt = h.ledger.find_by_charge("ch_9".to_string()).await.unwrap().unwrap();
        assert_eq!(receipt.credits, 0);
        assert_eq!(receipt.package_id.as_deref(), Some("packXXXX"));
    }

    #[tokio::test]
    async fn test_unparsable_payload_still_records_receipt() {
        let h = harness();

        h.service.handle(payment_update(42, "ch_2", "not json at all")).await.unwrap();

        let receipt = h.ledger.find_by_charge("ch_2".to_string()).await.unwrap().unwrap();
        assert_eq!(receipt.credits, 0);
        assert!(receipt.package_id.is_none());
    }

    #[tokio::test]
    async fn test_start_with_referral_token_scenario() {
        let h = harness();

        h.service.handle(text_update(1001, "/start ref_777")).await.unwrap();

        let edge = h.database.get_edge(1001).await.unwrap().unwrap();
        assert_eq!(edge.referrer_id, 777);
        assert!(!edge.claimed);

        // 推荐人收到通知(发往777)，被推荐人收到欢迎(发往1001)
        let messages = h.bot.messages.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].chat_id, 777);
        assert_eq!(messages[1].chat_id, 1001);
    }

    #[tokio::test]
    async fn test_start_second_referral_token_is_silently_dropped() {
        let h = harness();

        h.service.handle(text_update(1001, "/start ref_777")).await.unwrap();
        h.service.handle(text_update(1001, "/start ref_888")).await.unwrap();

        let edge = h.database.get_edge(1001).await.unwrap().unwrap();
        assert_eq!(edge.referrer_id, 777);

        // 第二次只有欢迎消息，没有新的推荐人通知
        let messages = h.bot.messages.lock().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].chat_id, 1001);
    }

    #[tokio::test]
    async fn test_start_self_referral_sends_only_welcome() {
        let h = harness();

        h.service.handle(text_update(42, "/start ref_42")).await.unwrap();

        assert!(h.database.get_edge(42).await.unwrap().is_none());
        let messages = h.bot.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].chat_id, 42);
    }

    #[tokio::test]
    async fn test_plain_start_sends_welcome() {
        let h = harness();

        h.service.handle(text_update(42, "/start")).await.unwrap();

        let texts = h.bot.sent_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("Bayesian Betting Game"));
    }

    #[tokio::test]
    async fn test_paysupport_replies_with_contact() {
        let h = harness();

        h.service.handle(text_update(42, "/paysupport")).await.unwrap();

        let texts = h.bot.sent_texts();
        assert_eq!(texts, vec!["For payment support, contact @constrik"]);
    }

    #[tokio::test]
    async fn test_unmatched_text_is_ignored() {
        let h = harness();

        h.service.handle(text_update(42, "hello there")).await.unwrap();
        h.service.handle(text_update(42, "/unknown")).await.unwrap();

        assert!(h.bot.sent_texts().is_empty());
    }

    #[tokio::test]
    async fn test_refund_deletes_receipt_then_reports_nothing() {
        let h = harness();

        let payload = r#"{"userId":42,"packageId":"pack500","createdAt":1}"#;
        h.service.handle(payment_update(42, "ch_1", payload)).await.unwrap();

        h.service.handle(text_update(42, "/refund")).await.unwrap();
        assert_eq!(h.bot.refunds.lock().unwrap().as_slice(), &[(42, "ch_1".to_string())]);
        assert!(h.ledger.find_by_charge("ch_1".to_string()).await.unwrap().is_none());

        h.service.handle(text_update(42, "/refund")).await.unwrap();

        let texts = h.bot.sent_texts();
        assert!(texts[1].contains("Refunded 500⭐ pack"));
        assert_eq!(texts[2], "No recent payment found to refund.");
    }

    #[tokio::test]
    async fn test_refund_failure_keeps_receipt_and_reports_description() {
        let h = harness_with_bot(RecordingBot {
            fail_refund: true,
            ..Default::default()
        });

        let payload = r#"{"userId":42,"packageId":"pack500","createdAt":1}"#;
        h.service.handle(payment_update(42, "ch_1", payload)).await.unwrap();
        h.service.handle(text_update(42, "/refund")).await.unwrap();

        assert!(h.ledger.find_by_charge("ch_1".to_string()).await.unwrap().is_some());
        let texts = h.bot.sent_texts();
        assert!(texts[1].contains("Refund failed: CHARGE_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_refund_targets_latest_purchase() {
        let h = harness();

        let p500 = r#"{"userId":42,"packageId":"pack500","createdAt":1}"#;
        let p1500 = r#"{"userId":42,"packageId":"pack1500","createdAt":2}"#;
        h.service.handle(payment_update(42, "ch_1", p500)).await.unwrap();
        h.service.handle(payment_update(42, "ch_2", p1500)).await.unwrap();

        h.service.handle(text_update(42, "/refund")).await.unwrap();

        assert_eq!(h.bot.refunds.lock().unwrap().as_slice(), &[(42, "ch_2".to_string())]);
        assert!(h.ledger.find_by_charge("ch_1".to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stats_aggregates_transactions() {
        let h = harness_with_bot(RecordingBot {
            transactions: vec![
                StarTransaction { id: None, amount: 50, date: None },
                StarTransaction { id: None, amount: 100, date: None },
                StarTransaction { id: None, amount: -50, date: None },
            ],
            ..Default::default()
        });

        h.service.handle(text_update(42, "/stats")).await.unwrap();

        let texts = h.bot.sent_texts();
        assert!(texts[0].contains("Total earned: 150 Stars"));
        assert!(texts[0].contains("Refunded: 50 Stars"));
        assert!(texts[0].contains("Net revenue: 100 Stars"));
        assert!(texts[0].contains("Transactions: 3 \\(2 payments\\)"));
    }

    #[tokio::test]
    async fn test_unknown_update_shape_is_ignored() {
        let h = harness();

        h.service.handle(Update::default()).await.unwrap();

        assert!(h.bot.sent_texts().is_empty());
    }
}
