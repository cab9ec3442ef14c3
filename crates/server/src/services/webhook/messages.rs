//! 发给用户的消息文案与内联键盘
//!
//! MarkdownV2文本里的转义是平台要求的，改动前先过一遍
//! https://core.telegram.org/bots/api#markdownv2-style

use telegram::OutgoingMessage;

/// /start 的欢迎语，带打开游戏的按钮
pub fn welcome(chat_id: i64, game_url: &str) -> OutgoingMessage {
    OutgoingMessage::markdown_v2(
        chat_id,
        "🧬 *sus\\.genes* — Bayesian Betting Game\n\n\
         Observe 8 entities on a grid\\. Each has hidden genes: Aggression, Herding, Greed\\.\n\
         Watch their behavior, deduce the genotype, place your bets\\.\n\n\
         🎯 Early bets pay ×5, late bets ×1\\.25\\.\nCan you read the genes?",
    )
    .with_web_app_button("🎮 Play Now", game_url)
}

/// 支付成功确认
pub fn payment_confirmed(chat_id: i64, credits: u64, game_url: &str) -> OutgoingMessage {
    OutgoingMessage::markdown_v2(
        chat_id,
        format!(
            "✅ Payment successful\\!\n\n\\+{}⭐ credits added\\.\nOpen the game to see your updated balance\\.",
            credits
        ),
    )
    .with_web_app_button("🎮 Play Now", game_url)
}

/// 通知推荐人：有朋友通过链接加入了
pub fn referrer_joined(referrer_id: i64, game_url: &str) -> OutgoingMessage {
    OutgoingMessage::markdown_v2(
        referrer_id,
        "🎉 A friend joined via your link\\!\nOpen the game to claim your \\+100⭐ bonus\\.",
    )
    .with_web_app_button("🎮 Claim Bonus", game_url)
}

/// /paysupport 的固定回复
pub fn pay_support(chat_id: i64, contact: &str) -> OutgoingMessage {
    OutgoingMessage::text(chat_id, format!("For payment support, contact {}", contact))
}

/// /stats 的汇总报表
pub fn stats_report(
    chat_id: i64,
    total_in: i64,
    total_out: i64,
    net: i64,
    tx_count: usize,
    payment_count: usize,
) -> OutgoingMessage {
    OutgoingMessage::markdown_v2(
        chat_id,
        format!(
            "📊 *sus\\.genes — Bot Stats*\n\n\
             💰 Total earned: {} Stars\n\
             ↩️ Refunded: {} Stars\n\
             📈 Net revenue: {} Stars\n\
             🧾 Transactions: {} \\({} payments\\)",
            total_in, total_out, net, tx_count, payment_count
        ),
    )
}

pub fn stats_failed(chat_id: i64, description: &str) -> OutgoingMessage {
    OutgoingMessage::text(chat_id, format!("❌ Failed to get stats: {}", description))
}

/// 退款成功确认
pub fn refund_confirmed(chat_id: i64, credits: u64) -> OutgoingMessage {
    OutgoingMessage::text(
        chat_id,
        format!("✅ Refunded {}⭐ pack. Stars returned to your account.", credits),
    )
}

pub fn refund_failed(chat_id: i64, description: &str) -> OutgoingMessage {
    OutgoingMessage::text(chat_id, format!("❌ Refund failed: {}", description))
}

pub fn nothing_to_refund(chat_id: i64) -> OutgoingMessage {
    OutgoingMessage::text(chat_id, "No recent payment found to refund.")
}
