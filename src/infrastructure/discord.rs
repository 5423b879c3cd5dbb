//! Discord webhook notifier - announces stored rolls in a channel

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::application::ports::outbound::{NotificationError, NotificationPort};
use crate::domain::entities::RollRecord;
use crate::domain::value_objects::{Modifier, RollOutcome};

const BOT_NAME: &str = "Blackbirds Roller";
const AVATAR_URL: &str = "https://api.dicebear.com/6.x/bottts-neutral/png?seed=Angel";
const ANONYMOUS_ROLLER: &str = "Someone";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const YES_SUCCESS: &str = ":white_check_mark:";
const YES_BOOM: &str = ":boom:";
const YES_SKULL: &str = ":skull:";
const NO: &str = ":no_entry:";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub author: EmbedAuthor,
    pub title: String,
    pub url: String,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            inline: true,
        }
    }

    fn block(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            inline: false,
        }
    }

    /// Empty full-width field that breaks an inline row
    fn spacer() -> Self {
        Self::block("\u{200b}", "\u{200b}")
    }
}

fn flag(set: bool, yes: &str) -> &str {
    if set {
        yes
    } else {
        NO
    }
}

fn roll_fields(record: &RollRecord) -> Vec<EmbedField> {
    let die = record.payload.die;
    match &record.payload.output {
        RollOutcome::Percentile(outcome) => vec![
            EmbedField::inline("Target", outcome.target),
            EmbedField::inline("Result", outcome.parsed_value),
            EmbedField::inline("Success?", flag(outcome.is_success, YES_SUCCESS)),
            EmbedField::spacer(),
            EmbedField::inline("Critical?", flag(outcome.is_critical, YES_BOOM)),
            EmbedField::inline("Sublime?", flag(outcome.is_sublime, YES_SKULL)),
        ],
        RollOutcome::Additive(outcome) => vec![
            EmbedField::inline("Die", die),
            EmbedField::inline("Num. Dice", outcome.rolls.len()),
            EmbedField::inline("Modifier", modifier_text(outcome.modifier.as_ref())),
            EmbedField::inline("Total", outcome.total),
        ],
        RollOutcome::Exploding(outcome) => vec![
            EmbedField::inline("Die", die),
            EmbedField::inline("Num. Dice", outcome.rolls.len()),
            EmbedField::inline("Modifier", modifier_text(outcome.modifier.as_ref())),
            EmbedField::inline("Total", outcome.total),
            EmbedField::block("Exploded?", flag(outcome.exploded(), YES_BOOM)),
        ],
    }
}

fn modifier_text(modifier: Option<&Modifier>) -> String {
    modifier
        .map(|modifier| modifier.to_string())
        .unwrap_or_else(|| "0".to_string())
}

/// Build the webhook message announcing a stored roll
pub fn build_roll_message(
    record: &RollRecord,
    channel_id: Option<&str>,
    link_base_url: &str,
) -> WebhookMessage {
    let roller = record
        .payload
        .notes
        .roller_name()
        .unwrap_or(ANONYMOUS_ROLLER)
        .to_string();

    WebhookMessage {
        username: BOT_NAME.to_string(),
        avatar_url: AVATAR_URL.to_string(),
        content: format!("{} made a roll!", roller),
        channel_id: channel_id.map(str::to_string),
        embeds: vec![Embed {
            author: EmbedAuthor {
                name: roller,
                icon_url: AVATAR_URL.to_string(),
            },
            title: record.payload.die.label().to_string(),
            url: format!("{}?id={}", link_base_url, record.id),
            fields: roll_fields(record),
        }],
    }
}

/// Posts roll announcements to a Discord webhook
pub struct DiscordNotifier {
    client: Client,
    webhook_url: Option<String>,
    channel_id: Option<String>,
    link_base_url: String,
}

impl DiscordNotifier {
    pub fn new(
        webhook_url: Option<String>,
        channel_id: Option<String>,
        link_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            webhook_url,
            channel_id,
            link_base_url: link_base_url.into(),
        }
    }
}

#[async_trait]
impl NotificationPort for DiscordNotifier {
    async fn notify_roll(&self, record: &RollRecord) -> Result<(), NotificationError> {
        let Some(webhook_url) = self.webhook_url.as_deref() else {
            debug!(record_id = %record.id, "No webhook configured, skipping roll notification");
            return Ok(());
        };

        let message = build_roll_message(record, self.channel_id.as_deref(), &self.link_base_url);

        let response = self
            .client
            .post(webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected { status, body });
        }

        debug!(record_id = %record.id, "Roll notification sent");
        Ok(())
    }
}
