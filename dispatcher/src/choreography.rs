//! Presence choreography: the fixed, fail-fast sequence every command reply goes through.
//!
//! `Start → MarkedRead → PresenceAvailable → Composing → (work + think delay) → Sent → Paused →
//! (settle) → PresenceUnavailable → Done`. The first failing step ends the invocation; later steps
//! never run.

use chrono::Utc;
use figbot_core::{
    ChatPresence, ChatPresenceMedia, DelaySampler, FigbotError, InboundEvent, MessagingClient,
    OutboundMessage, OutboundPayload, Presence, SendReceipt, StickerPayload,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument};

use crate::settings::Timing;

/// Last stage reached by a choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    MarkedRead,
    PresenceAvailable,
    Composing,
    Sent,
    Paused,
    PresenceUnavailable,
    Done,
}

/// A choreography stopped early. `stage` is the last stage completed before `source` happened.
#[derive(Error, Debug)]
#[error("choreography aborted after {stage:?}: {source}")]
pub struct ChoreographyError {
    pub stage: Stage,
    #[source]
    pub source: FigbotError,
}

fn aborted_at(stage: Stage) -> impl FnOnce(FigbotError) -> ChoreographyError {
    move |source| ChoreographyError { stage, source }
}

/// Pause between `paused` and `unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Fixed(Duration),
    /// Another think delay from the sampler.
    Sampled,
}

/// What the work slot produces.
pub enum Reply {
    /// Text rendered with the elapsed milliseconds at send time.
    Timed {
        render: fn(u64) -> String,
        quote: bool,
    },
    /// Uploaded sticker; always quotes the command message.
    Sticker(StickerPayload),
}

impl Reply {
    fn into_message(self, event: &InboundEvent, elapsed_ms: u64) -> OutboundMessage {
        let chat = event.chat.without_device();
        match self {
            Reply::Timed { render, quote } => OutboundMessage {
                chat,
                payload: OutboundPayload::Text(render(elapsed_ms)),
                quote: quote.then(|| event.quote_ref()),
            },
            Reply::Sticker(sticker) => OutboundMessage {
                chat,
                payload: OutboundPayload::Sticker(sticker),
                quote: Some(event.quote_ref()),
            },
        }
    }
}

/// Whole milliseconds, rounded to nearest.
fn rounded_millis(elapsed: Duration) -> u64 {
    u64::try_from((elapsed.as_micros() + 500) / 1000).unwrap_or(u64::MAX)
}

/// Runs the choreography against a client. Holds no per-invocation state; share it freely.
#[derive(Clone)]
pub struct Choreographer {
    client: Arc<dyn MessagingClient>,
    delay: Arc<dyn DelaySampler>,
    timing: Timing,
}

impl Choreographer {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        delay: Arc<dyn DelaySampler>,
        timing: Timing,
    ) -> Self {
        Self {
            client,
            delay,
            timing,
        }
    }

    fn think(&self) -> Duration {
        self.delay.sample(self.timing.think_min, self.timing.think_max)
    }

    /// Runs every step for `event`. `work` is awaited while "composing"; the composing phase lasts
    /// at least one sampled think delay, however quickly `work` finishes.
    #[instrument(skip_all, fields(chat = %event.chat, message_id = %event.id))]
    pub async fn perform<W>(
        &self,
        event: &InboundEvent,
        settle: Settle,
        work: W,
    ) -> Result<SendReceipt, ChoreographyError>
    where
        W: Future<Output = figbot_core::Result<Reply>>,
    {
        let started = Instant::now();
        let sender = event.sender.without_device();

        self.client
            .mark_read(
                std::slice::from_ref(&event.id),
                Utc::now(),
                &event.chat,
                &sender,
            )
            .await
            .map_err(aborted_at(Stage::Start))?;
        debug!(stage = ?Stage::MarkedRead, "step: marked read");

        self.client
            .send_presence(Presence::Available)
            .await
            .map_err(aborted_at(Stage::MarkedRead))?;
        debug!(stage = ?Stage::PresenceAvailable, "step: presence available");

        self.client
            .send_chat_presence(&event.chat, ChatPresence::Composing, ChatPresenceMedia::Text)
            .await
            .map_err(aborted_at(Stage::PresenceAvailable))?;
        debug!(stage = ?Stage::Composing, "step: composing");

        let think = self.think();
        let work_started = Instant::now();
        let reply = work.await.map_err(aborted_at(Stage::Composing))?;
        let worked = work_started.elapsed();
        sleep(think.saturating_sub(worked)).await;
        debug!(think_ms = think.as_millis() as u64, work_ms = worked.as_millis() as u64, "step: think done");

        let elapsed_ms = rounded_millis(started.elapsed());
        let message = reply.into_message(event, elapsed_ms);
        let receipt = self
            .client
            .send_message(&message)
            .await
            .map_err(aborted_at(Stage::Composing))?;
        info!(
            stage = ?Stage::Sent,
            receipt_id = %receipt.id,
            elapsed_ms,
            "step: reply sent"
        );

        self.client
            .send_chat_presence(&event.chat, ChatPresence::Paused, ChatPresenceMedia::Text)
            .await
            .map_err(aborted_at(Stage::Sent))?;
        debug!(stage = ?Stage::Paused, "step: paused");

        let pause = match settle {
            Settle::Fixed(pause) => pause,
            Settle::Sampled => self.think(),
        };
        sleep(pause).await;

        self.client
            .send_presence(Presence::Unavailable)
            .await
            .map_err(aborted_at(Stage::Paused))?;
        debug!(stage = ?Stage::PresenceUnavailable, "step: presence unavailable");

        debug!(stage = ?Stage::Done, total_ms = rounded_millis(started.elapsed()), "step: choreography done");
        Ok(receipt)
    }
}
