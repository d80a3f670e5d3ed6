//! Invocation boundary: classify, run the command, log the outcome once.
//!
//! Each event is its own task. Errors and panics stay inside that task; nothing is shared between
//! invocations except the read-only client handle and settings.

use figbot_core::{DelaySampler, InboundEvent, MessagingClient};
use std::future::ready;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::choreography::{ChoreographyError, Choreographer, Reply, Settle};
use crate::commands::{nothing_quoted_text, not_an_image_text, ping_text, StickerPipeline};
use crate::route::{classify, Route};
use crate::settings::BotSettings;

pub struct Dispatcher {
    choreographer: Choreographer,
    pipeline: StickerPipeline,
    ping_settle: Duration,
}

impl Dispatcher {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        delay: Arc<dyn DelaySampler>,
        settings: BotSettings,
    ) -> Self {
        Self {
            choreographer: Choreographer::new(client.clone(), delay, settings.timing),
            pipeline: StickerPipeline::new(client, settings.transcode, settings.metadata),
            ping_settle: settings.timing.ping_settle,
        }
    }

    /// Classifies the event and runs the matching command. Returns the route taken.
    #[instrument(skip_all, fields(chat = %event.chat, sender = %event.sender, message_id = %event.id))]
    pub async fn dispatch(&self, event: &InboundEvent) -> Result<Route, ChoreographyError> {
        let route = classify(event);
        match &route {
            Route::Idle => {
                debug!("No command, ignoring");
                return Ok(route);
            }
            Route::Ping => {
                self.choreographer
                    .perform(
                        event,
                        Settle::Fixed(self.ping_settle),
                        ready(Ok(Reply::Timed {
                            render: ping_text,
                            quote: false,
                        })),
                    )
                    .await?;
            }
            Route::FigWithImage(media) => {
                info!(mimetype = %media.mimetype, "Quoted image found");
                self.choreographer
                    .perform(event, Settle::Sampled, async {
                        self.pipeline.run(media).await.map(Reply::Sticker)
                    })
                    .await?;
            }
            Route::FigWithoutImage => {
                self.choreographer
                    .perform(
                        event,
                        Settle::Sampled,
                        ready(Ok(Reply::Timed {
                            render: not_an_image_text,
                            quote: true,
                        })),
                    )
                    .await?;
            }
            Route::FigNoQuote => {
                self.choreographer
                    .perform(
                        event,
                        Settle::Sampled,
                        ready(Ok(Reply::Timed {
                            render: nothing_quoted_text,
                            quote: true,
                        })),
                    )
                    .await?;
            }
        }
        Ok(route)
    }

    /// Runs [`Self::dispatch`] in its own task and logs the outcome. A panic inside the invocation is
    /// caught here and logged; the returned handle never carries it.
    pub fn spawn(self: &Arc<Self>, event: InboundEvent) -> JoinHandle<()> {
        let dispatcher = Arc::clone(self);
        let message_id = event.id.clone();
        let chat = event.chat.to_string();

        let invocation = tokio::spawn(async move { dispatcher.dispatch(&event).await });

        tokio::spawn(async move {
            match invocation.await {
                Ok(Ok(Route::Idle)) => {}
                Ok(Ok(route)) => {
                    info!(chat = %chat, message_id = %message_id, route = route.name(), "Invocation finished");
                }
                Ok(Err(e)) => {
                    error!(
                        chat = %chat,
                        message_id = %message_id,
                        stage = ?e.stage,
                        error = %e.source,
                        "Invocation aborted"
                    );
                }
                Err(e) if e.is_panic() => {
                    error!(chat = %chat, message_id = %message_id, "Invocation panicked");
                }
                Err(e) => {
                    warn!(chat = %chat, message_id = %message_id, error = %e, "Invocation cancelled");
                }
            }
        })
    }
}
