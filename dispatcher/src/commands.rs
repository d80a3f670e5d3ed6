//! The two commands: reply texts and the `/fig` sticker pipeline.

use figbot_core::{FigbotError, MediaKind, MediaRef, MessagingClient, StickerPayload};
use std::sync::Arc;
use sticker::{
    embed_metadata, transcode, StickerError, StickerMetadata, TranscodeOptions, WEBP_MIME,
};
use tracing::{info, instrument};

pub const PING_COMMAND: &str = "/ping";
pub const FIG_COMMAND: &str = "/fig";

pub(crate) fn ping_text(elapsed_ms: u64) -> String {
    format!("Pong! Tempo de resposta: {}ms", elapsed_ms)
}

pub(crate) fn not_an_image_text(elapsed_ms: u64) -> String {
    format!(
        "> A mensagem respondida não é uma imagem!\r\n\r\nTempo de execução: {}ms",
        elapsed_ms
    )
}

pub(crate) fn nothing_quoted_text(elapsed_ms: u64) -> String {
    format!(
        "> É necessário responder a imagem que deseja transformar em figurinha!\r\n\r\nTempo de execução: {}ms",
        elapsed_ms
    )
}

/// Download → transcode → embed metadata → upload. Strictly sequential; the first error ends it.
#[derive(Clone)]
pub struct StickerPipeline {
    client: Arc<dyn MessagingClient>,
    options: TranscodeOptions,
    metadata: StickerMetadata,
}

impl StickerPipeline {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        options: TranscodeOptions,
        metadata: StickerMetadata,
    ) -> Self {
        Self {
            client,
            options,
            metadata,
        }
    }

    /// Produces an uploaded sticker from a quoted image. Image work runs on the blocking pool.
    #[instrument(skip_all, fields(mimetype = %media.mimetype, file_length = media.file_length))]
    pub async fn run(&self, media: &MediaRef) -> figbot_core::Result<StickerPayload> {
        let raw = self.client.download(media).await?;
        info!(bytes = raw.len(), "step: quoted image downloaded");

        let options = self.options;
        let metadata = self.metadata.clone();
        let (webp, tagged) = tokio::task::spawn_blocking(move || {
            let webp = transcode(&raw, &options)?;
            let tagged = embed_metadata(&webp.data, &metadata)?;
            Ok::<_, StickerError>((webp, tagged))
        })
        .await
        .map_err(|e| FigbotError::Encode(format!("sticker task failed: {}", e)))??;
        info!(
            width = webp.width,
            height = webp.height,
            bytes = tagged.len(),
            "step: sticker encoded"
        );

        let upload = self.client.upload(&tagged, MediaKind::Image).await?;
        info!(file_length = upload.file_length, "step: sticker uploaded");

        Ok(StickerPayload {
            upload,
            mimetype: WEBP_MIME.to_string(),
            width: webp.width,
            height: webp.height,
            thumbnail: webp.data,
        })
    }
}
