//! Command classification and quoted-context resolution. Pure inspection, no I/O.

use figbot_core::{InboundEvent, MediaRef, QuotedContext, QuotedPayload};

use crate::commands::{FIG_COMMAND, PING_COMMAND};

/// What the replied-to message is, as far as `/fig` cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteResolution {
    IsImage { media: MediaRef, mimetype: String },
    IsOtherMedia,
    NoQuote,
}

/// Resolves the quotation of an event. A context without a stanza id quotes nothing.
pub fn resolve_quote(quoted: Option<&QuotedContext>) -> QuoteResolution {
    match quoted {
        Some(ctx) if !ctx.stanza_id.is_empty() => match &ctx.payload {
            Some(QuotedPayload::Image(media)) => QuoteResolution::IsImage {
                media: media.clone(),
                mimetype: media.mimetype.clone(),
            },
            _ => QuoteResolution::IsOtherMedia,
        },
        _ => QuoteResolution::NoQuote,
    }
}

/// Dispatch decision for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Idle,
    Ping,
    FigWithImage(MediaRef),
    FigWithoutImage,
    FigNoQuote,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Idle => "idle",
            Route::Ping => "ping",
            Route::FigWithImage(_) => "fig_with_image",
            Route::FigWithoutImage => "fig_without_image",
            Route::FigNoQuote => "fig_no_quote",
        }
    }
}

/// Exact, case-sensitive text match first, then the group gate, then the quotation shape.
/// `/fig` outside a group is ignored.
pub fn classify(event: &InboundEvent) -> Route {
    match event.text.as_deref() {
        Some(PING_COMMAND) => Route::Ping,
        Some(FIG_COMMAND) if event.is_group => match resolve_quote(event.quoted.as_ref()) {
            QuoteResolution::IsImage { media, .. } => Route::FigWithImage(media),
            QuoteResolution::IsOtherMedia => Route::FigWithoutImage,
            QuoteResolution::NoQuote => Route::FigNoQuote,
        },
        _ => Route::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use figbot_core::Jid;

    fn media() -> MediaRef {
        MediaRef {
            direct_path: "/v/t62.7118-24/abc".to_string(),
            url: None,
            media_key: vec![1; 32],
            file_sha256: vec![2; 32],
            file_enc_sha256: vec![3; 32],
            file_length: 1234,
            mimetype: "image/jpeg".to_string(),
        }
    }

    fn event(text: Option<&str>, is_group: bool, quoted: Option<QuotedContext>) -> InboundEvent {
        InboundEvent {
            id: "3EB0".to_string(),
            sender: Jid::new("5511", "s.whatsapp.net"),
            chat: if is_group {
                Jid::new("120363", "g.us")
            } else {
                Jid::new("5511", "s.whatsapp.net")
            },
            is_group,
            timestamp: Utc::now(),
            text: text.map(str::to_string),
            quoted,
        }
    }

    fn quote(stanza_id: &str, payload: Option<QuotedPayload>) -> Option<QuotedContext> {
        Some(QuotedContext {
            stanza_id: stanza_id.to_string(),
            participant: Some(Jid::new("5522", "s.whatsapp.net")),
            payload,
        })
    }

    #[test]
    fn test_resolve_quote() {
        assert_eq!(resolve_quote(None), QuoteResolution::NoQuote);
        assert_eq!(
            resolve_quote(quote("", Some(QuotedPayload::Image(media()))).as_ref()),
            QuoteResolution::NoQuote
        );
        assert_eq!(
            resolve_quote(quote("ABCD", Some(QuotedPayload::Image(media()))).as_ref()),
            QuoteResolution::IsImage {
                media: media(),
                mimetype: "image/jpeg".to_string()
            }
        );
        assert_eq!(
            resolve_quote(quote("ABCD", Some(QuotedPayload::Text("hi".to_string()))).as_ref()),
            QuoteResolution::IsOtherMedia
        );
        assert_eq!(
            resolve_quote(
                quote(
                    "ABCD",
                    Some(QuotedPayload::OtherMedia {
                        kind: "video".to_string()
                    })
                )
                .as_ref()
            ),
            QuoteResolution::IsOtherMedia
        );
        assert_eq!(
            resolve_quote(quote("ABCD", None).as_ref()),
            QuoteResolution::IsOtherMedia
        );
    }

    #[test]
    fn test_classify_ping_anywhere() {
        assert_eq!(classify(&event(Some("/ping"), false, None)), Route::Ping);
        assert_eq!(classify(&event(Some("/ping"), true, None)), Route::Ping);
    }

    #[test]
    fn test_classify_is_exact_and_case_sensitive() {
        for text in ["/Ping", "/PING", " /ping", "/ping ", "/fig2", "/FIG", "ping", "", "hello"] {
            assert_eq!(classify(&event(Some(text), true, None)), Route::Idle, "{:?}", text);
        }
        assert_eq!(classify(&event(None, true, None)), Route::Idle);
    }

    #[test]
    fn test_classify_fig_requires_group() {
        let quoted = quote("ABCD", Some(QuotedPayload::Image(media())));
        assert_eq!(classify(&event(Some("/fig"), false, quoted)), Route::Idle);
    }

    #[test]
    fn test_classify_fig_variants() {
        assert_eq!(
            classify(&event(
                Some("/fig"),
                true,
                quote("ABCD", Some(QuotedPayload::Image(media())))
            )),
            Route::FigWithImage(media())
        );
        assert_eq!(
            classify(&event(
                Some("/fig"),
                true,
                quote("ABCD", Some(QuotedPayload::Text("x".to_string())))
            )),
            Route::FigWithoutImage
        );
        assert_eq!(
            classify(&event(Some("/fig"), true, None)),
            Route::FigNoQuote
        );
    }
}
