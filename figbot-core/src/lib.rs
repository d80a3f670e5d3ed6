//! # figbot-core
//!
//! Core types and traits for the sticker bot: [`MessagingClient`], inbound/outbound message types,
//! [`DelaySampler`], the error taxonomy and tracing initialization. Transport-agnostic; used by
//! sticker, dispatcher and figbot-bridge.

pub mod client;
pub mod delay;
pub mod error;
pub mod logger;
pub mod types;

pub use client::MessagingClient;
pub use delay::{DelaySampler, FixedDelay, RandomDelay, SeededDelay};
pub use error::{FigbotError, Result};
pub use logger::init_tracing;
pub use types::{
    ChatPresence, ChatPresenceMedia, InboundEvent, Jid, MediaKind, MediaRef, OutboundMessage, OutboundPayload,
    Presence, QuoteRef, QuotedContext, QuotedPayload, SendReceipt, StickerPayload, ToCoreEvent,
    UploadReceipt,
};
