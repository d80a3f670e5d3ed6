//! # dispatcher
//!
//! Routes each inbound event to one of the two commands and runs it through the presence
//! choreography: mark read → available → composing → work → send → paused → settle → unavailable.
//! Any failing step aborts the rest of that invocation only.

pub mod choreography;
pub mod commands;
pub mod invocation;
pub mod route;
pub mod settings;

pub use choreography::{ChoreographyError, Choreographer, Reply, Settle, Stage};
pub use commands::{StickerPipeline, FIG_COMMAND, PING_COMMAND};
pub use invocation::Dispatcher;
pub use route::{classify, resolve_quote, QuoteResolution, Route};
pub use settings::{parse_size, BotSettings, Timing};
