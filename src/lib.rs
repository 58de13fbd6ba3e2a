//! Slack private-conversation exporter library
//!
//! Slack's official bulk export only covers public channels. This library
//! downloads the calling user's complete private history instead:
//! - direct messages (IMs) and group direct messages (MPIMs)
//! - complete per-conversation history via backwards cursor pagination
//! - per-kind manifests and a reconciled list of every user encountered
//!
//! Everything is written to a run-scoped directory as indented UTF-8 JSON,
//! with message objects preserved verbatim.

pub mod api;
pub mod error;
pub mod export;
pub mod history;
pub mod pacing;
pub mod users;

// Re-export common types
pub use api::{
    AuthInfo, ConversationKind, DirectMessage, GroupDirectMessage, HistoryPage, RosterMember,
    SlackClient,
};
pub use error::{Error, Result};
pub use export::{ConversationExporter, ExportOptions, GROUP_DM_PREFIX};
pub use history::{fetch_history, DEFAULT_PAGE_SIZE};
pub use pacing::{FixedDelay, NoDelay, Pacer, DEFAULT_DELAY};
pub use users::{build_id_name_map, display_name, resolve_encountered, EncounteredUsers};
