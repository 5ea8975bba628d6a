//! aight-core: entity relevance matching for the configuration assistant.
//! Pure functions over an in-memory snapshot of device records: autocomplete,
//! prompt-wide detection, chat-mode domain filtering and intent heuristics.
//! No IO, no async, no logging.

pub mod autocomplete;
pub mod conversation;
pub mod detect;
pub mod domains;
pub mod intent;
pub mod keywords;
pub mod snapshot;
pub mod types;

pub use autocomplete::{Suggestion, apply_suggestion, suggest};
pub use conversation::ConversationContext;
pub use detect::detect_entities;
pub use domains::{detect_relevant_domains, relevant_entities};
pub use intent::{detect_config_type, is_refinement_request, is_reload_command};
pub use snapshot::{EntityCatalog, parse_snapshot, records_from_states};
pub use types::{AightError, ConfigType, Confirmation, DeviceRecord, MatchCandidate};
