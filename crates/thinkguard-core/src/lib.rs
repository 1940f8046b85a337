//! `thinkguard-core` keeps outbound conversations valid for models that
//! require every assistant turn to open with a thinking block.
//!
//! ```text
//! Conversation (from the caller)
//!     │
//!     ▼
//! Enforcer::enforce
//!     ├─ oracle     does the active model enforce the rule?
//!     ├─ invariant  which assistant turns violate it?
//!     ├─ search     earlier reasoning to reuse
//!     └─ repair     prepend a synthetic thinking part
//!     │
//!     ▼
//! Conversation (repaired in place, ready to send)
//! ```

pub mod config;
pub mod conversation;
pub mod enforce;
pub mod error;
pub mod invariant;
pub mod io;
pub mod oracle;
pub mod paths;
pub mod payload;
pub mod repair;
pub mod search;

pub use conversation::{ContentPart, Conversation, Message, Role, ThinkingPart, Turn};
pub use enforce::{enforce, EnforceReport, Enforcer, PlannedRepair};
pub use error::{GuardError, Result};
pub use oracle::{is_enforcing_model, ModelRegistry};
pub use payload::Payload;
