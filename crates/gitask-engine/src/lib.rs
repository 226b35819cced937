//! Question answering over a user's GitHub account.
//!
//! A question is classified into an [`Intent`] by a completion model, the
//! intent is executed against the GitHub API, and the factual answer is
//! optionally reworded before being returned.

pub mod ask;
pub mod classifier;
pub mod error;
pub mod executor;
pub mod intent;
pub mod polish;

#[cfg(test)]
mod testing;

pub use ask::{AskRequest, AskResponse, AskService};
pub use classifier::IntentClassifier;
pub use error::{AskError, EngineError, EngineResult};
pub use executor::{
    count_lines, paginate_count, ActionExecutor, HELP_MESSAGE, MAX_PAGES, PAGE_SIZE,
};
pub use intent::{Intent, RawIntent};
pub use polish::AnswerPolisher;
