pub mod fallback;
pub mod logging;
pub mod text;

pub use fallback::best_effort;
pub use logging::{init_tracing, LogGuard};
pub use text::{snippet, SNIPPET_LIMIT};
