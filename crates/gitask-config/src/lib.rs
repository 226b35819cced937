pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigLoader};
pub use schema::*;
