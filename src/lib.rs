pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use config::Config;
pub use error::SearchError;
pub use record::{Category, DocRecord, Field};
pub use search::{SearchIndex, SearchOptions, SearchResult};
pub use server::DocSearchServer;
pub use state::IndexState;
