//! Read-only access to a news vault laid out as
//! `root/YYYY/MM/DD/<category>/<title>.md`.
//!
//! All queries hang off [`Vault`]: the date index, category and article
//! listings, random sampling, fuzzy path search and plain reads. Nothing is
//! cached; every call rescans the directories it needs.

pub mod category;
pub mod date;
pub mod error;
pub mod fs;
pub mod index;
pub mod listing;
pub mod reader;
pub mod resolver;
pub mod sampler;
pub mod search;
pub mod vault;

pub use category::Category;
pub use date::{DatePath, DateScope};
pub use error::{ArchiveError, Result};
pub use fs::{DiskFs, MemoryFs, VaultFs};
pub use index::DateIndexEntry;
pub use listing::ArticleRef;
pub use reader::{ArticleContent, TOMBSTONE_SENTINEL, is_tombstone};
pub use resolver::resolve_date;
pub use sampler::{DEFAULT_MAX_RETRIES, SampleOptions};
pub use search::{DEFAULT_SEARCH_CUTOFF, DEFAULT_SEARCH_LIMIT, SearchQuery};
pub use vault::Vault;

pub use newsvault_config::DateSelection;
