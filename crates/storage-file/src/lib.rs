//! Flat-file storage implementation for Ratecast.
//!
//! This crate implements the repository traits defined in `ratecast-core` on
//! top of plain text files in a data directory:
//! - [`FileDb`]: line-oriented append/read over files under a base directory
//! - [`SubscriberRepository`]: one subscriber email per line
//!
//! ```text
//!        core (domain)
//!             │
//!             ▼
//!  storage-file (this crate)
//!             │
//!             ▼
//!     {data_dir}/emails.txt
//! ```

pub mod db;
pub mod errors;
pub mod subscribers;

pub use db::FileDb;
pub use errors::StorageError;
pub use subscribers::SubscriberRepository;

// Re-export from ratecast-core for convenience
pub use ratecast_core::errors::{Error, Result};
