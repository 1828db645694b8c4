//! Persistence surface for Signet
//!
//! The engine only ever talks to two traits: [`DocumentStore`] for the
//! durable records (users, documents, recipients, audit entries,
//! templates) and [`FileStore`] for PDF blobs. Every store call is a
//! potential suspension point; there are no in-process locks spanning
//! calls, so each mutating engine operation is a single read-modify-write
//! against one record.
//!
//! The in-memory backends here back the test suite and double as the
//! reference semantics for real backends: per-record atomicity, a unique
//! index on recipient access tokens, and append-only audit entries.

#![deny(unsafe_code)]

mod files;
mod memory;
mod traits;

pub use files::*;
pub use memory::*;
pub use traits::*;
