//! Domain types for Signet
//!
//! Signet models a multi-party e-signature workflow: a **Document** carries
//! a PDF reference, a field layout, and a lifecycle status; **Recipients**
//! are invited by bearer token and progress through their own signing
//! states; every lifecycle event lands in an append-only **audit trail**.
//!
//! # Key Concepts
//!
//! - **Document**: one signable unit, moving `draft → sent → viewed →
//!   signed` with `expired` and `voided` as side exits.
//! - **Field**: a placeable input (signature, date, text, initials,
//!   checkbox) bound to a party by *positional* slot, not by id.
//! - **Recipient**: a signer or carbon-copy observer; the access token in
//!   their possession is the entire authorization boundary.
//! - **AuditEntry**: an immutable timestamped record of one event, ordered
//!   by timestamp at read time.
//!
//! # Design Principles
//!
//! 1. Status enums are closed; every consumer matches exhaustively.
//! 2. Field-to-recipient binding is resolved on demand from signing order,
//!    never stored denormalized.
//! 3. Recipient signature data is a lenient JSON blob: a corrupt value
//!    reads as "nothing filled yet", never as a failure.

#![deny(unsafe_code)]

mod audit;
mod document;
mod errors;
mod ids;
mod recipient;
mod template;
mod user;
mod validate;

pub use audit::*;
pub use document::*;
pub use errors::*;
pub use ids::*;
pub use recipient::*;
pub use template::*;
pub use user::*;
pub use validate::*;
