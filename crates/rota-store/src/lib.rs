//! Document records and the store interface of the rota reservation service.
//!
//! The allocation protocol never talks to a concrete database. It depends on
//! the [`DocumentStore`] trait, which models the handful of operations the
//! protocol needs from a document database: point reads by id, calendar
//! merge writes, reservation insert/delete, equality-filtered listing and
//! the count-only occupancy aggregate.
//!
//! [`MemoryStore`] is the bundled implementation, backing both the test
//! suites and single-node deployments. Its reservation table hands out a
//! monotonically increasing admission sequence under one lock, which is what
//! the protocol's capacity tie-break builds on.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod memory;
pub mod records;
pub mod traits;

pub use error::{RecordError, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use records::{Course, Location, NewReservation, Profile, Reservation, School, UserRole};
pub use traits::DocumentStore;
