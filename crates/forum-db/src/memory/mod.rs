//! In-process store implementing every repository port
//!
//! Used by the service tests, the HTTP integration tests, and the API binary
//! when no `DATABASE_URL` is configured. A single `parking_lot::Mutex` guards
//! all tables, so each operation (including a full reaction transition) is
//! atomic with respect to every other.

mod store;

pub use store::MemoryStore;
