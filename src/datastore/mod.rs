/// Datastore layer
///
/// A small document store on SQLite. Entities are JSON property bags filed
/// under a kind and addressed by a store-assigned integer key:
/// - Project-scoped client with a shared connection pool
/// - Kind-scoped queries, keyed reads, writes and deletes
/// - Transactions for read-modify-write updates

// Entity keys (kind + store-assigned id)
pub mod key;

// Pooled client and transactions
pub mod client;

pub use client::{DatastoreClient, Transaction};
pub use key::Key;
