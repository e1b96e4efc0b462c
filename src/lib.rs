//! `aside-cached` shields a source of truth behind a remote key-value store.
//!
//! The crate implements the cache-aside pattern three ways, each defending against a
//! different failure mode of a cache sitting in front of a database:
//! - [`cache::client::CacheClient::query_pass_through`]: plain cache-aside with a
//!   null-entry defense against cache penetration (repeated misses for keys that have
//!   no backing record).
//! - [`cache::client::CacheClient::query_with_mutex`]: at most one loader in flight per
//!   key, coordinated through a lease-based lock in the backing store, protecting hot
//!   keys against cache breakdown.
//! - [`cache::client::CacheClient::query_with_logical_expiry`]: an expiry timestamp
//!   carried inside the payload; expired entries are served stale while a single
//!   background worker rebuilds them, so callers never block on a rebuild.
//!
//! [`cache::id::time_ordered_id_generator::TimeOrderedIdGenerator`] packs a coarse
//! timestamp and a per-day counter from the same backing store into compact, time-ordered
//! 64 bit identifiers without a central sequence authority.
//!
//! The backing store is abstracted as [`cache::store::CacheStore`];
//! [`cache::store::memory::MemoryStore`] is a process-local implementation.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use aside_cached::cache::client::CacheClient;
//! use aside_cached::cache::config::ConfigBuilder;
//! use aside_cached::cache::store::memory::MemoryStore;
//!
//! let client = CacheClient::new(MemoryStore::new(), ConfigBuilder::new().build());
//! let shop: Option<String> = client.query_pass_through(
//!     "cache:shop:",
//!     &10,
//!     |id| Ok(Some(format!("shop#{}", id))),
//!     Duration::from_secs(30 * 60),
//! ).unwrap();
//! ```
pub mod cache;
