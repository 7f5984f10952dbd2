//! Termtask document store library.
//!
//! Exposes the store server for use in tests and embedding. The server
//! accepts WebSocket connections and answers the four collection
//! operations of the Termtask store protocol: list-all, create, set,
//! and delete.

pub mod collections;
pub mod config;
pub mod server;
