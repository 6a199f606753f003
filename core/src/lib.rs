//! Shared domain types and synchronous API client for the todo service.
//!
//! # Overview
//! Defines the wire DTOs used by both the server and the client, plus a
//! stateless client that builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern). The caller executes the actual HTTP round-trip, making the
//! client fully deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless — it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - DTOs live here and are reused by the server handlers, so the two
//!   sides cannot drift apart.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, ErrorBody, Priority, Todo, TodoFilter, UpdateTodo};
