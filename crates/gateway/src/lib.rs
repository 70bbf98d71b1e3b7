#![deny(unused)]
//! Remote service edge for genderize.
//!
//! This crate turns name lists into request URLs, fetches them over HTTP
//! and maps the service's JSON bodies back onto per-name outcomes.

pub mod batcher;
pub mod http;
pub mod response;

pub use batcher::{RequestChunk, UrlBatcher};
pub use http::HttpTransport;
pub use response::parse_response;
