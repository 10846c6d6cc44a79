//! Network transport.

pub mod http;

pub use http::HttpTransport;
