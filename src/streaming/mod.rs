//! Streaming chat decoding.
//!
//! The platform streams chat answers as line-delimited `data: {json}` events terminated by
//! a `[DONE]` line. [`decode_chat_stream`] turns the raw body into a lazy sequence of
//! [`ChatChunk`](crate::types::ChatChunk)s; accumulating citations or grounding metadata
//! across chunks is left to the caller.

pub mod decode;

pub use decode::{decode_chat_stream, ChatStream};
