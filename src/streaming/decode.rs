//! Line-delimited event-stream decoder (bytes -> [`ChatChunk`]).

use crate::client::error_classification::{map_failure, RawFailure};
use crate::types::events::WireChunk;
use crate::types::ChatChunk;
use crate::BoxStream;
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use tracing::{debug, trace};

const DONE_SIGNAL: &str = "[DONE]";

/// Lazy, ordered, single-pass sequence of chat chunks.
pub type ChatStream = BoxStream<'static, ChatChunk>;

enum Line {
    Chunk(ChatChunk),
    Done,
    Skip,
}

fn classify(line: &str) -> Line {
    let line = line.trim();
    if line == DONE_SIGNAL {
        return Line::Done;
    }
    let Some(payload) = line.strip_prefix("data:") else {
        // event:, id:, retry:, comments and blank lines carry nothing for us.
        return Line::Skip;
    };
    let payload = payload.trim();
    if payload == DONE_SIGNAL {
        return Line::Done;
    }
    if payload.is_empty() {
        return Line::Skip;
    }
    match WireChunk::parse(payload) {
        Some(wire) => Line::Chunk(wire.into_chunk()),
        None => {
            trace!(len = payload.len(), "dropping malformed stream line");
            Line::Skip
        }
    }
}

struct DecodeState<S> {
    input: S,
    buf: Vec<u8>,
    input_done: bool,
    finished: bool,
}

impl<S> DecodeState<S> {
    /// Next complete line in the buffer, without its terminator.
    fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|b| *b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Decode a chat byte stream.
///
/// - Each `data:` line is one candidate chunk; malformed lines are dropped.
/// - `[DONE]` ends the sequence without yielding anything.
/// - `Stop` and `Error` chunks are yielded and then end the sequence.
/// - A transport failure mid-stream becomes a terminal `Error` chunk.
pub fn decode_chat_stream<S>(input: S) -> ChatStream
where
    S: Stream<Item = Result<Bytes, RawFailure>> + Send + Unpin + 'static,
{
    let state = DecodeState {
        input,
        buf: Vec::new(),
        input_done: false,
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            while let Some(line) = state.next_line() {
                match classify(&line) {
                    Line::Chunk(chunk) => {
                        state.finished = chunk.is_terminal();
                        return Some((chunk, state));
                    }
                    Line::Done => {
                        debug!("chat stream done");
                        return None;
                    }
                    Line::Skip => {}
                }
            }

            if state.input_done {
                return None;
            }

            match state.input.next().await {
                Some(Ok(bytes)) => state.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    state.finished = true;
                    let error = map_failure(e);
                    debug!(error_code = error.code(), "chat stream interrupted");
                    return Some((ChatChunk::Error { error }, state));
                }
                None => {
                    // Flush a final unterminated line.
                    state.input_done = true;
                    if !state.buf.is_empty() {
                        state.buf.push(b'\n');
                    }
                }
            }
        }
    }))
}
