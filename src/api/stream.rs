//! Streaming response body -> lazy sequence of decoded text chunks.
//!
//! [`decode_chunks`] wraps any byte-chunk stream (in production,
//! `reqwest::Response::bytes_stream`) so the consumer can write a plain
//! `while let Some(chunk) = stream.next().await` loop. The sequence is finite:
//! it ends when the body ends, or right after the first read error.

use color_eyre::eyre::{eyre, Result};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};

pub type LogStream = BoxStream<'static, Result<String>>;

/// Incremental UTF-8 decoder.
///
/// A multi-byte character split across two chunks is held back until its
/// remaining bytes arrive. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        None => {
                            // Incomplete trailing sequence, wait for more bytes
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flushes whatever is still buffered at end of stream.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

struct DecodeState<S> {
    bytes: std::pin::Pin<Box<S>>,
    decoder: Utf8Decoder,
    done: bool,
}

pub fn decode_chunks<S, B, E>(bytes: S) -> LogStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: Utf8Decoder::default(),
        done: false,
    };
    stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }
        loop {
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let text = state.decoder.push(chunk.as_ref());
                    if text.is_empty() {
                        continue;
                    }
                    return Some((Ok(text), state));
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(eyre!("Stream read failed: {e}")), state));
                }
                None => {
                    state.done = true;
                    let rest = state.decoder.finish();
                    if rest.is_empty() {
                        return None;
                    }
                    return Some((Ok(rest), state));
                }
            }
        }
    })
    .boxed()
}
