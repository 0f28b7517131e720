//! Decoding of newline-delimited JSON response bodies.
//!
//! A streaming chat completion arrives as one JSON object per line. The
//! decoders here buffer bytes up to the next `\n`, decode that line on its
//! own and hand it to the caller before asking the transport for more.
//! Nothing is carried over between lines, and the body ends when the
//! transport ends. There is no `[DONE]` sentinel.

use std::io::BufRead;
use std::iter::FusedIterator;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::stream::FusedStream;
use futures::Stream;
use llmgateway_domain::ChatCompletionResponse;
use tracing::debug;

use crate::error::{BoxError, Error, Result};

const CHUNK: &str = "stream chunk";

/// Decodes one line. Blank lines carry no chunk and yield `None`.
fn decode_line(line: &[u8], context: &str) -> Option<Result<ChatCompletionResponse>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }

    Some(
        serde_json::from_slice(line)
            .map_err(|e| Error::validation(format!("{CHUNK} from {context}"), e)),
    )
}

#[derive(Default)]
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Removes and returns the next complete line, without its terminator.
    fn next_line(&mut self) -> Option<Vec<u8>> {
        let end = self.buf.iter().position(|byte| *byte == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=end).collect();
        line.pop();
        Some(line)
    }

    /// Returns whatever is left once the body has ended.
    fn take_remaining(&mut self) -> Option<Vec<u8>> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Reading,
    Draining,
    Complete,
    Failed,
}

/// Lazy sequence of chunks decoded from an async byte stream.
///
/// The underlying stream is only polled when no complete line is buffered,
/// so chunks are produced strictly in arrival order and never ahead of the
/// caller. The first malformed line or transport error is yielded once and
/// ends the sequence. Dropping it releases the body without reading the rest.
pub struct ChunkStream<S> {
    inner: S,
    buffer: LineBuffer,
    state: State,
    context: String,
}

impl<S> ChunkStream<S> {
    pub fn new(inner: S, context: impl ToString) -> Self {
        Self {
            inner,
            buffer: LineBuffer::default(),
            state: State::Reading,
            context: context.to_string(),
        }
    }

    fn emit(&mut self, line: &[u8]) -> Option<Result<ChatCompletionResponse>> {
        let item = decode_line(line, &self.context)?;
        if let Err(error) = &item {
            debug!(error = %error, "Failed to decode stream chunk");
            self.state = State::Failed;
        }
        Some(item)
    }
}

impl<S, B, E> Stream for ChunkStream<S>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<BoxError>,
{
    type Item = Result<ChatCompletionResponse>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.state {
                State::Complete | State::Failed => return Poll::Ready(None),
                State::Draining => match this.buffer.take_remaining() {
                    Some(line) => {
                        if let Some(item) = this.emit(&line) {
                            return Poll::Ready(Some(item));
                        }
                    }
                    None => {
                        debug!(context = %this.context, "Received completion from Upstream");
                        this.state = State::Complete;
                    }
                },
                State::Reading => {
                    if let Some(line) = this.buffer.next_line() {
                        if let Some(item) = this.emit(&line) {
                            return Poll::Ready(Some(item));
                        }
                        continue;
                    }

                    match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                        Some(Ok(bytes)) => this.buffer.extend(bytes.as_ref()),
                        Some(Err(error)) => {
                            let error = Error::transport(&this.context, error);
                            debug!(error = %error, "Stream interrupted");
                            this.state = State::Failed;
                            return Poll::Ready(Some(Err(error)));
                        }
                        None => this.state = State::Draining,
                    }
                }
            }
        }
    }
}

impl<S, B, E> FusedStream for ChunkStream<S>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<BoxError>,
{
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Complete | State::Failed)
    }
}

/// Lazy sequence of chunks read from a blocking reader, one line per call to
/// `next`.
pub struct ChunkIter<R> {
    reader: R,
    line: Vec<u8>,
    state: State,
    context: String,
}

impl<R: BufRead> ChunkIter<R> {
    pub fn new(reader: R, context: impl ToString) -> Self {
        Self { reader, line: Vec::new(), state: State::Reading, context: context.to_string() }
    }
}

impl<R: BufRead> Iterator for ChunkIter<R> {
    type Item = Result<ChatCompletionResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state == State::Reading {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    debug!(context = %self.context, "Received completion from Upstream");
                    self.state = State::Complete;
                }
                Ok(_) => match decode_line(&self.line, &self.context) {
                    Some(Ok(chunk)) => return Some(Ok(chunk)),
                    Some(Err(error)) => {
                        debug!(error = %error, "Failed to decode stream chunk");
                        self.state = State::Failed;
                        return Some(Err(error));
                    }
                    None => continue,
                },
                Err(error) => {
                    let error = Error::transport(&self.context, error);
                    debug!(error = %error, "Stream interrupted");
                    self.state = State::Failed;
                    return Some(Err(error));
                }
            }
        }
        None
    }
}

impl<R: BufRead> FusedIterator for ChunkIter<R> {}
