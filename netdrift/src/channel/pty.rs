//! PTY channel for interactive device sessions.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::buffer::PatternBuffer;
use crate::error::ChannelError;

/// Bytes from the end of the buffer searched for the prompt.
pub const DEFAULT_SEARCH_DEPTH: usize = 1000;

/// Interactive shell channel with prompt-driven reads.
pub struct PtyChannel {
    channel: Channel<Msg>,
    buffer: PatternBuffer,
    closed: bool,
}

impl PtyChannel {
    /// Wrap an already-opened shell channel.
    pub fn new(channel: Channel<Msg>, search_depth: usize) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(search_depth),
            closed: false,
        }
    }

    /// Send one line of input (a newline is appended).
    pub async fn send(&mut self, input: &str) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        trace!("pty send: {:?}", input);
        let line = format!("{}\n", input);
        self.channel.data(line.as_bytes()).await?;
        Ok(())
    }

    /// Read until `pattern` matches in the buffer tail, returning everything
    /// read so far (including the match).
    pub async fn read_until_pattern(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<Vec<u8>, ChannelError> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.buffer.tail_contains(pattern) {
                return Ok(self.buffer.take());
            }
            if self.closed {
                return Err(ChannelError::Closed);
            }

            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?;

            match msg {
                Some(ChannelMsg::Data { data }) => self.buffer.extend(&data),
                Some(ChannelMsg::ExtendedData { data, .. }) => self.buffer.extend(&data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    self.closed = true;
                }
                Some(_) => {}
            }
        }
    }

    /// Whether the remote side has closed the channel.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the channel. Errors are ignored; the channel is gone either way.
    pub async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.channel.close().await {
                trace!("pty close: {}", e);
            }
        }
    }
}
