//! JSON-lines gateway feed.
//!
//! The real gateway connection lives outside this crate; whatever relays it
//! writes one JSON object per line:
//!
//! ```text
//! {"type":"voice_state_update","member_id":"1","guild_id":"9","next_channel_id":"5"}
//! {"type":"message_create","author_id":"1","guild_id":"9","channel_id":"7","message_id":"42","content":"hi"}
//! {"type":"message_delete","message_id":"42"}
//! ```
//!
//! `timestamp` (RFC 3339) is optional on every line; when absent the receive
//! time is used. Lines that fail to parse are skipped.

use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::domain::activity::RawMessage;
use crate::domain::foundation::{ChannelId, GuildId, MemberId, MessageId, Timestamp};
use crate::domain::presence::RawTransitionEvent;

/// One event relayed from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    VoiceStateUpdate(RawTransitionEvent),
    MessageCreate(RawMessage),
    MessageDelete(MessageId),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    VoiceStateUpdate {
        timestamp: Option<Timestamp>,
        member_id: MemberId,
        guild_id: GuildId,
        #[serde(default)]
        is_bot: bool,
        #[serde(default)]
        previous_channel_id: Option<ChannelId>,
        #[serde(default)]
        next_channel_id: Option<ChannelId>,
    },
    MessageCreate {
        timestamp: Option<Timestamp>,
        author_id: MemberId,
        #[serde(default)]
        is_bot: bool,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        content: String,
    },
    MessageDelete {
        message_id: MessageId,
    },
}

impl WireEvent {
    fn into_event(self, received_at: Timestamp) -> GatewayEvent {
        match self {
            WireEvent::VoiceStateUpdate {
                timestamp,
                member_id,
                guild_id,
                is_bot,
                previous_channel_id,
                next_channel_id,
            } => GatewayEvent::VoiceStateUpdate(RawTransitionEvent {
                timestamp: timestamp.unwrap_or(received_at),
                member_id,
                guild_id,
                is_bot,
                previous_channel_id,
                next_channel_id,
            }),
            WireEvent::MessageCreate {
                timestamp,
                author_id,
                is_bot,
                guild_id,
                channel_id,
                message_id,
                content,
            } => GatewayEvent::MessageCreate(RawMessage {
                timestamp: timestamp.unwrap_or(received_at),
                author_id,
                is_bot,
                guild_id,
                channel_id,
                message_id,
                content,
            }),
            WireEvent::MessageDelete { message_id } => GatewayEvent::MessageDelete(message_id),
        }
    }
}

/// Parses one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str, received_at: Timestamp) -> Result<Option<GatewayEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let wire: WireEvent = serde_json::from_str(line)?;
    Ok(Some(wire.into_event(received_at)))
}

/// Turns a line-oriented reader into a stream of gateway events.
///
/// The stream ends at EOF or on the first read error.
pub fn event_stream<R>(reader: R) -> BoxStream<'static, GatewayEvent>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_line(&line, Timestamp::now()) {
                    Ok(Some(event)) => return Some((event, lines)),
                    Ok(None) => continue,
                    Err(e) => {
                        debug!(error = %e, "skipping malformed gateway line");
                        continue;
                    }
                },
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "gateway feed read failed");
                    return None;
                }
            }
        }
    })
    .boxed()
}

/// Gateway feed on standard input.
pub fn stdin_stream() -> BoxStream<'static, GatewayEvent> {
    event_stream(BufReader::new(tokio::io::stdin()))
}

/// Gateway feed replayed from a file.
pub async fn file_stream(path: &Path) -> std::io::Result<BoxStream<'static, GatewayEvent>> {
    let file = tokio::fs::File::open(path).await?;
    Ok(event_stream(BufReader::new(file)))
}
