//! Push loop forwarding hub events to one websocket client.
//!
//! The loop drains the connection's [`Subscription`] and writes each event as
//! a text frame. Frames sent by the client are read and discarded so that
//! close frames and disconnects are noticed. Every write is bounded by a
//! timeout; a client too slow to accept a frame in time is disconnected.

use std::fmt;
use std::time::Duration;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};

use shoplist_app::event_hub::Subscription;

/// Why a push loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    /// The client closed the connection or the read side failed.
    ClientClosed,
    /// The hub was shut down.
    HubClosed,
    /// Writing a frame took longer than the write timeout.
    WriteTimedOut,
    /// Writing a frame failed.
    WriteFailed,
}

impl fmt::Display for Disconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ClientClosed => "client closed",
            Self::HubClosed => "hub closed",
            Self::WriteTimedOut => "write timed out",
            Self::WriteFailed => "write failed",
        })
    }
}

/// Forward events from `subscription` to `sink` until either side goes away.
///
/// The subscription is dropped when this returns, which unregisters it from
/// the hub.
pub async fn run<S, R, E>(
    mut sink: S,
    mut incoming: R,
    mut subscription: Subscription,
    write_timeout: Duration,
) -> Disconnect
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else {
                    return Disconnect::HubClosed;
                };
                let frame = Message::Text(event.to_string().into());
                match tokio::time::timeout(write_timeout, sink.send(frame)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        tracing::debug!(subscriber = %subscription.id(), error = %err, "websocket write failed");
                        return Disconnect::WriteFailed;
                    }
                    Err(_) => {
                        tracing::warn!(subscriber = %subscription.id(), ?write_timeout, "websocket write timed out");
                        return Disconnect::WriteTimedOut;
                    }
                }
            }

            frame = incoming.next() => {
                match frame {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => return Disconnect::ClientClosed,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
