//! Request/response channel between a coordinator and a page endpoint.
//!
//! The endpoint owns a page snapshot and answers JSON-shaped requests; the
//! coordinator talks to it through an [`EndpointHandle`]. A dropped channel,
//! a dropped reply or a reply that never comes are reported as
//! [`ChannelError`] values so the caller can decide whether to retry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{ChannelError, Error, Result};
use crate::options::Options;
use crate::result::Conversation;

/// Requests pending in the endpoint queue before senders wait.
pub const CHANNEL_CAPACITY: usize = 16;

/// Request sent to a page endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Liveness check.
    Ping,
    /// Extract the conversation; `force` discards a cached result.
    ExtractContent {
        #[serde(default)]
        force: bool,
    },
}

/// Reply from a page endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Pong,
    Extracted {
        #[serde(rename = "messageCount")]
        message_count: usize,
        conversation: Conversation,
    },
    Failed {
        error: String,
    },
}

impl Request {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Response {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Answers requests against one page snapshot.
///
/// The last extraction is cached until a forced request or a new snapshot.
#[derive(Debug, Clone)]
pub struct ContentEndpoint {
    html: String,
    opts: Options,
    cached: Option<Conversation>,
}

impl ContentEndpoint {
    #[must_use]
    pub fn new(html: impl Into<String>, opts: Options) -> Self {
        Self { html: html.into(), opts, cached: None }
    }

    /// Replace the page snapshot and drop the cached result.
    pub fn set_page(&mut self, html: impl Into<String>) {
        self.html = html.into();
        self.cached = None;
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Ping => Response::Pong,
            Request::ExtractContent { force } => {
                if force || self.cached.is_none() {
                    debug!(force, "extracting page snapshot");
                    self.cached = Some(crate::extract_with_options(&self.html, &self.opts));
                }
                match &self.cached {
                    Some(conversation) if !conversation.messages.is_empty() => Response::Extracted {
                        message_count: conversation.messages.len(),
                        conversation: conversation.clone(),
                    },
                    _ => Response::Failed { error: "No messages found in conversation".to_string() },
                }
            }
        }
    }
}

/// A queued request and the slot for its reply.
pub type Envelope = (Request, oneshot::Sender<Response>);

/// Sending side of an endpoint channel.
#[derive(Debug, Clone)]
pub struct EndpointHandle {
    tx: mpsc::Sender<Envelope>,
}

/// Bounded request queue holding up to `capacity` envelopes. The receiver
/// is for endpoints served by the caller; [`spawn_endpoint`] serves a
/// [`ContentEndpoint`] from it.
#[must_use]
pub fn endpoint_channel(capacity: usize) -> (EndpointHandle, mpsc::Receiver<Envelope>) {
    let (tx, rx) = mpsc::channel::<Envelope>(capacity.max(1));
    (EndpointHandle { tx }, rx)
}

/// Run `endpoint` on a tokio task. The task ends when every handle is
/// dropped.
#[must_use]
pub fn spawn_endpoint(mut endpoint: ContentEndpoint) -> (EndpointHandle, JoinHandle<()>) {
    let (handle, mut rx) = endpoint_channel(CHANNEL_CAPACITY);
    let task = tokio::spawn(async move {
        while let Some((request, reply)) = rx.recv().await {
            // Synchronous DOM work runs on the blocking pool.
            let handled = tokio::task::spawn_blocking(move || {
                let response = endpoint.handle(request);
                (endpoint, response)
            })
            .await;
            let response = match handled {
                Ok((returned, response)) => {
                    endpoint = returned;
                    response
                }
                Err(e) => {
                    warn!(error = %e, "extraction task failed, endpoint stopping");
                    let _ = reply.send(Response::Failed { error: format!("extraction task failed: {e}") });
                    break;
                }
            };
            if reply.send(response).is_err() {
                debug!("requester went away before the reply");
            }
        }
        info!("endpoint channel closed");
    });
    (handle, task)
}

impl EndpointHandle {
    /// Send one request and wait up to `timeout` for its reply. The budget
    /// covers queueing as well, so a full queue also times out.
    pub async fn request(&self, request: Request, timeout: Duration) -> std::result::Result<Response, ChannelError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let exchange = async {
            if self.tx.send((request, reply_tx)).await.is_err() {
                return Err(ChannelError::Disconnected("endpoint is not running".to_string()));
            }
            reply_rx.await.map_err(|_| ChannelError::NoResponse)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ChannelError::Timeout(timeout)),
        }
    }

    /// Whether the endpoint answers a ping in time.
    pub async fn ping(&self, timeout: Duration) -> bool {
        matches!(self.request(Request::Ping, timeout).await, Ok(Response::Pong))
    }

    /// Request an extraction and unwrap the conversation.
    pub async fn extract(&self, force: bool, timeout: Duration) -> Result<Conversation> {
        match self.request(Request::ExtractContent { force }, timeout).await? {
            Response::Extracted { conversation, .. } => Ok(conversation),
            Response::Failed { error } => Err(Error::Extraction(error)),
            Response::Pong => Err(Error::Extraction("unexpected pong".to_string())),
        }
    }
}
