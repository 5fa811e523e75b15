//! In-process command queue.
//!
//! Each topic is a bounded channel of JSON-encoded records, so producers and
//! consumers only share the wire format, the way they would with an external
//! broker. Consumers of one topic compete for messages: every record is
//! handed to exactly one of them.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{Mutex, mpsc};

use crate::domain::{
    CommandQueue, CommandRequest, CommandResponse, QueueError,
    queue::{COMMAND_REQUESTS_TOPIC, COMMAND_RESPONSES_TOPIC},
};
use crate::infrastructure::dto::queue::{CommandRequestRecord, CommandResponseRecord};

/// Default number of undelivered records a topic holds
pub const DEFAULT_TOPIC_CAPACITY: usize = 1024;

struct Topic {
    name: &'static str,
    /// `None` once the topic is closed
    sender: Mutex<Option<mpsc::Sender<Vec<u8>>>>,
    receiver: Mutex<mpsc::Receiver<Vec<u8>>>,
}

impl Topic {
    fn new(name: &'static str, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            name,
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(receiver),
        }
    }

    async fn publish<R: Serialize>(&self, record: &R) -> Result<(), QueueError> {
        let payload =
            serde_json::to_vec(record).map_err(|e| QueueError::Encode(e.to_string()))?;
        self.send_payload(payload).await
    }

    async fn send_payload(&self, payload: Vec<u8>) -> Result<(), QueueError> {
        let sender = self.sender.lock().await;
        let sender = sender.as_ref().ok_or(QueueError::Closed(self.name))?;
        sender.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full(self.name),
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed(self.name),
        })
    }

    /// Receive and decode the next record, skipping payloads that fail to decode
    async fn consume<R, T>(&self) -> Option<T>
    where
        R: DeserializeOwned,
        T: TryFrom<R>,
        T::Error: std::fmt::Display,
    {
        let mut receiver = self.receiver.lock().await;
        loop {
            let payload = receiver.recv().await?;
            let record = match serde_json::from_slice::<R>(&payload) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Dropping undecodable record on '{}': {}", self.name, e);
                    continue;
                }
            };
            match T::try_from(record) {
                Ok(value) => return Some(value),
                Err(e) => {
                    tracing::warn!("Dropping invalid record on '{}': {}", self.name, e);
                }
            }
        }
    }

    /// Drop the only sender; the channel ends once consumers drain it
    async fn close(&self) {
        self.sender.lock().await.take();
    }
}

/// Command queue backed by in-process channels
pub struct InMemoryCommandQueue {
    requests: Topic,
    responses: Topic,
}

impl InMemoryCommandQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            requests: Topic::new(COMMAND_REQUESTS_TOPIC, capacity),
            responses: Topic::new(COMMAND_RESPONSES_TOPIC, capacity),
        }
    }

    /// Close both topics.
    ///
    /// Further publishes fail with [`QueueError::Closed`]; consumers drain what
    /// is already queued and then receive `None`.
    pub async fn shutdown(&self) {
        self.requests.close().await;
        self.responses.close().await;
        tracing::info!("Command queue shut down");
    }
}

impl Default for InMemoryCommandQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_CAPACITY)
    }
}

#[async_trait]
impl CommandQueue for InMemoryCommandQueue {
    async fn publish_request(&self, request: CommandRequest) -> Result<(), QueueError> {
        self.requests
            .publish(&CommandRequestRecord::from(request))
            .await
    }

    async fn publish_response(&self, response: CommandResponse) -> Result<(), QueueError> {
        self.responses
            .publish(&CommandResponseRecord::from(response))
            .await
    }

    async fn next_request(&self) -> Option<CommandRequest> {
        self.requests
            .consume::<CommandRequestRecord, CommandRequest>()
            .await
    }

    async fn next_response(&self) -> Option<CommandResponse> {
        self.responses
            .consume::<CommandResponseRecord, CommandResponse>()
            .await
    }
}
