//! Quote command worker.

use std::sync::Arc;

use crate::domain::{
    ChatUser, CommandQueue, CommandRequest, CommandResponse, MessageKind, QuoteSource,
};

use super::WorkerError;

/// Consumes command requests, looks quotes up and publishes the answers.
///
/// Several workers may share one queue; each request reaches one of them.
/// Failed lookups are logged and dropped, never retried.
pub struct CommandWorker {
    id: usize,
    queue: Arc<dyn CommandQueue>,
    quotes: Arc<dyn QuoteSource>,
    bot: ChatUser,
}

impl CommandWorker {
    pub fn new(
        id: usize,
        queue: Arc<dyn CommandQueue>,
        quotes: Arc<dyn QuoteSource>,
        bot: ChatUser,
    ) -> Self {
        Self {
            id,
            queue,
            quotes,
            bot,
        }
    }

    /// Process requests until the queue shuts down
    pub async fn run(self) {
        tracing::info!("Command worker {} started", self.id);
        while let Some(request) = self.queue.next_request().await {
            if let Err(e) = self.handle(request).await {
                tracing::warn!("Command worker {} dropped a request: {}", self.id, e);
            }
        }
        tracing::info!("Command worker {} stopped", self.id);
    }

    /// Answer a single request by publishing a quote announcement
    pub async fn handle(&self, request: CommandRequest) -> Result<(), WorkerError> {
        let MessageKind::StockQuote { symbol } = MessageKind::classify(&request.text) else {
            return Err(WorkerError::NotACommand(request.text));
        };

        let quote = self.quotes.fetch_quote(&symbol).await?;
        let response = CommandResponse {
            room_id: request.room_id,
            author: self.bot.clone(),
            text: quote.announcement(),
        };
        tracing::info!(
            "Worker {}: '{}' for room '{}'",
            self.id,
            response.text,
            response.room_id
        );
        self.queue.publish_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        domain::{MockQuoteSource, QuoteError, RoomId, StockQuote, UserId, UserName},
        infrastructure::queue::InMemoryCommandQueue,
    };

    fn bot() -> ChatUser {
        ChatUser::new(
            UserId::new("stockbot".to_string()).unwrap(),
            UserName::new("StockBot".to_string()).unwrap(),
        )
    }

    fn request(text: &str) -> CommandRequest {
        CommandRequest {
            room_id: RoomId::new("r1".to_string()).unwrap(),
            user_id: UserId::new("u1".to_string()).unwrap(),
            text: text.to_string(),
        }
    }

    fn quote(symbol: &str, close: &str) -> StockQuote {
        StockQuote {
            symbol: symbol.to_string(),
            date: "2026-10-16".to_string(),
            time: "22:00:09".to_string(),
            open: "1".to_string(),
            high: "2".to_string(),
            low: "0.5".to_string(),
            close: close.to_string(),
            volume: "100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_quote_is_announced_by_the_bot() {
        // given:
        let queue = Arc::new(InMemoryCommandQueue::default());
        let mut quotes = MockQuoteSource::new();
        quotes
            .expect_fetch_quote()
            .withf(|symbol| symbol == "ACME")
            .times(1)
            .returning(|_| Ok(quote("ACME.US", "123.45")));
        let worker = CommandWorker::new(0, queue.clone(), Arc::new(quotes), bot());

        // when:
        let result = worker.handle(request("/stock=ACME")).await;

        // then:
        assert_eq!(result, Ok(()));
        let response = queue.next_response().await.unwrap();
        assert_eq!(response.room_id.as_str(), "r1");
        assert_eq!(response.author, bot());
        assert_eq!(response.text, "ACME.US quote is $123.45 per share");
    }

    #[tokio::test]
    async fn test_failed_lookup_publishes_nothing() {
        // given:
        let queue = Arc::new(InMemoryCommandQueue::default());
        let mut quotes = MockQuoteSource::new();
        quotes
            .expect_fetch_quote()
            .times(1)
            .returning(|_| Err(QuoteError::Malformed("garbage".to_string())));
        let worker = CommandWorker::new(0, queue.clone(), Arc::new(quotes), bot());

        // when:
        let result = worker.handle(request("/stock=ACME")).await;

        // then: zero responses were produced
        assert_eq!(
            result,
            Err(WorkerError::Quote(QuoteError::Malformed("garbage".to_string())))
        );
        queue.shutdown().await;
        assert_eq!(queue.next_response().await, None);
    }

    #[tokio::test]
    async fn test_non_command_request_is_dropped_without_lookup() {
        let queue = Arc::new(InMemoryCommandQueue::default());
        let mut quotes = MockQuoteSource::new();
        quotes.expect_fetch_quote().never();
        let worker = CommandWorker::new(0, queue, Arc::new(quotes), bot());

        let result = worker.handle(request("hello")).await;

        assert_eq!(result, Err(WorkerError::NotACommand("hello".to_string())));
    }

    #[tokio::test]
    async fn test_run_keeps_going_after_a_failure() {
        // given:
        let queue = Arc::new(InMemoryCommandQueue::default());
        let mut quotes = MockQuoteSource::new();
        quotes
            .expect_fetch_quote()
            .returning(|symbol| match symbol {
                "BAD" => Err(QuoteError::Unavailable("BAD".to_string())),
                other => Ok(quote(other, "10")),
            });
        let worker = CommandWorker::new(0, queue.clone(), Arc::new(quotes), bot());
        let task = tokio::spawn(worker.run());

        // when:
        for text in ["/stock=BAD", "/stock=GOOD"] {
            queue.publish_request(request(text)).await.unwrap();
        }

        // then:
        let response = tokio::time::timeout(Duration::from_secs(1), queue.next_response())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.text, "GOOD quote is $10 per share");

        queue.shutdown().await;
        task.await.unwrap();
    }
}
