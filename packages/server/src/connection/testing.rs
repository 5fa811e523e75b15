//! In-memory transports for exercising the pumps.

use futures_util::{Sink, Stream, StreamExt, future, sink, stream};
use tokio::sync::mpsc;

use super::{Frame, TransportError};

/// Sink that forwards every written frame to the returned receiver
pub fn recording_sink() -> (
    impl Sink<Frame, Error = TransportError> + Unpin + Send + 'static,
    mpsc::UnboundedReceiver<Frame>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sink = sink::unfold(tx, |tx, frame: Frame| async move {
        tx.send(frame).map_err(|_| TransportError::Closed)?;
        Ok::<_, TransportError>(tx)
    });
    (Box::pin(sink), rx)
}

/// Sink whose every write fails
pub fn failing_sink() -> impl Sink<Frame, Error = TransportError> + Unpin + Send + 'static {
    Box::pin(sink::unfold((), |(), _frame: Frame| {
        future::ready(Err::<(), _>(TransportError::Io("broken pipe".to_string())))
    }))
}

/// Sink whose writes never complete
pub fn stalled_sink() -> impl Sink<Frame, Error = TransportError> + Unpin + Send + 'static {
    Box::pin(sink::unfold((), |(), _frame: Frame| {
        future::pending::<Result<(), TransportError>>()
    }))
}

/// Stream yielding the given frames, then waiting forever
pub fn scripted_stream(
    frames: Vec<Frame>,
) -> impl Stream<Item = Result<Frame, TransportError>> + Unpin + Send + 'static {
    stream::iter(frames.into_iter().map(Ok)).chain(stream::pending())
}

/// Stream yielding the given frames, then ending as if the peer hung up
pub fn finite_stream(
    frames: Vec<Frame>,
) -> impl Stream<Item = Result<Frame, TransportError>> + Unpin + Send + 'static {
    stream::iter(frames.into_iter().map(Ok))
}

/// Stream fed by the returned sender; ends when the sender is dropped
pub fn channel_stream() -> (
    mpsc::UnboundedSender<Frame>,
    impl Stream<Item = Result<Frame, TransportError>> + Unpin + Send + 'static,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|frame| (Ok(frame), rx))
    });
    (tx, Box::pin(stream))
}
