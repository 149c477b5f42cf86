//! Latest-wins rate limiting for sample streams.

use futures::Stream;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Sleep;

/// Extension trait to rate-limit any Stream.
pub trait DecimateExt: Stream {
    /// Emit at most one item per `period`, keeping the latest.
    ///
    /// Gaze preview consumers care about the freshest estimate, not every
    /// estimate, so items arriving faster than the period replace each
    /// other rather than queueing. The first item passes through
    /// immediately; afterwards a full period must elapse between emits.
    fn decimate(self, period: Duration) -> Decimate<Self>
    where
        Self: Sized,
    {
        Decimate::new(self, period)
    }
}

impl<T: Stream> DecimateExt for T {}

pin_project! {
    /// A stream combinator that rate-limits emission, latest item wins.
    pub struct Decimate<S: Stream> {
        #[pin]
        stream: S,
        #[pin]
        cooldown: Option<Sleep>,
        period: Duration,
        pending: Option<S::Item>,
        exhausted: bool,
    }
}

impl<S: Stream> Decimate<S> {
    /// Create a rate-limited stream.
    pub fn new(stream: S, period: Duration) -> Self {
        Self { stream, cooldown: None, period, pending: None, exhausted: false }
    }
}

impl<S: Stream> Stream for Decimate<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Pull everything the inner stream has ready, keeping the latest.
        while !*this.exhausted {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.pending = Some(item),
                Poll::Ready(None) => *this.exhausted = true,
                Poll::Pending => break,
            }
        }

        if this.pending.is_some() {
            // Inside the cooldown window, hold the item back.
            if let Some(cooldown) = this.cooldown.as_mut().as_pin_mut() {
                match cooldown.poll(cx) {
                    Poll::Ready(()) => {}
                    Poll::Pending => {
                        // A terminated inner stream still flushes its last
                        // item once the cooldown elapses.
                        return Poll::Pending;
                    }
                }
            }
            this.cooldown.set(Some(tokio::time::sleep(*this.period)));
            return Poll::Ready(this.pending.take());
        }

        if *this.exhausted {
            return Poll::Ready(None);
        }
        Poll::Pending
    }
}
