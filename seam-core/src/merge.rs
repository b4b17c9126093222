//! N-way merge of time-ordered slice streams.
//!
//! Each input must already be non-decreasing by instant. The merge always
//! advances the input whose buffered head has the smallest instant (ties go to
//! the earlier input) and folds items that share an instant into one slice, so
//! the output is strictly increasing.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{FusedStream, Stream, StreamExt};

use crate::slice::DataSlice;
use crate::source::SourceStream;

struct Cursor {
    stream: SourceStream,
    head: Option<DataSlice>,
}

/// Stream returned by [`merge`].
///
/// Input streams are owned by the merge and dropped as soon as they are
/// exhausted, when the merge completes, or when the merge itself is dropped.
#[must_use = "streams do nothing unless polled"]
pub struct MergeSlices {
    cursors: Vec<Cursor>,
    pending: Option<DataSlice>,
    done: bool,
}

/// Merge `streams` into one strictly increasing stream, combining equal instants.
pub fn merge<I>(streams: I) -> MergeSlices
where
    I: IntoIterator<Item = SourceStream>,
{
    let cursors: Vec<Cursor> = streams
        .into_iter()
        .map(|stream| Cursor { stream, head: None })
        .collect();
    MergeSlices {
        done: cursors.is_empty(),
        cursors,
        pending: None,
    }
}

impl MergeSlices {
    /// Number of inputs that are not exhausted yet.
    #[must_use]
    pub fn live_inputs(&self) -> usize {
        self.cursors.len()
    }

    /// Buffer one head per input. Returns `Pending` if any input is not ready.
    fn fill_heads(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        let mut waiting = false;
        let mut i = 0;
        while i < self.cursors.len() {
            let cursor = &mut self.cursors[i];
            if cursor.head.is_some() {
                i += 1;
                continue;
            }
            match cursor.stream.poll_next_unpin(cx) {
                Poll::Ready(Some(Some(slice))) => {
                    cursor.head = Some(slice);
                    i += 1;
                }
                // Empty placeholder: skip it and poll the same input again.
                Poll::Ready(Some(None)) => {}
                Poll::Ready(None) => {
                    // Keep input order so ties keep resolving to the earlier input.
                    drop(self.cursors.remove(i));
                }
                Poll::Pending => {
                    waiting = true;
                    i += 1;
                }
            }
        }
        if waiting { Poll::Pending } else { Poll::Ready(()) }
    }

    fn take_smallest_head(&mut self) -> Option<DataSlice> {
        let idx = self
            .cursors
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.head.as_ref().map(|h| (i, h.time())))
            .min_by_key(|&(_, t)| t)
            .map(|(i, _)| i)?;
        self.cursors[idx].head.take()
    }

    fn finish(&mut self) -> Option<DataSlice> {
        self.done = true;
        self.cursors.clear();
        self.pending.take()
    }
}

impl Stream for MergeSlices {
    type Item = DataSlice;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.done {
                return Poll::Ready(None);
            }
            if this.fill_heads(cx).is_pending() {
                return Poll::Pending;
            }
            let Some(next) = this.take_smallest_head() else {
                return Poll::Ready(this.finish());
            };
            match this.pending.take() {
                None => this.pending = Some(next),
                Some(pending) if next.time() > pending.time() => {
                    this.pending = Some(next);
                    return Poll::Ready(Some(pending));
                }
                Some(mut pending) => {
                    #[cfg(feature = "tracing")]
                    if next.time() < pending.time() {
                        tracing::warn!(
                            pending = %pending.time(),
                            item = %next.time(),
                            "out-of-order slice combined into pending slice"
                        );
                    }
                    pending.combine(next);
                    this.pending = Some(pending);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (usize::from(self.pending.is_some()), None)
        }
    }
}

impl FusedStream for MergeSlices {
    fn is_terminated(&self) -> bool {
        self.done
    }
}
