use std::pin::pin;
use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};

/// Quiet period after the last keystroke before a search term is used.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Emit an item once `window` has passed without a newer one arriving,
/// skipping it if it equals the previously emitted item.
///
/// An item still pending when `input` ends is emitted right away.
pub fn debounce_distinct<S>(input: S, window: Duration) -> impl Stream<Item = S::Item>
where
    S: Stream,
    S::Item: PartialEq + Clone,
{
    stream! {
        let mut input = pin!(input);
        let mut pending: Option<S::Item> = None;
        let mut last: Option<S::Item> = None;

        loop {
            let next = if pending.is_none() {
                input.next().await
            } else {
                match tokio::time::timeout(window, input.next()).await {
                    Ok(next) => next,
                    Err(_elapsed) => {
                        if let Some(item) = take_distinct(&mut pending, &mut last) {
                            yield item;
                        }
                        continue;
                    },
                }
            };

            match next {
                Some(item) => pending = Some(item),
                None => {
                    if let Some(item) = take_distinct(&mut pending, &mut last) {
                        yield item;
                    }
                    break;
                },
            }
        }
    }
}

fn take_distinct<T: PartialEq + Clone>(pending: &mut Option<T>, last: &mut Option<T>) -> Option<T> {
    let item = pending.take()?;
    if last.as_ref() == Some(&item) {
        return None;
    }
    *last = Some(item.clone());
    Some(item)
}
