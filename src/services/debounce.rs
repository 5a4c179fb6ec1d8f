use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DELAY_MS: u64 = 500;

/// Trailing-edge debounce over a `watch` channel.
///
/// Every `set` restarts the quiet period; the receiver sees a value only after
/// the input has been left alone for the whole delay. Dropping the debouncer
/// aborts the pending timer, so nothing is emitted after teardown.
pub struct Debounced<T> {
    delay: Duration,
    output: Arc<watch::Sender<T>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debounced<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> (Self, watch::Receiver<T>) {
        let (tx, rx) = watch::channel(initial);
        let debounced = Debounced {
            delay,
            output: Arc::new(tx),
            pending: None,
        };
        (debounced, rx)
    }

    pub fn set(&mut self, value: T) {
        self.cancel();

        let delay = self.delay;
        let output = Arc::clone(&self.output);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            output.send_if_modified(|current| {
                if *current == value {
                    return false;
                }
                *current = value;
                true
            });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
