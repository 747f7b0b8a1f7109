use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::error::LlmError;
use super::{CompletionRequest, TextCompletion};

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
    Hang,
}

/// Scripted [`TextCompletion`].
///
/// Queued responses are consumed in order; once the queue is empty the default
/// response is repeated. The default is an upstream failure unless set.
#[derive(Debug)]
pub struct MockCompletion {
    queue: Mutex<VecDeque<Scripted>>,
    default: Scripted,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default: Scripted::Fail("no scripted response".to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }
}

impl MockCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always replies with `text` once the queue is drained.
    pub fn replying(text: &str) -> Self {
        Self {
            default: Scripted::Reply(text.to_string()),
            ..Self::default()
        }
    }

    /// Always fails with an upstream error.
    pub fn failing(reason: &str) -> Self {
        Self {
            default: Scripted::Fail(reason.to_string()),
            ..Self::default()
        }
    }

    /// Never answers (callers must time out).
    pub fn hanging() -> Self {
        Self {
            default: Scripted::Hang,
            ..Self::default()
        }
    }

    /// Waits `delay` before every scripted response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn then_reply(self, text: &str) -> Self {
        self.push(Scripted::Reply(text.to_string()))
    }

    pub fn then_fail(self, reason: &str) -> Self {
        self.push(Scripted::Fail(reason.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(self, scripted: Scripted) -> Self {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(scripted);
        }
        self
    }

    fn next(&self) -> Scripted {
        self.queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl TextCompletion for MockCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt);
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.next() {
            Scripted::Reply(text) => Ok(text),
            Scripted::Fail(reason) => Err(LlmError::Upstream { reason }),
            Scripted::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::EmptyResponse)
            }
        }
    }
}
