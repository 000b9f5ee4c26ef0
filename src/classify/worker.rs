//! Background classification with at most one live request.
//!
//! Inference runs on a dedicated thread fed through a futures channel so
//! the drawing path never waits on it. Each request carries a
//! [`CancelToken`]; superseding or cancelling a request flips the token
//! and drops the reply receiver, so a late result can never surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use futures::channel::{mpsc, oneshot};
use futures::StreamExt;
use kurbo::Point;
use tracing::debug;

use super::shapes::Suggestion;
use super::StrokeClassifier;
use crate::error::InkError;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

struct Job {
    points: Vec<Point>,
    token: CancelToken,
    reply: oneshot::Sender<Suggestion>,
}

/// Handle to the classification thread. Cloning shares the thread.
///
/// The thread exits once every handle is dropped and the queue drains.
#[derive(Clone)]
pub struct ClassifierWorker {
    jobs: mpsc::UnboundedSender<Job>,
}

impl ClassifierWorker {
    pub fn spawn(classifier: impl StrokeClassifier) -> Result<Self, InkError> {
        let (jobs, mut queue) = mpsc::unbounded::<Job>();
        thread::Builder::new()
            .name("shape-classifier".into())
            .spawn(move || {
                while let Some(job) = futures::executor::block_on(queue.next()) {
                    if job.token.is_cancelled() {
                        continue;
                    }
                    let suggestion = Suggestion::from(classifier.classify(&job.points));
                    if job.token.is_cancelled() {
                        debug!("dropping result of cancelled classification");
                        continue;
                    }
                    // The requester may have gone away; nothing to deliver then.
                    let _ = job.reply.send(suggestion);
                }
            })?;
        Ok(Self { jobs })
    }

    fn submit(&self, points: Vec<Point>) -> Result<Pending, InkError> {
        let token = CancelToken::default();
        let (reply, receiver) = oneshot::channel();
        self.jobs
            .unbounded_send(Job {
                points,
                token: token.clone(),
                reply,
            })
            .map_err(|_| InkError::WorkerClosed)?;
        Ok(Pending { token, receiver })
    }
}

struct Pending {
    token: CancelToken,
    receiver: oneshot::Receiver<Suggestion>,
}

/// One-slot suggestion requester: a new request supersedes the old one.
pub struct ShapeSuggester {
    worker: ClassifierWorker,
    pending: Option<Pending>,
}

impl ShapeSuggester {
    pub fn new(worker: ClassifierWorker) -> Self {
        Self {
            worker,
            pending: None,
        }
    }

    /// Queue classification of `points`, cancelling any outstanding request.
    pub fn request(&mut self, points: Vec<Point>) -> Result<(), InkError> {
        self.cancel();
        self.pending = Some(self.worker.submit(points)?);
        Ok(())
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Non-blocking check for the outstanding request's result.
    ///
    /// A request whose worker went away resolves to [`Suggestion::NoShape`].
    pub fn poll(&mut self) -> Option<Suggestion> {
        let pending = self.pending.as_mut()?;
        let result = match pending.receiver.try_recv() {
            Ok(None) => return None,
            Ok(Some(suggestion)) => suggestion,
            Err(oneshot::Canceled) => Suggestion::NoShape,
        };
        self.pending = None;
        Some(result)
    }

    /// Block until the outstanding request resolves.
    pub fn wait(&mut self) -> Option<Suggestion> {
        let pending = self.pending.take()?;
        Some(futures::executor::block_on(pending.receiver).unwrap_or(Suggestion::NoShape))
    }
}
