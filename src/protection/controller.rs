//! Serialized execution context for the availability tracker.
//!
//! All event handling and listener changes run as tasks on one worker
//! thread, strictly in submission order. The worker owns the tracker and
//! the listener list outright, so nothing in here needs a lock. Callers on
//! any thread only ever enqueue.

use super::listener::{ListenerSet, ProtectionListener};
use super::rule::ProtectionTable;
use super::tracker::{AvailabilityTracker, TrackerSnapshot};
use crate::camera::{CameraEvent, CameraService, CameraServiceError, EventSink};
use crate::metrics::{MetricsRegistry, MetricsSnapshot};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

const WORKER_THREAD_NAME: &str = "camera-protection";

/// Errors surfaced by the controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("protection worker is not running")]
    WorkerGone,
    #[error("camera service subscription failed: {0}")]
    Service(#[from] CameraServiceError),
}

enum Task<R> {
    Event(CameraEvent),
    AddListener(Arc<dyn ProtectionListener<R>>),
    RemoveListener(Arc<dyn ProtectionListener<R>>),
    Snapshot(mpsc::Sender<TrackerSnapshot<R>>),
    Barrier(mpsc::Sender<()>),
    Shutdown,
}

/// State owned by the worker thread.
struct Worker<R> {
    tracker: AvailabilityTracker<R>,
    listeners: ListenerSet<R>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<R: Clone> Worker<R> {
    fn run(mut self, tasks: mpsc::Receiver<Task<R>>) {
        tracing::debug!("Protection worker started");

        for task in tasks {
            match task {
                Task::Event(event) => {
                    if let Some(notification) = self.tracker.handle(&event) {
                        self.listeners.notify(&notification);
                    }
                    self.record_metrics();
                }
                Task::AddListener(listener) => {
                    self.listeners.add(listener);
                    tracing::debug!(listeners = self.listeners.len(), "Listener added");
                }
                Task::RemoveListener(listener) => {
                    if self.listeners.remove(&listener) {
                        tracing::debug!(listeners = self.listeners.len(), "Listener removed");
                    }
                }
                Task::Snapshot(reply) => {
                    if reply.send(self.tracker.snapshot()).is_err() {
                        tracing::warn!("Snapshot requester went away");
                    }
                }
                Task::Barrier(reply) => {
                    if reply.send(()).is_err() {
                        tracing::warn!("Barrier requester went away");
                    }
                }
                Task::Shutdown => break,
            }
        }

        tracing::debug!("Protection worker stopped");
    }

    fn record_metrics(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.update(&MetricsSnapshot::from_tracker(&self.tracker));
        }
    }
}

/// Drives camera protection from a camera service's availability events.
///
/// Owns a worker thread that runs the [`AvailabilityTracker`] and notifies
/// listeners. Dropping the controller finishes queued tasks and joins the
/// worker.
pub struct ProtectionController<R> {
    tasks: mpsc::Sender<Task<R>>,
    worker: Option<JoinHandle<()>>,
    listening: bool,
}

impl<R> ProtectionController<R>
where
    R: Clone + Send + 'static,
{
    /// Creates a controller for the given rule table.
    pub fn new(table: ProtectionTable<R>) -> Result<Self, ControllerError> {
        Self::spawn(table, None)
    }

    /// Creates a controller that updates `metrics` after every event.
    pub fn with_metrics(
        table: ProtectionTable<R>,
        metrics: Arc<MetricsRegistry>,
    ) -> Result<Self, ControllerError> {
        Self::spawn(table, Some(metrics))
    }

    fn spawn(
        table: ProtectionTable<R>,
        metrics: Option<Arc<MetricsRegistry>>,
    ) -> Result<Self, ControllerError> {
        tracing::info!(
            rules = table.len(),
            excluded_packages = table.excluded_packages().len(),
            "Starting camera protection controller"
        );

        let worker = Worker {
            tracker: AvailabilityTracker::new(table),
            listeners: ListenerSet::new(),
            metrics,
        };
        let (tasks, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || worker.run(receiver))?;

        Ok(Self {
            tasks,
            worker: Some(handle),
            listening: false,
        })
    }

    /// Handle that enqueues events onto the worker.
    pub fn event_sink(&self) -> EventSink {
        let tasks = self.tasks.clone();
        EventSink::new(move |event| tasks.send(Task::Event(event)).is_ok())
    }

    /// Registers for availability events. Does nothing if already listening.
    pub fn start_listening<S>(&mut self, service: &mut S) -> Result<(), ControllerError>
    where
        S: CameraService + ?Sized,
    {
        if self.listening {
            return Ok(());
        }
        service.register_availability_callback(self.event_sink())?;
        self.listening = true;
        tracing::info!("Listening for camera availability");
        Ok(())
    }

    /// Deregisters from the service. Safe to call repeatedly.
    pub fn stop<S>(&mut self, service: &mut S)
    where
        S: CameraService + ?Sized,
    {
        if !self.listening {
            return;
        }
        service.unregister_availability_callback();
        self.listening = false;
        tracing::info!("Stopped listening for camera availability");
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn add_listener(&self, listener: Arc<dyn ProtectionListener<R>>) {
        self.submit(Task::AddListener(listener));
    }

    /// Removing a listener that was never added is a no-op.
    pub fn remove_listener(&self, listener: &Arc<dyn ProtectionListener<R>>) {
        self.submit(Task::RemoveListener(Arc::clone(listener)));
    }

    /// Blocks until every task queued before this call has run.
    pub fn sync(&self) -> Result<(), ControllerError> {
        let (reply, done) = mpsc::channel();
        self.tasks
            .send(Task::Barrier(reply))
            .map_err(|_| ControllerError::WorkerGone)?;
        done.recv().map_err(|_| ControllerError::WorkerGone)
    }

    /// Tracker state after every task queued before this call.
    pub fn snapshot(&self) -> Result<TrackerSnapshot<R>, ControllerError> {
        let (reply, result) = mpsc::channel();
        self.tasks
            .send(Task::Snapshot(reply))
            .map_err(|_| ControllerError::WorkerGone)?;
        result.recv().map_err(|_| ControllerError::WorkerGone)
    }

    fn submit(&self, task: Task<R>) {
        if self.tasks.send(task).is_err() {
            tracing::warn!("Protection worker is gone, task dropped");
        }
    }
}

impl<R> Drop for ProtectionController<R> {
    fn drop(&mut self) {
        // Shutdown queues behind pending work, so it drains first.
        let _ = self.tasks.send(Task::Shutdown);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("Protection worker panicked");
            }
        }
    }
}
