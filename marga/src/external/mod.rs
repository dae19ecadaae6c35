//! Alternate tracing backends behind the search result contract.
//!
//! Backends are registered by name at startup in a [`TracerRegistry`]. The
//! [`ExternalTracerAdapter`] runs one on its own thread and reports through
//! the same [`SearchListener`] callbacks and [`SearchResult`] as the built-in
//! engine. A missing backend is a normal `BackendUnavailable` result.
//!
//! The adapter cannot cancel a backend once started.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::core::VoxelCoord;
use crate::error::{Result, panic_message};
use crate::path::Path;
use crate::search::{SearchFailure, SearchListener, SearchProgress, SearchResult, SearchState};
use crate::volume::VoxelVolume;

/// Failure reported by a backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The call itself was malformed
    #[error("invalid invocation: {0}")]
    Invocation(String),

    /// The backend ran and declared failure
    #[error("backend reported failure: {0}")]
    Failed(String),
}

/// Inputs handed to a backend.
#[derive(Clone, Debug)]
pub struct TraceRequest {
    pub volume: Arc<VoxelVolume>,
    pub start: VoxelCoord,
    pub goal: VoxelCoord,
}

/// An independently supplied path tracer.
pub trait ExternalTracer: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    /// Trace a route from `request.start` to `request.goal`, reporting
    /// completion fractions through `progress`.
    fn trace(
        &self,
        request: &TraceRequest,
        progress: &mut dyn FnMut(f64),
    ) -> std::result::Result<Vec<VoxelCoord>, BackendError>;
}

/// Backends available to this process, by name.
#[derive(Clone, Default)]
pub struct TracerRegistry {
    tracers: HashMap<String, Arc<dyn ExternalTracer>>,
}

impl TracerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own name, replacing any previous one
    pub fn register(&mut self, tracer: Arc<dyn ExternalTracer>) {
        info!("[External] registered backend '{}'", tracer.name());
        self.tracers.insert(tracer.name().to_string(), tracer);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ExternalTracer>> {
        self.tracers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tracers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tracers.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Runs a named backend with the engine's listener contract.
pub struct ExternalTracerAdapter {
    registry: Arc<TracerRegistry>,
    backend: String,
    listeners: Vec<Arc<dyn SearchListener>>,
}

impl ExternalTracerAdapter {
    pub fn new(registry: Arc<TracerRegistry>, backend: impl Into<String>) -> Self {
        Self {
            registry,
            backend: backend.into(),
            listeners: Vec::new(),
        }
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener>) {
        self.listeners.push(listener);
    }

    /// Start tracing on a worker thread.
    ///
    /// Every outcome, including a missing backend, arrives through the handle
    /// and the listeners.
    pub fn spawn(&self, request: TraceRequest) -> Result<ExternalTraceHandle> {
        let tracer = self.registry.get(&self.backend);
        let backend = self.backend.clone();
        let listeners = self.listeners.clone();
        let (sender, receiver) = bounded(1);

        let handle = thread::Builder::new()
            .name("external-trace".into())
            .spawn(move || {
                let result = run_backend(&backend, tracer, &request, &listeners);
                // Receiver may already be gone; the listeners have the result
                let _ = sender.send(result);
            })?;

        Ok(ExternalTraceHandle { receiver, handle })
    }
}

fn notify_state(listeners: &[Arc<dyn SearchListener>], state: SearchState) {
    for listener in listeners {
        listener.on_state_changed(&state);
    }
}

fn run_backend(
    backend: &str,
    tracer: Option<Arc<dyn ExternalTracer>>,
    request: &TraceRequest,
    listeners: &[Arc<dyn SearchListener>],
) -> SearchResult {
    let started = Instant::now();
    notify_state(listeners, SearchState::Running);

    let outcome = match tracer {
        None => {
            warn!("[External] backend '{}' is not registered", backend);
            Err(SearchFailure::BackendUnavailable(format!(
                "no tracing backend named '{}'",
                backend
            )))
        }
        Some(tracer) => invoke(tracer.as_ref(), request, listeners, started),
    };

    let result = match outcome {
        Ok(path) => SearchResult::found(path, started.elapsed()),
        Err(failure) => SearchResult::failed(failure, started.elapsed()),
    };

    let state = match result.failure() {
        None => SearchState::Succeeded,
        Some(failure) => SearchState::Failed(failure.clone()),
    };
    debug!("[External] '{}' {} in {:?}", backend, state, result.elapsed);
    notify_state(listeners, state);
    for listener in listeners {
        listener.on_finished(&result);
    }
    result
}

fn invoke(
    tracer: &dyn ExternalTracer,
    request: &TraceRequest,
    listeners: &[Arc<dyn SearchListener>],
    started: Instant,
) -> std::result::Result<Path, SearchFailure> {
    for anchor in [request.start, request.goal] {
        if !request.volume.contains(anchor) {
            return Err(SearchFailure::InternalError(
                BackendError::Invocation(format!("{} lies outside the volume", anchor)).to_string(),
            ));
        }
    }

    let mut report = |fraction: f64| {
        let progress = SearchProgress {
            fraction_done: fraction.clamp(0.0, 1.0),
            nodes_considered: 0,
            nodes_expanded: 0,
            elapsed: started.elapsed(),
        };
        for listener in listeners {
            listener.on_progress(&progress);
        }
    };

    let traced = panic::catch_unwind(AssertUnwindSafe(|| tracer.trace(request, &mut report)));
    let voxels = match traced {
        Ok(Ok(voxels)) => voxels,
        Ok(Err(e)) => {
            warn!("[External] '{}' failed: {}", tracer.name(), e);
            return Err(SearchFailure::InternalError(e.to_string()));
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("[External] '{}' panicked: {}", tracer.name(), message);
            return Err(SearchFailure::InternalError(format!(
                "backend '{}' panicked: {}",
                tracer.name(),
                message
            )));
        }
    };

    if voxels.is_empty() {
        return Err(SearchFailure::InternalError(format!(
            "backend '{}' returned an empty path",
            tracer.name()
        )));
    }
    Ok(Path::from_voxels(&voxels, request.volume.spacing().clone()))
}

/// Pending result of an external trace.
pub struct ExternalTraceHandle {
    receiver: Receiver<SearchResult>,
    handle: JoinHandle<()>,
}

impl ExternalTraceHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the backend finishes
    pub fn wait(self) -> SearchResult {
        let result = self.receiver.recv().unwrap_or_else(|_| {
            SearchResult::failed(
                SearchFailure::InternalError("external trace thread exited without a result".into()),
                Duration::ZERO,
            )
        });
        if self.handle.join().is_err() {
            error!("[External] worker thread panicked");
        }
        result
    }

    /// Wait up to `timeout`; gives the handle back if still running
    pub fn wait_timeout(self, timeout: Duration) -> std::result::Result<SearchResult, Self> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => {
                let _ = self.handle.join();
                Ok(result)
            }
            Err(RecvTimeoutError::Timeout) => Err(self),
            Err(RecvTimeoutError::Disconnected) => Ok(self.wait()),
        }
    }
}
