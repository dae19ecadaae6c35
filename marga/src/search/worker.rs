//! Running a search on its own thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::error;

use crate::error::{Result, TraceError};

use super::control::{SearchControl, SearchState};
use super::engine::SearchEngine;
use super::result::SearchResult;

/// Spawns search engines on named worker threads.
pub struct SearchWorker;

impl SearchWorker {
    /// Move `engine` onto a new thread and start it.
    pub fn spawn(mut engine: SearchEngine) -> Result<SearchHandle> {
        let control = engine.control();
        let handle = thread::Builder::new()
            .name("voxel-search".into())
            .spawn(move || {
                let result = engine.run();
                (engine, result)
            })?;
        Ok(SearchHandle { control, handle })
    }
}

/// Handle to a search running on a worker thread.
pub struct SearchHandle {
    control: Arc<SearchControl>,
    handle: JoinHandle<(SearchEngine, SearchResult)>,
}

impl SearchHandle {
    pub fn control(&self) -> Arc<SearchControl> {
        Arc::clone(&self.control)
    }

    pub fn state(&self) -> SearchState {
        self.control.state()
    }

    pub fn cancel(&self) {
        self.control.cancel();
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the search; returns the engine for diagnostics and export
    pub fn join(self) -> Result<(SearchEngine, SearchResult)> {
        self.handle.join().map_err(|e| {
            error!("[Search] worker thread panicked: {:?}", e);
            TraceError::WorkerPanicked
        })
    }
}
