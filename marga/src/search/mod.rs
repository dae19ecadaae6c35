//! Voxel pathfinding: node storage, frontiers and the search driver.
//!
//! - [`NodeRegistry`]: O(1) per-voxel node records, one arena per direction
//! - [`PriorityFrontier`]: `f`-ordered open set with deterministic tie-break
//! - [`SearchEngine`]: bidirectional A*, unidirectional A* and open-ended Dijkstra
//! - [`SearchControl`] / [`SearchWorker`]: cancel, pause and threaded execution
//!
//! # Example
//!
//! ```rust,ignore
//! use marga::search::{SearchEngine, SearchSettings};
//!
//! let mut engine = SearchEngine::goal_directed(volume, cost, start, goal, SearchSettings::default())?;
//! let result = engine.run();
//! if let Some(path) = result.path() {
//!     println!("length {:.2} {}", path.length(), path.unit());
//! }
//! ```

mod control;
mod engine;
mod frontier;
mod node;
mod progress;
mod registry;
mod result;
mod settings;
mod worker;

pub use control::{SearchControl, SearchState};
pub use engine::SearchEngine;
pub use frontier::{FrontierEntry, PriorityFrontier};
pub use node::{Direction, NodeId, NodeStatus, SearchNode};
pub use progress::{SearchListener, SearchProgress};
pub use registry::NodeRegistry;
pub use result::{SearchFailure, SearchResult};
pub use settings::{DestinationCriteria, SearchSettings};
pub use worker::{SearchHandle, SearchWorker};
