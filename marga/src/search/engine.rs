//! Best-first search driver.
//!
//! # Modes
//!
//! - **Goal-directed, bidirectional** (default): two waves, one from each
//!   anchor, each ordered by `g + h` where `h` is the cheapest possible cost
//!   of the straight line to the opposite anchor. The search stops once the
//!   best meeting total is no larger than the larger of the two frontier
//!   minima.
//! - **Goal-directed, unidirectional**: plain A* that stops when the goal is
//!   expanded.
//! - **Open-ended**: Dijkstra from one or more seeds with no goal test.
//!   Expanded voxels that satisfy the [`DestinationCriteria`] are recorded.
//!
//! # Edge cost
//!
//! Moving into voxel `v` over a step of physical length `l` costs
//! `max(cost(v), c_min) · l`. The wave from the goal walks edges backwards,
//! so it charges the voxel it leaves; both waves therefore price a route
//! identically and their `g` values add up to the forward route cost.
//!
//! # Failure containment
//!
//! A panic raised by the cost model (or a Hessian provider behind it) while
//! searching ends the run with [`SearchFailure::InternalError`]. A panicking
//! listener is logged and skipped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, trace, warn};

use crate::core::{NeighborStep, VoxelCoord, neighborhood};
use crate::cost::CostModel;
use crate::error::{Result, TraceError, panic_message};
use crate::export::FillExport;
use crate::path::Path;
use crate::volume::VoxelVolume;

use super::control::{SearchControl, SearchState};
use super::frontier::{FrontierEntry, PriorityFrontier};
use super::node::{Direction, NodeId, NodeStatus};
use super::progress::{SearchListener, SearchProgress};
use super::registry::NodeRegistry;
use super::result::{SearchFailure, SearchResult};
use super::settings::{DestinationCriteria, SearchSettings};

/// Relative improvement below which a closed node is not reopened.
/// Absorbs floating-point noise in otherwise equal routes.
const REOPEN_TOLERANCE: f64 = 1e-9;

/// Clock samples taken per timeout or report interval, whichever is shorter.
const SAMPLES_PER_BUDGET: u32 = 4;

enum SearchMode {
    Goal {
        start: VoxelCoord,
        goal: VoxelCoord,
    },
    Open {
        seeds: Vec<VoxelCoord>,
        criteria: DestinationCriteria,
    },
}

/// One search wave: its records, its open set and the anchor it aims at.
struct Side {
    registry: NodeRegistry,
    frontier: PriorityFrontier,
    /// Heuristic target; `None` for Dijkstra
    target: Option<VoxelCoord>,
}

impl Side {
    #[inline]
    fn peek(&mut self) -> Option<FrontierEntry> {
        self.frontier.peek_live(&self.registry)
    }
}

#[derive(Clone, Copy, Debug)]
struct Meeting {
    coord: VoxelCoord,
    cost: f64,
}

/// Search structures, kept after the run for diagnostics and export.
struct RunState {
    sides: Vec<Side>,
    meeting: Option<Meeting>,
    destinations: Vec<VoxelCoord>,
    expanded: usize,
    reopened: usize,
    best_fraction: f64,
}

impl RunState {
    fn considered(&self) -> usize {
        self.sides.iter().map(|s| s.registry.len()).sum()
    }
}

enum Completion {
    Route { voxels: Vec<VoxelCoord>, cost: f64 },
    Exhausted,
}

/// Pause-aware run clock with an adaptive sampling stride.
///
/// The stride starts at one iteration and doubles (up to `check_every`)
/// while samples arrive well inside the target window, and halves when
/// they overrun it.
struct RunClock {
    started: Instant,
    paused: Duration,
    last_report: Instant,
    last_sample: Instant,
    target: Duration,
    stride: usize,
    max_stride: usize,
    countdown: usize,
}

impl RunClock {
    fn start(settings: &SearchSettings) -> Self {
        let now = Instant::now();
        let max_stride = settings.check_every.max(1);
        let budget = [settings.timeout, settings.report_interval]
            .into_iter()
            .filter(|d| !d.is_zero())
            .min();
        let (stride, target) = match budget {
            Some(budget) => (1, budget / SAMPLES_PER_BUDGET),
            None => (max_stride, Duration::MAX),
        };
        Self {
            started: now,
            paused: Duration::ZERO,
            last_report: now,
            last_sample: now,
            target,
            stride,
            max_stride,
            countdown: stride,
        }
    }

    /// Running time excluding pauses
    fn elapsed(&self) -> Duration {
        self.started.elapsed().saturating_sub(self.paused)
    }

    /// Count one iteration; true when a sample is due
    #[inline]
    fn tick(&mut self) -> bool {
        self.countdown -= 1;
        self.countdown == 0
    }

    /// Fit the stride to the window since the previous sample
    fn resample(&mut self) {
        let now = Instant::now();
        let window = now.duration_since(self.last_sample);
        self.last_sample = now;
        if window > self.target {
            self.stride = (self.stride / 2).max(1);
        } else if window < self.target / 2 {
            self.stride = self.stride.saturating_mul(2).min(self.max_stride);
        }
        self.countdown = self.stride;
    }

    fn add_pause(&mut self, paused: Duration) {
        self.paused += paused;
        self.last_sample = Instant::now();
    }
}

/// Split the wave list into the wave being grown and (if present) the other.
fn split_sides(sides: &mut [Side], index: usize) -> (&mut Side, Option<&Side>) {
    let (head, tail) = sides.split_at_mut(1);
    match index {
        0 => (&mut head[0], tail.first()),
        _ => (&mut tail[0], Some(&head[0])),
    }
}

/// Record `coord` as a meeting point if the other wave has reached it more cheaply.
fn note_meeting(meeting: &mut Option<Meeting>, other: Option<&Side>, coord: VoxelCoord, g: f64) {
    if let Some(other) = other
        && let Some(node) = other.registry.get(coord)
    {
        let cost = g + node.g;
        if meeting.is_none_or(|m| cost < m.cost) {
            *meeting = Some(Meeting { coord, cost });
        }
    }
}

/// Minimum-cost path search over a voxel volume.
///
/// One engine owns its registries and frontiers exclusively. The volume and
/// cost model are shared read-only. Run it directly with [`SearchEngine::run`]
/// or on a worker thread with [`super::SearchWorker`].
pub struct SearchEngine {
    volume: Arc<VoxelVolume>,
    cost: Arc<dyn CostModel>,
    mode: SearchMode,
    settings: SearchSettings,
    control: Arc<SearchControl>,
    listeners: Vec<Arc<dyn SearchListener>>,
    steps: Vec<NeighborStep>,
    min_cost: f64,
    run: Option<RunState>,
}

impl SearchEngine {
    /// Search between two fixed points.
    pub fn goal_directed(
        volume: Arc<VoxelVolume>,
        cost: Arc<dyn CostModel>,
        start: VoxelCoord,
        goal: VoxelCoord,
        settings: SearchSettings,
    ) -> Result<Self> {
        for anchor in [start, goal] {
            if !volume.contains(anchor) {
                return Err(TraceError::OutOfBounds(anchor));
            }
        }
        Ok(Self::new(
            volume,
            cost,
            SearchMode::Goal { start, goal },
            settings,
        ))
    }

    /// Exhaustive search outwards from `seeds`, collecting destinations.
    pub fn open_ended(
        volume: Arc<VoxelVolume>,
        cost: Arc<dyn CostModel>,
        seeds: Vec<VoxelCoord>,
        criteria: DestinationCriteria,
        settings: SearchSettings,
    ) -> Result<Self> {
        if seeds.is_empty() {
            return Err(TraceError::NoSeeds);
        }
        if let Some(&outside) = seeds.iter().find(|s| !volume.contains(**s)) {
            return Err(TraceError::OutOfBounds(outside));
        }
        if let Some(field) = &criteria.tubeness
            && field.dimensions() != volume.dimensions()
        {
            return Err(TraceError::TubenessDimensions {
                field: field.dimensions(),
                volume: volume.dimensions(),
            });
        }
        Ok(Self::new(
            volume,
            cost,
            SearchMode::Open { seeds, criteria },
            settings,
        ))
    }

    fn new(
        volume: Arc<VoxelVolume>,
        cost: Arc<dyn CostModel>,
        mode: SearchMode,
        settings: SearchSettings,
    ) -> Self {
        let steps = neighborhood(volume.is_planar(), volume.spacing());
        let min_cost = cost.minimum_cost_per_unit_distance();
        let control = Arc::new(SearchControl::new());
        if settings.start_paused {
            control.pause();
        }
        Self {
            volume,
            cost,
            mode,
            settings,
            control,
            listeners: Vec::new(),
            steps,
            min_cost,
            run: None,
        }
    }

    /// Shared control handle (cancel, pause, state)
    pub fn control(&self) -> Arc<SearchControl> {
        Arc::clone(&self.control)
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener>) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> SearchState {
        self.control.state()
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn cost_model(&self) -> &Arc<dyn CostModel> {
        &self.cost
    }

    pub fn volume(&self) -> &Arc<VoxelVolume> {
        &self.volume
    }

    pub fn nodes_expanded(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.expanded)
    }

    pub fn nodes_considered(&self) -> usize {
        self.run.as_ref().map_or(0, RunState::considered)
    }

    pub fn nodes_reopened(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.reopened)
    }

    /// Destination voxels found by an open-ended search, in expansion order
    pub fn destinations(&self) -> &[VoxelCoord] {
        self.run
            .as_ref()
            .map(|r| r.destinations.as_slice())
            .unwrap_or(&[])
    }

    /// Records of one wave from the last run
    pub fn registry(&self, direction: Direction) -> Option<&NodeRegistry> {
        self.run.as_ref()?.sides.iter().find_map(|s| {
            (s.registry.direction() == direction).then_some(&s.registry)
        })
    }

    /// Route from the seed (or start) to any voxel reached by the last run
    pub fn path_back(&self, coord: VoxelCoord) -> Option<Path> {
        if !self.volume.contains(coord) {
            return None;
        }
        let mut voxels = self.registry(Direction::FromStart)?.trace_back(coord)?;
        voxels.reverse();
        Some(Path::from_voxels(&voxels, self.volume.spacing().clone()))
    }

    /// Export the start-side records whose cost is at most `threshold`
    pub fn export_fill(&self, threshold: f64) -> Option<FillExport> {
        let registry = self.registry(Direction::FromStart)?;
        Some(FillExport::from_registry(
            registry,
            threshold,
            self.cost.name(),
            self.volume.spacing(),
        ))
    }

    /// Run the search to completion.
    ///
    /// Every call starts afresh; structures from a previous run are dropped.
    /// Failures are reported in the result, never raised.
    pub fn run(&mut self) -> SearchResult {
        self.run = None;
        let mut clock = RunClock::start(&self.settings);
        self.set_state(SearchState::Running);
        info!(
            "[Search] {} search started ({} cost, {} neighbours)",
            self.mode_label(),
            self.cost.name(),
            self.steps.len()
        );

        let outcome = match self.allocate() {
            Ok(mut run) => {
                let searched =
                    panic::catch_unwind(AssertUnwindSafe(|| self.search(&mut run, &mut clock)));
                self.run = Some(run);
                searched.unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    error!("[Search] search panicked: {}", message);
                    Err(SearchFailure::InternalError(format!(
                        "search panicked: {}",
                        message
                    )))
                })
            }
            Err(failure) => Err(failure),
        };

        self.finish(outcome, clock.elapsed())
    }

    fn mode_label(&self) -> &'static str {
        match self.mode {
            SearchMode::Goal { .. } if self.settings.bidirectional => "bidirectional",
            SearchMode::Goal { .. } => "unidirectional",
            SearchMode::Open { .. } => "open-ended",
        }
    }

    fn set_state(&self, state: SearchState) {
        self.control.set_state(state.clone());
        self.notify(|listener| listener.on_state_changed(&state));
    }

    /// Deliver one event to every listener
    fn notify(&self, event: impl Fn(&dyn SearchListener)) {
        for listener in &self.listeners {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| event(listener.as_ref())))
            {
                error!(
                    "[Search] listener panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    fn allocate(&self) -> std::result::Result<RunState, SearchFailure> {
        let dims = self.volume.dimensions();
        let mut sides = Vec::with_capacity(2);
        match self.mode {
            SearchMode::Goal { start, goal } => {
                sides.push(Side {
                    registry: NodeRegistry::allocate(Direction::FromStart, dims)?,
                    frontier: PriorityFrontier::new(),
                    target: Some(goal),
                });
                if self.settings.bidirectional {
                    sides.push(Side {
                        registry: NodeRegistry::allocate(Direction::FromGoal, dims)?,
                        frontier: PriorityFrontier::new(),
                        target: Some(start),
                    });
                }
            }
            SearchMode::Open { .. } => sides.push(Side {
                registry: NodeRegistry::allocate(Direction::FromStart, dims)?,
                frontier: PriorityFrontier::new(),
                target: None,
            }),
        }
        Ok(RunState {
            sides,
            meeting: None,
            destinations: Vec::new(),
            expanded: 0,
            reopened: 0,
            best_fraction: 0.0,
        })
    }

    fn search(
        &self,
        run: &mut RunState,
        clock: &mut RunClock,
    ) -> std::result::Result<Completion, SearchFailure> {
        self.seed(run)?;
        loop {
            if self.control.is_cancelled() {
                return Err(SearchFailure::Cancelled);
            }
            if self.control.is_pause_requested() {
                self.wait_while_paused(clock);
                continue;
            }

            if clock.tick() {
                clock.resample();
                self.check_clock(run, clock)?;
            }

            let done = match &self.mode {
                SearchMode::Goal { .. } if run.sides.len() == 2 => self.step_bidirectional(run)?,
                SearchMode::Goal { goal, .. } => self.step_towards(run, *goal)?,
                SearchMode::Open { criteria, .. } => self.step_open(run, criteria)?,
            };
            if let Some(completion) = done {
                return Ok(completion);
            }
        }
    }

    fn wait_while_paused(&self, clock: &mut RunClock) {
        self.set_state(SearchState::Paused);
        debug!("[Search] paused");
        clock.add_pause(self.control.wait_while_paused());
        if !self.control.is_cancelled() {
            debug!("[Search] resumed");
            self.set_state(SearchState::Running);
        }
    }

    /// Sample the clock: enforce the timeout and emit rate-limited progress
    fn check_clock(
        &self,
        run: &RunState,
        clock: &mut RunClock,
    ) -> std::result::Result<(), SearchFailure> {
        let elapsed = clock.elapsed();
        if !self.settings.timeout.is_zero() && elapsed > self.settings.timeout {
            debug!(
                "[Search] timed out after {:?} ({} expanded)",
                elapsed, run.expanded
            );
            return Err(SearchFailure::TimedOut);
        }
        let interval = self.settings.report_interval;
        if !interval.is_zero() && clock.last_report.elapsed() >= interval {
            clock.last_report = Instant::now();
            let progress = SearchProgress {
                fraction_done: self.fraction_done(run),
                nodes_considered: run.considered(),
                nodes_expanded: run.expanded,
                elapsed,
            };
            trace!(
                "[Search] progress {:.3}, {} expanded",
                progress.fraction_done, progress.nodes_expanded
            );
            self.notify(|listener| listener.on_progress(&progress));
        }
        Ok(())
    }

    fn fraction_done(&self, run: &RunState) -> f64 {
        match self.mode {
            SearchMode::Goal { .. } => run.best_fraction,
            SearchMode::Open { .. } => {
                (run.expanded as f64 / self.volume.voxel_count() as f64).min(1.0)
            }
        }
    }

    /// Cost per unit distance of entering `coord`, never below the model minimum
    #[inline]
    fn unit_cost(&self, coord: VoxelCoord) -> f64 {
        self.cost.cost_moving_to(coord).max(self.min_cost)
    }

    #[inline]
    fn heuristic(&self, side: &Side, coord: VoxelCoord) -> f64 {
        side.target.map_or(0.0, |target| {
            self.min_cost * self.volume.spacing().physical_distance(coord, target)
        })
    }

    fn seed(&self, run: &mut RunState) -> std::result::Result<(), SearchFailure> {
        match &self.mode {
            SearchMode::Goal { start, goal } => {
                self.insert_anchor(run, 0, *start)?;
                if run.sides.len() == 2 {
                    self.insert_anchor(run, 1, *goal)?;
                }
            }
            SearchMode::Open { seeds, .. } => {
                for &seed in seeds {
                    self.insert_anchor(run, 0, seed)?;
                }
            }
        }
        Ok(())
    }

    fn insert_anchor(
        &self,
        run: &mut RunState,
        side: usize,
        coord: VoxelCoord,
    ) -> std::result::Result<(), SearchFailure> {
        let (this, other) = split_sides(&mut run.sides, side);
        if this.registry.get(coord).is_some() {
            return Ok(());
        }
        let h = self.heuristic(this, coord);
        this.registry.upsert(coord, 0.0, h, None, NodeStatus::Open)?;
        this.frontier.push(FrontierEntry { f: h, g: 0.0, coord });
        note_meeting(&mut run.meeting, other, coord, 0.0);
        Ok(())
    }

    /// Pop the cheapest live entry of one wave and close it
    fn close_next(&self, run: &mut RunState, side: usize) -> Option<(NodeId, FrontierEntry)> {
        let wave = &mut run.sides[side];
        let entry = wave.frontier.pop_live(&wave.registry)?;
        let id = wave.registry.id_of(entry.coord)?;
        wave.registry.set_status(id, NodeStatus::Closed);
        run.expanded += 1;

        if let (SearchMode::Goal { start, goal }, Some(target)) = (&self.mode, wave.target) {
            let separation = self.volume.spacing().physical_distance(*start, *goal);
            let fraction = if separation > 0.0 {
                1.0 - self.volume.spacing().physical_distance(entry.coord, target) / separation
            } else {
                1.0
            };
            run.best_fraction = run.best_fraction.max(fraction.clamp(0.0, 1.0));
        }
        Some((id, entry))
    }

    fn expand(
        &self,
        run: &mut RunState,
        side: usize,
        id: NodeId,
        entry: FrontierEntry,
    ) -> std::result::Result<(), SearchFailure> {
        let backwards = run.sides[side].registry.direction() == Direction::FromGoal;
        let leaving = if backwards {
            self.unit_cost(entry.coord)
        } else {
            0.0
        };

        for step in &self.steps {
            let next = step.apply(entry.coord);
            if !self.volume.contains(next) {
                continue;
            }
            let unit = if backwards {
                leaving
            } else {
                self.unit_cost(next)
            };
            self.relax(run, side, next, entry.g + unit * step.length, id)?;
        }
        Ok(())
    }

    fn relax(
        &self,
        run: &mut RunState,
        side: usize,
        coord: VoxelCoord,
        g: f64,
        predecessor: NodeId,
    ) -> std::result::Result<(), SearchFailure> {
        let (this, other) = split_sides(&mut run.sides, side);
        let h = match this.registry.get(coord).copied() {
            Some(node) => {
                if g >= node.g {
                    return Ok(());
                }
                if node.status == NodeStatus::Closed {
                    if node.g - g <= REOPEN_TOLERANCE * node.g.max(1.0) {
                        return Ok(());
                    }
                    run.reopened += 1;
                    warn!(
                        "[Search] reopening closed node {} ({:.9} -> {:.9})",
                        coord, node.g, g
                    );
                }
                node.h
            }
            None => self.heuristic(this, coord),
        };

        this.registry
            .upsert(coord, g, h, Some(predecessor), NodeStatus::Open)?;
        this.frontier.push(FrontierEntry { f: g + h, g, coord });
        note_meeting(&mut run.meeting, other, coord, g);
        Ok(())
    }

    fn step_bidirectional(
        &self,
        run: &mut RunState,
    ) -> std::result::Result<Option<Completion>, SearchFailure> {
        let top_start = run.sides[0].peek();
        let top_goal = run.sides[1].peek();

        let (Some(from_start), Some(from_goal)) = (top_start, top_goal) else {
            return match run.meeting {
                Some(meeting) => self.join_at(run, meeting).map(Some),
                None => Err(SearchFailure::NoPath),
            };
        };

        if let Some(meeting) = run.meeting
            && meeting.cost <= from_start.f.max(from_goal.f)
        {
            return self.join_at(run, meeting).map(Some);
        }

        let side = if from_start.f <= from_goal.f { 0 } else { 1 };
        if let Some((id, entry)) = self.close_next(run, side) {
            self.expand(run, side, id, entry)?;
        }
        Ok(None)
    }

    fn step_towards(
        &self,
        run: &mut RunState,
        goal: VoxelCoord,
    ) -> std::result::Result<Option<Completion>, SearchFailure> {
        let Some((id, entry)) = self.close_next(run, 0) else {
            return Err(SearchFailure::NoPath);
        };
        if entry.coord == goal {
            let mut voxels = run.sides[0]
                .registry
                .trace_back(goal)
                .ok_or_else(|| broken_chain(goal))?;
            voxels.reverse();
            return Ok(Some(Completion::Route {
                voxels,
                cost: entry.g,
            }));
        }
        self.expand(run, 0, id, entry)?;
        Ok(None)
    }

    fn step_open(
        &self,
        run: &mut RunState,
        criteria: &DestinationCriteria,
    ) -> std::result::Result<Option<Completion>, SearchFailure> {
        let Some(top) = run.sides[0].peek() else {
            debug!("[Search] open-ended search exhausted the volume");
            return Ok(Some(Completion::Exhausted));
        };
        if let Some(limit) = criteria.distance_limit
            && top.g > limit
        {
            debug!("[Search] distance limit {} reached", limit);
            return Ok(Some(Completion::Exhausted));
        }

        let Some((id, entry)) = self.close_next(run, 0) else {
            return Ok(None);
        };
        let is_seed = run.sides[0].registry.node(id).predecessor.is_none();
        if !is_seed && criteria.matches(entry.coord) {
            trace!("[Search] destination {} at cost {:.4}", entry.coord, entry.g);
            run.destinations.push(entry.coord);
        }
        self.expand(run, 0, id, entry)?;
        Ok(None)
    }

    /// Stitch the two half-routes together at the meeting point
    fn join_at(
        &self,
        run: &RunState,
        meeting: Meeting,
    ) -> std::result::Result<Completion, SearchFailure> {
        let start_side = &run.sides[0].registry;
        let goal_side = &run.sides[1].registry;

        let mut voxels = start_side
            .trace_back(meeting.coord)
            .ok_or_else(|| broken_chain(meeting.coord))?;
        voxels.reverse();
        let towards_goal = goal_side
            .trace_back(meeting.coord)
            .ok_or_else(|| broken_chain(meeting.coord))?;
        voxels.extend(towards_goal.into_iter().skip(1));

        let cost = match (start_side.get(meeting.coord), goal_side.get(meeting.coord)) {
            (Some(a), Some(b)) => a.g + b.g,
            _ => meeting.cost,
        };
        debug!(
            "[Search] waves met at {} (cost {:.6}, {} voxels)",
            meeting.coord,
            cost,
            voxels.len()
        );
        Ok(Completion::Route { voxels, cost })
    }

    fn finish(
        &mut self,
        outcome: std::result::Result<Completion, SearchFailure>,
        elapsed: Duration,
    ) -> SearchResult {
        let (outcome, cost) = match outcome {
            Ok(Completion::Route { voxels, cost }) => {
                let mut path = Path::from_voxels(&voxels, self.volume.spacing().clone());
                if let Some(epsilon) = self.settings.simplify_epsilon {
                    path = path.simplified(epsilon);
                }
                (Ok(Some(path)), Some(cost))
            }
            Ok(Completion::Exhausted) => (Ok(None), None),
            Err(failure) => (Err(failure), None),
        };

        let mut result = SearchResult::new(outcome, elapsed);
        result.cost = cost;
        result.nodes_expanded = self.nodes_expanded();
        result.nodes_considered = self.nodes_considered();
        result.nodes_reopened = self.nodes_reopened();

        let state = match result.failure() {
            None => SearchState::Succeeded,
            Some(SearchFailure::Cancelled) => SearchState::Cancelled,
            Some(failure) => SearchState::Failed(failure.clone()),
        };
        info!(
            "[Search] {} after {:?}: {} expanded, {} considered",
            state, elapsed, result.nodes_expanded, result.nodes_considered
        );
        self.set_state(state);
        self.notify(|listener| listener.on_finished(&result));
        result
    }
}

fn broken_chain(coord: VoxelCoord) -> SearchFailure {
    SearchFailure::InternalError(format!("broken predecessor chain at {}", coord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Spacing;
    use crate::cost::{IntensityCost, IntensityMapping};
    use approx::assert_relative_eq;

    fn uniform(width: usize, height: usize, depth: usize, value: u8) -> Arc<VoxelVolume> {
        Arc::new(
            VoxelVolume::from_u8(
                width,
                height,
                depth,
                vec![value; width * height * depth],
                Spacing::uncalibrated(),
            )
            .unwrap(),
        )
    }

    fn reciprocal(volume: &Arc<VoxelVolume>) -> Arc<dyn CostModel> {
        Arc::new(IntensityCost::new(
            Arc::clone(volume),
            IntensityMapping::Reciprocal,
        ))
    }

    #[test]
    fn test_straight_line_on_uniform_image() {
        let volume = uniform(20, 5, 1, 255);
        let mut engine = SearchEngine::goal_directed(
            Arc::clone(&volume),
            reciprocal(&volume),
            VoxelCoord::planar(2, 2),
            VoxelCoord::planar(12, 2),
            SearchSettings::default(),
        )
        .unwrap();

        let result = engine.run();
        let path = result.path().unwrap();
        assert_eq!(path.len(), 11);
        assert!(path.is_connected());
        assert_relative_eq!(path.length(), 10.0);
        assert_relative_eq!(result.cost.unwrap(), 10.0 / 255.0, epsilon = 1e-12);
        assert_eq!(engine.state(), SearchState::Succeeded);
        assert_eq!(result.nodes_reopened, 0);
    }

    #[test]
    fn test_start_equals_goal() {
        let volume = uniform(4, 4, 4, 100);
        let anchor = VoxelCoord::new(1, 2, 3);
        let mut engine = SearchEngine::goal_directed(
            Arc::clone(&volume),
            reciprocal(&volume),
            anchor,
            anchor,
            SearchSettings::default(),
        )
        .unwrap();
        let result = engine.run();
        assert_eq!(result.path().unwrap().voxels(), vec![anchor]);
        assert_relative_eq!(result.cost.unwrap(), 0.0);
    }

    #[test]
    fn test_anchor_outside_volume_rejected() {
        let volume = uniform(4, 4, 1, 100);
        let result = SearchEngine::goal_directed(
            Arc::clone(&volume),
            reciprocal(&volume),
            VoxelCoord::planar(0, 0),
            VoxelCoord::planar(4, 0),
            SearchSettings::default(),
        );
        assert!(matches!(result, Err(TraceError::OutOfBounds(_))));
    }

    #[test]
    fn test_split_sides() {
        let volume = uniform(2, 2, 1, 1);
        let side = |d| Side {
            registry: NodeRegistry::allocate(d, volume.dimensions()).unwrap(),
            frontier: PriorityFrontier::new(),
            target: None,
        };
        let mut sides = vec![side(Direction::FromStart), side(Direction::FromGoal)];
        let (this, other) = split_sides(&mut sides, 1);
        assert_eq!(this.registry.direction(), Direction::FromGoal);
        assert_eq!(other.unwrap().registry.direction(), Direction::FromStart);

        let mut single = vec![side(Direction::FromStart)];
        let (_, other) = split_sides(&mut single, 0);
        assert!(other.is_none());
    }

    #[test]
    fn test_unidirectional_matches_bidirectional_cost() {
        let volume = uniform(15, 15, 3, 80);
        let start = VoxelCoord::new(1, 1, 0);
        let goal = VoxelCoord::new(13, 9, 2);
        let run = |settings: SearchSettings| {
            SearchEngine::goal_directed(
                Arc::clone(&volume),
                reciprocal(&volume),
                start,
                goal,
                settings,
            )
            .unwrap()
            .run()
        };
        let both = run(SearchSettings::default());
        let one = run(SearchSettings::default().unidirectional());
        assert_relative_eq!(both.cost.unwrap(), one.cost.unwrap(), epsilon = 1e-9);
    }
}
