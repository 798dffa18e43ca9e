//! Body registry and the per-frame propagation loop.
//!
//! Each frame the loop converts the simulated epoch to a Julian Date,
//! propagates every tracked body, and pushes positions and trail endpoints to
//! the render surface. A body whose elements fail to propagate is excluded
//! from that frame; the rest of the registry is unaffected.

use std::collections::BTreeMap;
use std::fmt;

use bevy::color::Color;
use bevy::log::{debug, info, warn};

use crate::catalog::{CatalogEntry, ElementSource};
use crate::ephemeris::{OrbitalElements, StateVector, propagate_detailed};
use crate::surface::RenderSurface;
use crate::time::{DEFAULT_RATE_SCALE, SimulationClock, WallClock};
use crate::trail::{TrailBuffer, TrailHistory};
use crate::types::{current_unix_ms, julian_date_to_date_string, julian_date_to_unix_ms};

/// Registry key of a tracked body. Allocated in increasing order, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Catalog classification of a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Planet,
    Asteroid,
    Comet,
}

/// A tracked body: its elements plus the per-frame state derived from them.
#[derive(Clone, Debug)]
pub struct Body {
    id: BodyId,
    name: String,
    kind: BodyKind,
    color: Color,
    elements: OrbitalElements,
    trail: TrailBuffer,
    history: Option<TrailHistory>,
    /// Last successfully propagated state
    last_state: Option<StateVector>,
    /// Failed to propagate on the most recent frame
    excluded: bool,
    /// A non-converged root-find was already reported
    warned_unconverged: bool,
}

impl Body {
    fn new(id: BodyId, entry: CatalogEntry, history_capacity: usize) -> Self {
        Self {
            id,
            name: entry.name,
            kind: entry.kind,
            color: entry.color,
            elements: entry.elements,
            trail: TrailBuffer::default(),
            history: (history_capacity > 0).then(|| TrailHistory::with_capacity(history_capacity)),
            last_state: None,
            excluded: false,
            warned_unconverged: false,
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Replace the elements, e.g. after a catalog refresh.
    ///
    /// The trail restarts so no streak joins the old orbit to the new one.
    pub fn set_elements(&mut self, elements: OrbitalElements) {
        self.elements = elements;
        self.trail.clear();
        if let Some(history) = &mut self.history {
            history.clear();
        }
        self.warned_unconverged = false;
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// Bounded position history, when enabled for the session.
    pub fn history(&self) -> Option<&TrailHistory> {
        self.history.as_ref()
    }

    pub fn last_state(&self) -> Option<&StateVector> {
        self.last_state.as_ref()
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    fn record(&mut self, state: StateVector) {
        self.trail.push(state.position);
        if let Some(history) = &mut self.history {
            history.push(state.position);
        }
        self.last_state = Some(state);
    }
}

/// Tracked bodies keyed by [`BodyId`], iterated in insertion order.
#[derive(Clone, Debug, Default)]
pub struct BodyRegistry {
    bodies: BTreeMap<BodyId, Body>,
    next_id: u32,
}

impl BodyRegistry {
    /// Track a new body; `history_capacity` of 0 keeps only the two-point trail.
    pub fn insert(&mut self, entry: CatalogEntry, history_capacity: usize) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, Body::new(id, entry, history_capacity));
        id
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.iter().find(|body| body.name == name).map(|body| body.id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Startup parameters of a propagation session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Initial simulated epoch as Unix milliseconds
    pub start_epoch_ms: f64,
    /// Simulated seconds per real second
    pub rate_scale: f64,
    pub start_paused: bool,
    /// Positions kept per body for path drawing; 0 keeps the two-point trail only
    pub trail_history: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_epoch_ms: current_unix_ms(),
            rate_scale: DEFAULT_RATE_SCALE,
            start_paused: false,
            trail_history: 0,
        }
    }
}

impl SessionConfig {
    pub fn with_start_epoch_ms(mut self, epoch_ms: f64) -> Self {
        self.start_epoch_ms = epoch_ms;
        self
    }

    /// Start at a Julian Date instead of a Unix time.
    pub fn at_julian_date(self, jd: f64) -> Self {
        self.with_start_epoch_ms(julian_date_to_unix_ms(jd))
    }

    pub fn with_rate_scale(mut self, rate_scale: f64) -> Self {
        self.rate_scale = rate_scale;
        self
    }

    pub fn with_start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    pub fn with_trail_history(mut self, capacity: usize) -> Self {
        self.trail_history = capacity;
        self
    }
}

/// Outcome of one propagation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Epoch every body was propagated to
    pub epoch_jd: f64,
    /// Bodies whose position was written this frame
    pub updated: usize,
    /// Bodies skipped because their elements failed to propagate
    pub excluded: Vec<BodyId>,
    /// Bodies written with a root-find that hit its iteration cap
    pub unconverged: Vec<BodyId>,
}

/// One visualization session: registry, clock, element source and render surface.
pub struct PropagationLoop<S: RenderSurface> {
    registry: BodyRegistry,
    clock: SimulationClock,
    surface: S,
    source: Option<Box<dyn ElementSource>>,
    trail_history: usize,
}

impl<S: RenderSurface> PropagationLoop<S> {
    /// A session whose clock reads real time from `wall` on every [`Self::tick`].
    pub fn new(config: &SessionConfig, surface: S, wall: impl WallClock + 'static) -> Self {
        Self::with_clock(
            config,
            surface,
            SimulationClock::new(config.start_epoch_ms, wall),
        )
    }

    /// A session whose host supplies frame deltas through [`Self::step`].
    pub fn host_driven(config: &SessionConfig, surface: S) -> Self {
        Self::with_clock(
            config,
            surface,
            SimulationClock::host_driven(config.start_epoch_ms),
        )
    }

    fn with_clock(config: &SessionConfig, surface: S, mut clock: SimulationClock) -> Self {
        clock.set_rate_scale(config.rate_scale);
        if config.start_paused {
            clock.set_paused(true);
        }
        info!(
            "Session starting at {}",
            julian_date_to_date_string(clock.epoch_jd())
        );
        Self {
            registry: BodyRegistry::default(),
            clock,
            surface,
            source: None,
            trail_history: config.trail_history,
        }
    }

    /// Attach an element source polled at the start of every tick.
    pub fn with_source(mut self, source: impl ElementSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BodyRegistry {
        &mut self.registry
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Start tracking a body. It is propagated from the next pass on.
    pub fn add_body(&mut self, entry: CatalogEntry) -> BodyId {
        let id = self.registry.insert(entry, self.trail_history);
        if let Some(body) = self.registry.get(id) {
            debug!("Tracking {} as {}", body.name, id);
            self.surface.body_added(body);
        }
        id
    }

    /// Stop tracking a body. Other bodies are untouched.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let body = self.registry.remove(id)?;
        debug!("Stopped tracking {} ({})", body.name, id);
        self.surface.body_removed(id);
        Some(body)
    }

    /// Pull newly available entries from the element source.
    ///
    /// Returns how many bodies were added.
    pub fn ingest(&mut self) -> usize {
        let entries = match self.source.as_mut() {
            Some(source) => source.poll(),
            None => return 0,
        };
        let added = entries.len();
        for entry in entries {
            self.add_body(entry);
        }
        if added > 0 {
            info!("Added {} bodies ({} tracked)", added, self.registry.len());
        }
        added
    }

    /// One animation frame: ingest, advance the clock, propagate everything.
    pub fn tick(&mut self) -> FrameReport {
        self.ingest();
        self.clock.tick();
        let epoch_jd = self.clock.epoch_jd();
        self.propagate_all(epoch_jd)
    }

    /// Like [`Self::tick`], with the real frame delta supplied by the caller.
    pub fn step(&mut self, real_delta_seconds: f64) -> FrameReport {
        self.ingest();
        self.clock.advance(real_delta_seconds);
        let epoch_jd = self.clock.epoch_jd();
        self.propagate_all(epoch_jd)
    }

    /// Propagate every body to `epoch_jd` and write the results to the surface.
    ///
    /// Does not touch the clock.
    pub fn propagate_all(&mut self, epoch_jd: f64) -> FrameReport {
        let mut report = FrameReport {
            epoch_jd,
            ..Default::default()
        };

        for body in self.registry.bodies.values_mut() {
            let id = body.id;
            match propagate_detailed(&body.elements, epoch_jd) {
                Ok(propagation) => {
                    if body.excluded {
                        info!("{} propagates again, restoring it", body.name);
                        body.excluded = false;
                    }
                    if !propagation.anomaly.converged {
                        report.unconverged.push(id);
                        if !body.warned_unconverged {
                            warn!(
                                "{}: {:?} anomaly did not converge after {} iterations (residual {:e})",
                                body.name,
                                propagation.regime,
                                propagation.anomaly.iterations,
                                propagation.anomaly.residual
                            );
                            body.warned_unconverged = true;
                        }
                    }

                    body.record(propagation.state);
                    self.surface.update_position(id, propagation.state.position);
                    self.surface.update_trail(id, &body.trail);
                    report.updated += 1;
                }
                Err(err) => {
                    if !body.excluded {
                        warn!("Excluding {} from propagation: {}", body.name, err);
                        body.excluded = true;
                    }
                    report.excluded.push(id);
                }
            }
        }

        report
    }
}
