//! The `Simulation` struct and its tick loop.

use rustc_hash::FxHashSet;

use vanet_core::{Message, MessageId, MessageKind, NodeId, Point2, SimClock, SimRng};

use vanet_channel::{ChannelModel, CongestionZone, Environment, Obstacle};
use vanet_learn::{LinkQualityEstimator, TrainingSample, FEATURE_COUNT};
use vanet_net::{
    node::relative_speed, DensityIndex, Node, NodeStore, Road, RoadMap, TopologyEngine,
};
use vanet_routing::{find_path, policy_for};

use crate::delivery::DeliveryContext;
use crate::{Delivery, MetricsSink, SimConfig};

/// Minimum batch size before a training cycle runs.
const MIN_TRAINING_SAMPLES: usize = 10;

/// EMA factor blending a fresh prediction into a link's quality.
const QUALITY_SMOOTHING: f64 = 0.3;

/// Normalisation constants for estimator features.
const DURATION_NORM_SECS: f64 = 60.0;
const SPEED_NORM: f64 = 30.0;

// ── NetworkStats ──────────────────────────────────────────────────────────────

/// Read-only snapshot of the network's state, for reporting layers.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkStats {
    pub vehicle_count: usize,
    pub infrastructure_count: usize,
    pub queue_size: usize,
    pub delivered_count: usize,
    pub sim_time_ms: u64,
    pub avg_link_quality: f64,
    pub total_links: usize,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One complete simulation context: nodes, environment, estimator, queue,
/// clock, and the single RNG stream.
///
/// Two contexts run side by side for a learned-vs-baseline comparison; each
/// owns all of its state, so their streams never interleave.
pub struct Simulation {
    config: SimConfig,
    clock: SimClock,
    rng: SimRng,

    nodes: NodeStore,
    roads: RoadMap,
    obstacles: Vec<Obstacle>,
    zones: Vec<CongestionZone>,

    topology: TopologyEngine,
    estimator: LinkQualityEstimator,

    /// FIFO queue of undelivered messages, drained in priority order each
    /// tick.
    queue: Vec<Message>,

    /// Ids of terminally handled messages.  Grows for the lifetime of the
    /// run — an accepted trade-off for bounded-duration simulations.
    delivered: FxHashSet<MessageId>,

    next_message_id: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let mut rng = SimRng::new(config.seed);
        let estimator = LinkQualityEstimator::new(config.learning_rate, &mut rng);
        Self {
            clock: config.make_clock(),
            config,
            rng,
            nodes: NodeStore::new(),
            roads: RoadMap::new(),
            obstacles: Vec::new(),
            zones: Vec::new(),
            topology: TopologyEngine::new(ChannelModel::new()),
            estimator,
            queue: Vec::new(),
            delivered: FxHashSet::default(),
            next_message_id: 0,
        }
    }

    // ── Setup mutators (not called mid-run) ───────────────────────────────

    /// Add a vehicle with the three standard applications.  Uses the
    /// configured default transmission range.
    pub fn add_vehicle(
        &mut self,
        id: impl Into<NodeId>,
        pos: Point2,
        direction: f64,
        speed: f64,
    ) -> NodeId {
        let node = Node::vehicle(id.into(), pos, direction, speed, self.config.transmission_range);
        self.nodes.insert(node)
    }

    /// Add a fixed roadside unit with its own transmission range.
    pub fn add_infrastructure(&mut self, id: impl Into<NodeId>, pos: Point2, range: f64) -> NodeId {
        self.nodes.insert(Node::infrastructure(id.into(), pos, range))
    }

    /// Add a road segment with its speed limit (m/s) and environment class.
    pub fn add_road(
        &mut self,
        start: Point2,
        end: Point2,
        lanes: u8,
        speed_limit: f64,
        environment: Environment,
    ) {
        self.roads.add(Road::new(start, end, lanes, speed_limit, environment));
    }

    /// Add a congestion zone with a network load factor in [0, 1].
    pub fn add_congestion_zone(&mut self, a: Point2, b: Point2, load: f64) {
        self.zones.push(CongestionZone::new(a, b, load));
    }

    /// Add an obstacle with a signal attenuation factor in [0, 1].
    pub fn add_obstacle(&mut self, a: Point2, b: Point2, attenuation: f64) {
        self.obstacles.push(Obstacle::new(a, b, attenuation));
    }

    /// Remove a node mid-run.  Queued messages from or to it are silently
    /// dropped the next time the queue is drained — an expected consequence
    /// of dynamic topology, not a fault.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        self.nodes.remove(id).is_some()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only snapshot of the network state.
    pub fn network_stats(&self) -> NetworkStats {
        NetworkStats {
            vehicle_count: self.nodes.vehicle_count(),
            infrastructure_count: self.nodes.infrastructure_count(),
            queue_size: self.queue.len(),
            delivered_count: self.delivered.len(),
            sim_time_ms: self.clock.now_ms(),
            avg_link_quality: self.nodes.average_link_quality(),
            total_links: self.nodes.total_links(),
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the simulation by one tick, reporting events to `sink`.
    pub fn tick<M: MetricsSink>(&mut self, sink: &mut M) {
        self.clock.advance();

        self.advance_vehicles();
        self.generate_messages(sink);

        let density = self.topology.rebuild(
            &mut self.nodes,
            &self.roads,
            &self.obstacles,
            &self.zones,
            self.config.mode,
            &mut self.rng,
        );

        self.process_queue(&density, sink);

        if self.config.mode.is_learned()
            && self.clock.current_tick.0 % self.config.train_interval_ticks == 0
        {
            self.train_estimator(sink);
        }

        sink.on_link_quality(self.nodes.average_link_quality());
    }

    /// Run exactly `n` ticks.
    pub fn run_ticks<M: MetricsSink>(&mut self, n: u64, sink: &mut M) {
        for _ in 0..n {
            self.tick(sink);
        }
    }

    // ── Phase ①: movement ─────────────────────────────────────────────────

    fn advance_vehicles(&mut self) {
        let dt = self.clock.tick_secs();
        let (width, height) = (self.config.width, self.config.height);
        let roads = &self.roads;
        for node in self.nodes.iter_mut() {
            if !node.is_vehicle() {
                continue;
            }
            if let Some(road) = roads.nearest_road(node.pos) {
                node.align_to_road(road);
                node.clamp_speed(road.speed_limit);
            }
            node.advance(dt);
            node.wrap_within(width, height);
        }
    }

    // ── Phase ②: traffic generation ───────────────────────────────────────

    fn generate_messages<M: MetricsSink>(&mut self, sink: &mut M) {
        let now_ms = self.clock.now_ms();
        let now = self.clock.current_tick;
        let vehicle_ids = self.nodes.vehicle_ids();

        for vid in &vehicle_ids {
            let due_kinds = self.due_applications(vid, now_ms);
            for kind in due_kinds {
                let destination = self.pick_destination(kind, vid, &vehicle_ids);
                let message = Message {
                    id: self.next_id(),
                    source: vid.clone(),
                    destination,
                    kind,
                    size: kind.payload_size(),
                    created: now,
                };
                sink.on_message_sent(kind, message.size);
                self.queue.push(message);
            }
        }
    }

    /// Kinds whose application interval has elapsed for this vehicle; marks
    /// them sent.
    fn due_applications(&mut self, vehicle: &NodeId, now_ms: u64) -> Vec<MessageKind> {
        let Some(node) = self.nodes.get_mut(vehicle) else {
            return Vec::new();
        };
        let vanet_net::NodeKind::Vehicle { apps, .. } = &mut node.kind else {
            return Vec::new();
        };
        let mut due = Vec::new();
        for app in apps {
            if app.due(now_ms) {
                app.mark_sent(now_ms);
                due.push(app.kind);
            }
        }
        due
    }

    /// Safety broadcasts; telemetry targets the nearest roadside unit;
    /// infotainment a uniformly random other vehicle.  A missing target
    /// leaves the destination empty, which falls back to selective
    /// broadcast at delivery time.
    fn pick_destination(
        &mut self,
        kind: MessageKind,
        source: &NodeId,
        vehicle_ids: &[NodeId],
    ) -> Option<NodeId> {
        match kind {
            MessageKind::Safety => None,
            MessageKind::Telemetry => {
                let pos = self.nodes.get(source)?.pos;
                self.nodes.nearest_infrastructure(pos)
            }
            MessageKind::Infotainment => {
                let others: Vec<&NodeId> =
                    vehicle_ids.iter().filter(|id| *id != source).collect();
                self.rng.choose(&others).map(|id| (*id).clone())
            }
        }
    }

    fn next_id(&mut self) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        id
    }

    // ── Phase ④: queue drain ──────────────────────────────────────────────

    fn process_queue<M: MetricsSink>(&mut self, density: &DensityIndex, sink: &mut M) {
        let now = self.clock.current_tick;
        let mut pending = std::mem::take(&mut self.queue);
        // Stable sort: priority classes transmit first, FIFO within a class.
        pending.sort_by_key(|m| m.kind.priority());

        let mut keep = Vec::new();
        for message in pending {
            if self.delivered.contains(&message.id) {
                continue;
            }
            if !self.nodes.contains(&message.source) {
                continue; // source vanished: drop silently
            }

            let ctx = DeliveryContext {
                nodes: &self.nodes,
                zones: &self.zones,
                density,
            };

            match &message.destination {
                None => {
                    // Destination-less messages are terminal this tick
                    // whether or not any neighbor received them.
                    let outcome = if message.kind == MessageKind::Safety {
                        ctx.broadcast(&message, &message.source, &mut self.rng, sink)
                    } else {
                        ctx.selective_broadcast(&message, &message.source, &mut self.rng, sink)
                    };
                    self.delivered.insert(message.id);
                    if outcome.delivered {
                        sink.on_message_delivered(
                            message.kind,
                            message.created,
                            now,
                            outcome.hops,
                            message.size,
                        );
                    }
                }
                Some(destination) => {
                    if !self.nodes.contains(destination) {
                        continue; // destination vanished: drop silently
                    }
                    let path = find_path(
                        &self.nodes,
                        &message.source,
                        destination,
                        policy_for(self.config.mode),
                        message.kind,
                    );
                    if path.len() < 2 {
                        keep.push(message); // no route yet: stay queued
                        continue;
                    }

                    let outcome: Delivery = ctx.unicast(&message, &path, &mut self.rng, sink);
                    if outcome.delivered {
                        self.delivered.insert(message.id);
                        sink.on_message_delivered(
                            message.kind,
                            message.created,
                            now,
                            outcome.hops,
                            message.size,
                        );
                    } else if outcome.path_broken {
                        sink.on_path_break();
                        sink.on_route_recomputation();
                        keep.push(message); // re-route next tick
                    } else {
                        // Lost in transit: terminal, no retry.
                        self.delivered.insert(message.id);
                    }
                }
            }
        }
        self.queue = keep;
    }

    // ── Phase ⑤: training ─────────────────────────────────────────────────

    fn train_estimator<M: MetricsSink>(&mut self, sink: &mut M) {
        let samples = self.collect_samples();
        if samples.len() < MIN_TRAINING_SAMPLES {
            return;
        }

        self.estimator.train_on_batch(&samples);
        self.refresh_link_qualities();
        sink.on_model_update();
        log::debug!(
            "tick {}: trained estimator on {} link samples",
            self.clock.current_tick,
            samples.len()
        );
    }

    /// One sample per vehicle → neighbor link, rewarding the link's current
    /// quality.
    fn collect_samples(&self) -> Vec<TrainingSample> {
        let mut samples = Vec::new();
        for vehicle in self.nodes.vehicles() {
            for (neighbor_id, link) in &vehicle.links {
                let Some(neighbor) = self.nodes.get(neighbor_id) else {
                    continue;
                };
                samples.push(TrainingSample {
                    features: link_features(
                        link.reliability,
                        link.duration_secs,
                        relative_speed(vehicle, neighbor),
                        vehicle.speed(),
                    ),
                    reward: link.quality,
                });
            }
        }
        samples
    }

    /// Blend each vehicle link's quality toward the freshly trained
    /// prediction (EMA, so one noisy batch cannot overwrite the score).
    fn refresh_link_qualities(&mut self) {
        // Snapshot the kinematics first: prediction needs the neighbor's
        // state while the link map is being mutated.
        let mut updates: Vec<(NodeId, NodeId, f64)> = Vec::new();
        for vehicle in self.nodes.vehicles() {
            for (neighbor_id, link) in &vehicle.links {
                let Some(neighbor) = self.nodes.get(neighbor_id) else {
                    continue;
                };
                let features = link_features(
                    link.reliability,
                    link.duration_secs,
                    relative_speed(vehicle, neighbor),
                    vehicle.speed(),
                );
                let predicted = self.estimator.predict4(features);
                let blended =
                    QUALITY_SMOOTHING * predicted + (1.0 - QUALITY_SMOOTHING) * link.quality;
                updates.push((vehicle.id.clone(), neighbor_id.clone(), blended));
            }
        }
        for (vehicle, neighbor, quality) in updates {
            if let Some(node) = self.nodes.get_mut(&vehicle) {
                if let Some(link) = node.links.get_mut(&neighbor) {
                    link.quality = quality;
                }
            }
        }
    }
}

/// Estimator feature vector for one link observation.
///
/// Duration is capped at the 60 s normalisation window so the unbounded
/// roadside-unit links stay finite.
fn link_features(
    reliability: f64,
    duration_secs: f64,
    relative_speed: f64,
    own_speed: f64,
) -> [f64; FEATURE_COUNT] {
    [
        reliability,
        duration_secs.min(DURATION_NORM_SECS) / DURATION_NORM_SECS,
        relative_speed / SPEED_NORM,
        own_speed / SPEED_NORM,
    ]
}
