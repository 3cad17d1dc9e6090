//! comparison — runs the reference VANET scenario twice, once per routing
//! mode, and reports the delivery metrics side by side.
//!
//! Scenario: a 1 km² grid with two urban roads, a suburban road, a highway,
//! three congested intersections, three signal-blocking buildings, four
//! roadside units, and 200 vehicles, simulated for 300 s in 100 ms ticks.
//! Both runs share the seed, so they see identical initial placements and
//! differ only in how links are scored and routed.

use std::path::Path;
use std::process::ExitCode;

use vanet_channel::Environment;
use vanet_core::{Point2, RoutingMode, SimRng};
use vanet_metrics::{comparison_rows, write_comparison_csv, MetricsCollector};
use vanet_sim::{SimConfig, Simulation};

// ── Scenario constants ────────────────────────────────────────────────────────

const SEED: u64 = 42;
const VEHICLE_COUNT: usize = 200;
const TOTAL_TICKS: u64 = 3_000;
const REPORT_INTERVAL_TICKS: u64 = 50;
const OUTPUT_CSV: &str = "vanet_comparison_results.csv";

/// Urban / suburban speed limit: 50 km/h.
const CITY_SPEED: f64 = 13.9;
/// Highway speed limit: 90 km/h.
const HIGHWAY_SPEED: f64 = 25.0;

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

// ── Scenario construction ─────────────────────────────────────────────────────

fn build_scenario(mode: RoutingMode) -> Simulation {
    let mut sim = Simulation::new(SimConfig::new(mode, SEED));

    // Road grid: two horizontal (urban, suburban), one vertical urban, one
    // vertical highway.
    sim.add_road(p(0.0, 250.0), p(1_000.0, 250.0), 2, CITY_SPEED, Environment::Urban);
    sim.add_road(p(0.0, 750.0), p(1_000.0, 750.0), 2, CITY_SPEED, Environment::Suburban);
    sim.add_road(p(250.0, 0.0), p(250.0, 1_000.0), 2, CITY_SPEED, Environment::Urban);
    sim.add_road(p(750.0, 0.0), p(750.0, 1_000.0), 2, HIGHWAY_SPEED, Environment::Highway);

    // Congested intersections.
    sim.add_congestion_zone(p(200.0, 200.0), p(300.0, 300.0), 0.8);
    sim.add_congestion_zone(p(700.0, 200.0), p(800.0, 300.0), 0.6);
    sim.add_congestion_zone(p(200.0, 700.0), p(300.0, 800.0), 0.5);

    // Roadside units at the intersections.
    sim.add_infrastructure("RSU1", p(250.0, 250.0), 300.0);
    sim.add_infrastructure("RSU2", p(750.0, 250.0), 300.0);
    sim.add_infrastructure("RSU3", p(250.0, 750.0), 300.0);
    sim.add_infrastructure("RSU4", p(750.0, 750.0), 300.0);

    // Buildings and a tree cluster.
    sim.add_obstacle(p(100.0, 100.0), p(200.0, 200.0), 0.8);
    sim.add_obstacle(p(600.0, 300.0), p(650.0, 400.0), 0.5);
    sim.add_obstacle(p(300.0, 600.0), p(400.0, 800.0), 0.3);

    place_vehicles(&mut sim);
    sim
}

/// Scatter vehicles along the road grid from a placement stream seeded
/// independently of the simulation's own RNG, so both runs start identical.
fn place_vehicles(sim: &mut Simulation) {
    use std::f64::consts::{FRAC_PI_2, PI};

    let mut rng = SimRng::new(SEED);
    for i in 0..VEHICLE_COUNT {
        let (pos, direction) = if rng.gen_bool(0.5) {
            // On a horizontal road, heading east or west.
            let y = if rng.gen_bool(0.5) { 250.0 } else { 750.0 };
            let x = rng.gen_range(0.0..1_000.0);
            let dir = if rng.gen_bool(0.5) { 0.0 } else { PI };
            (p(x, y), dir)
        } else {
            // On a vertical road, heading north or south.
            let x = if rng.gen_bool(0.5) { 250.0 } else { 750.0 };
            let y = rng.gen_range(0.0..1_000.0);
            let dir = if rng.gen_bool(0.5) { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 };
            (p(x, y), dir)
        };
        // 8–16 m/s (30–60 km/h).
        let speed = rng.gen_range(8.0..16.0);
        sim.add_vehicle(format!("V{i}"), pos, direction, speed);
    }
}

// ── Run one mode ──────────────────────────────────────────────────────────────

fn run(mode: RoutingMode) -> MetricsCollector {
    let label = match mode {
        RoutingMode::Learned => "learned",
        RoutingMode::Baseline => "baseline",
    };
    log::info!("running {TOTAL_TICKS}-tick simulation with {label} routing");

    let mut sim = build_scenario(mode);
    let mut metrics = MetricsCollector::new(sim.config().tick_ms);

    for tick in 1..=TOTAL_TICKS {
        sim.tick(&mut metrics);
        if tick % REPORT_INTERVAL_TICKS == 0 {
            let stats = sim.network_stats();
            log::info!(
                "[{label}] t={:>6} ms  delivered {}/{} queue {} links {} avg quality {:.3}",
                stats.sim_time_ms,
                metrics.total_delivered(),
                metrics.total_sent(),
                stats.queue_size,
                stats.total_links,
                stats.avg_link_quality,
            );
        }
    }

    metrics
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn print_comparison(learned: &MetricsCollector, baseline: &MetricsCollector) {
    println!();
    println!("==== VANET performance comparison ====");
    println!("{:<32} | {:>12} | {:>12} | {:>10}", "metric", "learned", "baseline", "improvement");
    println!("{}", "-".repeat(76));
    for row in comparison_rows(learned, baseline) {
        println!(
            "{:<32} | {:>12.2} | {:>12.2} | {:>+9.2}%",
            row.metric, row.learned, row.baseline, row.improvement_pct,
        );
    }
    println!(
        "{:<32} | {:>12.2} | {:>12.2} |",
        "link quality improvement (%)",
        learned.link_quality_improvement_pct(),
        baseline.link_quality_improvement_pct(),
    );
    println!(
        "{:<32} | {:>12} | {:>12} |",
        "model updates",
        learned.model_updates(),
        baseline.model_updates(),
    );
}

fn main() -> ExitCode {
    env_logger::init();

    let learned = run(RoutingMode::Learned);
    let baseline = run(RoutingMode::Baseline);

    print_comparison(&learned, &baseline);

    match write_comparison_csv(Path::new(OUTPUT_CSV), &learned, &baseline) {
        Ok(()) => {
            println!("\nresults saved to {OUTPUT_CSV}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error saving results: {e}");
            ExitCode::FAILURE
        }
    }
}
