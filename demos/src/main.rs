//! Headless hide-and-seek run.
//!
//! Usage: `hideout [scenario.toml]`. Without an argument the built-in
//! scenario is used. The agent is stepped frame by frame with the hide
//! behaviour driving it, then the map is printed with the agent's trail.

mod scenario;

use std::collections::HashSet;
use std::time::Duration;

use anyhow::anyhow;
use hideout_ai::{AgentState, HideAgent, HideController, HideSpotSelector};
use hideout_core::{ObstacleSet, Point, Vec3};
use hideout_paths::Grid;

use scenario::Scenario;

fn main() -> anyhow::Result<()> {
    fast_log::init(
        fast_log::config::Config::new()
            .console()
            .level(log::LevelFilter::Info),
    )
    .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    let scenario = match std::env::args().nth(1) {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    let (grid, obstacles) = scenario.build()?;
    log::info!(
        "grid {}x{} (cell {}), {} obstacles",
        grid.width(),
        grid.height(),
        grid.cell_size(),
        obstacles.len()
    );

    let trail = run(&scenario, &grid, &obstacles);
    print!("{}", render(&scenario, &grid, &obstacles, &trail));

    log::logger().flush();
    Ok(())
}

/// Step the agent through every frame and return the cells it stood on.
fn run(scenario: &Scenario, grid: &Grid, obstacles: &ObstacleSet) -> Vec<Point> {
    let config = scenario.agent;
    let mut ctl = HideController::new(HideAgent::new(scenario.start, config));
    let frame = Duration::from_millis(scenario.frame_ms);

    let mut pos = scenario.start;
    let mut state = AgentState::Idle;
    let mut trail = vec![grid.node(grid.node_from_world_point(pos)).pos()];
    let mut dt = Duration::ZERO;

    for _ in 0..scenario.frames {
        if let Some(target) = ctl.frame(grid, obstacles, dt, pos, scenario.threat) {
            pos = pos.move_towards(target, config.speed * dt.as_secs_f32());
        }
        dt = frame;

        let cell = grid.node(grid.node_from_world_point(pos)).pos();
        if trail.last() != Some(&cell) {
            trail.push(cell);
        }
        let now = ctl.agent().state();
        if now != state {
            log::info!("{:?}: {:?} -> {:?} at {}", ctl.now(), state, now, pos);
            state = now;
        }
    }

    let hidden = HideSpotSelector::new(grid, obstacles).is_hidden(pos, scenario.threat);
    log::info!(
        "finished at {} after {:?}: {}",
        pos,
        ctl.now(),
        if hidden { "hidden" } else { "exposed" }
    );
    trail
}

fn render(scenario: &Scenario, grid: &Grid, obstacles: &ObstacleSet, trail: &[Point]) -> String {
    let cell_of = |v: Vec3| grid.node(grid.node_from_world_point(v)).pos();
    let threat = cell_of(scenario.threat);
    let start = cell_of(scenario.start);
    let end = trail.last().copied().unwrap_or(start);
    let walked: HashSet<Point> = trail.iter().copied().collect();
    let spots: HashSet<Point> = HideSpotSelector::new(grid, obstacles)
        .hidden_nodes(scenario.threat, scenario.start)
        .into_iter()
        .map(|id| grid.node(id).pos())
        .collect();

    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = Point::new(x, y);
            let walkable = grid
                .node_at(p)
                .is_some_and(|id| grid.node(id).is_walkable());
            let c = if p == threat {
                'T'
            } else if p == end {
                'A'
            } else if p == start {
                'S'
            } else if !walkable {
                '#'
            } else if walked.contains(&p) {
                'o'
            } else if spots.contains(&p) {
                '+'
            } else {
                '.'
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
