use glam::{Quat, Vec3};
use labyrinth_common::{CellCoord, InputIntent};
use labyrinth_maze::Grid;

use crate::config::{ConfigError, MotionConfig};
use crate::player::{JumpStage, Player, world_to_cell};

/// What one motion tick did, for the world to turn into events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionOutcome {
    /// Cells entered this tick, in order.
    pub moved: Vec<CellCoord>,
    /// The player ended the tick within the win radius of the target.
    pub reached_target: bool,
    /// Total translation applied.
    pub delta: Vec3,
}

/// Advances a player through a grid: heading, translation with
/// axis-separated sliding collision, and the jump state machine.
#[derive(Debug, Clone)]
pub struct MotionResolver {
    config: MotionConfig,
}

impl MotionResolver {
    /// Fails when the tuning would let one step skip over a wall cell.
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    fn cell_of(&self, position: Vec3) -> CellCoord {
        world_to_cell(position, self.config.cell_size)
    }

    /// Advance `player` by `elapsed_ms` under `intent`.
    ///
    /// Negative or non-finite elapsed times count as zero. Translation is
    /// split into steps no longer than `max_step`, and a single tick never
    /// carries the player farther than the grid's half-perimeter.
    pub fn tick(
        &self,
        player: &mut Player,
        grid: &Grid,
        elapsed_ms: f32,
        intent: &InputIntent,
    ) -> MotionOutcome {
        let elapsed = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
        let _span = tracing::trace_span!("motion_tick", elapsed).entered();
        let cfg = &self.config;
        let mut outcome = MotionOutcome::default();

        if intent.rotate_left || intent.rotate_right {
            if intent.rotate_left {
                player.heading = Quat::from_rotation_y(cfg.turn_rate * elapsed) * player.heading;
            }
            if intent.rotate_right {
                player.heading = Quat::from_rotation_y(-cfg.turn_rate * elapsed) * player.heading;
            }
            // Keep rounding drift from shrinking or tilting the heading.
            player.heading =
                Vec3::new(player.heading.x, 0.0, player.heading.z).normalize_or(Vec3::X);
        }

        let travel = if intent.forward {
            Some((1.0, player.speed))
        } else if intent.backward {
            Some((-1.0, player.speed * cfg.backward_speed_scale))
        } else {
            None
        };

        if let Some((sign, speed)) = travel {
            let reach = (grid.width() + grid.height()) as f32 * cfg.cell_size;
            let distance = (speed / 1000.0 * elapsed).min(reach);
            let steps = (distance / cfg.max_step).ceil().max(1.0) as u32;
            let step = distance / steps as f32;

            for _ in 0..steps {
                let delta = self.resolve_step(player, grid, sign, step);
                if delta == Vec3::ZERO {
                    break;
                }
                player.position += delta;
                player.distance_walked += delta.length();
                outcome.delta += delta;

                let cell = self.cell_of(player.position);
                if player.last_cell != Some(cell) {
                    tracing::trace!(%cell, "player entered cell");
                    outcome.moved.push(cell);
                    player.last_cell = Some(cell);
                }
            }
        }

        let here = self.cell_of(player.position);
        outcome.reached_target = here.chebyshev(grid.target()) < cfg.win_radius;

        self.advance_jump(player, elapsed, intent.jump);
        outcome
    }

    /// Resolve one translation step of length `distance` along the signed
    /// heading into the delta actually applied.
    fn resolve_step(&self, player: &Player, grid: &Grid, sign: f32, distance: f32) -> Vec3 {
        let heading = player.heading * sign;
        let delta = heading * distance;
        if self.config.god_mode {
            return delta;
        }

        let position = player.position;
        let last = player.last_cell.unwrap_or_else(|| self.cell_of(position));
        let far = self.cell_of(position + heading * (distance + self.config.probe_margin));
        let lands = |d: Vec3| grid.is_open(self.cell_of(position + d));

        if grid.is_open(far) && lands(delta) {
            return delta;
        }

        // X-axis bound: the far row is open in the current column.
        if last.x != far.x && grid.is_open(CellCoord::new(last.x, far.y)) {
            let slide = Vec3::new(0.0, delta.y, delta.z);
            if lands(slide) {
                return slide;
            }
        }
        // Z-axis bound: the far column is open in the current row.
        if last.y != far.y && grid.is_open(CellCoord::new(far.x, last.y)) {
            let slide = Vec3::new(delta.x, delta.y, 0.0);
            if lands(slide) {
                return slide;
            }
        }
        Vec3::new(0.0, delta.y, 0.0)
    }

    fn advance_jump(&self, player: &mut Player, elapsed: f32, jump_held: bool) {
        let cfg = &self.config;
        let jump = &mut player.jump;

        if jump_held
            && jump.stage == JumpStage::Grounded
            && jump.since_finished_ms >= cfg.jump_cooldown_ms
        {
            jump.stage = JumpStage::Airborne;
            jump.since_started_ms = 0.0;
            player.speed += cfg.jump_speed_boost;
            tracing::trace!("jump started");
        }

        match jump.stage {
            JumpStage::Airborne => {
                jump.since_started_ms += elapsed;
                if jump.since_started_ms >= cfg.jump_duration_ms {
                    jump.stage = JumpStage::Grounded;
                    jump.offset = 0.0;
                    // Cooldown counts from the moment of landing.
                    jump.since_finished_ms = jump.since_started_ms - cfg.jump_duration_ms;
                    player.speed -= cfg.jump_speed_boost;
                } else {
                    let t = jump.since_started_ms / cfg.jump_duration_ms;
                    jump.offset = (t * std::f32::consts::PI).sin() * cfg.jump_height;
                }
            }
            JumpStage::Grounded => jump.since_finished_ms += elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_maze::generate_seeded;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn setup(seed: u64) -> (MotionResolver, Player, Grid) {
        let config = MotionConfig::default();
        let grid = generate_seeded(25, 25, seed).unwrap();
        let mut player = Player::new(&config);
        player.place_at(grid.start(), &config);
        (MotionResolver::new(config).unwrap(), player, grid)
    }

    fn face(player: &mut Player, dir: Vec3) {
        player.heading = dir.normalize();
    }

    /// Heading of the first open corridor leaving the start cell.
    fn open_direction(grid: &Grid) -> Vec3 {
        let s = grid.start();
        if grid.is_open(CellCoord::new(s.x + 1, s.y)) {
            Vec3::X
        } else {
            Vec3::Z
        }
    }

    #[test]
    fn rejects_step_longer_than_a_cell() {
        for max_step in [50.0, 0.0, f32::NAN] {
            let config = MotionConfig {
                max_step,
                ..MotionConfig::default()
            };
            assert!(MotionResolver::new(config).is_err(), "max_step {max_step}");
        }
    }

    #[test]
    fn edge_corridor_of_even_maze_is_not_left() {
        let config = MotionConfig::default();
        let resolver = MotionResolver::new(config.clone()).unwrap();
        let grid = generate_seeded(26, 26, 5).unwrap();
        // Even sizes carve the last column and row; past them is off-grid.
        for (cell, dir) in [
            (CellCoord::new(25, 1), Vec3::X),
            (CellCoord::new(1, 25), Vec3::Z),
            (CellCoord::new(25, 25), Vec3::new(1.0, 0.0, 1.0)),
        ] {
            assert!(grid.is_open(cell), "{cell} should be carved");
            let mut player = Player::new(&config);
            player.place_at(cell, &config);
            face(&mut player, dir);
            for _ in 0..100 {
                resolver.tick(&mut player, &grid, 50.0, &InputIntent::forward());
            }
            assert_eq!(world_to_cell(player.position(), 1.0), cell);
            assert!(player.position().x < 26.0 && player.position().z < 26.0);
        }
    }

    #[test]
    fn turning_is_time_proportional() {
        let (resolver, mut a, grid) = setup(1);
        let mut b = a.clone();
        face(&mut a, Vec3::X);
        face(&mut b, Vec3::X);

        resolver.tick(&mut a, &grid, 100.0, &InputIntent::turn_left());
        for _ in 0..10 {
            resolver.tick(&mut b, &grid, 10.0, &InputIntent::turn_left());
        }
        assert!((a.yaw() - 0.4).abs() < 1e-4);
        assert!((a.yaw() - b.yaw()).abs() < 1e-4);

        resolver.tick(&mut a, &grid, 100.0, &InputIntent::turn_right());
        assert!(a.yaw().abs() < 1e-4);
    }

    #[test]
    fn forward_moves_speed_times_time() {
        let (resolver, mut player, grid) = setup(2);
        face(&mut player, open_direction(&grid));
        let before = player.position();
        let out = resolver.tick(&mut player, &grid, 100.0, &InputIntent::forward());
        let moved = player.position() - before;
        assert!((moved.length() - 0.15).abs() < 1e-5);
        assert!((player.distance_walked() - 0.15).abs() < 1e-5);
        assert!((out.delta - moved).length() < 1e-5);
    }

    #[test]
    fn backward_is_slower() {
        let (resolver, mut player, grid) = setup(2);
        // Backing away from the open corridor walks into it.
        face(&mut player, -open_direction(&grid));
        let before = player.position();
        resolver.tick(&mut player, &grid, 100.0, &InputIntent::backward());
        let moved = (player.position() - before).length();
        assert!((moved - 0.15 * 0.8).abs() < 1e-5);
    }

    #[test]
    fn forward_wins_over_backward() {
        let (resolver, mut player, grid) = setup(2);
        let dir = open_direction(&grid);
        face(&mut player, dir);
        let before = player.position();
        let both = InputIntent {
            forward: true,
            backward: true,
            ..InputIntent::IDLE
        };
        resolver.tick(&mut player, &grid, 100.0, &both);
        assert!((player.position() - before).dot(dir) > 0.0);
    }

    #[test]
    fn walking_into_wall_stops_short() {
        let (resolver, mut player, grid) = setup(3);
        // (0, 1) is the outer wall.
        face(&mut player, -Vec3::X);
        for _ in 0..50 {
            resolver.tick(&mut player, &grid, 16.0, &InputIntent::forward());
        }
        assert_eq!(player.last_cell(), Some(grid.start()));
        // Stopped before the probe margin reaches the wall.
        assert!(player.position().x >= 1.0 + resolver.config().probe_margin - 1e-4);
    }

    #[test]
    fn diagonal_into_corridor_slides() {
        let (resolver, mut player, grid) = setup(4);
        let open = open_direction(&grid);
        // Aim half into the outer wall, half down the corridor.
        let into_wall = if open == Vec3::X { -Vec3::Z } else { -Vec3::X };
        face(&mut player, open + into_wall);
        let before = player.position();
        for _ in 0..60 {
            resolver.tick(&mut player, &grid, 16.0, &InputIntent::forward());
        }
        let moved = player.position() - before;
        assert!(moved.dot(open) > 0.5, "should slide along the corridor, moved {moved:?}");
        assert!(grid.is_open(world_to_cell(player.position(), 1.0)));
    }

    #[test]
    fn god_mode_ignores_walls() {
        let config = MotionConfig {
            god_mode: true,
            ..MotionConfig::default()
        };
        let grid = generate_seeded(25, 25, 3).unwrap();
        let mut player = Player::new(&config);
        player.place_at(grid.start(), &config);
        face(&mut player, -Vec3::X);
        let resolver = MotionResolver::new(config).unwrap();
        resolver.tick(&mut player, &grid, 2000.0, &InputIntent::forward());
        // Straight through the outer wall at x = 0 and off the grid.
        assert_eq!(world_to_cell(player.position(), 1.0), CellCoord::new(-1, 1));
    }

    #[test]
    fn no_wall_penetration_under_random_input() {
        for seed in 0..8 {
            let (resolver, mut player, grid) = setup(seed);
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..3000 {
                let intent = InputIntent {
                    rotate_left: rng.gen_bool(0.3),
                    rotate_right: rng.gen_bool(0.3),
                    forward: rng.gen_bool(0.6),
                    backward: rng.gen_bool(0.2),
                    jump: rng.gen_bool(0.05),
                };
                let elapsed = if rng.gen_bool(0.02) {
                    rng.gen_range(500.0..20_000.0)
                } else {
                    rng.gen_range(0.0..50.0)
                };
                resolver.tick(&mut player, &grid, elapsed, &intent);
                let cell = world_to_cell(player.position(), 1.0);
                assert!(grid.is_open(cell), "seed {seed}: player inside wall at {cell}");
                assert_eq!(player.last_cell(), Some(cell));
            }
        }
    }

    #[test]
    fn distance_never_decreases() {
        let (resolver, mut player, grid) = setup(5);
        let mut rng = StdRng::seed_from_u64(5);
        let mut last = player.distance_walked();
        for _ in 0..2000 {
            let intent = InputIntent {
                rotate_left: rng.gen_bool(0.2),
                forward: rng.gen_bool(0.7),
                ..InputIntent::IDLE
            };
            let before = player.position();
            let out = resolver.tick(&mut player, &grid, rng.gen_range(0.0..40.0), &intent);
            let d = player.distance_walked();
            assert!(d >= last);
            if out.delta == Vec3::ZERO {
                assert_eq!(d, last);
                assert_eq!(player.position(), before);
            }
            last = d;
        }
    }

    #[test]
    fn idle_tick_changes_nothing_but_timers() {
        let (resolver, mut player, grid) = setup(6);
        let before = player.clone();
        let out = resolver.tick(&mut player, &grid, 16.0, &InputIntent::IDLE);
        assert!(out.moved.is_empty());
        assert_eq!(player.position(), before.position());
        assert_eq!(player.heading(), before.heading());
    }

    #[test]
    fn bad_elapsed_counts_as_zero() {
        let (resolver, mut player, grid) = setup(6);
        face(&mut player, open_direction(&grid));
        let before = player.position();
        resolver.tick(&mut player, &grid, f32::NAN, &InputIntent::forward());
        resolver.tick(&mut player, &grid, -50.0, &InputIntent::forward());
        assert_eq!(player.position(), before);
    }

    #[test]
    fn jump_round_trip() {
        let (resolver, mut player, grid) = setup(7);
        let base_speed = player.speed();

        resolver.tick(&mut player, &grid, 0.0, &InputIntent::jump());
        assert_eq!(player.jump().stage, JumpStage::Airborne);
        assert!(player.speed() > base_speed);

        resolver.tick(&mut player, &grid, 500.0, &InputIntent::IDLE);
        assert_eq!(player.jump().stage, JumpStage::Grounded);
        assert!(player.jump_offset().abs() < 1e-6);
        assert_eq!(player.speed(), base_speed);
    }

    #[test]
    fn jump_peaks_mid_flight() {
        let (resolver, mut player, grid) = setup(7);
        resolver.tick(&mut player, &grid, 0.0, &InputIntent::jump());
        resolver.tick(&mut player, &grid, 250.0, &InputIntent::IDLE);
        assert!((player.jump_offset() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn jump_has_cooldown() {
        let (resolver, mut player, grid) = setup(8);
        resolver.tick(&mut player, &grid, 0.0, &InputIntent::jump());
        resolver.tick(&mut player, &grid, 500.0, &InputIntent::IDLE);
        assert_eq!(player.jump().stage, JumpStage::Grounded);

        // 100ms after landing: still cooling down.
        resolver.tick(&mut player, &grid, 100.0, &InputIntent::jump());
        assert_eq!(player.jump().stage, JumpStage::Grounded);

        resolver.tick(&mut player, &grid, 250.0, &InputIntent::IDLE);
        resolver.tick(&mut player, &grid, 0.0, &InputIntent::jump());
        assert_eq!(player.jump().stage, JumpStage::Airborne);
    }

    #[test]
    fn target_radius_is_reported() {
        let config = MotionConfig::default();
        let grid = generate_seeded(25, 25, 9).unwrap();
        let resolver = MotionResolver::new(config.clone()).unwrap();
        let mut player = Player::new(&config);

        player.place_at(grid.start(), &config);
        assert!(!resolver.tick(&mut player, &grid, 16.0, &InputIntent::IDLE).reached_target);

        player.place_at(grid.target(), &config);
        assert!(resolver.tick(&mut player, &grid, 16.0, &InputIntent::IDLE).reached_target);
    }
}
