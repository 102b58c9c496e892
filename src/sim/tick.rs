//! Per-frame simulation tick
//!
//! Core game loop: input, physics, spawning, scoring, difficulty, collisions.

use glam::Vec2;
use rand::Rng;

use super::collision::boundary_contact;
use super::state::{
    Brick, GameEvent, GameOverCause, GamePhase, GameState, PowerUp, PowerUpKind,
};
use crate::consts::*;

/// Logical actions for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_down: bool,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        !(self.jump || self.move_left || self.move_right || self.move_down)
    }
}

/// Advance the game state by one frame of `dt` seconds.
///
/// Does nothing outside [`GamePhase::Playing`]. Events for this frame are left
/// in `state.events`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if !state.is_playing() {
        return;
    }

    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid frame delta {dt}");
        0.0
    };

    apply_input(state, input);

    // Physics
    let slowmo = state.slowmo_active();
    state.ball.update(dt, slowmo);
    if slowmo {
        state.slowmo_timer -= FRAME_RATE * dt;
    }

    spawn_bricks(state, dt);
    spawn_powerups(state, dt);
    advance_entities(state, dt, slowmo);
    update_difficulty(state);
    resolve_collisions(state);
}

/// Forward decoded actions to the ball
fn apply_input(state: &mut GameState, input: &TickInput) {
    let ball = &mut state.ball;
    if input.jump {
        ball.jump();
    }
    if input.move_left {
        ball.move_left();
    }
    if input.move_right {
        ball.move_right();
    }
    if input.move_down {
        ball.move_down();
    }
}

fn spawn_bricks(state: &mut GameState, dt: f32) {
    state.brick_spawn_timer += dt;
    if state.brick_spawn_timer < state.tuning.brick_spawn_interval(state.score) {
        return;
    }
    state.brick_spawn_timer = 0.0;

    let max_x = (SCREEN_WIDTH - BRICK_WIDTH) as u32;
    let x = state.rng.random_range(0..=max_x) as f32;
    let speed = state.tuning.brick_speed(state.score);
    let id = state.next_entity_id();
    state.bricks.push(Brick::new(id, Vec2::new(x, SPAWN_Y), speed));
    state.events.push(GameEvent::BrickSpawned { id });
    log::debug!("Spawned brick {id} at x={x} speed={speed}");
}

/// Roll for a power-up every interval. The timer resets whether or not the roll succeeds.
fn spawn_powerups(state: &mut GameState, dt: f32) {
    state.powerup_spawn_timer += dt;
    if state.powerup_spawn_timer < state.tuning.powerup_interval {
        return;
    }
    state.powerup_spawn_timer = 0.0;

    if !state.rng.random_bool(state.tuning.powerup_chance) {
        return;
    }

    let min_x = POWERUP_SPAWN_MARGIN as u32;
    let max_x = (SCREEN_WIDTH - POWERUP_SPAWN_MARGIN) as u32;
    let x = state.rng.random_range(min_x..=max_x) as f32;
    let kind = PowerUpKind::random(&mut state.rng);
    let id = state.next_entity_id();
    state.powerups.push(PowerUp::new(id, kind, Vec2::new(x, SPAWN_Y)));
    state.events.push(GameEvent::PowerUpSpawned { id, kind });
    log::debug!("Spawned {kind:?} power-up {id} at x={x}");
}

/// Move falling entities and drop the ones that left the screen
fn advance_entities(state: &mut GameState, dt: f32, slowmo: bool) {
    let despawn_y = state.tuning.despawn_y;
    let brick_score = state.tuning.brick_score;

    for brick in &mut state.bricks {
        brick.update(dt, slowmo);
    }
    state.bricks.retain(|brick| {
        if brick.pos.y < despawn_y {
            state.score += brick_score;
            state.events.push(GameEvent::BrickCleared { id: brick.id });
            false
        } else {
            true
        }
    });

    for powerup in &mut state.powerups {
        powerup.update(dt, slowmo);
    }
    state.powerups.retain(|p| p.pos.y >= despawn_y);
}

fn update_difficulty(state: &mut GameState) {
    let old_level = state.level;
    state.level = state.tuning.level_for_score(state.score);

    if state.level > old_level {
        state.ball.change_color(&mut state.rng);
        state.background = BACKGROUND_PALETTE[state.rng.random_range(0..BACKGROUND_PALETTE.len())];
        state.events.push(GameEvent::LevelUp { level: state.level });
        log::info!("Level {} reached at score {}", state.level, state.score);
    }
}

/// Bricks, then power-ups, then screen edges. A brick hit ends the tick.
fn resolve_collisions(state: &mut GameState) {
    if state.bricks.iter().any(|brick| brick.collides_with(&state.ball)) {
        end_game(state, GameOverCause::Brick);
        return;
    }

    let mut collected = Vec::new();
    let ball = &state.ball;
    state.powerups.retain(|p| {
        if p.collides_with(ball) {
            collected.push((p.id, p.kind));
            false
        } else {
            true
        }
    });
    for (id, kind) in collected {
        match kind {
            PowerUpKind::Invisible => state.ball.make_invisible(state.tuning.effect_duration),
            PowerUpKind::SlowMo => state.slowmo_timer = state.tuning.effect_duration,
        }
        state.events.push(GameEvent::PowerUpCollected { id, kind });
        log::debug!("Collected {kind:?} power-up {id}");
    }

    if let Some(edge) = boundary_contact(state.ball.pos, state.ball.radius) {
        log::debug!("Ball touched {edge:?} edge");
        end_game(state, GameOverCause::Boundary);
    }
}

fn end_game(state: &mut GameState, cause: GameOverCause) {
    state.phase = GamePhase::GameOver(cause);
    state.events.push(GameEvent::GameOver { cause });
    log::info!("Game over ({cause:?}) with score {}", state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Playing state whose ball cannot be killed by bricks and never sees power-ups
    fn ghost_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start().expect("start");
        state.ball.make_invisible(1.0e9);
        state.powerup_spawn_timer = -1.0e6;
        state
    }

    fn run(state: &mut GameState, frames: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            tick(state, &TickInput::default(), FRAME_DT);
            events.extend(state.events.iter().copied());
        }
        events
    }

    #[test]
    fn test_tick_does_nothing_outside_playing() {
        let mut state = GameState::new(1);
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(state.brick_spawn_timer, 0.0);

        state.phase = GamePhase::GameOver(GameOverCause::Brick);
        tick(&mut state, &input, 10.0);
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert!(state.bricks.is_empty());
    }

    #[test]
    fn test_input_jump_applies_before_physics() {
        let mut state = GameState::new(2);
        state.start().expect("start");
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert!((state.ball.vel.y - (-11.6)).abs() < 1e-5);
        assert!((state.ball.pos.y - (300.0 - 11.6)).abs() < 1e-4);
        assert!(state.is_playing());
    }

    #[test]
    fn test_invalid_dt_is_clamped() {
        let mut state = ghost_state(3);
        let id = state.next_entity_id();
        state.bricks.push(Brick::new(id, Vec2::new(100.0, 400.0), 2.0));

        tick(&mut state, &TickInput::default(), -1.0);
        assert_eq!(state.brick_spawn_timer, 0.0);
        assert_eq!(state.bricks[0].pos.y, 400.0);

        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.brick_spawn_timer, 0.0);
        assert_eq!(state.bricks[0].pos.y, 400.0);
    }

    #[test]
    fn test_fallen_brick_scores() {
        let mut state = ghost_state(4);
        let id = state.next_entity_id();
        state.bricks.push(Brick::new(id, Vec2::new(0.0, SPAWN_Y), 2.0));

        // (620 - (-50)) / 2 frames to reach the despawn line, one more to pass it
        run(&mut state, 335);
        assert_eq!(state.score, 0);
        assert!(state.bricks.iter().any(|b| b.id == id));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.score, 10);
        assert!(!state.bricks.iter().any(|b| b.id == id));
        assert!(state.events.contains(&GameEvent::BrickCleared { id }));
    }

    #[test]
    fn test_fallen_powerup_is_removed_without_score() {
        let mut state = ghost_state(18);
        let id = state.next_entity_id();
        state
            .powerups
            .push(PowerUp::new(id, PowerUpKind::SlowMo, Vec2::new(40.0, -48.0)));

        // -48 -> -50 stays, -50 -> -52 drops
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.powerups.len(), 1);
        let events = run(&mut state, 1);

        assert!(state.powerups.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.slowmo_timer, 0.0);
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::BrickCleared { .. } | GameEvent::PowerUpCollected { .. }
        )));
    }

    #[test]
    fn test_brick_spawn_cadence_and_speed() {
        let mut state = ghost_state(5);
        let events = run(&mut state, 62);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
        let brick = &state.bricks[0];
        assert!((brick.speed - 2.0).abs() < 1e-6);
        assert!(brick.pos.x >= 0.0 && brick.pos.x <= SCREEN_WIDTH - BRICK_WIDTH);
        assert_eq!(brick.pos.x.fract(), 0.0);

        let mut state = ghost_state(6);
        state.score = 250;
        state.level = state.tuning.level_for_score(250);
        // Hard mode: (1.0 - 0.5) / 2 = 0.25 s between bricks
        let events = run(&mut state, 16);
        assert!(events.iter().any(|e| matches!(e, GameEvent::BrickSpawned { .. })));
        assert!((state.bricks[0].speed - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_powerup_roll_cadence() {
        let tuning = Tuning {
            powerup_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_rng(Pcg32::seed_from_u64(7), tuning).expect("valid tuning");
        state.start().expect("start");
        state.ball.make_invisible(1.0e9);

        let events = run(&mut state, 290);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PowerUpSpawned { .. })));
        let events = run(&mut state, 20);
        let spawned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PowerUpSpawned { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(spawned.len(), 1);
        assert!(state.powerup_spawn_timer < 1.0);

        // A failed roll still resets the timer
        let tuning = Tuning {
            powerup_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_rng(Pcg32::seed_from_u64(7), tuning).expect("valid tuning");
        state.start().expect("start");
        state.ball.make_invisible(1.0e9);
        let events = run(&mut state, 610);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PowerUpSpawned { .. })));
        assert!(state.powerup_spawn_timer < 1.0);
    }

    #[test]
    fn test_invisible_powerup_lasts_300_frames() {
        let mut state = ghost_state(8);
        state.ball = crate::sim::Ball::new(Vec2::new(200.0, 300.0));
        let id = state.next_entity_id();
        state
            .powerups
            .push(PowerUp::new(id, PowerUpKind::Invisible, Vec2::new(200.0, 302.0)));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.powerups.is_empty());
        assert!(state.ball.invisible);
        assert_eq!(state.ball.invisible_timer, 300.0);
        assert!(state.events.contains(&GameEvent::PowerUpCollected {
            id,
            kind: PowerUpKind::Invisible
        }));

        run(&mut state, 299);
        assert!(state.ball.invisible);
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(!state.ball.invisible);
    }

    #[test]
    fn test_slowmo_powerup_slows_falling() {
        let mut state = ghost_state(9);
        let ball_pos = state.ball.pos;
        let id = state.next_entity_id();
        state
            .powerups
            .push(PowerUp::new(id, PowerUpKind::SlowMo, ball_pos + Vec2::new(0.0, 2.0)));
        let brick_id = state.next_entity_id();
        state.bricks.push(Brick::new(brick_id, Vec2::new(0.0, 500.0), 2.0));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.slowmo_timer, 300.0);
        assert_eq!(state.status_text(), "INVISIBLE! SLOW MOTION! ");
        let y = state.bricks[0].pos.y;

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!((y - state.bricks[0].pos.y - 2.0 * SLOWMO_FACTOR).abs() < 1e-4);
        assert!((state.slowmo_timer - 299.0).abs() < 1e-4);
    }

    #[test]
    fn test_multiple_powerups_in_one_tick() {
        let mut state = ghost_state(10);
        state.ball = crate::sim::Ball::new(Vec2::new(200.0, 300.0));
        for kind in [PowerUpKind::Invisible, PowerUpKind::SlowMo] {
            let id = state.next_entity_id();
            state.powerups.push(PowerUp::new(id, kind, Vec2::new(205.0, 300.0)));
        }
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.powerups.is_empty());
        assert!(state.ball.invisible);
        assert_eq!(state.slowmo_timer, 300.0);
    }

    #[test]
    fn test_brick_kills_only_visible_ball() {
        let mut state = GameState::new(11);
        state.start().expect("start");
        state.ball.make_invisible(300.0);
        let id = state.next_entity_id();
        state.bricks.push(Brick::new(id, Vec2::new(180.0, 290.0), 2.0));
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(state.is_playing());

        let mut state = GameState::new(11);
        state.start().expect("start");
        let id = state.next_entity_id();
        state.bricks.push(Brick::new(id, Vec2::new(180.0, 290.0), 2.0));
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.phase, GamePhase::GameOver(GameOverCause::Brick));
    }

    #[test]
    fn test_brick_hit_wins_over_boundary() {
        let mut state = GameState::new(12);
        state.start().expect("start");
        state.ball.pos = Vec2::new(BALL_RADIUS, 300.0);
        let id = state.next_entity_id();
        state.bricks.push(Brick::new(id, Vec2::new(0.0, 290.0), 2.0));
        // A power-up in reach is not collected once a brick has hit
        let pid = state.next_entity_id();
        state
            .powerups
            .push(PowerUp::new(pid, PowerUpKind::SlowMo, Vec2::new(BALL_RADIUS, 305.0)));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.phase, GamePhase::GameOver(GameOverCause::Brick));
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::GameOver {
                cause: GameOverCause::Brick
            })
        );
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.slowmo_timer, 0.0);
    }

    #[test]
    fn test_side_wall_ends_game() {
        let mut state = GameState::new(13);
        state.start().expect("start");
        state.ball.pos = Vec2::new(BALL_RADIUS + 2.0, 300.0);
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.phase, GamePhase::GameOver(GameOverCause::Boundary));

        // Frozen until restart
        let pos = state.ball.pos;
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.ball.pos, pos);
        state.restart().expect("restart");
        assert!(state.is_playing());
    }

    #[test]
    fn test_bottom_edge_ends_game() {
        let mut state = GameState::new(14);
        state.start().expect("start");
        state.ball.pos = Vec2::new(200.0, 20.0);
        state.ball.vel = Vec2::new(0.0, -10.0);
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.phase, GamePhase::GameOver(GameOverCause::Boundary));
    }

    #[test]
    fn test_ball_at_top_clamp_survives() {
        let mut state = ghost_state(15);
        run(&mut state, 120);
        assert_eq!(state.ball.pos.y, SCREEN_HEIGHT - BALL_RADIUS);
        assert!(state.is_playing());
    }

    #[test]
    fn test_level_up_event() {
        let mut state = ghost_state(16);
        state.score = 100;
        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.level, 2);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 2 }));
        assert!(BACKGROUND_PALETTE.contains(&state.background));
        assert!(BALL_PALETTE.contains(&state.ball.color));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        for state in [&mut state1, &mut state2] {
            state.start().expect("start");
            state.ball.make_invisible(1.0e9);
        }

        let inputs = [
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for frame in 0..900 {
            let input = &inputs[frame % inputs.len()];
            tick(&mut state1, input, FRAME_DT);
            tick(&mut state2, input, FRAME_DT);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.bricks.len(), state2.bricks.len());
        assert_eq!(state1.powerups.len(), state2.powerups.len());
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.phase, state2.phase);
    }

    proptest! {
        #[test]
        fn prop_level_tracks_score(score in 0u32..5000, frames in 1usize..30) {
            let mut state = ghost_state(17);
            state.score = score;
            for _ in 0..frames {
                tick(&mut state, &TickInput::default(), FRAME_DT);
                prop_assert_eq!(state.level, 1 + state.score / 100);
            }
        }
    }
}
