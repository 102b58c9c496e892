//! Tap Ball entry point
//!
//! Runs a headless session: a seeded autopilot taps the screen at
//! 60 Hz until the run ends, then the final snapshot is logged as JSON.
//!
//! Usage: `tap-ball [tuning.json] [seed]`

mod headless {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use tap_ball::Tuning;
    use tap_ball::consts::*;
    use tap_ball::platform::{TouchZones, touch_to_input};
    use tap_ball::sim::{GameEvent, GameState, tick};

    /// Two minutes of play
    const MAX_FRAMES: u32 = 60 * 120;
    /// How far above the ball a brick counts as a threat
    const THREAT_RANGE: f32 = 90.0;

    /// Pick a touch for this frame, if any
    fn autopilot(state: &GameState, rng: &mut Pcg32) -> Option<Vec2> {
        let ball = &state.ball;
        if ball.invisible {
            return None;
        }

        let threat = state.bricks.iter().find(|b| {
            let above = b.pos.y > ball.pos.y && b.pos.y - ball.pos.y < THREAT_RANGE;
            let reach = ball.radius * 2.0;
            let aligned = b.pos.x < ball.pos.x + reach && b.pos.x + b.size.x > ball.pos.x - reach;
            above && aligned
        })?;

        // Step away from the brick center, but never into a wall
        let brick_center = threat.pos.x + threat.size.x / 2.0;
        let go_left = brick_center > ball.pos.x && ball.pos.x > SCREEN_WIDTH * 0.25;
        let x = if go_left { 50.0 } else { 350.0 };
        Some(Vec2::new(x, rng.random_range(200.0..500.0)))
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = match args.next() {
            Some(seed) => seed.parse::<u64>()?,
            None => 0x7a9_ba11,
        };

        let mut state = GameState::with_rng(Pcg32::seed_from_u64(seed), tuning)?;
        let mut pilot_rng = Pcg32::seed_from_u64(seed ^ 0xa070);
        let zones = TouchZones::default();
        state.start()?;
        log::info!("Session started with seed: {}", seed);

        let mut frames = 0;
        let mut collected = 0;
        while state.is_playing() && frames < MAX_FRAMES {
            let input = autopilot(&state, &mut pilot_rng)
                .map(|touch| touch_to_input(touch, &zones))
                .unwrap_or_default();
            if !input.is_empty() {
                log::trace!("Frame {frames}: {input:?}");
            }
            tick(&mut state, &input, FRAME_DT);
            collected += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::PowerUpCollected { .. }))
                .count();
            frames += 1;
        }

        log::info!(
            "Session ended after {:.1}s: score {}, level {}, {} power-ups",
            frames as f32 * FRAME_DT,
            state.score,
            state.level,
            collected
        );
        log::info!("{}", serde_json::to_string(&state.snapshot())?);
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tap Ball (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
