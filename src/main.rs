//! Bounded headless demo
//!
//! Builds a small level in the built-in physics world, derives contacts from
//! simple overlap tests, nudges the ball with a seeded RNG and runs the level
//! at a fixed timestep until the player would see the level-complete overlay.
//!
//! Usage: `bounded [settings.json] [seed]`. The default seed finishes the
//! level, so a plain run doubles as a smoke test.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bounded::consts::*;
use bounded::render::DrawList;
use bounded::sim::{
    Arrow, Ball, BallMode, BlackHole, BodyDesc, BodyHistory, Boundaries, CompletionChoice, ContactKind, ContactReport,
    Fan, FrameInput, GumCloud, Key, Laser, LevelContext, LevelError, LevelEvents, LevelSession,
    Magnet, PhysicsWorld, Placement, Portal, SimpleWorld, Teleporter, Wall, WallsHistory,
};
use bounded::{LevelLocks, LevelSettings};

/// Half extents of the playfield; leaving it counts as a death
const FIELD: Vec2 = Vec2::new(20.0, 12.0);
/// Give up after this many simulated seconds
const MAX_SECS: f32 = 120.0;
/// Nudge seed that reaches the level-complete overlay; other seeds may not
/// finish within `MAX_SECS`
const DEFAULT_SEED: u64 = 0xB0_0D_ED;

/// Demo instance holding all collaborators
struct Game {
    world: SimpleWorld,
    contacts: ContactReport,
    history: WallsHistory,
    session: LevelSession,
    events: LevelEvents,
    rng: Pcg32,
    accumulator: f32,
    frames: u64,
    resets: u32,
}

impl Game {
    fn new(settings: LevelSettings, seed: u64) -> Self {
        let mut game = Self {
            world: SimpleWorld::default(),
            contacts: ContactReport::new(),
            history: WallsHistory::new(),
            session: LevelSession::new(1, LevelLocks::new(10)),
            events: LevelEvents::new(settings),
            rng: Pcg32::seed_from_u64(seed),
            accumulator: 0.0,
            frames: 0,
            resets: 0,
        };
        game.build_level();
        game
    }

    fn sensor(&mut self, pos: Vec2, size: Vec2, angle: f32) -> Placement {
        let body = self.world.create_body(BodyDesc::sensor(pos));
        Placement::new(body, pos, size, angle)
    }

    fn build_level(&mut self) {
        let spawn = Vec2::ZERO;
        let ball = self.world.create_body(BodyDesc::dynamic(spawn));
        self.history.track(ball);
        if let Some(body) = self.world.body_mut(ball) {
            body.vel = Vec2::new(3.0, 0.0);
        }
        self.events.register_ball(Ball::new(ball, spawn, BALL_RADIUS));

        let p = self.sensor(Vec2::new(2.5, 0.0), Vec2::splat(1.0), 0.0);
        self.events.register_arrow(Arrow::new(p));

        let key_pos = Vec2::new(6.0, 0.0);
        let key = self.world.create_body(BodyDesc::sensor(key_pos));
        self.history.track(key);
        self.events.register_key(Key::new(key, key_pos));

        let p = self.sensor(Vec2::new(9.0, 0.0), Vec2::splat(2.0), 0.0);
        self.events.register_gum_cloud(GumCloud::new(p));

        let p = self.sensor(Vec2::new(14.0, 0.0), Vec2::splat(1.5), 0.0);
        self.events.register_portal(Portal::new(p));

        let p = self.sensor(Vec2::new(4.0, 4.0), Vec2::splat(3.0), 0.0);
        self.events.register_black_hole(BlackHole::new(p));

        let p = self.sensor(Vec2::new(8.0, -4.0), Vec2::splat(2.0), std::f32::consts::FRAC_PI_2);
        self.events.register_fan(Fan::new(p));

        let p = self.sensor(Vec2::new(12.0, 3.0), Vec2::splat(2.0), 0.0);
        self.events.register_magnet(Magnet::new(p));

        let a = self.sensor(Vec2::new(-4.0, 6.0), Vec2::splat(1.0), 0.0);
        let b = self.sensor(Vec2::new(10.0, 0.5), Vec2::splat(1.0), 0.0);
        self.events.register_teleporter(Teleporter::new(a, 1, 2));
        self.events.register_teleporter(Teleporter::new(b, 2, 1));

        let p = self.sensor(Vec2::new(6.0, -8.0), Vec2::new(8.0, 0.3), 0.0);
        self.events.register_laser(Laser::new(p));

        for x in [-10.0, 0.0, 10.0] {
            let body = self.world.create_body(BodyDesc::fixed(Vec2::new(x, -10.0), 0.0));
            self.history.track(body);
            self.events
                .register_wall(Wall::new(Placement::new(body, Vec2::new(x, -10.0), Vec2::new(6.0, 0.5), 0.0)));
        }

        let frame = self.world.create_body(BodyDesc::fixed(Vec2::ZERO, 0.0));
        self.events
            .register_boundaries(Boundaries::new(Placement::new(frame, Vec2::ZERO, FIELD * 2.0, 0.0)));
    }

    /// Overlap-based stand-in for the physics backend's contact listener
    fn detect_contacts(&mut self) {
        self.contacts.clear();
        let registry = self.events.registry();
        let Some(ball) = registry.ball() else {
            return;
        };
        let Some(pos) = self.world.body(ball.body).map(|b| b.pos) else {
            return;
        };
        let overlaps = |p: &Placement| pos.distance(p.position) < p.size.max_element() / 2.0 + BALL_RADIUS;

        for arrow in registry.arrows() {
            if overlaps(&arrow.placement) {
                self.contacts.begin(ContactKind::Arrow, arrow.placement.body);
            }
        }
        for hole in registry.black_holes() {
            if overlaps(&hole.placement) {
                self.contacts.begin(ContactKind::BlackHole, hole.placement.body);
            }
            if pos.distance(hole.placement.position) < hole.placement.size.x * 0.1 {
                self.contacts.begin(ContactKind::BlackHoleCenter, hole.placement.body);
            }
        }
        for fan in registry.fans() {
            if overlaps(&fan.placement) {
                self.contacts.begin(ContactKind::Fan, fan.placement.body);
            }
        }
        for magnet in registry.magnets() {
            if overlaps(&magnet.placement) {
                self.contacts.begin(ContactKind::Magnet, magnet.placement.body);
            }
        }
        for cloud in registry.gum_clouds() {
            if overlaps(&cloud.placement) {
                self.contacts.begin(ContactKind::GumCloud, cloud.placement.body);
            }
        }
        for laser in registry.lasers() {
            if overlaps(&laser.placement) {
                self.contacts.begin(ContactKind::Laser, laser.placement.body);
            }
        }
        // Only report a teleporter while the ball is not still materializing
        if ball.mode() == BallMode::Normal {
            for pad in registry.teleporters() {
                if overlaps(&pad.placement) {
                    self.contacts.begin(ContactKind::Teleporter, pad.placement.body);
                }
            }
        }
        if let Some(key) = registry.key() {
            if !key.is_collected() && pos.distance(key.original_position) < KEY_RADIUS + BALL_RADIUS {
                self.contacts.begin(ContactKind::Key, key.body);
            }
        }
        if let Some(portal) = registry.portal() {
            if overlaps(&portal.placement) {
                self.contacts.begin(ContactKind::Portal, portal.placement.body);
            }
        }
    }

    /// Random sideways nudge about once a second
    fn nudge(&mut self) {
        let Some(id) = self.events.ball().map(|b| b.body) else {
            return;
        };
        if self.rng.random_bool(f64::from(SIM_DT)) {
            let kick = Vec2::new(self.rng.random_range(-1.0..1.0), self.rng.random_range(-1.0..1.0));
            if let Some(body) = self.world.body_mut(id) {
                body.apply_force(kick * 60.0);
            }
        }
    }

    /// Out of the field: the owning level state resets the ball
    fn check_out_of_bounds(&mut self) -> Result<(), LevelError> {
        let Some(id) = self.events.ball().map(|b| b.body) else {
            return Ok(());
        };
        let out = self
            .world
            .body(id)
            .is_some_and(|b| b.pos.x.abs() > FIELD.x || b.pos.y.abs() > FIELD.y);
        if out && !self.events.is_level_completed() {
            let mut ctx = LevelContext {
                physics: &mut self.world,
                contacts: &self.contacts,
                history: &mut self.history,
                session: &mut self.session,
            };
            self.events.reset_ball(&mut ctx)?;
            self.resets += 1;
            // Relaunch toward the goal
            if let Some(body) = self.world.body_mut(id) {
                body.vel = Vec2::new(3.0, 0.0);
            }
        }
        Ok(())
    }

    /// Run simulation substeps for one frame, then draw
    fn frame(&mut self, dt: f32, batch: &mut DrawList) -> Result<Option<CompletionChoice>, LevelError> {
        self.accumulator += dt.min(0.1);
        let mut substeps = 0;
        let mut choice = None;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.nudge();
            self.world.step(SIM_DT);
            self.detect_contacts();
            self.check_out_of_bounds()?;

            // The demo player accepts as soon as the overlay takes input
            let input = FrameInput {
                confirm: self.events.is_level_completed(),
                ..Default::default()
            };
            let mut ctx = LevelContext {
                physics: &mut self.world,
                contacts: &self.contacts,
                history: &mut self.history,
                session: &mut self.session,
            };
            choice = choice.or(self.events.update(&mut ctx, SIM_DT, &input)?);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        batch.clear();
        let mut ctx = LevelContext {
            physics: &mut self.world,
            contacts: &self.contacts,
            history: &mut self.history,
            session: &mut self.session,
        };
        self.events.render(&mut ctx, batch)?;
        self.events.render_overlay(batch);
        self.frames += 1;
        Ok(choice)
    }
}

fn run(settings: LevelSettings, seed: u64) -> Result<(), LevelError> {
    let mut game = Game::new(settings, seed);
    let mut batch = DrawList::new();
    let frame_dt = 1.0 / 60.0;
    let mut elapsed = 0.0;

    while elapsed < MAX_SECS {
        if let Some(choice) = game.frame(frame_dt, &mut batch)? {
            log::info!(
                "Level {} finished after {:.1}s ({} frames, {} resets): {:?}",
                game.session.level,
                elapsed,
                game.frames,
                game.resets,
                choice
            );
            log::info!(
                "Ball last seen at {:?}; {} of {} levels unlocked",
                game.session.destroyed_position(),
                game.session.locks.unlocked_count(),
                game.session.locks.len()
            );
            return Ok(());
        }
        log::trace!("Frame {}: {} sprites", game.frames, batch.len());
        elapsed += frame_dt;
    }

    log::warn!(
        "Level {} not finished after {}s ({} resets)",
        game.session.level,
        MAX_SECS,
        game.resets
    );
    Ok(())
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Bounded (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => LevelSettings::load(path),
        None => LevelSettings::default(),
    };
    let seed = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    if let Err(e) = run(settings, seed) {
        log::error!("Level aborted: {}", e);
        std::process::exit(1);
    }
}
