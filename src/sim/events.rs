//! Per-frame level event coordination
//!
//! [`LevelEvents`] owns every level entity and runs the fixed per-frame
//! pipeline: one update rule per entity kind in a fixed order, then draw in
//! painter's order. Completion (ball reaches an open portal) and ball resets
//! are driven from here too.

use glam::Vec2;

use super::ball::Ball;
use super::body::{Body, BodyId, PhysicsWorld};
use super::contact::{ContactKind, ContactListener};
use super::entities::{
    Arrow, BlackHole, Boundaries, Fan, GumCloud, Key, Laser, Magnet, Portal, Teleporter, Wall,
};
use super::error::LevelError;
use super::history::BodyHistory;
use super::overlay::{CompletionChoice, FrameInput, LevelComplete};
use super::registry::{EntityHandle, EntityKind, EntityRegistry};
use super::session::LevelSession;
use crate::render::RenderBatch;
use crate::settings::LevelSettings;

/// Collaborators borrowed for one `update`/`render`/`reset_ball` call
pub struct LevelContext<'a> {
    pub physics: &'a mut dyn PhysicsWorld,
    pub contacts: &'a dyn ContactListener,
    pub history: &'a mut dyn BodyHistory,
    pub session: &'a mut LevelSession,
}

impl LevelContext<'_> {
    fn body(&self, id: BodyId) -> Result<&Body, LevelError> {
        self.physics.body(id).ok_or(LevelError::MissingBody(id))
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, LevelError> {
        self.physics.body_mut(id).ok_or(LevelError::MissingBody(id))
    }
}

/// Illegal mode transitions requested by contact rules are dropped, not fatal
fn tolerate(result: Result<(), LevelError>) -> Result<bool, LevelError> {
    match result {
        Ok(()) => Ok(true),
        Err(e @ LevelError::IllegalTransition { .. }) => {
            log::debug!("Ignored: {}", e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Level event handler: entity owner, frame coordinator, completion/reset
#[derive(Debug)]
pub struct LevelEvents {
    registry: EntityRegistry,
    settings: LevelSettings,
    level_complete: LevelComplete,
    level_completed: bool,
}

impl LevelEvents {
    pub fn new(settings: LevelSettings) -> Self {
        Self {
            registry: EntityRegistry::new(),
            level_complete: LevelComplete::new(settings.overlay_input_delay),
            settings,
            level_completed: false,
        }
    }

    // === Registration ===

    pub fn register_arrow(&mut self, arrow: Arrow) -> EntityHandle {
        self.registry.register_arrow(arrow)
    }

    pub fn register_ball(&mut self, ball: Ball) {
        self.registry.register_ball(ball);
    }

    pub fn register_black_hole(&mut self, black_hole: BlackHole) -> EntityHandle {
        self.registry.register_black_hole(black_hole)
    }

    pub fn register_boundaries(&mut self, boundaries: Boundaries) {
        self.registry.register_boundaries(boundaries);
    }

    pub fn register_fan(&mut self, fan: Fan) -> EntityHandle {
        self.registry.register_fan(fan)
    }

    pub fn register_gum_cloud(&mut self, gum_cloud: GumCloud) {
        self.registry.register_gum_cloud(gum_cloud);
    }

    pub fn register_key(&mut self, key: Key) {
        self.registry.register_key(key);
    }

    pub fn register_magnet(&mut self, magnet: Magnet) -> EntityHandle {
        self.registry.register_magnet(magnet)
    }

    pub fn register_portal(&mut self, portal: Portal) {
        self.registry.register_portal(portal);
    }

    pub fn register_teleporter(&mut self, teleporter: Teleporter) -> EntityHandle {
        self.registry.register_teleporter(teleporter)
    }

    pub fn register_wall(&mut self, wall: Wall) {
        self.registry.register_wall(wall);
    }

    pub fn register_laser(&mut self, laser: Laser) {
        self.registry.register_laser(laser);
    }

    // === Accessors ===

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &LevelSettings {
        &self.settings
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.registry.ball()
    }

    pub fn is_level_completed(&self) -> bool {
        self.level_completed
    }

    pub fn level_complete(&self) -> &LevelComplete {
        &self.level_complete
    }

    fn ball_id(&self) -> Result<BodyId, LevelError> {
        self.registry
            .ball
            .as_ref()
            .map(|b| b.body)
            .ok_or(LevelError::NotRegistered("ball"))
    }

    /// Registration indices of `kind` entities the ball is touching.
    /// Skips the lookup entirely when nothing of that kind is touched.
    fn touched(&self, contacts: &dyn ContactListener, contact: ContactKind, kind: EntityKind) -> Vec<usize> {
        if !contacts.is_touching(contact) {
            return Vec::new();
        }
        self.registry.correlate(kind, contacts.touching(contact))
    }

    // === Frame ===

    /// Advance the level by one frame.
    ///
    /// Returns the player's choice once the level-complete overlay is up.
    pub fn update(
        &mut self,
        ctx: &mut LevelContext<'_>,
        dt: f32,
        input: &FrameInput,
    ) -> Result<Option<CompletionChoice>, LevelError> {
        self.registry
            .ball
            .as_mut()
            .ok_or(LevelError::NotRegistered("ball"))?
            .update(dt);
        if self.registry.key.is_some() {
            self.key_update(ctx);
        }
        self.arrow_update(ctx)?;
        self.black_hole_update(ctx, dt)?;
        self.fan_update(ctx, dt)?;
        self.gum_cloud_update(ctx)?;
        self.magnet_update(ctx, dt)?;
        self.portal_update(dt)?;
        self.teleporter_update(ctx)?;
        self.laser_update(ctx)?;
        Ok(self.level_complete.handle_input(dt, input))
    }

    /// Draw the level in painter's order
    pub fn render(&mut self, ctx: &mut LevelContext<'_>, batch: &mut dyn RenderBatch) -> Result<(), LevelError> {
        self.ball_render(ctx, batch)?;
        for arrow in &self.registry.arrows {
            arrow.render(batch);
        }
        for black_hole in &self.registry.black_holes {
            black_hole.render(batch);
        }
        for gum_cloud in &self.registry.gum_clouds {
            gum_cloud.render(batch);
        }
        if let Some(key) = &self.registry.key {
            key.render(batch);
        }
        for magnet in &self.registry.magnets {
            magnet.render(batch);
        }
        self.registry
            .portal
            .as_ref()
            .ok_or(LevelError::NotRegistered("portal"))?
            .render(batch);
        for wall in &self.registry.walls {
            wall.render(batch);
        }
        for teleporter in &self.registry.teleporters {
            teleporter.render(batch);
        }
        for fan in &self.registry.fans {
            fan.render(batch);
        }
        self.registry
            .boundaries
            .as_ref()
            .ok_or(LevelError::NotRegistered("boundaries"))?
            .render(batch);
        for laser in &self.registry.lasers {
            laser.render(batch);
        }
        Ok(())
    }

    /// Draw the level-complete overlay (no-op while dormant)
    pub fn render_overlay(&self, batch: &mut dyn RenderBatch) {
        let center = self
            .registry
            .boundaries
            .as_ref()
            .map_or(Vec2::ZERO, |b| b.placement.position);
        self.level_complete.render(center, batch);
    }

    // === Update rules ===

    fn key_update(&mut self, ctx: &mut LevelContext<'_>) {
        let Some(key) = self.registry.key.as_mut() else {
            return;
        };
        if ctx.contacts.is_touching(ContactKind::Key) && key.collect() {
            log::debug!("Key collected");
            ctx.history.remove_body(key.body);
            ctx.physics.destroy_body(key.body);
        }
    }

    fn arrow_update(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), LevelError> {
        let contacts = ctx.contacts;
        let hits = self.touched(contacts, ContactKind::Arrow, EntityKind::Arrow);
        if hits.is_empty() {
            return Ok(());
        }
        let ball = ctx.body_mut(self.ball_id()?)?;
        for i in hits {
            self.registry.arrows[i].update(ball, self.settings.arrow_boost);
        }
        Ok(())
    }

    fn black_hole_update(&mut self, ctx: &mut LevelContext<'_>, dt: f32) -> Result<(), LevelError> {
        // Animation runs regardless of contact
        for black_hole in &mut self.registry.black_holes {
            black_hole.update(dt);
        }

        let contacts = ctx.contacts;
        let hits = self.touched(contacts, ContactKind::BlackHole, EntityKind::BlackHole);
        for (i, black_hole) in self.registry.black_holes.iter_mut().enumerate() {
            black_hole.set_active(hits.binary_search(&i).is_ok());
        }

        // Center zone swallows the ball: back to the start, no pull
        if contacts.is_touching(ContactKind::BlackHoleCenter) {
            tolerate(self.reset_ball(ctx))?;
            return Ok(());
        }
        if hits.is_empty() {
            return Ok(());
        }
        let ball = ctx.body_mut(self.ball_id()?)?;
        for i in hits {
            self.registry.black_holes[i].pull(ball, self.settings.black_hole_pull);
        }
        Ok(())
    }

    fn fan_update(&mut self, ctx: &mut LevelContext<'_>, dt: f32) -> Result<(), LevelError> {
        for fan in &mut self.registry.fans {
            fan.update(dt);
        }
        let contacts = ctx.contacts;
        let hits = self.touched(contacts, ContactKind::Fan, EntityKind::Fan);
        for (i, fan) in self.registry.fans.iter_mut().enumerate() {
            fan.set_active(hits.binary_search(&i).is_ok());
        }
        if hits.is_empty() {
            return Ok(());
        }
        let ball = ctx.body_mut(self.ball_id()?)?;
        for i in hits {
            self.registry.fans[i].push(ball, self.settings.fan_force);
        }
        Ok(())
    }

    fn gum_cloud_update(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), LevelError> {
        let damping = if ctx.contacts.is_touching(ContactKind::GumCloud) {
            self.settings.gum_cloud_damping
        } else {
            0.0
        };
        ctx.body_mut(self.ball_id()?)?.linear_damping = damping;
        Ok(())
    }

    fn magnet_update(&mut self, ctx: &mut LevelContext<'_>, dt: f32) -> Result<(), LevelError> {
        for magnet in &mut self.registry.magnets {
            magnet.update(dt);
        }
        let contacts = ctx.contacts;
        let hits = self.touched(contacts, ContactKind::Magnet, EntityKind::Magnet);
        for (i, magnet) in self.registry.magnets.iter_mut().enumerate() {
            magnet.set_active(hits.binary_search(&i).is_ok());
        }
        if hits.is_empty() {
            return Ok(());
        }
        let ball = ctx.body_mut(self.ball_id()?)?;
        for i in hits {
            self.registry.magnets[i].attract(ball, self.settings.magnet_force);
        }
        Ok(())
    }

    fn portal_update(&mut self, dt: f32) -> Result<(), LevelError> {
        self.registry
            .portal
            .as_mut()
            .ok_or(LevelError::NotRegistered("portal"))?
            .update(dt);
        Ok(())
    }

    fn teleporter_update(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), LevelError> {
        let contacts = ctx.contacts;
        let hits = self.touched(contacts, ContactKind::Teleporter, EntityKind::Teleporter);
        // First pad in registration order wins; the rest are ignored this frame
        let Some(&entry) = hits.first() else {
            return Ok(());
        };

        let entry = self.registry.teleporters[entry];
        let Some(exit) = self.registry.teleporter_by_number(entry.target).copied() else {
            log::warn!(
                "Teleporter {} targets missing teleporter {}",
                entry.number,
                entry.target
            );
            return Ok(());
        };

        let ball = self
            .registry
            .ball
            .as_mut()
            .ok_or(LevelError::NotRegistered("ball"))?;
        if !tolerate(ball.spawn(self.settings.ball_spawn_secs))? {
            return Ok(());
        }
        exit.receive(ctx.body_mut(ball.body)?);
        log::debug!("Ball teleported {} -> {}", entry.number, exit.number);
        Ok(())
    }

    fn laser_update(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), LevelError> {
        if ctx.contacts.is_touching(ContactKind::Laser) {
            tolerate(self.reset_ball(ctx))?;
        }
        Ok(())
    }

    // === Completion / reset ===

    fn ball_render(&mut self, ctx: &mut LevelContext<'_>, batch: &mut dyn RenderBatch) -> Result<(), LevelError> {
        let key_open = self
            .registry
            .key
            .as_ref()
            .is_none_or(Key::is_collected);
        // Re-checked every frame; once completed the branch is sticky
        if (ctx.contacts.is_touching(ContactKind::Portal) && key_open) || self.level_completed {
            return self.level_completion_events(ctx, batch);
        }
        let ball = self
            .registry
            .ball
            .as_ref()
            .ok_or(LevelError::NotRegistered("ball"))?;
        ball.render(ctx.body(ball.body)?, batch);
        Ok(())
    }

    fn level_completion_events(
        &mut self,
        ctx: &mut LevelContext<'_>,
        batch: &mut dyn RenderBatch,
    ) -> Result<(), LevelError> {
        self.level_completed = true;

        let ball = self
            .registry
            .ball
            .as_mut()
            .ok_or(LevelError::NotRegistered("ball"))?;
        let pos = ctx.body(ball.body)?.pos;
        ctx.session.record_destroyed(pos);
        if !ball.is_erased() {
            ball.destroy(self.settings.ball_destroy_secs)?;
        }
        ball.render(ctx.body(ball.body)?, batch);

        let portal = self
            .registry
            .portal
            .as_mut()
            .ok_or(LevelError::NotRegistered("portal"))?;
        portal.destroy(self.settings.portal_destroy_secs);
        portal.render(batch);

        // Detach exactly once, after the swallow animation
        if ball.is_destroy_animation_finished() {
            ctx.history.remove_body(ball.body);
            ball.erase()?;
            log::debug!("Ball erased at {:?}", pos);
        }

        ctx.session.unlock_level();
        self.level_complete.activate();
        Ok(())
    }

    /// Send the ball back to its spawn point.
    ///
    /// Also puts an uncollected-or-collected key back in place. Does not
    /// clear a completed level.
    pub fn reset_ball(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), LevelError> {
        let ball = self
            .registry
            .ball
            .as_mut()
            .ok_or(LevelError::NotRegistered("ball"))?;
        let pos = ctx.body(ball.body)?.pos;
        ball.reset(self.settings.ball_reset_secs)?;
        ctx.session.record_destroyed(pos);

        let body = ctx.body_mut(ball.body)?;
        body.awake = true;
        body.set_transform(ball.original_position, 0.0);
        body.vel = Vec2::ZERO;
        body.angular_vel = 0.0;
        log::debug!("Ball reset from {:?} to {:?}", pos, ball.original_position);

        if let Some(key) = self.registry.key.as_mut() {
            // A collected key already gave up its body
            if !key.is_collected() {
                ctx.history.remove_body(key.body);
                ctx.physics.destroy_body(key.body);
            }
            let body = key.recreate(&mut *ctx.physics);
            ctx.history.track(body);
        }
        Ok(())
    }
}
