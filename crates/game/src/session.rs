//! Game session - owns the world and runs one tick per rendered frame.
//!
//! ```text
//! InputEvent ──► handle_event ──► InputState / trigger / look
//!                                        │
//! tick(dt): snapshot ──► PlayerRig::step ─┴─► BodyCommand ──► PhysicsWorld::step
//!                               │
//!                               └──► CameraPose + WeaponFrame ──► FrameOutput
//! ```

use std::sync::Arc;

use glam::Vec3;
use polystrike_physics::{BodyCommand, BodyHandle, BodySnapshot, PhysicsWorld};

use crate::assets::{AssetLoader, AssetSource, GltfAssetSource, LoadOutcome};
use crate::camera::{CameraPose, PointerLook};
use crate::config::GameConfig;
use crate::input::{InputAction, InputEvent, KeyboardInput, PointerButton};
use crate::locomotion::LocomotionController;
use crate::maze::MazeGeometry;
use crate::player::{PlayerRig, TickInput};
use crate::weapon::{WeaponFrame, WeaponKind, WeaponVisual};

/// What the host needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Tick counter, starting at 1 for the first tick.
    pub frame: u64,

    /// Camera pose.
    pub camera: CameraPose,

    /// Equipped weapon.
    pub equipped: WeaponKind,

    /// Weapon pose and flash.
    pub weapon: WeaponFrame,

    /// A jump started this tick.
    pub jumped: bool,

    /// The player was reset to spawn this tick.
    pub recovered: bool,

    /// Physics sub-steps taken.
    pub substeps: u32,
}

/// Resolved visuals for both weapons.
#[derive(Debug, Clone)]
struct WeaponVisuals {
    pistol: WeaponVisual,
    rifle: WeaponVisual,
}

impl WeaponVisuals {
    fn placeholders() -> Self {
        Self {
            pistol: WeaponVisual::placeholder(WeaponKind::Pistol),
            rifle: WeaponVisual::placeholder(WeaponKind::Rifle),
        }
    }

    fn get(&self, kind: WeaponKind) -> &WeaponVisual {
        match kind {
            WeaponKind::Pistol => &self.pistol,
            WeaponKind::Rifle => &self.rifle,
        }
    }

    fn set(&mut self, kind: WeaponKind, visual: WeaponVisual) {
        match kind {
            WeaponKind::Pistol => self.pistol = visual,
            WeaponKind::Rifle => self.rifle = visual,
        }
    }
}

/// A running game.
///
/// Everything the session subscribes to is owned here, so dropping it
/// releases the input state, the physics world and the asset loader.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    maze: MazeGeometry,
    physics: PhysicsWorld,
    player: BodyHandle,
    rig: PlayerRig,
    keyboard: KeyboardInput,
    look: PointerLook,
    trigger_held: bool,
    loader: AssetLoader,
    visuals: WeaponVisuals,
    camera: CameraPose,
    elapsed: f32,
    frame: u64,
}

impl GameSession {
    /// Build a session loading weapon models from disk.
    pub fn new(config: GameConfig) -> Self {
        let source = GltfAssetSource::new(config.assets.root.clone());
        Self::with_asset_source(config, Arc::new(source))
    }

    /// Build a session with a custom model source.
    pub fn with_asset_source(config: GameConfig, source: Arc<dyn AssetSource>) -> Self {
        let grid = config.maze.grid();
        let maze = MazeGeometry::generate(&grid, &config.maze);

        let mut physics = PhysicsWorld::new(config.physics.clone());
        let brushes = maze.populate(physics.statics_mut());

        let spawn = config.locomotion.spawn_point;
        let desc = config.player.desc(spawn);
        if physics
            .statics()
            .sphere_in_solid(spawn, desc.radius, desc.collision_mask)
        {
            tracing::warn!("Spawn point {spawn:?} overlaps level geometry");
        }
        let player = physics.add_body(desc);

        let rig = PlayerRig::new(
            LocomotionController::new(config.locomotion.clone()),
            config.weapons.clone(),
            config.weapon_tuning.clone(),
            config.rng_seed,
        );

        let mut loader = AssetLoader::new(source, config.assets.timeout());
        for kind in WeaponKind::ALL {
            loader.request(kind, &config.weapons.get(kind).model_path);
        }

        let camera = CameraPose::new(
            spawn + Vec3::new(0.0, config.locomotion.eye_height, 0.0),
            glam::Quat::IDENTITY,
        );

        tracing::info!(
            "Session ready: {}x{} maze, {} brushes",
            grid.row_count(),
            grid.col_count(),
            brushes
        );

        Self {
            keyboard: KeyboardInput::new(config.bindings.clone()),
            look: PointerLook::new(config.look.clone()),
            config,
            maze,
            physics,
            player,
            rig,
            trigger_held: false,
            loader,
            visuals: WeaponVisuals::placeholders(),
            camera,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Level geometry and lights.
    pub fn maze(&self) -> &MazeGeometry {
        &self.maze
    }

    /// Physics world.
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Player body as of the last physics step.
    pub fn body(&self) -> BodySnapshot {
        self.physics.snapshot(self.player).unwrap_or_default()
    }

    /// Camera pose from the last tick.
    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    /// Equipped weapon.
    pub fn equipped(&self) -> WeaponKind {
        self.rig.equipped()
    }

    /// Visual for a weapon: its model once loaded, the placeholder otherwise.
    pub fn weapon_visual(&self, kind: WeaponKind) -> &WeaponVisual {
        self.visuals.get(kind)
    }

    /// Whether the pointer is captured for looking.
    pub fn is_pointer_captured(&self) -> bool {
        self.look.is_captured()
    }

    /// Whether the trigger is down.
    pub fn trigger_held(&self) -> bool {
        self.trigger_held
    }

    /// Feed one input event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { code, pressed } => {
                let Some(edge) = self.keyboard.handle_key(code, pressed) else {
                    return;
                };
                if !edge.pressed {
                    return;
                }
                match edge.action {
                    InputAction::WeaponSlot1 => {
                        self.rig.equip(WeaponKind::Rifle);
                    }
                    InputAction::WeaponSlot2 => {
                        self.rig.equip(WeaponKind::Pistol);
                    }
                    _ => {}
                }
            }
            InputEvent::PointerButton {
                button: PointerButton::Primary,
                pressed,
            } => self.trigger_held = pressed,
            InputEvent::PointerButton { .. } => {}
            InputEvent::PointerMotion { delta } => self.look.apply_motion(delta),
            InputEvent::PointerCapture { captured } => {
                tracing::debug!("Pointer capture: {captured}");
                self.look.set_captured(captured);
            }
            InputEvent::FocusLost => {
                self.keyboard.reset();
                self.trigger_held = false;
            }
        }
    }

    /// Advance by `delta_time` seconds.
    ///
    /// Runs the player rig against the current body snapshot, applies its
    /// command, then steps physics.
    pub fn tick(&mut self, delta_time: f32) -> FrameOutput {
        self.resolve_assets();

        if delta_time.is_finite() && delta_time > 0.0 {
            self.elapsed += delta_time;
        }
        self.frame += 1;

        let input = TickInput {
            input: self.keyboard.current(),
            trigger_held: self.trigger_held,
            orientation: self.look.orientation(),
            body: self.body(),
            elapsed: self.elapsed,
        };
        let out = self.rig.step(&input);

        self.physics.apply(self.player, &out.body);
        let substeps = self.physics.step(delta_time);
        self.camera = out.camera;

        FrameOutput {
            frame: self.frame,
            camera: out.camera,
            equipped: out.equipped,
            weapon: out.weapon,
            jumped: out.jumped,
            recovered: out.recovered,
            substeps,
        }
    }

    /// Start over: inputs released, player at spawn, default weapon at rest.
    ///
    /// Loaded weapon models are kept.
    pub fn restart(&mut self) {
        let spawn = self.config.locomotion.spawn_point;

        self.keyboard.reset();
        self.trigger_held = false;
        self.physics
            .apply(self.player, &BodyCommand::teleport(spawn, Vec3::ZERO));
        self.rig.reset();
        self.camera.position = spawn + Vec3::new(0.0, self.config.locomotion.eye_height, 0.0);
        self.elapsed = 0.0;

        tracing::info!("Session restarted");
    }

    /// Block until every weapon model has loaded, failed or timed out.
    pub fn wait_for_assets(&mut self) {
        for outcome in self.loader.wait() {
            self.apply_outcome(outcome);
        }
    }

    fn resolve_assets(&mut self) {
        for outcome in self.loader.poll() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let visual = match outcome.result {
            Ok(model) => {
                tracing::info!(
                    "Loaded {} model ({} vertices)",
                    outcome.kind.name(),
                    model.vertex_count()
                );
                WeaponVisual::Model(model)
            }
            Err(err) => {
                tracing::warn!(
                    "Using placeholder for {}: {err}",
                    outcome.kind.name()
                );
                WeaponVisual::placeholder(outcome.kind)
            }
        };
        self.visuals.set(outcome.kind, visual);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetError, MeshData, ModelData};
    use crate::input::{InputState, KeyCode};
    use std::time::{Duration, Instant};

    const DT: f32 = 1.0 / 60.0;

    /// Serves the pistol, fails everything else.
    struct PistolOnly;

    impl AssetSource for PistolOnly {
        fn fetch(&self, path: &str) -> Result<ModelData, AssetError> {
            if !path.contains("pistol") {
                return Err(AssetError::MissingPositions(path.to_string()));
            }
            Ok(ModelData {
                meshes: vec![MeshData {
                    name: "slide".to_string(),
                    positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                    normals: vec![Vec3::Z; 3],
                    indices: vec![0, 1, 2],
                    color: [51, 51, 51],
                }],
            })
        }
    }

    struct Stalled;

    impl AssetSource for Stalled {
        fn fetch(&self, _path: &str) -> Result<ModelData, AssetError> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(ModelData::default())
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            rng_seed: Some(3),
            ..Default::default()
        }
    }

    fn session() -> GameSession {
        GameSession::with_asset_source(config(), Arc::new(PistolOnly))
    }

    fn key(session: &mut GameSession, code: KeyCode, pressed: bool) {
        session.handle_event(InputEvent::Key { code, pressed });
    }

    fn run(session: &mut GameSession, ticks: usize) -> FrameOutput {
        let mut last = session.tick(DT);
        for _ in 1..ticks {
            last = session.tick(DT);
        }
        last
    }

    #[test]
    fn test_session_builds_maze() {
        let session = session();
        let walls = session.maze().wall_count();
        assert!(walls > 0);
        assert_eq!(session.physics().statics().brush_count(), walls + 1);
        assert_eq!(session.physics().body_count(), 1);
        assert_eq!(session.body().position, Vec3::new(-10.0, 2.0, -10.0));
        assert_eq!(session.equipped(), WeaponKind::Pistol);
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut session = session();
        let out = run(&mut session, 180);

        let body = session.body();
        assert!((body.position.y - 0.6).abs() < 0.01, "y={}", body.position.y);
        assert!(body.velocity.y.abs() < 0.1);
        assert!((out.camera.position.y - 1.4).abs() < 0.02);
        assert!(!out.recovered);
    }

    #[test]
    fn test_wall_stops_player() {
        let mut session = session();
        run(&mut session, 60);

        // Looking down -Z, strafing right heads along +X into the wall at row 6
        key(&mut session, KeyCode::KeyD, true);
        run(&mut session, 240);

        let body = session.body();
        assert!(
            body.position.x > -1.7 && body.position.x < -1.5,
            "x={}",
            body.position.x
        );
        assert!((body.position.z + 10.0).abs() < 0.05);
    }

    #[test]
    fn test_walking_moves_at_speed() {
        let mut session = session();
        run(&mut session, 60);
        let start = session.body().position;

        key(&mut session, KeyCode::KeyD, true);
        run(&mut session, 30);
        key(&mut session, KeyCode::KeyD, false);

        let travelled = session.body().position.x - start.x;
        // Half a second at 5 m/s, less a little damping inside each step
        assert!(travelled > 2.0 && travelled < 2.6, "travelled={travelled}");

        // Releasing the key stops horizontal motion on the next tick
        run(&mut session, 2);
        assert!(session.body().horizontal_speed() < 1e-3);
    }

    #[test]
    fn test_jump() {
        let mut session = session();
        run(&mut session, 120);

        key(&mut session, KeyCode::Space, true);
        let out = session.tick(DT);
        key(&mut session, KeyCode::Space, false);
        assert!(out.jumped);

        let mut peak: f32 = 0.0;
        for _ in 0..60 {
            session.tick(DT);
            peak = peak.max(session.body().position.y);
        }
        assert!(peak > 0.9, "peak={peak}");
    }

    #[test]
    fn test_no_jump_in_air() {
        let mut session = session();
        // Still falling from the spawn height
        session.tick(DT);
        session.tick(DT);
        key(&mut session, KeyCode::Space, true);
        let out = session.tick(DT);
        assert!(!out.jumped);
    }

    #[test]
    fn test_fall_recovery() {
        let mut session = session();
        run(&mut session, 30);

        let handle = session.player;
        session
            .physics
            .apply(handle, &BodyCommand::teleport(Vec3::new(3.0, -6.0, 3.0), Vec3::ZERO));

        let out = session.tick(DT);
        assert!(out.recovered);
        assert!((out.camera.position - Vec3::new(-10.0, 2.8, -10.0)).length() < 1e-5);
        assert!((session.body().position.x + 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_weapon_slots() {
        let mut session = session();

        key(&mut session, KeyCode::Digit1, true);
        assert_eq!(session.equipped(), WeaponKind::Rifle);
        key(&mut session, KeyCode::Digit1, false);

        key(&mut session, KeyCode::Digit2, true);
        assert_eq!(session.equipped(), WeaponKind::Pistol);

        // Key repeat is not an edge
        key(&mut session, KeyCode::Digit1, true);
        key(&mut session, KeyCode::Digit1, true);
        assert_eq!(session.equipped(), WeaponKind::Rifle);
    }

    #[test]
    fn test_trigger_and_focus_loss() {
        let mut session = session();
        session.handle_event(InputEvent::PointerButton {
            button: PointerButton::Primary,
            pressed: true,
        });
        key(&mut session, KeyCode::KeyW, true);

        let out = session.tick(DT);
        assert!(out.weapon.flash.is_some());

        session.handle_event(InputEvent::FocusLost);
        assert!(!session.trigger_held());

        let mut last = session.tick(DT);
        for _ in 0..5 {
            last = session.tick(DT);
        }
        assert!(last.weapon.flash.is_none());
        assert_eq!(session.keyboard.current(), InputState::default());
    }

    #[test]
    fn test_secondary_button_does_not_fire() {
        let mut session = session();
        session.handle_event(InputEvent::PointerButton {
            button: PointerButton::Secondary,
            pressed: true,
        });
        assert!(!session.trigger_held());
    }

    #[test]
    fn test_look_requires_capture() {
        let mut session = session();
        session.handle_event(InputEvent::PointerMotion { delta: (300.0, 0.0) });
        assert_eq!(session.tick(DT).camera.orientation, glam::Quat::IDENTITY);

        session.handle_event(InputEvent::PointerCapture { captured: true });
        session.handle_event(InputEvent::PointerMotion { delta: (300.0, 0.0) });
        let out = session.tick(DT);
        assert!(out.camera.forward().x > 0.0);
    }

    #[test]
    fn test_asset_fallback() {
        let mut session = session();
        assert!(session.weapon_visual(WeaponKind::Pistol).is_placeholder());

        session.wait_for_assets();

        assert!(matches!(
            session.weapon_visual(WeaponKind::Pistol),
            WeaponVisual::Model(_)
        ));
        assert_eq!(
            session.weapon_visual(WeaponKind::Rifle),
            &WeaponVisual::placeholder(WeaponKind::Rifle)
        );
    }

    #[test]
    fn test_asset_timeout_keeps_placeholder() {
        let mut config = config();
        config.assets.timeout_secs = 0.02;
        let mut session = GameSession::with_asset_source(config, Arc::new(Stalled));

        let started = Instant::now();
        session.wait_for_assets();
        assert!(started.elapsed() < Duration::from_secs(2));

        session.tick(DT);
        assert!(session.weapon_visual(WeaponKind::Rifle).is_placeholder());
        assert!(session.weapon_visual(WeaponKind::Pistol).is_placeholder());
    }

    #[test]
    fn test_drop_with_pending_assets() {
        let started = Instant::now();
        {
            let mut session = GameSession::with_asset_source(config(), Arc::new(Stalled));
            session.tick(DT);
        }
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_restart() {
        let mut session = session();
        key(&mut session, KeyCode::Digit1, true);
        key(&mut session, KeyCode::KeyD, true);
        run(&mut session, 90);

        session.restart();

        assert_eq!(session.equipped(), WeaponKind::Pistol);
        assert_eq!(session.body().position, Vec3::new(-10.0, 2.0, -10.0));
        assert_eq!(session.body().velocity, Vec3::ZERO);
        let out = session.tick(DT);
        assert_eq!(out.frame, 91);
        assert_eq!(out.weapon.scale, 0.1);
        assert!(session.body().horizontal_speed() < 1e-3);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let script = |session: &mut GameSession| {
            session.handle_event(InputEvent::PointerButton {
                button: PointerButton::Primary,
                pressed: true,
            });
            key(session, KeyCode::KeyD, true);
            let mut frames = Vec::new();
            for i in 0..120 {
                if i == 60 {
                    key(session, KeyCode::Space, true);
                }
                frames.push(session.tick(DT));
            }
            frames
        };

        let a = script(&mut session());
        let b = script(&mut session());
        assert_eq!(a, b);
    }
}
