//! Polystrike - Main Entry Point
//!
//! A low-poly first-person maze demo: walk, jump and fire a pistol or rifle.

use anyhow::Context as _;
use polystrike_game::weapon::WeaponKind;
use polystrike_game::{
    GameConfig, GameSession, InputEvent, KeyCode, MazeGeometry, PointerButton, WeaponVisual,
    CONFIG_FILE_NAME,
};
use polystrike_renderer::{
    flash_transform, model_to_cpu_meshes, model_transform, part_transform, srgba, to_mat4,
    to_vec3, weapon_world_transform, FirstPersonCamera,
};
use three_d::*;

/// Map a three-d key to the game's key codes.
fn key_code(key: Key) -> KeyCode {
    match key {
        Key::W => KeyCode::KeyW,
        Key::A => KeyCode::KeyA,
        Key::S => KeyCode::KeyS,
        Key::D => KeyCode::KeyD,
        Key::E => KeyCode::KeyE,
        Key::Q => KeyCode::KeyQ,
        Key::Space => KeyCode::Space,
        Key::Num1 => KeyCode::Digit1,
        Key::Num2 => KeyCode::Digit2,
        Key::Num3 => KeyCode::Digit3,
        Key::ArrowUp => KeyCode::ArrowUp,
        Key::ArrowDown => KeyCode::ArrowDown,
        Key::ArrowLeft => KeyCode::ArrowLeft,
        Key::ArrowRight => KeyCode::ArrowRight,
        Key::Escape => KeyCode::Escape,
        _ => KeyCode::Other,
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

/// The cursor left the window: release everything held and stop looking.
///
/// three-d reports no window focus events, so leaving the window stands in
/// for focus loss. A click inside the window captures the pointer again.
fn release_on_leave(session: &mut GameSession) {
    session.handle_event(InputEvent::FocusLost);
    if session.is_pointer_captured() {
        session.handle_event(InputEvent::PointerCapture { captured: false });
    }
}

fn lit_material(context: &Context, color: [u8; 3]) -> PhysicalMaterial {
    PhysicalMaterial::new_opaque(
        context,
        &CpuMaterial {
            albedo: srgba(color),
            roughness: 0.8,
            metallic: 0.1,
            ..Default::default()
        },
    )
}

/// GPU objects for the equipped weapon, rebuilt when the weapon or its
/// visual changes.
struct WeaponObjects {
    kind: WeaponKind,
    loaded: bool,
    meshes: Vec<Gm<Mesh, PhysicalMaterial>>,
}

impl WeaponObjects {
    fn build(context: &Context, kind: WeaponKind, visual: &WeaponVisual) -> Self {
        let meshes = match visual {
            WeaponVisual::Model(model) => model_to_cpu_meshes(model)
                .into_iter()
                .map(|(mesh, color)| {
                    let material = PhysicalMaterial::new_opaque(
                        context,
                        &CpuMaterial {
                            albedo: color,
                            ..Default::default()
                        },
                    );
                    Gm::new(Mesh::new(context, &mesh), material)
                })
                .collect(),
            WeaponVisual::Placeholder(placeholder) => placeholder
                .parts
                .iter()
                .map(|part| {
                    Gm::new(
                        Mesh::new(context, &CpuMesh::cube()),
                        lit_material(context, part.color),
                    )
                })
                .collect(),
        };

        Self {
            kind,
            loaded: !visual.is_placeholder(),
            meshes,
        }
    }

    fn is_current(&self, kind: WeaponKind, visual: &WeaponVisual) -> bool {
        self.kind == kind && self.loaded == !visual.is_placeholder()
    }
}

/// Floor and wall objects for a maze.
fn build_level(context: &Context, maze: &MazeGeometry) -> Vec<Gm<Mesh, PhysicalMaterial>> {
    let mut objects = Vec::with_capacity(maze.walls.len() + 1);

    let half = maze.floor.visual_size / 2.0;
    let mut floor = Gm::new(
        Mesh::new(context, &CpuMesh::square()),
        lit_material(context, [0x55, 0x55, 0x55]),
    );
    floor.set_transformation(
        Mat4::from_translation(to_vec3(maze.floor.position))
            * Mat4::from_nonuniform_scale(half.x, 1.0, half.y)
            * Mat4::from_angle_x(degrees(-90.0)),
    );
    objects.push(floor);

    for wall in &maze.walls {
        let mut block = Gm::new(
            Mesh::new(context, &CpuMesh::cube()),
            lit_material(context, [0x88, 0x88, 0x88]),
        );
        block.set_transformation(
            Mat4::from_translation(to_vec3(wall.center))
                * Mat4::from_nonuniform_scale(
                    wall.half_extents.x,
                    wall.half_extents.y,
                    wall.half_extents.z,
                ),
        );
        objects.push(block);
    }

    objects
}

fn run() -> anyhow::Result<()> {
    let config = GameConfig::load_or_default(CONFIG_FILE_NAME)
        .with_context(|| format!("loading {CONFIG_FILE_NAME}"))?;

    // Create window
    let window = Window::new(WindowSettings {
        title: "Polystrike".to_string(),
        max_size: Some((1920, 1080)),
        ..Default::default()
    })
    .context("creating window")?;

    let context = window.gl();

    // Create session
    let mut session = GameSession::new(config);
    let mut fps_camera = FirstPersonCamera::new(session.camera());

    let level = build_level(&context, session.maze());

    let mut flash = Gm::new(
        Mesh::new(&context, &CpuMesh::sphere(8)),
        ColorMaterial {
            color: Srgba::new(255, 170, 0, 255),
            ..Default::default()
        },
    );

    let mut weapon = {
        let kind = session.equipped();
        WeaponObjects::build(&context, kind, session.weapon_visual(kind))
    };

    // Lights from the maze
    let mut ambient = AmbientLight::new(&context, 0.0, Srgba::WHITE);
    let mut sun = DirectionalLight::new(&context, 0.0, Srgba::WHITE, vec3(0.0, -1.0, 0.0));
    for light in &session.maze().lights {
        match light.light_type {
            polystrike_game::maze::LightType::Ambient => ambient.intensity = light.intensity,
            polystrike_game::maze::LightType::Directional => {
                sun = DirectionalLight::new(
                    &context,
                    light.intensity,
                    Srgba::WHITE,
                    to_vec3(-light.position),
                );
            }
        }
    }

    tracing::info!("Window and session initialized");

    // Main loop
    window.render_loop(move |frame_input| {
        // Handle input events
        for event in frame_input.events.iter() {
            match event {
                Event::KeyPress { kind, handled, .. } if !*handled => {
                    match *kind {
                        // Toggle pointer capture with Escape
                        Key::Escape => {
                            let captured = !session.is_pointer_captured();
                            session.handle_event(InputEvent::PointerCapture { captured });
                        }
                        Key::R => session.restart(),
                        _ => {}
                    }
                    session.handle_event(InputEvent::Key {
                        code: key_code(*kind),
                        pressed: true,
                    });
                }
                Event::KeyRelease { kind, handled, .. } if !*handled => {
                    session.handle_event(InputEvent::Key {
                        code: key_code(*kind),
                        pressed: false,
                    });
                }
                Event::MousePress { button, handled, .. } if !*handled => {
                    if !session.is_pointer_captured() {
                        session.handle_event(InputEvent::PointerCapture { captured: true });
                    }
                    session.handle_event(InputEvent::PointerButton {
                        button: pointer_button(*button),
                        pressed: true,
                    });
                }
                Event::MouseRelease { button, handled, .. } if !*handled => {
                    session.handle_event(InputEvent::PointerButton {
                        button: pointer_button(*button),
                        pressed: false,
                    });
                }
                Event::MouseMotion { delta, .. } => {
                    session.handle_event(InputEvent::PointerMotion { delta: *delta });
                }
                Event::MouseLeave => release_on_leave(&mut session),
                _ => {}
            }
        }

        // Update session
        let delta_time = (frame_input.elapsed_time / 1000.0) as f32;
        let out = session.tick(delta_time);

        // Camera
        fps_camera.update(out.camera);
        fps_camera.set_viewport(frame_input.viewport.width, frame_input.viewport.height);
        let camera = Camera::new_perspective(
            frame_input.viewport,
            to_vec3(fps_camera.pose.position),
            to_vec3(fps_camera.target()),
            to_vec3(fps_camera.pose.up()),
            degrees(fps_camera.fov),
            fps_camera.near,
            fps_camera.far,
        );

        // Weapon
        let visual = session.weapon_visual(out.equipped);
        if !weapon.is_current(out.equipped, visual) {
            weapon = WeaponObjects::build(&context, out.equipped, visual);
        }

        let group = weapon_world_transform(&out.camera, &out.weapon);
        match visual {
            WeaponVisual::Model(_) => {
                let transform = to_mat4(model_transform(group, &out.weapon));
                for mesh in &mut weapon.meshes {
                    mesh.set_transformation(transform);
                }
            }
            WeaponVisual::Placeholder(placeholder) => {
                for (mesh, part) in weapon.meshes.iter_mut().zip(&placeholder.parts) {
                    mesh.set_transformation(to_mat4(part_transform(group, placeholder, part)));
                }
            }
        }

        // Muzzle flash: a bright sphere plus a point light while visible
        let muzzle = out.weapon.flash.map(|f| {
            let transform = flash_transform(group, &f);
            flash.set_transformation(to_mat4(transform));
            PointLight::new(
                &context,
                f.intensity,
                Srgba::new(255, 170, 0, 255),
                to_vec3(transform.transform_point3(glam::Vec3::ZERO)),
                Attenuation {
                    constant: 1.0,
                    linear: 0.0,
                    quadratic: 0.5,
                },
            )
        });

        let mut lights: Vec<&dyn Light> = vec![&ambient, &sun];
        if let Some(light) = &muzzle {
            lights.push(light);
        }

        // Render
        let screen = frame_input.screen();
        screen
            .clear(ClearState::color_and_depth(0.53, 0.81, 0.92, 1.0, 1.0))
            .render(&camera, level.iter(), &lights)
            .render(&camera, weapon.meshes.iter(), &lights);
        if muzzle.is_some() {
            screen.render(&camera, [&flash], &lights);
        }

        FrameOutput::default()
    });

    Ok(())
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("polystrike=info".parse()?))
        .init();

    if let Err(err) = run() {
        tracing::error!("Failed to start: {err:#}");
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_code(Key::W), KeyCode::KeyW);
        assert_eq!(key_code(Key::Space), KeyCode::Space);
        assert_eq!(key_code(Key::Num1), KeyCode::Digit1);
        assert_eq!(key_code(Key::Z), KeyCode::Other);
    }

    #[test]
    fn test_cursor_leave_releases_input() {
        let mut session = GameSession::new(GameConfig::default());
        session.handle_event(InputEvent::PointerCapture { captured: true });
        session.handle_event(InputEvent::PointerButton {
            button: PointerButton::Primary,
            pressed: true,
        });
        session.handle_event(InputEvent::Key {
            code: KeyCode::KeyW,
            pressed: true,
        });
        assert!(session.trigger_held());

        release_on_leave(&mut session);
        assert!(!session.trigger_held());
        assert!(!session.is_pointer_captured());

        // Let the player settle; with W released nothing moves it sideways
        for _ in 0..120 {
            session.tick(1.0 / 60.0);
        }
        let start = session.body().position;
        for _ in 0..30 {
            session.tick(1.0 / 60.0);
        }
        let moved = session.body().position - start;
        assert!(moved.x.abs() < 1e-3 && moved.z.abs() < 1e-3, "moved={moved:?}");
    }
}
