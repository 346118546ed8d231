//! Maze grid and the static geometry generated from it.
//!
//! A maze is a rectangular grid of wall / open cells. Generation maps every
//! wall cell to one box and adds a single ground plane. The result is static
//! terrain: it is built once at session start and never mutated.

use glam::{IVec2, Vec2, Vec3};
use polystrike_physics::{CollisionWorld, ContentFlags};
use serde::{Deserialize, Serialize};

/// Side length of the built-in layout.
pub const DEFAULT_MAZE_SIZE: usize = 12;

const DEFAULT_LAYOUT: [[u8; DEFAULT_MAZE_SIZE]; DEFAULT_MAZE_SIZE] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 1, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 0, 1, 0, 1, 1, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeCell {
    Open,
    Wall,
}

impl MazeCell {
    /// `1` is a wall; every other value is open.
    pub fn from_value(value: u8) -> Self {
        if value == 1 {
            Self::Wall
        } else {
            Self::Open
        }
    }

    /// `1`/`#` is a wall; every other character is open.
    pub fn from_char(c: char) -> Self {
        match c {
            '1' | '#' => Self::Wall,
            _ => Self::Open,
        }
    }
}

/// An immutable grid of cells, indexed `[row][col]`.
///
/// Rows may have different lengths; generation simply walks what is there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    rows: Vec<Vec<MazeCell>>,
}

impl Default for MazeGrid {
    fn default() -> Self {
        Self::from_values(DEFAULT_LAYOUT.iter().map(|row| row.to_vec()))
    }
}

impl MazeGrid {
    /// Build a grid from rows of 0/1 values.
    pub fn from_values<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = u8>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(MazeCell::from_value).collect())
                .collect(),
        }
    }

    /// Parse a text layout, one row per line.
    ///
    /// `1` or `#` is a wall, anything else is open. Blank lines are skipped.
    pub fn parse(text: &str) -> Self {
        Self {
            rows: text
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(|line| line.chars().map(MazeCell::from_char).collect())
                .collect(),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at `(row, col)`, `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<MazeCell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Iterate `(row, col)` of every wall cell in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == MazeCell::Wall)
                .map(move |(col, _)| (row, col))
        })
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.walls().count()
    }
}

/// Dimensions used to turn a grid into world geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// World size of one cell along X and Z (meters).
    pub cell_size: f32,

    /// Wall height (meters).
    pub wall_height: f32,

    /// Side length of the visual floor (meters).
    pub floor_extent: f32,

    /// Optional text layout replacing the built-in grid.
    pub layout: Option<String>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            cell_size: 2.0,
            wall_height: 3.0,
            floor_extent: 100.0,
            layout: None,
        }
    }
}

impl MazeConfig {
    /// The grid this configuration describes.
    pub fn grid(&self) -> MazeGrid {
        match &self.layout {
            Some(text) => MazeGrid::parse(text),
            None => MazeGrid::default(),
        }
    }
}

/// A static wall block generated from one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBlock {
    /// Grid index `(row, col)`.
    pub cell: IVec2,

    /// Center position in world space.
    pub center: Vec3,

    /// Half-size in each axis.
    pub half_extents: Vec3,
}

/// The ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorPlane {
    /// A point on the plane.
    pub position: Vec3,

    /// Up-facing normal.
    pub normal: Vec3,

    /// Size of the visual floor quad (X, Z).
    pub visual_size: Vec2,
}

/// Types of light sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightType {
    /// Uniform fill light.
    Ambient,
    /// Directional light (sun), aimed from `position` toward the origin.
    Directional,
}

/// A light source in the level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightSource {
    /// Position in world space (direction origin for directional lights).
    pub position: Vec3,

    /// Light color (RGB, 0-1).
    pub color: Vec3,

    /// Light intensity.
    pub intensity: f32,

    /// Light type.
    pub light_type: LightType,
}

/// Everything generated from a maze grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeGeometry {
    /// One block per wall cell, in row-major order.
    pub walls: Vec<WallBlock>,

    /// The single ground plane.
    pub floor: FloorPlane,

    /// Scene lights.
    pub lights: Vec<LightSource>,
}

impl MazeGeometry {
    /// Generate geometry for a grid.
    ///
    /// Wall `(row, col)` is centred at
    /// `(row * cell - rows, wall_height / 2, col * cell - cols)`.
    pub fn generate(grid: &MazeGrid, config: &MazeConfig) -> Self {
        let offset_x = grid.row_count() as f32;
        let offset_z = grid.col_count() as f32;
        let half_extents = Vec3::new(
            config.cell_size / 2.0,
            config.wall_height / 2.0,
            config.cell_size / 2.0,
        );

        let walls = grid
            .walls()
            .map(|(row, col)| WallBlock {
                cell: IVec2::new(row as i32, col as i32),
                center: Vec3::new(
                    row as f32 * config.cell_size - offset_x,
                    config.wall_height / 2.0,
                    col as f32 * config.cell_size - offset_z,
                ),
                half_extents,
            })
            .collect();

        let floor = FloorPlane {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            visual_size: Vec2::splat(config.floor_extent),
        };

        let lights = vec![
            LightSource {
                position: Vec3::ZERO,
                color: Vec3::ONE,
                intensity: 0.6,
                light_type: LightType::Ambient,
            },
            LightSource {
                position: Vec3::new(10.0, 20.0, 10.0),
                color: Vec3::ONE,
                intensity: 1.2,
                light_type: LightType::Directional,
            },
        ];

        Self {
            walls,
            floor,
            lights,
        }
    }

    /// Number of wall blocks.
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Insert the static colliders: one box per wall plus the ground plane.
    ///
    /// Returns the number of brushes added.
    pub fn populate(&self, collision: &mut CollisionWorld) -> usize {
        for wall in &self.walls {
            collision.add_box(wall.center, wall.half_extents, ContentFlags::SOLID);
        }
        collision.add_plane(self.floor.position, self.floor.normal, ContentFlags::FLOOR);

        tracing::debug!("maze populated: {} walls + 1 floor", self.walls.len());
        self.walls.len() + 1
    }
}
