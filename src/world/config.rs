use crate::collision::spatial_grid::DEFAULT_CELL_SIZE;
use crate::math::Vec2;
use crate::objects::LayerMatrix;

/// Gravity a world starts with and returns to on [`reset_gravity`](super::PhysicsWorld::reset_gravity).
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.81);

/// How the world finds candidate body pairs each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadphaseMode {
    /// Uniform spatial hash grid.
    #[default]
    SpatialHash,
    /// Tests every pair of bodies. Kept as a reference for the grid.
    BruteForce,
}

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Gravity vector. Default: (0, -9.81).
    pub gravity: Vec2,
    /// Number of contact solver iterations per step. Default: 8.
    pub solver_iterations: usize,
    /// Broad-phase cell edge length in world units. Default: 2.
    pub cell_size: f64,
    /// Default: spatial hash.
    pub broadphase: BroadphaseMode,
    /// Which collision layers interact. Default: all of them.
    pub layer_matrix: LayerMatrix,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            solver_iterations: 8,
            cell_size: DEFAULT_CELL_SIZE,
            broadphase: BroadphaseMode::SpatialHash,
            layer_matrix: LayerMatrix::all(),
        }
    }
}
