// Implements an unbounded spatial hash grid for broadphase collision detection.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::collision::{BodyPair, AABB};
use crate::error::{PhysicsError, Result};
use crate::objects::BodyHandle;

/// Inclusive range of cell coordinates covered by an AABB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRect {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl CellRect {
    fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min_y..=self.max_y).flat_map(move |y| (self.min_x..=self.max_x).map(move |x| (x, y)))
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[derive(Debug, Clone, Copy)]
struct TrackedBody {
    aabb: AABB,
    rect: CellRect,
}

/// Packs two signed cell coordinates into one 64-bit key.
#[inline]
fn cell_key(x: i32, y: i32) -> u64 {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

#[inline]
fn unpack_key(key: u64) -> (i32, i32) {
    ((key >> 32) as u32 as i32, key as u32 as i32)
}

/// Cell edge length used by [`SpatialHashGrid::default`].
pub const DEFAULT_CELL_SIZE: f64 = 2.0;

/// A sparse uniform grid keyed by cell coordinate. A body is listed in every
/// cell its AABB touches; the grid covers the whole plane.
#[derive(Debug)]
pub struct SpatialHashGrid {
    cell_size: f64,
    inv_cell_size: f64,
    cells: HashMap<u64, Vec<BodyHandle>>,
    tracked: HashMap<BodyHandle, TrackedBody>,

    // Temporary storage to avoid allocations during pair generation
    pair_seen: HashSet<BodyPair>,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f64) -> Result<Self> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(PhysicsError::InvalidCellSize(cell_size));
        }
        Ok(Self::with_cell_size(cell_size))
    }

    fn with_cell_size(cell_size: f64) -> Self {
        debug!(cell_size, "creating spatial hash grid");
        SpatialHashGrid {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            tracked: HashMap::new(),
            pair_seen: HashSet::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    fn cell_coord(&self, value: f64) -> i32 {
        (value * self.inv_cell_size).floor() as i32
    }

    fn cell_rect(&self, aabb: &AABB) -> CellRect {
        CellRect {
            min_x: self.cell_coord(aabb.min.x),
            min_y: self.cell_coord(aabb.min.y),
            max_x: self.cell_coord(aabb.max.x),
            max_y: self.cell_coord(aabb.max.y),
        }
    }

    fn insert_into_cell(&mut self, x: i32, y: i32, handle: BodyHandle) {
        self.cells.entry(cell_key(x, y)).or_default().push(handle);
    }

    fn remove_from_cell(&mut self, x: i32, y: i32, handle: BodyHandle) {
        let key = cell_key(x, y);
        if let Some(bodies) = self.cells.get_mut(&key) {
            if let Some(pos) = bodies.iter().position(|h| *h == handle) {
                bodies.swap_remove(pos);
            }
            if bodies.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    pub fn is_tracked(&self, handle: BodyHandle) -> bool {
        self.tracked.contains_key(&handle)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Registers a body in every cell its AABB overlaps.
    pub fn add(&mut self, handle: BodyHandle, aabb: &AABB) -> Result<()> {
        if self.is_tracked(handle) {
            return Err(PhysicsError::AlreadyTracked(handle));
        }
        let rect = self.cell_rect(aabb);
        for (x, y) in rect.cells() {
            self.insert_into_cell(x, y, handle);
        }
        self.tracked.insert(handle, TrackedBody { aabb: *aabb, rect });
        Ok(())
    }

    /// Deregisters a body from every cell of its last recorded bounds.
    pub fn remove(&mut self, handle: BodyHandle) -> Result<()> {
        let tracked = self.tracked.remove(&handle).ok_or(PhysicsError::UntrackedBody(handle))?;
        for (x, y) in tracked.rect.cells() {
            self.remove_from_cell(x, y, handle);
        }
        Ok(())
    }

    /// Moves a tracked body to a new AABB, touching only the cells that differ
    /// between the old and new cell rectangles.
    pub fn move_body(&mut self, handle: BodyHandle, aabb: &AABB) -> Result<()> {
        let old = *self.tracked.get(&handle).ok_or(PhysicsError::UntrackedBody(handle))?;
        let rect = self.cell_rect(aabb);
        if rect != old.rect {
            for (x, y) in old.rect.cells().filter(|&(x, y)| !rect.contains(x, y)) {
                self.remove_from_cell(x, y, handle);
            }
            for (x, y) in rect.cells().filter(|&(x, y)| !old.rect.contains(x, y)) {
                self.insert_into_cell(x, y, handle);
            }
        }
        self.tracked.insert(handle, TrackedBody { aabb: *aabb, rect });
        Ok(())
    }

    /// Brings the grid in line with `bodies`: drops bodies no longer present,
    /// adds new ones and moves the rest.
    pub fn update(&mut self, bodies: &[(BodyHandle, AABB)]) -> Result<()> {
        let present: HashSet<BodyHandle> = bodies.iter().map(|(h, _)| *h).collect();
        let stale: Vec<BodyHandle> = self.tracked.keys().filter(|h| !present.contains(h)).copied().collect();
        for handle in stale {
            self.remove(handle)?;
        }
        for (handle, aabb) in bodies {
            if self.is_tracked(*handle) {
                self.move_body(*handle, aabb)?;
            } else {
                self.add(*handle, aabb)?;
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.tracked.clear();
    }

    /// All pairs sharing at least one cell whose AABBs overlap and for which
    /// `accept` returns true, each reported once, in ascending order.
    pub fn query_potential_pairs<F>(&mut self, mut accept: F) -> Vec<BodyPair>
    where
        F: FnMut(BodyHandle, BodyHandle) -> bool,
    {
        let mut potential_pairs = Vec::new();
        self.pair_seen.clear();

        for bodies in self.cells.values() {
            if bodies.len() < 2 {
                continue;
            }
            for (i, &a) in bodies.iter().enumerate() {
                for &b in &bodies[i + 1..] {
                    let pair = BodyPair::new(a, b);
                    if !self.pair_seen.insert(pair) {
                        continue;
                    }
                    let (Some(ta), Some(tb)) = (self.tracked.get(&a), self.tracked.get(&b)) else {
                        continue;
                    };
                    if ta.aabb.overlaps(&tb.aabb) && accept(pair.first(), pair.second()) {
                        potential_pairs.push(pair);
                    }
                }
            }
        }
        self.pair_seen.clear();
        potential_pairs.sort();
        potential_pairs
    }

    /// Occupied cells with their body counts, for debug drawing.
    pub fn occupied_cells(&self) -> impl Iterator<Item = ((i32, i32), usize)> + '_ {
        self.cells.iter().map(|(key, bodies)| (unpack_key(*key), bodies.len()))
    }

    /// Bodies registered in cell `(x, y)`.
    pub fn bodies_in_cell(&self, x: i32, y: i32) -> &[BodyHandle] {
        self.cells.get(&cell_key(x, y)).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }
}
