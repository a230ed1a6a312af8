//! Uniform grid that answers radius queries over tracked entities.

use std::collections::{BTreeMap, BTreeSet};

use emberline_core::{Vec2, WorldBounds};
use thiserror::Error;

/// Side length of a grid cell in world tiles.
const CELL_SIZE: f64 = 1.0;

/// Errors signalling misuse of a [`SpatialIndex`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SpatialIndexError {
    /// The entity is already registered.
    #[error("entity is already tracked by the spatial index")]
    AlreadyTracked,
    /// The entity is not registered.
    #[error("entity is not tracked by the spatial index")]
    NotTracked,
    /// The position lies outside the bounds fixed at construction.
    #[error("position ({x}, {y}) lies outside the indexed bounds")]
    OutOfBounds {
        /// Rejected x coordinate.
        x: f64,
        /// Rejected y coordinate.
        y: f64,
    },
}

#[derive(Clone, Copy, Debug)]
struct Membership {
    cell: usize,
    position: Vec2,
}

/// Spatial hash over a fixed rectangle of world space.
///
/// Every tracked entity belongs to exactly one cell. The per-cell sets and the
/// reverse membership table are always updated together, so iterating the
/// cells visits each tracked entity exactly once.
#[derive(Clone, Debug)]
pub struct SpatialIndex<K> {
    bounds: WorldBounds,
    columns: usize,
    rows: usize,
    cells: Vec<BTreeSet<K>>,
    members: BTreeMap<K, Membership>,
}

impl<K> SpatialIndex<K>
where
    K: Copy + Ord,
{
    /// Creates an empty index covering the provided bounds.
    #[must_use]
    pub fn new(bounds: WorldBounds) -> Self {
        let columns = cells_spanning(bounds.min_x(), bounds.max_x());
        let rows = cells_spanning(bounds.min_y(), bounds.max_y());
        Self {
            bounds,
            columns,
            rows,
            cells: vec![BTreeSet::new(); columns * rows],
            members: BTreeMap::new(),
        }
    }

    /// Bounds covered by the index.
    #[must_use]
    pub const fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Reports whether no entity is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Reports whether the entity is tracked.
    #[must_use]
    pub fn contains(&self, id: K) -> bool {
        self.members.contains_key(&id)
    }

    /// Last position recorded for the entity.
    #[must_use]
    pub fn position(&self, id: K) -> Option<Vec2> {
        self.members.get(&id).map(|membership| membership.position)
    }

    /// Registers an entity at the provided position.
    pub fn insert(&mut self, id: K, position: Vec2) -> Result<(), SpatialIndexError> {
        if self.members.contains_key(&id) {
            return Err(SpatialIndexError::AlreadyTracked);
        }

        let cell = self.cell_of(position)?;
        let _ = self.cells[cell].insert(id);
        let _ = self.members.insert(id, Membership { cell, position });
        Ok(())
    }

    /// Stops tracking an entity.
    pub fn remove(&mut self, id: K) -> Result<(), SpatialIndexError> {
        let membership = self
            .members
            .remove(&id)
            .ok_or(SpatialIndexError::NotTracked)?;
        let _ = self.cells[membership.cell].remove(&id);
        Ok(())
    }

    /// Records a new position for a tracked entity, moving it between cells
    /// when required.
    ///
    /// A rejected position leaves the entity where it was.
    pub fn relocate(&mut self, id: K, position: Vec2) -> Result<(), SpatialIndexError> {
        let cell = self.cell_of(position)?;
        let membership = self
            .members
            .get_mut(&id)
            .ok_or(SpatialIndexError::NotTracked)?;

        membership.position = position;
        if membership.cell == cell {
            return Ok(());
        }

        let previous = membership.cell;
        membership.cell = cell;
        let _ = self.cells[previous].remove(&id);
        let _ = self.cells[cell].insert(id);
        Ok(())
    }

    /// Entities whose position lies within `radius` of `point`, edges included,
    /// in ascending identifier order.
    #[must_use]
    pub fn query_radius(&self, point: Vec2, radius: f64) -> Vec<K> {
        let mut found = Vec::new();
        if radius.is_nan() || radius < 0.0 || !point.is_finite() {
            return found;
        }

        let columns = span(
            point.x - radius,
            point.x + radius,
            self.bounds.min_x(),
            self.columns,
        );
        let rows = span(
            point.y - radius,
            point.y + radius,
            self.bounds.min_y(),
            self.rows,
        );
        let (Some(columns), Some(rows)) = (columns, rows) else {
            return found;
        };

        let radius_sq = radius * radius;
        for row in rows.0..=rows.1 {
            for column in columns.0..=columns.1 {
                for id in &self.cells[row * self.columns + column] {
                    let within = self.members.get(id).is_some_and(|membership| {
                        membership.position.distance_squared(point) <= radius_sq
                    });
                    if within {
                        found.push(*id);
                    }
                }
            }
        }

        found.sort_unstable();
        found
    }

    /// Iterates every tracked entity cell by cell, yielding its recorded position.
    pub fn iter(&self) -> impl Iterator<Item = (K, Vec2)> + '_ {
        self.cells.iter().flat_map(move |cell| {
            cell.iter().filter_map(move |id| {
                self.members
                    .get(id)
                    .map(|membership| (*id, membership.position))
            })
        })
    }

    fn cell_of(&self, position: Vec2) -> Result<usize, SpatialIndexError> {
        if !position.is_finite() || !self.bounds.contains(position) {
            return Err(SpatialIndexError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }

        let column = cell_offset(position.x, self.bounds.min_x()).min(self.columns as i64 - 1);
        let row = cell_offset(position.y, self.bounds.min_y()).min(self.rows as i64 - 1);
        Ok(row as usize * self.columns + column as usize)
    }
}

/// Inclusive range of cells overlapped by `[low, high]` along one axis,
/// clipped to the grid, or `None` when the range misses the grid entirely.
fn span(low: f64, high: f64, origin: i32, count: usize) -> Option<(usize, usize)> {
    let last = count as i64 - 1;
    let first = cell_offset(low, origin);
    let final_cell = cell_offset(high, origin);
    if final_cell < 0 || first > last {
        return None;
    }
    Some((first.max(0) as usize, final_cell.min(last) as usize))
}

fn cells_spanning(min: i32, max: i32) -> usize {
    let extent = f64::from(max) - f64::from(min);
    (extent / CELL_SIZE).ceil() as usize + 1
}

fn cell_offset(coordinate: f64, origin: i32) -> i64 {
    ((coordinate - f64::from(origin)) / CELL_SIZE).floor() as i64
}
