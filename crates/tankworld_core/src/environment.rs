//! Bounded 2D arena with grid-based spatial queries.
//!
//! The grid is rebuilt once per tick in the ENVIRONMENT phase from committed
//! positions, so every system inside a tick sees one consistent index.
//! Candidate lists always come back in ascending [`EntityId`] order; all
//! downstream tie-breaking depends on that contract.

use std::collections::HashMap;
use tankworld_data::{EntityId, EntityKind, Vec2};

#[derive(Debug, Clone, Copy)]
struct Slot {
    cell: usize,
    kind: EntityKind,
    pos: Vec2,
}

/// Uniform-grid spatial index over the arena.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    width: f32,
    height: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<EntityId>>,
    slots: HashMap<EntityId, Slot>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, width: f32, height: f32) -> Self {
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            slots: HashMap::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Component-wise clamp onto the arena. Applied on every exit path that
    /// writes a position.
    pub fn clamp_pos(&self, pos: Vec2) -> Vec2 {
        pos.clamped(self.width, self.height)
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.slots.clear();
    }

    fn cell_index(&self, pos: Vec2) -> usize {
        let cx = ((pos.x / self.cell_size) as usize).min(self.cols - 1);
        let cy = ((pos.y / self.cell_size) as usize).min(self.rows - 1);
        cy * self.cols + cx
    }

    pub fn insert(&mut self, id: EntityId, kind: EntityKind, pos: Vec2) {
        let pos = self.clamp_pos(pos);
        let cell = self.cell_index(pos);
        let bucket = &mut self.cells[cell];
        if let Err(at) = bucket.binary_search(&id) {
            bucket.insert(at, id);
        }
        self.slots.insert(id, Slot { cell, kind, pos });
    }

    pub fn remove(&mut self, id: EntityId) {
        if let Some(slot) = self.slots.remove(&id) {
            let bucket = &mut self.cells[slot.cell];
            if let Ok(at) = bucket.binary_search(&id) {
                bucket.remove(at);
            }
        }
    }

    pub fn update(&mut self, id: EntityId, new_pos: Vec2) {
        let Some(slot) = self.slots.get(&id).copied() else {
            return;
        };
        let new_pos = self.clamp_pos(new_pos);
        let new_cell = self.cell_index(new_pos);
        if new_cell != slot.cell {
            let bucket = &mut self.cells[slot.cell];
            if let Ok(at) = bucket.binary_search(&id) {
                bucket.remove(at);
            }
            let bucket = &mut self.cells[new_cell];
            if let Err(at) = bucket.binary_search(&id) {
                bucket.insert(at, id);
            }
        }
        self.slots.insert(
            id,
            Slot {
                cell: new_cell,
                kind: slot.kind,
                pos: new_pos,
            },
        );
    }

    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.slots.get(&id).map(|s| s.pos)
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.slots.get(&id).map(|s| s.kind)
    }

    /// Candidates within `radius` of `pos`, filtered by kind, ascending by
    /// `EntityId`. Distance is checked precisely here; overlapping-cell
    /// candidates outside the radius are dropped.
    pub fn neighbors(&self, pos: Vec2, radius: f32, filter: Option<EntityKind>) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.for_each_candidate(pos, radius, |id, slot| {
            if filter.is_some_and(|k| k != slot.kind) {
                return;
            }
            if slot.pos.distance_squared_to(pos) <= radius * radius {
                out.push(id);
            }
        });
        out.sort_unstable();
        out
    }

    /// Closest entity of the given kind, ties broken by ascending
    /// `EntityId`. Searches ring-by-ring outward so the common case stays
    /// local, falling back to the whole grid.
    pub fn nearest(&self, pos: Vec2, filter: Option<EntityKind>) -> Option<EntityId> {
        let mut radius = self.cell_size;
        let max_radius = self.width.max(self.height) * 2.0;
        while radius <= max_radius {
            let mut best: Option<(u32, EntityId)> = None;
            self.for_each_candidate(pos, radius, |id, slot| {
                if filter.is_some_and(|k| k != slot.kind) {
                    return;
                }
                let d2 = slot.pos.distance_squared_to(pos);
                if d2 <= radius * radius {
                    let key = (d2.to_bits(), id);
                    if best.map_or(true, |b| key < b) {
                        best = Some(key);
                    }
                }
            });
            if let Some((_, id)) = best {
                return Some(id);
            }
            radius *= 2.0;
        }
        None
    }

    fn for_each_candidate<F>(&self, pos: Vec2, radius: f32, mut f: F)
    where
        F: FnMut(EntityId, &Slot),
    {
        let min_cx = (((pos.x - radius) / self.cell_size).floor().max(0.0)) as usize;
        let max_cx = (((pos.x + radius) / self.cell_size).floor()) as usize;
        let min_cy = (((pos.y - radius) / self.cell_size).floor().max(0.0)) as usize;
        let max_cy = (((pos.y + radius) / self.cell_size).floor()) as usize;
        let max_cx = max_cx.min(self.cols - 1);
        let max_cy = max_cy.min(self.rows - 1);

        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                for &id in &self.cells[cy * self.cols + cx] {
                    if let Some(slot) = self.slots.get(&id) {
                        f(id, slot);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialGrid {
        SpatialGrid::new(50.0, 800.0, 600.0)
    }

    #[test]
    fn insert_and_query_same_cell() {
        let mut g = grid();
        g.insert(EntityId(1), EntityKind::Fish, Vec2::new(10.0, 10.0));
        g.insert(EntityId(2), EntityKind::Fish, Vec2::new(12.0, 14.0));
        let found = g.neighbors(Vec2::new(11.0, 12.0), 10.0, Some(EntityKind::Fish));
        assert_eq!(found, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn neighbors_respects_radius_and_kind() {
        let mut g = grid();
        g.insert(EntityId(1), EntityKind::Fish, Vec2::new(100.0, 100.0));
        g.insert(EntityId(2), EntityKind::Food, Vec2::new(104.0, 100.0));
        g.insert(EntityId(3), EntityKind::Fish, Vec2::new(400.0, 400.0));
        let fish = g.neighbors(Vec2::new(100.0, 100.0), 20.0, Some(EntityKind::Fish));
        assert_eq!(fish, vec![EntityId(1)]);
        let food = g.neighbors(Vec2::new(100.0, 100.0), 20.0, Some(EntityKind::Food));
        assert_eq!(food, vec![EntityId(2)]);
    }

    #[test]
    fn neighbors_sorted_ascending_by_id() {
        let mut g = grid();
        for raw in [9u64, 3, 7, 1, 5] {
            g.insert(EntityId(raw), EntityKind::Food, Vec2::new(60.0, 60.0));
        }
        let found = g.neighbors(Vec2::new(60.0, 60.0), 5.0, Some(EntityKind::Food));
        let raws: Vec<u64> = found.iter().map(|id| id.raw()).collect();
        assert_eq!(raws, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn nearest_breaks_distance_ties_by_id() {
        let mut g = grid();
        g.insert(EntityId(8), EntityKind::Food, Vec2::new(110.0, 100.0));
        g.insert(EntityId(2), EntityKind::Food, Vec2::new(90.0, 100.0));
        let nearest = g.nearest(Vec2::new(100.0, 100.0), Some(EntityKind::Food));
        assert_eq!(nearest, Some(EntityId(2)));
    }

    #[test]
    fn nearest_finds_far_entity() {
        let mut g = grid();
        g.insert(EntityId(1), EntityKind::Crab, Vec2::new(790.0, 590.0));
        let nearest = g.nearest(Vec2::new(5.0, 5.0), Some(EntityKind::Crab));
        assert_eq!(nearest, Some(EntityId(1)));
    }

    #[test]
    fn update_moves_between_cells() {
        let mut g = grid();
        g.insert(EntityId(1), EntityKind::Fish, Vec2::new(10.0, 10.0));
        g.update(EntityId(1), Vec2::new(700.0, 500.0));
        assert!(g
            .neighbors(Vec2::new(10.0, 10.0), 30.0, None)
            .is_empty());
        assert_eq!(
            g.neighbors(Vec2::new(700.0, 500.0), 30.0, None),
            vec![EntityId(1)]
        );
    }

    #[test]
    fn remove_clears_entity() {
        let mut g = grid();
        g.insert(EntityId(1), EntityKind::Fish, Vec2::new(10.0, 10.0));
        g.remove(EntityId(1));
        assert!(g.is_empty());
        assert_eq!(g.nearest(Vec2::new(10.0, 10.0), None), None);
    }

    #[test]
    fn positions_clamped_to_arena() {
        let mut g = grid();
        g.insert(EntityId(1), EntityKind::Food, Vec2::new(-40.0, 900.0));
        assert_eq!(g.position_of(EntityId(1)), Some(Vec2::new(0.0, 600.0)));
    }
}
