//! Fixed-size grid of cells
//!
//! Row-major storage, `y` grows upward. Every lookup is bounds-checked; an
//! out-of-bounds position simply has no cell.

use glam::IVec2;
use smallvec::SmallVec;

use super::cell::Cell;
use crate::simulation::{MaterialKind, MaterialProfile};

/// Neighbor set used for a query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Neighborhood {
    /// The eight surrounding cells
    #[default]
    Moore,
    /// The other three cells of the aligned 2x2 block containing the position
    Margolus,
}

/// Up to eight in-bounds neighbor positions
pub type Neighbors = SmallVec<[IVec2; 8]>;

#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    /// Template written into cleared positions
    empty: Cell,
}

impl Grid {
    /// Grid of `width * height` cells of the empty material
    pub fn new(width: usize, height: usize, empty: &MaterialProfile) -> Self {
        let empty = Cell::new(empty);
        Self {
            width,
            height,
            cells: vec![empty; width * height],
            empty,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    pub fn get(&self, pos: IVec2) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut Cell> {
        let i = self.index(pos)?;
        Some(&mut self.cells[i])
    }

    /// Material at `pos`, `None` outside the grid
    pub fn kind_at(&self, pos: IVec2) -> Option<MaterialKind> {
        self.get(pos).map(|cell| cell.kind)
    }

    /// Overwrite the cell at `pos`; returns false outside the grid
    pub fn set(&mut self, pos: IVec2, cell: Cell) -> bool {
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Reset `pos` to an empty cell
    pub fn clear(&mut self, pos: IVec2) -> bool {
        let empty = self.empty;
        self.set(pos, empty)
    }

    /// Reset every cell to empty
    pub fn clear_all(&mut self) {
        let empty = self.empty;
        self.cells.fill(empty);
    }

    /// Exchange two cells, including their temperature and pending heat
    pub fn swap(&mut self, a: IVec2, b: IVec2) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Move the cell at `from` into `to` and leave `from` empty
    pub fn relocate(&mut self, from: IVec2, to: IVec2) -> bool {
        match (self.index(from), self.index(to)) {
            (Some(src), Some(dst)) => {
                self.cells[dst] = self.cells[src];
                self.cells[src] = self.empty;
                true
            }
            _ => false,
        }
    }

    /// Replace the material at `pos` with a fresh cell of `profile`,
    /// keeping the previous temperature when `keep_temperature` is set.
    pub fn convert(&mut self, pos: IVec2, profile: &MaterialProfile, keep_temperature: bool) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                *cell = if keep_temperature {
                    cell.transmuted(profile)
                } else {
                    Cell::new(profile)
                };
                true
            }
            None => false,
        }
    }

    /// In-bounds neighbors of `pos`
    ///
    /// Moore neighbors come column by column (x from -1 to 1, then y from -1
    /// to 1), skipping the center.
    pub fn neighbors(&self, pos: IVec2, neighborhood: Neighborhood) -> Neighbors {
        let mut out = Neighbors::new();
        match neighborhood {
            Neighborhood::Moore => {
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let n = pos + IVec2::new(dx, dy);
                        if self.in_bounds(n) {
                            out.push(n);
                        }
                    }
                }
            }
            Neighborhood::Margolus => {
                let origin = IVec2::new(pos.x - pos.x.rem_euclid(2), pos.y - pos.y.rem_euclid(2));
                for offset in [IVec2::ZERO, IVec2::X, IVec2::Y, IVec2::ONE] {
                    let n = origin + offset;
                    if n != pos && self.in_bounds(n) {
                        out.push(n);
                    }
                }
            }
        }
        out
    }

    /// Moore neighbors of `pos` currently holding the empty material
    pub fn empty_neighbors(&self, pos: IVec2) -> Neighbors {
        self.neighbors(pos, Neighborhood::Moore)
            .into_iter()
            .filter(|&n| self.kind_at(n).is_some_and(MaterialKind::is_empty))
            .collect()
    }

    /// Materials of the Moore neighbors of `pos`
    pub fn neighbor_kinds(&self, pos: IVec2) -> SmallVec<[MaterialKind; 8]> {
        self.neighbors(pos, Neighborhood::Moore)
            .into_iter()
            .filter_map(|n| self.kind_at(n))
            .collect()
    }

    /// Every position, row by row
    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| IVec2::new(x as i32, y as i32)))
    }

    /// In-bounds positions of the square brush of half-width `radius` around `center`
    pub fn brush(&self, center: IVec2, radius: u32) -> impl Iterator<Item = IVec2> + '_ {
        let r = radius as i32;
        (-r..=r)
            .flat_map(move |dy| (-r..=r).map(move |dx| center + IVec2::new(dx, dy)))
            .filter(move |&p| self.in_bounds(p))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
