use serde::{Serialize, Serializer};

/// A square `size x size` matrix stored row-major.
///
/// Cells are addressed as `(row, col)`, matching the station coordinates used
/// by district definitions. Serializes as nested row arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareGrid<T> {
    cells: Vec<T>,
    size: usize,
}

impl<T: Clone> SquareGrid<T> {
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            cells: vec![value; size * size],
            size,
        }
    }
}

impl<T> SquareGrid<T> {
    /// Build a grid by calling `f(row, col)` for every cell in row-major order.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(f(row, col));
            }
        }
        Self { cells, size }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Linear station index for a coordinate.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.cells[self.index(row, col)]
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let idx = self.index(row, col);
        &mut self.cells[idx]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics, and an empty grid has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterate `((row, col), value)` in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| ((i / size, i % size), v))
    }

    /// Apply `f` cell-by-cell, keeping the shape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> SquareGrid<U> {
        SquareGrid {
            cells: self.cells.iter().map(&mut f).collect(),
            size: self.size,
        }
    }
}

impl<T: Serialize> Serialize for SquareGrid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
