//! Pixel grids and sampling helpers.

use std::ops::{Index, IndexMut};

/// `n` evenly spaced samples over `[start, end]`, endpoints included.
///
/// A single sample yields `[start]`; zero samples yield an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|k| if k == n - 1 { end } else { start + step * k as f64 })
                .collect()
        }
    }
}

/// Row-major 2D array indexed as `grid[(j, i)]`, `j` along y and `i` along x.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Grid of `rows x cols` cells all holding `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Reset every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|cell| *cell = value.clone());
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, j: usize, i: usize) -> Option<&T> {
        if j < self.rows && i < self.cols {
            self.data.get(j * self.cols + i)
        } else {
            None
        }
    }

    /// Iterate over `(j, i, value)` in row-major order.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, v)| (k / cols, k % cols, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }

    /// Build a new grid by applying `f` to every cell.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (j, i): (usize, usize)) -> &T {
        assert!(j < self.rows && i < self.cols, "grid index out of bounds");
        &self.data[j * self.cols + i]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (j, i): (usize, usize)) -> &mut T {
        assert!(j < self.rows && i < self.cols, "grid index out of bounds");
        &mut self.data[j * self.cols + i]
    }
}
