//! Windowed nearest-feature search and the per-cell sweep.
//!
//! Five of the filters answer the same question for every cell: which
//! qualifying neighbour inside a square window is best, and how far away
//! is it? [`Window`] answers it once, parameterised by a predicate on the
//! neighbour's value and a score derived from that value and the
//! distance.
//!
//! # Scan order
//!
//! Offsets are visited in raster order, `dy` (rows) outer and `dx`
//! (columns) inner, each from `-R` to `+R`. A candidate replaces the
//! current best only on a strictly smaller score, so among equal scores
//! the first one visited wins. Neighbours on the outermost ring of the
//! grid are never considered, and the scan is clipped to the interior so
//! its cost never exceeds the grid size whatever the radius.

use scree_core::GridShape;

/// How the metric search radius bounds candidates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cutoff {
    /// Accept `distance <= r`.
    Inclusive(f32),
    /// Accept `distance < r`.
    Exclusive(f32),
    /// Accept everything inside the square window.
    Unbounded,
}

impl Cutoff {
    #[inline]
    fn admits(self, distance: f32) -> bool {
        match self {
            Self::Inclusive(r) => distance <= r,
            Self::Exclusive(r) => distance < r,
            Self::Unbounded => true,
        }
    }
}

/// The winning neighbour of one search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit<T> {
    /// Column offset from the query cell.
    pub dx: i32,
    /// Row offset from the query cell.
    pub dy: i32,
    /// `scale · √(dx² + dy²)`.
    pub distance: f32,
    /// The score that won the comparison.
    pub score: f32,
    /// The neighbour's value.
    pub value: T,
}

/// A square search window of half-width `radius_cells`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    radius_cells: i32,
    scale: f32,
    cutoff: Cutoff,
}

impl Window {
    /// Window for a metric radius: `R = ⌈radius / resolution⌉` cells,
    /// distances in metres.
    pub fn metric(radius: f32, resolution: f32, cutoff: Cutoff) -> Self {
        Self {
            radius_cells: cells_for(radius, resolution),
            scale: resolution,
            cutoff,
        }
    }

    /// Window of `radius_cells` with distances in cells.
    pub fn cells(radius_cells: i32, cutoff: Cutoff) -> Self {
        Self {
            radius_cells: radius_cells.max(0),
            scale: 1.0,
            cutoff,
        }
    }

    /// Half-width in cells.
    pub fn radius_cells(&self) -> i32 {
        self.radius_cells
    }

    /// The nearest neighbour whose value satisfies `pred`.
    #[inline]
    pub fn nearest<T, P>(&self, input: &[T], shape: GridShape, row: usize, col: usize, pred: P) -> Option<Hit<T>>
    where
        T: Copy,
        P: Fn(T) -> bool,
    {
        self.best(input, shape, row, col, pred, |_, distance| distance)
    }

    /// The neighbour with the smallest `score(value, distance)` among
    /// those satisfying `pred` and the cutoff.
    pub fn best<T, P, S>(
        &self,
        input: &[T],
        shape: GridShape,
        row: usize,
        col: usize,
        pred: P,
        score: S,
    ) -> Option<Hit<T>>
    where
        T: Copy,
        P: Fn(T) -> bool,
        S: Fn(T, f32) -> f32,
    {
        let r = self.radius_cells;
        let (row, col) = (row as i32, col as i32);
        let (rows, cols) = (interior_span(shape.height), interior_span(shape.width));
        let mut best: Option<Hit<T>> = None;

        for dy in (-r).max(1 - row)..=r.min(rows - row) {
            let nr = (row + dy) as usize;
            for dx in (-r).max(1 - col)..=r.min(cols - col) {
                debug_assert!(shape.is_interior(row + dy, col + dx));
                let value = input[shape.index(nr, (col + dx) as usize)];
                if !pred(value) {
                    continue;
                }
                let (fx, fy) = (dx as f32, dy as f32);
                let distance = self.scale * (fx * fx + fy * fy).sqrt();
                if !self.cutoff.admits(distance) {
                    continue;
                }
                let s = score(value, distance);
                if best.is_none_or(|b| s < b.score) {
                    best = Some(Hit {
                        dx,
                        dy,
                        distance,
                        score: s,
                        value,
                    });
                }
            }
        }
        best
    }
}

/// Last interior index along an axis of `len` cells, `len - 2`.
#[inline]
fn interior_span(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX).saturating_sub(2)
}

/// `⌈radius / resolution⌉`, computed in `f64` so exact multiples do not
/// round up a cell.
pub fn cells_for(radius: f32, resolution: f32) -> i32 {
    let cells = (f64::from(radius) / f64::from(resolution)).ceil();
    if cells.is_finite() && cells > 0.0 {
        cells.min(f64::from(i32::MAX)) as i32
    } else {
        0
    }
}

/// Write `f(row, col)` into every cell of `out`, one row at a time.
///
/// With the `parallel` feature rows run on the rayon pool.
pub fn sweep<F>(shape: GridShape, out: &mut [f32], f: F)
where
    F: Fn(usize, usize) -> f32 + Sync,
{
    debug_assert_eq!(out.len(), shape.cell_count());

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(shape.width)
            .enumerate()
            .for_each(|(row, line)| fill_row(row, line, &f));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (row, line) in out.chunks_mut(shape.width).enumerate() {
            fill_row(row, line, &f);
        }
    }
}

#[inline]
fn fill_row<F: Fn(usize, usize) -> f32>(row: usize, line: &mut [f32], f: &F) {
    for (col, v) in line.iter_mut().enumerate() {
        *v = f(row, col);
    }
}

/// Logistic function `1 / (1 + e^(−x))`.
#[inline]
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
