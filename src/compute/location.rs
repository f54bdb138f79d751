//! Grid coordinate model.
//!
//! Locations are plain integer pairs. Toroidal wraparound is applied only
//! where neighbors are computed; everything handed out by the engines lies
//! within `[0, columns) x [0, rows)`.

use std::collections::HashSet;
use std::collections::hash_set;

use serde::{Deserialize, Serialize};

use crate::schema::ConfigError;

/// Relative positions of the 8 Moore neighbors.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// An immutable (x, y) grid location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellLocation {
    pub x: i32,
    pub y: i32,
}

impl CellLocation {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate without wrapping.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Toroidal representative of this location.
    #[inline]
    pub fn wrapped(self, size: GridSize) -> Self {
        Self {
            x: self.x.rem_euclid(size.columns),
            y: self.y.rem_euclid(size.rows),
        }
    }

    /// The 8 wrapped Moore neighbors.
    pub fn neighbors(self, size: GridSize) -> impl Iterator<Item = CellLocation> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy).wrapped(size))
    }

    /// Euclidean distance to another location.
    #[inline]
    pub fn distance(self, other: CellLocation) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for CellLocation {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Validated grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    columns: i32,
    rows: i32,
}

impl GridSize {
    /// Create grid dimensions, rejecting zero or oversized values.
    pub fn new(columns: usize, rows: usize) -> Result<Self, ConfigError> {
        let columns = i32::try_from(columns).map_err(|_| ConfigError::InvalidDimensions)?;
        let rows = i32::try_from(rows).map_err(|_| ConfigError::InvalidDimensions)?;
        if columns <= 0 || rows <= 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        Ok(Self { columns, rows })
    }

    /// Square grid. Only for compile-time constant sizes known to be valid.
    pub(crate) const fn square(side: i32) -> Self {
        Self {
            columns: side,
            rows: side,
        }
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Whether a location lies on the grid (no wraparound).
    #[inline]
    pub fn contains(&self, loc: CellLocation) -> bool {
        loc.x >= 0 && loc.y >= 0 && loc.x < self.columns && loc.y < self.rows
    }

    /// Row-major index of an on-grid location.
    #[inline]
    pub fn index(&self, loc: CellLocation) -> usize {
        loc.y as usize * self.columns as usize + loc.x as usize
    }

    /// The four corner cells.
    pub fn corners(&self) -> [CellLocation; 4] {
        let (r, b) = (self.columns - 1, self.rows - 1);
        [
            CellLocation::new(0, 0),
            CellLocation::new(r, 0),
            CellLocation::new(0, b),
            CellLocation::new(r, b),
        ]
    }

    /// Every location in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = CellLocation> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |y| (0..columns).map(move |x| CellLocation::new(x, y)))
    }
}

/// The set of currently alive cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    cells: HashSet<CellLocation>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashSet::with_capacity(capacity),
        }
    }

    /// Returns true if the location was newly inserted.
    pub fn insert(&mut self, loc: CellLocation) -> bool {
        self.cells.insert(loc)
    }

    pub fn remove(&mut self, loc: CellLocation) -> bool {
        self.cells.remove(&loc)
    }

    #[inline]
    pub fn contains(&self, loc: CellLocation) -> bool {
        self.cells.contains(&loc)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = CellLocation> + '_ {
        self.cells.iter().copied()
    }

    /// Locations active here but not in `previous`.
    pub fn born_since<'a>(
        &'a self,
        previous: &'a ActiveSet,
    ) -> impl Iterator<Item = CellLocation> + 'a {
        self.cells.difference(&previous.cells).copied()
    }

    /// Locations active in `previous` but not here.
    pub fn died_since<'a>(
        &'a self,
        previous: &'a ActiveSet,
    ) -> impl Iterator<Item = CellLocation> + 'a {
        previous.cells.difference(&self.cells).copied()
    }

    /// Whether every location lies on the grid.
    pub fn fits(&self, size: GridSize) -> bool {
        self.cells.iter().all(|&loc| size.contains(loc))
    }

    /// Locations sorted row-major, for stable output.
    pub fn sorted(&self) -> Vec<CellLocation> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_by_key(|loc| (loc.y, loc.x));
        cells
    }
}

impl FromIterator<CellLocation> for ActiveSet {
    fn from_iter<I: IntoIterator<Item = CellLocation>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<CellLocation> for ActiveSet {
    fn extend<I: IntoIterator<Item = CellLocation>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl IntoIterator for ActiveSet {
    type Item = CellLocation;
    type IntoIter = hash_set::IntoIter<CellLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActiveSet {
    type Item = &'a CellLocation;
    type IntoIter = hash_set::Iter<'a, CellLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
