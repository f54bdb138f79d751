//! Discrete circle approximation and the shared perimeter cache.
//!
//! A unit cell at offset (dx, dy) is sampled at its four corners and its
//! center. Sample coordinates are doubled so every comparison against the
//! squared radius is exact integer arithmetic. A cell is inside a circle when
//! at least `threshold` samples lie within it, and on the perimeter when it
//! is inside and one of its four axis neighbors is not.
//!
//! Radii 0, 1 and 2 use hand-specified shapes: a single cell up to radius 1,
//! then a plus. A selection paints radius 2 first, so its center is covered.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info};

use super::{CellLocation, GridSize};

/// Offset of a perimeter cell relative to the circle's center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Absolute location about a center.
    #[inline]
    pub fn around(self, center: CellLocation) -> CellLocation {
        center.offset(self.dx, self.dy)
    }
}

const PLUS: [Offset; 5] = [
    Offset::new(0, -1),
    Offset::new(-1, 0),
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(0, 1),
];

/// Number of the five sample points of cell (dx, dy) inside a circle of `radius`.
pub fn sample_count(dx: i32, dy: i32, radius: u32) -> u8 {
    let limit = 4 * i64::from(radius) * i64::from(radius);
    let (x2, y2) = (2 * i64::from(dx), 2 * i64::from(dy));

    let inside = |sx: i64, sy: i64| sx * sx + sy * sy <= limit;

    let mut count = u8::from(inside(x2, y2));
    for (cx, cy) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
        count += u8::from(inside(x2 + cx, y2 + cy));
    }
    count
}

/// Whether offset (dx, dy) lies in the disc of `radius`.
///
/// Painting and occlusion both go through this test so they agree on the
/// boundary: a cell whose sample count equals `threshold` is inside.
/// `threshold` must be in `1..=5`; 0 would put every cell inside.
pub fn disc_contains(dx: i32, dy: i32, radius: u32, threshold: u8) -> bool {
    match radius {
        0 | 1 => dx == 0 && dy == 0,
        2 => dx.abs() + dy.abs() <= 1,
        _ => sample_count(dx, dy, radius) >= threshold,
    }
}

/// Perimeter offsets for a circle of `radius`, sorted row-major.
pub fn perimeter_offsets(radius: u32, threshold: u8) -> Vec<Offset> {
    match radius {
        0 | 1 => vec![Offset::new(0, 0)],
        2 => PLUS.to_vec(),
        _ => {
            let reach = radius as i32 + 1;
            let inside = |dx: i32, dy: i32| disc_contains(dx, dy, radius, threshold);

            let mut offsets = Vec::new();
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    if !inside(dx, dy) {
                        continue;
                    }
                    let boundary = !inside(dx - 1, dy)
                        || !inside(dx + 1, dy)
                        || !inside(dx, dy - 1)
                        || !inside(dx, dy + 1);
                    if boundary {
                        offsets.push(Offset::new(dx, dy));
                    }
                }
            }
            offsets
        }
    }
}

/// Ceiling of the distance from `center` to the farthest grid corner.
pub fn max_radius_for(center: CellLocation, size: GridSize) -> u32 {
    size.corners()
        .iter()
        .map(|&corner| center.distance(corner))
        .fold(0.0f64, f64::max)
        .ceil() as u32
}

/// Shared, append-only cache of perimeter offsets keyed by radius.
///
/// Entries are translation invariant and never change once published, so
/// they are handed out as `Arc<[Offset]>`.
#[derive(Debug)]
pub struct CircleCache {
    threshold: u8,
    entries: RwLock<HashMap<u32, Arc<[Offset]>>>,
}

impl CircleCache {
    /// Create an empty cache for the given sample threshold, clamped to `1..=5`.
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.clamp(1, 5),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Perimeter offsets for `radius`, computing and publishing them on a miss.
    pub fn perimeter(&self, radius: u32) -> Arc<[Offset]> {
        if let Some(hit) = self.lookup(radius) {
            return hit;
        }
        self.publish(radius).0
    }

    /// Disc membership under this cache's threshold.
    #[inline]
    pub fn contains(&self, dx: i32, dy: i32, radius: u32) -> bool {
        disc_contains(dx, dy, radius, self.threshold)
    }

    /// Whether `radius` has been cached.
    pub fn is_cached(&self, radius: u32) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&radius)
    }

    /// Number of cached radii.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill radii `0..=max_radius` on a background thread.
    ///
    /// The thread returns how many entries it computed itself. Nothing
    /// waits on it; a concurrent miss simply computes the entry too.
    pub fn warm(self: &Arc<Self>, max_radius: u32) -> io::Result<JoinHandle<usize>> {
        let cache = Arc::clone(self);
        thread::Builder::new()
            .name("circle-cache-warm".into())
            .spawn(move || {
                let start = Instant::now();
                let mut computed = 0;
                for radius in 0..=max_radius {
                    if cache.lookup(radius).is_none() && cache.publish(radius).1 {
                        computed += 1;
                    }
                }
                info!(
                    "Circle cache warmed to radius {} ({} new entries) in {:.1?}",
                    max_radius,
                    computed,
                    start.elapsed()
                );
                computed
            })
    }

    fn lookup(&self, radius: u32) -> Option<Arc<[Offset]>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&radius)
            .cloned()
    }

    /// Compute outside the lock, then insert unless another thread won the race.
    /// Returns the published entry and whether this call inserted it.
    fn publish(&self, radius: u32) -> (Arc<[Offset]>, bool) {
        let computed: Arc<[Offset]> = perimeter_offsets(radius, self.threshold).into();

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match entries.get(&radius) {
            Some(existing) => (Arc::clone(existing), false),
            None => {
                debug!("Cached perimeter for radius {} ({} cells)", radius, computed.len());
                entries.insert(radius, Arc::clone(&computed));
                (computed, true)
            }
        }
    }
}

impl Default for CircleCache {
    fn default() -> Self {
        Self::new(1)
    }
}
