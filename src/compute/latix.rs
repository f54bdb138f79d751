//! Latix - radial "ink spreading" growth.
//!
//! Each selection grows one radius per expansion, painting the perimeter of
//! its current circle. With occlusion enabled, cells already covered by the
//! disc of a younger selection (larger ordinal) are left alone. A selection
//! retires on the expansion after its radius passes the distance to the
//! farthest grid corner.

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{debug, trace};
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::schema::LatixConfig;

use super::{CellLocation, CircleCache, Color, ColorSequence, GridAccess, GridSize, max_radius_for};

/// Identifies a selection by its creation ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionHandle(u64);

impl SelectionHandle {
    pub fn ordinal(&self) -> u64 {
        self.0
    }
}

/// One growing selection.
#[derive(Debug, Clone)]
pub struct RadialSelection {
    center: CellLocation,
    radius: u32,
    max_radius: u32,
    ordinal: u64,
    color: Color,
    retired: bool,
    rng: StdRng,
}

impl RadialSelection {
    /// New selection at radius 1.
    pub fn new(center: CellLocation, size: GridSize, ordinal: u64, color: Color, rng: StdRng) -> Self {
        Self {
            center,
            radius: 1,
            max_radius: max_radius_for(center, size),
            ordinal,
            color,
            retired: false,
            rng,
        }
    }

    pub fn center(&self) -> CellLocation {
        self.center
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn max_radius(&self) -> u32 {
        self.max_radius
    }

    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn handle(&self) -> SelectionHandle {
        SelectionHandle(self.ordinal)
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Consistent (center, radius, ordinal) copy for occlusion tests.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            center: self.center,
            radius: self.radius,
            ordinal: self.ordinal,
        }
    }
}

/// Frozen view of a selection taken before a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub center: CellLocation,
    pub radius: u32,
    pub ordinal: u64,
}

impl SelectionSnapshot {
    /// Whether `loc` lies in this selection's current disc.
    #[inline]
    pub fn covers(&self, loc: CellLocation, cache: &CircleCache) -> bool {
        cache.contains(loc.x - self.center.x, loc.y - self.center.y, self.radius)
    }
}

/// A cell to colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintedCell {
    pub location: CellLocation,
    pub color: Color,
}

/// Result of one expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOutcome {
    pub painted: Vec<PaintedCell>,
    /// The selection retired on this call; nothing was painted.
    pub retired: bool,
}

/// Grow a selection by one radius and collect the cells it paints.
///
/// `snapshots` may include the selection itself; only strictly younger
/// selections occlude. Perimeter cells off the grid are skipped.
pub fn expand_selection(
    selection: &mut RadialSelection,
    snapshots: &[SelectionSnapshot],
    occlusion: bool,
    cache: &CircleCache,
    size: GridSize,
    jitter: f32,
) -> ExpandOutcome {
    if selection.retired || selection.radius > selection.max_radius {
        selection.retired = true;
        return ExpandOutcome {
            painted: Vec::new(),
            retired: true,
        };
    }

    selection.radius += 1;
    let perimeter = cache.perimeter(selection.radius);

    let younger: Vec<&SelectionSnapshot> = if occlusion {
        snapshots
            .iter()
            .filter(|s| s.ordinal > selection.ordinal)
            .collect()
    } else {
        Vec::new()
    };

    let center = selection.center;
    let mut painted = Vec::with_capacity(perimeter.len());
    for loc in perimeter.iter().map(|o| o.around(center)) {
        if !size.contains(loc) {
            continue;
        }
        if younger.iter().any(|s| s.covers(loc, cache)) {
            continue;
        }
        painted.push(PaintedCell {
            location: loc,
            color: selection.color.jittered(&mut selection.rng, jitter),
        });
    }

    trace!(
        "Selection {} radius {}: {} of {} perimeter cells painted",
        selection.ordinal,
        selection.radius,
        painted.len(),
        perimeter.len()
    );

    ExpandOutcome {
        painted,
        retired: false,
    }
}

/// Owns every growing selection plus the shared circle cache.
pub struct RadialGrowthEngine {
    size: GridSize,
    cache: Arc<CircleCache>,
    occlusion: bool,
    jitter: f32,
    /// Kept sorted by ordinal.
    selections: Vec<RadialSelection>,
    next_ordinal: u64,
    colors: ColorSequence,
    rng: StdRng,
}

impl RadialGrowthEngine {
    /// Create an engine with its own circle cache.
    pub fn new(size: GridSize, config: &LatixConfig) -> Self {
        Self::with_cache(size, config, Arc::new(CircleCache::new(config.sample_threshold)))
    }

    /// Create an engine sharing an existing circle cache.
    pub fn with_cache(size: GridSize, config: &LatixConfig, cache: Arc<CircleCache>) -> Self {
        let rng = config
            .rng_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            size,
            cache,
            occlusion: config.occlusion,
            jitter: config.jitter,
            selections: Vec::new(),
            next_ordinal: 0,
            colors: ColorSequence::default(),
            rng,
        }
    }

    /// Replace the colour rotation.
    pub fn with_colors(mut self, colors: ColorSequence) -> Self {
        self.colors = colors;
        self
    }

    pub fn cache(&self) -> &Arc<CircleCache> {
        &self.cache
    }

    pub fn set_occlusion(&mut self, occlusion: bool) {
        self.occlusion = occlusion;
    }

    /// Start a selection at `center`. Without a colour the next palette colour is used.
    ///
    /// Returns `None` for a center off the grid.
    pub fn start_selection(
        &mut self,
        center: CellLocation,
        color: Option<Color>,
    ) -> Option<SelectionHandle> {
        if !self.size.contains(center) {
            return None;
        }
        let color = color.unwrap_or_else(|| self.colors.next_color());
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let rng = StdRng::seed_from_u64(self.rng.r#gen());
        let selection = RadialSelection::new(center, self.size, ordinal, color, rng);
        debug!(
            "Selection {} started at ({}, {}), max radius {}",
            ordinal, center.x, center.y, selection.max_radius
        );
        let handle = selection.handle();
        self.selections.push(selection);
        Some(handle)
    }

    /// Expand one selection. Returns `None` if the handle is unknown or already removed.
    pub fn expand(&mut self, handle: SelectionHandle) -> Option<ExpandOutcome> {
        let index = self.position(handle)?;
        let snapshots = self.snapshots();
        let outcome = expand_selection(
            &mut self.selections[index],
            &snapshots,
            self.occlusion,
            &self.cache,
            self.size,
            self.jitter,
        );
        if outcome.retired {
            let selection = self.selections.remove(index);
            debug!("Selection {} retired", selection.ordinal);
        }
        Some(outcome)
    }

    /// Expand every selection once, in parallel, against one snapshot.
    pub fn tick(&mut self) -> Vec<(SelectionHandle, ExpandOutcome)> {
        let snapshots = self.snapshots();
        let cache = self.cache.as_ref();
        let (occlusion, size, jitter) = (self.occlusion, self.size, self.jitter);

        let outcomes: Vec<_> = self
            .selections
            .par_iter_mut()
            .map(|selection| {
                let outcome =
                    expand_selection(selection, &snapshots, occlusion, cache, size, jitter);
                (selection.handle(), outcome)
            })
            .collect();

        let before = self.selections.len();
        self.selections.retain(|s| !s.retired);
        if self.selections.len() != before {
            debug!("{} selection(s) retired", before - self.selections.len());
        }
        outcomes
    }

    /// Apply painted cells to a grid. Returns the number of cells written.
    pub fn paint<G: GridAccess>(grid: &mut G, outcome: &ExpandOutcome) -> usize {
        let mut written = 0;
        for cell in &outcome.painted {
            if let Some(handle) = grid.cell_at(cell.location.x, cell.location.y) {
                grid.set_color(handle, cell.color);
                grid.write(handle);
                written += 1;
            }
        }
        written
    }

    /// Drop every selection. Ordinals keep increasing.
    pub fn erase_all(&mut self) {
        self.selections.clear();
    }

    /// Fill the circle cache up to `max_radius` in the background.
    pub fn warm_cache(&self, max_radius: u32) -> io::Result<JoinHandle<usize>> {
        self.cache.warm(max_radius)
    }

    pub fn selections(&self) -> &[RadialSelection] {
        &self.selections
    }

    pub fn selection(&self, handle: SelectionHandle) -> Option<&RadialSelection> {
        self.position(handle).map(|i| &self.selections[i])
    }

    pub fn is_idle(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn snapshots(&self) -> Vec<SelectionSnapshot> {
        self.selections.iter().map(RadialSelection::snapshot).collect()
    }

    fn position(&self, handle: SelectionHandle) -> Option<usize> {
        self.selections
            .binary_search_by_key(&handle.0, |s| s.ordinal)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{CellGrid, perimeter_offsets};
    use crate::schema::DisplayMode;

    fn config(occlusion: bool) -> LatixConfig {
        LatixConfig {
            occlusion,
            sample_threshold: 1,
            warm_radius: 0,
            jitter: 0.0,
            rng_seed: Some(42),
        }
    }

    fn engine(columns: usize, rows: usize, occlusion: bool) -> RadialGrowthEngine {
        RadialGrowthEngine::new(GridSize::new(columns, rows).unwrap(), &config(occlusion))
    }

    #[test]
    fn test_radius_increments_then_retires_once() {
        let mut engine = engine(5, 5, true);
        let handle = engine.start_selection(CellLocation::new(2, 2), None).unwrap();
        let max = engine.selection(handle).unwrap().max_radius();
        assert_eq!(max, 3);

        let mut expected = 1;
        loop {
            let outcome = engine.expand(handle).unwrap();
            if outcome.retired {
                assert!(outcome.painted.is_empty());
                break;
            }
            expected += 1;
            assert_eq!(engine.selection(handle).unwrap().radius(), expected);
        }
        assert_eq!(expected, max + 1);
        assert!(engine.expand(handle).is_none());
        assert!(engine.is_idle());
    }

    #[test]
    fn test_painted_cells_are_on_grid_perimeter() {
        let mut engine = engine(12, 8, false);
        let center = CellLocation::new(1, 1);
        let handle = engine.start_selection(center, None).unwrap();
        for _ in 0..4 {
            engine.expand(handle).unwrap();
        }
        let outcome = engine.expand(handle).unwrap();
        let size = GridSize::new(12, 8).unwrap();
        let ring: Vec<_> = perimeter_offsets(6, 1)
            .into_iter()
            .map(|o| o.around(center))
            .filter(|&loc| size.contains(loc))
            .collect();
        let painted: Vec<_> = outcome.painted.iter().map(|c| c.location).collect();
        assert_eq!(painted, ring);
        assert!(painted.iter().all(|&loc| size.contains(loc)));
    }

    #[test]
    fn test_older_selection_occluded_by_younger_disc() {
        let mut engine = engine(30, 30, true);
        let center = CellLocation::new(15, 15);
        let older = engine.start_selection(center, None).unwrap();
        let younger = engine.start_selection(center, None).unwrap();

        for _ in 0..4 {
            engine.expand(younger).unwrap();
        }
        // Older ring at radius 2..=5 lies entirely within the younger radius-5 disc,
        // including cells exactly on its boundary.
        for _ in 0..4 {
            assert!(engine.expand(older).unwrap().painted.is_empty());
        }
        assert_eq!(engine.selection(older).unwrap().radius(), 5);
        assert!(!engine.expand(older).unwrap().painted.is_empty());
    }

    #[test]
    fn test_younger_selection_not_occluded_by_older() {
        let mut engine = engine(30, 30, true);
        let center = CellLocation::new(15, 15);
        let older = engine.start_selection(center, None).unwrap();
        let younger = engine.start_selection(center, None).unwrap();

        for _ in 0..6 {
            engine.expand(older).unwrap();
        }
        let outcome = engine.expand(younger).unwrap();
        assert_eq!(outcome.painted.len(), 5);
    }

    #[test]
    fn test_occlusion_disabled_paints_everything() {
        let mut engine = engine(30, 30, false);
        let center = CellLocation::new(15, 15);
        let older = engine.start_selection(center, None).unwrap();
        let younger = engine.start_selection(center, None).unwrap();
        for _ in 0..4 {
            engine.expand(younger).unwrap();
        }
        assert_eq!(engine.expand(older).unwrap().painted.len(), 5);
    }

    #[test]
    fn test_tick_expands_all_and_retires() {
        let mut engine = engine(16, 16, true);
        let handles: Vec<_> = [(0, 0), (8, 8), (15, 3)]
            .into_iter()
            .map(|(x, y)| engine.start_selection(CellLocation::new(x, y), None).unwrap())
            .collect();
        assert!(handles.windows(2).all(|w| w[0].ordinal() < w[1].ordinal()));

        let outcomes = engine.tick();
        assert_eq!(outcomes.len(), 3);
        assert!(engine.selections().iter().all(|s| s.radius() == 2));

        let mut ticks = 1;
        while !engine.is_idle() {
            engine.tick();
            ticks += 1;
            assert!(ticks < 64);
        }
        // Corner selection has the largest max radius: ceil(sqrt(15^2 + 15^2)) = 22
        assert_eq!(ticks, 22 + 1);
    }

    #[test]
    fn test_start_selection_off_grid() {
        let mut engine = engine(4, 4, true);
        assert!(engine.start_selection(CellLocation::new(4, 0), None).is_none());
        assert!(engine.start_selection(CellLocation::new(-1, 2), None).is_none());
    }

    #[test]
    fn test_colors_rotate_and_override() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let mut engine = engine(10, 10, true).with_colors(ColorSequence::new(vec![red, blue]));
        let a = engine.start_selection(CellLocation::new(1, 1), None).unwrap();
        let b = engine.start_selection(CellLocation::new(2, 2), None).unwrap();
        let c = engine
            .start_selection(CellLocation::new(3, 3), Some(Color::WHITE))
            .unwrap();
        assert_eq!(engine.selection(a).unwrap().color(), red);
        assert_eq!(engine.selection(b).unwrap().color(), blue);
        assert_eq!(engine.selection(c).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn test_paint_writes_to_grid() {
        let size = GridSize::new(20, 20).unwrap();
        let mut grid = CellGrid::new(size, DisplayMode::Latix);
        let mut engine = engine(20, 20, true);
        let color = Color::rgb(10, 200, 30);
        let handle = engine
            .start_selection(CellLocation::new(10, 10), Some(color))
            .unwrap();

        let outcome = engine.expand(handle).unwrap();
        let written = RadialGrowthEngine::paint(&mut grid, &outcome);
        assert_eq!(written, 5);
        assert_eq!(grid.writes(), 5);
        assert_eq!(grid.color_at(CellLocation::new(10, 10)), Some(color));
        assert_eq!(grid.color_at(CellLocation::new(11, 10)), Some(color));
        assert_eq!(grid.color_at(CellLocation::new(11, 11)), Some(Color::BLACK));
    }

    #[test]
    fn test_full_growth_paints_center() {
        let size = GridSize::new(21, 21).unwrap();
        let mut engine = engine(21, 21, false);
        let center = CellLocation::new(10, 10);
        let handle = engine.start_selection(center, None).unwrap();

        let mut painted = std::collections::HashSet::new();
        while let Some(outcome) = engine.expand(handle) {
            painted.extend(outcome.painted.iter().map(|c| c.location));
        }
        assert!(painted.contains(&center));
        assert!(painted.iter().all(|&loc| size.contains(loc)));
    }

    #[test]
    fn test_tick_occludes_against_pre_tick_snapshot() {
        let size = GridSize::new(30, 30).unwrap();
        let mut engine = engine(30, 30, true);
        let older_center = CellLocation::new(8, 10);
        let younger_center = CellLocation::new(14, 10);
        let older = engine.start_selection(older_center, None).unwrap();
        let younger = engine.start_selection(younger_center, None).unwrap();
        for _ in 0..3 {
            engine.expand(older).unwrap();
        }
        engine.expand(younger).unwrap();

        let snapshots = engine.snapshots();
        let mut replay = engine.selections().to_vec();
        let sequential: Vec<_> = replay
            .iter_mut()
            .map(|sel| {
                let outcome =
                    expand_selection(sel, &snapshots, true, engine.cache(), size, 0.0);
                (sel.handle(), outcome)
            })
            .collect();

        let outcomes = engine.tick();
        assert_eq!(outcomes, sequential);

        // Older grows to radius 5 while the younger disc is still radius 2.
        let pre_tick = snapshots[1];
        assert_eq!((pre_tick.ordinal, pre_tick.radius), (younger.ordinal(), 2));
        let expected: Vec<_> = perimeter_offsets(5, 1)
            .into_iter()
            .map(|o| o.around(older_center))
            .filter(|&loc| size.contains(loc) && !pre_tick.covers(loc, engine.cache()))
            .collect();
        let painted: Vec<_> = outcomes[0].1.painted.iter().map(|c| c.location).collect();
        assert_eq!(outcomes[0].0, older);
        assert_eq!(painted, expected);
        assert!(!painted.contains(&CellLocation::new(13, 10)));

        // Inside the younger radius-3 disc after the tick, but not the radius-2 one before it.
        let post_tick = engine.selection(younger).unwrap().snapshot();
        assert_eq!(post_tick.radius, 3);
        assert!(painted.contains(&CellLocation::new(12, 13)));
        assert!(post_tick.covers(CellLocation::new(12, 13), engine.cache()));

        // The younger selection is never occluded by the older one.
        assert_eq!(outcomes[1].1.painted.len(), perimeter_offsets(3, 1).len());
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let mut cfg = config(true);
        cfg.jitter = 20.0;
        let size = GridSize::new(20, 20).unwrap();
        let run = || {
            let mut engine = RadialGrowthEngine::new(size, &cfg);
            let handle = engine.start_selection(CellLocation::new(10, 10), None).unwrap();
            engine.expand(handle).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_erase_all_keeps_ordinals_increasing() {
        let mut engine = engine(10, 10, true);
        let first = engine.start_selection(CellLocation::new(5, 5), None).unwrap();
        engine.erase_all();
        assert!(engine.is_idle());
        let second = engine.start_selection(CellLocation::new(5, 5), None).unwrap();
        assert!(second > first);
    }
}
