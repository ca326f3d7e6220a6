//! Proximity links between particles.
//!
//! A link joins every unordered pair closer than a threshold distance. Its
//! opacity fades linearly from `k` at distance 0 to nothing at the threshold.
//! Two strategies produce the same links: a straightforward O(n²) scan, and
//! a uniform grid with cells one threshold wide that only compares points in
//! neighbouring cells.

use std::collections::HashMap;

use folio_core::DVec2;
use serde::{Deserialize, Serialize};

/// A line between particles `a` and `b`, with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub opacity: f64,
}

/// How neighbouring pairs are found. Both yield identical link lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrategy {
    /// Compare every pair. Fine for the tens of particles a background uses.
    #[default]
    Pairwise,
    /// Bucket points into a grid first. Worth it from a few hundred particles.
    Grid,
}

/// Opacity of a link at `distance`: `(1 - distance / threshold) * k`, or 0
/// at or beyond the threshold.
pub fn link_opacity(distance: f64, threshold: f64, k: f64) -> f64 {
    if threshold <= 0.0 || distance >= threshold {
        0.0
    } else {
        (1.0 - distance / threshold) * k
    }
}

/// Builds the link between `points[a]` and `points[b]` if they are close enough.
///
/// The pair is normalised to `a < b` before measuring, so both strategies
/// compute bit-identical distances.
fn try_link(points: &[DVec2], i: usize, j: usize, threshold: f64, k: f64) -> Option<Link> {
    let (a, b) = if i < j { (i, j) } else { (j, i) };
    let distance = (points[a] - points[b]).length();
    (distance < threshold).then(|| Link {
        a,
        b,
        distance,
        opacity: link_opacity(distance, threshold, k),
    })
}

/// All links in `(a, b)` order by comparing every pair once.
pub fn pairwise_links(points: &[DVec2], threshold: f64, k: f64) -> Vec<Link> {
    if threshold <= 0.0 {
        return Vec::new();
    }
    let mut links = Vec::new();
    for a in 0..points.len() {
        for b in (a + 1)..points.len() {
            if let Some(link) = try_link(points, a, b, threshold, k) {
                links.push(link);
            }
        }
    }
    links
}

/// All links in `(a, b)` order using a uniform grid of `threshold`-sized cells.
///
/// Any pair closer than the threshold sits in the same or an adjacent cell,
/// so only the 3x3 neighbourhood of each point is searched.
pub fn grid_links(points: &[DVec2], threshold: f64, k: f64) -> Vec<Link> {
    if threshold <= 0.0 || !threshold.is_finite() {
        return Vec::new();
    }
    let cell_of = |p: DVec2| -> (i64, i64) {
        (
            (p.x / threshold).floor() as i64,
            (p.y / threshold).floor() as i64,
        )
    };

    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, &p) in points.iter().enumerate() {
        grid.entry(cell_of(p)).or_default().push(i);
    }

    let mut links = Vec::new();
    for (i, &p) in points.iter().enumerate() {
        let (cx, cy) = cell_of(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                // cells past the i64 range do not exist; saturating would revisit one
                let (Some(nx), Some(ny)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                let Some(bucket) = grid.get(&(nx, ny)) else {
                    continue;
                };
                for &j in bucket.iter().filter(|&&j| j > i) {
                    if let Some(link) = try_link(points, i, j, threshold, k) {
                        links.push(link);
                    }
                }
            }
        }
    }
    links.sort_unstable_by_key(|l| (l.a, l.b));
    links
}

/// Dispatches to the chosen strategy.
pub fn find_links(strategy: LinkStrategy, points: &[DVec2], threshold: f64, k: f64) -> Vec<Link> {
    match strategy {
        LinkStrategy::Pairwise => pairwise_links(points, threshold, k),
        LinkStrategy::Grid => grid_links(points, threshold, k),
    }
}
