//! Centroid-based clustering of components before partitioning.
//!
//! A clustering pass groups movable components by proximity so the
//! partitioner can treat each group as one subproblem. The implementation
//! is deliberately deterministic: centroids are seeded evenly spaced by
//! component index, assignment ties break toward the lowest centroid
//! index while points are visited in component-ID order, and recentering
//! is an exact mean. Two runs over identical input produce identical
//! membership.

use tessera_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use tessera_model::ComponentId;

/// One input point: a component's current location and area.
#[derive(Clone, Copy, Debug)]
pub struct ClusterPoint {
    /// The component this point stands for.
    pub component: ComponentId,
    /// Current x coordinate.
    pub x: f64,
    /// Current y coordinate.
    pub y: f64,
    /// Component area, aggregated per cluster for the partitioner.
    pub area: u64,
}

/// A group of components produced by one clustering pass.
///
/// Membership is exclusive and is superseded entirely by the next pass;
/// clusters are never updated incrementally.
#[derive(Clone, Debug)]
pub struct Cluster {
    /// Cluster ordinal within the pass.
    pub id: usize,
    /// Member components, in ascending component-ID order.
    pub members: Vec<ComponentId>,
    /// Mean position of the members.
    pub centroid: (f64, f64),
    /// Total member area.
    pub area: u64,
}

impl Cluster {
    /// Returns the cluster's display name, e.g. `cluster3`.
    pub fn name(&self) -> String {
        format!("cluster{}", self.id)
    }
}

/// Iterative k-means over component positions.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
}

/// The result of one clustering pass.
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    /// The produced clusters. Non-empty clusters only.
    pub clusters: Vec<Cluster>,
    /// Iterations actually run before membership stabilized.
    pub iterations: usize,
    /// Whether the pass ended because membership stopped changing
    /// (as opposed to hitting the iteration cap).
    pub converged: bool,
}

impl KMeans {
    /// Creates a clustering pass with target count `k` and an iteration cap.
    pub fn new(k: usize, max_iterations: usize) -> Self {
        Self { k, max_iterations }
    }

    /// Runs the pass over the given points.
    ///
    /// When `k` exceeds the point count the pass degrades to one singleton
    /// cluster per component and reports the capacity overflow as a warning
    /// diagnostic — never a failure.
    pub fn run(&self, points: &[ClusterPoint], sink: &DiagnosticSink) -> ClusteringOutcome {
        let mut points: Vec<ClusterPoint> = points.to_vec();
        points.sort_by_key(|p| p.component);

        if points.is_empty() {
            return ClusteringOutcome {
                clusters: Vec::new(),
                iterations: 0,
                converged: true,
            };
        }

        let k = if self.k > points.len() {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Clustering, 101),
                    format!(
                        "cluster count {} exceeds component count {}; clusters collapse to singletons",
                        self.k,
                        points.len()
                    ),
                ),
            );
            points.len()
        } else {
            self.k
        };

        // Seed centroids evenly spaced by component index, so identical
        // input always yields identical seeds.
        let mut centroids: Vec<(f64, f64)> = (0..k)
            .map(|i| {
                let point = &points[i * points.len() / k];
                (point.x, point.y)
            })
            .collect();

        let mut assignment = vec![0usize; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            // Assign: nearest centroid by Euclidean distance, first (lowest
            // index) centroid wins ties via the strict comparison.
            let mut changed = false;
            for (point_index, point) in points.iter().enumerate() {
                let mut best = 0usize;
                let mut best_distance = f64::INFINITY;
                for (centroid_index, centroid) in centroids.iter().enumerate() {
                    let distance = euclidean(point, *centroid);
                    if distance < best_distance {
                        best_distance = distance;
                        best = centroid_index;
                    }
                }
                if assignment[point_index] != best {
                    assignment[point_index] = best;
                    changed = true;
                }
            }

            if !changed && iterations > 1 {
                converged = true;
                break;
            }

            // Recenter: exact mean of members. Empty clusters keep their
            // centroid so they can still capture points later.
            for (centroid_index, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&ClusterPoint> = points
                    .iter()
                    .zip(&assignment)
                    .filter(|(_, &a)| a == centroid_index)
                    .map(|(p, _)| p)
                    .collect();
                if members.is_empty() {
                    continue;
                }
                let n = members.len() as f64;
                *centroid = (
                    members.iter().map(|p| p.x).sum::<f64>() / n,
                    members.iter().map(|p| p.y).sum::<f64>() / n,
                );
            }
        }

        let mut clusters: Vec<Cluster> = (0..k)
            .map(|id| Cluster {
                id,
                members: Vec::new(),
                centroid: centroids[id],
                area: 0,
            })
            .collect();
        for (point, &cluster_index) in points.iter().zip(&assignment) {
            let cluster = &mut clusters[cluster_index];
            cluster.members.push(point.component);
            cluster.area += point.area;
        }
        clusters.retain(|c| !c.members.is_empty());

        ClusteringOutcome {
            clusters,
            iterations,
            converged,
        }
    }
}

fn euclidean(point: &ClusterPoint, centroid: (f64, f64)) -> f64 {
    let dx = point.x - centroid.0;
    let dy = point.y - centroid.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(raw: u32, x: f64, y: f64) -> ClusterPoint {
        ClusterPoint {
            component: ComponentId::from_raw(raw),
            x,
            y,
            area: 1,
        }
    }

    fn membership(outcome: &ClusteringOutcome) -> Vec<Vec<u32>> {
        outcome
            .clusters
            .iter()
            .map(|c| c.members.iter().map(|m| m.as_raw()).collect())
            .collect()
    }

    #[test]
    fn two_obvious_groups_separate() {
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, 1.0, 0.0),
            point(2, 10.0, 10.0),
            point(3, 11.0, 10.0),
        ];
        let sink = DiagnosticSink::new();
        let outcome = KMeans::new(2, 50).run(&points, &sink);

        assert_eq!(outcome.clusters.len(), 2);
        assert!(outcome.converged);
        let groups = membership(&outcome);
        assert!(groups.contains(&vec![0, 1]));
        assert!(groups.contains(&vec![2, 3]));
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn deterministic_across_runs() {
        let points = vec![
            point(0, 2.0, 3.0),
            point(1, 8.0, 1.0),
            point(2, 4.0, 7.0),
            point(3, 9.0, 9.0),
            point(4, 1.0, 1.0),
            point(5, 6.0, 5.0),
        ];
        let sink = DiagnosticSink::new();
        let first = KMeans::new(3, 50).run(&points, &sink);
        let second = KMeans::new(3, 50).run(&points, &sink);
        assert_eq!(membership(&first), membership(&second));
        assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn input_order_does_not_matter() {
        let ordered = vec![point(0, 0.0, 0.0), point(1, 5.0, 5.0), point(2, 0.5, 0.5)];
        let mut shuffled = ordered.clone();
        shuffled.swap(0, 2);
        shuffled.swap(1, 2);

        let sink = DiagnosticSink::new();
        let a = KMeans::new(2, 50).run(&ordered, &sink);
        let b = KMeans::new(2, 50).run(&shuffled, &sink);
        assert_eq!(membership(&a), membership(&b));
    }

    #[test]
    fn k_exceeding_count_degrades_to_singletons() {
        let points = vec![point(0, 0.0, 0.0), point(1, 5.0, 5.0)];
        let sink = DiagnosticSink::new();
        let outcome = KMeans::new(5, 50).run(&points, &sink);

        assert_eq!(outcome.clusters.len(), 2);
        for cluster in &outcome.clusters {
            assert_eq!(cluster.members.len(), 1);
        }
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.category, Category::Clustering);
        assert!(!sink.has_errors());
    }

    #[test]
    fn k_equal_to_count_yields_singletons() {
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, 3.0, 0.0),
            point(2, 6.0, 0.0),
        ];
        let sink = DiagnosticSink::new();
        let outcome = KMeans::new(3, 50).run(&points, &sink);
        assert_eq!(outcome.clusters.len(), 3);
        for cluster in &outcome.clusters {
            assert_eq!(cluster.members.len(), 1);
        }
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn tie_breaks_toward_lowest_centroid_index() {
        // Seeds land on components 0 and 1 at (0,0) and (4,0); component 2
        // at (2,0) is exactly equidistant and must join the earlier cluster.
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, 4.0, 0.0),
            point(2, 2.0, 0.0),
        ];
        let sink = DiagnosticSink::new();
        let outcome = KMeans::new(2, 1).run(&points, &sink);
        let groups = membership(&outcome);
        assert_eq!(groups, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        let sink = DiagnosticSink::new();
        let outcome = KMeans::new(3, 50).run(&[], &sink);
        assert!(outcome.clusters.is_empty());
        assert!(outcome.converged);
    }

    #[test]
    fn iteration_cap_respected() {
        let points: Vec<ClusterPoint> = (0..20)
            .map(|i| point(i, f64::from(i % 7), f64::from(i % 3)))
            .collect();
        let sink = DiagnosticSink::new();
        let outcome = KMeans::new(4, 2).run(&points, &sink);
        assert!(outcome.iterations <= 2);
    }

    #[test]
    fn cluster_area_aggregates_members() {
        let points = vec![
            ClusterPoint {
                component: ComponentId::from_raw(0),
                x: 0.0,
                y: 0.0,
                area: 10,
            },
            ClusterPoint {
                component: ComponentId::from_raw(1),
                x: 0.5,
                y: 0.0,
                area: 32,
            },
        ];
        let sink = DiagnosticSink::new();
        let outcome = KMeans::new(1, 10).run(&points, &sink);
        assert_eq!(outcome.clusters[0].area, 42);
        assert_eq!(outcome.clusters[0].name(), "cluster0");
    }
}
