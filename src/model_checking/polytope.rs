use std::cmp::Reverse;

use ndarray::Array1;
use ordered_float::OrderedFloat;
use serde::Deserialize;

pub type Corner = Array1<f64>;

/// One element of a polytope's generator system. Point coordinates are
/// rational, `numerators[k] / divisor`, with a positive divisor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Point { numerators: Vec<i64>, divisor: i64 },
    Ray(Vec<i64>),
    Line(Vec<i64>),
}

impl Generator {
    pub fn point(numerators: Vec<i64>, divisor: i64) -> Generator {
        Generator::Point { numerators, divisor }
    }

    /// Float coordinates of a point generator; missing coordinates are zero.
    /// Rays and lines have no corner and yield `None`.
    pub fn to_corner(&self, dim: usize) -> Option<Corner> {
        match self {
            Generator::Point { numerators, divisor } => {
                let mut p: Corner = Array1::zeros(dim);
                for (k, num) in numerators.iter().take(dim).enumerate() {
                    p[k] = *num as f64 / *divisor as f64;
                }
                Some(p)
            }
            Generator::Ray(_) | Generator::Line(_) => None,
        }
    }
}

/// Capability required from whatever polytope library produced the
/// achievability sets: access to its (minimised) generator system.
pub trait GeneratorSystem {
    fn generators(&self) -> &[Generator];

    fn generator_points(&self, dim: usize) -> Vec<Corner> {
        self.generators()
            .iter()
            .filter_map(|g| g.to_corner(dim))
            .collect()
    }

    /// First non-positive divisor among the point generators.
    fn invalid_divisor(&self) -> Option<i64> {
        self.generators().iter().find_map(|g| match g {
            Generator::Point { divisor, .. } if *divisor <= 0 => Some(*divisor),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VertexSystem {
    pub generators: Vec<Generator>,
}

impl VertexSystem {
    pub fn new(generators: Vec<Generator>) -> VertexSystem {
        VertexSystem { generators }
    }

    /// Polytope whose generators are integer points scaled by a common divisor.
    pub fn from_points(points: &[&[i64]], divisor: i64) -> VertexSystem {
        VertexSystem {
            generators: points
                .iter()
                .map(|p| Generator::point(p.to_vec(), divisor))
                .collect(),
        }
    }
}

impl GeneratorSystem for VertexSystem {
    fn generators(&self) -> &[Generator] {
        &self.generators[..]
    }
}

/// Pareto-reduced corners of one state (or state/action branch) in canonical
/// order. Corners are identified by their index in this sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorSet {
    corners: Vec<Corner>,
}

impl GeneratorSet {
    pub fn from_corners(corners: Vec<Corner>) -> GeneratorSet {
        GeneratorSet { corners }
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    pub fn corner(&self, index: usize) -> &Corner {
        &self.corners[index]
    }

    pub fn get(&self, index: usize) -> Option<&Corner> {
        self.corners.get(index)
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners[..]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Corner> {
        self.corners.iter()
    }

    /// Index of the first corner equal in value to `point`.
    pub fn position(&self, point: &Corner) -> Option<usize> {
        self.corners.iter().position(|c| c == point)
    }
}

fn weakly_dominates(q: &Corner, p: &Corner) -> bool {
    p.iter().zip(q.iter()).all(|(pi, qi)| pi <= qi)
}

/// Drops every corner that another corner weakly dominates, until nothing
/// changes. Of two value-equal corners the first one survives.
pub fn pareto_reduce(mut points: Vec<Corner>) -> Vec<Corner> {
    let mut changed = true;
    while changed {
        changed = false;
        let dominated: Vec<bool> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                points.iter().enumerate().any(|(j, q)| {
                    i != j && weakly_dominates(q, p) && (q != p || j < i)
                })
            })
            .collect();
        if dominated.iter().any(|d| *d) {
            let mut keep = dominated.into_iter().map(|d| !d);
            points.retain(|_| keep.next().unwrap_or(true));
            changed = true;
        }
    }
    points
}

/// Corner points of `polytope` in canonical order: Pareto reduced, then by
/// decreasing squared norm. The sort is stable, so ties keep generator order.
pub fn extract_corners<P: GeneratorSystem + ?Sized>(polytope: &P, dim: usize) -> GeneratorSet {
    let mut corners = pareto_reduce(polytope.generator_points(dim));
    corners.sort_by_key(|c| Reverse(OrderedFloat(c.dot(c))));
    GeneratorSet { corners }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn rays_and_lines_contribute_no_corners() {
        let poly = VertexSystem::new(vec![
            Generator::Ray(vec![1, 0]),
            Generator::point(vec![1, 2], 4),
            Generator::Line(vec![0, 1]),
        ]);
        let set = extract_corners(&poly, 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.corner(0), &arr1(&[0.25, 0.5]));
    }

    #[test]
    fn no_point_generators_gives_empty_set() {
        let poly = VertexSystem::new(vec![Generator::Ray(vec![1, 1])]);
        assert!(extract_corners(&poly, 2).is_empty());
    }

    #[test]
    fn dominated_corners_are_removed() {
        let poly = VertexSystem::from_points(&[&[0, 0], &[10, 0], &[0, 10], &[5, 5], &[4, 4], &[10, 0]], 10);
        let set = extract_corners(&poly, 2);
        assert_eq!(set.len(), 3);
        for (i, p) in set.iter().enumerate() {
            for (j, q) in set.iter().enumerate() {
                if i != j {
                    assert!(!weakly_dominates(q, p), "{:?} dominates {:?}", q, p);
                }
            }
        }
    }

    #[test]
    fn corners_sorted_by_decreasing_norm() {
        let poly = VertexSystem::from_points(&[&[3, 7], &[10, 0], &[6, 6]], 10);
        let set = extract_corners(&poly, 2);
        let norms: Vec<f64> = set.iter().map(|c| c.dot(c)).collect();
        assert_eq!(set.corner(0), &arr1(&[1.0, 0.0]));
        assert!(norms.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn equal_norms_keep_generator_order() {
        let poly = VertexSystem::from_points(&[&[0, 1], &[1, 0]], 1);
        let set = extract_corners(&poly, 2);
        assert_eq!(set.corner(0), &arr1(&[0.0, 1.0]));
        assert_eq!(set.corner(1), &arr1(&[1.0, 0.0]));
    }

    #[test]
    fn short_numerators_are_zero_padded() {
        let g = Generator::point(vec![3], 2);
        assert_eq!(g.to_corner(3), Some(arr1(&[1.5, 0.0, 0.0])));
    }

    #[test]
    fn zero_divisor_detected() {
        let poly = VertexSystem::new(vec![Generator::point(vec![1, 0], 0), Generator::point(vec![0, 1], 1)]);
        assert_eq!(poly.invalid_divisor(), Some(0));
        assert_eq!(VertexSystem::from_points(&[&[1, 1]], -2).invalid_divisor(), Some(-2));
        assert_eq!(ray_and_point().invalid_divisor(), None);
    }

    fn ray_and_point() -> VertexSystem {
        VertexSystem::new(vec![Generator::Ray(vec![1, 0]), Generator::point(vec![1, 1], 3)])
    }
}
