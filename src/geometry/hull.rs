//! incremental 3D convex hull, used for cell volumes

use std::collections::HashSet;

type Vec3 = [f64; 3];

fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[derive(Debug, Clone)]
struct Facet {
    vertices: [usize; 3],
    /// outward unit normal, zero for a degenerate facet
    normal: Vec3,
    offset: f64,
}

impl Facet {
    /// build a facet whose normal points away from `interior`
    fn new(points: &[Vec3], mut vertices: [usize; 3], interior: &Vec3) -> Self {
        let [a, b, c] = vertices.map(|v| points[v]);
        let mut normal = cross(&sub(&b, &a), &sub(&c, &a));

        if dot(&normal, &sub(interior, &a)) > 0.0 {
            vertices.swap(1, 2);
            normal = normal.map(|x| -x);
        }

        let length = norm(&normal);
        let normal = if length > 0.0 {
            normal.map(|x| x / length)
        } else {
            [0.0; 3]
        };

        Self {
            vertices,
            normal,
            offset: dot(&normal, &a),
        }
    }

    /// signed distance of `point` above the facet plane
    fn distance(&self, point: &Vec3) -> f64 {
        dot(&self.normal, point) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// index of the point maximising `score`, with its score
fn farthest<F: Fn(&Vec3) -> f64>(points: &[Vec3], score: F) -> (usize, f64) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, score(p)))
        .fold((0, f64::NEG_INFINITY), |best, next| if next.1 > best.1 { next } else { best })
}

/// Volume of the convex hull of a point set.
///
/// Fewer than four points, or a set without volume (all points collinear or
/// coplanar), gives zero.
pub fn convex_hull_volume(points: &[Vec3]) -> f64 {
    if points.len() < 4 {
        return 0.0;
    }

    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in points {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }

    let extent = (0..3).map(|axis| max[axis] - min[axis]).fold(0.0, f64::max);
    if !(extent > 0.0) {
        return 0.0;
    }
    let eps = 1e-10 * extent;

    // initial simplex
    let (p0, _) = farthest(points, |p| -p[0]);
    let a = points[p0];

    let (p1, d1) = farthest(points, |p| norm(&sub(p, &a)));
    if d1 <= eps {
        return 0.0;
    }
    let ab = sub(&points[p1], &a);

    let (p2, d2) = farthest(points, |p| norm(&cross(&ab, &sub(p, &a))) / d1);
    if d2 <= eps {
        return 0.0;
    }
    let plane = cross(&ab, &sub(&points[p2], &a));
    let plane = plane.map(|x| x / norm(&plane));

    let (p3, d3) = farthest(points, |p| dot(&plane, &sub(p, &a)).abs());
    if d3 <= eps {
        return 0.0;
    }

    let simplex = [p0, p1, p2, p3];
    let mut interior = [0.0; 3];
    for &v in &simplex {
        for axis in 0..3 {
            interior[axis] += points[v][axis] / 4.0;
        }
    }

    let mut facets: Vec<Facet> = [[p0, p1, p2], [p0, p1, p3], [p0, p2, p3], [p1, p2, p3]]
        .into_iter()
        .map(|vertices| Facet::new(points, vertices, &interior))
        .collect();

    for (i, point) in points.iter().enumerate() {
        if simplex.contains(&i) {
            continue;
        }

        let visible: Vec<bool> = facets.iter().map(|f| f.distance(point) > eps).collect();
        if !visible.contains(&true) {
            continue;
        }

        let visible_edges: HashSet<(usize, usize)> = facets
            .iter()
            .zip(&visible)
            .filter(|(_, visible)| **visible)
            .flat_map(|(f, _)| f.edges())
            .collect();

        // edges of visible facets whose twin belongs to a hidden facet
        let horizon: Vec<(usize, usize)> = visible_edges
            .iter()
            .filter(|(a, b)| !visible_edges.contains(&(*b, *a)))
            .copied()
            .collect();

        let mut keep = visible.iter().map(|v| !v);
        facets.retain(|_| keep.next().unwrap_or(true));

        facets.extend(
            horizon
                .into_iter()
                .map(|(a, b)| Facet::new(points, [a, b, i], &interior)),
        );
    }

    facets
        .iter()
        .map(|facet| {
            let [a, b, c] = facet.vertices.map(|v| sub(&points[v], &interior));
            dot(&a, &cross(&b, &c)).abs() / 6.0
        })
        .sum()
}
