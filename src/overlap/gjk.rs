//! Distance between two convex support maps (Gilbert-Johnson-Keerthi).
//!
//! The simplex lives in a fixed-size array and every sub-simplex reduction is
//! done on the stack, so a query never allocates.

use tracing::warn;

use crate::math::Vector3;
use crate::shape::SupportMap;

use super::OverlapConfig;

/// Outcome of a GJK run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GjkStatus {
    /// The shapes are closer than the margin.
    Overlap,
    /// A separating direction with a gap larger than the margin was found.
    Separated,
    /// Closest point of the Minkowski difference `A - B` to the origin.
    Closest(Vector3),
}

/// Runs GJK on the Minkowski difference `A - B`.
///
/// With `margin = Some(m)` the run stops at the first direction proving a gap
/// larger than `m` ([`GjkStatus::Separated`]) or as soon as the gap cannot
/// exceed `m` ([`GjkStatus::Overlap`]). With `None` it runs to convergence and
/// returns the closest point.
pub(crate) fn gjk<A, B>(
    a: &A,
    b: &B,
    eps: f64,
    margin: Option<f64>,
    config: &OverlapConfig,
) -> GjkStatus
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let x = Vector3::x();
    let mut v = a.support(&x).coords - b.support(&-x).coords;
    let mut simplex = Simplex::default();

    // Stop bound on |v|: within it the shapes touch.
    let stop = margin.unwrap_or(eps);

    for _ in 0..config.max_iterations {
        let vv = v.norm_squared();
        if vv <= stop * stop {
            return finish(margin, v);
        }

        let w = a.support(&-v).coords - b.support(&v).coords;
        let vw = v.dot(&w);

        if let Some(m) = margin {
            if vw > 0.0 && vw * vw > vv * m * m {
                return GjkStatus::Separated;
            }
        }

        if vv - vw <= config.tolerance * vv || simplex.contains(&w) {
            return finish(margin, v);
        }

        simplex.push(w);
        v = simplex.reduce();

        if simplex.len == 4 {
            return finish(margin, Vector3::zeros());
        }
    }

    warn!(
        max_iterations = config.max_iterations,
        distance = v.norm(),
        "GJK iteration cap reached, treating pair as touching"
    );
    finish(margin, v)
}

fn finish(margin: Option<f64>, v: Vector3) -> GjkStatus {
    if margin.is_some() {
        GjkStatus::Overlap
    } else {
        GjkStatus::Closest(v)
    }
}

/// Up to four points of the Minkowski difference.
#[derive(Debug, Default, Clone, Copy)]
struct Simplex {
    pts: [Vector3; 4],
    len: usize,
}

impl Simplex {
    fn push(&mut self, w: Vector3) {
        self.pts[self.len] = w;
        self.len += 1;
    }

    fn contains(&self, w: &Vector3) -> bool {
        self.pts[..self.len].iter().any(|p| p == w)
    }

    fn set(&mut self, pts: &[Vector3]) {
        self.pts[..pts.len()].copy_from_slice(pts);
        self.len = pts.len();
    }

    /// Shrinks the simplex to the smallest face holding the point closest to
    /// the origin and returns that point.
    fn reduce(&mut self) -> Vector3 {
        let [a, b, c, d] = self.pts;
        match self.len {
            1 => a,
            2 => self.reduce_segment(a, b),
            3 => self.reduce_triangle(a, b, c),
            _ => self.reduce_tetrahedron(a, b, c, d),
        }
    }

    fn reduce_segment(&mut self, a: Vector3, b: Vector3) -> Vector3 {
        let ab = b - a;
        let t = -a.dot(&ab);
        let denom = ab.norm_squared();
        if t <= 0.0 {
            self.set(&[a]);
            a
        } else if t >= denom {
            self.set(&[b]);
            b
        } else {
            self.set(&[a, b]);
            a + ab * (t / denom)
        }
    }

    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    fn reduce_triangle(&mut self, a: Vector3, b: Vector3, c: Vector3) -> Vector3 {
        let ab = b - a;
        let ac = c - a;

        let n2 = ab.cross(&ac).norm_squared();
        if n2 <= f64::EPSILON * ab.norm_squared() * ac.norm_squared() {
            return self.reduce_flat_triangle(a, b, c);
        }

        let d1 = -ab.dot(&a);
        let d2 = -ac.dot(&a);
        if d1 <= 0.0 && d2 <= 0.0 {
            self.set(&[a]);
            return a;
        }

        let d3 = -ab.dot(&b);
        let d4 = -ac.dot(&b);
        if d3 >= 0.0 && d4 <= d3 {
            self.set(&[b]);
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            self.set(&[a, b]);
            return a + ab * (d1 / (d1 - d3));
        }

        let d5 = -ab.dot(&c);
        let d6 = -ac.dot(&c);
        if d6 >= 0.0 && d5 <= d6 {
            self.set(&[c]);
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            self.set(&[a, c]);
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            self.set(&[b, c]);
            return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
        }

        let denom = 1.0 / (va + vb + vc);
        self.set(&[a, b, c]);
        a + ab * (vb * denom) + ac * (vc * denom)
    }

    /// Collinear or coincident triangle: best of its three edges.
    fn reduce_flat_triangle(&mut self, a: Vector3, b: Vector3, c: Vector3) -> Vector3 {
        let mut best = *self;
        let mut best_p = best.reduce_segment(a, b);
        for (p, q) in [(a, c), (b, c)] {
            let mut trial = *self;
            let x = trial.reduce_segment(p, q);
            if x.norm_squared() < best_p.norm_squared() {
                best = trial;
                best_p = x;
            }
        }
        *self = best;
        best_p
    }

    fn reduce_tetrahedron(&mut self, a: Vector3, b: Vector3, c: Vector3, d: Vector3) -> Vector3 {
        let faces = [(a, b, c, d), (a, c, d, b), (a, d, b, c), (b, d, c, a)];

        let mut best: Option<(Simplex, Vector3)> = None;
        for (p, q, r, opposite) in faces {
            if !origin_outside_face(p, q, r, opposite) {
                continue;
            }
            let mut trial = *self;
            let x = trial.reduce_triangle(p, q, r);
            if best.is_none_or(|(_, bx)| x.norm_squared() < bx.norm_squared()) {
                best = Some((trial, x));
            }
        }

        match best {
            Some((s, x)) => {
                *self = s;
                x
            }
            None => Vector3::zeros(),
        }
    }
}

/// Whether the origin lies on the far side of face `pqr` from `opposite`.
/// A flat tetrahedron counts every face as a candidate.
fn origin_outside_face(p: Vector3, q: Vector3, r: Vector3, opposite: Vector3) -> bool {
    let n = (q - p).cross(&(r - p));
    let side_origin = -p.dot(&n);
    let side_opposite = (opposite - p).dot(&n);
    let reach = (opposite - p).norm_squared() * n.norm_squared();
    if side_opposite * side_opposite <= f64::EPSILON * reach {
        return true;
    }
    side_origin * side_opposite < 0.0
}
