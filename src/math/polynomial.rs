use std::f64::consts::PI;

/// Cutoff below which a polynomial is treated as identically zero.
const EPSILON: f64 = 1e-12;

/// Largest monic coefficient accepted before the leading term is dropped.
///
/// Degree-elevated curves leave rounding noise in the leading coefficient;
/// dividing by that noise produces coefficients far beyond this bound.
const MAX_SCALED: f64 = 1e8;

/// Newton iterations applied to every closed-form cubic root.
const POLISH_STEPS: u32 = 3;

fn is_scaled(value: f64) -> bool {
    value.is_finite() && value.abs() <= MAX_SCALED
}

/// Real roots of `a·t² + b·t + c = 0`.
///
/// Falls back to the linear equation when `a` is negligible next to the
/// other coefficients. A double root is reported once.
#[must_use]
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs().max(b.abs()).max(c.abs()) < EPSILON {
        return Vec::new();
    }
    let (sb, sc) = (b / a, c / a);
    if !is_scaled(sb) || !is_scaled(sc) {
        let root = -c / b;
        return if root.is_finite() { vec![root] } else { Vec::new() };
    }

    let disc = sb * sb - 4.0 * sc;
    if disc.abs() < EPSILON {
        return vec![-sb / 2.0];
    }
    if disc < 0.0 {
        return Vec::new();
    }
    // Avoids cancellation between -b and the square root.
    let sq = disc.sqrt();
    let q = if sb >= 0.0 { -sb - sq } else { -sb + sq };
    let mut roots = vec![q / 2.0];
    if q.abs() > 0.0 {
        roots.push(2.0 * sc / q);
    }
    roots.sort_by(f64::total_cmp);
    roots
}

/// Real roots of `a·t³ + b·t² + c·t + d = 0`, in ascending order.
///
/// Uses the trigonometric/Cardano closed form on the depressed cubic and
/// degrades to [`quadratic_roots`] when the cubic term is negligible next
/// to the others. Every root is refined with a few Newton steps.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a.abs().max(b.abs()).max(c.abs()).max(d.abs()) < EPSILON {
        return Vec::new();
    }
    let (sb, sc, sd) = (b / a, c / a, d / a);
    let mut roots = if is_scaled(sb) && is_scaled(sc) && is_scaled(sd) {
        monic_cubic_roots(sb, sc, sd)
    } else {
        quadratic_roots(b, c, d)
    };
    for root in &mut roots {
        *root = polish(a, b, c, d, *root);
    }
    roots.sort_by(f64::total_cmp);
    roots
}

/// Newton refinement of a root of `a·t³ + b·t² + c·t + d`.
///
/// A step is kept only while it shrinks the residual.
#[allow(clippy::many_single_char_names)]
fn polish(a: f64, b: f64, c: f64, d: f64, mut t: f64) -> f64 {
    let eval = |t: f64| ((a * t + b) * t + c) * t + d;
    let mut residual = eval(t).abs();
    for _ in 0..POLISH_STEPS {
        let slope = (3.0 * a * t + 2.0 * b) * t + c;
        let next = t - eval(t) / slope;
        if !next.is_finite() {
            break;
        }
        let next_residual = eval(next).abs();
        if next_residual >= residual {
            break;
        }
        t = next;
        residual = next_residual;
    }
    t
}

/// Real roots of `t³ + a·t² + b·t + c = 0`, unordered.
#[allow(clippy::many_single_char_names)]
fn monic_cubic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    // Depressed cubic t³ + p·t + q with t = u - a/3.
    let p = (3.0 * b - a * a) / 3.0;
    let q = ((2.0 * a * a - 9.0 * b) * a + 27.0 * c) / 27.0;
    let p3 = p / 3.0;
    let q2 = q / 2.0;
    let disc = q2 * q2 + p3 * p3 * p3;
    let shift = a / 3.0;

    if disc.abs() < EPSILON {
        let u = -q2.cbrt();
        if u.abs() < EPSILON {
            vec![-shift]
        } else {
            vec![2.0 * u - shift, -u - shift]
        }
    } else if disc > 0.0 {
        let sd = disc.sqrt();
        vec![(sd - q2).cbrt() - (sd + q2).cbrt() - shift]
    } else {
        let r = (-p3 * p3 * p3).sqrt();
        let phi = (-q2 / r).clamp(-1.0, 1.0).acos();
        let m = 2.0 * r.cbrt();
        vec![
            m * (phi / 3.0).cos() - shift,
            m * ((phi + 2.0 * PI) / 3.0).cos() - shift,
            m * ((phi + 4.0 * PI) / 3.0).cos() - shift,
        ]
    }
}
