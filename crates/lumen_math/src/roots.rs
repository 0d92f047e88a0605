//! Real roots of the low-order polynomials that come out of ray-surface
//! intersection: quadratics for spheres, tubes and cones, quartics for tori.

use std::ops::{Add, Div, Mul, Sub};

/// Iteration cap for the Durand-Kerner solver.
const MAX_ITERATIONS: usize = 500;

/// Convergence threshold on the largest root update of one iteration.
const CONVERGENCE_TOLERANCE: f64 = 1e-12;

/// A root whose imaginary part is below this (relative) bound counts as real.
const REAL_TOLERANCE: f64 = 1e-6;

/// Newton steps used to polish each real root on the real polynomial.
const POLISH_STEPS: usize = 4;

/// Solve `a t^2 + b t + c = 0`.
///
/// Returns the real roots in ascending order. A double root is returned
/// twice, and a (near-)linear equation returns its single root twice.
/// Returns `None` when the discriminant is negative or the equation is
/// degenerate.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < 1e-14 {
        if b.abs() < 1e-14 {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    // Avoid cancellation between -b and the square root
    let sqrt_d = discriminant.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_d);
    let (t0, t1) = if q == 0.0 {
        (0.0, 0.0)
    } else {
        (q / a, c / q)
    };

    Some(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
}

/// Minimal complex arithmetic for the Durand-Kerner iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Complex {
    re: f64,
    im: f64,
}

impl Complex {
    const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }
}

impl Add for Complex {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        Self::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

/// Evaluate a monic polynomial with coefficients `[c0, c1, .., c_{n-1}]`
/// (leading 1 implied) at `z` using Horner's scheme.
fn eval_monic(coeffs: &[f64; 4], z: Complex) -> Complex {
    let mut acc = Complex::new(1.0, 0.0);
    for &c in coeffs.iter().rev() {
        acc = acc * z + Complex::new(c, 0.0);
    }
    acc
}

/// Solve `c4 t^4 + c3 t^3 + c2 t^2 + c1 t + c0 = 0` for its real roots with
/// the Durand-Kerner (Weierstrass) simultaneous iteration.
///
/// `coeffs` is ordered from the leading coefficient down: `[c4, c3, c2, c1, c0]`.
/// Roots are returned in ascending order; an empty vector means no real root.
pub fn solve_quartic(coeffs: [f64; 5]) -> Vec<f64> {
    let lead = coeffs[0];
    if lead.abs() < 1e-14 || coeffs.iter().any(|c| !c.is_finite()) {
        return Vec::new();
    }

    // Monic form, stored low order first
    let monic = [
        coeffs[4] / lead,
        coeffs[3] / lead,
        coeffs[2] / lead,
        coeffs[1] / lead,
    ];

    // Cauchy bound on root magnitude scales the initial guesses
    let bound = 1.0 + monic.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    let seed = Complex::new(0.4, 0.9);
    let mut roots = [Complex::new(0.0, 0.0); 4];
    let mut power = Complex::new(1.0, 0.0);
    for root in roots.iter_mut() {
        *root = power * Complex::new(bound, 0.0);
        power = power * seed;
    }

    for _ in 0..MAX_ITERATIONS {
        let mut max_step = 0.0_f64;
        for i in 0..roots.len() {
            let mut denom = Complex::new(1.0, 0.0);
            for j in 0..roots.len() {
                if i != j {
                    denom = denom * (roots[i] - roots[j]);
                }
            }
            if denom.norm() == 0.0 {
                // Coincident estimates, nudge apart and keep iterating
                denom = Complex::new(CONVERGENCE_TOLERANCE, CONVERGENCE_TOLERANCE);
            }
            let step = eval_monic(&monic, roots[i]) / denom;
            roots[i] = roots[i] - step;
            max_step = max_step.max(step.norm());
        }
        if max_step < CONVERGENCE_TOLERANCE * bound {
            break;
        }
    }

    let mut real: Vec<f64> = roots
        .iter()
        .filter(|z| z.re.is_finite() && z.im.abs() <= REAL_TOLERANCE * (1.0 + z.re.abs()))
        .map(|z| polish_real(&monic, z.re))
        .collect();
    real.sort_by(|a, b| a.total_cmp(b));
    real
}

/// Refine a real root of the monic quartic with a few Newton steps.
fn polish_real(monic: &[f64; 4], mut t: f64) -> f64 {
    for _ in 0..POLISH_STEPS {
        let f = (((t + monic[3]) * t + monic[2]) * t + monic[1]) * t + monic[0];
        let df = ((4.0 * t + 3.0 * monic[3]) * t + 2.0 * monic[2]) * t + monic[1];
        if df.abs() < 1e-14 {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() {
            break;
        }
        t = next;
    }
    t
}
