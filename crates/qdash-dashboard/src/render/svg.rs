//! Inline SVG Bloch sphere.
//!
//! The sphere is drawn in an oblique projection: the y axis points right,
//! z points up, and x recedes toward the lower left at [`DEPTH`] scale.

use std::fmt::Write as _;

use qdash_model::BlochVector;

/// Foreshortening applied to the x axis.
const DEPTH: f64 = 0.35;

/// Project a Bloch vector onto the drawing plane.
///
/// Returns offsets from the sphere centre in units of the radius, with
/// screen y pointing down.
pub fn project(v: &BlochVector) -> (f64, f64) {
    (v.y - DEPTH * v.x, -(v.z - DEPTH * v.x))
}

/// SVG drawing of `v` on a sphere of the given pixel size.
pub fn bloch_sphere(v: &BlochVector, size: u32) -> String {
    let size_f = f64::from(size);
    let c = size_f / 2.0;
    let r = size_f * 0.4;
    let (dx, dy) = project(v);
    let (px, py) = (c + r * dx, c + r * dy);

    let mut out = String::new();
    let _ = write!(
        out,
        r##"<svg class="bloch" width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg">"##
    );
    let _ = write!(
        out,
        r##"<circle cx="{c:.1}" cy="{c:.1}" r="{r:.1}" fill="none" stroke="#30363d"/>"##
    );
    let _ = write!(
        out,
        r##"<ellipse cx="{c:.1}" cy="{c:.1}" rx="{r:.1}" ry="{ry:.1}" fill="none" stroke="#30363d" stroke-dasharray="3 3"/>"##,
        ry = r * DEPTH
    );
    // Axes: z vertical, y horizontal, x receding.
    let _ = write!(
        out,
        r##"<line x1="{c:.1}" y1="{t:.1}" x2="{c:.1}" y2="{b:.1}" stroke="#484f58"/>"##,
        t = c - r,
        b = c + r
    );
    let _ = write!(
        out,
        r##"<line x1="{l:.1}" y1="{c:.1}" x2="{rt:.1}" y2="{c:.1}" stroke="#484f58"/>"##,
        l = c - r,
        rt = c + r
    );
    let _ = write!(
        out,
        r##"<text x="{c:.1}" y="{t:.1}" font-size="10" text-anchor="middle" fill="#8b949e">|0⟩</text>"##,
        t = c - r - 4.0
    );
    let _ = write!(
        out,
        r##"<text x="{c:.1}" y="{b:.1}" font-size="10" text-anchor="middle" fill="#8b949e">|1⟩</text>"##,
        b = c + r + 12.0
    );
    let _ = write!(
        out,
        r##"<line x1="{c:.1}" y1="{c:.1}" x2="{px:.1}" y2="{py:.1}" stroke="#58a6ff" stroke-width="2"/>"##
    );
    let _ = write!(
        out,
        r##"<circle class="state" cx="{px:.1}" cy="{py:.1}" r="4" fill="#58a6ff"/></svg>"##
    );
    out
}
