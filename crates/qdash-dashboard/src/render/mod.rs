//! Rendering of the view state.
//!
//! Both renderers are pure functions of a [`ViewState`](crate::view::ViewState)
//! and [`RenderOptions`]: the same inputs always produce the same output.

pub mod html;
pub mod svg;
pub mod text;

use qdash_model::CircuitSketch;

use crate::config::DashboardConfig;

/// Settings shared by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Seconds between page reloads.
    pub refresh_secs: u64,
    /// Widest circuit drawn; wider circuits are only summarized.
    pub max_circuit_qubits: usize,
}

impl RenderOptions {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            refresh_secs: config.poll.interval_secs,
            max_circuit_qubits: config.server.max_circuit_qubits,
        }
    }

    /// Whether the circuit fits within the drawing limit.
    pub fn fits(&self, circuit: &CircuitSketch) -> bool {
        circuit.width() <= self.max_circuit_qubits as u64
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Drop control characters (ANSI escapes, carriage returns, ...) from text
/// headed for a terminal.
pub fn strip_control(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

/// Format a duration as "42s", "3m 05s" or "2h 07m".
pub fn elapsed(d: chrono::Duration) -> String {
    let secs = d.num_seconds().max(0);
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => format!("{}m {:02}s", secs / 60, secs % 60),
        _ => format!("{}h {:02}m", secs / 3600, secs % 3600 / 60),
    }
}

/// Format a fraction in [0, 1] as a percentage.
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
