//! Server-rendered dashboard page.

use std::fmt::{self, Write as _};

use qdash_model::{CircuitSketch, JobStatus};

use super::{RenderOptions, elapsed, escape, percent, svg};
use crate::notify::Notification;
use crate::view::{DataSource, ViewState, Widget};

/// Bloch sphere drawing size in pixels.
const SPHERE_SIZE: u32 = 140;

/// Notifications shown at the top of the page.
const PAGE_NOTIFICATIONS: usize = 5;

const STYLE_CSS: &str = r#"
:root { --bg:#0d1117; --surface:#161b22; --border:#30363d; --text:#e6edf3; --muted:#8b949e;
        --accent:#58a6ff; --green:#3fb950; --yellow:#d29922; --red:#f85149; }
* { box-sizing:border-box; }
body { margin:0; background:var(--bg); color:var(--text);
       font:14px/1.5 -apple-system,BlinkMacSystemFont,'Segoe UI',Helvetica,Arial,sans-serif; }
header { display:flex; gap:1rem; align-items:center; padding:1rem 1.5rem; border-bottom:1px solid var(--border); }
header h1 { font-size:1.2rem; margin:0; }
main { display:grid; grid-template-columns:repeat(auto-fit,minmax(420px,1fr)); gap:1rem; padding:1rem 1.5rem; }
section.widget { background:var(--surface); border:1px solid var(--border); border-radius:8px; padding:1rem; overflow-x:auto; }
section.widget h2 { font-size:1rem; margin:0 0 .75rem; display:flex; gap:.5rem; align-items:center; }
table { border-collapse:collapse; width:100%; }
th, td { text-align:left; padding:.25rem .5rem; border-bottom:1px solid var(--border); white-space:nowrap; }
.muted { color:var(--muted); }
.badge { font-size:.7rem; padding:.1rem .4rem; border-radius:4px; border:1px solid currentColor; }
.badge.demo { color:var(--yellow); }
.conn-live { color:var(--green); } .conn-degraded { color:var(--yellow); }
.conn-offline { color:var(--red); } .conn-connecting { color:var(--muted); }
.cards { display:grid; grid-template-columns:repeat(auto-fill,minmax(120px,1fr)); gap:.5rem; margin:0; }
.cards div { border:1px solid var(--border); border-radius:6px; padding:.5rem; }
.cards dt { color:var(--muted); font-size:.75rem; } .cards dd { margin:0; font-size:1.2rem; }
.bar { background:var(--border); border-radius:3px; height:8px; min-width:80px; }
.bar span { display:block; height:100%; border-radius:3px; background:var(--accent); }
.status-completed, .status-online, .sev-info { color:var(--green); }
.status-running, .status-maintenance, .sev-warning { color:var(--yellow); }
.status-failed, .status-offline, .sev-critical { color:var(--red); }
.spheres { display:flex; flex-wrap:wrap; gap:1rem; }
.spheres figure { margin:0; text-align:center; }
.circuit td { font-family:'SF Mono','Cascadia Code',monospace; text-align:center; }
.toasts { list-style:none; margin:0; padding:.5rem 1.5rem; }
.toasts li { padding:.25rem 0; }
.level-warning { color:var(--yellow); } .level-error { color:var(--red); }
"#;

/// Full HTML document for the current view.
///
/// The page reloads itself every `options.refresh_secs` seconds.
pub fn page(view: &ViewState, notifications: &[Notification], options: &RenderOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_page(&mut out, view, notifications, options);
    out
}

/// Body markup of a single widget, without the surrounding section.
pub fn widget_body(view: &ViewState, widget: Widget, options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = write_widget_body(&mut out, view, widget, options);
    out
}

fn write_page(
    out: &mut String,
    view: &ViewState,
    notifications: &[Notification],
    options: &RenderOptions,
) -> fmt::Result {
    let refresh_secs = options.refresh_secs;
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="en"><head><meta charset="utf-8">"#)?;
    writeln!(out, r#"<meta http-equiv="refresh" content="{refresh_secs}">"#)?;
    writeln!(
        out,
        r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#
    )?;
    writeln!(out, "<title>qdash</title><style>{STYLE_CSS}</style></head><body>")?;

    let updated = view
        .last_updated
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    writeln!(
        out,
        r#"<header><h1>qdash</h1><span class="conn-{c}" id="connection">{c}</span><span class="muted">cycle {cycle} · updated {updated}</span></header>"#,
        c = view.connection.as_str(),
        cycle = view.cycle,
    )?;

    if !notifications.is_empty() {
        writeln!(out, r#"<ul class="toasts">"#)?;
        for n in notifications.iter().take(PAGE_NOTIFICATIONS) {
            writeln!(
                out,
                r#"<li class="level-{}"><span class="muted">{}</span> {}</li>"#,
                n.level.as_str(),
                n.timestamp.format("%H:%M:%S"),
                escape(&n.message)
            )?;
        }
        writeln!(out, "</ul>")?;
    }

    writeln!(out, "<main>")?;
    for widget in Widget::ALL {
        let source = view.source_of(widget);
        let source_name = match source {
            DataSource::Live => "live",
            DataSource::Demo => "demo",
        };
        write!(
            out,
            r#"<section class="widget" id="widget-{name}" data-source="{source_name}"><h2>{title}"#,
            name = widget.name(),
            title = widget.title(),
        )?;
        if source == DataSource::Demo {
            write!(out, r#" <span class="badge demo">demo data</span>"#)?;
        }
        writeln!(out, "</h2>")?;
        write_widget_body(out, view, widget, options)?;
        writeln!(out, "</section>")?;
    }
    writeln!(out, "</main></body></html>")
}

fn write_widget_body(
    out: &mut String,
    view: &ViewState,
    widget: Widget,
    options: &RenderOptions,
) -> fmt::Result {
    match widget {
        Widget::Metrics => write_metrics(out, view),
        Widget::Jobs => write_jobs(out, view),
        Widget::Backends => write_backends(out, view),
        Widget::BlochSphere => write_bloch_spheres(out, view),
        Widget::Circuit => match &view.quantum_state.data.circuit {
            Some(circuit) if circuit.gates.is_empty() => {
                writeln!(out, r#"<p class="muted">No circuit available</p>"#)
            }
            Some(circuit) if !options.fits(circuit) => writeln!(
                out,
                r#"<p class="muted">Circuit too wide to draw: {} qubits, limit {}</p>"#,
                circuit.width(),
                options.max_circuit_qubits
            ),
            Some(circuit) => write_circuit(out, circuit),
            None => writeln!(out, r#"<p class="muted">No circuit available</p>"#),
        },
        Widget::Measurements => write_measurements(out, view),
        Widget::Entanglement => write_entanglement(out, view),
        Widget::Recommendations => write_recommendations(out, view),
    }
}

fn write_metrics(out: &mut String, view: &ViewState) -> fmt::Result {
    let m = &view.metrics.data;
    let cards = [
        ("Active jobs", m.active_jobs.to_string()),
        ("Queued", m.queued_jobs.to_string()),
        ("Completed", m.completed_jobs.to_string()),
        ("Failed", m.failed_jobs.to_string()),
        (
            "Backends online",
            format!("{}/{}", m.online_backends, m.total_backends),
        ),
        ("Avg fidelity", percent(m.avg_fidelity)),
        ("Success rate", percent(m.success_rate)),
        ("Avg queue time", format!("{:.0}s", m.avg_queue_time_s)),
        ("Uptime", format!("{:.1}%", m.uptime_percent)),
    ];
    writeln!(out, r#"<dl class="cards">"#)?;
    for (label, value) in cards {
        writeln!(out, "<div><dt>{label}</dt><dd>{value}</dd></div>")?;
    }
    writeln!(out, "</dl>")
}

fn write_jobs(out: &mut String, view: &ViewState) -> fmt::Result {
    let jobs = &view.jobs.data;
    if jobs.is_empty() {
        return writeln!(out, r#"<p class="muted">No jobs</p>"#);
    }
    writeln!(
        out,
        "<table><thead><tr><th>ID</th><th>Name</th><th>Backend</th><th>Status</th><th>Qubits</th><th>Shots</th><th>Progress</th><th>Duration</th><th>Fidelity</th></tr></thead><tbody>"
    )?;
    for job in jobs {
        let progress = match job.status {
            JobStatus::Completed => 100,
            _ => job.progress.min(100),
        };
        writeln!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="status-{status}">{status}</td><td>{}</td><td>{}</td><td><div class="bar"><span style="width:{progress}%"></span></div></td><td>{}</td><td>{}</td></tr>"#,
            escape(&job.id),
            escape(&job.name),
            escape(&job.backend),
            job.num_qubits,
            job.shots,
            job.duration().map(elapsed).unwrap_or_else(|| "-".to_string()),
            job.fidelity.map(percent).unwrap_or_else(|| "-".to_string()),
            status = job.status.as_str(),
        )?;
    }
    writeln!(out, "</tbody></table>")
}

fn write_backends(out: &mut String, view: &ViewState) -> fmt::Result {
    let backends = &view.backends.data;
    if backends.is_empty() {
        return writeln!(out, r#"<p class="muted">No backends</p>"#);
    }
    writeln!(
        out,
        "<table><thead><tr><th>Name</th><th>Provider</th><th>Kind</th><th>Status</th><th>Qubits</th><th>Queue</th><th>Gate fidelity</th><th>T1 / T2 (µs)</th></tr></thead><tbody>"
    )?;
    for b in backends {
        let coherence = match (b.t1_us, b.t2_us) {
            (Some(t1), Some(t2)) => format!("{t1:.0} / {t2:.0}"),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="status-{status}">{status}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            escape(&b.name),
            escape(&b.provider),
            b.kind,
            b.num_qubits,
            b.queue_length,
            percent(b.avg_gate_fidelity),
            coherence,
            status = b.status.as_str(),
        )?;
    }
    writeln!(out, "</tbody></table>")
}

fn write_bloch_spheres(out: &mut String, view: &ViewState) -> fmt::Result {
    let qubits = &view.quantum_state.data.qubits;
    if qubits.is_empty() {
        return writeln!(out, r#"<p class="muted">No qubit states</p>"#);
    }
    writeln!(out, r#"<div class="spheres">"#)?;
    for q in qubits {
        let v = q.bloch_vector();
        writeln!(
            out,
            r#"<figure>{}<figcaption>q{} <span class="muted">θ={:.2} φ={:.2} P(1)={}</span></figcaption></figure>"#,
            svg::bloch_sphere(&v, SPHERE_SIZE),
            q.index,
            v.theta(),
            v.phi(),
            percent(q.prob_one()),
        )?;
    }
    writeln!(out, "</div>")
}

/// Draw a circuit that already fits the width limit.
fn write_circuit(out: &mut String, circuit: &CircuitSketch) -> fmt::Result {
    let layers = circuit.layers();
    let width = u32::try_from(circuit.width()).unwrap_or(u32::MAX);

    writeln!(
        out,
        r#"<p class="muted">{} gates, depth {}</p><table class="circuit"><tbody>"#,
        circuit.gates.len(),
        layers.len()
    )?;
    for qubit in 0..width {
        write!(out, "<tr><th>q{qubit}</th>")?;
        for layer in &layers {
            let cell = layer
                .gates
                .iter()
                .find(|g| g.qubits.is_empty() || g.qubits.contains(&qubit));
            match cell {
                Some(gate) => write!(out, "<td>{}</td>", escape(&gate.label()))?,
                None => write!(out, r#"<td class="muted">─</td>"#)?,
            }
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</tbody></table>")
}

fn write_measurements(out: &mut String, view: &ViewState) -> fmt::Result {
    let results = &view.measurements.data;
    let probabilities = results.probabilities();
    if probabilities.is_empty() {
        return writeln!(out, r#"<p class="muted">No measurement results</p>"#);
    }
    write!(
        out,
        r#"<p class="muted">job {} · {} shots"#,
        escape(&results.job_id),
        results.total()
    )?;
    if let Some((bitstring, count)) = results.most_frequent() {
        write!(out, r#" · top <code>{}</code> ({count})"#, escape(bitstring))?;
    }
    writeln!(out, "</p><table><tbody>")?;
    for p in probabilities {
        writeln!(
            out,
            r#"<tr><td><code>{}</code></td><td><div class="bar"><span style="width:{:.1}%"></span></div></td><td>{}</td><td>{}</td></tr>"#,
            escape(&p.bitstring),
            p.probability * 100.0,
            p.count,
            percent(p.probability),
        )?;
    }
    writeln!(out, "</tbody></table>")
}

fn write_entanglement(out: &mut String, view: &ViewState) -> fmt::Result {
    let data = &view.entanglement.data;
    writeln!(
        out,
        r#"<p>Global entanglement <strong>{:.3}</strong> <span class="muted">over {} qubits</span></p>"#,
        data.global_entanglement, data.num_qubits
    )?;
    if data.pairs.is_empty() {
        return writeln!(out, r#"<p class="muted">No entangled pairs</p>"#);
    }
    writeln!(
        out,
        r#"<p class="muted">Mean concurrence {:.3} over {} pairs</p>"#,
        data.mean_concurrence(),
        data.pairs.len()
    )?;
    writeln!(
        out,
        "<table><thead><tr><th>Pair</th><th>Concurrence</th><th></th></tr></thead><tbody>"
    )?;
    for pair in &data.pairs {
        let c = pair.concurrence.clamp(0.0, 1.0);
        writeln!(
            out,
            r#"<tr><td>q{}–q{}</td><td><div class="bar"><span style="width:{:.1}%"></span></div></td><td>{:.3}</td></tr>"#,
            pair.qubit_a,
            pair.qubit_b,
            c * 100.0,
            pair.concurrence
        )?;
    }
    writeln!(out, "</tbody></table>")
}

fn write_recommendations(out: &mut String, view: &ViewState) -> fmt::Result {
    let recs = &view.recommendations.data;
    if recs.is_empty() {
        return writeln!(out, r#"<p class="muted">No recommendations</p>"#);
    }
    let mut sorted: Vec<_> = recs.iter().collect();
    sorted.sort_by(|a, b| b.severity.cmp(&a.severity));
    writeln!(out, "<ul>")?;
    for r in sorted {
        write!(
            out,
            r#"<li><span class="sev-{s}">[{s}]</span> <strong>{}</strong> {}"#,
            escape(&r.title),
            escape(&r.detail),
            s = r.severity.as_str(),
        )?;
        if let Some(backend) = &r.backend {
            write!(out, r#" <span class="muted">({})</span>"#, escape(backend))?;
        }
        writeln!(out, "</li>")?;
    }
    writeln!(out, "</ul>")
}
