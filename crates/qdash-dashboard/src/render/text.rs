//! Terminal rendering for `qdash snapshot`.
//!
//! Text that comes from the backend passes through [`strip_control`] so a
//! payload cannot move the cursor or recolor the terminal.

use std::fmt::{self, Write as _};

use console::{StyledObject, style};

use qdash_model::{BackendStatus, JobStatus, Severity};

use super::{RenderOptions, elapsed, percent, strip_control};
use crate::view::{ConnectionStatus, DataSource, ViewState, Widget};

/// Maximum rows printed per table.
const MAX_ROWS: usize = 10;

/// Width of the histogram bars in characters.
const BAR_WIDTH: usize = 30;

/// Multi-line terminal summary of the view.
pub fn snapshot(view: &ViewState, options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = write_snapshot(&mut out, view, options);
    out
}

fn write_snapshot(out: &mut String, view: &ViewState, options: &RenderOptions) -> fmt::Result {
    let connection = match view.connection {
        ConnectionStatus::Live => style(view.connection.as_str()).green(),
        ConnectionStatus::Degraded => style(view.connection.as_str()).yellow(),
        ConnectionStatus::Offline => style(view.connection.as_str()).red(),
        ConnectionStatus::Connecting => style(view.connection.as_str()).dim(),
    };
    let (live, total) = view.live_counts();
    writeln!(
        out,
        "{} {}  {}",
        style("qdash").cyan().bold(),
        connection,
        style(format!("cycle {} · {live}/{total} endpoints live", view.cycle)).dim()
    )?;

    heading(out, view, Widget::Metrics)?;
    let m = &view.metrics.data;
    writeln!(
        out,
        "  Jobs: {} running, {} queued, {} completed, {} failed",
        m.active_jobs, m.queued_jobs, m.completed_jobs, m.failed_jobs
    )?;
    writeln!(
        out,
        "  Backends online: {}/{}   Avg fidelity: {}   Success rate: {}",
        m.online_backends,
        m.total_backends,
        percent(m.avg_fidelity),
        percent(m.success_rate)
    )?;

    heading(out, view, Widget::Jobs)?;
    for job in view.jobs.data.iter().take(MAX_ROWS) {
        writeln!(
            out,
            "  {:<14} {:<24} {:>3} {:<10} {}",
            strip_control(&job.id),
            strip_control(&job.backend),
            job.progress,
            job_status(job.status),
            job.duration().map(elapsed).unwrap_or_default()
        )?;
    }
    more(out, view.jobs.data.len())?;

    heading(out, view, Widget::Backends)?;
    for b in view.backends.data.iter().take(MAX_ROWS) {
        let marker = match b.status {
            BackendStatus::Online => style("●").green(),
            BackendStatus::Maintenance => style("●").yellow(),
            BackendStatus::Offline => style("○").red(),
            BackendStatus::Unknown => style("○").dim(),
        };
        writeln!(
            out,
            "  {} {:<24} {:>4} qubits  queue {:>3}",
            marker,
            strip_control(&b.name),
            b.num_qubits,
            b.queue_length
        )?;
    }
    more(out, view.backends.data.len())?;

    heading(out, view, Widget::BlochSphere)?;
    for q in &view.quantum_state.data.qubits {
        let v = q.bloch_vector();
        writeln!(
            out,
            "  q{}  x={:+.2} y={:+.2} z={:+.2}  P(1)={}",
            q.index,
            v.x,
            v.y,
            v.z,
            percent(q.prob_one())
        )?;
    }

    heading(out, view, Widget::Circuit)?;
    match &view.quantum_state.data.circuit {
        Some(circuit) if !circuit.gates.is_empty() && !options.fits(circuit) => writeln!(
            out,
            "  {}",
            style(format!(
                "circuit too wide to draw: {} qubits, limit {}",
                circuit.width(),
                options.max_circuit_qubits
            ))
            .dim()
        )?,
        Some(circuit) if !circuit.gates.is_empty() => {
            let layers = circuit.layers();
            writeln!(
                out,
                "  {} gates, depth {}",
                circuit.gates.len(),
                layers.len()
            )?;
            for layer in layers {
                let labels: Vec<String> = layer
                    .gates
                    .iter()
                    .map(|g| {
                        let qubits: Vec<String> = g.qubits.iter().map(|q| format!("q{q}")).collect();
                        format!("{} {}", strip_control(&g.label()), qubits.join(","))
                    })
                    .collect();
                writeln!(out, "  {:>3}: {}", layer.depth, labels.join(" | "))?;
            }
        }
        _ => writeln!(out, "  {}", style("no circuit").dim())?,
    }

    heading(out, view, Widget::Measurements)?;
    let results = &view.measurements.data;
    write!(
        out,
        "  job {} · {} shots",
        strip_control(&results.job_id),
        results.total()
    )?;
    if let Some((bitstring, count)) = results.most_frequent() {
        write!(out, " · top {} ({count})", strip_control(bitstring))?;
    }
    writeln!(out)?;
    let mut probabilities = results.probabilities();
    probabilities.sort_by(|a, b| b.count.cmp(&a.count).then(a.bitstring.cmp(&b.bitstring)));
    for p in probabilities.iter().take(MAX_ROWS) {
        let filled = (p.probability * BAR_WIDTH as f64).round() as usize;
        writeln!(
            out,
            "  {:>10} {:<width$} {:>6}",
            strip_control(&p.bitstring),
            "█".repeat(filled.min(BAR_WIDTH)),
            percent(p.probability),
            width = BAR_WIDTH
        )?;
    }

    heading(out, view, Widget::Entanglement)?;
    let e = &view.entanglement.data;
    writeln!(
        out,
        "  global {:.3}  mean concurrence {:.3}",
        e.global_entanglement,
        e.mean_concurrence()
    )?;
    if let Some(pair) = e.strongest_pair() {
        writeln!(
            out,
            "  strongest q{}–q{} concurrence {:.3}",
            pair.qubit_a, pair.qubit_b, pair.concurrence
        )?;
    }

    heading(out, view, Widget::Recommendations)?;
    for r in &view.recommendations.data {
        let severity = match r.severity {
            Severity::Critical => style(r.severity.as_str()).red().bold(),
            Severity::Warning => style(r.severity.as_str()).yellow(),
            Severity::Info => style(r.severity.as_str()).dim(),
        };
        writeln!(
            out,
            "  [{}] {}: {}",
            severity,
            strip_control(&r.title),
            strip_control(&r.detail)
        )?;
    }
    Ok(())
}

fn heading(out: &mut String, view: &ViewState, widget: Widget) -> fmt::Result {
    write!(out, "\n{}", style(widget.title()).bold())?;
    if view.source_of(widget) == DataSource::Demo {
        write!(out, " {}", style("(demo data)").yellow())?;
    }
    writeln!(out)
}

fn more(out: &mut String, len: usize) -> fmt::Result {
    if len > MAX_ROWS {
        writeln!(out, "  {}", style(format!("… {} more", len - MAX_ROWS)).dim())?;
    }
    Ok(())
}

fn job_status(status: JobStatus) -> StyledObject<&'static str> {
    match status {
        JobStatus::Completed => style(status.as_str()).green(),
        JobStatus::Running => style(status.as_str()).cyan(),
        JobStatus::Queued => style(status.as_str()).dim(),
        JobStatus::Failed => style(status.as_str()).red(),
    }
}

#[cfg(test)]
mod tests {
    use qdash_model::{
        BackendInfo, CircuitGate, CircuitSketch, JobRecord, MeasurementResults, QuantumStateData,
        Recommendation,
    };

    use super::*;
    use crate::view::{CycleData, Sourced};

    #[test]
    fn test_snapshot_marks_demo_sections() {
        let view = ViewState::stamped(3, CycleData::default());
        let text = snapshot(&view, &RenderOptions::default());
        assert!(text.contains("System Metrics"));
        assert!(text.contains("(demo data)"));
        assert!(text.contains("cycle 3"));
        assert!(text.contains("no circuit"));
    }

    #[test]
    fn test_snapshot_truncates_long_tables() {
        let jobs: Vec<JobRecord> = (0..15)
            .map(|i| JobRecord::new(format!("job-{i}"), "sim"))
            .collect();
        let data = CycleData {
            jobs: Sourced::live(jobs),
            ..CycleData::default()
        };
        let text = snapshot(&ViewState::stamped(1, data), &RenderOptions::default());
        assert!(text.contains("job-9"));
        assert!(!text.contains("job-10 "));
        assert!(text.contains("5 more"));
    }

    #[test]
    fn test_histogram_sorted_by_count() {
        let mut results = MeasurementResults {
            job_id: "job-1".into(),
            shots: 100,
            ..Default::default()
        };
        results.counts.insert("00".into(), 20);
        results.counts.insert("11".into(), 80);
        let data = CycleData {
            measurements: Sourced::live(results),
            ..CycleData::default()
        };
        let text = snapshot(&ViewState::stamped(1, data), &RenderOptions::default());
        let first = text.find("80.0%").unwrap();
        let second = text.find("20.0%").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_backend_text_cannot_inject_escapes() {
        let job = JobRecord::new("job-\x1b[2J1", "\x1b[31mibm\x1b[0m");
        let backend = BackendInfo::new("sim\r\x07", 5);
        let rec = Recommendation {
            title: "\x1b]0;pwned\x07Calibrate".into(),
            detail: "line\nbreak".into(),
            ..Default::default()
        };
        let data = CycleData {
            jobs: Sourced::live(vec![job]),
            backends: Sourced::live(vec![backend]),
            recommendations: Sourced::live(vec![rec]),
            ..CycleData::default()
        };
        let view = ViewState::stamped(1, data);
        console::set_colors_enabled(false);
        let text = snapshot(&view, &RenderOptions::default());
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\x07'));
        assert!(!text.contains('\r'));
        assert!(text.contains("job-[2J1"));
        assert!(text.contains("[31mibm[0m"));
        assert!(text.contains("linebreak"));
    }

    #[test]
    fn test_wide_circuit_is_summarized() {
        let mut view = ViewState::stamped(1, CycleData::default());
        view.quantum_state = Sourced::live(QuantumStateData {
            qubits: vec![],
            circuit: Some(CircuitSketch {
                num_qubits: 10,
                gates: vec![CircuitGate::new("x", [u32::MAX])],
            }),
        });
        let text = snapshot(&view, &RenderOptions::default());
        assert!(text.contains("circuit too wide to draw: 4294967296 qubits, limit 50"));
    }
}
