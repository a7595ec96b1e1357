use plotters::prelude::*;

use crate::telemetry::TraceRow;

/// Renders the heading trace of a run against the setpoint line.
pub fn render_heading_chart(
    trace: &[TraceRow],
    setpoint_deg: f64,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if trace.is_empty() {
        return Ok(());
    }

    let t_max = trace.last().map(|r| r.elapsed_secs).unwrap_or(1.0).max(1.0);
    let mut y_min = setpoint_deg.min(0.0);
    let mut y_max = setpoint_deg.max(0.0);
    for row in trace {
        y_min = y_min.min(row.heading_deg);
        y_max = y_max.max(row.heading_deg);
    }
    let pad = ((y_max - y_min) * 0.1).max(1.0);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Heading Response (deg)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..t_max, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Heading (deg)")
        .draw()?;

    chart.draw_series(LineSeries::new(
        trace.iter().map(|r| (r.elapsed_secs, r.heading_deg)),
        &BLUE,
    ))?;
    chart.draw_series(LineSeries::new(
        vec![(0.0, setpoint_deg), (t_max, setpoint_deg)],
        &RED,
    ))?;

    root.present()?;
    Ok(())
}
