use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use rusty_lab::analytics::{CorrelationMatrix, Plot2d, Scatter3d, View};

use crate::color::{self, ColorScale};
use crate::state::Projection;

/// Colour buckets used for coloured 3D scatters.
const COLOR_BUCKETS: usize = 8;

// ---------------------------------------------------------------------------
// 2D plot
// ---------------------------------------------------------------------------

/// Render a histogram or scatter, or a hint when there is nothing to show.
pub fn plot_2d(ui: &mut Ui, id: &str, view: &View<Plot2d>) {
    let plot = match view {
        View::Present(plot) => plot,
        View::Absent => {
            ui.label("Select numeric column(s) to plot.");
            return;
        }
    };

    ui.label(RichText::new(plot.title()).strong());
    match plot {
        Plot2d::Histogram(h) => {
            let width = h.bin_width();
            let bars: Vec<Bar> = h
                .edges
                .iter()
                .zip(&h.counts)
                .map(|(&left, &count)| Bar::new(left + width / 2.0, count as f64).width(width))
                .collect();

            Plot::new(id)
                .height(300.0)
                .x_axis_label(h.column.clone())
                .y_axis_label("count")
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
                });
        }
        Plot2d::Scatter(s) => {
            let points: PlotPoints = s.points.iter().copied().collect();
            Plot::new(id)
                .height(300.0)
                .x_axis_label(s.x.clone())
                .y_axis_label(s.y.clone())
                .allow_boxed_zoom(true)
                .show(ui, |plot_ui| {
                    plot_ui.points(Points::new(points).radius(3.0).color(Color32::LIGHT_BLUE));
                });
        }
    }
}

// ---------------------------------------------------------------------------
// 3D scatter (orthographic projection)
// ---------------------------------------------------------------------------

/// Scale each axis to `[-1, 1]`, rotate by yaw around the vertical (z) axis,
/// tilt by pitch, and drop depth.
pub fn project(points: &[[f64; 3]], projection: Projection) -> Vec<[f64; 2]> {
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for p in points {
        for axis in 0..3 {
            lo[axis] = lo[axis].min(p[axis]);
            hi[axis] = hi[axis].max(p[axis]);
        }
    }

    let normalized = |p: &[f64; 3]| -> [f64; 3] {
        let mut out = [0.0; 3];
        for axis in 0..3 {
            let range = hi[axis] - lo[axis];
            if range > 0.0 {
                out[axis] = 2.0 * (p[axis] - lo[axis]) / range - 1.0;
            }
        }
        out
    };

    points
        .iter()
        .map(|p| rotate(normalized(p), projection))
        .collect()
}

fn rotate([x, y, z]: [f64; 3], projection: Projection) -> [f64; 2] {
    let (sy, cy) = projection.yaw.to_radians().sin_cos();
    let (sp, cp) = projection.pitch.to_radians().sin_cos();
    let across = x * cy - y * sy;
    let depth = x * sy + y * cy;
    [across, z * cp + depth * sp]
}

/// Render a projected 3D scatter with axis guides.
pub fn scatter_3d(ui: &mut Ui, id: &str, scatter: &Scatter3d, projection: Projection) {
    ui.label(RichText::new(scatter.title()).strong());

    let projected = project(&scatter.points, projection);
    let scale = ColorScale::from_values(&scatter.color_values);

    // Axis guides from the (-1, -1, -1) corner.
    let origin = rotate([-1.0, -1.0, -1.0], projection);
    let guides: Vec<(&str, [f64; 2])> = vec![
        (scatter.axes[0].as_str(), rotate([1.0, -1.0, -1.0], projection)),
        (scatter.axes[1].as_str(), rotate([-1.0, 1.0, -1.0], projection)),
        (scatter.axes[2].as_str(), rotate([-1.0, -1.0, 1.0], projection)),
    ];

    Plot::new(id)
        .height(380.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (name, end) in guides {
                let line: PlotPoints = vec![origin, end].into_iter().collect();
                plot_ui.line(Line::new(line).name(name).color(Color32::GRAY).width(1.0));
            }

            match (&scatter.color, scale) {
                (Some(color_col), Some(scale)) => {
                    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); COLOR_BUCKETS];
                    for (p, &v) in projected.iter().zip(&scatter.color_values) {
                        buckets[scale.bucket(v, COLOR_BUCKETS)].push(*p);
                    }
                    let (min, max) = scale.range();
                    let step = (max - min) / COLOR_BUCKETS as f64;
                    for (i, pts) in buckets.into_iter().enumerate() {
                        if pts.is_empty() {
                            continue;
                        }
                        let lo = min + step * i as f64;
                        let points: PlotPoints = pts.into_iter().collect();
                        plot_ui.points(
                            Points::new(points)
                                .radius(3.0)
                                .color(scale.color_for(lo + step * 0.5))
                                .name(format!("{color_col} ≥ {lo:.2}")),
                        );
                    }
                }
                _ => {
                    let points: PlotPoints = projected.iter().copied().collect();
                    plot_ui.points(Points::new(points).radius(3.0).color(Color32::LIGHT_BLUE));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

pub fn correlation_heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    egui::ScrollArea::horizontal()
        .id_salt("correlation_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("correlation_grid")
                .spacing([4.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for name in &corr.columns {
                        ui.strong(name);
                    }
                    ui.end_row();

                    for (i, row_name) in corr.columns.iter().enumerate() {
                        ui.strong(row_name);
                        for j in 0..corr.columns.len() {
                            let r = corr.get(i, j);
                            let text = if r.is_nan() {
                                "  —  ".to_string()
                            } else {
                                format!("{r:+.2}")
                            };
                            ui.label(
                                RichText::new(text)
                                    .monospace()
                                    .color(Color32::BLACK)
                                    .background_color(color::diverging(r)),
                            );
                        }
                        ui.end_row();
                    }
                });
        });
}
