use eframe::egui::{Align2, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Text};

use house_price_dashboard::viz::figure::{self, Curve, Histogram};

use crate::color::{shade_by_value, HISTOGRAM_FILL};
use crate::state::{AppState, EvaluationView};

const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Feature distribution
// ---------------------------------------------------------------------------

/// Histogram of the selected feature with its density curve on top.
pub fn histogram_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view house data  (File → Open…)");
        });
        return;
    }
    let Some(hist) = &state.histogram else {
        ui.label(format!("'{}' cannot be plotted.", state.feature));
        return;
    };
    draw_histogram(ui, hist);
}

fn draw_histogram(ui: &mut Ui, hist: &Histogram) {
    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .fill(HISTOGRAM_FILL)
        })
        .collect();

    let kde: PlotPoints = hist.kde.iter().copied().collect();

    Plot::new("feature_distribution")
        .legend(Legend::default())
        .x_axis_label(hist.column.as_str())
        .y_axis_label("Count")
        .height(PLOT_HEIGHT)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_FILL).name(&hist.column));
            plot_ui.line(Line::new(kde).color(Color32::DARK_GREEN).width(2.0).name("density"));
        });
}

// ---------------------------------------------------------------------------
// Model evaluation
// ---------------------------------------------------------------------------

/// Whichever evaluation figure the side panel has selected.
pub fn evaluation_plot(ui: &mut Ui, state: &AppState) {
    if state.current_evaluation().is_none() {
        ui.label(format!("{} has not been trained yet.", state.family));
        return;
    }
    match state.view {
        EvaluationView::ErrorByTrees => {
            if let Some(curve) = state.error_curve() {
                curve_plot(ui, &curve);
            }
        }
        EvaluationView::FeatureImportance => {
            if let Some(chart) = state.importance_chart() {
                importance_plot(ui, &chart);
            }
        }
    }
}

fn curve_plot(ui: &mut Ui, curve: &Curve) {
    ui.strong(&curve.title);
    let points: PlotPoints = curve.points.iter().copied().collect();
    Plot::new("model_evaluation")
        .x_axis_label(curve.x_label.as_str())
        .y_axis_label(curve.y_label.as_str())
        .height(PLOT_HEIGHT)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(Color32::LIGHT_BLUE).width(2.0));
        });
}

/// Horizontal bars, most important feature on top, value printed beside it.
fn importance_plot(ui: &mut Ui, chart: &figure::BarChart) {
    ui.strong(&chart.title);
    let values: Vec<f64> = chart.bars.iter().map(|b| b.value).collect();
    let colors = shade_by_value(&values);

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (b, color))| {
            Bar::new(-(i as f64), b.value)
                .name(&b.label)
                .width(0.8)
                .fill(color)
        })
        .collect();

    Plot::new("variable_importances")
        .x_axis_label(chart.x_label.as_str())
        .show_axes([true, false])
        .height(PLOT_HEIGHT)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (i, b) in chart.bars.iter().enumerate() {
                let at = PlotPoint::new(b.value.max(0.0), -(i as f64));
                plot_ui.text(
                    Text::new(at, format!("{} {}", b.label, b.text)).anchor(Align2::LEFT_CENTER),
                );
            }
        });
}
