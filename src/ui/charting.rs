/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(points: &[(f64, f64)], time_limit_secs: f64) -> (f64, f64) {
    let highest_wpm = points.iter().map(|&(_, wpm)| wpm).fold(0.0, f64::max);

    let overall_duration = points
        .last()
        .map_or(time_limit_secs, |&(t, _)| t)
        .max(1.0);

    // leave a little headroom above the best second
    let y_bound = (highest_wpm + highest_wpm / 10.0).ceil().max(10.0);

    (overall_duration, y_bound)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
