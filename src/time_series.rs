/// Net WPM measured at one tick of a running session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmSample {
    pub elapsed_secs: f64,
    pub wpm: f64,
}

impl WpmSample {
    pub fn new(elapsed_secs: f64, wpm: f64) -> Self {
        Self { elapsed_secs, wpm }
    }
}

impl From<WpmSample> for (f64, f64) {
    fn from(s: WpmSample) -> Self {
        (s.elapsed_secs, s.wpm)
    }
}

/// Per-second WPM history of one session, used for the results chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WpmSeries {
    samples: Vec<WpmSample>,
}

impl WpmSeries {
    pub fn push(&mut self, elapsed_secs: f64, wpm: f64) {
        self.samples.push(WpmSample::new(elapsed_secs, wpm));
    }

    pub fn samples(&self) -> &[WpmSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().copied().map(Into::into).collect()
    }

    /// Population standard deviation of the sampled WPM; 0 with fewer than two samples
    pub fn consistency(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let values: Vec<f64> = self.samples.iter().map(|s| s.wpm).collect();
        std_dev(&values).unwrap_or(0.0)
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let avg = mean(data)?;
    let variance = data.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt())
}
