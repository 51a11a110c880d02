/// Milliseconds between revealed scan lines.
pub const SCAN_TICK_MS: u32 = 800;

const STEPS: [&str; 7] = [
    "Scanning network... \u{2713}",
    "Checking services... \u{2713}",
    "Analyzing logs... \u{2713}",
    "Verifying security... \u{2713}",
    "Checking for anomalies...",
    "ANOMALY DETECTED in /home/dtempire/flag",
    "Access required to investigate",
];

// Zero-based index of the line that opens the gate.
const ANOMALY_STEP: usize = 5;

pub(crate) const ANOMALY_ALERT: &str = r#"<div class="flag-message"><h3>⚠️ Security Alert!</h3>Anomaly detected in restricted directory.<br>Use command: cd /home/dtempire/flag to investigate</div>"#;

pub struct ScanStep {
    pub line: &'static str,
    pub anomaly: bool,
}

/// One running fake system scan. Lines are revealed one at a time with a
/// cursor, like a boot log; the driver decides the cadence.
pub struct ScanSequence {
    step: usize,
}

impl Default for ScanSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSequence {
    pub fn new() -> Self {
        ScanSequence { step: 0 }
    }

    /// Reveal the next status line, or `None` once the sequence is spent.
    pub fn advance(&mut self) -> Option<ScanStep> {
        if self.step >= STEPS.len() {
            return None;
        }
        let line = STEPS[self.step];
        let anomaly = self.step == ANOMALY_STEP;
        self.step += 1;
        Some(ScanStep { line, anomaly })
    }

    pub fn is_finished(&self) -> bool {
        self.step >= STEPS.len()
    }

    pub fn total_steps() -> usize {
        STEPS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_all_lines_in_order() {
        let mut scan = ScanSequence::new();
        let mut lines = Vec::new();
        while let Some(step) = scan.advance() {
            lines.push(step.line);
        }
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Scanning network... \u{2713}");
        assert_eq!(lines[6], "Access required to investigate");
    }

    #[test]
    fn test_anomaly_fires_on_detection_line() {
        let mut scan = ScanSequence::new();
        let mut anomalies = Vec::new();
        while let Some(step) = scan.advance() {
            anomalies.push((step.line, step.anomaly));
        }
        let hits: Vec<_> = anomalies.iter().filter(|(_, a)| *a).collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].0.contains("ANOMALY DETECTED"));
        // The alert fires before the final line is revealed.
        assert!(!anomalies[6].1);
    }

    #[test]
    fn test_exhausted_sequence_stays_finished() {
        let mut scan = ScanSequence::new();
        assert!(!scan.is_finished());
        for _ in 0..ScanSequence::total_steps() {
            assert!(scan.advance().is_some());
        }
        assert!(scan.is_finished());
        assert!(scan.advance().is_none());
        assert!(scan.advance().is_none());
    }
}
