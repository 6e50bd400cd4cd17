use std::time::{Duration, Instant};

/// Accumulates elapsed time over any number of start/stop windows.
#[derive(Debug, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
    total: Duration,
}

impl Stopwatch {
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Closes the current window and returns its length.
    pub fn stop(&mut self) -> Duration {
        let lap = self.started.take().map(|t| t.elapsed()).unwrap_or_default();
        self.total += lap;
        lap
    }

    pub fn total(&self) -> Duration {
        self.total
    }
}

/// Counters for one run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub read_count: usize,
    pub read_vertices: usize,
    pub read_time: Stopwatch,
    pub op_count: usize,
    pub op_vertices: usize,
    pub exec_time: Stopwatch,
}

impl RunStats {
    pub fn read_summary(&self) -> String {
        format!(
            "Read {} geometries, {} vertices  -- {}",
            self.read_count,
            self.read_vertices,
            format_micros(self.read_time.total())
        )
    }

    pub fn exec_summary(&self, op: &str) -> String {
        format!(
            "Executed {}: {} ops, {} vertices  -- {}",
            op,
            self.op_count,
            self.op_vertices,
            format_micros(self.exec_time.total())
        )
    }
}

/// `1234567` microseconds prints as `1,234,567 usec`.
pub fn format_micros(d: Duration) -> String {
    format!("{} usec", thousands(d.as_micros()))
}

fn thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_get_separators() {
        assert_eq!(format_micros(Duration::from_micros(0)), "0 usec");
        assert_eq!(format_micros(Duration::from_micros(999)), "999 usec");
        assert_eq!(format_micros(Duration::from_micros(1_000)), "1,000 usec");
        assert_eq!(format_micros(Duration::from_micros(1_234_567)), "1,234,567 usec");
    }

    #[test]
    fn stopwatch_accumulates_windows() {
        let mut sw = Stopwatch::default();
        sw.start();
        let first = sw.stop();
        sw.start();
        let second = sw.stop();
        assert_eq!(sw.total(), first + second);
    }

    #[test]
    fn stop_without_start_adds_nothing() {
        let mut sw = Stopwatch::default();
        assert_eq!(sw.stop(), Duration::ZERO);
        assert_eq!(sw.total(), Duration::ZERO);
    }

    #[test]
    fn summaries() {
        let stats = RunStats {
            read_count: 3,
            read_vertices: 12,
            ..Default::default()
        };
        assert_eq!(stats.read_summary(), "Read 3 geometries, 12 vertices  -- 0 usec");
        assert!(stats.exec_summary("area").starts_with("Executed area: 0 ops, 0 vertices"));
    }
}
