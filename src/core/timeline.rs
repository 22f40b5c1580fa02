use serde::Serialize;

use super::state::{JobId, Ticks};

/// A contiguous interval `[start, end)` during which one process held the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub process_id: JobId,
    pub start: Ticks,
    pub end: Ticks,
    // Feedback level; only set by multi-level policies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
}

impl Segment {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Gantt chart builder. Back-to-back runs of the same process at the same
/// level collapse into a single segment.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, process_id: JobId, level: Option<usize>, start: Ticks, end: Ticks) {
        debug_assert!(start < end, "empty run recorded for P{process_id}");

        if let Some(last) = self.segments.last_mut() {
            if last.process_id == process_id && last.level == level && last.end == start {
                last.end = end;
                return;
            }
            debug_assert!(last.end <= start, "timeline runs must not overlap");
        }

        self.segments.push(Segment {
            process_id,
            start,
            end,
            level,
        });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total busy time across all segments.
    pub fn busy_time(&self) -> Ticks {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_runs_merge() {
        let mut t = Timeline::new();
        t.record(0, None, 0, 1);
        t.record(0, None, 1, 3);
        t.record(1, None, 3, 4);
        assert_eq!(
            t.segments(),
            &[
                Segment { process_id: 0, start: 0, end: 3, level: None },
                Segment { process_id: 1, start: 3, end: 4, level: None },
            ]
        );
    }

    #[test]
    fn gap_or_level_change_starts_new_segment() {
        let mut t = Timeline::new();
        t.record(0, Some(0), 0, 4);
        t.record(0, Some(1), 4, 6);
        t.record(0, Some(1), 8, 9);
        assert_eq!(t.segments().len(), 3);
        assert_eq!(t.busy_time(), 7);
    }
}
