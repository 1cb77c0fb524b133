//! # Construction Timeline
//!
//! The analysis marches through a list of contiguous time intervals, from
//! casting the first segment to the end of service life. Every interval has
//! a start, middle and end time (days) and may carry construction events at
//! its start.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::timeline::{ConstructionEvent, Timeline};
//!
//! let timeline = Timeline::builder()
//!     .interval("Cast and cure", 1.0, &[ConstructionEvent::CastSegment, ConstructionEvent::StressStrands])
//!     .interval("Release", 0.5, &[ConstructionEvent::ReleasePrestress])
//!     .interval("Storage", 60.0, &[ConstructionEvent::StoreSegment])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(timeline.len(), 3);
//! assert_eq!(timeline.event_interval(ConstructionEvent::ReleasePrestress), Some(1));
//! assert_eq!(timeline.interval(1).unwrap().middle_days, 1.25);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Tolerance when checking that intervals abut
const TIME_TOLERANCE_DAYS: f64 = 1.0e-9;

/// Construction activity that starts an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionEvent {
    CastSegment,
    StressStrands,
    ReleasePrestress,
    StoreSegment,
    ErectSegment,
    CastClosureJoint,
    StressTendons,
    GroutTendons,
    RemoveTemporaryStrands,
    CastDeck,
    CompositeDeck,
    InstallRailing,
    InstallOverlay,
    OpenToTraffic,
    EndOfService,
}

impl ConstructionEvent {
    pub const ALL: [ConstructionEvent; 15] = [
        ConstructionEvent::CastSegment,
        ConstructionEvent::StressStrands,
        ConstructionEvent::ReleasePrestress,
        ConstructionEvent::StoreSegment,
        ConstructionEvent::ErectSegment,
        ConstructionEvent::CastClosureJoint,
        ConstructionEvent::StressTendons,
        ConstructionEvent::GroutTendons,
        ConstructionEvent::RemoveTemporaryStrands,
        ConstructionEvent::CastDeck,
        ConstructionEvent::CompositeDeck,
        ConstructionEvent::InstallRailing,
        ConstructionEvent::InstallOverlay,
        ConstructionEvent::OpenToTraffic,
        ConstructionEvent::EndOfService,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            ConstructionEvent::CastSegment => "Cast segment",
            ConstructionEvent::StressStrands => "Stress pretensioning strands",
            ConstructionEvent::ReleasePrestress => "Release prestress",
            ConstructionEvent::StoreSegment => "Store segment",
            ConstructionEvent::ErectSegment => "Erect segment",
            ConstructionEvent::CastClosureJoint => "Cast closure joint",
            ConstructionEvent::StressTendons => "Stress tendons",
            ConstructionEvent::GroutTendons => "Grout tendons",
            ConstructionEvent::RemoveTemporaryStrands => "Remove temporary strands",
            ConstructionEvent::CastDeck => "Cast deck",
            ConstructionEvent::CompositeDeck => "Deck becomes composite",
            ConstructionEvent::InstallRailing => "Install railing",
            ConstructionEvent::InstallOverlay => "Install overlay",
            ConstructionEvent::OpenToTraffic => "Open to traffic",
            ConstructionEvent::EndOfService => "Final",
        }
    }
}

/// One analysis time step. Immutable once the timeline is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub index: usize,
    pub description: String,
    pub start_days: f64,
    pub middle_days: f64,
    pub end_days: f64,
    /// Events that occur at the start of the interval
    #[serde(default)]
    pub events: Vec<ConstructionEvent>,
}

impl Interval {
    pub fn duration_days(&self) -> f64 {
        self.end_days - self.start_days
    }

    pub fn has_event(&self, event: ConstructionEvent) -> bool {
        self.events.contains(&event)
    }
}

/// Ordered list of contiguous intervals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    intervals: Vec<Interval>,
}

impl Timeline {
    /// Build a timeline from fully specified intervals, validating it
    pub fn new(intervals: Vec<Interval>) -> CalcResult<Self> {
        let timeline = Timeline { intervals };
        timeline.validate()?;
        Ok(timeline)
    }

    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::default()
    }

    /// Check ordering, contiguity and interval lengths
    pub fn validate(&self) -> CalcResult<()> {
        if self.intervals.is_empty() {
            return Err(CalcError::configuration("timeline", "Timeline has no intervals"));
        }
        for (i, interval) in self.intervals.iter().enumerate() {
            let ctx = format!("timeline interval {}", i);
            if interval.index != i {
                return Err(CalcError::configuration(
                    ctx,
                    format!("Interval index {} does not match its position", interval.index),
                ));
            }
            if !interval.start_days.is_finite() || !interval.end_days.is_finite() {
                return Err(CalcError::configuration(ctx, "Interval times must be finite"));
            }
            if interval.end_days - interval.start_days <= TIME_TOLERANCE_DAYS {
                return Err(CalcError::configuration(
                    ctx,
                    format!(
                        "Zero-length interval ({} to {} days)",
                        interval.start_days, interval.end_days
                    ),
                ));
            }
            if !(interval.start_days < interval.middle_days && interval.middle_days < interval.end_days) {
                return Err(CalcError::configuration(ctx, "Middle time must lie inside the interval"));
            }
            if i > 0 {
                let prev_end = self.intervals[i - 1].end_days;
                if interval.start_days < prev_end - TIME_TOLERANCE_DAYS {
                    return Err(CalcError::configuration(
                        ctx,
                        format!("Starts at {} days, overlapping the previous interval", interval.start_days),
                    ));
                }
                if interval.start_days > prev_end + TIME_TOLERANCE_DAYS {
                    return Err(CalcError::configuration(
                        ctx,
                        format!("Gap between {} and {} days", prev_end, interval.start_days),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Require that `event` occurs somewhere on the timeline
    pub fn require_event(&self, event: ConstructionEvent) -> CalcResult<usize> {
        self.event_interval(event).ok_or_else(|| {
            CalcError::configuration(
                "timeline",
                format!("Required event '{}' is missing", event.description()),
            )
        })
    }

    pub fn event_interval(&self, event: ConstructionEvent) -> Option<usize> {
        self.intervals.iter().position(|i| i.has_event(event))
    }

    pub fn interval(&self, index: usize) -> CalcResult<&Interval> {
        self.intervals
            .get(index)
            .ok_or_else(|| CalcError::configuration("timeline", format!("Interval {} does not exist", index)))
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.intervals.len().saturating_sub(1)
    }
}

/// Appends contiguous intervals by duration
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    intervals: Vec<Interval>,
    start_days: f64,
}

impl TimelineBuilder {
    /// Time of the first interval start (default 0)
    pub fn starting_at(mut self, start_days: f64) -> Self {
        self.start_days = start_days;
        self
    }

    pub fn interval(mut self, description: impl Into<String>, duration_days: f64, events: &[ConstructionEvent]) -> Self {
        let start = self.intervals.last().map(|i| i.end_days).unwrap_or(self.start_days);
        let end = start + duration_days;
        self.intervals.push(Interval {
            index: self.intervals.len(),
            description: description.into(),
            start_days: start,
            middle_days: 0.5 * (start + end),
            end_days: end,
            events: events.to_vec(),
        });
        self
    }

    pub fn build(self) -> CalcResult<Timeline> {
        Timeline::new(self.intervals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(index: usize, start: f64, end: f64) -> Interval {
        Interval {
            index,
            description: format!("I{}", index),
            start_days: start,
            middle_days: 0.5 * (start + end),
            end_days: end,
            events: vec![],
        }
    }

    #[test]
    fn test_empty_timeline_rejected() {
        let err = Timeline::new(vec![]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION");
    }

    #[test]
    fn test_zero_length_interval_rejected() {
        let mut bad = interval(0, 1.0, 1.0);
        bad.middle_days = 1.0;
        let err = Timeline::new(vec![bad]).unwrap_err();
        assert!(matches!(err, CalcError::Configuration { .. }));
    }

    #[test]
    fn test_overlap_and_gap_rejected() {
        assert!(Timeline::new(vec![interval(0, 0.0, 10.0), interval(1, 5.0, 20.0)]).is_err());
        assert!(Timeline::new(vec![interval(0, 0.0, 10.0), interval(1, 12.0, 20.0)]).is_err());
        assert!(Timeline::new(vec![interval(0, 0.0, 10.0), interval(1, 10.0, 20.0)]).is_ok());
    }

    #[test]
    fn test_index_mismatch_rejected() {
        assert!(Timeline::new(vec![interval(0, 0.0, 10.0), interval(5, 10.0, 20.0)]).is_err());
    }

    #[test]
    fn test_builder_and_events() {
        let t = Timeline::builder()
            .starting_at(0.0)
            .interval("Cast", 1.0, &[ConstructionEvent::CastSegment])
            .interval("Deck", 30.0, &[ConstructionEvent::CastDeck])
            .build()
            .unwrap();
        assert_eq!(t.interval(1).unwrap().start_days, 1.0);
        assert_eq!(t.interval(1).unwrap().end_days, 31.0);
        assert_eq!(t.require_event(ConstructionEvent::CastDeck).unwrap(), 1);
        assert!(t.require_event(ConstructionEvent::ReleasePrestress).is_err());
        assert!(t.interval(7).is_err());
    }

    #[test]
    fn test_builder_rejects_zero_duration() {
        let result = Timeline::builder()
            .interval("Release", 0.0, &[ConstructionEvent::ReleasePrestress])
            .build();
        assert!(result.is_err());
    }
}
