//! Day-overlap lookups over a batch of events.

use chrono::NaiveDate;
use tracing::warn;

use crate::date_range::DateSpan;
use crate::event::Event;
use crate::month::{DayCell, MonthGrid};

/// Events with their parsed spans, in batch order.
///
/// Records whose dates don't parse (or run backwards) are left out when the
/// index is built, so they never show up on any day.
#[derive(Debug, Clone, Default)]
pub struct DayIndex {
    entries: Vec<(DateSpan, Event)>,
    rejected: usize,
}

/// A clicked day and the events running on it.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySelection {
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

impl DayIndex {
    pub fn build(events: &[Event]) -> Self {
        let mut entries = Vec::with_capacity(events.len());
        let mut rejected = 0;

        for event in events {
            match event.span() {
                Ok(span) => entries.push((span, event.clone())),
                Err(e) => {
                    warn!(event_id = %event.id, name = %event.name, "Skipping event: {e}");
                    rejected += 1;
                }
            }
        }

        DayIndex { entries, rejected }
    }

    /// Events whose inclusive span contains `day`, in batch order.
    pub fn events_on(&self, day: NaiveDate) -> Vec<&Event> {
        self.entries
            .iter()
            .filter(|(span, _)| span.contains(day))
            .map(|(_, event)| event)
            .collect()
    }

    /// Events running on at least one day of `range`, in batch order.
    pub fn events_in(&self, range: &DateSpan) -> Vec<&Event> {
        self.entries
            .iter()
            .filter(|(span, _)| span.overlaps(range))
            .map(|(_, event)| event)
            .collect()
    }

    pub fn select(&self, day: NaiveDate) -> DaySelection {
        DaySelection {
            date: day,
            events: self.events_on(day).into_iter().cloned().collect(),
        }
    }

    /// Pair every grid cell with the events running on it.
    pub fn month_view<'a>(&'a self, grid: &MonthGrid) -> Vec<(DayCell, Vec<&'a Event>)> {
        let window = MonthGrid::window(grid.month);
        let visible: Vec<_> = self
            .entries
            .iter()
            .filter(|(span, _)| span.overlaps(&window))
            .collect();

        grid.cells
            .iter()
            .map(|cell| {
                let events = visible
                    .iter()
                    .copied()
                    .filter(|(span, _)| span.contains(cell.date))
                    .map(|(_, event)| event)
                    .collect();
                (*cell, events)
            })
            .collect()
    }

    /// Number of events with usable dates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of events left out because of bad dates.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::Month;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn single_event_scenario() {
        let index = DayIndex::build(&[Event::new("a", "A", "", "2024-03-01", "2024-03-03")]);
        assert_eq!(ids(&index.events_on(date("2024-03-02"))), vec!["a"]);
        assert!(index.events_on(date("2024-03-04")).is_empty());
    }

    #[test]
    fn inclusion_matches_inclusive_containment() {
        let events = vec![
            Event::new("a", "A", "", "2024-03-01", "2024-03-03"),
            Event::new("b", "B", "", "2024-03-03", "2024-03-03"),
            Event::new("c", "C", "", "2024-02-20", "2024-03-10"),
        ];
        let index = DayIndex::build(&events);

        for day in DateSpan::parse("2024-02-15", "2024-03-15").unwrap().days() {
            let on_day = ids(&index.events_on(day));
            for event in &events {
                let span = event.span().unwrap();
                let expected = span.start <= day && day <= span.end;
                assert_eq!(on_day.contains(&event.id), expected, "{} on {day}", event.id);
            }
        }
    }

    #[test]
    fn malformed_records_are_excluded_without_affecting_others() {
        let events = vec![
            Event::new("bad", "Bad", "", "not-a-date", "2024-03-03"),
            Event::new("good", "Good", "", "2024-03-01", "2024-03-03"),
            Event::new("backwards", "Backwards", "", "2024-03-05", "2024-03-01"),
            Event::new("bad-end", "Bad End", "", "2024-03-01", "03/03/2024"),
        ];
        let index = DayIndex::build(&events);

        assert_eq!(index.len(), 1);
        assert_eq!(index.rejected(), 3);
        for day in DateSpan::parse("2024-02-01", "2024-04-01").unwrap().days() {
            let on_day = ids(&index.events_on(day));
            assert!(on_day.iter().all(|id| id == "good"));
        }
        assert_eq!(ids(&index.events_on(date("2024-03-02"))), vec!["good"]);
    }

    #[test]
    fn overlapping_events_keep_batch_order() {
        let events = vec![
            Event::new("z", "Z", "", "2024-03-01", "2024-03-05"),
            Event::new("a", "A", "", "2024-03-02", "2024-03-02"),
            Event::new("m", "M", "", "2024-02-01", "2024-03-31"),
        ];
        let index = DayIndex::build(&events);
        let day = date("2024-03-02");
        assert_eq!(ids(&index.events_on(day)), vec!["z", "a", "m"]);
        assert_eq!(ids(&index.events_on(day)), ids(&index.events_on(day)));
    }

    #[test]
    fn select_pairs_day_with_events() {
        let index = DayIndex::build(&[Event::new("a", "A", "", "2024-03-01", "2024-03-03")]);
        let selection = index.select(date("2024-03-01"));
        assert_eq!(selection.date, date("2024-03-01"));
        assert_eq!(selection.events.len(), 1);
        assert!(index.select(date("2024-03-09")).events.is_empty());
    }

    #[test]
    fn month_view_covers_adjacent_days() {
        let events = vec![
            Event::new("spill", "Spill", "", "2024-03-30", "2024-04-02"),
            Event::new("may", "May", "", "2024-05-04", "2024-05-04"),
            Event::new("june", "June", "", "2024-06-01", "2024-06-02"),
        ];
        let index = DayIndex::build(&events);
        let grid = MonthGrid::new(Month::new(2024, 4).unwrap(), date("2024-04-10"));
        let view = index.month_view(&grid);

        assert_eq!(view.len(), grid.cells.len());
        // Sunday March 31st is a leading cell and still shows the event
        let (first_cell, first_events) = &view[0];
        assert!(!first_cell.in_month);
        assert_eq!(ids(first_events), vec!["spill"]);

        let (last_cell, last_events) = view.last().unwrap();
        assert_eq!(last_cell.date, date("2024-05-04"));
        assert_eq!(ids(last_events), vec!["may"]);

        assert!(view.iter().all(|(_, events)| !ids(events).contains(&"june".to_string())));
    }

    #[test]
    fn events_in_month_range() {
        let events = vec![
            Event::new("spill", "Spill", "", "2024-03-30", "2024-04-02"),
            Event::new("march", "March", "", "2024-03-10", "2024-03-12"),
        ];
        let index = DayIndex::build(&events);
        let april = Month::new(2024, 4).unwrap().span();
        assert_eq!(ids(&index.events_in(&april)), vec!["spill"]);
    }
}
