//! Terminal rendering for expocal types.
//!
//! Extension traits that add colored output to expocal-core types using
//! owo_colors.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use expocal_core::month::WEEKDAY_LABELS;
use expocal_core::{DayCell, DayIndex, DaySelection, Event, MonthGrid};
use owo_colors::{AnsiColors, OwoColorize};

pub trait Render {
    fn render(&self) -> String;
}

/// Event colors, picked per event id.
const PALETTE: [AnsiColors; 5] = [
    AnsiColors::Blue,
    AnsiColors::Magenta,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::BrightRed,
];

/// Markers shown in a grid cell before collapsing to "+".
const MAX_MARKERS: usize = 3;

/// Deterministic palette slot for an event id: first UTF-16 code unit plus
/// length in code units.
pub fn palette_index(id: &str, size: usize) -> usize {
    let first = id.encode_utf16().next().map(usize::from).unwrap_or(0);
    (first + id.encode_utf16().count()) % size
}

fn event_color(event: &Event) -> AnsiColors {
    PALETTE[palette_index(&event.id, PALETTE.len())]
}

/// 1st, 2nd, 3rd, 4th, 11th, 22nd...
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

/// "April 2nd, 2024"
pub fn long_date(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%B"), ordinal(date.day()), date.year())
}

/// "March 1st, 2024" for one-day events, "Mar 1st - Mar 3rd, 2024" otherwise.
/// Unparsable dates are shown as given.
pub fn format_date_range(event: &Event) -> String {
    match event.span() {
        Ok(span) if span.is_single_day() => long_date(span.start),
        Ok(span) => format!(
            "{} {} - {} {}, {}",
            span.start.format("%b"),
            ordinal(span.start.day()),
            span.end.format("%b"),
            ordinal(span.end.day()),
            span.end.year()
        ),
        Err(_) => format!("{} - {}", event.start_date, event.end_date),
    }
}

/// Fetch time in local time, or "Never".
pub fn last_updated(fetched_at: Option<DateTime<Utc>>) -> String {
    match fetched_at {
        Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "Never".to_string(),
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!("{} {}", "■".color(event_color(self)), self.name.bold());
        if !self.venue.is_empty() {
            line.push_str(&format!(" {}", format!("@ {}", self.venue).dimmed()));
        }
        format!("{line}  {}", format_date_range(self).dimmed())
    }
}

impl Render for DaySelection {
    fn render(&self) -> String {
        let mut lines = vec![long_date(self.date).bold().to_string()];

        if self.events.is_empty() {
            lines.push(format!("   {}", "No exhibitions on this day.".dimmed()));
            return lines.join("\n");
        }

        lines.push(
            format!("   {} {}", self.events.len(), pluralize("event", self.events.len()))
                .dimmed()
                .to_string(),
        );

        for event in &self.events {
            lines.push(String::new());
            lines.push(format!(
                "   {} {}",
                "■".color(event_color(event)),
                event.name.bold()
            ));
            if !event.venue.is_empty() {
                lines.push(format!("     {}", event.venue));
            }

            let mut when = format_date_range(event);
            match (&event.start_time, &event.end_time) {
                (Some(start), Some(end)) => when.push_str(&format!(" • {start} - {end}")),
                (Some(start), None) => when.push_str(&format!(" • {start}")),
                (None, Some(end)) => when.push_str(&format!(" • until {end}")),
                (None, None) => {}
            }
            lines.push(format!("     {}", when.dimmed()));

            let description = if event.description.trim().is_empty() {
                "No description available."
            } else {
                event.description.trim()
            };
            lines.push(format!("     {description}"));

            if let Some(url) = &event.source_url {
                lines.push(format!("     {}", url.underline()));
            }
        }

        lines.join("\n")
    }
}

/// A month grid together with the events to paint on it.
pub struct MonthView<'a> {
    pub grid: &'a MonthGrid,
    pub index: &'a DayIndex,
}

impl MonthView<'_> {
    fn render_cell(cell: &DayCell, events: &[&Event]) -> String {
        let day = format!("{:>2}", cell.date.day());
        let day = if cell.is_today {
            day.reversed().to_string()
        } else if cell.in_month {
            day
        } else {
            day.dimmed().to_string()
        };

        let overflow = events.len() > MAX_MARKERS;
        let dots = if overflow { MAX_MARKERS - 1 } else { events.len() };
        let mut markers: String = events
            .iter()
            .take(dots)
            .map(|e| "•".color(event_color(e)).to_string())
            .collect();
        if overflow {
            markers.push_str(&"+".dimmed().to_string());
        }
        let width = if overflow { MAX_MARKERS } else { dots };

        format!("{day}{markers}{}", " ".repeat(MAX_MARKERS - width))
    }
}

impl Render for MonthView<'_> {
    fn render(&self) -> String {
        let mut lines = vec![self.grid.month.label().bold().to_string()];

        lines.push(
            WEEKDAY_LABELS
                .iter()
                .map(|label| format!("{label:<5}"))
                .collect::<String>()
                .trim_end()
                .dimmed()
                .to_string(),
        );

        let view = self.index.month_view(self.grid);
        for week in view.chunks(7) {
            let row: Vec<String> = week
                .iter()
                .map(|(cell, events)| Self::render_cell(cell, events))
                .collect();
            lines.push(row.join(""));
        }

        let in_month = self.index.events_in(&self.grid.month.span());
        lines.push(String::new());
        if in_month.is_empty() {
            lines.push("No exhibitions this month".dimmed().to_string());
        } else {
            lines.push(
                format!("{} {}", in_month.len(), pluralize("event", in_month.len()))
                    .dimmed()
                    .to_string(),
            );
            for event in in_month {
                lines.push(format!("  {}", event.render()));
            }
        }

        lines.join("\n")
    }
}
