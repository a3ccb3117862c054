//! Plain-text presentation of shows and search state.

use std::fmt::Write as _;

use chrono::NaiveDate;
use tvsearch_core::types::{Channel, Externals, Schedule, SearchResult, Show};

use crate::machine::SearchState;

const PLACEHOLDER_IMAGE: &str = "/placeholder-show.svg";
const CARD_SUMMARY_CHARS: usize = 180;

/// Summary markup rendered as plain text: tags dropped, entities decoded,
/// whitespace collapsed.
pub fn summary_text(html: &str) -> String {
    nanohtml2text::html2text(html)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert the 0-10 community rating into 0-5 stars.
pub fn star_rating(average: Option<f64>) -> f64 {
    match average {
        Some(r) if r > 0.0 => r / 2.0,
        _ => 0.0,
    }
}

/// Five glyphs, filled up to the rounded star rating.
pub fn star_bar(average: Option<f64>) -> String {
    let filled = star_rating(average).round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Negative,
    Neutral,
}

impl StatusTone {
    pub fn marker(self) -> char {
        match self {
            Self::Positive => '●',
            Self::Negative => '○',
            Self::Neutral => '◌',
        }
    }
}

pub fn status_tone(status: &str) -> StatusTone {
    match status.to_lowercase().as_str() {
        "running" => StatusTone::Positive,
        "ended" => StatusTone::Negative,
        _ => StatusTone::Neutral,
    }
}

/// Status label prefixed with its tone marker, e.g. `● Running`.
pub fn status_badge(status: &str) -> String {
    format!("{} {}", status_tone(status).marker(), status_label(status))
}

pub fn status_label(status: &str) -> String {
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `2013-06-24` becomes `June 24, 2013`. Missing dates read `Unknown`;
/// anything unparsable is shown as received.
pub fn format_date(date: Option<&str>) -> String {
    match date {
        None => "Unknown".to_string(),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

pub fn premiere_year(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

pub fn format_schedule(schedule: &Schedule) -> String {
    if schedule.days.is_empty() {
        return "No schedule available".to_string();
    }
    format!("{} at {}", schedule.days.join(", "), schedule.time)
}

/// `HBO (United States)`, or just the name when no country is known.
pub fn channel_label(channel: &Channel) -> String {
    match &channel.country {
        Some(country) => format!("{} ({})", channel.name, country.name),
        None => channel.name.clone(),
    }
}

pub fn imdb_url(externals: &Externals) -> Option<String> {
    externals
        .imdb
        .as_ref()
        .map(|id| format!("https://www.imdb.com/title/{id}"))
}

/// Largest available artwork, or the placeholder.
pub fn poster_url(show: &Show) -> &str {
    show.image
        .as_ref()
        .and_then(|img| img.original.as_deref().or(img.medium.as_deref()))
        .unwrap_or(PLACEHOLDER_IMAGE)
}

pub fn results_heading(count: usize) -> String {
    format!("Found {count} show{}", if count == 1 { "" } else { "s" })
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

/// Compact card for one search result. `position` is 1-based.
pub fn render_card(position: usize, result: &SearchResult) -> String {
    let show = &result.show;
    let mut out = format!("[{position}] {}", show.name);
    if result.score > 0.0 {
        let _ = write!(out, "  (Score: {:.1})", result.score);
    }
    out.push('\n');

    if !show.genres.is_empty() {
        let _ = writeln!(out, "    Genres: {}", show.genres.join(", "));
    }
    let _ = writeln!(out, "    Status: {}", status_badge(&show.status));
    if show.rating.average.is_some_and(|r| r > 0.0) {
        let _ = writeln!(out, "    Rating: {}", star_bar(show.rating.average));
    }
    if let Some(year) = premiere_year(show.premiered.as_deref()) {
        let _ = writeln!(out, "    Premiered: {year}");
    }
    if let Some(network) = &show.network {
        let _ = writeln!(out, "    Network: {}", network.name);
    }
    if let Some(summary) = show.summary.as_deref() {
        let text = summary_text(summary);
        if !text.is_empty() {
            let _ = writeln!(out, "    {}", truncate_chars(&text, CARD_SUMMARY_CHARS));
        }
    }
    out
}

/// Full details panel for a single show.
pub fn render_details(show: &Show) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", show.name);
    let _ = writeln!(out, "{}", "=".repeat(show.name.chars().count().max(1)));
    let _ = writeln!(out, "Image: {}", poster_url(show));

    let _ = write!(out, "Status: {}", status_badge(&show.status));
    if let Some(avg) = show.rating.average.filter(|r| *r > 0.0) {
        let _ = write!(out, "   Rating: {} ({avg}/10)", star_bar(Some(avg)));
    }
    out.push('\n');

    if !show.genres.is_empty() {
        let _ = writeln!(out, "Genres: {}", show.genres.join(", "));
    }
    if let Some(summary) = show.summary.as_deref() {
        let _ = writeln!(out, "\nSummary:\n{}\n", summary_text(summary));
    }

    let mut field = |label: &str, value: String| {
        let _ = writeln!(out, "{label}: {value}");
    };
    if let Some(kind) = show.kind.as_deref().filter(|k| !k.is_empty()) {
        field("Type", kind.to_string());
    }
    if let Some(language) = show.language.as_deref().filter(|l| !l.is_empty()) {
        field("Language", language.to_string());
    }
    if show.premiered.is_some() {
        field("Premiered", format_date(show.premiered.as_deref()));
    }
    if show.ended.is_some() {
        field("Ended", format_date(show.ended.as_deref()));
    }
    if let Some(runtime) = show.runtime.filter(|r| *r > 0) {
        field("Runtime", format!("{runtime} minutes"));
    }
    if let Some(runtime) = show.average_runtime.filter(|r| *r > 0) {
        field("Average Runtime", format!("{runtime} minutes"));
    }
    if let Some(network) = &show.network {
        field("Network", channel_label(network));
    }
    if let Some(web) = &show.web_channel {
        field("Web Channel", channel_label(web));
    }
    field("Schedule", format_schedule(&show.schedule));
    if let Some(site) = &show.official_site {
        field("Official Site", site.clone());
    }
    if let Some(imdb) = imdb_url(&show.externals) {
        let mut links = format!("IMDb <{imdb}>");
        if !show.url.is_empty() {
            let _ = write!(links, "  TVMaze <{}>", show.url);
        }
        field("External Links", links);
    }
    out
}

/// Everything the results area shows for a given lifecycle state.
pub fn render_state(state: &SearchState) -> String {
    if state.loading() {
        return "Searching for shows...\n".to_string();
    }
    if let Some(message) = state.error() {
        return format!("Error: {message}\n");
    }

    let results = state.results();
    if results.is_empty() {
        return "No shows found\nTry searching for a different TV show or movie title.\n"
            .to_string();
    }

    let mut out = format!("{}\n\n", results_heading(results.len()));
    for (i, result) in results.iter().enumerate() {
        out.push_str(&render_card(i + 1, result));
        out.push('\n');
    }
    out
}
