//! Observation listings.
//!
//! [`ListView::compute`] is the pure part: filter, stable sort newest first,
//! and aggregate counts. The `render_*` methods are the imperative part and
//! rebuild their whole output on every call.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::detail::escape_html;
use crate::observation::{Observation, Rating};

/// Which ratings a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    /// Every observation.
    #[default]
    All,
    /// Only positive observations.
    Positive,
    /// Only negative observations.
    Negative,
}

impl Filter {
    /// Whether `obs` passes this filter.
    #[must_use]
    pub fn matches(self, obs: &Observation) -> bool {
        match self {
            Self::All => true,
            Self::Positive => obs.rating == Rating::Positive,
            Self::Negative => obs.rating == Rating::Negative,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// Aggregate counts over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// All observations.
    pub total: usize,
    /// Positive observations.
    pub positive: usize,
    /// Negative observations.
    pub negative: usize,
}

impl Stats {
    /// Count the given observations.
    #[must_use]
    pub fn of(observations: &[Observation]) -> Self {
        let positive = observations
            .iter()
            .filter(|o| o.rating == Rating::Positive)
            .count();
        Self {
            total: observations.len(),
            positive,
            negative: observations.len() - positive,
        }
    }

    /// The three stat pills, in display order.
    #[must_use]
    pub fn pills(&self) -> [String; 3] {
        [
            format!("Total: {}", self.total),
            format!("Positive: {}", self.positive),
            format!("Negative: {}", self.negative),
        ]
    }
}

/// The visible state of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView<'a> {
    /// Filter the items were selected with.
    #[serde(skip)]
    pub filter: Filter,
    /// Visible observations, newest first.
    pub observations: Vec<&'a Observation>,
    /// Counts over the whole collection, not just the visible items.
    pub stats: Stats,
}

impl<'a> ListView<'a> {
    /// Compute the visible subset of `observations`.
    ///
    /// Items are sorted by `createdAt` descending; equal timestamps keep
    /// their original relative order.
    #[must_use]
    pub fn compute(observations: &'a [Observation], filter: Filter) -> Self {
        let mut visible: Vec<&Observation> =
            observations.iter().filter(|o| filter.matches(o)).collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Self {
            filter,
            observations: visible,
            stats: Stats::of(observations),
        }
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Line shown when nothing passes the filter.
    #[must_use]
    pub fn empty_message(&self) -> String {
        match self.filter {
            Filter::All => "No observations yet.".to_string(),
            filter => format!("No {filter} observations yet."),
        }
    }

    /// Render as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn render_plain(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{}", self.stats.pills().join("  "))?;
        writeln!(out)?;

        if self.is_empty() {
            writeln!(out, "{}", self.empty_message())?;
            return Ok(());
        }

        for obs in &self.observations {
            let marker = if obs.has_photo() {
                "[photo]".to_string()
            } else {
                format!("[{}]", placeholder_label(obs.rating))
            };
            writeln!(
                out,
                "{marker:<8}{:<9}{}  {}",
                obs.rating.label(),
                obs.created_display(),
                obs.title
            )?;
            if !obs.description.is_empty() {
                writeln!(out, "        {}", obs.description)?;
            }
            writeln!(out, "        id: {}", obs.id)?;
        }
        Ok(())
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn render_json(&self, out: &mut impl Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }

    /// Render as a standalone HTML page.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn render_html(&self, out: &mut impl Write) -> std::io::Result<()> {
        write!(
            out,
            "<!doctype html><html><head><meta charset='utf-8'><title>Safety Observations</title>\
<meta name='viewport' content='width=device-width, initial-scale=1'>\
<style>{LIST_STYLE}</style></head><body><div class='wrap'>"
        )?;

        write!(out, "<div class='stats'>")?;
        for pill in self.stats.pills() {
            write!(out, "<span class='stat-pill'>{}</span>", escape_html(&pill))?;
        }
        write!(out, "</div>")?;

        if self.is_empty() {
            write!(out, "<p class='empty'>{}</p>", self.empty_message())?;
        } else {
            write!(out, "<ul class='observations'>")?;
            for obs in &self.observations {
                write_html_item(out, obs)?;
            }
            write!(out, "</ul>")?;
        }

        writeln!(out, "</div></body></html>")
    }
}

fn write_html_item(out: &mut impl Write, obs: &Observation) -> std::io::Result<()> {
    let thumb = obs
        .photo_data_url
        .clone()
        .unwrap_or_else(|| placeholder_data_url(obs.rating));

    write!(
        out,
        "<li class='observation-item'><img class='observation-thumb' alt='Observation photo' src='{}'>\
<div class='observation-content'><h3 class='observation-title'>{}</h3>",
        escape_html(&thumb),
        escape_html(&obs.title)
    )?;
    if !obs.description.is_empty() {
        write!(
            out,
            "<p class='observation-desc'>{}</p>",
            escape_html(&obs.description)
        )?;
    }
    write!(
        out,
        "<div class='observation-meta'><span class='badge {}'>{}</span><span>{}</span></div>\
<div class='item-actions'><code>safelog view {id}</code> <code>safelog delete {id}</code></div></div></li>",
        obs.rating,
        obs.rating.label(),
        escape_html(&obs.created_display()),
        id = escape_html(&obs.id)
    )
}

const LIST_STYLE: &str = "body{margin:0;font-family:system-ui;background:#0f141a;color:#e6edf3}\
.wrap{padding:12px}.stat-pill{display:inline-block;margin-right:8px;padding:4px 10px;border-radius:999px;border:1px solid #22303c}\
.observations{list-style:none;padding:0}.observation-item{display:flex;gap:12px;margin:12px 0}\
.observation-thumb{width:120px;height:120px;object-fit:cover;border-radius:12px}\
.badge.positive{color:#22c55e}.badge.negative{color:#f87171}.observation-meta span{margin-right:8px}\
.empty{color:#9fb0c0}";

/// Short label drawn on a placeholder thumbnail.
#[must_use]
pub fn placeholder_label(rating: Rating) -> &'static str {
    match rating {
        Rating::Positive => "POS",
        Rating::Negative => "NEG",
    }
}

/// Generated thumbnail for observations without a photo.
///
/// Background, text color and label depend on the rating.
#[must_use]
pub fn placeholder_data_url(rating: Rating) -> String {
    let (background, foreground) = match rating {
        Rating::Positive => ("#0c2617", "#22c55e"),
        Rating::Negative => ("#2a1010", "#f87171"),
    };
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='120' height='120'>\
<rect width='100%' height='100%' rx='12' ry='12' fill='{background}'/>\
<text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' font-family='Arial' font-size='28' fill='{foreground}'>{}</text>\
</svg>",
        placeholder_label(rating)
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}
