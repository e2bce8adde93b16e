//! Detail presentation of a single observation.
//!
//! The detail view shows every field. It comes in three forms: text lines
//! for the terminal, a printable standalone HTML page, and a single-record
//! JSON document named `observation-<id>.json`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::Result;
use crate::observation::Observation;

/// Text lines describing `obs`.
#[must_use]
pub fn detail_lines(obs: &Observation) -> Vec<String> {
    let mut lines = vec![
        format!("Title: {}", obs.title),
        format!("Rating: {}", obs.rating),
        format!("When: {}", obs.created_display()),
    ];
    if !obs.description.is_empty() {
        lines.push(format!("\nDescription:\n{}", obs.description));
    }
    lines
}

/// File name offered for the single-record download.
#[must_use]
pub fn detail_file_name(obs: &Observation) -> String {
    let safe_id: String = obs
        .id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("observation-{safe_id}.json")
}

/// Pretty-printed JSON of one record.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn detail_json(obs: &Observation) -> Result<String> {
    Ok(serde_json::to_string_pretty(obs)?)
}

/// Printable HTML page for one record, with a print button and an embedded
/// JSON download of the record.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub fn render_detail_html(obs: &Observation) -> Result<String> {
    let json = detail_json(obs)?;
    let mut html = String::from(
        "<!doctype html><html><head><meta charset='utf-8'><title>Observation</title>\
<meta name='viewport' content='width=device-width, initial-scale=1'>\
<style>body{margin:0;font-family:system-ui;background:#0f141a;color:#e6edf3} .wrap{padding:12px} \
img{max-width:100%;border-radius:12px;border:1px solid #22303c;background:#0b1116} .meta{color:#9fb0c0} \
.btn{padding:10px 14px;border-radius:10px;border:1px solid #22303c;background:#0b1116;color:#e6edf3;cursor:pointer} \
.row{display:flex;gap:8px;margin-top:12px;flex-wrap:wrap} \
@media print{.row{display:none}}</style></head><body><div class='wrap'>",
    );

    if let Some(photo) = &obs.photo_data_url {
        html.push_str(&format!(
            "<img src='{}' alt='Photo'><br><br>",
            escape_html(photo)
        ));
    }

    html.push_str("<div class='meta'>");
    for line in detail_lines(obs) {
        html.push_str(&format!(
            "<div>{}</div>",
            escape_html(&line).replace('\n', "<br>")
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        "<div class='row'><button class='btn' onclick='window.print()'>Print / Save PDF</button>\
<a class='btn' download='{}' href='data:application/json;base64,{}'>Download JSON</a></div>",
        escape_html(&detail_file_name(obs)),
        STANDARD.encode(json)
    ));
    html.push_str("</div></body></html>\n");
    Ok(html)
}

/// Escape text for inclusion in HTML content or single/double-quoted
/// attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
