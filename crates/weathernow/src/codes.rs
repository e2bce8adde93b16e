//! WMO weather interpretation codes as reported by the forecast service.

/// Display label and icon for one weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// Short description, e.g. "Light rain".
    pub label: &'static str,
    /// Emoji shown next to the temperature.
    pub icon: &'static str,
}

/// Shown for codes missing from the table.
pub const UNKNOWN: Condition = Condition {
    label: "—",
    icon: "⛅",
};

const fn c(label: &'static str, icon: &'static str) -> Condition {
    Condition { label, icon }
}

const TABLE: [(i64, Condition); 28] = [
    (0, c("Clear sky", "☀️")),
    (1, c("Mainly clear", "🌤️")),
    (2, c("Partly cloudy", "⛅")),
    (3, c("Overcast", "☁️")),
    (45, c("Fog", "🌫️")),
    (48, c("Rime fog", "🌫️")),
    (51, c("Light drizzle", "🌦️")),
    (53, c("Drizzle", "🌦️")),
    (55, c("Dense drizzle", "🌧️")),
    (56, c("Freezing drizzle", "🌧️")),
    (57, c("Freezing drizzle", "🌧️")),
    (61, c("Light rain", "🌧️")),
    (63, c("Rain", "🌧️")),
    (65, c("Heavy rain", "🌧️")),
    (66, c("Freezing rain", "🌧️")),
    (67, c("Freezing rain", "🌧️")),
    (71, c("Light snow", "🌨️")),
    (73, c("Snow", "🌨️")),
    (75, c("Heavy snow", "❄️")),
    (77, c("Snow grains", "❄️")),
    (80, c("Light showers", "🌦️")),
    (81, c("Showers", "🌦️")),
    (82, c("Heavy showers", "🌧️")),
    (85, c("Snow showers", "🌨️")),
    (86, c("Heavy snow showers", "❄️")),
    (95, c("Thunderstorm", "⛈️")),
    (96, c("Thunderstorm with hail", "⛈️")),
    (99, c("Thunderstorm with hail", "⛈️")),
];

/// Look up a code, returning `None` for codes outside the table.
#[must_use]
pub fn lookup(code: i64) -> Option<Condition> {
    TABLE
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, condition)| *condition)
}

/// Look up a reported code, falling back to [`UNKNOWN`] for missing codes
/// and codes outside the table.
#[must_use]
pub fn describe(code: Option<i64>) -> Condition {
    code.and_then(lookup).unwrap_or(UNKNOWN)
}
