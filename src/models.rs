use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod api;

/// Poll interval used when `refresh` is absent or zero
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30);

/// Longest accepted poll interval
pub const MAX_REFRESH: Duration = Duration::from_secs(24 * 3600);

/// Configuration structure for the application
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub apikey: String, // OctoPrint API key, sent as X-Api-Key
    #[serde(default)]
    pub url: String, // Base URL of the OctoPrint server
    #[serde(default, with = "refresh_format")]
    pub refresh: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcd: Option<LcdConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            apikey: String::new(),
            url: "http://localhost:5000".to_string(),
            refresh: DEFAULT_REFRESH,
            lcd: None,
        }
    }
}

impl Config {
    /// Effective poll interval, falling back to the default for zero
    pub fn refresh_interval(&self) -> Duration {
        if self.refresh.is_zero() {
            DEFAULT_REFRESH
        } else {
            self.refresh
        }
    }

    /// Display wiring, only when it names at least one data pin
    pub fn display_wiring(&self) -> Option<&LcdConfig> {
        self.lcd.as_ref().filter(|lcd| !lcd.data.is_empty())
    }
}

/// GPIO wiring of an HD44780 character display
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LcdConfig {
    pub rs: u32,
    pub e: u32,
    #[serde(default)]
    pub data: Vec<u32>,
}

/// Progress of the active print job
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    pub completion: f64,
    pub print_time: u64,
    pub print_time_left: u64,
    pub print_time_left_origin: Option<String>,
}

/// Parse a refresh setting such as `45`, `30s`, `1m30s`, `500ms` or `1.5h`.
/// A bare number is taken as seconds.
pub fn parse_refresh(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = 0.0_f64;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(format!("invalid duration '{}'", input));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| format!("invalid number in duration '{}'", input))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let factor = match &rest[..unit_len] {
            "ms" => 0.001,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "" => return Err(format!("missing unit in duration '{}'", input)),
            unit => return Err(format!("unknown unit '{}' in duration '{}'", unit, input)),
        };
        rest = &rest[unit_len..];
        total += value * factor;
    }

    Duration::try_from_secs_f64(total)
        .map_err(|e| format!("invalid duration '{}': {}", input, e))
}

/// Reject intervals longer than [`MAX_REFRESH`]
pub fn check_refresh(refresh: Duration) -> Result<(), String> {
    if refresh > MAX_REFRESH {
        return Err(format!(
            "refresh interval {} exceeds the maximum of {}",
            format_refresh(refresh),
            format_refresh(MAX_REFRESH)
        ));
    }
    Ok(())
}

/// Render a refresh interval in the form accepted by [`parse_refresh`]
pub fn format_refresh(duration: Duration) -> String {
    if duration.subsec_millis() != 0 {
        return format!("{}ms", duration.as_millis());
    }
    let secs = duration.as_secs();
    if secs != 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

mod refresh_format {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRefresh {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_refresh(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Option::<RawRefresh>::deserialize(deserializer)? {
            None => Ok(Duration::ZERO),
            Some(RawRefresh::Seconds(secs)) => Ok(Duration::from_secs(secs)),
            Some(RawRefresh::Text(text)) => super::parse_refresh(&text).map_err(de::Error::custom),
        }
    }
}
