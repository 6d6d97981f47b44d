use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Geographic position used for one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Melbourne, used when the location query fails
    pub const FALLBACK: Coordinates = Coordinates {
        latitude: -37.8142678,
        longitude: 144.9619953,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// A numeric field as sent by the API.
///
/// The feed sends some values as JSON numbers and others as numeric strings.
/// The raw text is kept for display so `4` is shown as `4`, while the parsed
/// value drives the gauges. Missing or null fields become an empty reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    raw: String,
    value: Option<f64>,
}

impl Reading {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        Self { raw, value }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Integer part of the value, truncated toward zero. Stays a float so
    /// huge readings keep their sign and magnitude.
    pub fn whole(&self) -> Option<f64> {
        self.value.map(f64::trunc)
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Self {
            raw: value.to_string(),
            value: Some(value).filter(|v| v.is_finite()),
        }
    }
}

impl From<&str> for Reading {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReading {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawReading>::deserialize(deserializer)? {
            Some(RawReading::Number(n)) => Reading::new(n.to_string()),
            Some(RawReading::Text(s)) => Reading::new(s),
            Some(RawReading::Flag(b)) => Reading::new(b.to_string()),
            None => Reading::default(),
        })
    }
}

impl Serialize for Reading {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

/// Solar wind measurements from the ACE spacecraft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ace {
    /// Server-side timestamp of the measurement
    pub date: String,
    pub kp: Reading,
    pub kp1hour: Reading,
    pub kp4hour: Reading,
    pub bz: Reading,
    pub speed: Reading,
    pub density: Reading,
    pub colour: AceColours,
}

/// Severity colour tokens the API assigns to each ACE value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AceColours {
    pub bz: String,
    pub speed: String,
    pub density: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilityValue {
    pub value: Reading,
}

/// Aurora probability at the requested location and the worldwide peak
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Probability {
    pub calculated: ProbabilityValue,
    pub highest: ProbabilityValue,
}

/// One forecast time window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastWindow {
    pub start: String,
    pub end: String,
    pub value: Reading,
}

/// Three-day Kp forecast: `values[i]` holds the windows for `dates[i]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreeDay {
    pub dates: Vec<String>,
    pub values: Vec<Vec<ForecastWindow>>,
}

/// Local observing conditions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    pub cloud: Reading,
    pub temperature: Reading,
    pub rain: Reading,
    pub fog: Reading,
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moonphase: Reading,
}

/// The full payload of one successful fetch.
///
/// Only one snapshot is live at a time; a new fetch replaces it wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSnapshot {
    pub ace: Ace,
    pub probability: Probability,
    pub threeday: ThreeDay,
    pub weather: Weather,
}

/// Location service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Data fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether the next timer tick has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Parse(_) | FetchError::InvalidUrl(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_from_number_keeps_integer_text() {
        let reading: Reading = serde_json::from_str("4").unwrap();
        assert_eq!(reading.to_string(), "4");
        assert_eq!(reading.value(), Some(4.0));
    }

    #[test]
    fn test_reading_from_numeric_string() {
        let reading: Reading = serde_json::from_str("\"-2.7\"").unwrap();
        assert_eq!(reading.raw(), "-2.7");
        assert_eq!(reading.whole(), Some(-2.0));
    }

    #[test]
    fn test_reading_non_numeric_text() {
        let reading: Reading = serde_json::from_str("\"Waxing Crescent\"").unwrap();
        assert_eq!(reading.to_string(), "Waxing Crescent");
        assert_eq!(reading.value(), None);
    }

    #[test]
    fn test_reading_null_is_empty() {
        let reading: Reading = serde_json::from_str("null").unwrap();
        assert!(reading.is_empty());
        assert_eq!(reading.value(), None);
    }

    #[test]
    fn test_snapshot_with_missing_sections() {
        let snapshot: DataSnapshot = serde_json::from_value(serde_json::json!({
            "ace": {"bz": -5, "speed": 400, "density": 3, "kp": 4, "kp1hour": 4,
                    "date": "2024-01-01T00:00:00Z"},
            "probability": {"calculated": {"value": 10}, "highest": {"value": 20}}
        }))
        .unwrap();

        assert_eq!(snapshot.ace.bz.whole(), Some(-5.0));
        assert_eq!(snapshot.probability.highest.value.to_string(), "20");
        assert!(snapshot.ace.kp4hour.is_empty());
        assert!(snapshot.ace.colour.bz.is_empty());
        assert!(snapshot.threeday.dates.is_empty());
    }

    #[test]
    fn test_threeday_shape() {
        let threeday: ThreeDay = serde_json::from_value(serde_json::json!({
            "dates": ["2024-03-01", "2024-03-02"],
            "values": [
                [{"start": "2024-03-01T00:00:00Z", "end": "2024-03-01T03:00:00Z", "value": "3.67"}],
                [{"start": "2024-03-02T00:00:00Z", "end": "2024-03-02T03:00:00Z", "value": 2}]
            ]
        }))
        .unwrap();

        assert_eq!(threeday.dates.len(), 2);
        assert_eq!(threeday.values[0][0].value.to_string(), "3.67");
        assert_eq!(threeday.values[1][0].value.to_string(), "2");
    }

    #[test]
    fn test_fallback_coordinates() {
        assert_eq!(Coordinates::FALLBACK.latitude, -37.8142678);
        assert_eq!(Coordinates::FALLBACK.longitude, 144.9619953);
    }

    #[test]
    fn test_fetch_error_transience() {
        let server = FetchError::Status {
            status: 502,
            body: String::new(),
        };
        let missing = FetchError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(server.is_transient());
        assert!(!missing.is_transient());
        assert!(!FetchError::Parse("eof".into()).is_transient());
    }
}
