//! Read-only cards built from the last snapshot.

use aurora_api::time::{hours_minutes, parse_timestamp};
use aurora_api::DataSnapshot;
use chrono::FixedOffset;

use crate::error::RenderError;
use crate::screens::clock_or_placeholder;
use crate::surface::{Card, CardStyle};

fn clock(field: &'static str, raw: &str, zone: &FixedOffset) -> Result<String, RenderError> {
    parse_timestamp(raw)
        .map(|dt| hours_minutes(&dt, zone))
        .ok_or_else(|| RenderError::InvalidTimestamp {
            field,
            raw: raw.to_string(),
        })
}

/// Raw ACE values and probabilities, no gauges.
pub fn values_card(snapshot: &DataSnapshot, zone: &FixedOffset) -> Card {
    let ace = &snapshot.ace;
    let probability = &snapshot.probability;

    let body = [
        format!("Bz: {}", ace.bz),
        format!("Speed: {}", ace.speed),
        format!("Density: {}", ace.density),
        format!("Kp: {}", ace.kp),
        format!("Kp 1 hr: {}", ace.kp1hour),
        format!("Kp 4 hr: {}", ace.kp4hour),
        format!("Probability: {}", probability.calculated.value),
        format!("Worldwide: {}", probability.highest.value),
        format!("Retrieved: {}", clock_or_placeholder(&ace.date, zone)),
    ]
    .join("\n");

    Card {
        title: "ACE Values".into(),
        body,
        scrollable: true,
        ..Card::default()
    }
}

/// Local cloud, temperature and sun/moon times.
///
/// Fails when the snapshot carries no usable weather times.
pub fn weather_card(snapshot: &DataSnapshot, zone: &FixedOffset) -> Result<Card, RenderError> {
    let weather = &snapshot.weather;

    let body = [
        format!("Cloud %: {}", weather.cloud),
        format!("Temp: {}", weather.temperature),
        format!("Rain (mm): {}", weather.rain),
        format!("Fog %: {}", weather.fog),
        format!("Sunrise: {}", clock("sunrise", &weather.sunrise, zone)?),
        format!("Sunset: {}", clock("sunset", &weather.sunset, zone)?),
        format!("Moonrise: {}", clock("moonrise", &weather.moonrise, zone)?),
        format!("Moonset: {}", clock("moonset", &weather.moonset, zone)?),
        format!("Phase: {}", weather.moonphase),
    ]
    .join("\n");

    Ok(Card {
        title: "Weather Details".into(),
        body,
        scrollable: true,
        ..Card::default()
    })
}

pub fn about_card() -> Card {
    Card {
        title: "Auroras.live".into(),
        subtitle: Some("A watch app for aurora hunters".into()),
        body: "\nhttps://auroras.live\n\nWritten by David 'Grayda' Gray".into(),
        scrollable: true,
        style: CardStyle::Small,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn snapshot() -> DataSnapshot {
        serde_json::from_value(serde_json::json!({
            "ace": {"date": "2024-01-01T13:45:00Z", "kp": 4, "kp1hour": 4, "kp4hour": "3.67",
                    "bz": -5, "speed": 400, "density": 3},
            "probability": {"calculated": {"value": 10}, "highest": {"value": 20}},
            "weather": {"cloud": 30, "temperature": 14.5, "rain": 0, "fog": 5,
                        "sunrise": "2024-01-01T05:58:00Z", "sunset": "2024-01-01T20:45:00Z",
                        "moonrise": "2024-01-01T23:10:00Z", "moonset": "2024-01-01T11:02:00Z",
                        "moonphase": "Waning Gibbous"}
        }))
        .unwrap()
    }

    #[test]
    fn test_values_card_body() {
        let card = values_card(&snapshot(), &utc());
        assert_eq!(card.title, "ACE Values");
        assert!(card.scrollable);
        assert_eq!(
            card.body,
            "Bz: -5\nSpeed: 400\nDensity: 3\nKp: 4\nKp 1 hr: 4\nKp 4 hr: 3.67\n\
             Probability: 10\nWorldwide: 20\nRetrieved: 13:45"
        );
    }

    #[test]
    fn test_weather_card_body() {
        let card = weather_card(&snapshot(), &FixedOffset::east_opt(11 * 3600).unwrap()).unwrap();
        assert_eq!(card.title, "Weather Details");
        assert!(card.body.starts_with("Cloud %: 30\nTemp: 14.5\nRain (mm): 0\nFog %: 5\n"));
        assert!(card.body.contains("Sunrise: 16:58"));
        assert!(card.body.contains("Moonrise: 10:10"));
        assert!(card.body.ends_with("Phase: Waning Gibbous"));
    }

    #[test]
    fn test_weather_card_without_weather_fails() {
        let mut s = snapshot();
        s.weather = Default::default();
        let err = weather_card(&s, &utc()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTimestamp { field: "sunrise", .. }));
    }

    #[test]
    fn test_about_card_is_static() {
        let card = about_card();
        assert_eq!(card.style, CardStyle::Small);
        assert!(card.body.contains("https://auroras.live"));
    }
}
