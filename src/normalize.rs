// Maps one raw provider offer into a canonical flight record.
// Offers arrive as untyped JSON; every field read happens here with an
// explicit presence check so a malformed offer is dropped, never defaulted
// into a broken record.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Canonical flight record handed to the UI. Built once per search from one
/// raw offer, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub id: String,
    pub airline_name: String,
    pub airline_logo: Option<String>,
    pub departure_airport: String,
    pub arrival_airport: String,
    /// Display time (HH:MM) in the fixed display timezone.
    pub departure_time: String,
    pub arrival_time: String,
    /// "Xh Ym" or "N/A" when the provider duration is unusable.
    pub duration: String,
    /// Total price in the settlement currency requested at search time.
    pub price: f64,
    /// Not derivable from this provider tier; the UI falls back to a
    /// constructed third-party search URL.
    pub booking_link: Option<String>,
    /// Segment count of the first itinerary minus one.
    pub stops: u32,
    /// Departure instant in epoch milliseconds, kept as a sort key.
    pub raw_departure_epoch: i64,
    pub raw_duration_seconds: Option<i64>,
}

// All display times are rendered in Indian Standard Time (+05:30)
fn display_zone() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("IST offset")
}

/// Local airline table, consulted before the provider's carrier dictionary.
fn local_airline(code: &str) -> Option<(&'static str, &'static str)> {
    match code {
        "AI" => Some(("Air India", "/logos/ai.png")),
        "6E" => Some(("IndiGo", "/logos/6e.png")),
        "UK" => Some(("Vistara", "/logos/uk.png")),
        "SG" => Some(("SpiceJet", "/logos/sg.png")),
        _ => None,
    }
}

/// Provider timestamps are ISO date-times, usually without a UTC offset
/// (local time at the airport). Offset-less values are taken as already being
/// in the display timezone; values with an offset are converted into it.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&display_zone()));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()?;
    display_zone().from_local_datetime(&naive).single()
}

/// Parses a `PT{h}H{m}M` duration. Returns `None` when neither component is
/// usable or both are zero, which callers report as not-available instead of
/// "0h 0m".
fn parse_iso_duration(iso: &str) -> Option<(u32, u32)> {
    let rest = iso.strip_prefix("PT")?;
    let mut hours: u32 = 0;
    let mut minutes: u32 = 0;
    let mut seen = false;
    let mut digits = String::new();

    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch == 'H' {
            hours = digits.parse().ok()?;
            digits.clear();
            seen = true;
        } else if ch == 'M' {
            minutes = digits.parse().ok()?;
            digits.clear();
            seen = true;
        } else if ch == 'S' {
            // seconds are below display resolution
            digits.clear();
        } else {
            return None;
        }
    }

    if !seen || (hours == 0 && minutes == 0) {
        None
    } else {
        Some((hours, minutes))
    }
}

fn format_duration(iso: Option<&str>) -> (String, Option<i64>) {
    match iso.and_then(parse_iso_duration) {
        Some((h, m)) => (
            format!("{}h {}m", h, m),
            Some(i64::from(h) * 3600 + i64::from(m) * 60),
        ),
        None => ("N/A".to_string(), None),
    }
}

/// Maps a raw offer into a `FlightRecord`. Returns `None` (with logged
/// context) on any structural problem; never panics.
///
/// Only the first itinerary and its first segment are read: multi-segment
/// itineraries are summarized by their first leg plus a stop count, and
/// return legs are not modeled. This is a known simplification.
pub fn normalize_offer(raw: &Value, carriers: &HashMap<String, String>) -> Option<FlightRecord> {
    let offer_id = match raw.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let segments = match raw
        .pointer("/itineraries/0/segments")
        .and_then(Value::as_array)
        .filter(|s| !s.is_empty())
    {
        Some(segments) => segments,
        None => {
            warn!(%offer_id, "skipping offer: missing itinerary or first segment");
            return None;
        }
    };
    let segment = &segments[0];

    let price = match raw.pointer("/price/total") {
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    let price = match price {
        Some(p) => p,
        None => {
            warn!(%offer_id, "skipping offer: missing or non-numeric price total");
            return None;
        }
    };

    let carrier_code = segment.get("carrierCode").and_then(Value::as_str);
    let departure_airport = segment.pointer("/departure/iataCode").and_then(Value::as_str);
    let arrival_airport = segment.pointer("/arrival/iataCode").and_then(Value::as_str);
    let departure_at = segment.pointer("/departure/at").and_then(Value::as_str);
    let arrival_at = segment.pointer("/arrival/at").and_then(Value::as_str);

    let (carrier_code, departure_airport, arrival_airport, departure_at, arrival_at) = match (
        carrier_code,
        departure_airport,
        arrival_airport,
        departure_at,
        arrival_at,
    ) {
        (Some(a), Some(b), Some(c), Some(d), Some(e)) => (a, b, c, d, e),
        _ => {
            warn!(%offer_id, "skipping offer: missing essential segment fields");
            return None;
        }
    };

    let (departure, arrival) = match (parse_timestamp(departure_at), parse_timestamp(arrival_at)) {
        (Some(d), Some(a)) => (d, a),
        _ => {
            warn!(%offer_id, "skipping offer: unparseable departure/arrival timestamp");
            return None;
        }
    };

    let (airline_name, airline_logo) = match local_airline(carrier_code) {
        Some((name, logo)) => (name.to_string(), Some(logo.to_string())),
        None => {
            let name = carriers
                .get(carrier_code)
                .cloned()
                .unwrap_or_else(|| carrier_code.to_string());
            (name, None)
        }
    };

    let duration_iso = raw
        .pointer("/itineraries/0/duration")
        .and_then(Value::as_str);
    let (duration, raw_duration_seconds) = format_duration(duration_iso);

    Some(FlightRecord {
        id: offer_id,
        airline_name,
        airline_logo,
        departure_airport: departure_airport.to_string(),
        arrival_airport: arrival_airport.to_string(),
        departure_time: departure.format("%H:%M").to_string(),
        arrival_time: arrival.format("%H:%M").to_string(),
        duration,
        price,
        // Not provided by this tier; the UI constructs a search URL instead
        booking_link: None,
        stops: (segments.len() - 1) as u32,
        raw_departure_epoch: departure.timestamp_millis(),
        raw_duration_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn sample_offer(id: &str, price: &str) -> Value {
        json!({
            "id": id,
            "itineraries": [{
                "duration": "PT2H10M",
                "segments": [{
                    "carrierCode": "6E",
                    "number": "2134",
                    "departure": { "iataCode": "DEL", "at": "2025-06-01T08:30:00" },
                    "arrival": { "iataCode": "BOM", "at": "2025-06-01T10:40:00" }
                }]
            }],
            "price": { "total": price, "currency": "INR" }
        })
    }

    #[test]
    fn test_normalizes_a_complete_offer() {
        let offer = sample_offer("1", "4500.00");
        let record = normalize_offer(&offer, &HashMap::new()).expect("record");

        assert_eq!(record.id, "1");
        assert_eq!(record.airline_name, "IndiGo");
        assert_eq!(record.airline_logo.as_deref(), Some("/logos/6e.png"));
        assert_eq!(record.departure_airport, "DEL");
        assert_eq!(record.arrival_airport, "BOM");
        assert_eq!(record.departure_time, "08:30");
        assert_eq!(record.arrival_time, "10:40");
        assert_eq!(record.duration, "2h 10m");
        assert_eq!(record.price, 4500.0);
        assert_eq!(record.stops, 0);
        assert!(record.booking_link.is_none());
        assert_eq!(record.raw_duration_seconds, Some(2 * 3600 + 10 * 60));
    }

    #[test]
    fn test_offset_timestamps_convert_into_display_zone() {
        let mut offer = sample_offer("1", "4500.00");
        offer["itineraries"][0]["segments"][0]["departure"]["at"] =
            json!("2025-06-01T08:30:00Z");
        let record = normalize_offer(&offer, &HashMap::new()).expect("record");
        // 08:30 UTC is 14:00 IST
        assert_eq!(record.departure_time, "14:00");
    }

    #[test]
    fn test_missing_price_total_returns_none() {
        let mut offer = sample_offer("7", "4500.00");
        offer["price"] = json!({ "currency": "INR" });
        assert!(normalize_offer(&offer, &HashMap::new()).is_none());
    }

    #[test]
    fn test_non_numeric_price_total_returns_none() {
        let offer = sample_offer("7", "not-a-price");
        assert!(normalize_offer(&offer, &HashMap::new()).is_none());
    }

    #[test]
    fn test_numeric_price_is_accepted() {
        let mut offer = sample_offer("7", "0");
        offer["price"]["total"] = json!(3200.5);
        let record = normalize_offer(&offer, &HashMap::new()).expect("record");
        assert_eq!(record.price, 3200.5);
    }

    #[test]
    fn test_missing_itinerary_or_segment_returns_none() {
        let no_itineraries = json!({ "id": "1", "price": { "total": "100.0" } });
        assert!(normalize_offer(&no_itineraries, &HashMap::new()).is_none());

        let empty_segments = json!({
            "id": "2",
            "itineraries": [{ "segments": [] }],
            "price": { "total": "100.0" }
        });
        assert!(normalize_offer(&empty_segments, &HashMap::new()).is_none());
    }

    #[test]
    fn test_missing_segment_field_returns_none() {
        let mut offer = sample_offer("3", "100.0");
        offer["itineraries"][0]["segments"][0]["departure"] = json!({ "at": "2025-06-01T08:30:00" });
        assert!(normalize_offer(&offer, &HashMap::new()).is_none());
    }

    #[test]
    fn test_unparseable_timestamp_returns_none() {
        let mut offer = sample_offer("4", "100.0");
        offer["itineraries"][0]["segments"][0]["arrival"]["at"] = json!("yesterday");
        assert!(normalize_offer(&offer, &HashMap::new()).is_none());
    }

    #[test]
    fn test_airline_name_falls_back_to_dictionary_then_code() {
        let mut offer = sample_offer("5", "100.0");
        offer["itineraries"][0]["segments"][0]["carrierCode"] = json!("LH");

        let mut carriers = HashMap::new();
        carriers.insert("LH".to_string(), "LUFTHANSA".to_string());
        let record = normalize_offer(&offer, &carriers).expect("record");
        assert_eq!(record.airline_name, "LUFTHANSA");
        assert!(record.airline_logo.is_none());

        let record = normalize_offer(&offer, &HashMap::new()).expect("record");
        assert_eq!(record.airline_name, "LH");
    }

    #[test]
    fn test_stops_counts_extra_segments() {
        let mut offer = sample_offer("6", "100.0");
        let segment = offer["itineraries"][0]["segments"][0].clone();
        let via = json!({
            "carrierCode": "AI",
            "departure": { "iataCode": "BOM", "at": "2025-06-01T12:00:00" },
            "arrival": { "iataCode": "BLR", "at": "2025-06-01T13:30:00" }
        });
        offer["itineraries"][0]["segments"] = json!([segment, via.clone(), via]);

        let record = normalize_offer(&offer, &HashMap::new()).expect("record");
        assert_eq!(record.stops, 2);
        // First segment stays representative
        assert_eq!(record.departure_airport, "DEL");
        assert_eq!(record.arrival_airport, "BOM");
    }

    #[test_case("PT2H10M", "2h 10m"; "hours and minutes")]
    #[test_case("PT45M", "0h 45m"; "minutes only")]
    #[test_case("PT3H", "3h 0m"; "hours only")]
    #[test_case("PT0H0M", "N/A"; "zero duration is not available")]
    #[test_case("PT", "N/A"; "empty body")]
    #[test_case("2H10M", "N/A"; "missing PT prefix")]
    #[test_case("PTxHyM", "N/A"; "garbage body")]
    fn test_duration_formatting(iso: &str, expected: &str) {
        let (display, _) = format_duration(Some(iso));
        assert_eq!(display, expected);
    }

    #[test]
    fn test_missing_duration_reports_not_available() {
        let mut offer = sample_offer("8", "100.0");
        offer["itineraries"][0]
            .as_object_mut()
            .expect("itinerary object")
            .remove("duration");
        let record = normalize_offer(&offer, &HashMap::new()).expect("record");
        assert_eq!(record.duration, "N/A");
        assert!(record.raw_duration_seconds.is_none());
    }

    #[test]
    fn test_record_serializes_with_camel_case_keys() {
        let offer = sample_offer("9", "4500.00");
        let record = normalize_offer(&offer, &HashMap::new()).expect("record");
        let json = serde_json::to_value(&record).expect("serialize");

        assert!(json.get("airlineName").is_some());
        assert!(json.get("rawDepartureEpoch").is_some());
        assert!(json.get("bookingLink").is_some());
    }
}
