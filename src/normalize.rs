// Itinerary normalization: flatten a parsed provider document into one
// record per itinerary entry, keyed on the entry's first flight segment.
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::provider::{ItineraryEntry, SearchDocument};

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("structural error in provider document: {0}")]
    Structural(String),

    #[error("itinerary entry has no flight segments")]
    MissingSegments,
}

// Closed trip-type tag threaded from the query tuple through fetch to the
// output schema. Mixing it up across those stages is a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripType {
    OneWay,
    RoundTrip,
}

// Field order is the CSV column order consumed downstream. Do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneWayRecord {
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub airplane: String,
    pub travel_class: String,
    pub legroom: String,
    pub departure_airport_id: String,
    pub departure_airport_name: String,
    pub departure_time: String,
    pub arrival_airport_id: String,
    pub arrival_airport_name: String,
    pub arrival_time: String,
    pub duration_min: Option<u32>,
    pub price_usd: Option<f64>,
    pub booking_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripRecord {
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub airplane: String,
    pub travel_class: String,
    pub legroom: String,
    pub departure_airport_id: String,
    pub departure_airport_name: String,
    pub departure_time: String,
    pub arrival_airport_id: String,
    pub arrival_airport_name: String,
    pub arrival_time: String,
    pub total_duration_min: Option<u32>,
    pub price_usd: Option<f64>,
    pub trip_type: Option<String>,
    pub departure_token: Option<String>,
    pub fetched_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlatRecord {
    OneWay(OneWayRecord),
    RoundTrip(RoundTripRecord),
}

// Stateless processor; one instance can normalize any number of documents.
#[derive(Debug, Default)]
pub struct ItineraryProcessor;

impl ItineraryProcessor {
    pub fn new() -> Self {
        Self
    }

    // Validating parse from the opaque fetched document. Any schema
    // violation surfaces here, before transformation starts.
    pub fn parse_document(&self, value: &Value) -> Result<SearchDocument, ProcessingError> {
        SearchDocument::from_value(value).map_err(|e| ProcessingError::Structural(e.to_string()))
    }

    // Lazy record sequence in entry order. Restartable: call again for a
    // fresh pass over the same document.
    pub fn records<'a>(
        &self,
        document: &'a SearchDocument,
        trip: TripType,
    ) -> impl Iterator<Item = Result<FlatRecord, ProcessingError>> + 'a {
        let fetched_at = document.fetched_at.clone().unwrap_or_default();
        document
            .entries()
            .map(move |entry| flatten_entry(entry, trip, &fetched_at))
    }

    // Collects atomically: a failing entry yields the error and no partial
    // record set for the document.
    pub fn normalize(
        &self,
        document: &SearchDocument,
        trip: TripType,
    ) -> Result<Vec<FlatRecord>, ProcessingError> {
        self.records(document, trip).collect()
    }
}

fn flatten_entry(
    entry: &ItineraryEntry,
    trip: TripType,
    fetched_at: &str,
) -> Result<FlatRecord, ProcessingError> {
    let segment = entry.flights.first().ok_or(ProcessingError::MissingSegments)?;

    let record = match trip {
        TripType::OneWay => FlatRecord::OneWay(OneWayRecord {
            flight_number: segment.flight_number.clone(),
            airline: segment.airline.clone(),
            airplane: segment.airplane.clone(),
            travel_class: segment.travel_class.clone(),
            legroom: segment.legroom.clone(),
            departure_airport_id: segment.departure_airport.id.clone(),
            departure_airport_name: segment.departure_airport.name.clone(),
            departure_time: segment.departure_airport.time.clone(),
            arrival_airport_id: segment.arrival_airport.id.clone(),
            arrival_airport_name: segment.arrival_airport.name.clone(),
            arrival_time: segment.arrival_airport.time.clone(),
            // Entry-level duration wins; the first segment's own duration
            // is an acceptable stand-in for a single leg.
            duration_min: entry.total_duration.or(segment.duration),
            price_usd: entry.price,
            booking_token: entry.booking_token.clone(),
        }),
        TripType::RoundTrip => FlatRecord::RoundTrip(RoundTripRecord {
            flight_number: segment.flight_number.clone(),
            airline: segment.airline.clone(),
            airplane: segment.airplane.clone(),
            travel_class: segment.travel_class.clone(),
            legroom: segment.legroom.clone(),
            departure_airport_id: segment.departure_airport.id.clone(),
            departure_airport_name: segment.departure_airport.name.clone(),
            departure_time: segment.departure_airport.time.clone(),
            arrival_airport_id: segment.arrival_airport.id.clone(),
            arrival_airport_name: segment.arrival_airport.name.clone(),
            arrival_time: segment.arrival_airport.time.clone(),
            // No segment-level fallback here: a round-trip entry spans
            // multiple legs, so one leg's duration is not a substitute.
            total_duration_min: entry.total_duration,
            price_usd: entry.price,
            trip_type: entry.trip_type.clone(),
            departure_token: entry.departure_token.clone(),
            fetched_at: fetched_at.to_string(),
        }),
    };

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_json(flight_number: &str, extra: &str) -> String {
        format!(
            r#"{{
                "flights": [
                    {{
                        "flight_number": "{flight_number}",
                        "airline": "IndiGo",
                        "airplane": "Airbus A320",
                        "travel_class": "Economy",
                        "legroom": "28 in",
                        "duration": 125,
                        "departure_airport": {{"id": "DEL", "name": "Indira Gandhi International Airport", "time": "2025-06-01 08:15"}},
                        "arrival_airport": {{"id": "BOM", "name": "Chhatrapati Shivaji International Airport", "time": "2025-06-01 10:30"}}
                    }}
                ]{extra}
            }}"#
        )
    }

    fn parse(json: &str) -> SearchDocument {
        let value: Value = serde_json::from_str(json).unwrap();
        ItineraryProcessor::new().parse_document(&value).unwrap()
    }

    #[test]
    fn test_best_flights_precede_other_flights() {
        let json = format!(
            r#"{{"best_flights": [{}, {}], "other_flights": [{}]}}"#,
            entry_json("6E 101", ""),
            entry_json("6E 202", ""),
            entry_json("AI 303", "")
        );
        let document = parse(&json);
        let records = ItineraryProcessor::new()
            .normalize(&document, TripType::OneWay)
            .unwrap();

        let numbers: Vec<_> = records
            .iter()
            .map(|r| match r {
                FlatRecord::OneWay(row) => row.flight_number.clone().unwrap(),
                FlatRecord::RoundTrip(_) => unreachable!(),
            })
            .collect();
        assert_eq!(numbers, vec!["6E 101", "6E 202", "AI 303"]);
    }

    #[test]
    fn test_document_without_flight_lists_yields_no_records() {
        let document = parse(r#"{"search_metadata": {"id": "abc"}}"#);
        let records = ItineraryProcessor::new()
            .normalize(&document, TripType::OneWay)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_one_way_duration_falls_back_to_first_segment() {
        let json = format!(r#"{{"best_flights": [{}]}}"#, entry_json("6E 101", ""));
        let document = parse(&json);
        let records = ItineraryProcessor::new()
            .normalize(&document, TripType::OneWay)
            .unwrap();

        match &records[0] {
            FlatRecord::OneWay(row) => assert_eq!(row.duration_min, Some(125)),
            FlatRecord::RoundTrip(_) => unreachable!(),
        }
    }

    #[test]
    fn test_one_way_entry_duration_wins_over_segment() {
        let json = format!(
            r#"{{"best_flights": [{}]}}"#,
            entry_json("6E 101", r#", "total_duration": 140"#)
        );
        let document = parse(&json);
        let records = ItineraryProcessor::new()
            .normalize(&document, TripType::OneWay)
            .unwrap();

        match &records[0] {
            FlatRecord::OneWay(row) => assert_eq!(row.duration_min, Some(140)),
            FlatRecord::RoundTrip(_) => unreachable!(),
        }
    }

    #[test]
    fn test_round_trip_duration_has_no_segment_fallback() {
        let json = format!(r#"{{"best_flights": [{}]}}"#, entry_json("6E 101", ""));
        let document = parse(&json);
        let records = ItineraryProcessor::new()
            .normalize(&document, TripType::RoundTrip)
            .unwrap();

        match &records[0] {
            FlatRecord::RoundTrip(row) => assert_eq!(row.total_duration_min, None),
            FlatRecord::OneWay(_) => unreachable!(),
        }
    }

    #[test]
    fn test_round_trip_records_share_injected_fetched_at() {
        let json = format!(
            r#"{{
                "_fetched_at": "2025-06-01T12:00:00+05:30",
                "best_flights": [{}],
                "other_flights": [{}]
            }}"#,
            entry_json("6E 101", r#", "departure_token": "tok-1", "type": "Round trip""#),
            entry_json("AI 303", r#", "departure_token": "tok-2", "type": "Round trip""#)
        );
        let document = parse(&json);
        let records = ItineraryProcessor::new()
            .normalize(&document, TripType::RoundTrip)
            .unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            match record {
                FlatRecord::RoundTrip(row) => {
                    assert_eq!(row.fetched_at, "2025-06-01T12:00:00+05:30");
                }
                FlatRecord::OneWay(_) => unreachable!(),
            }
        }
    }

    #[test]
    fn test_round_trip_passes_tokens_through() {
        let json = format!(
            r#"{{"best_flights": [{}]}}"#,
            entry_json(
                "6E 101",
                r#", "total_duration": 455, "price": 233.0, "departure_token": "tok-1", "type": "Round trip""#
            )
        );
        let document = parse(&json);
        let records = ItineraryProcessor::new()
            .normalize(&document, TripType::RoundTrip)
            .unwrap();

        match &records[0] {
            FlatRecord::RoundTrip(row) => {
                assert_eq!(row.total_duration_min, Some(455));
                assert_eq!(row.price_usd, Some(233.0));
                assert_eq!(row.trip_type.as_deref(), Some("Round trip"));
                assert_eq!(row.departure_token.as_deref(), Some("tok-1"));
                // No _fetched_at on the document carries through as empty
                assert_eq!(row.fetched_at, "");
            }
            FlatRecord::OneWay(_) => unreachable!(),
        }
    }

    #[test]
    fn test_entry_with_empty_segment_list_fails_whole_document() {
        let json = format!(
            r#"{{"best_flights": [{}], "other_flights": [{{"flights": [], "price": 99.0}}]}}"#,
            entry_json("6E 101", "")
        );
        let document = parse(&json);
        let result = ItineraryProcessor::new().normalize(&document, TripType::OneWay);
        assert!(matches!(result, Err(ProcessingError::MissingSegments)));
    }

    #[test]
    fn test_missing_airport_field_is_structural() {
        let value: Value = serde_json::from_str(
            r#"{
                "best_flights": [
                    {
                        "flights": [
                            {
                                "departure_airport": {"id": "DEL", "name": "Indira Gandhi International Airport"},
                                "arrival_airport": {"id": "BOM", "name": "Chhatrapati Shivaji International Airport", "time": "2025-06-01 10:30"}
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let result = ItineraryProcessor::new().parse_document(&value);
        assert!(matches!(result, Err(ProcessingError::Structural(_))));
    }

    #[test]
    fn test_records_iterator_is_restartable() {
        let json = format!(r#"{{"best_flights": [{}]}}"#, entry_json("6E 101", ""));
        let document = parse(&json);
        let processor = ItineraryProcessor::new();

        let first_pass = processor.records(&document, TripType::OneWay).count();
        let second_pass = processor.records(&document, TripType::OneWay).count();
        assert_eq!(first_pass, 1);
        assert_eq!(second_pass, 1);
    }
}
