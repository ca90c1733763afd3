// Typed view of the SerpApi google_flights response document.
//
// Deserialization is the single validating step: airport references and
// their id/name/time sub-fields are the semantic identity of a flight leg,
// so they are required here and a document missing any of them fails to
// parse. Everything else is optional on the wire.
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Wire key injected into round-trip documents at fetch time
pub const FETCHED_AT_KEY: &str = "_fetched_at";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SearchDocument {
    #[serde(default)]
    pub best_flights: Vec<ItineraryEntry>,
    #[serde(default)]
    pub other_flights: Vec<ItineraryEntry>,
    #[serde(rename = "_fetched_at", default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItineraryEntry {
    pub flights: Vec<FlightSegment>,
    #[serde(default)]
    pub total_duration: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub booking_token: Option<String>,
    #[serde(default)]
    pub departure_token: Option<String>,
    // Provider-assigned trip-type label, passed through verbatim
    #[serde(rename = "type", default)]
    pub trip_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlightSegment {
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub airplane: String,
    #[serde(default)]
    pub travel_class: String,
    #[serde(default)]
    pub legroom: String,
    #[serde(default)]
    pub duration: Option<u32>,
    pub departure_airport: AirportRef,
    pub arrival_airport: AirportRef,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirportRef {
    pub id: String,
    pub name: String,
    pub time: String,
}

impl SearchDocument {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    // Entries in contract order: best flights first, then the rest, each
    // sub-sequence as the provider returned it.
    pub fn entries(&self) -> impl Iterator<Item = &ItineraryEntry> {
        self.best_flights.iter().chain(self.other_flights.iter())
    }

    pub fn entry_count(&self) -> usize {
        self.best_flights.len() + self.other_flights.len()
    }
}
