// Batch flight-search pipeline: enumerate query tuples over cities and
// dates, fetch each provider document, and flatten itineraries into
// tabular records.

pub mod combos;
pub mod fetch;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod provider;

// Re-export key types for convenience
pub use combos::{one_way_combinations, round_trip_combinations, OneWayQuery, RoundTripQuery};
pub use fetch::{ClientConfig, FetchError, FlightSearchApi, SerpApiClient};
pub use normalize::{
    FlatRecord, ItineraryProcessor, OneWayRecord, ProcessingError, RoundTripRecord, TripType,
};
pub use output::OutputError;
pub use pipeline::{run_batch, BatchOptions, BatchSummary, PipelineError, RunMode};
pub use provider::{AirportRef, FlightSegment, ItineraryEntry, SearchDocument};
