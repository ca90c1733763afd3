// Query tuple enumeration over the Cartesian city/date sweep
use chrono::NaiveDate;

// One provider request key for a one-way search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneWayQuery {
    pub origin: String,
    pub destination: String,
    pub outbound_date: NaiveDate,
}

// One provider request key for a round-trip search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripQuery {
    pub origin: String,
    pub destination: String,
    pub outbound_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl OneWayQuery {
    // Stem shared by the raw JSON and CSV artifacts of this tuple
    pub fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.origin, self.destination, self.outbound_date)
    }
}

impl RoundTripQuery {
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.origin, self.destination, self.outbound_date, self.return_date
        )
    }
}

// Enumerate origin x destination x outbound date, origin outermost.
// Self-pairs are expected noise in a full sweep and are skipped silently.
pub fn one_way_combinations(cities: &[String], outbound_dates: &[NaiveDate]) -> Vec<OneWayQuery> {
    let mut queries = Vec::new();
    for origin in cities {
        for destination in cities {
            if origin == destination {
                continue;
            }
            for &outbound_date in outbound_dates {
                queries.push(OneWayQuery {
                    origin: origin.clone(),
                    destination: destination.clone(),
                    outbound_date,
                });
            }
        }
    }
    queries
}

// Same sweep with return dates innermost. A return date on or before the
// outbound date is skipped, not an error.
pub fn round_trip_combinations(
    cities: &[String],
    outbound_dates: &[NaiveDate],
    return_dates: &[NaiveDate],
) -> Vec<RoundTripQuery> {
    let mut queries = Vec::new();
    for origin in cities {
        for destination in cities {
            if origin == destination {
                continue;
            }
            for &outbound_date in outbound_dates {
                for &return_date in return_dates {
                    if return_date <= outbound_date {
                        continue;
                    }
                    queries.push(RoundTripQuery {
                        origin: origin.clone(),
                        destination: destination.clone(),
                        outbound_date,
                        return_date,
                    });
                }
            }
        }
    }
    queries
}
