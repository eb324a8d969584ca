//! Stub route fetcher for development without a routing service.
//!
//! Sleeps to simulate network latency, then returns randomized itineraries
//! across central Seoul. Origin and destination text are echoed into the
//! steps but not geocoded: every itinerary runs from Gyeongbokgung to
//! Gangnam Station.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{Local, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::domain::labels::{arrival_time_label, duration_label, fare_label, walk_distance_label};
use crate::domain::{AlternativeParts, GeoPoint, RouteAlternative, RouteQuery, RouteResultSet};

use super::RouteFetcher;
use super::error::FetchError;

/// Default simulated latency.
const DEFAULT_LATENCY: Duration = Duration::from_secs(2);

/// Travel times are drawn from this range, in minutes.
const MIN_MINUTES: u32 = 15;
const MAX_MINUTES: u32 = 45;

/// Configuration for the stub fetcher.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// How long each fetch sleeps before answering.
    pub latency: Duration,

    /// Seed for reproducible output. Random when `None`.
    pub seed: Option<u64>,

    /// Number of alternatives per answer (clamped to the canned itineraries).
    pub alternatives: usize,

    /// Probability in [0, 1] that a fetch fails as unreachable.
    pub failure_rate: f64,
}

impl StubConfig {
    /// Set the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make output reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set how many alternatives each answer carries.
    pub fn with_alternatives(mut self, n: usize) -> Self {
        self.alternatives = n;
        self
    }

    /// Set the simulated outage probability.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            seed: None,
            alternatives: ITINERARIES.len(),
            failure_rate: 0.0,
        }
    }
}

/// A canned itinerary shape. `{origin}` and `{destination}` are filled per query.
struct Itinerary {
    middle_steps: &'static [&'static str],
    transfers: u32,
    base_fare: u32,
    path: &'static [(f64, f64)],
}

const GYEONGBOKGUNG: (f64, f64) = (37.5797, 126.9770);
const CITY_HALL: (f64, f64) = (37.5663, 126.9779);
const SEOUL_STATION: (f64, f64) = (37.5509, 126.9882);
const GANGNAM: (f64, f64) = (37.4979, 127.0276);

const ITINERARIES: [Itinerary; 3] = [
    Itinerary {
        middle_steps: &[
            "Take Subway Line 5 (Gyeongbokgung Station)",
            "Transfer to Line 2 at City Hall Station",
            "Arrive at Gangnam Station",
        ],
        transfers: 1,
        base_fare: 1400,
        path: &[GYEONGBOKGUNG, CITY_HALL, SEOUL_STATION, GANGNAM],
    },
    Itinerary {
        middle_steps: &[
            "Take Bus 140 (Gwanghwamun stop)",
            "Get off at Gangnam Station stop",
        ],
        transfers: 0,
        base_fare: 1500,
        path: &[GYEONGBOKGUNG, (37.5716, 126.9769), (37.5340, 127.0026), GANGNAM],
    },
    Itinerary {
        middle_steps: &[
            "Take Subway Line 4 (Seoul Station)",
            "Transfer to Line 3 at Chungmuro Station",
            "Transfer to Line 2 at Gyodae Station",
            "Arrive at Gangnam Station",
        ],
        transfers: 2,
        base_fare: 1400,
        path: &[
            GYEONGBOKGUNG,
            SEOUL_STATION,
            (37.5612, 126.9942),
            (37.4934, 127.0140),
            GANGNAM,
        ],
    },
];

/// Route fetcher that returns randomized canned itineraries.
///
/// Answers `NoRoute` when origin and destination name the same place
/// (ignoring case), and `Unreachable` at the configured failure rate.
#[derive(Debug)]
pub struct StubRouteFetcher {
    config: StubConfig,
    rng: Mutex<StdRng>,
}

impl StubRouteFetcher {
    /// Create a stub with the given configuration.
    pub fn new(config: StubConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Build an answer for `query` as if departing at `departure`.
    fn generate(
        &self,
        query: &RouteQuery,
        departure: NaiveTime,
    ) -> Result<RouteResultSet, FetchError> {
        if query.origin().to_lowercase() == query.destination().to_lowercase() {
            return Err(FetchError::NoRoute);
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        if self.config.failure_rate > 0.0 && rng.gen_bool(self.config.failure_rate.min(1.0)) {
            return Err(FetchError::Unreachable(
                "simulated service outage".to_string(),
            ));
        }

        let count = self.config.alternatives.clamp(1, ITINERARIES.len());
        let mut alternatives = Vec::with_capacity(count);

        for (idx, itinerary) in ITINERARIES.iter().take(count).enumerate() {
            let minutes = rng.gen_range(MIN_MINUTES..=MAX_MINUTES);
            let walk_meters = rng.gen_range(100..=900);
            let fare = itinerary.base_fare + 50 * rng.gen_range(0..=4);

            let mut steps = Vec::with_capacity(itinerary.middle_steps.len() + 2);
            steps.push(format!("Depart from {}", query.origin()));
            steps.extend(itinerary.middle_steps.iter().map(|s| s.to_string()));
            steps.push(format!("Walk to {}", query.destination()));

            let path = itinerary
                .path
                .iter()
                .map(|&(lat, lon)| GeoPoint::new(lat, lon))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| FetchError::Unreachable(e.to_string()))?;

            let (Some(&origin_point), Some(&destination_point)) = (path.first(), path.last())
            else {
                continue;
            };

            let alternative = RouteAlternative::from_parts(AlternativeParts {
                id: format!("route-{}", idx + 1),
                duration_label: duration_label(minutes),
                transfer_count: itinerary.transfers,
                walk_distance_label: walk_distance_label(walk_meters),
                fare_label: fare_label(fare),
                arrival_time_label: arrival_time_label(departure, minutes),
                steps,
                origin_point,
                destination_point,
                path,
            })
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

            alternatives.push(alternative);
        }

        RouteResultSet::new(alternatives).map_err(|_| FetchError::NoRoute)
    }
}

impl RouteFetcher for StubRouteFetcher {
    async fn fetch(&self, query: &RouteQuery) -> Result<RouteResultSet, FetchError> {
        info!(%query, "Fetching route (stub)");

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let result = self.generate(query, Local::now().time());
        debug!(%query, ok = result.is_ok(), "Stub fetch complete");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(o: &str, d: &str) -> RouteQuery {
        RouteQuery::validate(o, d).unwrap()
    }

    fn departure() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    }

    fn seeded() -> StubRouteFetcher {
        StubRouteFetcher::new(
            StubConfig::default()
                .with_latency(Duration::ZERO)
                .with_seed(7),
        )
    }

    #[test]
    fn default_config() {
        let config = StubConfig::default();
        assert_eq!(config.latency, Duration::from_secs(2));
        assert_eq!(config.alternatives, 3);
        assert!(config.seed.is_none());
        assert_eq!(config.failure_rate, 0.0);
    }

    #[test]
    fn generates_valid_alternatives() {
        let stub = seeded();
        let set = stub
            .generate(&query("Seoul Station", "Gangnam Station"), departure())
            .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.selected_id(), "route-1");

        for alt in set.alternatives() {
            assert_eq!(alt.steps()[0], "Depart from Seoul Station");
            assert_eq!(alt.steps().last().unwrap(), "Walk to Gangnam Station");
            assert!(alt.path().len() >= 2);
            assert!(alt.fare_label().starts_with('₩'));
        }
    }

    #[test]
    fn durations_in_range() {
        let stub = seeded();
        for _ in 0..20 {
            let set = stub.generate(&query("A", "B"), departure()).unwrap();
            for alt in set.alternatives() {
                let minutes: u32 = alt
                    .duration_label()
                    .trim_end_matches(" min")
                    .parse()
                    .unwrap();
                assert!((MIN_MINUTES..=MAX_MINUTES).contains(&minutes));
            }
        }
    }

    #[test]
    fn same_seed_same_output() {
        let a = seeded().generate(&query("A", "B"), departure()).unwrap();
        let b = seeded().generate(&query("A", "B"), departure()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn alternative_count_clamped() {
        let stub = StubRouteFetcher::new(StubConfig::default().with_seed(1).with_alternatives(1));
        assert_eq!(stub.generate(&query("A", "B"), departure()).unwrap().len(), 1);

        let stub = StubRouteFetcher::new(StubConfig::default().with_seed(1).with_alternatives(0));
        assert_eq!(stub.generate(&query("A", "B"), departure()).unwrap().len(), 1);

        let stub = StubRouteFetcher::new(StubConfig::default().with_seed(1).with_alternatives(10));
        assert_eq!(stub.generate(&query("A", "B"), departure()).unwrap().len(), 3);
    }

    #[test]
    fn same_place_is_no_route() {
        let stub = seeded();
        let err = stub
            .generate(&query("Gangnam Station", "gangnam station"), departure())
            .unwrap_err();
        assert_eq!(err, FetchError::NoRoute);
    }

    #[test]
    fn full_failure_rate_is_unreachable() {
        let stub = StubRouteFetcher::new(StubConfig::default().with_seed(3).with_failure_rate(1.0));
        let err = stub.generate(&query("A", "B"), departure()).unwrap_err();
        assert!(matches!(err, FetchError::Unreachable(_)));
    }

    #[tokio::test]
    async fn fetch_without_latency() {
        let stub = seeded();
        let set = stub.fetch(&query("Seoul Station", "Gangnam Station")).await.unwrap();
        assert_eq!(set.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_waits_for_latency() {
        let stub = StubRouteFetcher::new(
            StubConfig::default()
                .with_latency(Duration::from_secs(2))
                .with_seed(7),
        );

        let start = tokio::time::Instant::now();
        stub.fetch(&query("A", "B")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
