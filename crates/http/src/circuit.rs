use cinegraph_core::retry::CircuitBreaker;
use std::time::Duration;

/// One breaker per upstream, matching `TmdbClient`'s pattern of wrapping
/// a single external dependency's calls in its own breaker rather than
/// sharing one breaker across unrelated services. A sustained outage in
/// one upstream (say, PetScan) does not affect whether OMDb calls are
/// still attempted.
pub struct Upstreams {
    pub wikipedia: CircuitBreaker,
    pub petscan: CircuitBreaker,
    pub omdb: CircuitBreaker,
}

impl Upstreams {
    pub fn new() -> Self {
        let threshold = 5;
        let reset_timeout = Duration::from_secs(60);
        Self {
            wikipedia: CircuitBreaker::new("wikipedia", threshold, reset_timeout),
            petscan: CircuitBreaker::new("petscan", threshold, reset_timeout),
            omdb: CircuitBreaker::new("omdb", threshold, reset_timeout),
        }
    }
}

impl Default for Upstreams {
    fn default() -> Self {
        Self::new()
    }
}
