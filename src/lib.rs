// ============================================================================
// BBP Pi Library
// Distributed arbitrary-precision computation of pi with the BBP series
// ============================================================================

//! # BBP Pi
//!
//! Computes decimal digits of π by splitting the Bailey–Borwein–Plouffe
//! series across a group of workers that share nothing but serialized
//! partial sums.
//!
//! ## Features
//!
//! - **Arbitrary-precision fixed point** (`BigFixed`) on top of `num-bigint`
//! - **Stride partition** of series terms, balanced to within one term
//! - **Two transports** behind one `Communicator` trait: threads over
//!   crossbeam channels, or OS processes over pipes
//! - **Exact aggregation**: arrival order never changes the result, and any
//!   group size yields the same digits
//! - **Typed events** for progress and diagnostics
//!
//! ## Example
//!
//! ```rust
//! use bbp_pi::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ComputeConfig::from_raw_digits(50).unwrap();
//! let result = run_threaded(config, 4, Arc::new(NoOpEventHandler)).unwrap();
//!
//! assert!(result.digits().unwrap().starts_with("1415926535"));
//! println!("{}", result.render().unwrap());
//! ```

pub mod domain;
pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod numeric;
pub mod series;
pub mod transport;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        ComputeConfig, DigitRequest, PrecisionMargins, PrecisionPlan, ProcessState,
        ProcessTransition, WorkerIdentity, COORDINATOR_RANK,
    };
    pub use crate::engine::{
        aggregate, run_process_worker, run_processes, run_threaded, Aggregator,
        ComputationBuilder, FinalResult, Worker, WorkerOutcome,
    };
    pub use crate::errors::{ComputeError, ComputeResult};
    pub use crate::interfaces::{
        Communicator, ComputeEvent, EventHandler, LoggingEventHandler, NoOpEventHandler,
    };
    pub use crate::numeric::BigFixed;
    pub use crate::series::{accumulate, owned_terms, term, PartialSum};
    pub use crate::transport::{
        deserialize, serialize, ChannelCommunicator, ChannelGroup, PipeCommunicator,
        TransportError,
    };
    pub use crate::utils::DigitRenderer;
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use std::sync::Arc;

    const PI_REFERENCE: &str = "3.\
        1415926535897932384626433832795028841971693993751058209749445923078164\
        062862089986280348253421170679821480865132823066470938446";

    const FIRST_100: &str = "1415926535 8979323846 2643383279 5028841971 6939937510\n  \
        5820974944 5923078164 0628620899 8628034825 3421170679";

    struct Counter(Arc<parking_lot::Mutex<usize>>);

    impl EventHandler for Counter {
        fn on_event(&self, _event: ComputeEvent) {
            *self.0.lock() += 1;
        }
    }

    /// Partial sums cross the wire truncated to `digits + 20` places, so
    /// groups of different sizes agree only to within the summed truncation.
    fn assert_close(a: &BigFixed, b: &BigFixed, digits: i64) {
        let places = usize::try_from(digits + 18).unwrap();
        let text = format!("0.{}1", "0".repeat(places - 1));
        let tolerance = BigFixed::parse_decimal(&text, a.frac_bits()).unwrap();
        assert!(a.abs_diff(b).unwrap() < tolerance, "{} vs {}", a, b);
    }

    fn compute(digits: i64, workers: usize) -> FinalResult {
        let config = ComputeConfig::from_raw_digits(digits).unwrap();
        run_threaded(config, workers, Arc::new(NoOpEventHandler)).unwrap()
    }

    #[test]
    fn test_hundred_digits_single_worker() {
        let result = compute(100, 1);
        let digits = result.digits().unwrap();
        assert_eq!(&digits[..10], "1415926535");
        assert_eq!(digits.len(), 100);
        assert_eq!(result.render().unwrap(), format!("3.{}", FIRST_100));
    }

    #[test]
    fn test_group_size_does_not_change_digits() {
        let single = compute(50, 1);
        let grouped = compute(50, 4);
        assert_eq!(single.digits().unwrap(), grouped.digits().unwrap());
        assert_close(single.value(), grouped.value(), 50);
    }

    #[test]
    fn test_non_positive_digits_rejected() {
        for digits in [0, -1, -100] {
            let err = ComputeConfig::from_raw_digits(digits).unwrap_err();
            assert_eq!(err, ComputeError::InvalidDigitCount(digits));
            assert_eq!(err.exit_code(), 1);
        }

        let counted = Arc::new(parking_lot::Mutex::new(0usize));
        let result = ComputationBuilder::new()
            .digits(-5)
            .workers(3)
            .event_handler(Arc::new(Counter(counted.clone())))
            .run_threaded();
        assert_eq!(result, Err(ComputeError::InvalidDigitCount(-5)));
        assert_eq!(*counted.lock(), 0);
    }

    #[test]
    fn test_more_workers_than_terms() {
        let config = ComputeConfig::from_raw_digits(1).unwrap();
        assert_eq!(config.plan().term_count, 11);

        for rank in 11..16 {
            assert_eq!(owned_terms(rank, 16, 11).len(), 0);
        }

        let result = run_threaded(config, 16, Arc::new(NoOpEventHandler)).unwrap();
        assert_eq!(result.digits().unwrap(), "1");
        assert_eq!(result.contributions(), 16);
        assert_close(result.value(), compute(1, 1).value(), 1);
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let plan = ComputeConfig::from_raw_digits(40).unwrap().plan();
        let group_size = 5;
        let partials: Vec<BigFixed> = (0..group_size)
            .map(|rank| {
                accumulate(owned_terms(rank, group_size, plan.term_count), plan.working_bits)
                    .unwrap()
                    .into_value()
            })
            .collect();

        let (local, received) = partials.split_first().unwrap();
        let forward = aggregate(local, received).unwrap();
        let backward = aggregate(local, received.iter().rev()).unwrap();
        let rotated = aggregate(
            &partials[3],
            [&partials[4], &partials[0], &partials[1], &partials[2]],
        )
        .unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);

        let mut aggregator = Aggregator::new(group_size, local.clone());
        for source in [4, 2, 1, 3] {
            aggregator.absorb(source, &partials[source]).unwrap();
        }
        assert_eq!(aggregator.finish().unwrap(), forward);
    }

    #[test]
    fn test_partial_sums_converge_monotonically() {
        let bits = 400;
        let pi = BigFixed::parse_decimal(PI_REFERENCE, bits).unwrap();

        let mut previous: Option<BigFixed> = None;
        for n in 1..=20u64 {
            let sum = accumulate(0..n, bits).unwrap().into_value();
            let error = sum.abs_diff(&pi).unwrap();
            if let Some(previous) = &previous {
                assert!(error < *previous, "error did not shrink at n = {}", n);
            }
            previous = Some(error);
        }
    }

    #[test]
    fn test_serialized_partials_reproduce_direct_sum() {
        let plan = ComputeConfig::from_raw_digits(60).unwrap().plan();
        let direct = accumulate(0..plan.term_count, plan.working_bits)
            .unwrap()
            .into_value();

        let partials: Vec<BigFixed> = (0..3)
            .map(|rank| {
                accumulate(owned_terms(rank, 3, plan.term_count), plan.working_bits)
                    .unwrap()
                    .into_value()
            })
            .collect();
        let (local, rest) = partials.split_first().unwrap();
        let received: Vec<BigFixed> = rest
            .iter()
            .map(|value| deserialize(&serialize(value, &plan).unwrap(), plan.working_bits).unwrap())
            .collect();

        let total = aggregate(local, &received).unwrap();
        let renderer = DigitRenderer::new();
        assert_eq!(
            renderer.render(&total, 60).unwrap(),
            renderer.render(&direct, 60).unwrap()
        );
    }
}
