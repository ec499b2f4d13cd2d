// ============================================================================
// Basic Usage Example
// ============================================================================

use bbp_pi::prelude::*;
use std::sync::Arc;

fn main() {
    println!("=== BBP Pi Example ===\n");

    // One-shot computation on four threads
    let config = ComputeConfig::from_raw_digits(200).unwrap();
    let plan = config.plan();
    println!(
        "Planned {} terms at {} bits for {} digits\n",
        plan.term_count, plan.working_bits, plan.digits
    );

    let result = run_threaded(config, 4, Arc::new(LoggingEventHandler)).unwrap();
    println!("{}\n", result.render().unwrap());

    // Same computation through the builder, with wider margins
    let conservative = ComputationBuilder::new()
        .digits(200)
        .workers(7)
        .margins(PrecisionMargins::conservative())
        .run_threaded()
        .unwrap();
    println!(
        "Conservative margins agree: {}",
        conservative.digits().unwrap() == result.digits().unwrap()
    );

    // Invalid requests are rejected before any worker starts
    match ComputationBuilder::new().digits(0).run_threaded() {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Rejected: {} (exit code {})", e, e.exit_code()),
    }
}
