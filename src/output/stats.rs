//! Console summary of a crawl run

use crate::state::CrawlOutcome;

/// Prints the run summary to stdout
pub fn print_summary(outcome: &CrawlOutcome, location: &str) {
    println!("{}", "=".repeat(50));
    println!(
        "Finished: {}/{} documents saved ({:.1}%)",
        outcome.succeeded,
        outcome.attempted,
        outcome.success_rate()
    );
    println!("Output: {}", location);

    if outcome.persistence_failures > 0 {
        println!("Failed saves: {}", outcome.persistence_failures);
    }

    let failed: Vec<_> = outcome.failed().collect();
    if !failed.is_empty() {
        println!("\nNot saved ({}):", failed.len());
        for report in failed {
            println!("  - {} ({})", report.display_name, report.identifier);
            for attempt in &report.attempts {
                println!("      {}: {}", attempt.url, attempt.outcome);
            }
        }
    }
}
