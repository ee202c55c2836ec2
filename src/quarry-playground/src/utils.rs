//! Printing helpers for the playground.

use quarry_logical::OptExpression;
use quarry_optimizer::OptimizedPlan;

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(60));
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}", "=".repeat(60));
}

/// Print a plan before and after rewriting, plus the trace if requested.
pub fn print_rewrite(before: &OptExpression, result: &OptimizedPlan, show_trace: bool) {
    println!("Before:");
    print!("{}", before.explain());
    print_divider();
    println!("After:");
    print!("{}", result.plan.explain());
    print_divider();

    if show_trace {
        println!("{}", result.format_trace());
    } else {
        println!(
            "{} iterations, {} rules applied",
            result.iterations, result.rules_applied
        );
        for (rule, count) in &result.applied_counts {
            println!("  {rule}: {count}");
        }
    }
}
