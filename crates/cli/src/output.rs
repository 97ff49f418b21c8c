//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use fuelroute_core::locator::StationCandidate;
use fuelroute_core::report::PlanReport;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a subheader
    pub fn subheader(message: &str) {
        println!();
        println!("{}", message.bold().dimmed());
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a distance, one decimal
pub fn format_miles(miles: f64) -> String {
    format!("{:.1} mi", miles)
}

/// Format a dollar amount with thousands separators
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Format a per-gallon price, three decimals
pub fn format_price(price: f64) -> String {
    format!("${:.3}/gal", price)
}

/// Print a human-readable plan
pub fn print_plan(report: &PlanReport) {
    let route = &report.route;
    let fuel = &report.fuel_optimization;
    let summary = &fuel.summary;

    let title = match (&route.start, &route.end) {
        (Some(start), Some(end)) => format!("{} → {}", start.label, end.label),
        _ => "Route plan".to_string(),
    };
    Status::header(&title);
    println!(
        "  {} · {:.1} h · {} mpg · {} range",
        format_miles(route.total_distance_miles),
        route.estimated_duration_hours,
        summary.vehicle_mpg,
        format_miles(summary.vehicle_max_range_miles)
    );

    Status::subheader(&format_count(summary.total_fuel_stops, "fuel stop", "fuel stops"));
    for (i, stop) in fuel.fuel_stops.iter().enumerate() {
        println!(
            "  {}. {} {} ({}, {}) {}",
            i + 1,
            format!("[{}]", format_miles(stop.miles_from_start)).dimmed(),
            stop.name.bold(),
            stop.city,
            stop.state,
            format_price(stop.retail_price_per_gallon).green()
        );
        for alt in &stop.alternatives {
            println!(
                "       {} {} ({}, {}) {} · {} off",
                "alt".dimmed(),
                alt.name,
                alt.city,
                alt.state,
                format_price(alt.price),
                format_miles(alt.distance_miles)
            );
        }
    }

    for missed in &summary.uncovered_waypoints {
        Status::warning(&format!("No station found near mile {:.1}", missed));
    }

    if !fuel.segments.is_empty() {
        Status::subheader("Segments");
        for segment in &fuel.segments {
            println!(
                "  {:>8} → {:<8} {:>10} {:>9.2} gal {:>12}",
                format_miles(segment.from_miles),
                format_miles(segment.to_miles),
                format_miles(segment.segment_miles),
                segment.gallons_needed,
                format_money(segment.cost_usd)
            );
        }
    }

    Status::subheader("Totals");
    println!("  Gallons:       {:.2}", summary.total_gallons_needed);
    println!("  Average price: {}", format_price(summary.average_price_per_gallon));
    println!("  Fuel cost:     {}", format_money(summary.total_fuel_cost_usd).bold());
}

/// Print stations found near a point
pub fn print_candidates(candidates: &[StationCandidate]) {
    if candidates.is_empty() {
        Status::warning("No stations in range");
        return;
    }
    for (i, candidate) in candidates.iter().enumerate() {
        let station = &candidate.station;
        println!(
            "  {}. {} ({}, {}) {} · {} away",
            i + 1,
            station.name.bold(),
            station.city,
            station.state,
            format_price(station.price).green(),
            format_miles(candidate.distance_miles)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        let d = Duration::from_millis(500);
        assert_eq!(format_duration(d), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        let d = Duration::from_secs_f32(5.5);
        assert_eq!(format_duration(d), "5.5s");
    }

    #[test]
    fn test_format_duration_mins() {
        let d = Duration::from_secs(125);
        assert_eq!(format_duration(d), "2m 5s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "fuel stop", "fuel stops"), "1 fuel stop");
        assert_eq!(format_count(0, "fuel stop", "fuel stops"), "0 fuel stops");
    }

    #[test]
    fn test_format_miles() {
        assert_eq!(format_miles(224.96), "225.0 mi");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(12.5), "$12.50");
        assert_eq!(format_money(1234.567), "$1,234.57");
        assert_eq!(format_money(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_money(-42.1), "-$42.10");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(3.1899), "$3.190/gal");
    }
}
