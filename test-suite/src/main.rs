//! Custom test runner for the draft-04 conformance cases.
//!
//! This binary runs every case file and reports results per file:
//! - PASS type 12/12
//! - FAIL ref 9/10

use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use test_suite::{TestResults, TestRunner, cases_dir};

#[derive(Parser)]
#[command(name = "test-suite", about = "Draft-04 conformance runner")]
struct Args {
    /// Filter case files by name (substring match)
    #[arg(short, long)]
    filter: Option<String>,

    /// Show only the failing test names, without error trees
    #[arg(short, long)]
    short: bool,

    /// Directory holding the case files
    #[arg(long)]
    cases: Option<PathBuf>,
}

/// ANSI color codes
mod colors {
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

fn main() {
    let args = Args::parse();
    let exit_code = run(&args);
    std::process::exit(exit_code);
}

fn run(args: &Args) -> i32 {
    println!(
        "\n{}{}Draft-04 Test Suite{}",
        colors::BOLD,
        colors::CYAN,
        colors::RESET
    );
    println!("{}{}", colors::DIM, "=".repeat(50));
    println!("{}\n", colors::RESET);

    let runner = TestRunner::new(args.cases.clone().unwrap_or_else(cases_dir));
    let files = match runner.discover_test_files() {
        Ok(files) => files,
        Err(e) => {
            eprintln!(
                "{}{}Error:{} Failed to collect test cases: {}",
                colors::BOLD,
                colors::RED,
                colors::RESET,
                e
            );
            return 1;
        }
    };

    let files: Vec<_> = match &args.filter {
        Some(filter) => files
            .into_iter()
            .filter(|file| runner.name_of(file).contains(filter.as_str()))
            .collect(),
        None => files,
    };

    if files.is_empty() {
        println!(
            "{}{}Warning:{} No test cases found{}",
            colors::BOLD,
            colors::YELLOW,
            colors::RESET,
            if args.filter.is_some() {
                " matching filter"
            } else {
                ""
            }
        );
        return 0;
    }

    // par_iter keeps the input order on collect
    let outcomes: Vec<(String, TestResults)> = files
        .par_iter()
        .map(|file| (runner.name_of(file), runner.run_file(file)))
        .collect();

    let mut summary = TestResults::new();
    for (name, results) in outcomes {
        let (status, color) = if results.is_success() {
            ("PASS", colors::GREEN)
        } else {
            ("FAIL", colors::RED)
        };
        println!(
            "  {}{}{}{} {} {}{}/{}{}",
            colors::BOLD,
            color,
            status,
            colors::RESET,
            name,
            colors::DIM,
            results.passed,
            results.total,
            colors::RESET
        );
        summary.merge(results);
    }

    // Print summary
    println!("\n{}{}Summary{}", colors::BOLD, colors::CYAN, colors::RESET);
    println!("{}{}", colors::DIM, "-".repeat(50));
    println!("{}", colors::RESET);
    println!(
        "  Tests: {} passed, {} failed, {} total",
        summary.passed, summary.failed, summary.total
    );

    // Print detailed failure reports
    if !summary.failures.is_empty() {
        println!("\n{}{}Failures{}", colors::BOLD, colors::RED, colors::RESET);
        println!("{}{}", colors::DIM, "-".repeat(50));
        println!("{}", colors::RESET);

        for failure in &summary.failures {
            println!(
                "\n  {}{}{}{}",
                colors::BOLD,
                colors::RED,
                failure.test_name,
                colors::RESET
            );
            if !args.short {
                for line in failure.error.lines() {
                    println!("    {}", line);
                }
            }
        }
    }

    // Final status line
    println!();
    if summary.is_success() {
        println!(
            "{}{}All tests passed!{}",
            colors::BOLD,
            colors::GREEN,
            colors::RESET
        );
        0
    } else {
        println!(
            "{}{}{} test(s) failed.{}",
            colors::BOLD,
            colors::RED,
            summary.failed,
            colors::RESET
        );
        1
    }
}
