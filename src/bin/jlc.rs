#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use jlc::cli::args::CliArgs;
use jlc::cli::driver::{self, RunResult};
use jlc::cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_ABORTED: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if JLC_LOG or RUST_LOG is set.
    jlc::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let result = driver::run(&args, &cwd)?;

    if !result.diagnostics.is_empty() {
        let pretty = args
            .pretty
            .unwrap_or_else(|| std::io::stderr().is_terminal());
        let mut reporter = Reporter::new(pretty).with_root(&cwd);
        eprintln!("{}", reporter.render(&result.diagnostics));
    }

    if args.json {
        let summary = serde_json::to_string_pretty(&result.summary())
            .context("failed to serialize run summary")?;
        println!("{summary}");
    } else if args.print && !result.is_aborted() {
        print!("{}", result.printed_classes());
    }

    if args.stats && !args.json {
        print_stats(&result);
    }

    if result.is_aborted() {
        std::process::exit(EXIT_ABORTED);
    }
    std::process::exit(EXIT_SUCCESS);
}

fn print_stats(result: &RunResult) {
    let Some(stats) = result.stats else {
        return;
    };
    let rows = [
        ("Files", result.files_read.len()),
        ("Lambdas", stats.lambdas),
        ("Group classes", stats.groups),
        ("Classes saved", stats.classes_saved),
        ("Singleton fields", stats.singleton_fields),
        ("Dispatch methods", stats.dispatch_methods),
        ("Forwarding methods", stats.forwarding_methods),
    ];
    for (label, value) in rows {
        println!("{:<20}{value:>8}", format!("{label}:"));
    }
}
