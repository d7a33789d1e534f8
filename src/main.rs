use std::process;

use clap::Parser;
use curriculum_tree::cli::args::Cli;
use curriculum_tree::cli::commands::execute_command;
use curriculum_tree::cli::output;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = execute_command(&cli) {
        tracing::debug!("failed: {:?}", e);
        output::error(&e);
        process::exit(e.exit_code());
    }
}

fn verbosity_filter(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    }
}

/// Log lines go to stderr; stdout carries snapshots and reports.
fn init_tracing(count: u8) {
    let filter = verbosity_filter(count);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::info!("log level: {}", filter);
}
