//! Panel Canvas layout tool.
//!
//! Reads a layout document on stdin and either reports the panels that
//! fail validation (`--check`) or prints the normalized document
//! (`--normalize`). Set `RUST_LOG=debug` for details.

use pc_core::document::{LayoutDocument, LoadReport, LoadedLayout, parse_layout};
use std::io::Read;
use std::process::ExitCode;

const USAGE: &str = "usage: pc-cli --check | --normalize  (layout JSON on stdin)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Check,
    Normalize,
}

impl Mode {
    fn from_arg(arg: Option<&str>) -> Option<Self> {
        match arg {
            Some("--check") => Some(Mode::Check),
            Some("--normalize") => Some(Mode::Normalize),
            _ => None,
        }
    }
}

/// One line per rejected panel.
fn report_lines(report: &LoadReport) -> Vec<String> {
    report
        .rejected
        .iter()
        .map(|r| match &r.id {
            Some(id) => format!("panel #{} ({id}): {}", r.index, r.reason),
            None => format!("panel #{}: {}", r.index, r.reason),
        })
        .collect()
}

fn summary(layout: &LoadedLayout) -> String {
    format!(
        "{} panel(s) kept, {} rejected, canvas {}x{}",
        layout.panels.len(),
        layout.report.rejected.len(),
        layout.canvas.width,
        layout.canvas.height
    )
}

fn normalize(layout: &LoadedLayout) -> serde_json::Result<String> {
    LayoutDocument::new(&layout.panels, &layout.canvas).to_json()
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(mode) = Mode::from_arg(args.get(1).map(|s| s.as_str())) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let mut text = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut text) {
        eprintln!("pc-cli: failed to read stdin: {e}");
        return ExitCode::FAILURE;
    }

    let layout = match parse_layout(&text) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("pc-cli: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::debug!("{}", summary(&layout));

    match mode {
        Mode::Check => {
            for line in report_lines(&layout.report) {
                println!("{line}");
            }
            eprintln!("{}", summary(&layout));
        }
        Mode::Normalize => match normalize(&layout) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("pc-cli --normalize error: {e}");
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}
