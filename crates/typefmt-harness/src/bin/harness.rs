//! CLI entrypoint for the typefmt conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use typefmt_core::spec::{Count, Segment, parse_format_string};
use typefmt_harness::fixtures::fixture_paths;
use typefmt_harness::structured_log::{ArtifactIndex, LogEmitter, LogLevel, now_utc};
use typefmt_harness::{
    ConformanceReport, FixtureArg, FixtureSet, RunMode, TestRunner, VerificationSummary,
};

/// Conformance tooling for typefmt.
#[derive(Debug, Parser)]
#[command(name = "typefmt-harness")]
#[command(about = "Conformance testing harness for typefmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the engine against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Output report path (JSON).
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// JSONL structured log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Also compare successful renders against the host C library.
        #[arg(long)]
        host_parity: bool,
    },
    /// Rewrite a fixture file's expected outputs from the host C library.
    Capture {
        /// Input fixture path.
        #[arg(long)]
        input: PathBuf,
        /// Output fixture path.
        #[arg(long)]
        output: PathBuf,
        /// Capture from the native renderer instead of the host.
        #[arg(long)]
        native: bool,
    },
    /// Format one string with typed arguments.
    Format {
        /// Format string.
        #[arg(long)]
        fmt: String,
        /// Argument as KIND:VALUE (signed, unsigned, double, pointer, char,
        /// string, enum, bool). Repeatable.
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Report errors instead of printing diagnostic text.
        #[arg(long)]
        strict: bool,
    },
    /// Render diff report between expected and actual text values.
    Diff {
        /// Expected text payload.
        #[arg(long)]
        expected: String,
        /// Actual text payload.
        #[arg(long)]
        actual: String,
    },
    /// Print the parsed segments of a format string.
    Explain {
        /// Format string.
        #[arg(long)]
        fmt: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            report_json,
            log,
            host_parity,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let mut fixture_sets = Vec::new();
            for path in fixture_paths(&fixture)? {
                match FixtureSet::from_file(&path) {
                    Ok(set) => fixture_sets.push(set),
                    Err(err) => eprintln!("Skipping {err}"),
                }
            }
            if fixture_sets.is_empty() {
                return Err(format!("No loadable fixtures in {}", fixture.display()).into());
            }

            let run_id = format!("run-{}", std::process::id());
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "fixture-verify", &run_id)?),
                None => None,
            };
            if let Some(emitter) = emitter.as_mut() {
                emitter.emit(LogLevel::Info, "run_start")?;
            }

            let mut results = Vec::new();
            for mode in [RunMode::Strict, RunMode::Soft] {
                let runner = parity_runner(TestRunner::new("fixture-verify", mode), host_parity)?;
                for set in &fixture_sets {
                    match emitter.as_mut() {
                        Some(emitter) => results.extend(runner.run_logged(set, emitter)?),
                        None => results.extend(runner.run(set)),
                    }
                }
            }

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("typefmt Conformance Report"),
                mode: String::from("strict+soft"),
                timestamp: now_utc(),
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}, host_mismatches={}",
                report_doc.summary.total,
                report_doc.summary.passed,
                report_doc.summary.failed,
                report_doc.summary.host_mismatches
            );

            let mut index = ArtifactIndex::new(&run_id, "fixture-verify");
            if let Some(report_path) = &report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(report_path, report_doc.to_markdown())?;
                index.add_file(report_path, "report_md")?;
            }
            if let Some(json_path) = &report_json {
                std::fs::write(json_path, report_doc.to_json())?;
                index.add_file(json_path, "report_json")?;
            }

            if let Some(mut emitter) = emitter {
                emitter.emit(
                    if report_doc.summary.all_passed() {
                        LogLevel::Info
                    } else {
                        LogLevel::Error
                    },
                    "run_finish",
                )?;
                emitter.flush()?;
                drop(emitter);
                if let Some(log_path) = &log {
                    index.add_file(log_path, "log")?;
                    let index_path = log_path.with_extension("index.json");
                    std::fs::write(&index_path, index.to_json()?)?;
                    eprintln!("Wrote artifact index to {}", index_path.display());
                }
            }

            if !report_doc.summary.all_passed() {
                for failure in report_doc.summary.failures() {
                    eprintln!("FAIL [{}] {}", failure.mode, failure.case_name);
                }
                return Err("Conformance verification failed".into());
            }
        }
        Command::Capture {
            input,
            output,
            native,
        } => {
            let set = FixtureSet::from_file(&input)?;
            let captured = if native {
                typefmt_harness::capture::capture_fixture_set(&set, typefmt_core::NativeBackend)?
            } else {
                capture_from_host(&set)?
            };
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, captured.to_json()?)?;
            eprintln!(
                "Captured {} cases from {} to {}",
                captured.cases.len(),
                input.display(),
                output.display()
            );
        }
        Command::Format { fmt, args, strict } => {
            let args = args
                .iter()
                .map(|raw| FixtureArg::from_cli(raw)?.to_arg_value())
                .collect::<Result<Vec<_>, _>>()?;
            if strict {
                println!("{}", typefmt_core::format_strict(&fmt, &args)?);
            } else {
                println!("{}", typefmt_core::format(&fmt, &args));
            }
        }
        Command::Diff { expected, actual } => {
            print!("{}", typefmt_harness::diff::render_diff(&expected, &actual));
        }
        Command::Explain { fmt } => {
            for segment in parse_format_string(&fmt)? {
                match segment {
                    Segment::Literal(text) => println!("literal {text:?}"),
                    Segment::Percent => println!("percent"),
                    Segment::Spec(spec) => {
                        let index = spec
                            .explicit_index
                            .map_or_else(|| String::from("next"), |i| (i + 1).to_string());
                        println!(
                            "spec conv={} arg={index} flags={:?} width={} precision={} length={:?}",
                            spec.conversion.letter(),
                            spec.flags,
                            describe_count(spec.width),
                            describe_count(spec.precision),
                            spec.length_hint,
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

fn describe_count(count: Count) -> String {
    match count {
        Count::None => String::from("-"),
        Count::Literal(n) => n.to_string(),
        Count::NextArg => String::from("*"),
        Count::Arg(i) => format!("*{}$", i + 1),
    }
}

#[cfg(feature = "host-libc")]
fn parity_runner(
    runner: TestRunner,
    host_parity: bool,
) -> Result<TestRunner, Box<dyn std::error::Error>> {
    Ok(if host_parity {
        runner.with_parity_backend(typefmt_harness::HostBackend)
    } else {
        runner
    })
}

#[cfg(not(feature = "host-libc"))]
fn parity_runner(
    runner: TestRunner,
    host_parity: bool,
) -> Result<TestRunner, Box<dyn std::error::Error>> {
    if host_parity {
        return Err("host parity needs the `host-libc` feature".into());
    }
    Ok(runner)
}

#[cfg(feature = "host-libc")]
fn capture_from_host(set: &FixtureSet) -> Result<FixtureSet, Box<dyn std::error::Error>> {
    Ok(typefmt_harness::capture::capture_fixture_set(
        set,
        typefmt_harness::HostBackend,
    )?)
}

#[cfg(not(feature = "host-libc"))]
fn capture_from_host(_set: &FixtureSet) -> Result<FixtureSet, Box<dyn std::error::Error>> {
    Err("host capture needs the `host-libc` feature; pass --native".into())
}
