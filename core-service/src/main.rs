//! VulnGuard CLI - CI gate
//!
//! # Usage
//!
//! ```bash
//! vulnguard analyze src/db.py --model model.json --fail-on-critical
//! git diff origin/main | vulnguard diff --fail-on-high
//! vulnguard train --data train_features.csv --test test_features.csv --out model.json
//! ```
//!
//! Results go to stdout as JSON, logs to stderr. Exit code 2 means the gate
//! tripped.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use vulnguard_core::constants::{APP_NAME, APP_VERSION, DEFAULT_TRAINING_DATA_PATH};
use vulnguard_core::logic::dataset::split_holdout;
use vulnguard_core::{
    evaluate, load_model, load_table, save_model, scan_diff, train_with, AlertLevel, Classifier,
    ExtractorConfig, ForestConfig, Pipeline,
};

/// Exit code when a gate flag trips
const GATE_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "vulnguard")]
#[command(version)]
#[command(about = "Lexical vulnerability scoring for snippets and diffs", long_about = None)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a snippet (file or stdin)
    Analyze {
        /// Input file, `-` or omitted for stdin
        input: Option<PathBuf>,
        /// Persisted model; without one the keyword fallback is used
        #[arg(long, env = "MODEL_PATH")]
        model: Option<PathBuf>,
        /// Exit with code 2 when the alert level is CRITICA
        #[arg(long)]
        fail_on_critical: bool,
    },
    /// Scan the added lines of a unified diff (file or stdin)
    Diff {
        /// Input file, `-` or omitted for stdin
        input: Option<PathBuf>,
        /// Exit with code 2 when any high-risk line is found
        #[arg(long)]
        fail_on_high: bool,
    },
    /// Train a random forest from a header-less feature table
    Train {
        #[arg(long, env = "TRAINING_DATA_PATH", default_value = DEFAULT_TRAINING_DATA_PATH)]
        data: PathBuf,
        /// Separate labeled table to evaluate on
        #[arg(long, conflicts_with = "holdout")]
        test: Option<PathBuf>,
        /// Hold out this share of the training table for evaluation
        #[arg(long)]
        holdout: Option<f64>,
        /// Where to write the trained model (JSON)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, env = "FOREST_ESTIMATORS", default_value_t = 50)]
        estimators: usize,
        #[arg(long, env = "FOREST_MIN_SAMPLES_LEAF", default_value_t = 5)]
        min_samples_leaf: usize,
        #[arg(long, env = "FOREST_SEED", default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{} v{}", APP_NAME, APP_VERSION);

    match cli.command {
        Commands::Analyze {
            input,
            model,
            fail_on_critical,
        } => {
            let text = read_input(input.as_deref())?;
            let classifier = match model {
                Some(path) => {
                    let model = load_model(&path)
                        .with_context(|| format!("loading model {}", path.display()))?;
                    Classifier::Trained(model.into())
                }
                None => {
                    log::info!("No model given, using fallback classifier");
                    Classifier::Fallback
                }
            };

            let result = Pipeline::new(classifier)
                .with_extractor(ExtractorConfig::from_env())
                .analyze(&text);
            print_json(&result, cli.pretty)?;

            if fail_on_critical && result.alert_level == AlertLevel::Critical {
                log::warn!("Gate failed: alert level {}", result.alert_level);
                return Ok(ExitCode::from(GATE_FAILED));
            }
        }

        Commands::Diff { input, fail_on_high } => {
            let diff = read_input(input.as_deref())?;
            let report = scan_diff(&diff);
            log::info!(
                "{} added lines, {} high risk, {} medium risk",
                report.summary.total_lines_analyzed,
                report.summary.high_risk_lines,
                report.summary.medium_risk_lines
            );
            print_json(&report, cli.pretty)?;

            if fail_on_high && report.summary.has_high_risk() {
                log::warn!("Gate failed: {} high-risk lines", report.summary.high_risk_lines);
                return Ok(ExitCode::from(GATE_FAILED));
            }
        }

        Commands::Train {
            data,
            test,
            holdout,
            out,
            estimators,
            min_samples_leaf,
            seed,
        } => {
            let config = ForestConfig {
                n_estimators: estimators,
                min_samples_leaf,
                seed,
                ..Default::default()
            };

            let samples = load_table(&data).with_context(|| format!("reading {}", data.display()))?;
            let (train_set, test_set) = match (test, holdout) {
                (Some(path), _) => {
                    let test_set =
                        load_table(&path).with_context(|| format!("reading {}", path.display()))?;
                    (samples, test_set)
                }
                (None, Some(ratio)) => split_holdout(&samples, ratio, seed),
                (None, None) => (samples, Vec::new()),
            };

            let model = train_with(&train_set, &config).context("training failed")?;

            if let Some(path) = &out {
                save_model(&model, path)?;
            }

            if test_set.is_empty() {
                print_json(model.metadata(), cli.pretty)?;
            } else {
                let report = evaluate(&model, &test_set).context("evaluation failed")?;
                print_json(
                    &serde_json::json!({ "model": model.metadata(), "evaluation": report }),
                    cli.pretty,
                )?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// File contents, or stdin for `None` / `-`
fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("reading {}", path.display()))?
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            buf
        }
    };
    Ok(decode_lossy(bytes))
}

/// Invalid UTF-8 sequences become U+FFFD instead of failing the run
fn decode_lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| {
        log::warn!("Input is not valid UTF-8, replacing invalid bytes");
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
