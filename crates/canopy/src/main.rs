use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use canopy_core::config::Config;
use canopy_core::diff::{diff, DiffResult};
use canopy_core::metrics::{compute, Metrics};
use canopy_core::Tree;
use canopy_extract::pipeline;
use canopy_report::{json, text};

#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Normalize documents into canonical trees and compare extraction runs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one document into interchange JSON
    Extract {
        /// Path to the document
        path: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Single-line JSON regardless of config
        #[arg(long)]
        compact: bool,
    },
    /// Extract every supported document under a directory
    Batch {
        /// Directory to walk
        path: PathBuf,
        /// Directory receiving one .json per extracted document
        #[arg(short, long)]
        output: PathBuf,
        /// Single-line JSON regardless of config
        #[arg(long)]
        compact: bool,
    },
    /// Compare two interchange JSON files, or two directories of them
    Compare {
        left: PathBuf,
        right: PathBuf,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
        /// Exit with code 1 when any difference is found
        #[arg(long)]
        check: bool,
    },
    /// Create a default .canopy.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            path,
            output,
            compact,
        } => cmd_extract(&path, output.as_deref(), compact),
        Commands::Batch {
            path,
            output,
            compact,
        } => cmd_batch(&path, &output, compact),
        Commands::Compare {
            left,
            right,
            format,
            compact,
            check,
        } => cmd_compare(&left, &right, &format, compact, check),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_extract(path: &Path, output: Option<&Path>, compact: bool) -> Result<()> {
    let config = load_config(path);
    let tree = canopy_extract::extract_file(path)
        .with_context(|| format!("failed to extract '{}'", path.display()))?;
    let json = tree.to_json(!compact && config.output.pretty)?;
    match output {
        Some(out) => {
            std::fs::write(out, &json)
                .with_context(|| format!("failed to write '{}'", out.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_batch(dir: &Path, output: &Path, compact: bool) -> Result<()> {
    let config = load_config(dir);
    let pretty = !compact && config.output.pretty;

    let result = pipeline::extract_dir(dir, &config.batch);

    for failure in &result.failures {
        eprintln!(
            "Warning: failed to extract {}: {}",
            failure.path.display(),
            failure.error
        );
    }

    for doc in &result.documents {
        let rel = doc.path.strip_prefix(dir).unwrap_or(&doc.path);
        let target = output.join(rel).with_extension("json");
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        let json = doc.tree.to_json(pretty)?;
        std::fs::write(&target, &json)
            .with_context(|| format!("failed to write '{}'", target.display()))?;
    }

    println!(
        "Extracted {} document(s), skipped {}",
        result.documents.len(),
        result.failures.len()
    );
    Ok(())
}

fn cmd_compare(left: &Path, right: &Path, format: &str, compact: bool, check: bool) -> Result<()> {
    if format != "text" && format != "json" {
        anyhow::bail!("unknown output format '{format}' (expected 'text' or 'json')");
    }

    let passed = if left.is_dir() && right.is_dir() {
        compare_dirs(left, right, format, compact)?
    } else {
        compare_files(left, right, format, compact, check)?
    };

    if check && !passed {
        process::exit(1);
    }
    Ok(())
}

fn compare_files(
    left: &Path,
    right: &Path,
    format: &str,
    compact: bool,
    check: bool,
) -> Result<bool> {
    let (delta, metrics) = compare_pair(left, right)?;
    let passed = delta.is_empty();

    match format {
        "json" => println!("{}", json::format_report(&delta, &metrics, compact)),
        _ if check => {
            let (report, _) = text::format_check(&delta, &metrics);
            print!("{report}");
        }
        _ => print!("{}", text::format_report(&delta, &metrics)),
    }

    Ok(passed)
}

fn compare_dirs(left: &Path, right: &Path, format: &str, compact: bool) -> Result<bool> {
    let common = common_json_files(left, right)?;
    if common.is_empty() {
        anyhow::bail!(
            "no common .json files between '{}' and '{}'",
            left.display(),
            right.display()
        );
    }

    let mut results: Vec<(String, DiffResult, Metrics)> = Vec::with_capacity(common.len());
    for name in common {
        let (delta, metrics) = compare_pair(&left.join(&name), &right.join(&name))?;
        results.push((name, delta, metrics));
    }
    let passed = results.iter().all(|(_, delta, _)| delta.is_empty());

    if format == "json" {
        let entries: Vec<json::FileCompare<'_>> = results
            .iter()
            .map(|(file, delta, metrics)| json::FileCompare {
                file,
                diff: delta,
                metrics,
            })
            .collect();
        println!("{}", json::format_dir_report(&entries, compact));
    } else {
        for (file, delta, metrics) in &results {
            if delta.is_empty() {
                continue;
            }
            println!("{}: {}", "File".bold(), file);
            print!("{}", text::format_report(delta, metrics));
        }
        if passed {
            println!("No differences found between the two directories.");
        }
    }

    Ok(passed)
}

fn compare_pair(left: &Path, right: &Path) -> Result<(DiffResult, Metrics)> {
    let left_tree = load_tree(left)?;
    let right_tree = load_tree(right)?;
    let delta = diff(&left_tree, &right_tree);
    let metrics = compute(&left_tree, &right_tree, &delta);
    Ok((delta, metrics))
}

fn load_tree(path: &Path) -> Result<Tree> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Tree::from_json(&content)
        .with_context(|| format!("'{}' is not a canonical tree document", path.display()))
}

/// Names of .json files present in both directories, sorted.
fn common_json_files(left: &Path, right: &Path) -> Result<BTreeSet<String>> {
    let left_names = json_file_names(left)?;
    let right_names = json_file_names(right)?;
    Ok(left_names.intersection(&right_names).cloned().collect())
}

fn json_file_names(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.insert(name.to_string());
            }
        }
    }
    Ok(names)
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(".canopy.toml");
    if target.exists() && !force {
        anyhow::bail!(".canopy.toml already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created .canopy.toml with default configuration.");
    Ok(())
}

fn load_config(path: &Path) -> Config {
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(Path::new("."))
    };
    Config::load_or_default(dir)
}
