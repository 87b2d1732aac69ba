//! pdftoc CLI - PDF outline inference tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftoc::{ExtractOptions, JsonFormat, Outline};

#[derive(Parser)]
#[command(name = "pdftoc")]
#[command(version)]
#[command(about = "Infer a heading outline from a PDF's text layer", long_about = None)]
struct Cli {
    /// Input PDF file (shorthand for `pdftoc extract <FILE>`)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of a single PDF as JSON
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory receiving one JSON outline per PDF
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        tuning: Tuning,
    },
}

/// Pipeline tuning flags shared by both subcommands.
#[derive(Args, Default)]
struct Tuning {
    /// Deepest heading level to emit (1-6)
    #[arg(long, value_name = "N")]
    max_levels: Option<usize>,

    /// Word-count cap above which a block is always body text
    #[arg(long, value_name = "N")]
    max_heading_words: Option<usize>,

    /// Relative tolerance around the body font size
    #[arg(long, value_name = "F")]
    size_tolerance: Option<f32>,

    /// Fraction of short label-like blocks that flags a form
    #[arg(long, value_name = "F")]
    form_threshold: Option<f32>,

    /// Gutter width multiplier for column detection
    #[arg(long, value_name = "F")]
    column_gap_ratio: Option<f32>,
}

impl Tuning {
    fn to_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::default();
        if let Some(levels) = self.max_levels {
            options = options.with_max_heading_levels(levels);
        }
        if let Some(words) = self.max_heading_words {
            options = options.with_max_heading_words(words);
        }
        if let Some(tolerance) = self.size_tolerance {
            options = options.with_body_size_tolerance(tolerance);
        }
        if let Some(threshold) = self.form_threshold {
            options = options.with_form_detection_threshold(threshold);
        }
        if let Some(ratio) = self.column_gap_ratio {
            options = options.with_column_gap_ratio(ratio);
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            pretty,
            tuning,
        }) => cmd_extract(&input, output.as_deref(), pretty, &tuning),
        Some(Commands::Batch {
            input,
            output,
            pretty,
            tuning,
        }) => cmd_batch(&input, &output, pretty, &tuning),
        None => {
            // Default behavior: extract to stdout if input is provided
            if let Some(input) = cli.input {
                cmd_extract(&input, None, false, &Tuning::default())
            } else {
                println!("{}", "Usage: pdftoc <FILE>".yellow());
                println!("       pdftoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    tuning: &Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = tuning.to_options();
    let format = json_format(pretty);

    // Unreadable documents still produce the empty outline, so batch
    // scripting over mixed corpora never aborts on one bad file.
    let json = match pdftoc::extract_file(input, &options) {
        Ok(outline) => pdftoc::render::to_json(&outline, format)?,
        Err(e) if e.is_document_failure() => {
            eprintln!("{} {}: {}", "Warning".yellow().bold(), input.display(), e);
            pdftoc::render::to_json(&Outline::empty(), format)?
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    pretty: bool,
    tuning: &Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = tuning.to_options();
    let format = json_format(pretty);

    let mut paths: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        println!(
            "{}",
            format!("No PDF files found in {}", input_dir.display()).yellow()
        );
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Extracting outlines...");

    let outcomes = pdftoc::run_batch(&paths, &options);

    let mut failed = 0usize;
    for outcome in &outcomes {
        let stem = outcome
            .path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy();
        let target = output_dir.join(format!("{}.json", stem));
        let json = pdftoc::render::to_json(&outcome.outline, format)?;
        fs::write(&target, &json)?;

        if let Some(ref message) = outcome.error {
            failed += 1;
            pb.println(format!(
                "{} {}: {}",
                "Failed".red(),
                outcome.path.display(),
                message
            ));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    let ok = outcomes.len() - failed;
    println!(
        "\n{} {} ok, {} failed",
        "Batch complete:".green().bold(),
        ok,
        failed
    );

    Ok(())
}

fn json_format(pretty: bool) -> JsonFormat {
    if pretty {
        JsonFormat::Pretty
    } else {
        JsonFormat::Compact
    }
}
