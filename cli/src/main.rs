//! stmtable CLI - bank statement transaction table extraction

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use stmtable::{
    ColumnRole, ConvertOptions, ConvertResult, ConverterRegistry, ExtractOptions, InputFormat,
    OutputFormat, StatementParser,
};

#[derive(Parser)]
#[command(name = "stmtable")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconstruct clean transaction tables from OCR'd bank statements", long_about = None)]
struct Cli {
    /// Input statement file (layout text or JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the transaction table of one statement
    Extract {
        /// Input statement file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Extract many statements into a directory
    Batch {
        /// Input statement files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show header, column roles and extraction statistics
    Inspect {
        /// Input statement file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Input representation
        #[arg(long = "input", value_enum, default_value = "auto")]
        input_format: InputArg,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: FormatArg,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Extra exclusion term (repeatable)
    #[arg(long = "exclude", value_name = "TERM")]
    exclude: Vec<String>,

    /// Input representation
    #[arg(long = "input", value_enum, default_value = "auto")]
    input_format: InputArg,

    /// Drop exact duplicate records
    #[arg(long)]
    dedupe: bool,

    /// Cell delimiter of layout text
    #[arg(long, default_value = "|", env = "STMTABLE_DELIMITER")]
    delimiter: char,
}

impl ExtractArgs {
    fn convert_options(&self) -> ConvertOptions {
        let extract = ExtractOptions::new()
            .with_delimiter(self.delimiter)
            .with_extra_exclusions(&self.exclude)
            .with_dedupe(self.dedupe);

        let mut options = ConvertOptions::new()
            .with_extract_options(extract)
            .with_format(self.format.output_format(self.compact));
        let forced: Option<InputFormat> = self.input_format.into();
        if let Some(format) = forced {
            options = options.with_input_format(format);
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Comma-separated values
    Csv,
    /// JSON with headers and rows
    Json,
    /// Markdown table
    Markdown,
}

impl FormatArg {
    fn output_format(self, compact: bool) -> OutputFormat {
        match self {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json if compact => OutputFormat::JsonCompact,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum InputArg {
    /// Detect from content
    Auto,
    /// Pipe-delimited layout text
    Layout,
    /// Cell-grid JSON
    Grid,
    /// OCR service retrieve payload
    Ocr,
    /// Language model JSON response
    Llm,
}

impl From<InputArg> for Option<InputFormat> {
    fn from(arg: InputArg) -> Self {
        match arg {
            InputArg::Auto => None,
            InputArg::Layout => Some(InputFormat::Layout),
            InputArg::Grid => Some(InputFormat::Grid),
            InputArg::Ocr => Some(InputFormat::OcrPayload),
            InputArg::Llm => Some(InputFormat::LlmResponse),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            extract,
        }) => cmd_extract(&input, output.as_deref(), &extract),
        Some(Commands::Batch {
            inputs,
            output,
            extract,
        }) => cmd_batch(&inputs, &output, &extract),
        Some(Commands::Inspect {
            input,
            input_format,
        }) => cmd_inspect(&input, input_format),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract to stdout if input is provided
            if let Some(input) = cli.input {
                let defaults = ExtractArgs {
                    format: FormatArg::Csv,
                    compact: false,
                    exclude: Vec::new(),
                    input_format: InputArg::Auto,
                    dedupe: false,
                    delimiter: '|',
                };
                cmd_extract(&input, None, &defaults)
            } else {
                println!("{}", "Usage: stmtable <FILE>".yellow());
                println!("       stmtable --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Convert through the registry when the extension is known, otherwise
/// detect the representation from content.
fn convert_path(
    registry: &ConverterRegistry,
    path: &Path,
    options: &ConvertOptions,
) -> stmtable::Result<ConvertResult> {
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| registry.supports(ext));
    if known {
        return registry.convert(path, options);
    }

    log::debug!("{}: unknown extension, detecting from content", path.display());
    let content = fs::read_to_string(path)?;
    let parser = StatementParser::from_content(&content, options.input_format, options.extract.clone())?;
    ConvertResult::render(parser.parse()?, options.output_format)
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ConverterRegistry::with_defaults();
    let result = convert_path(&registry, input, &args.convert_options())?;

    if let Some(path) = output {
        fs::write(path, &result.content)?;
        println!(
            "{} {} ({} transactions)",
            "Saved to".green(),
            path.display(),
            result.table.len()
        );
    } else {
        print!("{}", result.content);
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    args: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let registry = ConverterRegistry::with_defaults();
    let options = args.convert_options();
    let extension = options.output_format.extension();

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<(&PathBuf, stmtable::Result<ConvertResult>)> = inputs
        .par_iter()
        .map(|input| {
            let result = convert_path(&registry, input, &options);
            pb.inc(1);
            (input, result)
        })
        .collect();

    let mut failures: Vec<(&PathBuf, stmtable::Error)> = Vec::new();
    let mut written = 0usize;

    for (input, result) in results {
        match result {
            Ok(result) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let target = output_dir.join(format!("{}.{}", stem, extension));
                fs::write(&target, &result.content)?;
                written += 1;
            }
            Err(e) => failures.push((input, e)),
        }
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} statements written to {}",
        "Batch:".green().bold(),
        written,
        inputs.len(),
        output_dir.display()
    );
    for (path, error) in &failures {
        println!("  {} {}: {}", "✗".red(), path.display(), error);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} statements failed", failures.len()).into())
    }
}

fn cmd_inspect(input: &Path, input_format: InputArg) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(input)?;
    let parser = StatementParser::from_content(&content, input_format.into(), ExtractOptions::default())?;
    let table = parser.parse()?;

    println!("{}", "Statement Table".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Header".bold(), table.headers.join(" | "));

    println!();
    println!("{}", "Column Roles".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for role in ColumnRole::ALL {
        match table.roles.get(role) {
            Some(idx) => println!("{:>12}: {} ({})", role.to_string().bold(), idx, table.headers[idx]),
            None => println!("{:>12}: {}", role.to_string().bold(), "-".dimmed()),
        }
    }

    let stats = &table.stats;
    println!();
    println!("{}", "Extraction Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Lines read".bold(), stats.lines_read);
    println!("{}: {}", "Decoration lines".bold(), stats.decoration_lines);
    println!("{}: {}", "Rows tokenized".bold(), stats.rows_tokenized);
    println!("{}: {}", "Preamble rows".bold(), stats.preamble_rows);
    if stats.regions_scanned > 0 {
        println!(
            "{}: {} of {}",
            "Regions accepted".bold(),
            stats.regions_accepted,
            stats.regions_scanned
        );
    }
    println!("{}: {}", "Excluded rows".bold(), stats.excluded_rows);
    println!("{}: {}", "Continuations merged".bold(), stats.continuation_rows);
    println!("{}: {}", "Repeated headers".bold(), stats.repeated_headers);
    println!(
        "{}: {} (excluded {}, no digit {}, no date {})",
        "Rejected".bold(),
        stats.rejected_total(),
        stats.rejected_excluded,
        stats.rejected_no_digit,
        stats.rejected_no_date
    );
    println!("{}: {}", "Transactions".bold(), table.len().to_string().green());

    if let Some((first, last)) = table.period() {
        println!("{}: {} to {}", "Period".bold(), first, last);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "stmtable".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Bank statement transaction table extraction tool");
    println!();
    println!("License: MIT");
}
