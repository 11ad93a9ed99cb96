//! Command-line interface for xsd2jsonschema

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsd2jsonschema::converters::XmlUsageVisitor;
#[cfg(feature = "cli")]
use xsd2jsonschema::{ConversionOptions, OutputFormat, Xsd2JsonSchema};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsd2jsonschema")]
#[command(author, version, about = "Converts XML Schema files into JSON Schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert XSD files to JSON Schema documents
    Convert {
        /// XSD files, relative to --xsd-dir
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Directory the XSD files are read from
        #[arg(long, default_value = ".")]
        xsd_dir: PathBuf,

        /// Directory the JSON files are written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// URI prefix of the generated document ids
        #[arg(long, default_value = xsd2jsonschema::DEFAULT_BASE_ID)]
        base_id: String,

        /// Regular expression removed from output file names
        #[arg(long)]
        mask: Option<String>,

        /// Write OpenAPI 3 documents instead of plain JSON Schema
        #[arg(long)]
        openapi: bool,

        /// Do not load or convert included files
        #[arg(long)]
        no_includes: bool,
    },

    /// Count tag usage in XSD files
    Usage {
        /// XSD files, relative to --xsd-dir
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Directory the XSD files are read from
        #[arg(long, default_value = ".")]
        xsd_dir: PathBuf,

        /// Sum the counts over all files
        #[arg(long)]
        sum: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            files,
            xsd_dir,
            output_dir,
            base_id,
            mask,
            openapi,
            no_includes,
        } => cmd_convert(files, xsd_dir, output_dir, base_id, mask, openapi, no_includes),
        Commands::Usage {
            files,
            xsd_dir,
            sum,
        } => cmd_usage(files, xsd_dir, sum),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_convert(
    files: Vec<PathBuf>,
    xsd_dir: PathBuf,
    output_dir: PathBuf,
    base_id: String,
    mask: Option<String>,
    openapi: bool,
    no_includes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConversionOptions::new()
        .with_xsd_base_dir(xsd_dir)
        .with_output_dir(output_dir)
        .with_base_id(base_id)
        .with_includes_enabled(!no_includes);
    if let Some(mask) = mask {
        options = options.with_mask(regex::Regex::new(&mask).map_err(xsd2jsonschema::Error::from)?);
    }
    if openapi {
        options = options.with_output_format(OutputFormat::OpenApi);
    }

    let mut x2j = Xsd2JsonSchema::new(options);
    let failures = x2j.process_all_schemas(&files);
    for path in x2j.write_files()? {
        println!("{}", path.display());
    }

    if failures.is_empty() {
        Ok(())
    } else {
        for (file, error) in &failures {
            eprintln!("{}: {}", file, error);
        }
        Err(format!("{} of {} file(s) failed", failures.len(), files.len()).into())
    }
}

#[cfg(feature = "cli")]
fn cmd_usage(files: Vec<PathBuf>, xsd_dir: PathBuf, sum: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut x2j = Xsd2JsonSchema::new(ConversionOptions::new().with_xsd_base_dir(xsd_dir));
    let mut visitor = if sum {
        XmlUsageVisitor::summed()
    } else {
        XmlUsageVisitor::new()
    };
    x2j.process_all_with(&files, &mut visitor)?;
    print!("{}", visitor.dump());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
