//! HTML Partial CLI
//!
//! Usage:
//!   html-partial [OPTIONS] [FILES]...
//!
//! Options:
//!   -c, --config <FILE>             Configuration file (TOML format)
//!   -b, --base-path <PREFIX>        Prefix prepended to every partial src
//!   -t, --tag-name <NAME>           Partial element name
//!   -p, --variable-prefix <PREFIX>  Variable placeholder prefix
//!   -o, --out-dir <DIR>             Write results into DIR instead of stdout
//!   -h, --help                      Print help

use std::collections::HashSet;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use html_partial::{
    process_batch, Diagnostic, Input, NamedInput, PartialConfig, Processed, Reporter, Resolver,
    TracingReporter, INPUT_ORIGIN,
};

#[derive(Parser)]
#[command(name = "html-partial")]
#[command(about = "Replace <partial> tags in HTML documents with the files they reference")]
struct Cli {
    /// Input files (reads stdin if none are given)
    files: Vec<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix prepended to every partial src before reading it
    #[arg(short, long)]
    base_path: Option<String>,

    /// Element name of partial tags
    #[arg(short, long)]
    tag_name: Option<String>,

    /// Prefix marking variable placeholders in partial files
    #[arg(short = 'p', long)]
    variable_prefix: Option<String>,

    /// Directory to write resolved documents into
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Leave the resolved document unformatted
    #[arg(long)]
    no_pretty: bool,

    /// Do not stop on partials that include themselves
    #[arg(long)]
    no_cycle_check: bool,

    /// Show the offending tag in context for each error
    #[arg(long)]
    pretty_errors: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Prints each diagnostic with a source excerpt
struct ExcerptReporter;

impl Reporter for ExcerptReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        eprint!("{}", diagnostic.format());
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    // No files and an interactive stdin: show usage instead of waiting
    if cli.files.is_empty() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let reporter: &dyn Reporter = if cli.pretty_errors {
        &ExcerptReporter
    } else {
        &TracingReporter
    };
    let resolver = match Resolver::new(&config, reporter) {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed = false;
    let inputs = if cli.files.is_empty() {
        let mut buffer = String::new();
        match io::stdin().read_to_string(&mut buffer) {
            Ok(_) => vec![NamedInput::new(INPUT_ORIGIN, Input::Buffered(buffer))],
            Err(e) => {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        let mut inputs = Vec::new();
        for path in &cli.files {
            match open_input(path) {
                Ok(input) => inputs.push(NamedInput::new(path.display().to_string(), input)),
                Err(e) => {
                    error!("Error reading file '{}': {}", path.display(), e);
                    failed = true;
                }
            }
        }
        inputs
    };

    let mut claimed = HashSet::new();
    for processed in process_batch(&resolver, inputs) {
        let name = processed.name.clone();
        if processed.result.is_err() {
            failed = true;
        }
        let target = match cli.out_dir.as_deref() {
            Some(dir) => match claim_output(&name, dir, &mut claimed) {
                Ok(path) => Some(path),
                Err(path) => {
                    error!(
                        "Not writing '{}': '{}' is already the output of another input",
                        name,
                        path.display()
                    );
                    failed = true;
                    continue;
                }
            },
            None => None,
        };
        if let Err(e) = write_output(processed, target.as_deref()) {
            error!("Error writing '{}': {}", name, e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Defaults, then the config file, then command-line flags
fn load_config(cli: &Cli) -> Result<PartialConfig, html_partial::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => PartialConfig::from_file(path)?,
        None => PartialConfig::default(),
    };

    if let Some(base) = &cli.base_path {
        config.base_path = base.clone();
    }
    if let Some(tag) = &cli.tag_name {
        config.tag_name = tag.clone();
    }
    if let Some(prefix) = &cli.variable_prefix {
        config.variable_prefix = prefix.clone();
    }
    if cli.no_pretty {
        config.pretty_print = false;
    }
    if cli.no_cycle_check {
        config.detect_cycles = false;
    }

    config.validate()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Regular files are read whole; pipes and devices are passed on as streams
fn open_input(path: &Path) -> io::Result<Input> {
    if fs::metadata(path)?.is_file() {
        Ok(Input::Buffered(fs::read_to_string(path)?))
    } else {
        Ok(Input::Streamed(Box::new(fs::File::open(path)?)))
    }
}

/// Output path for `name` inside `out_dir`, or `Err` with that path when an
/// earlier input already claimed it
fn claim_output(name: &str, out_dir: &Path, claimed: &mut HashSet<PathBuf>) -> Result<PathBuf, PathBuf> {
    let file_name = Path::new(name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output.html".into());
    let path = out_dir.join(file_name);
    if claimed.insert(path.clone()) {
        Ok(path)
    } else {
        Err(path)
    }
}

/// Write to `target`, or to stdout when there is none
fn write_output(processed: Processed, target: Option<&Path>) -> io::Result<()> {
    let mut out: Box<dyn Write> = match target {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            Box::new(fs::File::create(path)?)
        }
        None => Box::new(io::stdout().lock()),
    };

    match processed.result {
        Ok(html) => out.write_all(html.as_bytes())?,
        // Rejected documents pass through unmodified
        Err(rejected) => match rejected.input {
            Input::Buffered(text) => out.write_all(text.as_bytes())?,
            Input::Streamed(mut stream) => {
                io::copy(&mut stream, &mut out)?;
            }
        },
    }
    out.flush()
}

fn print_intro() {
    println!(
        r#"HTML Partial - include HTML fragments with <partial> tags

USAGE:
    html-partial [OPTIONS] [FILES]...
    cat page.html | html-partial

OPTIONS:
    -c, --config <FILE>             Configuration file (TOML)
    -b, --base-path <PREFIX>        Prefix prepended to every src
    -t, --tag-name <NAME>           Partial element name (default: partial)
    -p, --variable-prefix <PREFIX>  Placeholder prefix (default: @@)
    -o, --out-dir <DIR>             Write results into DIR
    --no-pretty                     Do not reformat the output
    --no-cycle-check                Allow unbounded recursive includes
    --pretty-errors                 Show each error in context
    -v, --verbose                   Debug logging

TAG SYNTAX:
    <partial src="header.html" title="Home"/>
    <partial src="header.html" title="Home"></partial>

Inside header.html, every @@title is replaced by "Home"."#
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_same_file_name_is_claimed_once() {
        let out = Path::new("out");
        let mut claimed = HashSet::new();

        assert_eq!(
            claim_output("a/index.html", out, &mut claimed),
            Ok(PathBuf::from("out/index.html"))
        );
        assert_eq!(
            claim_output("b/index.html", out, &mut claimed),
            Err(PathBuf::from("out/index.html"))
        );
        assert_eq!(
            claim_output("b/about.html", out, &mut claimed),
            Ok(PathBuf::from("out/about.html"))
        );
    }

    #[test]
    fn test_nameless_input_gets_default_name() {
        let mut claimed = HashSet::new();
        assert_eq!(
            claim_output("..", Path::new("out"), &mut claimed),
            Ok(PathBuf::from("out/output.html"))
        );
    }

    #[test]
    fn test_write_output_creates_out_dir() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("site").join("index.html");
        let processed = Processed {
            name: "index.html".to_string(),
            result: Ok("<p>x</p>".to_string()),
        };

        write_output(processed, Some(&target)).unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "<p>x</p>");
    }
}
