use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use qre::{Config, MatchResult, Matcher};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// The whole string must match
    Full,
    /// A prefix must match
    Start,
    /// A suffix must match
    End,
    /// First occurrence anywhere
    Search,
    /// Every occurrence
    All,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A matching pattern
    pattern: String,

    /// The string to match
    string: String,

    /// Print the generated regular expression instead of matching
    #[arg(long)]
    regex: bool,

    /// Ignore letter case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Let each space in the pattern match one or more spaces
    #[arg(long)]
    flexible_spaces: bool,

    #[arg(short, long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,
}

fn print_result(result: &MatchResult) {
    match serde_json::to_string(result) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("Failed to encode result: {err}"),
    }
    if !result.unnamed().is_empty() {
        let unnamed: Vec<_> = result.unnamed().iter().map(ToString::to_string).collect();
        println!("Unnamed groups: {unnamed:?}");
    }
}

fn run(args: &Args) -> qre::Result<bool> {
    let config = Config::new()
        .case_sensitive(!args.ignore_case)
        .flexible_spaces(args.flexible_spaces);
    let matcher = Matcher::with_config(&args.pattern, config)?;

    if args.regex {
        println!("{}", matcher.regex());
        return Ok(true);
    }

    let result = match args.mode {
        Mode::Full => matcher.match_full(&args.string)?,
        Mode::Start => matcher.match_start(&args.string)?,
        Mode::End => matcher.match_end(&args.string)?,
        Mode::Search => matcher.search(&args.string)?,
        Mode::All => {
            let all = matcher.search_all(&args.string)?;
            all.iter().for_each(print_result);
            return Ok(!all.is_empty());
        }
    };

    if result.is_match() {
        print_result(&result);
    }
    Ok(result.is_match())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}
