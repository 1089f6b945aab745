use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Error};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use resumark_core::{
    BuildRequest, PageRequest, ParseOptions, RewriteOptions, build_page, build_resume,
    parse_resume,
};

mod logging;

/// File name looked up next to the executable when `--template` is omitted.
const DEFAULT_TEMPLATE: &str = "resume_template.html";

#[derive(Parser, Debug)]
#[clap(name = "resumark", version, about = "Build static résumé pages from Markdown")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a résumé into an HTML template
    Build(BuildOpts),

    /// Print the parsed résumé as JSON
    Parse(ParseOpts),

    /// Render any Markdown file to a standalone HTML page
    Page(PageOpts),
}

#[derive(Args, Debug)]
struct GrammarOpts {
    /// Leave the Links section out of the rendered sections
    #[clap(long)]
    drop_links_section: bool,

    /// Ignore bullet group headings inside jobs
    #[clap(long)]
    flat_bullets: bool,

    /// Render HTML comment lines instead of skipping them
    #[clap(long)]
    keep_comments: bool,
}

impl From<&GrammarOpts> for ParseOptions {
    fn from(opts: &GrammarOpts) -> Self {
        ParseOptions {
            drop_links_section: opts.drop_links_section,
            flat_bullets: opts.flat_bullets,
            keep_comments: opts.keep_comments,
        }
    }
}

#[derive(Args, Debug)]
struct BuildOpts {
    /// Résumé Markdown file
    input: PathBuf,

    /// HTML file to write
    output: PathBuf,

    /// JSON object passed to the template as __CONFIG_JSON__
    #[clap(long)]
    config: Option<PathBuf>,

    /// HTML template
    ///
    /// Defaults to resume_template.html next to the executable.
    #[clap(long)]
    template: Option<PathBuf>,

    #[clap(flatten)]
    grammar: GrammarOpts,
}

#[derive(Args, Debug)]
struct ParseOpts {
    /// Résumé Markdown file
    input: PathBuf,

    /// Pretty-print the JSON
    #[clap(long)]
    pretty: bool,

    #[clap(flatten)]
    grammar: GrammarOpts,
}

#[derive(Args, Debug)]
struct PageOpts {
    /// Markdown file (.md or .markdown)
    input: PathBuf,

    /// HTML file to write
    ///
    /// Defaults to the input path with an .html extension.
    output: Option<PathBuf>,

    /// HTML template with __TITLE__ and __CONTENT__ placeholders
    #[clap(long)]
    template: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Error> {
    match command {
        Commands::Build(opts) => build(opts).context("Failed to build résumé"),
        Commands::Parse(opts) => parse(opts).context("Failed to parse résumé"),
        Commands::Page(opts) => page(opts).context("Failed to build page"),
    }
}

fn build(opts: BuildOpts) -> Result<(), Error> {
    let template = match opts.template {
        Some(path) => path,
        None => default_template()?,
    };
    debug!(template = %template.display(), "using template");

    let report = build_resume(&BuildRequest {
        options: ParseOptions::from(&opts.grammar),
        input: opts.input,
        output: opts.output,
        template,
        config: opts.config,
    })?;

    println!("Wrote {}", report.output.display());
    Ok(())
}

fn parse(opts: ParseOpts) -> Result<(), Error> {
    let source = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("Failed to read {}", opts.input.display()))?;
    let document = parse_resume(&source, &ParseOptions::from(&opts.grammar));

    let json = if opts.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{json}");
    Ok(())
}

fn page(opts: PageOpts) -> Result<(), Error> {
    let report = build_page(&PageRequest {
        input: opts.input,
        output: opts.output,
        template: opts.template,
        rewrite: RewriteOptions::default(),
    })?;

    println!("Wrote {}", report.output.display());
    Ok(())
}

fn default_template() -> Result<PathBuf, Error> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(dir.join(DEFAULT_TEMPLATE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_counts_across_subcommands() {
        let cli = Cli::parse_from(["resumark", "-vv", "parse", "cv.md", "--flat-bullets"]);
        assert_eq!(cli.verbose, 2);
        let Commands::Parse(opts) = cli.command else {
            panic!("expected parse");
        };
        assert!(opts.grammar.flat_bullets);
        assert!(!opts.pretty);
    }

    #[test]
    fn grammar_flags_map_to_parse_options() {
        let cli = Cli::parse_from([
            "resumark",
            "build",
            "cv.md",
            "out.html",
            "--drop-links-section",
            "--keep-comments",
        ]);
        let Commands::Build(opts) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(
            ParseOptions::from(&opts.grammar),
            ParseOptions {
                drop_links_section: true,
                flat_bullets: false,
                keep_comments: true,
            }
        );
    }
}
