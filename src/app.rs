use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use itertools::Itertools;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::loader::{DataSource, DatasetCache, LoaderOptions, DEFAULT_DATA_PATH};
use crate::output::{self, OutputFormat};
use crate::page::{Page, PageMode, PageState};
use crate::render::{Locale, Messages, RenderOptions};

const DEFAULT_BASE: &str = "docs";

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "rollfinder=debug",
        _ => "rollfinder=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!("{} {:<10}: {}", "::".bold(), label, value.cyan());
}

fn help_heading(arg: &clap::Arg) -> &str {
    arg.get_help_heading().unwrap_or("Options")
}

/// `-s, --long, --alias <VALUE>` for one argument.
fn flag_spec(arg: &clap::Arg) -> String {
    let mut names: Vec<String> = arg.get_short().map(|s| format!("-{s}")).into_iter().collect();
    names.extend(arg.get_long().map(|l| format!("--{l}")));
    for alias in arg.get_visible_aliases().unwrap_or_default() {
        let alias = format!("--{alias}");
        if !names.contains(&alias) {
            names.push(alias);
        }
    }
    let mut spec = names.join(", ");
    if arg.get_action().takes_values() {
        let value = arg
            .get_value_names()
            .and_then(|v| v.first())
            .map(|v| v.as_str())
            .unwrap_or("VALUE");
        spec.push_str(&format!(" <{value}>"));
    }
    spec
}

/// Help grouped by `help_heading`, headings in declaration order.
fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = format!(
        "{} {}\n",
        cmd.get_name(),
        cmd.get_version().unwrap_or_default()
    );
    if let Some(about) = cmd.get_long_about().or(cmd.get_about()) {
        out.push_str(&format!("{about}\n"));
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n", cmd.get_name()));

    let visible = || cmd.get_arguments().filter(|a| !a.is_hide_set());
    let headings: Vec<&str> = visible().map(help_heading).unique().collect();
    for heading in headings {
        out.push_str(&format!("\n{heading}:\n"));
        for arg in visible().filter(|a| help_heading(a) == heading) {
            let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            out.push_str(&format!("  {:<36} {}\n", flag_spec(arg), help.trim()));
        }
    }
    out
}

#[derive(Clone, Debug)]
struct RunConfig {
    source: DataSource,
    mode: PageMode,
    query: Option<String>,
    location: String,
    timeout: Option<Duration>,
    proxy: Option<String>,
    no_proxy: bool,
    render: RenderOptions,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
}

fn parse_page_mode(raw: &str) -> Result<PageMode, String> {
    PageMode::parse(raw).ok_or_else(|| format!("invalid page mode '{raw}'"))
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let base = args
        .base
        .or(cfg.base)
        .unwrap_or_else(|| DEFAULT_BASE.to_string());
    let base = if crate::utils::is_http_url(&base) {
        base
    } else {
        config::expand_tilde_string(&base)
    };
    let data_path = args
        .data_path
        .or(cfg.data_path)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let source = DataSource::resolve(&base, &data_path).map_err(|e| e.to_string())?;

    let cli_location = match (args.id, args.location) {
        (Some(id), _) => Some(format!("?id={id}")),
        (None, loc) => loc,
    };
    // A CLI page flag wins; otherwise a CLI id/location selects the detail
    // page before the config file's page setting is consulted.
    let mode = match (args.page.as_deref(), cli_location.is_some()) {
        (Some(raw), _) => parse_page_mode(raw)?,
        (None, true) => PageMode::Detail,
        (None, false) => match cfg.page.as_deref() {
            Some(raw) => parse_page_mode(raw)?,
            None if cfg.location.is_some() => PageMode::Detail,
            None => PageMode::Index,
        },
    };
    let location = cli_location.or(cfg.location).unwrap_or_default();

    let query = match mode {
        PageMode::Index => args.query.or(cfg.query),
        PageMode::Detail if args.query.is_some() => {
            return Err("--query only applies to the index page".to_string());
        }
        PageMode::Detail => None,
    };

    let timeout = match args.timeout.or(cfg.timeout) {
        Some(secs) => crate::utils::parse_timeout_seconds(secs)
            .map_err(|e| format!("invalid timeout: {e}"))?,
        None => None,
    };
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let no_proxy = args.no_proxy || cfg.no_proxy.unwrap_or(false);

    let locale = match args.locale.or(cfg.locale) {
        Some(raw) => Locale::parse(&raw).ok_or_else(|| format!("invalid locale '{raw}'"))?,
        None => Locale::default(),
    };
    let defaults = RenderOptions::default();
    let render = RenderOptions {
        messages: Messages::for_locale(locale),
        card_placeholder: args
            .card_placeholder
            .or(cfg.card_placeholder)
            .unwrap_or(defaults.card_placeholder),
        hero_placeholder: args
            .hero_placeholder
            .or(cfg.hero_placeholder)
            .unwrap_or(defaults.hero_placeholder),
        detail_page: args
            .detail_page
            .or(cfg.detail_page)
            .unwrap_or(defaults.detail_page),
    };

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };

    Ok(RunConfig {
        source,
        mode,
        query,
        location,
        timeout,
        proxy,
        no_proxy,
        render,
        output,
        output_format,
        no_color,
    })
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let now = Instant::now();

    let loader_options = LoaderOptions {
        timeout: run.timeout,
        proxy: run.proxy.clone(),
        no_proxy: run.no_proxy,
    };
    let cache = DatasetCache::with_options(run.source.clone(), &loader_options)
        .map_err(|e| e.to_string())?;
    format_kv_line("Source", &cache.source().describe());

    let mut page = Page::new(run.mode, &run.location);
    format_kv_line("Page", page.mode().as_str());
    if page.mode() == PageMode::Detail {
        format_kv_line("Location", page.location());
    }
    let state = page.bootstrap(&cache, &run.render).await;
    if let Some(query) = run.query.as_deref() {
        page.on_search_input(&cache, query, &run.render);
    }

    match state {
        PageState::Rendered => match run.mode {
            PageMode::Index => {
                format_kv_line("Records", &page.rendered_ids().len().to_string());
            }
            PageMode::Detail => {
                let outcome = match page.detail_outcome() {
                    Some(crate::render::DetailOutcome::Found(id)) => format!("found #{id}"),
                    _ => "not found".to_string(),
                };
                format_kv_line("Record", &outcome);
            }
        },
        _ => {
            let message = page.error_message().unwrap_or_default().to_string();
            eprintln!("{} {}", "[WRN]".bold().yellow(), message);
        }
    }

    let dataset = cache.get();
    let rendered = match run.output_format {
        OutputFormat::Html => output::render_html(&page, &run.render),
        OutputFormat::Json => {
            output::render_json(&output::build_report(&page, dataset.as_deref(), &run.render))
        }
        OutputFormat::Text => {
            output::render_text(&output::build_report(&page, dataset.as_deref(), &run.render))
        }
    };

    match run.output.as_deref() {
        Some(outfile_path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(outfile_path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
            format_kv_line("Output", outfile_path);
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write output: {e}"))?;
        }
    }

    eprintln!(
        "{} rendered in {}ms",
        ":: Completed ::".bold().green(),
        now.elapsed().as_millis()
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine config path".to_string())?;
        let written = config::ensure_default_config_file(&path)?;
        let verb = if written { "written" } else { "already exists" };
        format_kv_line("Config", &format!("{} ({verb})", path.display()));
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
