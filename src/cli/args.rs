use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rollfinder",
    version,
    about = "static cinnamon roll catalog renderer",
    long_about = "rollfinder loads the cinnamon roll dataset and renders the catalog pages: a searchable card grid (index) or a single-record view (detail).\n\nExamples:\n  rollfinder --base docs\n  rollfinder --base https://rolls.example/ -q taipei -o index.html\n  rollfinder --page detail --id 3 -A json\n  rollfinder --init-config\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored status output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (html, json, text)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.rollfinder/config.yml when present)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config file to the config path and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'b',
        long = "base",
        visible_alias = "site",
        value_name = "URL|DIR",
        help_heading = "Input",
        help = "Site root the dataset path is resolved against (http(s) URL or directory)."
    )]
    pub base: Option<String>,

    #[arg(
        short = 'D',
        long = "dp",
        visible_alias = "data-path",
        value_name = "PATH",
        help_heading = "Input",
        help = "Dataset resource path relative to the site root."
    )]
    pub data_path: Option<String>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "MODE",
        help_heading = "Page",
        help = "Page mode to render (index or detail)."
    )]
    pub page: Option<String>,

    #[arg(
        short = 'q',
        long = "query",
        visible_alias = "search",
        value_name = "KEYWORD",
        help_heading = "Page",
        help = "Search keyword typed into the index page."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'i',
        long = "id",
        value_name = "ID",
        help_heading = "Page",
        help = "Record id for the detail page (shorthand for --location '?id=ID')."
    )]
    pub id: Option<u64>,

    #[arg(
        short = 'l',
        long = "loc",
        visible_alias = "location",
        value_name = "QUERY",
        help_heading = "Page",
        help = "Detail page query string (e.g. '?id=3')."
    )]
    pub location: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Dataset fetch timeout in seconds (no timeout when unset)."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "np",
        visible_alias = "no-proxy",
        help_heading = "HTTP",
        help = "Ignore proxy settings from the environment."
    )]
    pub no_proxy: bool,

    #[arg(
        short = 'L',
        long = "lc",
        visible_alias = "locale",
        value_name = "LOCALE",
        help_heading = "Presentation",
        help = "Message locale (zh-Hant, en)."
    )]
    pub locale: Option<String>,

    #[arg(
        long = "dpg",
        visible_alias = "detail-page",
        value_name = "FILE",
        help_heading = "Presentation",
        help = "Detail page file name used in card links."
    )]
    pub detail_page: Option<String>,

    #[arg(
        long = "cph",
        visible_alias = "card-placeholder",
        value_name = "URL",
        help_heading = "Presentation",
        help = "Image URL used on cards without a photo."
    )]
    pub card_placeholder: Option<String>,

    #[arg(
        long = "hph",
        visible_alias = "hero-placeholder",
        value_name = "URL",
        help_heading = "Presentation",
        help = "Image URL used on the detail hero without a photo."
    )]
    pub hero_placeholder: Option<String>,
}
