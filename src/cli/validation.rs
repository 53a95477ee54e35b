use crate::cli::args::CliArgs;
use crate::output::OutputFormat;
use crate::page::PageMode;
use crate::render::Locale;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    let mode = match args.page.as_deref() {
        Some(raw) => Some(
            PageMode::parse(raw)
                .ok_or_else(|| format!("invalid --page '{raw}', expected index or detail"))?,
        ),
        None => None,
    };
    if let Some(raw) = args.locale.as_deref() {
        Locale::parse(raw).ok_or_else(|| format!("invalid --locale '{raw}', expected zh-Hant or en"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --output-format '{raw}', expected html, json or text"))?;
    }
    if let Some(timeout) = args.timeout {
        crate::utils::parse_timeout_seconds(timeout)
            .map_err(|e| format!("invalid --timeout '{timeout}': {e}"))?;
    }
    if args.id.is_some() && args.location.is_some() {
        return Err("use either --id or --location, not both".to_string());
    }
    if mode == Some(PageMode::Index) && (args.id.is_some() || args.location.is_some()) {
        return Err("--id/--location only apply to the detail page".to_string());
    }
    if mode == Some(PageMode::Detail) && args.query.is_some() {
        return Err("--query only applies to the index page".to_string());
    }
    Ok(())
}
