use std::path::PathBuf;

use anyhow::{bail, Context};
use cf_fan_lib::build::PartKind;
use cf_fan_lib::config::FanConfig;
use cf_fan_lib::monitor::FallbackMonitor;
use cf_fan_lib::use_case;

const USAGE: &str = "usage: cf-fan [--config <path>] [--print [<dir>]] [--only <part,part,...>]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    /// `Some(None)` prints into the configured export directory
    print: Option<Option<PathBuf>>,
    only: Vec<PartKind>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cf_fan=info,cf_fan_lib=info".into()),
        )
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = FanConfig::load(args.config.as_deref()).context("loading config")?;
    let dims = use_case::resolve_dimensions(&config)?;
    tracing::debug!("dimensions: {:?}", dims);
    let fan = use_case::default_fan(&dims);

    if let Some(dir) = args.print {
        let dir = dir
            .or_else(|| config.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("print"));
        let written = use_case::write_print_layout(&fan, &dir)
            .with_context(|| format!("writing print files to {}", dir.display()))?;
        tracing::info!("wrote {} files to {}", written.len(), dir.display());
        return Ok(());
    }

    let mut monitor = FallbackMonitor::from_config(&config.monitor);
    tracing::info!("monitor chain: {:?}", monitor.backend_names());

    if args.only.is_empty() {
        use_case::show_parts(&fan, &mut monitor)?;
    } else {
        use_case::show_selection(&fan, &args.only, &mut monitor)?;
    }
    Ok(())
}

/// `None` when help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Args>> {
    let mut parsed = Args::default();
    let mut pending: Option<String> = None;

    loop {
        let Some(arg) = pending.take().or_else(|| args.next()) else {
            break;
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--print" => match args.next() {
                Some(next) if next.starts_with("--") => {
                    parsed.print = Some(None);
                    pending = Some(next);
                }
                Some(dir) => parsed.print = Some(Some(PathBuf::from(dir))),
                None => parsed.print = Some(None),
            },
            "--only" => {
                let list = args.next().context("--only needs a part list")?;
                for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let kind = name.parse::<PartKind>().map_err(anyhow::Error::msg)?;
                    parsed.only.push(kind);
                }
            }
            other => bail!("unknown argument '{other}'\n{USAGE}"),
        }
    }

    Ok(Some(parsed))
}
