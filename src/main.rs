use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use tabular_io::{
    export, export_chunks, identify_separator, read_any, AppConfig, ReadOptions, WriteOptions,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage:
  tabular-io read <path> [--rows N]
  tabular-io sep <path>
  tabular-io split <path> <out> [--max-rows N] [--overwrite | --no-overwrite]
  tabular-io convert <in> <out>
options:
  --config <file>   configuration file (default: tabular-io.toml)";

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = take_value(&mut args, "--config")?;
    let config = AppConfig::load_or_default(Some(
        config_path.as_deref().unwrap_or("tabular-io.toml"),
    ));

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("tabular_io={}", config.logging.level).parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let read_options = ReadOptions::from_config(&config)?;
    let write_options = WriteOptions::from_config(&config)?;

    let Some(command) = args.first().cloned() else {
        bail!("{}", USAGE);
    };
    args.remove(0);

    match command.as_str() {
        "read" => {
            let rows = take_value(&mut args, "--rows")?
                .map(|n| n.parse::<usize>())
                .transpose()
                .context("--rows expects a number")?
                .unwrap_or(10);
            let path = positional(&args, 0)?;

            let table = read_any(path.as_path(), &read_options)
                .with_context(|| format!("reading {}", path.display()))?;
            println!(
                "{} rows x {} columns: {:?}",
                table.row_count(),
                table.column_count(),
                table.columns()
            );
            println!("{}", serde_json::to_string_pretty(&table.sample_json(rows))?);
        }
        "sep" => {
            let path = positional(&args, 0)?;
            let sep = identify_separator(&path)?;
            println!("{}", (sep as char).escape_default());
        }
        "split" => {
            let max_rows = take_value(&mut args, "--max-rows")?
                .map(|n| n.parse::<usize>())
                .transpose()
                .context("--max-rows expects a number")?
                .or(config.export.max_rows_per_chunk);
            let overwrite = overwrite_choice(&mut args, config.export.overwrite);
            let input = positional(&args, 0)?;
            let output = positional(&args, 1)?;

            let table = read_any(input.as_path(), &read_options)
                .with_context(|| format!("reading {}", input.display()))?;
            let paths = export_chunks(&table, &output, max_rows, overwrite, &write_options)?;
            for path in paths {
                println!("{}", path.display());
            }
        }
        "convert" => {
            let input = positional(&args, 0)?;
            let output = positional(&args, 1)?;

            let table = read_any(input.as_path(), &read_options)
                .with_context(|| format!("reading {}", input.display()))?;
            export(&table, &output, &write_options)?;
            tracing::info!(
                from = %input.display(),
                to = %output.display(),
                rows = table.row_count(),
                "Converted table"
            );
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

/// Removes both overwrite flags from `args`. `--no-overwrite` wins when both
/// are given; with neither, `default` applies.
fn overwrite_choice(args: &mut Vec<String>, default: bool) -> bool {
    let no_overwrite = take_flag(args, "--no-overwrite");
    let overwrite = take_flag(args, "--overwrite");
    match (no_overwrite, overwrite) {
        (true, _) => false,
        (false, true) => true,
        (false, false) => default,
    }
}

fn take_value(args: &mut Vec<String>, flag: &str) -> anyhow::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        bail!("{} expects a value", flag);
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn positional(args: &[String], index: usize) -> anyhow::Result<PathBuf> {
    args.get(index)
        .map(PathBuf::from)
        .with_context(|| format!("missing argument\n{}", USAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn both_overwrite_flags_are_consumed() {
        let mut rest = args(&["--no-overwrite", "in.csv", "--overwrite", "out.csv"]);
        assert!(!overwrite_choice(&mut rest, true));
        assert_eq!(rest, ["in.csv", "out.csv"]);
        assert_eq!(positional(&rest, 0).unwrap(), PathBuf::from("in.csv"));
    }

    #[test]
    fn overwrite_falls_back_to_config() {
        let mut rest = args(&["in.csv", "out.csv"]);
        assert!(overwrite_choice(&mut rest, true));
        assert!(!overwrite_choice(&mut rest, false));

        let mut rest = args(&["--overwrite", "in.csv", "out.csv"]);
        assert!(overwrite_choice(&mut rest, false));
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn value_flags_are_removed_with_their_value() {
        let mut rest = args(&["a.csv", "--max-rows", "5", "b.csv"]);
        assert_eq!(take_value(&mut rest, "--max-rows").unwrap().as_deref(), Some("5"));
        assert_eq!(rest, ["a.csv", "b.csv"]);
        assert!(take_value(&mut args(&["--rows"]), "--rows").is_err());
    }
}
