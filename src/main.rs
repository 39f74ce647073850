mod cli;

use std::{error::Error, fs, path::Path};

use json_diff::DiffOptions;
use json_patch::{Patch, PatchOptions};
use json_value::Value;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> Result<(), Box<dyn Error>> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "jiff=info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Diff {
            a,
            b,
            no_invertible,
            context,
        } => {
            let mut options = DiffOptions::default().invertible(!no_invertible);
            if let Some(size) = context {
                options = options.context(*size);
            }
            let patch = json_diff::diff_with(
                &read_document(a, cli.dates)?,
                &read_document(b, cli.dates)?,
                &options,
            );
            print_json(&patch, cli.pretty)
        }
        Command::Patch {
            patch,
            document,
            fuzzy,
        } => {
            let options = if *fuzzy {
                PatchOptions::default().fuzzy()
            } else {
                PatchOptions::default()
            };
            let mut document = read_document(document, cli.dates)?;
            json_patch::apply_in_place_with(&read_patch(patch)?, &mut document, &options)?;
            print_json(&document, cli.pretty)
        }
        Command::Inverse { patch } => {
            let inverse = json_patch::invert(&read_patch(patch)?)?;
            print_json(&inverse, cli.pretty)
        }
        Command::Rebase { patch, history } => {
            let history = history
                .iter()
                .map(|path| read_patch(path))
                .collect::<Result<Vec<_>, _>>()?;
            let rebased = json_patch::rebase(&history, &read_patch(patch)?)?;
            tracing::info!(history = history.len(), operations = rebased.len(), "rebased");
            print_json(&rebased, cli.pretty)
        }
    }
}

fn read_document(path: &Path, dates: bool) -> Result<Value, Box<dyn Error>> {
    let data = fs::read_to_string(path)?;
    let value = if dates {
        Value::from_json_str(&data)?
    } else {
        serde_json::from_str(&data)?
    };
    Ok(value)
}

fn read_patch(path: &Path) -> Result<Patch, Box<dyn Error>> {
    Ok(json_patch::parse_patch(&fs::read_to_string(path)?)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
