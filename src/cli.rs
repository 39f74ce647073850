use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Diff, patch, invert and rebase JSON documents with JSON Patch.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// Indent the JSON output.
    #[clap(long, global = true)]
    pub pretty: bool,
    /// Read ISO-8601 timestamps in input documents as dates.
    #[clap(long, global = true)]
    pub dates: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the patch that turns document A into document B.
    Diff {
        a: PathBuf,
        b: PathBuf,
        /// Do not emit the `test` operations needed to invert the patch.
        #[clap(long)]
        no_invertible: bool,
        /// Attach this many neighbours as context to array operations.
        #[clap(long)]
        context: Option<usize>,
    },
    /// Apply a patch to a document and print the result.
    Patch {
        patch: PathBuf,
        document: PathBuf,
        /// Use the context of array operations to find their position.
        #[clap(long)]
        fuzzy: bool,
    },
    /// Print the inverse of a patch.
    Inverse { patch: PathBuf },
    /// Rebase a patch onto the patches applied since it was made, oldest
    /// first.
    Rebase {
        patch: PathBuf,
        #[clap(required = true)]
        history: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
