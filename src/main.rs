// src/main.rs
mod cli;
mod logger;

use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "huff", version = "0.1.0")]
#[command(about = "Huffman-code text or files into a bit string and back.", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Text to process
    text: Option<String>,
    /// Read the input from a file instead
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn read(self) -> anyhow::Result<Vec<u8>> {
        cli::read_input(self.text, self.file.as_deref())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compress input and print the bit string, or save the message as JSON
    Encode {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a saved message
    Decode {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show each symbol's count and code word
    Table {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show the shape of the tree
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Round-trip "hello world!"
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Encode { input, output } => cli::encode(&input.read()?, output.as_deref(), &mut out),
        Commands::Decode { input, output } => cli::decode(&input, output.as_deref(), &mut out),
        Commands::Table { input } => cli::table(&input.read()?, &mut out),
        Commands::Tree { input } => cli::tree(&input.read()?, &mut out),
        Commands::Demo => cli::demo(&mut out),
    }
}
