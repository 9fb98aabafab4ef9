//! kiraz interpreter command-line.
//!
//! Loads exactly one source file, runs it in a fresh interpreter
//! session, and exits with status 1 if any diagnostic was reported.
//! `RUST_LOG` controls developer logging (e.g. `RUST_LOG=kiraz=debug`).

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kiraz::interpreter::Interpreter;

/// kiraz, Türkçe anahtar kelimeli küçük bir betik dili.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Çalıştırılacak kaynak dosyası.
    source: PathBuf,

    /// Programı çalıştırmak yerine sözdizimi ağacını yazdırır.
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("{} okunamadı", args.source.display()))?;
    let file_name = args.source.display().to_string();

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut interp = Interpreter::new(&mut stdout, &mut stderr);

    let result = if args.dump_ast {
        interp.dump_ast(&source, &file_name)
    } else {
        interp.run(&source, &file_name)
    };

    // Diagnostics are already on stderr; only the exit status is left.
    if result.is_err() {
        process::exit(1);
    }

    Ok(())
}
