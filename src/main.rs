//! Main entry point for the infinizip CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use infinizip::{Cli, ZipExtractor};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let file = File::open(&cli.file).with_context(|| format!("cannot open {}", cli.file))?;
    let mut archive = ZipExtractor::open(BufReader::new(file))
        .with_context(|| format!("cannot read archive {}", cli.file))?;

    if cli.list {
        list_files(&archive);
        return Ok(());
    }

    let quiet = cli.quiet;
    archive.extract_all(Path::new(cli.output_dir()), |file| {
        if !quiet && file.codec.is_some() {
            println!("Successfully extracted {} ({} bytes)", file.file_name, file.size);
        }
    })?;

    Ok(())
}

/// Print one line per entry: sizes, local header offset, hash and name.
fn list_files<R: Read + Seek>(archive: &ZipExtractor<R>) {
    println!(
        "{:>10}  {:>10}  {:>10}  {:<32}  Name",
        "Length", "Size", "Offset", "Hash"
    );
    println!("{}", "-".repeat(80));

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;

    for entry in archive.entries() {
        println!(
            "{:>10}  {:>10}  {:>10}  {:<32}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            entry.lfh_offset,
            entry.hash_hex().unwrap_or_else(|| "-".to_string()),
            entry.file_name
        );
        total_uncompressed += entry.uncompressed_size;
        total_compressed += entry.compressed_size;
    }

    println!("{}", "-".repeat(80));
    println!(
        "{:>10}  {:>10}  {:>10}  {:<32}  {} files (central directory at {})",
        total_uncompressed,
        total_compressed,
        "",
        "",
        archive.entries().len(),
        archive.central_directory_offset()
    );
}
