// src/cli.rs

use anyhow::{Context, bail};
use huffman_codec::stats::format_bytes;
use huffman_codec::{
    CodeTable, EncodedMessage, FrequencyTable, HuffmanTree, Symbol, compress, decompress,
};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::info;

const DEMO_TEXT: &str = "hello world!";

/// Resolve the one input source a command was given.
pub fn read_input(text: Option<String>, file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match (text, file) {
        (Some(text), None) => Ok(text.into_bytes()),
        (None, Some(path)) => {
            fs::read(path).with_context(|| format!("Failed to read input file {}", path.display()))
        }
        (Some(_), Some(_)) => bail!("Give either TEXT or --file, not both."),
        (None, None) => bail!("No input: give TEXT or --file."),
    }
}

// Write through a uniquely named temp file in the target's directory, then
// rename it into place. The temp file is removed if any step fails.
fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(data)
        .with_context(|| format!("Failed to write {}", temp.path().display()))?;
    temp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Failed to move output into {}", path.display()))?;
    Ok(())
}

fn write_stats<W: Write>(out: &mut W, message: &EncodedMessage) -> anyhow::Result<()> {
    let stats = message.stats();
    writeln!(
        out,
        "input: {} ({} distinct symbols)",
        format_bytes(stats.input_bytes),
        stats.distinct_symbols
    )?;
    writeln!(
        out,
        "encoded: {} bits vs {} original ({:.1}% of original, {:.3} bits/symbol)",
        stats.encoded_bits,
        stats.original_bits(),
        stats.ratio() * 100.0,
        stats.bits_per_symbol()
    )?;
    Ok(())
}

pub fn encode<W: Write>(data: &[u8], output: Option<&Path>, out: &mut W) -> anyhow::Result<()> {
    let message = compress(data).context("Compression failed")?;

    match output {
        Some(path) => {
            let mut json = Vec::new();
            message.write_json(&mut json)?;
            write_atomic(path, &json)?;
            info!(path = %path.display(), "message saved");
            writeln!(out, "Message saved to {}", path.display())?;
        }
        None => writeln!(out, "{}", message.bits())?,
    }
    write_stats(out, &message)
}

pub fn decode<W: Write>(input: &Path, output: Option<&Path>, out: &mut W) -> anyhow::Result<()> {
    let file = fs::File::open(input)
        .with_context(|| format!("Failed to open message {}", input.display()))?;
    let message = EncodedMessage::read_json(file)
        .with_context(|| format!("Failed to load message {}", input.display()))?;
    let data = decompress(&message).context("Decompression failed")?;

    match output {
        Some(path) => {
            write_atomic(path, &data)?;
            writeln!(out, "Decoded {} to {}", format_bytes(data.len() as u64), path.display())?;
        }
        None => writeln!(out, "{}", String::from_utf8_lossy(&data))?,
    }
    Ok(())
}

pub fn table<W: Write>(data: &[u8], out: &mut W) -> anyhow::Result<()> {
    let freqs = FrequencyTable::from_bytes(data);
    let tree = HuffmanTree::from_frequencies(&freqs).context("Cannot build Huffman tree")?;
    let codes = CodeTable::from_tree(&tree);

    writeln!(out, "{:<10} {:>10}  code", "symbol", "count")?;
    for (byte, code) in codes.iter() {
        let symbol = Symbol::Byte(byte).to_string();
        writeln!(out, "{:<10} {:>10}  {}", symbol, freqs.count(byte), code)?;
    }
    writeln!(out, "total encoded length: {} bits", codes.encoded_len(&freqs))?;
    Ok(())
}

pub fn tree<W: Write>(data: &[u8], out: &mut W) -> anyhow::Result<()> {
    let tree = HuffmanTree::from_bytes(data).context("Cannot build Huffman tree")?;
    writeln!(out, "Huffman Tree Structure:")?;
    write!(out, "{tree}")?;
    Ok(())
}

pub fn demo<W: Write>(out: &mut W) -> anyhow::Result<()> {
    let message = compress(DEMO_TEXT.as_bytes())?;
    let restored = decompress(&message)?;
    writeln!(out, "encoded message : {}", message.bits())?;
    writeln!(out, "unencoded message = {}", String::from_utf8_lossy(&restored))?;
    write_stats(out, &message)
}
