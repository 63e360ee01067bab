//! framewire - Assemble length-prefixed binary frames from typed fields
//!
//! Each positional argument is a field in `kind[/prefix]:value` form. The
//! fields are appended in order to a single frame, which is then printed as
//! hex, written raw, or summarized.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use framewire_core::{ByteBuffer, Error, FieldValue, FrameConfig, LengthField, WriteBuffer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, Level};
use tracing_subscriber::EnvFilter;

/// Assemble length-prefixed binary frames from typed fields
#[derive(Parser, Debug)]
#[command(name = "framewire")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Fields to append, e.g. `bool:true short:-5 str/1:hello blob/2:beef`
    #[arg(required = true, value_name = "FIELD")]
    fields: Vec<FieldValue>,

    /// Width in bytes of the frame length prefix (0, 1, 2 or 4)
    #[arg(short, long, default_value = "0", env = "FRAMEWIRE_LENGTH_FIELD")]
    length_field: LengthField,

    /// Count the length prefix itself in the encoded frame length
    #[arg(long)]
    include_length_field: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "hex")]
    format: OutputFormat,

    /// Write the frame(s) to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// Print a blake3 checksum of each frame
    #[arg(long)]
    digest: bool,

    /// Emit the frame this many times from one reused buffer
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    repeat: u32,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Output format for finished frames
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Lowercase hex, one frame per line
    Hex,
    /// Raw frame bytes
    Raw,
    /// Field-by-field layout with offsets
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let frames = build_frames(&cli);
    let rendered = render(&cli, &frames)?;

    match &cli.output {
        Some(path) => {
            write_frame_file(path, &rendered, cli.force)?;
            info!("Wrote {} frame(s) to {}", frames.len(), path.display());
        }
        None => {
            if matches!(cli.format, OutputFormat::Raw) && is_terminal_stdout() {
                bail!("Refusing to write raw bytes to a terminal (use --output or --format hex)");
            }
            io::stdout()
                .write_all(&rendered)
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Build `repeat` frames, reusing one buffer between them
fn build_frames(cli: &Cli) -> Vec<ByteBuffer> {
    let config = FrameConfig::new()
        .length_field(cli.length_field)
        .includes_length_field(cli.include_length_field);
    let mut buffer = WriteBuffer::new(config);

    debug!(
        "Framing {} field(s) with a {}-byte length prefix",
        cli.fields.len(),
        cli.length_field
    );

    (0..cli.repeat)
        .map(|i| {
            for field in &cli.fields {
                trace!("Frame {}: appending {}", i + 1, field);
                buffer.append_value(field);
            }
            buffer.release()
        })
        .collect()
}

/// Render frames in the requested output format
fn render(cli: &Cli, frames: &[ByteBuffer]) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    for frame in frames {
        match cli.format {
            OutputFormat::Raw => out.extend_from_slice(frame.data()),
            OutputFormat::Hex => writeln!(out, "{}", hex::encode(frame.data()))?,
            OutputFormat::Summary => write_summary(&mut out, cli, frame)?,
        }
        if cli.digest {
            writeln!(out, "blake3 {}", frame_digest(frame))?;
        }
    }

    Ok(out)
}

/// Describe where each field landed inside a frame
fn write_summary(out: &mut impl Write, cli: &Cli, frame: &ByteBuffer) -> Result<()> {
    let prefix = cli.length_field.size();
    writeln!(out, "frame: {} bytes", frame.len())?;

    if prefix > 0 {
        writeln!(
            out,
            "  {:>6}  {:<8} {}",
            0,
            "length",
            hex::encode(&frame[..prefix])
        )?;
    }

    let mut offset = prefix;
    for field in &cli.fields {
        let len = field.encoded_len();
        writeln!(
            out,
            "  {:>6}  {:<8} {}",
            offset,
            field.kind(),
            hex::encode(&frame[offset..offset + len])
        )?;
        offset += len;
    }

    Ok(())
}

/// Compute a short hash of the frame (first 16 chars of blake3)
fn frame_digest(frame: &ByteBuffer) -> String {
    let hash = blake3::hash(frame.data());
    hash.to_hex()[..16].to_string()
}

fn is_terminal_stdout() -> bool {
    use std::io::IsTerminal;
    io::stdout().is_terminal()
}

/// Write rendered output to disk
fn write_frame_file(output_path: &Path, content: &[u8], force: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    fs::write(output_path, content).map_err(|e| Error::file_write(output_path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["framewire"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_build_frame_with_prefix() {
        let cli = cli(&["-l", "2", "hex:00010203040506070809"]);
        let frames = build_frames(&cli);
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..2], &[10, 0]);
        assert_eq!(frames[0].len(), 12);
    }

    #[test]
    fn test_build_frame_includes_prefix() {
        let cli = cli(&["-l", "2", "--include-length-field", "hex:00010203040506070809"]);
        let frames = build_frames(&cli);
        assert_eq!(&frames[0][..2], &[12, 0]);
    }

    #[test]
    fn test_repeat_reuses_buffer() {
        let cli = cli(&["-l", "1", "--repeat", "3", "str/1:abc"]);
        let frames = build_frames(&cli);
        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert_eq!(frame.data(), &[4, 3, b'a', b'b', b'c']);
        }
    }

    #[test]
    fn test_render_hex_with_digest() {
        let cli = cli(&["--digest", "bool:true", "short:1"]);
        let frames = build_frames(&cli);
        let out = String::from_utf8(render(&cli, &frames).unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("010100"));
        let digest = lines.next().unwrap();
        assert!(digest.starts_with("blake3 "));
        assert_eq!(digest.len(), "blake3 ".len() + 16);
    }

    #[test]
    fn test_render_summary() {
        let cli = cli(&["-l", "4", "--format", "summary", "long:7", "str/2:hi"]);
        let frames = build_frames(&cli);
        let out = String::from_utf8(render(&cli, &frames).unwrap()).unwrap();
        assert!(out.contains("frame: 12 bytes"));
        assert!(out.contains("length   08000000"));
        assert!(out.contains("long     07000000"));
        assert!(out.contains("str      02006869"));
    }

    #[test]
    fn test_invalid_field_is_rejected() {
        assert!(Cli::try_parse_from(["framewire", "float:1.5"]).is_err());
        assert!(Cli::try_parse_from(["framewire", "-l", "3", "byte:1"]).is_err());
        assert!(Cli::try_parse_from(["framewire", "--repeat", "0", "byte:1"]).is_err());
    }

    #[test]
    fn test_write_frame_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/frame.bin");

        write_frame_file(&path, &[1, 2, 3], false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);

        // Refuses to overwrite without --force
        assert!(write_frame_file(&path, &[4], false).is_err());
        write_frame_file(&path, &[4], true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![4]);
    }

    #[test]
    fn test_frame_digest() {
        let a = frame_digest(&ByteBuffer::from_vec(vec![1, 2, 3]));
        let b = frame_digest(&ByteBuffer::copy_from_slice(&[1, 2, 3]));
        let c = frame_digest(&ByteBuffer::from_vec(vec![3, 2, 1]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
