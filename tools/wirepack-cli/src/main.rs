use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

mod shape;

use shape::WidgetDocument;
use wirepack::Value;

#[derive(Parser)]
#[command(name = "wirepack")]
#[command(about = "JSON <-> wirepack encoding tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Decode binary input to JSON instead of encoding JSON to binary.
    #[arg(short = 'd', long)]
    decode: bool,

    /// Input file path; stdin when omitted.
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output file path; stdout when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// How to interpret the data.
    #[arg(long, value_enum, default_value_t = Shape::Any)]
    shape: Shape,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    /// Dynamic: any value tree the wire grammar can carry.
    Any,
    /// The typed widget document sample.
    Widget,
}

fn main() -> std::process::ExitCode {
    match try_main() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let data = read_input(cli.input.as_ref())?;
    let out = if cli.decode {
        decode_to_json(&data, cli.shape)?
    } else {
        encode_from_json(&data, cli.shape)?
    };
    write_output(cli.output.as_ref(), &out)
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("read input: {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("read stdin")?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, data).with_context(|| format!("write output: {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data).context("write stdout")?;
            stdout.flush().context("flush stdout")
        }
    }
}

fn encode_from_json(data: &[u8], shape: Shape) -> Result<Vec<u8>> {
    match shape {
        Shape::Any => {
            let json: serde_json::Value =
                serde_json::from_slice(data).context("invalid JSON input")?;
            wirepack::encode(&Value::from(&json)).context("encode")
        }
        Shape::Widget => {
            let doc: WidgetDocument =
                serde_json::from_slice(data).context("invalid JSON input")?;
            wirepack::encode(&doc).context("encode")
        }
    }
}

fn decode_to_json(data: &[u8], shape: Shape) -> Result<Vec<u8>> {
    let json = match shape {
        Shape::Any => {
            let mut value = Value::Nil;
            wirepack::decode(data, &mut value).context("decode")?;
            serde_json::to_vec(&serde_json::Value::from(value))?
        }
        Shape::Widget => {
            let mut doc = WidgetDocument::default();
            wirepack::decode(data, &mut doc).context("decode")?;
            serde_json::to_vec(&doc)?
        }
    };
    Ok(json)
}
