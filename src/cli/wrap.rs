use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use similar::TextDiff;

use super::io::{acquire_wrap_lock, hash_text, write_text_atomically};
use crate::batch::process;
use crate::error::TuckError;
use crate::position::{Position, Span};

const STDIN_PATH: &str = "-";

#[derive(Debug, Args)]
pub struct WrapArgs {
    #[arg(value_name = "FILE", help = "Python source file, or '-' to read stdin")]
    pub file: PathBuf,
    #[arg(
        long = "position",
        value_name = "LINE:COLUMN",
        required = true,
        help = "1-based cursor position of a construct to wrap (repeatable)"
    )]
    pub positions: Vec<String>,
    #[arg(
        long,
        conflicts_with = "json",
        help = "Print a unified diff instead of the rewritten text"
    )]
    pub diff: bool,
    #[arg(long, help = "Emit structured JSON output")]
    pub json: bool,
    #[arg(long = "in-place", help = "Write the rewritten text back to FILE")]
    pub in_place: bool,
}

#[derive(Debug, Serialize)]
pub struct WrapResponse {
    pub file: PathBuf,
    pub changed: bool,
    pub written: bool,
    pub spans: Vec<Span>,
    pub text: String,
}

pub enum WrapCommandOutput {
    Text(String),
    Json(WrapResponse),
}

pub fn run_wrap(args: WrapArgs) -> Result<WrapCommandOutput, TuckError> {
    let positions = args
        .positions
        .iter()
        .map(|value| value.parse::<Position>())
        .collect::<Result<Vec<_>, _>>()?;

    let from_stdin = args.file.as_os_str() == STDIN_PATH;
    if from_stdin && args.in_place {
        return Err(TuckError::InvalidRequest {
            message: "--in-place cannot be combined with reading from stdin".to_string(),
        });
    }

    let _lock = if args.in_place {
        Some(acquire_wrap_lock(&args.file)?)
    } else {
        None
    };

    let (source, source_name) = if from_stdin {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|error| TuckError::io(Path::new("<stdin>"), error))?;
        (source, "<stdin>".to_string())
    } else {
        let source =
            fs::read_to_string(&args.file).map_err(|error| TuckError::io(&args.file, error))?;
        (source, args.file.display().to_string())
    };

    let processed = process(&positions, &source, &source_name)?;
    let changed = processed.text != source;

    let written = args.in_place && changed;
    if written {
        write_text_atomically(&args.file, &processed.text, &hash_text(&source))?;
        tracing::info!(file = %args.file.display(), "wrap.written");
    }

    if args.json {
        return Ok(WrapCommandOutput::Json(WrapResponse {
            file: args.file,
            changed,
            written,
            spans: processed.spans,
            text: processed.text,
        }));
    }

    if args.diff {
        return Ok(WrapCommandOutput::Text(unified_diff(&source, &processed.text)));
    }

    if args.in_place {
        return Ok(WrapCommandOutput::Text(String::new()));
    }

    Ok(WrapCommandOutput::Text(processed.text))
}

pub fn unified_diff(original: &str, formatted: &str) -> String {
    TextDiff::from_lines(original, formatted)
        .unified_diff()
        .header("original", "formatted")
        .to_string()
}
