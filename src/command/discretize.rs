use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use log::info;

use crate::core::ShapeInfo;
use crate::core::UNDEFINED_SYMBOL;
use crate::fileformat::open_text;
use crate::fileformat::StagedFile;
use crate::runtime::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct DiscretizeParams {
    pub shape_info: ShapeInfo,
    pub path_in: PathBuf,
    pub path_out: PathBuf,
}

pub struct Discretize {}

impl Discretize {
    ///////////////////////////////
    /// Turn predicted shape values into one symbol per position. Input lines hold the
    /// values of one sequence separated by commas or whitespace; NA marks an undefined
    /// position and '>' lines are headers
    pub fn run(params: &DiscretizeParams) -> anyhow::Result<usize> {
        let reader = open_text(&params.path_in)?;
        let mut out = StagedFile::create(&params.path_out)?;

        let mut num_lines = 0;
        let mut symbols: Vec<u8> = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with('>') {
                continue;
            }

            symbols.clear();
            for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                if token.eq_ignore_ascii_case("NA") || token.eq_ignore_ascii_case("nan") {
                    symbols.push(UNDEFINED_SYMBOL);
                    continue;
                }
                let value = token.parse::<f64>().map_err(|e| {
                    Error::file_not_valid(
                        &params.path_in,
                        Some(format!("line {}: '{}': {}", i + 1, token, e)),
                    )
                })?;
                symbols.push(params.shape_info.symbol(value));
            }
            out.write_all(&symbols)?;
            out.write_all(b"\n")?;
            num_lines += 1;
        }
        out.commit()?;

        info!(
            "Discretized {} sequences of {} with {}",
            num_lines,
            params.path_in.display(),
            params.shape_info.levels_str()
        );
        Ok(num_lines)
    }
}
