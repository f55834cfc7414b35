use itertools::Itertools;

use crate::runtime::Error;

/// Symbol written for positions the shape predictor leaves undefined
pub const UNDEFINED_SYMBOL: u8 = b'.';

const LEVELS_PREFIX: &str = "lv";
const LEVELS_SEPARATOR: char = '_';

///////////////////////////////
/// Thresholds used to discretize one shape type. A value v gets the symbol 'A' + #{level <= v}
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeInfo {
    levels: Vec<f64>,
    levels_str: String,
}

impl ShapeInfo {
    /// 26 symbols, A-Z
    pub const MAX_LEVELS: usize = 25;

    pub fn new(levels: Vec<f64>) -> Result<ShapeInfo, Error> {
        if levels.is_empty() {
            return Err(Error::invalid_config("discretization needs at least one level"));
        }
        if levels.len() > Self::MAX_LEVELS {
            return Err(Error::invalid_config(format!(
                "at most {} levels supported, got {}",
                Self::MAX_LEVELS,
                levels.len()
            )));
        }
        if levels.iter().any(|l| !l.is_finite()) {
            return Err(Error::invalid_config("levels must be finite numbers"));
        }
        if !levels.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(Error::invalid_config(format!(
                "levels must be strictly increasing: {:?}",
                levels
            )));
        }

        // -0 and 0 discretize the same way; give them the same name
        let levels: Vec<f64> = levels
            .into_iter()
            .map(|l| if l == 0.0 { 0.0 } else { l })
            .collect();
        let levels_str = encode_levels(&levels);
        if decode_levels_str(&levels_str).as_deref() != Some(levels.as_slice()) {
            return Err(Error::invalid_config(format!(
                "levels {:?} do not survive the file name encoding {}",
                levels, levels_str
            )));
        }
        Ok(ShapeInfo { levels, levels_str })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Canonical encoding of the levels, used in file names
    pub fn levels_str(&self) -> &str {
        &self.levels_str
    }

    pub fn num_symbols(&self) -> usize {
        self.levels.len() + 1
    }

    pub fn symbol(&self, value: f64) -> u8 {
        b'A' + self.levels.partition_point(|&l| l <= value) as u8
    }
}

///////////////////////////////
/// Shortest round-trip rendering of each level joined by '_'. No float rendering contains '_',
/// so decode_levels_str recovers the list and the mapping is injective
pub fn encode_levels(levels: &[f64]) -> String {
    format!(
        "{}{}",
        LEVELS_PREFIX,
        levels.iter().map(|l| l.to_string()).join(&LEVELS_SEPARATOR.to_string())
    )
}

pub fn decode_levels_str(s: &str) -> Option<Vec<f64>> {
    let body = s.strip_prefix(LEVELS_PREFIX)?;
    if body.is_empty() {
        return Some(Vec::new());
    }
    body.split(LEVELS_SEPARATOR)
        .map(|part| part.parse::<f64>().ok())
        .collect()
}
