use std::fmt;

///////////////////////////////
/// Number of bases kept on each side of a motif occurrence, in motif orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Flank {
    pub left: usize,
    pub right: usize,
}

impl Flank {
    pub const NONE: Flank = Flank { left: 0, right: 0 };

    pub fn new(left: usize, right: usize) -> Flank {
        Flank { left, right }
    }

    /// Part of file names
    pub fn tag(&self) -> String {
        format!("l{}r{}", self.left, self.right)
    }
}

impl fmt::Display for Flank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.left, self.right)
    }
}

impl std::str::FromStr for Flank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (left, right) = s
            .split_once(':')
            .ok_or_else(|| format!("Flank must be given as LEFT:RIGHT, got '{}'", s))?;
        let left = left
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("Invalid left flank '{}': {}", left, e))?;
        let right = right
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("Invalid right flank '{}': {}", right, e))?;
        Ok(Flank { left, right })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_tag() {
        let f: Flank = "2:0".parse().unwrap();
        assert_eq!(f, Flank::new(2, 0));
        assert_eq!(f.tag(), "l2r0");
        assert_eq!(f.to_string(), "2:0");
        assert!("2".parse::<Flank>().is_err());
        assert!("a:1".parse::<Flank>().is_err());
        assert!("-1:1".parse::<Flank>().is_err());
    }
}
