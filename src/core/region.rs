use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Failed to parse region '{0}': expected CHR, CHR:POS or CHR:START-END")]
    Parse(String),
}

/// A closed genomic interval on one chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct Region {
    chromosome: String,
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawRegion {
    chromosome: String,
    start: u64,
    end: u64,
}

impl TryFrom<RawRegion> for Region {
    type Error = RegionError;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        Region::new(raw.chromosome, raw.start, raw.end)
    }
}

impl Region {
    /// Create a region, rejecting an empty chromosome or an inverted interval.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidRegion` if the chromosome is blank or `end < start`.
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Result<Self, RegionError> {
        let chromosome = chromosome.into();
        if chromosome.trim().is_empty() {
            return Err(RegionError::InvalidRegion(
                "chromosome must not be empty".to_string(),
            ));
        }
        if end < start {
            return Err(RegionError::InvalidRegion(format!(
                "{chromosome}:{start}-{end} ends before it starts"
            )));
        }
        Ok(Self {
            chromosome,
            start,
            end,
        })
    }

    /// A region covering every coordinate of a chromosome
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidRegion` if the chromosome is blank.
    pub fn whole_chromosome(chromosome: impl Into<String>) -> Result<Self, RegionError> {
        Self::new(chromosome, 1, u64::MAX)
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Whether the region spans the whole chromosome, as built by [`Region::whole_chromosome`]
    #[must_use]
    pub fn is_whole_chromosome(&self) -> bool {
        self.start == 1 && self.end == u64::MAX
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((chromosome, coordinates)) = s.split_once(':') else {
            return Self::whole_chromosome(s);
        };

        let parse = |text: &str| {
            text.trim()
                .replace(',', "")
                .replace('_', "")
                .parse::<u64>()
                .map_err(|_| RegionError::Parse(s.to_string()))
        };

        match coordinates.split_once('-') {
            Some((start, end)) => Self::new(chromosome, parse(start)?, parse(end)?),
            None => {
                let position = parse(coordinates)?;
                Self::new(chromosome, position, position)
            }
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_whole_chromosome() {
            write!(f, "{}", self.chromosome)
        } else {
            write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_interval() {
        let err = Region::new("11", 190064, 190062).unwrap_err();
        assert!(matches!(err, RegionError::InvalidRegion(_)));
    }

    #[test]
    fn test_new_rejects_empty_chromosome() {
        assert!(Region::new("  ", 1, 2).is_err());
    }

    #[test]
    fn test_single_position_region() {
        let region = Region::new("9", 10099, 10099).unwrap();
        assert_eq!((region.start(), region.end()), (10099, 10099));
        assert!(!region.is_whole_chromosome());
        assert_eq!(region.to_string(), "9:10099-10099");
    }

    #[test]
    fn test_parse_forms() {
        let region: Region = "11:190062-190064".parse().unwrap();
        assert_eq!(region.chromosome(), "11");
        assert_eq!((region.start(), region.end()), (190062, 190064));

        let point: Region = "9:10,099".parse().unwrap();
        assert_eq!((point.start(), point.end()), (10099, 10099));

        let whole: Region = "X".parse().unwrap();
        assert_eq!(whole.start(), 1);
        assert_eq!(whole.end(), u64::MAX);
        assert_eq!(whole.to_string(), "X");
        assert!(whole.is_whole_chromosome());

        assert!(matches!(
            "11:abc-5".parse::<Region>(),
            Err(RegionError::Parse(_))
        ));
        assert!(matches!(
            "11:10-5".parse::<Region>(),
            Err(RegionError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Region =
            serde_json::from_str(r#"{"chromosome":"1","start":5,"end":9}"#).unwrap();
        assert_eq!(ok.end(), 9);
        assert!(serde_json::from_str::<Region>(r#"{"chromosome":"1","start":9,"end":5}"#).is_err());
    }
}
