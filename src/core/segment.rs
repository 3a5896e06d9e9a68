use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unrecognized segment name: '{0}'")]
pub struct SegmentParseError(pub String);

/// One of the internal gene segments of the influenza A genome.
///
/// The variant order is the fixed column order of report output; ordered
/// collections keyed by `Segment` iterate in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "PB2")]
    Pb2,
    #[serde(rename = "PB1")]
    Pb1,
    #[serde(rename = "PA")]
    Pa,
    #[serde(rename = "NP")]
    Np,
    #[serde(rename = "NA")]
    Na,
    #[serde(rename = "MP")]
    Mp,
    #[serde(rename = "NS")]
    Ns,
}

impl Segment {
    /// All segments in report column order.
    pub const ALL: [Segment; 7] = [
        Segment::Pb2,
        Segment::Pb1,
        Segment::Pa,
        Segment::Np,
        Segment::Na,
        Segment::Mp,
        Segment::Ns,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Segment::Pb2 => "PB2",
            Segment::Pb1 => "PB1",
            Segment::Pa => "PA",
            Segment::Np => "NP",
            Segment::Na => "NA",
            Segment::Mp => "MP",
            Segment::Ns => "NS",
        }
    }
}

impl std::str::FromStr for Segment {
    type Err = SegmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PB2" => Ok(Segment::Pb2),
            "PB1" => Ok(Segment::Pb1),
            "PA" => Ok(Segment::Pa),
            "NP" => Ok(Segment::Np),
            "NA" => Ok(Segment::Na),
            "MP" => Ok(Segment::Mp),
            "NS" => Ok(Segment::Ns),
            other => Err(SegmentParseError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for segment in Segment::ALL {
            assert_eq!(segment.name().parse::<Segment>(), Ok(segment));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!("HA".parse::<Segment>().is_err());
        assert!("pb2".parse::<Segment>().is_err());
        assert!("".parse::<Segment>().is_err());
    }

    #[test]
    fn test_report_column_order() {
        let names: Vec<&str> = Segment::ALL.iter().map(Segment::name).collect();
        assert_eq!(names, ["PB2", "PB1", "PA", "NP", "NA", "MP", "NS"]);
    }

    #[test]
    fn test_ord_matches_column_order() {
        let mut sorted = Segment::ALL;
        sorted.sort();
        assert_eq!(sorted, Segment::ALL);
    }

    #[test]
    fn test_serde_uses_segment_names() {
        let json = serde_json::to_string(&Segment::Pb2).unwrap();
        assert_eq!(json, "\"PB2\"");
        let parsed: Segment = serde_json::from_str("\"NS\"").unwrap();
        assert_eq!(parsed, Segment::Ns);
    }
}
