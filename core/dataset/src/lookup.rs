//! FILENAME: core/dataset/src/lookup.rs
//! Static lookup artifacts used to derive the synthetic dimensions.
//!
//! - `RegionTable`: full region name -> short postal code
//! - `AgeBands`: right-open 5-year intervals over a fixed age domain
//!
//! Neither lookup can fail on data. Unknown region names map to
//! `RegionCode::Missing` and out-of-domain ages map to `AgeBand::Unbanded`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

// ============================================================================
// REGION CODES
// ============================================================================

/// Text used when a missing region code is displayed.
pub const MISSING_REGION_LABEL: &str = "--";

/// Short code derived from a region name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionCode {
    /// The region was found in the table.
    Known(String),
    /// The region name has no entry in the table.
    Missing,
}

impl RegionCode {
    pub fn known(code: impl Into<String>) -> Self {
        RegionCode::Known(code.into())
    }

    pub fn as_known(&self) -> Option<&str> {
        match self {
            RegionCode::Known(code) => Some(code),
            RegionCode::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RegionCode::Missing)
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionCode::Known(code) => f.write_str(code),
            RegionCode::Missing => f.write_str(MISSING_REGION_LABEL),
        }
    }
}

const US_STATES: [(&str, &str); 50] = [
    ("Alabama", "AL"), ("Alaska", "AK"), ("Arizona", "AZ"), ("Arkansas", "AR"),
    ("California", "CA"), ("Colorado", "CO"), ("Connecticut", "CT"), ("Delaware", "DE"),
    ("Florida", "FL"), ("Georgia", "GA"), ("Hawaii", "HI"), ("Idaho", "ID"),
    ("Illinois", "IL"), ("Indiana", "IN"), ("Iowa", "IA"), ("Kansas", "KS"),
    ("Kentucky", "KY"), ("Louisiana", "LA"), ("Maine", "ME"), ("Maryland", "MD"),
    ("Massachusetts", "MA"), ("Michigan", "MI"), ("Minnesota", "MN"), ("Mississippi", "MS"),
    ("Missouri", "MO"), ("Montana", "MT"), ("Nebraska", "NE"), ("Nevada", "NV"),
    ("New Hampshire", "NH"), ("New Jersey", "NJ"), ("New Mexico", "NM"), ("New York", "NY"),
    ("North Carolina", "NC"), ("North Dakota", "ND"), ("Ohio", "OH"), ("Oklahoma", "OK"),
    ("Oregon", "OR"), ("Pennsylvania", "PA"), ("Rhode Island", "RI"), ("South Carolina", "SC"),
    ("South Dakota", "SD"), ("Tennessee", "TN"), ("Texas", "TX"), ("Utah", "UT"),
    ("Vermont", "VT"), ("Virginia", "VA"), ("Washington", "WA"), ("West Virginia", "WV"),
    ("Wisconsin", "WI"), ("Wyoming", "WY"),
];

/// Fixed region name -> code table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionTable {
    /// (name, code) pairs in declaration order.
    entries: Vec<(String, String)>,

    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl RegionTable {
    pub fn new<N, C>(entries: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(name, code)| (name.into(), code.into()))
            .collect();
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        RegionTable { entries, by_name }
    }

    /// The 50 US states with their postal abbreviations.
    pub fn us_states() -> Self {
        Self::new(US_STATES)
    }

    /// Looks up the code for a region name. Exact, case-sensitive match.
    pub fn lookup(&self, name: &str) -> RegionCode {
        let index = match self.by_name.get(name) {
            Some(&i) => Some(i),
            // by_name is skipped by serde; fall back to a scan after deserialization
            None if self.by_name.is_empty() => self.entries.iter().position(|(n, _)| n == name),
            None => None,
        };
        match index {
            Some(i) => RegionCode::Known(self.entries[i].1.clone()),
            None => RegionCode::Missing,
        }
    }

    /// Reverse lookup: the region name for a code.
    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| c == code)
            .map(|(name, _)| name.as_str())
    }

    /// All (name, code) pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// AGE BANDS
// ============================================================================

/// Age band assigned to a record.
/// Bands order by lower bound; `Unbanded` sorts after every band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    /// Half-open interval `[lower, upper)`.
    Band { lower: u32, upper: u32 },
    /// Age outside the banded domain.
    Unbanded,
}

impl AgeBand {
    pub fn contains(&self, age: u32) -> bool {
        match *self {
            AgeBand::Band { lower, upper } => lower <= age && age < upper,
            AgeBand::Unbanded => false,
        }
    }

    pub fn is_unbanded(&self) -> bool {
        matches!(self, AgeBand::Unbanded)
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeBand::Band { lower, upper } => write!(f, "[{},{})", lower, upper),
            AgeBand::Unbanded => f.write_str("unbanded"),
        }
    }
}

/// Band boundaries. Consecutive boundaries form right-open bands;
/// ages below the first or at/above the last boundary are unbanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBands {
    boundaries: Vec<u32>,
}

impl AgeBands {
    pub const STANDARD_START: u32 = 15;
    pub const STANDARD_END: u32 = 75;
    pub const STANDARD_WIDTH: u32 = 5;

    /// Equal-width bands covering `[start, end)`.
    pub fn new(start: u32, end: u32, width: u32) -> Result<Self, LookupError> {
        if width == 0 || end <= start || (end - start) % width != 0 {
            return Err(LookupError::InvalidAgeBands { start, end, width });
        }
        let boundaries = (start..=end).step_by(width as usize).collect();
        Ok(AgeBands { boundaries })
    }

    /// Bands [15,20), [20,25), ..., [70,75).
    pub fn standard() -> Self {
        AgeBands {
            boundaries: (Self::STANDARD_START..=Self::STANDARD_END)
                .step_by(Self::STANDARD_WIDTH as usize)
                .collect(),
        }
    }

    pub fn boundaries(&self) -> &[u32] {
        &self.boundaries
    }

    /// All bands in ascending order (without `Unbanded`).
    pub fn bands(&self) -> Vec<AgeBand> {
        self.boundaries
            .windows(2)
            .map(|w| AgeBand::Band { lower: w[0], upper: w[1] })
            .collect()
    }

    pub fn band_for(&self, age: u32) -> AgeBand {
        let (first, last) = match (self.boundaries.first(), self.boundaries.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return AgeBand::Unbanded,
        };
        if age < first || age >= last {
            return AgeBand::Unbanded;
        }
        // index of the first boundary strictly greater than age
        let upper_index = self.boundaries.partition_point(|&b| b <= age);
        AgeBand::Band {
            lower: self.boundaries[upper_index - 1],
            upper: self.boundaries[upper_index],
        }
    }
}

impl Default for AgeBands {
    fn default() -> Self {
        AgeBands::standard()
    }
}
