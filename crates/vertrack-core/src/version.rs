//! Version parsing, comparison and drift classification.
//!
//! A version is 3 (Release) or 4 (Patch) dot-separated non-negative integers,
//! e.g. `25.8.2` or `25.8.1.1`. The first two segments form the *version
//! line* (`25.8`). Comparison pads the shorter version with zeros, so
//! `25.8.1` and `25.8.1.0` compare equal.
//!
//! Malformed input is rejected at parse time; the comparator and classifier
//! only ever see well-formed versions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError};

/// Segment count of a Release version (`major.minor.patch`)
pub const RELEASE_SEGMENTS: usize = 3;
/// Segment count of a Patch version (`major.minor.patch.sub`)
pub const PATCH_SEGMENTS: usize = 4;

/// A parsed, well-formed version
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u32>,
}

impl Version {
    /// Parse a 3- or 4-segment version string
    ///
    /// # Errors
    ///
    /// Returns `InvalidVersion` for empty segments, non-digit characters,
    /// values that overflow `u32`, or a segment count other than 3 or 4.
    pub fn parse(input: &str) -> Result<Self> {
        let segments = parse_segments(input)?;
        if segments.len() != RELEASE_SEGMENTS && segments.len() != PATCH_SEGMENTS {
            return Err(invalid(
                input,
                format!("expected 3 or 4 segments, found {}", segments.len()),
            ));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn major(&self) -> u32 {
        self.segment(0)
    }

    pub fn minor(&self) -> u32 {
        self.segment(1)
    }

    /// Third segment (patch number)
    pub fn patch(&self) -> u32 {
        self.segment(2)
    }

    /// True for 4-segment versions such as `25.8.1.1`
    pub fn is_patch(&self) -> bool {
        self.segments.len() == PATCH_SEGMENTS
    }

    /// The `major.minor` version line
    pub fn line(&self) -> String {
        format!("{}.{}", self.major(), self.minor())
    }

    /// True when both versions share `major.minor`
    pub fn same_line(&self, other: &Version) -> bool {
        self.major() == other.major() && self.minor() == other.minor()
    }

    /// Segment at `index`, treating missing trailing segments as 0
    fn segment(&self, index: usize) -> u32 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for Version {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.segments.iter().map(u32::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Compare two version strings
///
/// # Errors
///
/// Returns `InvalidVersion` if either side is malformed.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}

/// Distance of a region's current version from its line's baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drift {
    Aligned,
    BehindOne,
    BehindMany,
    Ahead,
}

impl Drift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Drift::Aligned => "aligned",
            Drift::BehindOne => "behind_one",
            Drift::BehindMany => "behind_many",
            Drift::Ahead => "ahead",
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `current` against `baseline`
///
/// Behind on a different version line is always `BehindMany`. On the same
/// line only the patch segment decides one-vs-many; the fourth segment is
/// not consulted, so `25.8.1.1` against `25.8.2` is `BehindOne`.
pub fn classify(current: &Version, baseline: &Version) -> Drift {
    match current.cmp(baseline) {
        Ordering::Equal => Drift::Aligned,
        Ordering::Greater => Drift::Ahead,
        Ordering::Less => {
            if !current.same_line(baseline) {
                return Drift::BehindMany;
            }
            if baseline.patch().abs_diff(current.patch()) <= 1 {
                Drift::BehindOne
            } else {
                Drift::BehindMany
            }
        }
    }
}

/// Classify two version strings
///
/// # Errors
///
/// Returns `InvalidVersion` if either side is malformed.
pub fn classify_versions(current: &str, baseline: &str) -> Result<Drift> {
    Ok(classify(&Version::parse(current)?, &Version::parse(baseline)?))
}

/// Version line (`major.minor`) of a version string
///
/// # Errors
///
/// Returns `InvalidVersion` if the version is malformed.
pub fn version_line_of(version: &str) -> Result<String> {
    Ok(Version::parse(version)?.line())
}

/// Validate a `major.minor` version line identifier
///
/// # Errors
///
/// Returns `InvalidVersionLine` unless the input is exactly two integer
/// segments written without leading zeros.
pub fn validate_version_line(line: &str) -> Result<()> {
    let canonical = match parse_segments(line) {
        Ok(segments) if segments.len() == 2 => format!("{}.{}", segments[0], segments[1]),
        _ => String::new(),
    };
    if canonical != line {
        return Err(TrackerError::InvalidVersionLine {
            line: line.to_string(),
        });
    }
    Ok(())
}

fn parse_segments(input: &str) -> Result<Vec<u32>> {
    if input.trim().is_empty() {
        return Err(invalid(input, "version is empty".to_string()));
    }
    input
        .split('.')
        .map(|segment| {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(
                    input,
                    format!("segment '{}' is not a non-negative integer", segment),
                ));
            }
            segment
                .parse::<u32>()
                .map_err(|_| invalid(input, format!("segment '{}' is out of range", segment)))
        })
        .collect()
}

fn invalid(version: &str, reason: String) -> TrackerError {
    TrackerError::InvalidVersion {
        version: version.to_string(),
        reason,
    }
}
