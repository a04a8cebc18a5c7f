//! Datacheck entries and false-positive matching.
//!
//! A datacheck entry is a structural complaint about highway data: a label
//! that violates naming conventions, a suspicious geometry, a malformed
//! source line.  Entries are not fatal — they are collected, matched against
//! a maintainer-supplied false-positive list, and the survivors are written
//! to `datacheck.log` and the database.
//!
//! Rendering format (one line, also the false-positive CSV format):
//!
//! ```text
//! root;label1;label2;label3;code;info
//! ```
//!
//! with empty slots for unused labels.

use std::fmt;

// ── Codes ─────────────────────────────────────────────────────────────────────

/// The datacheck rule taxonomy.
///
/// `info` content per code, where used: `DisconnectedRoute` carries the
/// adjacent root's expected connection point, `DuplicateCoords` and
/// `OutOfBounds` the coordinate pair, `HiddenJunction` the incident edge
/// count, `LongSegment`/`VisibleDistance` the distance in miles,
/// `SharpAngle` the angle in degrees, `MalformedLat`/`MalformedLon` the
/// offending parameter, `MalformedUrl` always `MISSING_ARG(S)`,
/// `LabelTooLong` the truncated tail, and the `Invalid*Char` codes the
/// character in question.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatacheckCode {
    BadAngle,
    BusWithI,
    DisconnectedRoute,
    DuplicateCoords,
    DuplicateLabel,
    HiddenJunction,
    HiddenTerminus,
    InterstateNoHyphen,
    InvalidFinalChar,
    InvalidFirstChar,
    LabelInvalidChar,
    LabelLooksHidden,
    LabelParens,
    LabelSelfref,
    LabelSlashes,
    LabelTooLong,
    LabelUnderscores,
    LacksGeneric,
    LongSegment,
    LongUnderscore,
    MalformedLat,
    MalformedLon,
    MalformedUrl,
    NonterminalUnderscore,
    OutOfBounds,
    SharpAngle,
    UsLetter,
    VisibleDistance,
    VisibleHiddenColoc,
}

impl DatacheckCode {
    pub fn as_str(self) -> &'static str {
        use DatacheckCode::*;
        match self {
            BadAngle => "BAD_ANGLE",
            BusWithI => "BUS_WITH_I",
            DisconnectedRoute => "DISCONNECTED_ROUTE",
            DuplicateCoords => "DUPLICATE_COORDS",
            DuplicateLabel => "DUPLICATE_LABEL",
            HiddenJunction => "HIDDEN_JUNCTION",
            HiddenTerminus => "HIDDEN_TERMINUS",
            InterstateNoHyphen => "INTERSTATE_NO_HYPHEN",
            InvalidFinalChar => "INVALID_FINAL_CHAR",
            InvalidFirstChar => "INVALID_FIRST_CHAR",
            LabelInvalidChar => "LABEL_INVALID_CHAR",
            LabelLooksHidden => "LABEL_LOOKS_HIDDEN",
            LabelParens => "LABEL_PARENS",
            LabelSelfref => "LABEL_SELFREF",
            LabelSlashes => "LABEL_SLASHES",
            LabelTooLong => "LABEL_TOO_LONG",
            LabelUnderscores => "LABEL_UNDERSCORES",
            LacksGeneric => "LACKS_GENERIC",
            LongSegment => "LONG_SEGMENT",
            LongUnderscore => "LONG_UNDERSCORE",
            MalformedLat => "MALFORMED_LAT",
            MalformedLon => "MALFORMED_LON",
            MalformedUrl => "MALFORMED_URL",
            NonterminalUnderscore => "NONTERMINAL_UNDERSCORE",
            OutOfBounds => "OUT_OF_BOUNDS",
            SharpAngle => "SHARP_ANGLE",
            UsLetter => "US_LETTER",
            VisibleDistance => "VISIBLE_DISTANCE",
            VisibleHiddenColoc => "VISIBLE_HIDDEN_COLOC",
        }
    }

    /// Codes that may never be suppressed via the false-positive list.
    /// FP file entries carrying one of these are rejected at load time.
    pub fn always_error(self) -> bool {
        use DatacheckCode::*;
        matches!(
            self,
            BadAngle
                | DisconnectedRoute
                | DuplicateLabel
                | HiddenTerminus
                | InterstateNoHyphen
                | InvalidFinalChar
                | InvalidFirstChar
                | LabelInvalidChar
                | LabelParens
                | LabelSlashes
                | LabelTooLong
                | LabelUnderscores
                | LongUnderscore
                | MalformedLat
                | MalformedLon
                | MalformedUrl
                | NonterminalUnderscore
                | UsLetter
        )
    }
}

impl fmt::Display for DatacheckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DatacheckCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use DatacheckCode::*;
        const ALL: [DatacheckCode; 29] = [
            BadAngle,
            BusWithI,
            DisconnectedRoute,
            DuplicateCoords,
            DuplicateLabel,
            HiddenJunction,
            HiddenTerminus,
            InterstateNoHyphen,
            InvalidFinalChar,
            InvalidFirstChar,
            LabelInvalidChar,
            LabelLooksHidden,
            LabelParens,
            LabelSelfref,
            LabelSlashes,
            LabelTooLong,
            LabelUnderscores,
            LacksGeneric,
            LongSegment,
            LongUnderscore,
            MalformedLat,
            MalformedLon,
            MalformedUrl,
            NonterminalUnderscore,
            OutOfBounds,
            SharpAngle,
            UsLetter,
            VisibleDistance,
            VisibleHiddenColoc,
        ];
        ALL.iter().copied().find(|c| c.as_str() == s).ok_or(())
    }
}

// ── Entries ───────────────────────────────────────────────────────────────────

/// One datacheck emission: the offending route's root, up to three related
/// waypoint labels, the rule code, and optional extra information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatacheckEntry {
    pub root: String,
    pub labels: Vec<String>,
    pub code: DatacheckCode,
    pub info: String,
    /// Set once the entry has been matched by a false-positive list entry.
    pub fp: bool,
}

impl DatacheckEntry {
    pub fn new(root: &str, labels: &[&str], code: DatacheckCode, info: impl Into<String>) -> Self {
        debug_assert!(labels.len() <= 3);
        Self {
            root: root.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            code,
            info: info.into(),
            fp: false,
        }
    }

    /// Whether the false-positive entry matches this error in every field
    /// except `info`.
    pub fn match_except_info(&self, fp: &FpEntry) -> bool {
        if self.root != fp.root || self.code.as_str() != fp.code {
            return false;
        }
        for (i, label) in self.labels.iter().enumerate().take(3) {
            if label != &fp.labels[i] {
                return false;
            }
        }
        true
    }

    /// Sort key: the rendered line, which groups by root, then labels,
    /// then code.
    pub fn sort_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DatacheckEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.root)?;
        for i in 0..3 {
            match self.labels.get(i) {
                Some(l) => write!(f, "{l};")?,
                None => write!(f, ";")?,
            }
        }
        write!(f, "{};{}", self.code, self.info)
    }
}

// ── False-positive entries ────────────────────────────────────────────────────

/// One row of the maintainer's false-positive CSV:
/// `root;label1;label2;label3;code;info`.
///
/// The code is kept as raw text: an FP entry with an unknown code simply
/// never matches and surfaces in the unmatched-FP log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FpEntry {
    pub root: String,
    pub labels: [String; 3],
    pub code: String,
    pub info: String,
}

impl fmt::Display for FpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{};{};{}",
            self.root, self.labels[0], self.labels[1], self.labels[2], self.code, self.info
        )
    }
}
