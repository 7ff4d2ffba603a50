// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Collations and coercibility
//!
//! Text values carry a collation (which implies a character set). When two
//! text operands meet, MySQL picks the collation of the operand with the
//! lowest coercibility; [`resolve_coercibility`] implements that pairing.
//!
//! The regular expression functions only need one property of the resolved
//! collation: whether it compares case-sensitively.

use std::fmt;
use std::str::FromStr;

use super::error::{Error, Result};

/// Character sets known to the collation catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    Binary,
    Ascii,
    Latin1,
    Utf8mb3,
    Utf8mb4,
}

impl CharacterSet {
    /// Maximum number of bytes a single character occupies
    pub fn max_length(&self) -> usize {
        match self {
            CharacterSet::Binary | CharacterSet::Ascii | CharacterSet::Latin1 => 1,
            CharacterSet::Utf8mb3 => 3,
            CharacterSet::Utf8mb4 => 4,
        }
    }

    /// Returns true for multi-byte Unicode character sets
    pub fn is_unicode(&self) -> bool {
        self.max_length() > 1
    }

    /// Character set name as used in SQL
    pub fn name(&self) -> &'static str {
        match self {
            CharacterSet::Binary => "binary",
            CharacterSet::Ascii => "ascii",
            CharacterSet::Latin1 => "latin1",
            CharacterSet::Utf8mb3 => "utf8mb3",
            CharacterSet::Utf8mb4 => "utf8mb4",
        }
    }
}

/// Collations supported by the expression layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collation {
    Binary,
    AsciiBin,
    AsciiGeneralCi,
    Latin1Bin,
    Latin1GeneralCs,
    Latin1SwedishCi,
    Utf8mb3Bin,
    Utf8mb3GeneralCi,
    Utf8mb4Bin,
    Utf8mb4GeneralCi,
    Utf8mb4UnicodeCi,
    #[default]
    Utf8mb40900Bin,
    Utf8mb40900AiCi,
    Utf8mb40900AsCi,
    Utf8mb40900AsCs,
}

/// All collations, used for name lookup
const ALL_COLLATIONS: &[Collation] = &[
    Collation::Binary,
    Collation::AsciiBin,
    Collation::AsciiGeneralCi,
    Collation::Latin1Bin,
    Collation::Latin1GeneralCs,
    Collation::Latin1SwedishCi,
    Collation::Utf8mb3Bin,
    Collation::Utf8mb3GeneralCi,
    Collation::Utf8mb4Bin,
    Collation::Utf8mb4GeneralCi,
    Collation::Utf8mb4UnicodeCi,
    Collation::Utf8mb40900Bin,
    Collation::Utf8mb40900AiCi,
    Collation::Utf8mb40900AsCi,
    Collation::Utf8mb40900AsCs,
];

impl Collation {
    /// Collation name as used in SQL
    pub fn name(&self) -> &'static str {
        match self {
            Collation::Binary => "binary",
            Collation::AsciiBin => "ascii_bin",
            Collation::AsciiGeneralCi => "ascii_general_ci",
            Collation::Latin1Bin => "latin1_bin",
            Collation::Latin1GeneralCs => "latin1_general_cs",
            Collation::Latin1SwedishCi => "latin1_swedish_ci",
            Collation::Utf8mb3Bin => "utf8mb3_bin",
            Collation::Utf8mb3GeneralCi => "utf8mb3_general_ci",
            Collation::Utf8mb4Bin => "utf8mb4_bin",
            Collation::Utf8mb4GeneralCi => "utf8mb4_general_ci",
            Collation::Utf8mb4UnicodeCi => "utf8mb4_unicode_ci",
            Collation::Utf8mb40900Bin => "utf8mb4_0900_bin",
            Collation::Utf8mb40900AiCi => "utf8mb4_0900_ai_ci",
            Collation::Utf8mb40900AsCi => "utf8mb4_0900_as_ci",
            Collation::Utf8mb40900AsCs => "utf8mb4_0900_as_cs",
        }
    }

    /// Character set this collation belongs to
    pub fn character_set(&self) -> CharacterSet {
        match self {
            Collation::Binary => CharacterSet::Binary,
            Collation::AsciiBin | Collation::AsciiGeneralCi => CharacterSet::Ascii,
            Collation::Latin1Bin | Collation::Latin1GeneralCs | Collation::Latin1SwedishCi => {
                CharacterSet::Latin1
            }
            Collation::Utf8mb3Bin | Collation::Utf8mb3GeneralCi => CharacterSet::Utf8mb3,
            Collation::Utf8mb4Bin
            | Collation::Utf8mb4GeneralCi
            | Collation::Utf8mb4UnicodeCi
            | Collation::Utf8mb40900Bin
            | Collation::Utf8mb40900AiCi
            | Collation::Utf8mb40900AsCi
            | Collation::Utf8mb40900AsCs => CharacterSet::Utf8mb4,
        }
    }

    /// Returns true if the collation compares code points directly
    pub fn is_binary(&self) -> bool {
        matches!(self, Collation::Binary) || self.name().ends_with("_bin")
    }

    /// Returns true if upper and lower case letters compare as different
    pub fn is_case_sensitive(&self) -> bool {
        !self.name().ends_with("_ci")
    }

    /// Look up a collation by name
    ///
    /// Accepts MySQL collation names as well as the short aliases used by
    /// `COLLATE(expr, 'NOCASE')` style calls.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        match lower.as_str() {
            "nocase" | "case_insensitive" => return Some(Collation::Utf8mb40900AiCi),
            "utf8_bin" => return Some(Collation::Utf8mb3Bin),
            "utf8_general_ci" => return Some(Collation::Utf8mb3GeneralCi),
            _ => {}
        }
        ALL_COLLATIONS.iter().copied().find(|c| c.name() == lower)
    }
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Collation::from_name(s).ok_or_else(|| Error::UnknownCollation(s.to_string()))
    }
}

/// How explicitly a collation was chosen; lower values win
///
/// See <https://dev.mysql.com/doc/refman/8.0/en/charset-collation-coercibility.html>
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Coercibility {
    /// An explicit COLLATE clause
    Explicit = 0,
    /// Concatenation of strings with different collations
    NoCollation = 1,
    /// Column value, stored routine parameter or local variable
    Implicit = 2,
    /// System constant such as USER() or VERSION()
    SystemConstant = 3,
    /// Literal string
    Coercible = 4,
    /// Numeric or temporal value
    Numeric = 5,
    /// NULL or an expression derived from NULL
    Ignorable = 6,
}

/// Pick the collation governing a pair of text operands
///
/// Lower coercibility wins. On a tie the collations must agree; otherwise a
/// Unicode character set wins over a single-byte one, and within a single
/// character set a `_bin` collation on the right takes priority over the left.
pub fn resolve_coercibility(
    left: Collation,
    left_coercibility: Coercibility,
    right: Collation,
    right_coercibility: Coercibility,
) -> Result<Collation> {
    if left_coercibility < right_coercibility {
        return Ok(left);
    }
    if left_coercibility > right_coercibility {
        return Ok(right);
    }
    if left == right {
        return Ok(left);
    }

    let left_charset = left.character_set();
    let right_charset = right.character_set();
    if left_charset != right_charset {
        return match (left_charset.is_unicode(), right_charset.is_unicode()) {
            (false, true) => Ok(right),
            (true, false) => Ok(left),
            _ => Err(Error::collation_illegal_mix(left.name(), right.name())),
        };
    }

    if right.is_binary() {
        Ok(right)
    } else {
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_sensitivity() {
        assert!(Collation::Binary.is_case_sensitive());
        assert!(Collation::Utf8mb40900Bin.is_case_sensitive());
        assert!(Collation::Utf8mb40900AsCs.is_case_sensitive());
        assert!(Collation::Latin1GeneralCs.is_case_sensitive());
        assert!(!Collation::Utf8mb40900AiCi.is_case_sensitive());
        assert!(!Collation::Utf8mb40900AsCi.is_case_sensitive());
        assert!(!Collation::Latin1SwedishCi.is_case_sensitive());
        assert!(Collation::default().is_case_sensitive());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            Collation::from_name("utf8mb4_0900_ai_ci"),
            Some(Collation::Utf8mb40900AiCi)
        );
        assert_eq!(
            Collation::from_name("UTF8MB4_0900_AS_CS"),
            Some(Collation::Utf8mb40900AsCs)
        );
        assert_eq!(Collation::from_name("NOCASE"), Some(Collation::Utf8mb40900AiCi));
        assert_eq!(Collation::from_name("binary"), Some(Collation::Binary));
        assert_eq!(Collation::from_name("klingon_ci"), None);
        assert!("klingon_ci".parse::<Collation>().is_err());
    }

    #[test]
    fn test_name_round_trip() {
        for collation in ALL_COLLATIONS {
            assert_eq!(Collation::from_name(collation.name()), Some(*collation));
        }
    }

    #[test]
    fn test_resolve_lower_coercibility_wins() {
        let resolved = resolve_coercibility(
            Collation::Utf8mb40900Bin,
            Coercibility::Coercible,
            Collation::Utf8mb40900AiCi,
            Coercibility::Explicit,
        )
        .unwrap();
        assert_eq!(resolved, Collation::Utf8mb40900AiCi);

        let resolved = resolve_coercibility(
            Collation::Utf8mb40900AiCi,
            Coercibility::Implicit,
            Collation::Utf8mb40900Bin,
            Coercibility::Coercible,
        )
        .unwrap();
        assert_eq!(resolved, Collation::Utf8mb40900AiCi);
    }

    #[test]
    fn test_resolve_tie_rules() {
        // Same charset: a _bin collation on the right takes priority
        let resolved = resolve_coercibility(
            Collation::Utf8mb40900AiCi,
            Coercibility::Implicit,
            Collation::Utf8mb4Bin,
            Coercibility::Implicit,
        )
        .unwrap();
        assert_eq!(resolved, Collation::Utf8mb4Bin);

        // Same charset, non-binary right: keep the left
        let resolved = resolve_coercibility(
            Collation::Utf8mb40900AsCs,
            Coercibility::Implicit,
            Collation::Utf8mb40900AiCi,
            Coercibility::Implicit,
        )
        .unwrap();
        assert_eq!(resolved, Collation::Utf8mb40900AsCs);

        // Unicode beats single byte
        let resolved = resolve_coercibility(
            Collation::Latin1SwedishCi,
            Coercibility::Implicit,
            Collation::Utf8mb40900Bin,
            Coercibility::Implicit,
        )
        .unwrap();
        assert_eq!(resolved, Collation::Utf8mb40900Bin);

        // Two single-byte charsets cannot be mixed
        let err = resolve_coercibility(
            Collation::Latin1Bin,
            Coercibility::Implicit,
            Collation::AsciiBin,
            Coercibility::Implicit,
        )
        .unwrap_err();
        assert!(matches!(err, Error::CollationIllegalMix { .. }));
    }
}
