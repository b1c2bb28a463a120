//! Validation and canonicalization of instrument identifier mnemonics.
//!
//! Every command target (channel, trace, memory bank, trigger source) must be
//! one of a fixed set of tokens before it is allowed anywhere near the wire.
//! Inputs may be strings in any casing, or bare integers which are expanded
//! through the class's prefix rule (`1` becomes `"C1"` for channels).

use crate::error::ScpiError;

/// Category of identifier, each with its own whitelist of canonical tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierClass {
    /// Oscilloscope input channels (`C1`, `C2`).
    Channel,
    /// Math/function traces (`F1`, `F5`..`F8`).
    Trace,
    /// Waveform memory banks (`M1`..`M4`).
    MemoryBank,
    /// External trigger inputs (`EX`, `EX10`, `EX5`).
    ExternalTrigger,
    /// Mains line trigger source (`LINE`).
    LineTrigger,
    /// Function generator output channels (`1`, `2`).
    Output,
}

impl IdentifierClass {
    /// Canonical tokens accepted for this class, in canonical casing.
    pub const fn allowed(self) -> &'static [&'static str] {
        match self {
            Self::Channel => &["C1", "C2"],
            Self::Trace => &["F1", "F5", "F6", "F7", "F8"],
            Self::MemoryBank => &["M1", "M2", "M3", "M4"],
            Self::ExternalTrigger => &["EX", "EX10", "EX5"],
            Self::LineTrigger => &["LINE"],
            Self::Output => &["1", "2"],
        }
    }

    /// Prefix applied to integer shorthand, if this class accepts integers.
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Channel => Some("C"),
            Self::Trace => Some("F"),
            Self::MemoryBank => Some("M"),
            Self::Output => Some(""),
            Self::ExternalTrigger | Self::LineTrigger => None,
        }
    }

    /// Human-readable class name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Trace => "trace",
            Self::MemoryBank => "memory bank",
            Self::ExternalTrigger => "external trigger",
            Self::LineTrigger => "line trigger",
            Self::Output => "output channel",
        }
    }
}

/// Heterogeneous identifier input: a mnemonic string or an integer shorthand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentInput {
    Index(i64),
    Name(String),
}

impl From<i64> for IdentInput {
    fn from(value: i64) -> Self {
        IdentInput::Index(value)
    }
}

impl From<i32> for IdentInput {
    fn from(value: i32) -> Self {
        IdentInput::Index(value as i64)
    }
}

impl From<u32> for IdentInput {
    fn from(value: u32) -> Self {
        IdentInput::Index(value as i64)
    }
}

impl From<&str> for IdentInput {
    fn from(value: &str) -> Self {
        IdentInput::Name(value.to_string())
    }
}

impl From<String> for IdentInput {
    fn from(value: String) -> Self {
        IdentInput::Name(value)
    }
}

impl std::fmt::Display for IdentInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentInput::Index(n) => write!(f, "{n}"),
            IdentInput::Name(s) => f.write_str(s),
        }
    }
}

/// Whether whitelist comparison honors casing. Instruments accept mnemonics
/// case-insensitively, so that is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    #[default]
    Insensitive,
    Sensitive,
}

/// Normalize `input` against a single identifier class.
///
/// ```
/// use benchlink::{normalize, IdentifierClass};
///
/// assert_eq!(normalize(IdentifierClass::Channel, 1).unwrap(), "C1");
/// assert_eq!(normalize(IdentifierClass::Channel, "c2").unwrap(), "C2");
/// assert!(normalize(IdentifierClass::Channel, 3).is_err());
/// ```
pub fn normalize(
    class: IdentifierClass,
    input: impl Into<IdentInput>,
) -> Result<&'static str, ScpiError> {
    normalize_any(&[class], input)
}

/// Normalize `input` against the combined whitelists of several classes.
///
/// Command targets are often drawn from a union of classes (a trigger source
/// may be a channel or an external trigger input). Integer shorthand expands
/// through the first listed class that has a prefix rule.
pub fn normalize_any(
    classes: &[IdentifierClass],
    input: impl Into<IdentInput>,
) -> Result<&'static str, ScpiError> {
    normalize_with(classes, input, CaseSensitivity::default())
}

/// [`normalize_any`] with an explicit case-sensitivity mode.
pub fn normalize_with(
    classes: &[IdentifierClass],
    input: impl Into<IdentInput>,
    case: CaseSensitivity,
) -> Result<&'static str, ScpiError> {
    let input = input.into();
    let candidate = match &input {
        IdentInput::Index(n) => match classes.iter().find_map(|c| c.prefix()) {
            Some(prefix) => format!("{prefix}{n}"),
            None => return Err(invalid(classes, &input)),
        },
        IdentInput::Name(s) => s.clone(),
    };

    for class in classes {
        for &token in class.allowed() {
            let hit = match case {
                CaseSensitivity::Sensitive => candidate == token,
                CaseSensitivity::Insensitive => candidate.eq_ignore_ascii_case(token),
            };
            if hit {
                return Ok(token);
            }
        }
    }

    Err(invalid(classes, &input))
}

/// Normalize a free-form keyword against an ad-hoc whitelist.
///
/// Some parameter sets are not identifier classes but still enumerated (for
/// example trigger couplings, whose allowed set depends on the trigger
/// source). Matching is case-insensitive; the canonical casing is returned.
pub fn keyword(
    input: &str,
    allowed: &'static [&'static str],
    what: &'static str,
) -> Result<&'static str, ScpiError> {
    allowed
        .iter()
        .find(|token| input.eq_ignore_ascii_case(token))
        .copied()
        .ok_or_else(|| ScpiError::InvalidIdentifier {
            what,
            input: input.to_string(),
            allowed: allowed.to_vec(),
        })
}

fn invalid(classes: &[IdentifierClass], input: &IdentInput) -> ScpiError {
    let what = match classes {
        [single] => single.name(),
        _ => "identifier",
    };
    ScpiError::InvalidIdentifier {
        what,
        input: input.to_string(),
        allowed: classes.iter().flat_map(|c| c.allowed()).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_shorthand_matches_prefixed_string() {
        for n in 1..=2 {
            let from_int = normalize(IdentifierClass::Channel, n).unwrap();
            let from_str = normalize(IdentifierClass::Channel, format!("C{n}")).unwrap();
            assert_eq!(from_int, from_str);
        }
        for n in [1, 2, 3, 4] {
            let from_int = normalize(IdentifierClass::MemoryBank, n).unwrap();
            let from_str = normalize(IdentifierClass::MemoryBank, format!("M{n}")).unwrap();
            assert_eq!(from_int, from_str);
        }
    }

    #[test]
    fn case_insensitive_match_returns_canonical_casing() {
        assert_eq!(normalize(IdentifierClass::Channel, "c2").unwrap(), "C2");
        assert_eq!(normalize(IdentifierClass::LineTrigger, "line").unwrap(), "LINE");
        assert_eq!(
            normalize(IdentifierClass::ExternalTrigger, "ex10").unwrap(),
            "EX10"
        );
    }

    #[test]
    fn case_sensitive_mode_rejects_wrong_casing() {
        let result = normalize_with(
            &[IdentifierClass::Channel],
            "c2",
            CaseSensitivity::Sensitive,
        );
        assert!(matches!(result, Err(ScpiError::InvalidIdentifier { .. })));
        assert_eq!(
            normalize_with(&[IdentifierClass::Channel], "C2", CaseSensitivity::Sensitive).unwrap(),
            "C2"
        );
    }

    #[test]
    fn out_of_whitelist_integer_fails() {
        let err = normalize(IdentifierClass::Channel, 3).unwrap_err();
        match err {
            ScpiError::InvalidIdentifier { what, input, allowed } => {
                assert_eq!(what, "channel");
                assert_eq!(input, "3");
                assert_eq!(allowed, vec!["C1", "C2"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn integer_without_prefix_rule_fails() {
        let result = normalize(IdentifierClass::ExternalTrigger, 10);
        assert!(matches!(result, Err(ScpiError::InvalidIdentifier { .. })));
    }

    #[test]
    fn union_of_classes_uses_first_prefix_rule() {
        let classes = [IdentifierClass::Channel, IdentifierClass::ExternalTrigger];
        assert_eq!(normalize_any(&classes, 1).unwrap(), "C1");
        assert_eq!(normalize_any(&classes, "ex5").unwrap(), "EX5");
    }

    #[test]
    fn output_channels_expand_without_prefix() {
        assert_eq!(normalize(IdentifierClass::Output, 2).unwrap(), "2");
        assert!(normalize(IdentifierClass::Output, 3).is_err());
    }

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        const MODES: &[&str] = &["AUTO", "NORM", "SINGLE", "STOP"];
        assert_eq!(keyword("norm", MODES, "trigger mode").unwrap(), "NORM");
        let err = keyword("FAST", MODES, "trigger mode").unwrap_err();
        assert!(matches!(err, ScpiError::InvalidIdentifier { what: "trigger mode", .. }));
    }
}
