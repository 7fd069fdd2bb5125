//! Canonical vacancy reasons and normalization of free-form input.
//!
//! Reasons arrive from legacy forms and imported spreadsheets in many
//! spellings: mixed case, underscores instead of spaces, Portuguese or
//! English wording, and UTF-8 text that was decoded as Latin-1 somewhere
//! along the way (`"FÃ©rias"`). Everything is folded into [`VacancyReason`]
//! at the boundary; input that matches nothing is rejected.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const REASON_JUSTIFIED_ABSENCE: &str = "justified_absence";
pub const REASON_UNJUSTIFIED_ABSENCE: &str = "unjustified_absence";
pub const REASON_SOCIAL_SECURITY_LEAVE: &str = "social_security_leave";
pub const REASON_VACATION: &str = "vacation";
pub const REASON_SUSPENSION: &str = "suspension";
pub const REASON_VACANT_POST: &str = "vacant_post";

/// All canonical reason strings, in display order.
pub const VALID_REASONS: &[&str] = &[
    REASON_JUSTIFIED_ABSENCE,
    REASON_UNJUSTIFIED_ABSENCE,
    REASON_SOCIAL_SECURITY_LEAVE,
    REASON_VACATION,
    REASON_SUSPENSION,
    REASON_VACANT_POST,
];

/// Latin-1 mis-decodings of UTF-8 accented letters seen in imported data.
const MOJIBAKE_REPAIRS: &[(&str, &str)] = &[
    ("Ã¡", "á"),
    ("Ã¢", "â"),
    ("Ã£", "ã"),
    ("Ã©", "é"),
    ("Ãª", "ê"),
    ("Ã\u{AD}", "í"),
    ("Ã³", "ó"),
    ("Ã´", "ô"),
    ("Ãµ", "õ"),
    ("Ãº", "ú"),
    ("Ã§", "ç"),
    ("Ã‰", "É"),
    ("Ã‡", "Ç"),
    ("Ãƒ", "Ã"),
    ("Ã•", "Õ"),
    ("Ã“", "Ó"),
];

/// Folded spelling -> canonical reason.
///
/// Keys are lowercase ASCII with single spaces, i.e. the output of
/// [`fold_reason_text`].
const REASON_ALIASES: &[(&str, VacancyReason)] = &[
    // justified absence
    ("justified absence", VacancyReason::JustifiedAbsence),
    ("falta justificada", VacancyReason::JustifiedAbsence),
    ("justificada", VacancyReason::JustifiedAbsence),
    ("falta abonada", VacancyReason::JustifiedAbsence),
    ("atestado", VacancyReason::JustifiedAbsence),
    ("atestado medico", VacancyReason::JustifiedAbsence),
    // unjustified absence
    ("unjustified absence", VacancyReason::UnjustifiedAbsence),
    ("falta injustificada", VacancyReason::UnjustifiedAbsence),
    ("falta nao justificada", VacancyReason::UnjustifiedAbsence),
    ("injustificada", VacancyReason::UnjustifiedAbsence),
    ("falta", VacancyReason::UnjustifiedAbsence),
    // social-security leave
    ("social security leave", VacancyReason::SocialSecurityLeave),
    ("afastamento inss", VacancyReason::SocialSecurityLeave),
    ("afastamento previdenciario", VacancyReason::SocialSecurityLeave),
    ("licenca inss", VacancyReason::SocialSecurityLeave),
    ("afastamento", VacancyReason::SocialSecurityLeave),
    ("inss", VacancyReason::SocialSecurityLeave),
    // vacation
    ("vacation", VacancyReason::Vacation),
    ("ferias", VacancyReason::Vacation),
    ("frias", VacancyReason::Vacation),
    // suspension
    ("suspension", VacancyReason::Suspension),
    ("suspensao", VacancyReason::Suspension),
    ("suspencao", VacancyReason::Suspension),
    ("suspenso", VacancyReason::Suspension),
    // structurally vacant post
    ("vacant post", VacancyReason::VacantPost),
    ("vacant", VacancyReason::VacantPost),
    ("posto vago", VacancyReason::VacantPost),
    ("vago", VacancyReason::VacantPost),
    ("vaga", VacancyReason::VacantPost),
];

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// Why a post-day is uncovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyReason {
    JustifiedAbsence,
    UnjustifiedAbsence,
    SocialSecurityLeave,
    Vacation,
    Suspension,
    VacantPost,
}

impl VacancyReason {
    /// All reasons, in display order.
    pub const ALL: [VacancyReason; 6] = [
        Self::JustifiedAbsence,
        Self::UnjustifiedAbsence,
        Self::SocialSecurityLeave,
        Self::Vacation,
        Self::Suspension,
        Self::VacantPost,
    ];

    /// Convert from the canonical database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            REASON_JUSTIFIED_ABSENCE => Ok(Self::JustifiedAbsence),
            REASON_UNJUSTIFIED_ABSENCE => Ok(Self::UnjustifiedAbsence),
            REASON_SOCIAL_SECURITY_LEAVE => Ok(Self::SocialSecurityLeave),
            REASON_VACATION => Ok(Self::Vacation),
            REASON_SUSPENSION => Ok(Self::Suspension),
            REASON_VACANT_POST => Ok(Self::VacantPost),
            _ => Err(format!(
                "Invalid vacancy reason '{s}'. Must be one of: {}",
                VALID_REASONS.join(", ")
            )),
        }
    }

    /// Convert to the canonical database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JustifiedAbsence => REASON_JUSTIFIED_ABSENCE,
            Self::UnjustifiedAbsence => REASON_UNJUSTIFIED_ABSENCE,
            Self::SocialSecurityLeave => REASON_SOCIAL_SECURITY_LEAVE,
            Self::Vacation => REASON_VACATION,
            Self::Suspension => REASON_SUSPENSION,
            Self::VacantPost => REASON_VACANT_POST,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::JustifiedAbsence => "Justified absence",
            Self::UnjustifiedAbsence => "Unjustified absence",
            Self::SocialSecurityLeave => "Social-security leave",
            Self::Vacation => "Vacation",
            Self::Suspension => "Suspension",
            Self::VacantPost => "Vacant post",
        }
    }

    /// `true` when the post itself has no incumbent, as opposed to an
    /// incumbent being temporarily away.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::VacantPost)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Map any known spelling of a reason to its canonical value.
///
/// Returns [`CoreError::Validation`] for empty or unrecognised input rather
/// than passing the text through.
pub fn normalize_reason(raw: &str) -> Result<VacancyReason, CoreError> {
    let folded = fold_reason_text(raw);
    if folded.is_empty() {
        return Err(CoreError::Validation(
            "Vacancy reason must not be empty".to_string(),
        ));
    }

    REASON_ALIASES
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, reason)| *reason)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Unrecognised vacancy reason '{}'. Must be one of: {}",
                raw.trim(),
                VALID_REASONS.join(", ")
            ))
        })
}

/// Reduce reason text to lowercase ASCII words separated by single spaces.
///
/// Repairs Latin-1 mojibake first, then strips accents. Replacement
/// characters and stray `?` left by lossy conversions are dropped.
pub fn fold_reason_text(raw: &str) -> String {
    let mut repaired = raw.trim().to_string();
    for (broken, fixed) in MOJIBAKE_REPAIRS {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }

    let ascii: String = repaired
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'í' | 'ì' | 'î' | 'ï' => Some('i'),
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => Some('o'),
            'ú' | 'ù' | 'û' | 'ü' => Some('u'),
            'ç' => Some('c'),
            '_' | '-' | '/' | '.' => Some(' '),
            '?' | '\u{FFFD}' => None,
            other => Some(other),
        })
        .collect();

    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}
