//! Adjusted headcount computation for staffing posts.
//!
//! A post stores a *planned* headcount (people on duty at the same time) and
//! a schedule pattern. Alternating patterns such as 12x36 need several
//! people rotating through the same position, so the number of collaborators
//! that must be linked to the post is the planned headcount multiplied by a
//! per-pattern factor.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Schedule patterns
// ---------------------------------------------------------------------------

/// Recognised schedule patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulePattern {
    /// Regular weekly shift (5x2, 6x1, 44h, business hours).
    Standard,
    /// One 12-hour shift worked on alternating days.
    TwelveByThirtySix,
    /// Round-the-clock coverage built from a day pair and a night pair of 12x36.
    TwelveByThirtySixRoundTheClock,
    /// 24 hours on, 48 hours off.
    TwentyFourByFortyEight,
    /// 24 hours on, 72 hours off.
    TwentyFourBySeventyTwo,
    /// Anything not in the table. Keeps the planned headcount unchanged.
    Unknown,
}

impl SchedulePattern {
    /// Parse a free-form pattern label as stored on the post.
    ///
    /// Matching ignores case, surrounding whitespace and the spacing around
    /// the `x` separator (`"12 X 36"` is the same as `"12x36"`).
    pub fn parse(raw: &str) -> Self {
        let compact: String = raw
            .trim()
            .to_lowercase()
            .replace('×', "x")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();

        match compact.as_str() {
            "12x36" | "12x36diurno" | "12x36noturno" | "12x36dia" | "12x36noite" => {
                Self::TwelveByThirtySix
            }
            "12x3624h" | "24h" | "12x36diaenoite" | "12x36diurnoenoturno" => {
                Self::TwelveByThirtySixRoundTheClock
            }
            "24x48" => Self::TwentyFourByFortyEight,
            "24x72" => Self::TwentyFourBySeventyTwo,
            "5x2" | "6x1" | "5x1" | "44h" | "40h" | "comercial" | "standard" => Self::Standard,
            _ => Self::Unknown,
        }
    }

    /// How many collaborators rotate through one simultaneous position.
    pub fn multiplier(self) -> u32 {
        match self {
            Self::Standard | Self::Unknown => 1,
            Self::TwelveByThirtySix => 2,
            Self::TwentyFourByFortyEight => 3,
            Self::TwelveByThirtySixRoundTheClock | Self::TwentyFourBySeventyTwo => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Number of active collaborators a post needs to stay continuously staffed.
///
/// Negative planned headcounts (bad directory data) count as zero.
pub fn adjusted_headcount(schedule_pattern: &str, planned_headcount: i32) -> u32 {
    let base = u32::try_from(planned_headcount).unwrap_or(0);
    base.saturating_mul(SchedulePattern::parse(schedule_pattern).multiplier())
}
