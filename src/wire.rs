// Wire-format types shared by the REST snapshot endpoint and the live feed,
// plus inbound frame classification.
//
// Everything here is ephemeral: a wire snapshot is received, handed to the
// reconciler, and discarded. Only the derived scoreboard view-model persists
// across updates.

use serde::{Deserialize, Deserializer};

/// Plain-text frame sent by older backend deployments meaning "refetch the
/// full scoreboard via REST now".
pub const REFRESH_SENTINEL: &str = "update-dashboard";

/// Type tag carried by the preferred envelope message shape.
pub const SCOREBOARD_UPDATE: &str = "SCOREBOARD_UPDATE";

// ---------------------------------------------------------------------------
// Mission tri-state
// ---------------------------------------------------------------------------

/// Progress state of a single mission attempt, decoded from the backend's
/// nullable boolean: `true` means solved, `false` means attempted and still
/// in progress, `null` (or an absent field) means not yet attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissionState {
    Solved,
    Open,
    #[default]
    Untried,
}

impl<'de> Deserialize<'de> for MissionState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<bool>::deserialize(deserializer)? {
            Some(true) => MissionState::Solved,
            Some(false) => MissionState::Open,
            None => MissionState::Untried,
        })
    }
}

// ---------------------------------------------------------------------------
// Remaining attempts
// ---------------------------------------------------------------------------

/// Attempts a team has left on a mission: a finite count or the backend's
/// `"unlimited"` sentinel. The wire carries this as a string (older
/// deployments) or a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attempts {
    Limited(u32),
    #[default]
    Unlimited,
}

impl std::fmt::Display for Attempts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attempts::Limited(n) => write!(f, "{n}"),
            Attempts::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for Attempts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Attempts::Limited(n)),
            Raw::Text(s) if s.eq_ignore_ascii_case("unlimited") => Ok(Attempts::Unlimited),
            Raw::Text(s) => s
                .trim()
                .parse::<u32>()
                .map(Attempts::Limited)
                .map_err(|_| serde::de::Error::custom(format!("invalid attempts value: {s:?}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot records
// ---------------------------------------------------------------------------

/// One mission (attempt against a specific challenge) inside a problem.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub name: String,
    #[serde(default)]
    pub objective: Option<String>,
    pub difficulty: u32,
    #[serde(default)]
    pub remaining_attempts: Attempts,
    #[serde(default, rename = "solved")]
    pub state: MissionState,
    #[serde(default)]
    pub effect: Option<String>,
}

/// One problem on a team's quest board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub solved: bool,
    #[serde(default)]
    pub score: u32,
    #[serde(default, rename = "badgeUrl")]
    pub badge: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    // The backend names the array "mission" (singular); newer deployments
    // use "missions".
    #[serde(default, rename = "mission", alias = "missions")]
    pub missions: Vec<Mission>,
}

/// An accumulated effect applied to a team (or to the global aggregate).
/// Keyed by type: at most one entry per effect type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedEffect {
    pub effect_type: String,
    pub total_value: f64,
}

/// A team record as received from the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTeam {
    #[serde(default)]
    pub team_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub applied_effects: Vec<AppliedEffect>,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

/// Event-wide aggregate: team count, active quests, and global effect totals
/// (same shape as per-team effects, summed across all teams).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    #[serde(default)]
    pub total_teams: u32,
    #[serde(default)]
    pub active_quests: u32,
    #[serde(default)]
    pub global_effects: Vec<AppliedEffect>,
}

/// REST snapshot body. Depending on the deployment this is either a wrapped
/// object with an optional aggregate, or a bare array of team records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SnapshotResponse {
    Wrapped {
        teams: Vec<ApiTeam>,
        #[serde(default)]
        aggregate: Option<Aggregate>,
    },
    Bare(Vec<ApiTeam>),
}

impl SnapshotResponse {
    /// Split either variant into its teams and optional aggregate.
    pub fn into_parts(self) -> (Vec<ApiTeam>, Option<Aggregate>) {
        match self {
            SnapshotResponse::Wrapped { teams, aggregate } => (teams, aggregate),
            SnapshotResponse::Bare(teams) => (teams, None),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame classification
// ---------------------------------------------------------------------------

/// A classified inbound live-feed frame.
#[derive(Debug, PartialEq)]
pub enum Frame {
    /// Legacy plain-text sentinel: refetch the full scoreboard via REST.
    Refresh,
    /// Authoritative full snapshot (typed envelope or legacy bare array).
    Snapshot {
        teams: Vec<ApiTeam>,
        aggregate: Option<Aggregate>,
    },
    /// Malformed or unrecognized payload; the caller logs and drops it.
    Ignored,
}

/// Classify an inbound text frame.
///
/// Decision order:
/// 1. the plain-text refresh sentinel (never JSON-parsed),
/// 2. a `SCOREBOARD_UPDATE` envelope whose team list is an array
///    (`teams`, with `data` accepted as an alias),
/// 3. a bare JSON array of team records (legacy full-snapshot format),
/// 4. everything else, including malformed JSON, is `Ignored`.
///
/// Never fails: a frame this function cannot make sense of must not crash
/// the client or disturb existing state.
pub fn classify_frame(text: &str) -> Frame {
    if text.trim() == REFRESH_SENTINEL {
        return Frame::Refresh;
    }

    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return Frame::Ignored,
    };

    if value
        .get("type")
        .and_then(|t| t.as_str())
        .is_some_and(|t| t == SCOREBOARD_UPDATE)
    {
        let teams_value = match value.get("teams").or_else(|| value.get("data")) {
            Some(v) if v.is_array() => v.clone(),
            _ => return Frame::Ignored,
        };
        let teams: Vec<ApiTeam> = match serde_json::from_value(teams_value) {
            Ok(t) => t,
            Err(_) => return Frame::Ignored,
        };
        let aggregate = value
            .get("aggregate")
            .cloned()
            .and_then(|a| serde_json::from_value(a).ok());
        return Frame::Snapshot { teams, aggregate };
    }

    if value.is_array() {
        return match serde_json::from_value::<Vec<ApiTeam>>(value) {
            Ok(teams) => Frame::Snapshot {
                teams,
                aggregate: None,
            },
            Err(_) => Frame::Ignored,
        };
    }

    Frame::Ignored
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
