use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The planner is single-user; every browser profile shares this id.
pub const LOCAL_USER_ID: &str = "localUser123";

/// Storage key for a user's plan.
pub fn storage_key(user_id: &str) -> String {
    format!("studyPlan_{user_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub description: String,
    /// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
    #[serde(default, deserialize_with = "deserialize_target_date")]
    pub target_date: Option<DateTime<Utc>>,
    pub completed: bool,
}

fn deserialize_target_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| Some(date.and_time(NaiveTime::MIN).and_utc()))
        .map_err(|_| serde::de::Error::custom(format!("invalid targetDate '{raw}'")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub user_id: String,
    pub goals: Vec<Goal>,
    /// No duplicates under exact string equality.
    pub subjects: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl StudyPlan {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            goals: Vec::new(),
            subjects: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn completed_count(&self) -> usize {
        self.goals.iter().filter(|g| g.completed).count()
    }

    /// Share of completed goals in percent; 0 for an empty plan.
    pub fn progress_percent(&self) -> f64 {
        if self.goals.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.goals.len() as f64 * 100.0
    }

    pub fn incomplete_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| !g.completed)
    }

    pub fn completed_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.completed)
    }
}
