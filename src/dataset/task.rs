//! @ai:module:intent Benchmark split names
//! @ai:module:layer domain
//! @ai:module:public_api Task
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent One benchmark split: a named collection of JSON Schemas
///
/// Split names match the hosted dataset exactly, so task arguments and
/// persisted records stay interchangeable with exports from the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    #[serde(rename = "Github_trivial")]
    GithubTrivial,
    #[serde(rename = "Github_easy")]
    GithubEasy,
    #[serde(rename = "Github_medium")]
    GithubMedium,
    #[serde(rename = "Github_hard")]
    GithubHard,
    #[serde(rename = "Github_ultra")]
    GithubUltra,
    #[serde(rename = "Glaiveai2K")]
    Glaiveai2K,
    #[serde(rename = "JsonSchemaStore")]
    JsonSchemaStore,
    #[serde(rename = "Kubernetes")]
    Kubernetes,
    #[serde(rename = "Snowplow")]
    Snowplow,
    #[serde(rename = "WashingtonPost")]
    WashingtonPost,
    #[serde(rename = "default")]
    Default,
}

/// All splits, in the order the hub lists them.
pub const ALL_TASKS: &[Task] = &[
    Task::GithubTrivial,
    Task::GithubEasy,
    Task::GithubMedium,
    Task::GithubHard,
    Task::GithubUltra,
    Task::Glaiveai2K,
    Task::JsonSchemaStore,
    Task::Kubernetes,
    Task::Snowplow,
    Task::WashingtonPost,
    Task::Default,
];

impl Task {
    /// @ai:intent Split name as used by the dataset hub and in file names
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::GithubTrivial => "Github_trivial",
            Task::GithubEasy => "Github_easy",
            Task::GithubMedium => "Github_medium",
            Task::GithubHard => "Github_hard",
            Task::GithubUltra => "Github_ultra",
            Task::Glaiveai2K => "Glaiveai2K",
            Task::JsonSchemaStore => "JsonSchemaStore",
            Task::Kubernetes => "Kubernetes",
            Task::Snowplow => "Snowplow",
            Task::WashingtonPost => "WashingtonPost",
            Task::Default => "default",
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_TASKS
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let available: Vec<_> = ALL_TASKS.iter().map(|t| t.as_str()).collect();
                format!("unknown task '{}', available: {}", s, available.join(", "))
            })
    }
}
