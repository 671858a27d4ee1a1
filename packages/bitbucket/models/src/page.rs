use serde::{Deserialize, Serialize};

/// Paginated response envelope.
///
/// Pages are traversed forward only, following `next`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub pagelen: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
}
