//! Registrant sources: where the golfer list and the already-assigned ids come from.
//!
//! Missing or blank fields are never an error here; they simply carry no
//! signal into team formation. Only transport problems (unreachable endpoint,
//! unreadable file, unparseable document) are reported.

use crate::domain::model::Golfer;
use crate::utils::error::{Result, TeamError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegistrantSource {
    Api {
        endpoint: String,
        #[serde(default)]
        headers: HashMap<String, String>,
        timeout_seconds: Option<u64>,
    },
    Json {
        path: String,
    },
    Csv {
        path: String,
    },
}

impl RegistrantSource {
    /// Picks a source from a location string, using `kind` when given and
    /// otherwise the URL scheme or file extension.
    pub fn infer(location: &str, kind: Option<&str>) -> Result<Self> {
        let kind = match kind {
            Some(kind) => kind.to_lowercase(),
            None if location.starts_with("http://") || location.starts_with("https://") => {
                "api".to_string()
            }
            None => Path::new(location)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default(),
        };

        match kind.as_str() {
            "api" => Ok(RegistrantSource::Api {
                endpoint: location.to_string(),
                headers: HashMap::new(),
                timeout_seconds: None,
            }),
            "json" => Ok(RegistrantSource::Json {
                path: location.to_string(),
            }),
            "csv" => Ok(RegistrantSource::Csv {
                path: location.to_string(),
            }),
            other => Err(TeamError::InvalidConfigValueError {
                field: "source".to_string(),
                value: location.to_string(),
                reason: format!(
                    "Cannot tell the source type ('{}'); use an http(s) URL, a .json or .csv file, or set the type explicitly",
                    other
                ),
            }),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RegistrantSource::Api { endpoint, .. } => format!("api {}", endpoint),
            RegistrantSource::Json { path } => format!("json file {}", path),
            RegistrantSource::Csv { path } => format!("csv file {}", path),
        }
    }

    pub async fn fetch(&self, client: &Client) -> Result<Vec<Golfer>> {
        match self {
            RegistrantSource::Api {
                endpoint,
                headers,
                timeout_seconds,
            } => fetch_api(client, endpoint, headers, *timeout_seconds).await,
            RegistrantSource::Json { path } => {
                let data = tokio::fs::read(path).await?;
                parse_json_registrants(&data)
            }
            RegistrantSource::Csv { path } => {
                let data = tokio::fs::read(path).await?;
                parse_csv_registrants(&data)
            }
        }
    }
}

async fn fetch_api(
    client: &Client,
    endpoint: &str,
    headers: &HashMap<String, String>,
    timeout_seconds: Option<u64>,
) -> Result<Vec<Golfer>> {
    tracing::debug!("Requesting registrants from {}", endpoint);

    let mut request = client.get(endpoint);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(seconds) = timeout_seconds {
        request = request.timeout(Duration::from_secs(seconds));
    }

    let response = request.send().await?;
    let status = response.status();
    tracing::debug!("Registrant API responded with {}", status);

    if !status.is_success() {
        return Err(TeamError::SourceError {
            source_name: endpoint.to_string(),
            message: format!("HTTP {}", status),
        });
    }

    let body: serde_json::Value = response.json().await?;
    golfers_from_value(body)
}

/// Accepts either a bare array of golfers or an object with a `golfers` array.
pub fn parse_json_registrants(data: &[u8]) -> Result<Vec<Golfer>> {
    let value: serde_json::Value = serde_json::from_slice(data)?;
    golfers_from_value(value)
}

fn golfers_from_value(value: serde_json::Value) -> Result<Vec<Golfer>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut obj) => match obj.remove("golfers") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(TeamError::ProcessingError {
                    message: "Registrant document has no 'golfers' array".to_string(),
                })
            }
        },
        _ => {
            return Err(TeamError::ProcessingError {
                message: "Registrant document must be a JSON array or object".to_string(),
            })
        }
    };

    let mut golfers = Vec::with_capacity(items.len());
    for (row, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Golfer>(item) {
            Ok(golfer) if !golfer.id.is_empty() => golfers.push(golfer),
            Ok(_) => tracing::warn!("Registrant #{} has an empty id, skipped", row + 1),
            Err(e) => tracing::warn!("Registrant #{} skipped: {}", row + 1, e),
        }
    }

    tracing::debug!("Parsed {} registrants", golfers.len());
    Ok(golfers)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    FirstName,
    LastName,
    Handicap,
    PreferredTeammates,
    RegistrationGroupId,
}

fn column_for(header: &str) -> Option<Column> {
    let key: String = header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    match key.as_str() {
        "id" | "golferid" | "personid" => Some(Column::Id),
        "firstname" => Some(Column::FirstName),
        "lastname" => Some(Column::LastName),
        "handicap" => Some(Column::Handicap),
        "preferredteammates" => Some(Column::PreferredTeammates),
        "registrationgroupid" | "groupid" => Some(Column::RegistrationGroupId),
        _ => None,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Reads a registrant export with a header row. Unknown columns are ignored.
pub fn parse_csv_registrants(data: &[u8]) -> Result<Vec<Golfer>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let columns: Vec<Option<Column>> = reader.headers()?.iter().map(column_for).collect();
    if !columns.contains(&Some(Column::Id)) {
        return Err(TeamError::ValidationError {
            message: "Registrant CSV has no id column".to_string(),
        });
    }

    let mut golfers = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let mut golfer = Golfer::new("", "", "");

        for (column, value) in columns.iter().zip(record.iter()) {
            match column {
                Some(Column::Id) => golfer.id = value.trim().to_string(),
                Some(Column::FirstName) => golfer.first_name = value.trim().to_string(),
                Some(Column::LastName) => golfer.last_name = value.trim().to_string(),
                Some(Column::Handicap) => golfer.handicap = value.trim().parse().ok(),
                Some(Column::PreferredTeammates) => golfer.preferred_teammates = non_blank(value),
                Some(Column::RegistrationGroupId) => {
                    golfer.registration_group_id = non_blank(value)
                }
                None => {}
            }
        }

        if golfer.id.is_empty() {
            tracing::warn!("CSV row {} has no id, skipped", row + 2);
            continue;
        }
        golfers.push(golfer);
    }

    tracing::debug!("Parsed {} registrants from CSV", golfers.len());
    Ok(golfers)
}

/// Already-assigned ids: a JSON array, or one id per line (`#` starts a comment).
pub fn parse_assigned_ids(data: &[u8]) -> Result<HashSet<String>> {
    let text = String::from_utf8_lossy(data);
    let trimmed = text.trim();

    if trimmed.starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
        return Ok(values
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::String(s) => non_blank(&s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect());
    }

    Ok(trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
