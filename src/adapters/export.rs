use crate::domain::model::SuggestionRun;
use crate::utils::error::{Result, TeamError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const SUGGESTIONS_FILE: &str = "suggestions.json";
pub const TEAMS_FILE: &str = "teams.csv";
pub const UNASSIGNED_FILE: &str = "unassigned.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub tournament: String,
    pub generated_at: DateTime<Utc>,
    pub team_count: usize,
    pub assigned_count: usize,
    pub unassigned_count: usize,
    pub files: Vec<String>,
}

fn csv_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| TeamError::IoError(e.into_error()))
}

fn handicap_text(handicap: Option<f64>) -> String {
    handicap.map(|h| h.to_string()).unwrap_or_default()
}

pub fn suggestions_json(run: &SuggestionRun) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(run)?)
}

/// One row per team member; reasons joined with "; ".
pub fn teams_csv(run: &SuggestionRun) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["team", "kind", "member_id", "member_name", "handicap", "reasons"])?;

    for team in &run.suggested_teams {
        for member in &team.members {
            writer.write_record([
                team.name.as_str(),
                team.kind.as_str(),
                member.golfer.id.as_str(),
                member.golfer.display_name().as_str(),
                handicap_text(member.golfer.handicap).as_str(),
                member.reasons.join("; ").as_str(),
            ])?;
        }
    }

    csv_bytes(writer)
}

pub fn unassigned_csv(run: &SuggestionRun) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "member_id",
        "member_name",
        "handicap",
        "preferred_teammates",
        "registration_group_id",
    ])?;

    for golfer in &run.unassigned {
        writer.write_record([
            golfer.id.as_str(),
            golfer.display_name().as_str(),
            handicap_text(golfer.handicap).as_str(),
            golfer.preference_text().unwrap_or_default(),
            golfer.group_id().unwrap_or_default(),
        ])?;
    }

    csv_bytes(writer)
}

/// Renders the requested formats plus a manifest, as (file name, bytes) pairs.
pub fn render(
    run: &SuggestionRun,
    formats: &[String],
    tournament: &str,
    generated_at: DateTime<Utc>,
) -> Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();

    for format in formats {
        match format.as_str() {
            "json" => files.push((SUGGESTIONS_FILE.to_string(), suggestions_json(run)?)),
            "csv" => {
                files.push((TEAMS_FILE.to_string(), teams_csv(run)?));
                files.push((UNASSIGNED_FILE.to_string(), unassigned_csv(run)?));
            }
            other => {
                return Err(TeamError::InvalidConfigValueError {
                    field: "output_formats".to_string(),
                    value: other.to_string(),
                    reason: "Supported formats: json, csv".to_string(),
                })
            }
        }
    }

    let manifest = Manifest {
        tournament: tournament.to_string(),
        generated_at,
        team_count: run.suggested_teams.len(),
        assigned_count: run.assigned_count(),
        unassigned_count: run.unassigned.len(),
        files: files.iter().map(|(name, _)| name.clone()).collect(),
    };
    files.push((MANIFEST_FILE.to_string(), serde_json::to_vec_pretty(&manifest)?));

    Ok(files)
}

pub fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
