use anyhow::Result;
use golf_team_builder::core::{ConfigProvider, Pipeline};
use golf_team_builder::{LocalStorage, SuggestionEngine, SuggestionPipeline, TomlConfig};
use httpmock::prelude::*;
use std::io::Read;
use tempfile::TempDir;

fn registrants() -> serde_json::Value {
    serde_json::json!({
        "golfers": [
            {"id": 101, "firstName": "Ann", "lastName": "Lee", "handicap": 12.4, "registrationGroupId": "g1"},
            {"id": 102, "firstName": "Bob", "lastName": "Ray", "handicap": "8", "registrationGroupId": "g1"},
            {"id": 103, "firstName": "Cat", "lastName": "Fox", "registrationGroupId": "g1"},
            {"id": 104, "firstName": "Dan", "lastName": "Orr", "preferredTeammates": "Cat Fox"},
            {"id": 105, "firstName": "Eve", "lastName": "Ng", "handicap": ""},
            {"firstName": "No", "lastName": "Id"}
        ]
    })
}

fn toml_for(source: &str, output_dir: &str, extra: &str) -> String {
    // 將Windows路徑中的反斜杠轉為正斜杠以避免TOML解析問題
    let output_dir = output_dir.replace('\\', "/");
    format!(
        r#"
[tournament]
name = "Member Guest"

{source}

[load]
output_path = "{output_dir}"
output_formats = ["json", "csv"]

{extra}
"#
    )
}

#[tokio::test]
async fn test_api_source_to_zip_bundle() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/golfers")
            .header("Authorization", "Bearer club-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(registrants());
    });

    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().to_string_lossy().to_string();
    let source = format!(
        r#"[source]
type = "api"
endpoint = "{}"
timeout_seconds = 5

[source.headers]
Authorization = "Bearer club-token""#,
        server.url("/golfers")
    );
    let extra = r#"[assigned]
ids = ["105"]

[load.compression]
enabled = true
filename = "member-guest.zip""#;

    let config = TomlConfig::from_toml_str(&toml_for(&source, &output_dir, extra))?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = SuggestionEngine::new(SuggestionPipeline::new(storage, config));

    let output_path = engine.run().await?;

    api_mock.assert();
    assert!(output_path.ends_with("member-guest.zip"));

    let zip_path = temp_dir.path().join("member-guest.zip");
    let mut archive = zip::ZipArchive::new(std::fs::File::open(&zip_path)?)?;

    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<std::result::Result<_, _>>()?;
    names.sort();
    assert_eq!(
        names,
        vec!["manifest.json", "suggestions.json", "teams.csv", "unassigned.csv"]
    );

    let mut suggestions = String::new();
    archive
        .by_name("suggestions.json")?
        .read_to_string(&mut suggestions)?;
    let suggestions: serde_json::Value = serde_json::from_str(&suggestions)?;

    let teams = suggestions["suggestedTeams"].as_array().cloned().unwrap_or_default();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["name"], "Team 1");
    assert_eq!(teams[0]["kind"], "trio");
    assert_eq!(teams[0]["members"][3]["golfer"]["id"], "104");
    assert_eq!(teams[0]["members"][3]["reasons"][0], "Prefers Cat Fox");
    assert_eq!(suggestions["unassigned"].as_array().map(Vec::len), Some(0));

    let mut manifest = String::new();
    archive
        .by_name("manifest.json")?
        .read_to_string(&mut manifest)?;
    let manifest: serde_json::Value = serde_json::from_str(&manifest)?;
    assert_eq!(manifest["tournament"], "Member Guest");
    assert_eq!(manifest["teamCount"], 1);
    assert_eq!(manifest["assignedCount"], 4);

    // 壓縮模式不應輸出個別檔案
    assert!(!temp_dir.path().join("teams.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_csv_source_with_assigned_file() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;

    let csv_path = input_dir.path().join("registrants.csv");
    std::fs::write(
        &csv_path,
        "Golfer ID,First Name,Last Name,Handicap,Preferred Teammates,Group ID,Shirt Size\n\
         1,Ann,Lee,10,,g1,M\n\
         2,Bob,Ray,,,g1,L\n\
         3,Cat,Fox,4.5,,g1,S\n\
         4,Dan,Orr,,,g1,M\n\
         5,Eve,Ng,,\"Ann Lee, Kim\",,M\n\
         6,Fay,Kim,,,,L\n",
    )?;

    let assigned_path = input_dir.path().join("assigned.txt");
    std::fs::write(&assigned_path, "# on persisted teams\n6\n")?;

    let source = format!(
        "[source]\ntype = \"csv\"\npath = \"{}\"",
        csv_path.to_string_lossy().replace('\\', "/")
    );
    let extra = format!(
        "[assigned]\npath = \"{}\"",
        assigned_path.to_string_lossy().replace('\\', "/")
    );
    let out = output_dir.path().to_string_lossy().to_string();

    let config = TomlConfig::from_toml_str(&toml_for(&source, &out, &extra))?;
    let pipeline = SuggestionPipeline::new(LocalStorage::new(out.clone()), config);

    let batch = pipeline.extract().await?;
    assert_eq!(batch.golfers.len(), 6);
    assert!(batch.already_assigned.contains("6"));

    let run = pipeline.transform(batch).await?;
    assert_eq!(run.suggested_teams.len(), 1);
    assert_eq!(run.unassigned.len(), 1);
    assert_eq!(run.unassigned[0].id, "5");

    let written = pipeline.load(run).await?;
    assert_eq!(written, out);

    let mut reader = csv::Reader::from_path(output_dir.path().join("teams.csv"))?;
    let headers = reader.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["team", "kind", "member_id", "member_name", "handicap", "reasons"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "Team 1");
    assert_eq!(&rows[0][1], "registered_group");
    assert_eq!(&rows[0][5], "Registered together");

    let mut reader = csv::Reader::from_path(output_dir.path().join("unassigned.csv"))?;
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "5");

    assert!(output_dir.path().join("suggestions.json").exists());
    assert!(output_dir.path().join("manifest.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_source_file_fails_run() -> Result<()> {
    let output_dir = TempDir::new()?;
    let out = output_dir.path().to_string_lossy().to_string();
    let missing = output_dir.path().join("nope.json");
    let source = format!(
        "[source]\ntype = \"json\"\npath = \"{}\"",
        missing.to_string_lossy().replace('\\', "/")
    );

    let config = TomlConfig::from_toml_str(&toml_for(&source, &out, ""))?;
    let engine = SuggestionEngine::new(SuggestionPipeline::new(LocalStorage::new(out), config));

    let err = engine.run().await.unwrap_err();
    assert!(err.exit_code() > 0);
    assert!(!output_dir.path().join("manifest.json").exists());

    Ok(())
}
