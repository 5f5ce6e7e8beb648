//! Argument parsing and command output.

use anyhow::Result;
use field_sync::SyncConfig;
use fieldsync::commands::{
    Command, extract_report, highlight_report, locate_report, merge_report, process_report,
};
use std::fs;
use std::path::PathBuf;

fn args(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

#[test]
fn commands_parse_with_their_arguments() -> Result<()> {
    assert_eq!(
        Command::parse(args("locate page.html price"))?,
        Command::Locate {
            template: PathBuf::from("page.html"),
            field: "price".to_owned(),
        }
    );
    assert_eq!(
        Command::parse(args("highlight page.html price Price"))?,
        Command::Highlight {
            template: PathBuf::from("page.html"),
            field: "price".to_owned(),
            display_name: Some("Price".to_owned()),
        }
    );
    assert!(Command::parse(args("merge page.html")).is_err());
    assert!(Command::parse(args("render page.html")).is_err());
    assert!(Command::parse(Vec::new()).is_err());
    Ok(())
}

#[test]
fn locate_reports_strategy_and_element() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let report = locate_report("<b data-field=\"code\">X</b>", "code")?;
    assert_eq!(report, "FieldMarker\t<b data-field=\"code\">X</b>");
    assert!(locate_report("<p>nothing</p>", "code").is_err());
    Ok(())
}

#[test]
fn merge_accepts_object_values() -> Result<()> {
    let merged = merge_report(
        "<span id=\"price\">{{price}}</span>",
        r#"{"price": "$5"}"#,
    )?;
    assert_eq!(merged, "<span id=\"price\">$5</span>");
    Ok(())
}

#[test]
fn extract_and_process_work_on_design_json() -> Result<()> {
    let design = r#"{"body": {"rows": [{"columns": [{"contents": [
        {"values": {"text": "{{b}} {{a}}"}},
        {"values": {"html": "{{a}}"}}
    ]}]}]}}"#;
    assert_eq!(extract_report(design)?, "a\nb");
    let processed = process_report(design, r#"{"a": "A"}"#)?;
    assert!(processed.contains("<span id=\\\"a\\\">{{b}} A</span>"));
    assert!(processed.contains("\"identifiers\": \"a\""));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn highlight_outputs_decorated_document() -> Result<()> {
    let output = highlight_report(
        "<div><h1 id=\"title\">Hi</h1></div>",
        "title",
        Some("Title"),
        SyncConfig::new(),
    )
    .await?;
    assert!(output.contains("<style id=\"field-sync-styles\">"));
    assert!(output.contains("<h1 id=\"title\" class=\"field-highlight\">Hi</h1>"));
    assert!(output.contains("<div class=\"field-highlight-tooltip\">Title</div>"));
    Ok(())
}

#[test]
fn run_reads_input_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let template = dir.path().join("template.html");
    let values = dir.path().join("values.json");
    fs::write(&template, "<p data-id=\"name\">Hello [name]</p>")?;
    fs::write(&values, r#"[{"id": "name", "defaultValue": "Ada"}]"#)?;
    let output = Command::Merge {
        template,
        values,
    }
    .run()?;
    assert_eq!(output, "<p data-id=\"name\">Hello Ada</p>");

    let missing = Command::Extract {
        design: dir.path().join("missing.json"),
    };
    assert!(missing.run().is_err());
    Ok(())
}
