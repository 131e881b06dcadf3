use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use wf_logger::{LevelFilter, Logger, Rotation};

#[test]
fn json_file_layer_writes_structured_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let dir = tmp.path().join("logs");

    let logger = Logger::builder()
        .name("wayfinder-file")
        .console(false)
        .path(&dir)
        .rotation(Rotation::NEVER)
        .max_files(2)
        .json()
        .level(LevelFilter::INFO)
        .init()?;

    tracing::info!(target: "analytics", event = "catalog_opened", "analytics event");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let file = fs::read_dir(&dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(file)?;
    let line = contents.lines().find(|l| l.contains("catalog_opened")).expect("event line");
    assert!(line.trim_start().starts_with('{'), "file layer should emit JSON: {line}");

    Ok(())
}
