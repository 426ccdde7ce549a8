/// Full runs: read conversations.json, convert, write the Open WebUI file
mod common;

use std::fs;

use chatgpt_openwebui::{ImportConfig, execute};
use common::{ExportDirBuilder, assistant_node, image_part, multimodal_node, text_node};
use serde_json::{Value, json};

#[test]
fn test_run_writes_openwebui_file() {
    let export = ExportDirBuilder::new()
        .with_image("", "file-UP1.png", b"upload")
        .with_image("dalle-generations", "file-DAL1-a8f.webp", b"dalle")
        .with_conversations(&json!([{
            "title": "Art",
            "create_time": 1700000000.5,
            "update_time": 1700000999.25,
            "mapping": {
                "root": {"message": null, "children": ["n1"]},
                "n1": multimodal_node("user", json!([
                    "Make it blue",
                    image_part("file-service://file-UP1", Some("image/png"))
                ])),
                "n2": multimodal_node("tool", json!([
                    image_part("sediment://file-DAL1", Some("image/webp"))
                ])),
                "n3": assistant_node("Here you go", "gpt-4o")
            }
        }]))
        .build();

    let output = export.path().join("out/converted.json");
    let config = ImportConfig::new(export.path().join("conversations.json"), &output);
    let summary = execute(&config).expect("run should succeed");

    assert_eq!(summary.conversations, 1);
    assert_eq!(summary.messages, 3);
    assert_eq!(summary.images_indexed, 2);
    assert_eq!(summary.images_embedded, 2);
    assert!(summary.warnings.is_empty());

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let chat = &written[0];
    assert_eq!(chat["title"], "Art");
    assert_eq!(chat["models"], json!(["gpt-4o"]));
    assert_eq!(chat["create_time"], json!(1700000000.5));
    assert_eq!(chat["update_time"], json!(1700000999.25));

    let messages = chat["messages"].as_array().unwrap();
    let reply = messages.iter().find(|m| m["role"] == "assistant").unwrap();
    assert_eq!(reply["model"], "gpt-4o");
    assert_eq!(reply["modelName"], "gpt-4o");

    let user = messages.iter().find(|m| m["role"] == "user").unwrap();
    assert_eq!(user["content"], "Make it blue");
    assert_eq!(user["files"][0]["type"], "image");
    assert_eq!(user["files"][0]["url"], "data:image/png;base64,dXBsb2Fk");
    assert!(user.get("model").is_none());
}

#[test]
fn test_run_reports_warnings_without_failing() {
    let export = ExportDirBuilder::new()
        .with_conversations(&json!([{
            "title": "Lost",
            "mapping": {
                "n1": multimodal_node("user", json!([image_part("file-service://file-GONE", None)])),
                "n2": text_node("user", &["text survives"])
            }
        }]))
        .build();

    let output = export.path().join("converted.json");
    let config = ImportConfig::new(export.path().join("conversations.json"), &output);
    let summary = execute(&config).unwrap();

    assert_eq!(summary.messages, 1);
    assert_eq!(summary.warnings.len(), 1);
    assert!(summary.warnings[0].to_string().contains("file-GONE"));
    assert!(output.exists());
}

#[test]
fn test_parse_failure_leaves_no_output() {
    let export = ExportDirBuilder::new()
        .with_raw_export("[{\"title\": \"truncated\"")
        .build();

    let output = export.path().join("converted.json");
    let config = ImportConfig::new(export.path().join("conversations.json"), &output);

    assert!(execute(&config).is_err());
    assert!(!output.exists());
}

#[test]
fn test_missing_export_is_fatal() {
    let export = ExportDirBuilder::new().build();
    let output = export.path().join("converted.json");
    let config = ImportConfig::new(export.path().join("conversations.json"), &output);

    let err = execute(&config).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to open export"));
    assert!(!output.exists());
}

#[test]
fn test_existing_output_is_replaced() {
    let export = ExportDirBuilder::new()
        .with_conversations(&json!([{"title": "New", "mapping": {}}]))
        .build();
    let output = export.path().join("converted.json");
    fs::write(&output, "stale").unwrap();

    let config = ImportConfig::new(export.path().join("conversations.json"), &output);
    execute(&config).unwrap();

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, json!([{
        "title": "New",
        "models": ["unknown"],
        "create_time": null,
        "update_time": null,
        "messages": []
    }]));
}
