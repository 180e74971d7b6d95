use geo_grader::utils::validation::Validate;
use geo_grader::{BatchGradingPipeline, GradingEngine, LocalStorage, TomlConfig};
use tempfile::TempDir;

fn write_rule_set(dir: &TempDir, input: &str, format: &str, provider: &str) -> TomlConfig {
    let base = dir.path().to_str().unwrap();
    let toml_content = format!(
        r#"
[grader]
name = "capitals"
description = "Click on London"
version = "1.0"

[map]
provider = "{provider}"
latitude = 51.5
longitude = 0.0
zoom = "5"

[[groups]]
id = "in-london"
rule = "Within"
p = [51.5074, -0.1278]
d = 25.0
feedback = "Exactly right"

[[groups]]
id = "in-england"
rule = "Within"
p = [51.5074, -0.1278]
d = 300.0
feedback = "Close, but not quite"

[[groups]]
id = "far"
rule = "NotWithin"
p = [51.5074, -0.1278]
d = 2000.0
feedback = "Not even the right continent"

[input]
path = "{base}/{input}"
format = "{format}"

[output]
path = "{base}/grades"
formats = ["csv", "json"]
"#
    );

    let path = dir.path().join("rules.toml");
    std::fs::write(&path, toml_content).unwrap();

    let config = TomlConfig::from_file(&path).unwrap();
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_end_to_end_csv_grading() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("answers.csv"),
        "learner_id,latitude,longitude\n\
         alice,51.51,-0.13\n\
         bob,52.2053,0.1218\n\
         carol,48.8566,2.3522\n\
         dave,40.7128,-74.0060\n\
         erin,95,0\n\
         frank,north,west\n",
    )
    .unwrap();

    let config = write_rule_set(&temp_dir, "answers.csv", "csv", "google");
    let pipeline = BatchGradingPipeline::new(LocalStorage::new("."), config);
    let engine = GradingEngine::new(pipeline);

    let output_path = engine.run().await.unwrap();
    assert!(output_path.ends_with("grades"));

    let report: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("grades").join("grades.json")).unwrap(),
    )
    .unwrap();

    assert_eq!(report["rule_set"], "capitals");
    assert_eq!(report["summary"]["total"], 6);
    assert_eq!(report["summary"]["matched"], 3);
    assert_eq!(report["summary"]["default"], 1);
    assert_eq!(report["summary"]["invalid"], 2);

    let answers = report["answers"].as_array().unwrap();
    assert_eq!(answers[0]["group_id"], "in-london");
    assert_eq!(answers[0]["answer"], serde_json::json!([51.51, -0.13]));
    // Cambridge is ~80 km out
    assert_eq!(answers[1]["group_id"], "in-england");
    // Paris is ~344 km out: past England, short of the NotWithin radius
    assert_eq!(answers[2]["status"], "default");
    assert_eq!(answers[3]["group_id"], "far");
    assert_eq!(answers[3]["feedback"], "Not even the right continent");
    assert_eq!(answers[4]["status"], "invalid");
    assert_eq!(answers[5]["status"], "invalid");

    let csv = std::fs::read_to_string(temp_dir.path().join("grades").join("grades.csv")).unwrap();
    assert_eq!(csv.lines().count(), 7);
    assert!(csv.contains("alice,51.51,-0.13,\"51.510° N, 0.130° W\",matched,in-london,Exactly right"));
}

#[tokio::test]
async fn test_end_to_end_json_grading_under_amap() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("answers.json"),
        r#"[
            {"learner_id": "wei", "answer": [51.5074, -0.1278]},
            {"learner_id": "ming", "answer": [39.9042, 116.4074]},
            {"learner_id": "lan", "answer": [1.0]}
        ]"#,
    )
    .unwrap();

    let config = write_rule_set(&temp_dir, "answers.json", "json", "amap");
    let pipeline = BatchGradingPipeline::new(LocalStorage::new("."), config);
    let engine = GradingEngine::new_with_monitoring(pipeline, true);

    engine.run().await.unwrap();

    let report: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("grades").join("grades.json")).unwrap(),
    )
    .unwrap();

    let answers = report["answers"].as_array().unwrap();
    assert_eq!(answers[0]["group_id"], "in-london");
    assert_eq!(answers[0]["answer"], serde_json::json!([51.5074, -0.1278]));
    assert_eq!(answers[0]["display"], "51.507° N, 0.128° W");
    assert_eq!(answers[0]["marker"], serde_json::json!([-0.1278, 51.5074]));
    assert_eq!(answers[1]["group_id"], "far");
    assert_eq!(answers[2]["status"], "invalid");
}

#[tokio::test]
async fn test_csv_rows_under_amap_are_read_as_lat_lng() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("answers.csv"),
        "learner_id,latitude,longitude\n\
         li,51.5074,-0.1278\n\
         zhao,39.9042,116.4074\n",
    )
    .unwrap();

    let config = write_rule_set(&temp_dir, "answers.csv", "csv", "amap");
    let pipeline = BatchGradingPipeline::new(LocalStorage::new("."), config);
    GradingEngine::new(pipeline).run().await.unwrap();

    let report: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("grades").join("grades.json")).unwrap(),
    )
    .unwrap();

    assert_eq!(report["summary"]["invalid"], 0);
    assert_eq!(report["answers"][0]["group_id"], "in-london");
    assert_eq!(report["answers"][0]["distance_km"], 0.0);
    assert_eq!(report["answers"][1]["group_id"], "far");
}

#[tokio::test]
async fn test_missing_input_file_fails_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_rule_set(&temp_dir, "nowhere.csv", "csv", "google");
    let pipeline = BatchGradingPipeline::new(LocalStorage::new("."), config);

    let err = GradingEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, geo_grader::GradeError::IoError(_)));
    assert!(!temp_dir.path().join("grades").exists());
}
