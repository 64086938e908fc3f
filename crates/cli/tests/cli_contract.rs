use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};

fn cli() -> Command {
    Command::cargo_bin("sitepin-cli").expect("binary should be built")
}

fn seeded_project(dir: &Path) -> PathBuf {
    let path = dir.join("project.json");

    cli().arg("seed").arg(&path).assert().success();
    assert!(path.exists(), "seed should write the project file");

    path
}

#[test]
fn info_emits_stable_json_contract() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    let output = cli().arg("info").arg(&path).assert().success().get_output().stdout.clone();

    let mut value: Value =
        serde_json::from_slice(&output).expect("stdout should contain valid json");
    value["path"] = Value::String("<FILE>".to_owned());

    insta::assert_json_snapshot!("cli_info_sample_project", value);
}

#[test]
fn category_filter_restricts_query_results() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    cli()
        .arg("query")
        .arg(&path)
        .arg("--blueprint")
        .arg("Ground Floor Plan")
        .arg("--category")
        .arg("electrical")
        .assert()
        .success()
        .stdout(predicate::str::contains("Main Electrical Panel"))
        .stdout(predicate::str::contains("Water Main Entry").not());
}

#[test]
fn spatial_region_query_keeps_contained_pins_only() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    // The panel sits at (0.3, 0.4); the water main at (0.7, 0.6) is outside.
    cli()
        .arg("query")
        .arg(&path)
        .arg("--blueprint")
        .arg("Ground Floor Plan")
        .arg("--page")
        .arg("1")
        .arg("--rect")
        .arg("0.1,0.1,0.4,0.5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Main Electrical Panel"))
        .stdout(predicate::str::contains("Water Main Entry").not());
}

#[test]
fn whole_project_query_orders_newest_first() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    let output = cli().arg("query").arg(&path).assert().success().get_output().stdout.clone();

    let records: Value = serde_json::from_slice(&output).expect("stdout should be json");
    let titles: Vec<&str> = records
        .as_array()
        .expect("records should be an array")
        .iter()
        .map(|record| record["title"].as_str().expect("title should be a string"))
        .collect();

    assert_eq!(
        titles,
        vec![
            "Main Electrical Panel",
            "Main Electrical Panel",
            "Water Main Entry",
            "Distribution Riser",
        ]
    );
}

#[test]
fn video_exclusion_drops_video_only_entries() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    cli()
        .arg("query")
        .arg(&path)
        .arg("--no-videos")
        .assert()
        .success()
        .stdout(predicate::str::contains("Distribution Riser").not());
}

#[test]
fn attach_reads_page_geometry_from_pdf() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    let pdf_path = temp.path().join("site-plan.pdf");
    std::fs::write(&pdf_path, two_page_pdf()).expect("pdf fixture should be written");

    cli()
        .arg("attach")
        .arg(&path)
        .arg(&pdf_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"site-plan\""))
        .stdout(predicate::str::contains("\"pages\": 2"));

    let output = cli().arg("info").arg(&path).assert().success().get_output().stdout.clone();
    let value: Value = serde_json::from_slice(&output).expect("stdout should be json");
    assert_eq!(value["blueprints"], 3);
}

fn two_page_pdf() -> Vec<u8> {
    use lopdf::{dictionary, Document, Object};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = [[0, 0, 612, 792], [0, 0, 1224, 792]]
        .iter()
        .map(|media_box: &[i64; 4]| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.iter().map(|value| (*value).into()).collect::<Vec<Object>>(),
            });
            page_id.into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document should serialize");
    bytes
}

#[test]
fn info_fails_for_missing_file() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    cli()
        .arg("info")
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("file does not exist"));
}

#[test]
fn query_fails_for_unknown_category() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    cli()
        .arg("query")
        .arg(&path)
        .arg("--category")
        .arg("concrete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

#[test]
fn rect_requires_blueprint_and_page() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let path = seeded_project(temp.path());

    cli()
        .arg("query")
        .arg(&path)
        .arg("--rect")
        .arg("0.1,0.1,0.5,0.5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--rect requires --blueprint"));

    cli()
        .arg("query")
        .arg(&path)
        .arg("--blueprint")
        .arg("Ground Floor Plan")
        .arg("--rect")
        .arg("0.1,0.1,0.5,0.5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--rect requires --page"));
}
