use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn bookshelf(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env("BOOKSHELF_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn catalog(home: &Path) -> Value {
    let raw = std::fs::read_to_string(home.join("library.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn book_id(home: &Path, isbn: &str) -> String {
    let doc = catalog(home);
    doc["records"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["isbn"] == isbn)
        .map(|b| b["id"].as_str().unwrap().to_string())
        .unwrap()
}

fn add_dune(home: &Path) {
    bookshelf(home)
        .args(["add", "Dune", "Frank Herbert", "978-0441172719", "--genre", "SF"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'Dune'."));
}

#[test]
fn test_empty_catalog_lists_nothing_and_writes_nothing() {
    let dir = TempDir::new().unwrap();

    bookshelf(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("The catalog is empty"));

    assert!(!dir.path().join("library.json").exists());
}

#[test]
fn test_add_persists_envelope() {
    let dir = TempDir::new().unwrap();
    add_dune(dir.path());

    let doc = catalog(dir.path());
    assert_eq!(doc["metadata"]["version"], "1.0");
    assert_eq!(doc["metadata"]["totalRecords"], 1);
    assert_eq!(doc["records"][0]["status"], "available");
    assert_eq!(doc["records"][0]["genre"], "SF");

    bookshelf(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune by Frank Herbert"))
        .stdout(predicate::str::contains("1 book(s)"));
}

#[test]
fn test_duplicate_isbn_fails() {
    let dir = TempDir::new().unwrap();
    add_dune(dir.path());

    bookshelf(dir.path())
        .args(["add", "Other", "Someone", "978-0441172719"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: ISBN '978-0441172719' already exists"));

    assert_eq!(catalog(dir.path())["metadata"]["totalRecords"], 1);
}

#[test]
fn test_blank_title_fails() {
    let dir = TempDir::new().unwrap();

    bookshelf(dir.path())
        .args(["add", "  ", "Someone", "123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required field: title"));
}

#[test]
fn test_lend_and_return_cycle() {
    let dir = TempDir::new().unwrap();
    add_dune(dir.path());
    let id = book_id(dir.path(), "978-0441172719");

    bookshelf(dir.path())
        .args(["lend", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lent 'Dune' (now borrowed)."));

    bookshelf(dir.path())
        .args(["lend", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cannot lend 'Dune'"));

    // Short prefix of the dash-less id
    let prefix: String = id.replace('-', "")[..8].to_string();
    bookshelf(dir.path())
        .args(["return", &prefix])
        .assert()
        .success()
        .stdout(predicate::str::contains("Returned 'Dune' (now available)."));

    assert_eq!(catalog(dir.path())["records"][0]["status"], "available");
}

#[test]
fn test_maintenance_then_update_status() {
    let dir = TempDir::new().unwrap();
    add_dune(dir.path());
    let id = book_id(dir.path(), "978-0441172719");

    bookshelf(dir.path())
        .args(["maintenance", &id])
        .assert()
        .success();

    // Leaving maintenance goes through a raw status update
    bookshelf(dir.path())
        .args(["update", &id, "--status", "available", "--location", "Shelf 3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Location:  Shelf 3"));

    let doc = catalog(dir.path());
    assert_eq!(doc["records"][0]["status"], "available");
    assert_eq!(doc["records"][0]["location"], "Shelf 3");
}

#[test]
fn test_update_clears_optional_field() {
    let dir = TempDir::new().unwrap();
    add_dune(dir.path());
    let id = book_id(dir.path(), "978-0441172719");

    bookshelf(dir.path())
        .args(["update", &id, "--genre", ""])
        .assert()
        .success();

    assert!(catalog(dir.path())["records"][0].get("genre").is_none());
}

#[test]
fn test_update_clears_year() {
    let dir = TempDir::new().unwrap();
    bookshelf(dir.path())
        .args(["add", "Emma", "Jane Austen", "978-0141439587", "--year", "1815"])
        .assert()
        .success();
    assert_eq!(catalog(dir.path())["records"][0]["publicationYear"], 1815);

    let id = book_id(dir.path(), "978-0141439587");
    bookshelf(dir.path())
        .args(["update", &id, "--clear-year"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Year:      N/A"));

    assert!(catalog(dir.path())["records"][0]
        .get("publicationYear")
        .is_none());
}

#[test]
fn test_array_shaped_catalog_is_refused_and_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");
    let raw = r#"[{"id": "6f1c2a34-0a5e-4e8a-9d3b-1c2d3e4f5a6b", "title": "T", "author": "A", "isbn": "1", "status": "available"}]"#;
    std::fs::write(&path, raw).unwrap();

    bookshelf(dir.path())
        .args(["add", "Emma", "Jane Austen", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is corrupt"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), raw);
}

#[test]
fn test_samples_then_stats() {
    let dir = TempDir::new().unwrap();

    bookshelf(dir.path())
        .arg("samples")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 sample books."));

    bookshelf(dir.path())
        .arg("samples")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    bookshelf(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total books:  3"))
        .stdout(predicate::str::contains("Available:  3"));
}

#[test]
fn test_search_by_author_and_status() {
    let dir = TempDir::new().unwrap();
    bookshelf(dir.path()).arg("samples").assert().success();

    bookshelf(dir.path())
        .args(["search", "--author", "orwell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1984"))
        .stdout(predicate::str::contains("1 book(s)"));

    bookshelf(dir.path())
        .args(["search", "--status", "borrowed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books found."));
}

#[test]
fn test_delete_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    add_dune(dir.path());
    let id = book_id(dir.path(), "978-0441172719");

    bookshelf(dir.path())
        .args(["delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
    assert_eq!(catalog(dir.path())["metadata"]["totalRecords"], 1);

    bookshelf(dir.path())
        .args(["delete", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 'Dune'."));
    assert_eq!(catalog(dir.path())["metadata"]["totalRecords"], 0);
}

#[test]
fn test_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    add_dune(dir.path());

    bookshelf(dir.path())
        .args(["show", "zzzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No book matches id 'zzzz'"));
}

#[test]
fn test_corrupt_catalog_is_refused_and_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(&path, "{ not json").unwrap();

    bookshelf(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is corrupt"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn test_config_data_file() {
    let dir = TempDir::new().unwrap();

    bookshelf(dir.path())
        .args(["config", "data-file", "books.json"])
        .assert()
        .success();

    bookshelf(dir.path())
        .args(["config", "data-file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("books.json"));

    bookshelf(dir.path())
        .args(["add", "Emma", "Jane Austen", "978-0141439587"])
        .assert()
        .success();

    assert!(dir.path().join("books.json").exists());
    assert!(!dir.path().join("library.json").exists());
}

#[test]
fn test_file_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("elsewhere").join("catalog.json");

    bookshelf(dir.path())
        .args(["add", "Emma", "Jane Austen", "1"])
        .arg("--file")
        .arg(&other)
        .assert()
        .success();

    assert!(other.exists());
    assert!(!dir.path().join("library.json").exists());
}

#[test]
fn test_menu_session() {
    let dir = TempDir::new().unwrap();

    bookshelf(dir.path())
        .arg("menu")
        .write_stdin("12\ny\n2\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 sample books."))
        .stdout(predicate::str::contains("Don Quijote de la Mancha"))
        .stdout(predicate::str::contains("Goodbye."));

    assert_eq!(catalog(dir.path())["metadata"]["totalRecords"], 3);
}
