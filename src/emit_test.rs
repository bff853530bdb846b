use super::*;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct Payload {
    files: BTreeMap<String, f64>,
}

fn info() -> RunInfo {
    RunInfo {
        repository: "demo".into(),
        branch: "main".into(),
        evaluated_at: 86_400,
    }
}

fn payload() -> Payload {
    Payload {
        files: BTreeMap::from([("b.rs".to_string(), 0.5), ("a.rs".to_string(), 1.0)]),
    }
}

#[test]
fn render_wraps_payload_in_envelope() {
    let bytes = render(&info(), "ownership", &payload()).unwrap();
    assert_eq!(bytes.last(), Some(&b'\n'));

    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["schema_version"], 1);
    assert_eq!(json["miner"], "ownership");
    assert_eq!(json["repository"], "demo");
    assert_eq!(json["branch"], "main");
    assert_eq!(json["evaluated_at"], "1970-01-02T00:00:00+00:00");
    assert_eq!(json["files"]["a.rs"], 1.0);
}

#[test]
fn render_is_deterministic() {
    let a = render(&info(), "ownership", &payload()).unwrap();
    let b = render(&info(), "ownership", &payload()).unwrap();
    assert_eq!(a, b);

    let text = String::from_utf8(a).unwrap();
    let schema = text.find("schema_version").unwrap();
    let a_rs = text.find("a.rs").unwrap();
    let b_rs = text.find("b.rs").unwrap();
    assert!(schema < a_rs && a_rs < b_rs);
}

#[test]
fn write_all_persists_every_document() {
    let dir = tempfile::tempdir().unwrap();
    let docs = vec![
        Document {
            path: dir.path().join("One.json"),
            bytes: b"{}\n".to_vec(),
        },
        Document {
            path: dir.path().join("nested/Two.json"),
            bytes: b"[]\n".to_vec(),
        },
    ];
    write_all(&docs).unwrap();
    assert_eq!(fs::read(dir.path().join("One.json")).unwrap(), b"{}\n");
    assert_eq!(fs::read(dir.path().join("nested/Two.json")).unwrap(), b"[]\n");
}

#[test]
fn write_all_replaces_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Out.json");
    fs::write(&path, "old").unwrap();
    write_all(&[Document {
        path: path.clone(),
        bytes: b"new".to_vec(),
    }])
    .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
}

#[test]
fn failure_leaves_no_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("taken")).unwrap();
    let docs = vec![
        Document {
            path: dir.path().join("First.json"),
            bytes: b"{}\n".to_vec(),
        },
        Document {
            path: dir.path().join("taken"),
            bytes: b"{}\n".to_vec(),
        },
    ];

    let err = write_all(&docs).unwrap_err();
    assert!(matches!(err, MineError::OutputWrite { .. }));
    assert_eq!(err.exit_code(), 7);

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("taken")]);
}

#[cfg(unix)]
#[test]
fn new_documents_are_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Out.json");
    write_all(&[Document {
        path: path.clone(),
        bytes: b"{}\n".to_vec(),
    }])
    .unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o644);
}

#[cfg(unix)]
#[test]
fn replaced_document_keeps_its_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Out.json");
    fs::write(&path, "old").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
    write_all(&[Document {
        path: path.clone(),
        bytes: b"new".to_vec(),
    }])
    .unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
}

#[test]
fn rollback_restores_previous_documents() {
    let dir = tempfile::tempdir().unwrap();
    let replaced = dir.path().join("Replaced.json");
    let created = dir.path().join("Created.json");
    fs::write(&replaced, "old").unwrap();

    let previous = backup(&replaced).unwrap();
    assert!(previous.is_some());
    assert!(backup(&created).unwrap().is_none());
    fs::write(&replaced, "new").unwrap();
    fs::write(&created, "new").unwrap();

    rollback(vec![(replaced.as_path(), previous), (created.as_path(), None)]);
    assert_eq!(fs::read_to_string(&replaced).unwrap(), "old");
    assert!(!created.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
