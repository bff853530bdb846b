use super::*;
use crate::history::Contribution;
use crate::ownership::analyzer::accumulate;
use std::path::PathBuf;

fn sample() -> (Ownership, BTreeMap<String, String>) {
    let contributions = vec![
        Contribution {
            author: "alice@x.com".into(),
            path: PathBuf::from("src/foo.rs"),
            weight: 30,
            time: 100,
        },
        Contribution {
            author: "bob@x.com".into(),
            path: PathBuf::from("src/foo.rs"),
            weight: 10,
            time: 200,
        },
        Contribution {
            author: "bob@x.com".into(),
            path: PathBuf::from("img/logo.png"),
            weight: 0,
            time: 300,
        },
    ];
    let authors = BTreeMap::from([
        ("alice@x.com".to_string(), "Alice".to_string()),
        ("bob@x.com".to_string(), "Bøb".to_string()),
    ]);
    (accumulate(&contributions), authors)
}

#[test]
fn print_report_does_not_panic() {
    let (own, authors) = sample();
    print_report(&own, &authors, 20);
    print_report(&own, &authors, 1);
}

#[test]
fn print_report_empty() {
    print_report(&Ownership::default(), &BTreeMap::new(), 20);
}

#[test]
fn document_shares_and_order() {
    let (own, authors) = sample();
    let doc = document(&own, &authors);
    let foo = &doc.files["src/foo.rs"];
    assert_eq!(foo.total_weight, 40);
    assert_eq!(foo.risk, "HIGH");
    assert_eq!(foo.owners[0].author, "alice@x.com");
    assert_eq!(foo.owners[0].share, 0.75);
    assert_eq!(foo.owners[1].share, 0.25);

    let logo = &doc.files["img/logo.png"];
    assert_eq!(logo.owners[0].share, 0.0);

    let keys: Vec<&String> = doc.files.keys().collect();
    assert_eq!(keys, vec!["img/logo.png", "src/foo.rs"]);
}

#[test]
fn document_serializes() {
    let (own, authors) = sample();
    let json = serde_json::to_string(&document(&own, &authors)).unwrap();
    assert!(json.contains("\"src/foo.rs\""));
    assert!(json.contains("\"Bøb\""));
}
