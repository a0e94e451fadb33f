//! End-to-end tests for subtype classification
//!
//! Rules are compiled once and applied to real paths, the way the ingester
//! does before handing a file to its parser.

use ingest_subtype::{
    directories_match, matches, name_matches, CandidatePath, IngestConfig, PathError, RuleSet,
    RuleSpec, SubtypeRegistry,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temp directory with helpers for laying out input files
struct TestEnv {
    _temp: TempDir,
    pub root: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = temp
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        Self { _temp: temp, root }
    }

    fn write_file(&self, rel: &str) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, "a,b\n1,2\n").expect("Failed to write file");
        path
    }
}

fn candidate(p: &str) -> CandidatePath {
    CandidatePath::from_path(Path::new(p)).unwrap()
}

fn rule(name: Option<&str>, directories: Option<&str>) -> RuleSet {
    RuleSet::compile(&RuleSpec::new(name, directories)).unwrap()
}

// ============================================================================
// Verdict properties
// ============================================================================

#[cfg(unix)]
#[test]
fn test_verdict_is_name_and_directories() {
    let rules = [
        rule(Some(r"^report_.*\.csv$"), Some("!ROOT!/usr/local")),
        rule(Some(r".*"), Some("!DIRS!/etc")),
        rule(Some(r"^x"), Some("!DIRS_2!/home")),
        rule(None, Some("!DIRS!")),
        rule(Some(".*"), None),
    ];
    let paths = [
        "/usr/local/report_2020.csv",
        "/usr/local/other.csv",
        "/opt/usr/local/report_1.csv",
        "/a/b/etc/file",
        "/a/b/home/x.txt",
        "/a/home/x.txt",
    ];

    for r in &rules {
        for p in paths {
            let p = candidate(p);
            assert_eq!(
                matches(r, &p),
                name_matches(r, &p) && directories_match(r, &p),
                "rule {:?} path {:?}",
                r.spec(),
                p
            );
        }
    }
}

#[cfg(unix)]
#[test]
fn test_documented_examples() {
    let r = rule(Some(".*"), Some("!ROOT!/usr/local"));
    assert!(matches(&r, &candidate("/usr/local/file.txt")));
    assert!(!matches(&r, &candidate("/opt/usr/local/file.txt")));

    let r = rule(Some(".*"), Some("!DIRS!/etc"));
    assert!(matches(&r, &candidate("/etc/file")));
    assert!(matches(&r, &candidate("/a/b/etc/file")));

    let r = rule(Some(".*"), Some("!DIRS_2!/home"));
    assert!(matches(&r, &candidate("/a/b/home/file")));
    assert!(!matches(&r, &candidate("/a/home/file")));
    assert!(!matches(&r, &candidate("/a/b/c/home/file")));

    let r = rule(Some(r"^report_.*\.csv$"), Some("!ROOT!/elsewhere"));
    assert!(name_matches(&r, &candidate("/data/report_2020.csv")));
    assert!(!name_matches(&r, &candidate("/data/other.csv")));
}

#[cfg(unix)]
#[test]
fn test_adjacent_skips_in_either_order() {
    let r = rule(Some(".*"), Some("!DIRS_1!/!DIRS!/home"));
    assert!(matches(&r, &candidate("/x/home/f")));
    assert!(matches(&r, &candidate("/x/y/home/f")));
    assert!(!matches(&r, &candidate("/home/f")));

    let r = rule(Some(".*"), Some("!DIRS!/!DIRS_2!"));
    assert!(matches(&r, &candidate("/a/b/f")));
    assert!(matches(&r, &candidate("/a/b/c/f")));
    assert!(!matches(&r, &candidate("/a/f")));
}

#[cfg(unix)]
#[test]
fn test_compiling_twice_gives_identical_verdicts() {
    let spec = RuleSpec::new(Some(r"^\d+\.csv$"), Some("!ROOT!/srv/!DIRS!/in/!DIRS_1!"));
    let a = RuleSet::compile(&spec).unwrap();
    let b = RuleSet::compile(&spec).unwrap();
    assert_eq!(a.directory_tokens(), b.directory_tokens());

    for p in [
        "/srv/in/2020/1.csv",
        "/srv/x/y/in/2020/2.csv",
        "/srv/in/3.csv",
        "/opt/srv/in/2020/4.csv",
        "/srv/in/2020/name.csv",
    ] {
        let p = candidate(p);
        assert_eq!(matches(&a, &p), matches(&b, &p));
        // Repeated calls on one rule do not carry state over.
        assert_eq!(matches(&a, &p), matches(&a, &p));
    }
}

#[cfg(unix)]
#[test]
fn test_concurrent_matches_share_one_rule() {
    let rules = rule(Some(".*"), Some("!ROOT!/data/!DIRS!/exports/!DIRS_1!"));
    let cases: Vec<(String, bool)> = (0..64)
        .map(|i| {
            if i % 2 == 0 {
                (format!("/data/{}/exports/day{}/f.csv", "x/".repeat(i % 7), i), true)
            } else {
                (format!("/data/{}/exports/f.csv", "y/".repeat(i % 5)), false)
            }
        })
        .map(|(p, expected)| (p.replace("//", "/"), expected))
        .collect();

    std::thread::scope(|scope| {
        for chunk in cases.chunks(8) {
            let rules = &rules;
            scope.spawn(move || {
                for _ in 0..50 {
                    for (p, expected) in chunk {
                        assert_eq!(matches(rules, &candidate(p)), *expected, "path {}", p);
                    }
                }
            });
        }
    });
}

// ============================================================================
// Registry over real files
// ============================================================================

const CONFIG: &str = r#"
[[subtypes]]
name = "bank_statements"
rules = { name = '^statement_\d{4}\.csv$', directories = "!DIRS!/incoming/bank" }
csv = { first_row = 1, columns = ["date", "payee", "amount"] }

[[subtypes]]
name = "broker_exports"
rules = { name = '.*\.csv$', directories = "!DIRS!/incoming/!DIRS_1!/broker" }

[[subtypes]]
name = "name_only"
rules = { name = '.*\.csv$' }
"#;

#[cfg(unix)]
#[test]
fn test_registry_classifies_tree() {
    let env = TestEnv::new();
    let statement = env.write_file("incoming/bank/statement_2021.csv");
    let misnamed = env.write_file("incoming/bank/notes.csv");
    let broker = env.write_file("incoming/acct1/broker/trades.csv");
    let too_deep = env.write_file("incoming/acct1/extra/broker/trades.csv");
    let stray = env.write_file("stray.csv");

    let config = IngestConfig::from_toml(CONFIG).unwrap();
    let registry = config.registry().unwrap();

    let subtype = |p: &Path| registry.determine_path(p).unwrap().map(|s| s.name().to_string());
    assert_eq!(subtype(&statement).as_deref(), Some("bank_statements"));
    assert_eq!(subtype(&misnamed), None);
    assert_eq!(subtype(&broker).as_deref(), Some("broker_exports"));
    assert_eq!(subtype(&too_deep), None);
    // A rule without directories never matches, even when the name does.
    assert_eq!(subtype(&stray), None);

    let bank = registry.get("bank_statements").unwrap();
    assert_eq!(bank.csv_layout().unwrap().columns.len(), 3);
}

#[test]
fn test_registry_rejects_relative_paths() {
    let registry = SubtypeRegistry::new();
    let err = registry.determine_path(Path::new("incoming/bank/statement_2021.csv")).unwrap_err();
    assert!(matches!(
        err,
        ingest_subtype::SubtypeError::Path(PathError::Relative(_))
    ));
}
