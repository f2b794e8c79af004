//! End-to-end service tests.
//!
//! These drive the full request path — fingerprint, store lookup,
//! refinement queue, approximate reduction, injection — against a stub
//! precise-pruning tool (a shell script launched via `sh`, standing in for
//! the real `node uncss.js` pair). `CssCut::shutdown` drains the queue so
//! every test observes the worker's terminal state deterministically.

#![cfg(unix)]

use csscut_core::{CssCut, CssCutConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PAGE: &str = concat!(
    "<html><head>",
    r#"<link rel="stylesheet" href="/site.css"/>"#,
    r#"<meta type="style"/>"#,
    "</head>",
    r#"<body class="a"><div id="x">t</div></body></html>"#,
);

struct Harness {
    _dir: TempDir,
    config: CssCutConfig,
    counter: std::path::PathBuf,
}

impl Harness {
    /// Set up a www root with one stylesheet and a stub tool whose body is
    /// `script`. The stub can use `$COUNTER` (textually substituted) to
    /// record invocations.
    fn new(script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let counter = dir.path().join("invocations");

        fs::write(
            dir.path().join("site.css"),
            ".a{color:red}.zz{color:blue}",
        )
        .unwrap();

        let tool = dir.path().join("tool.sh");
        fs::write(&tool, script.replace("$COUNTER", &counter.to_string_lossy())).unwrap();

        let config = CssCutConfig {
            www_root: dir.path().to_string_lossy().into_owned(),
            store_path: dir.path().join("store").to_string_lossy().into_owned(),
            clean_on_start: false,
            tool_command: "sh".to_string(),
            tool_script: tool.to_string_lossy().into_owned(),
            queue_capacity: 10,
            tmp_dir: dir.path().to_string_lossy().into_owned(),
        };

        Self {
            _dir: dir,
            config,
            counter,
        }
    }

    fn invocations(&self) -> usize {
        fs::read_to_string(&self.counter).map(|s| s.len()).unwrap_or(0)
    }
}

fn store_entries(store_path: &str) -> usize {
    match fs::read_dir(store_path) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                Path::new(&e.file_name())
                    .extension()
                    .is_some_and(|ext| ext == "json")
            })
            .count(),
        Err(_) => 0,
    }
}

#[test]
fn test_miss_serves_approximate_then_hit_serves_precise() {
    let h = Harness::new("printf x >> $COUNTER\nprintf '%s' '/***uncss***/.precise{color:green}'\n");

    let service = CssCut::open(h.config.clone()).unwrap();
    let first = service.cut_and_inject(PAGE).unwrap();

    // Miss: the approximate engine answers, link stripped, style inlined
    assert!(first.contains(".a{color:red}"));
    assert!(!first.contains(".zz{color:blue}"));
    assert!(!first.contains("/site.css"));
    assert!(first.contains("<style>"));

    service.shutdown();
    assert_eq!(h.invocations(), 1);

    // The cached entry serves future requests without touching the
    // stylesheet files at all.
    fs::remove_file(Path::new(&h.config.www_root).join("site.css")).unwrap();

    let service = CssCut::open(h.config.clone()).unwrap();
    let second = service.cut_and_inject(PAGE).unwrap();
    assert!(second.contains("<style>.precise{color:green}</style>"));
    // Tool comment markers are stripped before caching
    assert!(!second.contains("uncss"));
    service.shutdown();

    // Cache hit: no re-enqueue reached the tool
    assert_eq!(h.invocations(), 1);
}

#[test]
fn test_refinement_runs_once_per_fingerprint() {
    let h = Harness::new("printf x >> $COUNTER\nprintf '%s' '.precise{}'\n");

    let service = CssCut::open(h.config.clone()).unwrap();
    service.get_cut_css(PAGE).unwrap();
    service.get_cut_css(PAGE).unwrap();
    service.shutdown();

    // Two enqueues, one refinement: the second job found the fingerprint
    // already stored and was discarded.
    assert_eq!(h.invocations(), 1);
    assert_eq!(store_entries(&h.config.store_path), 1);
}

#[test]
fn test_tool_failure_abandons_without_caching() {
    let h = Harness::new("printf x >> $COUNTER\necho 'boom' >&2\nexit 3\n");

    let service = CssCut::open(h.config.clone()).unwrap();
    let css = service.get_cut_css(PAGE).unwrap();
    assert!(css.contains(".a{color:red}"));
    service.shutdown();

    assert_eq!(h.invocations(), 1);
    assert_eq!(store_entries(&h.config.store_path), 0);

    // The failure never surfaces to requests; they keep getting the
    // approximate reduction and keep re-triggering refinement.
    let service = CssCut::open(h.config.clone()).unwrap();
    let css = service.get_cut_css(PAGE).unwrap();
    assert!(css.contains(".a{color:red}"));
    service.shutdown();
    assert_eq!(h.invocations(), 2);
}

#[test]
fn test_page_without_local_stylesheets_is_a_noop_job() {
    let h = Harness::new("printf x >> $COUNTER\nprintf '%s' '.precise{}'\n");
    let html = r#"<html><head><meta type="style"/></head><body></body></html>"#;

    let service = CssCut::open(h.config.clone()).unwrap();
    let out = service.cut_and_inject(html).unwrap();
    assert!(out.contains("<style></style>"));
    service.shutdown();

    // Empty stylesheet list: the job is discarded before the tool runs
    assert_eq!(h.invocations(), 0);
    assert_eq!(store_entries(&h.config.store_path), 0);
}

#[test]
fn test_tool_payload_shape() {
    let h = Harness::new("cat \"$1\" > $COUNTER\nprintf '%s' '.precise{}'\n");

    let service = CssCut::open(h.config.clone()).unwrap();
    service.get_cut_css(PAGE).unwrap();
    service.shutdown();

    let payload: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&h.counter).unwrap()).unwrap();
    let paths = payload["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].as_str().unwrap().ends_with("/site.css"));
    assert_eq!(payload["html"].as_str().unwrap(), PAGE);
}

#[test]
fn test_missing_stylesheet_file_aborts_request() {
    let h = Harness::new("printf '%s' '.precise{}'\n");
    fs::remove_file(Path::new(&h.config.www_root).join("site.css")).unwrap();

    let service = CssCut::open(h.config.clone()).unwrap();
    assert!(service.cut_and_inject(PAGE).is_err());
    service.shutdown();
}

#[test]
fn test_clean_on_start_drops_cached_styles() {
    let h = Harness::new("printf '%s' '.precise{}'\n");

    let service = CssCut::open(h.config.clone()).unwrap();
    service.get_cut_css(PAGE).unwrap();
    service.shutdown();
    assert_eq!(store_entries(&h.config.store_path), 1);

    let mut config = h.config.clone();
    config.clean_on_start = true;
    let service = CssCut::open(config.clone()).unwrap();
    assert_eq!(store_entries(&config.store_path), 0);
    service.shutdown();
}
