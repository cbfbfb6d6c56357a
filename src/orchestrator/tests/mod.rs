use super::*;
use crate::types::Listing;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{tempdir, TempDir};

fn listing(organization: &str, title: &str) -> Listing {
    Listing {
        title: title.into(),
        organization: organization.into(),
        location: "Remote (Global)".into(),
        compensation: "$120,000 - $150,000".into(),
        description: "test listing".into(),
        url: "https://example.com/job/1".into(),
        posted_date: "2026-08-29".into(),
        organization_size: "100-500".into(),
    }
}

fn query(name: &str, source: SourceKind) -> Query {
    Query {
        name: name.into(),
        role: "Software Engineer".into(),
        location: "Remote (APAC)".into(),
        remote: true,
        level: "senior".into(),
        source,
    }
}

/// Returns the same listings on every fetch
struct StubFetcher {
    kind: SourceKind,
    listings: Vec<Listing>,
}

#[async_trait]
impl SourceFetcher for StubFetcher {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, _role: &str, _location: &str, _remote: bool) -> Result<Vec<Listing>> {
        Ok(self.listings.clone())
    }
}

/// Always fails with a fetch error
struct FailingFetcher {
    kind: SourceKind,
}

#[async_trait]
impl SourceFetcher for FailingFetcher {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, _role: &str, _location: &str, _remote: bool) -> Result<Vec<Listing>> {
        Err(Error::Fetch {
            source: self.kind.name().into(),
            message: "connection reset".into(),
        })
    }
}

/// Panics inside fetch, exercising JoinError degradation
struct PanickingFetcher {
    kind: SourceKind,
}

#[async_trait]
impl SourceFetcher for PanickingFetcher {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, _role: &str, _location: &str, _remote: bool) -> Result<Vec<Listing>> {
        panic!("fetcher blew up");
    }
}

/// Tracks how many fetches run at once
struct ConcurrencyProbe {
    kind: SourceKind,
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

#[async_trait]
impl SourceFetcher for ConcurrencyProbe {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, _role: &str, _location: &str, _remote: bool) -> Result<Vec<Listing>> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![listing("Probe Corp", "Engineer")])
    }
}

fn orchestrator_with(
    dir: &TempDir,
    fetchers: Vec<Arc<dyn SourceFetcher>>,
) -> Orchestrator {
    let config = OrchestratorConfig {
        data_dir: dir.path().to_path_buf(),
        max_concurrent: 3,
    };
    let registry = fetchers.into_iter().map(|f| (f.kind(), f)).collect();
    Orchestrator::with_fetchers(config, registry)
}

fn three_listings(prefix: &str) -> Vec<Listing> {
    vec![
        listing(&format!("{prefix} One"), "Engineer"),
        listing(&format!("{prefix} Two"), "Lead Engineer"),
        listing(&format!("{prefix} Three"), "Staff Engineer"),
    ]
}

#[tokio::test]
async fn three_fresh_queries_commit_everything() {
    let dir = tempdir().unwrap();
    let orchestrator = orchestrator_with(
        &dir,
        vec![
            Arc::new(StubFetcher {
                kind: SourceKind::Remotive,
                listings: three_listings("Remotive"),
            }),
            Arc::new(StubFetcher {
                kind: SourceKind::Wellfound,
                listings: three_listings("Wellfound"),
            }),
        ],
    );

    let queries = vec![
        query("a.csv", SourceKind::Remotive),
        query("b.csv", SourceKind::Wellfound),
        query("c.csv", SourceKind::Remotive),
    ];
    let summary = orchestrator.run(queries).await.unwrap();

    assert_eq!(summary.total_queries, 3);
    assert_eq!(summary.successful_queries, 3);
    assert_eq!(summary.total_new, 9);
    assert_eq!(summary.total_duplicates, 0);
    for name in ["a.csv", "b.csv", "c.csv"] {
        let report = &summary.per_query[name];
        assert_eq!((report.new, report.duplicates), (3, 0), "{name}");
        assert!(report.error.is_none());
    }
}

#[tokio::test]
async fn second_identical_run_is_all_duplicates() {
    let dir = tempdir().unwrap();
    let orchestrator = orchestrator_with(
        &dir,
        vec![Arc::new(StubFetcher {
            kind: SourceKind::Dice,
            listings: three_listings("Dice"),
        })],
    );

    let first = orchestrator
        .run(vec![query("jobs.csv", SourceKind::Dice)])
        .await
        .unwrap();
    assert_eq!(first.total_new, 3);

    let second = orchestrator
        .run(vec![query("jobs.csv", SourceKind::Dice)])
        .await
        .unwrap();
    assert_eq!(second.total_new, 0);
    assert_eq!(second.total_duplicates, 3);
    assert_eq!(second.successful_queries, 1);
}

#[tokio::test]
async fn within_batch_duplicates_are_suppressed() {
    let dir = tempdir().unwrap();
    // Same organization/title modulo case and whitespace
    let orchestrator = orchestrator_with(
        &dir,
        vec![Arc::new(StubFetcher {
            kind: SourceKind::Remotive,
            listings: vec![
                listing("TechCorp Global", "Engineer"),
                listing("  TECHCORP GLOBAL ", "engineer "),
            ],
        })],
    );

    let summary = orchestrator
        .run(vec![query("jobs.csv", SourceKind::Remotive)])
        .await
        .unwrap();

    let report = &summary.per_query["jobs.csv"];
    assert_eq!(report.new, 1);
    assert_eq!(report.duplicates, 1);
}

#[tokio::test]
async fn accepted_listings_keep_fetch_order() {
    let dir = tempdir().unwrap();
    let store = ListingStore::new(dir.path(), "jobs.csv");
    // Pre-seed the middle listing so it gets discarded this run
    store.commit(&[listing("Beta Corp", "Engineer")]).unwrap();

    let orchestrator = orchestrator_with(
        &dir,
        vec![Arc::new(StubFetcher {
            kind: SourceKind::Remotive,
            listings: vec![
                listing("Gamma Corp", "Engineer"),
                listing("Beta Corp", "Engineer"),
                listing("Alpha Corp", "Engineer"),
            ],
        })],
    );

    let summary = orchestrator
        .run(vec![query("jobs.csv", SourceKind::Remotive)])
        .await
        .unwrap();
    assert_eq!(summary.per_query["jobs.csv"].new, 2);
    assert_eq!(summary.per_query["jobs.csv"].duplicates, 1);

    let content = std::fs::read_to_string(store.path()).unwrap();
    let organizations: Vec<&str> = content
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(organizations, ["Beta Corp", "Gamma Corp", "Alpha Corp"]);
}

#[tokio::test]
async fn pre_existing_key_counts_as_duplicate() {
    let dir = tempdir().unwrap();
    let store = ListingStore::new(dir.path(), "a.csv");
    store.commit(&[listing("TechCorp Global", "Role X")]).unwrap();

    let orchestrator = orchestrator_with(
        &dir,
        vec![Arc::new(StubFetcher {
            kind: SourceKind::Remotive,
            listings: vec![
                listing("TechCorp Global", "Role X"),
                listing("New Corp", "Role Y"),
                listing("Other Corp", "Role Z"),
            ],
        })],
    );

    let summary = orchestrator
        .run(vec![query("a.csv", SourceKind::Remotive)])
        .await
        .unwrap();

    let report = &summary.per_query["a.csv"];
    assert_eq!(report.new, 2);
    assert_eq!(report.duplicates, 1);
}

#[tokio::test]
async fn one_failing_fetch_leaves_siblings_intact() {
    let dir = tempdir().unwrap();
    let orchestrator = orchestrator_with(
        &dir,
        vec![
            Arc::new(StubFetcher {
                kind: SourceKind::Remotive,
                listings: three_listings("Remotive"),
            }),
            Arc::new(FailingFetcher {
                kind: SourceKind::Wellfound,
            }),
        ],
    );

    let summary = orchestrator
        .run(vec![
            query("good.csv", SourceKind::Remotive),
            query("bad.csv", SourceKind::Wellfound),
        ])
        .await
        .unwrap();

    assert_eq!(summary.total_queries, 2);
    assert_eq!(summary.successful_queries, 1);
    assert_eq!(summary.total_new, 3);
    assert_eq!(summary.per_query["good.csv"].new, 3);

    let failed = &summary.per_query["bad.csv"];
    assert_eq!((failed.new, failed.duplicates), (0, 0));
    assert!(failed.error.as_deref().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn panicking_fetcher_degrades_to_failed_result() {
    let dir = tempdir().unwrap();
    let orchestrator = orchestrator_with(
        &dir,
        vec![
            Arc::new(StubFetcher {
                kind: SourceKind::Remotive,
                listings: three_listings("Remotive"),
            }),
            Arc::new(PanickingFetcher {
                kind: SourceKind::Dice,
            }),
        ],
    );

    let summary = orchestrator
        .run(vec![
            query("steady.csv", SourceKind::Remotive),
            query("explosive.csv", SourceKind::Dice),
        ])
        .await
        .unwrap();

    assert_eq!(summary.total_queries, 2);
    assert_eq!(summary.successful_queries, 1);
    assert!(summary.per_query["explosive.csv"].error.is_some());
    assert_eq!(summary.per_query["steady.csv"].new, 3);
}

#[tokio::test]
async fn duplicate_query_names_abort_before_dispatch() {
    let dir = tempdir().unwrap();
    let orchestrator = orchestrator_with(
        &dir,
        vec![Arc::new(StubFetcher {
            kind: SourceKind::Remotive,
            listings: three_listings("Remotive"),
        })],
    );

    let err = orchestrator
        .run(vec![
            query("same.csv", SourceKind::Remotive),
            query("same.csv", SourceKind::Remotive),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
    assert!(
        !dir.path().join("same.csv").exists(),
        "no store may be touched before validation passes"
    );
}

#[tokio::test]
async fn unregistered_source_fails_only_that_query() {
    let dir = tempdir().unwrap();
    // Registry only knows Remotive; the Dice query must fail cleanly
    let orchestrator = orchestrator_with(
        &dir,
        vec![Arc::new(StubFetcher {
            kind: SourceKind::Remotive,
            listings: three_listings("Remotive"),
        })],
    );

    let summary = orchestrator
        .run(vec![
            query("known.csv", SourceKind::Remotive),
            query("unknown.csv", SourceKind::Dice),
        ])
        .await
        .unwrap();

    assert_eq!(summary.successful_queries, 1);
    assert!(summary.per_query["unknown.csv"]
        .error
        .as_deref()
        .unwrap()
        .contains("no fetcher registered"));
}

#[tokio::test]
async fn empty_query_list_yields_empty_summary() {
    let dir = tempdir().unwrap();
    let orchestrator = orchestrator_with(&dir, vec![]);

    let summary = orchestrator.run(vec![]).await.unwrap();
    assert_eq!(summary, Summary::default());
}

#[tokio::test]
async fn parallelism_stays_within_the_configured_bound() {
    let dir = tempdir().unwrap();
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let config = OrchestratorConfig {
        data_dir: dir.path().to_path_buf(),
        max_concurrent: 2,
    };
    let probe: Arc<dyn SourceFetcher> = Arc::new(ConcurrencyProbe {
        kind: SourceKind::Remotive,
        current: Arc::clone(&current),
        peak: Arc::clone(&peak),
    });
    let orchestrator =
        Orchestrator::with_fetchers(config, [(SourceKind::Remotive, probe)].into());

    let queries = (0..6)
        .map(|i| query(&format!("q{i}.csv"), SourceKind::Remotive))
        .collect();
    let summary = orchestrator.run(queries).await.unwrap();

    assert_eq!(summary.successful_queries, 6);
    assert!(
        peak.load(Ordering::SeqCst) <= 2,
        "peak concurrency {} exceeded the bound",
        peak.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn events_trace_the_run() {
    let dir = tempdir().unwrap();
    let orchestrator = orchestrator_with(
        &dir,
        vec![
            Arc::new(StubFetcher {
                kind: SourceKind::Remotive,
                listings: three_listings("Remotive"),
            }),
            Arc::new(FailingFetcher {
                kind: SourceKind::Wellfound,
            }),
        ],
    );

    let mut events = orchestrator.subscribe();
    orchestrator
        .run(vec![
            query("ok.csv", SourceKind::Remotive),
            query("broken.csv", SourceKind::Wellfound),
        ])
        .await
        .unwrap();

    let mut started = 0;
    let mut completed = 0;
    let mut failed = 0;
    let mut run_completed = false;
    while let Ok(event) = events.try_recv() {
        match event {
            SearchEvent::QueryStarted { .. } => started += 1,
            SearchEvent::QueryCompleted { query, new, .. } => {
                assert_eq!(query, "ok.csv");
                assert_eq!(new, 3);
                completed += 1;
            }
            SearchEvent::QueryFailed { query, .. } => {
                assert_eq!(query, "broken.csv");
                failed += 1;
            }
            SearchEvent::RunCompleted { total_new, .. } => {
                assert_eq!(total_new, 3);
                run_completed = true;
            }
        }
    }

    assert_eq!(started, 2);
    assert_eq!(completed, 1);
    assert_eq!(failed, 1);
    assert!(run_completed);
}
