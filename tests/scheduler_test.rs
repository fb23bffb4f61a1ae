use async_trait::async_trait;
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tender_scout::domain::ports::{
    CrawlRequest, CrawlResult, ExtractionGateway, ExtractionSchema, OpportunityStore,
};
use tender_scout::{
    FixedSelector, Opportunity, ScanScheduler, ScanSettings, ScannedOpportunity,
    SchedulerSettings, SchedulerState, ScoutError, TenderScanner,
};
use tokio::sync::Mutex;

/// Gateway that is always down, so every sector resolves to its canned fallback records.
struct DownGateway;

#[async_trait]
impl ExtractionGateway for DownGateway {
    async fn generate_schema(&self, _prompt: &str) -> tender_scout::Result<ExtractionSchema> {
        Err(ScoutError::Gateway {
            status: 503,
            message: "unavailable".to_string(),
        })
    }

    async fn crawl(&self, _request: CrawlRequest) -> tender_scout::Result<Option<CrawlResult>> {
        Ok(None)
    }
}

#[derive(Clone, Default)]
struct MockStore {
    records: Arc<Mutex<Vec<ScannedOpportunity>>>,
    batches: Arc<Mutex<usize>>,
    reject_titles_containing: Option<&'static str>,
}

impl MockStore {
    fn rejecting(fragment: &'static str) -> Self {
        Self {
            reject_titles_containing: Some(fragment),
            ..Default::default()
        }
    }
}

impl OpportunityStore for MockStore {
    async fn append(&self, records: &[Opportunity]) -> tender_scout::Result<usize> {
        if let Some(fragment) = self.reject_titles_containing {
            if records.iter().any(|r| r.title.contains(fragment)) {
                return Err(ScoutError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "disk is read-only",
                )));
            }
        }

        let scanned_at = Utc::now();
        let mut stored = self.records.lock().await;
        stored.extend(
            records
                .iter()
                .cloned()
                .map(|r| ScannedOpportunity::stamp(r, scanned_at)),
        );
        *self.batches.lock().await += 1;
        Ok(records.len())
    }

    async fn read_all(&self) -> Vec<ScannedOpportunity> {
        self.records.lock().await.clone()
    }
}

fn settings(delay_secs: u64) -> SchedulerSettings {
    SchedulerSettings {
        sector_delay: Duration::from_secs(delay_secs),
        ..Default::default()
    }
}

fn scheduler(
    store: MockStore,
    settings: SchedulerSettings,
) -> ScanScheduler<DownGateway, FixedSelector, MockStore> {
    let scanner = TenderScanner::new(Some(DownGateway), FixedSelector::default(), ScanSettings::default());
    ScanScheduler::new(Arc::new(scanner), Arc::new(store), settings)
}

#[tokio::test(start_paused = true)]
async fn test_run_once_scans_every_sector_in_order_with_pacing() {
    let store = MockStore::default();
    let scheduler = scheduler(store.clone(), settings(60));
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    let started = tokio::time::Instant::now();
    let summary = scheduler.run_once().await;
    let elapsed = started.elapsed();

    assert_eq!(summary.sectors_scanned, 4);
    assert_eq!(summary.records_persisted, 12);
    assert!(summary.failures.is_empty());
    assert_eq!(*store.batches.lock().await, 4);

    // 三次間隔，最後一個 sector 之後不再等待
    assert!(elapsed >= Duration::from_secs(180), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(181), "elapsed {:?}", elapsed);

    let records = store.read_all().await;
    assert_eq!(records[0].opportunity.title, "Construction of G+4 Mixed Use Building in Addis Ababa");
    assert_eq!(records[3].opportunity.title, "Supply of 5000 Quintals of Urea Fertilizer");
    assert_eq!(records[6].opportunity.title, "Supply of High Performance Computing Servers for Head Office");
    assert_eq!(records[9].opportunity.title, "Procurement of Medical Imaging Equipment (MRI/CT)");

    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_sector_failure_does_not_abort_run() {
    let store = MockStore::rejecting("Urea Fertilizer");
    let scheduler = scheduler(store.clone(), settings(60));

    let summary = scheduler.run_once().await;

    assert_eq!(summary.sectors_scanned, 4);
    assert_eq!(summary.records_persisted, 9);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].sector, "agriculture");

    // 失敗前後的 sector 都已寫入
    let records = store.read_all().await;
    assert_eq!(records.len(), 9);
    assert!(records.iter().all(|r| !r.opportunity.title.contains("Fertilizer")));
    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_state_passes_through_scanning() {
    let scheduler = scheduler(MockStore::default(), settings(1));
    let mut rx = scheduler.subscribe();

    scheduler.run_once().await;

    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), SchedulerState::Idle);
}

#[test]
fn test_plan_run_paces_all_but_first_sector() {
    let mut custom = settings(30);
    custom.sectors = vec!["healthcare".to_string(), " ".to_string(), "energy".to_string()];
    let scheduler = scheduler(MockStore::default(), custom);

    let plan: Vec<(String, Duration)> = scheduler
        .plan_run()
        .into_iter()
        .map(|t| (t.sector, t.delay_before))
        .collect();

    assert_eq!(
        plan,
        vec![
            ("healthcare".to_string(), Duration::ZERO),
            ("energy".to_string(), Duration::from_secs(30)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_spawned_loop_runs_on_startup_and_at_daily_trigger() {
    let store = MockStore::default();
    let mut custom = settings(60);
    custom.run_on_startup = true;
    custom.daily_at = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

    let handle = scheduler(store.clone(), custom).spawn();

    // 兩天的虛擬時間內至少跑完開機那一輪與一次每日觸發
    tokio::time::sleep(Duration::from_secs(2 * 24 * 3600)).await;
    handle.abort();

    let runs = *store.batches.lock().await / 4;
    assert!(runs >= 2, "only {} runs", runs);
    assert!(store.read_all().await.len() >= 24);
}
