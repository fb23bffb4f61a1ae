//! 每日多產業排程掃描
//!
//! ```text
//! Idle ──(daily_at)──► Scanning { construction } ─► … ─► Scanning { healthcare } ──► Idle
//!                          │ find_tenders → append       ▲
//!                          └── sleep(sector_delay) ──────┘
//! ```
//!
//! 每一輪先排成 [`SectorTask`] 佇列，由單一 worker 依序執行。
//! 間隔記在 task 上 (`delay_before`)，透過 `tokio::time` 等待，測試可用暫停的時鐘。

use crate::core::scanner::TenderScanner;
use crate::domain::model::ScanRequest;
use crate::domain::ports::{ExtractionGateway, OpportunityStore, SourceSelector};
use chrono::{Local, NaiveDateTime, NaiveTime};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_SECTORS: [&str; 4] = ["construction", "agriculture", "technology", "healthcare"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scanning { sector: String },
}

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub daily_at: NaiveTime,
    pub sector_delay: Duration,
    pub sectors: Vec<String>,
    pub run_on_startup: bool,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            daily_at: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            sector_delay: Duration::from_secs(60),
            sectors: DEFAULT_SECTORS.iter().map(|s| s.to_string()).collect(),
            run_on_startup: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorTask {
    pub sector: String,
    pub delay_before: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sectors_scanned: usize,
    pub records_persisted: usize,
    pub failures: Vec<SectorFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorFailure {
    pub sector: String,
    pub message: String,
}

/// 距離 `now` 之後下一個 `at` 的時間；剛好等於 `now` 視為已觸發，順延到明天
pub fn until_next_trigger(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let today = now.date().and_time(at);
    let next = if now < today {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or_default()
}

pub struct ScanScheduler<G, R, S>
where
    G: ExtractionGateway,
    R: SourceSelector,
    S: OpportunityStore,
{
    scanner: Arc<TenderScanner<G, R>>,
    store: Arc<S>,
    settings: SchedulerSettings,
    state: watch::Sender<SchedulerState>,
}

impl<G, R, S> ScanScheduler<G, R, S>
where
    G: ExtractionGateway + 'static,
    R: SourceSelector + 'static,
    S: OpportunityStore + 'static,
{
    pub fn new(scanner: Arc<TenderScanner<G, R>>, store: Arc<S>, settings: SchedulerSettings) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            scanner,
            store,
            settings,
            state,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// 每個產業一個 task；第一個立即執行，其餘先等待 `sector_delay`
    pub fn plan_run(&self) -> VecDeque<SectorTask> {
        self.settings
            .sectors
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(i, sector)| SectorTask {
                sector: sector.to_string(),
                delay_before: if i == 0 {
                    Duration::ZERO
                } else {
                    self.settings.sector_delay
                },
            })
            .collect()
    }

    /// 每個產業掃描一次；單一產業失敗只記錄並收集，不中斷整輪
    pub async fn run_once(&self) -> RunSummary {
        let mut queue = self.plan_run();
        let mut summary = RunSummary::default();
        tracing::info!("🚀 Starting daily scan of {} sectors", queue.len());

        while let Some(task) = queue.pop_front() {
            if !task.delay_before.is_zero() {
                tracing::debug!("Pausing {:?} before sector '{}'", task.delay_before, task.sector);
                tokio::time::sleep(task.delay_before).await;
            }

            self.state.send_replace(SchedulerState::Scanning {
                sector: task.sector.clone(),
            });
            tracing::info!("🔍 Scanning sector: {}", task.sector);
            summary.sectors_scanned += 1;

            let opportunities = match self
                .scanner
                .find_tenders(&ScanRequest::for_sector(task.sector.clone()))
                .await
            {
                Ok(found) => found,
                Err(e) => {
                    tracing::error!("❌ Error scanning sector {}: {}", task.sector, e);
                    summary.failures.push(SectorFailure {
                        sector: task.sector,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if opportunities.is_empty() {
                continue;
            }

            match self.store.append(&opportunities).await {
                Ok(written) => {
                    tracing::info!("💾 Saved {} opportunities for {}", written, task.sector);
                    summary.records_persisted += written;
                }
                Err(e) => {
                    tracing::error!("❌ Failed to save sector {}: {}", task.sector, e);
                    summary.failures.push(SectorFailure {
                        sector: task.sector,
                        message: e.to_string(),
                    });
                }
            }
        }

        self.state.send_replace(SchedulerState::Idle);
        tracing::info!(
            "✅ Daily scan finished: {} sectors, {} records saved, {} failures",
            summary.sectors_scanned,
            summary.records_persisted,
            summary.failures.len()
        );
        summary
    }

    /// 等待每日觸發時間並執行完整掃描，不會返回
    pub async fn run_forever(&self) {
        if self.settings.run_on_startup {
            self.run_once().await;
        }

        loop {
            let wait = until_next_trigger(Local::now().naive_local(), self.settings.daily_at);
            tracing::info!(
                "⏰ Next scan at {} (in {}m)",
                self.settings.daily_at.format("%H:%M"),
                wait.as_secs() / 60
            );
            tokio::time::sleep(wait).await;
            self.run_once().await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run_forever().await })
    }
}
