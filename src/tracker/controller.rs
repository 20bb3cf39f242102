use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::deadline::local_today;
use super::filter::{apply_filters, StatusFilter};
use super::models::{Job, JobId, JobStatus};
use super::render::{project, View};
use super::repository::{order_jobs, FetchError, JobRepository, UpdateError};

/// Oldest notices are dropped past this count
pub const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    FetchFailed,
    StatusUpdateFailed,
    MemoUpdateFailed,
}

/// User-visible failure message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub detail: String,
}

/// Everything a renderer needs, republished after every transition
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    /// A list call is in flight
    pub loading: bool,
    pub status_filter: StatusFilter,
    pub urgent_only: bool,
    /// Size of the loaded collection before filtering
    pub total: usize,
    pub view: View,
    pub notices: Vec<Notice>,
}

/// User input routed to the controller
#[derive(Debug)]
pub enum Command {
    Reload,
    SetFilters {
        status_filter: StatusFilter,
        urgent_only: bool,
    },
    SetStatusFilter(StatusFilter),
    ToggleUrgentOnly,
    StatusChanged { id: JobId, status: JobStatus },
    /// Memo committed by the input losing focus
    MemoChanged { id: JobId, memo: String },
    DismissNotices,
}

/// Completion of a spawned repository call
enum Event {
    Listed(Result<Vec<Job>, FetchError>),
    StatusSaved {
        id: JobId,
        result: Result<(), UpdateError>,
    },
    MemoSaved {
        id: JobId,
        result: Result<(), UpdateError>,
    },
}

/// The controller task has stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerClosed;

impl fmt::Display for ControllerClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sync controller is not running")
    }
}

impl std::error::Error for ControllerClosed {}

/// Cloneable front for the controller task
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl ControllerHandle {
    pub async fn send(&self, command: Command) -> Result<(), ControllerClosed> {
        self.commands.send(command).await.map_err(|_| ControllerClosed)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Owns the in-memory job collection and drives the load/filter/edit cycle.
///
/// Runs as a single task: commands arrive on a bounded channel, repository
/// calls are spawned and report back as events, and every transition
/// publishes a fresh [`Snapshot`].
///
/// Edits are fire-and-forget. The entered value is reflected into the
/// collection and the rendered row right away; a failed write only raises a
/// notice and is never rolled back (last write wins at the store).
pub struct SyncController<R: JobRepository> {
    repository: Arc<R>,
    jobs: Vec<Job>,
    status_filter: StatusFilter,
    urgent_only: bool,
    phase: Phase,
    has_loaded: bool,
    lists_in_flight: usize,
    view: View,
    notices: Vec<Notice>,
    today: fn() -> NaiveDate,
    commands: mpsc::Receiver<Command>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    snapshots: watch::Sender<Snapshot>,
}

impl<R: JobRepository> SyncController<R> {
    pub fn new(repository: Arc<R>, buffer: usize) -> (Self, ControllerHandle) {
        let (commands_tx, commands) = mpsc::channel(buffer.max(1));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let initial = Snapshot {
            phase: Phase::Idle,
            loading: false,
            status_filter: StatusFilter::All,
            urgent_only: false,
            total: 0,
            view: View::empty(),
            notices: Vec::new(),
        };
        let (snapshots, snapshots_rx) = watch::channel(initial);

        let controller = Self {
            repository,
            jobs: Vec::new(),
            status_filter: StatusFilter::All,
            urgent_only: false,
            phase: Phase::Idle,
            has_loaded: false,
            lists_in_flight: 0,
            view: View::empty(),
            notices: Vec::new(),
            today: local_today,
            commands,
            events_tx,
            events_rx,
            snapshots,
        };
        let handle = ControllerHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
        };
        (controller, handle)
    }

    /// Replace the source of "today" used for D-day computation
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Load once, then process commands and completions until shutdown is
    /// signalled or every handle is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Sync controller started");
        self.reload();

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        info!("All controller handles dropped, stopping sync controller");
                        break;
                    }
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown signal received, stopping sync controller");
                        break;
                    }
                }
            }
        }

        if self.lists_in_flight > 0 {
            warn!("Sync controller stopped with {} list calls in flight", self.lists_in_flight);
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Reload => self.reload(),
            Command::SetFilters {
                status_filter,
                urgent_only,
            } => {
                self.status_filter = status_filter;
                self.urgent_only = urgent_only;
                self.rerender();
            }
            Command::SetStatusFilter(status_filter) => {
                self.status_filter = status_filter;
                self.rerender();
            }
            Command::ToggleUrgentOnly => {
                self.urgent_only = !self.urgent_only;
                self.rerender();
            }
            Command::StatusChanged { id, status } => self.change_status(id, status),
            Command::MemoChanged { id, memo } => self.change_memo(id, memo),
            Command::DismissNotices => {
                self.notices.clear();
                self.publish();
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Listed(result) => self.apply_listed(result),
            Event::StatusSaved { id, result } => match result {
                Ok(()) => debug!("Status of job {} saved", id),
                Err(e) => {
                    error!("Error updating status of job {}: {}", id, e);
                    self.raise(NoticeKind::StatusUpdateFailed, "상태 업데이트 실패", Some(id), &e);
                }
            },
            Event::MemoSaved { id, result } => match result {
                Ok(()) => debug!("Memo of job {} saved", id),
                Err(e) => {
                    error!("Error updating memo of job {}: {}", id, e);
                    self.raise(NoticeKind::MemoUpdateFailed, "메모 업데이트 실패", Some(id), &e);
                }
            },
        }
    }

    fn reload(&mut self) {
        self.lists_in_flight += 1;
        self.phase = Phase::Loading;
        self.publish();
        debug!("Fetching jobs ({} list calls in flight)", self.lists_in_flight);

        let repository = Arc::clone(&self.repository);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = repository.list().await;
            if events.send(Event::Listed(result)).is_err() {
                debug!("Sync controller gone before job list arrived");
            }
        });
    }

    fn apply_listed(&mut self, result: Result<Vec<Job>, FetchError>) {
        self.lists_in_flight = self.lists_in_flight.saturating_sub(1);
        match result {
            Ok(mut jobs) => {
                order_jobs(&mut jobs);
                info!("Loaded {} jobs", jobs.len());
                self.jobs = jobs;
                self.has_loaded = true;
                self.phase = self.settled_phase(Phase::Ready);
                self.rerender();
            }
            Err(e) => {
                error!("Error fetching jobs: {}", e);
                let fallback = if self.has_loaded {
                    Phase::Ready
                } else {
                    Phase::Error
                };
                self.phase = self.settled_phase(fallback);
                self.raise(NoticeKind::FetchFailed, "데이터를 가져오는데 실패했습니다.", None, &e);
            }
        }
    }

    /// Stay in `Loading` until the last in-flight list call has completed
    fn settled_phase(&self, phase: Phase) -> Phase {
        if self.lists_in_flight > 0 {
            Phase::Loading
        } else {
            phase
        }
    }

    fn change_status(&mut self, id: JobId, status: JobStatus) {
        match self.jobs.iter_mut().find(|job| job.id == id) {
            Some(job) => job.status = status,
            None => warn!("Status change for job {} which is not loaded", id),
        }
        self.view.patch_row(id, |row| row.status = status);
        self.publish();

        let repository = Arc::clone(&self.repository);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = repository.update_status(id, status).await;
            if events.send(Event::StatusSaved { id, result }).is_err() {
                debug!("Sync controller gone before status update of job {} finished", id);
            }
        });
    }

    fn change_memo(&mut self, id: JobId, memo: String) {
        match self.jobs.iter_mut().find(|job| job.id == id) {
            Some(job) => job.memo = memo.clone(),
            None => warn!("Memo change for job {} which is not loaded", id),
        }
        self.view.patch_row(id, |row| row.memo = memo.clone());
        self.publish();

        let repository = Arc::clone(&self.repository);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = repository.update_memo(id, &memo).await;
            if events.send(Event::MemoSaved { id, result }).is_err() {
                debug!("Sync controller gone before memo update of job {} finished", id);
            }
        });
    }

    fn rerender(&mut self) {
        let today = (self.today)();
        let filtered = apply_filters(&self.jobs, self.status_filter, self.urgent_only, today);
        self.view = project(&filtered, today);
        self.publish();
    }

    fn raise(&mut self, kind: NoticeKind, message: &str, job_id: Option<JobId>, cause: &dyn fmt::Display) {
        self.notices.push(Notice {
            kind,
            message: message.to_string(),
            job_id,
            detail: cause.to_string(),
        });
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(Snapshot {
            phase: self.phase,
            loading: self.lists_in_flight > 0,
            status_filter: self.status_filter,
            urgent_only: self.urgent_only,
            total: self.jobs.len(),
            view: self.view.clone(),
            notices: self.notices.clone(),
        });
    }
}
