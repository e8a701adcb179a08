use std::sync::{
    Arc,
    mpsc::{self, Receiver, Sender},
};

use log::{debug, error, info};
use tokio::runtime::Handle;

use crate::{PaddockError, driver::DriverProfile, ergast::DriverDataSource};

/// What the driver view can currently show.
#[derive(Clone, Debug)]
pub enum ViewState {
    Loading {
        driver_id: String,
    },
    Ready {
        driver_id: String,
        profile: Arc<DriverProfile>,
    },
    Failed {
        driver_id: String,
        reason: String,
    },
}

impl ViewState {
    pub fn driver_id(&self) -> &str {
        match self {
            Self::Loading { driver_id }
            | Self::Ready { driver_id, .. }
            | Self::Failed { driver_id, .. } => driver_id,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn profile(&self) -> Option<&Arc<DriverProfile>> {
        match self {
            Self::Ready { profile, .. } => Some(profile),
            _ => None,
        }
    }
}

/// Receives fetch failures so they can be surfaced somewhere other than the view.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, driver_id: &str, error: &PaddockError);
}

/// Reports failures through the `log` facade.
#[derive(Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, driver_id: &str, error: &PaddockError) {
        error!("Error fetching data for {}: {:?}", driver_id, error);
    }
}

/// Identifies one issued fetch. Only the ticket of the latest request is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub driver_id: String,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<DriverProfile, PaddockError>,
}

type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Owns the view state of one driver page.
///
/// Fetches run on the tokio runtime and hand their outcome back over a channel;
/// the state itself is only written from the thread calling [`ViewController::poll`].
pub struct ViewController {
    state: ViewState,
    generation: u64,
    season: String,
    source: Arc<dyn DriverDataSource>,
    reporter: Arc<dyn ErrorReporter>,
    runtime: Handle,
    outcome_tx: Sender<FetchOutcome>,
    outcome_rx: Receiver<FetchOutcome>,
    repaint_hook: Option<RepaintHook>,
}

impl ViewController {
    pub fn new(
        source: Arc<dyn DriverDataSource>,
        reporter: Arc<dyn ErrorReporter>,
        runtime: Handle,
        season: &str,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            state: ViewState::Loading {
                driver_id: String::new(),
            },
            generation: 0,
            season: season.to_string(),
            source,
            reporter,
            runtime,
            outcome_tx,
            outcome_rx,
            repaint_hook: None,
        }
    }

    /// Called after every outcome lands, typically to wake up the UI.
    pub fn set_repaint_hook(&mut self, hook: impl Fn() + Send + Sync + 'static) {
        self.repaint_hook = Some(Arc::new(hook));
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    /// Enters `Loading` for `driver_id` and issues the fetch.
    pub fn load(&mut self, driver_id: &str) {
        let ticket = self.begin(driver_id);
        let source = self.source.clone();
        let outcome_tx = self.outcome_tx.clone();
        let season = self.season.clone();
        let repaint_hook = self.repaint_hook.clone();

        self.runtime.spawn(async move {
            let result = source.fetch_driver(&season, &ticket.driver_id).await;
            if outcome_tx.send(FetchOutcome { ticket, result }).is_err() {
                debug!("Driver view closed before fetch completed");
                return;
            }
            if let Some(hook) = repaint_hook {
                hook();
            }
        });
    }

    /// Navigates to `driver_id`. Asking again for the driver already shown or
    /// loading is a no-op, unless its last fetch failed, which retries it.
    /// Returns true if a fetch was issued.
    pub fn request(&mut self, driver_id: &str) -> bool {
        if driver_id != self.state.driver_id() {
            self.load(driver_id);
            return true;
        }
        if matches!(self.state, ViewState::Failed { .. }) {
            info!("Retrying {}", driver_id);
            self.retry();
            return true;
        }
        false
    }

    /// Reissues the fetch for the current driver.
    pub fn retry(&mut self) {
        let driver_id = self.state.driver_id().to_string();
        self.load(&driver_id);
    }

    /// Applies every outcome delivered since the last call.
    /// Returns true if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.finish(outcome);
        }
        changed
    }

    /// State transition for a new request, without issuing any I/O.
    pub fn begin(&mut self, driver_id: &str) -> FetchTicket {
        self.generation += 1;
        self.state = ViewState::Loading {
            driver_id: driver_id.to_string(),
        };
        FetchTicket {
            generation: self.generation,
            driver_id: driver_id.to_string(),
        }
    }

    /// State transition for a completed request. Outcomes of superseded
    /// requests are dropped and leave the state untouched.
    pub fn finish(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { ticket, result } = outcome;
        if ticket.generation != self.generation || ticket.driver_id != self.state.driver_id() {
            debug!(
                "Discarding stale response for {} (request {}, current {})",
                ticket.driver_id, ticket.generation, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(profile) => {
                info!(
                    "Showing {} with {} races",
                    ticket.driver_id,
                    profile.races.len()
                );
                ViewState::Ready {
                    driver_id: ticket.driver_id,
                    profile: Arc::new(profile),
                }
            }
            Err(e) => {
                self.reporter.report(&ticket.driver_id, &e);
                ViewState::Failed {
                    driver_id: ticket.driver_id,
                    reason: e.summary(),
                }
            }
        };
        true
    }
}
