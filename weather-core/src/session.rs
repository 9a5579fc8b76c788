//! One user-initiated lookup at a time, rendered into a shared [`ViewModel`].
//!
//! The session publishes every view change through a `tokio::sync::watch`
//! channel so a front-end can redraw while requests are in flight.
//!
//! Overlapping lookups are allowed. Each one takes a new generation number
//! and only the newest generation may touch the view; an older lookup that
//! resolves later is discarded as [`LookupOutcome::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, NaiveDate, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    forecast::select_midday,
    model::{CurrentLookup, LookupQuery},
    provider::WeatherProvider,
    view::{Panel, ViewModel, render_current, render_forecast},
};

/// Source of "today" for forecast filtering and the date label.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// UTC calendar date; matches the provider's UTC forecast timestamps.
    fn today(&self) -> NaiveDate;

    /// Calendar date shown to the user.
    fn local_today(&self) -> NaiveDate {
        self.today()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn local_today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// How a call to [`WeatherSession::lookup`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Blank input; nothing was requested and the view is untouched.
    Rejected,
    /// Results panel shown (forecast may be empty if it failed).
    Found,
    NotFound,
    /// Current conditions could not be fetched; logged, view left as it was.
    Failed,
    /// A newer lookup started before this one resolved.
    Superseded,
}

#[derive(Debug)]
pub struct WeatherSession<P> {
    provider: P,
    clock: Box<dyn Clock>,
    view: watch::Sender<ViewModel>,
    generation: AtomicU64,
}

impl<P: WeatherProvider> WeatherSession<P> {
    pub fn new(provider: P) -> Self {
        let (view, _) = watch::channel(ViewModel::default());
        Self {
            provider,
            clock: Box::new(SystemClock),
            view,
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Receiver that observes every view change.
    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.view.subscribe()
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> ViewModel {
        self.view.borrow().clone()
    }

    /// Look up `raw` (a city name) and render the result.
    ///
    /// Never fails: provider errors are logged and leave the panel as it was.
    /// The loading overlay is raised for the duration of the newest lookup
    /// and always lowered when that lookup resolves.
    #[instrument(skip(self), fields(city = raw.trim()))]
    pub async fn lookup(&self, raw: &str) -> LookupOutcome {
        let Ok(query) = LookupQuery::parse(raw) else {
            debug!("ignoring empty query");
            return LookupOutcome::Rejected;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.send_modify(|v| v.loading = true);

        let outcome = self.run(&query, generation).await;

        if self.is_latest(generation) {
            self.view.send_modify(|v| v.loading = false);
        }

        debug!(?outcome, generation, "lookup finished");
        outcome
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(&self, query: &LookupQuery, generation: u64) -> LookupOutcome {
        let current = self.provider.current(query).await;

        if !self.is_latest(generation) {
            return LookupOutcome::Superseded;
        }

        let conditions = match current {
            Ok(CurrentLookup::Found(conditions)) => conditions,
            Ok(CurrentLookup::NotFound { message }) => {
                info!(%message, "city not found");
                self.view.send_modify(|v| v.show(Panel::NotFound));
                return LookupOutcome::NotFound;
            }
            Err(err) => {
                error!(error = %err.chain(), "error fetching weather data");
                return LookupOutcome::Failed;
            }
        };

        let today = self.clock.today();
        let current_view = render_current(&conditions, self.clock.local_today());

        // A failed forecast must not hide the current conditions.
        let forecast = match self.provider.forecast(query).await {
            Ok(samples) => match select_midday(&samples, today) {
                Ok(entries) => render_forecast(&entries),
                Err(err) => {
                    warn!(error = %err, "error reading forecast data");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(error = %err.chain(), "error fetching forecast data");
                Vec::new()
            }
        };

        if !self.is_latest(generation) {
            return LookupOutcome::Superseded;
        }

        info!(city = %conditions.city_name, days = forecast.len(), "weather rendered");
        self.view.send_modify(|v| {
            v.current = Some(current_view);
            v.forecast = forecast;
            v.show(Panel::Results);
        });

        LookupOutcome::Found
    }
}
