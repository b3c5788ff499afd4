use std::{collections::VecDeque, path::PathBuf, thread::JoinHandle};

use derive_new::new;

use super::EguiApp;
use crate::chart::AxisField;
use app_core::event::{AppEvent, EventState};

// ---------------------------------------------------------------------------
//
//
// EventQueue
//
//
// ---------------------------------------------------------------------------

/// The EventQueue stores events that are processed each iteration
/// of the application GUI event loop, in the order they were queued.
pub struct EventQueue<A> {
    /// Stores events for later processing.
    queue: VecDeque<Box<dyn AppEvent<App = A>>>,
    /// Temporarily stores events that have not yet finished running.
    tmp_backlog: VecDeque<Box<dyn AppEvent<App = A>>>,
}

impl<A> EventQueue<A> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            tmp_backlog: VecDeque::new(),
        }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = A>>) {
        self.queue.push_back(event);
    }

    /// Apply all queued events to `app`, in order. Busy events stay queued
    /// for the next call, failed events are logged and dropped. Returns the
    /// number of events that finished.
    pub fn run(&mut self, app: &mut A) -> usize {
        let mut finished = 0;
        while let Some(mut event) = self.queue.pop_front() {
            match event.apply(app) {
                Ok(EventState::Finished) => finished += 1,
                Ok(EventState::Busy) => {
                    // Add busy event to the backlog.
                    self.tmp_backlog.push_back(event);
                }
                Err(err) => {
                    log::error!("event failed: {:?}", err)
                }
            }
        }

        // Putting the backlog back in the queue by swapping the
        // vectors.
        std::mem::swap(&mut self.queue, &mut self.tmp_backlog);
        finished
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EguiApp {
    pub fn run_events(&mut self) {
        // Events cannot borrow the app while it owns the queue, so the queue
        // is moved out while it runs.
        let mut queue = std::mem::replace(&mut self.event_queue, EventQueue::new());
        if queue.run(self) > 0 {
            self.request_redraw();
        }
        // Events queued while running go after the busy ones.
        queue.queue.append(&mut self.event_queue.queue);
        self.event_queue = queue;
    }
}

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

/// A click on one of the x-axis labels.
#[derive(new)]
pub struct SelectXAxis {
    field: AxisField,
    /// Frame time of the click.
    now: f64,
}

/// Waits for the file dialog running on `thread_handle`, then writes the
/// chart to the chosen path.
#[derive(new)]
pub struct SavePlotRequested {
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for SelectXAxis {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.scatter.select_x_axis(self.field, self.now)?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for SavePlotRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(path)) => {
                    app.scatter.save_svg(&path)?;
                }
                Ok(None) => log::debug!("svg export cancelled"),
                Err(err) => {
                    log::error!("unable to save plot: {:?}", err)
                }
            };
            Ok(EventState::Finished)
        } else if self.thread_handle.is_none() {
            Err("svg export requested without a file dialog".to_string())
        } else {
            Ok(EventState::Busy)
        }
    }
}
