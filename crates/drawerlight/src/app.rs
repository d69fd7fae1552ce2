//! Application state and user-action handlers.
//!
//! [`App`] ties the component store, the search filter and the device link
//! together. Every user action the front end can trigger is a method here,
//! so the behaviour can be driven without a terminal.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::component::{Component, ALL_OFF};
use crate::error::Error;
use crate::link::{DeviceLink, LinkError, SendOutcome};
use crate::search;
use crate::store::ComponentStore;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something the user should fix before retrying.
    Warning,
    /// The action failed.
    Error,
}

/// A message the front end must show and the user acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// How serious the notice is.
    pub level: NoticeLevel,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }

    /// Create an informational notice.
    #[must_use]
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    /// Create a warning notice.
    #[must_use]
    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    /// Create an error notice.
    #[must_use]
    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        match err {
            Error::EmptyName => Notice::error("Error", "Name must not be empty"),
            Error::Link(LinkError::NoDevice) => Notice::warning(
                "Connection failed",
                "Could not find a controller on the USB ports",
            ),
            Error::Link(other) => Notice::warning("Connection failed", other.to_string()),
            e if e.is_validation_error() => Notice::error("Error", e.to_string()),
            other => Notice::error("Storage error", other.to_string()),
        }
    }
}

/// What the result list currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Nothing searched yet, or the search was cleared.
    #[default]
    Empty,
    /// Results of the current query.
    Search,
    /// Every component, with LED numbers.
    All,
}

/// Direction for keyboard list navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the first row.
    Up,
    /// Towards the last row.
    Down,
}

/// Result of toggling the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionChange {
    /// Now connected to the named port.
    Connected(String),
    /// Now disconnected.
    Disconnected,
}

/// Application state shared by every handler.
#[derive(Debug)]
pub struct App<L: DeviceLink> {
    store: ComponentStore,
    link: L,
    query: String,
    view: Vec<Component>,
    mode: ViewMode,
    selected: Option<usize>,
    test_dwell: Duration,
}

impl<L: DeviceLink> App<L> {
    /// Create the application state with an empty view.
    #[must_use]
    pub fn new(store: ComponentStore, link: L, test_dwell: Duration) -> Self {
        Self {
            store,
            link,
            query: String::new(),
            view: Vec::new(),
            mode: ViewMode::Empty,
            selected: None,
            test_dwell,
        }
    }

    /// The component store.
    #[must_use]
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    /// The device link.
    #[must_use]
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutable access to the device link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// The current search text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Components in the result list, top to bottom.
    #[must_use]
    pub fn view(&self) -> &[Component] {
        &self.view
    }

    /// What the result list is showing.
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Index of the selected row.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The selected component.
    #[must_use]
    pub fn selected_component(&self) -> Option<&Component> {
        self.selected.and_then(|i| self.view.get(i))
    }

    /// Text of each row in the result list.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        match self.mode {
            ViewMode::All => self.view.iter().map(Component::listing_row).collect(),
            ViewMode::Search | ViewMode::Empty => {
                self.view.iter().map(Component::search_row).collect()
            }
        }
    }

    /// Status line text, e.g. `Connected (/dev/ttyACM0)`.
    #[must_use]
    pub fn status(&self) -> String {
        self.link.state().to_string()
    }

    /// Handle a change of the search text.
    ///
    /// Recomputes the result list, clears the selection and turns the LEDs
    /// off since nothing is selected any more.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.view = search::filter(self.store.components(), query);
        self.mode = if search::normalize(query).is_empty() {
            ViewMode::Empty
        } else {
            ViewMode::Search
        };
        self.selected = None;
        debug!("Query {:?} matched {} components", query, self.view.len());
        self.send(ALL_OFF);
    }

    /// End the search: empty query, empty list, LEDs off.
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.view.clear();
        self.mode = ViewMode::Empty;
        self.selected = None;
        self.send(ALL_OFF);
    }

    /// List every component regardless of the query.
    pub fn show_all(&mut self) {
        self.view = self.store.components().to_vec();
        self.mode = ViewMode::All;
        self.selected = None;
    }

    /// Select a row and light its LED; `None` turns the LEDs off.
    ///
    /// Out-of-range indices are ignored.
    pub fn select(&mut self, index: Option<usize>) {
        let Some(index) = index else {
            self.selected = None;
            self.send(ALL_OFF);
            return;
        };
        let Some(component) = self.view.get(index) else {
            return;
        };

        let mask = component.mask();
        info!(
            "Selected: {}, LED#{}, mask={}",
            component.name,
            component.led_number(),
            mask
        );
        self.selected = Some(index);
        self.send(mask);
    }

    /// Move the selection one row and light the new row's LED.
    ///
    /// The selection is clamped to the list. With nothing selected the
    /// first row is selected.
    pub fn move_selection(&mut self, direction: Direction) {
        if self.view.is_empty() {
            return;
        }
        let last = self.view.len() - 1;
        let next = match (self.selected, direction) {
            (None, _) => 0,
            (Some(i), Direction::Up) => i.saturating_sub(1),
            (Some(i), Direction::Down) => (i + 1).min(last),
        };
        self.select(Some(next));
    }

    /// Add a component and list everything.
    ///
    /// # Errors
    ///
    /// Returns a notice if the name is empty, all LEDs are taken, or the
    /// store could not be written. The store is unchanged in the first two
    /// cases.
    pub fn add_component(&mut self, name: &str, drawer: &str) -> Result<Component, Notice> {
        let component = self.store.add(name, drawer).map_err(|e| {
            warn!("Add rejected: {e}");
            Notice::from(&e)
        })?;
        self.show_all();
        Ok(component)
    }

    /// The component a delete would remove, for the confirmation prompt.
    ///
    /// # Errors
    ///
    /// Returns a warning notice when nothing is selected.
    pub fn delete_candidate(&self) -> Result<Component, Notice> {
        self.selected_component()
            .cloned()
            .ok_or_else(|| Notice::warning("Error", "Select a component first"))
    }

    /// Delete a confirmed component, list everything and turn the LEDs off.
    ///
    /// # Errors
    ///
    /// Returns a notice if the store could not be written.
    pub fn delete_component(&mut self, component: &Component) -> Result<(), Notice> {
        self.store
            .remove(component)
            .map_err(|e| Notice::from(&e))?;
        self.show_all();
        self.send(ALL_OFF);
        Ok(())
    }

    /// Light every component's LED in turn, then turn all off.
    ///
    /// Blocks for the dwell time on each component.
    ///
    /// # Errors
    ///
    /// Returns a notice when not connected or when there is nothing to test.
    pub fn test_all(&mut self) -> Result<usize, Notice> {
        if !self.link.is_connected() {
            return Err(Notice::warning("Error", "Controller not connected"));
        }
        if self.store.is_empty() {
            return Err(Notice::info("Info", "No components added yet"));
        }

        info!("LED test started for {} components", self.store.len());
        let masks: Vec<(String, u16, u8)> = self
            .store
            .components()
            .iter()
            .map(|c| (c.name.clone(), c.led_number(), c.mask()))
            .collect();
        for (name, number, mask) in &masks {
            info!("Testing: {name} (LED {number})");
            self.send(*mask);
            std::thread::sleep(self.test_dwell);
        }
        info!("Turning all LEDs off");
        self.send(ALL_OFF);
        Ok(masks.len())
    }

    /// Connect to the board.
    ///
    /// # Errors
    ///
    /// Returns a warning notice when no board answered.
    pub fn connect(&mut self) -> Result<String, Notice> {
        self.link.connect().map_err(|e| {
            warn!("Connection failed: {e}");
            Notice::from(&Error::Link(e))
        })
    }

    /// Turn the LEDs off and close the link. Teardown errors are logged only.
    pub fn disconnect(&mut self) {
        if let Err(e) = self.link.disconnect() {
            debug!("Ignoring error while disconnecting: {e}");
        }
        info!("Connection closed");
    }

    /// Disconnect when connected, otherwise connect.
    ///
    /// # Errors
    ///
    /// Returns a warning notice when connecting found no board.
    pub fn toggle_connection(&mut self) -> Result<ConnectionChange, Notice> {
        if self.link.is_connected() {
            self.disconnect();
            Ok(ConnectionChange::Disconnected)
        } else {
            self.connect().map(ConnectionChange::Connected)
        }
    }

    /// Send a mask, logging and ignoring transport failures.
    fn send(&mut self, mask: u8) {
        match self.link.send(mask) {
            Ok(SendOutcome::Sent) => {}
            Ok(SendOutcome::Skipped) => debug!("Not connected, LED:{mask} dropped"),
            Err(e) => warn!("Failed to send LED:{mask}: {e}"),
        }
    }
}
