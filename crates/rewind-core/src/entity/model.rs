#![forbid(unsafe_code)]

//! The observable root of the entity tree.

use std::fmt;

use tracing::debug;

use super::{Change, House};
use crate::reactive::{Observable, SubscriptionHandle};

#[cfg(feature = "state-persistence")]
use crate::persist::{self, PersistError};
#[cfg(feature = "state-persistence")]
use std::io::{Read, Write};
#[cfg(feature = "state-persistence")]
use std::path::Path;

/// Owns a [`House`] and notifies subscribers of every change in it.
///
/// The model is a listener but not an entity itself: the house's link
/// points at the model's change channel, and subscribers receive one
/// [`Change`] per mutation anywhere in the tree.
pub struct HouseModel {
    house: House,
    changes: Observable<Change>,
}

impl fmt::Debug for HouseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HouseModel")
            .field("house", &self.house)
            .field("subscriber_count", &self.changes.subscriber_count())
            .finish()
    }
}

impl Default for HouseModel {
    fn default() -> Self {
        Self::new()
    }
}

impl HouseModel {
    /// Create a model with an empty house.
    #[must_use]
    pub fn new() -> Self {
        let model = Self {
            house: House::new(),
            changes: Observable::new(Change::Loaded),
        };
        model.adopt_house();
        model
    }

    #[must_use]
    pub fn house(&self) -> &House {
        &self.house
    }

    pub fn house_mut(&mut self) -> &mut House {
        &mut self.house
    }

    /// Price of the whole house.
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.house.price()
    }

    /// Subscribe to changes anywhere in the tree.
    pub fn subscribe(&self, callback: impl Fn(&Change) + 'static) -> SubscriptionHandle {
        self.changes.subscribe(callback)
    }

    /// Remove a subscriber. Idempotent.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.changes.unsubscribe(handle)
    }

    /// Replace the house, re-attach every link and announce [`Change::Loaded`].
    pub fn replace_house(&mut self, house: House) {
        self.house.link().detach();
        self.house = house;
        self.adopt_house();
        debug!(floors = self.house.floors().len(), "House replaced");
        self.changes.set(Change::Loaded);
    }

    /// Serialize the house (not the subscribers) as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if writing or encoding fails.
    #[cfg(feature = "state-persistence")]
    pub fn write(&self, writer: impl Write) -> Result<(), PersistError> {
        persist::write_json(&self.house, writer)
    }

    /// Read a house written by [`HouseModel::write`] and make it current.
    ///
    /// On error the current house is kept and nothing is notified.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if reading or decoding fails.
    #[cfg(feature = "state-persistence")]
    pub fn read(&mut self, reader: impl Read) -> Result<(), PersistError> {
        let house: House = persist::read_json(reader)?;
        self.replace_house(house);
        Ok(())
    }

    /// Write the house to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the file cannot be created or written.
    #[cfg(feature = "state-persistence")]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write(std::io::BufWriter::new(file))
    }

    /// Load the house from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the file cannot be read or decoded.
    #[cfg(feature = "state-persistence")]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let file = std::fs::File::open(path.as_ref())?;
        self.read(std::io::BufReader::new(file))
    }

    fn adopt_house(&self) {
        let changes = self.changes.clone();
        self.house
            .link()
            .attach(move |change| changes.set(change.clone()));
        self.house.relink_children();
    }
}

impl fmt::Display for HouseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model({} of total value {})",
            self.house,
            self.total_price()
        )
    }
}
