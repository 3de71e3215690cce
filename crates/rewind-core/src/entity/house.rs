#![forbid(unsafe_code)]

//! House, floor and room nodes.
//!
//! Each node carries its own price; a container's [`price`](House::price)
//! is its own price plus the sum of its children. Mutators that add children
//! hand back `&mut` to the new child so calls chain:
//!
//! ```
//! use rewind_core::entity::{Floor, HouseModel, Room};
//!
//! let mut model = HouseModel::new();
//! model
//!     .house_mut()
//!     .add_floor(Floor::new())
//!     .add_room(Room::new("Kitchen"))
//!     .set_price(15.0);
//! assert_eq!(model.total_price(), 15.0);
//! ```

use std::fmt;

use super::{Change, ParentLink};

#[cfg(feature = "state-persistence")]
use serde::{Deserialize, Serialize};

/// A leaf of the tree.
#[derive(Debug)]
#[cfg_attr(feature = "state-persistence", derive(Serialize, Deserialize))]
pub struct Room {
    purpose: String,
    price: f64,
    #[cfg_attr(feature = "state-persistence", serde(skip))]
    link: ParentLink,
}

impl Room {
    #[must_use]
    pub fn new(purpose: impl Into<String>) -> Self {
        Self {
            purpose: purpose.into(),
            price: 0.0,
            link: ParentLink::default(),
        }
    }

    #[must_use]
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Set the price and notify upward.
    pub fn set_price(&mut self, price: f64) -> &mut Self {
        self.price = price;
        self.link.notify(&Change::PriceChanged { price });
        self
    }

    #[must_use]
    pub fn link(&self) -> &ParentLink {
        &self.link
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.purpose)
    }
}

/// A floor holding rooms.
#[derive(Debug, Default)]
#[cfg_attr(feature = "state-persistence", derive(Serialize, Deserialize))]
pub struct Floor {
    price: f64,
    rooms: Vec<Room>,
    #[cfg_attr(feature = "state-persistence", serde(skip))]
    link: ParentLink,
}

impl Floor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt `room`, notify upward, and return the adopted room.
    pub fn add_room(&mut self, room: Room) -> &mut Room {
        room.link.forward_to(&self.link);
        let change = Change::RoomAdded {
            purpose: room.purpose.clone(),
        };
        let index = self.rooms.len();
        self.rooms.push(room);
        self.link.notify(&change);
        &mut self.rooms[index]
    }

    #[must_use]
    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn room_mut(&mut self, index: usize) -> Option<&mut Room> {
        self.rooms.get_mut(index)
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Own price plus all rooms.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price + self.rooms.iter().map(Room::price).sum::<f64>()
    }

    pub fn set_price(&mut self, price: f64) -> &mut Self {
        self.price = price;
        self.link.notify(&Change::PriceChanged { price });
        self
    }

    #[must_use]
    pub fn link(&self) -> &ParentLink {
        &self.link
    }

    /// Point every room back at this floor.
    pub(crate) fn relink_children(&self) {
        for room in &self.rooms {
            room.link.forward_to(&self.link);
        }
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Floor")?;
        write_list(f, &self.rooms)
    }
}

/// The root entity, owned by a [`HouseModel`](super::HouseModel).
#[derive(Debug, Default)]
#[cfg_attr(feature = "state-persistence", derive(Serialize, Deserialize))]
pub struct House {
    price: f64,
    floors: Vec<Floor>,
    #[cfg_attr(feature = "state-persistence", serde(skip))]
    link: ParentLink,
}

impl House {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt `floor` at the next level, notify upward, and return it.
    pub fn add_floor(&mut self, floor: Floor) -> &mut Floor {
        floor.link.forward_to(&self.link);
        let level = self.floors.len();
        self.floors.push(floor);
        self.link.notify(&Change::FloorAdded { level });
        &mut self.floors[level]
    }

    #[must_use]
    pub fn floor(&self, level: usize) -> Option<&Floor> {
        self.floors.get(level)
    }

    pub fn floor_mut(&mut self, level: usize) -> Option<&mut Floor> {
        self.floors.get_mut(level)
    }

    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// Own price plus all floors.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price + self.floors.iter().map(Floor::price).sum::<f64>()
    }

    pub fn set_price(&mut self, price: f64) -> &mut Self {
        self.price = price;
        self.link.notify(&Change::PriceChanged { price });
        self
    }

    #[must_use]
    pub fn link(&self) -> &ParentLink {
        &self.link
    }

    /// Point every floor and room back at its parent.
    pub(crate) fn relink_children(&self) {
        for floor in &self.floors {
            floor.link.forward_to(&self.link);
            floor.relink_children();
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("House")?;
        write_list(f, &self.floors)
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn prices_aggregate() {
        let mut house = House::new();
        house.set_price(100.0);
        let ground = house.add_floor(Floor::new());
        ground.add_room(Room::new("Kitchen")).set_price(15.0);
        ground.add_room(Room::new("Hall")).set_price(5.0);
        house.add_floor(Floor::new()).set_price(1.0);

        assert_eq!(house.floor(0).map(Floor::price), Some(20.0));
        assert_eq!(house.price(), 121.0);
    }

    #[test]
    fn changes_cascade_to_house_link() {
        let mut house = House::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        house
            .link()
            .attach(move |change| log_clone.borrow_mut().push(change.clone()));

        house
            .add_floor(Floor::new())
            .add_room(Room::new("Kitchen"))
            .set_price(15.0);

        assert_eq!(
            *log.borrow(),
            vec![
                Change::FloorAdded { level: 0 },
                Change::RoomAdded {
                    purpose: "Kitchen".to_string()
                },
                Change::PriceChanged { price: 15.0 },
            ]
        );
    }

    #[test]
    fn room_added_before_floor_joins_house_still_cascades() {
        let mut floor = Floor::new();
        floor.add_room(Room::new("Attic"));

        let mut house = House::new();
        let hits = Rc::new(RefCell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        house.link().attach(move |_| *hits_clone.borrow_mut() += 1);

        let floor = house.add_floor(floor);
        if let Some(room) = floor.room_mut(0) {
            room.set_price(3.0);
        }
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn out_of_range_lookups() {
        let mut house = House::new();
        assert!(house.floor_mut(0).is_none());
        let floor = house.add_floor(Floor::new());
        assert!(floor.room_mut(3).is_none());
    }

    #[test]
    fn display_lists_structure() {
        let mut house = House::new();
        house.add_floor(Floor::new()).add_room(Room::new("Kitchen"));
        house.add_floor(Floor::new()).add_room(Room::new("Bedroom"));
        assert_eq!(house.to_string(), "House[Floor[Kitchen], Floor[Bedroom]]");
    }
}
