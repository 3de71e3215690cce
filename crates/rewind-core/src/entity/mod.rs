#![forbid(unsafe_code)]

//! Entity tree whose children report changes upward through callbacks.
//!
//! A [`HouseModel`] owns a [`House`], which owns [`Floor`]s, which own
//! [`Room`]s. No node points at its parent. Instead each node holds a
//! [`ParentLink`]: a shared slot with the callback to invoke when the node
//! changes. Adding a child points the child's link at the parent's own link,
//! so a change to a room cascades room -> floor -> house -> model, and the
//! model notifies its subscribers once per change.
//!
//! Links are never serialized. After a tree is loaded the model re-attaches
//! every link before announcing [`Change::Loaded`].

pub mod house;
pub mod model;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use house::{Floor, House, Room};
pub use model::HouseModel;

/// What changed somewhere in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A node's own price was set.
    PriceChanged { price: f64 },
    /// A floor was added to the house at `level`.
    FloorAdded { level: usize },
    /// A room was added to a floor.
    RoomAdded { purpose: String },
    /// A whole tree was loaded into the model.
    Loaded,
}

type Notify = Rc<dyn Fn(&Change)>;

/// Non-owning upward link from a node to whatever listens to it.
///
/// Cloning shares the slot, so a child linked to its parent before the
/// parent itself was attached still reaches the root once it is.
#[derive(Clone, Default)]
pub struct ParentLink {
    slot: Rc<RefCell<Option<Notify>>>,
}

impl fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentLink")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl ParentLink {
    /// Route this node's changes to `notify`, replacing any previous target.
    pub fn attach(&self, notify: impl Fn(&Change) + 'static) {
        *self.slot.borrow_mut() = Some(Rc::new(notify));
    }

    /// Stop reporting changes.
    pub fn detach(&self) {
        self.slot.borrow_mut().take();
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Report a change upward. Does nothing while detached.
    pub fn notify(&self, change: &Change) {
        let target = self.slot.borrow().clone();
        if let Some(target) = target {
            target(change);
        }
    }

    /// Forward this node's changes to `parent`'s link.
    pub(crate) fn forward_to(&self, parent: &ParentLink) {
        let up = parent.clone();
        self.attach(move |change| up.notify(change));
    }
}
