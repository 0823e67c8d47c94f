//! Live text elements of a panel.
//!
//! A surface is the terminal stand-in for the DOM nodes countdown timers
//! write into: a map from element id to its current text and urgency.
//! Clearing the surface is how a panel "detaches" elements; timers notice on
//! their next tick and stop.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::countdown::{Reading, Urgency};

/// Current content of one countdown element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    pub urgency: Urgency,
}

impl From<&Reading> for Element {
    fn from(reading: &Reading) -> Self {
        Self {
            text: reading.text().to_string(),
            urgency: reading.urgency(),
        }
    }
}

/// Shared, cloneable element map.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    elements: Arc<RwLock<HashMap<String, Element>>>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an element.
    pub async fn insert(&self, id: impl Into<String>, element: Element) {
        self.elements.write().await.insert(id.into(), element);
    }

    /// Overwrite an existing element.
    ///
    /// Returns `false`, without inserting, when the element is gone.
    pub async fn update(&self, id: &str, element: Element) -> bool {
        match self.elements.write().await.get_mut(id) {
            Some(slot) => {
                *slot = element;
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, id: &str) -> Option<Element> {
        self.elements.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> Option<Element> {
        self.elements.write().await.remove(id)
    }

    /// Detach every element.
    pub async fn clear(&self) {
        self.elements.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.elements.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.elements.read().await.is_empty()
    }

    /// Copy of all elements, for drawing.
    pub async fn snapshot(&self) -> HashMap<String, Element> {
        self.elements.read().await.clone()
    }
}
