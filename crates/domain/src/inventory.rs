//! Session inventory.

use crate::InventoryItem;

/// Items acquired during a session, in acquisition order.
///
/// The engine only ever adds; removal is a backend concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = InventoryItem>,
    {
        self.items.extend(items);
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_in_order() {
        let mut inventory = Inventory::new();
        inventory.extend([InventoryItem::named("Key")]);
        inventory.extend([InventoryItem::named("Map"), InventoryItem::named("Key")]);

        let names: Vec<_> = inventory.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Key", "Map", "Key"]);
        assert!(inventory.contains("Map"));
        assert!(!inventory.contains("Sword"));
    }
}
