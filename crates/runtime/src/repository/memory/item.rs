//! In-memory ItemStore implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::{Destination, ItemHandle, ItemId, ItemInstance, ItemStore, Origin, Placement, StoreError};

use crate::repository::poisoned;

/// A minted item. Placement stays empty until the first move.
#[derive(Clone, Debug)]
struct Record {
    template: ItemHandle,
    condition: Option<u8>,
    enchant: u8,
    origin: Origin,
    placement: Option<Placement>,
}

impl Record {
    fn instance(&self, id: ItemId) -> Result<ItemInstance, StoreError> {
        let placement = self.placement.ok_or(StoreError::Unplaced(id))?;
        Ok(ItemInstance {
            id,
            template: self.template,
            condition: self.condition,
            enchant: self.enchant,
            origin: self.origin,
            placement,
        })
    }
}

impl From<&ItemInstance> for Record {
    fn from(item: &ItemInstance) -> Self {
        Self {
            template: item.template,
            condition: item.condition,
            enchant: item.enchant,
            origin: item.origin,
            placement: Some(item.placement),
        }
    }
}

struct Inner {
    items: HashMap<ItemId, Record>,
    next_id: u64,
}

/// In-memory implementation of ItemStore.
///
/// Ids are assigned sequentially and never reused, even after consumption.
pub struct InMemoryItemStore {
    inner: RwLock<Inner>,
}

impl InMemoryItemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store holding existing instances under their current ids.
    pub fn with_items<'a>(items: impl IntoIterator<Item = &'a ItemInstance>) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.write() {
            for item in items {
                inner.next_id = inner.next_id.max(item.id.0 + 1);
                inner.items.insert(item.id, Record::from(item));
            }
        }
        store
    }

    /// Every placed item, in id order.
    pub fn snapshot(&self) -> Result<Vec<ItemInstance>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("item store"))?;
        let mut items = inner
            .items
            .iter()
            .map(|(&id, record)| record.instance(id))
            .collect::<Result<Vec<_>, _>>()?;
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_record<T>(
        &self,
        item: ItemId,
        f: impl FnOnce(&mut Record) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned("item store"))?;
        let record = inner.items.get_mut(&item).ok_or(StoreError::UnknownItem(item))?;
        f(record)
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore for InMemoryItemStore {
    fn mint(&self, template: ItemHandle, origin: Origin) -> Result<ItemId, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned("item store"))?;
        let id = ItemId(inner.next_id);
        inner.next_id += 1;
        inner.items.insert(
            id,
            Record {
                template,
                condition: if template.is_broken() {
                    None
                } else {
                    Some(ItemInstance::MAX_CONDITION)
                },
                enchant: 0,
                origin,
                placement: None,
            },
        );
        Ok(id)
    }

    fn move_item(&self, item: ItemId, destination: Destination) -> Result<(), StoreError> {
        self.with_record(item, |record| {
            record.placement = Some(destination.into());
            Ok(())
        })
    }

    fn get_condition(&self, item: ItemId) -> Result<Option<u8>, StoreError> {
        self.with_record(item, |record| Ok(record.condition))
    }

    fn set_condition(&self, item: ItemId, condition: u8) -> Result<(), StoreError> {
        self.with_record(item, |record| {
            record.condition = Some(condition.min(ItemInstance::MAX_CONDITION));
            Ok(())
        })
    }

    fn crack(&self, item: ItemId, into: ItemHandle) -> Result<ItemInstance, StoreError> {
        self.with_record(item, |record| {
            record.template = into;
            record.condition = None;
            record.instance(item)
        })
    }

    fn consume(&self, item: ItemId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned("item store"))?;
        inner
            .items
            .remove(&item)
            .map(|_| ())
            .ok_or(StoreError::UnknownItem(item))
    }

    fn get(&self, item: ItemId) -> Result<ItemInstance, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned("item store"))?;
        let record = inner.items.get(&item).ok_or(StoreError::UnknownItem(item))?;
        record.instance(item)
    }
}
