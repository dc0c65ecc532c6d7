use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::EquipmentId;

use super::{Equipment, EquipmentTraits};

/// Where a card sits on a survivor's sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    Hand(u8),
    Body,
    Pack,
}

/// Two hands, a body slot and a small backpack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    hands: [Option<Equipment>; GameConfig::HAND_SLOTS],
    body: Option<Equipment>,
    pack: ArrayVec<Equipment, { GameConfig::PACK_SLOTS }>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hands(&self) -> impl Iterator<Item = &Equipment> {
        self.hands.iter().flatten()
    }

    pub fn body(&self) -> Option<&Equipment> {
        self.body.as_ref()
    }

    pub fn pack(&self) -> &[Equipment] {
        &self.pack
    }

    /// Every card with its slot, hands first.
    pub fn items(&self) -> Vec<(Slot, Equipment)> {
        let mut out = Vec::new();
        for (i, hand) in self.hands.iter().enumerate() {
            if let Some(item) = hand {
                out.push((Slot::Hand(i as u8), *item));
            }
        }
        if let Some(item) = self.body {
            out.push((Slot::Body, item));
        }
        out.extend(self.pack.iter().map(|item| (Slot::Pack, *item)));
        out
    }

    pub fn find(&self, id: EquipmentId) -> Option<(Slot, &Equipment)> {
        for (i, hand) in self.hands.iter().enumerate() {
            if let Some(item) = hand
                && item.id == id
            {
                return Some((Slot::Hand(i as u8), item));
            }
        }
        if let Some(item) = &self.body
            && item.id == id
        {
            return Some((Slot::Body, item));
        }
        self.pack
            .iter()
            .find(|item| item.id == id)
            .map(|item| (Slot::Pack, item))
    }

    pub fn get_mut(&mut self, id: EquipmentId) -> Option<&mut Equipment> {
        self.hands
            .iter_mut()
            .flatten()
            .chain(self.body.iter_mut())
            .chain(self.pack.iter_mut())
            .find(|item| item.id == id)
    }

    /// Whether `item` may go into `slot` when that slot is empty.
    pub fn fits(item: &Equipment, slot: Slot) -> bool {
        match slot {
            Slot::Hand(i) => (i as usize) < GameConfig::HAND_SLOTS,
            Slot::Body => item.kind.traits().contains(EquipmentTraits::BODY_ARMOR),
            Slot::Pack => true,
        }
    }

    pub fn is_free(&self, slot: Slot) -> bool {
        match slot {
            Slot::Hand(i) => self.hands.get(i as usize).is_some_and(Option::is_none),
            Slot::Body => self.body.is_none(),
            Slot::Pack => !self.pack.is_full(),
        }
    }

    /// Empty slots that would accept `item`.
    pub fn free_slots(&self, item: &Equipment) -> Vec<Slot> {
        let mut out: Vec<Slot> = (0..GameConfig::HAND_SLOTS as u8).map(Slot::Hand).collect();
        out.push(Slot::Body);
        out.push(Slot::Pack);
        out.retain(|slot| self.is_free(*slot) && Self::fits(item, *slot));
        out
    }

    /// Puts `item` into an empty slot. Hands the item back if it does not fit.
    pub fn put(&mut self, item: Equipment, slot: Slot) -> Result<(), Equipment> {
        if !self.is_free(slot) || !Self::fits(&item, slot) {
            return Err(item);
        }
        match slot {
            Slot::Hand(i) => self.hands[i as usize] = Some(item),
            Slot::Body => self.body = Some(item),
            Slot::Pack => return self.pack.try_push(item).map_err(|e| e.element()),
        }
        Ok(())
    }

    pub fn take(&mut self, id: EquipmentId) -> Option<Equipment> {
        for hand in self.hands.iter_mut() {
            if hand.is_some_and(|item| item.id == id) {
                return hand.take();
            }
        }
        if self.body.is_some_and(|item| item.id == id) {
            return self.body.take();
        }
        let index = self.pack.iter().position(|item| item.id == id)?;
        Some(self.pack.remove(index))
    }

    /// Best (lowest) armor threshold among worn body armor and held shields.
    pub fn armor(&self) -> Option<u8> {
        let body = self.body.and_then(|item| item.kind.def().armor);
        let shield = self
            .hands()
            .filter(|item| item.kind.traits().contains(EquipmentTraits::HAND_ARMOR))
            .filter_map(|item| item.kind.def().armor)
            .min();
        match (body, shield) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}
