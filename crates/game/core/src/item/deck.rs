use strum::IntoEnumIterator;

use crate::env::{PcgRng, RngOracle, streams};

use super::EquipmentKind;

/// Shuffled search deck. Discarded cards are shuffled back in when the draw
/// pile runs out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentDeck {
    draw: Vec<EquipmentKind>,
    discard: Vec<EquipmentKind>,
    rng: PcgRng,
}

impl EquipmentDeck {
    /// Deck holding every kind's printed number of copies.
    pub fn standard(seed: u64) -> Self {
        let cards = EquipmentKind::iter()
            .flat_map(|kind| std::iter::repeat_n(kind, kind.def().copies as usize))
            .collect();
        Self::from_cards(cards, seed)
    }

    pub fn from_cards(mut cards: Vec<EquipmentKind>, seed: u64) -> Self {
        let mut rng = PcgRng::new(seed, streams::EQUIPMENT);
        rng.shuffle(&mut cards);
        Self {
            draw: cards,
            discard: Vec::new(),
            rng,
        }
    }

    /// A deck that deals `cards` front to back without shuffling.
    pub fn stacked(cards: &[EquipmentKind]) -> Self {
        Self {
            draw: cards.iter().rev().copied().collect(),
            discard: Vec::new(),
            rng: PcgRng::new(0, streams::EQUIPMENT),
        }
    }

    pub fn draw(&mut self) -> Option<EquipmentKind> {
        if self.draw.is_empty() {
            std::mem::swap(&mut self.draw, &mut self.discard);
            self.rng.shuffle(&mut self.draw);
        }
        self.draw.pop()
    }

    pub fn discard(&mut self, kind: EquipmentKind) {
        self.discard.push(kind);
    }

    pub fn len(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_deck_deals_in_order() {
        let mut deck = EquipmentDeck::stacked(&[EquipmentKind::Axe, EquipmentKind::Torch]);
        assert_eq!(deck.draw(), Some(EquipmentKind::Axe));
        assert_eq!(deck.draw(), Some(EquipmentKind::Torch));
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn discards_are_recycled() {
        let mut deck = EquipmentDeck::stacked(&[EquipmentKind::Sword]);
        let card = deck.draw().unwrap();
        deck.discard(card);
        assert_eq!(deck.draw(), Some(EquipmentKind::Sword));
    }

    #[test]
    fn standard_deck_counts_copies() {
        let deck = EquipmentDeck::standard(5);
        let expected: usize = EquipmentKind::iter()
            .map(|k| k.def().copies as usize)
            .sum();
        assert_eq!(deck.len(), expected);
    }
}
