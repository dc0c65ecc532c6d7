//! Spawn deck and spawn-zone selection.
//!
//! Each card carries one effect per danger level; the highest danger level
//! among survivors in play picks the column.
use crate::actor::{AdversaryKind, DangerLevel};
use crate::board::{Board, Environment};
use crate::env::{PcgRng, RngOracle, streams};
use crate::state::ZoneId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnEffect {
    Nothing,
    Adversaries(AdversaryKind, u8),
    /// Every adversary of this kind activates again.
    ExtraActivation(AdversaryKind),
    /// A necromancer appears and opens a new spawn zone.
    Necromancer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnCard {
    pub effects: [SpawnEffect; 4],
}

impl SpawnCard {
    pub fn effect(&self, level: DangerLevel) -> SpawnEffect {
        self.effects[level as usize]
    }
}

use AdversaryKind::{Abomination, Brute, Runner, Shade, Walker};
use SpawnEffect::{Adversaries as Adv, ExtraActivation as Extra, Necromancer, Nothing};

const fn card(effects: [SpawnEffect; 4]) -> SpawnCard {
    SpawnCard { effects }
}

pub static STANDARD_CARDS: [SpawnCard; 14] = [
    card([Adv(Walker, 1), Adv(Walker, 2), Adv(Walker, 3), Adv(Walker, 4)]),
    card([Nothing, Adv(Walker, 2), Adv(Walker, 4), Adv(Walker, 6)]),
    card([Adv(Walker, 2), Adv(Walker, 3), Adv(Brute, 2), Adv(Runner, 2)]),
    card([Nothing, Adv(Walker, 1), Adv(Runner, 1), Adv(Brute, 1)]),
    card([Adv(Runner, 1), Adv(Runner, 1), Adv(Runner, 2), Adv(Runner, 3)]),
    card([Adv(Runner, 1), Adv(Runner, 2), Adv(Runner, 2), Adv(Walker, 5)]),
    card([Adv(Brute, 1), Adv(Brute, 1), Adv(Brute, 2), Adv(Brute, 2)]),
    card([Adv(Walker, 1), Adv(Brute, 1), Adv(Brute, 2), Adv(Abomination, 1)]),
    card([Nothing, Nothing, Adv(Abomination, 1), Adv(Abomination, 1)]),
    card([Adv(Shade, 1), Adv(Shade, 2), Adv(Shade, 2), Adv(Shade, 3)]),
    card([Nothing, Extra(Walker), Extra(Walker), Extra(Walker)]),
    card([Nothing, Nothing, Extra(Runner), Extra(Runner)]),
    card([Necromancer, Necromancer, Necromancer, Necromancer]),
    card([Adv(Walker, 1), Necromancer, Adv(Walker, 4), Necromancer]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnDeck {
    draw: Vec<SpawnCard>,
    discard: Vec<SpawnCard>,
    rng: PcgRng,
}

impl SpawnDeck {
    pub fn standard(seed: u64) -> Self {
        Self::from_cards(STANDARD_CARDS.to_vec(), seed)
    }

    pub fn from_cards(mut cards: Vec<SpawnCard>, seed: u64) -> Self {
        let mut rng = PcgRng::new(seed, streams::SPAWN);
        rng.shuffle(&mut cards);
        Self {
            draw: cards,
            discard: Vec::new(),
            rng,
        }
    }

    /// Deals `cards` front to back, then reshuffles the discards.
    pub fn stacked(cards: &[SpawnCard]) -> Self {
        Self {
            draw: cards.iter().rev().copied().collect(),
            discard: Vec::new(),
            rng: PcgRng::new(0, streams::SPAWN),
        }
    }

    /// Draws a card and puts it straight onto the discard pile.
    pub fn draw(&mut self) -> Option<SpawnCard> {
        if self.draw.is_empty() {
            std::mem::swap(&mut self.draw, &mut self.discard);
            self.rng.shuffle(&mut self.draw);
        }
        let card = self.draw.pop()?;
        self.discard.push(card);
        Some(card)
    }

    pub fn len(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Street zone for a necromancer's new spawn point: the one farthest (by
/// cell distance) from every survivor position, lowest id on ties. Zones
/// already spawning are skipped.
pub fn necromancer_zone(board: &Board, survivor_zones: &[ZoneId]) -> Option<ZoneId> {
    let anchors: Vec<_> = survivor_zones
        .iter()
        .filter_map(|z| board.zone(*z))
        .flat_map(|z| z.cells.iter().copied())
        .collect();
    let mut best: Option<(u32, ZoneId)> = None;
    for zone in board.zones() {
        if zone.environment != Environment::Street || zone.spawn {
            continue;
        }
        let distance = zone
            .cells
            .iter()
            .map(|c| {
                anchors
                    .iter()
                    .map(|a| c.x.abs_diff(a.x) + c.y.abs_diff(a.y))
                    .min()
                    .unwrap_or(u32::MAX)
            })
            .min()
            .unwrap_or(0);
        // zones iterate in id order, so strict > keeps the lowest id on ties
        if best.is_none_or(|(d, _)| distance > d) {
            best = Some((distance, zone.id));
        }
    }
    best.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::state::CellPos;

    #[test]
    fn draw_discards_and_recycles() {
        let mut deck = SpawnDeck::stacked(&[STANDARD_CARDS[0], STANDARD_CARDS[12]]);
        assert_eq!(deck.draw(), Some(STANDARD_CARDS[0]));
        assert_eq!(deck.draw(), Some(STANDARD_CARDS[12]));
        assert!(deck.draw().is_some());
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn effect_follows_danger_level() {
        let card = STANDARD_CARDS[1];
        assert_eq!(card.effect(DangerLevel::Blue), SpawnEffect::Nothing);
        assert_eq!(
            card.effect(DangerLevel::Red),
            SpawnEffect::Adversaries(AdversaryKind::Walker, 6)
        );
    }

    #[test]
    fn standard_deck_is_deterministic() {
        let mut a = SpawnDeck::standard(9);
        let mut b = SpawnDeck::standard(9);
        for _ in 0..20 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn necromancer_picks_the_farthest_street() {
        let board = BoardBuilder::new(4, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .cell(CellPos::new(2, 0), ZoneId(3), Environment::Building)
            .cell(CellPos::new(3, 0), ZoneId(4), Environment::Street)
            .build()
            .unwrap();
        assert_eq!(necromancer_zone(&board, &[ZoneId(1)]), Some(ZoneId(4)));
        assert_eq!(necromancer_zone(&board, &[ZoneId(4)]), Some(ZoneId(1)));
    }
}
