//! Authoritative game state.
//!
//! [`GameState`] is the single root handle: board, actors, decks, players,
//! round bookkeeping and the phase stack. Runtime layers clone or query it
//! but mutate it exclusively through the engine (and the setup helpers here
//! before play starts).
mod error;
mod ids;

pub use error::SetupError;
pub use ids::{ActorId, CellPos, DoorId, EquipmentId, PlayerId, ZoneId};

use crate::actor::{
    Actor, ActorKind, ActorRegistry, Adversary, AdversaryKind, DangerLevel, Familiar,
    SiegeEngine, SiegeKind, Spawned, Survivor,
};
use crate::board::Board;
use crate::config::GameConfig;
use crate::dice::DiceBag;
use crate::engine::{GameOver, PhaseStack};
use crate::item::{Equipment, EquipmentDeck, EquipmentKind, Inventory, Slot};
use crate::spawn::SpawnDeck;

/// A seat at the table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub survivors: Vec<ActorId>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// Rounds completed so far; spawning starts once this is non-zero.
    pub number: u32,
    /// Index into `players` of the player who starts the round.
    pub first_player: usize,
    /// Player whose survivors are acting.
    pub acting: Option<PlayerId>,
}

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub config: GameConfig,
    pub board: Board,
    pub actors: ActorRegistry,
    pub dice: DiceBag,
    pub equipment: EquipmentDeck,
    pub spawns: SpawnDeck,
    pub players: Vec<Player>,
    pub round: RoundState,
    pub phases: PhaseStack,
    pub outcome: Option<GameOver>,
    next_equipment_id: u32,
}

impl GameState {
    /// Fresh state with decks seeded from `config.seed`.
    pub fn new(config: GameConfig, board: Board) -> Self {
        let seed = config.seed;
        Self::with_decks(
            DiceBag::new(config.difficulty, seed),
            EquipmentDeck::standard(seed),
            SpawnDeck::standard(seed),
            config,
            board,
        )
    }

    /// Fresh state with explicit decks (stacked decks in tests and replays).
    pub fn with_decks(
        dice: DiceBag,
        equipment: EquipmentDeck,
        spawns: SpawnDeck,
        config: GameConfig,
        board: Board,
    ) -> Self {
        Self {
            config,
            board,
            actors: ActorRegistry::new(),
            dice,
            equipment,
            spawns,
            players: Vec::new(),
            round: RoundState::default(),
            phases: PhaseStack::new(),
            outcome: None,
            next_equipment_id: 1,
        }
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn add_player(&mut self, name: impl Into<String>) -> PlayerId {
        let id = PlayerId(self.players.len() as u8);
        self.players.push(Player {
            id,
            name: name.into(),
            survivors: Vec::new(),
        });
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0 as usize)
    }

    /// Places a survivor in the first starting zone.
    pub fn add_survivor(&mut self, survivor: Survivor) -> Result<ActorId, SetupError> {
        let zone = self
            .board
            .zones()
            .find(|z| z.starting)
            .map(|z| z.id)
            .ok_or(SetupError::NoStartingZone)?;
        self.add_survivor_at(survivor, zone)
    }

    pub fn add_survivor_at(
        &mut self,
        survivor: Survivor,
        zone: ZoneId,
    ) -> Result<ActorId, SetupError> {
        let player = survivor.player;
        if self.player(player).is_none() {
            return Err(SetupError::UnknownPlayer(player));
        }
        let actions = self.config.base_actions + survivor.skills.pipeline().extra_actions();
        let id = self.place(ActorKind::Survivor(survivor), actions, zone)?;
        self.players[player.0 as usize].survivors.push(id);
        Ok(id)
    }

    /// Bonds a familiar to `owner` and places it beside them.
    pub fn add_familiar(
        &mut self,
        owner: ActorId,
        name: impl Into<String>,
    ) -> Result<ActorId, SetupError> {
        let actor = self.actors.get(owner).ok_or(SetupError::UnknownActor(owner))?;
        if actor.survivor().is_none() {
            return Err(SetupError::NotASurvivor(owner));
        }
        let zone = self
            .board
            .zone_of(owner)
            .ok_or(SetupError::UnknownActor(owner))?;
        let actions = self.config.familiar_actions;
        let id = self.place(
            ActorKind::Familiar(Familiar::new(name, owner)),
            actions,
            zone,
        )?;
        if let Some(s) = self.actors.get_mut(owner).and_then(Actor::survivor_mut) {
            s.familiar = Some(id);
        }
        Ok(id)
    }

    pub fn add_siege_engine(
        &mut self,
        kind: SiegeKind,
        zone: ZoneId,
    ) -> Result<ActorId, SetupError> {
        self.place(ActorKind::Siege(SiegeEngine::new(kind)), 0, zone)
    }

    fn place(&mut self, kind: ActorKind, actions: u8, zone: ZoneId) -> Result<ActorId, SetupError> {
        // setup never displaces anyone
        if self.board.free_quadrants(zone) == 0 {
            return Err(SetupError::ZoneFull(zone));
        }
        self.actors
            .spawn(&mut self.board, kind, actions, zone)
            .map(|spawned| spawned.id)
            .ok_or(SetupError::ZoneFull(zone))
    }

    /// Puts an adversary into play; may evict a lower-priority occupant.
    pub fn add_adversary(&mut self, kind: AdversaryKind, zone: ZoneId) -> Option<Spawned> {
        self.actors.spawn(
            &mut self.board,
            ActorKind::Adversary(Adversary::new(kind)),
            kind.def().actions,
            zone,
        )
    }

    pub fn new_equipment(&mut self, kind: EquipmentKind) -> Equipment {
        let id = EquipmentId(self.next_equipment_id);
        self.next_equipment_id += 1;
        Equipment::new(id, kind)
    }

    /// Gives `kind` to a survivor: body armor on the body, anything else in
    /// the first free slot that fits.
    pub fn give_equipment(
        &mut self,
        actor: ActorId,
        kind: EquipmentKind,
    ) -> Result<EquipmentId, SetupError> {
        let item = self.new_equipment(kind);
        let survivor = self
            .actors
            .get_mut(actor)
            .ok_or(SetupError::UnknownActor(actor))?
            .survivor_mut()
            .ok_or(SetupError::NotASurvivor(actor))?;
        // body armor goes on the body when it can
        let slots = survivor.inventory.free_slots(&item);
        let slot = *slots
            .iter()
            .find(|s| **s == Slot::Body)
            .or_else(|| slots.first())
            .ok_or(SetupError::NoFreeSlot { actor, kind })?;
        let id = item.id;
        survivor
            .inventory
            .put(item, slot)
            .map_err(|_| SetupError::NoFreeSlot { actor, kind })?;
        Ok(id)
    }

    /// Survivors alive and still on the board.
    pub fn survivors_in_play(&self) -> impl Iterator<Item = &Actor> {
        self.actors
            .survivors()
            .filter(|a| a.survivor().is_some_and(Survivor::is_in_play))
    }

    pub fn survivor(&self, id: ActorId) -> Option<&Survivor> {
        self.actors.get(id).and_then(Actor::survivor)
    }

    pub fn survivor_mut(&mut self, id: ActorId) -> Option<&mut Survivor> {
        self.actors.get_mut(id).and_then(Actor::survivor_mut)
    }

    pub fn inventory(&self, id: ActorId) -> Option<&Inventory> {
        self.survivor(id).map(|s| &s.inventory)
    }

    /// Highest danger level among survivors in play; picks the spawn column.
    pub fn highest_danger(&self) -> DangerLevel {
        self.survivors_in_play()
            .filter_map(Actor::survivor)
            .map(|s| s.danger_level(&self.config.xp_thresholds))
            .max()
            .unwrap_or_default()
    }

    /// Zones holding survivors in play.
    pub fn survivor_zones(&self) -> Vec<ZoneId> {
        let mut zones: Vec<_> = self
            .survivors_in_play()
            .filter_map(|a| self.board.zone_of(a.id))
            .collect();
        zones.sort_unstable();
        zones.dedup();
        zones
    }

    /// Checks the cross-references between board and registry.
    pub fn validate(&self) -> Result<(), SetupError> {
        if let Some(id) = self.actors.dangling(&self.board) {
            return Err(SetupError::DanglingActor(id));
        }
        if self.survivors_in_play().next().is_none() {
            return Err(SetupError::NoSurvivors);
        }
        Ok(())
    }

    /// SHA-256 digest of the bincode encoding of the whole state.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        if let Ok(bytes) = bincode::serialize(self) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::board::{BoardBuilder, Environment};
    use crate::spawn::SpawnDeck;

    /// One-cell street (zone 1) with a stacked dice bag and empty decks.
    pub(crate) fn street_state(faces: &[u8]) -> GameState {
        let board = BoardBuilder::new(1, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .start(CellPos::new(0, 0))
            .build()
            .expect("valid board");
        let mut state = GameState::with_decks(
            DiceBag::stacked(faces),
            EquipmentDeck::stacked(&[]),
            SpawnDeck::stacked(&[]),
            GameConfig::default(),
            board,
        );
        state.add_player("p0");
        state
    }

    #[test]
    fn survivors_land_in_the_starting_zone() {
        let mut state = street_state(&[]);
        let id = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        assert_eq!(state.board.zone_of(id), Some(ZoneId(1)));
        assert_eq!(state.players[0].survivors, vec![id]);
        assert_eq!(state.actors.get(id).unwrap().actions_left, 3);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn unknown_player_is_rejected() {
        let mut state = street_state(&[]);
        let err = state
            .add_survivor(Survivor::new("Bo", PlayerId(4), 3))
            .unwrap_err();
        assert_eq!(err, SetupError::UnknownPlayer(PlayerId(4)));
    }

    #[test]
    fn familiar_bonds_to_owner() {
        let mut state = street_state(&[]);
        let owner = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        let pet = state.add_familiar(owner, "Rook").unwrap();
        assert_eq!(state.survivor(owner).unwrap().familiar, Some(pet));
        assert_eq!(state.board.zone_of(pet), Some(ZoneId(1)));
    }

    #[test]
    fn equipment_goes_to_a_free_slot() {
        let mut state = street_state(&[]);
        let id = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        state.give_equipment(id, EquipmentKind::Sword).unwrap();
        state.give_equipment(id, EquipmentKind::PlateArmor).unwrap();
        let inv = state.inventory(id).unwrap();
        assert_eq!(inv.hands().count(), 1);
        assert!(inv.body().is_some());
    }

    #[test]
    fn empty_state_fails_validation() {
        let state = street_state(&[]);
        assert_eq!(state.validate(), Err(SetupError::NoSurvivors));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn state_root_tracks_changes() {
        let mut state = street_state(&[]);
        let before = state.state_root();
        assert_eq!(before, state.clone().state_root());
        state.add_player("p1");
        assert_ne!(before, state.state_root());
        assert_eq!(hex::encode(state.state_root()).len(), 64);
    }
}
