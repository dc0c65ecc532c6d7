//! Survivor turns: move selection, execution and the sub-decisions they
//! push (targets, rerolls, found equipment, inventory, familiars).

use tracing::{debug, info, warn};

use crate::action::{ActionKind, AttackKind};
use crate::actor::{Actor, TurnStatus};
use crate::board::{DoorState, Faction};
use crate::combat::{
    AttackResult, PendingAttack, RerollDecision, Stat, finish, hostile_targets, prepare, reroll,
    reroll_decision,
};
use crate::env::{
    DecisionOptions, DecisionProvider, FamiliarMove, KeepChoice, OrganizeStep, QuestEvent,
    QuestHooks, RerollChoice, ZonePurpose,
};
use crate::item::{Enchantment, Equipment, EquipmentKind, EquipmentTraits, Inventory, Slot};
use crate::skills::{FreeActions, SkillKind};
use crate::state::{ActorId, EquipmentId, ZoneId};

use super::catalogue::{build_catalogue, weapon_stat};
use super::{Advance, EngineError, GameEngine, Intent, Move, MoveOption, Phase, PhaseTag, Reply};

impl<'a> GameEngine<'a> {
    /// One step of a survivor's turn: level-up first, then the catalogue.
    pub(super) fn action_select(
        &mut self,
        provider: &mut dyn DecisionProvider,
        quest: &mut dyn QuestHooks,
        actor: ActorId,
    ) -> Result<Advance, EngineError> {
        let Some(entry) = self.state.actors.get(actor) else {
            return Err(EngineError::UnknownActor {
                phase: PhaseTag::ActionSelect,
                actor,
            });
        };
        let Some(survivor) = entry.survivor() else {
            return Err(EngineError::UnknownActor {
                phase: PhaseTag::ActionSelect,
                actor,
            });
        };
        if !survivor.is_in_play() {
            self.end_turn(actor);
            return Ok(Advance::Progressed);
        }
        if survivor.danger_level(&self.state.config.xp_thresholds) > survivor.level_granted {
            self.state.phases.push(Phase::NewSkill { actor });
            return Ok(Advance::Progressed);
        }

        let catalogue = build_catalogue(self.state, quest, actor)?;
        if catalogue.is_empty() {
            debug!(target: "horde::engine", %actor, "no legal move, turn forfeited");
            self.end_turn(actor);
            return Ok(Advance::Progressed);
        }
        let options = catalogue.into_options();
        let request = self.request(Some(actor), DecisionOptions::Moves(options.clone()), false);
        let choice = match self.pick(provider, request) {
            Ok(i) => options[i].clone(),
            Err(request) => return Ok(Advance::Waiting(request)),
        };
        debug!(target: "horde::engine", %actor, mv = ?choice.mv, cost = choice.cost, "move chosen");
        self.execute(quest, actor, choice)?;
        Ok(Advance::Progressed)
    }

    /// Ends the survivor's turn; its familiar acts next.
    pub(super) fn end_turn(&mut self, actor: ActorId) {
        let mut familiar = None;
        if let Some(entry) = self.state.actors.get_mut(actor) {
            entry.actions_left = 0;
            if let Some(s) = entry.survivor_mut() {
                s.turn.status = TurnStatus::Done;
                familiar = s.familiar;
            }
        }
        self.state.phases.pop();
        if let Some(id) = familiar
            && self.state.board.zone_of(id).is_some()
            && self
                .state
                .actors
                .get(id)
                .and_then(Actor::familiar)
                .is_some_and(|f| f.is_alive())
        {
            self.state.phases.push(Phase::FamiliarAction { familiar: id });
        }
        debug!(target: "horde::engine", %actor, "turn ended");
    }

    fn pay(&mut self, actor: ActorId, cost: u8, free: FreeActions) {
        if let Some(entry) = self.state.actors.get_mut(actor) {
            entry.actions_left = entry.actions_left.saturating_sub(cost);
            if let Some(s) = entry.survivor_mut() {
                s.turn.free_used |= free;
            }
        }
    }

    fn execute(
        &mut self,
        quest: &mut dyn QuestHooks,
        actor: ActorId,
        option: MoveOption,
    ) -> Result<(), EngineError> {
        let MoveOption { mv, cost, free } = option;
        let target = |intent| Phase::ChooseTarget {
            actor,
            intent,
            cost,
            free,
        };
        // target-zone moves are paid once the zone is picked
        match &mv {
            Move::Attack { attack, weapons } if *attack != AttackKind::Melee => {
                self.state.phases.push(target(Intent::Attack {
                    weapons: weapons.clone(),
                }));
                return Ok(());
            }
            Move::Throw { item } => {
                self.state.phases.push(target(Intent::Throw { item: *item }));
                return Ok(());
            }
            Move::Enchant { spell } => {
                self.state
                    .phases
                    .push(target(Intent::Enchant { spell: *spell }));
                return Ok(());
            }
            Move::OperateSiege { engine } => {
                self.state
                    .phases
                    .push(target(Intent::Siege { engine: *engine }));
                return Ok(());
            }
            Move::EndTurn => {
                self.end_turn(actor);
                return Ok(());
            }
            _ => {}
        }

        self.pay(actor, cost, free);
        let origin = self.state.board.zone_of(actor);
        match mv {
            Move::Walk { dir } => {
                let next = self
                    .state
                    .board
                    .spot_of(actor)
                    .and_then(|spot| self.state.board.neighbor(spot.cell, dir));
                if let Some(pos) = next {
                    self.state.board.move_actor_to_cell(actor, pos);
                }
            }
            Move::WalkTo { zone } => {
                self.state.actors.move_to(&mut self.state.board, actor, zone);
            }
            Move::Sprint { zone } => {
                self.state.actors.move_to(&mut self.state.board, actor, zone);
                if let Some(s) = self.state.survivor_mut(actor) {
                    s.turn.sprinted = true;
                }
            }
            Move::Attack { weapons, .. } => {
                if let Some(zone) = origin {
                    self.weapon_attack(quest, actor, &weapons, zone)?;
                }
            }
            Move::Reload { weapon } => {
                if let Some(w) = self
                    .state
                    .survivor_mut(actor)
                    .and_then(|s| s.inventory.get_mut(weapon))
                {
                    w.loaded = true;
                }
            }
            Move::Search => {
                if let Some(s) = self.state.survivor_mut(actor) {
                    s.turn.searched = true;
                }
                if let Some(kind) = self.state.equipment.draw() {
                    let found = self.state.new_equipment(kind);
                    info!(target: "horde::engine", %actor, %kind, "equipment found");
                    self.emit(quest, QuestEvent::EquipmentFound { actor, kind });
                    self.state
                        .phases
                        .push(Phase::KeepEquipment { actor, found });
                }
            }
            Move::Organize => self.state.phases.push(Phase::Organize {
                actor,
                partner: None,
            }),
            Move::Trade { partner } => self.state.phases.push(Phase::Organize {
                actor,
                partner: Some(partner),
            }),
            Move::OpenDoor { door, with } => {
                let breach = self
                    .state
                    .inventory(actor)
                    .and_then(|inv| inv.find(with))
                    .and_then(|(_, w)| w.kind.def().door_breach.map(|b| (b, w.kind.traits())));
                let Some((threshold, traits)) = breach else {
                    return Ok(());
                };
                let face = self.state.dice.draw();
                if face < threshold {
                    debug!(target: "horde::engine", %actor, %door, face, threshold, "door held");
                    return Ok(());
                }
                self.state.board.set_door(door, DoorState::Open)?;
                if traits.contains(EquipmentTraits::NOISY_DOOR)
                    && let Some(zone) = origin
                {
                    self.state.board.add_noise_token(zone)?;
                }
                info!(target: "horde::engine", %actor, %door, "door opened");
                self.emit(quest, QuestEvent::DoorOpened { actor, door });
                let mut revealed = Vec::new();
                if let Some((a, b)) = self.state.board.door_zones(door) {
                    revealed.extend(self.state.board.reveal_building(a));
                    revealed.extend(self.state.board.reveal_building(b));
                }
                if !revealed.is_empty() {
                    self.state.phases.push(Phase::Spawn {
                        zones: revealed,
                        next: 0,
                    });
                }
            }
            Move::CloseDoor { door } => self.state.board.set_door(door, DoorState::Closed)?,
            Move::Barricade { door } => self.state.board.jam_door(door)?,
            Move::TakeObjective => {
                if let Some(zone) = origin
                    && self.state.board.take_objective(zone)?
                {
                    let xp = self.state.config.objective_xp;
                    if let Some(s) = self.state.survivor_mut(actor) {
                        s.experience = s.experience.saturating_add(xp);
                    }
                    info!(target: "horde::engine", %actor, %zone, "objective taken");
                    self.emit(quest, QuestEvent::ObjectiveTaken { actor, zone });
                }
            }
            Move::PushSiege { engine, zone } => {
                if self.state.actors.move_to(&mut self.state.board, engine, zone) {
                    self.state.actors.move_to(&mut self.state.board, actor, zone);
                }
            }
            Move::Quest(qm) => {
                if !quest.perform(self.state, actor, qm) {
                    warn!(
                        target: "horde::engine",
                        %actor,
                        code = qm.code,
                        "quest move no longer applies"
                    );
                }
            }
            Move::Throw { .. }
            | Move::Enchant { .. }
            | Move::OperateSiege { .. }
            | Move::EndTurn => {}
        }
        Ok(())
    }

    /// Zones an intent can be aimed at from where `actor` stands.
    fn target_zones(&self, actor: ActorId, intent: &Intent) -> Vec<ZoneId> {
        let board = &self.state.board;
        let Some(origin) = board.zone_of(actor) else {
            return Vec::new();
        };
        let Some(survivor) = self.state.survivor(actor) else {
            return Vec::new();
        };
        let range = |min: u8, max: u8, kind: ActionKind| {
            board.accessible_zones(origin, min as u32, max as u32, kind)
        };
        match intent {
            Intent::Attack { weapons } => {
                let held = held(&survivor.inventory, weapons);
                weapon_stat(survivor, &held)
                    .map(|stat| range(stat.min_range, stat.max_range, stat.action))
                    .unwrap_or_default()
            }
            Intent::Throw { item } => {
                let Some((_, item)) = survivor.inventory.find(*item) else {
                    return Vec::new();
                };
                let (min, max) = item.kind.def().range;
                let mut zones = range(min, max, ActionKind::Throw);
                if item.kind.traits().contains(EquipmentTraits::TORCH) {
                    zones.retain(|z| board.zone(*z).is_some_and(|z| z.dragon_bile));
                }
                zones
            }
            Intent::Enchant { spell } => survivor
                .inventory
                .find(*spell)
                .map(|(_, s)| {
                    let (min, max) = s.kind.def().range;
                    range(min, max, ActionKind::Enchant)
                })
                .unwrap_or_default(),
            Intent::Siege { engine } => {
                let Some(siege) = self.state.actors.get(*engine).and_then(Actor::siege) else {
                    return Vec::new();
                };
                if board.zone_of(*engine) != Some(origin) {
                    return Vec::new();
                }
                let stat = siege.stat();
                range(stat.min_range, stat.max_range, stat.action)
            }
        }
    }

    /// Target zone for a ranged move. Backing out costs nothing.
    pub(super) fn choose_target(
        &mut self,
        provider: &mut dyn DecisionProvider,
        quest: &mut dyn QuestHooks,
        actor: ActorId,
        intent: Intent,
        cost: u8,
        free: FreeActions,
    ) -> Result<Advance, EngineError> {
        let zones = self.target_zones(actor, &intent);
        if zones.is_empty() {
            debug!(target: "horde::engine", %actor, ?intent, "target no longer reachable");
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        }
        let request = self.request(
            Some(actor),
            DecisionOptions::Zones {
                purpose: ZonePurpose::Target,
                zones: zones.clone(),
            },
            true,
        );
        let zone = match self.ask(provider, request) {
            Reply::Pick(i) => zones[i],
            Reply::Back => {
                self.state.phases.pop();
                return Ok(Advance::Progressed);
            }
            Reply::Waiting(request) => return Ok(Advance::Waiting(request)),
        };
        self.state.phases.pop();
        self.pay(actor, cost, free);

        match intent {
            Intent::Attack { weapons } => self.weapon_attack(quest, actor, &weapons, zone)?,
            Intent::Siege { engine } => {
                let Some(stat) = self
                    .state
                    .actors
                    .get(engine)
                    .and_then(Actor::siege)
                    .map(|s| s.stat())
                else {
                    return Ok(Advance::Progressed);
                };
                self.attack(quest, actor, zone, stat, &[])?;
            }
            Intent::Throw { item } => self.throw(quest, actor, item, zone)?,
            Intent::Enchant { spell } => self.enchant(actor, spell, zone),
        }
        Ok(Advance::Progressed)
    }

    /// Attacks with wielded weapons; reload weapons are emptied by firing.
    fn weapon_attack(
        &mut self,
        quest: &mut dyn QuestHooks,
        actor: ActorId,
        weapons: &[EquipmentId],
        zone: ZoneId,
    ) -> Result<(), EngineError> {
        let Some(inventory) = self.state.inventory(actor) else {
            return Ok(());
        };
        let held = held(inventory, weapons);
        let Some(base) = Stat::from_weapons(&held) else {
            return Ok(());
        };
        let intrinsics: &'static [SkillKind] = held
            .first()
            .map_or(&[], |w| w.kind.def().intrinsic);
        if let Some(s) = self.state.survivor_mut(actor) {
            for id in weapons {
                if let Some(w) = s.inventory.get_mut(*id)
                    && w.kind.traits().contains(EquipmentTraits::RELOAD)
                {
                    w.loaded = false;
                }
            }
        }
        self.attack(quest, actor, zone, base, intrinsics)
    }

    /// Rolls an attack and resolves it, or suspends on a reroll decision.
    fn attack(
        &mut self,
        quest: &mut dyn QuestHooks,
        actor: ActorId,
        zone: ZoneId,
        base: Stat,
        intrinsics: &[SkillKind],
    ) -> Result<(), EngineError> {
        let Some(mut pending) = prepare(self.state, actor, zone, base, intrinsics) else {
            return Ok(());
        };
        let targets = hostile_targets(self.state, zone, pending.stat.attack).len();
        let band = quest.reroll_band().unwrap_or(self.state.config.reroll_band);
        match reroll_decision(&pending, targets, band) {
            RerollDecision::Keep => self.conclude_attack(quest, &pending),
            RerollDecision::Reroll => {
                reroll(self.state, &mut pending);
                self.conclude_attack(quest, &pending);
            }
            RerollDecision::Ask => self.state.phases.push(Phase::Reroll { pending }),
        }
        Ok(())
    }

    pub(super) fn reroll_step(
        &mut self,
        provider: &mut dyn DecisionProvider,
        quest: &mut dyn QuestHooks,
        mut pending: PendingAttack,
    ) -> Result<Advance, EngineError> {
        let choices = vec![RerollChoice::Keep, RerollChoice::Reroll];
        let request = self.request(
            Some(pending.attacker),
            DecisionOptions::Reroll {
                faces: pending.faces.clone(),
                choices: choices.clone(),
            },
            false,
        );
        let choice = match self.pick(provider, request) {
            Ok(i) => choices[i],
            Err(request) => return Ok(Advance::Waiting(request)),
        };
        self.state.phases.pop();
        if choice == RerollChoice::Reroll {
            reroll(self.state, &mut pending);
        }
        self.conclude_attack(quest, &pending);
        Ok(Advance::Progressed)
    }

    fn conclude_attack(&mut self, quest: &mut dyn QuestHooks, pending: &PendingAttack) {
        let result = finish(self.state, pending);
        self.report(quest, &result, pending.attacker);
    }

    /// Reports kills and deaths to the scenario; destroyed necromancers let
    /// the attacker shut spawn zones.
    pub(super) fn report(
        &mut self,
        quest: &mut dyn QuestHooks,
        result: &AttackResult,
        by: ActorId,
    ) {
        for (actor, kind) in &result.destroyed {
            self.emit(
                quest,
                QuestEvent::AdversaryDestroyed {
                    actor: *actor,
                    kind: *kind,
                    by,
                },
            );
        }
        for wound in result.friendly.iter().filter(|w| w.killed) {
            if self.state.survivor(wound.target).is_some() {
                info!(target: "horde::engine", actor = %wound.target, "survivor died");
                self.emit(quest, QuestEvent::SurvivorDied { actor: wound.target });
            }
        }
        for zone in &result.area_effects {
            self.emit(quest, QuestEvent::AreaEffect { zone: *zone });
        }
        let necromancers = result.necromancers_destroyed();
        if necromancers > 0 {
            self.state.phases.push(Phase::SpawnRemoval {
                actor: by,
                remaining: necromancers.min(u8::MAX as usize) as u8,
            });
        }
    }

    fn throw(
        &mut self,
        quest: &mut dyn QuestHooks,
        actor: ActorId,
        item: EquipmentId,
        zone: ZoneId,
    ) -> Result<(), EngineError> {
        let Some(thrown) = self
            .state
            .survivor_mut(actor)
            .and_then(|s| s.inventory.take(item))
        else {
            return Ok(());
        };
        let traits = thrown.kind.traits();
        if traits.contains(EquipmentTraits::DRAGON_BILE) {
            self.state.board.set_dragon_bile(zone, true)?;
            debug!(target: "horde::engine", %actor, %zone, "dragon bile spilled");
        }
        if traits.contains(EquipmentTraits::TORCH) && self.state.board.ignite(zone)? {
            let fire = crate::combat::dragon_fire(self.state, zone, Some(actor));
            info!(
                target: "horde::engine",
                %actor,
                %zone,
                destroyed = fire.destroyed.len(),
                "dragon fire"
            );
            self.report(quest, &fire, actor);
        }
        self.state.equipment.discard(thrown.kind);
        Ok(())
    }

    /// Enchantments affect every survivor in the target zone.
    fn enchant(&mut self, actor: ActorId, spell: EquipmentId, zone: ZoneId) {
        let Some(effect) = self
            .state
            .inventory(actor)
            .and_then(|inv| inv.find(spell))
            .and_then(|(_, s)| s.kind.def().enchantment)
        else {
            return;
        };
        let targets: Vec<ActorId> = self
            .state
            .actors
            .in_zone(&self.state.board, zone)
            .filter(|a| a.survivor().is_some_and(|s| s.is_in_play()))
            .map(|a| a.id)
            .collect();
        for id in &targets {
            let Some(s) = self.state.survivor_mut(*id) else { continue };
            match effect {
                Enchantment::Heal(amount) => s.heal(amount),
                Enchantment::Grant(skill) => s.skills.grant_temporary(skill),
            }
        }
        debug!(
            target: "horde::engine",
            %actor,
            %zone,
            ?effect,
            survivors = targets.len(),
            "enchantment cast"
        );
    }

    /// Places a freshly found item, swaps it for a carried one, or drops it.
    pub(super) fn keep_equipment(
        &mut self,
        provider: &mut dyn DecisionProvider,
        actor: ActorId,
        found: Equipment,
    ) -> Result<Advance, EngineError> {
        let Some(inventory) = self.state.inventory(actor) else {
            self.state.equipment.discard(found.kind);
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        };
        let mut choices: Vec<KeepChoice> = inventory
            .free_slots(&found)
            .into_iter()
            .map(KeepChoice::Slot)
            .collect();
        choices.extend(
            inventory
                .items()
                .into_iter()
                .filter(|(slot, _)| Inventory::fits(&found, *slot))
                .map(|(_, item)| KeepChoice::Replace(item.id)),
        );
        choices.push(KeepChoice::Discard);

        let request = self.request(
            Some(actor),
            DecisionOptions::Equipment {
                found,
                choices: choices.clone(),
            },
            false,
        );
        let choice = match self.pick(provider, request) {
            Ok(i) => choices[i],
            Err(request) => return Ok(Advance::Waiting(request)),
        };
        self.state.phases.pop();

        let mut dropped: Vec<EquipmentKind> = Vec::new();
        if let Some(s) = self.state.survivor_mut(actor) {
            match choice {
                KeepChoice::Slot(slot) => {
                    if let Err(item) = s.inventory.put(found, slot) {
                        dropped.push(item.kind);
                    }
                }
                KeepChoice::Replace(old) => {
                    let slot = s.inventory.find(old).map(|(slot, _)| slot);
                    if let (Some(slot), Some(item)) = (slot, s.inventory.take(old)) {
                        dropped.push(item.kind);
                        if let Err(item) = s.inventory.put(found, slot) {
                            dropped.push(item.kind);
                        }
                    } else {
                        dropped.push(found.kind);
                    }
                }
                KeepChoice::Discard => dropped.push(found.kind),
            }
        } else {
            dropped.push(found.kind);
        }
        for kind in dropped {
            self.state.equipment.discard(kind);
        }
        debug!(target: "horde::engine", %actor, ?choice, "equipment placed");
        Ok(Advance::Progressed)
    }

    fn organize_steps(&self, actor: ActorId, partner: Option<ActorId>) -> Vec<OrganizeStep> {
        let Some(own) = self.state.inventory(actor) else {
            return vec![OrganizeStep::Done];
        };
        let other = partner.and_then(|p| self.state.inventory(p));
        let mut steps = Vec::new();
        for (_, item) in own.items() {
            steps.extend(
                own.free_slots(&item)
                    .into_iter()
                    .map(|to| OrganizeStep::Move { item: item.id, to }),
            );
            if other.is_some_and(|o| !o.free_slots(&item).is_empty()) {
                steps.push(OrganizeStep::Give { item: item.id });
            }
            steps.push(OrganizeStep::Discard { item: item.id });
        }
        if let Some(other) = other {
            for (_, item) in other.items() {
                if !own.free_slots(&item).is_empty() {
                    steps.push(OrganizeStep::Take { item: item.id });
                }
            }
        }
        steps.push(OrganizeStep::Done);
        steps
    }

    /// Moves one item out of `from` into the first free slot of `to`.
    fn hand_over(&mut self, from: ActorId, to: ActorId, item: EquipmentId) {
        let Some(moved) = self
            .state
            .survivor_mut(from)
            .and_then(|s| s.inventory.take(item))
        else {
            return;
        };
        let rejected = match self.state.survivor_mut(to) {
            Some(s) => match s.inventory.free_slots(&moved).first() {
                Some(slot) => s.inventory.put(moved, *slot).err(),
                None => Some(moved),
            },
            None => Some(moved),
        };
        if let Some(back) = rejected {
            self.stow(from, back, None);
        }
    }

    /// Puts `item` back with `owner`, preferring `slot`. Whatever finds no room
    /// goes to the equipment discard pile.
    fn stow(&mut self, owner: ActorId, item: Equipment, slot: Option<Slot>) {
        let leftover = match self.state.survivor_mut(owner) {
            Some(s) => {
                let first = slot.or_else(|| s.inventory.free_slots(&item).first().copied());
                match first.map(|slot| s.inventory.put(item, slot)) {
                    Some(Ok(())) => None,
                    Some(Err(back)) => match s.inventory.free_slots(&back).first() {
                        Some(other) => s.inventory.put(back, *other).err(),
                        None => Some(back),
                    },
                    None => Some(item),
                }
            }
            None => Some(item),
        };
        if let Some(lost) = leftover {
            warn!(target: "horde::engine", %owner, kind = ?lost.kind, "no room left, item discarded");
            self.state.equipment.discard(lost.kind);
        }
    }

    /// Inventory rearrangement, one step per decision until done.
    pub(super) fn organize(
        &mut self,
        provider: &mut dyn DecisionProvider,
        actor: ActorId,
        partner: Option<ActorId>,
    ) -> Result<Advance, EngineError> {
        let steps = self.organize_steps(actor, partner);
        let request = self.request(Some(actor), DecisionOptions::Organize(steps.clone()), false);
        let step = match self.pick(provider, request) {
            Ok(i) => steps[i],
            Err(request) => return Ok(Advance::Waiting(request)),
        };
        match step {
            OrganizeStep::Move { item, to } => {
                if let Some(s) = self.state.survivor_mut(actor)
                    && let Some(from) = s.inventory.find(item).map(|(slot, _)| slot)
                    && let Some(moved) = s.inventory.take(item)
                    && let Err(back) = s.inventory.put(moved, to)
                {
                    self.stow(actor, back, Some(from));
                }
            }
            OrganizeStep::Give { item } => {
                if let Some(p) = partner {
                    self.hand_over(actor, p, item);
                }
            }
            OrganizeStep::Take { item } => {
                if let Some(p) = partner {
                    self.hand_over(p, actor, item);
                }
            }
            OrganizeStep::Discard { item } => {
                if let Some(dropped) = self
                    .state
                    .survivor_mut(actor)
                    .and_then(|s| s.inventory.take(item))
                {
                    self.state.equipment.discard(dropped.kind);
                }
            }
            OrganizeStep::Done => {
                self.state.phases.pop();
            }
        }
        Ok(Advance::Progressed)
    }

    /// A familiar acts after its survivor: attack, walk one zone, or stay.
    pub(super) fn familiar_action(
        &mut self,
        provider: &mut dyn DecisionProvider,
        quest: &mut dyn QuestHooks,
        familiar: ActorId,
    ) -> Result<Advance, EngineError> {
        let board = &self.state.board;
        let (Some(entry), Some(zone)) = (self.state.actors.get(familiar), board.zone_of(familiar))
        else {
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        };
        let Some(stat) = entry.familiar().filter(|f| f.is_alive()).map(|f| f.melee()) else {
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        };
        if entry.actions_left == 0 {
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        }

        let mut options = Vec::new();
        if board.has_faction(zone, Faction::Horde) {
            options.push(FamiliarMove::Attack);
        }
        options.extend(
            board
                .accessible_zones(zone, 1, 1, ActionKind::Move)
                .into_iter()
                .filter(|z| board.free_quadrants(*z) > 0)
                .map(FamiliarMove::Walk),
        );
        options.push(FamiliarMove::Stay);

        let request = self.request(
            Some(familiar),
            DecisionOptions::Familiar(options.clone()),
            false,
        );
        let choice = match self.pick(provider, request) {
            Ok(i) => options[i],
            Err(request) => return Ok(Advance::Waiting(request)),
        };
        debug!(target: "horde::engine", %familiar, ?choice, "familiar acts");
        match choice {
            FamiliarMove::Attack => {
                self.pay(familiar, 1, FreeActions::empty());
                if let Some(pending) = prepare(self.state, familiar, zone, stat, &[]) {
                    self.conclude_attack(quest, &pending);
                }
            }
            FamiliarMove::Walk(to) => {
                self.pay(familiar, 1, FreeActions::empty());
                self.state.actors.move_to(&mut self.state.board, familiar, to);
            }
            FamiliarMove::Stay => {
                if let Some(entry) = self.state.actors.get_mut(familiar) {
                    entry.actions_left = 0;
                }
                self.state.phases.pop();
            }
        }
        Ok(Advance::Progressed)
    }

    /// Shuts one spawn zone per destroyed necromancer.
    pub(super) fn spawn_removal(
        &mut self,
        provider: &mut dyn DecisionProvider,
        actor: ActorId,
        remaining: u8,
    ) -> Result<Advance, EngineError> {
        let zones: Vec<ZoneId> = self.state.board.spawn_zones().collect();
        if remaining == 0 || zones.is_empty() {
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        }
        let zone = if let [only] = zones.as_slice() {
            *only
        } else {
            let request = self.request(
                Some(actor),
                DecisionOptions::Zones {
                    purpose: ZonePurpose::RemoveSpawn,
                    zones: zones.clone(),
                },
                false,
            );
            match self.pick(provider, request) {
                Ok(i) => zones[i],
                Err(request) => return Ok(Advance::Waiting(request)),
            }
        };
        self.state.board.set_spawn_zone(zone, false)?;
        info!(target: "horde::engine", %actor, %zone, "spawn zone removed");
        if remaining <= 1 {
            self.state.phases.pop();
        } else if let Phase::SpawnRemoval { remaining, .. } = self.state.phases.top_mut() {
            *remaining -= 1;
        }
        Ok(Advance::Progressed)
    }
}

/// Wielded weapons among `ids`, in the given order.
fn held(inventory: &Inventory, ids: &[EquipmentId]) -> Vec<Equipment> {
    ids.iter()
        .filter_map(|id| inventory.find(*id))
        .filter(|(slot, _)| matches!(slot, Slot::Hand(_)))
        .map(|(_, item)| *item)
        .collect()
}
