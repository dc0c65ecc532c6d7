use bitflags::bitflags;

use crate::action::ActionKind;

bitflags! {
    /// Which hooks a modifier row implements.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const MUTATES_STAT            = 1 << 0;
        const OVERRIDES_ACTION_COST   = 1 << 1;
        const REACTS_TO_ATTACK        = 1 << 2;
        const REACTS_TO_SIX           = 1 << 3;
        const REACTS_TO_ROUND_END     = 1 << 4;
        const CONTRIBUTES_MOVE_OPTION = 1 << 5;
        const OVERRIDES_ARMOR         = 1 << 6;
    }
}

bitflags! {
    /// Free actions a survivor gets each turn, one use per kind.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FreeActions: u8 {
        const MOVE   = 1 << 0;
        const MELEE  = 1 << 1;
        const RANGED = 1 << 2;
        const MAGIC  = 1 << 3;
        const SEARCH = 1 << 4;
        const COMBAT = 1 << 5;
    }
}

impl FreeActions {
    /// Free-action kinds able to pay for an action, most specific first.
    pub fn payers(action: ActionKind) -> &'static [FreeActions] {
        match action {
            ActionKind::Move => &[FreeActions::MOVE],
            ActionKind::Melee => &[FreeActions::MELEE, FreeActions::COMBAT],
            ActionKind::Ranged => &[FreeActions::RANGED, FreeActions::COMBAT],
            ActionKind::Magic => &[FreeActions::MAGIC, FreeActions::COMBAT],
            ActionKind::Search => &[FreeActions::SEARCH],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_free_action_covers_every_attack() {
        for action in [ActionKind::Melee, ActionKind::Ranged, ActionKind::Magic] {
            assert!(FreeActions::payers(action).contains(&FreeActions::COMBAT));
        }
        assert!(FreeActions::payers(ActionKind::Door).is_empty());
    }
}
