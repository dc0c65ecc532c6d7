use crate::state::{CellPos, DoorId, ZoneId};

use super::Environment;

/// A tactical region of mutually adjacent cells.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub id: ZoneId,
    pub environment: Environment,
    pub cells: Vec<CellPos>,
    /// Tokens left by noisy actions; cleared at round end.
    pub noise_tokens: u8,
    /// Sum of the noise contributions of actors standing here.
    pub actor_noise: u16,
    pub objective: bool,
    pub dragon_fire: bool,
    pub dragon_bile: bool,
    /// Indoor zones start dark until a door into their building opens.
    pub revealed: bool,
    pub starting: bool,
    /// Active spawn zone.
    pub spawn: bool,
    /// Door sides on this zone's cells.
    pub doors: Vec<DoorId>,
}

impl Zone {
    pub fn new(id: ZoneId, environment: Environment) -> Self {
        Self {
            id,
            environment,
            cells: Vec::new(),
            noise_tokens: 0,
            actor_noise: 0,
            objective: false,
            dragon_fire: false,
            dragon_bile: false,
            revealed: !environment.is_indoor(),
            starting: false,
            spawn: false,
            doors: Vec::new(),
        }
    }

    /// Noise used by adversaries to pick a destination.
    #[inline]
    pub fn noise(&self) -> u16 {
        self.noise_tokens as u16 + self.actor_noise
    }

    #[inline]
    pub fn is_indoor(&self) -> bool {
        self.environment.is_indoor()
    }
}
