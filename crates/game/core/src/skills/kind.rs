/// Every modifier known to the rules.
///
/// Names parse in snake_case (`plus_one_die_melee`) for content files.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkillKind {
    PlusOneAction,
    PlusOneDieMelee,
    PlusOneDieRanged,
    PlusOneDieMagic,
    PlusOneDieCombat,
    PlusOneDamageMelee,
    PlusOneDamageRanged,
    PlusOneDamageMagic,
    PlusOneToHitMelee,
    PlusOneToHitRanged,
    PlusOneToHitCombat,
    PlusOneMaxRange,
    PointBlank,
    SteadyHand,
    Marksman,
    Lucky,
    Slippery,
    QuickReload,
    PlusOneFreeMove,
    PlusOneFreeMelee,
    PlusOneFreeRanged,
    PlusOneFreeMagic,
    PlusOneFreeSearch,
    PlusOneFreeCombat,
    RollSixMelee,
    RollSixRanged,
    RollSixMagic,
    RollSixCombat,
    Reaper,
    Leech,
    Ignite,
    Regeneration,
    PlusOneZonePerMove,
    Sprint,
    IronHide,
    PlusOneArmor,
}
