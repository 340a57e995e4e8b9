use bitflags::bitflags;

bitflags! {
    /// Notable things that happened in a resolved round.
    ///
    /// Carried on round logs and events so consumers can filter without
    /// inspecting the full result.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RoundFlags: u16 {
        const SKILL_CAST    = 1 << 0;
        const CRIT          = 1 << 1;
        const KILL          = 1 << 2;
        const VICTORY       = 1 << 3;
        const DEFEAT        = 1 << 4;
        const NEW_ENCOUNTER = 1 << 5;
        const REFRESHED     = 1 << 6;
        const REPLENISHED   = 1 << 7;
        const POTION_USED   = 1 << 8;
        const LOOT          = 1 << 9;
    }
}
