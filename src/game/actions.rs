//! Semantic action IDs for Point Chase click targets.

pub const PLAY_OR_RESTART: u16 = 1;
pub const TOGGLE_AUTO_PLAY: u16 = 2;

/// Point targets: `POINT_BASE + index` into `GameSession::points`.
pub const POINT_BASE: u16 = 1000;

/// Index of the point a click action refers to, if it is a point action.
pub fn point_index(action_id: u16) -> Option<usize> {
    action_id
        .checked_sub(POINT_BASE)
        .map(|i| i as usize)
}

/// Click action for the point at `index`, if it fits in the ID space.
pub fn point_action(index: usize) -> Option<u16> {
    u16::try_from(index)
        .ok()
        .and_then(|i| POINT_BASE.checked_add(i))
}
