//! Marker names referenced by the scene tables. They must match catalog entry names.

pub const LOGIN_TAG: &str = "login_tag";
pub const LOGIN_ENTER_BTN: &str = "login_enter_btn";
pub const INDEX_INDEX2_BTN: &str = "index_index2_btn";
pub const INDEX_EXPLORE_BTN: &str = "index_explore_btn";
pub const INDEX2_INDEX_BTN: &str = "index2_index_btn";
pub const EXPLORE_TAG: &str = "explore_tag";
pub const BATTLE_READY_BTN: &str = "battle_ready_btn";
pub const BATTLE_PRESET_BTN: &str = "battle_preset_btn";
pub const BATTLE_AUTO_BTN: &str = "battle_auto_btn";
pub const BATTLE_CLICK_CONTINUE_TAG: &str = "battle_clickContinue_tag";
