//! Switcher core: keystroke matcher, flash feedback, presentation snapshot and
//! the controller that owns them for one show-cycle at a time.

pub mod controller;
pub mod feedback;
pub mod matcher;
pub mod presenter;

pub use controller::{KeyOutcome, ShowOutcome, SwitcherController};
pub use feedback::FlashTimer;
pub use matcher::{InputMatcher, MatchOutcome};
pub use presenter::{LogPresenter, Presenter, SwitcherView};
