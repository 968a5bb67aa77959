pub mod history;
pub mod roster;
pub mod session;
pub mod settlement;
pub mod standings;
