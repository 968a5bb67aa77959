pub mod settle;
pub mod stakes;
