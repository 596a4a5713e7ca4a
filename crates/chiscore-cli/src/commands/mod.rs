pub mod assign;
pub mod compare;
pub mod lookup;
