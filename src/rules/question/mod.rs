pub mod helpers;
pub mod rules;
