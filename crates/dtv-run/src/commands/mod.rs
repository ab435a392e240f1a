pub mod run;
pub mod trials;
