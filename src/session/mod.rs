pub mod answer;
pub mod attempt;
pub mod builder;
pub mod countdown;
pub mod quiz;
pub mod settings;
pub mod setup;
