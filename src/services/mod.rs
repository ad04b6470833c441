pub mod markdown;
pub mod open_meteo;
pub mod openai;
pub mod recommendation;
