pub mod open_weather;

pub use open_weather::OpenWeatherClient;
