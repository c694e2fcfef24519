/// The weather card.
///
/// Shows static sample conditions; there is no live weather API behind
/// the card, only the display model and the icon-code mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub city: String,
    pub country: String,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity: u8,
    pub description: String,
    pub icon: String,
}

impl Default for WeatherCard {
    fn default() -> Self {
        Self {
            city: "London".to_string(),
            country: "GB".to_string(),
            temperature_c: 35,
            feels_like_c: 17,
            humidity: 65,
            description: "clear sky".to_string(),
            icon: "02d".to_string(),
        }
    }
}

impl WeatherCard {
    /// Icon image URL for an OpenWeatherMap-style icon code, for hosts
    /// that can render images. Unknown codes have no icon.
    pub fn icon_url(&self) -> Option<String> {
        const KNOWN: [&str; 5] = ["01d", "01n", "02d", "02n", "03d"];
        KNOWN
            .contains(&self.icon.as_str())
            .then(|| format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon))
    }

    /// One-line summary for the card header.
    pub fn headline(&self) -> String {
        format!("{}°C  {}", self.temperature_c, self.description)
    }
}
