use std::env::var_os;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use rgblcd::{Color, DotSize, LcdConfig, LCD_ADDRESS, RGB_ADDRESS};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    pub columns: u8,
    pub lines: u8,
    /// Non-zero selects the 5x10 font on single-line displays.
    pub dot_size: u8,
    pub lcd_address: u8,
    pub rgb_address: u8,
    pub color: [u8; 3],
    pub greeting: String,
    pub blink: bool,
}

impl Config {
    fn path() -> PathBuf {
        let config_str = var_os("CONFIG_FILE");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("config.json"));
        Path::new(config_str).to_path_buf()
    }

    pub fn try_load() -> Option<Self> {
        let config_path = Self::path();
        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            let reader = std::io::BufReader::new(file);
            serde_json::from_reader(reader).ok()
        } else {
            None
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let file = std::fs::File::create(Self::path())?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn lcd_config(&self) -> LcdConfig {
        LcdConfig::default()
            .with_columns(self.columns)
            .with_lines(self.lines)
            .with_dot_size(DotSize::from(self.dot_size))
            .with_lcd_address(self.lcd_address)
            .with_rgb_address(self.rgb_address)
            .with_color(Color::from(self.color))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            columns: 16,
            lines: 2,
            dot_size: 0,
            lcd_address: LCD_ADDRESS,
            rgb_address: RGB_ADDRESS,
            color: [255, 255, 255],
            greeting: String::from("Hello, world!"),
            blink: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{ "color": [64, 0, 64] }"#).unwrap();
        assert_eq!(config.lines, 2);
        assert_eq!(config.lcd_address, 0x3E);
        assert_eq!(config.lcd_config().color, Color::new(64, 0, 64));
    }

    #[test]
    fn default_matches_driver_defaults() {
        assert_eq!(Config::default().lcd_config(), LcdConfig::default());
    }
}
