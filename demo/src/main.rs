mod config;

use std::env::var;
use std::fmt::Write;
use std::thread::sleep;
use std::time::Duration;
use dotenv::dotenv;
use log::{debug, info};
use rgblcd::RgbLcd;
use rppal::hal::Delay;
use rppal::i2c::I2c;
use sysinfo::System;
use crate::config::Config;

const UNKNOWN_STR: &str = "???";

/// Bell glyph, shown in front of the host name.
const BELL: [u8; 8] = [
    0b00100,
    0b01110,
    0b01110,
    0b01110,
    0b11111,
    0b00000,
    0b00100,
    0b00000,
];

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("rgblcd demo starting...");

    let i2c_bus: u8 = match var("RGBLCD_I2C_BUS") {
        Ok(bus) => bus.parse()?,
        Err(_) => 1,
    };

    debug!("Trying to load config...");
    let config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };
    debug!("{:?}", config);

    info!("LCD @ I2C bus {}, address {:#04x}, backlight {:#04x}",
        i2c_bus, config.lcd_address, config.rgb_address);

    debug!("Opening I2C bus {}...", i2c_bus);
    let i2c = I2c::with_bus(i2c_bus)?;
    debug!("I2C bus opened, clock {:?} Hz.", i2c.clock_speed().ok());

    debug!("Initializing LCD driver...");
    let mut lcd = RgbLcd::create_with_config(i2c, Delay::new(), config.lcd_config())?;
    debug!("LCD initialized, {} line(s).", lcd.lines());

    lcd.create_custom_char(0, &BELL)?;

    lcd.set_cursor(0, 0)?;
    lcd.print_str(&config.greeting)?;

    if lcd.lines() > 1 {
        lcd.set_cursor(0, 1)?;
        lcd.print_bytes(&[0])?;
        lcd.print_char(' ')?;
        let host_name = System::host_name();
        lcd.print_str(host_name.as_deref().unwrap_or(UNKNOWN_STR))?;
    }

    if config.blink {
        lcd.blink_led_on()?;
    }

    sleep(Duration::from_secs(3));

    lcd.clear()?;
    write!(lcd, "rgblcd v{}", env!("CARGO_PKG_VERSION"))?;
    if lcd.lines() > 1 {
        // Uptime in hours, two decimals
        let uptime_hours = (System::uptime() / 36) as f64 / 100.0;
        lcd.set_cursor(0, 1)?;
        lcd.print_str("up ")?;
        lcd.print_double(uptime_hours)?;
        lcd.print_char('h')?;
    }

    lcd.blink_led_off()?;

    info!("Done.");

    lcd.close();

    Ok(())
}
