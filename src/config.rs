use std::path::PathBuf;

use clap::Parser;

use crate::timer::TIMER_DEC_PER_SECOND;

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;
pub const DEFAULT_SCALE: u32 = 20;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
pub struct Settings {
    /// Path to the ROM file to run
    pub rom: PathBuf,

    /// Window scale factor; rounded down to 1, 2, 4, 8, 16 or 32
    #[arg(short, long, default_value_t = DEFAULT_SCALE, value_parser = clap::value_parser!(u32).range(1..=32))]
    pub scale: u32,

    /// Lit pixel colour as 0xRRGGBB
    #[arg(long, default_value = "0xFFFFFF", value_parser = parse_color)]
    pub fg_color: u32,

    /// Unlit pixel colour as 0xRRGGBB
    #[arg(long, default_value = "0x000000", value_parser = parse_color)]
    pub bg_color: u32,

    /// Instructions executed per second
    #[arg(short, long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    pub ips: u32,

    /// Tone frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    pub tone_hz: f32,

    /// Tone volume, 0.0 to 1.0
    #[arg(long, default_value_t = 0.2, value_parser = parse_volume)]
    pub volume: f32,

    /// Seed for the CXNN random source
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Settings {
    pub fn instructions_per_tick(&self) -> u32 {
        (self.ips / TIMER_DEC_PER_SECOND).max(1)
    }
}

fn parse_color(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix('#'))
        .unwrap_or(s);
    let color = u32::from_str_radix(digits, 16).map_err(|e| format!("bad colour {s:?}: {e}"))?;
    if color > 0xFF_FF_FF {
        return Err(format!("colour {s:?} is wider than 0xRRGGBB"));
    }
    Ok(color)
}

fn parse_volume(s: &str) -> Result<f32, String> {
    let volume: f32 = s.parse().map_err(|e| format!("bad volume {s:?}: {e}"))?;
    if !(0.0..=1.0).contains(&volume) {
        return Err(format!("volume {volume} is outside 0.0..=1.0"));
    }
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["chipvm", "pong.ch8"]).unwrap();
        assert_eq!(settings.rom, PathBuf::from("pong.ch8"));
        assert_eq!(settings.scale, 20);
        assert_eq!(settings.fg_color, 0xFFFFFF);
        assert_eq!(settings.bg_color, 0x000000);
        assert_eq!(settings.ips, 700);
        assert_eq!(settings.instructions_per_tick(), 11);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::try_parse_from([
            "chipvm",
            "--fg-color",
            "#00FF7F",
            "--bg-color",
            "101010",
            "--ips",
            "30",
            "--seed",
            "7",
            "--volume",
            "0.5",
            "rom.ch8",
        ])
        .unwrap();
        assert_eq!(settings.fg_color, 0x00FF7F);
        assert_eq!(settings.bg_color, 0x101010);
        assert_eq!(settings.instructions_per_tick(), 1);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.volume, 0.5);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::try_parse_from(["chipvm"]).is_err());
        assert!(Settings::try_parse_from(["chipvm", "--fg-color", "0x1000000", "r"]).is_err());
        assert!(Settings::try_parse_from(["chipvm", "--volume", "1.5", "r"]).is_err());
        assert!(Settings::try_parse_from(["chipvm", "--scale", "0", "r"]).is_err());
    }
}
