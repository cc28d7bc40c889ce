use std::time::Duration;

use crossterm::style::Color;
use thiserror::Error;

use crate::pattern::Pattern;
use crate::pattern::UnknownPattern;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown flag \"{flag}\"")]
    UnknownFlag { flag: String },

    #[error("Flag \"{flag}\" is missing its value")]
    MissingValue { flag: String },

    #[error("Failed to parse \"{got}\" as a number for \"{flag}\"")]
    InvalidNumber { flag: String, got: String },

    #[error("\"{got}\" must be nonzero for \"{flag}\"")]
    ZeroDimension { flag: String, got: String },

    #[error("Expected a 6-digit hex color, got \"{got}\"")]
    InvalidColor { got: String },

    #[error("Expected a seed of the form NAME or NAME:X,Y, got \"{got}\"")]
    InvalidSeed { got: String },

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Pattern(#[from] UnknownPattern),
}

/// Startup configuration, parsed from command-line flags. Defaults follow the
/// classic Life setup: `B3/S23`, 160x120 cells, 25ms between generations,
/// white on black, a glider seeded at the grid center.
#[derive(Debug, Clone)]
pub struct Config {
    pub rule: RuleSet,
    pub width: usize,
    pub height: usize,
    pub delay: Duration,
    pub alive_color: Color,
    pub dead_color: Color,
    pub seed: Option<(Pattern, usize, usize)>,
}

impl Default for Config {
    fn default() -> Self {
        let (width, height) = (160, 120);

        Self {
            rule: RuleSet::default(),
            width,
            height,
            delay: Duration::from_millis(25),
            alive_color: Color::Rgb {
                r: 0xFF,
                g: 0xFF,
                b: 0xFF,
            },
            dead_color: Color::Rgb { r: 0, g: 0, b: 0 },
            seed: Some((Pattern::Glider, width / 2, height / 2)),
        }
    }
}

impl Config {
    /// Parse flags, skipping the program name.
    ///
    /// Recognized: `--rule`, `--width`, `--height`, `--delay` (milliseconds),
    /// `--alive-color`, `--dead-color` (6-digit hex), `--seed NAME[:X,Y]`
    /// and `--no-seed`.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().skip(1);

        let mut explicit_seed = None;

        while let Some(flag) = args.next() {
            if flag == "--no-seed" {
                config.seed = None;
                continue;
            }

            let Some(value) = args.next() else {
                return Err(ConfigError::MissingValue { flag });
            };

            match flag.as_str() {
                "--rule" => config.rule = value.parse()?,
                "--width" => config.width = parse_dimension(&flag, &value)?,
                "--height" => config.height = parse_dimension(&flag, &value)?,
                "--delay" => {
                    let ms: u64 = parse_number(&flag, &value)?;
                    config.delay = Duration::from_millis(ms);
                }
                "--alive-color" => config.alive_color = parse_color(&value)?,
                "--dead-color" => config.dead_color = parse_color(&value)?,
                "--seed" => explicit_seed = Some(value),
                _ => return Err(ConfigError::UnknownFlag { flag }),
            }
        }

        // Resolved last so the anchor can default to the final dimensions
        if let Some(value) = explicit_seed {
            config.seed = Some(parse_seed(&value, config.width, config.height)?);
        } else if config.seed.is_some() {
            config.seed = Some((Pattern::Glider, config.width / 2, config.height / 2));
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        flag: flag.to_string(),
        got: value.to_string(),
    })
}

fn parse_dimension(flag: &str, value: &str) -> Result<usize, ConfigError> {
    let n: usize = parse_number(flag, value)?;

    if n == 0 {
        return Err(ConfigError::ZeroDimension {
            flag: flag.to_string(),
            got: value.to_string(),
        });
    }

    Ok(n)
}

/// Parse a 6-digit hex color like `ffcc00`.
fn parse_color(value: &str) -> Result<Color, ConfigError> {
    let err = || ConfigError::InvalidColor {
        got: value.to_string(),
    };

    if value.len() != 6 {
        return Err(err());
    }

    let n = u32::from_str_radix(value, 16).map_err(|_| err())?;

    Ok(Color::Rgb {
        r: (n >> 16) as u8,
        g: (n >> 8) as u8,
        b: n as u8,
    })
}

/// Parse `NAME` or `NAME:X,Y`. Without an anchor the pattern lands at the
/// grid center.
fn parse_seed(value: &str, width: usize, height: usize) -> Result<(Pattern, usize, usize), ConfigError> {
    let err = || ConfigError::InvalidSeed {
        got: value.to_string(),
    };

    let Some((name, anchor)) = value.split_once(':') else {
        let pattern: Pattern = value.parse()?;
        return Ok((pattern, width / 2, height / 2));
    };

    let pattern: Pattern = name.parse()?;

    let Some((x, y)) = anchor.split_once(',') else {
        return Err(err());
    };

    let x: usize = x.parse().map_err(|_| err())?;
    let y: usize = y.parse().map_err(|_| err())?;

    Ok((pattern, x, y))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::pattern::Pattern;
    use crate::rule_set::B3S23;

    use super::Config;
    use super::ConfigError;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        let args = std::iter::once("toruslife".to_string())
            .chain(args.iter().map(|s| s.to_string()));

        Config::from_args(args)
    }

    #[test]
    fn defaults_match_the_classic_setup() {
        let config = parse(&[]).unwrap();

        assert_eq!(config.rule, B3S23);
        assert_eq!((config.width, config.height), (160, 120));
        assert_eq!(config.delay, Duration::from_millis(25));
        assert_eq!(config.seed, Some((Pattern::Glider, 80, 60)));
    }

    #[test]
    fn seed_anchor_follows_resized_grid() {
        let config = parse(&["--width", "40", "--height", "30"]).unwrap();

        assert_eq!(config.seed, Some((Pattern::Glider, 20, 15)));
    }

    #[test]
    fn explicit_seed_with_anchor() {
        let config = parse(&["--seed", "acorn:12,7"]).unwrap();

        assert_eq!(config.seed, Some((Pattern::Acorn, 12, 7)));

        let config = parse(&["--no-seed"]).unwrap();
        assert_eq!(config.seed, None);
    }

    #[test]
    fn rejects_malformed_flags() {
        assert!(matches!(
            parse(&["--rule"]),
            Err(ConfigError::MissingValue { .. })
        ));
        assert!(matches!(
            parse(&["--width", "0"]),
            Err(ConfigError::ZeroDimension { .. })
        ));
        assert!(matches!(
            parse(&["--delay", "soon"]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse(&["--alive-color", "red"]),
            Err(ConfigError::InvalidColor { .. })
        ));
        assert!(matches!(
            parse(&["--seed", "glider:nowhere"]),
            Err(ConfigError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--flip", "yes"]),
            Err(ConfigError::UnknownFlag { .. })
        ));
        assert!(matches!(parse(&["--rule", "B9/S23"]), Err(ConfigError::Rule(_))));
        assert!(matches!(
            parse(&["--seed", "gosper"]),
            Err(ConfigError::Pattern(_))
        ));
    }
}
