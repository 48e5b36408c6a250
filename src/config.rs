use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct AppConfig {
    pub root: PathBuf,
    pub seed: u64,
    pub days: f32,
    pub tick_seconds: f32,
}

impl AppConfig {
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        if args.len() < 2 {
            return Err(
                "usage: supplydrop <content-root> [seed] [days] [tick_seconds]".to_string(),
            );
        }

        let root = Path::new(&args[1]).to_path_buf();
        let seed = if args.len() > 2 {
            parse("seed", &args[2])?
        } else {
            env_or("SUPPLYDROP_SEED", 1u64)?
        };
        let days = if args.len() > 3 {
            parse("days", &args[3])?
        } else {
            env_or("SUPPLYDROP_DAYS", 7.0f32)?
        };
        let tick_seconds = if args.len() > 4 {
            parse("tick_seconds", &args[4])?
        } else {
            env_or("SUPPLYDROP_TICK", 5.0f32)?
        };
        if days <= 0.0 {
            return Err("days must be positive".to_string());
        }
        if tick_seconds <= 0.0 {
            return Err("tick_seconds must be positive".to_string());
        }

        Ok(Self {
            root,
            seed,
            days,
            tick_seconds,
        })
    }
}

fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("invalid {}: {}", name, value))
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse(name, &value),
        _ => Ok(default),
    }
}
