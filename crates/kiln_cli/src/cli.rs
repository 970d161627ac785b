use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kiln_core::SceneDesc;
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "kiln")]
#[command(about = "Trace a scene to a PNG on the CPU")]
pub struct Args {
    /// JSON scene file; the built-in demo scene is used when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Fixed seed for a reproducible image
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the sky gradient as background
    #[arg(long)]
    pub sky: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Print the effective scene as JSON and exit
    #[arg(long)]
    pub dump_scene: bool,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command-line overrides on top of the scene's render settings.
    pub fn apply_overrides(&self, desc: &mut SceneDesc) {
        let render = &mut desc.render;
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(height) = self.height {
            render.height = height;
        }
        if let Some(samples) = self.samples {
            render.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            render.max_depth = depth;
        }
        if self.seed.is_some() {
            render.seed = self.seed;
        }
        if self.sky {
            render.sky_gradient = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["kiln"]);
        assert!(args.scene.is_none());
        assert_eq!(args.output, PathBuf::from("output.png"));
        assert!(matches!(args.log_level, LogLevel::Info));
    }

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let args = Args::parse_from([
            "kiln", "--width", "64", "-s", "8", "--seed", "9", "--log-level", "debug",
        ]);
        let mut desc = SceneDesc::from_json_str(r#"{ "objects": [] }"#).unwrap();
        let before = desc.render.clone();

        args.apply_overrides(&mut desc);
        assert_eq!(desc.render.width, 64);
        assert_eq!(desc.render.height, before.height);
        assert_eq!(desc.render.samples_per_pixel, 8);
        assert_eq!(desc.render.max_depth, before.max_depth);
        assert_eq!(desc.render.seed, Some(9));
        assert!(!desc.render.sky_gradient);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }
}
