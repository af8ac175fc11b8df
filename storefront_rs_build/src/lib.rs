use std::process::{Command, Stdio};

use log::{error, info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use thiserror::Error;
use url::Url;

pub const REQUIRED_VARS: [&'static str; 5] = [
    "DATABASE_URL",
    "POSTGRES_URL_NON_POOLING",
    "NEXTAUTH_SECRET",
    "NEXTAUTH_URL",
    "JWT_SECRET",
];

// 这两个变量必须是 postgres 连接串
pub const DATABASE_URL_VARS: [&'static str; 2] = ["DATABASE_URL", "POSTGRES_URL_NON_POOLING"];

pub const DEFAULT_COMMAND: &'static str = "npm run build";

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),

    #[error("Invalid {0} format")]
    InvalidUrl(&'static str),

    #[error("build command is empty")]
    EmptyCommand,

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Accepts `postgres://` and `postgresql://` URLs only.
pub fn validate_database_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "postgres" | "postgresql"),
        Err(_) => false,
    }
}

fn present<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.is_empty())
}

/// Checks the deployment environment. Every missing variable is reported
/// in one error, before the URL formats are looked at.
pub fn check_env<F>(lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<&'static str> = REQUIRED_VARS
        .iter()
        .copied()
        .filter(|name| present(lookup, name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(BuildError::MissingVars(missing));
    }
    for name in DATABASE_URL_VARS.iter().copied() {
        let ok = present(lookup, name)
            .map(|v| validate_database_url(v.as_str()))
            .unwrap_or(false);
        if !ok {
            return Err(BuildError::InvalidUrl(name));
        }
    }
    Ok(())
}

/// One `NAME: Set|Not set` line per required variable; values never leave
/// this function.
pub fn env_report<F>(lookup: &F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_VARS
        .iter()
        .map(|name| {
            let state = if present(lookup, name).is_some() {
                "Set"
            } else {
                "Not set"
            };
            format!("{}: {}", name, state)
        })
        .collect()
}

pub trait BuildRunner {
    fn run(&mut self, command: &str) -> Result<()>;
}

/// Runs the command through the platform shell with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRunner;

impl BuildRunner for CommandRunner {
    fn run(&mut self, command: &str) -> Result<()> {
        if command.trim().is_empty() {
            return Err(BuildError::EmptyCommand);
        }
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C");
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c");
            c
        };
        let status = cmd
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::CommandFailed {
                command: command.to_string(),
                status: status.to_string(),
            })
        }
    }
}

/// Validates the environment and runs the build. Returns the process exit
/// code: 0 on success, 1 on any failure.
pub fn run<F, R>(lookup: F, runner: &mut R, command: &str) -> i32
where
    F: Fn(&str) -> Option<String>,
    R: BuildRunner + ?Sized,
{
    if let Err(e) = check_env(&lookup) {
        error!("Build failed: {}", e);
        return 1;
    }
    info!("Environment variables:");
    for line in env_report(&lookup) {
        info!("{}", line);
    }
    info!("Building application: {}", command);
    match runner.run(command) {
        Ok(()) => {
            info!("Build finished");
            0
        }
        Err(e) => {
            error!("Build failed: {}", e);
            1
        }
    }
}

pub fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}
