use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use compact_str::CompactString;

use crate::{
    cli::Args,
    id::GistId,
    result::{AppError, Result},
};

pub const DEFAULT_DAYS: i64 = 14;
pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 30;

/// Validated settings for one run, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: CompactString,
    pub gist_id: GistId,
    pub username: CompactString,
    /// Lookback window, always within `MIN_DAYS..=MAX_DAYS`
    pub days: i64,
    pub api_url: CompactString,
    pub workdir: PathBuf,
    pub linguist: CompactString,
    pub log_responses: Option<PathBuf>,
}

impl AppConfig {
    /// Oldest push time still inside the lookback window
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days)
    }
}

impl TryFrom<Args> for AppConfig {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self> {
        let token = required(args.token, "GH_TOKEN")?;
        let gist_id = required(args.gist_id, "GIST_ID")?;
        let username = required(args.username, "USERNAME")?;
        let days = parse_days(args.days.as_deref())?;

        Ok(Self {
            token,
            gist_id: GistId::new(gist_id),
            username,
            days,
            api_url: args.api_url.into(),
            workdir: args.workdir,
            linguist: args.linguist.into(),
            log_responses: args.log_responses,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<CompactString> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().into()),
        _ => Err(AppError::config_validation_error(
            name,
            format!("{name} is not provided."),
        )),
    }
}

/// Unset or blank means the default; anything else must be an integer
fn parse_days(value: Option<&str>) -> Result<i64> {
    let days = match value.map(str::trim) {
        None | Some("") => DEFAULT_DAYS,
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            AppError::config_validation_error("DAYS", format!("DAYS must be an integer, got {raw:?}."))
        })?,
    };
    Ok(days.clamp(MIN_DAYS, MAX_DAYS))
}
