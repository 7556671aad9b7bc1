//! Shared helpers for CLI commands: session setup, view unwrapping, and
//! the color scheme for grades and marks.

use anyhow::{Result, anyhow, bail};
use colored::Color;
use std::path::Path;
use std::sync::Arc;

use crate::client::WebPortalClient;
use crate::config::GlobalConfig;
use crate::derive::{GradeTier, MarksTier, grade_tier};
use crate::extract::JsonReportExtractor;
use crate::store::{DomainView, SessionStore};

/// The session type every command operates on.
pub type PortalSession = SessionStore<WebPortalClient, JsonReportExtractor>;

/// Load the config, resolve credentials, and log in.
///
/// Credentials resolve in order: CLI flag / environment variable, then the
/// config file.
pub async fn establish_session(
    config_path: Option<&Path>,
    username: Option<String>,
    password: Option<String>,
) -> Result<PortalSession> {
    let config = match config_path {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load()?,
    };

    let username = username.or_else(|| config.username.clone()).ok_or_else(|| {
        anyhow!(
            "no username configured. Pass --username, set JPORTAL_USERNAME, \
             or add `username` to the config file"
        )
    })?;
    let password = password.or_else(|| config.password.clone()).ok_or_else(|| {
        anyhow!("no password configured. Pass --password or set JPORTAL_PASSWORD")
    })?;

    let session = SessionStore::new(
        WebPortalClient::with_base_url(&config.base_url),
        JsonReportExtractor,
    );
    session.login(&username, &password).await?;
    Ok(session)
}

/// Unwrap a published view for display.
///
/// Ready data comes back as `Some`; an empty domain prints a notice and
/// returns `None`; a failed fetch becomes an error. `Idle`/`Loading` are
/// not observable here since commands await their fetches.
pub fn unwrap_view<T>(view: DomainView<T>, what: &str) -> Result<Option<Arc<T>>> {
    match view {
        DomainView::Ready(data) => Ok(Some(data)),
        DomainView::Unavailable => {
            println!("No {what} published yet.");
            Ok(None)
        }
        DomainView::Failed(message) => bail!("failed to fetch {what}: {message}"),
        DomainView::Idle | DomainView::Loading => Ok(None),
    }
}

/// Terminal color for a letter grade.
pub fn grade_color(grade: &str) -> Color {
    match grade_tier(grade) {
        GradeTier::BrightGreen => Color::TrueColor { r: 74, g: 222, b: 128 },
        GradeTier::Green => Color::TrueColor { r: 34, g: 197, b: 94 },
        GradeTier::BrightYellow => Color::TrueColor { r: 253, g: 224, b: 71 },
        GradeTier::Yellow => Color::TrueColor { r: 250, g: 204, b: 21 },
        GradeTier::DeepYellow => Color::TrueColor { r: 234, g: 179, b: 8 },
        GradeTier::Orange => Color::TrueColor { r: 251, g: 146, b: 60 },
        GradeTier::DeepOrange => Color::TrueColor { r: 249, g: 115, b: 22 },
        GradeTier::Red => Color::TrueColor { r: 239, g: 68, b: 68 },
        GradeTier::Neutral => Color::White,
    }
}

/// Terminal color for a marks percentage band.
pub fn tier_color(tier: MarksTier) -> Color {
    match tier {
        MarksTier::High => Color::Green,
        MarksTier::Mid => Color::Yellow,
        MarksTier::Low => Color::TrueColor { r: 251, g: 146, b: 60 },
        MarksTier::Poor => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_view_surfaces_failures() {
        let view: DomainView<Vec<u8>> = DomainView::Failed("boom".to_string());
        let err = unwrap_view(view, "grades").unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn unwrap_view_passes_ready_data_through() {
        let view = DomainView::Ready(Arc::new(vec![1u8, 2]));
        let data = unwrap_view(view, "grades").unwrap().unwrap();
        assert_eq!(*data, vec![1, 2]);
    }

    #[test]
    fn unknown_grades_render_neutral() {
        assert_eq!(grade_color("?"), Color::White);
    }
}
