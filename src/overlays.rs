//! Celebration banners shown on landing.
//!
//! A birthday banner (when names were handed over) stays for
//! [`BIRTHDAY_VISIBLE`], fades for [`BIRTHDAY_FADE`], and then hands over to
//! the holiday banner if there is one. Without birthdays the holiday banner
//! shows immediately. The holiday banner dismisses itself after
//! [`HOLIDAY_VISIBLE`]. All timers live on one task that is aborted on drop.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::types::{Holiday, LandingState};

pub const BIRTHDAY_VISIBLE: Duration = Duration::from_millis(4000);
pub const BIRTHDAY_FADE: Duration = Duration::from_millis(700);
pub const HOLIDAY_VISIBLE: Duration = Duration::from_millis(5000);

const BIRTHDAY_GREETING: &str = "Happy Birthday";
const BIRTHDAY_SIGNOFF: &str = "Enjoy your special day";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Banner {
    #[default]
    None,
    Birthday { lines: Vec<String>, fading: bool },
    Holiday { name: String, details: String },
}

/// Banner lines for the given names; empty when there is nobody to greet.
pub fn birthday_lines(names: &[String]) -> Vec<String> {
    let names: Vec<&String> = names.iter().filter(|n| !n.trim().is_empty()).collect();
    if names.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(names.len() + 2);
    lines.push(BIRTHDAY_GREETING.to_string());
    lines.extend(names.into_iter().cloned());
    lines.push(BIRTHDAY_SIGNOFF.to_string());
    lines
}

fn holiday_banner(holiday: Option<&Holiday>) -> Option<Banner> {
    holiday.filter(|h| !h.name.trim().is_empty()).map(|h| Banner::Holiday {
        name: h.name.clone(),
        details: h.details.clone(),
    })
}

pub struct OverlayController {
    banner: Arc<watch::Sender<Banner>>,
    task: Option<JoinHandle<()>>,
}

impl OverlayController {
    /// Show the first banner for `landing` and schedule the rest.
    pub fn start(landing: &LandingState) -> Self {
        let lines = birthday_lines(&landing.birthday_names);
        let holiday = holiday_banner(landing.holiday.as_ref());

        let first = if !lines.is_empty() {
            Banner::Birthday {
                lines: lines.clone(),
                fading: false,
            }
        } else {
            holiday.clone().unwrap_or_default()
        };
        let (tx, _rx) = watch::channel(first.clone());
        let banner = Arc::new(tx);

        if first == Banner::None {
            return Self { banner, task: None };
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::debug!("No runtime for banner timers, skipping banners");
                banner.send_replace(Banner::None);
                return Self { banner, task: None };
            }
        };

        let tx = Arc::clone(&banner);
        let task = handle.spawn(async move {
            if !lines.is_empty() {
                tokio::time::sleep(BIRTHDAY_VISIBLE).await;
                tx.send_replace(Banner::Birthday { lines, fading: true });
                tokio::time::sleep(BIRTHDAY_FADE).await;
                tx.send_replace(holiday.clone().unwrap_or_default());
            }
            if holiday.is_some() {
                tokio::time::sleep(HOLIDAY_VISIBLE).await;
                tx.send_replace(Banner::None);
            }
        });

        Self {
            banner,
            task: Some(task),
        }
    }

    pub fn banner(&self) -> Banner {
        self.banner.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Banner> {
        self.banner.subscribe()
    }

    /// Cancel pending timers and hide whatever is showing.
    pub fn dismiss(&mut self) {
        self.cancel();
        self.banner.send_replace(Banner::None);
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for OverlayController {
    fn drop(&mut self) {
        self.cancel();
    }
}
