//! Offline coordinate-to-timezone lookup and local clock formatting.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

use crate::model::TimezoneId;

static FINDER: LazyLock<DefaultFinder> = LazyLock::new(DefaultFinder::new);

/// IANA zone covering the point, or `None` when no civil zone does.
///
/// The boundary dataset covers the oceans with nautical `Etc/GMT±N` zones;
/// those are reported as `None`.
pub fn timezone_for(latitude: f64, longitude: f64) -> Option<TimezoneId> {
    let name = FINDER.get_tz_name(longitude, latitude);
    if name.is_empty() || name.starts_with("Etc/") {
        return None;
    }
    Some(name.to_string())
}

/// Wall-clock time in `zone` at `now`, e.g. "03:45 PM".
pub fn local_clock(zone: &str, now: DateTime<Utc>) -> Option<String> {
    let tz: Tz = zone.parse().ok()?;
    Some(now.with_timezone(&tz).format("%I:%M %p").to_string())
}

/// Human label for a zone: "America/New_York" becomes "New York".
pub fn zone_label(zone: &str) -> String {
    zone.rsplit('/').next().unwrap_or(zone).replace('_', " ")
}
