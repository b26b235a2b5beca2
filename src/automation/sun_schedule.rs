// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay schedule following sunrise and sunset.
//!
//! Sun times come from the public `api.sunrise-sunset.org` service, asked
//! for machine-readable timestamps (`formatted=0`) in the location's time
//! zone. Each day type (weekday, Saturday, Sunday) has an on and an off
//! rule; a rule is either a fixed local time or a sun event shifted by a
//! number of minutes.
//!
//! # Examples
//!
//! ```
//! use shelly_automation::automation::WeekRules;
//!
//! let rules: WeekRules = serde_json::from_str(r#"{
//!     "weekday":  {"on": {"variable": "civil_twilight_begin", "offset": 15},
//!                  "off": {"variable": "sunset", "offset": -15}},
//!     "saturday": {"on": {"time": "09:00"}, "off": {"time": "23:00"}},
//!     "sunday":   {"on": {"time": "10:00"}, "off": {"time": "22:30"}}
//! }"#).unwrap();
//! # let _ = rules;
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, TimeDelta, Utc, Weekday};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::Device;
use crate::error::{ParseError, ProtocolError, Result, ValueError};
use crate::protocol::Protocol;

/// A field of the sun times response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunEvent {
    /// Sunrise.
    Sunrise,
    /// Sunset.
    Sunset,
    /// Solar noon.
    SolarNoon,
    /// Start of civil twilight.
    CivilTwilightBegin,
    /// End of civil twilight.
    CivilTwilightEnd,
    /// Start of nautical twilight.
    NauticalTwilightBegin,
    /// End of nautical twilight.
    NauticalTwilightEnd,
    /// Start of astronomical twilight.
    AstronomicalTwilightBegin,
    /// End of astronomical twilight.
    AstronomicalTwilightEnd,
}

/// Sun event times for one day, in the location's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SunTimes {
    sunrise: DateTime<FixedOffset>,
    sunset: DateTime<FixedOffset>,
    solar_noon: DateTime<FixedOffset>,
    civil_twilight_begin: DateTime<FixedOffset>,
    civil_twilight_end: DateTime<FixedOffset>,
    nautical_twilight_begin: DateTime<FixedOffset>,
    nautical_twilight_end: DateTime<FixedOffset>,
    astronomical_twilight_begin: DateTime<FixedOffset>,
    astronomical_twilight_end: DateTime<FixedOffset>,
}

impl SunTimes {
    /// Returns the time of `event`.
    #[must_use]
    pub fn get(&self, event: SunEvent) -> DateTime<FixedOffset> {
        match event {
            SunEvent::Sunrise => self.sunrise,
            SunEvent::Sunset => self.sunset,
            SunEvent::SolarNoon => self.solar_noon,
            SunEvent::CivilTwilightBegin => self.civil_twilight_begin,
            SunEvent::CivilTwilightEnd => self.civil_twilight_end,
            SunEvent::NauticalTwilightBegin => self.nautical_twilight_begin,
            SunEvent::NauticalTwilightEnd => self.nautical_twilight_end,
            SunEvent::AstronomicalTwilightBegin => self.astronomical_twilight_begin,
            SunEvent::AstronomicalTwilightEnd => self.astronomical_twilight_end,
        }
    }

    /// Returns the sunrise, which decides the day the times belong to.
    #[must_use]
    pub fn sunrise(&self) -> DateTime<FixedOffset> {
        self.sunrise
    }
}

/// A local wall-clock time written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Returns the time.
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ValueError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ValueError::InvalidTimeOfDay(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValueError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// When a switch happens on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimeRule {
    /// A fixed local time on the sunrise's date.
    Fixed {
        /// Time of day.
        time: TimeOfDay,
    },
    /// A sun event shifted by `offset` minutes.
    Relative {
        /// Sun event the rule follows.
        variable: SunEvent,
        /// Minutes after (or, when negative, before) the event.
        #[serde(default)]
        offset: i32,
    },
}

impl TimeRule {
    /// Returns the instant this rule selects for the day of `times`.
    #[must_use]
    pub fn resolve(&self, times: &SunTimes) -> DateTime<FixedOffset> {
        match *self {
            Self::Fixed { time } => {
                let sunrise = times.sunrise();
                let offset = *sunrise.offset();
                let local = sunrise.date_naive().and_time(time.time());
                let utc = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
                DateTime::from_naive_utc_and_offset(utc, offset)
            }
            Self::Relative { variable, offset } => {
                times.get(variable) + TimeDelta::minutes(i64::from(offset))
            }
        }
    }
}

/// On and off rules for one day type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DayRules {
    /// When the relay turns on.
    pub on: TimeRule,
    /// When the relay turns off.
    pub off: TimeRule,
}

/// Rules per day type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WeekRules {
    /// Monday to Friday.
    pub weekday: DayRules,
    /// Saturday.
    pub saturday: DayRules,
    /// Sunday.
    pub sunday: DayRules,
}

impl WeekRules {
    /// Returns the rules applying on `day`.
    #[must_use]
    pub fn for_day(&self, day: Weekday) -> &DayRules {
        match day {
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
            _ => &self.weekday,
        }
    }
}

/// Coordinates and time zone sent to the sun times service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// IANA time zone, e.g. `Europe/London`.
    pub time_zone: String,
}

/// Day to fetch sun times for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    /// The current day.
    Today,
    /// The next day.
    Tomorrow,
}

impl Day {
    /// Returns the value of the `date` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SunTimesEnvelope {
    status: String,
    #[serde(default)]
    results: Option<serde_json::Value>,
}

pub(crate) fn parse_sun_times(body: &str) -> std::result::Result<SunTimes, ParseError> {
    let envelope: SunTimesEnvelope = serde_json::from_str(body)?;
    if envelope.status != "OK" {
        return Err(ParseError::InvalidValue {
            field: "status".to_string(),
            message: envelope.status,
        });
    }
    let results = envelope
        .results
        .ok_or_else(|| ParseError::MissingField("results".to_string()))?;
    Ok(serde_json::from_value(results)?)
}

/// Client for the sun times service.
#[derive(Debug, Clone)]
pub struct SunTimesClient {
    base_url: String,
    client: Client,
}

impl SunTimesClient {
    /// Public service address.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.sunrise-sunset.org";
    /// Request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a client for the public service.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> std::result::Result<Self, ProtocolError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Creates a client for another server speaking the same API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> std::result::Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(ProtocolError::Http)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, location: &Location, day: Day) -> String {
        format!(
            "{}/json?lat={}&lng={}&formatted=0&tzid={}&date={}",
            self.base_url,
            location.latitude,
            location.longitude,
            urlencoding::encode(&location.time_zone),
            day.as_str()
        )
    }

    /// Fetches the sun times of `day` at `location`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, is rejected, or the body is not
    /// a successful sun times response.
    pub async fn fetch(&self, location: &Location, day: Day) -> Result<SunTimes> {
        let url = self.build_url(location, day);
        tracing::debug!(url = %url, "Fetching sun times");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;
        let status = response.status();
        let body = response.text().await.map_err(ProtocolError::Http)?;
        if !status.is_success() {
            return Err(ProtocolError::Rejected {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
            .into());
        }
        Ok(parse_sun_times(&body)?)
    }
}

/// Next action of a [`SunSchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Set the relay to `on` at `at`.
    SwitchAt {
        /// Relay state to set.
        on: bool,
        /// When to set it.
        at: DateTime<FixedOffset>,
    },
    /// Both switches of the day are past.
    RefreshTomorrow,
}

/// Decides the next action for `now`.
///
/// The day type follows the sunrise's weekday. With `inverse` the relay is
/// switched off at the on time and on at the off time.
#[must_use]
pub fn plan(rules: &WeekRules, times: &SunTimes, now: DateTime<FixedOffset>, inverse: bool) -> Plan {
    let day = rules.for_day(times.sunrise().weekday());
    let on_at = day.on.resolve(times);
    let off_at = day.off.resolve(times);

    if now < on_at {
        Plan::SwitchAt {
            on: !inverse,
            at: on_at,
        }
    } else if now < off_at {
        Plan::SwitchAt {
            on: inverse,
            at: off_at,
        }
    } else {
        Plan::RefreshTomorrow
    }
}

/// Switches a relay on and off following sun times.
#[derive(Debug)]
pub struct SunSchedule<P: Protocol> {
    device: Device<P>,
    switch_id: u8,
    client: SunTimesClient,
    location: Location,
    rules: WeekRules,
    inverse: bool,
}

impl<P: Protocol> SunSchedule<P> {
    /// Wait before a failed fetch is retried.
    pub const RETRY_DELAY: Duration = Duration::from_secs(60 * 60);

    /// Creates the schedule for `switch:<switch_id>`.
    pub fn new(
        device: Device<P>,
        switch_id: u8,
        client: SunTimesClient,
        location: Location,
        rules: WeekRules,
    ) -> Self {
        Self {
            device,
            switch_id,
            client,
            location,
            rules,
            inverse: false,
        }
    }

    /// Swaps the on and off actions.
    #[must_use]
    pub fn inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    /// Fetches sun times and switches the relay, forever.
    pub async fn run(self) {
        let mut day = Day::Today;
        loop {
            tracing::info!(day = day.as_str(), "Refreshing sun times");
            let times = match self.client.fetch(&self.location, day).await {
                Ok(times) => times,
                Err(e) => {
                    tracing::warn!(error = %e, "Cannot fetch sun times, retrying in 1 hour");
                    tokio::time::sleep(Self::RETRY_DELAY).await;
                    continue;
                }
            };

            let mut not_before: Option<DateTime<FixedOffset>> = None;
            loop {
                let clock = Utc::now().fixed_offset();
                let now = not_before.map_or(clock, |last| clock.max(last));
                match plan(&self.rules, &times, now, self.inverse) {
                    Plan::SwitchAt { on, at } => {
                        tracing::info!(on, at = %at, "Next switch");
                        tokio::time::sleep((at - clock).to_std().unwrap_or_default()).await;
                        if let Err(e) = self.device.set_switch(self.switch_id, on).await {
                            tracing::debug!(error = %e, "Remote call failed");
                        }
                        not_before = Some(at);
                    }
                    Plan::RefreshTomorrow => break,
                }
            }
            day = Day::Tomorrow;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn times_for(date: &str) -> SunTimes {
        let at = |time: &str| format!("{date}T{time}:00+01:00");
        serde_json::from_value(json!({
            "sunrise": at("05:32"),
            "sunset": at("20:31"),
            "solar_noon": at("13:01"),
            "day_length": 53940,
            "civil_twilight_begin": at("04:56"),
            "civil_twilight_end": at("21:08"),
            "nautical_twilight_begin": at("04:10"),
            "nautical_twilight_end": at("21:54"),
            "astronomical_twilight_begin": at("03:12"),
            "astronomical_twilight_end": at("22:52"),
        }))
        .unwrap()
    }

    fn rules() -> WeekRules {
        serde_json::from_value(json!({
            "weekday": {
                "on": {"fixed": false, "variable": "civil_twilight_begin", "offset": 15},
                "off": {"fixed": false, "variable": "sunset", "offset": -15}
            },
            "saturday": {
                "on": {"fixed": true, "time": "09:00"},
                "off": {"fixed": true, "time": "23:00"}
            },
            "sunday": {
                "on": {"fixed": true, "time": "10:00"},
                "off": {"fixed": true, "time": "22:30"}
            }
        }))
        .unwrap()
    }

    fn local(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    #[test]
    fn weekday_before_on_time() {
        // 2024-05-01 is a Wednesday.
        let plan = plan(&rules(), &times_for("2024-05-01"), local("2024-05-01T03:00:00+01:00"), false);
        assert_eq!(
            plan,
            Plan::SwitchAt {
                on: true,
                at: local("2024-05-01T05:11:00+01:00"),
            }
        );
    }

    #[test]
    fn weekday_between_on_and_off() {
        let plan = plan(&rules(), &times_for("2024-05-01"), local("2024-05-01T12:00:00+01:00"), false);
        assert_eq!(
            plan,
            Plan::SwitchAt {
                on: false,
                at: local("2024-05-01T20:16:00+01:00"),
            }
        );
    }

    #[test]
    fn after_off_time_refreshes() {
        let plan = plan(&rules(), &times_for("2024-05-01"), local("2024-05-01T21:00:00+01:00"), false);
        assert_eq!(plan, Plan::RefreshTomorrow);
    }

    #[test]
    fn inverse_swaps_states() {
        let plan = plan(&rules(), &times_for("2024-05-01"), local("2024-05-01T03:00:00+01:00"), true);
        assert!(matches!(plan, Plan::SwitchAt { on: false, .. }));
    }

    #[test]
    fn weekend_uses_fixed_times() {
        let saturday = plan(&rules(), &times_for("2024-05-04"), local("2024-05-04T03:00:00+01:00"), false);
        assert_eq!(
            saturday,
            Plan::SwitchAt {
                on: true,
                at: local("2024-05-04T09:00:00+01:00"),
            }
        );

        let sunday = plan(&rules(), &times_for("2024-05-05"), local("2024-05-05T12:00:00+01:00"), false);
        assert_eq!(
            sunday,
            Plan::SwitchAt {
                on: false,
                at: local("2024-05-05T22:30:00+01:00"),
            }
        );
    }

    #[test]
    fn switch_instant_itself_moves_on() {
        let times = times_for("2024-05-01");
        let on_at = local("2024-05-01T05:11:00+01:00");
        assert!(matches!(
            plan(&rules(), &times, on_at, false),
            Plan::SwitchAt { on: false, .. }
        ));
    }

    #[test]
    fn time_of_day_parsing() {
        assert_eq!("07:05".parse::<TimeOfDay>().unwrap().to_string(), "07:05");
        assert_eq!(
            "25:00".parse::<TimeOfDay>(),
            Err(ValueError::InvalidTimeOfDay("25:00".to_string()))
        );
        assert!("7".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn relative_rule_defaults_to_no_offset() {
        let rule: TimeRule = serde_json::from_value(json!({"variable": "sunset"})).unwrap();
        assert_eq!(
            rule.resolve(&times_for("2024-05-01")),
            local("2024-05-01T20:31:00+01:00")
        );
    }

    #[test]
    fn envelope_status_is_checked() {
        let err = parse_sun_times(r#"{"results":"","status":"INVALID_REQUEST"}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "status"));
    }

    #[test]
    fn url_carries_location() {
        let client = SunTimesClient::with_base_url("http://127.0.0.1:9/").unwrap();
        let location = Location {
            latitude: 51.2362,
            longitude: -0.5704,
            time_zone: "Europe/London".to_string(),
        };
        assert_eq!(
            client.build_url(&location, Day::Tomorrow),
            "http://127.0.0.1:9/json?lat=51.2362&lng=-0.5704&formatted=0&tzid=Europe%2FLondon&date=tomorrow"
        );
    }
}
