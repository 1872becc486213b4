//! Configuration types.

use std::time::Duration;

use crate::booking::PhoneValidator;
use crate::error::ConfigError;

/// Webhook that receives assessments and booking-intent pings.
pub const DEFAULT_ASSESSMENT_URL: &str = "https://orbilo.app.n8n.cloud/webhook/vision-followup";
/// Webhook that receives "not now" abandonment beacons.
pub const DEFAULT_ABANDON_URL: &str = "https://orbilo.app.n8n.cloud/webhook-test/vision-followup";
/// Webhook that receives the beacon fired when the result screen is closed.
pub const DEFAULT_CLOSE_BEACON_URL: &str = "https://orbilo.app.n8n.cloud/webhook-test/vision-quiz";
/// UK mobile: `07` followed by nine digits.
pub const DEFAULT_PHONE_PATTERN: &str = r"^07\d{9}$";

/// Top-level configuration for one deployment.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub assessment: AssessmentConfig,
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Load from `VISION_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            assessment: AssessmentConfig::from_lookup(&lookup),
            booking: BookingConfig::from_lookup(&lookup),
        }
    }
}

/// Endpoints and pacing for the primary assessment flow.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Receives the completed assessment and replies with `{message}`.
    pub assessment_url: String,
    /// Receives the `book_consultation` ping.
    pub booking_intent_url: String,
    /// Where the browser goes after the booking-intent ping.
    pub follow_up_url: String,
    /// Receives the "not now" beacon.
    pub abandon_url: String,
    /// Receives the beacon sent when the result screen is closed.
    pub close_beacon_url: String,
    /// The waiting screen stays up at least this long.
    pub min_submit_delay: Duration,
    /// Upper bound on any single webhook request.
    pub request_timeout: Duration,
    /// Static headers added to every request.
    pub extra_headers: Vec<(String, String)>,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            assessment_url: DEFAULT_ASSESSMENT_URL.to_string(),
            booking_intent_url: DEFAULT_ASSESSMENT_URL.to_string(),
            follow_up_url: DEFAULT_ASSESSMENT_URL.to_string(),
            abandon_url: DEFAULT_ABANDON_URL.to_string(),
            close_beacon_url: DEFAULT_CLOSE_BEACON_URL.to_string(),
            min_submit_delay: Duration::from_millis(4000),
            request_timeout: Duration::from_secs(30),
            extra_headers: vec![(
                "ngrok-skip-browser-warning".to_string(),
                "true".to_string(),
            )],
        }
    }
}

impl AssessmentConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let extra_headers = match lookup("VISION_EXTRA_HEADERS") {
            Some(raw) => parse_headers(&raw),
            None => defaults.extra_headers,
        };

        Self {
            assessment_url: lookup("VISION_ASSESSMENT_URL").unwrap_or(defaults.assessment_url),
            booking_intent_url: lookup("VISION_BOOKING_INTENT_URL")
                .unwrap_or(defaults.booking_intent_url),
            follow_up_url: lookup("VISION_FOLLOW_UP_URL").unwrap_or(defaults.follow_up_url),
            abandon_url: lookup("VISION_ABANDON_URL").unwrap_or(defaults.abandon_url),
            close_beacon_url: lookup("VISION_CLOSE_BEACON_URL")
                .unwrap_or(defaults.close_beacon_url),
            min_submit_delay: lookup("VISION_MIN_SUBMIT_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_submit_delay),
            request_timeout: lookup("VISION_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            extra_headers,
        }
    }
}

/// What the booking overlay does when the appointment request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentFailurePolicy {
    /// Log the failure and show the success screen anyway.
    #[default]
    ProceedToSuccess,
    /// Stay on the calendar and surface the error.
    StayOnCalendar,
}

impl std::str::FromStr for AppointmentFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proceed" | "proceed_to_success" => Ok(Self::ProceedToSuccess),
            "stay" | "stay_on_calendar" => Ok(Self::StayOnCalendar),
            other => Err(ConfigError::InvalidValue {
                key: "VISION_APPOINTMENT_FAILURE".into(),
                message: format!("unknown policy {other:?} (expected proceed or stay)"),
            }),
        }
    }
}

/// Raw booking configuration, as loaded.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub webhook_url: String,
    pub has_external_system: bool,
    pub external_booking_url: Option<String>,
    pub phone_validation_pattern: String,
    /// How long the "Connecting..." screen shows before redirecting.
    pub redirect_delay: Duration,
    pub appointment_failure_policy: AppointmentFailurePolicy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_ASSESSMENT_URL.to_string(),
            has_external_system: false,
            external_booking_url: None,
            phone_validation_pattern: DEFAULT_PHONE_PATTERN.to_string(),
            redirect_delay: Duration::from_millis(1500),
            appointment_failure_policy: AppointmentFailurePolicy::default(),
        }
    }
}

impl BookingConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let appointment_failure_policy = match lookup("VISION_APPOINTMENT_FAILURE") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using default", e);
                defaults.appointment_failure_policy
            }),
            None => defaults.appointment_failure_policy,
        };

        Self {
            webhook_url: lookup("VISION_BOOKING_WEBHOOK_URL").unwrap_or(defaults.webhook_url),
            has_external_system: lookup("VISION_HAS_EXTERNAL_SYSTEM")
                .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.has_external_system),
            external_booking_url: lookup("VISION_EXTERNAL_BOOKING_URL")
                .filter(|s| !s.trim().is_empty()),
            phone_validation_pattern: lookup("VISION_PHONE_PATTERN")
                .unwrap_or(defaults.phone_validation_pattern),
            redirect_delay: lookup("VISION_REDIRECT_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.redirect_delay),
            appointment_failure_policy,
        }
    }

    /// Check the raw values once and produce the settings the booking flow runs on.
    pub fn validate(&self) -> Result<BookingSettings, ConfigError> {
        if self.webhook_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "VISION_BOOKING_WEBHOOK_URL".into(),
                hint: "The booking overlay needs somewhere to send phone and appointment events."
                    .into(),
            });
        }

        let external_booking_url = match (self.has_external_system, &self.external_booking_url) {
            (true, Some(url)) => Some(url.clone()),
            (true, None) => {
                return Err(ConfigError::MissingRequired {
                    key: "VISION_EXTERNAL_BOOKING_URL".into(),
                    hint: "Set it, or set VISION_HAS_EXTERNAL_SYSTEM=false to use the built-in calendar."
                        .into(),
                });
            }
            (false, _) => None,
        };

        let phone = PhoneValidator::new(&self.phone_validation_pattern)?;

        Ok(BookingSettings {
            webhook_url: self.webhook_url.clone(),
            external_booking_url,
            phone,
            redirect_delay: self.redirect_delay,
            appointment_failure_policy: self.appointment_failure_policy,
        })
    }
}

/// Validated booking configuration.
#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub webhook_url: String,
    /// Present exactly when an external booking system is configured.
    pub external_booking_url: Option<String>,
    pub phone: PhoneValidator,
    pub redirect_delay: Duration,
    pub appointment_failure_policy: AppointmentFailurePolicy,
}

/// Parse `name:value,name:value` into header pairs, skipping malformed entries.
fn parse_headers(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, value) = pair.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
