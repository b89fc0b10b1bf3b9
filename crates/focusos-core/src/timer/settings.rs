use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Focus)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus Time",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short-break",
            TimerMode::LongBreak => "long-break",
        }
    }
}

impl std::str::FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(TimerMode::Focus),
            "short-break" | "short" => Ok(TimerMode::ShortBreak),
            "long-break" | "long" => Ok(TimerMode::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown timer mode '{other}'"),
            }),
        }
    }
}

/// Interval lengths and auto-transition switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Every Nth completed focus interval is followed by a long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_focus: bool,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
            auto_start_breaks: true,
            auto_start_focus: false,
        }
    }
}

impl TimerSettings {
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Duration of `mode` in milliseconds.
    pub fn duration_ms(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes(mode)).saturating_mul(60_000)
    }

    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes(mode)).saturating_mul(60)
    }

    /// Whether the interval following an expiry starts on its own.
    pub fn auto_starts(&self, next: TimerMode) -> bool {
        if next.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_focus
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("focus_minutes", self.focus_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ];
        for (field, value) in fields {
            if !(1..=600).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value: i64::from(value),
                    min: 1,
                    max: 600,
                });
            }
        }
        if self.long_break_interval == 0 {
            return Err(ValidationError::OutOfRange {
                field: "long_break_interval",
                value: 0,
                min: 1,
                max: i64::from(u32::MAX),
            });
        }
        Ok(())
    }
}

/// Format milliseconds as `MM:SS`, rounding partial seconds up.
pub fn format_clock(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = TimerSettings::default();
        assert_eq!(s.duration_ms(TimerMode::Focus), 25 * 60 * 1000);
        assert_eq!(s.duration_secs(TimerMode::ShortBreak), 300);
        assert_eq!(s.minutes(TimerMode::LongBreak), 15);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn auto_start_follows_next_mode() {
        let s = TimerSettings::default();
        assert!(s.auto_starts(TimerMode::ShortBreak));
        assert!(s.auto_starts(TimerMode::LongBreak));
        assert!(!s.auto_starts(TimerMode::Focus));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let s = TimerSettings {
            short_break_minutes: 0,
            ..TimerSettings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ValidationError::OutOfRange { field: "short_break_minutes", .. })
        ));
    }

    #[test]
    fn mode_parses_kebab_case() {
        assert_eq!("long-break".parse::<TimerMode>().unwrap(), TimerMode::LongBreak);
        assert_eq!("short".parse::<TimerMode>().unwrap(), TimerMode::ShortBreak);
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(25 * 60 * 1000), "25:00");
        assert_eq!(format_clock(61_000), "01:01");
        assert_eq!(format_clock(500), "00:01");
        assert_eq!(format_clock(0), "00:00");
    }
}
