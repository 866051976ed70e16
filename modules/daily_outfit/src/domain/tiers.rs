use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::contract::model::WeatherSnapshot;
use crate::domain::repo::{RecommendationQuery, TemperatureRange, TimeWindow};

/// One step of the recommendation cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Weather unknown: latest recommendations regardless of conditions.
    Latest,
    /// Generated today, same condition, within the exact tolerance.
    ExactToday,
    /// Generated yesterday, same condition, within the relaxed tolerance.
    RelaxedYesterday,
    /// Any day, same condition, within the exact tolerance.
    ExactAnyDay,
    /// Any day, same condition, any temperature.
    ConditionOnly,
    /// Fresh outfits from the generator.
    Generation,
    /// Latest recommendations regardless of weather.
    Fallback,
}

/// Numeric knobs for the read-only tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierLimits {
    pub exact_tolerance_celsius: f64,
    pub relaxed_tolerance_celsius: f64,
    pub max_recommendations: u64,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            exact_tolerance_celsius: 5.0,
            relaxed_tolerance_celsius: 10.0,
            max_recommendations: 2,
        }
    }
}

impl Tier {
    /// Evaluation order once the current weather is known.
    pub const WEATHER_CASCADE: [Tier; 6] = [
        Tier::ExactToday,
        Tier::RelaxedYesterday,
        Tier::ExactAnyDay,
        Tier::ConditionOnly,
        Tier::Generation,
        Tier::Fallback,
    ];

    /// Evaluation order without weather.
    pub const WEATHERLESS_CASCADE: [Tier; 1] = [Tier::Latest];

    pub fn cascade(weather_known: bool) -> &'static [Tier] {
        if weather_known {
            &Self::WEATHER_CASCADE
        } else {
            &Self::WEATHERLESS_CASCADE
        }
    }

    /// Display name given to recommendations surfaced by this tier.
    pub fn label(self) -> &'static str {
        match self {
            Tier::ExactToday => "Today's Perfect Look",
            Tier::RelaxedYesterday => "Yesterday's Look",
            Tier::ExactAnyDay => "Perfect Weather Match",
            Tier::ConditionOnly => "Weather Appropriate",
            Tier::Generation => "Fresh Pick For Today",
            Tier::Latest | Tier::Fallback => "Curated Outfit",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Latest => "latest",
            Tier::ExactToday => "exact_today",
            Tier::RelaxedYesterday => "relaxed_yesterday",
            Tier::ExactAnyDay => "exact_any_day",
            Tier::ConditionOnly => "condition_only",
            Tier::Generation => "generation",
            Tier::Fallback => "fallback",
        }
    }

    pub fn has_weather_match(self) -> bool {
        matches!(
            self,
            Tier::ExactToday | Tier::RelaxedYesterday | Tier::ExactAnyDay | Tier::Generation
        )
    }

    pub fn is_generated(self) -> bool {
        self == Tier::Generation
    }

    pub fn limit(self, limits: &TierLimits) -> u64 {
        match self {
            Tier::ExactToday | Tier::RelaxedYesterday => 1,
            _ => limits.max_recommendations,
        }
    }

    /// Storage lookup for a read-only tier. `None` for `Generation`, and for
    /// weather-dependent tiers when no weather is given.
    pub fn query(
        self,
        weather: Option<&WeatherSnapshot>,
        now: DateTime<Utc>,
        limits: &TierLimits,
    ) -> Option<RecommendationQuery> {
        let base = RecommendationQuery::latest(self.limit(limits));
        match self {
            Tier::Latest | Tier::Fallback => Some(base),
            Tier::Generation => None,
            Tier::ExactToday => weather.map(|w| {
                base.with_condition(w.condition)
                    .with_temperature(TemperatureRange::around(
                        w.temperature_celsius,
                        limits.exact_tolerance_celsius,
                    ))
                    .within(today(now))
            }),
            Tier::RelaxedYesterday => weather.map(|w| {
                base.with_condition(w.condition)
                    .with_temperature(TemperatureRange::around(
                        w.temperature_celsius,
                        limits.relaxed_tolerance_celsius,
                    ))
                    .within(yesterday(now))
            }),
            Tier::ExactAnyDay => weather.map(|w| {
                base.with_condition(w.condition)
                    .with_temperature(TemperatureRange::around(
                        w.temperature_celsius,
                        limits.exact_tolerance_celsius,
                    ))
            }),
            Tier::ConditionOnly => weather.map(|w| base.with_condition(w.condition)),
        }
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// `[today 00:00, tomorrow 00:00)` in UTC.
pub fn today(now: DateTime<Utc>) -> TimeWindow {
    let from = start_of_day(now);
    TimeWindow {
        from,
        until: from + Duration::days(1),
    }
}

/// `[yesterday 00:00, today 00:00)` in UTC.
pub fn yesterday(now: DateTime<Utc>) -> TimeWindow {
    let until = start_of_day(now);
    TimeWindow {
        from: until - Duration::days(1),
        until,
    }
}
