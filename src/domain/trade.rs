//! Trade Record model and construction from validated form input.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::JournalError;
use super::synthetic::{mock_risk_reward, DurationSource};

/// Contract multiplier of the journaled instrument (MNQ, $2 per point).
pub const DEFAULT_POINT_VALUE: f64 = 2.0;

/// Distance in points of the synthetic stop used for the R:R placeholder.
pub const DEFAULT_STOP_DISTANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl FromStr for Direction {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            other => Err(JournalError::validation(
                "direction",
                format!("expected 'long' or 'short', got '{other}'"),
            )),
        }
    }
}

/// Self-rated mental state, ordered from worst (1) to best (5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MentalState {
    Angry = 1,
    Frustrated = 2,
    Neutral = 3,
    Content = 4,
    Happy = 5,
}

impl MentalState {
    pub const ALL: [MentalState; 5] = [
        MentalState::Angry,
        MentalState::Frustrated,
        MentalState::Neutral,
        MentalState::Content,
        MentalState::Happy,
    ];

    pub fn from_ordinal(ordinal: i64) -> Result<Self, JournalError> {
        match ordinal {
            1..=5 => Ok(Self::ALL[(ordinal - 1) as usize]),
            _ => Err(JournalError::validation(
                "mental state",
                format!("ordinal must be between 1 and 5, got {ordinal}"),
            )),
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn glyph(self) -> &'static str {
        match self {
            MentalState::Angry => "😠",
            MentalState::Frustrated => "🙁",
            MentalState::Neutral => "😐",
            MentalState::Content => "🙂",
            MentalState::Happy => "😊",
        }
    }

    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.glyph() == glyph)
    }
}

impl fmt::Display for MentalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl Serialize for MentalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.glyph())
    }
}

impl<'de> Deserialize<'de> for MentalState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Ordinal(i64),
            Glyph(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Ordinal(n) => MentalState::from_ordinal(n).map_err(serde::de::Error::custom),
            Raw::Glyph(g) => MentalState::from_glyph(&g)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown mental glyph '{g}'"))),
        }
    }
}

/// The fixed set of setup categories offered by the journal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupTag {
    VwapBounce,
    LiquidityGrab,
    GapFill,
    BreakoutRetest,
}

impl SetupTag {
    pub const ALL: [SetupTag; 4] = [
        SetupTag::VwapBounce,
        SetupTag::LiquidityGrab,
        SetupTag::GapFill,
        SetupTag::BreakoutRetest,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SetupTag::VwapBounce => "VWAP Bounce",
            SetupTag::LiquidityGrab => "Liquidity Grab",
            SetupTag::GapFill => "Gap Fill",
            SetupTag::BreakoutRetest => "Breakout Retest",
        }
    }

    /// Case-insensitive lookup by display label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }
}

/// Setup category of a trade: one of the fixed setups or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Setup(SetupTag),
    Custom(String),
}

impl Tag {
    /// Resolve the form's tag selector. `"Custom"` takes `custom_text`, any
    /// other selection must name a fixed setup.
    pub fn from_selection(selection: &str, custom_text: Option<&str>) -> Result<Tag, JournalError> {
        if selection.trim().eq_ignore_ascii_case("custom") {
            return Tag::custom(custom_text.unwrap_or_default());
        }
        SetupTag::from_label(selection)
            .map(Tag::Setup)
            .ok_or_else(|| {
                JournalError::validation("tag", format!("unknown setup '{}'", selection.trim()))
            })
    }

    /// Free-text tag. Text naming a fixed setup collapses to that setup so the
    /// stored label always reads back as the same variant.
    pub fn custom(text: &str) -> Result<Tag, JournalError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(JournalError::validation("tag", "custom tag must not be empty"));
        }
        Ok(Tag::from_label(text))
    }

    fn from_label(label: &str) -> Tag {
        match SetupTag::from_label(label) {
            Some(setup) => Tag::Setup(setup),
            None => Tag::Custom(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Tag::Setup(setup) => setup.label(),
            Tag::Custom(text) => text,
        }
    }
}

impl From<SetupTag> for Tag {
    fn from(setup: SetupTag) -> Self {
        Tag::Setup(setup)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Tag::from_label(&label))
    }
}

/// Placeholder risk/reward ratio, kept at one fractional digit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct RiskReward(f64);

impl RiskReward {
    /// Rounds the stored double's exact decimal value, so `0.15` (really
    /// `0.1499...`) becomes `0.1`. Exact ties such as `0.25` round up.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return RiskReward(0.0);
        }
        let value = value.abs();
        if value.fract() == 0.0 {
            return RiskReward(value);
        }
        // Only multiples of 0.25 can sit exactly on a .x5 tie.
        if (value * 4.0).fract() == 0.0 {
            return RiskReward((value * 10.0).round() / 10.0);
        }
        RiskReward(format!("{value:.1}").parse().unwrap_or(0.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for RiskReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Serialize for RiskReward {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RiskReward {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| serde::de::Error::custom(format!("invalid rr '{s}': {e}")))?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "rr must be a non-negative number, got {value}"
            )));
        }
        Ok(RiskReward::new(value))
    }
}

/// Accepts the canonical integer minutes or the legacy `"<n> min"` text.
fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Minutes(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Minutes(m) => Ok(m),
        Raw::Text(s) => {
            let digits = s.trim().trim_end_matches("min").trim();
            digits
                .parse::<u32>()
                .map_err(|e| serde::de::Error::custom(format!("invalid duration '{s}': {e}")))
        }
    }
}

/// Pricing parameters of the traded instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentSpec {
    pub point_value: f64,
    pub stop_distance: f64,
}

impl Default for InstrumentSpec {
    fn default() -> Self {
        InstrumentSpec {
            point_value: DEFAULT_POINT_VALUE,
            stop_distance: DEFAULT_STOP_DISTANCE,
        }
    }
}

/// Raw values captured by the entry form. Prices arrive as text.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeInput {
    pub direction: Direction,
    pub entry: String,
    pub exit: String,
    pub tag: Tag,
    pub mental: i64,
    pub lesson: String,
    pub screenshot: Option<String>,
}

/// One logged trade with its derived metrics. Field order is the export
/// column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub direction: Direction,
    pub entry: f64,
    pub exit: f64,
    pub pl: f64,
    pub rr: RiskReward,
    #[serde(rename = "duration", deserialize_with = "deserialize_duration")]
    pub duration_minutes: u32,
    #[serde(rename = "mental")]
    pub mental_state: MentalState,
    pub tag: Tag,
    #[serde(default)]
    pub lesson: String,
    #[serde(default)]
    pub screenshot: Option<String>,
}

impl TradeRecord {
    pub fn from_input(
        input: &TradeInput,
        id: i64,
        date: NaiveDate,
        instrument: &InstrumentSpec,
        durations: &mut dyn DurationSource,
    ) -> Result<Self, JournalError> {
        let entry = parse_price("entry", &input.entry)?;
        let exit = parse_price("exit", &input.exit)?;
        let mental_state = MentalState::from_ordinal(input.mental)?;

        let pl = round_currency((exit - entry) * instrument.point_value);
        if !pl.is_finite() {
            return Err(JournalError::validation("pl", "price difference overflows"));
        }
        let rr = RiskReward::new(mock_risk_reward(
            input.direction,
            entry,
            exit,
            instrument.stop_distance,
        ));

        Ok(TradeRecord {
            id,
            date,
            direction: input.direction,
            entry,
            exit,
            pl,
            rr,
            duration_minutes: durations.duration_minutes(),
            mental_state,
            tag: input.tag.clone(),
            lesson: input.lesson.clone(),
            screenshot: input.screenshot.clone(),
        })
    }

    /// Break-even trades count as wins.
    pub fn is_win(&self) -> bool {
        self.pl >= 0.0
    }

    /// `MM/DD` label used by history rows and chart axes.
    pub fn short_date(&self) -> String {
        self.date.format("%m/%d").to_string()
    }
}

pub fn parse_price(field: &str, raw: &str) -> Result<f64, JournalError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| JournalError::validation(field, format!("'{}' is not a number", raw.trim())))?;
    if !value.is_finite() {
        return Err(JournalError::validation(field, "price must be finite"));
    }
    Ok(value)
}

/// Round to cents.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, JournalError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        JournalError::validation("date", format!("'{}' is not a YYYY-MM-DD date", raw.trim()))
    })
}
