use kokoro_model::risk::{RiskLevel, RiskResult};
use std::fmt::{Display, Formatter};

pub const NO_FACTORS: &str = "No significant contributing factors identified.";
pub const NO_RECOMMENDATIONS: &str = "No recommendations at this time.";
pub const DEFAULT_MODEL_LABEL: &str = "Advanced AI Model";
pub const FALLBACK_COLOR: &str = "#6b7280";

const GAUGE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Alert,
    Check,
    Neutral,
}

impl Icon {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Alert => "⚠",
            Self::Check => "✔",
            Self::Neutral => "•",
        }
    }
}

/// Color and icon for a risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskVisual {
    pub color: &'static str,
    pub icon: Icon,
}

impl From<&RiskLevel> for RiskVisual {
    fn from(level: &RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Self {
                color: "#10b981",
                icon: Icon::Check,
            },
            RiskLevel::Medium => Self {
                color: "#f59e0b",
                icon: Icon::Check,
            },
            RiskLevel::High => Self {
                color: "#ef4444",
                icon: Icon::Alert,
            },
            RiskLevel::Critical => Self {
                color: "#7c3aed",
                icon: Icon::Alert,
            },
            RiskLevel::Other(_) => Self {
                color: FALLBACK_COLOR,
                icon: Icon::Neutral,
            },
        }
    }
}

/// Risk score against the remainder of 100, as drawn in the score chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreShare {
    pub risk: f64,
    pub safety: f64,
}

impl ScoreShare {
    /// Scores outside 0..=100, and non-finite ones, are clamped so the chart stays drawable.
    #[must_use]
    pub fn new(risk_score: f64) -> Self {
        let risk = if risk_score.is_finite() {
            risk_score.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            risk,
            safety: 100.0 - risk,
        }
    }

    #[must_use]
    pub fn gauge(&self, width: usize) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let filled = ((self.risk / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
    }
}

/// Everything the results screen shows, derived from a [`RiskResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct RiskReport<'a> {
    pub result: &'a RiskResult,
    pub visual: RiskVisual,
    pub share: ScoreShare,
}

impl<'a> RiskReport<'a> {
    #[must_use]
    pub fn new(result: &'a RiskResult) -> Self {
        Self {
            result,
            visual: RiskVisual::from(&result.risk_level),
            share: ScoreShare::new(result.risk_score),
        }
    }

    #[must_use]
    pub fn headline(&self) -> String {
        format!("Risk Level: {}", self.result.risk_level.as_str().to_uppercase())
    }

    #[must_use]
    pub fn confidence(&self) -> String {
        format!("{:.1}%", self.result.confidence_score * 100.0)
    }

    #[must_use]
    /// The score as the service reported it. Only the gauge is clamped.
    pub fn score(&self) -> String {
        format!("{:.1} / 100", self.result.risk_score)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.result
            .ml_model_used
            .as_deref()
            .filter(|model| !model.is_empty())
            .unwrap_or(DEFAULT_MODEL_LABEL)
    }

    /// Contributing factors, or the single fallback line when there are none.
    #[must_use]
    pub fn factors(&self) -> Vec<&str> {
        list_or(&self.result.contributing_factors, NO_FACTORS)
    }

    #[must_use]
    pub fn recommendations(&self) -> Vec<&str> {
        list_or(&self.result.recommendations, NO_RECOMMENDATIONS)
    }
}

fn list_or<'a>(items: &'a [String], fallback: &'static str) -> Vec<&'a str> {
    if items.is_empty() {
        vec![fallback]
    } else {
        items.iter().map(String::as_str).collect()
    }
}

impl Display for RiskReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.visual.icon.glyph(), self.headline())?;
        writeln!(f, "Confidence Score: {}", self.confidence())?;
        writeln!(f)?;
        writeln!(f, "Risk Score Analysis")?;
        writeln!(f, "{} {}", self.share.gauge(GAUGE_WIDTH), self.score())?;
        writeln!(f)?;
        writeln!(f, "Contributing Factors")?;
        for factor in self.factors() {
            writeln!(f, "  - {factor}")?;
        }
        writeln!(f)?;
        writeln!(f, "Personalized Recommendations")?;
        for recommendation in self.recommendations() {
            writeln!(f, "  - {recommendation}")?;
        }
        writeln!(f)?;
        write!(f, "Assessment generated using: {}", self.model())
    }
}
