//! LCR scoring - Logic/Credibility/Rhetoric weighted composites
//!
//! The judging rubric weights logic 40%, credibility 35%, and rhetoric
//! 25%. Every axis is scored in [0,100]; a value outside that range is
//! an upstream judging bug and is rejected outright. Clamping would
//! silently corrupt judging data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// (logic, credibility, rhetoric) weights
pub const LCR_WEIGHTS: (f64, f64, f64) = (0.40, 0.35, 0.25);

/// Compute the weighted composite of three sub-scores, rounded to two
/// decimal places.
pub fn composite(logic: f64, credibility: f64, rhetoric: f64) -> Result<f64> {
    check_axis("logic", logic)?;
    check_axis("credibility", credibility)?;
    check_axis("rhetoric", rhetoric)?;

    let (wl, wc, wr) = LCR_WEIGHTS;
    let raw = logic * wl + credibility * wc + rhetoric * wr;
    Ok(round2(raw))
}

fn check_axis(axis: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(Error::InvalidScoreRange { axis, value });
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One LCR score triple, attached to a turn or to a participant's
/// final aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub logic: f64,
    pub credibility: f64,
    pub rhetoric: f64,
}

impl ScoreCard {
    /// Construct a validated score card
    pub fn new(logic: f64, credibility: f64, rhetoric: f64) -> Result<Self> {
        check_axis("logic", logic)?;
        check_axis("credibility", credibility)?;
        check_axis("rhetoric", rhetoric)?;
        Ok(Self {
            logic,
            credibility,
            rhetoric,
        })
    }

    pub fn composite(&self) -> Result<f64> {
        composite(self.logic, self.credibility, self.rhetoric)
    }

    /// Per-axis arithmetic mean over a participant's turn scores.
    /// Returns None for an empty slice.
    pub fn aggregate(cards: &[ScoreCard]) -> Option<ScoreCard> {
        if cards.is_empty() {
            return None;
        }
        let n = cards.len() as f64;
        Some(ScoreCard {
            logic: cards.iter().map(|c| c.logic).sum::<f64>() / n,
            credibility: cards.iter().map(|c| c.credibility).sum::<f64>() / n,
            rhetoric: cards.iter().map(|c| c.rhetoric).sum::<f64>() / n,
        })
    }
}

/// Pick the participant with the highest aggregate composite.
///
/// Returns None when the map is empty. Errors if any card holds an
/// out-of-range axis (the range bug must not be papered over by
/// skipping the offending participant).
pub fn decide_winner(scores: &HashMap<Uuid, ScoreCard>) -> Result<Option<Uuid>> {
    let mut best: Option<(Uuid, f64)> = None;
    for (id, card) in scores {
        let total = card.composite()?;
        match best {
            Some((_, prev)) if prev >= total => {}
            _ => best = Some((*id, total)),
        }
    }
    Ok(best.map(|(id, _)| id))
}
