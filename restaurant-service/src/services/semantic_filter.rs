//! AI-assisted cuisine filtering.
//!
//! Asks a language model which candidates' *primary* identity fits the
//! caller's keyword. The step is an enhancement: any failure is reported as
//! [`FilterOutcome::Failed`] and the caller keeps the unfiltered list.

use super::filter_output::{parse_id_array, ParseFailure};
use super::providers::{GenerationParams, ProviderError, TextProvider};
use crate::models::Place;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Keywords clients send to mean "no preference". Compared case-insensitively.
const PLACEHOLDER_KEYWORDS: &[&str] = &[
    "all", "any", "none", "null", "undefined", "全部", "不限", "隨便", "任意",
];

const RULES: &str = "\
Judge each restaurant by its PRIMARY business, not by items it happens to sell.
- Dessert (甜點): keep dessert shops, bakeries, cafes known for cakes, ice cream, \
shaved ice and similar. Exclude places whose main business is full meals, even if \
they also sell dessert.
- Western (西式): keep American, Italian, French, Spanish, Mexican, steakhouses, \
burgers, brunch and similar. Exclude Thai, Vietnamese, Japanese, Chinese, Taiwanese \
and Korean cuisine.
- Healthy / light (健康, 輕食): keep salads, poke, light meals, vegetarian and \
similar. Exclude boxed-meal (便當) shops and fried-food establishments.
- Any other keyword: keep only places whose main cuisine or category matches it.
When unsure from the name and address alone, exclude the place.";

/// Minimal view of a place sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCandidate<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
}

/// Why the filter step did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoKeyword,
    NoCandidates,
    NotConfigured,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NoKeyword => "no_keyword",
            SkipReason::NoCandidates => "no_candidates",
            SkipReason::NotConfigured => "not_configured",
        })
    }
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("provider returned no text")]
    EmptyAnswer,

    #[error("could not parse provider answer: {0}")]
    Parse(#[from] ParseFailure),

    #[error("could not encode candidates: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub enum FilterOutcome {
    Skipped(SkipReason),
    /// Identifiers to keep, already restricted to the candidate set.
    Applied(HashSet<String>),
    Failed(FilterError),
}

impl FilterOutcome {
    /// Surviving identifiers, or `None` when no filtering took place.
    pub fn kept(&self) -> Option<&HashSet<String>> {
        match self {
            FilterOutcome::Applied(ids) => Some(ids),
            FilterOutcome::Skipped(_) | FilterOutcome::Failed(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterOutcome::Skipped(_) => "skipped",
            FilterOutcome::Applied(_) => "applied",
            FilterOutcome::Failed(_) => "failed",
        }
    }
}

/// Trimmed keyword, or `None` when it is absent, blank or a placeholder.
pub fn effective_keyword(raw: Option<&str>) -> Option<&str> {
    let keyword = raw?.trim();
    if keyword.is_empty() {
        return None;
    }
    let lowered = keyword.to_lowercase();
    if PLACEHOLDER_KEYWORDS.contains(&lowered.as_str()) {
        return None;
    }
    Some(keyword)
}

/// Keyword and candidate checks of the invocation condition. The credential
/// check lives with provider construction.
pub fn plan<'a>(keyword: Option<&'a str>, places: &[Place]) -> Result<&'a str, SkipReason> {
    let keyword = effective_keyword(keyword).ok_or(SkipReason::NoKeyword)?;
    if !has_candidates(places) {
        return Err(SkipReason::NoCandidates);
    }
    Ok(keyword)
}

fn has_candidates(places: &[Place]) -> bool {
    places.iter().any(|place| place.place_id().is_some())
}

/// Places the model can choose between. Records without a `place_id` cannot
/// be named in an answer and are left out.
pub fn candidates(places: &[Place]) -> Vec<FilterCandidate<'_>> {
    places
        .iter()
        .filter_map(|place| {
            Some(FilterCandidate {
                id: place.place_id()?,
                name: place.name().unwrap_or_default(),
                address: place.address(),
            })
        })
        .collect()
}

pub fn build_prompt(keyword: &str, candidates: &[FilterCandidate<'_>]) -> serde_json::Result<String> {
    let listing = serde_json::to_string(candidates)?;
    Ok(format!(
        "You filter a list of restaurants for a food-finder app.\n\
         The user is looking for: \"{keyword}\".\n\n\
         {RULES}\n\n\
         Restaurants (JSON):\n{listing}\n\n\
         Answer with ONLY a JSON array of the \"id\" values to keep, for example \
         [\"id1\", \"id2\"]. Use [] when none match. No explanation, no markdown, \
         no code fences."
    ))
}

pub struct SemanticFilter<'a> {
    provider: &'a dyn TextProvider,
}

impl<'a> SemanticFilter<'a> {
    pub fn new(provider: &'a dyn TextProvider) -> Self {
        Self { provider }
    }

    /// Ask the provider which of `places` match `keyword`.
    ///
    /// Never returns an error: failures come back as `FilterOutcome::Failed`.
    pub async fn apply(&self, keyword: &str, places: &[Place]) -> FilterOutcome {
        if !has_candidates(places) {
            return FilterOutcome::Skipped(SkipReason::NoCandidates);
        }

        match self.select(keyword, places).await {
            Ok(kept) => FilterOutcome::Applied(kept),
            Err(error) => {
                tracing::warn!(
                    keyword,
                    candidates = places.len(),
                    error = %error,
                    "Semantic filter failed; returning unfiltered results"
                );
                FilterOutcome::Failed(error)
            }
        }
    }

    async fn select(&self, keyword: &str, places: &[Place]) -> Result<HashSet<String>, FilterError> {
        let candidates = candidates(places);
        let prompt = build_prompt(keyword, &candidates)?;
        let params = GenerationParams {
            temperature: Some(0.0),
            max_tokens: None,
            response_mime_type: Some("application/json".to_string()),
        };

        let response = self.provider.generate(&prompt, &params).await?;
        tracing::debug!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Semantic filter answered"
        );

        let text = response.text.ok_or(FilterError::EmptyAnswer)?;
        let ids = parse_id_array(&text)?;

        let known: HashSet<&str> = candidates.iter().map(|c| c.id).collect();
        let returned = ids.len();
        let kept: HashSet<String> = ids
            .into_iter()
            .filter(|id| known.contains(id.as_str()))
            .collect();

        if kept.len() < returned {
            tracing::debug!(
                returned,
                kept = kept.len(),
                "Dropped unknown or duplicate identifiers from filter answer"
            );
        }

        Ok(kept)
    }
}
