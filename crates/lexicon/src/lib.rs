//! Client for the external pronunciation-dictionary API.
//!
//! The text-to-speech provider exposes pronunciation overrides as a
//! versioned dictionary resource. All projects for a user share one fixed
//! "master" dictionary; this client adds, removes, and fetches rules on it.
//! Every mutation bumps the dictionary version, which callers can log to
//! correlate with narration runs.

use narrata_core::pronunciation::Correction;
use serde::{Deserialize, Serialize};

/// One pronunciation rule as the dictionary API represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// The word the rule applies to.
    pub name: String,
    /// Respelling the engine should narrate.
    pub respelling: String,
    /// IPA transcription.
    pub ipa: String,
}

impl From<&Correction> for Rule {
    fn from(c: &Correction) -> Self {
        Self {
            name: c.original_name.clone(),
            respelling: c.corrected_spelling.clone(),
            ipa: c.ipa.clone(),
        }
    }
}

/// Rules plus the dictionary version they were read at.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    pub version: i64,
    pub rules: Vec<Rule>,
}

/// Version returned after a mutation.
#[derive(Debug, Clone, Deserialize)]
struct VersionResponse {
    version: i64,
}

/// Errors from the dictionary API layer.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The dictionary API returned a non-2xx status code.
    #[error("Dictionary API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// HTTP client bound to one dictionary resource.
pub struct LexiconClient {
    client: reqwest::Client,
    base_url: String,
    dictionary_id: String,
}

impl LexiconClient {
    /// Create a client for the master dictionary.
    ///
    /// * `base_url`      - Dictionary API base URL.
    /// * `dictionary_id` - Fixed master dictionary identifier.
    pub fn new(base_url: String, dictionary_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            dictionary_id,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, dictionary_id: String) -> Self {
        Self {
            client,
            base_url,
            dictionary_id,
        }
    }

    fn rules_url(&self) -> String {
        format!("{}/dictionaries/{}/rules", self.base_url, self.dictionary_id)
    }

    /// Fetch the current rule set and its version.
    pub async fn get_rules(&self) -> Result<RuleSet, LexiconError> {
        let response = self.client.get(self.rules_url()).send().await?;
        Self::parse(response).await
    }

    /// Add (or overwrite) rules, returning the new dictionary version.
    pub async fn add_rules(&self, rules: &[Rule]) -> Result<i64, LexiconError> {
        let response = self
            .client
            .post(self.rules_url())
            .json(&serde_json::json!({ "rules": rules }))
            .send()
            .await?;
        let version: VersionResponse = Self::parse(response).await?;

        tracing::debug!(
            dictionary_id = %self.dictionary_id,
            count = rules.len(),
            version = version.version,
            "Added dictionary rules",
        );
        Ok(version.version)
    }

    /// Remove rules by name, returning the new dictionary version.
    pub async fn remove_rules(&self, names: &[String]) -> Result<i64, LexiconError> {
        let response = self
            .client
            .post(format!("{}/remove", self.rules_url()))
            .json(&serde_json::json!({ "names": names }))
            .send()
            .await?;
        let version: VersionResponse = Self::parse(response).await?;

        tracing::debug!(
            dictionary_id = %self.dictionary_id,
            count = names.len(),
            version = version.version,
            "Removed dictionary rules",
        );
        Ok(version.version)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, LexiconError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LexiconError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_from_correction() {
        let c = Correction {
            original_name: "Hermione".into(),
            corrected_spelling: "Her-my-oh-nee".into(),
            ipa: "hɜːrˈmaɪəni".into(),
        };
        let rule = Rule::from(&c);
        assert_eq!(rule.name, "Hermione");
        assert_eq!(rule.respelling, "Her-my-oh-nee");
        assert_eq!(rule.ipa, "hɜːrˈmaɪəni");
    }

    #[test]
    fn rule_serializes_camel_case() {
        let rule = Rule {
            name: "Sean".into(),
            respelling: "Shawn".into(),
            ipa: "ʃɔːn".into(),
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert!(json.get("respelling").is_some());
        assert!(json.get("corrected_spelling").is_none());
    }
}
