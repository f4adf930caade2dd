//! Test doubles for the text service.
//!
//! [`MockTextService`] replays a scripted queue of outcomes and records every
//! call. [`FixtureTextService`] answers any prompt with a well-formed canned
//! response for the matching section, so orchestrator tests can run the full
//! happy path without a real model.

use crate::adapter::{AdapterError, InvokeOptions, TextService};
use crate::core::ProficiencyTier;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Installs a compact tracing subscriber honoring `RUST_LOG`. Safe to call
/// from multiple tests; only the first call wins.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .compact()
        .try_init();
}

/// A text service that replays scripted outcomes in order.
///
/// When the script is exhausted the mock fails with a network error, so a
/// test that makes more calls than it scripted fails loudly.
#[derive(Debug, Default)]
pub struct MockTextService {
    script: Mutex<VecDeque<Result<String, AdapterError>>>,
    prompts: Mutex<Vec<String>>,
    budgets: Mutex<Vec<Option<u32>>>,
}

impl MockTextService {
    /// Creates an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn push_ok(&self, text: impl Into<String>) {
        self.script.lock().push_back(Ok(text.into()));
    }

    /// Queues a failure.
    pub fn push_err(&self, err: AdapterError) {
        self.script.lock().push_back(Err(err));
    }

    /// Returns the number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Returns the prompts received, in call order.
    #[must_use]
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the output budgets received, in call order.
    #[must_use]
    pub fn recorded_budgets(&self) -> Vec<Option<u32>> {
        self.budgets.lock().clone()
    }
}

#[async_trait]
impl TextService for MockTextService {
    async fn invoke(&self, prompt: &str, options: InvokeOptions) -> Result<String, AdapterError> {
        self.prompts.lock().push(prompt.to_string());
        self.budgets.lock().push(options.max_output_units);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AdapterError::NetworkError("mock script exhausted".to_string())))
    }
}

/// The vocabulary the fixture service ranks and then reinforces in its
/// passage and dialogue responses.
pub const FIXTURE_VOCABULARY: [&str; 10] = [
    "climate", "energy", "research", "community", "transport", "policy", "future", "change",
    "city", "science",
];

/// A text service that answers every prompt with a canned, contract-clean
/// response for the section the prompt belongs to.
#[derive(Debug)]
pub struct FixtureTextService {
    tier: ProficiencyTier,
    prompts: Mutex<Vec<String>>,
}

impl FixtureTextService {
    /// Creates a fixture service calibrated to the given tier.
    #[must_use]
    pub fn new(tier: ProficiencyTier) -> Self {
        Self {
            tier,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Returns the prompts received, in call order.
    #[must_use]
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    fn vocabulary_response(&self) -> String {
        let per_word = self.tier.profile().examples_per_word;
        let mut out = String::new();
        for word in FIXTURE_VOCABULARY.iter().take(8) {
            out.push_str(&format!("{word} | something people talk about every day\n"));
            for i in 1..=per_word {
                out.push_str(&format!("- We talk about {word} at home on day {i}.\n"));
            }
        }
        out
    }

    fn dialogue_response(gapped: bool) -> String {
        let mut out = String::new();
        let speakers = ["Ana", "Ben"];
        for i in 0..14 {
            let speaker = speakers[i % 2];
            let word = FIXTURE_VOCABULARY[i % FIXTURE_VOCABULARY.len()];
            if gapped && i % 3 == 1 {
                out.push_str(&format!(
                    "{speaker}: I think the ____ here is very good. (answer: {word})\n"
                ));
            } else {
                out.push_str(&format!(
                    "{speaker}: People say the {word} here helps us a lot.\n"
                ));
            }
        }
        out
    }

    fn response_for(&self, prompt: &str) -> String {
        if prompt.contains("Summarize the source material") {
            return "People in a town talk about buses and clean air. \
                    They want better ways to move around."
                .to_string();
        }
        if prompt.contains("Rank the most teaching-relevant vocabulary") {
            return FIXTURE_VOCABULARY.join("\n");
        }
        if prompt.contains("List the main themes") {
            return "environment\ntechnology\nsociety".to_string();
        }
        if prompt.contains("exactly 3 opening questions") {
            return "Do you like living in a town?\n\
                    How do you travel to work or school?\n\
                    What makes the air clean where you live?"
                .to_string();
        }
        if prompt.contains("vocabulary entries") {
            return self.vocabulary_response();
        }
        if prompt.contains("reading passage") {
            return "Many people in the city want clean air. The transport there is \
                    old and slow. New energy plans can help the community a lot.\n\n\
                    Research shows that small changes matter. A good policy can make \
                    the future better for everyone."
                .to_string();
        }
        if prompt.contains("comprehension questions") {
            return "Q: What do people in the city want?\nA: They want clean air.\n\
                    Q: What is wrong with the transport?\nA: It is old and slow.\n\
                    Q: What can help the community?\nA: New energy plans can help.\n\
                    Q: Why do small changes matter?\nA: Research shows they matter."
                .to_string();
        }
        if prompt.contains("exactly 5 discussion questions") {
            return "Do you think clean air is important?\n\
                    What is the best way to travel in a city?\n\
                    How can people use less energy at home?\n\
                    Would you change how your town works?\n\
                    What small change could you make this week?"
                .to_string();
        }
        if prompt.contains("gapped dialogue") {
            return Self::dialogue_response(true);
        }
        if prompt.contains("natural dialogue") {
            return Self::dialogue_response(false);
        }
        if prompt.contains("grammar focus") {
            return "Focus: present simple\n\
                    Explanation: We use the present simple to talk about habits and facts.\n\
                    1. She ___ (walk) to work every day. -> walks\n\
                    2. They ___ (use) the bus on Mondays. -> use\n\
                    3. He ___ (not like) loud streets. -> does not like\n\
                    4. We ___ (save) energy at home. -> save\n\
                    5. The city ___ (grow) every year. -> grows\n\
                    6. I ___ (read) about science at night. -> read"
                .to_string();
        }
        if prompt.contains("pronunciation practice") {
            return "climate | /ˈklaɪmət/ | stress the first syllable\n\
                    energy | /ˈenərdʒi/ | three quick syllables\n\
                    research | /rɪˈsɜːrtʃ/ | stress the second syllable\n\
                    community | /kəˈmjuːnəti/ | soft first vowel\n\
                    transport | /ˈtrænspɔːrt/ | clear final t\n\
                    science | /ˈsaɪəns/ | silent c\n\
                    Twister: six slick city streets stay clean.\n\
                    Twister: fresh fuel flows for four fast ferries."
                .to_string();
        }
        if prompt.contains("closing reflection") {
            return "What is one new word you will use this week?\n\
                    Which idea from today surprised you?\n\
                    What would you like to learn next?"
                .to_string();
        }
        "ok".to_string()
    }
}

#[async_trait]
impl TextService for FixtureTextService {
    async fn invoke(&self, prompt: &str, _options: InvokeOptions) -> Result<String, AdapterError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.response_for(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_script_in_order() {
        let mock = MockTextService::new();
        mock.push_ok("first");
        mock.push_err(AdapterError::TruncatedNoContent);

        let r1 = mock.invoke("a", InvokeOptions::with_budget(10)).await;
        let r2 = mock.invoke("b", InvokeOptions::service_default()).await;

        assert_eq!(r1.unwrap(), "first");
        assert_eq!(r2.unwrap_err(), AdapterError::TruncatedNoContent);
        assert_eq!(mock.recorded_prompts(), vec!["a", "b"]);
        assert_eq!(mock.recorded_budgets(), vec![Some(10), None]);
    }

    #[tokio::test]
    async fn test_mock_fails_loudly_when_exhausted() {
        let mock = MockTextService::new();
        let err = mock
            .invoke("a", InvokeOptions::service_default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_fixture_vocabulary_counts_follow_tier() {
        for (tier, expected) in ProficiencyTier::all().into_iter().zip([5, 5, 4, 3, 2]) {
            let fixture = FixtureTextService::new(tier);
            let response = fixture
                .invoke(
                    "Task: produce vocabulary entries",
                    InvokeOptions::service_default(),
                )
                .await
                .unwrap();
            let first_block: Vec<&str> = response
                .lines()
                .skip(1)
                .take_while(|l| l.starts_with('-'))
                .collect();
            assert_eq!(first_block.len(), expected, "tier {tier}");
        }
    }
}
