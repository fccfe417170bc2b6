//! AnswerComposer -- turns a question plus retrieved records into an answer.
//!
//! Rules are tried in order and the first one that applies produces the
//! answer:
//!
//! 1. nothing retrieved
//! 2. the `text` column is absent from the source
//! 3. a recognized [`Intent`], answered from aggregates over the records
//! 4. generative fallback over the concatenated record texts
//!
//! Composition never fails outright: every recoverable problem becomes an
//! [`Answer`] whose text is the user-facing message and whose kind records
//! which rule produced it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{Instrument, info_span};

use hotelqa_types::booking::{BookingRecord, Column};
use hotelqa_types::error::AnswerError;
use hotelqa_types::llm::{CompletionRequest, LlmError};

use crate::llm::BoxLlmProvider;
use crate::period::extract_time_period;
use crate::retrieval::Retrieval;

use super::aggregate::{argmax_group_sum, format_currency, mode};
use super::intent::Intent;

/// Default completion budget for the generative fallback.
pub const DEFAULT_MAX_TOKENS: u32 = 100;

/// Default time allowed for a single completion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which rule produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "intent", rename_all = "snake_case")]
pub enum AnswerKind {
    NoData,
    SchemaError,
    Direct(Intent),
    NoPeriodData,
    Generated,
    GenerationFailed,
}

/// A composed answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub kind: AnswerKind,
}

impl Answer {
    fn direct(intent: Intent, text: String) -> Self {
        Self {
            text,
            kind: AnswerKind::Direct(intent),
        }
    }
}

impl From<AnswerError> for Answer {
    fn from(err: AnswerError) -> Self {
        let kind = match &err {
            AnswerError::EmptyRetrieval => AnswerKind::NoData,
            AnswerError::SchemaMissingField(_) => AnswerKind::SchemaError,
            AnswerError::NoDataForPeriod(_) => AnswerKind::NoPeriodData,
            AnswerError::GenerationFailure(_) => AnswerKind::GenerationFailed,
        };
        Self {
            text: err.to_string(),
            kind,
        }
    }
}

/// Composes answers, delegating open-ended questions to an LLM.
pub struct AnswerComposer {
    provider: Arc<BoxLlmProvider>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl AnswerComposer {
    pub fn new(provider: Arc<BoxLlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer `question` from `retrieval`.
    #[tracing::instrument(skip(self, retrieval), fields(retrieved = retrieval.len()))]
    pub async fn compose(&self, question: &str, retrieval: &Retrieval) -> Answer {
        match self.try_compose(question, retrieval).await {
            Ok(answer) => answer,
            Err(err) => {
                if let AnswerError::GenerationFailure(cause) = &err {
                    tracing::warn!(error = %cause, "generation failed");
                } else {
                    tracing::debug!(reason = %err, "answered from a guard rule");
                }
                err.into()
            }
        }
    }

    async fn try_compose(&self, question: &str, retrieval: &Retrieval) -> Result<Answer, AnswerError> {
        if retrieval.is_empty() {
            return Err(AnswerError::EmptyRetrieval);
        }
        if !retrieval.columns.contains(Column::Text) {
            return Err(AnswerError::SchemaMissingField(Column::Text));
        }

        if let Some(intent) = Intent::detect(question) {
            if let Some(missing) = retrieval.columns.first_missing(intent.required_columns()) {
                return Err(AnswerError::SchemaMissingField(missing));
            }
            let text = answer_intent(intent, question, &retrieval.records)?;
            return Ok(Answer::direct(intent, text));
        }

        let prompt = build_prompt(question, &retrieval.records);
        let text = self.generate(prompt).await?;
        Ok(Answer {
            text,
            kind: AnswerKind::Generated,
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, AnswerError> {
        let request = CompletionRequest::greedy(&self.model, prompt, self.max_tokens);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = request.temperature,
        );

        let response = tokio::time::timeout(self.timeout, self.provider.complete(&request))
            .instrument(span)
            .await
            .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))
            .and_then(|result| result)
            .map_err(|e| AnswerError::GenerationFailure(e.to_string()))?;

        tracing::debug!(
            gen_ai.usage.input_tokens = response.usage.input_tokens,
            gen_ai.usage.output_tokens = response.usage.output_tokens,
            gen_ai.response.finish_reason = %response.stop_reason,
            "completion received"
        );

        Ok(response.content.trim().to_string())
    }
}

/// Build the generation prompt from the retrieved record texts.
pub fn build_prompt(question: &str, records: &[BookingRecord]) -> String {
    let context = records
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    format!("Context: {context}\n\nQuestion: {question}\n\nProvide a precise and factual response.")
}

fn answer_intent(intent: Intent, question: &str, records: &[BookingRecord]) -> Result<String, AnswerError> {
    match intent {
        Intent::RoomType => {
            let room = mode(records.iter().map(|r| r.reserved_room_type.as_str()))
                .ok_or(AnswerError::EmptyRetrieval)?;
            Ok(format!("The most commonly booked room type is {room}."))
        }
        Intent::GuestCountry => {
            let country =
                mode(records.iter().map(|r| r.country.as_str())).ok_or(AnswerError::EmptyRetrieval)?;
            Ok(format!("The country with the most guests is {country}."))
        }
        Intent::RepeatCustomers => {
            let repeats = records.iter().filter(|r| r.is_repeated_guest).count();
            Ok(format!("There are {repeats} repeat guests in the dataset."))
        }
        Intent::Revenue => answer_revenue(question, records),
    }
}

fn answer_revenue(question: &str, records: &[BookingRecord]) -> Result<String, AnswerError> {
    let period = extract_time_period(question);
    let label = period.label();

    let in_period: Vec<&BookingRecord> = records
        .iter()
        .filter(|r| period.matches(&r.year_month))
        .collect();

    if in_period.is_empty() {
        return Err(AnswerError::NoDataForPeriod(label));
    }

    if question.to_lowercase().contains("total revenue") {
        let total: f64 = in_period.iter().map(|r| r.revenue).sum();
        return Ok(format!(
            "The total revenue in {label} is {}.",
            format_currency(total)
        ));
    }

    let (hotel, revenue) = argmax_group_sum(in_period.iter().map(|r| (r.hotel.as_str(), r.revenue)))
        .ok_or_else(|| AnswerError::NoDataForPeriod(label.clone()))?;

    Ok(format!(
        "The hotel with the highest revenue in {label} is {hotel} with a revenue of {}.",
        format_currency(revenue)
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hotelqa_types::booking::ColumnSet;
    use hotelqa_types::llm::{CompletionResponse, StopReason, Usage};

    use super::*;
    use crate::llm::LlmProvider;

    struct CannedProvider {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.temperature, 0.0);
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: self.reply.clone(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    struct FailingProvider;

    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::Provider {
                message: "connection refused".to_string(),
            })
        }
    }

    struct SlowProvider;

    impl LlmProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(LlmError::Provider {
                message: "unreachable".to_string(),
            })
        }
    }

    fn canned(reply: &str) -> (AnswerComposer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CannedProvider {
            reply: reply.to_string(),
            calls: Arc::clone(&calls),
        };
        (
            AnswerComposer::new(Arc::new(BoxLlmProvider::new(provider)), "test-model"),
            calls,
        )
    }

    fn booking(hotel: &str, year_month: &str, revenue: f64, room: &str, country: &str) -> BookingRecord {
        let mut r = BookingRecord {
            hotel: hotel.to_string(),
            year_month: year_month.to_string(),
            revenue,
            adr: revenue,
            reserved_room_type: room.to_string(),
            country: country.to_string(),
            ..Default::default()
        };
        r.text = r.summary_text();
        r
    }

    fn retrieval(records: Vec<BookingRecord>) -> Retrieval {
        Retrieval {
            records,
            columns: ColumnSet::all(),
            ..Default::default()
        }
    }

    fn sample() -> Retrieval {
        retrieval(vec![
            booking("City Hotel", "2023-03", 1200.0, "A", "PRT"),
            booking("Resort Hotel", "2023-03", 800.0, "D", "GBR"),
            booking("City Hotel", "2022-07", 300.5, "A", "GBR"),
            booking("Resort Hotel", "2022-07", 950.25, "E", "PRT"),
        ])
    }

    #[tokio::test]
    async fn test_empty_retrieval() {
        let (composer, calls) = canned("unused");
        let answer = composer.compose("anything", &Retrieval::default()).await;
        assert_eq!(answer.text, "No relevant data found.");
        assert_eq!(answer.kind, AnswerKind::NoData);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_text_column() {
        let (composer, _) = canned("unused");
        let mut r = sample();
        r.columns.remove(Column::Text);
        let answer = composer.compose("What is the most common room type?", &r).await;
        assert_eq!(answer.text, "Error: 'text' column is missing in retrieved data.");
        assert_eq!(answer.kind, AnswerKind::SchemaError);
    }

    #[tokio::test]
    async fn test_room_type_mode() {
        let (composer, calls) = canned("unused");
        let answer = composer
            .compose("What is the most booked room type?", &sample())
            .await;
        assert_eq!(answer.text, "The most commonly booked room type is A.");
        assert_eq!(answer.kind, AnswerKind::Direct(Intent::RoomType));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_guest_country_tie_takes_smallest() {
        let (composer, _) = canned("unused");
        let answer = composer
            .compose("Which country has the most guests?", &sample())
            .await;
        assert_eq!(answer.text, "The country with the most guests is GBR.");
    }

    #[tokio::test]
    async fn test_repeat_customers_count() {
        let (composer, _) = canned("unused");
        let mut r = sample();
        r.records[0].is_repeated_guest = true;
        r.records[3].is_repeated_guest = true;
        let answer = composer.compose("How many repeat customers?", &r).await;
        assert_eq!(answer.text, "There are 2 repeat guests in the dataset.");
    }

    #[tokio::test]
    async fn test_total_revenue_for_month() {
        let (composer, _) = canned("unused");
        let answer = composer
            .compose("What was the total revenue in March 2023?", &sample())
            .await;
        assert_eq!(answer.text, "The total revenue in March 2023 is $2,000.00.");
        assert_eq!(answer.kind, AnswerKind::Direct(Intent::Revenue));
    }

    #[tokio::test]
    async fn test_highest_revenue_hotel_for_year() {
        let (composer, _) = canned("unused");
        let answer = composer
            .compose("Which hotel had the highest revenue in 2022?", &sample())
            .await;
        assert_eq!(
            answer.text,
            "The hotel with the highest revenue in 2022 is Resort Hotel with a revenue of $950.25."
        );
    }

    #[tokio::test]
    async fn test_highest_revenue_without_period() {
        let (composer, _) = canned("unused");
        let answer = composer.compose("Which hotel has the best revenue?", &sample()).await;
        assert_eq!(
            answer.text,
            "The hotel with the highest revenue in the given period is Resort Hotel with a revenue of $1,750.25."
        );
    }

    #[tokio::test]
    async fn test_revenue_no_data_for_period() {
        let (composer, _) = canned("unused");
        let answer = composer
            .compose("What was the total revenue in June 2019?", &sample())
            .await;
        assert_eq!(answer.text, "No revenue data found for June 2019.");
        assert_eq!(answer.kind, AnswerKind::NoPeriodData);
    }

    #[tokio::test]
    async fn test_revenue_without_revenue_column() {
        let (composer, calls) = canned("unused");
        let mut r = sample();
        r.columns.remove(Column::Revenue);
        let answer = composer.compose("total revenue in 2023", &r).await;
        assert_eq!(
            answer.text,
            "Error: 'revenue' column is missing in retrieved data."
        );
        assert_eq!(answer.kind, AnswerKind::SchemaError);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generative_fallback_trims_output() {
        let (composer, calls) = canned("  Bookings peak in summer.\n");
        let answer = composer
            .compose("When do bookings peak?", &sample())
            .await;
        assert_eq!(answer.text, "Bookings peak in summer.");
        assert_eq!(answer.kind, AnswerKind::Generated);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_message() {
        let composer = AnswerComposer::new(Arc::new(BoxLlmProvider::new(FailingProvider)), "m");
        let answer = composer.compose("When do bookings peak?", &sample()).await;
        assert_eq!(answer.text, "Unable to generate an answer at this time.");
        assert_eq!(answer.kind, AnswerKind::GenerationFailed);
    }

    #[tokio::test]
    async fn test_generation_timeout() {
        let composer = AnswerComposer::new(Arc::new(BoxLlmProvider::new(SlowProvider)), "m")
            .with_timeout(Duration::from_millis(20));
        let answer = composer.compose("When do bookings peak?", &sample()).await;
        assert_eq!(answer.kind, AnswerKind::GenerationFailed);
    }

    #[test]
    fn test_build_prompt() {
        let records = vec![
            BookingRecord {
                text: "first".to_string(),
                ..Default::default()
            },
            BookingRecord {
                text: "second".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(
            build_prompt("Why?", &records),
            "Context: first second\n\nQuestion: Why?\n\nProvide a precise and factual response."
        );
    }

    #[test]
    fn test_answer_kind_serialization() {
        let json = serde_json::to_value(AnswerKind::Direct(Intent::Revenue)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "direct", "intent": "revenue"}));
        let json = serde_json::to_value(AnswerKind::Generated).unwrap();
        assert_eq!(json, serde_json::json!({"type": "generated"}));
    }
}
