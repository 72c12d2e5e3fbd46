//! The pay-and-retry state machine.
//!
//! ```text
//! Idle ──schema──▶ SchemaLoaded ──call──▶ 200 ─────────────────────────────▶ Done(ok)
//!                                    └──▶ 402 ▶ ChallengeReceived ─parse─▶ Parsed
//! Parsed ─checks─▶ Validated ─build─▶ Paid ─retry─▶ 200 ▶ Done(ok)
//!                                              └──▶ any ▶ Done(failed after payment)
//! ```
//!
//! Every other edge ends in `Done` with an error. `Paid` only leads to
//! `Done`: a second 402 is never paid.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use portals_crypto::Address;
use portals_registry::RegistryRecord;
use portals_types::constants::{API_CALL_TIMEOUT_SECS, SCHEMA_FETCH_TIMEOUT_SECS};
use portals_valid::Validator;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::builder::{PaymentBuilder, TransferRequest};
use crate::challenge::parse_challenge;
use crate::error::{CallStage, TimedOperation, X402Error, X402Result};
use crate::schema::{declared_prices, resolve_target_url, schema_url, OpenApiSchema, ToolDescriptor};
use crate::transport::{ApiResponse, ApiTransport};
use crate::types::{PaymentProof, PaymentReceipt, PaymentRequirement};

/// States a negotiation passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NegotiationState {
    /// Nothing done yet.
    Idle,
    /// Tools and declared prices are known.
    SchemaLoaded,
    /// The unpaid call answered 402.
    ChallengeReceived,
    /// The challenge was normalized.
    Parsed,
    /// Amount, price and destination checks passed.
    Validated,
    /// A signed payment exists.
    Paid,
    /// Terminal.
    Done,
}

/// Successful result of a negotiation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallOutcome {
    /// Response body: JSON, or a JSON string for non-JSON bodies
    pub body: Value,
    /// Present when the call was paid for
    pub receipt: Option<PaymentReceipt>,
    /// States entered, in order
    pub trace: Vec<NegotiationState>,
}

impl CallOutcome {
    /// Returns true if the call required a payment.
    pub fn was_paid(&self) -> bool {
        self.receipt.is_some()
    }
}

/// A finished negotiation: its result plus the states it entered, which is
/// available even on failure.
#[derive(Debug)]
pub struct Negotiation {
    /// Outcome
    pub result: X402Result<CallOutcome>,
    /// States entered, in order
    pub trace: Vec<NegotiationState>,
}

/// Time limits for the negotiation's round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatorConfig {
    /// Schema fetch limit
    pub schema_timeout: Duration,
    /// Limit for each API call
    pub call_timeout: Duration,
}

impl Default for NegotiatorConfig {
    fn default() -> Self {
        Self {
            schema_timeout: Duration::from_secs(SCHEMA_FETCH_TIMEOUT_SECS),
            call_timeout: Duration::from_secs(API_CALL_TIMEOUT_SECS),
        }
    }
}

/// Where a call goes and what it may cost.
struct Target {
    url: String,
    declared: Vec<f64>,
}

/// A verified payment, ready to sign.
struct Verified {
    requirement: PaymentRequirement,
    destination: Address,
    fee_payer: Option<Address>,
}

enum Step {
    Idle,
    SchemaLoaded(Target),
    ChallengeReceived(Target, ApiResponse),
    Parsed(Target, PaymentRequirement),
    Validated(Target, Verified),
    Paid(Target, String, PaymentReceipt),
    Done(X402Result<CallOutcome>),
}

impl Step {
    fn state(&self) -> NegotiationState {
        match self {
            Self::Idle => NegotiationState::Idle,
            Self::SchemaLoaded(..) => NegotiationState::SchemaLoaded,
            Self::ChallengeReceived(..) => NegotiationState::ChallengeReceived,
            Self::Parsed(..) => NegotiationState::Parsed,
            Self::Validated(..) => NegotiationState::Validated,
            Self::Paid(..) => NegotiationState::Paid,
            Self::Done(_) => NegotiationState::Done,
        }
    }
}

/// Turns an API call into a verified, paid, retried call.
///
/// Collaborators are shared and immutable; one negotiator serves any number
/// of concurrent calls.
#[derive(Clone)]
pub struct Negotiator {
    transport: Arc<dyn ApiTransport>,
    builder: Arc<dyn PaymentBuilder>,
    validator: Arc<dyn Validator>,
    config: NegotiatorConfig,
}

impl Negotiator {
    /// Create a negotiator with default time limits.
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        builder: Arc<dyn PaymentBuilder>,
        validator: Arc<dyn Validator>,
    ) -> Self {
        Self {
            transport,
            builder,
            validator,
            config: NegotiatorConfig::default(),
        }
    }

    /// Replace the time limits.
    pub fn with_config(mut self, config: NegotiatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Time limits in use.
    pub fn config(&self) -> &NegotiatorConfig {
        &self.config
    }

    /// Fetch and parse the tools of the API at `base_url`.
    pub async fn fetch_tools(&self, base_url: &str) -> X402Result<Vec<ToolDescriptor>> {
        let url = schema_url(base_url)?;
        debug!(url = %url, "Fetching API schema");

        let document = self
            .timed(
                TimedOperation::SchemaFetch,
                self.config.schema_timeout,
                self.transport.get_json(&url),
            )
            .await?
            .map_err(|e| X402Error::SchemaUnavailable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let schema = OpenApiSchema::from_value(document).map_err(|e| X402Error::SchemaUnavailable {
            url: url.clone(),
            reason: format!("not an OpenAPI document: {}", e),
        })?;

        let tools = schema.tools();
        debug!(url = %url, tools = tools.len(), "Schema loaded");
        Ok(tools)
    }

    /// Call the API described by `record`, paying if challenged.
    pub async fn negotiate(
        &self,
        record: &RegistryRecord,
        params: &Value,
        tool_name: Option<&str>,
    ) -> X402Result<CallOutcome> {
        self.negotiate_traced(record, params, tool_name).await.result
    }

    /// Same as [`negotiate`](Self::negotiate), keeping the state trace on
    /// failure too.
    pub async fn negotiate_traced(
        &self,
        record: &RegistryRecord,
        params: &Value,
        tool_name: Option<&str>,
    ) -> Negotiation {
        if record.suspended {
            warn!(api = %record.address, "Calling a suspended API");
        }

        let mut trace = Vec::new();
        let mut step = Step::Idle;

        loop {
            trace.push(step.state());
            step = match step {
                Step::Idle => self.load_schema(record, tool_name).await,
                Step::SchemaLoaded(target) => self.first_call(target, params).await,
                Step::ChallengeReceived(target, response) => match parse_challenge(&response) {
                    Ok(requirement) => Step::Parsed(target, requirement),
                    Err(e) => Step::Done(Err(e)),
                },
                Step::Parsed(target, requirement) => self.verify(record, target, requirement),
                Step::Validated(target, verified) => self.pay(target, verified).await,
                Step::Paid(target, proof, receipt) => self.paid_call(target, params, proof, receipt).await,
                Step::Done(result) => {
                    let result = result.map(|mut outcome| {
                        outcome.trace = trace.clone();
                        outcome
                    });
                    return Negotiation { result, trace };
                }
            };
        }
    }

    async fn load_schema(&self, record: &RegistryRecord, tool_name: Option<&str>) -> Step {
        match self.fetch_tools(&record.url).await {
            Ok(tools) => Step::SchemaLoaded(Target {
                url: resolve_target_url(&record.url, &tools, tool_name),
                declared: declared_prices(&tools),
            }),
            Err(e) => Step::Done(Err(e)),
        }
    }

    async fn first_call(&self, target: Target, params: &Value) -> Step {
        let response = match self.call(&target.url, params, None, CallStage::Initial).await {
            Ok(response) => response,
            Err(e) => return Step::Done(Err(e)),
        };

        match response.status {
            200 => {
                debug!(url = %target.url, "Call succeeded without payment");
                Step::Done(Ok(CallOutcome {
                    body: response.json_or_text(),
                    receipt: None,
                    trace: Vec::new(),
                }))
            }
            402 => {
                debug!(url = %target.url, "Payment required");
                Step::ChallengeReceived(target, response)
            }
            status => Step::Done(Err(X402Error::UnexpectedStatus {
                status,
                stage: CallStage::Initial,
            })),
        }
    }

    fn verify(&self, record: &RegistryRecord, target: Target, requirement: PaymentRequirement) -> Step {
        match self.run_checks(record, &target, requirement) {
            Ok(verified) => Step::Validated(target, verified),
            Err(e) => Step::Done(Err(e)),
        }
    }

    fn run_checks(
        &self,
        record: &RegistryRecord,
        target: &Target,
        requirement: PaymentRequirement,
    ) -> X402Result<Verified> {
        self.validator.validate_amount(requirement.amount)?;

        if !target.declared.is_empty() {
            self.validator
                .validate_price_consistency(&target.declared, requirement.amount)?;
        }

        let destination = self
            .validator
            .verify_destination(&record.payment_vault, &requirement.destination)?;

        let fee_payer = requirement
            .fee_payer
            .as_deref()
            .map(|fp| {
                fp.parse::<Address>().map_err(|e| X402Error::MalformedChallenge {
                    reason: format!("invalid feePayer '{}': {}", fp, e),
                })
            })
            .transpose()?;

        debug!(
            amount = requirement.amount,
            destination = %destination,
            "Payment challenge verified"
        );

        Ok(Verified {
            requirement,
            destination,
            fee_payer,
        })
    }

    async fn pay(&self, target: Target, verified: Verified) -> Step {
        let Verified {
            requirement,
            destination,
            fee_payer,
        } = verified;

        let request = TransferRequest {
            destination,
            amount: requirement.amount,
            fee_payer,
            chain: requirement.chain.clone(),
        };

        let signed = match self.builder.build(&request).await {
            Ok(signed) => signed,
            Err(e) => return Step::Done(Err(e)),
        };

        info!(
            amount = requirement.amount,
            currency = %requirement.currency,
            destination = %destination,
            "Payment built"
        );

        let proof = match PaymentProof::exact(&requirement.chain, signed.0).to_header() {
            Ok(proof) => proof,
            Err(e) => return Step::Done(Err(e)),
        };

        let receipt = PaymentReceipt {
            amount: requirement.amount,
            currency: requirement.currency,
            chain: requirement.chain,
            destination,
            fee_payer,
        };

        Step::Paid(target, proof, receipt)
    }

    async fn paid_call(&self, target: Target, params: &Value, proof: String, receipt: PaymentReceipt) -> Step {
        let response = match self
            .call(&target.url, params, Some(&proof), CallStage::AfterPayment)
            .await
        {
            Ok(response) => response,
            Err(e) => return Step::Done(Err(e)),
        };

        if response.status == 200 {
            info!(url = %target.url, amount = receipt.amount, "Paid call succeeded");
            return Step::Done(Ok(CallOutcome {
                body: response.json_or_text(),
                receipt: Some(receipt),
                trace: Vec::new(),
            }));
        }

        warn!(
            url = %target.url,
            status = response.status,
            amount = receipt.amount,
            destination = %receipt.destination,
            "Call failed after payment"
        );
        Step::Done(Err(X402Error::UnexpectedStatus {
            status: response.status,
            stage: CallStage::AfterPayment,
        }))
    }

    async fn call(
        &self,
        url: &str,
        params: &Value,
        proof: Option<&str>,
        stage: CallStage,
    ) -> X402Result<ApiResponse> {
        let operation = match stage {
            CallStage::Initial => TimedOperation::InitialCall,
            CallStage::AfterPayment => TimedOperation::PaidCall,
        };

        self.timed(
            operation,
            self.config.call_timeout,
            self.transport.post_json(url, params, proof),
        )
        .await?
        .map_err(|e| X402Error::Transport {
            stage,
            reason: e.to_string(),
        })
    }

    async fn timed<T>(
        &self,
        operation: TimedOperation,
        limit: Duration,
        fut: impl Future<Output = T>,
    ) -> X402Result<T> {
        tokio::time::timeout(limit, fut).await.map_err(|_| {
            warn!(%operation, limit_secs = limit.as_secs(), "Timed out");
            X402Error::Timeout {
                operation,
                limit_secs: limit.as_secs(),
            }
        })
    }
}
