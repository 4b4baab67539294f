use std::sync::Arc;

use super::logger::{CalculationLogger, TracingLogger};
use super::result::{CalculationContext, TaxCalculationResult};
use super::result_store::{CartResultStore, OrderResultStore, ResultStore};
use crate::config::Config;
use crate::core::{RateCache, Result};
use crate::modules::application::{CartApplicator, OrderApplicator, TaxApplicator};
use crate::modules::commerce::{Cart, Order};
use crate::modules::rates::{fetch_nexus_regions, Nexus, TaxClient, TaxDetails};
use crate::modules::requests::{
    build_request_body, AdminOrderForm, AdminOrderSource, CartSource, OrderSource, TaxRequestBody,
};
use crate::modules::validation::{CalculationValidator, CartValidator, OrderValidator};

/// Builds the request body for a host. Boxed so the calculator stays
/// generic over where its fields come from.
pub type BodyBuilder<H> = Box<dyn Fn(&H, &Config) -> TaxRequestBody + Send + Sync>;

/// Drives one calculation attempt end to end: build the request body,
/// validate, fetch details (cache first), apply, log, store the result.
///
/// Calculation is fail-open. `calculate` never propagates an error; the
/// host keeps whatever taxes it had, and the outcome is recorded on the
/// host either way.
pub struct TaxCalculator<H> {
    context: CalculationContext,
    config: Config,
    client: Arc<dyn TaxClient>,
    cache: Arc<RateCache>,
    body_builder: BodyBuilder<H>,
    validator: Box<dyn CalculationValidator<H>>,
    applicator: Box<dyn TaxApplicator<H>>,
    logger: Box<dyn CalculationLogger>,
    result_store: Box<dyn ResultStore<H>>,
}

impl<H> TaxCalculator<H> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: CalculationContext,
        config: Config,
        client: Arc<dyn TaxClient>,
        cache: Arc<RateCache>,
        body_builder: BodyBuilder<H>,
        validator: Box<dyn CalculationValidator<H>>,
        applicator: Box<dyn TaxApplicator<H>>,
        logger: Box<dyn CalculationLogger>,
        result_store: Box<dyn ResultStore<H>>,
    ) -> Self {
        Self {
            context,
            config,
            client,
            cache,
            body_builder,
            validator,
            applicator,
            logger,
            result_store,
        }
    }

    pub async fn calculate(&mut self, host: &mut H) -> TaxCalculationResult {
        let body = (self.body_builder)(host, &self.config);
        let raw_request = body.to_json().unwrap_or_default();

        let mut raw_response = String::new();
        let outcome = self.run(host, &body, &mut raw_response).await;

        let result = match &outcome {
            Ok(()) => TaxCalculationResult::success(self.context, raw_request, raw_response),
            Err(err) => TaxCalculationResult::failure(
                self.context,
                raw_request,
                raw_response,
                err.to_string(),
            ),
        };

        self.logger.log(&result, outcome.as_ref().err());

        if let Err(err) = self.result_store.store(host, &result) {
            tracing::error!(context = %self.context, "Failed to store calculation result: {}", err);
        }

        result
    }

    async fn run(
        &mut self,
        host: &mut H,
        body: &TaxRequestBody,
        raw_response: &mut String,
    ) -> Result<()> {
        // An unavailable nexus list must not block checkout, so nexus is
        // presumed everywhere when the fetch fails.
        let regions = match fetch_nexus_regions(self.client.as_ref(), &self.cache, false).await {
            Ok(regions) => regions,
            Err(err) => {
                tracing::warn!("Nexus region fetch failed, presuming nexus: {}", err);
                Vec::new()
            }
        };
        let nexus = Nexus::new(regions, &self.config.store);

        self.validator.validate(host, body, &nexus)?;

        let payload = body.to_payload();
        let mut details = match self.cache.read_hashed_value(&payload) {
            Some(cached) => TaxDetails::from_response(cached)?,
            None => {
                let details = self.client.get_taxes(body).await?;
                self.cache
                    .set_with_hashed_key(&payload, details.raw_response().clone());
                details
            }
        };
        details.set_location(body.to.clone());
        *raw_response = details.raw_response().to_string();

        self.applicator.apply(host, &details)
    }
}

impl TaxCalculator<Cart> {
    /// Calculator wired for live cart sessions.
    pub fn for_cart(config: Config, client: Arc<dyn TaxClient>, cache: Arc<RateCache>) -> Self {
        let logger = TracingLogger::from_config(&config);
        Self::new(
            CalculationContext::Cart,
            config,
            client,
            cache,
            Box::new(|cart, config| build_request_body(&CartSource::new(cart), config)),
            Box::new(CartValidator::new()),
            Box::new(CartApplicator::new()),
            Box::new(logger),
            Box::new(CartResultStore),
        )
    }
}

impl TaxCalculator<Order> {
    /// Calculator wired for persisted orders.
    pub fn for_order(config: Config, client: Arc<dyn TaxClient>, cache: Arc<RateCache>) -> Self {
        let logger = TracingLogger::from_config(&config);
        let applicator = OrderApplicator::new(config.save_rates);
        Self::new(
            CalculationContext::Order,
            config,
            client,
            cache,
            Box::new(|order, config| build_request_body(&OrderSource::new(order), config)),
            Box::new(OrderValidator::new()),
            Box::new(applicator),
            Box::new(logger),
            Box::new(OrderResultStore),
        )
    }

    /// Calculator wired for orders edited in the admin dashboard, where the
    /// destination address comes from raw form input.
    pub fn for_admin_order(
        config: Config,
        client: Arc<dyn TaxClient>,
        cache: Arc<RateCache>,
        form: AdminOrderForm,
    ) -> Self {
        let logger = TracingLogger::from_config(&config);
        let applicator = OrderApplicator::new(config.save_rates);
        Self::new(
            CalculationContext::AdminOrder,
            config,
            client,
            cache,
            Box::new(move |order, config| {
                build_request_body(&AdminOrderSource::new(order, form.clone()), config)
            }),
            Box::new(OrderValidator::new()),
            Box::new(applicator),
            Box::new(logger),
            Box::new(OrderResultStore),
        )
    }
}
