//! Currency use cases.
//!
//! # Responsibility
//! - Provide register/get entry points for presentation currencies.
//!
//! # Invariants
//! - A duplicate currency code surfaces as a persistence failure and rolls
//!   the registering command back.

use crate::context::StoreContext;
use crate::model::currency::{Currency, CurrencyId};
use crate::model::Entity;
use crate::service::use_case::{Command, Query, UseCaseError, UseCaseResult};
use serde::{Deserialize, Serialize};

/// Read model returned by currency queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyView {
    pub currency_id: CurrencyId,
    pub code: String,
    pub display_name: String,
    pub minor_units: u8,
}

impl From<&Currency> for CurrencyView {
    fn from(currency: &Currency) -> Self {
        Self {
            currency_id: *currency.id(),
            code: currency.code().to_string(),
            display_name: currency.display_name().to_string(),
            minor_units: currency.minor_units(),
        }
    }
}

/// Input payload for [`RegisterCurrency`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCurrencyInput {
    pub code: String,
    pub display_name: String,
    pub minor_units: u8,
}

/// Output payload for [`RegisterCurrency`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCurrencyOutput {
    pub currency_id: CurrencyId,
}

/// Registers a presentation currency with the shop.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterCurrency;

impl Command for RegisterCurrency {
    type Input = RegisterCurrencyInput;
    type Output = RegisterCurrencyOutput;

    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        let currency = Currency::new(input.code, input.display_name, input.minor_units)
            .map_err(|err| UseCaseError::Invalid(err.to_string()))?;

        let currency_id = context.currencies().save(&currency)?;
        Ok(RegisterCurrencyOutput { currency_id })
    }
}

/// Input payload for [`GetCurrency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetCurrencyInput {
    pub currency_id: CurrencyId,
}

/// Looks up one currency; absence is an empty result, not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCurrency;

impl Query for GetCurrency {
    type Input = GetCurrencyInput;
    type Output = Option<CurrencyView>;

    fn implementation(
        &self,
        context: &mut StoreContext,
        input: Self::Input,
    ) -> UseCaseResult<Self::Output> {
        let currency = context.currencies().find_by_id(&input.currency_id)?;
        Ok(currency.as_ref().map(CurrencyView::from))
    }
}
