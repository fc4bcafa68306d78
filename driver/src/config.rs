use std::str::FromStr;

use error_stack::{Report, ResultExt};
use rust_decimal::Decimal;

use kernel::prelude::entity::{
    Money, PricingPolicy, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, TAX_RATE,
};
use kernel::KernelError;

use crate::token::JwtVerifier;
use crate::{env, env_opt};

const SERVER_PORT: &str = "SERVER_PORT";
const JWT_SECRET: &str = "JWT_SECRET";
const TAX_RATE_KEY: &str = "TAX_RATE";
const FREE_SHIPPING_THRESHOLD_KEY: &str = "FREE_SHIPPING_THRESHOLD";
const FLAT_SHIPPING_FEE_KEY: &str = "FLAT_SHIPPING_FEE";

const DEFAULT_PORT: u16 = 8080;

/// Process settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    port: u16,
    pricing: PricingPolicy,
    token_verifier: JwtVerifier,
}

impl AppConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let port = match env_opt(SERVER_PORT) {
            Some(port) => parse(SERVER_PORT, &port)?,
            None => DEFAULT_PORT,
        };
        let pricing = PricingPolicy::new(
            decimal_or(TAX_RATE_KEY, TAX_RATE)?,
            Money::new(decimal_or(
                FREE_SHIPPING_THRESHOLD_KEY,
                FREE_SHIPPING_THRESHOLD,
            )?),
            Money::new(decimal_or(FLAT_SHIPPING_FEE_KEY, FLAT_SHIPPING_FEE)?),
        )?;
        let token_verifier = JwtVerifier::new(&env(JWT_SECRET)?)?;
        Ok(Self {
            port,
            pricing,
            token_verifier,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn token_verifier(&self) -> &JwtVerifier {
        &self.token_verifier
    }
}

fn decimal_or(key: &str, default: Decimal) -> error_stack::Result<Decimal, KernelError> {
    env_opt(key).map_or(Ok(default), |value| parse(key, &value))
}

fn parse<T>(key: &str, value: &str) -> error_stack::Result<T, KernelError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .map_err(Report::new)
        .change_context_lazy(|| KernelError::Validation)
        .attach_printable_lazy(|| format!("{key} has an invalid value: {value}"))
}
