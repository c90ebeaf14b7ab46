use std::env;

use sitekit_core::password::{DEFAULT_COST, MAX_COST, MIN_COST};

#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// bcrypt cost for passwords and verification codes.
    pub bcrypt_cost: u32,
}

impl SecurityConfig {
    pub fn from_env() -> Self {
        Self {
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|cost| (MIN_COST..=MAX_COST).contains(cost))
                .unwrap_or(DEFAULT_COST),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
        }
    }
}
