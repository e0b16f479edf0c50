//! Built-in abilities.
//!
//! - [`StrikeAbility`]: plain attacks that need no solve token
//! - [`ChallengeAbility`]: attacks and heals gated by a solve token
//! - [`Cower`]: a narrative reaction with no effect
//!
//! # Registration
//!
//! Use [`AbilityRegistry::with_defaults()`](crate::ability::AbilityRegistry::with_defaults)
//! to get a registry holding the whole catalog.

use std::sync::Arc;

use crate::ability::Ability;

mod challenge;
mod reaction;
mod strike;

pub use challenge::{ChallengeAbility, TokenTransform};
pub use reaction::Cower;
pub use strike::StrikeAbility;

/// Every built-in ability, ready to register.
#[must_use]
pub fn catalog() -> Vec<Arc<dyn Ability>> {
    vec![
        Arc::new(StrikeAbility::attack()),
        Arc::new(StrikeAbility::punch()),
        Arc::new(StrikeAbility::bite()),
        Arc::new(StrikeAbility::wolf_spider_bite()),
        Arc::new(Cower::new()),
        Arc::new(ChallengeAbility::swift_strike()),
        Arc::new(ChallengeAbility::heal()),
        Arc::new(ChallengeAbility::fire_bolt()),
    ]
}
