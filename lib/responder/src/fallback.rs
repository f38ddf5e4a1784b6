//! Deterministic keyword fallback answers.
//!
//! When the remote answering service is unreachable, the controller resolves
//! a best-effort answer locally by scanning an ordered table of keyword
//! rules. The table is evaluated top to bottom and the first matching rule
//! wins; rule order is part of the contract and is never changed at runtime.

/// A single keyword rule: if the keyword occurs in the (case-folded) input,
/// the rule's response is the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackRule {
    /// Lowercase keyword matched as a substring of the normalized input.
    pub keyword: &'static str,
    /// The canned reply for this keyword.
    pub response: &'static str,
}

/// Built-in rule table for the rental marketplace, in match-priority order.
const MARKETPLACE_RULES: &[FallbackRule] = &[
    FallbackRule {
        keyword: "local pickup",
        response: "Yes, you can offer local pickup! When listing your item, select 'Local Pickup' as a delivery option and specify your preferred location.",
    },
    FallbackRule {
        keyword: "cancel",
        response: "You can cancel a booking up to 24 hours before the rental period starts. Go to 'My Rentals' in your profile, select the booking, and click 'Cancel Booking'.",
    },
    FallbackRule {
        keyword: "ideas to rent",
        response: "Popular items to rent include power tools, camping gear, party supplies, photography equipment, and designer clothing. Think about items you use occasionally but don't need to own!",
    },
    FallbackRule {
        keyword: "deliver",
        response: "To deliver an item, you can choose between shipping or local pickup. For shipping, package your item securely and use the shipping label provided in your dashboard.",
    },
    FallbackRule {
        keyword: "damaged",
        response: "If an item is damaged during rental, please document it with photos and report it through the app within 24 hours of return. Our protection policy covers most damages.",
    },
    FallbackRule {
        keyword: "clean",
        response: "Yes, items should be returned in the same condition they were received. Basic cleaning is expected, but check the listing for any specific cleaning requirements.",
    },
    FallbackRule {
        keyword: "trending",
        response: "Currently trending items include electric bikes, camping equipment, high-end cameras, and party supplies. Check the 'Trending Now' section on the homepage for more!",
    },
    FallbackRule {
        keyword: "storage",
        response: "We don't directly provide storage space, but you can list unused space in your home or garage for rent on Lendora! Many users rent out basement or garage space.",
    },
    FallbackRule {
        keyword: "payout",
        response: "Your payout will arrive within 2 to 3 business days after the rental period ends, assuming there are no reported issues with the item.",
    },
];

/// Reply used when no rule matches.
const MARKETPLACE_DEFAULT: &str = "I'm here to help with any questions about Lendora's rental marketplace. You can ask about listing items, renting, payments, or policies!";

/// Resolves user text to a locally-generated answer.
///
/// Resolution is pure and deterministic: the same input always yields the
/// same output, and every input yields some output.
#[derive(Debug, Clone, Copy)]
pub struct FallbackResolver {
    rules: &'static [FallbackRule],
    default_response: &'static str,
}

impl FallbackResolver {
    /// Creates a resolver over the built-in marketplace table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: MARKETPLACE_RULES,
            default_response: MARKETPLACE_DEFAULT,
        }
    }

    /// Creates a resolver over a custom table.
    ///
    /// Keywords must be lowercase; matching is a case-insensitive substring
    /// test against the input.
    #[must_use]
    pub const fn with_table(
        rules: &'static [FallbackRule],
        default_response: &'static str,
    ) -> Self {
        Self {
            rules,
            default_response,
        }
    }

    /// Returns the reply for the first rule whose keyword occurs in the
    /// input, or the default reply if none matches.
    #[must_use]
    pub fn resolve(&self, text: &str) -> &'static str {
        let normalized = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| normalized.contains(rule.keyword))
            .map_or(self.default_response, |rule| rule.response)
    }

    /// Returns the reply used when no rule matches.
    #[must_use]
    pub const fn default_response(&self) -> &'static str {
        self.default_response
    }
}

impl Default for FallbackResolver {
    fn default() -> Self {
        Self::new()
    }
}
