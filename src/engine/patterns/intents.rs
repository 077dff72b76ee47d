use super::{IntentSpec, PatternSpec};
use crate::engine::types::IntentCategory;

const fn p(regex: &'static str, weight: u32) -> PatternSpec {
    PatternSpec { regex, weight }
}

/// Intent pattern groups in declaration order.
///
/// Single keywords weigh 1; multi-word phrases weigh 2-3 because they pin the intent
/// down far better than a lone noun.
pub static INTENT_TABLE: &[IntentSpec] = &[
    IntentSpec {
        category: IntentCategory::Revenue,
        priority: 1,
        patterns: &[
            p(r"(?i)\brevenues?\b", 1),
            p(r"(?i)\bsales\b", 1),
            p(r"(?i)\bincome\b", 1),
            p(r"(?i)\bearnings?\b", 1),
            p(r"(?i)\bmoney\b", 1),
            p(r"(?i)\bamounts?\b", 1),
            p(r"(?i)\bspend(s|ing)?\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::TopProducts,
        priority: 15,
        patterns: &[
            p(
                r"(?i)\b(top|best|popular|highest|lowest|bottom|worst|most sold|best[- ]selling)\s+((?:\d{1,3}(?:,\d{3})+|\d+)\s+)?(products?|items?)\b",
                3,
            ),
            p(r"(?i)\bbest[- ]?sellers?\b", 3),
        ],
    },
    IntentSpec {
        category: IntentCategory::TopCustomers,
        priority: 14,
        patterns: &[
            p(
                r"(?i)\b(top|best|biggest|highest|lowest|bottom|vip)\s+((?:\d{1,3}(?:,\d{3})+|\d+)\s+)?(customers?|buyers?|clients?|spenders?)\b",
                3,
            ),
            p(r"(?i)\bbig spenders?\b", 2),
        ],
    },
    IntentSpec {
        category: IntentCategory::Orders,
        priority: 2,
        patterns: &[
            p(r"(?i)\borders?\b", 1),
            p(r"(?i)\bpurchases?\b", 1),
            p(r"(?i)\btransactions?\b", 1),
            p(r"(?i)\bbuy(s|ing)?\b", 1),
            p(r"(?i)\border status(es)?\b", 2),
        ],
    },
    IntentSpec {
        category: IntentCategory::Trend,
        priority: 7,
        patterns: &[
            p(r"(?i)\btrends?\b", 1),
            p(r"(?i)\b(daily|weekly|monthly|quarterly|yearly|annual)\b", 1),
            p(r"(?i)\bover time\b", 2),
            p(r"(?i)\bgrowth\b", 1),
            p(r"(?i)\btimeline\b", 1),
            p(r"(?i)\b(by|per|each) (day|week|month|quarter|year)\b", 2),
        ],
    },
    IntentSpec {
        category: IntentCategory::Category,
        priority: 6,
        patterns: &[
            p(r"(?i)\bcategor(y|ies)\b", 1),
            p(r"(?i)\bdepartments?\b", 1),
            p(r"(?i)\bsections?\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Region,
        priority: 5,
        patterns: &[
            p(r"(?i)\bregions?\b", 1),
            p(r"(?i)\bcountr(y|ies)\b", 1),
            p(r"(?i)\blocations?\b", 1),
            p(r"(?i)\bcit(y|ies)\b", 1),
            p(r"(?i)\bgeograph(y|ic|ical)\b", 1),
            p(r"(?i)\bareas?\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Inventory,
        priority: 11,
        patterns: &[
            p(r"(?i)\bstock\b", 1),
            p(r"(?i)\binventory\b", 1),
            p(r"(?i)\bsupply\b", 1),
            p(r"(?i)\bavailab(le|ility)\b", 1),
            p(r"(?i)\b(out of|low) stock\b", 3),
        ],
    },
    IntentSpec {
        category: IntentCategory::Rating,
        priority: 8,
        patterns: &[
            p(r"(?i)\bratings?\b", 1),
            p(r"(?i)\breviews?\b", 1),
            p(r"(?i)\brated\b", 1),
            p(r"(?i)\bstars?\b", 1),
            p(r"(?i)\bscores?\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Discount,
        priority: 9,
        patterns: &[
            p(r"(?i)\bdiscount(s|ed)?\b", 1),
            p(r"(?i)\bcoupons?\b", 1),
            p(r"(?i)\bpromo(tion)?s?\b", 1),
            p(r"(?i)\boffers?\b", 1),
            p(r"(?i)\bdeals?\b", 1),
            p(r"(?i)\bsavings\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Customer,
        priority: 4,
        patterns: &[
            p(r"(?i)\bcustomers?\b", 1),
            p(r"(?i)\bclients?\b", 1),
            p(r"(?i)\busers?\b", 1),
            p(r"(?i)\bbuyers?\b", 1),
            p(r"(?i)\bsubscribers?\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Product,
        priority: 3,
        patterns: &[
            p(r"(?i)\bproducts?\b", 1),
            p(r"(?i)\bitems?\b", 1),
            p(r"(?i)\bgoods\b", 1),
            p(r"(?i)\bmerchandise\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Payment,
        priority: 10,
        patterns: &[
            p(r"(?i)\bpayments?\b", 1),
            p(r"(?i)\bpay\b", 1),
            p(r"(?i)\bpayment methods?\b", 2),
            p(r"(?i)\bcredit cards?\b", 2),
            p(r"(?i)\bpaypal\b", 1),
            p(r"(?i)\bdebit\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Refund,
        priority: 12,
        patterns: &[
            p(r"(?i)\brefund(s|ed)?\b", 1),
            p(r"(?i)\breturn(s|ed)?\b", 1),
            p(r"(?i)\bcancel(l?ed|lations?|s)?\b", 1),
            p(r"(?i)\bchargebacks?\b", 1),
        ],
    },
    IntentSpec {
        category: IntentCategory::Profit,
        priority: 13,
        patterns: &[
            p(r"(?i)\bprofit(s|able|ability)?\b", 1),
            p(r"(?i)\bmargins?\b", 1),
            p(r"(?i)\bmarkup\b", 1),
            p(r"(?i)\bcosts?\b", 1),
            p(r"(?i)\bexpenses?\b", 1),
        ],
    },
];
