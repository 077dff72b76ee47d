use super::{DateClause, Slot, SqlTemplate, TemplateRule};
use crate::engine::types::{IntentCategory as I, SortOrder, TemplateId};

const ORDER_DATE: Option<&str> = Some("o.order_date");

/// Template used when classification is empty or the top intent has no rule
pub const FALLBACK_TEMPLATE: TemplateId = TemplateId::TopEntitiesByCount;

/// Query templates against the e-commerce schema. All are single SELECT statements.
pub static SQL_TEMPLATES: &[SqlTemplate] = &[
    SqlTemplate {
        id: TemplateId::RevenueByCategory,
        description: "Revenue and order count per product category",
        intents: &[I::Revenue, I::Category],
        slots: &[Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Desc,
        date_column: ORDER_DATE,
        date_clause: DateClause::And,
        skeleton: "SELECT c.name AS category,
       ROUND(SUM(oi.line_total), 2) AS total_revenue,
       COUNT(DISTINCT o.id) AS total_orders
FROM categories c
JOIN products p ON p.category_id = c.id
JOIN order_items oi ON oi.product_id = p.id
JOIN orders o ON o.id = oi.order_id
WHERE o.status != 'Cancelled'{date_range}
GROUP BY c.name
ORDER BY total_revenue {direction}",
    },
    SqlTemplate {
        id: TemplateId::RevenueByRegion,
        description: "Revenue, orders and unique customers per region",
        intents: &[I::Revenue, I::Region, I::Orders],
        slots: &[Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Desc,
        date_column: ORDER_DATE,
        date_clause: DateClause::And,
        skeleton: "SELECT o.region,
       ROUND(SUM(o.total), 2) AS total_revenue,
       COUNT(o.id) AS total_orders,
       COUNT(DISTINCT o.customer_id) AS unique_customers,
       ROUND(AVG(o.total), 2) AS avg_order_value
FROM orders o
WHERE o.status != 'Cancelled'{date_range}
GROUP BY o.region
ORDER BY total_revenue {direction}",
    },
    SqlTemplate {
        id: TemplateId::RevenueTrend,
        description: "Revenue, order count and average order value per time period",
        intents: &[I::Revenue, I::Trend],
        slots: &[Slot::Granularity, Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Asc,
        date_column: ORDER_DATE,
        date_clause: DateClause::And,
        skeleton: "SELECT {period} AS period,
       ROUND(SUM(o.total), 2) AS revenue,
       COUNT(o.id) AS orders,
       ROUND(AVG(o.total), 2) AS avg_order_value
FROM orders o
WHERE o.status != 'Cancelled'{date_range}
GROUP BY period
ORDER BY period {direction}",
    },
    SqlTemplate {
        id: TemplateId::TopProductsRevenue,
        description: "Products ranked by revenue with units sold",
        intents: &[I::Revenue, I::TopProducts, I::Product],
        slots: &[Slot::Limit, Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Desc,
        date_column: ORDER_DATE,
        date_clause: DateClause::And,
        skeleton: "SELECT p.name AS product,
       c.name AS category,
       ROUND(SUM(oi.line_total), 2) AS revenue,
       SUM(oi.quantity) AS units_sold
FROM products p
JOIN categories c ON c.id = p.category_id
JOIN order_items oi ON oi.product_id = p.id
JOIN orders o ON o.id = oi.order_id
WHERE o.status != 'Cancelled'{date_range}
GROUP BY p.id
ORDER BY revenue {direction}
LIMIT {limit}",
    },
    SqlTemplate {
        id: TemplateId::TopProductsRating,
        description: "Products ranked by rating among those with enough reviews",
        intents: &[I::TopProducts, I::Rating, I::Product],
        slots: &[Slot::Limit, Slot::SortDirection],
        default_sort: SortOrder::Desc,
        date_column: None,
        date_clause: DateClause::And,
        skeleton: "SELECT p.name AS product,
       c.name AS category,
       p.rating,
       p.reviews_count,
       p.price
FROM products p
JOIN categories c ON c.id = p.category_id
WHERE p.reviews_count >= 10
ORDER BY p.rating {direction}, p.reviews_count DESC
LIMIT {limit}",
    },
    SqlTemplate {
        id: TemplateId::TopCustomers,
        description: "Customers ranked by lifetime value",
        intents: &[I::Revenue, I::TopCustomers, I::Customer],
        slots: &[Slot::Limit, Slot::SortDirection],
        default_sort: SortOrder::Desc,
        date_column: None,
        date_clause: DateClause::And,
        skeleton: "SELECT c.first_name || ' ' || c.last_name AS customer_name,
       c.email,
       c.region,
       c.city,
       ROUND(c.lifetime_value, 2) AS total_spent,
       c.order_count
FROM customers c
WHERE c.order_count > 0
ORDER BY c.lifetime_value {direction}
LIMIT {limit}",
    },
    SqlTemplate {
        id: TemplateId::OrderStatusBreakdown,
        description: "Order count and value per order status",
        intents: &[I::Orders],
        slots: &[Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Desc,
        date_column: ORDER_DATE,
        date_clause: DateClause::Where,
        skeleton: "SELECT o.status,
       COUNT(o.id) AS order_count,
       ROUND(SUM(o.total), 2) AS total_value,
       ROUND(AVG(o.total), 2) AS avg_value
FROM orders o{date_range}
GROUP BY o.status
ORDER BY order_count {direction}",
    },
    SqlTemplate {
        id: TemplateId::PaymentAnalysis,
        description: "Usage and processed value per payment method",
        intents: &[I::Payment, I::Orders],
        slots: &[Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Desc,
        date_column: ORDER_DATE,
        date_clause: DateClause::And,
        skeleton: "SELECT o.payment_method,
       COUNT(o.id) AS usage_count,
       ROUND(SUM(o.total), 2) AS total_processed,
       ROUND(AVG(o.total), 2) AS avg_transaction
FROM orders o
WHERE o.status != 'Cancelled'{date_range}
GROUP BY o.payment_method
ORDER BY usage_count {direction}",
    },
    SqlTemplate {
        id: TemplateId::InventoryStatus,
        description: "Stock level and stock band per product",
        intents: &[I::Inventory],
        slots: &[Slot::SortDirection],
        default_sort: SortOrder::Asc,
        date_column: None,
        date_clause: DateClause::And,
        skeleton: "SELECT p.name AS product,
       c.name AS category,
       p.stock,
       p.price,
       CASE
           WHEN p.stock = 0 THEN 'Out of Stock'
           WHEN p.stock < 20 THEN 'Low Stock'
           WHEN p.stock < 100 THEN 'Normal'
           ELSE 'Well Stocked'
       END AS stock_status
FROM products p
JOIN categories c ON c.id = p.category_id
ORDER BY p.stock {direction}",
    },
    SqlTemplate {
        id: TemplateId::ProfitAnalysis,
        description: "Per-product unit margin and total profit",
        intents: &[I::Profit, I::Product],
        slots: &[Slot::Limit, Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Desc,
        date_column: ORDER_DATE,
        date_clause: DateClause::And,
        skeleton: "SELECT p.name AS product,
       c.name AS category,
       p.price,
       p.cost,
       ROUND(p.price - p.cost, 2) AS profit_per_unit,
       ROUND(((p.price - p.cost) / p.price) * 100, 1) AS margin_pct,
       SUM(oi.quantity) AS units_sold,
       ROUND(SUM(oi.quantity * (p.price - p.cost)), 2) AS total_profit
FROM products p
JOIN categories c ON c.id = p.category_id
JOIN order_items oi ON oi.product_id = p.id
JOIN orders o ON o.id = oi.order_id
WHERE o.status != 'Cancelled'{date_range}
GROUP BY p.id
ORDER BY total_profit {direction}
LIMIT {limit}",
    },
    SqlTemplate {
        id: TemplateId::RefundAnalysis,
        description: "Refunds, cancellations and issue rate per time period",
        intents: &[I::Refund, I::Trend, I::Orders],
        slots: &[Slot::Granularity, Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Asc,
        date_column: ORDER_DATE,
        date_clause: DateClause::Where,
        skeleton: "SELECT {period} AS period,
       COUNT(CASE WHEN o.status = 'Refunded' THEN 1 END) AS refunds,
       COUNT(CASE WHEN o.status = 'Cancelled' THEN 1 END) AS cancellations,
       COUNT(o.id) AS total_orders,
       ROUND(COUNT(CASE WHEN o.status IN ('Refunded', 'Cancelled') THEN 1 END) * 100.0 / COUNT(o.id), 1) AS issue_rate_pct
FROM orders o{date_range}
GROUP BY period
ORDER BY period {direction}",
    },
    SqlTemplate {
        id: TemplateId::CustomerSegments,
        description: "Customers bucketed by lifetime value",
        intents: &[I::Customer],
        slots: &[Slot::SortDirection],
        default_sort: SortOrder::Desc,
        date_column: None,
        date_clause: DateClause::And,
        skeleton: "SELECT CASE
           WHEN c.lifetime_value >= 1000 THEN 'VIP ($1000+)'
           WHEN c.lifetime_value >= 500 THEN 'High Value ($500-999)'
           WHEN c.lifetime_value >= 200 THEN 'Medium ($200-499)'
           WHEN c.lifetime_value > 0 THEN 'Low (<$200)'
           ELSE 'Inactive'
       END AS segment,
       COUNT(c.id) AS customer_count,
       ROUND(AVG(c.lifetime_value), 2) AS avg_ltv,
       ROUND(SUM(c.lifetime_value), 2) AS total_ltv
FROM customers c
GROUP BY segment
ORDER BY avg_ltv {direction}",
    },
    SqlTemplate {
        id: TemplateId::TopEntitiesByCount,
        description: "Products ranked by number of orders they appear in",
        intents: &[],
        slots: &[Slot::Limit, Slot::SortDirection, Slot::DateRange],
        default_sort: SortOrder::Desc,
        date_column: ORDER_DATE,
        date_clause: DateClause::And,
        skeleton: "SELECT p.name AS product,
       c.name AS category,
       COUNT(DISTINCT oi.order_id) AS order_count,
       SUM(oi.quantity) AS units_sold
FROM products p
JOIN categories c ON c.id = p.category_id
JOIN order_items oi ON oi.product_id = p.id
JOIN orders o ON o.id = oi.order_id
WHERE o.status != 'Cancelled'{date_range}
GROUP BY p.id
ORDER BY order_count {direction}
LIMIT {limit}",
    },
];

const fn rule(intent: I, companion: Option<I>, template: TemplateId) -> TemplateRule {
    TemplateRule {
        intent,
        companion,
        template,
    }
}

/// Intent -> template rules. For a given top intent the first rule whose companion is
/// also among the matched intents wins; a rule without companion always applies.
pub static TEMPLATE_RULES: &[TemplateRule] = &[
    rule(I::Revenue, Some(I::Trend), TemplateId::RevenueTrend),
    rule(I::Revenue, Some(I::Category), TemplateId::RevenueByCategory),
    rule(I::Revenue, Some(I::Region), TemplateId::RevenueByRegion),
    rule(I::Revenue, Some(I::TopCustomers), TemplateId::TopCustomers),
    rule(I::Revenue, Some(I::Customer), TemplateId::TopCustomers),
    rule(I::Revenue, Some(I::TopProducts), TemplateId::TopProductsRevenue),
    rule(I::Revenue, Some(I::Product), TemplateId::TopProductsRevenue),
    rule(I::Revenue, None, TemplateId::RevenueTrend),
    rule(I::TopProducts, Some(I::Rating), TemplateId::TopProductsRating),
    rule(I::TopProducts, None, TemplateId::TopProductsRevenue),
    rule(I::TopCustomers, None, TemplateId::TopCustomers),
    rule(I::Orders, Some(I::Payment), TemplateId::PaymentAnalysis),
    rule(I::Orders, Some(I::Refund), TemplateId::RefundAnalysis),
    rule(I::Orders, Some(I::Region), TemplateId::RevenueByRegion),
    rule(I::Orders, None, TemplateId::OrderStatusBreakdown),
    rule(I::Trend, Some(I::Refund), TemplateId::RefundAnalysis),
    rule(I::Trend, None, TemplateId::RevenueTrend),
    rule(I::Category, None, TemplateId::RevenueByCategory),
    rule(I::Region, None, TemplateId::RevenueByRegion),
    rule(I::Inventory, None, TemplateId::InventoryStatus),
    rule(I::Rating, None, TemplateId::TopProductsRating),
    rule(I::Customer, Some(I::Revenue), TemplateId::TopCustomers),
    rule(I::Customer, None, TemplateId::CustomerSegments),
    rule(I::Product, Some(I::Rating), TemplateId::TopProductsRating),
    rule(I::Product, Some(I::Profit), TemplateId::ProfitAnalysis),
    rule(I::Product, None, TemplateId::TopProductsRevenue),
    rule(I::Payment, None, TemplateId::PaymentAnalysis),
    rule(I::Refund, None, TemplateId::RefundAnalysis),
    rule(I::Profit, None, TemplateId::ProfitAnalysis),
];
