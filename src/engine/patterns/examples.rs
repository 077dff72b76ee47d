use super::FewShotExample;
use crate::engine::types::IntentCategory as I;

pub static FEW_SHOT_EXAMPLES: &[FewShotExample] = &[
    FewShotExample {
        prompt: "show total revenue by category",
        reasoning: "Join orders -> order_items -> products -> categories, then SUM line_total grouped by category",
        sql: "SELECT c.name AS category,
       ROUND(SUM(oi.line_total), 2) AS total_revenue,
       COUNT(DISTINCT o.id) AS total_orders
FROM categories c
JOIN products p ON p.category_id = c.id
JOIN order_items oi ON oi.product_id = p.id
JOIN orders o ON o.id = oi.order_id
WHERE o.status != 'Cancelled'
GROUP BY c.name
ORDER BY total_revenue DESC",
        tags: &[I::Revenue, I::Category],
    },
    FewShotExample {
        prompt: "find top 5 customers by spending",
        reasoning: "Customer names with the sum of their order totals, excluding cancelled orders, limited to 5",
        sql: "SELECT c.first_name || ' ' || c.last_name AS customer_name,
       c.email,
       ROUND(SUM(o.total), 2) AS total_spent,
       COUNT(o.id) AS order_count
FROM customers c
JOIN orders o ON o.customer_id = c.id
WHERE o.status != 'Cancelled'
GROUP BY c.id
ORDER BY total_spent DESC
LIMIT 5",
        tags: &[I::TopCustomers, I::Customer, I::Revenue],
    },
    FewShotExample {
        prompt: "show monthly revenue trend",
        reasoning: "Bucket order_date by year-month, sum totals, order chronologically",
        sql: "SELECT strftime('%Y-%m', o.order_date) AS month,
       ROUND(SUM(o.total), 2) AS revenue,
       COUNT(o.id) AS orders,
       ROUND(AVG(o.total), 2) AS avg_order_value
FROM orders o
WHERE o.status != 'Cancelled'
GROUP BY month
ORDER BY month",
        tags: &[I::Trend, I::Revenue, I::Refund],
    },
    FewShotExample {
        prompt: "what are the best rated products",
        reasoning: "Select from products ordered by rating descending, with review count for context",
        sql: "SELECT p.name AS product,
       c.name AS category,
       p.rating,
       p.reviews_count,
       p.price
FROM products p
JOIN categories c ON c.id = p.category_id
WHERE p.reviews_count >= 50
ORDER BY p.rating DESC, p.reviews_count DESC
LIMIT 10",
        tags: &[I::Rating, I::TopProducts, I::Product],
    },
    FewShotExample {
        prompt: "show revenue by region",
        reasoning: "Group orders by region, sum totals, count distinct customers",
        sql: "SELECT o.region,
       ROUND(SUM(o.total), 2) AS total_revenue,
       COUNT(o.id) AS total_orders,
       COUNT(DISTINCT o.customer_id) AS unique_customers,
       ROUND(AVG(o.total), 2) AS avg_order_value
FROM orders o
WHERE o.status != 'Cancelled'
GROUP BY o.region
ORDER BY total_revenue DESC",
        tags: &[I::Region, I::Revenue, I::Orders],
    },
];
