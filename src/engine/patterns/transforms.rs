use super::TransformTemplate;
use crate::engine::types::TransformKind;

/// Transformation plans in declaration order; the first one is the fallback.
pub static TRANSFORM_TEMPLATES: &[TransformTemplate] = &[
    TransformTemplate {
        kind: TransformKind::CleanNulls,
        name: "Clean Null Values",
        description: "Remove or fill null/missing values in the dataset",
        keywords: &["null", "missing", "empty", "clean", "fill", "nan"],
        steps: &[
            "Identify columns with null values",
            "For numeric columns: fill with median value",
            "For categorical columns: fill with mode value",
            "Drop rows where critical fields (id, date) are null",
            "Log the count of nulls cleaned per column",
        ],
        code: r#"import pandas as pd

def clean_nulls(df):
    report = {}
    for col in df.columns:
        null_count = df[col].isnull().sum()
        if null_count > 0:
            report[col] = null_count
            if df[col].dtype in ['float64', 'int64']:
                df[col] = df[col].fillna(df[col].median())
            else:
                df[col] = df[col].fillna(df[col].mode()[0])
    return df, report"#,
    },
    TransformTemplate {
        kind: TransformKind::NormalizePrices,
        name: "Normalize Price Fields",
        description: "Standardize price columns to 2 decimal places and handle outliers",
        keywords: &["normalize", "price", "standardize", "decimal", "outlier"],
        steps: &[
            "Round all price fields to 2 decimal places",
            "Identify outliers using IQR method",
            "Flag outlier rows for review",
            "Ensure no negative prices exist",
        ],
        code: r#"import pandas as pd

def normalize_prices(df, price_cols):
    for col in price_cols:
        df[col] = df[col].round(2).clip(lower=0)
        q1 = df[col].quantile(0.25)
        q3 = df[col].quantile(0.75)
        iqr = q3 - q1
        df[f'{col}_outlier'] = (df[col] < q1 - 1.5 * iqr) | (df[col] > q3 + 1.5 * iqr)
    return df"#,
    },
    TransformTemplate {
        kind: TransformKind::AggregateRevenue,
        name: "Aggregate Revenue Metrics",
        description: "Create aggregated revenue views by different dimensions",
        keywords: &["aggregate", "group", "summarize", "revenue", "total", "sum"],
        steps: &[
            "Group by time period (daily/monthly/quarterly)",
            "Calculate sum, average, and count metrics",
            "Add running total and moving averages",
            "Calculate period-over-period growth rates",
        ],
        code: r#"import pandas as pd

def aggregate_revenue(df, period='M'):
    df['order_date'] = pd.to_datetime(df['order_date'])
    agg = df.groupby(df['order_date'].dt.to_period(period)).agg(
        revenue=('total', 'sum'),
        orders=('id', 'count'),
        avg_order=('total', 'mean'),
    ).reset_index()
    agg['running_total'] = agg['revenue'].cumsum()
    agg['growth_pct'] = agg['revenue'].pct_change() * 100
    return agg"#,
    },
    TransformTemplate {
        kind: TransformKind::CustomerRfm,
        name: "RFM Customer Segmentation",
        description: "Compute Recency, Frequency, Monetary scores for customer segmentation",
        keywords: &[
            "rfm",
            "segment",
            "recency",
            "frequency",
            "monetary",
            "customer segment",
        ],
        steps: &[
            "Calculate days since last purchase (Recency)",
            "Count total orders per customer (Frequency)",
            "Sum total spend per customer (Monetary)",
            "Score each dimension on 1-5 scale",
            "Assign customer segments based on combined RFM score",
        ],
        code: r#"import pandas as pd

def rfm_segmentation(orders_df, reference_date):
    rfm = orders_df.groupby('customer_id').agg(
        recency=('order_date', lambda x: (reference_date - pd.to_datetime(x).max()).days),
        frequency=('id', 'count'),
        monetary=('total', 'sum'),
    ).reset_index()
    for col in ['recency', 'frequency', 'monetary']:
        labels = [5, 4, 3, 2, 1] if col == 'recency' else [1, 2, 3, 4, 5]
        rfm[f'{col}_score'] = pd.qcut(rfm[col], q=5, labels=labels)
    rfm['rfm_score'] = (
        rfm['recency_score'].astype(int)
        + rfm['frequency_score'].astype(int)
        + rfm['monetary_score'].astype(int)
    )
    return rfm"#,
    },
    TransformTemplate {
        kind: TransformKind::Deduplicate,
        name: "Deduplicate Records",
        description: "Identify and remove duplicate records from the dataset",
        keywords: &["duplicate", "dedup", "unique", "remove duplicate", "distinct"],
        steps: &[
            "Identify exact duplicates across all columns",
            "Identify near-duplicates using key columns",
            "Keep first occurrence, flag duplicates",
            "Log deduplication summary",
        ],
        code: r#"import pandas as pd

def deduplicate(df, key_cols=None):
    before = len(df)
    df = df.drop_duplicates(subset=key_cols, keep='first')
    after = len(df)
    return df, {'removed': before - after, 'remaining': after}"#,
    },
    TransformTemplate {
        kind: TransformKind::EnrichDates,
        name: "Date Feature Engineering",
        description: "Extract rich temporal features from date columns",
        keywords: &[
            "date",
            "temporal",
            "time",
            "day of week",
            "quarter",
            "month",
            "year",
            "feature",
        ],
        steps: &[
            "Parse date strings into datetime objects",
            "Extract year, month, day, day_of_week, quarter",
            "Add is_weekend and is_holiday flags",
            "Calculate days_since_epoch for ML features",
        ],
        code: r#"import pandas as pd

def enrich_dates(df, date_col='order_date'):
    df[date_col] = pd.to_datetime(df[date_col])
    df['year'] = df[date_col].dt.year
    df['month'] = df[date_col].dt.month
    df['day'] = df[date_col].dt.day
    df['day_of_week'] = df[date_col].dt.day_name()
    df['quarter'] = df[date_col].dt.quarter
    df['is_weekend'] = df[date_col].dt.weekday >= 5
    return df"#,
    },
];
