//! Sales statistics endpoints.

use super::{with_query, ApiClient};
use crate::error::ApiResult;
use crate::gateway::RequestOptions;
use serde_json::Value;
use ventasimple_types::{Bucket, CategoryLeader, DateRange, SalesSeries, StatsSummary, TopProduct};

impl ApiClient {
    /// Sales total, ticket count, average ticket and items sold.
    pub async fn stats_summary(&self, token: &str, range: &DateRange) -> ApiResult<StatsSummary> {
        let path = with_query("/stats/summary", &range.query_pairs());
        self.fetch(&path, RequestOptions::get().bearer(token)).await
    }

    /// Best-selling products by units, at most `limit`.
    pub async fn top_products(
        &self,
        token: &str,
        range: &DateRange,
        limit: u32,
    ) -> ApiResult<Vec<TopProduct>> {
        let mut pairs = range.query_pairs();
        pairs.push(("limit", limit.to_string()));
        let path = with_query("/stats/top-products", &pairs);
        self.fetch_list(&path, RequestOptions::get().bearer(token))
            .await
    }

    /// Units sold per category.
    pub async fn category_leaders(
        &self,
        token: &str,
        range: &DateRange,
    ) -> ApiResult<Vec<CategoryLeader>> {
        let path = with_query("/stats/category-leaders", &range.query_pairs());
        self.fetch_list(&path, RequestOptions::get().bearer(token))
            .await
    }

    /// Sales per `bucket` over `range`.
    pub async fn sales_series(
        &self,
        token: &str,
        range: &DateRange,
        bucket: Bucket,
    ) -> ApiResult<SalesSeries> {
        let mut pairs = range.query_pairs();
        pairs.push(("bucket", bucket.as_str().to_string()));
        let path = with_query("/stats/sales-series", &pairs);
        self.fetch(&path, RequestOptions::get().bearer(token)).await
    }

    /// Period-over-period comparison, passed through untyped.
    pub async fn stats_compare(&self, token: &str, range: &DateRange) -> ApiResult<Value> {
        let path = with_query("/stats/compare", &range.query_pairs());
        Ok(self
            .call(&path, RequestOptions::get().bearer(token))
            .await?
            .into_json())
    }

    /// Sales by weekday and hour, passed through untyped.
    pub async fn hours_heatmap(&self, token: &str, range: &DateRange) -> ApiResult<Value> {
        let path = with_query("/stats/hours-heatmap", &range.query_pairs());
        Ok(self
            .call(&path, RequestOptions::get().bearer(token))
            .await?
            .into_json())
    }
}
