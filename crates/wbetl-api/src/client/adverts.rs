//! Advertising endpoints: campaign listing, campaign details, full statistics.

use reqwest::Method;

use crate::error::ApiError;
use crate::flatten;
use crate::paging::{fetch_chunked, FetchReport};
use crate::types::{
    AdvertInfo, CampaignStats, FullStatsRequest, IntervalBody, PromotionCountResponse, StatsPeriod,
};

use super::{
    WbClient, ADVERTS_CHUNK_PAUSE, ADVERTS_CHUNK_SIZE, FULLSTATS_CHUNK_PAUSE, FULLSTATS_CHUNK_SIZE,
};

impl WbClient {
    /// Lists every campaign id of the account, grouped listing flattened.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the listing cannot be fetched; without it no
    /// other advertising call can be made for the account.
    pub async fn campaign_ids(&self, api_key: &str) -> Result<Vec<i64>, ApiError> {
        let url = self.advert_url("/adv/v1/promotion/count");
        let response: PromotionCountResponse = self
            .request_json::<(), _>(api_key, Method::GET, &url, &[], None, "promotion/count")
            .await?;
        let ids = flatten::campaign_ids(&response);
        tracing::debug!(campaigns = ids.len(), "campaign listing fetched");
        Ok(ids)
    }

    /// Fetches campaign attributes in chunks of 50 ids, one second apart.
    pub async fn campaign_details(&self, api_key: &str, ids: &[i64]) -> FetchReport<AdvertInfo> {
        let url = self.advert_url("/adv/v1/promotion/adverts");
        let query = [("order", "create"), ("direction", "desc")];

        fetch_chunked(
            ids,
            ADVERTS_CHUNK_SIZE,
            ADVERTS_CHUNK_PAUSE,
            &self.pacer,
            &self.cancel,
            "promotion/adverts",
            |chunk| {
                let url = &url;
                let query = &query;
                async move {
                    let adverts: Option<Vec<AdvertInfo>> = self
                        .request_json(
                            api_key,
                            Method::POST,
                            url,
                            query,
                            Some(&chunk),
                            "promotion/adverts",
                        )
                        .await?;
                    Ok::<_, ApiError>(adverts.unwrap_or_default())
                }
            },
        )
        .await
    }

    /// Fetches full statistics in chunks of 100 ids, 65 seconds apart.
    ///
    /// Stops sending chunks once the upstream reports that no campaign has
    /// data for `period`.
    pub async fn campaign_stats(
        &self,
        api_key: &str,
        ids: &[i64],
        period: &StatsPeriod,
    ) -> FetchReport<CampaignStats> {
        let url = self.advert_url("/adv/v2/fullstats");

        fetch_chunked(
            ids,
            FULLSTATS_CHUNK_SIZE,
            FULLSTATS_CHUNK_PAUSE,
            &self.pacer,
            &self.cancel,
            "fullstats",
            |chunk| {
                let url = &url;
                async move {
                    let body = fullstats_body(&chunk, period);
                    let stats: Option<Vec<CampaignStats>> = self
                        .request_json(api_key, Method::POST, url, &[], Some(&body), "fullstats")
                        .await?;
                    Ok::<_, ApiError>(stats.unwrap_or_default())
                }
            },
        )
        .await
    }
}

fn fullstats_body<'a>(ids: &[i64], period: &'a StatsPeriod) -> Vec<FullStatsRequest<'a>> {
    ids.iter()
        .map(|&id| match period {
            StatsPeriod::Dates(dates) => FullStatsRequest {
                id,
                dates: Some(dates.as_slice()),
                interval: None,
            },
            StatsPeriod::Interval { begin, end } => FullStatsRequest {
                id,
                dates: None,
                interval: Some(IntervalBody {
                    begin: begin.as_str(),
                    end: end.as_str(),
                }),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn interval_body_has_one_entry_per_id() {
        let period = StatsPeriod::Interval {
            begin: "2024-12-01".to_owned(),
            end: "2024-12-07".to_owned(),
        };
        let body = serde_json::to_value(fullstats_body(&[1, 2], &period)).unwrap();
        assert_eq!(
            body,
            json!([
                {"id": 1, "interval": {"begin": "2024-12-01", "end": "2024-12-07"}},
                {"id": 2, "interval": {"begin": "2024-12-01", "end": "2024-12-07"}}
            ])
        );
    }

    #[test]
    fn dates_body_lists_days() {
        let period = StatsPeriod::Dates(vec!["2024-12-01".to_owned()]);
        let body = serde_json::to_value(fullstats_body(&[9], &period)).unwrap();
        assert_eq!(body, json!([{"id": 9, "dates": ["2024-12-01"]}]));
    }
}
