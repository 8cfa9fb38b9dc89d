use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{
    ConfirmedValues, FieldUpdateRequest, FieldUpdateResponse, ItemDetails, PlanTotals,
    PlanUpdateResponse, RawMaterialUsage, SearchFilter, Stocktake,
};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the inventory server's lookup and single-cell update endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(config.api_url.clone(), config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_item(&self, item_id: i64) -> Result<ItemDetails, ClientError> {
        self.get_json(&format!("/inventory/api/item/{item_id}")).await
    }

    pub async fn fetch_stocktake(&self, item_id: i64) -> Result<Stocktake, ClientError> {
        self.get_json(&format!("/inventory/api/stocktake/{item_id}")).await
    }

    pub async fn fetch_raw_material_usage(
        &self,
        item_id: i64,
    ) -> Result<RawMaterialUsage, ClientError> {
        self.get_json(&format!("/inventory/api/raw_material/{item_id}")).await
    }

    pub async fn update_field(
        &self,
        request: &FieldUpdateRequest,
    ) -> Result<ConfirmedValues, ClientError> {
        let response: FieldUpdateResponse =
            self.post_json("/inventory/update_field", request).await?;
        if !response.success {
            warn!(id = request.id, field = %request.field, "field update rejected");
            return Err(ClientError::rejected(response.error));
        }
        response.data.ok_or(ClientError::MissingData)
    }

    pub async fn update_daily_plan(
        &self,
        request: &FieldUpdateRequest,
    ) -> Result<PlanTotals, ClientError> {
        let response: PlanUpdateResponse = self.post_json("/update_daily_plan", request).await?;
        if !response.success {
            warn!(id = request.id, field = %request.field, "plan update rejected");
            return Err(ClientError::rejected(response.error));
        }
        match (response.total_planned, response.variance) {
            (Some(total_planned), Some(variance)) => Ok(PlanTotals {
                total_planned,
                variance,
            }),
            _ => Err(ClientError::MissingData),
        }
    }

    /// Address of the inventory list filtered by `filter`. Empty filter fields
    /// are still sent, matching a submitted search form.
    pub fn inventory_search_url(&self, filter: &SearchFilter) -> Result<Url, ClientError> {
        let request = self
            .http
            .get(format!("{}/inventory/", self.base_url))
            .query(filter)
            .build()?;
        Ok(request.url().clone())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "request failed");
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
