//! GraphQL dashboard query.

use std::future::Future;

use serde::Deserialize;

use wattdesk_app::ports::DashboardSource;
use wattdesk_domain::energy::DashboardData;
use wattdesk_domain::error::WattdeskError;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Energy snapshot plus every device summary, one fragment per device type.
pub const DASHBOARD_QUERY: &str = r"
query {
  energyStats {
    currentProduction
    currentConsumption
    currentStorage {
      totalCapacityWh
      currentLevelWh
      percentage
    }
    currentStorageFlow
    netGridFlow
  }
  allDevices {
    __typename
    ... on SolarPanelType {
      id
      name
      status
      panelAreaM2
      efficiency
      maxCapacityW
    }
    ... on GeneratorType {
      id
      name
      status
      ratedOutputW
    }
    ... on BatteryType {
      id
      name
      status
      capacityKwh
      currentChargeKwh
      maxChargeRateKw
      maxDischargeRateKw
      chargePercentage
    }
    ... on ElectricVehicleType {
      id
      name
      status
      mode
      capacityKwh
      currentChargeKwh
      maxChargeRateKw
      maxDischargeRateKw
      chargePercentage
    }
    ... on AirConditionerType {
      id
      name
      status
      ratedPowerW
      minPowerW
      maxPowerW
    }
    ... on HeaterType {
      id
      name
      status
      ratedPowerW
      minPowerW
      maxPowerW
    }
  }
}
";

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

impl<T> GraphQlResponse<T> {
    /// The first reported error wins over any data.
    fn into_result(self) -> Result<T, ApiError> {
        if let Some(first) = self.errors.and_then(|errors| errors.into_iter().next()) {
            return Err(ApiError::GraphQl {
                message: first
                    .message
                    .unwrap_or_else(|| "GraphQL query error".to_string()),
            });
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

impl ApiClient {
    /// Run a GraphQL query with the client's token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::GraphQlStatus`] on a non-success status,
    /// [`ApiError::GraphQl`] when the body lists errors, and
    /// [`ApiError::Request`] when no usable response arrives.
    pub async fn graphql<T: serde::de::DeserializeOwned>(&self, query: &str) -> Result<T, ApiError> {
        let body = serde_json::json!({ "query": query });
        let response = self
            .authorize(self.http().post(&*self.graphql_url).json(&body))
            .send()
            .await
            .map_err(ApiError::Request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::GraphQlStatus {
                status: status.as_u16(),
            });
        }
        let payload: GraphQlResponse<T> = response.json().await.map_err(ApiError::Request)?;
        payload.into_result()
    }

    /// Fetch the energy snapshot and device summaries.
    ///
    /// # Errors
    ///
    /// Same as [`graphql`](Self::graphql).
    #[tracing::instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardData, ApiError> {
        self.graphql(DASHBOARD_QUERY).await
    }
}

impl DashboardSource for ApiClient {
    fn fetch_dashboard(&self) -> impl Future<Output = Result<DashboardData, WattdeskError>> + Send {
        let client = self.clone();
        async move { client.dashboard().await.map_err(WattdeskError::from) }
    }
}
