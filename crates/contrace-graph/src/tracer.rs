use async_trait::async_trait;

use contrace_core::{CarelessPerson, ContactTracer, InformList, SickSite, SpreadCount, TraceError};

use crate::client::GraphClient;

#[async_trait]
impl ContactTracer for GraphClient {
    async fn list_labels(&self) -> Result<Vec<String>, TraceError> {
        Ok(GraphClient::list_labels(self).await?)
    }

    async fn possible_spreaders(&self) -> Result<Vec<String>, TraceError> {
        Ok(GraphClient::possible_spreaders(self).await?)
    }

    async fn possible_spread_counts(&self) -> Result<Vec<SpreadCount>, TraceError> {
        Ok(GraphClient::possible_spread_counts(self).await?)
    }

    async fn careless_people(&self) -> Result<Vec<CarelessPerson>, TraceError> {
        Ok(GraphClient::careless_people(self).await?)
    }

    async fn socially_careful(&self) -> Result<Vec<String>, TraceError> {
        Ok(GraphClient::socially_careful(self).await?)
    }

    async fn people_to_inform(&self) -> Result<Vec<InformList>, TraceError> {
        Ok(GraphClient::people_to_inform(self).await?)
    }

    async fn set_high_risk(&self) -> Result<Vec<String>, TraceError> {
        Ok(GraphClient::set_high_risk(self).await?)
    }

    async fn healthy_companions_of(&self, name: &str) -> Result<Vec<String>, TraceError> {
        Ok(GraphClient::healthy_companions_of(self, name).await?)
    }

    async fn top_sick_site(&self) -> Result<SickSite, TraceError> {
        Ok(GraphClient::top_sick_site(self).await?)
    }

    async fn sick_from(&self, names: &[String]) -> Result<Vec<String>, TraceError> {
        Ok(GraphClient::sick_from(self, names).await?)
    }
}
