use crate::adapters::RegistrantSource;
use crate::domain::model::{RegistrantBatch, SuggestionRun};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn tournament_name(&self) -> &str;
    fn source(&self) -> Result<RegistrantSource>;
    fn assigned_file(&self) -> Option<&str>;
    fn assigned_ids(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// Archive name when output should be zipped.
    fn zip_output(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RegistrantBatch>;
    async fn transform(&self, batch: RegistrantBatch) -> Result<SuggestionRun>;
    async fn load(&self, run: SuggestionRun) -> Result<String>;
}
