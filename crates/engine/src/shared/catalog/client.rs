use super::{CatalogApi, CatalogError, CreateResponse};
use crate::shared::config::ApiConfig;
use async_trait::async_trait;
use contracts::domain::a002_reference_entity::{ReferenceEntity, ReferenceKind};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// HTTP-клиент каталога
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

/// Ответ поиска: массив совпадений вложен как `data.data`
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<SearchPage>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Vec<ReferenceEntity>,
}

impl CatalogClient {
    pub fn new(api: &ApiConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token: api.token.clone(),
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Проверить HTTP-статус и разобрать тело; в ошибку разбора попадает
    /// усеченное тело ответа для диагностики
    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Http {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let body = response.text().await?;

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse catalog response: {}", e);
            CatalogError::Parse {
                detail: format!("{}. Response: {}", e, preview(&body)),
            }
        })
    }
}

/// Усечение тела ответа для логов и сообщений об ошибках
fn preview(body: &str) -> String {
    let cut: String = body.chars().take(200).collect();
    if cut.len() < body.len() {
        format!("{}...", cut)
    } else {
        cut
    }
}

/// Короткий код единицы измерения, производный от имени (первые 5 символов)
fn derive_short_code(name: &str) -> String {
    name.chars().take(5).collect()
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn search_references(
        &self,
        kind: ReferenceKind,
        keyword: &str,
    ) -> Result<Vec<ReferenceEntity>, CatalogError> {
        let url = format!("{}/{}/all", self.base_url, kind.endpoint_path());

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .header("Accept", "application/json")
            .query(&[("page", "1"), ("limit", "10"), ("keyword", keyword)])
            .send()
            .await?;

        let parsed: SearchResponse = self.parse_response(response).await?;
        Ok(parsed.data.map(|page| page.data).unwrap_or_default())
    }

    async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<CreateResponse, CatalogError> {
        let url = format!("{}/{}/create", self.base_url, kind.endpoint_path());

        let payload = match kind {
            ReferenceKind::Unit => json!({
                "identification_number": "",
                "short_code": derive_short_code(name),
                "name": name,
                "change_rate": 0,
                "description": "",
                "unit_type": "main",
                "status": true,
            }),
            ReferenceKind::Category => json!({
                "name": name,
                "identification_number": "",
                "description": "",
                "status": true,
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&payload)
            .send()
            .await?;

        self.parse_response(response).await
    }

    async fn create_product(
        &self,
        form: &[(String, String)],
    ) -> Result<CreateResponse, CatalogError> {
        let url = format!("{}/products/create", self.base_url);

        // Content-Type здесь form-urlencoded, не JSON; reqwest выставит его сам
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .form(form)
            .send()
            .await?;

        self.parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_short_code() {
        assert_eq!(derive_short_code("Liter"), "Liter");
        assert_eq!(derive_short_code("Kilogram"), "Kilog");
        assert_eq!(derive_short_code("кг"), "кг");
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "x".repeat(500);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert!(p.len() < long.len());
    }

    #[test]
    fn test_search_response_nesting() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"data": {"data": [{"id": 5, "name": "Liter", "short_code": "Liter"}]}}"#,
        )
        .unwrap();
        let items = parsed.data.map(|p| p.data).unwrap_or_default();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 5);
    }

    #[test]
    fn test_search_response_without_data() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"status": 0}"#).unwrap();
        assert!(parsed.data.is_none());
    }
}
