use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use tracing::debug;

use super::{ItemStore, StoreError, UpdateInstruction};
use crate::model::{Item, KEY_ATTRIBUTE};

/// DynamoDB store configuration
#[derive(Debug, Clone, Default)]
pub struct DynamoConfig {
    /// DynamoDB table name
    pub table_name: String,
    /// AWS region (uses SDK default if not specified)
    pub region: Option<String>,
    /// Endpoint override (e.g. DynamoDB Local)
    pub endpoint_url: Option<String>,
}

/// Items kept in one DynamoDB table with a string partition key `id`.
#[derive(Clone)]
pub struct DynamoItemStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoItemStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoItemStore {
    /// Build a store from the shared SDK configuration plus overrides.
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig, config: DynamoConfig) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(region) = config.region {
            builder = builder.region(aws_sdk_dynamodb::config::Region::new(region));
        }

        if let Some(endpoint) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: config.table_name,
        }
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

fn to_attributes(item: &Item) -> Result<HashMap<String, AttributeValue>, StoreError> {
    Ok(serde_dynamo::to_item(item)?)
}

fn from_attributes(attributes: HashMap<String, AttributeValue>) -> Result<Item, StoreError> {
    Ok(serde_dynamo::from_item(attributes)?)
}

fn is_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            UpdateItemError::ConditionalCheckFailedException(_)
        ),
        _ => false,
    }
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        let attributes = to_attributes(item)?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| StoreError::backend("put", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(id))
            .send()
            .await
            .map_err(|e| StoreError::backend("get", DisplayErrorContext(&e)))?;

        output.item.map(from_attributes).transpose()
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut last_evaluated_key = None;
        let mut pages = 0usize;

        loop {
            let mut request = self.client.scan().table_name(&self.table_name);

            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::backend("scan", DisplayErrorContext(&e)))?;
            pages += 1;

            for attributes in response.items.unwrap_or_default() {
                items.push(from_attributes(attributes)?);
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => last_evaluated_key = Some(key),
                _ => break,
            }
        }

        debug!(table = %self.table_name, pages, count = items.len(), "scan complete");
        Ok(items)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(id))
            .send()
            .await
            .map_err(|e| StoreError::backend("delete", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        instruction: &UpdateInstruction,
    ) -> Result<Item, StoreError> {
        let names: HashMap<String, String> = instruction.names().iter().cloned().collect();
        let mut values = HashMap::with_capacity(instruction.len());
        for (placeholder, value) in instruction.values() {
            let attribute: AttributeValue = serde_dynamo::to_attribute_value(value)?;
            values.insert(placeholder.clone(), attribute);
        }

        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, Self::key(id))
            .update_expression(instruction.update_expression())
            .condition_expression(instruction.condition_expression())
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| {
                if is_conditional_check_failed(&e) {
                    StoreError::ConditionFailed
                } else {
                    StoreError::backend("update", DisplayErrorContext(&e))
                }
            })?;

        match output.attributes {
            Some(attributes) => from_attributes(attributes),
            None => Err(StoreError::Codec(
                "update returned no attributes".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UpdateExpressionBuilder;
    use aws_config::BehaviorVersion;
    use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
    use aws_sdk_dynamodb::operation::scan::ScanOutput;
    use aws_sdk_dynamodb::operation::update_item::UpdateItemOutput;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ResourceNotFoundException,
    };
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use serde_json::json;

    #[test]
    fn items_convert_to_attributes_and_back() {
        let item: Item = serde_json::from_value(json!({
            "id": "a1",
            "name": "Widget",
            "tags": ["x", "y"],
            "dims": {"w": 2},
            "active": true
        }))
        .unwrap();

        let attributes = to_attributes(&item).unwrap();
        assert_eq!(attributes.get("id"), Some(&AttributeValue::S("a1".to_string())));
        assert_eq!(attributes.get("active"), Some(&AttributeValue::Bool(true)));

        let back = from_attributes(attributes).unwrap();
        assert_eq!(back.to_value()["dims"], json!({"w": 2}));
        assert_eq!(back.id(), Some("a1"));
    }

    #[test]
    fn store_is_built_from_overrides() {
        let sdk_config = aws_config::SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .build();
        let store = DynamoItemStore::new(
            &sdk_config,
            DynamoConfig {
                table_name: "items".to_string(),
                region: Some("eu-west-1".to_string()),
                endpoint_url: Some("http://localhost:8000".to_string()),
            },
        );
        assert_eq!(store.table_name(), "items");
        assert!(format!("{store:?}").contains("items"));
    }

    fn mocked(client: Client) -> DynamoItemStore {
        DynamoItemStore {
            client,
            table_name: "items".to_string(),
        }
    }

    fn page(id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string())),
            ("name".to_string(), AttributeValue::S(id.to_uppercase())),
        ])
    }

    fn rename() -> UpdateInstruction {
        let mut builder = UpdateExpressionBuilder::new(KEY_ATTRIBUTE);
        builder.set("name", json!("New"));
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn scan_follows_last_evaluated_key() {
        let first = mock!(Client::scan)
            .match_requests(|req| req.exclusive_start_key().is_none())
            .then_output(|| {
                ScanOutput::builder()
                    .items(page("a"))
                    .last_evaluated_key(KEY_ATTRIBUTE, AttributeValue::S("a".to_string()))
                    .build()
            });
        let second = mock!(Client::scan)
            .match_requests(|req| {
                req.exclusive_start_key()
                    .and_then(|key| key.get(KEY_ATTRIBUTE))
                    == Some(&AttributeValue::S("a".to_string()))
            })
            .then_output(|| ScanOutput::builder().items(page("b")).build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::MatchAny, [&first, &second]);

        let items = mocked(client).scan().await.unwrap();

        let ids: Vec<_> = items.iter().filter_map(Item::id).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(first.num_calls(), 1);
        assert_eq!(second.num_calls(), 1);
    }

    #[tokio::test]
    async fn absent_item_reads_as_none() {
        let rule = mock!(Client::get_item)
            .match_requests(|req| req.table_name() == Some("items"))
            .then_output(|| GetItemOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        assert_eq!(mocked(client).get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_sends_conditional_expression() {
        let rule = mock!(Client::update_item)
            .match_requests(|req| {
                req.update_expression() == Some("SET #k0 = :v0")
                    && req.condition_expression() == Some("attribute_exists(id)")
                    && req
                        .expression_attribute_names()
                        .and_then(|names| names.get("#k0"))
                        .map(String::as_str)
                        == Some("name")
                    && req.return_values() == Some(&ReturnValue::AllNew)
            })
            .then_output(|| {
                UpdateItemOutput::builder()
                    .attributes(KEY_ATTRIBUTE, AttributeValue::S("x".to_string()))
                    .attributes("name", AttributeValue::S("New".to_string()))
                    .build()
            });
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let item = mocked(client).update("x", &rename()).await.unwrap();

        assert_eq!(item.id(), Some("x"));
        assert_eq!(item.name(), Some("New"));
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn failed_condition_maps_to_condition_failed() {
        let rule = mock!(Client::update_item).then_error(|| {
            UpdateItemError::ConditionalCheckFailedException(
                ConditionalCheckFailedException::builder()
                    .message("The conditional request failed")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let err = mocked(client).update("missing", &rename()).await.unwrap_err();

        assert_eq!(err, StoreError::ConditionFailed);
    }

    #[tokio::test]
    async fn other_update_failures_map_to_backend() {
        let rule = mock!(Client::update_item).then_error(|| {
            UpdateItemError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            )
        });
        let client = mock_client!(aws_sdk_dynamodb, [&rule]);

        let err = mocked(client).update("x", &rename()).await.unwrap_err();

        match &err {
            StoreError::Backend { operation, message } => {
                assert_eq!(*operation, "update");
                assert!(message.contains("Requested resource not found"), "{message}");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }
}
