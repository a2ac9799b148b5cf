//! Built-in API hooks.
//!
//! The pair demonstrates context hand-off: the before-request hook writes
//! `context.foo`, and the after-request hook copies it into the response
//! payload of the same exchange.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::descriptor::{ApiHookFn, DescriptorMeta, HookDescriptor, HookType};
use crate::error::{HookError, HookResult};
use crate::exchange::Exchange;
use crate::util;

use super::ids;

/// Bearer token stamped onto outgoing requests.
pub const AUTHORIZATION: &str = "Bearer 1234567890";

/// Stamps auth and timestamp headers, a random query value and a context
/// marker onto the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifyRequestParams;

#[async_trait]
impl ApiHookFn for ModifyRequestParams {
    async fn call(&self, exchange: &mut Exchange) -> HookResult<()> {
        let request = &mut exchange.request;
        request
            .headers
            .insert("Authorization".to_string(), Value::from(AUTHORIZATION));
        request
            .query
            .insert("foo".to_string(), Value::from(util::random_int(1, 100)?));
        request
            .headers
            .insert("X-Timestamp".to_string(), Value::from(Utc::now().timestamp()));

        exchange.context.insert("foo", "bar");
        debug!(exchange = %exchange.id, "Request params modified");
        Ok(())
    }
}

/// Copies `context.foo` into the response payload and writes `context.bar`.
///
/// A response without a payload is left untouched. When the context has no
/// `foo`, `data.foo` is set to `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifyResponseData;

#[async_trait]
impl ApiHookFn for ModifyResponseData {
    async fn call(&self, exchange: &mut Exchange) -> HookResult<()> {
        let foo = exchange.context.get("foo").cloned().unwrap_or(Value::Null);
        let response = exchange
            .response
            .as_mut()
            .ok_or(HookError::MissingResponse)?;

        if let Some(data) = response.data.as_mut() {
            data.insert("foo".to_string(), foo);
        }

        exchange.context.insert("bar", "foo");
        debug!(exchange = %exchange.id, "Response data modified");
        Ok(())
    }
}

/// Descriptors for the built-in hooks, in registration order.
pub fn descriptors() -> Vec<HookDescriptor> {
    vec![
        HookDescriptor::new(
            DescriptorMeta::new(ids::MODIFY_REQUEST_PARAMS)
                .with_display_name("Modify Request Params")
                .with_description("Modify the request params"),
            HookType::BeforeRequest,
            ModifyRequestParams,
        ),
        HookDescriptor::new(
            DescriptorMeta::new(ids::MODIFY_RESPONSE_DATA)
                .with_display_name("Modify Response Data")
                .with_description("Modify the response data"),
            HookType::AfterRequest,
            ModifyResponseData,
        ),
    ]
}
