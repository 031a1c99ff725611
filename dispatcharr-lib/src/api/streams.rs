//! Stream catalog endpoints.
//!
//! # Example
//!
//! ```ignore
//! use dispatcharr_lib::api::Gateway;
//! use dispatcharr_lib::api::query::{ListParams, Ordering};
//!
//! let streams = client.streams();
//! let params = ListParams::new(1, 50)
//!     .ordering(Ordering::asc("name"))
//!     .filter("channel_group_name", "News");
//!
//! let page = streams.list(&params).await?;
//! let all_ids = streams.ids_for_filter(&params).await?;
//! ```

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::DispatcharrClient;
use crate::api::Gateway;
use crate::api::query::ListParams;
use crate::api::query::Page;
use crate::error::Error;
use crate::model::RowId;
use crate::model::Stream;

const STREAMS_PATH: &str = "channels/streams/";

/// Filter keys accepted by the stream list endpoint.
pub const STREAM_FILTER_KEYS: &[&str] = &[
    "name",
    "channel_group_name",
    "m3u_account",
    "m3u_account_name",
    "m3u_account_is_active",
    "assigned",
    "unassigned",
    "channel_group",
];

/// Fields the stream list endpoint can order by.
pub const STREAM_ORDERING_FIELDS: &[&str] = &["name", "channel_group__name"];

/// Gateway over the full stream catalog.
///
/// Streams have no parent entity, so reordering is unsupported.
#[derive(Clone)]
pub struct StreamsGateway {
    client: DispatcharrClient,
}

#[derive(Serialize)]
struct BulkDeleteBody<'a> {
    stream_ids: &'a [RowId],
}

impl DispatcharrClient {
    /// Returns the gateway over the stream catalog.
    pub fn streams(&self) -> StreamsGateway {
        StreamsGateway {
            client: self.clone(),
        }
    }
}

#[async_trait]
impl Gateway for StreamsGateway {
    type Row = Stream;

    async fn list(&self, params: &ListParams) -> Result<Page<Stream>, Error> {
        self.client.get_json(STREAMS_PATH, &params.to_pairs()).await
    }

    async fn ids_for_filter(&self, params: &ListParams) -> Result<Vec<RowId>, Error> {
        self.client
            .get_json(&format!("{STREAMS_PATH}ids/"), &params.filter_pairs())
            .await
    }

    async fn groups_lookup(&self) -> Result<Vec<String>, Error> {
        self.client
            .get_json(&format!("{STREAMS_PATH}groups/"), &[])
            .await
    }

    async fn bulk_delete(&self, ids: &[RowId]) -> Result<(), Error> {
        let body = BulkDeleteBody { stream_ids: ids };
        self.client
            .send_json(Method::DELETE, &format!("{STREAMS_PATH}bulk-delete/"), &body)
            .await
    }
}
