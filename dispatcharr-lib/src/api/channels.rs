//! Channel endpoints and the channel-stream assignment gateway.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::DispatcharrClient;
use crate::api::Gateway;
use crate::api::query::ListParams;
use crate::api::query::Page;
use crate::error::Error;
use crate::model::Channel;
use crate::model::RowId;
use crate::model::Stream;

const CHANNELS_PATH: &str = "channels/channels/";

#[derive(Serialize)]
struct StreamOrderBody<'a> {
    streams: &'a [RowId],
}

impl DispatcharrClient {
    /// Retrieves a single channel.
    pub async fn channel(&self, id: RowId) -> Result<Channel, Error> {
        self.get_json(&format!("{CHANNELS_PATH}{id}/"), &[]).await
    }

    /// Returns the gateway over the streams assigned to a channel.
    pub fn channel_streams(&self, channel_id: RowId) -> ChannelStreamsGateway {
        ChannelStreamsGateway {
            client: self.clone(),
            channel_id,
        }
    }

    /// Replaces a channel's stream list; list position becomes stream order.
    pub async fn set_channel_streams(&self, channel_id: RowId, streams: &[RowId]) -> Result<(), Error> {
        let body = StreamOrderBody { streams };
        self.send_json(Method::PATCH, &format!("{CHANNELS_PATH}{channel_id}/"), &body)
            .await
    }
}

/// Gateway over the ordered streams of one channel.
///
/// The endpoint returns every assigned stream in stored order without
/// server-side paging or filtering, so pages are cut locally and the
/// ordering and filter parameters are ignored.
#[derive(Clone)]
pub struct ChannelStreamsGateway {
    client: DispatcharrClient,
    channel_id: RowId,
}

impl ChannelStreamsGateway {
    /// The channel whose streams this gateway serves.
    pub fn channel_id(&self) -> RowId {
        self.channel_id
    }

    async fn all_streams(&self) -> Result<Vec<Stream>, Error> {
        self.client
            .get_json(&format!("{CHANNELS_PATH}{}/streams/", self.channel_id), &[])
            .await
    }
}

#[async_trait]
impl Gateway for ChannelStreamsGateway {
    type Row = Stream;

    async fn list(&self, params: &ListParams) -> Result<Page<Stream>, Error> {
        let streams = self.all_streams().await?;
        Ok(Page::slice(streams, params.page, params.page_size))
    }

    async fn ids_for_filter(&self, _params: &ListParams) -> Result<Vec<RowId>, Error> {
        let streams = self.all_streams().await?;
        Ok(streams.into_iter().map(|s| s.id).collect())
    }

    async fn mutate_order(&self, parent: RowId, ordered: &[RowId]) -> Result<(), Error> {
        self.client.set_channel_streams(parent, ordered).await
    }

    async fn groups_lookup(&self) -> Result<Vec<String>, Error> {
        self.client.streams().groups_lookup().await
    }
}
