// Source of raw video metadata for a channel
use crate::domain::video::RawVideoRecord;
use async_trait::async_trait;

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// All uploaded videos for a channel id or `@handle`
    async fn fetch_channel_videos(&self, channel: &str) -> anyhow::Result<Vec<RawVideoRecord>>;

    /// Whether the source has the credentials it needs to make requests
    fn is_configured(&self) -> bool;
}
